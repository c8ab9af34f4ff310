//! Mapping decisions delegated to a long-lived external process.
//!
//! The process receives one dataset name per line on stdin and answers each
//! with exactly one line on stdout: either the target dataset name or the
//! literal `NOMAP`.
//!
//! ```text
//! > pool/a
//! < backup/pool/a
//! > pool/tmp
//! < NOMAP
//! ```
//!
//! The process is started once and never restarted. Once it exits, or once
//! an exchange fails halfway, every further lookup on the same
//! [`ExecMapping`] returns an error.

use std::fmt;
use std::io::{self, BufRead, BufReader, Read, Write};
use std::process::{Child, ChildStdin, ChildStdout, Command, ExitStatus, Stdio};
use std::sync::atomic::{AtomicBool, Ordering};
use std::sync::{Arc, Mutex, OnceLock};
use std::thread::{self, JoinHandle};
use std::time::Duration;

use crate::dataset::DatasetPath;
use crate::error::{Error, Result};

use super::DatasetMapping;

/// Response line meaning the process does not map the dataset.
pub const NO_MAP: &str = "NOMAP";

/// Longest response line accepted from the process, newline included.
const MAX_RESPONSE: u64 = 4096;

/// How often the watcher polls the process for termination.
const WATCH_INTERVAL: Duration = Duration::from_millis(50);

struct Channel {
    stdin: Option<ChildStdin>,
    stdout: BufReader<ChildStdout>,
    broken: bool,
}

/// A mapping backed by an external process.
///
/// Lookups on one instance are serialized; run several instances for
/// parallel throughput. Dropping the mapping closes the pipes and kills the
/// process if it is still running.
///
/// # Examples
///
/// ```no_run
/// use zrepl::mapping::{DatasetMapping, ExecMapping};
///
/// let mapping = ExecMapping::spawn("/usr/local/bin/zrepl-mapper", &["--sink", "backup"]).unwrap();
/// match mapping.map(&"pool/a".parse().unwrap()) {
///     Ok(Some(target)) => println!("mapped to {target}"),
///     Ok(None) => println!("not mapped"),
///     Err(e) => eprintln!("mapping failed: {e}"),
/// }
/// ```
pub struct ExecMapping {
    program: String,
    args: Vec<String>,
    channel: Mutex<Channel>,
    child: Arc<Mutex<Child>>,
    exit_status: Arc<OnceLock<ExitStatus>>,
    shutdown: Arc<AtomicBool>,
    watcher: Option<JoinHandle<()>>,
}

impl ExecMapping {
    /// Start `program` with `args` and attach to its stdin and stdout.
    ///
    /// The process's stderr is inherited.
    ///
    /// # Errors
    ///
    /// Returns [`Error::MappingSpawn`] if the process cannot be started.
    pub fn spawn<S: AsRef<str>>(program: &str, args: &[S]) -> Result<Self> {
        let args: Vec<String> = args.iter().map(|a| a.as_ref().to_string()).collect();

        let mut child = Command::new(program)
            .args(&args)
            .stdin(Stdio::piped())
            .stdout(Stdio::piped())
            .stderr(Stdio::inherit())
            .spawn()
            .map_err(|source| Error::MappingSpawn {
                program: program.to_string(),
                source,
            })?;

        let spawn_error = |what: &str| Error::MappingSpawn {
            program: program.to_string(),
            source: io::Error::new(io::ErrorKind::BrokenPipe, format!("{what} unavailable")),
        };
        let stdin = child.stdin.take().ok_or_else(|| spawn_error("stdin"))?;
        let stdout = child.stdout.take().ok_or_else(|| spawn_error("stdout"))?;

        log::debug!("started mapping process '{program}' (pid {})", child.id());

        let child = Arc::new(Mutex::new(child));
        let exit_status = Arc::new(OnceLock::new());
        let shutdown = Arc::new(AtomicBool::new(false));

        let spawned = {
            let program = program.to_string();
            let child = Arc::clone(&child);
            let exit_status = Arc::clone(&exit_status);
            let shutdown = Arc::clone(&shutdown);
            thread::Builder::new()
                .name("zrepl-mapping-watcher".to_string())
                .spawn(move || watch(&program, &child, &exit_status, &shutdown))
        };
        let watcher = match spawned {
            Ok(watcher) => watcher,
            Err(err) => {
                if let Ok(mut child) = child.lock() {
                    let _ = child.kill();
                    let _ = child.wait();
                }
                return Err(Error::Io(err));
            }
        };

        Ok(Self {
            program: program.to_string(),
            args,
            channel: Mutex::new(Channel {
                stdin: Some(stdin),
                stdout: BufReader::new(stdout),
                broken: false,
            }),
            child,
            exit_status,
            shutdown,
            watcher: Some(watcher),
        })
    }

    /// The program this mapping runs.
    #[must_use]
    pub fn program(&self) -> &str {
        &self.program
    }

    /// The arguments the program was started with.
    #[must_use]
    pub fn args(&self) -> &[String] {
        &self.args
    }

    /// Whether the process has been observed to terminate.
    #[must_use]
    pub fn has_exited(&self) -> bool {
        self.exit_status.get().is_some()
    }

    fn exited_error(&self) -> Option<Error> {
        self.exit_status
            .get()
            .map(|status| Error::MappingProcessExited {
                program: self.program.clone(),
                status: *status,
            })
    }

    fn exchange(&self, channel: &mut Channel, source: &DatasetPath) -> Result<String> {
        let stdin = channel.stdin.as_mut().ok_or_else(|| {
            Error::MappingIo(io::Error::new(io::ErrorKind::BrokenPipe, "stdin closed"))
        })?;

        let request = format!("{source}\n");
        if let Err(err) = stdin.write_all(request.as_bytes()).and_then(|()| stdin.flush()) {
            return Err(self.exited_error().unwrap_or(Error::MappingIo(err)));
        }

        let mut line = String::new();
        let read = (&mut channel.stdout)
            .take(MAX_RESPONSE)
            .read_line(&mut line)
            .map_err(Error::MappingIo)?;
        if !line.ends_with('\n') {
            if read as u64 == MAX_RESPONSE {
                return Err(Error::MappingIo(io::Error::new(
                    io::ErrorKind::InvalidData,
                    format!("response exceeds {MAX_RESPONSE} bytes"),
                )));
            }
            return Err(Error::MappingEndOfStream {
                program: self.program.clone(),
            });
        }

        line.truncate(line.trim_end_matches(['\n', '\r']).len());
        Ok(line)
    }
}

impl DatasetMapping for ExecMapping {
    fn map(&self, source: &DatasetPath) -> Result<Option<DatasetPath>> {
        let mut channel = self.channel.lock().map_err(|_| {
            Error::MappingIo(io::Error::other("mapping channel poisoned"))
        })?;

        if let Some(err) = self.exited_error() {
            return Err(err);
        }
        if channel.broken {
            return Err(Error::MappingIo(io::Error::other(
                "mapping channel unusable after an earlier failure",
            )));
        }

        let response = match self.exchange(&mut channel, source) {
            Ok(response) => response,
            Err(err) => {
                channel.broken = true;
                return Err(err);
            }
        };
        drop(channel);

        log::debug!("mapping process '{}': {source} -> {response}", self.program);

        if response == NO_MAP {
            return Ok(None);
        }
        DatasetPath::parse_non_empty(&response).map(Some)
    }
}

impl fmt::Debug for ExecMapping {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("ExecMapping")
            .field("program", &self.program)
            .field("args", &self.args)
            .field("exit_status", &self.exit_status.get())
            .finish_non_exhaustive()
    }
}

impl Drop for ExecMapping {
    fn drop(&mut self) {
        self.shutdown.store(true, Ordering::SeqCst);

        if let Ok(mut channel) = self.channel.lock() {
            channel.stdin.take();
        }

        if let Ok(mut child) = self.child.lock() {
            if let Ok(None) = child.try_wait() {
                if let Err(err) = child.kill() {
                    log::warn!("cannot kill mapping process '{}': {err}", self.program);
                }
            }
            let _ = child.wait();
        }

        if let Some(watcher) = self.watcher.take() {
            let _ = watcher.join();
        }
    }
}

/// Poll `child` until it exits or the mapping shuts down.
fn watch(
    program: &str,
    child: &Mutex<Child>,
    exit_status: &OnceLock<ExitStatus>,
    shutdown: &AtomicBool,
) {
    while !shutdown.load(Ordering::SeqCst) {
        let polled = match child.lock() {
            Ok(mut child) => child.try_wait(),
            Err(_) => return,
        };

        match polled {
            Ok(Some(status)) => {
                let _ = exit_status.set(status);
                if !shutdown.load(Ordering::SeqCst) {
                    log::warn!("mapping process '{program}' exited unexpectedly: {status}");
                }
                return;
            }
            Ok(None) => thread::sleep(WATCH_INTERVAL),
            Err(err) => {
                log::warn!("cannot observe mapping process '{program}': {err}");
                return;
            }
        }
    }
}
