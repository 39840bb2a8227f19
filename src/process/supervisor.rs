use std::io::{BufRead, BufReader, ErrorKind, Read};
use std::path::Path;
use std::process::{Command, Stdio};
use std::time::Instant;

use tracing::{debug, info, warn};

use super::params::RunParameters;
use super::progress::parse_progress;
use crate::error::{LauncherError, Result};
use crate::host::Host;

/// Exit code the runtime uses for problems the user can fix.
pub const USER_ERROR_EXIT_CODE: i32 = 1;

/// How a runtime invocation ended.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum RunOutcome {
    Success,
    /// The runtime rejected the input; the message is its stderr, verbatim.
    UserError(String),
    /// Any other exit. `code` is `None` when the process was killed by a signal.
    Crash { code: Option<i32>, stderr: String },
}

impl RunOutcome {
    pub fn from_exit(code: Option<i32>, stderr: String) -> Self {
        match code {
            Some(0) => RunOutcome::Success,
            Some(USER_ERROR_EXIT_CODE) => {
                RunOutcome::UserError(stderr.trim_end_matches(['\n', '\r']).to_string())
            }
            code => RunOutcome::Crash { code, stderr },
        }
    }

    pub fn is_success(&self) -> bool {
        matches!(self, RunOutcome::Success)
    }
}

/// Run the runtime to completion, relaying its output to the host.
///
/// stdout and stderr are drained by two reader threads while this thread
/// waits on the process, so neither pipe can fill up and stall the child.
/// Progress lines drive the host's progress display; every other line is
/// appended to the host log. stderr is also captured for the outcome.
pub fn run_runtime<H: Host + ?Sized>(
    host: &H,
    runtime: &Path,
    params: &RunParameters,
) -> Result<RunOutcome> {
    let args = params.to_args();
    info!("Launching {:?} with {:?}", runtime, args);

    let mut child = Command::new(runtime)
        .args(&args)
        .stdin(Stdio::null())
        .stdout(Stdio::piped())
        .stderr(Stdio::piped())
        .spawn()
        .map_err(|source| LauncherError::RuntimeLaunch {
            path: runtime.to_path_buf(),
            source,
        })?;

    let stdout = child.stdout.take();
    let stderr = child.stderr.take();
    let started = Instant::now();

    let (status, captured) = std::thread::scope(|scope| {
        let out_reader = scope.spawn(|| {
            if let Some(stdout) = stdout {
                relay_lines(stdout, |line| {
                    relay_line(host, line);
                });
            }
        });
        let err_reader = scope.spawn(|| {
            let mut captured = String::new();
            if let Some(stderr) = stderr {
                relay_lines(stderr, |line| {
                    if !relay_line(host, line) {
                        captured.push_str(line);
                        captured.push('\n');
                    }
                });
            }
            captured
        });

        let status = child.wait();

        if out_reader.join().is_err() {
            warn!("stdout relay thread panicked");
        }
        let captured = err_reader.join().unwrap_or_else(|_| {
            warn!("stderr relay thread panicked");
            String::new()
        });
        (status, captured)
    });
    host.clear_progress();

    let status = status?;
    info!(
        "duosplit exited with {} after {:.1}s",
        status,
        started.elapsed().as_secs_f64()
    );
    Ok(RunOutcome::from_exit(status.code(), captured))
}

/// Send one output line to the host. Returns true if it was a progress line.
///
/// Blank lines are not logged.
fn relay_line<H: Host + ?Sized>(host: &H, line: &str) -> bool {
    let line = line.trim_end();
    match parse_progress(line) {
        Some(progress) => {
            debug!("{}", line);
            host.update_progress(
                &format!("duosplit: generation {}/{}", progress.generation, progress.total),
                progress.fraction(),
            );
            true
        }
        None => {
            if !line.is_empty() {
                host.log(line);
            }
            false
        }
    }
}

/// Feed each line of `reader` to `handle` as soon as its terminator arrives,
/// without the terminator and decoded lossily.
///
/// `\n`, `\r` and `\r\n` each end a line, so in-place terminal updates are
/// delivered one by one.
fn relay_lines<R: Read>(reader: R, mut handle: impl FnMut(&str)) {
    let mut reader = BufReader::new(reader);
    let mut line = Vec::new();
    let mut after_cr = false;
    loop {
        let consumed = match reader.fill_buf() {
            Ok([]) => break,
            Ok(chunk) => {
                for &byte in chunk {
                    match byte {
                        b'\n' if after_cr => after_cr = false,
                        b'\n' | b'\r' => {
                            handle(&String::from_utf8_lossy(&line));
                            line.clear();
                            after_cr = byte == b'\r';
                        }
                        _ => {
                            line.push(byte);
                            after_cr = false;
                        }
                    }
                }
                chunk.len()
            }
            Err(e) if e.kind() == ErrorKind::Interrupted => continue,
            Err(e) => {
                warn!("Stopped reading runtime output: {}", e);
                break;
            }
        };
        reader.consume(consumed);
    }
    if !line.is_empty() {
        handle(&String::from_utf8_lossy(&line));
    }
}
