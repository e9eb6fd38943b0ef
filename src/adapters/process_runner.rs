//! Bounded execution of external tools.
//!
//! Probes shell out to tools that may hang on network or daemon I/O, so every
//! invocation is polled against a deadline and the shared cancellation flag.

use std::io::{ErrorKind, Read};
use std::path::Path;
use std::process::{Child, Command, ExitStatus, Stdio};
use std::sync::mpsc::{self, Receiver, RecvTimeoutError};
use std::thread;
use std::time::{Duration, Instant};

use crate::domain::{AppError, CancelToken, ProbeLimits};

pub(crate) const POLL_INTERVAL: Duration = Duration::from_millis(50);

#[derive(Debug, Clone)]
pub struct ProcessOutput {
    pub status: ExitStatus,
    pub stdout: String,
    pub stderr: String,
}

impl ProcessOutput {
    pub fn success(&self) -> bool {
        self.status.success()
    }

    /// First non-empty stderr line, falling back to stdout.
    pub fn summary(&self) -> String {
        [&self.stderr, &self.stdout]
            .into_iter()
            .flat_map(|stream| stream.lines())
            .map(str::trim)
            .find(|line| !line.is_empty())
            .map(str::to_string)
            .unwrap_or_else(|| format!("exited with {}", self.status))
    }
}

#[derive(Debug, Clone)]
pub enum ProcessRun {
    Completed(ProcessOutput),
    NotInstalled,
    TimedOut(Duration),
    Cancelled,
}

pub fn run_with_limits(
    program: &str,
    args: &[&str],
    cwd: Option<&Path>,
    limits: &ProbeLimits,
) -> Result<ProcessRun, AppError> {
    let command_line = format!("{} {}", program, args.join(" "));
    if limits.cancel.is_cancelled() {
        return Ok(ProcessRun::Cancelled);
    }

    let mut command = Command::new(program);
    command.args(args).stdin(Stdio::null()).stdout(Stdio::piped()).stderr(Stdio::piped());
    if let Some(dir) = cwd {
        command.current_dir(dir);
    }

    let mut child = match command.spawn() {
        Ok(child) => child,
        Err(err) if err.kind() == ErrorKind::NotFound => {
            tracing::debug!(program, "tool not installed");
            return Ok(ProcessRun::NotInstalled);
        }
        Err(err) => {
            return Err(AppError::Process { command: command_line, details: err.to_string() });
        }
    };
    tracing::debug!(command = %command_line, pid = child.id(), "spawned probe process");

    let stdout = spawn_reader(child.stdout.take());
    let stderr = spawn_reader(child.stderr.take());

    let started = Instant::now();
    let deadline = started + limits.timeout;
    let status = loop {
        match child.try_wait() {
            Ok(Some(status)) => break status,
            Ok(None) => {
                if limits.cancel.is_cancelled() {
                    terminate(&mut child, &command_line);
                    return Ok(ProcessRun::Cancelled);
                }
                if Instant::now() >= deadline {
                    terminate(&mut child, &command_line);
                    return Ok(timed_out(&command_line, limits.timeout));
                }
                thread::sleep(POLL_INTERVAL);
            }
            Err(err) => {
                terminate(&mut child, &command_line);
                return Err(AppError::Process { command: command_line, details: err.to_string() });
            }
        }
    };

    // An interrupt delivered to the whole process group also ends the child.
    if limits.cancel.is_cancelled() {
        return Ok(ProcessRun::Cancelled);
    }

    // A grandchild may keep the pipes open after the child exits, so the
    // readers are bounded by the same deadline.
    let stdout = match collect(stdout, deadline, &limits.cancel) {
        Collected::Output(text) => text,
        Collected::TimedOut => return Ok(timed_out(&command_line, limits.timeout)),
        Collected::Cancelled => return Ok(ProcessRun::Cancelled),
    };
    let stderr = match collect(stderr, deadline, &limits.cancel) {
        Collected::Output(text) => text,
        Collected::TimedOut => return Ok(timed_out(&command_line, limits.timeout)),
        Collected::Cancelled => return Ok(ProcessRun::Cancelled),
    };

    let output = ProcessOutput { status, stdout, stderr };
    tracing::debug!(command = %command_line, status = %output.status, "probe process exited");
    Ok(ProcessRun::Completed(output))
}

fn timed_out(command_line: &str, timeout: Duration) -> ProcessRun {
    tracing::warn!(command = %command_line, "probe process timed out");
    ProcessRun::TimedOut(timeout)
}

fn spawn_reader<R>(stream: Option<R>) -> Option<Receiver<String>>
where
    R: Read + Send + 'static,
{
    stream.map(|mut stream| {
        let (tx, rx) = mpsc::channel();
        thread::spawn(move || {
            let mut buffer = Vec::new();
            let _ = stream.read_to_end(&mut buffer);
            let _ = tx.send(String::from_utf8_lossy(&buffer).into_owned());
        });
        rx
    })
}

enum Collected {
    Output(String),
    TimedOut,
    Cancelled,
}

fn collect(reader: Option<Receiver<String>>, deadline: Instant, cancel: &CancelToken) -> Collected {
    let Some(reader) = reader else {
        return Collected::Output(String::new());
    };
    loop {
        let slice = POLL_INTERVAL.min(deadline.saturating_duration_since(Instant::now()));
        match reader.recv_timeout(slice) {
            Ok(text) => return Collected::Output(text),
            Err(RecvTimeoutError::Disconnected) => return Collected::Output(String::new()),
            Err(RecvTimeoutError::Timeout) => {}
        }
        if cancel.is_cancelled() {
            return Collected::Cancelled;
        }
        if Instant::now() >= deadline {
            return Collected::TimedOut;
        }
    }
}

// Reader threads are left detached: a grandchild may still hold the pipes open.
fn terminate(child: &mut Child, command_line: &str) {
    if let Err(err) = child.kill() {
        tracing::debug!(command = %command_line, error = %err, "failed to kill probe process");
    }
    let _ = child.wait();
}
