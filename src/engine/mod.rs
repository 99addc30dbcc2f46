//! Transform engine integration
//!
//! The engine is an external executable, treated as a black box that consumes
//! a filter-graph description and produces a file or a failure. This module
//! holds the execution port the orchestrator depends on, the adapters that
//! implement it, and a captured-output helper with optional time budgeting.

use std::io::Read;
use std::path::Path;
use std::process::{Command, Stdio};
use std::time::{Duration, Instant};

use crate::domain::model::PipelineSpec;
use crate::error::RevidResult;

pub mod discovery;
pub mod invoker;
pub mod ssim;

pub use invoker::FfmpegInvoker;
pub use ssim::SimilarityScorer;

/// Captured outcome of one engine run
#[derive(Debug)]
pub struct EngineOutput {
    /// Whether the process exited with status zero
    pub success: bool,
    pub stdout: String,
    pub stderr: String,
    /// Set when the process was killed for exceeding its time budget
    pub timed_out: bool,
}

/// Execution port: lets the batch orchestrator run against a stub in tests
pub trait TransformExecutor {
    /// Apply `spec` to `input`, writing the result to `output`.
    ///
    /// On failure a partial file may be left at `output`; callers must not
    /// assume non-existence.
    fn transform(&mut self, spec: &PipelineSpec, input: &Path, output: &Path) -> RevidResult<()>;
}

/// Run a command to completion, capturing both output streams.
///
/// With a time budget, the child is polled and killed once the deadline
/// passes; the partial diagnostics gathered so far are still returned.
pub(crate) fn run_captured(
    mut command: Command,
    timeout: Option<Duration>,
) -> std::io::Result<EngineOutput> {
    command.stdout(Stdio::piped()).stderr(Stdio::piped());
    let mut child = command.spawn()?;

    let stdout_handle = child.stdout.take().map(spawn_reader);
    let stderr_handle = child.stderr.take().map(spawn_reader);

    let (status, timed_out) = match timeout {
        None => (Some(child.wait()?), false),
        Some(budget) => {
            let deadline = Instant::now() + budget;
            loop {
                if let Some(status) = child.try_wait()? {
                    break (Some(status), false);
                }
                if Instant::now() >= deadline {
                    let _ = child.kill();
                    let _ = child.wait();
                    break (None, true);
                }
                std::thread::sleep(Duration::from_millis(50));
            }
        }
    };

    let stdout = stdout_handle
        .and_then(|h| h.join().ok())
        .unwrap_or_default();
    let stderr = stderr_handle
        .and_then(|h| h.join().ok())
        .unwrap_or_default();

    Ok(EngineOutput {
        success: status.map(|s| s.success()).unwrap_or(false),
        stdout,
        stderr,
        timed_out,
    })
}

fn spawn_reader<R: Read + Send + 'static>(mut pipe: R) -> std::thread::JoinHandle<String> {
    std::thread::spawn(move || {
        let mut buf = Vec::new();
        let _ = pipe.read_to_end(&mut buf);
        String::from_utf8_lossy(&buf).into_owned()
    })
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn captures_output_of_a_real_process() {
        let mut command = Command::new("sh");
        command.args(["-c", "echo out; echo err >&2"]);
        let output = run_captured(command, None).unwrap();
        assert!(output.success);
        assert!(!output.timed_out);
        assert_eq!(output.stdout.trim(), "out");
        assert_eq!(output.stderr.trim(), "err");
    }

    #[test]
    fn reports_nonzero_exit() {
        let mut command = Command::new("sh");
        command.args(["-c", "echo boom >&2; exit 3"]);
        let output = run_captured(command, None).unwrap();
        assert!(!output.success);
        assert!(output.stderr.contains("boom"));
    }

    #[test]
    fn kills_processes_over_budget() {
        let mut command = Command::new("sh");
        command.args(["-c", "sleep 5"]);
        let start = Instant::now();
        let output = run_captured(command, Some(Duration::from_millis(200))).unwrap();
        assert!(output.timed_out);
        assert!(!output.success);
        assert!(start.elapsed() < Duration::from_secs(3));
    }

    #[test]
    fn missing_binary_surfaces_spawn_error() {
        let command = Command::new("definitely-not-a-real-binary-name");
        let err = run_captured(command, None).unwrap_err();
        assert_eq!(err.kind(), std::io::ErrorKind::NotFound);
    }
}
