use std::ffi::OsStr;
use std::future::Future;
use std::process::Stdio;
use std::sync::Arc;

use futures::future::BoxFuture;
use futures::FutureExt;
use thiserror::Error;
use tokio::io::{AsyncBufReadExt, AsyncRead, BufReader};
use tokio::process::Command;
use tokio::task::JoinHandle;

use super::CommandInvocation;

#[cfg(target_os = "windows")]
const CREATE_NO_WINDOW: u32 = 0x0800_0000;

/// Receives one line of child output, from whatever task reads the pipe.
pub type LineCallback = Arc<dyn Fn(String) + Send + Sync>;

#[derive(Clone)]
pub struct LineHandlers {
    pub on_output: LineCallback,
    pub on_error: LineCallback,
}

#[derive(Error, Debug)]
pub enum RunnerError {
    #[error("failed to start {program}: {source}")]
    Spawn {
        program: String,
        #[source]
        source: std::io::Error,
    },

    #[error("{0} of the child process was not captured")]
    MissingPipe(&'static str),

    #[error("failed waiting for the child process: {0}")]
    Wait(#[from] std::io::Error),
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct ProcessExit {
    /// `None` when the process was ended by a signal.
    pub code: Option<i32>,
}

impl ProcessExit {
    pub fn success(&self) -> bool {
        self.code == Some(0)
    }
}

/// A started process. Awaiting `wait` is the only suspension point; dropping
/// the handle kills the child.
pub struct ProcessHandle {
    exit: BoxFuture<'static, Result<ProcessExit, RunnerError>>,
}

impl ProcessHandle {
    pub fn new<F>(exit: F) -> Self
    where
        F: Future<Output = Result<ProcessExit, RunnerError>> + Send + 'static,
    {
        Self { exit: exit.boxed() }
    }

    /// Resolves once the process has exited and both pipes are drained.
    pub async fn wait(self) -> Result<ProcessExit, RunnerError> {
        self.exit.await
    }
}

pub trait ProcessRunner: Send + Sync {
    /// Starts the process and begins reading both pipes without blocking.
    fn spawn(
        &self,
        invocation: &CommandInvocation,
        handlers: LineHandlers,
    ) -> Result<ProcessHandle, RunnerError>;
}

/// Runs invocations as real child processes on the tokio runtime.
#[derive(Debug, Clone, Default)]
pub struct TokioProcessRunner;

impl ProcessRunner for TokioProcessRunner {
    fn spawn(
        &self,
        invocation: &CommandInvocation,
        handlers: LineHandlers,
    ) -> Result<ProcessHandle, RunnerError> {
        let mut command = background_command(&invocation.program);
        command.args(&invocation.args).current_dir(&invocation.working_dir);

        let mut child = command.spawn().map_err(|source| RunnerError::Spawn {
            program: invocation.program.display().to_string(),
            source,
        })?;
        log::debug!("Spawned {} (pid {:?})", invocation.program.display(), child.id());

        let stdout = child.stdout.take().ok_or(RunnerError::MissingPipe("stdout"))?;
        let stderr = child.stderr.take().ok_or(RunnerError::MissingPipe("stderr"))?;

        let stdout_reader = tokio::spawn(forward_lines(stdout, handlers.on_output));
        let stderr_reader = tokio::spawn(forward_lines(stderr, handlers.on_error));

        Ok(ProcessHandle::new(async move {
            let status = child.wait().await?;
            // pipes hit EOF once the child is gone
            join_reader("stdout", stdout_reader).await;
            join_reader("stderr", stderr_reader).await;
            Ok::<_, RunnerError>(ProcessExit {
                code: status.code(),
            })
        }))
    }
}

/// A command with no stdin, both pipes captured, no console window, and
/// killed when dropped.
pub(crate) fn background_command(program: impl AsRef<OsStr>) -> Command {
    let mut command = Command::new(program);
    command
        .stdin(Stdio::null())
        .stdout(Stdio::piped())
        .stderr(Stdio::piped())
        .kill_on_drop(true);
    #[cfg(target_os = "windows")]
    {
        command.creation_flags(CREATE_NO_WINDOW);
    }
    command
}

async fn join_reader(pipe: &str, reader: JoinHandle<()>) {
    if let Err(e) = reader.await {
        log::warn!("Reader for {pipe} ended abnormally, remaining lines were dropped: {e}");
    }
}

async fn forward_lines<R>(pipe: R, callback: LineCallback)
where
    R: AsyncRead + Unpin,
{
    let mut segments = BufReader::new(pipe).split(b'\n');
    loop {
        match segments.next_segment().await {
            Ok(Some(bytes)) => {
                let line = String::from_utf8_lossy(&bytes);
                callback(line.trim_end_matches('\r').to_string());
            }
            Ok(None) => break,
            Err(e) => {
                log::warn!("Stopped reading child output: {e}");
                break;
            }
        }
    }
}
