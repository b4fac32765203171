use async_trait::async_trait;
use std::path::PathBuf;
use std::process::{ExitStatus, Stdio};
use std::time::Duration;
use tokio::io::AsyncRead;
use tokio::process::{Child, Command};

use crate::command::StageCommand;
use crate::error::RunnerError;

pub type ChildOutput = Box<dyn AsyncRead + Send + Unpin>;

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ExitState {
    Code(i32),
    Signaled(i32),
    Unknown,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum WaitStatus {
    Exited(ExitState),
    Elapsed,
}

#[async_trait]
pub trait ProcessLauncher: Send + Sync {
    async fn spawn(&self, command: &StageCommand) -> Result<Box<dyn RunningProcess>, RunnerError>;
}

#[async_trait]
pub trait RunningProcess: Send {
    /// Hands out the stdout pipe. Returns `None` on every call after the first.
    fn take_stdout(&mut self) -> Option<ChildOutput>;

    async fn wait(&mut self) -> Result<ExitState, RunnerError>;

    async fn wait_with_timeout(&mut self, limit: Duration) -> Result<WaitStatus, RunnerError> {
        match tokio::time::timeout(limit, self.wait()).await {
            Ok(state) => state.map(WaitStatus::Exited),
            Err(_) => Ok(WaitStatus::Elapsed),
        }
    }

    /// Kills the child without grace and reaps it.
    async fn terminate(&mut self) -> Result<(), RunnerError>;
}

#[derive(Debug, Clone, Default)]
pub struct SystemLauncher {
    working_dir: Option<PathBuf>,
}

impl SystemLauncher {
    pub fn new(working_dir: Option<PathBuf>) -> Self {
        Self { working_dir }
    }
}

#[async_trait]
impl ProcessLauncher for SystemLauncher {
    async fn spawn(&self, command: &StageCommand) -> Result<Box<dyn RunningProcess>, RunnerError> {
        let mut cmd = Command::new(command.program());
        cmd.args(command.args())
            .stdout(Stdio::piped())
            .stderr(Stdio::inherit())
            .kill_on_drop(true);

        if let Some(dir) = &self.working_dir {
            cmd.current_dir(dir);
        }

        let child = cmd.spawn().map_err(|source| RunnerError::Spawn {
            command: command.to_string(),
            source,
        })?;

        Ok(Box::new(SystemProcess {
            command: command.to_string(),
            child,
        }))
    }
}

struct SystemProcess {
    command: String,
    child: Child,
}

#[async_trait]
impl RunningProcess for SystemProcess {
    fn take_stdout(&mut self) -> Option<ChildOutput> {
        self.child
            .stdout
            .take()
            .map(|stdout| Box::new(stdout) as ChildOutput)
    }

    async fn wait(&mut self) -> Result<ExitState, RunnerError> {
        let status = self
            .child
            .wait()
            .await
            .map_err(|source| RunnerError::Wait {
                command: self.command.clone(),
                source,
            })?;

        Ok(exit_state(status))
    }

    async fn terminate(&mut self) -> Result<(), RunnerError> {
        self.child
            .kill()
            .await
            .map_err(|source| RunnerError::Terminate {
                command: self.command.clone(),
                source,
            })
    }
}

fn exit_state(status: ExitStatus) -> ExitState {
    if let Some(code) = status.code() {
        return ExitState::Code(code);
    }

    #[cfg(unix)]
    {
        use std::os::unix::process::ExitStatusExt;

        if let Some(signal) = status.signal() {
            return ExitState::Signaled(signal);
        }
    }

    ExitState::Unknown
}

#[cfg(unix)]
pub fn signal_name(signal: i32) -> String {
    nix::sys::signal::Signal::try_from(signal)
        .map(|sig| sig.as_str().to_string())
        .unwrap_or_else(|_| format!("signal {}", signal))
}

#[cfg(not(unix))]
pub fn signal_name(signal: i32) -> String {
    format!("signal {}", signal)
}


#[cfg(test)]
mod tests {
    use super::*;

    #[cfg(unix)]
    #[test]
    fn test_signal_name() {
        assert_eq!(signal_name(9), "SIGKILL");
        assert_eq!(signal_name(15), "SIGTERM");
        assert_eq!(signal_name(999), "signal 999");
    }

    #[cfg(unix)]
    #[tokio::test]
    async fn test_system_launcher_reports_exit_code() {
        let launcher = SystemLauncher::default();
        let command = StageCommand::new("sh", vec!["-c".to_string(), "exit 7".to_string()]);

        let mut process = launcher.spawn(&command).await.unwrap();
        assert_eq!(process.wait().await.unwrap(), ExitState::Code(7));
    }

    #[cfg(unix)]
    #[tokio::test]
    async fn test_system_launcher_wait_with_timeout_then_terminate() {
        let launcher = SystemLauncher::default();
        let command = StageCommand::new("sleep", vec!["5".to_string()]);

        let mut process = launcher.spawn(&command).await.unwrap();
        let status = process
            .wait_with_timeout(Duration::from_millis(100))
            .await
            .unwrap();
        assert_eq!(status, WaitStatus::Elapsed);

        process.terminate().await.unwrap();
    }

    #[tokio::test]
    async fn test_system_launcher_spawn_failure() {
        let launcher = SystemLauncher::default();
        let command = StageCommand::new("definitely-not-a-real-build-tool", vec![]);

        let result = launcher.spawn(&command).await;
        assert!(matches!(result, Err(RunnerError::Spawn { .. })));
    }
}
