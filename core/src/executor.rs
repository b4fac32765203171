use std::sync::Arc;
use std::time::Duration;
use tokio::task::JoinHandle;
use tokio::time::Instant;

use crate::{
    budget::TimeoutBudget,
    command::StageCommand,
    error::RunnerError,
    logger::{LogLevel, Logger},
    output::{forward_lines, OutputMode, OutputSink},
    process::{signal_name, ExitState, ProcessLauncher, RunningProcess, WaitStatus},
};

/// Exit status reported when the shared budget runs out.
pub const TIMEOUT_EXIT_CODE: i32 = 1;

pub const TIMEOUT_MESSAGE: &str = "Timeout!";

// How long a killed child's remaining output may keep draining. Bounded
// because grandchildren can hold the pipe open after the child is gone.
const OUTPUT_DRAIN_GRACE: Duration = Duration::from_millis(500);

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum StageOutcome {
    Success,
    NonZeroExit(i32),
    TimedOut,
}

impl StageOutcome {
    pub fn is_success(&self) -> bool {
        matches!(self, StageOutcome::Success)
    }

    pub fn exit_code(&self) -> i32 {
        match self {
            StageOutcome::Success => 0,
            StageOutcome::NonZeroExit(code) => *code,
            StageOutcome::TimedOut => TIMEOUT_EXIT_CODE,
        }
    }
}

type Forwarder = JoinHandle<Result<usize, RunnerError>>;

pub struct StageExecutor {
    launcher: Arc<dyn ProcessLauncher>,
    sink: Arc<dyn OutputSink>,
    logger: Arc<Logger>,
    output_mode: OutputMode,
}

impl StageExecutor {
    pub fn new(
        launcher: Arc<dyn ProcessLauncher>,
        sink: Arc<dyn OutputSink>,
        logger: Arc<Logger>,
    ) -> Self {
        Self {
            launcher,
            sink,
            logger,
            output_mode: OutputMode::default(),
        }
    }

    pub fn with_output_mode(mut self, output_mode: OutputMode) -> Self {
        self.output_mode = output_mode;
        self
    }

    /// Runs one command to completion, echoing its stdout.
    ///
    /// Without a budget this waits for as long as the child runs. With one,
    /// the child is killed once the budget elapses, and a stage whose stdout
    /// stays open past the budget also times out; otherwise the budget is
    /// charged the stage's wall-clock time. An exhausted budget skips the
    /// spawn entirely and reports a timeout.
    pub async fn run_stage(
        &self,
        command: &StageCommand,
        budget: Option<&mut TimeoutBudget>,
    ) -> Result<StageOutcome, RunnerError> {
        if budget.as_deref().is_some_and(TimeoutBudget::is_exhausted) {
            self.logger.log(
                LogLevel::Warning,
                &format!("No time left, skipping: {}", command),
            );
            self.report_timeout()?;
            return Ok(StageOutcome::TimedOut);
        }

        let mut process = self.launcher.spawn(command).await?;
        self.logger
            .log(LogLevel::Debug, &format!("Spawned: {}", command));

        let forwarder = self.start_forwarding(process.as_mut(), command)?;

        match budget {
            None => {
                let state = process.wait().await?;
                join_forwarder(forwarder).await?;
                Ok(self.outcome(state))
            }
            Some(budget) => {
                let started = Instant::now();

                match process.wait_with_timeout(budget.remaining()).await? {
                    WaitStatus::Exited(state) => {
                        // Background grandchildren may keep stdout open; the
                        // stage is not done until the pipe closes.
                        let left = budget.remaining().saturating_sub(started.elapsed());
                        if !join_forwarder_within(forwarder, left).await? {
                            self.logger.log(
                                LogLevel::Warning,
                                &format!("Budget elapsed waiting for output of: {}", command),
                            );
                            budget.exhaust();
                            self.report_timeout()?;
                            return Ok(StageOutcome::TimedOut);
                        }

                        let charged = budget.consume(started.elapsed());
                        self.logger.log(
                            LogLevel::Debug,
                            &format!("Charged {}s, {} left", charged, budget),
                        );
                        Ok(self.outcome(state))
                    }
                    WaitStatus::Elapsed => {
                        self.logger.log(
                            LogLevel::Warning,
                            &format!("Budget elapsed, killing: {}", command),
                        );
                        process.terminate().await?;
                        drain_forwarder(forwarder).await?;
                        budget.exhaust();
                        self.report_timeout()?;
                        Ok(StageOutcome::TimedOut)
                    }
                }
            }
        }
    }

    fn start_forwarding(
        &self,
        process: &mut dyn RunningProcess,
        command: &StageCommand,
    ) -> Result<Forwarder, RunnerError> {
        let stdout = process
            .take_stdout()
            .ok_or_else(|| RunnerError::MissingStdout(command.to_string()))?;

        Ok(tokio::spawn(forward_lines(
            stdout,
            Arc::clone(&self.sink),
            self.output_mode,
        )))
    }

    fn report_timeout(&self) -> Result<(), RunnerError> {
        self.sink
            .line(TIMEOUT_MESSAGE)
            .map_err(RunnerError::Output)
    }

    fn outcome(&self, state: ExitState) -> StageOutcome {
        match state {
            ExitState::Code(0) => StageOutcome::Success,
            ExitState::Code(code) => StageOutcome::NonZeroExit(code),
            ExitState::Signaled(signal) => {
                self.logger.log(
                    LogLevel::Warning,
                    &format!("Process terminated by {}", signal_name(signal)),
                );
                StageOutcome::NonZeroExit(128 + signal)
            }
            ExitState::Unknown => {
                self.logger
                    .log(LogLevel::Warning, "Process terminated abnormally (no exit code)");
                StageOutcome::NonZeroExit(1)
            }
        }
    }
}

async fn join_forwarder(forwarder: Forwarder) -> Result<usize, RunnerError> {
    forwarder.await?
}

/// Joins the forwarder if stdout closes within `limit`, otherwise aborts it.
/// Returns whether the output reached EOF in time.
async fn join_forwarder_within(
    mut forwarder: Forwarder,
    limit: Duration,
) -> Result<bool, RunnerError> {
    match tokio::time::timeout(limit, &mut forwarder).await {
        Ok(joined) => {
            joined??;
            Ok(true)
        }
        Err(_) => {
            forwarder.abort();
            match forwarder.await {
                Ok(result) => result.map(|_| false),
                Err(err) if err.is_cancelled() => Ok(false),
                Err(err) => Err(err.into()),
            }
        }
    }
}

async fn drain_forwarder(forwarder: Forwarder) -> Result<(), RunnerError> {
    join_forwarder_within(forwarder, OUTPUT_DRAIN_GRACE)
        .await
        .map(|_| ())
}
