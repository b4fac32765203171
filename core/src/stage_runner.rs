use std::sync::Arc;
use tokio::time::Instant;

use crate::{
    budget::TimeoutBudget,
    builder::BuildStep,
    error::RunnerError,
    executor::{StageExecutor, StageOutcome},
    logger::{LogLevel, Logger},
    stage::Stage,
};

#[derive(Debug, Clone)]
pub struct StageReport {
    pub stage: Stage,
    pub outcome: StageOutcome,
    pub duration: f64,
}

#[derive(Debug, Clone)]
pub struct PipelineReport {
    pub results: Vec<StageReport>,
    pub budget: Option<TimeoutBudget>,
}

impl PipelineReport {
    pub fn success(&self) -> bool {
        self.results.iter().all(|r| r.outcome.is_success())
    }

    pub fn failed_stage(&self) -> Option<&StageReport> {
        self.results.iter().find(|r| !r.outcome.is_success())
    }

    /// Stages that were attempted, in order.
    pub fn stages(&self) -> Vec<Stage> {
        self.results.iter().map(|r| r.stage).collect()
    }

    pub fn total_duration(&self) -> f64 {
        self.results.iter().map(|r| r.duration).sum()
    }

    pub fn exit_code(&self) -> i32 {
        self.failed_stage()
            .map(|r| r.outcome.exit_code())
            .unwrap_or(0)
    }
}

/// Runs build steps one after another, threading one timeout budget through
/// all of them and stopping at the first stage that does not succeed.
pub struct StageRunner {
    executor: StageExecutor,
    logger: Arc<Logger>,
}

impl StageRunner {
    pub fn new(executor: StageExecutor, logger: Arc<Logger>) -> Self {
        Self { executor, logger }
    }

    pub async fn run(
        &self,
        steps: Vec<BuildStep>,
        mut budget: Option<TimeoutBudget>,
    ) -> Result<PipelineReport, RunnerError> {
        let mut results = Vec::with_capacity(steps.len());

        for step in steps {
            self.logger.log(
                LogLevel::Info,
                &format!("{}: {}", step.description, step.command),
            );
            self.logger
                .log(LogLevel::Debug, &step.stage.metadata().description);
            if let Some(budget) = &budget {
                self.logger
                    .log(LogLevel::Debug, &format!("Time left: {}", budget));
            }

            let start = Instant::now();
            let outcome = self
                .executor
                .run_stage(&step.command, budget.as_mut())
                .await?;

            let duration = start.elapsed().as_secs_f64();
            self.logger.log(
                LogLevel::Debug,
                &format!("{} finished in {:.1}s", step.stage, duration),
            );
            results.push(StageReport {
                stage: step.stage,
                outcome,
                duration,
            });

            match outcome {
                StageOutcome::Success => {}
                StageOutcome::NonZeroExit(code) => {
                    self.logger.log(
                        LogLevel::Error,
                        &format!("{} failed with exit code {}", step.stage, code),
                    );
                    break;
                }
                StageOutcome::TimedOut => {
                    self.logger
                        .log(LogLevel::Error, &format!("{} timed out", step.stage));
                    break;
                }
            }
        }

        Ok(PipelineReport { results, budget })
    }
}
