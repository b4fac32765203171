pub mod budget;
pub mod builder;
pub mod cli;
pub mod command;
pub mod config;
pub mod error;
pub mod executor;
pub mod logger;
pub mod output;
pub mod process;
pub mod stage;
pub mod stage_runner;

pub use budget::TimeoutBudget;
pub use builder::{BuildOptions, BuildStep, Builder};
pub use cli::Cli;
pub use command::{CMakeCommands, StageCommand};
pub use config::PipelineConfig;
pub use error::RunnerError;
pub use executor::{StageExecutor, StageOutcome, TIMEOUT_EXIT_CODE, TIMEOUT_MESSAGE};
pub use logger::{LogLevel, Logger};
pub use output::{forward_lines, OutputMode, OutputSink, StdoutSink};
pub use process::{ExitState, ProcessLauncher, RunningProcess, SystemLauncher, WaitStatus};
pub use stage::{Stage, StageMetadata};
pub use stage_runner::{PipelineReport, StageReport, StageRunner};
