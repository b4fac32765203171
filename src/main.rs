use anyhow::{Context, Result};
use builder_core::{
    BuildStep, Builder, Cli, LogLevel, Logger, PipelineConfig, StageExecutor, StageRunner,
    StdoutSink, SystemLauncher, TimeoutBudget,
};
use clap::Parser;
use std::process::ExitCode;
use std::sync::Arc;

fn print_plan(steps: &[BuildStep]) {
    for step in steps {
        print!("{}", step);
    }
}

fn exit_status(code: i32) -> ExitCode {
    match u8::try_from(code) {
        Ok(code) => ExitCode::from(code),
        Err(_) => ExitCode::FAILURE,
    }
}

#[tokio::main]
async fn main() -> Result<ExitCode> {
    let cli = Cli::parse();
    let logger = Arc::new(Logger::with_level(cli.log_level()));

    let builder = Builder::new(PipelineConfig::from_cli(&cli));
    let steps = builder.generate_steps(&cli.build_options());

    if cli.dry_run {
        print_plan(&steps);
        return Ok(ExitCode::SUCCESS);
    }

    let launcher = SystemLauncher::new(builder.config().source_dir.clone());
    let executor = StageExecutor::new(Arc::new(launcher), Arc::new(StdoutSink), logger.clone())
        .with_output_mode(cli.output_mode());
    let runner = StageRunner::new(executor, logger.clone());

    let report = runner
        .run(steps, cli.timeout.map(TimeoutBudget::from_secs))
        .await
        .context("Build pipeline aborted")?;

    if report.success() {
        logger.log(
            LogLevel::Info,
            &format!(
                "Build completed ({} stages in {:.1}s)",
                report.results.len(),
                report.total_duration()
            ),
        );
    }

    Ok(exit_status(report.exit_code()))
}
