use crate::{
    command::{CMakeCommands, StageCommand},
    config::PipelineConfig,
    stage::Stage,
};

#[derive(Debug, Clone)]
pub struct BuildOptions {
    pub build_type: String,
    pub install: bool,
    pub pack: bool,
}

impl Default for BuildOptions {
    fn default() -> Self {
        Self {
            build_type: "Debug".to_string(),
            install: false,
            pack: false,
        }
    }
}

#[derive(Debug, Clone)]
pub struct Builder {
    config: PipelineConfig,
    cmake: CMakeCommands,
}

#[derive(Debug, Clone)]
pub struct BuildStep {
    pub stage: Stage,
    pub description: String,
    pub command: StageCommand,
}

impl BuildStep {
    pub fn new(stage: Stage, command: StageCommand) -> Self {
        Self {
            stage,
            description: stage.progress_label().to_string(),
            command,
        }
    }
}

impl std::fmt::Display for BuildStep {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        writeln!(f, "{}", self.description)?;
        writeln!(f, "  {}", self.command)
    }
}

impl Builder {
    pub fn new(config: PipelineConfig) -> Self {
        let cmake = CMakeCommands::new(
            config.tool.clone(),
            config.build_dir.clone(),
            config.install_dir.clone(),
        );
        Self { config, cmake }
    }

    pub fn config(&self) -> &PipelineConfig {
        &self.config
    }

    /// Configure and build always run; install and package follow in that
    /// order when requested.
    pub fn generate_steps(&self, options: &BuildOptions) -> Vec<BuildStep> {
        let mut steps = vec![
            self.cmake.configure_step(&options.build_type),
            self.cmake.build_step(),
        ];

        if options.install {
            steps.push(self.cmake.install_step());
        }

        if options.pack {
            steps.push(self.cmake.package_step());
        }

        steps
    }
}
