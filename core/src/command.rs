use std::fmt;
use std::path::PathBuf;

use crate::builder::BuildStep;
use crate::stage::Stage;

/// A fully-formed external command: program plus arguments.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct StageCommand {
    program: String,
    args: Vec<String>,
}

impl StageCommand {
    pub fn new(program: impl Into<String>, args: Vec<String>) -> Self {
        Self {
            program: program.into(),
            args,
        }
    }

    pub fn program(&self) -> &str {
        &self.program
    }

    pub fn args(&self) -> &[String] {
        &self.args
    }
}

impl fmt::Display for StageCommand {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.program)?;
        for arg in &self.args {
            write!(f, " {}", arg)?;
        }
        Ok(())
    }
}

#[derive(Debug, Clone)]
pub struct CMakeCommands {
    tool: String,
    build_dir: PathBuf,
    install_dir: PathBuf,
}

impl CMakeCommands {
    pub fn new(tool: String, build_dir: PathBuf, install_dir: PathBuf) -> Self {
        Self {
            tool,
            build_dir,
            install_dir,
        }
    }

    pub fn configure_step(&self, build_type: &str) -> BuildStep {
        BuildStep::new(Stage::Configure, self.configure(build_type))
    }

    pub fn build_step(&self) -> BuildStep {
        BuildStep::new(Stage::Build, self.build())
    }

    pub fn install_step(&self) -> BuildStep {
        BuildStep::new(Stage::Install, self.build_target("install"))
    }

    pub fn package_step(&self) -> BuildStep {
        BuildStep::new(Stage::Package, self.build_target("package"))
    }

    fn configure(&self, build_type: &str) -> StageCommand {
        StageCommand::new(
            self.tool.clone(),
            vec![
                "-H.".to_string(),
                format!("-B{}", self.build_dir.display()),
                format!("-DCMAKE_INSTALL_PREFIX={}", self.install_dir.display()),
                format!("-DCMAKE_BUILD_TYPE={}", build_type),
            ],
        )
    }

    fn build(&self) -> StageCommand {
        StageCommand::new(
            self.tool.clone(),
            vec!["--build".to_string(), self.build_dir.display().to_string()],
        )
    }

    fn build_target(&self, target: &str) -> StageCommand {
        let mut command = self.build();
        command.args.push("--target".to_string());
        command.args.push(target.to_string());
        command
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn default_commands() -> CMakeCommands {
        CMakeCommands::new(
            "cmake".to_string(),
            PathBuf::from("_builds"),
            PathBuf::from("_install"),
        )
    }

    #[test]
    fn test_configure_command() {
        let step = default_commands().configure_step("Debug");
        assert_eq!(step.stage, Stage::Configure);
        assert_eq!(
            step.command.to_string(),
            "cmake -H. -B_builds -DCMAKE_INSTALL_PREFIX=_install -DCMAKE_BUILD_TYPE=Debug"
        );
    }

    #[test]
    fn test_build_install_package_commands() {
        let cmake = default_commands();
        assert_eq!(cmake.build_step().command.to_string(), "cmake --build _builds");
        assert_eq!(
            cmake.install_step().command.to_string(),
            "cmake --build _builds --target install"
        );
        assert_eq!(
            cmake.package_step().command.to_string(),
            "cmake --build _builds --target package"
        );
    }

    #[test]
    fn test_substituted_tool_and_dirs() {
        let cmake = CMakeCommands::new(
            "/opt/cmake/bin/cmake".to_string(),
            PathBuf::from("out/build"),
            PathBuf::from("out/prefix"),
        );
        let command = cmake.configure_step("Release").command;

        assert_eq!(command.program(), "/opt/cmake/bin/cmake");
        assert_eq!(
            command.args(),
            &[
                "-H.".to_string(),
                "-Bout/build".to_string(),
                "-DCMAKE_INSTALL_PREFIX=out/prefix".to_string(),
                "-DCMAKE_BUILD_TYPE=Release".to_string(),
            ]
        );
    }
}
