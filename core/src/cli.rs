use clap::Parser;
use std::path::PathBuf;

use crate::builder::BuildOptions;
use crate::logger::LogLevel;
use crate::output::OutputMode;

#[derive(Parser, Debug)]
#[command(name = "builder")]
#[command(author, version, about = "Configure, build, install and package a CMake project", long_about = None)]
pub struct Cli {
    #[arg(
        long,
        value_name = "CONFIG",
        default_value = "Debug",
        help = "Set build configuration"
    )]
    pub config: String,

    #[arg(long, help = "Add installation stage (into the install directory)")]
    pub install: bool,

    #[arg(long, help = "Add packaging stage (CPack archive)")]
    pub pack: bool,

    #[arg(
        long,
        value_name = "SECONDS",
        help = "Set waiting time for the whole pipeline (in seconds)"
    )]
    pub timeout: Option<u64>,

    #[arg(
        short = 'C',
        long = "directory",
        value_name = "DIR",
        help = "Source directory"
    )]
    pub source_dir: Option<PathBuf>,

    #[arg(
        long,
        value_name = "PROGRAM",
        env = "BUILDER_TOOL",
        default_value = "cmake",
        help = "Build tool executable"
    )]
    pub tool: String,

    #[arg(
        long,
        value_name = "DIR",
        default_value = "_builds",
        help = "Build directory"
    )]
    pub build_dir: PathBuf,

    #[arg(
        long,
        value_name = "DIR",
        default_value = "_install",
        help = "Installation prefix"
    )]
    pub install_dir: PathBuf,

    #[arg(
        long,
        help = "Stop echoing tool output at the first blank line (legacy behavior)"
    )]
    pub stop_at_blank_line: bool,

    #[arg(long, help = "Print the planned commands without running them")]
    pub dry_run: bool,

    #[arg(short, long, help = "Show stage progress on stderr")]
    pub verbose: bool,
}

impl Cli {
    pub fn build_options(&self) -> BuildOptions {
        BuildOptions {
            build_type: self.config.clone(),
            install: self.install,
            pack: self.pack,
        }
    }

    pub fn output_mode(&self) -> OutputMode {
        if self.stop_at_blank_line {
            OutputMode::StopAtBlankLine
        } else {
            OutputMode::Full
        }
    }

    pub fn log_level(&self) -> LogLevel {
        if self.verbose {
            LogLevel::Debug
        } else {
            LogLevel::Warning
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_defaults() {
        let cli = Cli::try_parse_from(["builder"]).unwrap();
        let options = cli.build_options();

        assert_eq!(options.build_type, "Debug");
        assert!(!options.install);
        assert!(!options.pack);
        assert!(cli.timeout.is_none());
        assert_eq!(cli.output_mode(), OutputMode::Full);
        assert_eq!(cli.log_level(), LogLevel::Warning);
    }

    #[test]
    fn test_all_flags() {
        let cli = Cli::try_parse_from([
            "builder",
            "--config",
            "Release",
            "--install",
            "--pack",
            "--timeout",
            "30",
            "--stop-at-blank-line",
            "-v",
        ])
        .unwrap();
        let options = cli.build_options();

        assert_eq!(options.build_type, "Release");
        assert!(options.install);
        assert!(options.pack);
        assert_eq!(cli.timeout, Some(30));
        assert_eq!(cli.output_mode(), OutputMode::StopAtBlankLine);
        assert_eq!(cli.log_level(), LogLevel::Debug);
    }

    #[test]
    fn test_timeout_must_be_non_negative_integer() {
        assert!(Cli::try_parse_from(["builder", "--timeout", "-1"]).is_err());
        assert!(Cli::try_parse_from(["builder", "--timeout", "1.5"]).is_err());
        assert!(Cli::try_parse_from(["builder", "--timeout", "soon"]).is_err());
        assert!(Cli::try_parse_from(["builder", "--timeout", "0"]).is_ok());
    }

    #[test]
    fn test_unknown_flag_rejected() {
        assert!(Cli::try_parse_from(["builder", "--parallel"]).is_err());
    }
}
