use std::path::{Path, PathBuf};

use crate::Cli;

/// Process-wide command template values: which tool to run and where it
/// builds and installs.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct PipelineConfig {
    pub tool: String,
    pub source_dir: Option<PathBuf>,
    pub build_dir: PathBuf,
    pub install_dir: PathBuf,
}

impl Default for PipelineConfig {
    fn default() -> Self {
        Self {
            tool: default_tool(),
            source_dir: None,
            build_dir: default_build_dir(),
            install_dir: default_install_dir(),
        }
    }
}

pub fn default_tool() -> String {
    "cmake".to_string()
}

pub fn default_build_dir() -> PathBuf {
    PathBuf::from("_builds")
}

pub fn default_install_dir() -> PathBuf {
    PathBuf::from("_install")
}

impl PipelineConfig {
    pub fn from_cli(cli: &Cli) -> Self {
        Self {
            tool: cli.tool.clone(),
            source_dir: cli.source_dir.as_deref().map(Self::expand_path),
            build_dir: Self::expand_path(&cli.build_dir),
            install_dir: Self::expand_path(&cli.install_dir),
        }
    }

    pub fn expand_path(path: &Path) -> PathBuf {
        let raw = path.to_string_lossy();
        let expanded = shellexpand::tilde(raw.as_ref());
        PathBuf::from(expanded.as_ref())
    }
}
