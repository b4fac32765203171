use std::fmt;

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum Stage {
    Configure,
    Build,
    Install,
    Package,
}

#[derive(Debug, Clone)]
pub struct StageMetadata {
    pub description: String,
}

impl Stage {
    pub fn metadata(&self) -> StageMetadata {
        match self {
            Stage::Configure => StageMetadata {
                description: "CMake configuration".to_string(),
            },
            Stage::Build => StageMetadata {
                description: "Building project".to_string(),
            },
            Stage::Install => StageMetadata {
                description: "Installing artifacts".to_string(),
            },
            Stage::Package => StageMetadata {
                description: "Packaging artifacts".to_string(),
            },
        }
    }

    /// Verb shown while the stage is running.
    pub fn progress_label(&self) -> &'static str {
        match self {
            Stage::Configure => "Configuring",
            Stage::Build => "Building",
            Stage::Install => "Installing",
            Stage::Package => "Packaging",
        }
    }
}

impl fmt::Display for Stage {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let name = match self {
            Stage::Configure => "Configure",
            Stage::Build => "Build",
            Stage::Install => "Install",
            Stage::Package => "Package",
        };
        write!(f, "{}", name)
    }
}
