use thiserror::Error;

use super::config::ConfigError;
use crate::core::kabsch::KabschError;

#[derive(Debug, Error)]
pub enum EngineError {
    #[error("The {role} structure contains no residues")]
    EmptyStructure { role: &'static str },

    #[error("Invalid configuration: {0}")]
    Config(#[from] ConfigError),

    #[error("Rigid-body refit failed: {0}")]
    Kabsch(#[from] KabschError),

    #[error("Internal logic error: {0}")]
    Internal(String),
}
