//! Error types for the footswitch CLI

use thiserror::Error;

#[derive(Error, Debug)]
pub enum CliError {
    #[error("Device not found: {0}")]
    DeviceNotFound(String),

    #[error("Validation error: {0}")]
    ValidationError(String),

    #[error("Permission denied: {0}")]
    PermissionDenied(String),

    #[error("Invalid configuration: {0}")]
    InvalidConfiguration(String),
}

impl CliError {
    /// Process exit code for this error class.
    pub fn exit_code(&self) -> u8 {
        match self {
            Self::DeviceNotFound(_) => 2,
            Self::ValidationError(_) => 4,
            Self::PermissionDenied(_) => 6,
            Self::InvalidConfiguration(_) => 7,
        }
    }
}

/// Exit code for any error bubbling out of a command.
pub fn exit_code(error: &anyhow::Error) -> u8 {
    error
        .downcast_ref::<CliError>()
        .map_or(1, CliError::exit_code)
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_exit_codes() {
        assert_eq!(CliError::DeviceNotFound("x".into()).exit_code(), 2);
        assert_eq!(CliError::ValidationError("x".into()).exit_code(), 4);
        assert_eq!(CliError::PermissionDenied("x".into()).exit_code(), 6);
        assert_eq!(CliError::InvalidConfiguration("x".into()).exit_code(), 7);
    }

    #[test]
    fn test_exit_code_through_anyhow() {
        let err = anyhow::Error::from(CliError::ValidationError("bad".into()))
            .context("while building the pedal program");
        assert_eq!(exit_code(&err), 4);
        assert_eq!(exit_code(&anyhow::anyhow!("boom")), 1);
    }
}
