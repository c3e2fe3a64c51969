//! Unified error type for the iconpanel-lib crate.
//!
//! [`PanelError`] wraps [`DeviceError`] plus the configuration and I/O failures
//! of the surrounding program. `From` impls let `?` cross module boundaries.

use std::fmt;

use crate::device::DeviceError;

/// Unified error type for iconpanel-lib operations.
#[derive(Debug)]
pub enum PanelError {
    /// Failure reported by the device module.
    Device(DeviceError),
    /// Standard I/O error (config persistence, event input).
    Io(std::io::Error),
    /// Configuration validation error.
    Config(String),
}

impl fmt::Display for PanelError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            PanelError::Device(e) => write!(f, "{e}"),
            PanelError::Io(e) => write!(f, "I/O error: {e}"),
            PanelError::Config(e) => write!(f, "Config error: {e}"),
        }
    }
}

impl std::error::Error for PanelError {
    fn source(&self) -> Option<&(dyn std::error::Error + 'static)> {
        match self {
            PanelError::Device(e) => Some(e),
            PanelError::Io(e) => Some(e),
            PanelError::Config(_) => None,
        }
    }
}

impl From<DeviceError> for PanelError {
    fn from(e: DeviceError) -> Self {
        PanelError::Device(e)
    }
}

impl From<std::io::Error> for PanelError {
    fn from(e: std::io::Error) -> Self {
        PanelError::Io(e)
    }
}

/// Crate-level Result alias using [`PanelError`].
pub type Result<T> = std::result::Result<T, PanelError>;
