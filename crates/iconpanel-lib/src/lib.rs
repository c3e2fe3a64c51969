//! iconpanel — event-driven icon routines for a four-icon device panel.

pub mod bootstrap;
pub mod config;
pub mod device;
pub mod dispatch;
pub mod error;
pub mod pacing;
pub mod routine;

pub use error::PanelError;
