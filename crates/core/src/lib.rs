// Registrar Core - Entities, Validation, Ports & Domain Services
// NO infrastructure dependencies (storage and terminal live in adapter crates)

pub mod application;
pub mod domain;
pub mod error;
pub mod port;

pub use error::{AppError, Result};

pub const VERSION: &str = env!("CARGO_PKG_VERSION");
