// Noteask Core - Domain Logic & Ports
// NO process or filesystem adapters here (hexagonal layout)

pub mod application;
pub mod domain;
pub mod error;
pub mod port;

pub use error::{AppError, Result};
