//! CLI command modules

pub mod serve;
pub mod validate;

pub use serve::{execute_serve_command, listen_address, ServeArgs};
pub use validate::{execute_validate_command, ValidateArgs};
