//! Middleware modules.

mod cors;
pub mod error;
mod mount;

pub use cors::{ALLOWED_METHODS, cors_headers};
pub use mount::MountRoot;
