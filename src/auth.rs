//! Auth-domain models: redacted access tokens, their advisory claims, and user roles.

pub mod role;
pub mod token;

pub use role::*;
pub use token::*;
