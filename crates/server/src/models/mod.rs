//! Domain models owned by the server.

pub mod user;

pub use user::{User, UserView};
