//! Session: who is signed in and with which token.

pub mod model;
pub mod store;

pub use model::{AuthResponse, SessionState, User, UserRole};
pub use store::{MemorySessionStorage, SessionStorage, SessionStore};
