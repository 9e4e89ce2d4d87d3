// Mock authentication and per-user session context.

pub mod credentials;
pub mod handlers;
pub mod session;

pub use credentials::{AuthError, CredentialStore, LocalCredentialStore};
pub use session::{ActiveSession, SessionRegistry};
