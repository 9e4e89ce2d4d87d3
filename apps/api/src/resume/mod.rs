// Resume editing: id generation, pure mutations, and the HTTP handlers that
// apply them to the active session's document.

pub mod handlers;
pub mod ids;
pub mod mutations;

pub use ids::IdSource;
