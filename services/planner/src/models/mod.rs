//! Planner service models

pub mod event;
pub mod user;

// Re-export for convenience
pub use event::{Event, EventDetails};
pub use user::{NewUser, StoredUser, User, UserSignIn, UserSignUp};
