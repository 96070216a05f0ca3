//! API layer - HTTP endpoints and middleware

pub mod blogs;
pub mod health;
pub mod login;
pub mod middleware;
pub mod router;
pub mod state;
pub mod types;
pub mod users;

pub use middleware::OptionalUser;
pub use router::create_router;
pub use state::AppState;
