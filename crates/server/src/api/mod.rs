pub mod addon;
pub mod handlers;
pub mod middleware;
pub mod play;
pub mod routes;

pub use routes::create_router;
