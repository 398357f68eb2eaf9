pub mod app;
pub mod config;
pub mod error;
pub mod extract;
pub mod handlers;
pub mod models;
pub mod repository;
pub mod schema;
pub mod seed;
pub mod state;

pub use app::build_router;
