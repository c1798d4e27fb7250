pub mod app;
pub mod handlers;

pub use app::{create_app, serve, AppState};
