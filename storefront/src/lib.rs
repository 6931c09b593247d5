pub mod config;
pub mod handlers;
pub mod models;
pub mod services;
pub mod startup;
pub mod views;

pub use startup::{build_router, AppState, Application};
