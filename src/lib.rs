pub mod api_docs;
pub mod app;
pub mod config;
pub mod error;
pub mod handler;
pub mod models;
pub mod notify;
pub mod store;
pub mod util;
