pub mod api;
pub mod badge;
pub mod config;
pub mod error;
pub mod logger;
pub mod service;
pub mod store;
