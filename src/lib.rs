// cachewise - offline-tolerant HTTP client with disk-backed response caching

pub mod cache;
pub mod client;
pub mod config;
pub mod error;
pub mod policy;
pub mod utils;

pub use client::{ExchangeTransform, HttpClient, HttpResponse, ResponseSource};
pub use config::Settings;
pub use error::{Error, Result};
