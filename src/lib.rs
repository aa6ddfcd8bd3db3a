pub mod config;
pub mod error;
pub mod ingest;
pub mod logging;
pub mod model;
pub mod output;
pub mod scoring;
pub mod store;

pub use error::{EcoError, Result};
