pub mod chunker;
pub mod config;
pub mod error;
pub mod store;
pub mod traits;
pub mod types;

pub use error::{Error, Result};
