//! Hybrid retrieval over the lexical and vector indexes.
//!
//! `fusion` holds the score normalization and weighted merge; `engine` owns
//! the chunk store, builds versioned index snapshots and routes queries.
pub mod engine;
pub mod fusion;

pub use engine::{HybridSearchEngine, IndexSnapshot};
pub use fusion::{fuse, min_max_normalize};
