//! Recursive deletion engine.

pub mod engine;

pub use engine::DeletionEngine;
