//! Forward-chaining inference

pub mod forward_chain;

pub use forward_chain::InferenceEngine;
