// src/lib.rs

pub mod config;
pub mod core;
pub mod corpus;
pub mod error;
pub mod learning;
pub mod persistence;
pub mod resources;
pub mod sampling;

pub use crate::core::engine::{PipelineState, SentimentPipeline};
pub use crate::core::types::{Label, Prediction, RawReview};
pub use crate::error::{Result, SentimentError, TrainingError};
