// File: src/core/traits.rs
//! Capability traits shared by the pipeline stages.

use crate::error::Result;

/// A stage that learns state from training input and reports what it learned.
pub trait Fittable<I: ?Sized, M> {
    fn fit(&mut self, input: &I) -> Result<M>;
}

/// A stage that maps input to features without changing its own state.
pub trait Transformer<I: ?Sized, O> {
    fn transform(&self, input: &I) -> Result<O>;
}

/// A fitted model that scores a feature vector.
pub trait Predictor<I: ?Sized, O> {
    fn predict(&self, input: &I) -> Result<O>;
}
