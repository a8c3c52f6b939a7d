//! Public API for the dstretch-core crate.
//!
//! This module provides the high-level API: the [`Enhancer`] builder and
//! the [`EnhanceError`] error type.

mod enhancer;
mod error;

pub use enhancer::Enhancer;
pub use error::EnhanceError;
