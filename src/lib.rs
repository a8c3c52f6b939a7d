//! DStretch - decorrelation stretch for rock-art photography
//!
//! Host application around `dstretch-core`: PNG I/O, presets, the
//! background render worker and the edit session.
//! This library exposes modules for integration testing.

pub mod assets;
pub mod error;
pub mod models;
pub mod rendering;
pub mod services;
