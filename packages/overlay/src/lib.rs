#![cfg_attr(feature = "fail-on-warnings", deny(warnings))]
#![warn(clippy::all, clippy::pedantic, clippy::nursery, clippy::cargo)]
#![allow(clippy::multiple_crate_versions)]

//! Overlay construction and renderer synchronization.
//!
//! Joins the static area catalog with the latest snapshot into a
//! renderable feature collection, and keeps a map renderer's data source
//! in sync with it without ever recreating the source or layer after the
//! first sync.

pub mod merge;
pub mod paint;
pub mod renderer;
pub mod sync;

pub use merge::merge;
pub use renderer::{ExtrusionLayerSpec, MapRenderer, ScreenPoint};
pub use sync::{LAYER_ID, OverlaySync, SOURCE_ID};

/// Errors that can occur while synchronizing the overlay.
#[derive(Debug, thiserror::Error)]
pub enum OverlayError {
    /// The underlying renderer rejected an operation.
    #[error("renderer error: {message}")]
    Renderer {
        /// Description from the renderer.
        message: String,
    },
}
