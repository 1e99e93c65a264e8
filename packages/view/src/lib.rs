#![cfg_attr(feature = "fail-on-warnings", deny(warnings))]
#![warn(clippy::all, clippy::pedantic, clippy::nursery, clippy::cargo)]
#![allow(clippy::multiple_crate_versions)]

//! User-facing interaction state.
//!
//! The selection state machine turns map clicks into panel open/close/
//! fullscreen transitions, and the search navigator resolves typed area
//! names into camera moves. Both only read shared state; neither writes
//! the snapshot.

pub mod search;
pub mod selection;

pub use search::{NavigateCommand, SEARCH_ZOOM, SearchError, search};
pub use selection::SelectionState;
