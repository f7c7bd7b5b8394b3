//! Typed host contracts consumed by the window runtime.
//!
//! The window geometry engine never talks to the DOM or to browser storage directly. It asks a
//! [`LayoutHost`] for viewport and element measurements and hands serialized window dimensions to
//! a [`DimensionStore`]. Browser implementations live in `window_host_web`; the in-memory and
//! fixed-size adapters here back native builds and tests.

#![warn(missing_docs, rustdoc::broken_intra_doc_links)]

pub mod layout;
pub mod storage;

pub use layout::{ElementBounds, FixedLayoutHost, LayoutHost, Viewport};
pub use storage::{
    load_json_with, save_json_with, DimensionStore, DimensionStoreFuture, MemoryDimensionStore,
    NoopDimensionStore,
};
