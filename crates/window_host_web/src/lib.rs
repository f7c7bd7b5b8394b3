//! Browser (`wasm32`) implementations of the [`window_host`] contracts.
//!
//! Every adapter compiles on native targets too, where it reports the fallback viewport, no
//! mounted elements, and an empty store.

#![warn(missing_docs, rustdoc::broken_intra_doc_links)]

pub mod layout;
pub mod storage;

pub use layout::WebLayoutHost;
pub use storage::WebDimensionStore;
