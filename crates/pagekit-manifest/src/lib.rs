//! Page manifest store.
//!
//! The manifest is a JSON array of page records (`chunk` + `chunkName`) shared by
//! scaffolding, the batch build driver and the build layout derivation.

pub mod record;
pub mod store;

pub use record::PageRecord;
pub use store::{Manifest, ManifestError};
