//! Build orchestration for multi-page projects.
//!
//! [`BatchDriver`] runs the external build tool once per manifest page, and
//! [`derive_layout`] computes the root, entries and output directory the build
//! tool's configuration needs for a single invocation.

pub mod driver;
pub mod layout;

pub use driver::{
    BatchDriver, BatchReport, BuildCommand, BuildVariant, DriverError, PageOutcome,
};
pub use layout::{derive_layout, BuildLayout, LayoutConfig, LayoutError, OutputNames, RunMode};
