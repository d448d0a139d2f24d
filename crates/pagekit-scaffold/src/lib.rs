//! Page scaffolding.
//!
//! Creates a new page directory from a template, records the page in the manifest
//! and links it from the landing page.

pub mod input;
pub mod landing;
pub mod template;
pub mod workflow;

pub use input::{parse_request, InputError, PageRequest};
pub use landing::{LandingError, LandingPage, LinkInsertion};
pub use template::{copy_template, CopyError, CopyStats};
pub use workflow::{ScaffoldConfig, ScaffoldError, ScaffoldOutcome, ScaffoldStep, Scaffolder};
