//! External data collaborators.
//!
//! - forecast source adapter over the remote weather API (`source`)
//! - the fixed city registry (`registry`)

pub mod registry;
pub mod source;

pub use registry::*;
pub use source::*;
