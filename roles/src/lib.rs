//! Role registry for the Countersign authorization core.
//!
//! Each role maps to an explicit set of principals. Checks are capability
//! lookups; mutation is restricted to admins.

pub mod error;
pub mod registry;

pub use error::RoleError;
pub use registry::RoleRegistry;
