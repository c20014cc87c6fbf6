pub mod attr;
pub mod masked;

// Re-export types for convenience.
pub use crate::types::attr::{AttrValue, DValue};
pub use crate::types::masked::{Element, MaskedArray};
