//! Purpose: Define the stable public Rust API boundary for the shelf catalog.
//! Exports: Core types and operations needed by the CLI and tests.
//! Role: Public, additive-only surface; hides internal storage modules.
//! Invariants: This module is the only public path to catalog primitives.
//! Invariants: Internal modules remain private and are not directly exposed.

pub use crate::core::catalog::Catalog;
#[doc(hidden)]
pub use crate::core::error::to_exit_code;
pub use crate::core::error::{Error, ErrorKind};
pub use crate::core::record::{BookRecord, FIELD_SEPARATOR};
pub use crate::core::shelf::Shelf;
