// Core modules implementing the catalog, its file format, and error modeling.
pub mod catalog;
pub mod error;
pub mod record;
pub mod shelf;
