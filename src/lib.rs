//! Purpose: Shared core library crate used by the `shelf` CLI and tests.
//! Exports: `api` (public surface) and `core` (catalog, record codec, errors).
//! Role: Internal library backing the binary; not yet a stable public SDK.
//! Invariants: Treat the crate API as internal until a dedicated library release.
//! Invariants: Core modules prefer explicit inputs/outputs over hidden state.
pub mod api;
pub mod core;
