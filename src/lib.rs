//! Tilepop (workspace facade crate).
//!
//! Re-exports the board engine as `tilepop::{core, types}` and adds the
//! JSON-lines [`protocol`] used by the `tilepop` binary.

pub mod protocol;

pub use tilepop_core as core;
pub use tilepop_types as types;
