//! Thin typed layer over the `aea` framework CLI.
//!
//! Nothing here spawns processes; it only resolves what to run and where.

pub mod cli;
pub mod public_id;

pub use cli::{AeaCli, Invocation, Stage};
pub use public_id::PublicId;
