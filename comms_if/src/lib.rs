//! # Communications interface crate.
//!
//! Provides all common communications interfaces for the software.

// ------------------------------------------------------------------------------------------------
// MODULES
// ------------------------------------------------------------------------------------------------

/// Telecommand envelope and command payloads
pub mod tc;

/// Command and response definitions for equipment (like the leg servos)
pub mod eqpt;
