//! Core 2-D point repulsion field simulation library.
//!
//! Main components:
//! - [`point`] - mobile points and their integration constants.
//! - [`force`] - pairwise and wall force accumulation.
//! - [`simulator`] - the point collection, stepping and field sampling.
//! - [`field`] - field samples and sampled grids.
//! - [`velocity_buffer`] - staging storage for two-phase steps.
//! - [`config`] - tunable parameters and JSON loading.
//! - [`error`] - error types.
//! - [`types`] - shared type aliases and IDs.

pub mod config;
pub mod error;
pub mod field;
pub mod force;
pub mod point;
pub mod simulator;
pub mod types;
pub mod velocity_buffer;
