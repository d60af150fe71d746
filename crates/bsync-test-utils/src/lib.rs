//! Shared test utilities for the bucketsync workspace.
//!
//! This crate provides standardised fixtures so each crate's tests build
//! workspaces and stores the same way. It is a dev-dependency only, never
//! published.
//!
//! # Modules
//!
//! - [`workspace`]: on-disk workspace trees
//! - [`store`]: pre-populated in-memory stores

pub mod store;
pub mod workspace;

pub use store::{json_object, populated_store, sample_files, store_with};
pub use workspace::{empty_workspace, read_slot, workspace_with, write_slot};
