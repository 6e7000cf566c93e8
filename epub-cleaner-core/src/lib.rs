#![doc = "epub-cleaner-core: core logic library for epub-cleaner."]

//! This crate holds the whole clean pipeline: literal string removal, archive
//! extraction and repackaging, and the storage seam used to publish results.
//! Concrete cloud clients and the HTTP surface live in the `epub-cleaner` crate.
//!
//! # Usage
//! Build a [`config::CleanerConfig`], pick an [`contract::ArtifactStore`]
//! implementation and hand both to [`clean::clean_batch`].

pub mod clean;
pub mod config;
pub mod contract;
pub mod extract;
pub mod filename;
pub mod gateway;
pub mod repackage;
pub mod substitute;
pub mod walker;
