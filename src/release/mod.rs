//! Release data layer
//!
//! Fetches commits and tags of a repository, picks the current and previous
//! release tags and classifies the change between them.
//!
//! # Architecture
//!
//! ```text
//! ┌─────────────┐     ┌─────────────┐     ┌─────────────┐
//! │   Source    │────▶│   Fetcher   │────▶│  Snapshot   │
//! │  (remote)   │     │ (selection) │     │  (result)   │
//! └─────────────┘     └─────────────┘     └─────────────┘
//!        │                   │
//!        ▼                   ▼
//! ┌─────────────┐     ┌─────────────┐
//! │   GitHub    │     │ Classifier  │
//! │ (REST API)  │     │(semver diff)│
//! └─────────────┘     └─────────────┘
//! ```
//!
//! # Modules
//!
//! - [`classify`]: Semantic version parsing and change classification
//! - [`error`]: Error types for remote calls and fetch cycles
//! - [`fetcher`]: Assembles a [`types::ReleaseSnapshot`] from a source
//! - [`github`]: GitHub REST API source implementation
//! - [`source`]: Source trait for fetching commits and tags
//! - [`types`]: Commit, tag, change type and snapshot types

pub mod classify;
pub mod error;
pub mod fetcher;
pub mod github;
pub mod source;
pub mod types;
