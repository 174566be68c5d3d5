//! # bd Core Library
//!
//! This crate contains the core logic of the `bd` tool – a project-local installer
//! for pinned helper binaries.
//!
//! `bd` reads a `bd.json` manifest, builds each declared binary with `go install`
//! into a scratch directory, stores it under a version-pinned name in the project's
//! bin directory and publishes a stable alias next to it. Installed binaries are
//! then run through `bd exec <name>`.
//!
//! ## Modules Overview
//! - [`manifest`] – Parsing and normalization of `bd.json`
//! - [`builder`] – The external build step (`go install`)
//! - [`installer`] – Installing binaries into the bin directory
//! - [`alias`] – Publishing version-agnostic aliases (symlink or copy)
//! - [`runner`] – Looking up and executing installed binaries
//! - [`util`] – File naming and permission helpers
//! - [`error`] – Errors callers can match on

pub mod manifest;
pub mod builder;
pub mod installer;
pub mod alias;
pub mod runner;
pub mod util;
pub mod error;

pub use manifest::*;
pub use builder::*;
pub use installer::*;
pub use alias::*;
pub use runner::*;
pub use util::*;
pub use error::*;
