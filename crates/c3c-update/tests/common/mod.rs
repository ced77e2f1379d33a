//! Common test infrastructure for c3c-update tests
//!
//! # Usage
//!
//! In your test file, add:
//! ```ignore
//! mod common;
//! use common::*;
//! ```
//!
//! # Modules
//!
//! - `constants`: Versions, tags, hashes and file contents
//! - `builders`: Snapshot tarball and installation builders
//! - `mock_server`: Wiremock setup for the refs API and archive endpoint
//! - `fakes`: Recording fakes for the source-control client and installer

// Not every test binary uses every helper
#![allow(dead_code)]
#![allow(unused_imports)]

pub mod builders;
pub mod constants;
pub mod fakes;
pub mod mock_server;

pub use builders::*;
pub use constants::*;
pub use fakes::*;
pub use mock_server::*;
