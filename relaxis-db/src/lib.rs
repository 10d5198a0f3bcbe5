// SPDX-FileCopyrightText: 2025 Jörg Thalheim
// SPDX-License-Identifier: MIT

//! Read-only SQLite interface for RelaxIS impedance spectroscopy files.
//!
//! RelaxIS stores a measurement campaign as a single SQLite file: projects,
//! impedance spectra (called "files" in RelaxIS terms), per-spectrum
//! metadata and circuit-fit parameters. This crate opens such files
//! read-only, validates the `DatabaseFormat` stamp once at open time and
//! maps relational rows into owned record graphs.
//!
//! # Key Features
//!
//! - Format-version gate for the supported `DatabaseFormat` set
//! - Typed mappers for projects, spectra, datapoints, metadata and
//!   fit parameters
//! - Per-handle error slot with stable error codes and static text,
//!   SQLite result codes passed through
//! - Hz → rad/s conversion applied to datapoints at load time
//!
//! # Example
//!
//! ```ignore
//! use relaxis_db::RelaxisDb;
//!
//! let db = RelaxisDb::open("measurements.rxdb")?;
//! for project in db.projects()? {
//!     for id in db.spectrum_ids(&project)? {
//!         let spectrum = db.spectrum(&project, id)?;
//!         let points = spectrum.datapoints.as_ref().map_or(0, Vec::len);
//!         println!("spectrum {} has {points} datapoints", spectrum.id);
//!     }
//! }
//! ```
//!
//! A handle is `Send` but not `Sync`: the last-error slot is single-writer
//! per handle, so sharing one handle across threads requires external
//! synchronization. Any number of handles may be open concurrently, the
//! underlying connections are strictly read-only.

mod connection;
mod error;
mod query;
mod schema;
mod types;

pub use connection::RelaxisDb;
pub use error::{Error, ErrorCode, Result, error_text};
pub use schema::{SCHEMA_SQL, SUPPORTED_FORMATS};
pub use types::*;

/// Library version triple.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct Version {
    pub major: u32,
    pub minor: u32,
    pub patch: u32,
}

/// The version of this library, taken from the crate metadata.
pub fn version() -> Version {
    fn component(text: &str) -> u32 {
        text.parse().unwrap_or(0)
    }
    Version {
        major: component(env!("CARGO_PKG_VERSION_MAJOR")),
        minor: component(env!("CARGO_PKG_VERSION_MINOR")),
        patch: component(env!("CARGO_PKG_VERSION_PATCH")),
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_version_matches_manifest() {
        let v = version();
        let expected = format!("{}.{}.{}", v.major, v.minor, v.patch);
        assert_eq!(expected, env!("CARGO_PKG_VERSION"));
    }
}
