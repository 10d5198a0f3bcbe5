// SPDX-FileCopyrightText: 2025 Jörg Thalheim
// SPDX-License-Identifier: MIT

//! Error types and the error-code registry.

use std::path::PathBuf;

use thiserror::Error;

/// Result type for RelaxIS database operations.
pub type Result<T> = std::result::Result<T, Error>;

/// Errors that can occur while reading a RelaxIS file.
#[derive(Error, Debug)]
pub enum Error {
    /// SQLite error
    #[error("SQLite error: {0}")]
    Sqlite(#[from] rusqlite::Error),

    /// Failed to open database with context
    #[error("Failed to open database at '{path}': {source}")]
    DatabaseOpen {
        path: PathBuf,
        #[source]
        source: rusqlite::Error,
    },

    /// Database file not found
    #[error("Database not found at: {0}")]
    DatabaseNotFound(PathBuf),

    /// The DatabaseFormat property could not be read
    #[error("Unable to read database format version")]
    SchemaUnreadable,

    /// The file reports a DatabaseFormat outside the supported set
    #[error("Unsupported database format version {0}")]
    UnsupportedVersion(i64),

    /// A query that requires at least one row returned none
    #[error("No such entry")]
    NoSuchEntry,

    /// Spectrum-id enumeration for a project returned no rows
    #[error("Project {0} contains no spectra")]
    ProjectHasNoSpectra(i64),

    /// A specific spectrum id was requested but not found under the project
    #[error("No spectrum {id} in project {project_id}")]
    NoSuchSpectrum { project_id: i64, id: i64 },

    /// A row or value had a shape inconsistent with the expected layout.
    ///
    /// This signals file corruption, or a schema variant that slipped past
    /// the version gate.
    #[error("Malformed database content: {0}")]
    Format(String),
}

/// Stable error codes, recorded in a handle's last-error slot.
///
/// The raw values keep the numbering of the original C loader ABI:
/// positive codes are SQLite result codes passed through from the engine,
/// negative codes are library-defined.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ErrorCode {
    /// No error occurred
    Success,
    /// Pass-through SQLite result code (always positive)
    Engine(i32),
    /// A required row was missing
    NoSuchEntry,
    /// A project turned out to contain no spectra
    ProjectHasNoSpectra,
    /// A requested spectrum does not exist under the given project
    NoSuchSpectrum,
    /// Allocation failure; retained for code-table completeness, the
    /// mappers themselves cannot produce it
    OutOfMemory,
    /// Malformed row shape or unparseable value
    Format,
}

impl ErrorCode {
    /// The raw integer value of this code.
    pub const fn raw(self) -> i32 {
        match self {
            ErrorCode::Success => 0,
            ErrorCode::Engine(code) => code,
            ErrorCode::NoSuchEntry => -100,
            ErrorCode::ProjectHasNoSpectra => -101,
            ErrorCode::NoSuchSpectrum => -102,
            ErrorCode::OutOfMemory => -103,
            ErrorCode::Format => -104,
        }
    }

    /// Human-readable text for this code, with static lifetime.
    pub fn text(self) -> &'static str {
        error_text(self.raw())
    }
}

/// Human-readable text for a raw error code.
///
/// Positive codes resolve through the engine's own result-code table.
pub fn error_text(raw: i32) -> &'static str {
    match raw {
        0 => "Success",
        code if code > 0 => rusqlite::ffi::code_to_str(code),
        -100 => "No such entry",
        -101 => "Project contains no spectra",
        -102 => "Tried to load non existing spectrum",
        -103 => "Out of memory",
        -104 => "Malformed database content",
        _ => "Unknown error",
    }
}

impl Error {
    /// The registry code this error maps to.
    pub fn code(&self) -> ErrorCode {
        match self {
            Error::Sqlite(rusqlite::Error::SqliteFailure(e, _)) => {
                ErrorCode::Engine(e.extended_code)
            }
            Error::Sqlite(rusqlite::Error::QueryReturnedNoRows) => ErrorCode::NoSuchEntry,
            Error::Sqlite(_) => ErrorCode::Format,
            Error::DatabaseOpen {
                source: rusqlite::Error::SqliteFailure(e, _),
                ..
            } => ErrorCode::Engine(e.extended_code),
            Error::DatabaseOpen { .. } | Error::DatabaseNotFound(_) => {
                ErrorCode::Engine(rusqlite::ffi::SQLITE_CANTOPEN)
            }
            Error::SchemaUnreadable | Error::UnsupportedVersion(_) | Error::Format(_) => {
                ErrorCode::Format
            }
            Error::NoSuchEntry => ErrorCode::NoSuchEntry,
            Error::ProjectHasNoSpectra(_) => ErrorCode::ProjectHasNoSpectra,
            Error::NoSuchSpectrum { .. } => ErrorCode::NoSuchSpectrum,
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_raw_code_values() {
        assert_eq!(ErrorCode::Success.raw(), 0);
        assert_eq!(ErrorCode::NoSuchEntry.raw(), -100);
        assert_eq!(ErrorCode::ProjectHasNoSpectra.raw(), -101);
        assert_eq!(ErrorCode::NoSuchSpectrum.raw(), -102);
        assert_eq!(ErrorCode::OutOfMemory.raw(), -103);
        assert_eq!(ErrorCode::Format.raw(), -104);
        assert_eq!(ErrorCode::Engine(14).raw(), 14);
    }

    #[test]
    fn test_error_text_registry() {
        assert_eq!(error_text(0), "Success");
        assert_eq!(error_text(-101), "Project contains no spectra");
        assert_eq!(error_text(-1), "Unknown error");
        // Engine codes pass through to SQLite's own table.
        assert_ne!(error_text(14), "Unknown error");
        assert!(!error_text(14).is_empty());
    }

    #[test]
    fn test_error_to_code_mapping() {
        assert_eq!(Error::NoSuchEntry.code(), ErrorCode::NoSuchEntry);
        assert_eq!(
            Error::ProjectHasNoSpectra(3).code(),
            ErrorCode::ProjectHasNoSpectra
        );
        assert_eq!(
            Error::NoSuchSpectrum { project_id: 1, id: 9 }.code(),
            ErrorCode::NoSuchSpectrum
        );
        assert_eq!(Error::Format("bad".into()).code(), ErrorCode::Format);
        assert_eq!(
            Error::DatabaseNotFound("/no/such/file".into()).code(),
            ErrorCode::Engine(rusqlite::ffi::SQLITE_CANTOPEN)
        );
    }
}
