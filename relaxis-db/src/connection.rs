// SPDX-FileCopyrightText: 2025 Jörg Thalheim
// SPDX-License-Identifier: MIT

//! Database connection management and the format-version gate.

use std::cell::Cell;
use std::path::Path;

use rusqlite::{Connection, OpenFlags};
use tracing::debug;

use crate::error::{Error, ErrorCode, Result};
use crate::query::column_i64;
use crate::schema::{FORMAT_QUERY, SUPPORTED_FORMATS};

/// Read-only session on one RelaxIS file.
///
/// A handle wraps a single SQLite connection plus the error slot read back
/// through [`RelaxisDb::last_error`]. The slot is a [`Cell`], which makes
/// the handle `Send` but not `Sync`: two threads calling into one handle
/// would race between recording an error and reading it back, so a shared
/// handle needs external synchronization. Separate handles, to the same
/// file or different ones, can be used concurrently without restriction.
#[derive(Debug)]
pub struct RelaxisDb {
    pub(crate) conn: Connection,
    pub(crate) last_error: Cell<ErrorCode>,
    format: i64,
}

impl RelaxisDb {
    /// Open a RelaxIS file read-only and validate its format version.
    ///
    /// The gate runs exactly once here; no later operation re-checks the
    /// schema. Fails with [`Error::SchemaUnreadable`] when the
    /// `DatabaseFormat` property cannot be read, and with
    /// [`Error::UnsupportedVersion`] when the file reports a version
    /// outside [`SUPPORTED_FORMATS`]. On failure no handle exists, so
    /// open-time errors arrive through the returned `Err` rather than an
    /// error slot.
    pub fn open<P: AsRef<Path>>(path: P) -> Result<Self> {
        let path = path.as_ref();
        if !path.exists() {
            return Err(Error::DatabaseNotFound(path.to_owned()));
        }

        let conn = Connection::open_with_flags(path, OpenFlags::SQLITE_OPEN_READ_ONLY).map_err(
            |e| Error::DatabaseOpen {
                path: path.to_owned(),
                source: e,
            },
        )?;

        let format = read_format(&conn)?;
        if !SUPPORTED_FORMATS.contains(&format) {
            return Err(Error::UnsupportedVersion(format));
        }

        debug!("Opened RelaxIS file at {} (format {format})", path.display());
        Ok(Self {
            conn,
            last_error: Cell::new(ErrorCode::Success),
            format,
        })
    }

    /// The `DatabaseFormat` version the gate accepted at open time.
    pub fn database_format(&self) -> i64 {
        self.format
    }

    /// Error code recorded by the most recent failing operation on this
    /// handle.
    ///
    /// [`RelaxisDb::fit_parameters`](crate::RelaxisDb::fit_parameters)
    /// additionally rewrites the slot on success; see its documentation.
    pub fn last_error(&self) -> ErrorCode {
        self.last_error.get()
    }

    /// Get raw connection (for advanced usage).
    pub fn connection(&self) -> &Connection {
        &self.conn
    }

    /// Close the handle and release the underlying connection.
    ///
    /// Dropping the handle has the same effect; `close` exists so teardown
    /// can be spelled out at call sites. Because it consumes the handle, no
    /// operation can run after close.
    pub fn close(self) {
        debug!("Closed RelaxIS file");
    }

    /// Record a failed outcome in the error slot, passing the result
    /// through.
    pub(crate) fn record<T>(&self, result: Result<T>) -> Result<T> {
        if let Err(err) = &result {
            self.last_error.set(err.code());
        }
        result
    }
}

/// Run the format-version lookup on a fresh connection.
///
/// Everything unexpected collapses to `SchemaUnreadable`: a missing
/// Properties table, a statement that cannot be stepped, a result shape
/// other than exactly one column, or an absent row.
fn read_format(conn: &Connection) -> Result<i64> {
    let mut stmt = conn
        .prepare(FORMAT_QUERY)
        .map_err(|_| Error::SchemaUnreadable)?;
    if stmt.column_count() != 1 {
        return Err(Error::SchemaUnreadable);
    }

    let mut rows = stmt.query([]).map_err(|_| Error::SchemaUnreadable)?;
    let row = rows
        .next()
        .map_err(|_| Error::SchemaUnreadable)?
        .ok_or(Error::SchemaUnreadable)?;
    column_i64(row, 0, "DatabaseFormat").map_err(|_| Error::SchemaUnreadable)
}
