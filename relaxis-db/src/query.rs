// SPDX-FileCopyrightText: 2025 Jörg Thalheim
// SPDX-License-Identifier: MIT

//! Row-to-record mappers over an open RelaxIS file.
//!
//! Every mapper surfaces failures twice: as the returned `Err` and as a
//! code in the handle's error slot. The per-mapper zero-row policies differ
//! on purpose and are documented on each method.

use rusqlite::Row;
use rusqlite::params;
use rusqlite::types::ValueRef;
use tracing::trace;

use crate::connection::RelaxisDb;
use crate::error::{Error, ErrorCode, Result};
use crate::types::{Datapoint, FitParameter, Metadata, Project, Spectrum, parse_timestamp};

impl RelaxisDb {
    /// List all projects in the file.
    ///
    /// A file without projects yields an empty vec; absence of rows is not
    /// an error for this mapper.
    pub fn projects(&self) -> Result<Vec<Project>> {
        let result = self.projects_inner();
        self.record(result)
    }

    fn projects_inner(&self) -> Result<Vec<Project>> {
        let mut stmt = self
            .conn
            .prepare_cached("SELECT ID, NAME, DATE FROM Projects")?;
        if stmt.column_count() != 3 {
            return Err(Error::Format("Projects row must have 3 columns".into()));
        }

        let mut projects = Vec::new();
        let mut rows = stmt.query([])?;
        while let Some(row) = rows.next()? {
            projects.push(Project {
                id: column_i64(row, 0, "project id")?,
                name: column_text(row, 1)?,
                date: parse_timestamp(&column_text(row, 2)?)?,
            });
        }
        trace!("Loaded {} projects", projects.len());
        Ok(projects)
    }

    /// Ids of all spectra recorded under `project`.
    ///
    /// Zero rows is an error here ([`Error::ProjectHasNoSpectra`]),
    /// asymmetric with [`RelaxisDb::projects`] where an empty result is
    /// success.
    pub fn spectrum_ids(&self, project: &Project) -> Result<Vec<i64>> {
        let result = self.spectrum_ids_inner(project);
        self.record(result)
    }

    fn spectrum_ids_inner(&self, project: &Project) -> Result<Vec<i64>> {
        let mut stmt = self
            .conn
            .prepare_cached("SELECT ID FROM Files WHERE project_id = ?1")?;
        if stmt.column_count() != 1 {
            return Err(Error::Format("Files id row must have 1 column".into()));
        }

        let mut ids = Vec::new();
        let mut rows = stmt.query(params![project.id])?;
        while let Some(row) = rows.next()? {
            ids.push(column_i64(row, 0, "spectrum id")?);
        }
        if ids.is_empty() {
            return Err(Error::ProjectHasNoSpectra(project.id));
        }
        trace!("Project {} has {} spectra", project.id, ids.len());
        Ok(ids)
    }

    /// Load one spectrum by project and id.
    ///
    /// The header row is required; a missing row fails with
    /// [`Error::NoSuchSpectrum`]. The datapoint and metadata sub-queries
    /// run independently afterwards: a failing sub-query records its code
    /// in the error slot while the header is still returned, with
    /// `datapoints` absent or `metadata` empty. Callers that only check
    /// the top-level result must inspect [`RelaxisDb::last_error`] to
    /// notice a partial load.
    pub fn spectrum(&self, project: &Project, id: i64) -> Result<Spectrum> {
        let header = self.spectrum_header(project, id);
        let mut spectrum = self.record(header)?;

        match self.datapoints(id) {
            Ok(points) => spectrum.datapoints = Some(points),
            Err(err) => self.last_error.set(err.code()),
        }
        match self.metadata(id) {
            Ok(entries) => spectrum.metadata = entries,
            Err(err) => self.last_error.set(err.code()),
        }
        Ok(spectrum)
    }

    fn spectrum_header(&self, project: &Project, id: i64) -> Result<Spectrum> {
        let mut stmt = self.conn.prepare_cached(
            "SELECT groupname, fitted, lowfreqlimit, highfreqlimit, dateadded, datefitted \
             FROM Files WHERE project_id = ?1 AND ID = ?2",
        )?;
        if stmt.column_count() != 6 {
            return Err(Error::Format("Files row must have 6 columns".into()));
        }

        let mut rows = stmt.query(params![project.id, id])?;
        let Some(row) = rows.next()? else {
            return Err(Error::NoSuchSpectrum {
                project_id: project.id,
                id,
            });
        };

        let fitted = column_bool(row, 1)?;
        let date_fitted = if fitted {
            let raw = column_text(row, 5)?;
            if raw.trim().is_empty() {
                None
            } else {
                Some(parse_timestamp(&raw)?)
            }
        } else {
            None
        };

        Ok(Spectrum {
            id,
            datapoints: None,
            circuit: column_text(row, 0)?,
            fitted,
            project_id: project.id,
            freq_lower_limit: column_f64(row, 2, "lower frequency limit")?,
            freq_upper_limit: column_f64(row, 3, "upper frequency limit")?,
            date_added: parse_timestamp(&column_text(row, 4)?)?,
            date_fitted,
            metadata: Vec::new(),
        })
    }

    /// Load every spectrum of a project.
    ///
    /// Sugar over [`RelaxisDb::spectrum_ids`] and [`RelaxisDb::spectrum`]:
    /// the first failing fetch aborts the whole call, and already-built
    /// spectra are dropped with the partial vec.
    pub fn all_spectra(&self, project: &Project) -> Result<Vec<Spectrum>> {
        let ids = self.spectrum_ids(project)?;
        let mut spectra = Vec::with_capacity(ids.len());
        for id in ids {
            spectra.push(self.spectrum(project, id)?);
        }
        Ok(spectra)
    }

    /// Fit parameters for one spectrum, in row order.
    ///
    /// `project` is accepted for call-site symmetry with the other loaders
    /// but does not filter the query; spectrum ids are file-global in every
    /// database observed so far. Zero rows yields an empty vec, not an
    /// error. The error slot is rewritten by this call even on success: it
    /// carries the cursor finalization outcome, so after a clean drain the
    /// slot reads [`ErrorCode::Success`] regardless of what an earlier
    /// operation left there.
    pub fn fit_parameters(&self, project: &Project, id: i64) -> Result<Vec<FitParameter>> {
        let _ = project;
        let result = self.fit_parameters_inner(id);
        if result.is_ok() {
            self.last_error.set(ErrorCode::Success);
        }
        self.record(result)
    }

    fn fit_parameters_inner(&self, id: i64) -> Result<Vec<FitParameter>> {
        let mut stmt = self.conn.prepare_cached(
            "SELECT pindex, name, value, error, lowerlimit, upperlimit \
             FROM Fitparameters WHERE file_id = ?1",
        )?;
        if stmt.column_count() != 6 {
            return Err(Error::Format(
                "Fitparameters row must have 6 columns".into(),
            ));
        }

        let mut parameters = Vec::with_capacity(8);
        let mut rows = stmt.query(params![id])?;
        while let Some(row) = rows.next()? {
            parameters.push(FitParameter {
                spectrum_id: id,
                index: column_i64(row, 0, "parameter index")?,
                name: column_text(row, 1)?,
                value: column_f64(row, 2, "parameter value")?,
                error: column_f64(row, 3, "parameter error")?,
                lower_limit: column_f64(row, 4, "parameter lower limit")?,
                upper_limit: column_f64(row, 5, "parameter upper limit")?,
            });
        }
        trace!("Spectrum {id} has {} fit parameters", parameters.len());
        Ok(parameters)
    }

    /// Datapoints for one spectrum, in database row order.
    ///
    /// Zero rows is [`Error::NoSuchEntry`]: a spectrum header without any
    /// datapoints indicates a truncated file.
    fn datapoints(&self, id: i64) -> Result<Vec<Datapoint>> {
        let mut stmt = self
            .conn
            .prepare_cached("SELECT frequency, zreal, zimag FROM Datapoints WHERE file_id = ?1")?;
        if stmt.column_count() != 3 {
            return Err(Error::Format("Datapoints row must have 3 columns".into()));
        }

        let mut points = Vec::new();
        let mut rows = stmt.query(params![id])?;
        while let Some(row) = rows.next()? {
            // Stored as plain Hz; everything downstream works in rad/s.
            let frequency = column_f64(row, 0, "frequency")?;
            points.push(Datapoint {
                omega: frequency * std::f64::consts::TAU,
                re: column_f64(row, 1, "zreal")?,
                im: column_f64(row, 2, "zimag")?,
            });
        }
        if points.is_empty() {
            return Err(Error::NoSuchEntry);
        }
        Ok(points)
    }

    /// Metadata key/value pairs for one spectrum.
    ///
    /// Zero rows is fine; spectra routinely carry no extra conditions.
    pub(crate) fn metadata(&self, id: i64) -> Result<Vec<Metadata>> {
        let mut stmt = self
            .conn
            .prepare_cached("SELECT name, value FROM FileInformation WHERE file_id = ?1")?;
        if stmt.column_count() != 2 {
            return Err(Error::Format(
                "FileInformation row must have 2 columns".into(),
            ));
        }

        let mut entries = Vec::new();
        let mut rows = stmt.query(params![id])?;
        while let Some(row) = rows.next()? {
            entries.push(Metadata::classify(
                column_text(row, 0)?,
                column_text(row, 1)?,
            ));
        }
        Ok(entries)
    }
}

/// Read a column that should hold an integer, tolerating the text affinity
/// RelaxIS uses in parts of its schema.
pub(crate) fn column_i64(row: &Row<'_>, idx: usize, what: &str) -> Result<i64> {
    match row.get_ref(idx)? {
        ValueRef::Integer(value) => Ok(value),
        ValueRef::Real(value) => Ok(value as i64),
        ValueRef::Text(text) => std::str::from_utf8(text)
            .ok()
            .and_then(|s| s.trim().parse().ok())
            .ok_or_else(|| Error::Format(format!("{what} is not an integer"))),
        _ => Err(Error::Format(format!("{what} is not an integer"))),
    }
}

/// Read a column that should hold a float, tolerating text affinity.
fn column_f64(row: &Row<'_>, idx: usize, what: &str) -> Result<f64> {
    match row.get_ref(idx)? {
        ValueRef::Real(value) => Ok(value),
        ValueRef::Integer(value) => Ok(value as f64),
        ValueRef::Text(text) => std::str::from_utf8(text)
            .ok()
            .and_then(|s| s.trim().parse().ok())
            .ok_or_else(|| Error::Format(format!("{what} is not a number"))),
        _ => Err(Error::Format(format!("{what} is not a number"))),
    }
}

/// Read a text column. NULL maps to the empty string, matching how RelaxIS
/// leaves unset text fields.
fn column_text(row: &Row<'_>, idx: usize) -> Result<String> {
    match row.get_ref(idx)? {
        ValueRef::Null => Ok(String::new()),
        ValueRef::Text(text) => std::str::from_utf8(text)
            .map(str::to_owned)
            .map_err(|_| Error::Format("text column is not valid UTF-8".into())),
        ValueRef::Integer(value) => Ok(value.to_string()),
        ValueRef::Real(value) => Ok(value.to_string()),
        ValueRef::Blob(_) => Err(Error::Format("unexpected blob in text column".into())),
    }
}

/// Read a boolean stored as either an integer or the text `"1"`/`"0"`.
fn column_bool(row: &Row<'_>, idx: usize) -> Result<bool> {
    match row.get_ref(idx)? {
        ValueRef::Null => Ok(false),
        ValueRef::Integer(value) => Ok(value != 0),
        ValueRef::Real(value) => Ok(value != 0.0),
        ValueRef::Text(text) => Ok(text.first() == Some(&b'1')),
        ValueRef::Blob(_) => Err(Error::Format("unexpected blob in boolean column".into())),
    }
}
