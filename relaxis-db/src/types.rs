// SPDX-FileCopyrightText: 2025 Jörg Thalheim
// SPDX-License-Identifier: MIT

//! Record types mapped from RelaxIS database rows.

use chrono::NaiveDateTime;

use crate::error::{Error, Result};

/// A RelaxIS project: a grouping of spectra, roughly one measurement
/// campaign.
#[derive(Debug, Clone, PartialEq)]
pub struct Project {
    /// Database row id
    pub id: i64,
    /// Display name of the project
    pub name: String,
    /// Project creation time. Naive: the file records no timezone.
    pub date: NaiveDateTime,
}

/// One impedance measurement point.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct Datapoint {
    /// Imaginary part of the impedance in Ohm
    pub im: f64,
    /// Real part of the impedance in Ohm
    pub re: f64,
    /// Angular frequency in rad/s, 2π times the frequency stored in Hz
    pub omega: f64,
}

/// An impedance spectrum (a "file" in RelaxIS terms) with its fit state
/// and metadata.
#[derive(Debug, Clone, PartialEq)]
pub struct Spectrum {
    /// Spectrum id
    pub id: i64,
    /// Measurement points in database row order, which is not guaranteed
    /// to be frequency-sorted. `None` when the datapoint sub-query failed
    /// while the header row was still readable; check
    /// [`RelaxisDb::last_error`](crate::RelaxisDb::last_error) for the cause.
    pub datapoints: Option<Vec<Datapoint>>,
    /// RelaxIS circuit description string, passed through uninterpreted
    pub circuit: String,
    /// Whether the circuit has been fitted to this spectrum
    pub fitted: bool,
    /// Id of the project this spectrum was fetched through
    pub project_id: i64,
    /// Lower limit of the measured frequency range in Hz
    pub freq_lower_limit: f64,
    /// Upper limit of the measured frequency range in Hz
    pub freq_upper_limit: f64,
    /// When the spectrum was added. Naive local time, timezone unrecorded.
    pub date_added: NaiveDateTime,
    /// When the spectrum was last fitted; `None` unless `fitted`
    pub date_fitted: Option<NaiveDateTime>,
    /// Named measurement conditions attached to this spectrum
    pub metadata: Vec<Metadata>,
}

impl Spectrum {
    /// Split the datapoints into `(re, im, omega)` arrays.
    ///
    /// Pure transform, no I/O. Returns `None` when the datapoint
    /// collection is absent.
    pub fn double_arrays(&self) -> Option<(Vec<f64>, Vec<f64>, Vec<f64>)> {
        let points = self.datapoints.as_ref()?;
        let re = points.iter().map(|p| p.re).collect();
        let im = points.iter().map(|p| p.im).collect();
        let omega = points.iter().map(|p| p.omega).collect();
        Some((re, im, omega))
    }

    /// `f32` variant of [`Spectrum::double_arrays`].
    pub fn float_arrays(&self) -> Option<(Vec<f32>, Vec<f32>, Vec<f32>)> {
        let points = self.datapoints.as_ref()?;
        let re = points.iter().map(|p| p.re as f32).collect();
        let im = points.iter().map(|p| p.im as f32).collect();
        let omega = points.iter().map(|p| p.omega as f32).collect();
        Some((re, im, omega))
    }
}

/// Classification of a metadata value, decided once at load time.
#[derive(Debug, Clone, Copy, PartialEq)]
pub enum MetadataValue {
    /// The raw text parses as a float in its entirety
    Numeric(f64),
    /// Anything else
    Text,
}

/// One named measurement condition attached to a spectrum.
#[derive(Debug, Clone, PartialEq)]
pub struct Metadata {
    /// Key as stored in the file
    pub key: String,
    /// Raw value text, retained regardless of classification
    pub raw: String,
    /// Load-time classification of `raw`
    pub value: MetadataValue,
}

impl Metadata {
    /// Build a metadata record, classifying the value by a whole-string
    /// float parse. Partial numeric prefixes like `"12abc"` stay text.
    pub(crate) fn classify(key: String, raw: String) -> Self {
        let value = match raw.trim().parse::<f64>() {
            Ok(number) => MetadataValue::Numeric(number),
            Err(_) => MetadataValue::Text,
        };
        Self { key, raw, value }
    }

    /// The numeric value, if this record classified as numeric.
    pub fn numeric(&self) -> Option<f64> {
        match self.value {
            MetadataValue::Numeric(number) => Some(number),
            MetadataValue::Text => None,
        }
    }

    /// The well-known key this record corresponds to, or
    /// [`FileKey::Unknown`] for user-defined keys.
    pub fn file_key(&self) -> FileKey {
        FileKey::from_key(&self.key)
    }
}

/// Well-known metadata keys RelaxIS writes into `FileInformation`.
///
/// [`FileKey::as_str`] is total; [`FileKey::from_key`] maps unrecognized
/// keys to [`FileKey::Unknown`]. The asymmetry is intentional: files carry
/// arbitrary user-defined keys next to the well-known set, so the string
/// direction is lossy by design.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum FileKey {
    Temperature,
    DcVoltage,
    AcVoltage,
    Current,
    Time,
    Harmonic,
    Concentration,
    FreeVariable,
    FreeVariable2,
    Area,
    Thickness,
    Soc,
    Soh,
    Pressure,
    /// Sentinel for keys outside the well-known set
    Unknown,
}

impl FileKey {
    /// The key string as it appears in the file.
    pub const fn as_str(self) -> &'static str {
        match self {
            FileKey::Temperature => "Temperature",
            FileKey::DcVoltage => "DC Voltage",
            FileKey::AcVoltage => "AC Voltage",
            FileKey::Current => "Current",
            FileKey::Time => "Time",
            FileKey::Harmonic => "Harmonic",
            FileKey::Concentration => "Concentration",
            FileKey::FreeVariable => "Free Variable",
            FileKey::FreeVariable2 => "Free Variable 2",
            FileKey::Area => "Area",
            FileKey::Thickness => "Thickness",
            FileKey::Soc => "SOC",
            FileKey::Soh => "SOH",
            FileKey::Pressure => "Pressure",
            FileKey::Unknown => "Unknown",
        }
    }

    /// Map a key string to its well-known variant, `Unknown` otherwise.
    pub fn from_key(key: &str) -> Self {
        match key {
            "Temperature" => FileKey::Temperature,
            "DC Voltage" => FileKey::DcVoltage,
            "AC Voltage" => FileKey::AcVoltage,
            "Current" => FileKey::Current,
            "Time" => FileKey::Time,
            "Harmonic" => FileKey::Harmonic,
            "Concentration" => FileKey::Concentration,
            "Free Variable" => FileKey::FreeVariable,
            "Free Variable 2" => FileKey::FreeVariable2,
            "Area" => FileKey::Area,
            "Thickness" => FileKey::Thickness,
            "SOC" => FileKey::Soc,
            "SOH" => FileKey::Soh,
            "Pressure" => FileKey::Pressure,
            _ => FileKey::Unknown,
        }
    }
}

/// One fitted circuit-element coefficient.
#[derive(Debug, Clone, PartialEq)]
pub struct FitParameter {
    /// Id of the spectrum this parameter belongs to
    pub spectrum_id: i64,
    /// Position of the parameter within the fitted circuit
    pub index: i64,
    /// Circuit-element parameter name
    pub name: String,
    /// Fitted value
    pub value: f64,
    /// Fit error estimate
    pub error: f64,
    /// Lower bound used during fitting
    pub lower_limit: f64,
    /// Upper bound used during fitting
    pub upper_limit: f64,
}

/// Parse a RelaxIS timestamp of the form `YYYY-MM-DD HH:MM:SS`.
///
/// The separator between date and time may be any whitespace (RelaxIS emits
/// both space and tab). The result is naive: the file does not record a
/// timezone, a documented limitation of the source format.
pub(crate) fn parse_timestamp(text: &str) -> Result<NaiveDateTime> {
    NaiveDateTime::parse_from_str(text.trim(), "%Y-%m-%d %H:%M:%S")
        .map_err(|e| Error::Format(format!("bad timestamp '{text}': {e}")))
}

#[cfg(test)]
mod tests {
    use chrono::NaiveDate;
    use rstest::rstest;

    use super::*;

    fn spectrum_with(points: Option<Vec<Datapoint>>) -> Spectrum {
        Spectrum {
            id: 1,
            datapoints: points,
            circuit: "R(RC)".into(),
            fitted: false,
            project_id: 1,
            freq_lower_limit: 1.0,
            freq_upper_limit: 100.0,
            date_added: NaiveDate::from_ymd_opt(2023, 5, 1)
                .unwrap()
                .and_hms_opt(9, 30, 0)
                .unwrap(),
            date_fitted: None,
            metadata: Vec::new(),
        }
    }

    #[test]
    fn test_timestamp_space_separator() {
        let parsed = parse_timestamp("2023-05-01 09:30:00").unwrap();
        assert_eq!(
            parsed,
            NaiveDate::from_ymd_opt(2023, 5, 1)
                .unwrap()
                .and_hms_opt(9, 30, 0)
                .unwrap()
        );
    }

    #[test]
    fn test_timestamp_tab_separator() {
        let parsed = parse_timestamp("2023-05-01\t09:30:00").unwrap();
        assert_eq!(
            parsed,
            NaiveDate::from_ymd_opt(2023, 5, 1)
                .unwrap()
                .and_hms_opt(9, 30, 0)
                .unwrap()
        );
    }

    #[test]
    fn test_timestamp_rejects_garbage() {
        assert!(parse_timestamp("yesterday").is_err());
        assert!(parse_timestamp("2023-13-01 00:00:00").is_err());
        assert!(parse_timestamp("").is_err());
    }

    #[rstest]
    #[case("293.15", Some(293.15))]
    #[case("-1.5e3", Some(-1500.0))]
    #[case(" 42 ", Some(42.0))]
    #[case("N/A", None)]
    #[case("12abc", None)]
    #[case("", None)]
    #[case("1,5", None)]
    fn test_metadata_classification(#[case] raw: &str, #[case] expected: Option<f64>) {
        let meta = Metadata::classify("Temperature".into(), raw.into());
        assert_eq!(meta.numeric(), expected);
        // The raw text survives classification either way.
        assert_eq!(meta.raw, raw);
        match expected {
            Some(_) => assert!(matches!(meta.value, MetadataValue::Numeric(_))),
            None => assert_eq!(meta.value, MetadataValue::Text),
        }
    }

    #[test]
    fn test_file_key_roundtrip_is_lossy_one_way() {
        // Every well-known variant survives enum -> string -> enum.
        for key in [
            FileKey::Temperature,
            FileKey::DcVoltage,
            FileKey::AcVoltage,
            FileKey::Current,
            FileKey::Time,
            FileKey::Harmonic,
            FileKey::Concentration,
            FileKey::FreeVariable,
            FileKey::FreeVariable2,
            FileKey::Area,
            FileKey::Thickness,
            FileKey::Soc,
            FileKey::Soh,
            FileKey::Pressure,
        ] {
            assert_eq!(FileKey::from_key(key.as_str()), key);
        }
        // The string direction collapses everything else to Unknown.
        assert_eq!(FileKey::from_key("Humidity"), FileKey::Unknown);
        assert_eq!(FileKey::from_key(""), FileKey::Unknown);
    }

    #[test]
    fn test_double_arrays_preserve_order() {
        let spectrum = spectrum_with(Some(vec![
            Datapoint { im: -3.0, re: 10.0, omega: 6.0 },
            Datapoint { im: -2.0, re: 11.0, omega: 60.0 },
            Datapoint { im: -1.0, re: 12.0, omega: 600.0 },
        ]));

        let (re, im, omega) = spectrum.double_arrays().unwrap();
        assert_eq!(re, vec![10.0, 11.0, 12.0]);
        assert_eq!(im, vec![-3.0, -2.0, -1.0]);
        assert_eq!(omega, vec![6.0, 60.0, 600.0]);
    }

    #[test]
    fn test_float_arrays_agree_with_double_arrays() {
        let spectrum = spectrum_with(Some(vec![
            Datapoint { im: -0.25, re: 100.5, omega: std::f64::consts::TAU },
            Datapoint { im: 0.5, re: 7.25, omega: 10.0 * std::f64::consts::TAU },
        ]));

        let (re64, im64, omega64) = spectrum.double_arrays().unwrap();
        let (re32, im32, omega32) = spectrum.float_arrays().unwrap();
        assert_eq!(re32.len(), re64.len());
        for i in 0..re64.len() {
            assert_eq!(re32[i], re64[i] as f32);
            assert_eq!(im32[i], im64[i] as f32);
            assert_eq!(omega32[i], omega64[i] as f32);
        }
    }

    #[test]
    fn test_arrays_absent_without_datapoints() {
        let spectrum = spectrum_with(None);
        assert!(spectrum.double_arrays().is_none());
        assert!(spectrum.float_arrays().is_none());
    }
}
