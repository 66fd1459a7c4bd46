//! Coercion of raw `amount` and `date` cells into typed values.
use super::value::Normalized;
use crate::store::Batch;
use chrono::{NaiveDate, NaiveDateTime};

/// Formats tried, in order, when none are configured.
pub const DEFAULT_DATE_FORMATS: [&str; 2] = ["%Y-%m-%d %H:%M:%S", "%Y-%m-%d"];

/// Typed view of the fields the rules inspect, aligned with the batch records.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct NormalizedFields {
    pub amount: Normalized<f64>,
    pub parsed_date: Normalized<NaiveDateTime>,
}

#[derive(Debug, Clone)]
pub struct FieldNormalizer {
    date_formats: Vec<String>,
}

impl Default for FieldNormalizer {
    fn default() -> Self {
        Self::new(DEFAULT_DATE_FORMATS.iter().map(|f| f.to_string()).collect())
    }
}

impl FieldNormalizer {
    pub fn new(date_formats: Vec<String>) -> Self {
        Self { date_formats }
    }

    /// Normalizes every record of the batch. Never fails: uncoercible values
    /// come back as `Normalized::Invalid`.
    pub fn normalize(&self, batch: &Batch) -> Vec<NormalizedFields> {
        let keys = batch.keys();
        batch
            .records()
            .iter()
            .map(|r| NormalizedFields {
                amount: coerce_amount(r.cell(keys.amount)),
                parsed_date: self.coerce_date(r.cell(keys.date)),
            })
            .collect()
    }

    pub fn coerce_date(&self, raw: Option<&str>) -> Normalized<NaiveDateTime> {
        let Some(raw) = raw else { return Normalized::Missing };
        let raw = raw.trim();
        for fmt in &self.date_formats {
            if let Ok(ts) = NaiveDateTime::parse_from_str(raw, fmt) {
                return Normalized::Valid(ts);
            }
            // Date-only formats never yield a NaiveDateTime; they mean midnight.
            if let Ok(d) = NaiveDate::parse_from_str(raw, fmt) {
                return d.and_hms_opt(0, 0, 0).map_or(Normalized::Invalid, Normalized::Valid);
            }
        }
        Normalized::Invalid
    }
}

/// Parses an amount as a number. Infinities are numbers (`-inf` is negative);
/// a NaN spelling that was not already read as null is invalid.
pub fn coerce_amount(raw: Option<&str>) -> Normalized<f64> {
    let Some(raw) = raw else { return Normalized::Missing };
    match raw.trim().parse::<f64>() {
        Ok(v) if !v.is_nan() => Normalized::Valid(v),
        _ => Normalized::Invalid,
    }
}
