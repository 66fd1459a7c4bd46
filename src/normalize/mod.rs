//! The field normalizer. Turns raw cells into typed values without ever
//! failing the run.
pub mod coerce;
pub mod value;

pub use coerce::{coerce_amount, FieldNormalizer, NormalizedFields, DEFAULT_DATE_FORMATS};
pub use value::Normalized;
