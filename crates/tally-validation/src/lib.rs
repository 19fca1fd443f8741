pub mod aggregate;
pub mod baseline;
pub mod validate;

pub use aggregate::{aggregate, ReportTotals};
pub use baseline::expected_total;
pub use validate::{validate, ValidateError};
