pub mod config;
pub mod error;
pub mod types;
pub mod wib;

pub use error::{Result, TallyError};
