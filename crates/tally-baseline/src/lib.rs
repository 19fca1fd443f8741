pub mod store;

pub use store::{BaselineError, BaselineStore};
