pub mod baseline;
pub mod health;
pub mod schedulers;
pub mod token;
pub mod ui;
pub mod validate;
