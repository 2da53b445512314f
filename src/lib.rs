pub mod application;
pub mod domain;
pub mod infrastructure;
pub mod interfaces;

mod app;

pub use app::run;
pub use domain::error::{AppError, Result};
