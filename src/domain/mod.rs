pub mod classification;
pub mod error;
pub mod page;
pub mod submission;
pub mod verification;
