pub mod form_submission;
pub mod templates;
pub mod verification;
