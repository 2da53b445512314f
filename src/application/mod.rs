pub mod use_cases;

pub use use_cases::form_submission::{FormSubmissionUseCase, SubmissionSettings};
pub use use_cases::verification::VerificationUseCase;
