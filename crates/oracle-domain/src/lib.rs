mod status;
mod submission;

pub use status::{StatusParseError, SubmissionStatus};
pub use submission::{Submission, SubmissionKey};
