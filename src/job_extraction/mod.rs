// src/job_extraction/mod.rs
use serde::{Deserialize, Serialize};

pub mod job_extractor;
pub mod strategies;

pub use job_extractor::{parse_posting, validate_url, JobExtractor};

pub const UNKNOWN_POSITION: &str = "Unknown Position";
pub const UNKNOWN_COMPANY: &str = "Unknown Company";
/// Label used in place of a title that could not be found.
pub const UNTITLED_LABEL: &str = "Job Posting";

/// Fields recovered from a job-posting page.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct JobPosting {
    pub title: String,
    pub company: String,
    pub description: String,
}

impl JobPosting {
    /// Display label used when the posting is stored as a document.
    pub fn file_name(&self) -> String {
        let label = if self.title == UNKNOWN_POSITION || self.title.trim().is_empty() {
            UNTITLED_LABEL
        } else {
            self.title.as_str()
        };
        format!("{} - {}", label, self.company)
    }
}
