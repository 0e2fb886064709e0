mod export;
mod pager;

pub use export::{export_to_buffer, export_to_spreadsheet, EXPORT_FILE_NAME, EXPORT_SHEET_NAME};
pub use pager::{ResultPager, PAGE_SIZE};

use std::fmt;

/// Server-assigned id that ties a result set to its stored resumes.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct RequestId(String);

impl RequestId {
    pub fn new(id: impl Into<String>) -> Self {
        Self(id.into())
    }

    pub fn as_str(&self) -> &str {
        &self.0
    }
}

impl fmt::Display for RequestId {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(&self.0)
    }
}

/// One scored resume.
#[derive(Debug, Clone, PartialEq)]
pub struct MatchResult {
    pub name: Option<String>,
    pub email: String,
    pub similarity_score: f64,
    pub category: Option<String>,
    pub resume_filename: String,
}

/// Column headers, in the order the results table and the export use.
pub const RESULT_COLUMNS: [&str; 5] = [
    "Name",
    "Email",
    "Similarity Score",
    "Category",
    "Resume Filename",
];

/// The results of one successful upload. Always replaced as a whole.
#[derive(Debug)]
pub struct ResultSet {
    request_id: RequestId,
    pager: ResultPager,
}

impl ResultSet {
    pub fn new(request_id: RequestId, results: Vec<MatchResult>) -> Self {
        Self {
            request_id,
            pager: ResultPager::new(results),
        }
    }

    /// Takes over the results of a newer upload, back on page 1.
    pub fn replace(&mut self, request_id: RequestId, results: Vec<MatchResult>) {
        self.request_id = request_id;
        self.pager.replace(results);
    }

    pub fn request_id(&self) -> &RequestId {
        &self.request_id
    }

    pub fn results(&self) -> &[MatchResult] {
        self.pager.items()
    }

    pub fn pager(&self) -> &ResultPager {
        &self.pager
    }

    pub fn pager_mut(&mut self) -> &mut ResultPager {
        &mut self.pager
    }

    pub fn is_empty(&self) -> bool {
        self.pager.items().is_empty()
    }
}
