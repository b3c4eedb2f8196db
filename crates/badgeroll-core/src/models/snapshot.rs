use chrono::{DateTime, NaiveDate, Utc};
use serde::{Deserialize, Serialize};

use super::Member;

/// Format version written into every export.
pub const EXPORT_FORMAT_VERSION: &str = "1.0";

/// The export/import file: the member collection plus provenance.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct ExportDocument {
    pub members: Vec<Member>,
    #[serde(rename = "exportDate")]
    pub export_date: DateTime<Utc>,
    pub version: String,
}

impl ExportDocument {
    pub fn new(members: Vec<Member>) -> Self {
        Self {
            members,
            export_date: Utc::now(),
            version: EXPORT_FORMAT_VERSION.to_string(),
        }
    }

    /// Suggested download name, e.g. `members_supabase_2024-03-01.json`
    pub fn file_name(date: NaiveDate) -> String {
        format!("members_supabase_{}.json", date.format("%Y-%m-%d"))
    }
}

/// Lenient reading side of `ExportDocument`: only `members` is required,
/// files written by older tools may lack the other fields.
#[derive(Debug, Deserialize)]
pub(crate) struct ImportDocument {
    pub members: Vec<Member>,
}
