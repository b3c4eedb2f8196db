//! Data models for the member directory.
//!
//! - `Member`: one registrant as stored in the remote `members` table
//! - `NewMember`: the fields a registration form supplies
//! - `MemberPatch`: a partial update, only `Some` fields change
//! - `ExportDocument`: the JSON file written by export and read by import

pub mod member;
pub mod snapshot;

pub use member::{Member, MemberPatch, NewMember, SortOrder};
pub use snapshot::{ExportDocument, EXPORT_FORMAT_VERSION};
