use async_trait::async_trait;

use crate::models::{Member, MemberPatch, SortOrder};

use super::ApiError;

/// The remote member table.
///
/// Empty results are never errors: `update` returns `None` and `delete`
/// returns `false` when no row has the given id.
#[async_trait]
pub trait MemberDirectory: Send + Sync {
    async fn select(&self, order: SortOrder) -> Result<Vec<Member>, ApiError>;

    async fn insert(&self, member: &Member) -> Result<Member, ApiError>;

    async fn update(&self, id: &str, patch: &MemberPatch) -> Result<Option<Member>, ApiError>;

    async fn delete(&self, id: &str) -> Result<bool, ApiError>;

    /// Insert or overwrite by id in a single request.
    async fn upsert(&self, members: &[Member]) -> Result<Vec<Member>, ApiError>;
}
