//! In-memory member table for coordinator tests.

use std::sync::atomic::{AtomicBool, AtomicUsize, Ordering};
use std::sync::Mutex;

use async_trait::async_trait;

use crate::api::{ApiError, MemberDirectory};
use crate::models::{Member, MemberPatch, SortOrder};

#[derive(Default)]
pub struct InMemoryDirectory {
    rows: Mutex<Vec<Member>>,
    unreachable: AtomicBool,
    reject_writes: AtomicBool,
    pub writes: AtomicUsize,
}

impl InMemoryDirectory {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn with_rows(rows: Vec<Member>) -> Self {
        let directory = Self::new();
        *directory.rows.lock().unwrap() = rows;
        directory
    }

    /// Simulate the network going away (or coming back)
    pub fn set_unreachable(&self, unreachable: bool) {
        self.unreachable.store(unreachable, Ordering::SeqCst);
    }

    /// Simulate the server refusing every write
    pub fn set_reject_writes(&self, reject: bool) {
        self.reject_writes.store(reject, Ordering::SeqCst);
    }

    pub fn rows(&self) -> Vec<Member> {
        self.rows.lock().unwrap().clone()
    }

    fn check_reachable(&self) -> Result<(), ApiError> {
        if self.unreachable.load(Ordering::SeqCst) {
            Err(ApiError::NetworkError("connection refused".to_string()))
        } else {
            Ok(())
        }
    }

    fn check_write(&self) -> Result<(), ApiError> {
        self.check_reachable()?;
        if self.reject_writes.load(Ordering::SeqCst) {
            return Err(ApiError::Rejected("Status 400 Bad Request: check constraint".to_string()));
        }
        self.writes.fetch_add(1, Ordering::SeqCst);
        Ok(())
    }
}

/// Shallow merge, the way PostgREST applies a PATCH body
fn apply_patch(member: &mut Member, patch: &MemberPatch) {
    let fields = [
        (&mut member.surname, &patch.surname),
        (&mut member.given_names, &patch.given_names),
        (&mut member.role, &patch.role),
        (&mut member.contact, &patch.contact),
        (&mut member.baptism_date, &patch.baptism_date),
        (&mut member.membership_date, &patch.membership_date),
        (&mut member.photo, &patch.photo),
        (&mut member.qr_code, &patch.qr_code),
    ];
    for (field, value) in fields {
        if let Some(value) = value {
            *field = value.clone();
        }
    }
}

#[async_trait]
impl MemberDirectory for InMemoryDirectory {
    async fn select(&self, order: SortOrder) -> Result<Vec<Member>, ApiError> {
        self.check_reachable()?;
        let mut rows = self.rows();
        rows.sort_by(|a, b| a.registered_at.cmp(&b.registered_at));
        if !order.ascending {
            rows.reverse();
        }
        Ok(rows)
    }

    async fn insert(&self, member: &Member) -> Result<Member, ApiError> {
        self.check_write()?;
        let mut rows = self.rows.lock().unwrap();
        if rows.iter().any(|m| m.id == member.id) {
            return Err(ApiError::Rejected("duplicate key value violates unique constraint".to_string()));
        }
        rows.push(member.clone());
        Ok(member.clone())
    }

    async fn update(&self, id: &str, patch: &MemberPatch) -> Result<Option<Member>, ApiError> {
        self.check_write()?;
        let mut rows = self.rows.lock().unwrap();
        Ok(rows.iter_mut().find(|m| m.id == id).map(|m| {
            apply_patch(m, patch);
            m.clone()
        }))
    }

    async fn delete(&self, id: &str) -> Result<bool, ApiError> {
        self.check_write()?;
        let mut rows = self.rows.lock().unwrap();
        let before = rows.len();
        rows.retain(|m| m.id != id);
        Ok(rows.len() != before)
    }

    async fn upsert(&self, members: &[Member]) -> Result<Vec<Member>, ApiError> {
        self.check_write()?;
        let mut rows = self.rows.lock().unwrap();
        for member in members {
            match rows.iter_mut().find(|m| m.id == member.id) {
                Some(existing) => *existing = member.clone(),
                None => rows.push(member.clone()),
            }
        }
        Ok(members.to_vec())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_apply_patch_only_touches_supplied_fields() {
        let mut member = Member {
            id: "m1".to_string(),
            surname: "Kouassi".to_string(),
            given_names: "Ama".to_string(),
            role: "Choriste".to_string(),
            contact: "0708091011".to_string(),
            baptism_date: "2010-04-04".to_string(),
            membership_date: "2015-01-10".to_string(),
            photo: "data:image/png;base64,AAAA".to_string(),
            qr_code: "tel:+225708091011".to_string(),
            registered_at: "2024-03-01T10:00:00Z".parse().unwrap(),
        };
        let before = member.clone();
        let patch = MemberPatch {
            role: Some("Trésorier".to_string()),
            ..Default::default()
        };
        apply_patch(&mut member, &patch);

        let mut expected = before;
        expected.role = "Trésorier".to_string();
        assert_eq!(member, expected);
    }
}
