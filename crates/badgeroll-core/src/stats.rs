//! Registration counters for the admin dashboard.

use chrono::{Local, NaiveDate};
use serde::{Deserialize, Serialize};

use crate::models::Member;

#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize, Deserialize)]
#[cfg_attr(feature = "ts", derive(ts_rs::TS), ts(export))]
pub struct MemberStats {
    pub total: usize,
    pub registered_today: usize,
}

impl MemberStats {
    /// Count members, and those whose registration falls on `today` in
    /// local time.
    pub fn for_day(members: &[Member], today: NaiveDate) -> Self {
        let registered_today = members
            .iter()
            .filter(|m| m.registered_at.with_timezone(&Local).date_naive() == today)
            .count();

        Self {
            total: members.len(),
            registered_today,
        }
    }
}
