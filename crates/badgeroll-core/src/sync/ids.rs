//! Member identifiers and registration timestamps.

use std::sync::{Mutex, PoisonError};

use chrono::{DateTime, Utc};
use rand::Rng;

const ID_PREFIX: &str = "member";

/// Length of the random suffix of a member id
const ID_SUFFIX_LEN: usize = 9;

const BASE36: &[u8] = b"0123456789abcdefghijklmnopqrstuvwxyz";

/// `member_<unix-millis>_<9 base36 chars>`
pub fn generate_id() -> String {
    let mut rng = rand::thread_rng();
    let suffix: String = (0..ID_SUFFIX_LEN)
        .map(|_| BASE36[rng.gen_range(0..BASE36.len())] as char)
        .collect();
    format!("{}_{}_{}", ID_PREFIX, Utc::now().timestamp_millis(), suffix)
}

/// Hands out registration timestamps that never go backwards, even if the
/// system clock does.
#[derive(Debug, Default)]
pub struct RegistrationClock {
    last: Mutex<Option<DateTime<Utc>>>,
}

impl RegistrationClock {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn next(&self) -> DateTime<Utc> {
        self.advance(Utc::now())
    }

    fn advance(&self, now: DateTime<Utc>) -> DateTime<Utc> {
        let mut last = self.last.lock().unwrap_or_else(PoisonError::into_inner);
        let issued = match *last {
            Some(previous) if previous > now => previous,
            _ => now,
        };
        *last = Some(issued);
        issued
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use chrono::Duration;
    use std::collections::HashSet;

    #[test]
    fn test_id_format() {
        let id = generate_id();
        let parts: Vec<&str> = id.split('_').collect();
        assert_eq!(parts.len(), 3);
        assert_eq!(parts[0], "member");
        assert!(parts[1].parse::<i64>().is_ok());
        assert_eq!(parts[2].len(), 9);
        assert!(parts[2].chars().all(|c| c.is_ascii_digit() || c.is_ascii_lowercase()));
    }

    #[test]
    fn test_ids_are_distinct() {
        let ids: HashSet<String> = (0..1000).map(|_| generate_id()).collect();
        assert_eq!(ids.len(), 1000);
    }

    #[test]
    fn test_clock_never_goes_backwards() {
        let clock = RegistrationClock::new();
        let t0 = Utc::now();
        assert_eq!(clock.advance(t0), t0);
        // System clock stepped back a minute
        assert_eq!(clock.advance(t0 - Duration::minutes(1)), t0);
        let later = t0 + Duration::seconds(5);
        assert_eq!(clock.advance(later), later);
    }
}
