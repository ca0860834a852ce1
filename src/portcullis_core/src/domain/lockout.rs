use chrono::{DateTime, Duration, Utc};
use serde::Deserialize;

/// How many consecutive failures lock an account, and for how long.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Deserialize)]
#[serde(default)]
pub struct LockoutPolicy {
    /// Zero disables lockout entirely.
    pub after_incorrect_logins: u32,
    pub delay_minutes: u32,
}

impl Default for LockoutPolicy {
    fn default() -> Self {
        Self {
            after_incorrect_logins: 10,
            delay_minutes: 15,
        }
    }
}

impl LockoutPolicy {
    pub fn disabled() -> Self {
        Self {
            after_incorrect_logins: 0,
            ..Self::default()
        }
    }

    pub fn is_enabled(&self) -> bool {
        self.after_incorrect_logins > 0
    }

    pub fn locked_until(&self, now: DateTime<Utc>) -> DateTime<Utc> {
        now + Duration::minutes(i64::from(self.delay_minutes))
    }
}
