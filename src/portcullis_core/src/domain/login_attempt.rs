use std::fmt;

use chrono::{DateTime, Utc};
use serde::Serialize;
use uuid::Uuid;

use super::member::MemberId;

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
pub enum LoginAttemptStatus {
    Success,
    Failure,
}

impl LoginAttemptStatus {
    pub fn as_str(&self) -> &'static str {
        match self {
            LoginAttemptStatus::Success => "Success",
            LoginAttemptStatus::Failure => "Failure",
        }
    }
}

impl fmt::Display for LoginAttemptStatus {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

/// Audit row for one authentication call. Written once, never updated.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct LoginAttempt {
    id: Uuid,
    #[serde(rename = "memberID")]
    member_id: Option<MemberId>,
    email: String,
    #[serde(rename = "ip")]
    ip: String,
    status: LoginAttemptStatus,
    created_at: DateTime<Utc>,
}

impl LoginAttempt {
    pub fn new(
        status: LoginAttemptStatus,
        member_id: Option<MemberId>,
        email: impl Into<String>,
        ip: impl Into<String>,
    ) -> Self {
        Self {
            id: Uuid::new_v4(),
            member_id,
            email: email.into(),
            ip: ip.into(),
            status,
            created_at: Utc::now(),
        }
    }

    pub fn id(&self) -> Uuid {
        self.id
    }

    pub fn member_id(&self) -> Option<MemberId> {
        self.member_id
    }

    pub fn email(&self) -> &str {
        &self.email
    }

    pub fn ip(&self) -> &str {
        &self.ip
    }

    pub fn status(&self) -> LoginAttemptStatus {
        self.status
    }

    pub fn created_at(&self) -> DateTime<Utc> {
        self.created_at
    }
}
