use serde::{Deserialize, Serialize};
use std::fmt;

#[derive(Debug, Serialize, Deserialize, PartialEq, Eq, Clone, Copy)]
#[serde(rename_all = "snake_case")]
pub enum VerdictStatus {
    Approved,
    NotApproved,
}

impl fmt::Display for VerdictStatus {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            VerdictStatus::Approved => f.write_str("approved"),
            VerdictStatus::NotApproved => f.write_str("not_approved"),
        }
    }
}

/// Outcome of a payment check, shown to the person claiming the payment.
///
/// Rejections are ordinary verdicts, not errors.
#[derive(Debug, Serialize, Deserialize, PartialEq, Eq, Clone)]
pub struct Verdict {
    pub status: VerdictStatus,
    pub message: String,
}

impl Verdict {
    pub fn approved(message: impl Into<String>) -> Self {
        Self {
            status: VerdictStatus::Approved,
            message: message.into(),
        }
    }

    pub fn not_approved(message: impl Into<String>) -> Self {
        Self {
            status: VerdictStatus::NotApproved,
            message: message.into(),
        }
    }

    pub fn is_approved(&self) -> bool {
        self.status == VerdictStatus::Approved
    }
}
