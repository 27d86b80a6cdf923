use std::fmt::{Display, Formatter};
use std::str::FromStr;

use error_stack::Report;
use serde::{Deserialize, Serialize};

use crate::entity::{normalize_status, unknown_status};
use crate::KernelError;

#[derive(Debug, Clone, Copy, Eq, PartialEq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum ReturnRequestStatus {
    Pending,
    Approved,
    Rejected,
}

impl ReturnRequestStatus {
    pub fn as_str(&self) -> &'static str {
        match self {
            ReturnRequestStatus::Pending => "pending",
            ReturnRequestStatus::Approved => "approved",
            ReturnRequestStatus::Rejected => "rejected",
        }
    }

    pub fn is_terminal(&self) -> bool {
        !matches!(self, ReturnRequestStatus::Pending)
    }
}

impl Display for ReturnRequestStatus {
    fn fmt(&self, f: &mut Formatter<'_>) -> std::fmt::Result {
        f.write_str(self.as_str())
    }
}

impl FromStr for ReturnRequestStatus {
    type Err = Report<KernelError>;
    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match &*normalize_status(s) {
            "pending" => Ok(ReturnRequestStatus::Pending),
            "approved" => Ok(ReturnRequestStatus::Approved),
            "rejected" => Ok(ReturnRequestStatus::Rejected),
            _ => Err(unknown_status("return request", s)),
        }
    }
}
