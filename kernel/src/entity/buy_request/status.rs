use std::fmt::{Display, Formatter};
use std::str::FromStr;

use error_stack::Report;
use serde::{Deserialize, Serialize};

use crate::entity::{normalize_status, unknown_status};
use crate::KernelError;

#[derive(Debug, Clone, Copy, Eq, PartialEq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum BuyRequestStatus {
    Pending,
    Approved,
    Rejected,
}

impl BuyRequestStatus {
    pub fn as_str(&self) -> &'static str {
        match self {
            BuyRequestStatus::Pending => "pending",
            BuyRequestStatus::Approved => "approved",
            BuyRequestStatus::Rejected => "rejected",
        }
    }

    /// Approved and Rejected are never revisited.
    pub fn is_terminal(&self) -> bool {
        !matches!(self, BuyRequestStatus::Pending)
    }
}

impl Display for BuyRequestStatus {
    fn fmt(&self, f: &mut Formatter<'_>) -> std::fmt::Result {
        f.write_str(self.as_str())
    }
}

impl FromStr for BuyRequestStatus {
    type Err = Report<KernelError>;
    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match &*normalize_status(s) {
            "pending" => Ok(BuyRequestStatus::Pending),
            "approved" => Ok(BuyRequestStatus::Approved),
            "rejected" => Ok(BuyRequestStatus::Rejected),
            _ => Err(unknown_status("buy request", s)),
        }
    }
}
