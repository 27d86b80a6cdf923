use std::fmt::{Display, Formatter};
use std::str::FromStr;

use error_stack::Report;
use serde::{Deserialize, Serialize};

use crate::entity::{normalize_status, unknown_status};
use crate::KernelError;

#[derive(Debug, Clone, Copy, Eq, PartialEq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum OrderStatus {
    InUse,
    ReturnRequested,
    Returned,
}

impl OrderStatus {
    pub fn as_str(&self) -> &'static str {
        match self {
            OrderStatus::InUse => "in_use",
            OrderStatus::ReturnRequested => "return_requested",
            OrderStatus::Returned => "returned",
        }
    }

    /// InUse -> ReturnRequested -> Returned. Nothing moves backwards or skips.
    pub fn can_transition_to(&self, next: &OrderStatus) -> bool {
        matches!(
            (self, next),
            (OrderStatus::InUse, OrderStatus::ReturnRequested)
                | (OrderStatus::ReturnRequested, OrderStatus::Returned)
        )
    }

    pub fn is_terminal(&self) -> bool {
        matches!(self, OrderStatus::Returned)
    }
}

impl Display for OrderStatus {
    fn fmt(&self, f: &mut Formatter<'_>) -> std::fmt::Result {
        f.write_str(self.as_str())
    }
}

impl FromStr for OrderStatus {
    type Err = Report<KernelError>;
    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match &*normalize_status(s) {
            "in_use" => Ok(OrderStatus::InUse),
            "return_requested" => Ok(OrderStatus::ReturnRequested),
            "returned" => Ok(OrderStatus::Returned),
            _ => Err(unknown_status("order", s)),
        }
    }
}

#[cfg(test)]
mod test {
    use crate::entity::OrderStatus;

    #[test]
    fn transitions_are_monotonic() {
        use OrderStatus::*;
        assert!(InUse.can_transition_to(&ReturnRequested));
        assert!(ReturnRequested.can_transition_to(&Returned));

        assert!(!InUse.can_transition_to(&Returned));
        assert!(!ReturnRequested.can_transition_to(&InUse));
        assert!(!Returned.can_transition_to(&ReturnRequested));
        assert!(!Returned.can_transition_to(&InUse));
        assert!(!InUse.can_transition_to(&InUse));
    }

    #[test]
    fn parse_accepts_display_names() {
        assert_eq!(
            "Return Requested".parse::<OrderStatus>().ok(),
            Some(OrderStatus::ReturnRequested)
        );
        assert_eq!("In Use".parse::<OrderStatus>().ok(), Some(OrderStatus::InUse));
        assert_eq!("returned".parse::<OrderStatus>().ok(), Some(OrderStatus::Returned));
        assert!("lost".parse::<OrderStatus>().is_err());
    }
}
