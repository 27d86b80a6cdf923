use destructure::Destructure;
use vodca::References;

use crate::entity::{Role, UserId};

/// Already-authenticated identity on whose behalf an operation runs.
#[derive(Debug, Clone, Eq, PartialEq, References, Destructure)]
pub struct Actor {
    user_id: UserId,
    role: Role,
}

impl Actor {
    pub fn new(user_id: UserId, role: Role) -> Self {
        Self { user_id, role }
    }

    pub fn is_lender(&self) -> bool {
        self.role == Role::Lender
    }
}
