use error_stack::Report;
use serde::{Deserialize, Serialize};
use vodca::{AsRefln, Fromln};

use crate::KernelError;

#[derive(Debug, Clone, Copy, Eq, PartialEq, Serialize, Deserialize, Fromln, AsRefln)]
pub struct FeedbackRating(i16);

impl FeedbackRating {
    pub const MIN: i16 = 1;
    pub const MAX: i16 = 5;

    pub fn new(rating: impl Into<i16>) -> error_stack::Result<Self, KernelError> {
        let rating = rating.into();
        if !(Self::MIN..=Self::MAX).contains(&rating) {
            return Err(Report::new(KernelError::Validation).attach_printable(format!(
                "rating must be between {} and {}, got {rating}",
                Self::MIN,
                Self::MAX
            )));
        }
        Ok(Self(rating))
    }
}

#[cfg(test)]
mod test {
    use crate::entity::FeedbackRating;

    #[test]
    fn bounds_are_inclusive() {
        assert!(FeedbackRating::new(1i16).is_ok());
        assert!(FeedbackRating::new(5i16).is_ok());
        assert!(FeedbackRating::new(0i16).is_err());
        assert!(FeedbackRating::new(6i16).is_err());
    }
}
