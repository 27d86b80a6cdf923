use error_stack::Report;
use serde::{Deserialize, Serialize};
use vodca::{AsRefln, Fromln};

use crate::KernelError;

#[derive(Debug, Clone, Eq, PartialEq, Serialize, Deserialize, Fromln, AsRefln)]
pub struct FeedbackText(String);

impl FeedbackText {
    pub const MAX_CHARS: usize = 1000;

    pub fn new(text: impl Into<String>) -> error_stack::Result<Self, KernelError> {
        let text = text.into().trim().to_string();
        let chars = text.chars().count();
        if chars == 0 || chars > Self::MAX_CHARS {
            return Err(Report::new(KernelError::Validation).attach_printable(format!(
                "feedback text must be 1..={} characters, got {chars}",
                Self::MAX_CHARS
            )));
        }
        Ok(Self(text))
    }
}
