use error_stack::Report;

use crate::KernelError;

/// Lowercases and folds `' '` / `'-'` into `'_'` so that both `"Return Requested"`
/// and `"return_requested"` name the same status.
pub(crate) fn normalize_status(raw: &str) -> String {
    raw.trim()
        .chars()
        .map(|c| match c {
            ' ' | '-' => '_',
            c => c.to_ascii_lowercase(),
        })
        .collect()
}

pub(crate) fn unknown_status(kind: &str, raw: &str) -> Report<KernelError> {
    Report::new(KernelError::Validation).attach_printable(format!("unknown {kind} status: {raw:?}"))
}
