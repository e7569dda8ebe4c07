/// Confirmation seam for destructive operations. The presentation layer
/// supplies the real prompt; the store only ever sees yes/no.
pub trait ConfirmationPrompt {
    fn confirm(&self, message: &str) -> bool;
}

/// Confirms everything. Used for `--yes` and in tests.
pub struct AssumeYes;

impl ConfirmationPrompt for AssumeYes {
    fn confirm(&self, _message: &str) -> bool {
        true
    }
}

/// Declines everything.
pub struct DenyAll;

impl ConfirmationPrompt for DenyAll {
    fn confirm(&self, _message: &str) -> bool {
        false
    }
}

#[cfg(test)]
mod tests {
    use super::{AssumeYes, ConfirmationPrompt, DenyAll};

    #[test]
    fn assume_yes_confirms() {
        assert!(AssumeYes.confirm("Delete task \"demo\"?"));
    }

    #[test]
    fn deny_all_declines() {
        assert!(!DenyAll.confirm("Delete task \"demo\"?"));
    }
}
