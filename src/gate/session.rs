use serde::Serialize;

/// Per-session settings passed into every access evaluation.
///
/// Owned by the page controller. Nothing here is persisted; a new session
/// always starts with the override off.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize)]
pub struct SessionContext {
    /// Developer mode: treat the access window as always open
    pub override_enabled: bool,
}

impl SessionContext {
    pub fn with_override(override_enabled: bool) -> Self {
        Self { override_enabled }
    }

    /// Flip the override flag and return its new value
    pub fn toggle_override(&mut self) -> bool {
        self.override_enabled = !self.override_enabled;
        self.override_enabled
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn new_session_starts_with_override_off() {
        assert!(!SessionContext::default().override_enabled);
    }

    #[test]
    fn toggle_override_flips_and_reports_new_value() {
        let mut session = SessionContext::default();
        assert!(session.toggle_override());
        assert!(session.override_enabled);
        assert!(!session.toggle_override());
        assert!(!session.override_enabled);
    }
}
