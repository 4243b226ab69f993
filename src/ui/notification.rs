use std::time::Duration;
use tokio::time::Instant;

/// How long a notification stays on screen
pub const DEFAULT_NOTIFICATION_DURATION: Duration = Duration::from_secs(3);

/// Banner colour
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Accent {
    Activated,
    Deactivated,
}

impl Accent {
    /// Terminal background: indigo when activated, pink when deactivated
    pub fn ansi(&self) -> &'static str {
        match self {
            Accent::Activated => "\x1b[48;2;88;86;214m",
            Accent::Deactivated => "\x1b[48;2;236;64;122m",
        }
    }
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Notification {
    pub message: String,
    pub accent: Accent,
}

impl Notification {
    /// Banner shown after the developer mode shortcut
    pub fn override_changed(enabled: bool) -> Self {
        if enabled {
            Self {
                message: "🔧 Developer Mode Activated".to_string(),
                accent: Accent::Activated,
            }
        } else {
            Self {
                message: "🔒 Developer Mode Deactivated".to_string(),
                accent: Accent::Deactivated,
            }
        }
    }
}

/// Transient notification slot with auto-dismiss.
///
/// Showing a new notification replaces the current one and restarts the
/// timer.
#[derive(Debug)]
pub struct NotificationBanner {
    duration: Duration,
    current: Option<(Notification, Instant)>,
}

impl NotificationBanner {
    pub fn new(duration: Duration) -> Self {
        Self {
            duration,
            current: None,
        }
    }

    pub fn show(&mut self, notification: Notification, now: Instant) {
        self.current = Some((notification, now + self.duration));
    }

    pub fn expires_at(&self) -> Option<Instant> {
        self.current.as_ref().map(|(_, at)| *at)
    }

    /// Clear the notification if its time is up. Returns true if cleared.
    pub fn dismiss_if_due(&mut self, now: Instant) -> bool {
        match self.expires_at() {
            Some(at) if now >= at => {
                self.current = None;
                true
            }
            _ => false,
        }
    }
}

impl Default for NotificationBanner {
    fn default() -> Self {
        Self::new(DEFAULT_NOTIFICATION_DURATION)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn override_messages_match_state() {
        let on = Notification::override_changed(true);
        assert!(on.message.contains("Activated"));
        assert_eq!(on.accent, Accent::Activated);

        let off = Notification::override_changed(false);
        assert!(off.message.contains("Deactivated"));
        assert_eq!(off.accent, Accent::Deactivated);
        assert_ne!(on.accent.ansi(), off.accent.ansi());
    }

    #[test]
    fn banner_dismisses_after_duration() {
        let start = Instant::now();
        let mut banner = NotificationBanner::default();
        banner.show(Notification::override_changed(true), start);

        assert!(!banner.dismiss_if_due(start + Duration::from_millis(2_999)));
        assert!(banner.current.is_some());

        assert!(banner.dismiss_if_due(start + Duration::from_secs(3)));
        assert!(banner.current.is_none());
        assert!(!banner.dismiss_if_due(start + Duration::from_secs(4)));
    }

    #[test]
    fn new_notification_restarts_timer() {
        let start = Instant::now();
        let mut banner = NotificationBanner::default();
        banner.show(Notification::override_changed(true), start);
        banner.show(Notification::override_changed(false), start + Duration::from_secs(2));

        assert_eq!(banner.expires_at(), Some(start + Duration::from_secs(5)));
        assert_eq!(banner.current.as_ref().unwrap().0.accent, Accent::Deactivated);
    }
}
