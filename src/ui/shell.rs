use std::collections::{HashMap, HashSet};
use std::io::Write;

use crate::ui::frame::EmbeddedFrame;
use crate::ui::notification::Notification;

/// Named views of the page
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum View {
    Welcome,
    Dashboard,
    BackButton,
    Waiting,
    Main,
    Notification,
}

/// Named text labels of the page
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum Label {
    WelcomeClock,
    WelcomePeriod,
    CurrentDate,
    StatusTime,
    StatusDate,
    Countdown,
}

/// Rendering surface driven by the page controller
pub trait UiShell: Send {
    fn set_visible(&mut self, view: View, visible: bool);
    fn set_text(&mut self, label: Label, text: &str);
    fn show_notification(&mut self, notification: &Notification);
    fn replace_frame(&mut self, frame: &EmbeddedFrame);
}

/// What the page currently looks like
#[derive(Debug, Clone, Default)]
pub struct ShellModel {
    pub visible: HashSet<View>,
    pub text: HashMap<Label, String>,
    pub frame_src: Option<String>,
    pub notification: Option<String>,
}

impl ShellModel {
    pub fn is_visible(&self, view: View) -> bool {
        self.visible.contains(&view)
    }

    pub fn text(&self, label: Label) -> Option<&str> {
        self.text.get(&label).map(String::as_str)
    }

    /// Apply a visibility change, returning true if anything changed
    fn apply_visible(&mut self, view: View, visible: bool) -> bool {
        let changed = if visible {
            self.visible.insert(view)
        } else {
            self.visible.remove(&view)
        };
        if view == View::Notification && !visible {
            self.notification = None;
        }
        changed
    }

    fn apply_text(&mut self, label: Label, text: &str) -> bool {
        if self.text(label) == Some(text) {
            return false;
        }
        self.text.insert(label, text.to_string());
        true
    }
}

/// Plain terminal renderer.
///
/// Writes one line per visible change; clock and countdown updates redraw
/// the current line in place.
pub struct TerminalShell<W: Write + Send> {
    out: W,
    model: ShellModel,
    /// True while the cursor sits on a redrawable status line
    status_line: bool,
}

impl TerminalShell<std::io::Stdout> {
    pub fn stdout() -> Self {
        Self::new(std::io::stdout())
    }
}

impl<W: Write + Send> TerminalShell<W> {
    pub fn new(out: W) -> Self {
        Self {
            out,
            model: ShellModel::default(),
            status_line: false,
        }
    }

    fn line(&mut self, text: &str) {
        if self.status_line {
            let _ = writeln!(self.out);
            self.status_line = false;
        }
        if let Err(e) = writeln!(self.out, "{}", text) {
            tracing::debug!("Terminal write failed: {}", e);
        }
    }

    fn redraw(&mut self, text: &str) {
        // Erase the line and rewrite it without moving down
        if let Err(e) = write!(self.out, "\r\x1b[2K{}", text).and_then(|_| self.out.flush()) {
            tracing::debug!("Terminal write failed: {}", e);
        }
        self.status_line = true;
    }

    fn heading(view: View) -> Option<&'static str> {
        match view {
            View::Welcome => Some("== Welcome == (type 'enter' to open the dashboard)"),
            View::Dashboard => Some("== Dashboard == (type 'back', 'refresh' or ctrl+shift+d)"),
            View::Waiting => Some("-- Dashboard closed, opens daily 03:00 PM - 05:00 PM IST --"),
            View::Main => Some("-- Dashboard open --"),
            View::BackButton | View::Notification => None,
        }
    }

    fn status_text(&self) -> Option<String> {
        let text = |label| self.model.text(label).unwrap_or("");
        if self.model.is_visible(View::Welcome) {
            Some(format!(
                "{} {}  {}",
                text(Label::WelcomeClock),
                text(Label::WelcomePeriod),
                text(Label::CurrentDate)
            ))
        } else if self.model.is_visible(View::Waiting) {
            Some(format!("Opens in {}", text(Label::Countdown)))
        } else if self.model.is_visible(View::Main) {
            Some(format!("{}  {}", text(Label::StatusTime), text(Label::StatusDate)))
        } else {
            None
        }
    }
}

impl<W: Write + Send> UiShell for TerminalShell<W> {
    fn set_visible(&mut self, view: View, visible: bool) {
        if !self.model.apply_visible(view, visible) || !visible {
            return;
        }
        if let Some(heading) = Self::heading(view) {
            self.line(heading);
        }
    }

    fn set_text(&mut self, label: Label, text: &str) {
        if !self.model.apply_text(label, text) {
            return;
        }
        if let Some(status) = self.status_text() {
            self.redraw(&status);
        }
    }

    fn show_notification(&mut self, notification: &Notification) {
        self.model.apply_visible(View::Notification, true);
        self.model.notification = Some(notification.message.clone());
        self.line(&format!("{}[ {} ]\x1b[0m", notification.accent.ansi(), notification.message));
    }

    fn replace_frame(&mut self, frame: &EmbeddedFrame) {
        self.model.frame_src = Some(frame.src().to_string());
        self.line(&format!("Visualization: {}", frame.src()));
    }
}

/// Shell that only records the page model, for controller tests
#[cfg(test)]
#[derive(Clone, Default)]
pub struct RecordingShell {
    pub model: std::sync::Arc<std::sync::Mutex<ShellModel>>,
    pub frames: std::sync::Arc<std::sync::Mutex<Vec<String>>>,
}

#[cfg(test)]
impl RecordingShell {
    pub fn snapshot(&self) -> ShellModel {
        self.model.lock().unwrap().clone()
    }
}

#[cfg(test)]
impl UiShell for RecordingShell {
    fn set_visible(&mut self, view: View, visible: bool) {
        self.model.lock().unwrap().apply_visible(view, visible);
    }

    fn set_text(&mut self, label: Label, text: &str) {
        self.model.lock().unwrap().apply_text(label, text);
    }

    fn show_notification(&mut self, notification: &Notification) {
        let mut model = self.model.lock().unwrap();
        model.apply_visible(View::Notification, true);
        model.notification = Some(notification.message.clone());
    }

    fn replace_frame(&mut self, frame: &EmbeddedFrame) {
        self.model.lock().unwrap().frame_src = Some(frame.src().to_string());
        self.frames.lock().unwrap().push(frame.src().to_string());
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn output(shell: TerminalShell<Vec<u8>>) -> String {
        String::from_utf8(shell.out).unwrap()
    }

    #[test]
    fn visible_views_print_headings_once() {
        let mut shell = TerminalShell::new(Vec::new());
        shell.set_visible(View::Welcome, true);
        shell.set_visible(View::Welcome, true);

        let out = output(shell);
        assert_eq!(out.matches("== Welcome ==").count(), 1);
    }

    #[test]
    fn countdown_redraws_in_place() {
        let mut shell = TerminalShell::new(Vec::new());
        shell.set_visible(View::Waiting, true);
        shell.set_text(Label::Countdown, "00:00:02");
        shell.set_text(Label::Countdown, "00:00:01");
        assert_eq!(shell.model.text(Label::Countdown), Some("00:00:01"));

        let out = output(shell);
        assert!(out.contains("\r\x1b[2KOpens in 00:00:02"));
        assert!(out.contains("\r\x1b[2KOpens in 00:00:01"));
    }

    #[test]
    fn hiding_notification_clears_message() {
        let mut shell = TerminalShell::new(Vec::new());
        shell.show_notification(&Notification::override_changed(true));
        assert!(shell.model.notification.is_some());

        shell.set_visible(View::Notification, false);
        assert!(shell.model.notification.is_none());
        assert!(!shell.model.is_visible(View::Notification));
    }
}
