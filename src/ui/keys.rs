use anyhow::{Result, bail};
use std::str::FromStr;

/// User input understood by the page controller
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Action {
    /// "Enter" button on the welcome page
    Enter,
    /// "Back" button on the dashboard page
    Back,
    /// Reload the embedded visualization
    Refresh,
    /// Developer mode shortcut
    ToggleOverride,
    Quit,
}

/// A key press with its modifiers, as a browser would report it
#[derive(Debug, Clone, PartialEq, Eq, Default)]
pub struct KeyCombo {
    pub ctrl: bool,
    pub meta: bool,
    pub shift: bool,
    pub alt: bool,
    pub key: String,
}

impl KeyCombo {
    /// Ctrl+Shift+D, or Cmd+Shift+D on macOS
    pub fn is_override_toggle(&self) -> bool {
        (self.ctrl || self.meta) && self.shift && self.key == "D"
    }
}

impl FromStr for KeyCombo {
    type Err = anyhow::Error;

    /// Parse `ctrl+shift+d` style text. Modifier names are case-insensitive;
    /// with Shift held a single letter is reported upper-case.
    fn from_str(s: &str) -> Result<Self> {
        let mut combo = KeyCombo::default();
        let parts: Vec<&str> = s.split('+').map(str::trim).collect();

        let Some((key, modifiers)) = parts.split_last() else {
            bail!("Empty key combination");
        };
        if key.is_empty() {
            bail!("Key combination '{}' has no key", s);
        }

        for modifier in modifiers {
            match modifier.to_lowercase().as_str() {
                "ctrl" | "control" => combo.ctrl = true,
                "cmd" | "command" | "meta" | "super" => combo.meta = true,
                "shift" => combo.shift = true,
                "alt" | "option" => combo.alt = true,
                other => bail!("Unknown modifier '{}'", other),
            }
        }

        let is_letter = key.len() == 1 && key.chars().all(|c| c.is_ascii_alphabetic());
        combo.key = if combo.shift && is_letter {
            key.to_ascii_uppercase()
        } else {
            key.to_string()
        };

        Ok(combo)
    }
}

/// Map a line of terminal input to an action
pub fn parse_input(line: &str) -> Option<Action> {
    let line = line.trim();
    match line.to_lowercase().as_str() {
        "" => None,
        "enter" | "e" => Some(Action::Enter),
        "back" | "b" => Some(Action::Back),
        "refresh" | "r" => Some(Action::Refresh),
        "dev" => Some(Action::ToggleOverride),
        "quit" | "q" | "exit" => Some(Action::Quit),
        _ => line
            .parse::<KeyCombo>()
            .ok()
            .filter(KeyCombo::is_override_toggle)
            .map(|_| Action::ToggleOverride),
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn ctrl_shift_d_toggles_override() {
        let combo: KeyCombo = "ctrl+shift+d".parse().unwrap();
        assert_eq!(combo.key, "D");
        assert!(combo.is_override_toggle());
    }

    #[test]
    fn cmd_shift_d_toggles_override() {
        let combo: KeyCombo = "Cmd+Shift+D".parse().unwrap();
        assert!(combo.meta);
        assert!(combo.is_override_toggle());
    }

    #[test]
    fn missing_shift_or_modifier_does_not_toggle() {
        assert!(!"ctrl+d".parse::<KeyCombo>().unwrap().is_override_toggle());
        assert!(!"shift+d".parse::<KeyCombo>().unwrap().is_override_toggle());
        assert!(!"ctrl+shift+e".parse::<KeyCombo>().unwrap().is_override_toggle());
    }

    #[test]
    fn unknown_modifier_is_rejected() {
        assert!("hyper+shift+d".parse::<KeyCombo>().is_err());
        assert!("ctrl+".parse::<KeyCombo>().is_err());
    }

    #[test]
    fn commands_map_to_actions() {
        assert_eq!(parse_input("enter\n"), Some(Action::Enter));
        assert_eq!(parse_input("  B "), Some(Action::Back));
        assert_eq!(parse_input("refresh"), Some(Action::Refresh));
        assert_eq!(parse_input("dev"), Some(Action::ToggleOverride));
        assert_eq!(parse_input("q"), Some(Action::Quit));
        assert_eq!(parse_input("ctrl+shift+d"), Some(Action::ToggleOverride));
    }

    #[test]
    fn other_input_is_ignored() {
        assert_eq!(parse_input(""), None);
        assert_eq!(parse_input("hello"), None);
        assert_eq!(parse_input("ctrl+shift+x"), None);
    }
}
