use std::fmt;

const MODIFIERS: &[&str] = &["ctrl", "alt", "shift", "super"];

#[derive(Debug, Clone, PartialEq, Eq, thiserror::Error)]
pub enum HotkeyParseError {
    #[error("hotkey is empty")]
    Empty,
    #[error("hotkey '{0}' has an empty segment")]
    EmptySegment(String),
    #[error("hotkey '{0}' has no non-modifier key")]
    MissingKey(String),
    #[error("hotkey '{0}' has more than one non-modifier key")]
    MultipleKeys(String),
}

/// Normalized key combination such as `ctrl+alt+t`.
///
/// Modifiers are lower-cased, de-duplicated and put in a fixed order
/// (ctrl, alt, shift, super) so equal combinations compare equal.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Hotkey {
    modifiers: Vec<&'static str>,
    key: String,
}

impl Hotkey {
    pub fn parse(input: &str) -> Result<Self, HotkeyParseError> {
        let input = input.trim();
        if input.is_empty() {
            return Err(HotkeyParseError::Empty);
        }

        let mut modifiers = Vec::new();
        let mut key: Option<String> = None;

        for segment in input.split('+') {
            let segment = segment.trim().to_lowercase();
            if segment.is_empty() {
                return Err(HotkeyParseError::EmptySegment(input.to_string()));
            }

            let canonical = match segment.as_str() {
                "control" => "ctrl",
                "option" => "alt",
                "cmd" | "command" | "win" | "meta" => "super",
                other => other,
            };

            if let Some(modifier) = MODIFIERS.iter().find(|m| **m == canonical) {
                if !modifiers.contains(modifier) {
                    modifiers.push(*modifier);
                }
            } else if key.is_some() {
                return Err(HotkeyParseError::MultipleKeys(input.to_string()));
            } else {
                key = Some(canonical.to_string());
            }
        }

        let key = key.ok_or_else(|| HotkeyParseError::MissingKey(input.to_string()))?;
        modifiers.sort_by_key(|m| MODIFIERS.iter().position(|x| x == m));

        Ok(Self { modifiers, key })
    }

    pub fn key(&self) -> &str {
        &self.key
    }

    pub fn modifiers(&self) -> &[&'static str] {
        &self.modifiers
    }

    pub fn is_escape(&self) -> bool {
        self.modifiers.is_empty() && matches!(self.key.as_str(), "esc" | "escape")
    }
}

impl fmt::Display for Hotkey {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        for modifier in &self.modifiers {
            write!(f, "{modifier}+")?;
        }
        write!(f, "{}", self.key)
    }
}

/// Hotkey binding flow: pick up the next key combination the user presses.
///
/// ```text
/// Idle ──begin_capture──▶ AwaitingKey ──key_pressed──▶ Bound
///   ▲                         │ Esc / cancel
///   └──────── previous ◀──────┘
/// ```
#[derive(Debug, Clone, PartialEq, Eq, Default)]
pub enum HotkeyBinding {
    #[default]
    Idle,
    AwaitingKey {
        previous: Option<Hotkey>,
    },
    Bound(Hotkey),
}

impl HotkeyBinding {
    pub fn bound(&self) -> Option<&Hotkey> {
        match self {
            HotkeyBinding::Bound(hotkey) => Some(hotkey),
            _ => None,
        }
    }

    pub fn is_awaiting(&self) -> bool {
        matches!(self, HotkeyBinding::AwaitingKey { .. })
    }

    pub fn bind(self, hotkey: Hotkey) -> Self {
        HotkeyBinding::Bound(hotkey)
    }

    pub fn unbind(self) -> Self {
        HotkeyBinding::Idle
    }

    /// Start listening for a new combination. No-op if already listening
    pub fn begin_capture(self) -> Self {
        match self {
            HotkeyBinding::Idle => HotkeyBinding::AwaitingKey { previous: None },
            HotkeyBinding::Bound(hotkey) => HotkeyBinding::AwaitingKey {
                previous: Some(hotkey),
            },
            awaiting @ HotkeyBinding::AwaitingKey { .. } => awaiting,
        }
    }

    /// Feed a pressed combination. Escape cancels the capture.
    /// Presses outside of capture are ignored.
    pub fn key_pressed(self, pressed: Hotkey) -> Self {
        match self {
            HotkeyBinding::AwaitingKey { previous } if pressed.is_escape() => restore(previous),
            HotkeyBinding::AwaitingKey { .. } => HotkeyBinding::Bound(pressed),
            other => other,
        }
    }

    pub fn cancel(self) -> Self {
        match self {
            HotkeyBinding::AwaitingKey { previous } => restore(previous),
            other => other,
        }
    }
}

fn restore(previous: Option<Hotkey>) -> HotkeyBinding {
    match previous {
        Some(hotkey) => HotkeyBinding::Bound(hotkey),
        None => HotkeyBinding::Idle,
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn hk(s: &str) -> Hotkey {
        Hotkey::parse(s).unwrap()
    }

    #[test]
    fn parse_normalizes() {
        let hotkey = hk(" Shift + CONTROL+alt+T ");
        assert_eq!(hotkey.to_string(), "ctrl+alt+shift+t");
        assert_eq!(hotkey, hk("ctrl+alt+shift+t"));
        assert_eq!(hk("ctrl+ctrl+f9").to_string(), "ctrl+f9");
        assert_eq!(hk("F9").modifiers().len(), 0);
    }

    #[test]
    fn parse_rejects_bad_input() {
        assert_eq!(Hotkey::parse("  "), Err(HotkeyParseError::Empty));
        assert!(matches!(Hotkey::parse("ctrl++t"), Err(HotkeyParseError::EmptySegment(_))));
        assert!(matches!(Hotkey::parse("ctrl+alt"), Err(HotkeyParseError::MissingKey(_))));
        assert!(matches!(Hotkey::parse("a+b"), Err(HotkeyParseError::MultipleKeys(_))));
    }

    #[test]
    fn capture_binds_first_pressed_combo() {
        let state = HotkeyBinding::Idle.begin_capture();
        assert!(state.is_awaiting());

        let state = state.key_pressed(hk("ctrl+shift+s"));
        assert_eq!(state.bound(), Some(&hk("ctrl+shift+s")));
    }

    #[test]
    fn escape_restores_previous_binding() {
        let state = HotkeyBinding::Idle
            .bind(hk("ctrl+alt+t"))
            .begin_capture()
            .key_pressed(hk("esc"));
        assert_eq!(state, HotkeyBinding::Bound(hk("ctrl+alt+t")));

        let state = HotkeyBinding::Idle.begin_capture().key_pressed(hk("Escape"));
        assert_eq!(state, HotkeyBinding::Idle);
    }

    #[test]
    fn ctrl_escape_is_a_combo_not_a_cancel() {
        let state = HotkeyBinding::Idle.begin_capture().key_pressed(hk("ctrl+esc"));
        assert_eq!(state.bound().map(|h| h.to_string()), Some("ctrl+esc".to_string()));
    }

    #[test]
    fn cancel_and_stray_presses() {
        let bound = HotkeyBinding::Bound(hk("f9"));
        assert_eq!(bound.clone().cancel(), bound);
        assert_eq!(bound.clone().key_pressed(hk("f10")), bound);
        assert_eq!(bound.clone().begin_capture().cancel(), bound);
        assert_eq!(bound.unbind(), HotkeyBinding::Idle);
    }

    #[test]
    fn begin_capture_twice_keeps_original_previous() {
        let state = HotkeyBinding::Bound(hk("f9")).begin_capture().begin_capture();
        assert_eq!(state.cancel(), HotkeyBinding::Bound(hk("f9")));
    }
}
