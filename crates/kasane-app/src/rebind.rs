use anyhow::Context;
use kasane_core::hotkey::{Hotkey, HotkeyBinding};

#[derive(Debug, PartialEq, Eq)]
pub enum Rebind {
    Changed(Hotkey),
    /// Escape was pressed, the current binding (if any) stays
    Kept(Option<Hotkey>),
}

/// Run the capture flow for a new combination against the stored one
pub fn rebind(current: &str, pressed: &str) -> anyhow::Result<Rebind> {
    let previous = match Hotkey::parse(current) {
        Ok(hotkey) => Some(hotkey),
        Err(e) => {
            tracing::warn!("Stored hotkey '{current}' is invalid ({e}), treating as unbound");
            None
        }
    };

    let pressed = Hotkey::parse(pressed).with_context(|| format!("Invalid hotkey '{pressed}'"))?;
    let cancelled = pressed.is_escape();

    let mut binding = HotkeyBinding::default();
    if let Some(previous) = previous.clone() {
        binding = binding.bind(previous);
    }
    let binding = binding.begin_capture().key_pressed(pressed);

    match binding.bound() {
        Some(hotkey) if !cancelled => {
            // Must also be expressible as an OS-level hotkey
            kasane_ocr::to_global(hotkey)?;
            Ok(Rebind::Changed(hotkey.clone()))
        }
        bound => Ok(Rebind::Kept(bound.cloned())),
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn new_combination_replaces_stored_one() {
        let result = rebind("ctrl+alt+t", "Shift + Ctrl + S").unwrap();
        assert_eq!(result, Rebind::Changed(Hotkey::parse("ctrl+shift+s").unwrap()));
    }

    #[test]
    fn escape_keeps_current_binding() {
        let result = rebind("ctrl+alt+t", "escape").unwrap();
        assert_eq!(
            result,
            Rebind::Kept(Some(Hotkey::parse("ctrl+alt+t").unwrap()))
        );
    }

    #[test]
    fn escape_without_binding_leaves_none() {
        assert_eq!(rebind("", "escape").unwrap(), Rebind::Kept(None));
    }

    #[test]
    fn modifier_only_is_rejected() {
        assert!(rebind("ctrl+alt+t", "ctrl+alt").is_err());
    }
}
