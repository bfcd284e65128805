use std::str::FromStr;

use anyhow::{Context, Result, anyhow};
use global_hotkey::{GlobalHotKeyEvent, GlobalHotKeyManager, HotKeyState, hotkey::HotKey};
use kasane_core::hotkey::Hotkey;

/// Global hotkey registered with the OS for as long as this value lives
pub struct HotkeyManager {
    manager: GlobalHotKeyManager,
    hotkey: HotKey,
    combination: Hotkey,
}

impl HotkeyManager {
    pub fn register(combination: &Hotkey) -> Result<Self> {
        let manager = GlobalHotKeyManager::new().context("Failed to create hotkey manager")?;
        let hotkey = to_global(combination)?;

        manager
            .register(hotkey)
            .with_context(|| format!("Failed to register hotkey {combination}"))?;

        tracing::info!("Registered global hotkey {combination}");
        Ok(Self {
            manager,
            hotkey,
            combination: combination.clone(),
        })
    }

    /// Check if hotkey was pressed (non-blocking)
    pub fn poll(&self) -> bool {
        let receiver = GlobalHotKeyEvent::receiver();
        while let Ok(event) = receiver.try_recv() {
            if event.id != self.hotkey.id() {
                tracing::debug!(
                    "Hotkey event with foreign ID. Got: {:?}, Expected: {:?}",
                    event.id,
                    self.hotkey.id()
                );
                continue;
            }
            if event.state == HotKeyState::Pressed {
                return true;
            }
        }
        false
    }

    /// Wait for hotkey press (blocking)
    pub fn wait(&self) -> Result<()> {
        let receiver = GlobalHotKeyEvent::receiver();
        loop {
            let event = receiver.recv().context("Failed to receive event")?;
            if event.id == self.hotkey.id() && event.state == HotKeyState::Pressed {
                return Ok(());
            }
        }
    }

    pub fn combination(&self) -> &Hotkey {
        &self.combination
    }
}

impl Drop for HotkeyManager {
    fn drop(&mut self) {
        if let Err(e) = self.manager.unregister(self.hotkey) {
            tracing::warn!("Failed to unregister hotkey {}: {e}", self.combination);
        }
    }
}

/// Convert to the `global-hotkey` representation (e.g. `ctrl+alt+t` → Ctrl+Alt+KeyT)
pub fn to_global(combination: &Hotkey) -> Result<HotKey> {
    let text = combination.to_string();
    HotKey::from_str(&text).map_err(|e| anyhow!("Unsupported hotkey '{text}': {e}"))
}

#[cfg(test)]
mod tests {
    use super::*;
    use global_hotkey::hotkey::{Code, Modifiers};

    #[test]
    fn converts_default_combination() {
        let hotkey = to_global(&Hotkey::parse("ctrl+alt+t").unwrap()).unwrap();
        let expected = HotKey::new(Some(Modifiers::CONTROL | Modifiers::ALT), Code::KeyT);
        assert_eq!(hotkey, expected);
    }

    #[test]
    fn converts_function_key() {
        let hotkey = to_global(&Hotkey::parse("F9").unwrap()).unwrap();
        assert_eq!(hotkey, HotKey::new(None, Code::F9));
    }

    #[test]
    fn rejects_unknown_key() {
        assert!(to_global(&Hotkey::parse("ctrl+notakey").unwrap()).is_err());
    }
}
