//! Player settings and preferences
//!
//! Persisted in LocalStorage; scene state itself is never saved.

use serde::{Deserialize, Serialize};

/// Settings/preferences
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct Settings {
    // === Audio ===
    /// Master volume (0.0 - 1.0)
    pub master_volume: f32,
    /// Sound effects volume (0.0 - 1.0)
    pub sfx_volume: f32,
    /// Mute when the tab loses focus
    pub mute_on_blur: bool,

    // === Accessibility ===
    /// Reduced motion (minimize pulse throb and cursor lag effects)
    pub reduced_motion: bool,
    /// Cap flicker effects for photosensitive players
    pub reduced_flicker: bool,
    /// Show text captions for audio cues
    pub captions: bool,
}

impl Default for Settings {
    fn default() -> Self {
        Self {
            master_volume: 0.8,
            sfx_volume: 1.0,
            mute_on_blur: true,

            reduced_motion: false,
            reduced_flicker: false,
            captions: false,
        }
    }
}

impl Settings {
    /// Pulse amplitude scale (respects reduced_motion)
    pub fn pulse_scale(&self) -> f32 {
        if self.reduced_motion { 0.3 } else { 1.0 }
    }

    /// Whether flicker-heavy themes may flash at full strength
    pub fn allow_flicker(&self) -> bool {
        !self.reduced_flicker
    }

    /// LocalStorage key
    const STORAGE_KEY: &'static str = "nightshift_settings";

    /// Load settings from LocalStorage (WASM only)
    #[cfg(target_arch = "wasm32")]
    pub fn load() -> Self {
        let storage = web_sys::window()
            .and_then(|w| w.local_storage().ok())
            .flatten();

        if let Some(storage) = storage {
            if let Ok(Some(json)) = storage.get_item(Self::STORAGE_KEY) {
                if let Ok(settings) = serde_json::from_str(&json) {
                    log::info!("Loaded settings from LocalStorage");
                    return settings;
                }
            }
        }

        log::info!("Using default settings");
        Self::default()
    }

    /// Save settings to LocalStorage (WASM only)
    #[cfg(target_arch = "wasm32")]
    pub fn save(&self) {
        let storage = web_sys::window()
            .and_then(|w| w.local_storage().ok())
            .flatten();

        if let Some(storage) = storage {
            if let Ok(json) = serde_json::to_string(self) {
                let _ = storage.set_item(Self::STORAGE_KEY, &json);
                log::info!("Settings saved");
            }
        }
    }

    /// Native stubs
    #[cfg(not(target_arch = "wasm32"))]
    pub fn load() -> Self {
        Self::default()
    }

    #[cfg(not(target_arch = "wasm32"))]
    pub fn save(&self) {
        // No-op for native
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_defaults_round_trip_through_json() {
        let settings = Settings::default();
        let json = serde_json::to_string(&settings).unwrap();
        let back: Settings = serde_json::from_str(&json).unwrap();
        assert_eq!(back.master_volume, settings.master_volume);
        assert_eq!(back.reduced_motion, settings.reduced_motion);
    }

    #[test]
    fn test_reduced_motion_dampens_the_pulse() {
        let mut settings = Settings::default();
        assert_eq!(settings.pulse_scale(), 1.0);
        settings.reduced_motion = true;
        assert!(settings.pulse_scale() < 1.0);
    }
}
