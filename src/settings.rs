//! Player preferences
//!
//! Persisted separately from tuning in LocalStorage.

use serde::{Deserialize, Serialize};

use crate::sim::camera::CameraPrefs;

/// Game settings/preferences
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct Settings {
    // === Camera ===
    /// Orbit radians per pixel of pointer movement
    pub look_sensitivity: f32,
    /// Invert vertical orbit
    pub invert_y: bool,
    /// Combat jitter and landing shake
    pub camera_shake: bool,

    // === HUD ===
    /// Read by the host's DOM HUD only; the simulation ignores it
    pub show_health: bool,

    // === Accessibility ===
    /// Reduced motion (no camera shake)
    pub reduced_motion: bool,
}

impl Default for Settings {
    fn default() -> Self {
        let prefs = CameraPrefs::default();
        Self {
            look_sensitivity: prefs.look_sensitivity,
            invert_y: prefs.invert_y,
            camera_shake: prefs.shake,

            show_health: true,

            reduced_motion: false,
        }
    }
}

impl Settings {
    /// Effective camera shake (respects reduced_motion)
    pub fn effective_camera_shake(&self) -> bool {
        self.camera_shake && !self.reduced_motion
    }

    /// Preferences handed to the camera rig
    pub fn camera_prefs(&self) -> CameraPrefs {
        CameraPrefs {
            look_sensitivity: self.look_sensitivity.max(0.0),
            invert_y: self.invert_y,
            shake: self.effective_camera_shake(),
        }
    }

    /// LocalStorage key
    const STORAGE_KEY: &'static str = "glenblade_settings";

    /// Load settings from LocalStorage (WASM only)
    #[cfg(target_arch = "wasm32")]
    pub fn load() -> Self {
        let storage = web_sys::window()
            .and_then(|w| w.local_storage().ok())
            .flatten();

        if let Some(storage) = storage {
            if let Ok(Some(json)) = storage.get_item(Self::STORAGE_KEY) {
                match serde_json::from_str(&json) {
                    Ok(settings) => {
                        log::info!("Loaded settings from LocalStorage");
                        return settings;
                    }
                    Err(e) => log::warn!("Ignoring stored settings: {}", e),
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
        log::debug!("No settings storage on native ({})", Self::STORAGE_KEY);
        Self::default()
    }

    #[cfg(not(target_arch = "wasm32"))]
    pub fn save(&self) {
        // No-op for native
    }
}
