//! User preferences
//!
//! Persisted as JSON in LocalStorage. Nothing here changes the simulation;
//! these only shape how it is drawn and heard.

use serde::{Deserialize, Serialize};

/// Stars drawn per frame in the background
pub const DEFAULT_STAR_COUNT: u32 = 28;

/// Presentation settings
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct Settings {
    // === Audio ===
    /// Bounce cue volume (0.0 - 1.0)
    pub bounce_volume: f32,
    /// Silence the bounce cue entirely
    pub muted: bool,

    // === Visual Effects ===
    /// Glow discs along each ball's recent path
    pub trails: bool,
    /// Halo around balls and the ring wall
    pub glow: bool,
    /// Faint random stars behind the ring
    pub starfield: bool,
    /// Stars per frame when the starfield is on
    pub star_count: u32,
}

impl Default for Settings {
    fn default() -> Self {
        Self {
            bounce_volume: 0.23,
            muted: false,

            trails: true,
            glow: true,
            starfield: true,
            star_count: DEFAULT_STAR_COUNT,
        }
    }
}

impl Settings {
    /// Volume actually applied to the bounce cue
    pub fn effective_volume(&self) -> f32 {
        if self.muted {
            0.0
        } else {
            self.bounce_volume.clamp(0.0, 1.0)
        }
    }

    /// Stars to draw this frame
    pub fn effective_star_count(&self) -> u32 {
        if self.starfield { self.star_count } else { 0 }
    }

    /// Parse settings, filling any missing field with its default
    pub fn from_json(json: &str) -> Result<Self, serde_json::Error> {
        serde_json::from_str(json)
    }

    pub fn to_json(&self) -> Result<String, serde_json::Error> {
        serde_json::to_string(self)
    }

    /// LocalStorage key
    #[allow(dead_code)]
    const STORAGE_KEY: &'static str = "escape_ring_settings";

    /// Load settings from LocalStorage (WASM only)
    #[cfg(target_arch = "wasm32")]
    pub fn load() -> Self {
        let storage = web_sys::window()
            .and_then(|w| w.local_storage().ok())
            .flatten();

        if let Some(storage) = storage {
            if let Ok(Some(json)) = storage.get_item(Self::STORAGE_KEY) {
                match Self::from_json(&json) {
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
            match self.to_json() {
                Ok(json) => {
                    let _ = storage.set_item(Self::STORAGE_KEY, &json);
                    log::info!("Settings saved");
                }
                Err(e) => log::warn!("Failed to serialize settings: {}", e),
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
    fn test_defaults() {
        let settings = Settings::default();
        assert!((settings.effective_volume() - 0.23).abs() < 1e-6);
        assert_eq!(settings.effective_star_count(), DEFAULT_STAR_COUNT);
    }

    #[test]
    fn test_mute_and_starfield_toggles() {
        let settings = Settings {
            muted: true,
            starfield: false,
            ..Default::default()
        };
        assert_eq!(settings.effective_volume(), 0.0);
        assert_eq!(settings.effective_star_count(), 0);
    }

    #[test]
    fn test_partial_json_uses_defaults() {
        let settings = Settings::from_json(r#"{"trails": false, "bounce_volume": 0.5}"#)
            .expect("valid settings json");
        assert!(!settings.trails);
        assert!((settings.bounce_volume - 0.5).abs() < 1e-6);
        assert!(settings.glow);
        assert_eq!(settings.star_count, DEFAULT_STAR_COUNT);
    }

    #[test]
    fn test_json_survives_save_format() {
        let settings = Settings {
            glow: false,
            star_count: 10,
            ..Default::default()
        };
        let json = settings.to_json().expect("serializable");
        assert_eq!(Settings::from_json(&json).expect("parseable"), settings);
    }

    #[test]
    fn test_malformed_json_is_an_error() {
        assert!(Settings::from_json("not json").is_err());
    }
}
