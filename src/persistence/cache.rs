//! Local copy of the signed-in player's record
//!
//! Persisted to LocalStorage so the HUD shows a high score before the
//! service answers, and so scores survive an outage.

use serde::{Deserialize, Serialize};

use super::{SubmitReceipt, UserRecord};

#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct ProfileCache {
    pub record: Option<UserRecord>,
}

impl ProfileCache {
    /// LocalStorage key (used only in wasm32)
    pub const STORAGE_KEY: &'static str = "tedx_user";

    pub fn new(record: UserRecord) -> Self {
        Self {
            record: Some(record),
        }
    }

    /// Parse a cached record. Malformed input yields an empty cache.
    pub fn from_json(json: &str) -> Self {
        match serde_json::from_str::<UserRecord>(json) {
            Ok(record) => Self::new(record),
            Err(e) => {
                log::warn!("Ignoring malformed cached user record: {e}");
                Self::default()
            }
        }
    }

    /// Serialized record, or None when nothing is cached
    pub fn to_json(&self) -> Option<String> {
        self.record
            .as_ref()
            .and_then(|record| serde_json::to_string(record).ok())
    }

    pub fn user_id(&self) -> Option<&str> {
        self.record.as_ref().map(|record| record.uid.as_str())
    }

    /// Cached high score; 0 when nothing is cached
    pub fn high_score(&self) -> u32 {
        self.record.as_ref().map_or(0, |record| record.high_score)
    }

    /// Mirror what the service reported
    pub fn apply_receipt(&mut self, receipt: &SubmitReceipt, now: f64) {
        let record = self.record.get_or_insert_with(UserRecord::default);
        record.high_score = receipt.high_score;
        record.games_played = receipt.games_played;
        record.last_played_at = Some(now);
    }

    /// Keep a score while the service is down. Returns (high score, new record).
    pub fn apply_offline(&mut self, score: u32, now: f64) -> (u32, bool) {
        let record = self.record.get_or_insert_with(UserRecord::default);
        record.last_played_at = Some(now);
        if score > record.high_score {
            record.high_score = score;
            (score, true)
        } else {
            (record.high_score, false)
        }
    }

    /// Load the cached record from LocalStorage (WASM only)
    #[cfg(target_arch = "wasm32")]
    pub fn load() -> Self {
        let storage = web_sys::window()
            .and_then(|w| w.local_storage().ok())
            .flatten();

        if let Some(storage) = storage {
            if let Ok(Some(json)) = storage.get_item(Self::STORAGE_KEY) {
                let cache = Self::from_json(&json);
                log::info!("Loaded cached profile (high score {})", cache.high_score());
                return cache;
            }
        }

        log::info!("No cached profile");
        Self::default()
    }

    /// Save the cached record to LocalStorage (WASM only)
    #[cfg(target_arch = "wasm32")]
    pub fn save(&self) {
        let storage = web_sys::window()
            .and_then(|w| w.local_storage().ok())
            .flatten();

        if let (Some(storage), Some(json)) = (storage, self.to_json()) {
            let _ = storage.set_item(Self::STORAGE_KEY, &json);
            log::info!("Profile cached");
        }
    }

    /// Drop the cached record on logout (WASM only)
    #[cfg(target_arch = "wasm32")]
    pub fn clear(&mut self) {
        self.record = None;
        if let Some(storage) = web_sys::window()
            .and_then(|w| w.local_storage().ok())
            .flatten()
        {
            let _ = storage.remove_item(Self::STORAGE_KEY);
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

    #[cfg(not(target_arch = "wasm32"))]
    pub fn clear(&mut self) {
        self.record = None;
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_malformed_json_is_empty() {
        let cache = ProfileCache::from_json("{not json");
        assert_eq!(cache.record, None);
        assert_eq!(cache.high_score(), 0);
        assert_eq!(cache.to_json(), None);
    }

    #[test]
    fn test_legacy_record_parses() {
        let cache = ProfileCache::from_json(
            r#"{"uid":"u9","fullName":"Lin","class":"BE","department":"EXTC","highScore":312}"#,
        );
        assert_eq!(cache.user_id(), Some("u9"));
        assert_eq!(cache.high_score(), 312);
    }

    #[test]
    fn test_json_roundtrip() {
        let mut record = UserRecord::new("u1", "Ada", "TE", "Comp");
        record.high_score = 9;
        let cache = ProfileCache::new(record);
        let json = cache.to_json().unwrap();
        assert_eq!(ProfileCache::from_json(&json), cache);
    }

    #[test]
    fn test_apply_offline_max() {
        let mut cache = ProfileCache::default();
        assert_eq!(cache.apply_offline(30, 1.0), (30, true));
        assert_eq!(cache.apply_offline(20, 2.0), (30, false));
        assert_eq!(cache.apply_offline(31, 3.0), (31, true));
        assert_eq!(cache.high_score(), 31);
    }

    #[test]
    fn test_apply_receipt() {
        let mut cache = ProfileCache::new(UserRecord::new("u1", "Ada", "TE", "Comp"));
        cache.apply_receipt(
            &SubmitReceipt {
                accepted: true,
                high_score: 100,
                is_new_record: true,
                games_played: 3,
            },
            5.0,
        );
        let record = cache.record.as_ref().unwrap();
        assert_eq!(record.high_score, 100);
        assert_eq!(record.games_played, 3);
        assert_eq!(record.display_name, "Ada");
    }

    #[test]
    fn test_clear() {
        let mut cache = ProfileCache::new(UserRecord::default());
        cache.clear();
        assert_eq!(cache.record, None);
    }
}
