//! Dashboard privacy controls and data export.

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use serde_json::{json, Value};
use tracing::info;

pub const EXPORT_FILE_NAME: &str = "careerai_my_data.json";
pub const DELETION_SCHEDULED: &str = "Your data has been scheduled for deletion.";

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub struct PrivacyPreferences {
    pub public_profile: bool,
    pub save_history: bool,
}

impl Default for PrivacyPreferences {
    fn default() -> Self {
        Self {
            public_profile: false,
            save_history: true,
        }
    }
}

/// Partial update; absent fields keep their value.
#[derive(Debug, Clone, Default, Deserialize)]
pub struct PreferencesUpdate {
    pub public_profile: Option<bool>,
    pub save_history: Option<bool>,
}

impl PrivacyPreferences {
    pub fn apply(&mut self, update: PreferencesUpdate) {
        if let Some(v) = update.public_profile {
            self.public_profile = v;
        }
        if let Some(v) = update.save_history {
            self.save_history = v;
        }
    }
}

#[derive(Debug, Clone, Serialize)]
pub struct DataExport {
    pub file_name: &'static str,
    pub exported_at: DateTime<Utc>,
    pub data: Value,
}

/// Placeholder account history plus the live preferences.
pub fn export_data(preferences: &PrivacyPreferences) -> DataExport {
    DataExport {
        file_name: EXPORT_FILE_NAME,
        exported_at: Utc::now(),
        data: json!({
            "profile": {
                "name": "John Doe",
                "targetRole": "Senior Software Engineer",
            },
            "interviewHistory": [
                { "date": "2024-07-15", "score": 8.2, "type": "Behavioral" },
                { "date": "2024-07-12", "score": 7.5, "type": "Technical" },
            ],
            "resumeCritiques": [
                { "date": "2024-07-10", "feedback": "Good, but add more metrics." },
            ],
            "preferences": {
                "saveHistory": preferences.save_history,
                "publicProfile": preferences.public_profile,
            },
        }),
    }
}

#[derive(Debug, Clone, Serialize)]
pub struct DeletionNotice {
    pub message: &'static str,
}

/// Confirms a deletion request. Nothing is stored server-side to delete.
pub fn request_deletion() -> DeletionNotice {
    info!("Data deletion requested");
    DeletionNotice {
        message: DELETION_SCHEDULED,
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_default_preferences() {
        let prefs = PrivacyPreferences::default();
        assert!(!prefs.public_profile);
        assert!(prefs.save_history);
    }

    #[test]
    fn test_partial_update() {
        let mut prefs = PrivacyPreferences::default();
        prefs.apply(PreferencesUpdate {
            public_profile: Some(true),
            save_history: None,
        });
        assert_eq!(
            prefs,
            PrivacyPreferences {
                public_profile: true,
                save_history: true
            }
        );
    }

    #[test]
    fn test_export_reflects_preferences() {
        let prefs = PrivacyPreferences {
            public_profile: true,
            save_history: false,
        };
        let export = export_data(&prefs);
        assert_eq!(export.file_name, "careerai_my_data.json");
        assert_eq!(export.data["preferences"]["saveHistory"], false);
        assert_eq!(export.data["preferences"]["publicProfile"], true);
        assert_eq!(export.data["interviewHistory"].as_array().unwrap().len(), 2);
    }
}
