//! Notification model and its wire payload shaping (`to_payload`).
//!
//! Grounded in `models/notification.py`: the caller builds a `Notification`
//! with a convenient, slightly redundant shape (`duration` vs `timeout`,
//! `sound` vs `audio.source`, first-matching-`Action` derivation of
//! `actionUrl`/`actionPath`), and `to_payload` collapses that into the flat
//! object the backend actually expects.

use serde::{Deserialize, Serialize};
use serde_json::{json, Map, Value};

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Action {
    pub command: String,
    pub label: String,
    #[serde(default)]
    pub data: Option<Map<String, Value>>,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Audio {
    pub source: String,
    #[serde(default)]
    pub volume: Option<f64>,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize, Default)]
pub struct Notification {
    pub title: String,
    #[serde(default)]
    pub message: Option<String>,
    #[serde(default)]
    pub icon: Option<String>,
    #[serde(default)]
    pub image: Option<String>,
    #[serde(default)]
    pub actions: Option<Vec<Action>>,
    #[serde(default)]
    pub timeout: Option<f64>,
    #[serde(default)]
    pub audio: Option<Audio>,
    #[serde(default)]
    pub duration: Option<i64>,
    #[serde(default)]
    pub action_url: Option<String>,
    #[serde(default)]
    pub action_path: Option<String>,
    #[serde(default)]
    pub sound: Option<String>,
}

impl Notification {
    #[must_use]
    pub fn new(title: impl Into<String>) -> Self {
        Self {
            title: title.into(),
            ..Self::default()
        }
    }

    /// Convert to the flat object the backend expects over the wire.
    #[must_use]
    pub fn to_payload(&self) -> Value {
        let mut payload = Map::new();
        payload.insert("title".to_owned(), json!(self.title));

        if let Some(message) = &self.message {
            payload.insert("message".to_owned(), json!(message));
        }
        if let Some(icon) = &self.icon {
            payload.insert("icon".to_owned(), json!(icon));
        }
        if let Some(image) = &self.image {
            payload.insert("image".to_owned(), json!(image));
        }
        if let Some(actions) = &self.actions {
            payload.insert("actions".to_owned(), json!(actions));
        }
        if let Some(timeout) = self.timeout {
            payload.insert("timeout".to_owned(), json!(timeout));
        }
        if let Some(audio) = &self.audio {
            payload.insert("audio".to_owned(), json!(audio));
        }

        let duration = self
            .duration
            .or_else(|| self.timeout.map(|t| t as i64));
        if let Some(duration) = duration {
            payload.insert("duration".to_owned(), json!(duration));
        }

        let mut action_url = self.action_url.clone();
        let mut action_path = self.action_path.clone();
        if action_url.is_none() || action_path.is_none() {
            for action in self.actions.iter().flatten() {
                let command = action.command.to_uppercase();
                if action_url.is_none() && command == "OPEN_URL" {
                    if let Some(url) = action.data.as_ref().and_then(|d| d.get("url")).and_then(Value::as_str) {
                        action_url = Some(url.to_owned());
                    }
                }
                if action_path.is_none() && command == "OPEN_PATH" {
                    if let Some(path) = action.data.as_ref().and_then(|d| d.get("path")).and_then(Value::as_str) {
                        action_path = Some(path.to_owned());
                    }
                }
            }
        }
        if let Some(action_url) = action_url {
            payload.insert("actionUrl".to_owned(), json!(action_url));
        }
        if let Some(action_path) = action_path {
            payload.insert("actionPath".to_owned(), json!(action_path));
        }

        let sound = self
            .sound
            .clone()
            .or_else(|| self.audio.as_ref().map(|a| a.source.clone()));
        if let Some(sound) = sound {
            payload.insert("sound".to_owned(), json!(sound));
        }

        Value::Object(payload)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn minimal_notification_payload_has_only_title() {
        let notification = Notification::new("Test");
        let payload = notification.to_payload();
        assert_eq!(payload, json!({"title": "Test"}));
    }

    #[test]
    fn duration_falls_back_to_timeout_when_unset() {
        let mut notification = Notification::new("T");
        notification.timeout = Some(5.0);
        let payload = notification.to_payload();
        assert_eq!(payload["duration"], 5);
    }

    #[test]
    fn explicit_duration_wins_over_timeout() {
        let mut notification = Notification::new("T");
        notification.timeout = Some(5.0);
        notification.duration = Some(9);
        let payload = notification.to_payload();
        assert_eq!(payload["duration"], 9);
    }

    #[test]
    fn action_url_is_derived_from_first_open_url_action() {
        let mut notification = Notification::new("T");
        let mut data = Map::new();
        data.insert("url".to_owned(), json!("https://example.com"));
        notification.actions = Some(vec![Action {
            command: "open_url".to_owned(),
            label: "Open".to_owned(),
            data: Some(data),
        }]);
        let payload = notification.to_payload();
        assert_eq!(payload["actionUrl"], "https://example.com");
        assert!(payload.get("actionPath").is_none());
    }

    #[test]
    fn explicit_action_url_is_not_overridden() {
        let mut notification = Notification::new("T");
        notification.action_url = Some("https://explicit".to_owned());
        let payload = notification.to_payload();
        assert_eq!(payload["actionUrl"], "https://explicit");
    }

    #[test]
    fn sound_falls_back_to_audio_source() {
        let mut notification = Notification::new("T");
        notification.audio = Some(Audio {
            source: "chime.wav".to_owned(),
            volume: None,
        });
        let payload = notification.to_payload();
        assert_eq!(payload["sound"], "chime.wav");
    }
}
