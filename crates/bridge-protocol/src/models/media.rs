//! Media directory listing, file metadata, and playback control models.

use serde::de::{self, Deserializer, MapAccess, Visitor};
use serde::{Deserialize, Serialize};
use std::fmt;

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct MediaDirectory {
    pub key: String,
    pub name: String,
    pub path: String,
    #[serde(default)]
    pub description: Option<String>,
}

/// Request payload for `get_files`.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct MediaGetFiles {
    pub base: String,
    #[serde(default)]
    pub path: Option<String>,
}

/// Request payload for `get_file`.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct MediaGetFile {
    pub base: String,
    pub path: String,
}

/// A single media file entry. The backend has shipped two disjoint field
/// sets across versions; the newer snake_case-normalizing variant wins and
/// unknown keys are dropped.
/// `isDirectory`/`modTime`/`contentType` are tolerated on input and
/// normalized to their snake_case equivalents (grounded in
/// `models/media_files.py`).
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct MediaFile {
    pub name: String,
    pub path: String,
    pub size: i64,
    pub is_directory: bool,
    pub mod_time: f64,
    pub permissions: String,
    #[serde(default)]
    pub content_type: Option<String>,
    #[serde(default)]
    pub extension: Option<String>,
}

impl<'de> Deserialize<'de> for MediaFile {
    fn deserialize<D: Deserializer<'de>>(deserializer: D) -> Result<Self, D::Error> {
        struct MediaFileVisitor;

        impl<'de> Visitor<'de> for MediaFileVisitor {
            type Value = MediaFile;

            fn expecting(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
                f.write_str("a media file object")
            }

            fn visit_map<A: MapAccess<'de>>(self, mut map: A) -> Result<Self::Value, A::Error> {
                let mut name = None;
                let mut path = None;
                let mut size = None;
                let mut is_directory = None;
                let mut mod_time = None;
                let mut permissions = None;
                let mut content_type = None;
                let mut extension = None;

                while let Some(key) = map.next_key::<String>()? {
                    match key.as_str() {
                        "name" => name = Some(map.next_value()?),
                        "path" => path = Some(map.next_value()?),
                        "size" => size = Some(map.next_value()?),
                        "is_directory" | "isDirectory" => is_directory = Some(map.next_value()?),
                        "mod_time" | "modTime" => mod_time = Some(map.next_value()?),
                        "permissions" => permissions = Some(map.next_value()?),
                        "content_type" | "contentType" => content_type = map.next_value()?,
                        "extension" => extension = map.next_value()?,
                        // Unexpected keys are dropped to allow forward-compatible servers.
                        _ => {
                            let _ = map.next_value::<de::IgnoredAny>()?;
                        }
                    }
                }

                Ok(MediaFile {
                    name: name.ok_or_else(|| de::Error::missing_field("name"))?,
                    path: path.ok_or_else(|| de::Error::missing_field("path"))?,
                    size: size.ok_or_else(|| de::Error::missing_field("size"))?,
                    is_directory: is_directory
                        .ok_or_else(|| de::Error::missing_field("is_directory"))?,
                    mod_time: mod_time.ok_or_else(|| de::Error::missing_field("mod_time"))?,
                    permissions: permissions
                        .ok_or_else(|| de::Error::missing_field("permissions"))?,
                    content_type,
                    extension,
                })
            }
        }

        deserializer.deserialize_map(MediaFileVisitor)
    }
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct MediaFiles {
    #[serde(default)]
    pub files: Vec<MediaFile>,
    #[serde(default)]
    pub path: String,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct MediaControl {
    pub action: String,
}

#[cfg(test)]
mod tests {
    use super::*;
    use serde_json::json;

    #[test]
    fn media_file_accepts_camel_case_keys() {
        let value = json!({
            "name": "song.mp3",
            "path": "music/song.mp3",
            "size": 1024,
            "isDirectory": false,
            "modTime": 1_700_000_000.0,
            "permissions": "rw-r--r--",
            "contentType": "audio/mpeg",
        });
        let file: MediaFile = serde_json::from_value(value).unwrap();
        assert!(!file.is_directory);
        assert_eq!(file.content_type.as_deref(), Some("audio/mpeg"));
    }

    #[test]
    fn media_file_accepts_snake_case_keys() {
        let value = json!({
            "name": "dir",
            "path": "music/dir",
            "size": 0,
            "is_directory": true,
            "mod_time": 1.0,
            "permissions": "rwxr-xr-x",
        });
        let file: MediaFile = serde_json::from_value(value).unwrap();
        assert!(file.is_directory);
        assert!(file.content_type.is_none());
    }

    #[test]
    fn media_file_drops_unknown_keys() {
        let value = json!({
            "name": "f",
            "path": "p",
            "size": 1,
            "is_directory": false,
            "mod_time": 1.0,
            "permissions": "rw-",
            "fullpath": "/abs/p",
            "mime_type": "text/plain",
        });
        assert!(serde_json::from_value::<MediaFile>(value).is_ok());
    }

    #[test]
    fn media_file_missing_required_field_is_an_error() {
        let value = json!({"name": "f", "path": "p"});
        assert!(serde_json::from_value::<MediaFile>(value).is_err());
    }

    #[test]
    fn media_files_defaults_empty_list_and_path() {
        let files: MediaFiles = serde_json::from_value(json!({})).unwrap();
        assert!(files.files.is_empty());
        assert_eq!(files.path, "");
    }
}
