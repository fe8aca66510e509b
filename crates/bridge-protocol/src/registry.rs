//! Domain model registry (C2): `module-name -> typed decoder`.
//!
//! A single process-wide table (expressed as a match, not a runtime map —
//! it is no less "a table" for being resolved at compile time, and it keeps
//! this crate dependency-free beyond serde). If the wire payload is a JSON
//! array and the module's decoder is scalar, elements are mapped one by one
//! into a list rather than failing to decode the envelope as a single
//! object (§4.2).

use serde::Serialize;
use serde_json::Value;

use crate::models::{
    Battery, Cpu, Disks, Display, GenericResponse, Gpu, KeyboardKey, KeyboardText, Media,
    MediaDirectory, MediaFile, MediaFiles, Memory, Networks, Notification, OpenPath, OpenUrl,
    Process, Sensors, System,
};

/// The closed set of module names the registry knows how to decode.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum Model {
    Battery,
    Cpu,
    Disks,
    Displays,
    Gpus,
    Media,
    Memory,
    Networks,
    Processes,
    Sensors,
    System,
    MediaDirectories,
    MediaFile,
    MediaFiles,
    Notification,
    KeyboardKey,
    KeyboardText,
    OpenPath,
    OpenUrl,
    Response,
}

impl Model {
    #[must_use]
    pub fn as_str(self) -> &'static str {
        match self {
            Self::Battery => "battery",
            Self::Cpu => "cpu",
            Self::Disks => "disks",
            Self::Displays => "displays",
            Self::Gpus => "gpus",
            Self::Media => "media",
            Self::Memory => "memory",
            Self::Networks => "networks",
            Self::Processes => "processes",
            Self::Sensors => "sensors",
            Self::System => "system",
            Self::MediaDirectories => "media_directories",
            Self::MediaFile => "media_file",
            Self::MediaFiles => "media_files",
            Self::Notification => "notification",
            Self::KeyboardKey => "keyboard_key",
            Self::KeyboardText => "keyboard_text",
            Self::OpenPath => "open_path",
            Self::OpenUrl => "open_url",
            Self::Response => "response",
        }
    }
}

impl TryFrom<&str> for Model {
    type Error = ();

    fn try_from(value: &str) -> Result<Self, Self::Error> {
        Ok(match value {
            "battery" => Self::Battery,
            "cpu" => Self::Cpu,
            "disks" => Self::Disks,
            "displays" => Self::Displays,
            "gpus" => Self::Gpus,
            "media" => Self::Media,
            "memory" => Self::Memory,
            "networks" => Self::Networks,
            "processes" => Self::Processes,
            "sensors" => Self::Sensors,
            "system" => Self::System,
            "media_directories" => Self::MediaDirectories,
            "media_file" => Self::MediaFile,
            "media_files" => Self::MediaFiles,
            "notification" => Self::Notification,
            "keyboard_key" => Self::KeyboardKey,
            "keyboard_text" => Self::KeyboardText,
            "open_path" => Self::OpenPath,
            "open_url" => Self::OpenUrl,
            "response" => Self::Response,
            _ => return Err(()),
        })
    }
}

/// The decoded result of a registry lookup. `List` holds element-wise
/// decoded items when the wire payload was a JSON array and the module's
/// decoder is scalar (e.g. `displays`, `gpus`, `processes`, `media_directories`).
#[derive(Debug, Clone, PartialEq)]
pub enum DecodedPayload {
    Battery(Battery),
    Cpu(Cpu),
    Disks(Disks),
    Display(Display),
    Gpu(Gpu),
    Media(Media),
    Memory(Memory),
    Networks(Networks),
    Process(Process),
    Sensors(Sensors),
    System(System),
    MediaDirectory(MediaDirectory),
    MediaFile(MediaFile),
    MediaFiles(MediaFiles),
    Notification(Notification),
    KeyboardKey(KeyboardKey),
    KeyboardText(KeyboardText),
    OpenPath(OpenPath),
    OpenUrl(OpenUrl),
    Response(GenericResponse),
    List(Vec<DecodedPayload>),
}

/// Re-serializes the already-validated inner value. Used to hand a decoded
/// `DATA_UPDATE` payload back to a correlated caller as plain JSON (the
/// caller already went through the registry once to get here; this just
/// turns the typed result back into the normalized JSON shape).
impl Serialize for DecodedPayload {
    fn serialize<S: serde::Serializer>(&self, serializer: S) -> Result<S::Ok, S::Error> {
        match self {
            Self::Battery(v) => v.serialize(serializer),
            Self::Cpu(v) => v.serialize(serializer),
            Self::Disks(v) => v.serialize(serializer),
            Self::Display(v) => v.serialize(serializer),
            Self::Gpu(v) => v.serialize(serializer),
            Self::Media(v) => v.serialize(serializer),
            Self::Memory(v) => v.serialize(serializer),
            Self::Networks(v) => v.serialize(serializer),
            Self::Process(v) => v.serialize(serializer),
            Self::Sensors(v) => v.serialize(serializer),
            Self::System(v) => v.serialize(serializer),
            Self::MediaDirectory(v) => v.serialize(serializer),
            Self::MediaFile(v) => v.serialize(serializer),
            Self::MediaFiles(v) => v.serialize(serializer),
            Self::Notification(v) => v.serialize(serializer),
            Self::KeyboardKey(v) => v.serialize(serializer),
            Self::KeyboardText(v) => v.serialize(serializer),
            Self::OpenPath(v) => v.serialize(serializer),
            Self::OpenUrl(v) => v.serialize(serializer),
            Self::Response(v) => v.serialize(serializer),
            Self::List(items) => items.serialize(serializer),
        }
    }
}

macro_rules! decode_case {
    ($data:expr, $variant:ident, $ty:ty) => {{
        if let Value::Array(items) = $data {
            let decoded = items
                .into_iter()
                .map(|item| serde_json::from_value::<$ty>(item).map(DecodedPayload::$variant))
                .collect::<Result<Vec<_>, _>>()?;
            Ok(DecodedPayload::List(decoded))
        } else {
            Ok(DecodedPayload::$variant(serde_json::from_value::<$ty>(
                $data,
            )?))
        }
    }};
}

/// Decode `data` (object or array) per the module named by `module`.
///
/// # Errors
/// Returns `Err(None)` if `module` is not a known module name; returns
/// `Err(Some(_))` if the module is known but `data` does not match its
/// schema.
pub fn decode(module: &str, data: Value) -> Result<DecodedPayload, RegistryError> {
    let model = Model::try_from(module).map_err(|()| RegistryError::UnknownModule)?;
    decode_model(model, data).map_err(RegistryError::Schema)
}

fn decode_model(model: Model, data: Value) -> Result<DecodedPayload, serde_json::Error> {
    match model {
        Model::Battery => decode_case!(data, Battery, Battery),
        Model::Cpu => decode_case!(data, Cpu, Cpu),
        Model::Disks => decode_case!(data, Disks, Disks),
        Model::Displays => decode_case!(data, Display, Display),
        Model::Gpus => decode_case!(data, Gpu, Gpu),
        Model::Media => decode_case!(data, Media, Media),
        Model::Memory => decode_case!(data, Memory, Memory),
        Model::Networks => decode_case!(data, Networks, Networks),
        Model::Processes => decode_case!(data, Process, Process),
        Model::Sensors => decode_case!(data, Sensors, Sensors),
        Model::System => decode_case!(data, System, System),
        Model::MediaDirectories => decode_case!(data, MediaDirectory, MediaDirectory),
        Model::MediaFile => decode_case!(data, MediaFile, MediaFile),
        Model::MediaFiles => decode_case!(data, MediaFiles, MediaFiles),
        Model::Notification => decode_case!(data, Notification, Notification),
        Model::KeyboardKey => decode_case!(data, KeyboardKey, KeyboardKey),
        Model::KeyboardText => decode_case!(data, KeyboardText, KeyboardText),
        Model::OpenPath => decode_case!(data, OpenPath, OpenPath),
        Model::OpenUrl => decode_case!(data, OpenUrl, OpenUrl),
        Model::Response => decode_case!(data, Response, GenericResponse),
    }
}

#[derive(Debug, thiserror::Error)]
pub enum RegistryError {
    #[error("unknown module")]
    UnknownModule,
    #[error("schema mismatch: {0}")]
    Schema(#[from] serde_json::Error),
}

#[cfg(test)]
mod tests {
    use super::*;
    use serde_json::json;

    #[test]
    fn decodes_scalar_object_for_known_module() {
        let decoded = decode("notification", json!({"title": "hi"})).unwrap();
        assert!(matches!(decoded, DecodedPayload::Notification(_)));
    }

    #[test]
    fn decoded_payload_serializes_back_to_normalized_json() {
        let decoded = decode(
            "notification",
            json!({"title": "hi", "message": "there"}),
        )
        .unwrap();
        let value = serde_json::to_value(&decoded).unwrap();
        assert_eq!(value["title"], "hi");
        assert_eq!(value["message"], "there");
    }

    #[test]
    fn maps_array_element_wise_for_scalar_decoder() {
        let decoded = decode(
            "media_directories",
            json!([
                {"key": "documents", "name": "Documents", "path": "/home/user/documents"},
                {"key": "music", "name": "Music", "path": "/home/user/music"},
            ]),
        )
        .unwrap();
        match decoded {
            DecodedPayload::List(items) => assert_eq!(items.len(), 2),
            other => panic!("expected a list, got {other:?}"),
        }
    }

    #[test]
    fn unknown_module_is_reported_distinctly_from_schema_mismatch() {
        assert!(matches!(
            decode("not_a_module", json!({})),
            Err(RegistryError::UnknownModule)
        ));
        assert!(matches!(
            decode("notification", json!({"message": "no title"})),
            Err(RegistryError::Schema(_))
        ));
    }

    #[test]
    fn model_round_trips_through_as_str() {
        for name in [
            "battery",
            "cpu",
            "disks",
            "displays",
            "gpus",
            "media",
            "memory",
            "networks",
            "processes",
            "sensors",
            "system",
            "media_directories",
            "media_file",
            "media_files",
            "notification",
            "keyboard_key",
            "keyboard_text",
            "open_path",
            "open_url",
            "response",
        ] {
            let model = Model::try_from(name).unwrap();
            assert_eq!(model.as_str(), name);
        }
    }
}
