//! Request bodies for the two subscription-style operations, the composite
//! `get_data` aggregate (C8), and the generic fallback decoder.

use serde::{Deserialize, Serialize};
use serde_json::Value;

use super::media::MediaDirectory;
use super::system::System;
use super::telemetry::{
    Battery, Cpu, Disks, Display, Gpu, Media, Memory, Networks, Process, Sensors,
};
use crate::registry::DecodedPayload;

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct GetData {
    pub modules: Vec<String>,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct RegisterDataListener {
    pub modules: Vec<String>,
}

/// Payload for `application_update` (fire-and-forget).
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Update {
    pub version: String,
}

/// Fallback decoder target for frames the registry has no typed decoder
/// for (`Model::Response` in the original, used when `accept_other_types`
/// is set and the event type itself is not a recognized module name).
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(transparent)]
pub struct GenericResponse(pub Value);

/// One optional slot per module name, populated by the push callback as
/// `DATA_UPDATE` frames arrive. A slot counts as "set" the instant any
/// payload (scalar or list) is assigned to it, regardless of how many
/// updates follow.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct ModulesData {
    #[serde(default)]
    pub battery: Option<Battery>,
    #[serde(default)]
    pub cpu: Option<Cpu>,
    #[serde(default)]
    pub disks: Option<Disks>,
    #[serde(default)]
    pub displays: Option<Vec<Display>>,
    #[serde(default)]
    pub gpus: Option<Vec<Gpu>>,
    #[serde(default)]
    pub media: Option<Media>,
    #[serde(default)]
    pub memory: Option<Memory>,
    #[serde(default)]
    pub networks: Option<Networks>,
    #[serde(default)]
    pub processes: Option<Vec<Process>>,
    #[serde(default)]
    pub sensors: Option<Sensors>,
    #[serde(default)]
    pub system: Option<System>,
    #[serde(default)]
    pub media_directories: Option<Vec<MediaDirectory>>,
}

impl ModulesData {
    /// True once every module in `wanted` has a set slot.
    #[must_use]
    pub fn has_all(&self, wanted: &[String]) -> bool {
        wanted.iter().all(|m| self.is_set(m))
    }

    /// Assign a decoded `DATA_UPDATE` payload into the matching slot.
    /// Unrecognized module/payload combinations are silently ignored: the
    /// registry already rejected truly unknown module names before this
    /// point, so a mismatch here can only mean a module whose schema this
    /// aggregate does not carry a slot for (e.g. `media_file`, `response`).
    pub fn apply(&mut self, module: &str, payload: DecodedPayload) {
        match (module, payload) {
            ("battery", DecodedPayload::Battery(v)) => self.battery = Some(v),
            ("cpu", DecodedPayload::Cpu(v)) => self.cpu = Some(v),
            ("disks", DecodedPayload::Disks(v)) => self.disks = Some(v),
            ("displays", DecodedPayload::Display(v)) => self.displays = Some(vec![v]),
            ("displays", DecodedPayload::List(items)) => {
                self.displays = Some(unwrap_list(items, |p| match p {
                    DecodedPayload::Display(v) => Some(v),
                    _ => None,
                }));
            }
            ("gpus", DecodedPayload::Gpu(v)) => self.gpus = Some(vec![v]),
            ("gpus", DecodedPayload::List(items)) => {
                self.gpus = Some(unwrap_list(items, |p| match p {
                    DecodedPayload::Gpu(v) => Some(v),
                    _ => None,
                }));
            }
            ("media", DecodedPayload::Media(v)) => self.media = Some(v),
            ("memory", DecodedPayload::Memory(v)) => self.memory = Some(v),
            ("networks", DecodedPayload::Networks(v)) => self.networks = Some(v),
            ("processes", DecodedPayload::Process(v)) => self.processes = Some(vec![v]),
            ("processes", DecodedPayload::List(items)) => {
                self.processes = Some(unwrap_list(items, |p| match p {
                    DecodedPayload::Process(v) => Some(v),
                    _ => None,
                }));
            }
            ("sensors", DecodedPayload::Sensors(v)) => self.sensors = Some(v),
            ("system", DecodedPayload::System(v)) => self.system = Some(v),
            ("media_directories", DecodedPayload::MediaDirectory(v)) => {
                self.media_directories = Some(vec![v]);
            }
            ("media_directories", DecodedPayload::List(items)) => {
                self.media_directories = Some(unwrap_list(items, |p| match p {
                    DecodedPayload::MediaDirectory(v) => Some(v),
                    _ => None,
                }));
            }
            _ => {}
        }
    }

    #[must_use]
    pub fn is_set(&self, module: &str) -> bool {
        match module {
            "battery" => self.battery.is_some(),
            "cpu" => self.cpu.is_some(),
            "disks" => self.disks.is_some(),
            "displays" => self.displays.is_some(),
            "gpus" => self.gpus.is_some(),
            "media" => self.media.is_some(),
            "memory" => self.memory.is_some(),
            "networks" => self.networks.is_some(),
            "processes" => self.processes.is_some(),
            "sensors" => self.sensors.is_some(),
            "system" => self.system.is_some(),
            "media_directories" => self.media_directories.is_some(),
            _ => false,
        }
    }
}

fn unwrap_list<T>(items: Vec<DecodedPayload>, extract: impl Fn(DecodedPayload) -> Option<T>) -> Vec<T> {
    items.into_iter().filter_map(extract).collect()
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn has_all_is_false_until_every_wanted_module_is_set() {
        let mut data = ModulesData::default();
        let wanted = vec!["system".to_owned(), "cpu".to_owned()];
        assert!(!data.has_all(&wanted));
        data.system = Some(serde_json::from_value(serde_json::json!({
            "boot_time": 0, "fqdn": "h", "hostname": "h", "kernel_version": "k",
            "ip_address_4": "1.2.3.4", "mac_address": "aa", "platform_version": "1",
            "platform": "linux", "uptime": 0, "users": [], "uuid": "u", "version": "4.0.2",
        }))
        .unwrap();
        assert!(!data.has_all(&wanted));
        data.cpu = Some(Cpu(serde_json::json!({})));
        assert!(data.has_all(&wanted));
    }

    #[test]
    fn unknown_module_name_is_never_set() {
        let data = ModulesData::default();
        assert!(!data.is_set("not_a_real_module"));
    }

    #[test]
    fn apply_sets_scalar_and_list_slots() {
        let mut data = ModulesData::default();
        data.apply("cpu", DecodedPayload::Cpu(Cpu(serde_json::json!({}))));
        assert!(data.cpu.is_some());

        data.apply(
            "displays",
            DecodedPayload::List(vec![
                DecodedPayload::Display(Display(serde_json::json!({}))),
                DecodedPayload::Display(Display(serde_json::json!({}))),
            ]),
        );
        assert_eq!(data.displays.as_ref().unwrap().len(), 2);
    }

    #[test]
    fn apply_ignores_payloads_with_no_matching_slot() {
        let mut data = ModulesData::default();
        let file: super::super::media::MediaFile = serde_json::from_value(serde_json::json!({
            "name": "a", "path": "/a", "size": 0, "is_directory": false,
            "mod_time": 0.0, "permissions": "rw-",
        }))
        .unwrap();
        data.apply("media_file", DecodedPayload::MediaFile(file));
        assert_eq!(data, ModulesData::default());
    }
}
