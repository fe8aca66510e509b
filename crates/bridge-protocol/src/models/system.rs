//! The `system` telemetry module, implemented in full.
//!
//! Unlike the other telemetry modules (`battery`, `cpu`, ...), this one is
//! decoded concretely: the version probe (C4) needs `version` out of it, and
//! it costs nothing extra to carry the rest of the fields the backend
//! actually sends (grounded in `models/modules/system.py`).

use serde::{Deserialize, Serialize};

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum RunMode {
    Standalone,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct SystemUser {
    pub name: String,
    pub active: bool,
    pub terminal: String,
    pub host: String,
    pub started: i64,
    pub pid: f64,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct System {
    pub boot_time: i64,
    pub fqdn: String,
    pub hostname: String,
    pub kernel_version: String,
    pub ip_address_4: String,
    pub mac_address: String,
    pub platform_version: String,
    pub platform: String,
    pub uptime: i64,
    pub users: Vec<SystemUser>,
    pub uuid: String,
    pub version: String,
    #[serde(default)]
    pub camera_usage: Option<Vec<String>>,
    #[serde(default)]
    pub ip_address_6: Option<String>,
    #[serde(default)]
    pub pending_reboot: Option<bool>,
    #[serde(default)]
    pub power_usage: Option<f64>,
    #[serde(default)]
    pub run_mode: Option<RunMode>,
    #[serde(default)]
    pub version_latest_url: Option<String>,
    #[serde(default)]
    pub version_latest: Option<String>,
    #[serde(default)]
    pub version_newer_available: Option<bool>,
}

#[cfg(test)]
mod tests {
    use super::*;
    use serde_json::json;

    fn minimal_system_json() -> serde_json::Value {
        json!({
            "boot_time": 1_700_000_000,
            "fqdn": "host.local",
            "hostname": "host",
            "kernel_version": "6.9.0",
            "ip_address_4": "192.168.1.2",
            "mac_address": "aa:bb:cc:dd:ee:ff",
            "platform_version": "1.0",
            "platform": "linux",
            "uptime": 12345,
            "users": [],
            "uuid": "11111111-1111-1111-1111-111111111111",
            "version": "4.0.2",
        })
    }

    #[test]
    fn decodes_with_only_required_fields() {
        let system: System = serde_json::from_value(minimal_system_json()).unwrap();
        assert_eq!(system.version, "4.0.2");
        assert!(system.camera_usage.is_none());
        assert!(system.run_mode.is_none());
    }

    #[test]
    fn decodes_optional_fields_when_present() {
        let mut value = minimal_system_json();
        value["run_mode"] = json!("standalone");
        value["pending_reboot"] = json!(true);
        let system: System = serde_json::from_value(value).unwrap();
        assert_eq!(system.run_mode, Some(RunMode::Standalone));
        assert_eq!(system.pending_reboot, Some(true));
    }

    #[test]
    fn unexpected_keys_are_tolerated() {
        let mut value = minimal_system_json();
        value["some_future_field"] = json!("ignored");
        assert!(serde_json::from_value::<System>(value).is_ok());
    }
}
