//! Interface-only telemetry module payloads.
//!
//! Concrete schemas for these modules are explicitly out of scope: the
//! registry only needs to know that a module name maps to
//! *some* decodable payload, not its field layout. Each newtype wraps the
//! raw JSON untouched so the registry (and its tests) exercise the dispatch
//! rules rather than a fabricated schema.

use serde::{Deserialize, Serialize};
use serde_json::Value;

macro_rules! opaque_module {
    ($(#[$meta:meta])* $name:ident) => {
        $(#[$meta])*
        #[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
        #[serde(transparent)]
        pub struct $name(pub Value);
    };
}

opaque_module!(
    /// Battery telemetry (charge, state, time remaining). Schema owned by the backend.
    Battery
);
opaque_module!(
    /// CPU telemetry (frequency, per-core usage, temperature). Schema owned by the backend.
    Cpu
);
opaque_module!(
    /// Disk telemetry (devices, partitions, usage). Schema owned by the backend.
    Disks
);
opaque_module!(
    /// A single display's telemetry. Pushed as a scalar even when the server
    /// emits several (see `registry`'s scalar-vs-list handling).
    Display
);
opaque_module!(
    /// A single GPU's telemetry, same scalar-element convention as `Display`.
    Gpu
);
opaque_module!(
    /// Now-playing media telemetry.
    Media
);
opaque_module!(
    /// Memory telemetry (virtual/swap usage).
    Memory
);
opaque_module!(
    /// Network interface telemetry.
    Networks
);
opaque_module!(
    /// A single process's telemetry, scalar-element convention like `Display`/`Gpu`.
    Process
);
opaque_module!(
    /// Sensor telemetry (temperatures, fans, voltages).
    Sensors
);

#[cfg(test)]
mod tests {
    use super::*;
    use serde_json::json;

    #[test]
    fn opaque_module_round_trips_arbitrary_json() {
        let value = json!({"whatever": ["the", "backend"], "sends": 1});
        let battery: Battery = serde_json::from_value(value.clone()).unwrap();
        assert_eq!(serde_json::to_value(&battery).unwrap(), value);
    }
}
