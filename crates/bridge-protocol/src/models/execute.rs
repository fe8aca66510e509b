//! Command execution round-trip (`COMMAND_EXECUTE` -> `COMMAND_COMPLETED`).
//!
//! Grounded in `models/command_execute.py` / `command_result.py`: the
//! backend's JSON keys are camelCase (`commandID`, `exitCode`) even though
//! the rest of the wire protocol is snake_case elsewhere, so these are
//! spelled out explicitly rather than relying on a blanket rename rule.

use serde::{Deserialize, Serialize};

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct ExecuteRequest {
    #[serde(rename = "commandID")]
    pub command_id: String,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct ExecuteResult {
    #[serde(rename = "commandID")]
    pub command_id: String,
    #[serde(rename = "exitCode")]
    pub exit_code: i32,
    pub stdout: String,
    pub stderr: String,
    #[serde(default)]
    pub error: Option<String>,
}
