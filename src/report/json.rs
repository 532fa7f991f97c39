use super::ResultLog;
use crate::detect::DeviceRegistry;
use crate::error::Result;
use serde::{Deserialize, Serialize};

/// The structured report document.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct StructuredReport {
    #[serde(rename = "Detected Devices")]
    pub devices: DeviceRegistry,
    #[serde(rename = "Test Results")]
    pub results: ResultLog,
}

#[derive(Serialize)]
struct Borrowed<'a> {
    #[serde(rename = "Detected Devices")]
    devices: &'a DeviceRegistry,
    #[serde(rename = "Test Results")]
    results: &'a ResultLog,
}

/// Pretty-printed JSON, four-space indent.
pub fn encode(registry: &DeviceRegistry, log: &ResultLog) -> Result<Vec<u8>> {
    let mut buf = Vec::new();
    let formatter = serde_json::ser::PrettyFormatter::with_indent(b"    ");
    let mut ser = serde_json::Serializer::with_formatter(&mut buf, formatter);
    Borrowed {
        devices: registry,
        results: log,
    }
    .serialize(&mut ser)?;
    buf.push(b'\n');
    Ok(buf)
}

pub fn decode(bytes: &[u8]) -> Result<StructuredReport> {
    Ok(serde_json::from_slice(bytes)?)
}
