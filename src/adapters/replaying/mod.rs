//! Replaying adapters that replay recorded interactions.

pub mod gateway;
pub mod id_gen;

pub use gateway::ReplayingTaskGateway;
pub use id_gen::ReplayingIdGenerator;

use std::sync::{Mutex, PoisonError};

use serde::de::DeserializeOwned;

use crate::cassette::replayer::{CassetteReplayer, ReplayError};
use crate::error::GatewayError;

/// Pull the next recorded output for a port/method pair.
pub(crate) fn next_output(
    replayer: &Mutex<CassetteReplayer>,
    port: &str,
    method: &str,
) -> Result<serde_json::Value, ReplayError> {
    let mut guard = replayer.lock().unwrap_or_else(PoisonError::into_inner);
    guard.next_interaction(port, method).map(|interaction| interaction.output.clone())
}

/// Decode a recorded `Result` using the Ok/Err JSON convention.
///
/// Mirror of `recording::record_result`. Accepts `{"Ok": v}` or
/// `{"Err": "message"}` (lowercase keys too); a bare value counts as `Ok`.
pub(crate) fn replay_result<T: DeserializeOwned>(
    output: serde_json::Value,
    context: &str,
) -> Result<T, GatewayError> {
    if let Some(err) = output.get("Err").or_else(|| output.get("err")) {
        let msg = err.as_str().map_or_else(|| err.to_string(), str::to_string);
        return Err(GatewayError::Replayed(msg));
    }
    let value = match output {
        serde_json::Value::Object(mut map) if map.contains_key("Ok") || map.contains_key("ok") => {
            map.remove("Ok").or_else(|| map.remove("ok")).unwrap_or_default()
        }
        other => other,
    };
    serde_json::from_value(value)
        .map_err(|e| GatewayError::Replayed(format!("{context}: failed to deserialize: {e}")))
}
