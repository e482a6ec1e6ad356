//! Replaying adapter for the `IdGenerator` port.

use std::sync::Mutex;

use uuid::Uuid;

use super::next_output;
use crate::cassette::replayer::CassetteReplayer;
use crate::ports::IdGenerator;

/// Replays recorded IDs from a cassette.
///
/// When the cassette runs out, a fresh UUID is handed out instead so
/// that a replayed session can still create columns.
pub struct ReplayingIdGenerator {
    replayer: Mutex<CassetteReplayer>,
}

impl ReplayingIdGenerator {
    /// Creates a new replaying ID generator from a cassette replayer.
    #[must_use]
    pub fn new(replayer: CassetteReplayer) -> Self {
        Self { replayer: Mutex::new(replayer) }
    }
}

impl IdGenerator for ReplayingIdGenerator {
    fn generate_id(&self) -> String {
        match next_output(&self.replayer, "id_gen", "generate_id") {
            Ok(serde_json::Value::String(id)) => id,
            Ok(other) => other.to_string(),
            Err(e) => {
                tracing::warn!(error = %e, "no recorded id left, generating one");
                Uuid::new_v4().to_string()
            }
        }
    }
}
