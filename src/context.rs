//! Service context bundling all port trait objects.

use std::path::Path;
use std::sync::Arc;

use crate::adapters::live::{HttpTaskGateway, UuidGenerator};
use crate::adapters::recording::{RecordingIdGenerator, RecordingTaskGateway};
use crate::adapters::replaying::{ReplayingIdGenerator, ReplayingTaskGateway};
use crate::cassette::format::Cassette;
use crate::cassette::replayer::CassetteReplayer;
use crate::cassette::session::RecordingSession;
use crate::config::GatewayConfig;
use crate::ports::{IdGenerator, TaskGateway};

/// Bundles all port trait objects into a single context.
///
/// Each field provides access to one external boundary. Constructors
/// wire up different adapter implementations (live, replaying, recording).
pub struct ServiceContext {
    /// Remote task and user services.
    pub gateway: Box<dyn TaskGateway>,
    /// ID generator for client-created columns.
    pub id_gen: Box<dyn IdGenerator>,
}

impl ServiceContext {
    /// Creates a live context talking to the configured services.
    #[must_use]
    pub fn live(config: &GatewayConfig) -> Self {
        Self {
            gateway: Box::new(HttpTaskGateway::new(config.clone())),
            id_gen: Box::new(UuidGenerator),
        }
    }

    /// Creates a live context whose interactions are recorded under `root`.
    ///
    /// The returned session must be finished after the context is dropped.
    ///
    /// # Errors
    ///
    /// Returns an error if the cassette directory cannot be created.
    pub fn recording_at(
        root: &Path,
        config: &GatewayConfig,
    ) -> Result<(Self, RecordingSession), String> {
        let session = RecordingSession::new(root, &config.task_server)?;
        let live = Self::live(config);
        let ctx = Self {
            gateway: Box::new(RecordingTaskGateway::new(live.gateway, Arc::clone(&session.gateway))),
            id_gen: Box::new(RecordingIdGenerator::new(live.id_gen, Arc::clone(&session.id_gen))),
        };
        Ok((ctx, session))
    }

    /// Creates a replaying context from a cassette file.
    ///
    /// Each port gets its own replayer from the same cassette so that
    /// per-port cursors are independent.
    ///
    /// # Errors
    ///
    /// Returns an error if the cassette file cannot be read or parsed.
    pub fn replaying(path: &Path) -> Result<Self, String> {
        let cassette = Cassette::load(path)?;
        Ok(Self::from_cassette(&cassette))
    }

    /// Creates a replaying context from an in-memory cassette.
    #[must_use]
    pub fn from_cassette(cassette: &Cassette) -> Self {
        Self {
            gateway: Box::new(ReplayingTaskGateway::new(CassetteReplayer::new(cassette))),
            id_gen: Box::new(ReplayingIdGenerator::new(CassetteReplayer::new(cassette))),
        }
    }
}
