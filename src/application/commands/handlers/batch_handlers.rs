//! Batch Command Handlers - 批量试听开关与停止

use std::sync::Arc;

use crate::application::batch::{BatchError, BatchOrchestrator};
use crate::application::commands::{PlayAllCommand, PlayAllResponse, StopAllCommand, StopAllResponse};
use crate::application::error::ApplicationError;
use crate::domain::voice::{VoiceCatalog, PLAY_ALL_PRESET_TEXT};

/// PlayAll Handler - 开关语义
pub struct PlayAllHandler {
    catalog: Arc<VoiceCatalog>,
    orchestrator: Arc<BatchOrchestrator>,
}

impl PlayAllHandler {
    pub fn new(catalog: Arc<VoiceCatalog>, orchestrator: Arc<BatchOrchestrator>) -> Self {
        Self {
            catalog,
            orchestrator,
        }
    }

    pub fn handle(&self, cmd: PlayAllCommand) -> Result<PlayAllResponse, ApplicationError> {
        if self.orchestrator.is_running() {
            self.orchestrator.cancel();
            return Ok(PlayAllResponse::Stopped);
        }

        let voices = self.catalog.subset(cmd.mode);
        let total = voices.len();
        let text = cmd
            .text
            .filter(|t| !t.trim().is_empty())
            .unwrap_or_else(|| PLAY_ALL_PRESET_TEXT.to_string());

        match self.orchestrator.spawn(voices, text) {
            Ok(_run) => {
                tracing::info!(mode = %cmd.mode, total = total, "Batch run spawned");
                Ok(PlayAllResponse::Started {
                    total,
                    mode: cmd.mode,
                })
            }
            // 与另一个请求竞争时，开始请求已被视为停止
            Err(BatchError::Busy) => Ok(PlayAllResponse::Stopped),
            Err(e) => Err(e.into()),
        }
    }
}

/// StopAll Handler
pub struct StopAllHandler {
    orchestrator: Arc<BatchOrchestrator>,
}

impl StopAllHandler {
    pub fn new(orchestrator: Arc<BatchOrchestrator>) -> Self {
        Self { orchestrator }
    }

    pub fn handle(&self, _cmd: StopAllCommand) -> StopAllResponse {
        StopAllResponse {
            stopped: self.orchestrator.cancel(),
        }
    }
}
