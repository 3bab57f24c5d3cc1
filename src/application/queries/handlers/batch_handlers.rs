//! Batch Query Handlers

use std::sync::Arc;

use crate::application::batch::{BatchOrchestrator, BatchPhase};
use crate::application::queries::GetBatchStatus;
use crate::domain::voice::VoiceCatalog;

/// 批量试听状态响应
#[derive(Debug, Clone, PartialEq)]
pub struct BatchStatusResponse {
    pub phase: BatchPhase,
    pub running: bool,
    pub current_voice_id: Option<String>,
    pub current_voice_name: Option<String>,
    /// 当前音色在本次运行中的位置（从 1 开始）
    pub position: Option<usize>,
    pub total: usize,
    pub progress: f64,
    pub cancel_requested: bool,
}

/// GetBatchStatus Handler
pub struct GetBatchStatusHandler {
    catalog: Arc<VoiceCatalog>,
    orchestrator: Arc<BatchOrchestrator>,
}

impl GetBatchStatusHandler {
    pub fn new(catalog: Arc<VoiceCatalog>, orchestrator: Arc<BatchOrchestrator>) -> Self {
        Self {
            catalog,
            orchestrator,
        }
    }

    pub fn handle(&self, _query: GetBatchStatus) -> BatchStatusResponse {
        let state = self.orchestrator.state();
        let current_voice_name = state
            .current_voice_id
            .as_ref()
            .and_then(|id| self.catalog.find(id.as_str()))
            .map(|voice| voice.name().to_string());

        BatchStatusResponse {
            phase: state.phase,
            running: self.orchestrator.is_running(),
            current_voice_id: state.current_voice_id.as_ref().map(|id| id.to_string()),
            current_voice_name,
            position: state.position,
            total: state.total,
            progress: state.progress,
            cancel_requested: state.cancel_requested,
        }
    }
}
