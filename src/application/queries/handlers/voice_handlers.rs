//! Voice Query Handlers

use std::sync::Arc;

use crate::application::error::ApplicationError;
use crate::application::queries::{GetVoice, ListVoices};
use crate::domain::voice::{Voice, VoiceCatalog, VoiceType};

// ============================================================================
// Response DTOs
// ============================================================================

/// 音色详情响应
#[derive(Debug, Clone, PartialEq)]
pub struct VoiceResponse {
    pub id: String,
    pub name: String,
    pub description: String,
    pub voice_type: VoiceType,
    pub use_cases: Option<String>,
    pub is_top: bool,
}

impl From<&Voice> for VoiceResponse {
    fn from(voice: &Voice) -> Self {
        Self {
            id: voice.id().to_string(),
            name: voice.name().to_string(),
            description: voice.description().to_string(),
            voice_type: voice.voice_type(),
            use_cases: voice.use_cases().map(str::to_string),
            is_top: voice.is_top(),
        }
    }
}

// ============================================================================
// Handlers
// ============================================================================

/// GetVoice Handler
pub struct GetVoiceHandler {
    catalog: Arc<VoiceCatalog>,
}

impl GetVoiceHandler {
    pub fn new(catalog: Arc<VoiceCatalog>) -> Self {
        Self { catalog }
    }

    pub fn handle(&self, query: GetVoice) -> Result<VoiceResponse, ApplicationError> {
        let voice = self.catalog.get(&query.voice_id)?;
        Ok(VoiceResponse::from(voice))
    }
}

/// ListVoices Handler
pub struct ListVoicesHandler {
    catalog: Arc<VoiceCatalog>,
}

impl ListVoicesHandler {
    pub fn new(catalog: Arc<VoiceCatalog>) -> Self {
        Self { catalog }
    }

    pub fn handle(&self, query: ListVoices) -> Vec<VoiceResponse> {
        self.catalog
            .subset(query.mode)
            .iter()
            .map(VoiceResponse::from)
            .collect()
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::domain::voice::PlayMode;

    fn catalog() -> Arc<VoiceCatalog> {
        Arc::new(VoiceCatalog::builtin())
    }

    #[test]
    fn test_get_voice() {
        let handler = GetVoiceHandler::new(catalog());

        let voice = handler
            .handle(GetVoice {
                voice_id: "megan-wetherall".to_string(),
            })
            .unwrap();

        assert_eq!(voice.name, "Megan Wetherall");
        assert_eq!(voice.voice_type, VoiceType::Hd);
        assert!(voice.is_top);
    }

    #[test]
    fn test_get_unknown_voice() {
        let handler = GetVoiceHandler::new(catalog());

        let err = handler
            .handle(GetVoice {
                voice_id: "nobody".to_string(),
            })
            .unwrap_err();

        assert!(matches!(err, ApplicationError::NotFound { .. }));
    }

    #[test]
    fn test_list_voices_by_mode() {
        let handler = ListVoicesHandler::new(catalog());

        assert_eq!(handler.handle(ListVoices::default()).len(), 23);
        assert_eq!(handler.handle(ListVoices { mode: PlayMode::Top }).len(), 9);

        let hd: Vec<_> = handler
            .handle(ListVoices { mode: PlayMode::Hd })
            .into_iter()
            .map(|v| v.id)
            .collect();
        assert_eq!(hd, vec!["jade-hardy", "megan-wetherall"]);
    }
}
