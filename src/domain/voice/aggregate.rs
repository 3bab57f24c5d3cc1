//! Voice Context - Aggregate Root

use serde::{Deserialize, Serialize};

use super::{PlayMode, VoiceId, VoiceType};

/// Voice 聚合根
///
/// 不变量:
/// - 目录加载后不可变
/// - id 在目录内唯一
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Voice {
    id: VoiceId,
    name: String,
    description: String,
    #[serde(rename = "type")]
    voice_type: VoiceType,
    use_cases: Option<String>,
    is_top: bool,
}

impl Voice {
    pub fn new(
        id: VoiceId,
        name: impl Into<String>,
        description: impl Into<String>,
        voice_type: VoiceType,
    ) -> Self {
        Self {
            id,
            name: name.into(),
            description: description.into(),
            voice_type,
            use_cases: None,
            is_top: false,
        }
    }

    pub fn with_use_cases(mut self, use_cases: impl Into<String>) -> Self {
        self.use_cases = Some(use_cases.into());
        self
    }

    /// 标记为推荐音色
    pub fn top(mut self) -> Self {
        self.is_top = true;
        self
    }

    /// 是否属于指定的试听子集
    pub fn matches(&self, mode: PlayMode) -> bool {
        match mode {
            PlayMode::All => true,
            PlayMode::Top => self.is_top,
            PlayMode::Hd => self.voice_type == VoiceType::Hd,
        }
    }

    // Getters
    pub fn id(&self) -> &VoiceId {
        &self.id
    }

    pub fn name(&self) -> &str {
        &self.name
    }

    pub fn description(&self) -> &str {
        &self.description
    }

    pub fn voice_type(&self) -> VoiceType {
        self.voice_type
    }

    pub fn use_cases(&self) -> Option<&str> {
        self.use_cases.as_deref()
    }

    pub fn is_top(&self) -> bool {
        self.is_top
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn voice(voice_type: VoiceType) -> Voice {
        Voice::new(VoiceId::new("v").unwrap(), "V", "desc", voice_type)
    }

    #[test]
    fn test_matches_mode() {
        let hd = voice(VoiceType::Hd);
        assert!(hd.matches(PlayMode::All));
        assert!(hd.matches(PlayMode::Hd));
        assert!(!hd.matches(PlayMode::Top));

        let top = voice(VoiceType::Neural).top();
        assert!(top.matches(PlayMode::Top));
        assert!(!top.matches(PlayMode::Hd));
    }

    #[test]
    fn test_serialize_type_field() {
        let v = voice(VoiceType::Standard).with_use_cases("Tutorials");
        let json = serde_json::to_value(&v).unwrap();
        assert_eq!(json["type"], "standard");
        assert_eq!(json["use_cases"], "Tutorials");
        assert_eq!(json["is_top"], false);
    }
}
