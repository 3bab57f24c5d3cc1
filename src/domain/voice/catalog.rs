//! Voice Catalog - 内置音色目录
//!
//! 23 个 Azure OpenAI TTS 音色，顺序即目录顺序（批量试听按此顺序执行）

use std::collections::HashSet;

use super::{PlayMode, Voice, VoiceError, VoiceId, VoiceType};

/// 单音色试听的默认文本
pub const DEFAULT_SAMPLE_TEXT: &str = "Hello! I'm an Azure OpenAI text-to-speech voice from the gpt-4o-mini-tts model. This is how I sound when reading your custom text. Try me out with different content to see how I perform!";

/// 批量试听的预设文本
pub const PLAY_ALL_PRESET_TEXT: &str = "Seriously?";

/// (id, name, description, type, use_cases, is_top)
type CatalogRow = (
    &'static str,
    &'static str,
    &'static str,
    VoiceType,
    &'static str,
    bool,
);

const DEFAULT_VOICES: &[CatalogRow] = &[
    ("alloy", "Alloy", "Neutral and balanced voice - versatile for all content types", VoiceType::Standard, "General purpose, tutorials, announcements", true),
    ("ash", "Ash", "Clear and articulate neural voice - professional delivery", VoiceType::Neural, "Business presentations, professional content", false),
    ("ballad", "Ballad", "Smooth and melodic neural voice - engaging narration", VoiceType::Neural, "Storytelling, audiobooks, creative content", true),
    ("brook", "Brook", "Gentle and flowing neural voice - calm delivery", VoiceType::Neural, "Meditation, relaxation, gentle narration", false),
    ("cedar", "Cedar", "Warm and grounded neural voice - authentic feel", VoiceType::Neural, "Natural conversation, welcoming content", false),
    ("clover", "Clover", "Fresh and lively neural voice - energetic tone", VoiceType::Neural, "Upbeat content, youth-focused material", false),
    ("coral", "Coral", "Vibrant and warm neural voice - friendly delivery", VoiceType::Neural, "Customer service, friendly announcements", false),
    ("dan", "Dan", "Professional and clear neural voice - authoritative", VoiceType::Neural, "Corporate training, professional videos", false),
    ("echo", "Echo", "Resonant and clear standard voice - strong presence", VoiceType::Standard, "Announcements, important messages", true),
    ("elan", "Elan", "Energetic and dynamic neural voice - enthusiastic", VoiceType::Neural, "Marketing, promotional content", false),
    ("fable", "Fable", "Expressive and warm standard voice - storytelling excellence", VoiceType::Standard, "Audiobooks, narrative content", true),
    ("jade-hardy", "Jade Hardy", "Confident and strong HD voice - premium quality", VoiceType::Hd, "High-quality narration, professional broadcasts", true),
    ("jazz", "Jazz", "Smooth and sophisticated neural voice - refined tone", VoiceType::Neural, "Luxury brands, sophisticated content", false),
    ("marin", "Marin", "Fresh and coastal neural voice - breezy delivery", VoiceType::Neural, "Lifestyle content, travel narration", false),
    ("marilyn", "Marilyn", "Classic and elegant neural voice - timeless quality", VoiceType::Neural, "Classic literature, elegant presentations", false),
    ("meadow", "Meadow", "Calm and natural neural voice - peaceful tone", VoiceType::Neural, "Nature content, calming narration", false),
    ("megan-wetherall", "Megan Wetherall", "Professional and polished HD voice - broadcast quality", VoiceType::Hd, "News broadcasts, premium content", true),
    ("nova", "Nova", "Bright and energetic standard voice - engaging delivery", VoiceType::Standard, "Educational content, tutorials", true),
    ("onyx", "Onyx", "Deep and authoritative standard voice - commanding presence", VoiceType::Standard, "Documentaries, serious content", true),
    ("rio", "Rio", "Lively and upbeat neural voice - vibrant energy", VoiceType::Neural, "Youth content, energetic presentations", false),
    ("sage", "Sage", "Wise and measured neural voice - thoughtful delivery", VoiceType::Neural, "Educational content, wisdom sharing", false),
    ("shimmer", "Shimmer", "Bright and cheerful standard voice - optimistic tone", VoiceType::Standard, "Positive messaging, uplifting content", true),
    ("verse", "Verse", "Poetic and expressive neural voice - artistic flair", VoiceType::Neural, "Poetry, creative writing, artistic content", false),
];

/// 音色目录
///
/// 不变量:
/// - 有序且不可变
/// - id 唯一
#[derive(Debug, Clone)]
pub struct VoiceCatalog {
    voices: Vec<Voice>,
}

impl VoiceCatalog {
    /// 从任意音色列表创建目录，拒绝重复 id
    pub fn new(voices: Vec<Voice>) -> Result<Self, VoiceError> {
        let mut seen = HashSet::with_capacity(voices.len());
        for voice in &voices {
            if !seen.insert(voice.id().clone()) {
                return Err(VoiceError::Duplicate(voice.id().to_string()));
            }
        }
        Ok(Self { voices })
    }

    /// 内置的 23 个 Azure OpenAI 音色
    pub fn builtin() -> Self {
        let voices = DEFAULT_VOICES
            .iter()
            .map(|&(id, name, description, voice_type, use_cases, is_top)| {
                let voice = Voice::new(VoiceId::from_static(id), name, description, voice_type)
                    .with_use_cases(use_cases);
                if is_top {
                    voice.top()
                } else {
                    voice
                }
            })
            .collect();
        Self { voices }
    }

    pub fn all(&self) -> &[Voice] {
        &self.voices
    }

    pub fn len(&self) -> usize {
        self.voices.len()
    }

    pub fn is_empty(&self) -> bool {
        self.voices.is_empty()
    }

    pub fn find(&self, id: &str) -> Option<&Voice> {
        self.voices.iter().find(|v| v.id().as_str() == id)
    }

    pub fn get(&self, id: &str) -> Result<&Voice, VoiceError> {
        self.find(id).ok_or_else(|| VoiceError::NotFound(id.to_string()))
    }

    /// 按模式过滤，保持目录顺序
    pub fn subset(&self, mode: PlayMode) -> Vec<Voice> {
        self.voices
            .iter()
            .filter(|v| v.matches(mode))
            .cloned()
            .collect()
    }
}

impl Default for VoiceCatalog {
    fn default() -> Self {
        Self::builtin()
    }
}
