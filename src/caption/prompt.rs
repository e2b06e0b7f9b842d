use std::fmt;
use std::str::FromStr;

use serde::{Deserialize, Serialize};

use crate::foundation::error::{OverlayError, OverlayResult};

/// Kind of design the caption is written for.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum DesignType {
    /// Image macro.
    Meme,
    /// Event announcement.
    EventPoster,
    /// Short slogan for a social post.
    SocialMediaSlogan,
}

impl DesignType {
    /// Every design type, in menu order.
    pub const ALL: [Self; 3] = [Self::Meme, Self::EventPoster, Self::SocialMediaSlogan];

    /// Label used inside the prompt.
    pub fn label(self) -> &'static str {
        match self {
            Self::Meme => "Meme",
            Self::EventPoster => "Event Poster",
            Self::SocialMediaSlogan => "Social Media Slogan",
        }
    }
}

/// Voice the caption should be written in.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum Tone {
    /// Funny and humorous.
    FunnyHumorous,
    /// Sarcastic and snarky.
    SarcasticSnarky,
    /// Professional and clean.
    ProfessionalClean,
    /// Inspirational and epic.
    InspirationalEpic,
    /// Gen-Z slang.
    GenZSlang,
}

impl Tone {
    /// Every tone, in menu order.
    pub const ALL: [Self; 5] = [
        Self::FunnyHumorous,
        Self::SarcasticSnarky,
        Self::ProfessionalClean,
        Self::InspirationalEpic,
        Self::GenZSlang,
    ];

    /// Label used inside the prompt.
    pub fn label(self) -> &'static str {
        match self {
            Self::FunnyHumorous => "Funny & Humorous",
            Self::SarcasticSnarky => "Sarcastic & Snarky",
            Self::ProfessionalClean => "Professional & Clean",
            Self::InspirationalEpic => "Inspirational & Epic",
            Self::GenZSlang => "Gen-Z Slang",
        }
    }
}

macro_rules! impl_keyword_parse {
    ($ty:ty, $what:literal, { $($kw:literal => $variant:expr),+ $(,)? }) => {
        impl FromStr for $ty {
            type Err = OverlayError;

            fn from_str(s: &str) -> Result<Self, Self::Err> {
                let key = s.trim().to_ascii_lowercase().replace(['_', ' '], "-");
                match key.as_str() {
                    $($kw => Ok($variant),)+
                    _ => Err(OverlayError::input(format!(
                        concat!("unknown ", $what, " \"{}\""),
                        s.trim()
                    ))),
                }
            }
        }
    };
}

impl_keyword_parse!(DesignType, "design type", {
    "meme" => DesignType::Meme,
    "event-poster" => DesignType::EventPoster,
    "poster" => DesignType::EventPoster,
    "social-media-slogan" => DesignType::SocialMediaSlogan,
    "slogan" => DesignType::SocialMediaSlogan,
});

impl_keyword_parse!(Tone, "tone", {
    "funny" => Tone::FunnyHumorous,
    "funny-humorous" => Tone::FunnyHumorous,
    "sarcastic" => Tone::SarcasticSnarky,
    "sarcastic-snarky" => Tone::SarcasticSnarky,
    "professional" => Tone::ProfessionalClean,
    "professional-clean" => Tone::ProfessionalClean,
    "inspirational" => Tone::InspirationalEpic,
    "inspirational-epic" => Tone::InspirationalEpic,
    "genz" => Tone::GenZSlang,
    "gen-z" => Tone::GenZSlang,
    "gen-z-slang" => Tone::GenZSlang,
});

/// Prompt for the caption source, built from the user's selections.
#[derive(Clone, Debug, PartialEq, Eq)]
pub struct CaptionPrompt {
    design_type: DesignType,
    topic: String,
    tone: Tone,
}

impl CaptionPrompt {
    /// Rejects a blank topic.
    pub fn new(design_type: DesignType, topic: &str, tone: Tone) -> OverlayResult<Self> {
        let topic = topic.trim();
        if topic.is_empty() {
            return Err(OverlayError::input("topic is empty"));
        }
        Ok(Self {
            design_type,
            topic: topic.to_owned(),
            tone,
        })
    }

    /// Design type the caption is for.
    pub fn design_type(&self) -> DesignType {
        self.design_type
    }

    /// What the caption is about (trimmed).
    pub fn topic(&self) -> &str {
        &self.topic
    }

    /// Requested voice.
    pub fn tone(&self) -> Tone {
        self.tone
    }

    /// Full prompt text sent to the generator.
    pub fn text(&self) -> String {
        self.to_string()
    }
}

impl fmt::Display for CaptionPrompt {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(
            f,
            "Write a short, catchy, and punchy {} text overlay about: {}. \
             The tone of the text MUST BE: {}. \
             Return strictly the text, no quotes or extra formatting.",
            self.design_type.label(),
            self.topic,
            self.tone.label()
        )
    }
}

#[cfg(test)]
#[path = "../../tests/unit/caption/prompt.rs"]
mod tests;
