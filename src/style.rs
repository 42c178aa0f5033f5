//! Style tags and the suffixes that steer the image model toward them.

/// Image style with a fixed prompt suffix.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum Style {
    #[default]
    Realistic,
    Anime,
    Fantasy,
    Cyberpunk,
}

impl Style {
    /// Exact tag lookup. Tags without a suffix (e.g. `abstract`) return `None`.
    pub fn parse(tag: &str) -> Option<Style> {
        match tag {
            "realistic" => Some(Style::Realistic),
            "anime" => Some(Style::Anime),
            "fantasy" => Some(Style::Fantasy),
            "cyberpunk" => Some(Style::Cyberpunk),
            _ => None,
        }
    }

    pub fn tag(&self) -> &'static str {
        match self {
            Style::Realistic => "realistic",
            Style::Anime => "anime",
            Style::Fantasy => "fantasy",
            Style::Cyberpunk => "cyberpunk",
        }
    }

    pub fn suffix(&self) -> &'static str {
        match self {
            Style::Realistic => {
                "ultra realistic, highly detailed, 8k resolution, professional photography"
            }
            Style::Anime => {
                "Studio Ghibli style, anime, hand-drawn, colorful, Hayao Miyazaki inspired"
            }
            Style::Fantasy => {
                "fantasy art, magical, detailed, ethereal lighting, vibrant colors, digital painting"
            }
            Style::Cyberpunk => {
                "cyberpunk, neon lights, futuristic, dystopian, high contrast, digital art"
            }
        }
    }
}

/// `"{prompt}, {suffix}"`; unknown tags use the realistic suffix.
pub fn enhance_prompt(prompt: &str, style_tag: &str) -> String {
    let style = Style::parse(style_tag).unwrap_or_default();
    format!("{prompt}, {}", style.suffix())
}
