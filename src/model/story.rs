use serde::{Deserialize, Serialize};

use super::phase::PhaseType;

#[derive(Debug, Serialize, Deserialize, Clone, Copy, PartialEq, Eq)]
#[serde(rename_all = "snake_case")]
pub enum SlideType {
    FrontCover,
    NumberedPage,
    LocalSong,
    LocalCredits,
    Copyright,
    EndPage,
}

impl Default for SlideType {
    fn default() -> Self {
        SlideType::NumberedPage
    }
}

#[derive(Debug, Serialize, Deserialize, Clone, Default, PartialEq)]
pub struct Slide {
    #[serde(default)]
    pub slide_type: SlideType,

    #[serde(default)]
    pub title: String,

    #[serde(default)]
    pub content: String,

    #[serde(default)]
    pub translated_content: String,

    #[serde(default)]
    pub chosen_draft_file: String,

    #[serde(default)]
    pub chosen_dramatization_file: String,
}

#[derive(Debug, Serialize, Deserialize, Clone, Default, PartialEq)]
pub struct Story {
    pub title: String,

    #[serde(default)]
    pub slides: Vec<Slide>,

    #[serde(default)]
    pub last_phase_type: PhaseType,

    #[serde(default)]
    pub last_slide_num: usize,

    #[serde(default)]
    pub output_videos: Vec<String>,
}

impl Story {
    /// Leading digits of the title, e.g. `"000"` for `"000 Unlocked demo story Storm"`.
    pub fn title_number(&self) -> &str {
        let end = self
            .title
            .find(|c: char| !c.is_ascii_digit())
            .unwrap_or(self.title.len());
        &self.title[..end]
    }

    pub fn slides_of_type(&self, slide_type: SlideType) -> impl Iterator<Item = &Slide> {
        self.slides.iter().filter(move |s| s.slide_type == slide_type)
    }
}
