use serde::{Deserialize, Serialize};

use super::story::SlideType;

#[derive(Debug, Serialize, Deserialize, Clone, Copy, PartialEq, Eq, Hash)]
#[serde(rename_all = "snake_case")]
pub enum PhaseType {
    Learn,
    Draft,
    CommunityCheck,
    ConsultantCheck,
    WholeStory,
    BackTranslation,
    RemoteCheck,
    Dramatization,
    Create,
    Share,
}

impl Default for PhaseType {
    fn default() -> Self {
        PhaseType::Learn
    }
}

const LOCAL_PHASES: &[PhaseType] = &[
    PhaseType::Learn,
    PhaseType::Draft,
    PhaseType::CommunityCheck,
    PhaseType::ConsultantCheck,
    PhaseType::Dramatization,
    PhaseType::Create,
    PhaseType::Share,
];

const REMOTE_PHASES: &[PhaseType] = &[
    PhaseType::Learn,
    PhaseType::Draft,
    PhaseType::CommunityCheck,
    PhaseType::WholeStory,
    PhaseType::BackTranslation,
    PhaseType::RemoteCheck,
    PhaseType::Dramatization,
    PhaseType::Create,
    PhaseType::Share,
];

impl PhaseType {
    pub fn local_phases() -> &'static [PhaseType] {
        LOCAL_PHASES
    }

    pub fn remote_phases() -> &'static [PhaseType] {
        REMOTE_PHASES
    }

    /// Prefix used for recordings made in this phase.
    pub fn short_name(self) -> &'static str {
        match self {
            PhaseType::Learn => "learn",
            PhaseType::Draft => "draft",
            PhaseType::CommunityCheck => "comChk",
            PhaseType::ConsultantCheck => "consChk",
            PhaseType::WholeStory => "wholeStory",
            PhaseType::BackTranslation => "backT",
            PhaseType::RemoteCheck => "remoteChk",
            PhaseType::Dramatization => "drama",
            PhaseType::Create => "create",
            PhaseType::Share => "share",
        }
    }

    /// Whether a slide of this type can be navigated to while in this phase.
    pub fn displays_slide(self, slide_type: SlideType) -> bool {
        match self {
            PhaseType::Learn | PhaseType::WholeStory | PhaseType::Create | PhaseType::Share => true,
            PhaseType::Dramatization => matches!(
                slide_type,
                SlideType::FrontCover
                    | SlideType::NumberedPage
                    | SlideType::LocalSong
                    | SlideType::LocalCredits
            ),
            PhaseType::Draft
            | PhaseType::CommunityCheck
            | PhaseType::ConsultantCheck
            | PhaseType::BackTranslation
            | PhaseType::RemoteCheck => matches!(
                slide_type,
                SlideType::FrontCover | SlideType::NumberedPage | SlideType::LocalSong
            ),
        }
    }
}
