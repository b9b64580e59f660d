#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Command {
    Ping,
    KeytermParse,
    KeytermLoad,
    KeytermLookup,
    KeytermScan,
    EncodingDetect,
    WorkspaceOpen,
    WorkspaceState,
    WorkspaceReset,
    WorkspaceClose,
    StoryList,
    StorySelect,
    StorySave,
    PhaseNext,
    PhasePrevious,
    PhaseSet,
    SlideSet,
    VideoDelete,
    Unknown,
}

impl From<&str> for Command {
    fn from(s: &str) -> Self {
        match s {
            "ping" => Command::Ping,
            "keyterm.parse" => Command::KeytermParse,
            "keyterm.load" => Command::KeytermLoad,
            "keyterm.lookup" => Command::KeytermLookup,
            "keyterm.scan" => Command::KeytermScan,
            "encoding.detect" => Command::EncodingDetect,
            "workspace.open" => Command::WorkspaceOpen,
            "workspace.state" => Command::WorkspaceState,
            "workspace.reset" => Command::WorkspaceReset,
            "workspace.close" => Command::WorkspaceClose,
            "story.list" => Command::StoryList,
            "story.select" => Command::StorySelect,
            "story.save" => Command::StorySave,
            "phase.next" => Command::PhaseNext,
            "phase.previous" => Command::PhasePrevious,
            "phase.set" => Command::PhaseSet,
            "slide.set" => Command::SlideSet,
            "video.delete" => Command::VideoDelete,
            _ => Command::Unknown,
        }
    }
}
