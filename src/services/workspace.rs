//! Story workspace: the folder of stories a translator works in, plus the
//! navigation state (active story, phase and slide) the UI drives.
//!
//! A [`Workspace`] is an explicit context value. Create it with
//! [`Workspace::init`], pass it to whatever needs it, and call
//! [`Workspace::reset`] to drop cached state and rescan the disk.

use std::fs;
use std::path::{Component, Path, PathBuf};

use serde::{Deserialize, Serialize};
use tracing::{debug, info, warn};

use crate::config::CoreConfig;
use crate::error::{CoreError, Result};
use crate::model::phase::PhaseType;
use crate::model::registration::Registration;
use crate::model::story::{Slide, SlideType, Story};
use crate::services::storage;

pub const DEMO_FOLDER: &str = "000 Unlocked demo story Storm";
pub const STORY_FILE: &str = "project/story.json";
pub const VIDEO_DIR: &str = "videos";

pub const DEFAULT_LOCAL_CREDITS_TEXT: &str =
    "Enter the names of the people who helped make this story.";

#[derive(Debug, Clone)]
pub struct WorkspaceConfig {
    pub root: PathBuf,

    /// Copied into the workspace as [`DEMO_FOLDER`] when it is missing.
    pub demo_dir: Option<PathBuf>,

    /// Placeholder for empty local-credits slides.
    pub local_credits_text: String,
}

impl WorkspaceConfig {
    pub fn new(root: impl Into<PathBuf>) -> Self {
        Self {
            root: root.into(),
            demo_dir: None,
            local_credits_text: DEFAULT_LOCAL_CREDITS_TEXT.to_string(),
        }
    }

    pub fn with_demo_dir(mut self, demo_dir: Option<PathBuf>) -> Self {
        self.demo_dir = demo_dir;
        self
    }
}

/// Persisted between runs so the last workspace reopens on startup.
#[derive(Debug, Serialize, Deserialize, Clone, Default, PartialEq)]
pub struct WorkspacePrefs {
    #[serde(default)]
    pub workspace: Option<PathBuf>,
}

impl WorkspacePrefs {
    pub fn load(config: &CoreConfig) -> Result<Self> {
        Ok(storage::read_json(&config.prefs_path())?.unwrap_or_default())
    }

    pub fn save(&self, config: &CoreConfig) -> Result<()> {
        storage::write_json(&config.prefs_path(), self)
    }
}

#[derive(Debug)]
struct StoryDir {
    dir: PathBuf,
    story: Story,
}

#[derive(Debug)]
pub struct Workspace {
    config: WorkspaceConfig,
    registration: Registration,
    stories: Vec<StoryDir>,
    phases: &'static [PhaseType],
    active_story: Option<usize>,
    active_phase: PhaseType,
    active_phase_index: Option<usize>,
    active_slide_num: usize,
}

impl Workspace {
    pub fn init(config: WorkspaceConfig) -> Result<Self> {
        fs::create_dir_all(&config.root)?;

        install_demo(&config);

        let mut ws = Self {
            config,
            registration: Registration::default(),
            stories: Vec::new(),
            phases: PhaseType::local_phases(),
            active_story: None,
            active_phase: PhaseType::Learn,
            active_phase_index: None,
            active_slide_num: 0,
        };
        ws.reset()?;

        info!(
            root = %ws.root().display(),
            stories = ws.stories.len(),
            "workspace opened"
        );
        Ok(ws)
    }

    /// Forgets the active selection, reloads registration and rescans stories.
    pub fn reset(&mut self) -> Result<()> {
        self.active_story = None;
        self.active_phase = PhaseType::Learn;
        self.active_slide_num = 0;

        self.registration = match Registration::load(&self.config.root) {
            Ok(r) => r,
            Err(e) => {
                warn!(
                    root = %self.config.root.display(),
                    error = %e,
                    "unreadable registration, using defaults"
                );
                Registration::default()
            }
        };
        self.stories = scan_stories(&self.config.root)?;
        self.stories.sort_by(|a, b| a.story.title.cmp(&b.story.title));
        self.fill_local_credits();

        self.phases = self.registration.phases();
        self.active_phase_index = Some(0);

        Ok(())
    }

    pub fn root(&self) -> &Path {
        &self.config.root
    }

    pub fn registration(&self) -> &Registration {
        &self.registration
    }

    pub fn stories(&self) -> impl Iterator<Item = &Story> {
        self.stories.iter().map(|s| &s.story)
    }

    pub fn phases(&self) -> &'static [PhaseType] {
        self.phases
    }

    pub fn active_story(&self) -> Option<&Story> {
        self.active_story.map(|i| &self.stories[i].story)
    }

    pub fn active_phase(&self) -> PhaseType {
        self.active_phase
    }

    pub fn active_phase_index(&self) -> Option<usize> {
        self.active_phase_index
    }

    pub fn active_slide_num(&self) -> usize {
        self.active_slide_num
    }

    pub fn active_slide(&self) -> Option<&Slide> {
        self.active_story()?.slides.get(self.active_slide_num)
    }

    /// Switches stories and recalls where the translator left off.
    pub fn select_story(&mut self, title: &str) -> Result<&Story> {
        let idx = self
            .stories
            .iter()
            .position(|s| s.story.title == title)
            .ok_or_else(|| CoreError::StoryNotFound(title.to_string()))?;

        self.active_story = Some(idx);
        let (phase, slide) = {
            let story = &self.stories[idx].story;
            (story.last_phase_type, story.last_slide_num)
        };
        self.set_active_phase(phase);
        self.set_active_slide_num(slide);

        debug!(title, ?phase, slide = self.active_slide_num, "story selected");
        Ok(&self.stories[idx].story)
    }

    pub fn set_active_phase(&mut self, phase: PhaseType) {
        self.active_phase = phase;
        self.active_phase_index = self.phases.iter().position(|&p| p == phase);
    }

    /// Accepts `num` only if it names a slide the active phase displays;
    /// anything else falls back to slide 0.
    pub fn set_active_slide_num(&mut self, num: usize) {
        let valid = self
            .active_story()
            .and_then(|s| s.slides.get(num))
            .is_some_and(|slide| self.active_phase.displays_slide(slide.slide_type));

        self.active_slide_num = if valid { num } else { 0 };
    }

    /// Prefix for recordings of the active phase and slide, e.g. `draft3`.
    pub fn active_filename_root(&self) -> String {
        format!("{}{}", self.active_phase.short_name(), self.active_slide_num)
    }

    pub fn go_to_next_phase(&mut self) -> bool {
        let Some(idx) = self.active_phase_index else {
            return false;
        };
        let last = self.phases.len().saturating_sub(1);
        if idx >= last {
            self.active_phase_index = Some(last);
            return false;
        }
        self.set_active_phase(self.phases[idx + 1]);
        true
    }

    pub fn go_to_previous_phase(&mut self) -> bool {
        let Some(idx) = self.active_phase_index else {
            return false;
        };
        if idx == 0 {
            return false;
        }
        self.set_active_phase(self.phases[idx - 1]);
        true
    }

    /// Dramatized song recording if chosen, else the drafted one.
    pub fn song_filename(&self) -> Option<&str> {
        let story = self.active_story()?;
        story.slides_of_type(SlideType::LocalSong).find_map(|s| {
            [&s.chosen_dramatization_file, &s.chosen_draft_file]
                .into_iter()
                .find(|f| !f.is_empty())
                .map(String::as_str)
        })
    }

    pub fn is_local_credits_changed(&self) -> bool {
        self.active_story().is_some_and(|story| {
            story
                .slides_of_type(SlideType::LocalCredits)
                .any(|s| s.translated_content != self.config.local_credits_text)
        })
    }

    /// Removes `name` from the active story and deletes `<root>/videos/<name>`.
    /// `name` must be a bare file name.
    pub fn delete_video(&mut self, name: &str) -> Result<()> {
        let mut components = Path::new(name).components();
        if !matches!(
            (components.next(), components.next()),
            (Some(Component::Normal(_)), None)
        ) {
            return Err(CoreError::InvalidPayload(format!(
                "video name {name:?} is not a file name"
            )));
        }

        let idx = self.active_story.ok_or(CoreError::NoActiveStory)?;
        self.stories[idx].story.output_videos.retain(|v| v != name);

        let path = self.config.root.join(VIDEO_DIR).join(name);
        match fs::remove_file(&path) {
            Ok(()) => debug!(path = %path.display(), "video deleted"),
            Err(e) if e.kind() == std::io::ErrorKind::NotFound => {}
            Err(e) => return Err(e.into()),
        }
        Ok(())
    }

    /// Records the current phase/slide in the active story and writes it out.
    pub fn save_active_story(&mut self) -> Result<()> {
        let idx = self.active_story.ok_or(CoreError::NoActiveStory)?;
        let (phase, slide) = (self.active_phase, self.active_slide_num);

        let entry = &mut self.stories[idx];
        entry.story.last_phase_type = phase;
        entry.story.last_slide_num = slide;

        storage::write_json(&entry.dir.join(STORY_FILE), &entry.story)?;
        debug!(title = %entry.story.title, "story saved");
        Ok(())
    }

    fn fill_local_credits(&mut self) {
        let text = &self.config.local_credits_text;
        for entry in &mut self.stories {
            for slide in &mut entry.story.slides {
                if slide.slide_type == SlideType::LocalCredits && slide.translated_content.is_empty()
                {
                    slide.translated_content = text.clone();
                }
            }
        }
    }
}

fn install_demo(config: &WorkspaceConfig) {
    let Some(demo_dir) = &config.demo_dir else {
        return;
    };

    let target = config.root.join(DEMO_FOLDER);
    if target.exists() {
        return;
    }

    match storage::copy_dir(demo_dir, &target) {
        Ok(files) => info!(files, "demo story installed"),
        Err(e) => warn!(demo = %demo_dir.display(), error = %e, "failed to install demo story"),
    }
}

fn scan_stories(root: &Path) -> Result<Vec<StoryDir>> {
    let mut stories = Vec::new();

    for entry in fs::read_dir(root)?.flatten() {
        let dir = entry.path();
        if !dir.is_dir() {
            continue;
        }

        let path = dir.join(STORY_FILE);
        match storage::read_json::<Story>(&path) {
            Ok(Some(story)) => stories.push(StoryDir { dir, story }),
            Ok(None) => {}
            Err(e) => warn!(file = %path.display(), error = %e, "skipping unreadable story"),
        }
    }

    Ok(stories)
}
