//! Newline-delimited JSON protocol spoken with the UI.
//!
//! Request: `{"id": .., "cmd": "..", "payload": {..}}`
//! Response: `{"id": .., "status": "ok", "payload": {..}}` or
//! `{"id": .., "status": "error", "message": ".."}`.

use std::path::PathBuf;

use serde_json::{json, Value};
use tracing::{debug, warn};

use crate::config::CoreConfig;
use crate::error::{CoreError, Result};
use crate::model::phase::PhaseType;
use crate::parsers::keyterm_csv;
use crate::services::encoding;
use crate::services::keyterm_index::KeytermIndex;
use crate::services::workspace::{Workspace, WorkspaceConfig, WorkspacePrefs};

mod command;
pub use command::Command;

fn get_cmd(req: &Value) -> &str {
    req.get("cmd").and_then(|v| v.as_str()).unwrap_or("")
}

fn get_id(req: &Value) -> Value {
    req.get("id").cloned().unwrap_or(Value::Null)
}

fn get_payload(req: &Value) -> &Value {
    static EMPTY: Value = Value::Null;
    req.get("payload").unwrap_or(&EMPTY)
}

fn required_str<'a>(payload: &'a Value, key: &str) -> Result<&'a str> {
    payload
        .get(key)
        .and_then(|v| v.as_str())
        .filter(|s| !s.trim().is_empty())
        .ok_or_else(|| CoreError::InvalidPayload(format!("payload.{key} is required")))
}

fn ok(id: Value, payload: Value) -> String {
    json!({
        "id": id,
        "status": "ok",
        "payload": payload
    })
    .to_string()
}

fn err(id: Value, message: impl Into<String>) -> String {
    json!({
        "id": id,
        "status": "error",
        "message": message.into()
    })
    .to_string()
}

/// State carried across requests of one core process.
pub struct Session {
    config: CoreConfig,
    workspace: Option<Workspace>,
    keyterms: Option<KeytermIndex>,
}

impl Session {
    pub fn new(config: CoreConfig) -> Self {
        Self {
            config,
            workspace: None,
            keyterms: None,
        }
    }

    /// Reopens the workspace remembered in preferences, if any.
    pub fn restore(config: CoreConfig) -> Self {
        let mut session = Self::new(config);

        let prefs = match WorkspacePrefs::load(&session.config) {
            Ok(p) => p,
            Err(e) => {
                warn!(error = %e, "failed to read preferences");
                return session;
            }
        };

        if let Some(root) = prefs.workspace {
            match Workspace::init(session.workspace_config(root)) {
                Ok(ws) => session.workspace = Some(ws),
                Err(e) => warn!(error = %e, "failed to reopen workspace"),
            }
        }

        session
    }

    pub fn workspace(&self) -> Option<&Workspace> {
        self.workspace.as_ref()
    }

    pub fn handle(&mut self, input: &str) -> String {
        let req: Value = match serde_json::from_str(input) {
            Ok(v) => v,
            Err(_) => {
                return json!({
                    "status": "error",
                    "message": "invalid json"
                })
                .to_string();
            }
        };

        let id = get_id(&req);
        let cmd_str = get_cmd(&req);
        let payload = get_payload(&req);

        debug!(cmd = cmd_str, "request");

        match self.dispatch(Command::from(cmd_str), payload) {
            Ok(result) => ok(id, result),
            Err(e) => {
                debug!(cmd = cmd_str, error = %e, "request failed");
                err(id, e.to_string())
            }
        }
    }

    fn dispatch(&mut self, cmd: Command, payload: &Value) -> Result<Value> {
        match cmd {
            Command::Ping => Ok(json!({ "message": "storyproducer-core alive" })),

            Command::KeytermParse => {
                let text = payload.get("text").and_then(|v| v.as_str()).unwrap_or("");
                let keyterms = keyterm_csv::parse(text)?;
                Ok(json!({ "keyterms": keyterms }))
            }

            Command::KeytermLoad => {
                let path = PathBuf::from(required_str(payload, "path")?);
                let decoded = encoding::read_text(&path)?;
                let keyterms = keyterm_csv::parse(&decoded.text)?;
                let index = KeytermIndex::new(keyterms)?;

                let result = json!({
                    "keyterms": index.keyterms(),
                    "encoding": decoded.encoding
                });
                self.keyterms = Some(index);
                Ok(result)
            }

            Command::KeytermLookup => {
                let word = required_str(payload, "word")?;
                let index = self.keyterms.as_ref().ok_or(CoreError::KeytermsNotLoaded)?;
                Ok(json!({ "keyterm": index.lookup(word) }))
            }

            Command::KeytermScan => {
                let text = payload.get("text").and_then(|v| v.as_str()).unwrap_or("");
                let index = self.keyterms.as_ref().ok_or(CoreError::KeytermsNotLoaded)?;
                Ok(json!({ "matches": index.scan(text) }))
            }

            Command::EncodingDetect => {
                let path = PathBuf::from(required_str(payload, "path")?);
                Ok(serde_json::to_value(encoding::detect_from_file(&path)?)?)
            }

            Command::WorkspaceOpen => {
                let root = PathBuf::from(required_str(payload, "path")?);
                let ws = Workspace::init(self.workspace_config(root.clone()))?;

                WorkspacePrefs {
                    workspace: Some(root),
                }
                .save(&self.config)?;

                let state = state_json(&ws);
                self.workspace = Some(ws);
                Ok(state)
            }

            Command::WorkspaceState => Ok(state_json(self.workspace_ref()?)),

            Command::WorkspaceReset => {
                let ws = self.workspace_mut()?;
                ws.reset()?;
                Ok(state_json(ws))
            }

            Command::WorkspaceClose => {
                self.workspace = None;
                WorkspacePrefs::default().save(&self.config)?;
                Ok(json!({ "closed": true }))
            }

            Command::StoryList => {
                let ws = self.workspace_ref()?;
                let stories: Vec<_> = ws.stories().collect();
                Ok(json!({ "stories": stories }))
            }

            Command::StorySelect => {
                let title = required_str(payload, "title")?;
                let ws = self.workspace_mut()?;
                ws.select_story(title)?;
                Ok(state_json(ws))
            }

            Command::StorySave => {
                let ws = self.workspace_mut()?;
                ws.save_active_story()?;
                Ok(state_json(ws))
            }

            Command::PhaseNext | Command::PhasePrevious => {
                let ws = self.workspace_mut()?;
                let changed = if cmd == Command::PhaseNext {
                    ws.go_to_next_phase()
                } else {
                    ws.go_to_previous_phase()
                };
                Ok(json!({ "changed": changed, "state": state_json(ws) }))
            }

            Command::PhaseSet => {
                let phase_val = payload.get("phase").cloned().unwrap_or(Value::Null);
                let phase: PhaseType = serde_json::from_value(phase_val)
                    .map_err(|e| CoreError::InvalidPayload(format!("payload.phase: {e}")))?;
                let ws = self.workspace_mut()?;
                ws.set_active_phase(phase);
                Ok(state_json(ws))
            }

            Command::SlideSet => {
                let num = payload
                    .get("slide_num")
                    .and_then(|v| v.as_u64())
                    .ok_or_else(|| CoreError::InvalidPayload("payload.slide_num is required".into()))?;
                let num = usize::try_from(num).map_err(|_| {
                    CoreError::InvalidPayload(format!("payload.slide_num {num} is out of range"))
                })?;
                let ws = self.workspace_mut()?;
                ws.set_active_slide_num(num);
                Ok(state_json(ws))
            }

            Command::VideoDelete => {
                let name = required_str(payload, "name")?;
                let ws = self.workspace_mut()?;
                ws.delete_video(name)?;
                Ok(state_json(ws))
            }

            Command::Unknown => Err(CoreError::UnknownCommand),
        }
    }

    fn workspace_config(&self, root: PathBuf) -> WorkspaceConfig {
        WorkspaceConfig::new(root).with_demo_dir(self.config.demo_dir.clone())
    }

    fn workspace_ref(&self) -> Result<&Workspace> {
        self.workspace.as_ref().ok_or(CoreError::WorkspaceNotOpen)
    }

    fn workspace_mut(&mut self) -> Result<&mut Workspace> {
        self.workspace.as_mut().ok_or(CoreError::WorkspaceNotOpen)
    }
}

fn state_json(ws: &Workspace) -> Value {
    let story = ws.active_story();
    json!({
        "root": ws.root(),
        "phases": ws.phases(),
        "story_count": ws.stories().count(),
        "active_story": story.map(|s| s.title.as_str()),
        "story_number": story.map(|s| s.title_number()),
        "active_phase": ws.active_phase(),
        "active_phase_index": ws.active_phase_index(),
        "active_slide_num": ws.active_slide_num(),
        "filename_root": ws.active_filename_root(),
        "song_filename": ws.song_filename(),
        "local_credits_changed": ws.is_local_credits_changed(),
        "output_videos": story.map(|s| s.output_videos.as_slice()).unwrap_or_default(),
    })
}
