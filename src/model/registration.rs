use std::collections::BTreeMap;
use std::fs;
use std::path::Path;

use serde::{Deserialize, Serialize};

use crate::error::Result;

use super::phase::PhaseType;

pub const REGISTRATION_FILE: &str = "registration.json";

/// Answers from the registration form, stored as a flat string map.
#[derive(Debug, Serialize, Deserialize, Clone, Default, PartialEq)]
#[serde(transparent)]
pub struct Registration {
    values: BTreeMap<String, String>,
}

impl Registration {
    /// Missing file means "not registered yet" and yields an empty registration.
    pub fn load(workspace_root: &Path) -> Result<Self> {
        let path = workspace_root.join(REGISTRATION_FILE);
        if !path.exists() {
            return Ok(Self::default());
        }
        let data = fs::read_to_string(&path)?;
        Ok(serde_json::from_str(&data)?)
    }

    pub fn get(&self, key: &str) -> Option<&str> {
        self.values.get(key).map(String::as_str)
    }

    pub fn is_remote_consultant(&self) -> bool {
        self.get("consultant_location_type") == Some("remote")
    }

    pub fn phases(&self) -> &'static [PhaseType] {
        if self.is_remote_consultant() {
            PhaseType::remote_phases()
        } else {
            PhaseType::local_phases()
        }
    }
}
