use std::path::PathBuf;

const HOME_ENV: &str = "STORYPRODUCER_HOME";
const DEMO_DIR_ENV: &str = "STORYPRODUCER_DEMO_DIR";
const LOG_ENV: &str = "STORYPRODUCER_LOG";

const DEFAULT_LOG_FILTER: &str = "info";
const PREFS_FILE: &str = "workspace.json";

/// Process-level settings, resolved once at startup.
#[derive(Debug, Clone)]
pub struct CoreConfig {
    /// Where preferences (last opened workspace) are kept.
    pub home_dir: PathBuf,

    /// Source folder of the bundled demo story, copied into new workspaces.
    pub demo_dir: Option<PathBuf>,

    /// `tracing_subscriber::EnvFilter` directive.
    pub log_filter: String,
}

impl CoreConfig {
    pub fn new(home_dir: impl Into<PathBuf>) -> Self {
        Self {
            home_dir: home_dir.into(),
            demo_dir: None,
            log_filter: DEFAULT_LOG_FILTER.to_string(),
        }
    }

    pub fn from_env() -> Self {
        let mut config = Self::new(home_dir_from_env());

        config.demo_dir = std::env::var(DEMO_DIR_ENV)
            .ok()
            .filter(|v| !v.trim().is_empty())
            .map(PathBuf::from);

        if let Ok(filter) = std::env::var(LOG_ENV) {
            if !filter.trim().is_empty() {
                config.log_filter = filter;
            }
        }

        config
    }

    pub fn prefs_path(&self) -> PathBuf {
        self.home_dir.join(PREFS_FILE)
    }
}

fn home_dir_from_env() -> PathBuf {
    if let Ok(home) = std::env::var(HOME_ENV) {
        if !home.trim().is_empty() {
            return PathBuf::from(home);
        }
    }
    if let Ok(local) = std::env::var("LOCALAPPDATA") {
        return PathBuf::from(local).join("StoryProducer");
    }
    std::env::current_dir()
        .unwrap_or_else(|_| PathBuf::from("."))
        .join(".storyproducer")
}
