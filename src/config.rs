use serde::{Deserialize, Serialize};
use std::fs;
use std::path::{Component, Path, PathBuf};

use crate::analysis::FileCategory;
use crate::error::{ConfigError, Result};
use crate::scanner::ScanOptions;
use crate::trash::{CollisionPolicy, DEFAULT_RETENTION_DAYS, DEFAULT_TRASH_DIR_NAME};

/// Root configuration structure
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
#[serde(default)]
pub struct Config {
    pub scan: ScanConfig,
    pub duplicates: DuplicatesConfig,
    pub trash: TrashConfig,
    pub usage: UsageConfig,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(default)]
pub struct ScanConfig {
    /// Walk hidden (dot) files and directories
    pub include_hidden: bool,
    /// Follow symbolic links
    pub follow_symlinks: bool,
    /// Stay on the filesystem of the scan root
    pub one_file_system: bool,
    /// Maximum depth (0 = unlimited)
    pub max_depth: usize,
    /// Walk top-level subtrees in parallel
    pub parallel: bool,
    /// Worker threads for parallel walks (0 = auto)
    pub threads: usize,
}

#[derive(Debug, Clone, Default, Serialize, Deserialize)]
#[serde(default)]
pub struct DuplicatesConfig {
    /// Confirm size groups by exact byte comparison
    pub verify_content: bool,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(default)]
pub struct TrashConfig {
    /// Name of the trash directory created under the scan root
    pub dir_name: String,
    /// Days a trashed file is kept before a sweep removes it
    pub retention_days: u64,
    /// What to do when the trash already holds a file with the same name
    pub collision: CollisionPolicy,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(default)]
pub struct UsageConfig {
    /// Categories reported by `usage --by-category`
    pub categories: Vec<FileCategory>,
}

impl Default for ScanConfig {
    fn default() -> Self {
        Self {
            include_hidden: true,
            follow_symlinks: false,
            one_file_system: false,
            max_depth: 0,
            parallel: true,
            threads: 0,
        }
    }
}

impl Default for TrashConfig {
    fn default() -> Self {
        Self {
            dir_name: DEFAULT_TRASH_DIR_NAME.to_string(),
            retention_days: DEFAULT_RETENTION_DAYS,
            collision: CollisionPolicy::Suffix,
        }
    }
}

impl Default for UsageConfig {
    fn default() -> Self {
        Self {
            categories: vec![
                FileCategory::Video,
                FileCategory::Image,
                FileCategory::Document,
            ],
        }
    }
}

impl Config {
    /// Load configuration.
    ///
    /// An explicit path must exist and parse. Without one, the per-user file
    /// under the XDG config directory is used when present, defaults otherwise.
    pub fn load(path: Option<&Path>) -> Result<Self> {
        let config = match path {
            Some(path) => Self::from_file(path)?,
            None => match Self::default_path() {
                Some(path) if path.is_file() => Self::from_file(&path)?,
                _ => Self::default(),
            },
        };

        config.validate()?;
        Ok(config)
    }

    /// Per-user config location, e.g. `~/.config/dupe-sweeper/config.toml`
    pub fn default_path() -> Option<PathBuf> {
        dirs::config_dir().map(|dir| dir.join("dupe-sweeper").join("config.toml"))
    }

    fn from_file(path: &Path) -> Result<Self> {
        let content = fs::read_to_string(path).map_err(|source| ConfigError::ReadError {
            path: path.to_path_buf(),
            source,
        })?;

        let config = toml::from_str(&content).map_err(|source| ConfigError::ParseError {
            path: path.to_path_buf(),
            source,
        })?;

        tracing::debug!(path = %path.display(), "Read configuration file");
        Ok(config)
    }

    /// Check cross-field constraints that serde cannot express.
    pub fn validate(&self) -> Result<()> {
        let mut components = Path::new(&self.trash.dir_name).components();
        let single_component = matches!(
            (components.next(), components.next()),
            (Some(Component::Normal(_)), None)
        );
        if !single_component {
            return Err(ConfigError::Invalid(format!(
                "trash.dir_name must be a plain directory name, got '{}'",
                self.trash.dir_name
            ))
            .into());
        }

        if self.trash.retention_days == 0 {
            return Err(
                ConfigError::Invalid("trash.retention_days must be at least 1".into()).into(),
            );
        }

        if self.usage.categories.is_empty() {
            return Err(
                ConfigError::Invalid("usage.categories must list at least one category".into())
                    .into(),
            );
        }

        Ok(())
    }
}

impl ScanConfig {
    /// Translate into call-time scan options.
    pub fn to_options(&self) -> ScanOptions {
        let mut options = ScanOptions::new()
            .with_hidden(self.include_hidden)
            .with_follow_symlinks(self.follow_symlinks)
            .with_one_file_system(self.one_file_system)
            .with_threads(self.threads);
        if self.max_depth > 0 {
            options = options.with_max_depth(self.max_depth);
        }
        options
    }
}
