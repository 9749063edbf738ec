use serde::{Deserialize, Serialize};
use std::fmt;
use std::path::Path;

use crate::scanner::extension_of;

/// Coarse file categories used for type-based space breakdowns.
#[derive(
    Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize, Deserialize, clap::ValueEnum,
)]
#[serde(rename_all = "lowercase")]
pub enum FileCategory {
    Video,
    Image,
    Audio,
    Document,
    Archive,
}

/// Static extension table; extensions are lowercase with the leading dot.
const EXTENSION_TABLE: &[(&str, FileCategory)] = &[
    (".mp4", FileCategory::Video),
    (".avi", FileCategory::Video),
    (".mkv", FileCategory::Video),
    (".mov", FileCategory::Video),
    (".webm", FileCategory::Video),
    (".wmv", FileCategory::Video),
    (".jpg", FileCategory::Image),
    (".jpeg", FileCategory::Image),
    (".png", FileCategory::Image),
    (".gif", FileCategory::Image),
    (".bmp", FileCategory::Image),
    (".webp", FileCategory::Image),
    (".tiff", FileCategory::Image),
    (".mp3", FileCategory::Audio),
    (".flac", FileCategory::Audio),
    (".wav", FileCategory::Audio),
    (".ogg", FileCategory::Audio),
    (".m4a", FileCategory::Audio),
    (".docx", FileCategory::Document),
    (".doc", FileCategory::Document),
    (".pdf", FileCategory::Document),
    (".txt", FileCategory::Document),
    (".odt", FileCategory::Document),
    (".xlsx", FileCategory::Document),
    (".pptx", FileCategory::Document),
    (".md", FileCategory::Document),
    (".zip", FileCategory::Archive),
    (".tar", FileCategory::Archive),
    (".gz", FileCategory::Archive),
    (".xz", FileCategory::Archive),
    (".7z", FileCategory::Archive),
    (".rar", FileCategory::Archive),
];

impl FileCategory {
    pub const ALL: [FileCategory; 5] = [
        FileCategory::Video,
        FileCategory::Image,
        FileCategory::Audio,
        FileCategory::Document,
        FileCategory::Archive,
    ];

    /// Category for a lowercase, dot-prefixed extension
    pub fn from_extension(ext: &str) -> Option<Self> {
        EXTENSION_TABLE
            .iter()
            .find(|(known, _)| *known == ext)
            .map(|(_, category)| *category)
    }

    pub fn of_path(path: &Path) -> Option<Self> {
        extension_of(path).and_then(|ext| Self::from_extension(&ext))
    }

    pub fn name(&self) -> &'static str {
        match self {
            FileCategory::Video => "Video",
            FileCategory::Image => "Image",
            FileCategory::Audio => "Audio",
            FileCategory::Document => "Document",
            FileCategory::Archive => "Archive",
        }
    }
}

impl fmt::Display for FileCategory {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.name())
    }
}
