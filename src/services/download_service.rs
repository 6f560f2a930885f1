// services/download_service.rs

use std::path::PathBuf;

use tracing::debug;

use crate::config::Settings;

/// Whitelisted download targets
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum FileType {
    /// `project_wide.txt` under the project static root
    Project,
    /// `example.txt` under the app static root
    App,
}

impl FileType {
    pub fn parse(token: &str) -> Option<Self> {
        match token {
            "project" => Some(FileType::Project),
            "app" => Some(FileType::App),
            _ => None,
        }
    }

    pub fn path(self, settings: &Settings) -> PathBuf {
        match self {
            FileType::Project => settings.static_dir.join("project_wide.txt"),
            FileType::App => settings.app_static_dir.join("example.txt"),
        }
    }
}

/// A resolved, existing download target
#[derive(Debug)]
pub struct ResolvedFile {
    pub path: PathBuf,
    pub filename: String,
}

impl ResolvedFile {
    pub fn content_disposition(&self) -> String {
        format!("attachment; filename=\"{}\"", self.filename)
    }
}

/// Maps a `file_type` token to an existing regular file.
///
/// Every failure collapses to `None`; the cause is only logged.
pub async fn resolve(file_type: &str, settings: &Settings) -> Option<ResolvedFile> {
    let Some(kind) = FileType::parse(file_type) else {
        debug!("Unknown file type requested: {:?}", file_type);
        return None;
    };
    let path = kind.path(settings);

    match tokio::fs::metadata(&path).await {
        Ok(meta) if meta.is_file() => {}
        Ok(_) => {
            debug!("Download target is not a regular file: {}", path.display());
            return None;
        }
        Err(e) => {
            debug!("Download target unavailable {}: {}", path.display(), e);
            return None;
        }
    }

    let filename = path.file_name()?.to_string_lossy().into_owned();
    Some(ResolvedFile { path, filename })
}
