//! ZIP bundle of the final HTML and its metadata JSON.

use std::io::{Cursor, Write};
use std::path::Path;

use serde::Serialize;
use thiserror::Error;
use zip::write::SimpleFileOptions;
use zip::{CompressionMethod, ZipWriter};

#[derive(Debug, Error)]
pub enum BundleError {
    #[error("zip error: {0}")]
    Zip(#[from] zip::result::ZipError),

    #[error("I/O error: {0}")]
    Io(#[from] std::io::Error),

    #[error("failed to serialize metadata: {0}")]
    Json(#[from] serde_json::Error),
}

/// Two-entry archive: `{stem}.html` and `{stem}.json`.
pub struct StoryBundle<'a, M: Serialize> {
    pub stem: &'a str,
    pub html: &'a str,
    pub metadata: &'a M,
}

impl<'a, M: Serialize> StoryBundle<'a, M> {
    pub fn new(stem: &'a str, html: &'a str, metadata: &'a M) -> Self {
        Self { stem, html, metadata }
    }

    pub fn html_name(&self) -> String {
        format!("{}.html", self.stem)
    }

    pub fn json_name(&self) -> String {
        format!("{}.json", self.stem)
    }

    /// Deflate-compressed archive bytes.
    pub fn to_bytes(&self) -> Result<Vec<u8>, BundleError> {
        let json = serde_json::to_string_pretty(self.metadata)?;
        let options = SimpleFileOptions::default().compression_method(CompressionMethod::Deflated);

        let mut zip = ZipWriter::new(Cursor::new(Vec::new()));
        zip.start_file(self.html_name(), options)?;
        zip.write_all(self.html.as_bytes())?;
        zip.start_file(self.json_name(), options)?;
        zip.write_all(json.as_bytes())?;

        let bytes = zip.finish()?.into_inner();
        log::debug!("bundle: {} bytes for {}", bytes.len(), self.stem);
        Ok(bytes)
    }

    /// Write the archive to `path`, creating parent directories.
    pub fn write_to(&self, path: &Path) -> Result<(), BundleError> {
        if let Some(parent) = path.parent() {
            std::fs::create_dir_all(parent)?;
        }
        std::fs::write(path, self.to_bytes()?)?;
        log::info!("bundle: wrote {}", path.display());
        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::io::Read;
    use tempfile::tempdir;

    fn read_entry(bytes: Vec<u8>, name: &str) -> String {
        let mut archive = zip::ZipArchive::new(Cursor::new(bytes)).unwrap();
        let mut out = String::new();
        archive.by_name(name).unwrap().read_to_string(&mut out).unwrap();
        out
    }

    #[test]
    fn archive_holds_html_and_pretty_json() {
        let meta = serde_json::json!({ "story_title": "शीर्षक", "publisher_id": 1 });
        let bundle = StoryBundle::new("story", "<html>ok</html>", &meta);
        let bytes = bundle.to_bytes().unwrap();

        assert_eq!(read_entry(bytes.clone(), "story.html"), "<html>ok</html>");
        let json = read_entry(bytes, "story.json");
        assert!(json.contains("\n  \"story_title\": \"शीर्षक\""));
    }

    #[test]
    fn writes_into_new_directory() {
        let dir = tempdir().unwrap();
        let path = dir.path().join("out").join("story.zip");
        let meta = serde_json::json!({});

        StoryBundle::new("story", "<html/>", &meta).write_to(&path).unwrap();

        let bytes = std::fs::read(&path).unwrap();
        assert_eq!(read_entry(bytes, "story.html"), "<html/>");
    }
}
