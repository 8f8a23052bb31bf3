use crate::results::VideoRecord;
use crate::utils::sanitize_filename;
use std::fs;
use std::path::{Path, PathBuf};
use thiserror::Error;

/// File stem used when the page has no usable channel heading
pub const FALLBACK_STEM: &str = "data";

#[derive(Error, Debug)]
pub enum ExportError {
    #[error("cannot serialize records: {0}")]
    Serialize(#[from] serde_json::Error),

    #[error("cannot write {}: {source}", path.display())]
    Io {
        path: PathBuf,
        #[source]
        source: std::io::Error,
    },
}

/// `<channel-title>.json`, with the title made safe for the filesystem
pub fn export_filename(channel_title: Option<&str>) -> String {
    let stem = channel_title
        .map(sanitize_filename)
        .filter(|stem| !stem.is_empty())
        .unwrap_or_else(|| FALLBACK_STEM.to_string());
    format!("{}.json", stem)
}

/// Writes `records` as a pretty-printed JSON array to `dir/file_name`
///
/// Faults are logged and swallowed. The file is staged next to its target
/// and renamed into place, so a failed export never leaves a partial file.
pub fn export(records: &[VideoRecord], dir: &Path, file_name: &str) -> Option<PathBuf> {
    match try_export(records, dir, file_name) {
        Ok(path) => {
            ::log::info!("Exported {} records to {}", records.len(), path.display());
            Some(path)
        }
        Err(e) => {
            ::log::error!("Export of {} failed: {}", file_name, e);
            None
        }
    }
}

fn try_export(records: &[VideoRecord], dir: &Path, file_name: &str) -> Result<PathBuf, ExportError> {
    let json = serde_json::to_string_pretty(records)?;

    let target = dir.join(file_name);
    let staging = dir.join(format!("{}.part", file_name));

    let written = fs::create_dir_all(dir)
        .and_then(|_| fs::write(&staging, json.as_bytes()))
        .and_then(|_| fs::rename(&staging, &target));

    if let Err(source) = written {
        let _ = fs::remove_file(&staging);
        return Err(ExportError::Io {
            path: target,
            source,
        });
    }

    Ok(target)
}

#[cfg(test)]
mod tests {
    use super::*;

    fn record(title: &str, cover_text: Option<&str>) -> VideoRecord {
        VideoRecord::new(
            title.to_string(),
            "1.2K views".to_string(),
            "3 days ago".to_string(),
            cover_text.map(str::to_string),
            "https://www.youtube.com/watch?v=abc".to_string(),
        )
    }

    #[test]
    fn test_export_filename() {
        assert_eq!(export_filename(Some("Demo Channel")), "Demo Channel.json");
        assert_eq!(export_filename(Some("AC/DC")), "AC_DC.json");
        assert_eq!(export_filename(Some("   ")), "data.json");
        assert_eq!(export_filename(None), "data.json");
    }

    #[test]
    fn test_export_writes_two_space_indented_array() {
        let tmp = tempfile::tempdir().unwrap();
        // Missing output directories are created
        let dir = tmp.path().join("out");
        let records = vec![record("Demo Video", Some("SAMPLE")), record("Other", None)];

        let path = export(&records, &dir, "Demo Channel.json").unwrap();
        let text = fs::read_to_string(&path).unwrap();

        assert!(text.starts_with("[\n  {\n    \"title\": \"Demo Video\","));
        let parsed: Vec<serde_json::Map<String, serde_json::Value>> =
            serde_json::from_str(&text).unwrap();
        assert_eq!(parsed.len(), 2);
        for object in &parsed {
            let mut keys: Vec<&str> = object.keys().map(String::as_str).collect();
            keys.sort();
            assert_eq!(keys, vec!["cover_text", "created", "title", "url", "views"]);
        }
        assert!(parsed[1]["cover_text"].is_null());
        assert!(!dir.join("Demo Channel.json.part").exists());
    }

    #[test]
    fn test_export_of_no_records_is_an_empty_array() {
        let dir = tempfile::tempdir().unwrap();
        let path = export(&[], dir.path(), "data.json").unwrap();
        assert_eq!(fs::read_to_string(&path).unwrap(), "[]");
    }

    #[test]
    fn test_failed_export_leaves_no_file() {
        let tmp = tempfile::tempdir().unwrap();
        let dir = tmp.path();
        // A directory where the target should go makes the final rename fail
        fs::create_dir_all(dir.join("taken.json").join("inner")).unwrap();

        assert!(export(&[record("x", None)], dir, "taken.json").is_none());
        assert!(!dir.join("taken.json.part").exists());
    }
}
