//! Input folder discovery

use std::fs;
use std::path::{Path, PathBuf};
use tracing::debug;

use crate::error::{Result, WatermarkError};
use crate::processing::formats::is_supported_input_format;

/// List the supported images directly inside `input_folder`.
///
/// Only regular files whose extension is one of the supported formats
/// (case-insensitive) are returned. Subdirectories are not descended into.
///
/// The order is whatever the file system enumeration yields. It is not
/// sorted and callers must not rely on lexicographic order.
pub fn scan_directory<P: AsRef<Path>>(input_folder: P) -> Result<Vec<PathBuf>> {
    let input_folder = input_folder.as_ref();

    let entries = fs::read_dir(input_folder)
        .map_err(|e| WatermarkError::input_folder(input_folder.to_path_buf(), e.to_string()))?;

    let mut files = Vec::new();
    for entry in entries {
        let entry = entry
            .map_err(|e| WatermarkError::input_folder(input_folder.to_path_buf(), e.to_string()))?;
        let path = entry.path();

        if !path.is_file() {
            continue;
        }

        match path.extension().and_then(|e| e.to_str()) {
            Some(ext) if is_supported_input_format(ext) => files.push(path),
            _ => debug!("Ignoring unsupported entry: {:?}", path),
        }
    }

    debug!("Found {} candidate images in {:?}", files.len(), input_folder);
    Ok(files)
}

#[cfg(test)]
mod tests {
    use super::*;
    use tempfile::TempDir;

    fn names(files: &[PathBuf]) -> Vec<String> {
        let mut names: Vec<String> = files
            .iter()
            .filter_map(|p| p.file_name().map(|n| n.to_string_lossy().into_owned()))
            .collect();
        names.sort();
        names
    }

    #[test]
    fn test_scan_filters_by_extension() {
        let dir = TempDir::new().unwrap();
        for name in ["a.png", "b.JPG", "c.jpeg", "d.Bmp", "e.gif", "notes.txt", "f.webp", "noext"] {
            fs::write(dir.path().join(name), b"x").unwrap();
        }

        let files = scan_directory(dir.path()).unwrap();
        assert_eq!(names(&files), vec!["a.png", "b.JPG", "c.jpeg", "d.Bmp", "e.gif"]);
    }

    #[test]
    fn test_scan_is_not_recursive() {
        let dir = TempDir::new().unwrap();
        fs::create_dir(dir.path().join("nested")).unwrap();
        fs::write(dir.path().join("nested").join("inner.png"), b"x").unwrap();
        fs::create_dir(dir.path().join("folder.png")).unwrap();
        fs::write(dir.path().join("top.png"), b"x").unwrap();

        let files = scan_directory(dir.path()).unwrap();
        assert_eq!(names(&files), vec!["top.png"]);
    }

    #[test]
    fn test_scan_empty_folder() {
        let dir = TempDir::new().unwrap();
        assert!(scan_directory(dir.path()).unwrap().is_empty());
    }

    #[test]
    fn test_scan_missing_folder() {
        let dir = TempDir::new().unwrap();
        let err = scan_directory(dir.path().join("missing")).unwrap_err();
        assert!(matches!(err, WatermarkError::InputFolderError { .. }));
    }
}
