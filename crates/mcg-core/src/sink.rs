use std::fs;
use std::io;
use std::path::{Path, PathBuf};

use log::{debug, info};

use crate::GeneratedFile;

/// Entry-name prefixes that survive every clean.
const ALWAYS_PRESERVED: [&str; 2] = [".git", ".svn"];

/// Destination for rendered artifacts.
pub trait ArtifactSink {
    /// Write `content` to `filename` under the directory named by `segments`.
    fn write(&self, segments: &[&str], filename: &str, content: &str) -> io::Result<()>;

    /// Remove previous output, keeping entries whose name is in `preserve`.
    fn clean(&self, preserve: &[String]) -> io::Result<()>;

    /// Write a generated file, splitting its `/`-separated path.
    fn write_file(&self, file: &GeneratedFile) -> io::Result<()> {
        let mut segments: Vec<&str> = file.path.split('/').filter(|s| !s.is_empty()).collect();
        let filename = segments.pop().unwrap_or_default();
        self.write(&segments, filename, &file.content)
    }
}

/// Writes artifacts below a base directory on the local filesystem.
#[derive(Debug, Clone)]
pub struct FileSink {
    base: PathBuf,
}

impl FileSink {
    pub fn new(base: impl Into<PathBuf>) -> Self {
        Self { base: base.into() }
    }

    pub fn base(&self) -> &Path {
        &self.base
    }
}

impl ArtifactSink for FileSink {
    fn write(&self, segments: &[&str], filename: &str, content: &str) -> io::Result<()> {
        let dir = segments.iter().fold(self.base.clone(), |dir, s| dir.join(s));
        fs::create_dir_all(&dir)?;

        let path = dir.join(filename);
        fs::write(&path, content)?;
        info!("wrote {}", path.display());
        Ok(())
    }

    fn clean(&self, preserve: &[String]) -> io::Result<()> {
        if !self.base.exists() {
            return Ok(());
        }
        clean_dir(&self.base, preserve)?;
        Ok(())
    }
}

fn is_preserved(name: &str, preserve: &[String]) -> bool {
    ALWAYS_PRESERVED.iter().any(|prefix| name.starts_with(prefix))
        || preserve.iter().any(|p| p == name)
}

/// Delete the contents of `dir`. Returns whether anything was kept.
fn clean_dir(dir: &Path, preserve: &[String]) -> io::Result<bool> {
    let mut kept = false;

    for entry in fs::read_dir(dir)? {
        let entry = entry?;
        let name = entry.file_name();
        let path = entry.path();

        if is_preserved(&name.to_string_lossy(), preserve) {
            debug!("preserving {}", path.display());
            kept = true;
            continue;
        }

        if entry.file_type()?.is_dir() {
            if clean_dir(&path, preserve)? {
                kept = true;
            } else {
                fs::remove_dir(&path)?;
            }
        } else {
            fs::remove_file(&path)?;
        }
    }

    Ok(kept)
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_write_creates_directories() {
        let dir = tempfile::tempdir().unwrap();
        let sink = FileSink::new(dir.path());

        sink.write(&["src", "main"], "App.java", "class App {}").unwrap();

        let written = fs::read_to_string(dir.path().join("src/main/App.java")).unwrap();
        assert_eq!(written, "class App {}");
    }

    #[test]
    fn test_write_file_splits_path() {
        let dir = tempfile::tempdir().unwrap();
        let sink = FileSink::new(dir.path());

        sink.write_file(&GeneratedFile {
            path: "docs/index.html".to_string(),
            content: "<html/>".to_string(),
        })
        .unwrap();

        assert!(dir.path().join("docs/index.html").is_file());
    }

    #[test]
    fn test_clean_keeps_preserved_entries() {
        let dir = tempfile::tempdir().unwrap();
        let base = dir.path();
        fs::create_dir_all(base.join(".git/objects")).unwrap();
        fs::create_dir_all(base.join("src/fonts")).unwrap();
        fs::create_dir_all(base.join("old/nested")).unwrap();
        fs::write(base.join("src/fonts/a.woff"), "").unwrap();
        fs::write(base.join("src/Stale.java"), "").unwrap();
        fs::write(base.join("old/nested/x.txt"), "").unwrap();
        fs::write(base.join("pom.xml"), "").unwrap();

        FileSink::new(base).clean(&["fonts".to_string()]).unwrap();

        assert!(base.join(".git/objects").is_dir());
        assert!(base.join("src/fonts/a.woff").is_file());
        assert!(!base.join("src/Stale.java").exists());
        assert!(!base.join("old").exists());
        assert!(!base.join("pom.xml").exists());
    }

    #[test]
    fn test_clean_missing_base() {
        let dir = tempfile::tempdir().unwrap();
        FileSink::new(dir.path().join("absent")).clean(&[]).unwrap();
    }
}
