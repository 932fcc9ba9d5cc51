//! Output directory writer.
//!
//! Generation is destructive and non-incremental: the output directory is
//! removed and recreated on every run. `prepare` must only be called after
//! the artifact graph has been fully linked and rendered, so a failed run
//! never leaves a partially regenerated tree behind.

use std::fs;
use std::path::{Path, PathBuf};

use typegql_core::GeneratorError;

use crate::emit::FileDescriptor;

pub struct OutputWriter {
    root: PathBuf,
}

impl OutputWriter {
    pub fn new(root: impl Into<PathBuf>) -> Self {
        Self { root: root.into() }
    }

    pub fn root(&self) -> &Path {
        &self.root
    }

    /// Clear and recreate the output directory.
    pub fn prepare(&self) -> Result<(), GeneratorError> {
        if self.root.exists() {
            fs::remove_dir_all(&self.root)?;
        }
        fs::create_dir_all(&self.root)?;
        Ok(())
    }

    /// Write every descriptor under the output root.
    pub fn write_all(&self, files: &[FileDescriptor]) -> Result<(), GeneratorError> {
        for file in files {
            let path = self.root.join(&file.path);
            if let Some(parent) = path.parent() {
                fs::create_dir_all(parent)?;
            }
            fs::write(&path, &file.content)?;
        }
        tracing::debug!(files = files.len(), root = %self.root.display(), "output written");
        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn descriptor(path: &str, content: &str) -> FileDescriptor {
        FileDescriptor {
            path: path.to_string(),
            content: content.to_string(),
            symbol: None,
            transpile: false,
        }
    }

    #[test]
    fn prepare_clears_previous_output() {
        let dir = tempfile::tempdir().unwrap();
        let out = dir.path().join("generated");
        let writer = OutputWriter::new(&out);

        writer.prepare().unwrap();
        writer
            .write_all(&[descriptor("stale/Old.ts", "old")])
            .unwrap();
        assert!(out.join("stale/Old.ts").exists());

        writer.prepare().unwrap();
        assert!(!out.join("stale/Old.ts").exists());
        assert!(out.exists());
    }

    #[test]
    fn write_all_creates_nested_directories() {
        let dir = tempfile::tempdir().unwrap();
        let writer = OutputWriter::new(dir.path().join("generated"));
        writer.prepare().unwrap();
        writer
            .write_all(&[descriptor(
                "resolvers/crud/Patient/DeletePatientResolver.ts",
                "content",
            )])
            .unwrap();

        let written = dir
            .path()
            .join("generated/resolvers/crud/Patient/DeletePatientResolver.ts");
        assert_eq!(fs::read_to_string(written).unwrap(), "content");
    }
}
