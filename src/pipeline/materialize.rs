//! Writing records to disk.
//!
//! # Responsibilities
//! - Create the destination directory
//! - Create or truncate the output file
//! - Encode the record in the route's format
//!
//! There is no locking: two submissions rendering the same path both write
//! it, and whichever finishes last is what remains on disk.

use std::fs::{self, File};
use std::io::{BufWriter, Write};
use std::path::{Component, Path, PathBuf};

use serde::{Deserialize, Serialize};
use thiserror::Error;

use crate::pipeline::record::Record;
use crate::receive::types::FileFormat;

/// Which directory is created before the output file.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Deserialize, Serialize)]
#[serde(rename_all = "snake_case")]
pub enum DirectoryPolicy {
    /// The rendered path's containing directory.
    #[default]
    Parent,
    /// A directory named after the rendered path's final component, as
    /// earlier datamgr releases did. `out/alice.yaml` creates `alice.yaml/`
    /// and then fails unless `out/` already exists.
    BaseName,
}

/// Failures while persisting a record. Details are for operators only.
#[derive(Debug, Error)]
pub enum MaterializeError {
    #[error("rendered path {0:?} leaves the output root")]
    UnsafePath(String),

    #[error("failed to create directory {path}, {source}")]
    CreateDir {
        path: PathBuf,
        #[source]
        source: std::io::Error,
    },

    #[error("failed to create file {path}, {source}")]
    CreateFile {
        path: PathBuf,
        #[source]
        source: std::io::Error,
    },

    #[error("failed to encode file {path}, {detail}")]
    Encode { path: PathBuf, detail: String },
}

/// Where records are written.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct OutputTarget {
    root: PathBuf,
    policy: DirectoryPolicy,
}

impl OutputTarget {
    pub fn new(root: impl Into<PathBuf>, policy: DirectoryPolicy) -> Self {
        Self {
            root: root.into(),
            policy,
        }
    }

    pub fn root(&self) -> &Path {
        &self.root
    }

    pub fn policy(&self) -> DirectoryPolicy {
        self.policy
    }

    /// Directory created ahead of writing `rendered`.
    pub fn directory_for(&self, rendered: &str) -> PathBuf {
        let rendered = Path::new(rendered);
        match self.policy {
            DirectoryPolicy::Parent => match rendered.parent() {
                Some(parent) => self.root.join(parent),
                None => self.root.clone(),
            },
            DirectoryPolicy::BaseName => match rendered.file_name() {
                Some(base) => self.root.join(base),
                None => self.root.clone(),
            },
        }
    }

    /// Write `record` to the file at `rendered` (relative to the root).
    ///
    /// Blocking; call from a blocking-capable context.
    pub fn materialize(
        &self,
        rendered: &str,
        format: FileFormat,
        record: &Record,
    ) -> Result<PathBuf, MaterializeError> {
        if Path::new(rendered)
            .components()
            .any(|c| matches!(c, Component::ParentDir | Component::RootDir | Component::Prefix(_)))
        {
            return Err(MaterializeError::UnsafePath(rendered.to_string()));
        }

        let dir = self.directory_for(rendered);
        create_dir_all(&dir).map_err(|source| MaterializeError::CreateDir {
            path: dir.clone(),
            source,
        })?;

        let path = self.root.join(rendered);
        tracing::debug!(path = %path.display(), "Create file");
        let file = File::create(&path).map_err(|source| MaterializeError::CreateFile {
            path: path.clone(),
            source,
        })?;

        let mut writer = BufWriter::new(file);
        let encoded = match format {
            FileFormat::Yaml => serde_yaml::to_writer(&mut writer, record).map_err(|e| e.to_string()),
        };
        encoded
            .and_then(|()| writer.flush().map_err(|e| e.to_string()))
            .map_err(|detail| MaterializeError::Encode {
                path: path.clone(),
                detail,
            })?;

        Ok(path)
    }
}

#[cfg(unix)]
fn create_dir_all(dir: &Path) -> std::io::Result<()> {
    use std::os::unix::fs::DirBuilderExt;
    fs::DirBuilder::new().recursive(true).mode(0o755).create(dir)
}

#[cfg(not(unix))]
fn create_dir_all(dir: &Path) -> std::io::Result<()> {
    fs::create_dir_all(dir)
}
