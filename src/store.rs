//! The on-disk profile document shared by the save service and the editor.
//!
//! Every write goes to a temporary sibling file that is renamed over the target, so readers
//! never observe a half-written document. Lost updates between the two front ends are caught
//! with [`ProfileStore::save_if_unchanged`], which compares the bytes on disk against the
//! [`Revision`] observed at load time.

use crate::tools::to_pretty_json;
use serde_json::Value;
use std::collections::hash_map::DefaultHasher;
use std::fmt;
use std::fs;
use std::hash::{Hash, Hasher};
use std::io::{self, Write};
use std::path::{Path, PathBuf};
use std::time::{SystemTime, UNIX_EPOCH};

pub const PROFILE_PATH: &str = "data/profile.json";

#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum WriteDurability {
    #[default]
    Fast,
    /// fsync the file and its directory before reporting success.
    Durable,
}

/// Fingerprint of the stored bytes.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct Revision {
    len: u64,
    hash: u64,
}

impl Revision {
    fn of(bytes: &[u8]) -> Self {
        let mut hasher = DefaultHasher::new();
        bytes.hash(&mut hasher);
        Revision {
            len: bytes.len() as u64,
            hash: hasher.finish(),
        }
    }
}

#[derive(Debug)]
pub enum StoreError {
    NotFound { path: PathBuf },
    Parse { path: PathBuf, source: serde_json::Error },
    Io { path: PathBuf, source: io::Error },
    /// The file changed on disk after it was loaded.
    Conflict { path: PathBuf },
}

impl fmt::Display for StoreError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            StoreError::NotFound { path } => write!(f, "找不到 {} 文件", path.display()),
            StoreError::Parse { path, source } => {
                write!(f, "JSON格式错误 ({}) - {}", path.display(), source)
            }
            StoreError::Io { path, source } => write!(f, "{}: {}", path.display(), source),
            StoreError::Conflict { path } => {
                write!(f, "{} 在加载后已被其他程序修改", path.display())
            }
        }
    }
}

impl std::error::Error for StoreError {
    fn source(&self) -> Option<&(dyn std::error::Error + 'static)> {
        match self {
            StoreError::Parse { source, .. } => Some(source),
            StoreError::Io { source, .. } => Some(source),
            StoreError::NotFound { .. } | StoreError::Conflict { .. } => None,
        }
    }
}

#[derive(Debug, Clone)]
pub struct ProfileStore {
    path: PathBuf,
    durability: WriteDurability,
}

impl ProfileStore {
    pub fn new(path: impl Into<PathBuf>) -> Self {
        Self::with_durability(path, WriteDurability::Fast)
    }

    pub fn with_durability(path: impl Into<PathBuf>, durability: WriteDurability) -> Self {
        ProfileStore {
            path: path.into(),
            durability,
        }
    }

    pub fn path(&self) -> &Path {
        &self.path
    }

    pub fn load(&self) -> Result<(Value, Revision), StoreError> {
        let bytes = self.read_bytes()?.ok_or_else(|| StoreError::NotFound {
            path: self.path.clone(),
        })?;
        let value = serde_json::from_slice(&bytes).map_err(|source| StoreError::Parse {
            path: self.path.clone(),
            source,
        })?;
        Ok((value, Revision::of(&bytes)))
    }

    /// `None` when the file does not exist.
    pub fn revision(&self) -> Result<Option<Revision>, StoreError> {
        Ok(self.read_bytes()?.map(|bytes| Revision::of(&bytes)))
    }

    /// Replaces the whole document.
    pub fn save(&self, value: &Value) -> Result<Revision, StoreError> {
        let bytes = to_pretty_json(value).map_err(|source| StoreError::Parse {
            path: self.path.clone(),
            source,
        })?;
        self.write_atomic(&bytes)?;
        Ok(Revision::of(&bytes))
    }

    pub fn save_if_unchanged(
        &self,
        value: &Value,
        expected: &Revision,
    ) -> Result<Revision, StoreError> {
        if self.revision()?.as_ref() != Some(expected) {
            return Err(StoreError::Conflict {
                path: self.path.clone(),
            });
        }
        self.save(value)
    }

    fn read_bytes(&self) -> Result<Option<Vec<u8>>, StoreError> {
        match fs::read(&self.path) {
            Ok(bytes) => Ok(Some(bytes)),
            Err(err) if err.kind() == io::ErrorKind::NotFound => Ok(None),
            Err(source) => Err(StoreError::Io {
                path: self.path.clone(),
                source,
            }),
        }
    }

    fn write_atomic(&self, contents: &[u8]) -> Result<(), StoreError> {
        let io_err = |path: &Path| {
            let path = path.to_path_buf();
            move |source| StoreError::Io { path, source }
        };

        let file_name = self
            .path
            .file_name()
            .ok_or_else(|| io::Error::other("path has no file name"))
            .map_err(io_err(&self.path))?;
        let parent = match self.path.parent() {
            Some(parent) if !parent.as_os_str().is_empty() => parent,
            _ => Path::new("."),
        };

        let nanos = SystemTime::now()
            .duration_since(UNIX_EPOCH)
            .unwrap_or_default()
            .as_nanos();
        let tmp_path = parent.join(format!(
            ".{}.tmp.{}.{}",
            file_name.to_string_lossy(),
            std::process::id(),
            nanos
        ));

        let mut file = fs::OpenOptions::new()
            .write(true)
            .create_new(true)
            .open(&tmp_path)
            .map_err(io_err(&tmp_path))?;

        let written = file.write_all(contents).and_then(|_| {
            if self.durability == WriteDurability::Durable {
                file.sync_all()
            } else {
                Ok(())
            }
        });
        drop(file);
        if let Err(source) = written {
            let _ = fs::remove_file(&tmp_path);
            return Err(StoreError::Io {
                path: tmp_path,
                source,
            });
        }

        if let Err(source) = rename_overwrite(&tmp_path, &self.path) {
            let _ = fs::remove_file(&tmp_path);
            return Err(StoreError::Io {
                path: self.path.clone(),
                source,
            });
        }

        #[cfg(unix)]
        {
            if self.durability == WriteDurability::Durable {
                fs::File::open(parent)
                    .and_then(|dir| dir.sync_all())
                    .map_err(io_err(parent))?;
            }
        }

        Ok(())
    }
}

fn rename_overwrite(from: &Path, to: &Path) -> io::Result<()> {
    #[cfg(windows)]
    {
        match fs::rename(from, to) {
            Ok(()) => Ok(()),
            Err(err)
                if matches!(
                    err.kind(),
                    io::ErrorKind::AlreadyExists | io::ErrorKind::PermissionDenied
                ) =>
            {
                let _ = fs::remove_file(to);
                fs::rename(from, to)
            }
            Err(err) => Err(err),
        }
    }

    #[cfg(not(windows))]
    {
        fs::rename(from, to)
    }
}
