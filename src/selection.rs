#[cfg(test)]
use std::collections::HashMap;
use std::path::PathBuf;

use crate::error::{ContextError, StorageError};
use crate::models::SelectedMember;

pub const SELECTED_MEMBER_KEY: &str = "coord:selected-member";

/// Key/value persistence behind the member selection.
pub trait SelectionStorage {
    fn read(&self, key: &str) -> Result<Option<String>, StorageError>;
    fn write(&mut self, key: &str, value: &str) -> Result<(), StorageError>;
    fn remove(&mut self, key: &str) -> Result<(), StorageError>;
}

#[cfg(test)]
#[derive(Debug, Default, Clone)]
pub struct MemoryStorage {
    entries: HashMap<String, String>,
}

#[cfg(test)]
impl MemoryStorage {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn contains(&self, key: &str) -> bool {
        self.entries.contains_key(key)
    }
}

#[cfg(test)]
impl SelectionStorage for MemoryStorage {
    fn read(&self, key: &str) -> Result<Option<String>, StorageError> {
        Ok(self.entries.get(key).cloned())
    }

    fn write(&mut self, key: &str, value: &str) -> Result<(), StorageError> {
        self.entries.insert(key.to_string(), value.to_string());
        Ok(())
    }

    fn remove(&mut self, key: &str) -> Result<(), StorageError> {
        self.entries.remove(key);
        Ok(())
    }
}

/// One JSON file per key inside a directory.
#[derive(Debug, Clone)]
pub struct FileStorage {
    dir: PathBuf,
}

impl FileStorage {
    pub fn new(dir: impl Into<PathBuf>) -> Self {
        Self { dir: dir.into() }
    }

    pub fn path_for(&self, key: &str) -> PathBuf {
        let file_name: String = key
            .chars()
            .map(|ch| if ch.is_ascii_alphanumeric() || ch == '-' { ch } else { '-' })
            .collect();
        self.dir.join(format!("{file_name}.json"))
    }
}

fn io_error(key: &str, source: std::io::Error) -> StorageError {
    StorageError::Io {
        key: key.to_string(),
        source,
    }
}

impl SelectionStorage for FileStorage {
    fn read(&self, key: &str) -> Result<Option<String>, StorageError> {
        match std::fs::read(self.path_for(key)) {
            Ok(bytes) => String::from_utf8(bytes).map(Some).map_err(|_| StorageError::Undecodable {
                key: key.to_string(),
            }),
            Err(err) if err.kind() == std::io::ErrorKind::NotFound => Ok(None),
            Err(err) => Err(io_error(key, err)),
        }
    }

    fn write(&mut self, key: &str, value: &str) -> Result<(), StorageError> {
        std::fs::create_dir_all(&self.dir).map_err(|err| io_error(key, err))?;
        std::fs::write(self.path_for(key), value).map_err(|err| io_error(key, err))
    }

    fn remove(&mut self, key: &str) -> Result<(), StorageError> {
        match std::fs::remove_file(self.path_for(key)) {
            Ok(()) => Ok(()),
            Err(err) if err.kind() == std::io::ErrorKind::NotFound => Ok(()),
            Err(err) => Err(io_error(key, err)),
        }
    }
}

fn discard_corrupt<S: SelectionStorage>(storage: &mut S, err: &dyn std::fmt::Display) {
    tracing::warn!(key = SELECTED_MEMBER_KEY, error = %err, "discarding corrupt member selection");
    if let Err(remove_err) = storage.remove(SELECTED_MEMBER_KEY) {
        tracing::warn!(key = SELECTED_MEMBER_KEY, error = %remove_err, "failed to remove corrupt member selection");
    }
}

/// The chosen member, mirrored write-through into storage.
#[derive(Debug)]
pub struct MemberSelection<S> {
    storage: S,
    selected: Option<SelectedMember>,
}

impl<S: SelectionStorage> MemberSelection<S> {
    /// Reads the stored snapshot once. A value that does not parse is
    /// dropped and its key removed.
    pub fn load(mut storage: S) -> Result<Self, StorageError> {
        let selected = match storage.read(SELECTED_MEMBER_KEY) {
            Ok(None) => None,
            Ok(Some(raw)) => match serde_json::from_str::<SelectedMember>(&raw) {
                Ok(member) => Some(member),
                Err(err) => {
                    discard_corrupt(&mut storage, &err);
                    None
                }
            },
            Err(err @ StorageError::Undecodable { .. }) => {
                discard_corrupt(&mut storage, &err);
                None
            }
            Err(err) => return Err(err),
        };

        Ok(Self { storage, selected })
    }

    pub fn selected(&self) -> Option<&SelectedMember> {
        self.selected.as_ref()
    }

    pub fn select_member(&mut self, member: SelectedMember) -> Result<(), StorageError> {
        let raw = serde_json::to_string(&member).map_err(|source| StorageError::Encode {
            key: SELECTED_MEMBER_KEY.to_string(),
            source,
        })?;
        self.storage.write(SELECTED_MEMBER_KEY, &raw)?;
        tracing::debug!(member_id = %member.id, "member selected");
        self.selected = Some(member);
        Ok(())
    }

    pub fn clear_member(&mut self) -> Result<(), StorageError> {
        self.storage.remove(SELECTED_MEMBER_KEY)?;
        self.selected = None;
        Ok(())
    }

    #[cfg(test)]
    pub fn into_storage(self) -> S {
        self.storage
    }
}

/// Scope that may or may not have the member selection provider mounted.
#[derive(Debug)]
pub struct Session<S> {
    selection: Option<MemberSelection<S>>,
}

impl<S: SelectionStorage> Session<S> {
    #[cfg(test)]
    pub fn without_provider() -> Self {
        Self { selection: None }
    }

    pub fn with_member_selection(storage: S) -> Result<Self, StorageError> {
        Ok(Self {
            selection: Some(MemberSelection::load(storage)?),
        })
    }

    pub fn member_selection(&mut self) -> Result<&mut MemberSelection<S>, ContextError> {
        self.selection
            .as_mut()
            .ok_or(ContextError::OutsideProvider("MemberSelection"))
    }
}
