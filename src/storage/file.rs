use super::{super::error::*, storage::*};

use std::{fs, io, path::*};

const ITEM_EXTENSION: &str = "item";

//
// FileStorage
//

/// [Storage] backed by a directory, one file per item.
///
/// Survives process restarts, which is what makes the response cache snapshot and the token
/// durable. Item keys are hex-encoded into file names so that any key is a valid file name.
#[derive(Clone, Debug)]
pub struct FileStorage {
    directory: PathBuf,
}

impl FileStorage {
    /// Constructor.
    ///
    /// Creates the directory if it doesn't exist.
    pub fn new<PathT>(directory: PathT) -> Result<Self, StorageError>
    where
        PathT: Into<PathBuf>,
    {
        let directory = directory.into();
        fs::create_dir_all(&directory)?;
        Ok(Self { directory })
    }

    /// Directory.
    pub fn directory(&self) -> &Path {
        &self.directory
    }

    fn item_path(&self, key: &str) -> PathBuf {
        let mut name = String::with_capacity(key.len() * 2 + ITEM_EXTENSION.len() + 1);
        for byte in key.bytes() {
            name += &format!("{:02x}", byte);
        }
        name += ".";
        name += ITEM_EXTENSION;
        self.directory.join(name)
    }
}

impl Storage for FileStorage {
    fn get_item(&self, key: &str) -> Result<Option<String>, StorageError> {
        match fs::read_to_string(self.item_path(key)) {
            Ok(value) => Ok(Some(value)),
            Err(error) if error.kind() == io::ErrorKind::NotFound => Ok(None),
            Err(error) => Err(error.into()),
        }
    }

    fn set_item(&self, key: &str, value: &str) -> Result<(), StorageError> {
        // Write then rename so that a crash never leaves a truncated item
        let path = self.item_path(key);
        let temporary = path.with_extension("tmp");
        fs::write(&temporary, value)?;
        fs::rename(&temporary, &path)?;
        Ok(())
    }

    fn remove_item(&self, key: &str) -> Result<(), StorageError> {
        match fs::remove_file(self.item_path(key)) {
            Ok(()) => Ok(()),
            Err(error) if error.kind() == io::ErrorKind::NotFound => Ok(()),
            Err(error) => Err(error.into()),
        }
    }

    fn clear(&self) -> Result<(), StorageError> {
        for entry in fs::read_dir(&self.directory)? {
            let path = entry?.path();
            if path.extension().is_some_and(|extension| extension == ITEM_EXTENSION) {
                fs::remove_file(path)?;
            }
        }
        Ok(())
    }
}
