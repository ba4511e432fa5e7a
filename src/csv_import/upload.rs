//! Temporary storage for uploaded files.

use std::{
    ffi::OsStr,
    path::{Path, PathBuf},
};

use uuid::Uuid;

use crate::Error;

/// A directory where uploaded files are kept until they have been imported.
#[derive(Debug, Clone, PartialEq)]
pub struct UploadDir {
    directory: PathBuf,
}

impl UploadDir {
    /// Use `directory` for uploads. The directory must already exist.
    pub fn new(directory: impl Into<PathBuf>) -> Self {
        Self {
            directory: directory.into(),
        }
    }

    /// The directory the uploads are stored in.
    pub fn directory(&self) -> &Path {
        &self.directory
    }

    /// The path of the upload named `file_name`.
    ///
    /// # Errors
    /// Returns [Error::InvalidFileName] if `file_name` is empty or is not a
    /// plain file name, e.g. "../secrets.csv".
    pub fn path(&self, file_name: &str) -> Result<PathBuf, Error> {
        let is_plain_name = !file_name.is_empty()
            && !file_name.contains(['/', '\\'])
            && Path::new(file_name).file_name() == Some(OsStr::new(file_name));

        if !is_plain_name {
            return Err(Error::InvalidFileName(file_name.to_owned()));
        }

        Ok(self.directory.join(file_name))
    }

    /// Write `data` to a new file and return the file's name.
    ///
    /// The name is made unique by prefixing `original_name` with a random ID.
    ///
    /// # Errors
    /// Returns [Error::UploadIo] if the file could not be written.
    pub async fn save(&self, original_name: &str, data: &[u8]) -> Result<String, Error> {
        let base_name = Path::new(original_name)
            .file_name()
            .and_then(|name| name.to_str())
            .filter(|name| !name.contains('\\'))
            .unwrap_or("upload.csv");
        let file_name = format!("{}-{base_name}", Uuid::new_v4().simple());
        let path = self.path(&file_name)?;

        tokio::fs::write(&path, data)
            .await
            .map_err(|error| Error::UploadIo(format!("could not write {}: {error}", path.display())))?;

        tracing::debug!("Saved {} bytes to {}", data.len(), path.display());

        Ok(file_name)
    }

    /// Read the whole upload named `file_name`.
    ///
    /// # Errors
    /// Returns [Error::InvalidFileName] for names outside the upload directory
    /// and [Error::UploadIo] if the file is missing or cannot be read.
    pub async fn read(&self, file_name: &str) -> Result<Vec<u8>, Error> {
        let path = self.path(file_name)?;

        tokio::fs::read(&path)
            .await
            .map_err(|error| Error::UploadIo(format!("could not read {}: {error}", path.display())))
    }

    /// Delete the upload named `file_name`.
    ///
    /// # Errors
    /// Returns [Error::InvalidFileName] for names outside the upload directory
    /// and [Error::UploadIo] if the file could not be removed.
    pub async fn remove(&self, file_name: &str) -> Result<(), Error> {
        let path = self.path(file_name)?;

        tokio::fs::remove_file(&path).await.map_err(|error| {
            Error::UploadIo(format!("could not remove {}: {error}", path.display()))
        })
    }
}
