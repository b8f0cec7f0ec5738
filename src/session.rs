//! Resource update sessions.
//!
//! A session is an all-or-nothing edit of the resource directory of one image:
//! it is opened with [`ResourceUpdater::begin`], receives any number of updates and
//! ends with exactly one [`UpdateSession::commit`] or [`UpdateSession::discard`].
//! Both consume the session, so it cannot be used after it ended.

use std::{
    fs::OpenOptions,
    io::Read,
    path::{Path, PathBuf},
};

use log::{debug, info};

use crate::{errors::*, image::*, resource::*};

/// Opens resource update sessions for executable images.
pub trait ResourceUpdater {
    type Session: UpdateSession;

    /// Begin an update of the resources of the image at `path`.
    /// With `delete_existing` the session starts from an empty resource directory.
    /// Without it, a resource directory that could not be read completely is an error.
    fn begin(&self, path: &Path, delete_existing: bool) -> Result<Self::Session, PlatformError>;
}

/// An open, uncommitted resource update.
pub trait UpdateSession {
    /// Create or replace the resource stored under the key.
    fn update(&mut self, key: &ResourceKey, data: &[u8]) -> Result<(), PlatformError>;

    /// Remove the resource stored under the key if it exists.
    fn remove(&mut self, key: &ResourceKey) -> Result<(), PlatformError>;

    /// Write all updates to the image.
    fn commit(self) -> Result<(), PlatformError>;

    /// End the session without writing anything.
    fn discard(self);
}

/// Updates images on disk using the resource editor of this crate.
#[derive(Debug, Clone, Copy, Default)]
pub struct FileUpdater;

impl ResourceUpdater for FileUpdater {
    type Session = FileSession;

    fn begin(&self, path: &Path, delete_existing: bool) -> Result<FileSession, PlatformError> {
        debug!("beginning resource update of {}", path.display());
        // open for writing to fail early on read-only or locked files
        let mut file = OpenOptions::new().read(true).write(true).open(path)?;
        let mut data = Vec::new();
        file.read_to_end(&mut data)?;
        drop(file);

        let image = Image::parse(data)?;
        let resources = match image.resource_directory() {
            Some(_) if delete_existing => {
                info!("discarding existing resources of {}", path.display());
                ResourceDirectory::default()
            }
            Some(resources) if resources.skipped_entries() > 0 => {
                // committing would drop the unreadable entries from the image
                return Err(ImageReadError::InvalidResourceTable(format!(
                    "{} resource data entries of {} could not be read",
                    resources.skipped_entries(),
                    path.display()
                ))
                .into());
            }
            Some(resources) => resources.clone(),
            None => ResourceDirectory::default(),
        };
        Ok(FileSession {
            path: path.to_path_buf(),
            image,
            resources,
            ended: false,
        })
    }
}

/// Resource update session of a [`FileUpdater`].
///
/// All updates are applied to an in-memory copy of the image, the file is only written on commit.
#[derive(Debug)]
pub struct FileSession {
    path:      PathBuf,
    image:     Image<'static>,
    resources: ResourceDirectory,
    ended:     bool,
}

impl FileSession {
    /// Returns the resource directory as it will be committed.
    pub fn resources(&self) -> &ResourceDirectory { &self.resources }
}

impl UpdateSession for FileSession {
    fn update(&mut self, key: &ResourceKey, data: &[u8]) -> Result<(), PlatformError> {
        debug!("updating resource {} with {} bytes", key, data.len());
        let previous = self.resources.set(key, data.to_vec())?;
        if let Some(previous) = previous {
            debug!("replaced {} bytes of resource {}", previous.data().len(), key);
        }
        Ok(())
    }

    fn remove(&mut self, key: &ResourceKey) -> Result<(), PlatformError> {
        match self.resources.remove(key) {
            Some(previous) => debug!("removed {} bytes of resource {}", previous.data().len(), key),
            None => debug!("resource {} does not exist", key),
        }
        Ok(())
    }

    fn commit(mut self) -> Result<(), PlatformError> {
        self.ended = true;
        let resources = std::mem::take(&mut self.resources);
        debug!("committing resource update of {}", self.path.display());
        self.image.set_resource_directory(resources)?;
        self.image.write_file(&self.path)?;
        Ok(())
    }

    fn discard(mut self) {
        self.ended = true;
        debug!("discarding resource update of {}", self.path.display());
    }
}

impl Drop for FileSession {
    fn drop(&mut self) {
        if !self.ended {
            debug!("resource update of {} dropped without commit, discarding", self.path.display());
        }
    }
}
