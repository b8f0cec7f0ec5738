//! Manifest removal as a single resource update.

use std::path::Path;

use log::{debug, error};

use crate::{constants::*, errors::*, resource::*, session::*};

/// Replaces one resource entry of an image in a single update session.
///
/// The default patch clears the process manifest: it stores an empty payload under
/// type [`RT_MANIFEST`], id [`CREATEPROCESS_MANIFEST_RESOURCE_ID`] and language [`LANGUAGE_ID_EN_US`],
/// keeping all other resources of the image.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ManifestPatch {
    pub key:             ResourceKey,
    pub payload:         Vec<u8>,
    pub delete_existing: bool,
}

impl Default for ManifestPatch {
    fn default() -> Self {
        Self {
            key:             ResourceKey::manifest(CREATEPROCESS_MANIFEST_RESOURCE_ID, LANGUAGE_ID_EN_US),
            payload:         Vec::new(),
            delete_existing: false,
        }
    }
}

impl ManifestPatch {
    /// Apply the patch to the image at `path`.
    ///
    /// The session is committed only if the update succeeded, otherwise it is discarded
    /// and the image stays unmodified.
    pub fn apply<U: ResourceUpdater>(&self, updater: &U, path: &Path) -> Result<(), PatchError> {
        let mut session =
            updater.begin(path, self.delete_existing).map_err(PatchError::TransactionOpen)?;

        if let Err(error) = session.update(&self.key, &self.payload) {
            error!("failed to write resource {}: {}", self.key, error);
            session.discard();
            return Err(PatchError::ResourceWrite(error));
        }

        session.commit().map_err(PatchError::Commit)?;
        debug!("updated resource {} of {}", self.key, path.display());
        Ok(())
    }

    /// Apply the patch to the image at `path`, failing with a usage error if no path is given.
    pub fn run<U: ResourceUpdater>(&self, updater: &U, path: Option<&Path>) -> Result<(), PatchError> {
        let Some(path) = path else {
            return Err(PatchError::Usage);
        };
        self.apply(updater, path)
    }
}
