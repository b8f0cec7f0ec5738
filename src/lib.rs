//! **R**e**m**ove the **manifest** of portable executables.
//!
//! Supports:
//! * Parsing and introspection of portable executables and their resource directory
//! * All-or-nothing resource update sessions
//! * Clearing the process manifest resource
//!
//! See [`ManifestPatch`] for the patch applied by the `rmmanifest` tool and [`Image`] for the underlying
//! resource editor.
//!
//! # Examples
//!
//! ### Manifest removal
//! ```
//! use rmmanifest::{FileUpdater, ManifestPatch};
//!
//! // store an empty manifest under type 24, id 1, language 1033
//! ManifestPatch::default().apply(&FileUpdater, BINARY_PATH.as_ref())?;
//! ```
//!
//! ### Manual resource update
//! ```
//! use rmmanifest::{FileUpdater, ResourceKey, ResourceUpdater, UpdateSession};
//!
//! let mut session = FileUpdater.begin(BINARY_PATH.as_ref(), false)?;
//! session.update(&ResourceKey::manifest(1, 1033), MANIFEST)?;
//! session.commit()?;
//! ```

#![cfg_attr(docsrs, feature(doc_auto_cfg, doc_cfg_hide))]
#![cfg_attr(docsrs, doc(cfg_hide(doc)))]

pub(crate) mod errors;
pub(crate) mod image;
pub(crate) mod patch;
pub(crate) mod resource;
pub(crate) mod session;
pub(crate) mod util;

pub mod constants;
pub mod types;

pub use crate::{errors::*, image::*, patch::*, resource::*, session::*};
