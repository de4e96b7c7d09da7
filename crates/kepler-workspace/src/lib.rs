//! Eclipse workspace and project model for kepler.
//!
//! This crate turns an Eclipse workspace folder into a [`Workspace`]:
//! - per-project `.project` descriptors (name, natures)
//! - per-project `.classpath` descriptors (raw classpath entries)
//!
//! Classpath *resolution* lives in `kepler-classpath`; this crate only
//! supplies the raw data the resolver consumes.

mod descriptor;
mod model;
mod workspace;

pub use model::*;
pub use workspace::Workspace;

use std::path::PathBuf;

#[derive(Debug, thiserror::Error)]
pub enum WorkspaceError {
    #[error("failed to read {path}: {source}")]
    Io {
        path: PathBuf,
        #[source]
        source: std::io::Error,
    },

    #[error("failed to parse XML in {path}: {source}")]
    Xml {
        path: PathBuf,
        #[source]
        source: roxmltree::Error,
    },

    #[error("missing <name> in {path}")]
    MissingProjectName { path: PathBuf },
}
