// This Source Code Form is subject to the terms of the Mozilla Public
// License, v. 2.0. If a copy of the MPL was not distributed with this
// file, You can obtain one at https://mozilla.org/MPL/2.0/.

use std::path::PathBuf;
use thiserror::Error;

/// Result type for material queries
pub type Result<T> = std::result::Result<T, Error>;

/// Errors raised while loading a model or resolving materials
#[derive(Error, Debug)]
pub enum Error {
    #[error("Failed to read model {path}: {source}")]
    Io {
        path: PathBuf,
        #[source]
        source: std::io::Error,
    },

    #[error("Model contains no entities")]
    EmptyModel,

    #[error("Malformed material relation #{id}: {reason}")]
    MalformedRelation { id: u32, reason: String },

    #[error("Core parser error: {0}")]
    Core(#[from] ifc_lite_core::Error),

    #[error("Geometry error: {0}")]
    Geometry(#[from] ifc_lite_geometry::Error),
}

impl Error {
    pub fn malformed(id: u32, reason: impl Into<String>) -> Self {
        Error::MalformedRelation {
            id,
            reason: reason.into(),
        }
    }
}
