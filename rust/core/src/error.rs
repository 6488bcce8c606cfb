// This Source Code Form is subject to the terms of the Mozilla Public
// License, v. 2.0. If a copy of the MPL was not distributed with this
// file, You can obtain one at https://mozilla.org/MPL/2.0/.

//! Error types for STEP parsing and entity decoding.

use thiserror::Error;

/// Result type for parser operations
pub type Result<T> = std::result::Result<T, Error>;

/// Errors raised while tokenizing or decoding IFC content
#[derive(Error, Debug, Clone, PartialEq)]
pub enum Error {
    #[error("Parse error at byte {position}: {message}")]
    Parse { position: usize, message: String },

    #[error("Invalid IFC type: {0}")]
    InvalidIfcType(String),

    #[error("Entity #{0} not found")]
    EntityNotFound(u32),

    #[error("Unexpected attribute on #{id}: {message}")]
    UnexpectedAttribute { id: u32, message: String },
}

impl Error {
    /// Create a parse error
    pub fn parse(position: usize, message: impl Into<String>) -> Self {
        Error::Parse {
            position,
            message: message.into(),
        }
    }

    /// Create an attribute shape error for a decoded entity
    pub fn attribute(id: u32, message: impl Into<String>) -> Self {
        Error::UnexpectedAttribute {
            id,
            message: message.into(),
        }
    }
}
