#![allow(non_shorthand_field_patterns)]
#![doc = "Error handling primitives shared across the converter crate."]
// SPDX-FileCopyrightText: 2025 RAprogramm <andrey.rozanov.vl@gmail.com>
//
// SPDX-License-Identifier: MIT

//! The derive emitted by [`masterror::Error`] expands pattern matches that
//! trigger the `non_shorthand_field_patterns` lint, so the lint is disabled
//! for this module.

use std::path::{Path, PathBuf};

/// Unified error type returned by the manifest loader, the conversion
/// pipeline and the CLI.
///
/// Every failure is fatal to a run: nothing is retried and no partial
/// document is emitted.
#[derive(Debug, masterror::Error)]
pub enum Error {
    /// Wraps I/O errors that occur while reading the manifest stream.
    #[error("failed to read manifests from {path:?}: {source}")]
    Io {
        /// Location of the manifest file.
        path:   PathBuf,
        /// Underlying I/O error.
        source: std::io::Error
    },
    /// Wraps YAML decoding errors.
    #[error("failed to parse manifests: {source}")]
    Parse {
        /// Source decoding error from serde_yaml.
        source: serde_yaml::Error
    },
    /// Returned when a document cannot be processed as a Kubernetes manifest.
    #[error("invalid manifest in document {document}: {message}")]
    Manifest {
        /// One-based position of the document inside the input stream.
        document: usize,
        /// Human readable message describing the problem.
        message:  String
    },
    /// Wraps YAML encoding errors when emitting the resource group.
    #[error("failed to render resource group as YAML: {source}")]
    RenderYaml {
        /// Underlying serialization error.
        source: serde_yaml::Error
    },
    /// Wraps JSON encoding errors when emitting the resource group.
    #[error("failed to render resource group as JSON: {source}")]
    RenderJson {
        /// Underlying serialization error.
        source: serde_json::Error
    },
    /// Wraps I/O errors that occur while writing the output document.
    #[error("failed to write resource group to {path:?}: {source}")]
    Write {
        /// Destination of the output document.
        path:   PathBuf,
        /// Underlying I/O error reported by the operating system.
        source: std::io::Error
    }
}

impl Error {
    /// Constructs a manifest error for the document at `document`.
    ///
    /// # Parameters
    ///
    /// * `document` - One-based position of the offending document.
    /// * `message` - Human-readable description of the problem.
    pub fn manifest<M>(document: usize, message: M) -> Self
    where
        M: Into<String>
    {
        Self::Manifest {
            document,
            message: message.into()
        }
    }

    /// Formats the error for diagnostics without the variant name.
    ///
    /// The returned string matches the [`std::fmt::Display`] implementation.
    pub fn to_display_string(&self) -> String {
        format!("{self}")
    }
}

impl From<serde_yaml::Error> for Error {
    fn from(source: serde_yaml::Error) -> Self {
        Self::Parse {
            source
        }
    }
}

impl From<serde_json::Error> for Error {
    fn from(source: serde_json::Error) -> Self {
        Self::RenderJson {
            source
        }
    }
}

/// Creates an [`Error::Io`] variant capturing the failing path and source.
pub fn io_error(path: &Path, source: std::io::Error) -> Error {
    Error::Io {
        path: path.to_path_buf(),
        source
    }
}

/// Creates an [`Error::Write`] variant capturing the failing path and source.
pub fn write_error(path: &Path, source: std::io::Error) -> Error {
    Error::Write {
        path: path.to_path_buf(),
        source
    }
}
