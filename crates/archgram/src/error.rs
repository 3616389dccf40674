//! Error types for Archgram operations.
//!
//! [`ArchgramError`] wraps every failure of the rendering pipeline, from an
//! invalid topology to a missing Graphviz executable.

use std::io;

use thiserror::Error;

use archgram_core::topology::TopologyError;

/// The main error type for Archgram operations.
#[derive(Debug, Error)]
pub enum ArchgramError {
    #[error("I/O error: {0}")]
    Io(#[from] io::Error),

    #[error("Topology error: {0}")]
    Topology(#[from] TopologyError),

    #[error("Configuration error: {0}")]
    Config(String),

    #[error("Graph error: {0}")]
    Graph(String),

    #[error("Layout error: {0}")]
    Layout(String),

    #[error("Export error: {0}")]
    Export(Box<dyn std::error::Error>),
}

impl From<crate::export::Error> for ArchgramError {
    fn from(error: crate::export::Error) -> Self {
        Self::Export(Box::new(error))
    }
}
