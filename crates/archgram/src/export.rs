//! Export functionality for Archgram diagrams.
//!
//! This module provides the [`Exporter`] trait that defines the interface for
//! converting laid-out diagrams into output formats. It is the final stage in
//! the Archgram processing pipeline.
//!
//! # Pipeline Position
//!
//! ```text
//! Topology
//!     ↓ structure
//! Scope Graph
//!     ↓ layout
//! Positioned Elements (DiagramLayout)
//!     ↓ export (this module)
//! Output Bytes
//! ```
//!
//! # Available Backends
//!
//! - [`svg`]: SVG output via [`svg::SvgBuilder`] and [`svg::Svg`]
//! - `dot`: Graphviz DOT text, and PNG rendered by the `dot` executable
//!   (requires the `graphviz` feature)
//!
//! # Error Handling
//!
//! Export operations return [`Error`], covering rendering failures and I/O
//! errors. [`Error`] converts into [`ArchgramError::Export`] at the crate
//! boundary.
//!
//! [`ArchgramError::Export`]: crate::ArchgramError::Export

/// SVG export backend.
pub mod svg;

/// Graphviz export backend.
#[cfg(feature = "graphviz")]
pub mod dot;

use crate::layout::DiagramLayout;

/// Abstraction for diagram export backends.
///
/// Implementors convert a [`DiagramLayout`] into the bytes of a specific
/// output format.
pub trait Exporter {
    /// Exports a positioned diagram to the backend's output format.
    ///
    /// # Errors
    ///
    /// Returns [`Error::Render`] if the layout cannot be converted to the
    /// target format, or [`Error::Io`] if an external renderer fails.
    fn export(&mut self, layout: &DiagramLayout) -> Result<Vec<u8>, Error>;
}

/// Errors that can occur during diagram export.
///
/// This type is converted into [`ArchgramError::Export`] at the crate
/// boundary via the [`From`] implementation in [`crate::error`].
///
/// [`ArchgramError::Export`]: crate::ArchgramError::Export
#[derive(Debug)]
pub enum Error {
    /// A rendering or conversion failure described by `message`.
    Render(String),
    /// An I/O error, typically from running an external renderer.
    Io(std::io::Error),
}

impl std::fmt::Display for Error {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            Self::Render(msg) => write!(f, "Render error: {msg}"),
            Self::Io(err) => write!(f, "I/O error: {err}"),
        }
    }
}

impl std::error::Error for Error {
    fn source(&self) -> Option<&(dyn std::error::Error + 'static)> {
        match self {
            Self::Render(_) => None,
            Self::Io(err) => Some(err),
        }
    }
}
