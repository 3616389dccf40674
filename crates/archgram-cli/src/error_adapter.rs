//! Error adapter for converting ArchgramError to miette diagnostics.
//!
//! The library error type stays free of any reporting concerns; this module
//! gives every variant a stable diagnostic code and, where one exists, a hint
//! for fixing it.

use std::fmt;

use miette::{Diagnostic as MietteDiagnostic, LabeledSpan};

use archgram::ArchgramError;

/// Adapter rendering an [`ArchgramError`] through miette.
pub struct ErrorAdapter<'a>(pub &'a ArchgramError);

impl fmt::Debug for ErrorAdapter<'_> {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        fmt::Debug::fmt(&self.0, f)
    }
}

impl fmt::Display for ErrorAdapter<'_> {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        fmt::Display::fmt(&self.0, f)
    }
}

impl std::error::Error for ErrorAdapter<'_> {
    fn source(&self) -> Option<&(dyn std::error::Error + 'static)> {
        std::error::Error::source(self.0)
    }
}

impl MietteDiagnostic for ErrorAdapter<'_> {
    fn code<'a>(&'a self) -> Option<Box<dyn fmt::Display + 'a>> {
        let code = match &self.0 {
            ArchgramError::Io(_) => "archgram::io",
            ArchgramError::Topology(_) => "archgram::topology",
            ArchgramError::Config(_) => "archgram::config",
            ArchgramError::Graph(_) => "archgram::graph",
            ArchgramError::Layout(_) => "archgram::layout",
            ArchgramError::Export(_) => "archgram::export",
        };
        Some(Box::new(code))
    }

    fn help<'a>(&'a self) -> Option<Box<dyn fmt::Display + 'a>> {
        let help = match &self.0 {
            ArchgramError::Config(_) => {
                "check the [layout] and [style] sections of the configuration file"
            }
            ArchgramError::Export(_) => {
                "dot and png output need the `graphviz` feature; png also needs the Graphviz `dot` executable on PATH"
            }
            ArchgramError::Io(_) => "check that the output directory exists and is writable",
            _ => return None,
        };
        Some(Box::new(help))
    }

    fn source_code(&self) -> Option<&dyn miette::SourceCode> {
        None
    }

    fn labels(&self) -> Option<Box<dyn Iterator<Item = LabeledSpan> + '_>> {
        None
    }
}

/// Wraps `err` for rendering with a miette report handler.
pub fn to_reportable(err: &ArchgramError) -> ErrorAdapter<'_> {
    ErrorAdapter(err)
}
