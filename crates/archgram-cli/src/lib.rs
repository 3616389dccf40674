//! Archgram CLI library
//!
//! This module contains the core CLI logic: it declares the AWS VPC
//! architecture, applies command-line overrides and writes the rendered
//! diagram.

pub mod architecture;
pub mod error_adapter;

mod args;
mod config;

pub use args::Args;

use std::path::{Path, PathBuf};

use log::info;

use archgram::{
    ArchgramError, DiagramRenderer,
    topology::{Direction, OutputFormat},
};

/// Run the Archgram CLI application
///
/// Renders the AWS VPC architecture in the requested format and writes it
/// to `<output_dir>/aws_vpc_architecture.<ext>`.
///
/// # Arguments
///
/// * `args` - Command-line arguments
///
/// # Returns
///
/// The path of the written diagram.
///
/// # Errors
///
/// Returns `ArchgramError` for:
/// - Invalid format or direction arguments
/// - Configuration loading errors
/// - Layout errors
/// - Rendering and file I/O errors
pub fn run(args: &Args) -> Result<PathBuf, ArchgramError> {
    let format: OutputFormat = args.format.parse()?;
    let direction = args
        .direction
        .as_deref()
        .map(str::parse::<Direction>)
        .transpose()?;

    info!(
        format:%,
        output_dir = args.output_dir;
        "Processing diagram"
    );

    let app_config = config::load_config(args.config.as_ref())?;

    let mut topology = architecture::aws_vpc_architecture()?;
    if let Some(direction) = direction {
        info!(direction:%; "Overriding diagram direction");
        topology.set_direction(direction);
    }

    let renderer = DiagramRenderer::new(app_config);
    let path = renderer.render_to_file(&topology, format, Path::new(&args.output_dir))?;

    info!(output_file:? = path; "Diagram exported successfully");

    Ok(path)
}
