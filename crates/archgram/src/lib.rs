//! Archgram - declarative cloud architecture diagrams.
//!
//! Layout and rendering for topologies declared with
//! [`topology::Topology`]: nodes with provider icons, nested clusters and
//! directed edges, rendered to SVG in memory or handed to Graphviz for DOT
//! and PNG output.

pub mod config;

mod error;
mod export;
mod layout;
mod structure;

pub use archgram_core::{color, draw, geometry, identifier, topology};

pub use error::ArchgramError;
pub use layout::{DiagramLayout, LayoutEngine, PlacedCluster, PlacedEdge, PlacedNode};

use std::{
    fs,
    path::{Path, PathBuf},
};

use log::{debug, info, trace};

use config::AppConfig;
use export::Exporter;
use topology::{OutputFormat, Topology};

/// Lays out and renders architecture diagrams.
///
/// # Examples
///
/// ```rust,no_run
/// use archgram::{DiagramRenderer, config::AppConfig, topology::{NodeKind, Topology}};
///
/// let mut topology = Topology::new("Minimal");
/// let users = topology.add_node("Users", NodeKind::Users, None).unwrap();
/// let db = topology.add_node("Database", NodeKind::Database, None).unwrap();
/// topology.flow(users).to(db).unwrap();
///
/// let renderer = DiagramRenderer::new(AppConfig::default());
/// let svg = renderer.render_svg(&topology).expect("Failed to render");
/// assert!(svg.contains("Database"));
/// ```
#[derive(Default)]
pub struct DiagramRenderer {
    config: AppConfig,
}

impl DiagramRenderer {
    /// Create a new renderer with the given configuration.
    pub fn new(config: AppConfig) -> Self {
        Self { config }
    }

    pub fn config(&self) -> &AppConfig {
        &self.config
    }

    /// Computes positions for every node, cluster and edge of `topology`.
    ///
    /// # Errors
    ///
    /// Returns [`ArchgramError::Topology`] if the topology references
    /// undeclared elements, [`ArchgramError::Config`] for invalid style
    /// settings, and [`ArchgramError::Layout`] if ranking fails.
    pub fn layout(&self, topology: &Topology) -> Result<DiagramLayout, ArchgramError> {
        let svg = self.svg_exporter()?;
        self.layout_with(topology, &svg)
    }

    /// Renders `topology` to an SVG document.
    pub fn render_svg(&self, topology: &Topology) -> Result<String, ArchgramError> {
        let bytes = self.render(topology, OutputFormat::Svg)?;
        String::from_utf8(bytes)
            .map_err(|err| ArchgramError::Export(Box::new(err)))
    }

    /// Renders `topology` to Graphviz DOT source.
    pub fn render_dot(&self, topology: &Topology) -> Result<String, ArchgramError> {
        let bytes = self.render(topology, OutputFormat::Dot)?;
        String::from_utf8(bytes)
            .map_err(|err| ArchgramError::Export(Box::new(err)))
    }

    /// Renders `topology` to the bytes of `format`.
    ///
    /// # Errors
    ///
    /// Besides the errors of [`layout`](Self::layout), DOT and PNG output
    /// fail with [`ArchgramError::Export`] when the crate is built without
    /// the `graphviz` feature, and PNG output fails when the Graphviz `dot`
    /// executable cannot be run.
    pub fn render(&self, topology: &Topology, format: OutputFormat) -> Result<Vec<u8>, ArchgramError> {
        info!(title = topology.title(), format:%; "Rendering diagram");
        let mut svg = self.svg_exporter()?;
        let layout = self.layout_with(topology, &svg)?;

        let bytes = match format {
            OutputFormat::Svg => svg.export(&layout)?,
            OutputFormat::Dot | OutputFormat::Png => Self::export_graphviz(&layout, format)?,
        };

        info!(bytes = bytes.len(); "Diagram rendered");
        Ok(bytes)
    }

    /// Renders `topology` into `output_dir`, named after the topology title.
    ///
    /// Returns the path of the written file, `<file stem>.<extension>`.
    pub fn render_to_file(
        &self,
        topology: &Topology,
        format: OutputFormat,
        output_dir: &Path,
    ) -> Result<PathBuf, ArchgramError> {
        let bytes = self.render(topology, format)?;

        let path = output_dir.join(format!("{}.{}", topology.file_stem(), format.extension()));
        fs::write(&path, bytes)?;

        info!(path:? = path; "Diagram written");
        Ok(path)
    }

    fn svg_exporter(&self) -> Result<export::svg::Svg, ArchgramError> {
        export::svg::SvgBuilder::new()
            .with_style(self.config.style())
            .build()
            .map_err(|err| ArchgramError::Config(err.to_string()))
    }

    /// Layout using the icon, frame and title styling of `svg`, so sizes
    /// match what the SVG backend draws.
    fn layout_with(
        &self,
        topology: &Topology,
        svg: &export::svg::Svg,
    ) -> Result<DiagramLayout, ArchgramError> {
        topology.validate()?;
        self.config
            .layout()
            .validate()
            .map_err(ArchgramError::Config)?;

        let scopes = structure::ScopeGraph::from_topology(topology)?;
        debug!("Structure built successfully");

        let placement = layout::Placement::new(
            self.config.layout(),
            svg.icon_definition(),
            svg.frame_definition(),
            svg.title_definition(),
        );
        let layout = placement.place(topology, &scopes)?;
        info!(
            engine:? = self.config.layout().engine(),
            nodes = layout.nodes().len(),
            edges = layout.edges().len();
            "Layout calculated"
        );
        trace!(layout:?; "Placed layout");

        Ok(layout)
    }

    #[cfg(feature = "graphviz")]
    fn export_graphviz(layout: &DiagramLayout, format: OutputFormat) -> Result<Vec<u8>, ArchgramError> {
        use export::dot::{Dot, DotOutput};

        let output = match format {
            OutputFormat::Png => DotOutput::Png,
            _ => DotOutput::Text,
        };
        Ok(Dot::new(output).export(layout)?)
    }

    #[cfg(not(feature = "graphviz"))]
    fn export_graphviz(_layout: &DiagramLayout, format: OutputFormat) -> Result<Vec<u8>, ArchgramError> {
        Err(export::Error::Render(format!(
            "{format} output requires the `graphviz` feature"
        ))
        .into())
    }
}
