//! Directed edges drawn as SVG paths with arrow heads.
//!
//! Arrow heads are SVG `<marker>` elements. Since a marker cannot inherit
//! the stroke color of the path using it, one marker is defined per edge
//! color; the [`ArrowDrawer`] collects the colors while edges are drawn and
//! emits the matching definitions afterwards.

use std::str::FromStr;

use indexmap::IndexMap;
use serde::Deserialize;
use svg::node::element as svg_element;

use crate::{
    apply_stroke,
    color::Color,
    draw::{SvgNode, StrokeDefinition},
    geometry::{Bounds, Point},
};

/// How the path between two attachment points is routed.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum ArrowRouting {
    /// A single straight segment
    #[default]
    Straight,
    /// Horizontal and vertical segments only
    Orthogonal,
}

impl FromStr for ArrowRouting {
    type Err = String;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s {
            "straight" => Ok(Self::Straight),
            "orthogonal" => Ok(Self::Orthogonal),
            _ => Err(format!(
                "invalid edge style `{s}`, valid values: straight, orthogonal"
            )),
        }
    }
}

impl ArrowRouting {
    /// Points of a path from `start` to `end`.
    ///
    /// Orthogonal routes bend at the midpoint, going along the dominant axis
    /// first.
    pub fn route(self, start: Point, end: Point) -> Vec<Point> {
        match self {
            Self::Straight => vec![start, end],
            Self::Orthogonal => {
                let mid = start.midpoint(end);
                let dx = (end.x() - start.x()).abs();
                let dy = (end.y() - start.y()).abs();
                if dx > dy {
                    vec![start, start.with_x(mid.x()), end.with_x(mid.x()), end]
                } else {
                    vec![start, start.with_y(mid.y()), end.with_y(mid.y()), end]
                }
            }
        }
    }
}

/// Path of an edge from a node back to itself: a small loop over the top
/// edge of `bounds`.
pub fn loop_route(bounds: Bounds, height: f32) -> Vec<Point> {
    let center = bounds.center();
    let half_span = (bounds.width() / 4.0).min(height);
    let top = bounds.min_y();
    vec![
        Point::new(center.x() - half_span, top),
        Point::new(center.x() - half_span, top - height),
        Point::new(center.x() + half_span, top - height),
        Point::new(center.x() + half_span, top),
    ]
}

/// A forward arrow with a given stroke.
#[derive(Debug, Clone)]
pub struct Arrow {
    stroke: StrokeDefinition,
}

impl Arrow {
    pub fn new(stroke: StrokeDefinition) -> Self {
        Self { stroke }
    }

    pub fn stroke(&self) -> &StrokeDefinition {
        &self.stroke
    }

    /// SVG path data for a polyline through `points`.
    pub fn path_data(points: &[Point]) -> String {
        points
            .iter()
            .enumerate()
            .map(|(i, point)| {
                let command = if i == 0 { 'M' } else { 'L' };
                format!("{command} {} {}", point.x(), point.y())
            })
            .collect::<Vec<_>>()
            .join(" ")
    }

    fn marker_id(color: Color) -> String {
        format!("arrow-{}", color.to_id_safe_string())
    }

    fn render_to_svg(&self, points: &[Point]) -> SvgNode {
        let path = svg_element::Path::new()
            .set("d", Self::path_data(points))
            .set("fill", "none");
        let path = apply_stroke!(path, &self.stroke).set(
            "marker-end",
            format!("url(#{})", Self::marker_id(self.stroke.color())),
        );
        Box::new(path)
    }

    fn create_marker(color: Color) -> svg_element::Marker {
        svg_element::Marker::new()
            .set("id", Self::marker_id(color))
            .set("viewBox", "0 0 10 10")
            .set("refX", 9)
            .set("refY", 5)
            .set("markerWidth", 7)
            .set("markerHeight", 7)
            .set("orient", "auto")
            .add(
                svg_element::Path::new()
                    .set("d", "M 0 0 L 10 5 L 0 10 z")
                    .set("fill", color.to_string())
                    .set("fill-opacity", color.alpha()),
            )
    }
}

/// Draws arrows and tracks the marker definitions they reference.
#[derive(Debug, Default)]
pub struct ArrowDrawer {
    markers: IndexMap<String, Color>,
}

impl ArrowDrawer {
    pub fn new() -> Self {
        Self::default()
    }

    /// Draws `arrow` along `points` and registers its marker color.
    pub fn draw_arrow(&mut self, arrow: &Arrow, points: &[Point]) -> SvgNode {
        let color = arrow.stroke.color();
        self.markers.insert(Arrow::marker_id(color), color);
        arrow.render_to_svg(points)
    }

    /// One `<defs>` element holding a marker per color drawn so far.
    pub fn draw_marker_definitions(&self) -> SvgNode {
        let defs = self
            .markers
            .values()
            .fold(svg_element::Definitions::new(), |defs, color| {
                defs.add(Arrow::create_marker(*color))
            });
        Box::new(defs)
    }

    /// Number of distinct markers registered.
    pub fn marker_count(&self) -> usize {
        self.markers.len()
    }
}

#[cfg(test)]
mod tests {
    use crate::geometry::Size;

    use super::*;

    #[test]
    fn test_routing_from_str() {
        assert_eq!("straight".parse::<ArrowRouting>(), Ok(ArrowRouting::Straight));
        assert_eq!(
            "orthogonal".parse::<ArrowRouting>(),
            Ok(ArrowRouting::Orthogonal)
        );
        assert!("curved".parse::<ArrowRouting>().is_err());
    }

    #[test]
    fn test_straight_route() {
        let start = Point::new(0.0, 0.0);
        let end = Point::new(10.0, 5.0);
        assert_eq!(ArrowRouting::Straight.route(start, end), vec![start, end]);
    }

    #[test]
    fn test_orthogonal_route_horizontal_first() {
        let route = ArrowRouting::Orthogonal.route(Point::new(0.0, 0.0), Point::new(100.0, 20.0));
        assert_eq!(
            route,
            vec![
                Point::new(0.0, 0.0),
                Point::new(50.0, 0.0),
                Point::new(50.0, 20.0),
                Point::new(100.0, 20.0),
            ]
        );
    }

    #[test]
    fn test_orthogonal_route_vertical_first() {
        let route = ArrowRouting::Orthogonal.route(Point::new(0.0, 0.0), Point::new(10.0, 80.0));
        assert_eq!(route[1], Point::new(0.0, 40.0));
        assert_eq!(route[2], Point::new(10.0, 40.0));
    }

    #[test]
    fn test_loop_route_sits_above_bounds() {
        let bounds = Point::new(50.0, 50.0).to_bounds(Size::new(64.0, 64.0));
        let route = loop_route(bounds, 16.0);

        assert_eq!(route.len(), 4);
        assert_eq!(route[0].y(), bounds.min_y());
        assert_eq!(route[3].y(), bounds.min_y());
        assert!(route[1].y() < bounds.min_y());
        assert!(route[0].x() < route[3].x());
    }

    #[test]
    fn test_path_data() {
        let data = Arrow::path_data(&[
            Point::new(1.0, 2.0),
            Point::new(3.0, 4.0),
            Point::new(5.0, 6.0),
        ]);
        assert_eq!(data, "M 1 2 L 3 4 L 5 6");
    }

    #[test]
    fn test_drawer_registers_one_marker_per_color() {
        let mut drawer = ArrowDrawer::new();
        let grey = Arrow::new(StrokeDefinition::solid(Color::new("#545b64").unwrap(), 1.2));
        let red = Arrow::new(StrokeDefinition::solid(Color::new("red").unwrap(), 1.2));
        let points = [Point::new(0.0, 0.0), Point::new(10.0, 0.0)];

        let path = drawer.draw_arrow(&grey, &points).to_string();
        drawer.draw_arrow(&grey, &points);
        drawer.draw_arrow(&red, &points);

        assert_eq!(drawer.marker_count(), 2);
        assert!(path.contains("marker-end=\"url(#arrow-"));

        let defs = drawer.draw_marker_definitions().to_string();
        assert_eq!(defs.matches("<marker").count(), 2);
    }
}
