//! Edge path routing
//!
//! Edges of interest are drawn as quadratic bezier curves between element
//! centers, bowed to one side so that edges in opposite directions do not
//! overlap, with a triangular arrowhead at the target.

use crate::element::ElementSet;
use crate::geometry::{CanvasPosition, Point};
use explorer_graph::IdentityKey;
use serde::{Deserialize, Serialize};
use std::f64::consts::FRAC_PI_2;

/// Curve and arrowhead dimensions
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct RoutingConfig {
    /// Distance of the control point from the center line
    pub curve_offset: f64,
    /// Arrowhead length along the end tangent
    pub arrow_length: f64,
    /// Half of the arrowhead base width
    pub arrow_half_width: f64,
}

impl Default for RoutingConfig {
    fn default() -> Self {
        Self {
            curve_offset: 30.0,
            arrow_length: 6.0,
            arrow_half_width: 3.0,
        }
    }
}

/// Geometry of one routed edge
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct EdgePath {
    pub label: String,
    pub start: Point,
    pub control: Point,
    pub end: Point,
    /// Tip, then the two base corners
    pub arrow: [Point; 3],
    /// Curve midpoint
    pub label_anchor: Point,
}

impl EdgePath {
    /// SVG path data: `M sx sy Q cx cy ex ey`
    #[must_use]
    pub fn svg_path(&self) -> String {
        format!(
            "M {:.1} {:.1} Q {:.1} {:.1} {:.1} {:.1}",
            self.start.x, self.start.y, self.control.x, self.control.y, self.end.x, self.end.y
        )
    }

    /// SVG polygon `points` attribute for the arrowhead
    #[must_use]
    pub fn arrow_points(&self) -> String {
        self.arrow
            .iter()
            .map(|p| format!("{:.1},{:.1}", p.x, p.y))
            .collect::<Vec<_>>()
            .join(" ")
    }

    /// Point on the curve at `t` in `[0, 1]`
    #[must_use]
    pub fn point_at(&self, t: f64) -> Point {
        let u = 1.0 - t;
        Point::new(
            u * u * self.start.x + 2.0 * u * t * self.control.x + t * t * self.end.x,
            u * u * self.start.y + 2.0 * u * t * self.control.y + t * t * self.end.y,
        )
    }
}

/// An edge of interest between two placed elements
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct RoutedEdge {
    pub source: IdentityKey,
    pub target: IdentityKey,
    pub path: EdgePath,
}

/// Computes edge geometry from element positions
#[derive(Debug, Clone, Default)]
pub struct PathRouter {
    config: RoutingConfig,
}

impl PathRouter {
    #[must_use]
    pub fn new(config: RoutingConfig) -> Self {
        Self { config }
    }

    #[inline]
    #[must_use]
    pub fn config(&self) -> &RoutingConfig {
        &self.config
    }

    /// Route one labelled edge between two rectangles
    ///
    /// Returns `None` when the centers coincide.
    #[must_use]
    pub fn route(
        &self,
        source: &CanvasPosition,
        target: &CanvasPosition,
        label: &str,
    ) -> Option<EdgePath> {
        let start = source.center();
        let end = target.center();
        let dx = end.x - start.x;
        let dy = end.y - start.y;
        if dx == 0.0 && dy == 0.0 {
            return None;
        }

        let angle = dy.atan2(dx);
        let perp = angle + FRAC_PI_2;
        let control = Point::new(
            (start.x + end.x) / 2.0 + perp.cos() * self.config.curve_offset,
            (start.y + end.y) / 2.0 + perp.sin() * self.config.curve_offset,
        );

        let arrow = self.arrowhead(control, end);
        let mut path = EdgePath {
            label: label.to_string(),
            start,
            control,
            end,
            arrow,
            label_anchor: start,
        };
        path.label_anchor = path.point_at(0.5);
        Some(path)
    }

    fn arrowhead(&self, control: Point, tip: Point) -> [Point; 3] {
        let tx = tip.x - control.x;
        let ty = tip.y - control.y;
        let len = (tx * tx + ty * ty).sqrt();
        if len == 0.0 {
            return [tip; 3];
        }
        let (ux, uy) = (tx / len, ty / len);
        let base = Point::new(
            tip.x - ux * self.config.arrow_length,
            tip.y - uy * self.config.arrow_length,
        );
        let hw = self.config.arrow_half_width;
        [
            tip,
            Point::new(base.x - uy * hw, base.y + ux * hw),
            Point::new(base.x + uy * hw, base.y - ux * hw),
        ]
    }

    /// Route every allow-listed edge whose ends are both placed
    #[must_use]
    pub fn route_all(&self, elements: &ElementSet, allow_list: &[String]) -> Vec<RoutedEdge> {
        let mut routed = Vec::new();
        for source in elements.iter() {
            let Some(from) = source.position() else {
                continue;
            };
            for (label, targets) in source.edges() {
                if !allow_list.contains(label) {
                    continue;
                }
                for target in targets {
                    let Some(to) = elements.get(*target).and_then(|t| t.position()) else {
                        continue;
                    };
                    if let Some(path) = self.route(&from, &to, label) {
                        routed.push(RoutedEdge {
                            source: source.key(),
                            target: *target,
                            path,
                        });
                    }
                }
            }
        }
        routed
    }
}
