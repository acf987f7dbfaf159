//! Canvas placement
//!
//! New elements are placed once: to the right of an already placed anchor
//! when one is known, otherwise stacked down the left edge of the viewport.
//! After that, only the rendering layer moves them.

use crate::element::ElementSet;
use crate::error::LayoutError;
use crate::geometry::CanvasPosition;
use explorer_graph::IdentityKey;
use serde::{Deserialize, Serialize};

/// Spacing used when placing new elements
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct LayoutConfig {
    /// Gap between an anchor's right edge and the new element
    pub horizontal_spacing: f64,
    /// Gap between stacked fallback placements
    pub vertical_spacing: f64,
    /// Inset of fallback placements from the viewport's left edge
    pub horizontal_margin: f64,
    /// Inset of the first fallback placement from the viewport's top edge
    pub vertical_margin: f64,
}

impl Default for LayoutConfig {
    fn default() -> Self {
        Self {
            horizontal_spacing: 80.0,
            vertical_spacing: 40.0,
            horizontal_margin: 40.0,
            vertical_margin: 40.0,
        }
    }
}

impl LayoutConfig {
    /// Check that no spacing is negative or non-finite
    #[must_use]
    pub fn is_valid(&self) -> bool {
        [
            self.horizontal_spacing,
            self.vertical_spacing,
            self.horizontal_margin,
            self.vertical_margin,
        ]
        .iter()
        .all(|v| v.is_finite() && *v >= 0.0)
    }
}

/// Assigns initial canvas positions
#[derive(Debug, Clone, Default)]
pub struct Placer {
    config: LayoutConfig,
}

impl Placer {
    #[must_use]
    pub fn new(config: LayoutConfig) -> Self {
        Self { config }
    }

    #[inline]
    #[must_use]
    pub fn config(&self) -> &LayoutConfig {
        &self.config
    }

    /// Position `key` once, returning the existing position on later calls
    ///
    /// # Errors
    /// - `LayoutError::InvalidSize` if the size is negative or not finite
    /// - `LayoutError::UnknownElement` if `key` is not live
    pub fn place(
        &self,
        elements: &mut ElementSet,
        key: IdentityKey,
        width: f64,
        height: f64,
        anchor: Option<IdentityKey>,
    ) -> Result<CanvasPosition, LayoutError> {
        if !(width.is_finite() && height.is_finite() && width >= 0.0 && height >= 0.0) {
            return Err(LayoutError::InvalidSize { width, height });
        }

        let existing = elements
            .get(key)
            .ok_or(LayoutError::UnknownElement(key))?
            .position();
        if let Some(position) = existing {
            return Ok(position);
        }

        let anchored = anchor
            .and_then(|a| elements.get(a))
            .and_then(|a| a.position());

        let position = match anchored {
            Some(anchor) => CanvasPosition::from_origin(
                anchor.x2 + self.config.horizontal_spacing,
                anchor.y1,
                width,
                height,
            ),
            None => {
                let canvas = &mut elements.canvas;
                let n = canvas.fallback_placements as f64;
                canvas.fallback_placements += 1;
                CanvasPosition::from_origin(
                    canvas.viewport.x1 + self.config.horizontal_margin,
                    canvas.viewport.y1
                        + self.config.vertical_margin
                        + n * (height + self.config.vertical_spacing),
                    width,
                    height,
                )
            }
        };

        tracing::debug!(
            element = %key,
            anchored = anchored.is_some(),
            x = position.x1,
            y = position.y1,
            "element placed"
        );

        if let Some(element) = elements.get_mut(key) {
            element.layout.position = Some(position);
        }
        Ok(position)
    }

    /// First placed target among `key`'s edges of interest, in `allow_list` order
    #[must_use]
    pub fn anchor_for(
        &self,
        elements: &ElementSet,
        key: IdentityKey,
        allow_list: &[String],
    ) -> Option<IdentityKey> {
        let element = elements.get(key)?;
        allow_list
            .iter()
            .filter_map(|label| element.edges().get(label))
            .flatten()
            .copied()
            .find(|target| elements.get(*target).is_some_and(|t| t.position().is_some()))
    }

    /// Move a placed element by `(dx, dy)`
    ///
    /// # Errors
    /// - `LayoutError::UnknownElement` if `key` is not live
    /// - `LayoutError::NotPlaced` if `key` has no position yet
    pub fn translate(
        &self,
        elements: &mut ElementSet,
        key: IdentityKey,
        dx: f64,
        dy: f64,
    ) -> Result<CanvasPosition, LayoutError> {
        let element = elements
            .get_mut(key)
            .ok_or(LayoutError::UnknownElement(key))?;
        let moved = element
            .layout
            .position
            .ok_or(LayoutError::NotPlaced(key))?
            .translated(dx, dy);
        element.layout.position = Some(moved);
        Ok(moved)
    }
}
