//! Photonic chip layout model and rendering.
//!
//! Positions and footprints are in microns. The model is deliberately
//! coarse: components are placed rectangles with implicit left/right ports,
//! routes are straight waveguides between component centers.

use serde::{Deserialize, Serialize};

use crate::draw::{self, HEATER, INK, PORT, WAVEGUIDE};
use crate::error::{RenderError, RenderResult};

/// Kinds of layout components.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum ComponentKind {
    /// Input waveguide / photon source.
    Source,
    /// Plain straight waveguide.
    Straight,
    /// Directional coupler (beam splitter).
    Coupler,
    /// Thermo-optic phase shifter.
    Heater,
    /// Width taper into a detector.
    Taper,
    /// Ring resonator.
    Ring,
    /// Terminating detector.
    Detector,
}

impl ComponentKind {
    /// Parse a request-level kind name.
    pub fn from_name(name: &str) -> RenderResult<Self> {
        match name {
            "source" => Ok(Self::Source),
            "straight" => Ok(Self::Straight),
            "beamsplitter" | "coupler" => Ok(Self::Coupler),
            "phaseshift" | "heater" => Ok(Self::Heater),
            "taper" => Ok(Self::Taper),
            "ring" => Ok(Self::Ring),
            "detector" => Ok(Self::Detector),
            other => Err(RenderError::UnknownComponent(other.to_string())),
        }
    }

    /// Lowercase name.
    pub fn name(&self) -> &'static str {
        match self {
            Self::Source => "source",
            Self::Straight => "straight",
            Self::Coupler => "coupler",
            Self::Heater => "heater",
            Self::Taper => "taper",
            Self::Ring => "ring",
            Self::Detector => "detector",
        }
    }

    /// Footprint (width, height) in microns.
    pub fn footprint(&self) -> (f64, f64) {
        match self {
            Self::Source | Self::Straight | Self::Detector => (10.0, 0.5),
            Self::Coupler => (10.0, 4.0),
            Self::Heater => (10.0, 2.0),
            Self::Taper => (10.0, 1.0),
            Self::Ring => (8.0, 8.0),
        }
    }
}

/// A placed component.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct Component {
    pub kind: ComponentKind,
    /// Center X in microns.
    pub x: f64,
    /// Center Y in microns.
    pub y: f64,
}

/// A photonic chip layout.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct Layout {
    name: String,
    components: Vec<Component>,
    /// Waveguide routes between component indices.
    routes: Vec<(usize, usize)>,
}

impl Layout {
    /// Create an empty layout.
    pub fn new(name: impl Into<String>) -> Self {
        Self {
            name: name.into(),
            components: vec![],
            routes: vec![],
        }
    }

    /// Layout name.
    pub fn name(&self) -> &str {
        &self.name
    }

    /// Place a component, returning its index.
    pub fn add(&mut self, kind: ComponentKind, x: f64, y: f64) -> usize {
        self.components.push(Component { kind, x, y });
        self.components.len() - 1
    }

    /// Route a waveguide between two placed components.
    pub fn route(&mut self, from: usize, to: usize) -> RenderResult<()> {
        for index in [from, to] {
            if index >= self.components.len() {
                return Err(RenderError::InvalidRoute {
                    index,
                    num_components: self.components.len(),
                });
            }
        }
        self.routes.push((from, to));
        Ok(())
    }

    /// Placed components.
    pub fn components(&self) -> &[Component] {
        &self.components
    }

    /// Routed connections.
    pub fn routes(&self) -> &[(usize, usize)] {
        &self.routes
    }

    /// Number of placed components.
    pub fn num_components(&self) -> usize {
        self.components.len()
    }

    /// Whether any component of the given kind is placed.
    pub fn has_kind(&self, kind: ComponentKind) -> bool {
        self.components.iter().any(|c| c.kind == kind)
    }

    /// Bounding box (xmin, ymin, xmax, ymax) in microns, including
    /// footprints. Empty layouts get a unit box.
    pub fn bbox(&self) -> (f64, f64, f64, f64) {
        if self.components.is_empty() {
            return (0.0, 0.0, 1.0, 1.0);
        }
        let mut bounds = (f64::MAX, f64::MAX, f64::MIN, f64::MIN);
        for c in &self.components {
            let (w, h) = c.kind.footprint();
            bounds.0 = bounds.0.min(c.x - w / 2.0);
            bounds.1 = bounds.1.min(c.y - h / 2.0);
            bounds.2 = bounds.2.max(c.x + w / 2.0);
            bounds.3 = bounds.3.max(c.y + h / 2.0);
        }
        bounds
    }

    /// Render the chip view to PNG.
    pub fn render_png(&self, width: u32, height: u32) -> RenderResult<Vec<u8>> {
        let mut img = draw::canvas(width, height);

        let (xmin, ymin, xmax, ymax) = self.bbox();
        let margin = 0.2 * (xmax - xmin).max(ymax - ymin).max(1.0);
        let (xmin, ymin) = (xmin - margin, ymin - margin);
        let (xmax, ymax) = (xmax + margin, ymax + margin);
        let scale = ((width as f64) / (xmax - xmin)).min((height as f64) / (ymax - ymin));

        let to_px = |x: f64, y: f64| -> (i32, i32) {
            (
                ((x - xmin) * scale) as i32,
                // Y grows upward on chip, downward on screen.
                (height as f64 - (y - ymin) * scale) as i32,
            )
        };

        // Routes underneath components
        for (from, to) in &self.routes {
            let a = &self.components[*from];
            let b = &self.components[*to];
            let (x0, y0) = to_px(a.x, a.y);
            let (x1, y1) = to_px(b.x, b.y);
            draw::line(&mut img, x0, y0, x1, y1, WAVEGUIDE);
            draw::line(&mut img, x0, y0 + 1, x1, y1 + 1, WAVEGUIDE);
        }

        for c in &self.components {
            let (w, h) = c.kind.footprint();
            let (px, py) = to_px(c.x, c.y);
            let pw = ((w * scale) as i32).max(3);
            let ph = ((h * scale) as i32).max(3);

            match c.kind {
                ComponentKind::Ring => {
                    draw::circle(&mut img, px, py, pw / 2, WAVEGUIDE);
                    draw::circle(&mut img, px, py, pw / 2 - 1, WAVEGUIDE);
                }
                ComponentKind::Coupler => {
                    // Two parallel guides with the gap in the middle.
                    draw::fill_rect(&mut img, px - pw / 2, py - ph / 2, pw, ph / 3, WAVEGUIDE);
                    draw::fill_rect(
                        &mut img,
                        px - pw / 2,
                        py + ph / 2 - ph / 3,
                        pw,
                        ph / 3,
                        WAVEGUIDE,
                    );
                }
                ComponentKind::Heater => {
                    draw::fill_rect(&mut img, px - pw / 2, py - ph / 2, pw, ph, HEATER);
                    draw::stroke_rect(&mut img, px - pw / 2, py - ph / 2, pw, ph, INK);
                }
                _ => {
                    draw::fill_rect(&mut img, px - pw / 2, py - ph / 2, pw, ph, WAVEGUIDE);
                }
            }

            // Port markers on the left/right edges
            draw::fill_rect(&mut img, px - pw / 2 - 2, py - 1, 2, 3, PORT);
            draw::fill_rect(&mut img, px + pw / 2, py - 1, 2, 3, PORT);
        }

        Ok(draw::encode_png(&img)?)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_kind_names_roundtrip() {
        for name in ["source", "straight", "coupler", "heater", "taper", "ring", "detector"] {
            assert_eq!(ComponentKind::from_name(name).unwrap().name(), name);
        }
        // Request-level aliases from the circuit endpoint.
        assert_eq!(
            ComponentKind::from_name("beamsplitter").unwrap(),
            ComponentKind::Coupler
        );
        assert_eq!(
            ComponentKind::from_name("phaseshift").unwrap(),
            ComponentKind::Heater
        );
        assert!(ComponentKind::from_name("laser").is_err());
    }

    #[test]
    fn test_route_validation() {
        let mut layout = Layout::new("chip");
        let a = layout.add(ComponentKind::Source, 0.0, 0.0);
        let b = layout.add(ComponentKind::Detector, 20.0, 0.0);
        layout.route(a, b).unwrap();
        assert!(matches!(
            layout.route(a, 7),
            Err(RenderError::InvalidRoute { index: 7, .. })
        ));
    }

    #[test]
    fn test_render_decodable() {
        let mut layout = Layout::new("mzi");
        let src = layout.add(ComponentKind::Source, 0.0, 0.0);
        let bs1 = layout.add(ComponentKind::Coupler, 20.0, 0.0);
        let ps = layout.add(ComponentKind::Heater, 40.0, 2.0);
        let bs2 = layout.add(ComponentKind::Coupler, 60.0, 0.0);
        let det = layout.add(ComponentKind::Taper, 80.0, 0.0);
        for (a, b) in [(src, bs1), (bs1, ps), (ps, bs2), (bs2, det)] {
            layout.route(a, b).unwrap();
        }

        let png = layout.render_png(400, 300).unwrap();
        let decoded = image::load_from_memory(&png).unwrap();
        assert_eq!(decoded.width(), 400);
        assert_eq!(decoded.height(), 300);
    }

    #[test]
    fn test_bbox_includes_footprint() {
        let mut layout = Layout::new("one");
        layout.add(ComponentKind::Straight, 0.0, 0.0);
        let (xmin, _, xmax, _) = layout.bbox();
        assert!((xmax - xmin - 10.0).abs() < 1e-9);
    }
}
