//! Plot-style figure description in data coordinates (y grows upward).
//!
//! Each mark is a small config struct with named optional fields. Defaults
//! follow what the diagrams use most, so call sites only spell out what
//! differs.

use crate::domain::model::{Align, Color};

#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum Dash {
    #[default]
    Solid,
    Dashed,
    Dotted,
    DashDot,
}

#[derive(Debug, Clone, Copy, PartialEq)]
pub struct Stroke {
    pub color: Color,
    /// Line width in points.
    pub width: f32,
    pub dash: Dash,
    pub opacity: f32,
}

impl Stroke {
    pub fn new(color: Color, width: f32) -> Self {
        Self {
            color,
            width,
            dash: Dash::Solid,
            opacity: 1.0,
        }
    }

    pub fn dash(mut self, dash: Dash) -> Self {
        self.dash = dash;
        self
    }

    pub fn opacity(mut self, opacity: f32) -> Self {
        self.opacity = opacity;
        self
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Default)]
pub struct Style {
    pub fill: Option<Color>,
    pub fill_opacity: f32,
    pub stroke: Option<Stroke>,
}

impl Style {
    pub fn filled(color: Color) -> Self {
        Self {
            fill: Some(color),
            fill_opacity: 1.0,
            stroke: None,
        }
    }

    pub fn outlined(stroke: Stroke) -> Self {
        Self {
            fill: None,
            fill_opacity: 1.0,
            stroke: Some(stroke),
        }
    }

    pub fn stroke(mut self, stroke: Stroke) -> Self {
        self.stroke = Some(stroke);
        self
    }

    pub fn opacity(mut self, opacity: f32) -> Self {
        self.fill_opacity = opacity;
        self
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum VAlign {
    Top,
    #[default]
    Center,
    Bottom,
    /// Anchor on the text baseline.
    Baseline,
}

#[derive(Debug, Clone, PartialEq)]
pub struct TextMark {
    pub x: f32,
    pub y: f32,
    /// May contain `\n`; lines stack downward from the anchor.
    pub text: String,
    /// Font size in points.
    pub size: f32,
    pub color: Color,
    pub bold: bool,
    pub italic: bool,
    pub align: Align,
    pub valign: VAlign,
    /// Degrees counter-clockwise.
    pub rotation: f32,
    pub opacity: f32,
}

impl TextMark {
    pub fn new(x: f32, y: f32, text: impl Into<String>) -> Self {
        Self {
            x,
            y,
            text: text.into(),
            size: 10.0,
            color: Color::BLACK,
            bold: false,
            italic: false,
            align: Align::Left,
            valign: VAlign::Baseline,
            rotation: 0.0,
            opacity: 1.0,
        }
    }

    pub fn size(mut self, size: f32) -> Self {
        self.size = size;
        self
    }

    pub fn color(mut self, color: Color) -> Self {
        self.color = color;
        self
    }

    pub fn bold(mut self) -> Self {
        self.bold = true;
        self
    }

    pub fn italic(mut self) -> Self {
        self.italic = true;
        self
    }

    pub fn align(mut self, align: Align) -> Self {
        self.align = align;
        self
    }

    pub fn valign(mut self, valign: VAlign) -> Self {
        self.valign = valign;
        self
    }

    pub fn centered(self) -> Self {
        self.align(Align::Center).valign(VAlign::Center)
    }

    pub fn rotation(mut self, degrees: f32) -> Self {
        self.rotation = degrees;
        self
    }

    pub fn opacity(mut self, opacity: f32) -> Self {
        self.opacity = opacity;
        self
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum ArrowHead {
    /// Filled triangular head at the end (`-|>`).
    #[default]
    Filled,
    /// Open chevron at the end (`->`).
    Open,
    /// Open chevrons at both ends (`<->`).
    Both,
}

#[derive(Debug, Clone, PartialEq)]
pub struct ArrowMark {
    pub from: (f32, f32),
    pub to: (f32, f32),
    pub color: Color,
    pub width: f32,
    pub head: ArrowHead,
    /// `arc3` curvature: control point offset as a fraction of the chord,
    /// positive bends to the right of the direction of travel.
    pub curvature: f32,
    pub opacity: f32,
    pub label: Option<String>,
    pub label_size: f32,
    /// Label offset above the chord midpoint, in data units.
    pub label_offset: f32,
}

impl ArrowMark {
    pub fn new(from: (f32, f32), to: (f32, f32), color: Color) -> Self {
        Self {
            from,
            to,
            color,
            width: 1.5,
            head: ArrowHead::Filled,
            curvature: 0.0,
            opacity: 1.0,
            label: None,
            label_size: 6.0,
            label_offset: 0.18,
        }
    }

    pub fn width(mut self, width: f32) -> Self {
        self.width = width;
        self
    }

    pub fn head(mut self, head: ArrowHead) -> Self {
        self.head = head;
        self
    }

    pub fn curve(mut self, curvature: f32) -> Self {
        self.curvature = curvature;
        self
    }

    pub fn opacity(mut self, opacity: f32) -> Self {
        self.opacity = opacity;
        self
    }

    pub fn label(mut self, label: impl Into<String>, size: f32, offset: f32) -> Self {
        self.label = Some(label.into());
        self.label_size = size;
        self.label_offset = offset;
        self
    }

    /// Control point of the quadratic curve, or `None` for a straight arrow.
    pub fn control_point(&self) -> Option<(f32, f32)> {
        if self.curvature == 0.0 {
            return None;
        }
        let (x1, y1) = self.from;
        let (x2, y2) = self.to;
        let (mx, my) = ((x1 + x2) / 2.0, (y1 + y2) / 2.0);
        let (dx, dy) = (x2 - x1, y2 - y1);
        Some((mx + self.curvature * dy, my - self.curvature * dx))
    }
}

/// Text in a rounded box with a curved leader to a target point.
#[derive(Debug, Clone, PartialEq)]
pub struct CalloutMark {
    pub text: String,
    pub target: (f32, f32),
    pub anchor: (f32, f32),
    pub color: Color,
    pub arrow_color: Color,
    pub size: f32,
    pub bold: bool,
    pub align: Align,
    pub background: Color,
}

impl CalloutMark {
    pub fn new(text: impl Into<String>, target: (f32, f32), anchor: (f32, f32), color: Color) -> Self {
        Self {
            text: text.into(),
            target,
            anchor,
            color,
            arrow_color: color,
            size: 8.0,
            bold: false,
            align: Align::Left,
            background: Color::hex(0x1E2236),
        }
    }

    pub fn size(mut self, size: f32) -> Self {
        self.size = size;
        self
    }

    pub fn bold(mut self) -> Self {
        self.bold = true;
        self
    }

    pub fn arrow_color(mut self, color: Color) -> Self {
        self.arrow_color = color;
        self
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum MarkerShape {
    Circle,
    Square,
    Plus,
}

#[derive(Debug, Clone, PartialEq)]
pub enum Mark {
    Rect {
        x: f32,
        y: f32,
        w: f32,
        h: f32,
        /// Corner radius in data units.
        rounding: f32,
        style: Style,
    },
    Circle {
        cx: f32,
        cy: f32,
        r: f32,
        style: Style,
    },
    Polygon {
        points: Vec<(f32, f32)>,
        style: Style,
    },
    Polyline {
        points: Vec<(f32, f32)>,
        stroke: Stroke,
    },
    Arc {
        cx: f32,
        cy: f32,
        r: f32,
        /// Degrees counter-clockwise from +x.
        theta1: f32,
        theta2: f32,
        stroke: Stroke,
    },
    Arrow(ArrowMark),
    Text(TextMark),
    Callout(CalloutMark),
    Marker {
        x: f32,
        y: f32,
        shape: MarkerShape,
        /// Diameter in points.
        size: f32,
        color: Color,
    },
}

impl Mark {
    pub fn rect(x: f32, y: f32, w: f32, h: f32, style: Style) -> Self {
        Mark::Rect {
            x,
            y,
            w,
            h,
            rounding: 0.0,
            style,
        }
    }

    pub fn rounded(x: f32, y: f32, w: f32, h: f32, rounding: f32, style: Style) -> Self {
        Mark::Rect {
            x,
            y,
            w,
            h,
            rounding,
            style,
        }
    }

    pub fn line(points: &[(f32, f32)], stroke: Stroke) -> Self {
        Mark::Polyline {
            points: points.to_vec(),
            stroke,
        }
    }
}

/// Placement of a panel inside the figure, as fractions measured from the
/// bottom-left corner.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct Viewport {
    pub left: f32,
    pub bottom: f32,
    pub width: f32,
    pub height: f32,
}

impl Viewport {
    pub const FULL: Viewport = Viewport {
        left: 0.0,
        bottom: 0.0,
        width: 1.0,
        height: 1.0,
    };
}

#[derive(Debug, Clone, PartialEq)]
pub struct Panel {
    pub viewport: Viewport,
    pub x_range: (f32, f32),
    pub y_range: (f32, f32),
    /// One data unit spans the same number of pixels on both axes.
    pub equal_aspect: bool,
    pub background: Option<Color>,
    pub marks: Vec<Mark>,
}

impl Panel {
    pub fn new(viewport: Viewport, x_range: (f32, f32), y_range: (f32, f32)) -> Self {
        Self {
            viewport,
            x_range,
            y_range,
            equal_aspect: false,
            background: None,
            marks: Vec::new(),
        }
    }

    pub fn equal_aspect(mut self) -> Self {
        self.equal_aspect = true;
        self
    }

    pub fn background(mut self, color: Color) -> Self {
        self.background = Some(color);
        self
    }

    pub fn add(&mut self, mark: Mark) {
        self.marks.push(mark);
    }
}

#[derive(Debug, Clone, PartialEq)]
pub struct Figure {
    pub width_in: f32,
    pub height_in: f32,
    pub dpi: f32,
    pub background: Color,
    pub panels: Vec<Panel>,
    /// Text placed in figure fractions (0..1 from bottom-left).
    pub texts: Vec<TextMark>,
}

impl Figure {
    pub fn new(width_in: f32, height_in: f32, dpi: f32, background: Color) -> Self {
        Self {
            width_in,
            height_in,
            dpi,
            background,
            panels: Vec::new(),
            texts: Vec::new(),
        }
    }

    pub fn pixel_size(&self) -> (u32, u32) {
        (
            (self.width_in * self.dpi).round() as u32,
            (self.height_in * self.dpi).round() as u32,
        )
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_pixel_size() {
        let fig = Figure::new(14.0, 9.0, 180.0, Color::BLACK);
        assert_eq!(fig.pixel_size(), (2520, 1620));
    }

    #[test]
    fn test_arc3_control_point_bends_right() {
        let arrow = ArrowMark::new((0.0, 0.0), (2.0, 0.0), Color::BLACK).curve(0.5);
        assert_eq!(arrow.control_point(), Some((1.0, -1.0)));
        let straight = ArrowMark::new((0.0, 0.0), (2.0, 0.0), Color::BLACK);
        assert!(straight.control_point().is_none());
    }
}
