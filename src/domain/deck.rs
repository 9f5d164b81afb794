//! Renderer-neutral deck description.
//!
//! Coordinates are points (1/72 in) measured from the top-left corner of the
//! page. Text is stored already wrapped so every renderer breaks lines at
//! the same words.

use crate::domain::model::{Align, Color};
use std::path::PathBuf;

pub const POINTS_PER_INCH: f32 = 72.0;
pub const POINTS_PER_MM: f32 = 72.0 / 25.4;

pub fn inches(v: f32) -> f32 {
    v * POINTS_PER_INCH
}

pub fn mm(v: f32) -> f32 {
    v * POINTS_PER_MM
}

#[derive(Debug, Clone, Copy, PartialEq, Default)]
pub struct Frame {
    pub x: f32,
    pub y: f32,
    pub w: f32,
    pub h: f32,
}

impl Frame {
    pub fn new(x: f32, y: f32, w: f32, h: f32) -> Self {
        Self { x, y, w, h }
    }
}

#[derive(Debug, Clone, Copy, PartialEq)]
pub struct TextStyle {
    pub size: f32,
    pub color: Color,
    pub bold: bool,
}

impl Default for TextStyle {
    fn default() -> Self {
        Self {
            size: 14.0,
            color: Color::WHITE,
            bold: false,
        }
    }
}

/// A block of pre-wrapped lines sharing one style.
#[derive(Debug, Clone, PartialEq)]
pub struct TextBlock {
    pub x: f32,
    /// Baseline of the first line.
    pub baseline: f32,
    pub lines: Vec<String>,
    pub line_height: f32,
    pub style: TextStyle,
    pub align: Align,
    /// Width used for alignment. Left-aligned text may leave it unset.
    pub width: Option<f32>,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum ImageFit {
    /// Scale to fit inside the frame, keep aspect ratio, anchor bottom-left.
    #[default]
    Contain,
    Stretch,
}

#[derive(Debug, Clone, PartialEq)]
pub enum Shape {
    Rect {
        frame: Frame,
        fill: Color,
        /// Corner radius in points. Zero draws square corners.
        radius: f32,
    },
    Ellipse {
        frame: Frame,
        fill: Color,
    },
    Text(TextBlock),
    Image {
        frame: Frame,
        path: PathBuf,
        fit: ImageFit,
    },
}

#[derive(Debug, Clone, PartialEq)]
pub struct Slide {
    pub background: Color,
    pub shapes: Vec<Shape>,
}

impl Slide {
    pub fn new(background: Color) -> Self {
        Self {
            background,
            shapes: Vec::new(),
        }
    }

    pub fn push(&mut self, shape: Shape) {
        self.shapes.push(shape);
    }

    pub fn text_content(&self) -> Vec<&str> {
        self.shapes
            .iter()
            .filter_map(|s| match s {
                Shape::Text(block) => Some(block.lines.iter().map(String::as_str)),
                _ => None,
            })
            .flatten()
            .collect()
    }
}

#[derive(Debug, Clone, PartialEq)]
pub struct Deck {
    pub title: String,
    /// Typeface named in PPTX runs. PDF output always uses base-14 Helvetica,
    /// and wrapping is measured with Helvetica metrics either way.
    pub typeface: String,
    pub width: f32,
    pub height: f32,
    pub slides: Vec<Slide>,
}

impl Deck {
    pub fn new(title: impl Into<String>, width: f32, height: f32) -> Self {
        Self {
            title: title.into(),
            typeface: "Helvetica".to_string(),
            width,
            height,
            slides: Vec::new(),
        }
    }

    pub fn with_typeface(mut self, typeface: impl Into<String>) -> Self {
        self.typeface = typeface.into();
        self
    }

    pub fn image_paths(&self) -> Vec<&PathBuf> {
        let mut paths: Vec<&PathBuf> = Vec::new();
        for slide in &self.slides {
            for shape in &slide.shapes {
                if let Shape::Image { path, .. } = shape {
                    if !paths.contains(&path) {
                        paths.push(path);
                    }
                }
            }
        }
        paths
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_unit_conversion() {
        assert!((inches(1.0) - 72.0).abs() < f32::EPSILON);
        assert!((mm(25.4) - 72.0).abs() < 1e-4);
    }

    #[test]
    fn test_image_paths_are_deduplicated() {
        let mut deck = Deck::new("t", 100.0, 100.0);
        for _ in 0..2 {
            let mut slide = Slide::new(Color::BLACK);
            slide.push(Shape::Image {
                frame: Frame::new(0.0, 0.0, 10.0, 10.0),
                path: PathBuf::from("a.png"),
                fit: ImageFit::Contain,
            });
            deck.slides.push(slide);
        }
        assert_eq!(deck.image_paths().len(), 1);
    }
}
