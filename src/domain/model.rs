use serde::{Deserialize, Serialize};
use std::fmt;

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub struct Color {
    pub r: u8,
    pub g: u8,
    pub b: u8,
}

impl Color {
    pub const WHITE: Color = Color::hex(0xFFFFFF);
    pub const BLACK: Color = Color::hex(0x000000);

    pub const fn rgb(r: u8, g: u8, b: u8) -> Self {
        Self { r, g, b }
    }

    pub const fn hex(value: u32) -> Self {
        Self {
            r: ((value >> 16) & 0xFF) as u8,
            g: ((value >> 8) & 0xFF) as u8,
            b: (value & 0xFF) as u8,
        }
    }

    /// `RRGGBB`，大寫，給 OOXML 與 SVG 使用
    pub fn to_hex(self) -> String {
        format!("{:02X}{:02X}{:02X}", self.r, self.g, self.b)
    }

    pub fn to_unit(self) -> (f32, f32, f32) {
        (
            self.r as f32 / 255.0,
            self.g as f32 / 255.0,
            self.b as f32 / 255.0,
        )
    }

    /// 線性混色，`t = 0` 為 self，`t = 1` 為 other
    pub fn mix(self, other: Color, t: f32) -> Color {
        let t = t.clamp(0.0, 1.0);
        let lerp = |a: u8, b: u8| (a as f32 + (b as f32 - a as f32) * t) as u8;
        Color::rgb(lerp(self.r, other.r), lerp(self.g, other.g), lerp(self.b, other.b))
    }
}

impl fmt::Display for Color {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "#{}", self.to_hex())
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum Align {
    #[default]
    Left,
    Center,
    Right,
}

/// An `<img>` element seen on the chat page.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct ImageCandidate {
    /// Position among the elements matched by the selector that found it.
    pub index: usize,
    pub src: String,
    pub width: f64,
    pub height: f64,
}

impl ImageCandidate {
    pub fn min_side(&self) -> f64 {
        self.width.min(self.height)
    }
}

#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase", default)]
pub struct DomDiagnostics {
    pub canvases: usize,
    pub total_images: usize,
    pub article_count: usize,
    pub last_article_html: Option<String>,
    pub url_attributes: Vec<String>,
    pub all_img_srcs: Vec<String>,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
pub enum ArtifactKind {
    Pdf,
    Pptx,
    Png,
    Image,
}

impl ArtifactKind {
    pub fn extension(self) -> &'static str {
        match self {
            ArtifactKind::Pdf => "pdf",
            ArtifactKind::Pptx => "pptx",
            ArtifactKind::Png | ArtifactKind::Image => "png",
        }
    }
}

/// A file a job has written.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct Artifact {
    pub path: String,
    pub kind: ArtifactKind,
    pub bytes: usize,
}

impl fmt::Display for Artifact {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{} ({:.0} KB)", self.path, self.bytes as f64 / 1024.0)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_color_hex_roundtrip() {
        let c = Color::hex(0x1A1A2E);
        assert_eq!(c, Color::rgb(0x1A, 0x1A, 0x2E));
        assert_eq!(c.to_hex(), "1A1A2E");
        assert_eq!(c.to_string(), "#1A1A2E");
    }

    #[test]
    fn test_color_mix_endpoints() {
        let a = Color::hex(0x000000);
        let b = Color::hex(0xFFFFFF);
        assert_eq!(a.mix(b, 0.0), a);
        assert_eq!(a.mix(b, 1.0), b);
    }

    #[test]
    fn test_diagnostics_parse_camel_case() {
        let json = r#"{"canvases":1,"totalImages":3,"articleCount":2,"urlAttributes":["IMG.src=blob:x"]}"#;
        let diag: DomDiagnostics = serde_json::from_str(json).unwrap();
        assert_eq!(diag.total_images, 3);
        assert_eq!(diag.article_count, 2);
        assert!(diag.last_article_html.is_none());
    }
}
