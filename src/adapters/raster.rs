//! SVG 點陣化：usvg 解析、resvg 繪製，輸出 PNG。

use super::svg::render_svg;
use crate::domain::figure::Figure;
use crate::utils::error::{ForgeError, Result};
use resvg::{tiny_skia, usvg};
use std::sync::{Arc, OnceLock};

/// 系統字型只掃描一次
fn font_database() -> Arc<usvg::fontdb::Database> {
    static FONTS: OnceLock<Arc<usvg::fontdb::Database>> = OnceLock::new();
    FONTS
        .get_or_init(|| {
            let mut db = usvg::fontdb::Database::new();
            db.load_system_fonts();
            tracing::debug!("🔤 Loaded {} system font faces", db.len());
            Arc::new(db)
        })
        .clone()
}

fn render_error(message: impl Into<String>) -> ForgeError {
    ForgeError::RenderError {
        message: message.into(),
    }
}

/// 把圖繪製成 PNG，像素尺寸為 [`Figure::pixel_size`]
pub fn render_png(fig: &Figure) -> Result<Vec<u8>> {
    let svg = render_svg(fig);
    let (width, height) = fig.pixel_size();

    let options = usvg::Options {
        font_family: "sans-serif".to_string(),
        fontdb: font_database(),
        ..usvg::Options::default()
    };
    let tree = usvg::Tree::from_str(&svg, &options).map_err(|e| render_error(format!("invalid SVG: {}", e)))?;

    let mut pixmap = tiny_skia::Pixmap::new(width, height)
        .ok_or_else(|| render_error(format!("cannot allocate a {}x{} canvas", width, height)))?;
    resvg::render(&tree, tiny_skia::Transform::identity(), &mut pixmap.as_mut());

    pixmap
        .encode_png()
        .map_err(|e| render_error(format!("PNG encoding failed: {}", e)))
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::domain::figure::{Mark, Panel, Style, Viewport};
    use crate::domain::model::Color;

    #[test]
    fn test_png_has_figure_dimensions_and_colors() {
        let mut fig = Figure::new(2.0, 1.0, 50.0, Color::hex(0x102030));
        let mut panel = Panel::new(Viewport::FULL, (0.0, 2.0), (0.0, 1.0));
        panel.add(Mark::rect(1.0, 0.0, 1.0, 1.0, Style::filled(Color::hex(0xFF0000))));
        fig.panels.push(panel);

        let png = render_png(&fig).unwrap();
        let img = image::load_from_memory(&png).unwrap().to_rgb8();
        assert_eq!(img.dimensions(), (100, 50));
        assert_eq!(img.get_pixel(10, 25).0, [0x10, 0x20, 0x30]);
        assert_eq!(img.get_pixel(90, 25).0, [0xFF, 0x00, 0x00]);
    }

    #[test]
    fn test_zero_sized_figure_is_an_error() {
        let fig = Figure::new(0.0, 1.0, 100.0, Color::BLACK);
        assert!(render_png(&fig).is_err());
    }
}
