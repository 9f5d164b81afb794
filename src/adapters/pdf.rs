//! PDF 輸出（pdf-writer）。
//!
//! 使用內建的 Helvetica 與 Helvetica-Bold，文字以 WinAnsiEncoding 編碼；
//! 不寫入建立時間與文件 ID，同樣的輸入會得到同樣的位元組。

use crate::domain::deck::{Deck, Frame, ImageFit, Shape, Slide, TextBlock};
use crate::domain::model::{Align, ArtifactKind, Color};
use crate::domain::ports::{DeckRenderer, ImageAssets};
use crate::utils::error::Result;
use crate::utils::text_metrics::{encode_win_ansi, string_width};
use flate2::write::ZlibEncoder;
use flate2::Compression;
use pdf_writer::{Content, Filter, Finish, Name, Pdf, Rect, Ref, Str};
use std::collections::HashMap;
use std::io::Write;
use std::path::PathBuf;

/// 四分之一圓的貝茲控制點比例
const KAPPA: f32 = 0.552_284_8;

const FONT_REGULAR: Name<'static> = Name(b"F1");
const FONT_BOLD: Name<'static> = Name(b"F2");

struct RefAlloc(i32);

impl RefAlloc {
    fn next(&mut self) -> Ref {
        self.0 += 1;
        Ref::new(self.0)
    }
}

struct EmbeddedImage {
    id: Ref,
    name: String,
    width: u32,
    height: u32,
}

#[derive(Debug, Default, Clone, Copy)]
pub struct PdfRenderer;

impl DeckRenderer for PdfRenderer {
    fn kind(&self) -> ArtifactKind {
        ArtifactKind::Pdf
    }

    fn render(&self, deck: &Deck, images: &ImageAssets) -> Result<Vec<u8>> {
        let mut refs = RefAlloc(0);
        let catalog_id = refs.next();
        let tree_id = refs.next();
        let regular_id = refs.next();
        let bold_id = refs.next();

        let mut pdf = Pdf::new();
        pdf.catalog(catalog_id).pages(tree_id);
        pdf.type1_font(regular_id)
            .base_font(Name(b"Helvetica"))
            .encoding_predefined(Name(b"WinAnsiEncoding"));
        pdf.type1_font(bold_id)
            .base_font(Name(b"Helvetica-Bold"))
            .encoding_predefined(Name(b"WinAnsiEncoding"));

        // 同一張圖片在整份文件只嵌入一次
        let mut embedded: HashMap<PathBuf, EmbeddedImage> = HashMap::new();
        for path in deck.image_paths() {
            let Some(bytes) = images.get(path) else {
                continue;
            };
            let name = format!("Im{}", embedded.len() + 1);
            let image = embed_image(&mut pdf, &mut refs, bytes, name)?;
            embedded.insert(path.clone(), image);
        }

        let mut page_ids = Vec::with_capacity(deck.slides.len());
        for slide in &deck.slides {
            let page_id = refs.next();
            let content_id = refs.next();
            page_ids.push(page_id);

            let content = draw_slide(slide, deck.width, deck.height, &embedded);
            pdf.stream(content_id, &content);

            let mut page = pdf.page(page_id);
            page.media_box(Rect::new(0.0, 0.0, deck.width, deck.height));
            page.parent(tree_id);
            page.contents(content_id);
            let mut resources = page.resources();
            resources
                .fonts()
                .pair(FONT_REGULAR, regular_id)
                .pair(FONT_BOLD, bold_id);
            let used: Vec<&EmbeddedImage> = slide
                .shapes
                .iter()
                .filter_map(|shape| match shape {
                    Shape::Image { path, .. } => embedded.get(path),
                    _ => None,
                })
                .collect();
            if !used.is_empty() {
                let mut objects = resources.x_objects();
                for image in used {
                    objects.pair(Name(image.name.as_bytes()), image.id);
                }
                objects.finish();
            }
            resources.finish();
            page.finish();
        }

        pdf.pages(tree_id)
            .kids(page_ids.iter().copied())
            .count(page_ids.len() as i32);

        Ok(pdf.finish())
    }
}

fn deflate(data: &[u8]) -> Result<Vec<u8>> {
    let mut encoder = ZlibEncoder::new(Vec::new(), Compression::default());
    encoder.write_all(data)?;
    Ok(encoder.finish()?)
}

/// RGB 影像加上（需要時）灰階 SMask
fn embed_image(pdf: &mut Pdf, refs: &mut RefAlloc, bytes: &[u8], name: String) -> Result<EmbeddedImage> {
    let decoded = image::load_from_memory(bytes)?.to_rgba8();
    let (width, height) = decoded.dimensions();

    let mut rgb = Vec::with_capacity((width * height * 3) as usize);
    let mut alpha = Vec::with_capacity((width * height) as usize);
    for pixel in decoded.pixels() {
        rgb.extend_from_slice(&pixel.0[..3]);
        alpha.push(pixel.0[3]);
    }

    let id = refs.next();
    let mask_id = if alpha.iter().any(|&a| a < u8::MAX) {
        let mask_id = refs.next();
        let alpha_z = deflate(&alpha)?;
        let mut mask = pdf.image_xobject(mask_id, &alpha_z);
        mask.filter(Filter::FlateDecode);
        mask.width(width as i32);
        mask.height(height as i32);
        mask.color_space().device_gray();
        mask.bits_per_component(8);
        mask.finish();
        Some(mask_id)
    } else {
        None
    };

    let compressed = deflate(&rgb)?;
    let mut xobject = pdf.image_xobject(id, &compressed);
    xobject.filter(Filter::FlateDecode);
    xobject.width(width as i32);
    xobject.height(height as i32);
    xobject.color_space().device_rgb();
    xobject.bits_per_component(8);
    if let Some(mask_id) = mask_id {
        xobject.s_mask(mask_id);
    }
    xobject.finish();

    Ok(EmbeddedImage {
        id,
        name,
        width,
        height,
    })
}

fn set_fill(content: &mut Content, color: Color) {
    let (r, g, b) = color.to_unit();
    content.set_fill_rgb(r, g, b);
}

fn draw_slide(slide: &Slide, page_w: f32, page_h: f32, images: &HashMap<PathBuf, EmbeddedImage>) -> Vec<u8> {
    let mut content = Content::new();

    set_fill(&mut content, slide.background);
    content.rect(0.0, 0.0, page_w, page_h);
    content.fill_nonzero();

    for shape in &slide.shapes {
        match shape {
            Shape::Rect { frame, fill, radius } => {
                set_fill(&mut content, *fill);
                let bottom = page_h - frame.y - frame.h;
                if *radius > 0.0 {
                    rounded_rect(&mut content, frame.x, bottom, frame.w, frame.h, *radius);
                } else {
                    content.rect(frame.x, bottom, frame.w, frame.h);
                }
                content.fill_nonzero();
            }
            Shape::Ellipse { frame, fill } => {
                set_fill(&mut content, *fill);
                ellipse(&mut content, frame, page_h);
                content.fill_nonzero();
            }
            Shape::Text(block) => draw_text(&mut content, block, page_h),
            Shape::Image { frame, path, fit } => {
                if let Some(image) = images.get(path) {
                    place_image(&mut content, image, frame, *fit, page_h);
                }
            }
        }
    }

    content.finish()
}

fn rounded_rect(content: &mut Content, x: f32, y: f32, w: f32, h: f32, radius: f32) {
    let r = radius.min(w / 2.0).min(h / 2.0);
    let k = r * KAPPA;
    content.move_to(x + r, y);
    content.line_to(x + w - r, y);
    content.cubic_to(x + w - r + k, y, x + w, y + r - k, x + w, y + r);
    content.line_to(x + w, y + h - r);
    content.cubic_to(x + w, y + h - r + k, x + w - r + k, y + h, x + w - r, y + h);
    content.line_to(x + r, y + h);
    content.cubic_to(x + r - k, y + h, x, y + h - r + k, x, y + h - r);
    content.line_to(x, y + r);
    content.cubic_to(x, y + r - k, x + r - k, y, x + r, y);
    content.close_path();
}

fn ellipse(content: &mut Content, frame: &Frame, page_h: f32) {
    let rx = frame.w / 2.0;
    let ry = frame.h / 2.0;
    let cx = frame.x + rx;
    let cy = page_h - frame.y - ry;
    let (kx, ky) = (rx * KAPPA, ry * KAPPA);
    content.move_to(cx + rx, cy);
    content.cubic_to(cx + rx, cy + ky, cx + kx, cy + ry, cx, cy + ry);
    content.cubic_to(cx - kx, cy + ry, cx - rx, cy + ky, cx - rx, cy);
    content.cubic_to(cx - rx, cy - ky, cx - kx, cy - ry, cx, cy - ry);
    content.cubic_to(cx + kx, cy - ry, cx + rx, cy - ky, cx + rx, cy);
    content.close_path();
}

fn line_x(block: &TextBlock, line: &str) -> f32 {
    let Some(width) = block.width else {
        return block.x;
    };
    let text_w = string_width(line, block.style.size, block.style.bold);
    match block.align {
        Align::Left => block.x,
        Align::Center => block.x + (width - text_w) / 2.0,
        Align::Right => block.x + width - text_w,
    }
}

fn draw_text(content: &mut Content, block: &TextBlock, page_h: f32) {
    let font = if block.style.bold { FONT_BOLD } else { FONT_REGULAR };
    set_fill(content, block.style.color);
    for (i, line) in block.lines.iter().enumerate() {
        if line.is_empty() {
            continue;
        }
        let baseline = block.baseline + i as f32 * block.line_height;
        let encoded = encode_win_ansi(line);
        content.begin_text();
        content.set_font(font, block.style.size);
        content.next_line(line_x(block, line), page_h - baseline);
        content.show(Str(&encoded));
        content.end_text();
    }
}

/// 等比例縮放進方框並靠左下角；`Stretch` 直接填滿
fn place_image(content: &mut Content, image: &EmbeddedImage, frame: &Frame, fit: ImageFit, page_h: f32) {
    let (w, h) = match fit {
        ImageFit::Stretch => (frame.w, frame.h),
        ImageFit::Contain => {
            let scale = (frame.w / image.width as f32).min(frame.h / image.height as f32);
            (image.width as f32 * scale, image.height as f32 * scale)
        }
    };
    let bottom = page_h - frame.y - frame.h;
    content.save_state();
    content.transform([w, 0.0, 0.0, h, frame.x, bottom]);
    content.x_object(Name(image.name.as_bytes()));
    content.restore_state();
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::domain::deck::TextStyle;
    use image::{Rgba, RgbaImage};
    use std::io::Cursor;

    fn sample_deck(image: Option<&str>) -> Deck {
        let mut deck = Deck::new("Sample", 400.0, 300.0);
        let mut slide = Slide::new(Color::hex(0x1A1A2E));
        slide.push(Shape::Rect {
            frame: Frame::new(10.0, 10.0, 100.0, 50.0),
            fill: Color::hex(0xFF8C00),
            radius: 8.0,
        });
        slide.push(Shape::Text(TextBlock {
            x: 20.0,
            baseline: 40.0,
            lines: vec!["Big bubbles \u{2014} zero effort".to_string()],
            line_height: 16.8,
            style: TextStyle::default(),
            align: Align::Left,
            width: None,
        }));
        if let Some(path) = image {
            slide.push(Shape::Image {
                frame: Frame::new(0.0, 100.0, 200.0, 100.0),
                path: PathBuf::from(path),
                fit: ImageFit::Contain,
            });
        }
        deck.slides.push(slide);
        deck.slides.push(Slide::new(Color::WHITE));
        deck
    }

    fn png_with_alpha() -> Vec<u8> {
        let img = RgbaImage::from_fn(4, 2, |x, _| Rgba([255, 0, 0, if x == 0 { 0 } else { 255 }]));
        let mut out = Cursor::new(Vec::new());
        img.write_to(&mut out, image::ImageFormat::Png).unwrap();
        out.into_inner()
    }

    fn count(haystack: &[u8], needle: &[u8]) -> usize {
        haystack.windows(needle.len()).filter(|w| *w == needle).count()
    }

    #[test]
    fn test_pages_and_fonts() {
        let bytes = PdfRenderer.render(&sample_deck(None), &ImageAssets::new()).unwrap();
        assert!(bytes.starts_with(b"%PDF-"));
        assert_eq!(count(&bytes, b"/Type /Page\n"), 2);
        assert!(count(&bytes, b"/Helvetica-Bold") == 1);
        assert!(count(&bytes, b"/WinAnsiEncoding") == 2);
    }

    #[test]
    fn test_output_is_byte_stable() {
        let deck = sample_deck(None);
        let a = PdfRenderer.render(&deck, &ImageAssets::new()).unwrap();
        let b = PdfRenderer.render(&deck, &ImageAssets::new()).unwrap();
        assert_eq!(a, b);
    }

    #[test]
    fn test_transparent_image_gets_soft_mask() {
        let mut assets = ImageAssets::new();
        assets.insert(PathBuf::from("bubbler/arrangement.png"), png_with_alpha());
        let bytes = PdfRenderer
            .render(&sample_deck(Some("bubbler/arrangement.png")), &assets)
            .unwrap();
        assert_eq!(count(&bytes, b"/Subtype /Image"), 2);
        assert_eq!(count(&bytes, b"/SMask"), 1);
        assert_eq!(count(&bytes, b"/Im1 Do"), 1);
    }

    #[test]
    fn test_missing_image_is_skipped() {
        let bytes = PdfRenderer
            .render(&sample_deck(Some("missing.png")), &ImageAssets::new())
            .unwrap();
        assert_eq!(count(&bytes, b"/Subtype /Image"), 0);
    }

    #[test]
    fn test_right_aligned_line_ends_at_box_edge() {
        let block = TextBlock {
            x: 10.0,
            baseline: 0.0,
            lines: vec!["1/8".to_string()],
            line_height: 10.0,
            style: TextStyle {
                size: 8.0,
                ..TextStyle::default()
            },
            align: Align::Right,
            width: Some(100.0),
        };
        let x = line_x(&block, "1/8");
        assert!((x + string_width("1/8", 8.0, false) - 110.0).abs() < 1e-3);
    }
}
