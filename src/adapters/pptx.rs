//! PPTX 輸出：手寫最小可用的 OOXML 封裝，再以 zip 打包。
//!
//! 每行文字已在版面階段換好行，這裡每行一個段落並關閉自動換行，
//! 讓 PowerPoint 與 PDF 的斷行位置一致。

use crate::domain::deck::{Deck, Frame, ImageFit, Shape, Slide, TextBlock};
use crate::domain::model::{Align, ArtifactKind, Color};
use crate::domain::ports::{DeckRenderer, ImageAssets};
use crate::utils::error::{ForgeError, Result};
use crate::utils::text_metrics::string_width;
use image::ImageFormat;
use std::collections::HashMap;
use std::fmt::Write as _;
use std::io::{Cursor, Write};
use std::path::PathBuf;
use zip::write::{FileOptions, ZipWriter};
use zip::{CompressionMethod, DateTime};

const EMU_PER_POINT: f32 = 12_700.0;

const NS_A: &str = "http://schemas.openxmlformats.org/drawingml/2006/main";
const NS_R: &str = "http://schemas.openxmlformats.org/officeDocument/2006/relationships";
const NS_P: &str = "http://schemas.openxmlformats.org/presentationml/2006/main";
const REL_BASE: &str = "http://schemas.openxmlformats.org/officeDocument/2006/relationships";
const XML_DECL: &str = r#"<?xml version="1.0" encoding="UTF-8" standalone="yes"?>"#;

fn emu(points: f32) -> i64 {
    (points * EMU_PER_POINT).round() as i64
}

fn escape(text: &str) -> String {
    let mut out = String::with_capacity(text.len());
    for c in text.chars() {
        match c {
            '&' => out.push_str("&amp;"),
            '<' => out.push_str("&lt;"),
            '>' => out.push_str("&gt;"),
            '"' => out.push_str("&quot;"),
            '\'' => out.push_str("&apos;"),
            _ => out.push(c),
        }
    }
    out
}

/// 嵌入的媒體檔
struct Media {
    file: String,
    width: u32,
    height: u32,
}

#[derive(Debug, Default, Clone, Copy)]
pub struct PptxRenderer;

impl DeckRenderer for PptxRenderer {
    fn kind(&self) -> ArtifactKind {
        ArtifactKind::Pptx
    }

    fn render(&self, deck: &Deck, images: &ImageAssets) -> Result<Vec<u8>> {
        let mut media: HashMap<PathBuf, Media> = HashMap::new();
        let mut media_files: Vec<(String, &[u8])> = Vec::new();
        for path in deck.image_paths() {
            let Some(bytes) = images.get(path) else {
                continue;
            };
            let ext = match image::guess_format(bytes)? {
                ImageFormat::Png => "png",
                ImageFormat::Jpeg => "jpeg",
                other => {
                    return Err(ForgeError::RenderError {
                        message: format!("unsupported image format {:?} for {}", other, path.display()),
                    })
                }
            };
            let (width, height) = image::ImageReader::new(Cursor::new(bytes))
                .with_guessed_format()?
                .into_dimensions()?;
            let file = format!("image{}.{}", media_files.len() + 1, ext);
            media_files.push((file.clone(), bytes.as_slice()));
            media.insert(path.clone(), Media { file, width, height });
        }

        let mut zip = ZipWriter::new(Cursor::new(Vec::new()));
        let xml = FileOptions::<()>::default()
            .compression_method(CompressionMethod::Deflated)
            .last_modified_time(DateTime::default());
        let stored = FileOptions::<()>::default()
            .compression_method(CompressionMethod::Stored)
            .last_modified_time(DateTime::default());

        put(&mut zip, "[Content_Types].xml", content_types(deck.slides.len()).as_bytes(), &xml)?;
        put(&mut zip, "_rels/.rels", root_rels().as_bytes(), &xml)?;
        put(&mut zip, "ppt/presentation.xml", presentation(deck).as_bytes(), &xml)?;
        put(
            &mut zip,
            "ppt/_rels/presentation.xml.rels",
            presentation_rels(deck.slides.len()).as_bytes(),
            &xml,
        )?;
        put(&mut zip, "ppt/slideMasters/slideMaster1.xml", SLIDE_MASTER.as_bytes(), &xml)?;
        put(
            &mut zip,
            "ppt/slideMasters/_rels/slideMaster1.xml.rels",
            rels(&[
                ("rId1", "slideLayout", "../slideLayouts/slideLayout1.xml"),
                ("rId2", "theme", "../theme/theme1.xml"),
            ])
            .as_bytes(),
            &xml,
        )?;
        put(&mut zip, "ppt/slideLayouts/slideLayout1.xml", SLIDE_LAYOUT.as_bytes(), &xml)?;
        put(
            &mut zip,
            "ppt/slideLayouts/_rels/slideLayout1.xml.rels",
            rels(&[("rId1", "slideMaster", "../slideMasters/slideMaster1.xml")]).as_bytes(),
            &xml,
        )?;
        put(&mut zip, "ppt/theme/theme1.xml", theme(&deck.typeface).as_bytes(), &xml)?;

        for (i, slide) in deck.slides.iter().enumerate() {
            let n = i + 1;
            let (body, slide_rels) = slide_xml(slide, &media, &deck.typeface);
            put(&mut zip, &format!("ppt/slides/slide{}.xml", n), body.as_bytes(), &xml)?;
            put(
                &mut zip,
                &format!("ppt/slides/_rels/slide{}.xml.rels", n),
                slide_rels.as_bytes(),
                &xml,
            )?;
        }
        for (file, bytes) in &media_files {
            put(&mut zip, &format!("ppt/media/{}", file), bytes, &stored)?;
        }

        Ok(zip.finish()?.into_inner())
    }
}

fn put(
    zip: &mut ZipWriter<Cursor<Vec<u8>>>,
    name: &str,
    data: &[u8],
    options: &FileOptions<'static, ()>,
) -> Result<()> {
    zip.start_file::<_, ()>(name, options.clone())?;
    zip.write_all(data)?;
    Ok(())
}

fn content_types(slides: usize) -> String {
    let mut out = format!(
        r#"{XML_DECL}<Types xmlns="http://schemas.openxmlformats.org/package/2006/content-types"><Default Extension="rels" ContentType="application/vnd.openxmlformats-package.relationships+xml"/><Default Extension="xml" ContentType="application/xml"/><Default Extension="png" ContentType="image/png"/><Default Extension="jpeg" ContentType="image/jpeg"/><Override PartName="/ppt/presentation.xml" ContentType="application/vnd.openxmlformats-officedocument.presentationml.presentation.main+xml"/><Override PartName="/ppt/slideMasters/slideMaster1.xml" ContentType="application/vnd.openxmlformats-officedocument.presentationml.slideMaster+xml"/><Override PartName="/ppt/slideLayouts/slideLayout1.xml" ContentType="application/vnd.openxmlformats-officedocument.presentationml.slideLayout+xml"/><Override PartName="/ppt/theme/theme1.xml" ContentType="application/vnd.openxmlformats-officedocument.theme+xml"/>"#
    );
    for n in 1..=slides {
        let _ = write!(
            out,
            r#"<Override PartName="/ppt/slides/slide{n}.xml" ContentType="application/vnd.openxmlformats-officedocument.presentationml.slide+xml"/>"#
        );
    }
    out.push_str("</Types>");
    out
}

fn root_rels() -> String {
    format!(
        r#"{XML_DECL}<Relationships xmlns="http://schemas.openxmlformats.org/package/2006/relationships"><Relationship Id="rId1" Type="{REL_BASE}/officeDocument" Target="ppt/presentation.xml"/></Relationships>"#
    )
}

/// `(id, 關係類型, 目標)`
fn rels(entries: &[(&str, &str, &str)]) -> String {
    let mut out = format!(
        r#"{XML_DECL}<Relationships xmlns="http://schemas.openxmlformats.org/package/2006/relationships">"#
    );
    for (id, kind, target) in entries {
        let _ = write!(
            out,
            r#"<Relationship Id="{id}" Type="{REL_BASE}/{kind}" Target="{target}"/>"#
        );
    }
    out.push_str("</Relationships>");
    out
}

fn presentation(deck: &Deck) -> String {
    let mut ids = String::new();
    for i in 0..deck.slides.len() {
        let _ = write!(ids, r#"<p:sldId id="{}" r:id="rId{}"/>"#, 256 + i, i + 3);
    }
    format!(
        r#"{XML_DECL}<p:presentation xmlns:a="{NS_A}" xmlns:r="{NS_R}" xmlns:p="{NS_P}" saveSubsetFonts="1"><p:sldMasterIdLst><p:sldMasterId id="2147483648" r:id="rId1"/></p:sldMasterIdLst><p:sldIdLst>{ids}</p:sldIdLst><p:sldSz cx="{cx}" cy="{cy}"/><p:notesSz cx="6858000" cy="9144000"/></p:presentation>"#,
        cx = emu(deck.width),
        cy = emu(deck.height),
    )
}

fn presentation_rels(slides: usize) -> String {
    let targets: Vec<(String, String)> = (1..=slides)
        .map(|n| (format!("rId{}", n + 2), format!("slides/slide{}.xml", n)))
        .collect();
    let mut entries = vec![
        ("rId1", "slideMaster", "slideMasters/slideMaster1.xml"),
        ("rId2", "theme", "theme/theme1.xml"),
    ];
    for (id, target) in &targets {
        entries.push((id.as_str(), "slide", target.as_str()));
    }
    rels(&entries)
}

fn xfrm(frame: &Frame) -> String {
    format!(
        r#"<a:xfrm><a:off x="{}" y="{}"/><a:ext cx="{}" cy="{}"/></a:xfrm>"#,
        emu(frame.x),
        emu(frame.y),
        emu(frame.w.max(0.0)),
        emu(frame.h.max(0.0))
    )
}

fn solid(color: Color) -> String {
    format!(r#"<a:solidFill><a:srgbClr val="{}"/></a:solidFill>"#, color.to_hex())
}

/// 回傳投影片本體與其關係檔
fn slide_xml(slide: &Slide, media: &HashMap<PathBuf, Media>, typeface: &str) -> (String, String) {
    let mut tree = String::new();
    let mut next_id = 2;
    let mut image_rels: Vec<(String, String)> = Vec::new();

    for shape in &slide.shapes {
        let id = next_id;
        next_id += 1;
        match shape {
            Shape::Rect { frame, fill, radius } => {
                let geometry = if *radius > 0.0 {
                    let short = frame.w.min(frame.h).max(f32::EPSILON);
                    let adj = ((radius / short) * 100_000.0).round().min(50_000.0) as i64;
                    format!(r#"<a:prstGeom prst="roundRect"><a:avLst><a:gd name="adj" fmla="val {adj}"/></a:avLst></a:prstGeom>"#)
                } else {
                    r#"<a:prstGeom prst="rect"><a:avLst/></a:prstGeom>"#.to_string()
                };
                let _ = write!(
                    tree,
                    r#"<p:sp><p:nvSpPr><p:cNvPr id="{id}" name="Shape {id}"/><p:cNvSpPr/><p:nvPr/></p:nvSpPr><p:spPr>{}{geometry}{}<a:ln><a:noFill/></a:ln></p:spPr></p:sp>"#,
                    xfrm(frame),
                    solid(*fill)
                );
            }
            Shape::Ellipse { frame, fill } => {
                let _ = write!(
                    tree,
                    r#"<p:sp><p:nvSpPr><p:cNvPr id="{id}" name="Oval {id}"/><p:cNvSpPr/><p:nvPr/></p:nvSpPr><p:spPr>{}<a:prstGeom prst="ellipse"><a:avLst/></a:prstGeom>{}<a:ln><a:noFill/></a:ln></p:spPr></p:sp>"#,
                    xfrm(frame),
                    solid(*fill)
                );
            }
            Shape::Text(block) => tree.push_str(&text_box(id, block, typeface)),
            Shape::Image { frame, path, fit } => {
                let Some(item) = media.get(path) else {
                    continue;
                };
                let rel_id = format!("rId{}", image_rels.len() + 2);
                image_rels.push((rel_id.clone(), format!("../media/{}", item.file)));
                let placed = match fit {
                    ImageFit::Stretch => *frame,
                    ImageFit::Contain => {
                        let scale = (frame.w / item.width as f32).min(frame.h / item.height as f32);
                        let (w, h) = (item.width as f32 * scale, item.height as f32 * scale);
                        Frame::new(frame.x, frame.y + frame.h - h, w, h)
                    }
                };
                let _ = write!(
                    tree,
                    r#"<p:pic><p:nvPicPr><p:cNvPr id="{id}" name="Picture {id}"/><p:cNvPicPr><a:picLocks noChangeAspect="1"/></p:cNvPicPr><p:nvPr/></p:nvPicPr><p:blipFill><a:blip r:embed="{rel_id}"/><a:stretch><a:fillRect/></a:stretch></p:blipFill><p:spPr>{}<a:prstGeom prst="rect"><a:avLst/></a:prstGeom></p:spPr></p:pic>"#,
                    xfrm(&placed)
                );
            }
        }
    }

    let body = format!(
        r#"{XML_DECL}<p:sld xmlns:a="{NS_A}" xmlns:r="{NS_R}" xmlns:p="{NS_P}"><p:cSld><p:bg><p:bgPr>{}<a:effectLst/></p:bgPr></p:bg><p:spTree><p:nvGrpSpPr><p:cNvPr id="1" name=""/><p:cNvGrpSpPr/><p:nvPr/></p:nvGrpSpPr><p:grpSpPr/>{tree}</p:spTree></p:cSld><p:clrMapOvr><a:masterClrMapping/></p:clrMapOvr></p:sld>"#,
        solid(slide.background)
    );

    let mut entries = vec![("rId1", "slideLayout", "../slideLayouts/slideLayout1.xml")];
    for (id, target) in &image_rels {
        entries.push((id.as_str(), "image", target.as_str()));
    }
    (body, rels(&entries))
}

/// 首行基線約在固定行距的 80% 處
const BASELINE_RATIO: f32 = 0.8;

fn text_box(id: usize, block: &TextBlock, typeface: &str) -> String {
    let style = &block.style;
    let width = block.width.unwrap_or_else(|| {
        block
            .lines
            .iter()
            .map(|line| string_width(line, style.size, style.bold))
            .fold(0.0, f32::max)
    });
    let frame = Frame::new(
        block.x,
        block.baseline - block.line_height * BASELINE_RATIO,
        width,
        block.line_height * block.lines.len().max(1) as f32,
    );
    let algn = match block.align {
        Align::Left => "l",
        Align::Center => "ctr",
        Align::Right => "r",
    };
    let bold = if style.bold { r#" b="1""# } else { "" };
    let size = (style.size * 100.0).round() as i64;
    let spacing = (block.line_height * 100.0).round() as i64;

    let mut paragraphs = String::new();
    for line in &block.lines {
        let _ = write!(
            paragraphs,
            r#"<a:p><a:pPr algn="{algn}"><a:lnSpc><a:spcPts val="{spacing}"/></a:lnSpc></a:pPr><a:r><a:rPr lang="en-US" sz="{size}"{bold} dirty="0">{}<a:latin typeface="{}"/></a:rPr><a:t>{}</a:t></a:r></a:p>"#,
            solid(style.color),
            escape(typeface),
            escape(line)
        );
    }

    format!(
        r#"<p:sp><p:nvSpPr><p:cNvPr id="{id}" name="TextBox {id}"/><p:cNvSpPr txBox="1"/><p:nvPr/></p:nvSpPr><p:spPr>{}<a:prstGeom prst="rect"><a:avLst/></a:prstGeom><a:noFill/></p:spPr><p:txBody><a:bodyPr wrap="none" lIns="0" tIns="0" rIns="0" bIns="0" rtlCol="0"><a:noAutofit/></a:bodyPr><a:lstStyle/>{paragraphs}</p:txBody></p:sp>"#,
        xfrm(&frame)
    )
}

const SLIDE_MASTER: &str = r#"<?xml version="1.0" encoding="UTF-8" standalone="yes"?><p:sldMaster xmlns:a="http://schemas.openxmlformats.org/drawingml/2006/main" xmlns:r="http://schemas.openxmlformats.org/officeDocument/2006/relationships" xmlns:p="http://schemas.openxmlformats.org/presentationml/2006/main"><p:cSld><p:bg><p:bgRef idx="1001"><a:schemeClr val="bg1"/></p:bgRef></p:bg><p:spTree><p:nvGrpSpPr><p:cNvPr id="1" name=""/><p:cNvGrpSpPr/><p:nvPr/></p:nvGrpSpPr><p:grpSpPr/></p:spTree></p:cSld><p:clrMap bg1="lt1" tx1="dk1" bg2="lt2" tx2="dk2" accent1="accent1" accent2="accent2" accent3="accent3" accent4="accent4" accent5="accent5" accent6="accent6" hlink="hlink" folHlink="folHlink"/><p:sldLayoutIdLst><p:sldLayoutId id="2147483649" r:id="rId1"/></p:sldLayoutIdLst><p:txStyles><p:titleStyle><a:lvl1pPr><a:defRPr sz="4400"/></a:lvl1pPr></p:titleStyle><p:bodyStyle><a:lvl1pPr><a:defRPr sz="1800"/></a:lvl1pPr></p:bodyStyle><p:otherStyle><a:lvl1pPr><a:defRPr sz="1800"/></a:lvl1pPr></p:otherStyle></p:txStyles></p:sldMaster>"#;

const SLIDE_LAYOUT: &str = r#"<?xml version="1.0" encoding="UTF-8" standalone="yes"?><p:sldLayout xmlns:a="http://schemas.openxmlformats.org/drawingml/2006/main" xmlns:r="http://schemas.openxmlformats.org/officeDocument/2006/relationships" xmlns:p="http://schemas.openxmlformats.org/presentationml/2006/main" type="blank" preserve="1"><p:cSld name="Blank"><p:spTree><p:nvGrpSpPr><p:cNvPr id="1" name=""/><p:cNvGrpSpPr/><p:nvPr/></p:nvGrpSpPr><p:grpSpPr/></p:spTree></p:cSld><p:clrMapOvr><a:masterClrMapping/></p:clrMapOvr></p:sldLayout>"#;

/// 主題字型跟著簡報設定
fn theme(typeface: &str) -> String {
    THEME.replace("{typeface}", &escape(typeface))
}

const THEME: &str = r#"<?xml version="1.0" encoding="UTF-8" standalone="yes"?><a:theme xmlns:a="http://schemas.openxmlformats.org/drawingml/2006/main" name="Concept"><a:themeElements><a:clrScheme name="Concept"><a:dk1><a:srgbClr val="000000"/></a:dk1><a:lt1><a:srgbClr val="FFFFFF"/></a:lt1><a:dk2><a:srgbClr val="1A1A2E"/></a:dk2><a:lt2><a:srgbClr val="F0F0F5"/></a:lt2><a:accent1><a:srgbClr val="009BF5"/></a:accent1><a:accent2><a:srgbClr val="00D4AA"/></a:accent2><a:accent3><a:srgbClr val="FF8C00"/></a:accent3><a:accent4><a:srgbClr val="FF4545"/></a:accent4><a:accent5><a:srgbClr val="4EC978"/></a:accent5><a:accent6><a:srgbClr val="A855F7"/></a:accent6><a:hlink><a:srgbClr val="009BF5"/></a:hlink><a:folHlink><a:srgbClr val="A855F7"/></a:folHlink></a:clrScheme><a:fontScheme name="Concept"><a:majorFont><a:latin typeface="{typeface}"/><a:ea typeface=""/><a:cs typeface=""/></a:majorFont><a:minorFont><a:latin typeface="{typeface}"/><a:ea typeface=""/><a:cs typeface=""/></a:minorFont></a:fontScheme><a:fmtScheme name="Concept"><a:fillStyleLst><a:solidFill><a:schemeClr val="phClr"/></a:solidFill><a:solidFill><a:schemeClr val="phClr"/></a:solidFill><a:solidFill><a:schemeClr val="phClr"/></a:solidFill></a:fillStyleLst><a:lnStyleLst><a:ln w="6350"><a:solidFill><a:schemeClr val="phClr"/></a:solidFill></a:ln><a:ln w="12700"><a:solidFill><a:schemeClr val="phClr"/></a:solidFill></a:ln><a:ln w="19050"><a:solidFill><a:schemeClr val="phClr"/></a:solidFill></a:ln></a:lnStyleLst><a:effectStyleLst><a:effectStyle><a:effectLst/></a:effectStyle><a:effectStyle><a:effectLst/></a:effectStyle><a:effectStyle><a:effectLst/></a:effectStyle></a:effectStyleLst><a:bgFillStyleLst><a:solidFill><a:schemeClr val="phClr"/></a:solidFill><a:solidFill><a:schemeClr val="phClr"/></a:solidFill><a:solidFill><a:schemeClr val="phClr"/></a:solidFill></a:bgFillStyleLst></a:fmtScheme></a:themeElements></a:theme>"#;

#[cfg(test)]
mod tests {
    use super::*;
    use crate::domain::deck::TextStyle;
    use std::io::Read;
    use zip::ZipArchive;

    fn deck_with_text(line: &str) -> Deck {
        let mut deck = Deck::new("t", 960.0, 540.0);
        let mut slide = Slide::new(Color::hex(0x1A1A2E));
        slide.push(Shape::Rect {
            frame: Frame::new(0.0, 0.0, 960.0, 4.32),
            fill: Color::hex(0x009BF5),
            radius: 0.0,
        });
        slide.push(Shape::Rect {
            frame: Frame::new(50.0, 50.0, 200.0, 100.0),
            fill: Color::hex(0x22223A),
            radius: 10.0,
        });
        slide.push(Shape::Text(TextBlock {
            x: 57.6,
            baseline: 60.0,
            lines: vec![line.to_string(), "second".to_string()],
            line_height: 43.2,
            style: TextStyle {
                size: 36.0,
                color: Color::WHITE,
                bold: true,
            },
            align: Align::Right,
            width: Some(500.0),
        }));
        deck.slides.push(slide);
        deck
    }

    fn read_entry(bytes: &[u8], name: &str) -> String {
        let mut archive = ZipArchive::new(Cursor::new(bytes)).unwrap();
        let mut file = archive.by_name(name).unwrap();
        let mut out = String::new();
        file.read_to_string(&mut out).unwrap();
        out
    }

    #[test]
    fn test_package_contains_required_parts() {
        let bytes = PptxRenderer.render(&deck_with_text("Hi"), &ImageAssets::new()).unwrap();
        let archive = ZipArchive::new(Cursor::new(bytes.as_slice())).unwrap();
        let names: Vec<&str> = archive.file_names().collect();
        for part in [
            "[Content_Types].xml",
            "_rels/.rels",
            "ppt/presentation.xml",
            "ppt/slideMasters/slideMaster1.xml",
            "ppt/slideLayouts/slideLayout1.xml",
            "ppt/theme/theme1.xml",
            "ppt/slides/slide1.xml",
            "ppt/slides/_rels/slide1.xml.rels",
        ] {
            assert!(names.contains(&part), "missing {}", part);
        }
    }

    #[test]
    fn test_slide_size_in_emu() {
        let bytes = PptxRenderer.render(&deck_with_text("Hi"), &ImageAssets::new()).unwrap();
        let xml = read_entry(&bytes, "ppt/presentation.xml");
        assert!(xml.contains(r#"<p:sldSz cx="12192000" cy="6858000"/>"#));
    }

    #[test]
    fn test_text_runs_are_escaped_and_styled() {
        let bytes = PptxRenderer
            .render(&deck_with_text("Q&A <live>"), &ImageAssets::new())
            .unwrap();
        let xml = read_entry(&bytes, "ppt/slides/slide1.xml");
        assert!(xml.contains("<a:t>Q&amp;A &lt;live&gt;</a:t>"));
        assert!(xml.contains(r#"sz="3600" b="1""#));
        assert!(xml.contains(r#"algn="r""#));
        assert!(xml.contains(r#"prst="roundRect""#));
        assert!(xml.contains(r#"<a:gd name="adj" fmla="val 10000"/>"#));
        assert_eq!(xml.matches("<a:p>").count(), 2);
    }

    #[test]
    fn test_runs_and_theme_use_deck_typeface() {
        let bytes = PptxRenderer
            .render(&deck_with_text("Hi").with_typeface("Calibri"), &ImageAssets::new())
            .unwrap();
        let slide = read_entry(&bytes, "ppt/slides/slide1.xml");
        assert!(slide.contains(r#"<a:latin typeface="Calibri"/>"#));
        assert!(!slide.contains("Helvetica"));
        let theme = read_entry(&bytes, "ppt/theme/theme1.xml");
        assert_eq!(theme.matches(r#"<a:latin typeface="Calibri"/>"#).count(), 2);

        let default = PptxRenderer.render(&deck_with_text("Hi"), &ImageAssets::new()).unwrap();
        assert!(read_entry(&default, "ppt/slides/slide1.xml").contains(r#"typeface="Helvetica""#));
    }

    #[test]
    fn test_output_is_byte_stable() {
        let deck = deck_with_text("stable");
        let a = PptxRenderer.render(&deck, &ImageAssets::new()).unwrap();
        let b = PptxRenderer.render(&deck, &ImageAssets::new()).unwrap();
        assert_eq!(a, b);
    }

    #[test]
    fn test_picture_is_embedded_with_relationship() {
        let mut deck = deck_with_text("pic");
        deck.slides[0].push(Shape::Image {
            frame: Frame::new(0.0, 0.0, 100.0, 100.0),
            path: PathBuf::from("chillstream/cross_section.png"),
            fit: ImageFit::Contain,
        });
        let img = image::RgbImage::from_pixel(20, 10, image::Rgb([0, 200, 255]));
        let mut png = Cursor::new(Vec::new());
        img.write_to(&mut png, ImageFormat::Png).unwrap();
        let mut assets = ImageAssets::new();
        assets.insert(PathBuf::from("chillstream/cross_section.png"), png.into_inner());

        let bytes = PptxRenderer.render(&deck, &assets).unwrap();
        let rels = read_entry(&bytes, "ppt/slides/_rels/slide1.xml.rels");
        assert!(rels.contains(r#"Target="../media/image1.png""#));
        let xml = read_entry(&bytes, "ppt/slides/slide1.xml");
        assert!(xml.contains(r#"r:embed="rId2""#));
        // 20x10 放進 100x100：寬 100、高 50，靠下
        assert!(xml.contains(r#"<a:off x="0" y="635000"/><a:ext cx="1270000" cy="635000"/>"#));
    }
}
