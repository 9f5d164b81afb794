//! 版面工具：把「從頁面上緣量起」的座標換成 [`Deck`] 的圖形。
//!
//! [`CarouselKit`] 給直式輪播頁面使用，[`SlideKit`] 給 16:9 簡報使用。

use crate::domain::deck::{inches, mm, Frame, ImageFit, Shape, Slide, TextBlock, TextStyle};
use crate::domain::model::{Align, Color};
use crate::utils::text_metrics::wrap_words;
use std::path::PathBuf;

/// 文字外觀設定。
///
/// 預設為 14 pt 白色一般字重、靠左、不限寬度。
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct TextSpec {
    pub size: f32,
    pub color: Color,
    pub bold: bool,
    pub align: Align,
    /// 對齊或換行使用的寬度
    pub max_w: Option<f32>,
    /// 未設定時為 `1.4 × size`
    pub line_h: Option<f32>,
}

impl Default for TextSpec {
    fn default() -> Self {
        Self {
            size: 14.0,
            color: Color::WHITE,
            bold: false,
            align: Align::Left,
            max_w: None,
            line_h: None,
        }
    }
}

impl TextSpec {
    pub fn new(size: f32, color: Color) -> Self {
        Self {
            size,
            color,
            ..Self::default()
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

    pub fn centered(mut self, width: f32) -> Self {
        self.align = Align::Center;
        self.max_w = Some(width);
        self
    }

    pub fn right(mut self, width: f32) -> Self {
        self.align = Align::Right;
        self.max_w = Some(width);
        self
    }

    pub fn max_w(mut self, width: f32) -> Self {
        self.max_w = Some(width);
        self
    }

    pub fn line_h(mut self, height: f32) -> Self {
        self.line_h = Some(height);
        self
    }

    fn style(&self) -> TextStyle {
        TextStyle {
            size: self.size,
            color: self.color,
            bold: self.bold,
        }
    }

    fn line_height(&self) -> f32 {
        self.line_h.unwrap_or(self.size * 1.4)
    }
}

/// 直式輪播頁面的繪圖工具
#[derive(Debug, Clone, Copy)]
pub struct CarouselKit {
    pub page_w: f32,
    pub page_h: f32,
    pub margin: f32,
    pub background: Color,
    pub footer_color: Color,
}

impl CarouselKit {
    pub fn content_width(&self) -> f32 {
        self.page_w - 2.0 * self.margin
    }

    /// 新頁面，背景為整頁底色
    pub fn page(&self) -> Slide {
        Slide::new(self.background)
    }

    pub fn accent_strip(&self, slide: &mut Slide, color: Color) {
        self.bar(slide, 0.0, 0.0, self.page_w, mm(2.0), color);
    }

    /// 3 mm 圓角卡片
    pub fn card(&self, slide: &mut Slide, x: f32, y: f32, w: f32, h: f32, color: Color) {
        slide.push(Shape::Rect {
            frame: Frame::new(x, y, w, h),
            fill: color,
            radius: mm(3.0),
        });
    }

    pub fn card_flat(&self, slide: &mut Slide, x: f32, y: f32, w: f32, h: f32, color: Color) {
        self.bar(slide, x, y, w, h, color);
    }

    pub fn bar(&self, slide: &mut Slide, x: f32, y: f32, w: f32, h: f32, color: Color) {
        slide.push(Shape::Rect {
            frame: Frame::new(x, y, w, h),
            fill: color,
            radius: 0.0,
        });
    }

    /// 單行文字，`y` 為文字區上緣，基線落在 `y + 0.35 × size`
    pub fn text(&self, slide: &mut Slide, x: f32, y: f32, text: &str, spec: TextSpec) {
        let align = if spec.max_w.is_some() {
            spec.align
        } else {
            Align::Left
        };
        slide.push(Shape::Text(TextBlock {
            x,
            baseline: y + spec.size * 0.35,
            lines: vec![text.to_string()],
            line_height: spec.line_height(),
            style: spec.style(),
            align,
            width: spec.max_w,
        }));
    }

    /// 自動換行文字，回傳最後一行之後的 `y`
    pub fn text_wrap(&self, slide: &mut Slide, x: f32, y: f32, text: &str, spec: TextSpec) -> f32 {
        let max_w = spec.max_w.unwrap_or_else(|| self.content_width());
        let lines = wrap_words(text, spec.size, spec.bold, max_w);
        let line_height = spec.line_height();
        let next = y + line_height * lines.len() as f32;
        if !lines.is_empty() {
            slide.push(Shape::Text(TextBlock {
                x,
                baseline: y + spec.size * 0.35,
                lines,
                line_height,
                style: spec.style(),
                align: Align::Left,
                width: None,
            }));
        }
        next
    }

    /// 半徑 4 mm 的編號圓點，`(x, y)` 為外接方形左上角
    pub fn circle_num(&self, slide: &mut Slide, x: f32, y: f32, num: usize, color: Color) {
        let r = mm(4.0);
        slide.push(Shape::Ellipse {
            frame: Frame::new(x, y, 2.0 * r, 2.0 * r),
            fill: color,
        });
        slide.push(Shape::Text(TextBlock {
            x,
            baseline: y + r + 4.0,
            lines: vec![num.to_string()],
            line_height: 12.0 * 1.4,
            style: TextStyle {
                size: 12.0,
                color: Color::WHITE,
                bold: true,
            },
            align: Align::Center,
            width: Some(2.0 * r),
        }));
    }

    /// 右下角的 `p/total` 頁碼
    pub fn footer(&self, slide: &mut Slide, page: usize, total: usize) {
        slide.push(Shape::Text(TextBlock {
            x: 0.0,
            baseline: self.page_h - mm(4.0),
            lines: vec![format!("{}/{}", page, total)],
            line_height: 8.0 * 1.4,
            style: TextStyle {
                size: 8.0,
                color: self.footer_color,
                bold: false,
            },
            align: Align::Right,
            width: Some(self.page_w - self.margin),
        }));
    }

    /// 等比例縮放放進方框，靠左下角
    pub fn image(&self, slide: &mut Slide, frame: Frame, path: impl Into<PathBuf>) {
        slide.push(Shape::Image {
            frame,
            path: path.into(),
            fit: ImageFit::Contain,
        });
    }
}

/// 文字框中的一個段落
#[derive(Debug, Clone, PartialEq)]
pub struct Para {
    /// 可含 `\n` 強制換行；空字串只佔高度
    pub text: String,
    pub spec: TextSpec,
    pub space_before: f32,
}

impl Para {
    pub fn new(text: impl Into<String>, spec: TextSpec) -> Self {
        Self {
            text: text.into(),
            spec,
            space_before: 0.0,
        }
    }

    pub fn space_before(mut self, points: f32) -> Self {
        self.space_before = points;
        self
    }
}

/// 簡報文字框內距（左右 0.1 in、上 0.05 in）
const BOX_INSET_X: f32 = 7.2;
const BOX_INSET_TOP: f32 = 3.6;
const SLIDE_LINE_FACTOR: f32 = 1.2;

/// 16:9 簡報頁的繪圖工具
#[derive(Debug, Clone, Copy)]
pub struct SlideKit {
    pub width: f32,
    pub height: f32,
    pub background: Color,
}

impl SlideKit {
    pub fn widescreen(background: Color) -> Self {
        Self {
            width: inches(13.333),
            height: inches(7.5),
            background,
        }
    }

    pub fn page(&self) -> Slide {
        Slide::new(self.background)
    }

    /// 頁面最上方 0.06 in 色帶
    pub fn stripe(&self, slide: &mut Slide, color: Color) {
        self.rect(slide, 0.0, 0.0, self.width, inches(0.06), color);
    }

    pub fn rect(&self, slide: &mut Slide, x: f32, y: f32, w: f32, h: f32, color: Color) {
        slide.push(Shape::Rect {
            frame: Frame::new(x, y, w, h),
            fill: color,
            radius: 0.0,
        });
    }

    /// 0.08 in 寬的直向強調條
    pub fn accent_bar(&self, slide: &mut Slide, x: f32, y: f32, h: f32, color: Color) {
        self.rect(slide, x, y, inches(0.08), h, color);
    }

    /// 圓形編號，數字置中
    pub fn numbered_circle(
        &self,
        slide: &mut Slide,
        x: f32,
        y: f32,
        diameter: f32,
        num: usize,
        color: Color,
        size: f32,
    ) {
        slide.push(Shape::Ellipse {
            frame: Frame::new(x, y, diameter, diameter),
            fill: color,
        });
        slide.push(Shape::Text(TextBlock {
            x,
            baseline: y + diameter / 2.0 + size * 0.35,
            lines: vec![num.to_string()],
            line_height: size * SLIDE_LINE_FACTOR,
            style: TextStyle {
                size,
                color: Color::WHITE,
                bold: true,
            },
            align: Align::Center,
            width: Some(diameter),
        }));
    }

    /// 單一段落的文字框
    pub fn text(&self, slide: &mut Slide, x: f32, y: f32, w: f32, text: &str, spec: TextSpec) -> f32 {
        self.text_box(slide, x, y, w, &[Para::new(text, spec)])
    }

    /// 多段落文字框，依框寬換行，回傳最後一行之後的 `y`
    pub fn text_box(&self, slide: &mut Slide, x: f32, y: f32, w: f32, paras: &[Para]) -> f32 {
        let inner_w = (w - 2.0 * BOX_INSET_X).max(1.0);
        let mut cursor = y + BOX_INSET_TOP;

        for para in paras {
            cursor += para.space_before;
            let size = para.spec.size;
            let line_height = para.spec.line_h.unwrap_or(size * SLIDE_LINE_FACTOR);

            let lines: Vec<String> = para
                .text
                .split('\n')
                .flat_map(|hard| {
                    let wrapped = wrap_words(hard, size, para.spec.bold, inner_w);
                    if wrapped.is_empty() {
                        vec![String::new()]
                    } else {
                        wrapped
                    }
                })
                .collect();

            if para.text.is_empty() {
                cursor += line_height;
                continue;
            }

            slide.push(Shape::Text(TextBlock {
                x: x + BOX_INSET_X,
                baseline: cursor + size * 0.95,
                line_height,
                style: para.spec.style(),
                align: para.spec.align,
                width: Some(inner_w),
                lines: lines.clone(),
            }));
            cursor += line_height * lines.len() as f32;
        }
        cursor
    }

    /// 拉伸填滿方框的圖片
    pub fn picture(&self, slide: &mut Slide, frame: Frame, path: impl Into<PathBuf>) {
        slide.push(Shape::Image {
            frame,
            path: path.into(),
            fit: ImageFit::Stretch,
        });
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn kit() -> CarouselKit {
        CarouselKit {
            page_w: mm(190.0),
            page_h: mm(237.5),
            margin: mm(10.0),
            background: Color::hex(0x1A1A2E),
            footer_color: Color::hex(0xBBBBCC),
        }
    }

    #[test]
    fn test_text_baseline_offset() {
        let mut slide = kit().page();
        kit().text(&mut slide, 10.0, 100.0, "Bubbler", TextSpec::new(40.0, Color::WHITE));
        match &slide.shapes[0] {
            Shape::Text(block) => {
                assert!((block.baseline - 114.0).abs() < 1e-4);
                assert_eq!(block.align, Align::Left);
            }
            other => panic!("unexpected shape: {:?}", other),
        }
    }

    #[test]
    fn test_text_wrap_returns_next_y() {
        let mut slide = kit().page();
        let long = "Bubbles are made from a thin film of soapy water that traps air inside a sphere";
        let spec = TextSpec::new(10.0, Color::WHITE).max_w(100.0);
        let next = kit().text_wrap(&mut slide, 0.0, 50.0, long, spec);
        let lines = match &slide.shapes[0] {
            Shape::Text(block) => block.lines.len(),
            other => panic!("unexpected shape: {:?}", other),
        };
        assert!(lines > 1);
        assert!((next - (50.0 + 14.0 * lines as f32)).abs() < 1e-3);
    }

    #[test]
    fn test_footer_is_right_aligned_inside_margin() {
        let k = kit();
        let mut slide = k.page();
        k.footer(&mut slide, 3, 8);
        assert_eq!(slide.text_content(), vec!["3/8"]);
        match &slide.shapes[0] {
            Shape::Text(block) => {
                assert_eq!(block.align, Align::Right);
                assert_eq!(block.width, Some(k.page_w - k.margin));
            }
            other => panic!("unexpected shape: {:?}", other),
        }
    }

    #[test]
    fn test_text_box_stacks_paragraphs() {
        let k = SlideKit::widescreen(Color::hex(0x1A1A2E));
        let mut slide = k.page();
        let end = k.text_box(
            &mut slide,
            0.0,
            0.0,
            inches(5.0),
            &[
                Para::new("Title", TextSpec::new(20.0, Color::WHITE).bold()),
                Para::new("", TextSpec::new(10.0, Color::WHITE)),
                Para::new("line one\nline two", TextSpec::new(10.0, Color::WHITE)).space_before(6.0),
            ],
        );
        assert_eq!(slide.shapes.len(), 2);
        assert_eq!(slide.text_content(), vec!["Title", "line one", "line two"]);
        let expected = BOX_INSET_TOP + 24.0 + 12.0 + 6.0 + 24.0;
        assert!((end - expected).abs() < 1e-3);
    }
}
