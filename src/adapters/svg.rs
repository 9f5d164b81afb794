//! 把 [`Figure`] 轉成 SVG 文字。
//!
//! 資料座標 y 軸向上，輸出像素座標 y 軸向下。線寬與字級以點為單位，
//! 依 dpi 換算成像素。

use crate::domain::figure::{
    ArrowHead, ArrowMark, CalloutMark, Dash, Figure, Mark, MarkerShape, Panel, Stroke, Style, TextMark,
    VAlign,
};
use crate::domain::model::{Align, Color};
use crate::utils::text_metrics::string_width;
use std::fmt::Write;

/// 多行文字的行距倍率
const LINE_SPACING: f32 = 1.2;
/// 基線到字身中心的距離，以字級為單位
const CENTER_TO_BASELINE: f32 = 0.35;
/// 標註框的留白，以字級為單位
const CALLOUT_PAD: f32 = 0.3;
const CALLOUT_ALPHA: f32 = 0.92;
const CALLOUT_CURVE: f32 = 0.15;
const CALLOUT_ARROW_WIDTH: f32 = 1.3;

fn escape(text: &str) -> String {
    text.replace('&', "&amp;")
        .replace('<', "&lt;")
        .replace('>', "&gt;")
        .replace('"', "&quot;")
}

fn paint(color: Color) -> String {
    format!("#{}", color.to_hex())
}

/// 面板的資料座標到像素的映射
#[derive(Debug, Clone, Copy)]
struct Mapping {
    x0: f32,
    y0: f32,
    sx: f32,
    sy: f32,
    left: f32,
    bottom: f32,
    fig_h: f32,
}

impl Mapping {
    fn for_panel(panel: &Panel, fig_w: f32, fig_h: f32) -> Self {
        let vp = panel.viewport;
        let (mut left, mut bottom) = (vp.left * fig_w, vp.bottom * fig_h);
        let (box_w, box_h) = (vp.width * fig_w, vp.height * fig_h);
        let (x0, x1) = panel.x_range;
        let (y0, y1) = panel.y_range;
        let mut sx = box_w / (x1 - x0);
        let mut sy = box_h / (y1 - y0);
        if panel.equal_aspect {
            // 縮小成等比例後置中
            let s = sx.min(sy);
            left += (box_w - s * (x1 - x0)) / 2.0;
            bottom += (box_h - s * (y1 - y0)) / 2.0;
            sx = s;
            sy = s;
        }
        Self {
            x0,
            y0,
            sx,
            sy,
            left,
            bottom,
            fig_h,
        }
    }

    fn point(&self, (x, y): (f32, f32)) -> (f32, f32) {
        (
            self.left + (x - self.x0) * self.sx,
            self.fig_h - (self.bottom + (y - self.y0) * self.sy),
        )
    }

    fn extent(&self, panel: &Panel) -> (f32, f32, f32, f32) {
        let (x, y) = self.point((panel.x_range.0, panel.y_range.1));
        let w = (panel.x_range.1 - panel.x_range.0) * self.sx;
        let h = (panel.y_range.1 - panel.y_range.0) * self.sy;
        (x, y, w, h)
    }
}

/// 輸出單張圖的 SVG 文件，尺寸等於 [`Figure::pixel_size`]
pub fn render_svg(fig: &Figure) -> String {
    let (w, h) = fig.pixel_size();
    let (fw, fh) = (w as f32, h as f32);
    let pt = fig.dpi / 72.0;

    let mut out = String::new();
    let _ = write!(
        out,
        r#"<svg xmlns="http://www.w3.org/2000/svg" width="{w}" height="{h}" viewBox="0 0 {w} {h}" font-family="sans-serif">"#
    );
    let _ = write!(
        out,
        r#"<rect x="0" y="0" width="{w}" height="{h}" fill="{}"/>"#,
        paint(fig.background)
    );

    for panel in &fig.panels {
        let map = Mapping::for_panel(panel, fw, fh);
        if let Some(bg) = panel.background {
            let (x, y, pw, ph) = map.extent(panel);
            let _ = write!(
                out,
                r#"<rect x="{x:.2}" y="{y:.2}" width="{pw:.2}" height="{ph:.2}" fill="{}"/>"#,
                paint(bg)
            );
        }
        for mark in &panel.marks {
            write_mark(&mut out, mark, &map, pt);
        }
    }

    // 圖層級文字以整張圖的比例定位
    let figure_map = Mapping {
        x0: 0.0,
        y0: 0.0,
        sx: fw,
        sy: fh,
        left: 0.0,
        bottom: 0.0,
        fig_h: fh,
    };
    for text in &fig.texts {
        write_text(&mut out, text, &figure_map, pt);
    }

    out.push_str("</svg>");
    out
}

fn write_mark(out: &mut String, mark: &Mark, map: &Mapping, pt: f32) {
    match mark {
        Mark::Rect {
            x,
            y,
            w,
            h,
            rounding,
            style,
        } => {
            let (px, py) = map.point((x.min(x + w), y.max(y + h)));
            let (pw, ph) = (w.abs() * map.sx, h.abs() * map.sy);
            let (rx, ry) = (rounding * map.sx, rounding * map.sy);
            let _ = write!(
                out,
                r#"<rect x="{px:.2}" y="{py:.2}" width="{pw:.2}" height="{ph:.2}" rx="{rx:.2}" ry="{ry:.2}"{}/>"#,
                style_attrs(style, pt)
            );
        }
        Mark::Circle { cx, cy, r, style } => {
            let (px, py) = map.point((*cx, *cy));
            let _ = write!(
                out,
                r#"<ellipse cx="{px:.2}" cy="{py:.2}" rx="{:.2}" ry="{:.2}"{}/>"#,
                r * map.sx,
                r * map.sy,
                style_attrs(style, pt)
            );
        }
        Mark::Polygon { points, style } => {
            let _ = write!(
                out,
                r#"<polygon points="{}"{}/>"#,
                point_list(points.iter().map(|p| map.point(*p))),
                style_attrs(style, pt)
            );
        }
        Mark::Polyline { points, stroke } => {
            let _ = write!(
                out,
                r#"<polyline points="{}" fill="none"{}/>"#,
                point_list(points.iter().map(|p| map.point(*p))),
                stroke_attrs(stroke, pt)
            );
        }
        Mark::Arc {
            cx,
            cy,
            r,
            theta1,
            theta2,
            stroke,
        } => {
            let span = theta2 - theta1;
            let steps = ((span.abs() / 3.0).ceil() as usize).max(8);
            let points = (0..=steps).map(|i| {
                let t = (theta1 + span * i as f32 / steps as f32).to_radians();
                map.point((cx + r * t.cos(), cy + r * t.sin()))
            });
            let _ = write!(
                out,
                r#"<polyline points="{}" fill="none"{}/>"#,
                point_list(points),
                stroke_attrs(stroke, pt)
            );
        }
        Mark::Arrow(arrow) => write_arrow(out, arrow, map, pt),
        Mark::Text(text) => write_text(out, text, map, pt),
        Mark::Callout(callout) => write_callout(out, callout, map, pt),
        Mark::Marker {
            x,
            y,
            shape,
            size,
            color,
        } => {
            let (px, py) = map.point((*x, *y));
            let half = size * pt / 2.0;
            let fill = paint(*color);
            match shape {
                MarkerShape::Circle => {
                    let _ = write!(out, r#"<circle cx="{px:.2}" cy="{py:.2}" r="{half:.2}" fill="{fill}"/>"#);
                }
                MarkerShape::Square => {
                    let _ = write!(
                        out,
                        r#"<rect x="{:.2}" y="{:.2}" width="{:.2}" height="{:.2}" fill="{fill}"/>"#,
                        px - half,
                        py - half,
                        half * 2.0,
                        half * 2.0
                    );
                }
                MarkerShape::Plus => {
                    let _ = write!(
                        out,
                        r#"<path d="M{:.2} {py:.2}H{:.2}M{px:.2} {:.2}V{:.2}" stroke="{fill}" stroke-width="{:.2}" fill="none"/>"#,
                        px - half,
                        px + half,
                        py - half,
                        py + half,
                        1.5 * pt
                    );
                }
            }
        }
    }
}

fn point_list(points: impl Iterator<Item = (f32, f32)>) -> String {
    points
        .map(|(x, y)| format!("{:.2},{:.2}", x, y))
        .collect::<Vec<_>>()
        .join(" ")
}

fn style_attrs(style: &Style, pt: f32) -> String {
    let mut attrs = match style.fill {
        Some(color) => format!(r#" fill="{}" fill-opacity="{:.3}""#, paint(color), style.fill_opacity),
        None => r#" fill="none""#.to_string(),
    };
    if let Some(stroke) = &style.stroke {
        attrs.push_str(&stroke_attrs(stroke, pt));
    }
    attrs
}

/// 虛線樣式依線寬縮放
fn dash_pattern(dash: Dash) -> &'static [f32] {
    match dash {
        Dash::Solid => &[],
        Dash::Dashed => &[3.7, 1.6],
        Dash::Dotted => &[1.0, 1.65],
        Dash::DashDot => &[6.4, 1.6, 1.0, 1.6],
    }
}

fn stroke_attrs(stroke: &Stroke, pt: f32) -> String {
    let width = stroke.width * pt;
    let mut attrs = format!(
        r#" stroke="{}" stroke-width="{:.2}" stroke-opacity="{:.3}" stroke-linejoin="round""#,
        paint(stroke.color),
        width,
        stroke.opacity
    );
    let pattern = dash_pattern(stroke.dash);
    if !pattern.is_empty() {
        let dashes: Vec<String> = pattern.iter().map(|d| format!("{:.2}", d * width)).collect();
        let _ = write!(attrs, r#" stroke-dasharray="{}""#, dashes.join(","));
    }
    attrs
}

fn unit(from: (f32, f32), to: (f32, f32)) -> (f32, f32) {
    let (dx, dy) = (to.0 - from.0, to.1 - from.1);
    let len = (dx * dx + dy * dy).sqrt().max(f32::EPSILON);
    (dx / len, dy / len)
}

/// 箭頭端點的像素座標與方向
struct Tip {
    at: (f32, f32),
    dir: (f32, f32),
}

fn write_head(out: &mut String, tip: &Tip, filled: bool, len: f32, color: &str, width: f32, opacity: f32) {
    let (ux, uy) = tip.dir;
    let (nx, ny) = (-uy, ux);
    let half = len * 0.5;
    let base = (tip.at.0 - ux * len, tip.at.1 - uy * len);
    let left = (base.0 + nx * half, base.1 + ny * half);
    let right = (base.0 - nx * half, base.1 - ny * half);
    if filled {
        let _ = write!(
            out,
            r#"<polygon points="{:.2},{:.2} {:.2},{:.2} {:.2},{:.2}" fill="{color}" fill-opacity="{opacity:.3}"/>"#,
            tip.at.0, tip.at.1, left.0, left.1, right.0, right.1
        );
    } else {
        let _ = write!(
            out,
            r#"<polyline points="{:.2},{:.2} {:.2},{:.2} {:.2},{:.2}" fill="none" stroke="{color}" stroke-width="{width:.2}" stroke-opacity="{opacity:.3}" stroke-linejoin="miter"/>"#,
            left.0, left.1, tip.at.0, tip.at.1, right.0, right.1
        );
    }
}

fn write_arrow(out: &mut String, arrow: &ArrowMark, map: &Mapping, pt: f32) {
    let start = map.point(arrow.from);
    let end = map.point(arrow.to);
    let control = arrow.control_point().map(|c| map.point(c));
    let width = arrow.width * pt;
    let head_len = (4.0 + arrow.width) * pt;
    let color = paint(arrow.color);

    let end_tip = Tip {
        at: end,
        dir: unit(control.unwrap_or(start), end),
    };
    let start_tip = Tip {
        at: start,
        dir: unit(control.unwrap_or(end), start),
    };

    // 實心箭頭時線段停在箭頭底部，避免線頭穿出尖端
    let line_end = if arrow.head == ArrowHead::Filled {
        (end.0 - end_tip.dir.0 * head_len, end.1 - end_tip.dir.1 * head_len)
    } else {
        end
    };
    let d = match control {
        Some(c) => format!(
            "M{:.2} {:.2}Q{:.2} {:.2} {:.2} {:.2}",
            start.0, start.1, c.0, c.1, line_end.0, line_end.1
        ),
        None => format!("M{:.2} {:.2}L{:.2} {:.2}", start.0, start.1, line_end.0, line_end.1),
    };
    let _ = write!(
        out,
        r#"<path d="{d}" fill="none" stroke="{color}" stroke-width="{width:.2}" stroke-opacity="{:.3}" stroke-linecap="butt"/>"#,
        arrow.opacity
    );

    match arrow.head {
        ArrowHead::Filled => write_head(out, &end_tip, true, head_len, &color, width, arrow.opacity),
        ArrowHead::Open => write_head(out, &end_tip, false, head_len, &color, width, arrow.opacity),
        ArrowHead::Both => {
            write_head(out, &end_tip, false, head_len, &color, width, arrow.opacity);
            write_head(out, &start_tip, false, head_len, &color, width, arrow.opacity);
        }
    }

    if let Some(label) = &arrow.label {
        let mid = (
            (arrow.from.0 + arrow.to.0) / 2.0,
            (arrow.from.1 + arrow.to.1) / 2.0 + arrow.label_offset,
        );
        let text = TextMark::new(mid.0, mid.1, label.clone())
            .size(arrow.label_size)
            .color(arrow.color)
            .centered();
        write_text(out, &text, map, pt);
    }
}

/// 第一行基線相對於錨點的位移（像素，向下為正）
fn first_baseline_offset(valign: VAlign, size: f32, lines: usize) -> f32 {
    let spread = size * LINE_SPACING * lines.saturating_sub(1) as f32;
    match valign {
        VAlign::Baseline => 0.0,
        VAlign::Top => size * 0.8,
        VAlign::Center => size * CENTER_TO_BASELINE - spread / 2.0,
        VAlign::Bottom => -size * 0.2 - spread,
    }
}

fn anchor(align: Align) -> &'static str {
    match align {
        Align::Left => "start",
        Align::Center => "middle",
        Align::Right => "end",
    }
}

fn write_text(out: &mut String, text: &TextMark, map: &Mapping, pt: f32) {
    let (x, y) = map.point((text.x, text.y));
    let size = text.size * pt;
    let lines: Vec<&str> = text.text.split('\n').collect();
    let first = y + first_baseline_offset(text.valign, size, lines.len());

    let mut attrs = format!(
        r#" x="{x:.2}" y="{first:.2}" font-size="{size:.2}" fill="{}" text-anchor="{}""#,
        paint(text.color),
        anchor(text.align)
    );
    if text.bold {
        attrs.push_str(r#" font-weight="bold""#);
    }
    if text.italic {
        attrs.push_str(r#" font-style="italic""#);
    }
    if text.opacity < 1.0 {
        let _ = write!(attrs, r#" fill-opacity="{:.3}""#, text.opacity);
    }
    if text.rotation != 0.0 {
        let _ = write!(attrs, r#" transform="rotate({:.2} {x:.2} {y:.2})""#, -text.rotation);
    }

    let _ = write!(out, "<text{attrs}>");
    write_lines(out, &lines, x, size);
    out.push_str("</text>");
}

fn write_lines(out: &mut String, lines: &[&str], x: f32, size: f32) {
    for (i, line) in lines.iter().enumerate() {
        let dy = if i == 0 { 0.0 } else { size * LINE_SPACING };
        let _ = write!(
            out,
            r#"<tspan x="{x:.2}" dy="{dy:.2}">{}</tspan>"#,
            escape(line)
        );
    }
}

fn write_callout(out: &mut String, callout: &CalloutMark, map: &Mapping, pt: f32) {
    // 先畫引線，文字框蓋在起點上
    let leader = ArrowMark::new(callout.anchor, callout.target, callout.arrow_color)
        .width(CALLOUT_ARROW_WIDTH)
        .head(ArrowHead::Open)
        .curve(CALLOUT_CURVE);
    write_arrow(out, &leader, map, pt);

    let (x, y) = map.point(callout.anchor);
    let size = callout.size * pt;
    let lines: Vec<&str> = callout.text.split('\n').collect();
    let text_w = lines
        .iter()
        .map(|l| string_width(l, callout.size, callout.bold))
        .fold(0.0, f32::max)
        * pt;
    let text_h = size * (1.0 + LINE_SPACING * (lines.len() - 1) as f32);
    let pad = size * CALLOUT_PAD;
    let left = match callout.align {
        Align::Left => x,
        Align::Center => x - text_w / 2.0,
        Align::Right => x - text_w,
    };
    let _ = write!(
        out,
        r#"<rect x="{:.2}" y="{:.2}" width="{:.2}" height="{:.2}" rx="{pad:.2}" ry="{pad:.2}" fill="{}" fill-opacity="{CALLOUT_ALPHA}" stroke="{}" stroke-width="{:.2}" stroke-opacity="{CALLOUT_ALPHA}"/>"#,
        left - pad,
        y - text_h / 2.0 - pad,
        text_w + 2.0 * pad,
        text_h + 2.0 * pad,
        paint(callout.background),
        paint(callout.arrow_color),
        pt
    );

    let first = y + first_baseline_offset(VAlign::Center, size, lines.len());
    let weight = if callout.bold { r#" font-weight="bold""# } else { "" };
    let _ = write!(
        out,
        r#"<text x="{x:.2}" y="{first:.2}" font-size="{size:.2}" fill="{}" text-anchor="{}"{weight}>"#,
        paint(callout.color),
        anchor(callout.align)
    );
    write_lines(out, &lines, x, size);
    out.push_str("</text>");
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::domain::figure::Viewport;

    fn figure_with(panel: Panel) -> Figure {
        let mut fig = Figure::new(4.0, 2.0, 72.0, Color::hex(0x1A1A2E));
        fig.panels.push(panel);
        fig
    }

    #[test]
    fn test_document_size_matches_pixels() {
        let fig = Figure::new(14.0, 9.0, 180.0, Color::BLACK);
        let svg = render_svg(&fig);
        assert!(svg.starts_with(r#"<svg xmlns="http://www.w3.org/2000/svg" width="2520" height="1620""#));
        assert!(svg.ends_with("</svg>"));
    }

    #[test]
    fn test_y_axis_is_flipped() {
        let mut panel = Panel::new(Viewport::FULL, (0.0, 4.0), (0.0, 2.0));
        panel.add(Mark::rect(0.0, 1.0, 1.0, 1.0, Style::filled(Color::WHITE)));
        let svg = render_svg(&figure_with(panel));
        // 72 dpi 時 1 資料單位 = 72 px，上半部的方塊 y 應為 0
        assert!(svg.contains(r#"<rect x="0.00" y="0.00" width="72.00" height="72.00""#));
    }

    #[test]
    fn test_equal_aspect_is_letterboxed() {
        let panel = Panel::new(Viewport::FULL, (0.0, 1.0), (0.0, 1.0))
            .equal_aspect()
            .background(Color::WHITE);
        let map = Mapping::for_panel(&panel, 288.0, 144.0);
        assert_eq!(map.sx, map.sy);
        assert_eq!(map.sx, 144.0);
        assert_eq!(map.point((0.0, 1.0)), (72.0, 0.0));
    }

    #[test]
    fn test_filled_arrow_has_polygon_head() {
        let mut panel = Panel::new(Viewport::FULL, (0.0, 4.0), (0.0, 2.0));
        panel.add(Mark::Arrow(ArrowMark::new((0.0, 1.0), (3.0, 1.0), Color::WHITE)));
        let svg = render_svg(&figure_with(panel));
        assert_eq!(svg.matches("<polygon").count(), 1);
        assert!(svg.contains("<path d=\"M0.00 72.00L"));
    }

    #[test]
    fn test_curved_arrow_uses_quadratic_path() {
        let mut panel = Panel::new(Viewport::FULL, (0.0, 4.0), (0.0, 2.0));
        panel.add(Mark::Arrow(
            ArrowMark::new((0.0, 1.0), (2.0, 1.0), Color::WHITE)
                .head(ArrowHead::Both)
                .curve(0.5),
        ));
        let svg = render_svg(&figure_with(panel));
        // 控制點 (1, 0) 映射到 (72, 144)
        assert!(svg.contains("Q72.00 144.00"));
        assert_eq!(svg.matches("<polyline").count(), 2);
    }

    #[test]
    fn test_multiline_text_and_escaping() {
        let mut panel = Panel::new(Viewport::FULL, (0.0, 4.0), (0.0, 2.0));
        panel.add(Mark::Text(TextMark::new(1.0, 1.0, "A & B\n<C>").bold().rotation(90.0)));
        let svg = render_svg(&figure_with(panel));
        assert!(svg.contains("A &amp; B</tspan>"));
        assert!(svg.contains("&lt;C&gt;</tspan>"));
        assert!(svg.contains(r#"font-weight="bold""#));
        assert!(svg.contains(r#"transform="rotate(-90.00 72.00 72.00)""#));
    }

    #[test]
    fn test_callout_box_is_drawn_after_leader() {
        let mut panel = Panel::new(Viewport::FULL, (0.0, 4.0), (0.0, 2.0));
        panel.add(Mark::Callout(CalloutMark::new(
            "Pump",
            (1.0, 1.0),
            (3.0, 1.5),
            Color::hex(0x00D4AA),
        )));
        let svg = render_svg(&figure_with(panel));
        let leader = svg.find("<path").unwrap();
        let boxed = svg.find(r##"fill="#1E2236""##).unwrap();
        assert!(leader < boxed);
        assert!(svg.contains(r#"fill-opacity="0.92""#));
    }

    #[test]
    fn test_dashed_stroke_scales_with_width() {
        let mut panel = Panel::new(Viewport::FULL, (0.0, 4.0), (0.0, 2.0));
        panel.add(Mark::line(
            &[(0.0, 0.0), (1.0, 1.0)],
            Stroke::new(Color::WHITE, 2.0).dash(Dash::Dashed),
        ));
        let svg = render_svg(&figure_with(panel));
        assert!(svg.contains(r#"stroke-dasharray="7.40,3.20""#));
    }
}
