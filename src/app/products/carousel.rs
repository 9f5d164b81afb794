//! 4:5 直式輪播的共用配色與版面（190 × 237.5 mm，8 頁）。

use crate::app::layout::{CarouselKit, TextSpec};
use crate::domain::deck::{mm, Deck, Frame, Slide, POINTS_PER_MM};
use crate::domain::model::Color;

pub(super) const DARK_BG: Color = Color::hex(0x1A1A2E);
pub(super) const CARD_BG: Color = Color::hex(0x22223A);
pub(super) const CARD_BG_ALT: Color = Color::hex(0x1E1E34);
pub(super) const ORANGE: Color = Color::hex(0xFF8C00);
pub(super) const GREEN: Color = Color::hex(0x4EC978);
pub(super) const RED: Color = Color::hex(0xFF4545);
pub(super) const BLUE: Color = Color::hex(0x009BF5);
pub(super) const PURPLE: Color = Color::hex(0xA855F7);
pub(super) const YELLOW: Color = Color::hex(0xFFD700);
pub(super) const WHITE: Color = Color::WHITE;
pub(super) const LIGHT_GRAY: Color = Color::hex(0xBBBBCC);
pub(super) const SOFT_WHITE: Color = Color::hex(0xF0F0F5);

pub(super) const TOTAL_PAGES: usize = 8;

/// 左右邊界
pub(super) const M: f32 = 10.0 * POINTS_PER_MM;

pub(super) fn kit() -> CarouselKit {
    CarouselKit {
        page_w: mm(190.0),
        page_h: mm(237.5),
        margin: M,
        background: DARK_BG,
        footer_color: LIGHT_GRAY,
    }
}

pub(super) fn new_deck(title: &str) -> Deck {
    let k = kit();
    Deck::new(title, k.page_w, k.page_h)
}

pub(super) fn t(size: f32, color: Color) -> TextSpec {
    TextSpec::new(size, color)
}

/// 列表卡片交替底色
pub(super) fn alternate(i: usize) -> Color {
    if i % 2 == 0 {
        CARD_BG
    } else {
        CARD_BG_ALT
    }
}

/// 第 2 頁之後的頁首：色條、28 pt 標題與短底線
pub(super) fn section_page(k: &CarouselKit, title: &str, accent: Color) -> Slide {
    let mut s = k.page();
    k.accent_strip(&mut s, accent);
    k.text(&mut s, M, mm(12.0), title, t(28.0, WHITE).bold());
    k.bar(&mut s, M, mm(22.0), mm(30.0), mm(0.8), accent);
    s
}

/// 封面的主圖與底部說明列
pub(super) fn cover_image_and_strip(k: &CarouselKit, s: &mut Slide, image: Frame, path: &str) {
    k.image(s, image, path);
    k.card_flat(s, 0.0, k.page_h - mm(8.0), k.page_w, mm(8.0), CARD_BG);
    k.text(
        s,
        M,
        k.page_h - mm(5.0),
        "Product Overview  |  Concept Stage  |  2026",
        t(9.0, LIGHT_GRAY),
    );
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::domain::deck::Shape;

    #[test]
    fn test_section_page_header() {
        let k = kit();
        let s = section_page(&k, "Architecture", BLUE);
        assert_eq!(s.text_content(), vec!["Architecture"]);
        let bars = s
            .shapes
            .iter()
            .filter(|shape| matches!(shape, Shape::Rect { fill, .. } if *fill == BLUE))
            .count();
        assert_eq!(bars, 2);
    }

    #[test]
    fn test_alternate_colors() {
        assert_eq!(alternate(0), CARD_BG);
        assert_eq!(alternate(1), CARD_BG_ALT);
        assert_eq!(alternate(4), CARD_BG);
    }
}
