//! Pop!：一次爆一顆的桌上型迷你爆米花機。

use super::carousel::{
    alternate, cover_image_and_strip, kit, new_deck, section_page, t, BLUE, CARD_BG, CARD_BG_ALT,
    GREEN, LIGHT_GRAY, M, ORANGE, PURPLE, RED, SOFT_WHITE, TOTAL_PAGES, WHITE, YELLOW,
};
use super::{product_path, ConceptProduct, DeckSpec};
use crate::domain::deck::{mm, Deck, Frame};
use crate::domain::model::ArtifactKind;

const KEY: &str = "popcorn";
const ILLUSTRATION_FILE: &str = "cross_section_illustration_pop_miniature_popcorn_machine.png";

pub struct Popcorn;

impl ConceptProduct for Popcorn {
    fn key(&self) -> &'static str {
        KEY
    }

    fn display_name(&self) -> &'static str {
        "Pop!"
    }

    fn decks(&self) -> Vec<DeckSpec> {
        vec![DeckSpec {
            stem: product_path(KEY, "Pop_Carousel"),
            formats: vec![ArtifactKind::Pdf, ArtifactKind::Pptx],
            deck: carousel(),
        }]
    }
}

pub fn carousel() -> Deck {
    let k = kit();
    let cw = k.content_width();
    let mut deck = new_deck("Pop!");

    // 1. 封面
    let mut s = k.page();
    k.accent_strip(&mut s, YELLOW);
    k.text(&mut s, M, mm(14.0), "Pop!", t(42.0, WHITE).bold());
    k.bar(&mut s, M, mm(26.0), mm(35.0), mm(1.0), YELLOW);
    k.text_wrap(
        &mut s,
        M,
        mm(32.0),
        "One kernel at a time. Physics does the sorting.",
        t(18.0, GREEN).max_w(cw),
    );
    k.text_wrap(
        &mut s,
        M,
        mm(48.0),
        "A miniature desktop popcorn machine that pops kernels individually on a slow conveyor \
         belt through a hot zone. Popped kernels escape into a bowl. Duds ride to the end. USB-C \
         powered. Mesmerizing.",
        t(11.0, LIGHT_GRAY).max_w(cw),
    );
    cover_image_and_strip(
        &k,
        &mut s,
        Frame::new(M, mm(72.0), cw, mm(135.0)),
        &product_path(KEY, ILLUSTRATION_FILE),
    );
    k.footer(&mut s, 1, TOTAL_PAGES);
    deck.slides.push(s);

    // 2. 問題
    let mut s = section_page(&k, "The Problem", RED);
    let problems = [
        (
            "Microwave popcorn is invisible",
            "Push a button, wait 3 minutes, listen for the slowdown. Nothing to see. No ritual. No \
             spectacle. The bag arrives pre-made with artificial butter flavor and regret.",
            RED,
        ),
        (
            "Stovetop is overkill",
            "Oil, pot, lid, constant shaking, burned kernels stuck to the bottom, cleanup. All for \
             a snack. Nobody does this at their desk.",
            ORANGE,
        ),
        (
            "No desk-scale popcorn experience exists",
            "There is nothing that turns popcorn into a meditative, kernel-by-kernel show you \
             watch while you work. Pop! fills the space between snack and spectacle.",
            YELLOW,
        ),
    ];
    for (i, (title, desc, color)) in problems.iter().enumerate() {
        let y = mm(30.0) + i as f32 * mm(55.0);
        k.card(&mut s, M, y, cw, mm(49.0), CARD_BG);
        k.bar(&mut s, M, y, cw, mm(1.5), *color);
        k.text(&mut s, M + mm(5.0), y + mm(8.0), title, t(16.0, *color).bold());
        k.text_wrap(
            &mut s,
            M + mm(5.0),
            y + mm(20.0),
            desc,
            t(11.0, LIGHT_GRAY).max_w(cw - mm(10.0)).line_h(14.0),
        );
    }
    k.card_flat(&mut s, M, mm(200.0), cw, mm(30.0), CARD_BG);
    k.text(&mut s, M + mm(4.0), mm(204.0), "TARGET USERS", t(10.0, PURPLE).bold());
    k.text(
        &mut s,
        M + mm(4.0),
        mm(213.0),
        "Desk workers  |  Dorm dwellers  |  Gadget lovers",
        t(12.0, WHITE).bold(),
    );
    k.text(
        &mut s,
        M + mm(4.0),
        mm(222.0),
        "Gift recipients  |  Snack enthusiasts  |  Ages 14+",
        t(12.0, WHITE).bold(),
    );
    k.footer(&mut s, 2, TOTAL_PAGES);
    deck.slides.push(s);

    // 3. 運作方式
    let mut s = section_page(&k, "How It Works", GREEN);
    let steps = [
        (
            "Fill",
            "Pour kernels into the hopper",
            "Lift the clear lid, pour in two tablespoons of kernels. The hopper holds ~100. Plug \
             in the USB-C cable.",
            BLUE,
        ),
        (
            "Start",
            "Press the button, wait 45 seconds",
            "LED ring glows amber as the PTC heater preheats to 200C. When the ring turns green, \
             the conveyor belt starts.",
            GREEN,
        ),
        (
            "Watch",
            "Kernels pop one at a time",
            "Kernels slide down the gravity chute single-file onto the belt. The belt carries \
             each through the hot zone. Pop! The kernel explodes, escapes the belt, tumbles into \
             the bowl.",
            YELLOW,
        ),
        (
            "Eat",
            "Popcorn bowl fills, duds go to waste",
            "Popped kernels escape sideways into the clear bowl. Duds ride the belt to the end and \
             drop into the dud bowl. No sensors, no sorting logic. Physics does it.",
            ORANGE,
        ),
    ];
    for (i, (title, subtitle, desc, color)) in steps.iter().enumerate() {
        let y = mm(28.0) + i as f32 * mm(50.0);
        k.card(&mut s, M, y, cw, mm(44.0), CARD_BG);
        k.circle_num(&mut s, M + mm(4.0), y + mm(4.0), i + 1, *color);
        k.text(&mut s, M + mm(16.0), y + mm(6.0), title, t(18.0, *color).bold());
        k.text(&mut s, M + mm(16.0), y + mm(16.0), subtitle, t(11.0, WHITE).bold());
        k.text_wrap(
            &mut s,
            M + mm(6.0),
            y + mm(26.0),
            desc,
            t(10.0, LIGHT_GRAY).max_w(cw - mm(12.0)).line_h(13.0),
        );
    }
    k.footer(&mut s, 3, TOTAL_PAGES);
    deck.slides.push(s);

    // 4. 架構
    let mut s = section_page(&k, "Architecture", BLUE);
    k.card(&mut s, M, mm(28.0), cw, mm(28.0), CARD_BG);
    k.text(&mut s, M + mm(4.0), mm(32.0), "Kernel Pipeline", t(11.0, BLUE).bold());
    k.text(
        &mut s,
        M + mm(4.0),
        mm(41.0),
        "Hopper  -->  Chute  -->  Belt  -->  Hot Zone  -->  Bowl / Dud",
        t(12.0, WHITE).bold(),
    );
    k.text(
        &mut s,
        M + mm(4.0),
        mm(49.0),
        "gravity       single-file    slow grip     200C PTC       physics sorting",
        t(8.0, LIGHT_GRAY),
    );
    k.card(&mut s, M, mm(60.0), cw, mm(22.0), CARD_BG);
    k.text(
        &mut s,
        M + mm(4.0),
        mm(64.0),
        "Key Insight: No Sensors for Sorting",
        t(11.0, GREEN).bold(),
    );
    k.text(
        &mut s,
        M + mm(4.0),
        mm(72.0),
        "Popped = 25mm, escapes belt.  Unpopped = 6mm, stays gripped.  Physics wins.",
        t(10.0, WHITE),
    );
    k.bar(&mut s, M, mm(88.0), cw, mm(1.0), BLUE);
    k.text(&mut s, M, mm(92.0), "SUBSYSTEMS", t(11.0, BLUE).bold());
    let subsystems = [
        (
            "Double Conveyor Belt",
            "PTFE-fiberglass mesh, grips kernels through hot zone, 5-8 mm/s",
            YELLOW,
        ),
        (
            "PTC Ceramic Heater (20W)",
            "Self-regulating, 200C, mounted under belt path",
            RED,
        ),
        (
            "Gravity Chute",
            "Angled slide, narrows to 9mm, single-files kernels passively",
            GREEN,
        ),
        (
            "MCU (ESP32-C3)",
            "PID temp control, motor PWM, LED effects, optional BLE",
            BLUE,
        ),
        ("USB-C PD (30W)", "20V @ 1.5A via STUSB4500, no wall brick", ORANGE),
        (
            "LED Ring (WS2812B x8)",
            "Amber = preheat, green = running, blue = done, red = fault",
            PURPLE,
        ),
    ];
    for (i, (name, desc, color)) in subsystems.iter().enumerate() {
        let y = mm(98.0) + i as f32 * mm(17.0);
        k.card(&mut s, M, y, cw, mm(14.0), alternate(i));
        k.text(&mut s, M + mm(4.0), y + mm(4.0), name, t(11.0, WHITE).bold());
        k.text(&mut s, M + mm(4.0), y + mm(11.0), desc, t(8.0, LIGHT_GRAY));
        k.bar(&mut s, M, y, mm(1.5), mm(14.0), *color);
    }
    k.card(&mut s, M, mm(202.0), cw, mm(28.0), CARD_BG_ALT);
    k.text(
        &mut s,
        M + mm(4.0),
        mm(206.0),
        "Dumb firmware, smart mechanism",
        t(13.0, PURPLE).bold(),
    );
    k.text_wrap(
        &mut s,
        M + mm(4.0),
        mm(216.0),
        "The firmware runs PID temperature control and constant-speed motor drive. No pop \
         detection, no sorting logic, no jam recovery. The conveyor belt and physics handle \
         everything the firmware doesn't need to know about.",
        t(9.0, LIGHT_GRAY).max_w(cw - mm(8.0)).line_h(12.0),
    );
    k.footer(&mut s, 4, TOTAL_PAGES);
    deck.slides.push(s);

    // 5. 物理分選
    let mut s = section_page(&k, "Physics-Based Sorting", YELLOW);
    k.text_wrap(
        &mut s,
        M,
        mm(28.0),
        "How does the machine know which kernels popped?",
        t(13.0, LIGHT_GRAY).max_w(cw),
    );
    k.card(&mut s, M, mm(42.0), cw, mm(50.0), CARD_BG);
    k.bar(&mut s, M, mm(42.0), cw, mm(1.5), RED);
    k.text(
        &mut s,
        M + mm(5.0),
        mm(48.0),
        "Unpopped Kernel (Dud)",
        t(16.0, RED).bold(),
    );
    k.text(
        &mut s,
        M + mm(5.0),
        mm(60.0),
        "Size: ~6mm  |  Hard, round",
        t(13.0, WHITE),
    );
    k.text_wrap(
        &mut s,
        M + mm(5.0),
        mm(72.0),
        "Fits snugly between the two belts. Belt tension grips it. Rides the full belt path. \
         Drops into the dud bowl at the end.",
        t(10.0, LIGHT_GRAY).max_w(cw - mm(10.0)).line_h(13.0),
    );
    k.card(&mut s, M, mm(98.0), cw, mm(55.0), CARD_BG);
    k.bar(&mut s, M, mm(98.0), cw, mm(1.5), GREEN);
    k.text(&mut s, M + mm(5.0), mm(104.0), "Popped Kernel", t(16.0, GREEN).bold());
    k.text(
        &mut s,
        M + mm(5.0),
        mm(116.0),
        "Size: ~25mm  |  Expanded 10-15x  |  Irregular",
        t(13.0, WHITE),
    );
    k.text_wrap(
        &mut s,
        M + mm(5.0),
        mm(128.0),
        "Way too big for the belt gap. The expansion force pushes the spring-loaded belts apart. \
         The kernel breaks free and escapes sideways into the popcorn bowl. No sensor needed.",
        t(10.0, LIGHT_GRAY).max_w(cw - mm(10.0)).line_h(13.0),
    );
    k.card(&mut s, M, mm(160.0), cw, mm(68.0), CARD_BG_ALT);
    k.text(
        &mut s,
        M + mm(5.0),
        mm(165.0),
        "The conveyor belt IS the sensor",
        t(13.0, YELLOW).bold(),
    );
    let details = [
        (
            "Belt gap: ~4mm at rest",
            "Spring-loaded rollers apply light tension. 6mm kernels get gripped. 25mm popcorn \
             can't be held.",
        ),
        (
            "Belt speed: 5-8 mm/s",
            "Each kernel spends 10-16 seconds in the hot zone. Fast enough to be interesting, slow \
             enough to pop.",
        ),
        (
            "Belt material: PTFE-coated fiberglass",
            "Survives 260C continuous. Food-safe (FDA approved). Low-stick so popcorn doesn't \
             adhere.",
        ),
    ];
    let mut ry = mm(178.0);
    for (title, desc) in details {
        k.text(&mut s, M + mm(5.0), ry, &format!("- {}:", title), t(10.0, WHITE).bold());
        ry = k.text_wrap(
            &mut s,
            M + mm(8.0),
            ry + 12.0,
            desc,
            t(9.0, LIGHT_GRAY).max_w(cw - mm(16.0)).line_h(12.0),
        );
        ry += mm(3.0);
    }
    k.footer(&mut s, 5, TOTAL_PAGES);
    deck.slides.push(s);

    // 6. 限制與 BOM
    let mut s = section_page(&k, "Constraints & BOM", ORANGE);
    let constraints = [
        ("Hot zone temp", "~200C", "PTC self-regulating, PID-controlled"),
        ("Belt speed", "5-8 mm/s", "10-16s per kernel in hot zone"),
        ("Power", "USB-C PD 30W", "19W steady state, 11W headroom"),
        ("Footprint", "150 x 180 x 140mm", "Fits on a desk next to monitor"),
        ("Weight", "~400g", "Light enough to move with one hand"),
        ("Food safety", "FDA / EU 1935/2004", "PTFE belt, Tritan bowls"),
    ];
    for (i, (name, value, note)) in constraints.iter().enumerate() {
        let y = mm(28.0) + i as f32 * mm(17.0);
        k.card(&mut s, M, y, cw, mm(14.0), alternate(i));
        k.text(&mut s, M + mm(4.0), y + mm(3.5), name, t(11.0, ORANGE).bold());
        k.text(&mut s, M + mm(4.0), y + mm(10.0), note, t(8.0, LIGHT_GRAY));
        k.text(
            &mut s,
            M + mm(4.0),
            y + mm(3.5),
            value,
            t(11.0, WHITE).bold().right(cw - mm(8.0)),
        );
    }
    k.bar(&mut s, M, mm(133.0), cw, mm(1.0), GREEN);
    k.text(&mut s, M, mm(137.0), "BOM ESTIMATE (1k units)", t(11.0, GREEN).bold());
    let bom = [
        ("ESP32-C3-MINI-1", "$1.50"),
        ("STUSB4500 PD controller", "$1.20"),
        ("USB-C + buck regulator", "$0.90"),
        ("MOSFET + DRV8837 motor driver", "$1.00"),
        ("PTC ceramic heater (20W)", "$1.50"),
        ("DC gearmotor (30 RPM)", "$2.00"),
        ("Conveyor belt assembly (belts + rollers + springs)", "$3.50"),
        ("Stainless steel chute", "$0.80"),
        ("NTC thermistor + passives", "$0.65"),
        ("WS2812B LEDs x8 + piezo", "$1.00"),
        ("PCB (50x40mm, 4-layer)", "$1.20"),
        ("Enclosure (hopper + housing + base + bowls)", "$5.10"),
        ("Thermal insulation", "$0.30"),
        ("Packaging + USB-C cable + sample kernels", "$1.50"),
        ("Assembly + test", "$2.50"),
    ];
    // 15 列，列高縮到 6 mm 才放得下
    for (i, (item, cost)) in bom.iter().enumerate() {
        let y = mm(144.0) + i as f32 * mm(6.0);
        k.card_flat(&mut s, M + mm(2.0), y, cw - mm(4.0), mm(5.0), alternate(i));
        k.text(&mut s, M + mm(6.0), y + mm(1.0), item, t(7.5, SOFT_WHITE));
        k.text(
            &mut s,
            M + mm(6.0),
            y + mm(1.0),
            cost,
            t(7.5, WHITE).bold().right(cw - mm(16.0)),
        );
    }
    k.card_flat(&mut s, M + mm(2.0), mm(234.0), cw - mm(4.0), mm(7.0), ORANGE);
    k.text(&mut s, M + mm(6.0), mm(235.5), "Total COGS", t(9.0, WHITE).bold());
    k.text(
        &mut s,
        M + mm(6.0),
        mm(235.5),
        "~$24.75  (5k: ~$18.50)",
        t(9.0, WHITE).bold().right(cw - mm(16.0)),
    );
    k.footer(&mut s, 6, TOTAL_PAGES);
    deck.slides.push(s);

    // 7. 最難的問題
    let mut s = section_page(&k, "Hardest Problems", RED);
    let hard = [
        (
            "Belt grip vs. pop escape",
            "The belt must grip unpopped kernels (~6mm) firmly enough to transport them, yet \
             release popped kernels (~25mm) reliably. Spring-loaded belt tension is the tuning \
             variable. Too tight: popped kernels get crushed. Too loose: unpopped kernels slip. \
             Must prototype with real kernels and real belts at M1.",
        ),
        (
            "Heat transfer through the belt",
            "Kernels are heated through PTFE-fiberglass mesh from a PTC heater below. If heat \
             transfer is too slow, each kernel takes >12 seconds to pop and the cadence is \
             boring. May need heater on both sides or direct radiant exposure through mesh \
             openings. Target: pop within 8-12 seconds of entering the hot zone.",
        ),
        (
            "Gravity chute jamming",
            "The passive chute must single-file kernels from a bulk hopper using only geometry \
             and gravity. Kernels are 4-8mm, irregular, and tend to bridge in narrowing \
             channels. V-groove cross-section and polished surface help. A small vibration motor \
             is the fallback. Must test with multiple kernel brands at M1.",
        ),
    ];
    for (i, (title, desc)) in hard.iter().enumerate() {
        let y = mm(30.0) + i as f32 * mm(62.0);
        k.card(&mut s, M, y, cw, mm(56.0), CARD_BG);
        k.circle_num(&mut s, M + mm(4.0), y + mm(4.0), i + 1, RED);
        k.text(&mut s, M + mm(16.0), y + mm(6.0), title, t(13.0, WHITE).bold());
        k.text_wrap(
            &mut s,
            M + mm(6.0),
            y + mm(18.0),
            desc,
            t(10.0, LIGHT_GRAY).max_w(cw - mm(12.0)).line_h(13.0),
        );
    }
    k.card_flat(&mut s, M, mm(218.0), cw, mm(16.0), CARD_BG);
    k.text_wrap(
        &mut s,
        M + mm(4.0),
        mm(222.0),
        "All three are mechanism problems solved by prototyping, not simulation. M1 milestone: \
         3D-printed frame, off-shelf belts, PTC heater, real kernels.",
        t(11.0, ORANGE).max_w(cw - mm(8.0)).line_h(14.0),
    );
    k.footer(&mut s, 7, TOTAL_PAGES);
    deck.slides.push(s);

    // 8. 關卡結果與待辦
    let mut s = section_page(&k, "Gate Result & Next", GREEN);
    k.card(&mut s, M, mm(28.0), cw, mm(22.0), CARD_BG);
    k.card(&mut s, M + mm(4.0), mm(31.0), mm(50.0), mm(16.0), GREEN);
    k.text(&mut s, M + mm(8.0), mm(35.0), "GATE: PASS", t(16.0, WHITE).bold());
    k.text(&mut s, M + mm(8.0), mm(43.0), "70 pass / 13 N/A / 3 minor", t(9.0, WHITE));
    k.text(&mut s, M + mm(60.0), mm(36.0), "System description complete.", t(11.0, WHITE));
    k.text(
        &mut s,
        M + mm(60.0),
        mm(44.0),
        "Ready for mechanism prototype.",
        t(11.0, GREEN).bold(),
    );
    k.card(&mut s, M, mm(54.0), cw, mm(22.0), CARD_BG);
    k.text(&mut s, M + mm(4.0), mm(58.0), "POWER", t(10.0, BLUE).bold());
    k.text(
        &mut s,
        M + mm(4.0),
        mm(66.0),
        "USB-C PD: 20V @ 1.5A (30W)  |  Steady state: ~19W",
        t(11.0, WHITE),
    );
    k.text(
        &mut s,
        M + mm(4.0),
        mm(73.0),
        "Heater 17W  |  Motor 0.3W  |  MCU 0.15W  |  LEDs 0.8W  |  11W headroom",
        t(10.0, LIGHT_GRAY),
    );
    k.card(&mut s, M, mm(80.0), cw, mm(22.0), CARD_BG_ALT);
    k.text(&mut s, M + mm(4.0), mm(84.0), "KEY SPECS", t(10.0, PURPLE).bold());
    k.text(
        &mut s,
        M + mm(4.0),
        mm(92.0),
        "150x180x140mm  |  ~400g  |  Clear enclosure  |  Tritan bowls",
        t(10.0, WHITE),
    );
    k.text(
        &mut s,
        M + mm(4.0),
        mm(99.0),
        "ESP32-C3  |  BLE 5.0  |  OTA  |  Retail $50-80  |  BOM <$25",
        t(10.0, LIGHT_GRAY),
    );
    k.bar(&mut s, M, mm(108.0), cw, mm(1.0), ORANGE);
    k.text(&mut s, M, mm(112.0), "8 OPEN ITEMS", t(11.0, ORANGE).bold());
    let open_items = [
        ("M1", "Belt grip vs. pop escape tuning with real kernels"),
        ("M1", "Heat transfer rate through PTFE-fiberglass belt"),
        ("M1", "Gravity chute jamming across kernel brands"),
        ("M2", "Popped kernel escape direction / bowl placement"),
        ("M2", "Thermal isolation (outer surface <45C)"),
        ("M3", "Belt longevity at 200C (target 500+ hours)"),
        ("M2", "UL/ETL path for <25W heating appliance"),
        ("M2", "USB-C PD compatibility across charger brands"),
    ];
    for (i, (milestone, desc)) in open_items.iter().enumerate() {
        let y = mm(118.0) + i as f32 * mm(12.0);
        k.card(&mut s, M, y, cw, mm(10.0), alternate(i));
        k.text(&mut s, M + mm(4.0), y + mm(3.0), milestone, t(9.0, ORANGE).bold());
        k.text(&mut s, M + mm(18.0), y + mm(3.0), desc, t(9.0, SOFT_WHITE));
    }
    k.card(&mut s, M, mm(218.0), cw, mm(16.0), CARD_BG);
    k.text_wrap(
        &mut s,
        M + mm(4.0),
        mm(222.0),
        "Next step: 3D-print the frame, source PTFE belts and a PTC heater, build the conveyor \
         mechanism. Pop real kernels. Validate belt grip, chute flow, and escape geometry before \
         committing to tooling.",
        t(10.0, WHITE).max_w(cw - mm(8.0)).line_h(13.0),
    );
    k.footer(&mut s, 8, TOTAL_PAGES);
    deck.slides.push(s);

    deck
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::domain::deck::Shape;

    #[test]
    fn test_carousel_pages_and_cover() {
        let deck = carousel();
        assert_eq!(deck.title, "Pop!");
        assert_eq!(deck.slides.len(), TOTAL_PAGES);
        assert_eq!(deck.slides[0].text_content()[0], "Pop!");
        let paths = deck.image_paths();
        assert_eq!(paths.len(), 1);
        assert!(paths[0].ends_with(ILLUSTRATION_FILE));
    }

    #[test]
    fn test_bom_rows_fit_above_total() {
        let deck = carousel();
        let page = &deck.slides[5];
        let total_top = page
            .shapes
            .iter()
            .find_map(|s| match s {
                Shape::Rect { frame, fill, .. } if *fill == ORANGE && frame.y > mm(200.0) => {
                    Some(frame.y)
                }
                _ => None,
            })
            .unwrap();
        let last_row = page
            .shapes
            .iter()
            .filter_map(|s| match s {
                Shape::Rect { frame, .. } if frame.h == mm(5.0) => Some(frame.y + frame.h),
                _ => None,
            })
            .fold(0.0f32, f32::max);
        assert!(last_row <= total_top);
        assert!(page.text_content().contains(&"~$24.75  (5k: ~$18.50)"));
    }

    #[test]
    fn test_decks_only() {
        let decks = Popcorn.decks();
        assert_eq!(decks[0].file_for(ArtifactKind::Pptx), "popcorn/Pop_Carousel.pptx");
        assert!(Popcorn.chat_illustration().is_none());
        assert!(Popcorn.api_images().is_empty());
    }
}
