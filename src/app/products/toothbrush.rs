//! 拋棄式電動牙刷：AAA 電池、沒有 MCU、雙料射出密封。

use super::carousel::{
    alternate, cover_image_and_strip, kit, new_deck, section_page, t, BLUE, CARD_BG, CARD_BG_ALT,
    GREEN, LIGHT_GRAY, M, ORANGE, PURPLE, RED, SOFT_WHITE, TOTAL_PAGES, WHITE,
};
use super::{product_path, ConceptProduct, DeckSpec, DiagramSpec};
use crate::config::toml_config::RenderConfig;
use crate::domain::deck::{mm, Deck, Frame};
use crate::domain::figure::{
    ArrowHead, ArrowMark, Dash, Figure, Mark, Panel, Stroke, Style, TextMark, VAlign, Viewport,
};
use crate::domain::model::{Align, ArtifactKind, Color};

const KEY: &str = "toothbrush";
const ILLUSTRATION_FILE: &str = "cross_section_illustration_consumable_toothbrush.png";

pub struct Toothbrush;

impl ConceptProduct for Toothbrush {
    fn key(&self) -> &'static str {
        KEY
    }

    fn display_name(&self) -> &'static str {
        "Consumable Electric Toothbrush"
    }

    fn decks(&self) -> Vec<DeckSpec> {
        vec![DeckSpec {
            stem: product_path(KEY, "Consumable_Toothbrush_Carousel"),
            formats: vec![ArtifactKind::Pdf, ArtifactKind::Pptx],
            deck: carousel(),
        }]
    }

    fn diagrams(&self, _render: &RenderConfig) -> Vec<DiagramSpec> {
        vec![DiagramSpec {
            name: "arrangement",
            file: product_path(KEY, "arrangement_options.png"),
            figure: arrangement(),
        }]
    }
}

pub fn carousel() -> Deck {
    let k = kit();
    let cw = k.content_width();
    let mut deck = new_deck("Consumable Electric Toothbrush");

    // 1. 封面，標題分兩行
    let mut s = k.page();
    k.accent_strip(&mut s, BLUE);
    k.text(&mut s, M, mm(14.0), "Consumable Electric", t(34.0, WHITE).bold());
    k.text(&mut s, M, mm(28.0), "Toothbrush", t(34.0, WHITE).bold());
    k.bar(&mut s, M, mm(37.0), mm(35.0), mm(1.0), BLUE);
    k.text_wrap(
        &mut s,
        M,
        mm(43.0),
        "Use it. Toss it. Open a new one.",
        t(18.0, GREEN).max_w(cw),
    );
    k.text_wrap(
        &mut s,
        M,
        mm(56.0),
        "A battery-powered vibrating toothbrush designed as a true consumable. AAA alkaline, no \
         MCU, dual-injection sealed. $3-5 retail vs. Oral-B Pulsar at $8-12.",
        t(11.0, LIGHT_GRAY).max_w(cw),
    );
    cover_image_and_strip(
        &k,
        &mut s,
        Frame::new(M, mm(75.0), cw, mm(135.0)),
        &product_path(KEY, ILLUSTRATION_FILE),
    );
    k.footer(&mut s, 1, TOTAL_PAGES);
    deck.slides.push(s);

    // 2. 問題
    let mut s = section_page(&k, "The Problem", RED);
    let problems = [
        (
            "Oral-B Pulsar is overpriced for a disposable",
            "At $8-12, the Pulsar pretends to be reusable but has a sealed, non-replaceable \
             battery. When it dies, you throw it away anyway. You're paying premium prices for a \
             disposable product.",
            RED,
        ),
        (
            "Manual brushes don't clean as well",
            "Powered vibration removes significantly more plaque than manual brushing. But \
             rechargeable electric brushes cost $30-200 plus replacement heads. Budget consumers \
             are stuck with manual.",
            ORANGE,
        ),
        (
            "No honest sub-$5 powered option exists",
            "The market has premium rechargeable brushes ($30+) and the Oral-B Pulsar ($8-12). \
             Nothing fills the gap below $5 -- a price point where powered brushing becomes truly \
             disposable.",
            ORANGE,
        ),
    ];
    for (i, (title, desc, color)) in problems.iter().enumerate() {
        let y = mm(30.0) + i as f32 * mm(55.0);
        k.card(&mut s, M, y, cw, mm(49.0), CARD_BG);
        k.bar(&mut s, M, y, cw, mm(1.5), *color);
        k.text(&mut s, M + mm(5.0), y + mm(8.0), title, t(14.0, *color).bold());
        k.text_wrap(
            &mut s,
            M + mm(5.0),
            y + mm(20.0),
            desc,
            t(11.0, LIGHT_GRAY).max_w(cw - mm(10.0)).line_h(14.0),
        );
    }
    k.card_flat(&mut s, M, mm(200.0), cw, mm(30.0), CARD_BG);
    k.text(&mut s, M + mm(4.0), mm(204.0), "TARGET USERS", t(10.0, BLUE).bold());
    k.text(
        &mut s,
        M + mm(4.0),
        mm(213.0),
        "Budget-conscious consumers  |  Travelers",
        t(12.0, WHITE).bold(),
    );
    k.text(
        &mut s,
        M + mm(4.0),
        mm(222.0),
        "Hotels & hospitality  |  Multi-pack buyers",
        t(12.0, WHITE).bold(),
    );
    k.footer(&mut s, 2, TOTAL_PAGES);
    deck.slides.push(s);

    // 3. 運作方式
    let mut s = section_page(&k, "How It Works", GREEN);
    let steps = [
        (
            "Open",
            "Tear open blister pack",
            "AAA alkaline battery is pre-installed with years of shelf life. No charging, no \
             pairing, no setup of any kind.",
            BLUE,
        ),
        (
            "Press",
            "Push the button once",
            "Latching push-button switch turns motor on. ERM vibration motor spins up instantly. \
             Bristles oscillate via the split-head mechanism.",
            GREEN,
        ),
        (
            "Brush",
            "2 minutes, twice daily",
            "Split bristle head concentrates oscillation at the bristle tips for effective plaque \
             removal. Rinse under tap after use. IPX5 sealed.",
            PURPLE,
        ),
        (
            "Toss",
            "~90 days later, motor stops",
            "Alkaline cell drops below motor stall voltage. Clear end-of-life: it works or it \
             doesn't. Discard and open a new one.",
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
    k.text(&mut s, M + mm(4.0), mm(32.0), "Power Path", t(11.0, BLUE).bold());
    k.text(
        &mut s,
        M + mm(4.0),
        mm(41.0),
        "AAA Cell --> Latching Switch --> ERM Motor",
        t(12.0, WHITE).bold(),
    );
    k.text(
        &mut s,
        M + mm(4.0),
        mm(49.0),
        "1.5V alkaline      push on/off       60-100mA, direct drive",
        t(8.0, LIGHT_GRAY),
    );
    k.card(&mut s, M, mm(60.0), cw, mm(22.0), CARD_BG);
    k.text(&mut s, M + mm(4.0), mm(64.0), "Mechanical Path", t(11.0, GREEN).bold());
    k.text(
        &mut s,
        M + mm(4.0),
        mm(72.0),
        "Motor --> Eccentric --> Linkage --> Split Head --> Bristles",
        t(10.0, WHITE).bold(),
    );
    k.bar(&mut s, M, mm(88.0), cw, mm(1.0), BLUE);
    k.text(&mut s, M, mm(92.0), "SUBSYSTEMS", t(11.0, BLUE).bold());
    let subsystems = [
        (
            "AAA Alkaline Cell (1.5V)",
            "1000-1200 mAh, ~750 min runtime, years of shelf life",
            ORANGE,
        ),
        (
            "Latching Push-Button",
            "Mechanical push-on/push-off, sealed by TPE overmold",
            GREEN,
        ),
        (
            "Cylindrical ERM Motor",
            "6x12mm, 60-100mA at 1.5V, axial mount in handle neck",
            PURPLE,
        ),
        (
            "Split Bristle Head",
            "Fixed + moving halves, living hinge pivot, 1-2mm oscillation",
            GREEN,
        ),
        (
            "Rigid PP Body (1st shot)",
            "Handle, motor pocket, battery tube, insert-molded bristles",
            BLUE,
        ),
        (
            "TPE Overmold (2nd shot)",
            "Seals all penetrations, grip texture, button membrane, head boot",
            ORANGE,
        ),
        (
            "Battery Cap + O-ring",
            "Threaded PP cap, static radial seal, factory-installed",
            PURPLE,
        ),
    ];
    // 七個子系統，列高比其他輪播略矮
    for (i, (name, desc, color)) in subsystems.iter().enumerate() {
        let y = mm(98.0) + i as f32 * mm(15.0);
        k.card(&mut s, M, y, cw, mm(13.0), alternate(i));
        k.text(&mut s, M + mm(4.0), y + mm(3.5), name, t(10.0, WHITE).bold());
        k.text(&mut s, M + mm(4.0), y + mm(10.0), desc, t(8.0, LIGHT_GRAY));
        k.bar(&mut s, M, y, mm(1.5), mm(13.0), *color);
    }
    k.card(&mut s, M, mm(206.0), cw, mm(24.0), CARD_BG_ALT);
    k.text(
        &mut s,
        M + mm(4.0),
        mm(210.0),
        "Zero software. Zero electronics.",
        t(13.0, RED).bold(),
    );
    k.text_wrap(
        &mut s,
        M + mm(4.0),
        mm(220.0),
        "No MCU, no PCB, no firmware, no app, no cloud. The entire electrical system is 3 \
         components and 2 wires.",
        t(9.0, LIGHT_GRAY).max_w(cw - mm(8.0)).line_h(12.0),
    );
    k.footer(&mut s, 4, TOTAL_PAGES);
    deck.slides.push(s);

    // 5. 雙料射出密封
    let mut s = section_page(&k, "Dual-Injection Sealing", PURPLE);
    k.text_wrap(
        &mut s,
        M,
        mm(28.0),
        "How do you waterproof a $1.50 product for 90 days of wet use?",
        t(13.0, LIGHT_GRAY).max_w(cw),
    );
    k.card(&mut s, M, mm(42.0), cw, mm(45.0), CARD_BG);
    k.bar(&mut s, M, mm(42.0), cw, mm(1.5), BLUE);
    k.text(
        &mut s,
        M + mm(5.0),
        mm(48.0),
        "1st Shot: Rigid PP Body",
        t(16.0, BLUE).bold(),
    );
    k.text_wrap(
        &mut s,
        M + mm(5.0),
        mm(60.0),
        "Injection-mold the structural handle with bristles pre-loaded in the mold cavity. \
         Plastic flows around each bristle base, creating a watertight seal at every tuft. No \
         secondary sealing.",
        t(11.0, WHITE).max_w(cw - mm(10.0)).line_h(14.0),
    );
    k.card(&mut s, M, mm(94.0), cw, mm(50.0), CARD_BG);
    k.bar(&mut s, M, mm(94.0), cw, mm(1.5), GREEN);
    k.text(
        &mut s,
        M + mm(5.0),
        mm(100.0),
        "2nd Shot: TPE Overmold",
        t(16.0, GREEN).bold(),
    );
    k.text_wrap(
        &mut s,
        M + mm(5.0),
        mm(112.0),
        "After motor, wiring, switch, and battery are assembled into the rigid body, the 2nd \
         injection encapsulates everything. TPE bonds chemically to PP, sealing all penetrations \
         in one step: grip texture, button membrane, and dynamic head boot.",
        t(11.0, WHITE).max_w(cw - mm(10.0)).line_h(14.0),
    );
    k.card(&mut s, M, mm(152.0), cw, mm(75.0), CARD_BG_ALT);
    k.text(&mut s, M + mm(5.0), mm(157.0), "4 Seal Zones", t(13.0, ORANGE).bold());
    let seals = [
        (
            "1. Bristle insert-mold",
            "PP flows around nylon tuft bases during 1st injection",
        ),
        (
            "2. TPE body overmold",
            "2nd shot seals handle, switch, wire penetrations",
        ),
        (
            "3. TPE head boot",
            "Flexible boot around split-head pivot, survives millions of flex cycles",
        ),
        (
            "4. O-ring battery cap",
            "Threaded PP cap compresses O-ring at handle base",
        ),
    ];
    let mut ry = mm(169.0);
    for (title, desc) in seals {
        k.text(&mut s, M + mm(5.0), ry, title, t(10.0, WHITE).bold());
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
        ("BOM cost", "< $1.50", "At 10k units; < $1.20 at 50k"),
        ("Motor runtime", ">= 350 min", "~750 min calculated (AAA @ 80mA)"),
        ("Water resistance", "IPX5", "Dual-injection + O-ring, 90 days wet use"),
        ("Handle diameter", "<= 16mm", "AAA cell (10.5mm) + PP wall + TPE"),
        ("Retail price", "$3 - $5", "Undercutting Oral-B Pulsar ($8-12)"),
        ("Shelf life", "> 2 years", "Alkaline chemistry, sealed blister pack"),
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
    k.text(&mut s, M, mm(137.0), "BOM ESTIMATE (10k units)", t(11.0, GREEN).bold());
    let bom = [
        ("ERM motor (cylindrical, 6x12mm)", "$0.12"),
        ("AAA alkaline cell", "$0.07"),
        ("Latching push-button switch", "$0.03"),
        ("Wiring (2x, 26AWG, tinned)", "$0.01"),
        ("Spring contact + plate contact", "$0.02"),
        ("PA-612 nylon bristle tufts (x35)", "$0.02"),
        ("O-ring (battery cap seal)", "$0.01"),
        ("PP resin (1st shot, ~8g)", "$0.02"),
        ("TPE resin (2nd shot, ~3g)", "$0.02"),
        ("Battery cap (threaded PP)", "$0.02"),
        ("Blister packaging + card", "$0.08"),
        ("Assembly + test (90-100s/unit)", "$0.72"),
    ];
    for (i, (item, cost)) in bom.iter().enumerate() {
        let y = mm(144.0) + i as f32 * mm(7.0);
        k.card_flat(&mut s, M + mm(2.0), y, cw - mm(4.0), mm(6.0), alternate(i));
        k.text(&mut s, M + mm(6.0), y + mm(1.5), item, t(8.0, SOFT_WHITE));
        k.text(
            &mut s,
            M + mm(6.0),
            y + mm(1.5),
            cost,
            t(8.0, WHITE).bold().right(cw - mm(16.0)),
        );
    }
    k.card_flat(&mut s, M + mm(2.0), mm(228.0), cw - mm(4.0), mm(7.0), ORANGE);
    k.text(&mut s, M + mm(6.0), mm(230.0), "Total COGS", t(10.0, WHITE).bold());
    k.text(
        &mut s,
        M + mm(6.0),
        mm(230.0),
        "~$1.14  (50k: ~$0.92)",
        t(10.0, WHITE).bold().right(cw - mm(16.0)),
    );
    k.footer(&mut s, 6, TOTAL_PAGES);
    deck.slides.push(s);

    // 7. 最難的問題
    let mut s = section_page(&k, "Hardest Problems", RED);
    let hard = [
        (
            "Dynamic seal at the split head joint",
            "The moving bristle half oscillates ~1-2mm at 150+ Hz while the TPE boot must keep \
             water out of the motor cavity. This is a fatigue + sealing problem -- the boot must \
             survive millions of flex cycles in a wet, toothpaste-laden environment without \
             cracking or delaminating from the PP substrate.",
        ),
        (
            "Insert-molding bristle seal quality at speed",
            "Each brush head has ~35 bristle tufts penetrating the PP surface. At production \
             speed (seconds per unit), every tuft base must be fully sealed by the injection \
             process. A single unsealed tuft is a water ingress path. Narrow process window for \
             injection pressure, temperature, and bristle positioning.",
        ),
        (
            "BOM discipline with dual-injection process",
            "Overmolding adds ~$0.10-0.20 per unit vs. single-shot molding, and tooling is 2-3x \
             higher ($15k-25k). With $3-5 retail and distribution margins to cover, every \
             component must be ruthlessly cost-optimized. No room for any extras.",
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
        "All three problems are manufacturing challenges, not design unknowns. The Oral-B Pulsar \
         proves the architecture works -- the risk is execution at lower cost.",
        t(11.0, ORANGE).max_w(cw - mm(8.0)).line_h(14.0),
    );
    k.footer(&mut s, 7, TOTAL_PAGES);
    deck.slides.push(s);

    // 8. 關卡結果與下一步
    let mut s = section_page(&k, "Gate Result & Next", GREEN);
    k.card(&mut s, M, mm(28.0), cw, mm(22.0), CARD_BG);
    k.card(&mut s, M + mm(4.0), mm(31.0), mm(50.0), mm(16.0), GREEN);
    k.text(&mut s, M + mm(8.0), mm(35.0), "GATE: PASS", t(16.0, WHITE).bold());
    k.text(&mut s, M + mm(8.0), mm(43.0), "40 pass / 47 N/A / 2 fail", t(9.0, WHITE));
    k.text(&mut s, M + mm(60.0), mm(36.0), "System description complete.", t(11.0, WHITE));
    k.text(
        &mut s,
        M + mm(60.0),
        mm(44.0),
        "Ready for mold design.",
        t(11.0, GREEN).bold(),
    );
    k.card(&mut s, M, mm(54.0), cw, mm(22.0), CARD_BG);
    k.text(&mut s, M + mm(4.0), mm(58.0), "POWER", t(10.0, BLUE).bold());
    k.text(
        &mut s,
        M + mm(4.0),
        mm(66.0),
        "80 mA active  |  < 1 uA off  |  AAA 1000 mAh",
        t(11.0, WHITE),
    );
    k.text(
        &mut s,
        M + mm(4.0),
        mm(73.0),
        "~750 min runtime  |  ~187 days @ 4 min/day  |  non-rechargeable",
        t(10.0, LIGHT_GRAY),
    );
    k.card(&mut s, M, mm(80.0), cw, mm(22.0), CARD_BG_ALT);
    k.text(&mut s, M + mm(4.0), mm(84.0), "KEY SPECS", t(10.0, PURPLE).bold());
    k.text(
        &mut s,
        M + mm(4.0),
        mm(92.0),
        "~160mm long  |  ~15mm dia  |  IPX5  |  Single SKU",
        t(10.0, WHITE),
    );
    k.text(
        &mut s,
        M + mm(4.0),
        mm(99.0),
        "No MCU  |  No PCB  |  No app  |  $3-5 retail",
        t(10.0, LIGHT_GRAY),
    );
    k.bar(&mut s, M, mm(108.0), cw, mm(1.0), ORANGE);
    k.text(&mut s, M, mm(112.0), "7 OPEN ITEMS", t(11.0, ORANGE).bold());
    let open_items = [
        ("M1", "Motor performance validation at end-of-life voltage (~1.0V)"),
        ("M2", "Living hinge geometry: thickness, width, PP grade for 4M cycles"),
        ("M2", "TPE head boot fatigue life in wet toothpaste environment"),
        ("M3", "Insert-mold bristle seal QC: tuft pull-force per ISO 20126"),
        ("M3", "Retail channel acceptance test (shelf appeal, blister design)"),
        ("M4", "O-ring compression verification for production QC"),
        ("M4", "Motor current draw screening for dead/high-draw units"),
    ];
    for (i, (milestone, desc)) in open_items.iter().enumerate() {
        let y = mm(118.0) + i as f32 * mm(12.0);
        k.card(&mut s, M, y, cw, mm(10.0), alternate(i));
        k.text(&mut s, M + mm(4.0), y + mm(3.0), milestone, t(9.0, ORANGE).bold());
        k.text(&mut s, M + mm(18.0), y + mm(3.0), desc, t(9.0, SOFT_WHITE));
    }
    k.card(&mut s, M, mm(210.0), cw, mm(22.0), CARD_BG);
    k.text_wrap(
        &mut s,
        M + mm(4.0),
        mm(214.0),
        "Next step: source motor samples and AAA cells, build a hand-assembled prototype in a \
         3D-printed shell, and validate the split-head oscillation and motor stall voltage. Then \
         commit to dual-injection tooling.",
        t(10.0, WHITE).max_w(cw - mm(8.0)).line_h(13.0),
    );
    k.footer(&mut s, 8, TOTAL_PAGES);
    deck.slides.push(s);

    deck
}

// ── 馬達配置比較圖 ──

const PANEL_BG: Color = Color::hex(0x22223A);
const SHELL: Color = Color::hex(0x5CA08E);
const SHELL_EDGE: Color = Color::hex(0x3D7A6A);
const PP: Color = Color::hex(0xD4C896);
const PP_EDGE: Color = Color::hex(0xA8A060);
const MOTOR: Color = Color::hex(0xC0392B);
const MOTOR_EDGE: Color = Color::hex(0x922B21);
const BATTERY: Color = Color::hex(0x2980B9);
const BRISTLE: Color = Color::hex(0xECF0F1);
const SWITCH: Color = Color::hex(0xE67E22);
const O_RING: Color = Color::hex(0x222222);
const LINKAGE: Color = Color::hex(0xE74C3C);
const ECCENTRIC: Color = Color::hex(0xFF6B6B);
const MOVING: Color = Color::hex(0xF0E68C);
const MOVING_EDGE: Color = Color::hex(0xB8A030);
const CONTACT: Color = Color::hex(0xAAAAAA);
const DIM: Color = Color::hex(0x888888);
const DARK_TEXT: Color = Color::hex(0x333333);

/// 圓角盒，`pad` 同時是外擴距離與圓角半徑
#[allow(clippy::too_many_arguments)]
fn pad_box(
    p: &mut Panel,
    (x, y, w, h): (f32, f32, f32, f32),
    pad: f32,
    fill: Color,
    edge: Color,
    width: f32,
    alpha: f32,
) {
    p.add(Mark::rounded(
        x - pad,
        y - pad,
        w + 2.0 * pad,
        h + 2.0 * pad,
        pad,
        Style::filled(fill)
            .opacity(alpha)
            .stroke(Stroke::new(edge, width).opacity(alpha)),
    ));
}

/// 以多邊形近似的橢圓
fn ellipse(p: &mut Panel, (cx, cy): (f32, f32), w: f32, h: f32, style: Style) {
    let points = (0..48)
        .map(|i| {
            let a = (i as f32 * 7.5).to_radians();
            (cx + w / 2.0 * a.cos(), cy + h / 2.0 * a.sin())
        })
        .collect();
    p.add(Mark::Polygon { points, style });
}

fn label(x: f32, y: f32, text: &str, size: f32, color: Color) -> TextMark {
    TextMark::new(x, y, text).size(size).color(color)
}

fn centered(p: &mut Panel, x: f32, y: f32, text: &str, size: f32, color: Color) {
    let mark = label(x, y, text, size, color).bold().centered();
    p.add(Mark::Text(mark));
}

fn note(p: &mut Panel, x: f32, y: f32, text: &str, size: f32, color: Color) {
    let mark = label(x, y, text, size, color).italic().valign(VAlign::Center);
    p.add(Mark::Text(mark));
}

fn dim_arrow(p: &mut Panel, from: (f32, f32), to: (f32, f32), color: Color, width: f32) {
    p.add(Mark::Arrow(
        ArrowMark::new(from, to, color).width(width).head(ArrowHead::Both),
    ));
}

fn wire(p: &mut Panel, y0: f32, y1: f32) {
    p.add(Mark::line(
        &[(0.0, y0), (0.0, y1)],
        Stroke::new(LINKAGE, 1.5).dash(Dash::Dashed),
    ));
}

fn option_panel(left: f32, title: &str) -> Panel {
    let mut p = Panel::new(
        Viewport {
            left,
            bottom: 0.05,
            width: 0.46,
            height: 0.9,
        },
        (-12.0, 12.0),
        (-5.0, 105.0),
    )
    .equal_aspect()
    .background(PANEL_BG);
    p.add(Mark::Text(
        TextMark::new(0.0, 108.0, title)
            .size(16.0)
            .color(Color::WHITE)
            .bold()
            .centered(),
    ));
    p
}

/// 兩種配置共用的下半段：電池蓋、電池、開關與握把標示
fn lower_handle(p: &mut Panel, oring_label: bool, switch_note: &str) {
    pad_box(p, (-6.0, 0.0, 12.0, 3.0), 0.3, DIM, Color::hex(0x555555), 1.5, 1.0);
    centered(p, 0.0, 1.5, "Battery Cap\n(threaded PP)", 6.0, Color::WHITE);
    ellipse(
        p,
        (0.0, 3.2),
        10.0,
        1.2,
        Style::filled(O_RING).stroke(Stroke::new(Color::hex(0x444444), 1.0)),
    );
    if oring_label {
        note(p, 12.0, 3.2, "\u{2190} O-ring", 7.0, O_RING);
    }

    pad_box(p, (-3.0, 4.5, 6.0, 1.5), 0.2, CONTACT, Color::hex(0x666666), 1.0, 1.0);
    let spring = label(0.0, 5.2, "\u{2212} spring", 5.5, DARK_TEXT).centered();
    p.add(Mark::Text(spring));

    pad_box(p, (-5.0, 6.5, 10.0, 36.0), 0.5, BATTERY, Color::hex(0x1A5276), 2.0, 1.0);
    centered(p, 0.0, 24.5, "AAA\nBattery\n\u{2300}10.5\u{00D7}44.5\n1.5V", 8.0, Color::WHITE);

    pad_box(p, (-3.0, 43.0, 6.0, 1.5), 0.2, CONTACT, Color::hex(0x666666), 1.0, 1.0);
    let plate = label(0.0, 43.7, "+ plate", 5.5, DARK_TEXT).centered();
    p.add(Mark::Text(plate));

    wire(p, 44.5, 48.0);

    pad_box(p, (-4.0, 48.0, 8.0, 5.0), 0.3, SWITCH, Color::hex(0xC0571E), 1.5, 1.0);
    centered(p, 0.0, 50.5, "Latching\nSwitch", 7.0, Color::WHITE);
    note(p, 7.5, 50.5, switch_note, 7.0, SWITCH);

    let grip = label(-9.0, 38.0, "TPE\ngrip\nzone", 7.0, SHELL)
        .bold()
        .centered()
        .rotation(90.0);
    p.add(Mark::Text(grip));
}

/// 固定半邊、擺動半邊與刷毛，`base` 為刷頭底緣
fn split_head(p: &mut Panel, base: f32) {
    pad_box(p, (-5.5, base, 5.0, 8.0), 0.3, PP, PP_EDGE, 1.5, 1.0);
    centered(p, -3.0, base + 4.0, "Fixed\nHalf", 7.0, DARK_TEXT);
    pad_box(p, (0.5, base, 5.0, 8.0), 0.3, MOVING, MOVING_EDGE, 1.5, 1.0);
    centered(p, 3.0, base + 4.0, "Moving\nHalf", 7.0, DARK_TEXT);
    dim_arrow(p, (5.8, base + 2.0), (5.8, base + 4.0), MOVING_EDGE, 1.5);
    let travel = label(8.0, base + 3.0, "\u{2195}1-2mm", 6.0, MOVING_EDGE);
    p.add(Mark::Text(travel));

    for i in 0..10 {
        let x = -4.5 + i as f32 * 1.0;
        p.add(Mark::line(&[(x, base + 8.0), (x, base + 12.5)], Stroke::new(BRISTLE, 2.5)));
    }
    let tips = label(0.0, base + 14.5, "bristle tips", 7.0, BRISTLE)
        .italic()
        .centered();
    p.add(Mark::Text(tips));
}

fn dimension_text(p: &mut Panel, x: f32, y: f32, text: &str, color: Color, rotated: bool) {
    let mark = label(x, y, text, if rotated { 7.0 } else { 6.5 }, color);
    let mark = if rotated {
        mark.centered().rotation(90.0)
    } else {
        mark.align(Align::Center).valign(VAlign::Top)
    };
    p.add(Mark::Text(mark));
}

/// 選項 A：馬達沿軸向裝在握把頸部
fn axial_option() -> Panel {
    let mut p = option_panel(0.02, "Option A \u{2014} Axial Motor");

    pad_box(&mut p, (-7.5, 3.5, 15.0, 82.0), 0.8, SHELL, SHELL_EDGE, 2.0, 0.35);
    pad_box(&mut p, (-6.5, 4.0, 13.0, 81.0), 0.5, PP, PP_EDGE, 1.5, 0.3);
    lower_handle(&mut p, true, "\u{2190} user presses\n   (TPE membrane)");
    note(&mut p, 2.0, 46.0, "wire", 5.5, LINKAGE);
    wire(&mut p, 53.0, 58.0);

    pad_box(&mut p, (-3.5, 58.0, 7.0, 14.0), 0.4, MOTOR, MOTOR_EDGE, 2.0, 1.0);
    centered(&mut p, 0.0, 65.0, "ERM\nMotor\n\u{2300}6\u{00D7}12", 7.5, Color::WHITE);
    p.add(Mark::Arrow(ArrowMark::new((0.0, 72.0), (0.0, 72.5), Color::WHITE).width(1.5)));

    ellipse(
        &mut p,
        (1.5, 73.5),
        4.0,
        2.5,
        Style::filled(ECCENTRIC).stroke(Stroke::new(MOTOR, 1.5)),
    );
    let dot = label(1.5, 73.5, "\u{25CF}", 8.0, MOTOR_EDGE).centered();
    p.add(Mark::Text(dot));
    note(&mut p, 8.0, 73.5, "\u{2190} eccentric\n   mass", 6.5, ECCENTRIC);

    pad_box(&mut p, (-1.0, 75.0, 3.0, 8.0), 0.2, LINKAGE, MOTOR, 1.0, 0.7);
    let linkage = label(1.0, 79.0, "linkage\n~15mm", 6.0, Color::WHITE)
        .centered()
        .rotation(90.0);
    p.add(Mark::Text(linkage));

    pad_box(&mut p, (-7.0, 82.5, 14.0, 3.0), 0.5, SHELL, SHELL_EDGE, 2.0, 0.6);
    centered(&mut p, 0.0, 84.0, "TPE boot (seal)", 6.5, Color::WHITE);
    note(&mut p, 10.0, 84.0, "\u{2190} dynamic\n   seal", 6.5, SHELL);

    p.add(Mark::line(
        &[(-5.5, 86.0), (5.5, 86.0)],
        Stroke::new(Color::WHITE, 1.0).dash(Dash::Dotted),
    ));
    note(&mut p, 8.0, 86.0, "\u{2190} pivot", 6.0, Color::WHITE);
    split_head(&mut p, 86.5);

    dim_arrow(&mut p, (-8.5, 85.0), (-8.5, 4.0), DIM, 1.0);
    dimension_text(&mut p, -10.5, 44.0, "~160mm\ntotal", DIM, true);
    dim_arrow(&mut p, (7.5, 58.0), (-7.5, 58.0), DIM, 1.0);
    dimension_text(&mut p, 0.0, 56.0, "~15mm neck", DIM, false);
    p
}

/// 選項 B：馬達橫放在加寬的頸部，直接帶動短臂
fn transverse_option() -> Panel {
    let mut p = option_panel(0.52, "Option B \u{2014} Transverse Motor");

    pad_box(&mut p, (-7.5, 3.5, 15.0, 73.0), 0.8, SHELL, SHELL_EDGE, 2.0, 0.35);
    pad_box(&mut p, (-6.5, 4.0, 13.0, 72.0), 0.5, PP, PP_EDGE, 1.5, 0.3);
    pad_box(&mut p, (-9.0, 72.0, 18.0, 14.0), 0.8, SHELL, SHELL_EDGE, 2.0, 0.35);
    pad_box(&mut p, (-8.0, 72.5, 16.0, 13.0), 0.5, PP, PP_EDGE, 1.5, 0.3);
    lower_handle(&mut p, false, "\u{2190} user presses");
    wire(&mut p, 53.0, 73.0);

    pad_box(&mut p, (-6.5, 74.0, 13.0, 6.0), 0.4, MOTOR, MOTOR_EDGE, 2.0, 1.0);
    centered(
        &mut p,
        0.0,
        77.0,
        "ERM Motor \u{2300}6\u{00D7}12\n(transverse)",
        7.0,
        Color::WHITE,
    );
    ellipse(
        &mut p,
        (5.0, 81.0),
        3.0,
        2.5,
        Style::filled(ECCENTRIC).stroke(Stroke::new(MOTOR, 1.5)),
    );
    let dot = label(5.0, 81.0, "\u{25CF}", 7.0, MOTOR_EDGE).centered();
    p.add(Mark::Text(dot));

    pad_box(&mut p, (4.0, 82.5, 2.0, 3.0), 0.2, LINKAGE, MOTOR, 1.0, 0.7);
    note(&mut p, 10.5, 82.0, "\u{2190} stub arm\n   (direct)", 6.0, ECCENTRIC);

    pad_box(&mut p, (-8.0, 85.0, 16.0, 3.0), 0.5, SHELL, SHELL_EDGE, 2.0, 0.6);
    centered(&mut p, 0.0, 86.5, "TPE boot (seal)", 6.5, Color::WHITE);
    p.add(Mark::line(
        &[(-5.5, 88.5), (5.5, 88.5)],
        Stroke::new(Color::WHITE, 1.0).dash(Dash::Dotted),
    ));
    split_head(&mut p, 89.0);

    dim_arrow(&mut p, (-10.0, 88.0), (-10.0, 4.0), DIM, 1.0);
    dimension_text(&mut p, -12.0, 46.0, "~165mm\ntotal", DIM, true);
    dim_arrow(&mut p, (9.0, 74.0), (-9.0, 74.0), DIM, 1.0);
    dimension_text(&mut p, 0.0, 72.0, "~18mm neck (wider)", Color::hex(0xF39C12), false);
    dim_arrow(&mut p, (7.5, 48.0), (-7.5, 48.0), DIM, 1.0);
    dimension_text(&mut p, 0.0, 46.0, "~15mm handle", DIM, false);
    p
}

/// 兩種馬達配置的並排剖面（14 × 20 in @ 150 dpi）
pub fn arrangement() -> Figure {
    let mut fig = Figure::new(14.0, 20.0, 150.0, Color::hex(0x1A1A2E));
    fig.panels.push(axial_option());
    fig.panels.push(transverse_option());
    fig.texts.push(
        TextMark::new(
            0.5,
            0.02,
            "\u{25A0} Red = Motor/Eccentric    \u{25A0} Blue = Battery    \u{25A0} Orange = Switch    \
             \u{25A0} Green = TPE overmold    \u{25A0} Tan = Rigid PP body    \u{25A0} White = Bristles",
        )
        .size(9.0)
        .color(Color::hex(0xAAAAAA))
        .centered(),
    );
    fig
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_carousel_title_spans_two_lines() {
        let deck = carousel();
        assert_eq!(deck.slides.len(), TOTAL_PAGES);
        let cover = deck.slides[0].text_content();
        assert_eq!(&cover[..2], &["Consumable Electric", "Toothbrush"]);
        let paths = deck.image_paths();
        assert_eq!(paths.len(), 1);
        assert!(paths[0].ends_with(ILLUSTRATION_FILE));
    }

    #[test]
    fn test_architecture_lists_seven_subsystems() {
        let deck = carousel();
        let page = deck.slides[3].text_content();
        for name in ["AAA Alkaline Cell (1.5V)", "Battery Cap + O-ring"] {
            assert!(page.contains(&name), "missing {}", name);
        }
        assert!(deck.slides[7].text_content().contains(&"7 OPEN ITEMS"));
    }

    #[test]
    fn test_arrangement_has_two_options() {
        let fig = arrangement();
        assert_eq!(fig.pixel_size(), (2100, 3000));
        assert_eq!(fig.panels.len(), 2);
        let title = |panel: &Panel| match &panel.marks[0] {
            Mark::Text(text) => text.text.clone(),
            other => panic!("unexpected first mark {:?}", other),
        };
        assert!(title(&fig.panels[0]).ends_with("Axial Motor"));
        assert!(title(&fig.panels[1]).ends_with("Transverse Motor"));
        // 兩個選項各 10 根刷毛
        for panel in &fig.panels {
            let bristles = panel
                .marks
                .iter()
                .filter(|m| matches!(m, Mark::Polyline { stroke, .. } if stroke.color == BRISTLE))
                .count();
            assert_eq!(bristles, 10);
        }
    }

    #[test]
    fn test_registered_diagram() {
        let specs = Toothbrush.diagrams(&RenderConfig::default());
        assert_eq!(specs.len(), 1);
        assert_eq!(specs[0].file, "toothbrush/arrangement_options.png");
        assert!(Toothbrush.chat_illustration().is_none());
    }
}
