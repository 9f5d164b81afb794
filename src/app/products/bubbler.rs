//! Bubbler：自動泡泡機。

use super::carousel::{
    alternate, cover_image_and_strip, kit, new_deck, section_page, t, BLUE, CARD_BG, CARD_BG_ALT,
    GREEN, LIGHT_GRAY, M, ORANGE, PURPLE, RED, SOFT_WHITE, TOTAL_PAGES, WHITE,
};
use super::{product_path, ApiImageSpec, ChatIllustrationSpec, ConceptProduct, DeckSpec, DiagramSpec};
use crate::config::toml_config::RenderConfig;
use crate::domain::deck::{mm, Deck, Frame};
use crate::domain::figure::{
    ArrowHead, ArrowMark, Dash, Figure, Mark, MarkerShape, Panel, Stroke, Style, TextMark, VAlign,
    Viewport,
};
use crate::domain::model::{Align, ArtifactKind, Color};

const KEY: &str = "bubbler";
const ARRANGEMENT_FILE: &str = "arrangement_options.png";

pub struct Bubbler;

impl ConceptProduct for Bubbler {
    fn key(&self) -> &'static str {
        KEY
    }

    fn display_name(&self) -> &'static str {
        "Bubbler"
    }

    fn decks(&self) -> Vec<DeckSpec> {
        vec![DeckSpec {
            stem: product_path(KEY, "Bubbler_Carousel"),
            formats: vec![ArtifactKind::Pdf, ArtifactKind::Pptx],
            deck: carousel(),
        }]
    }

    fn diagrams(&self, _render: &RenderConfig) -> Vec<DiagramSpec> {
        vec![
            DiagramSpec {
                name: "block_diagram",
                file: product_path(KEY, "block_diagram.png"),
                figure: block_diagram(),
            },
            DiagramSpec {
                name: "arrangement",
                file: product_path(KEY, ARRANGEMENT_FILE),
                figure: arrangement(),
            },
        ]
    }

    fn chat_illustration(&self) -> Option<ChatIllustrationSpec> {
        Some(ChatIllustrationSpec {
            prompt_prefix: CHAT_PROMPT_PREFIX,
            design_files: vec![
                product_path(KEY, "high_level_design.md"),
                product_path(KEY, "component_arrangement.md"),
            ],
            reference_image: Some(product_path(KEY, ARRANGEMENT_FILE)),
            output_file: product_path(KEY, "cross_section_illustration_bubbler.png"),
        })
    }

    fn api_images(&self) -> Vec<ApiImageSpec> {
        vec![
            ApiImageSpec {
                prompt: CROSS_SECTION_PROMPT,
                output_file: product_path(KEY, "cross_section_illustration_bubbler.png"),
            },
            ApiImageSpec {
                prompt: ISOMETRIC_PROMPT,
                output_file: product_path(KEY, "isometric_illustration_bubbler.png"),
            },
        ]
    }
}

/// 8 頁直式輪播
pub fn carousel() -> Deck {
    let k = kit();
    let cw = k.content_width();
    let mut deck = new_deck("Bubbler");
    let arrangement = product_path(KEY, ARRANGEMENT_FILE);

    // 1. 標題
    let mut s = k.page();
    k.accent_strip(&mut s, ORANGE);
    k.text(&mut s, M, mm(14.0), "Bubbler", t(42.0, WHITE).bold());
    k.bar(&mut s, M, mm(28.0), mm(35.0), mm(1.0), ORANGE);
    k.text_wrap(&mut s, M, mm(34.0), "Big bubbles. Zero effort.", t(18.0, GREEN).max_w(cw));
    k.text_wrap(
        &mut s,
        M,
        mm(47.0),
        "An automated soap bubble machine that produces giant bubbles up to 500 mm using \
         force-curve feedback. No app, no cloud -- just press power and watch.",
        t(11.0, LIGHT_GRAY).max_w(cw),
    );
    cover_image_and_strip(&k, &mut s, Frame::new(M, mm(68.0), cw, mm(140.0)), &arrangement);
    k.footer(&mut s, 1, TOTAL_PAGES);
    deck.slides.push(s);

    // 2. 問題
    let mut s = section_page(&k, "The Problem", RED);
    let problems = [
        (
            "Large bubbles are hard to produce",
            "Giant soap bubbles (200-500 mm) require precise airflow control, correct dip timing, \
             and film that survives rotation. Manual technique is inconsistent and takes practice \
             to learn.",
            RED,
        ),
        (
            "Existing machines make only small bubbles",
            "Consumer bubble machines produce 20-50 mm bubbles with high pop rates and no \
             adaptation. They blow hard, pop fast, and waste soap. No feedback loop means no \
             improvement over time.",
            ORANGE,
        ),
        (
            "Gap between cheap toys and pro gear",
            "Toy machines cost $10-30 but produce tiny bubbles. Professional stage equipment costs \
             $200+ and needs power outlets. Nothing in between serves families, performers, and \
             outdoor events well.",
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
    k.text(&mut s, M + mm(4.0), mm(204.0), "TARGET USERS", t(10.0, PURPLE).bold());
    k.text(
        &mut s,
        M + mm(4.0),
        mm(213.0),
        "Families  |  Performers  |  Event organizers",
        t(12.0, WHITE).bold(),
    );
    k.text(
        &mut s,
        M + mm(4.0),
        mm(222.0),
        "Outdoor parties  |  Buskers  |  Kids' entertainment",
        t(12.0, WHITE).bold(),
    );
    k.footer(&mut s, 2, TOTAL_PAGES);
    deck.slides.push(s);

    // 3. 運作方式
    let mut s = section_page(&k, "How It Works", GREEN);
    let steps = [
        (
            "Fill",
            "Fill vat with soap solution",
            "Pour bubble solution into the built-in vat. Standard dish soap mix works. The wand \
             loop sits submerged, ready to dip.",
            BLUE,
        ),
        (
            "Press",
            "Press power -- wand dips into vat",
            "Single button press starts the cycle. The motor arm dips the wand loop into the soap \
             solution, coating it with a thin film.",
            GREEN,
        ),
        (
            "Inflate",
            "Arm rotates up, fan gently inflates film",
            "The arm rotates 175 degrees upward. A DC fan blows a controlled ramp of air through \
             the soap film, inflating it into a large bubble.",
            PURPLE,
        ),
        (
            "Optimize",
            "Force sensing optimizes each cycle",
            "A strain gauge on the wand arm measures 50-200 mN during inflation. Firmware \
             classifies each outcome and auto-adjusts fan speed, dip duration, and blow ramp. \
             Converges in 5-10 cycles.",
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
    k.card_flat(&mut s, M, mm(232.0), cw, mm(4.0), CARD_BG);
    k.footer(&mut s, 3, TOTAL_PAGES);
    deck.slides.push(s);

    // 4. 架構
    let mut s = section_page(&k, "Architecture", BLUE);
    k.card(&mut s, M, mm(28.0), cw, mm(28.0), CARD_BG);
    k.text(&mut s, M + mm(4.0), mm(32.0), "Sensing Signal Chain", t(11.0, BLUE).bold());
    k.text(
        &mut s,
        M + mm(4.0),
        mm(41.0),
        "Strain gauge --> HX711 ADC --> STM32 MCU",
        t(12.0, WHITE).bold(),
    );
    k.text(
        &mut s,
        M + mm(4.0),
        mm(49.0),
        "50-200 mN force       24-bit 10-80 Hz       hill-climbing optimizer",
        t(8.0, LIGHT_GRAY),
    );
    k.card(&mut s, M, mm(60.0), cw, mm(22.0), CARD_BG);
    k.text(&mut s, M + mm(4.0), mm(64.0), "Actuation Chain", t(11.0, GREEN).bold());
    k.text(
        &mut s,
        M + mm(4.0),
        mm(72.0),
        "STM32 --> Motor H-bridge (dip/rotate) + Fan PWM (inflate)",
        t(10.0, WHITE).bold(),
    );
    k.bar(&mut s, M, mm(88.0), cw, mm(1.0), BLUE);
    k.text(&mut s, M, mm(92.0), "KEY COMPONENTS", t(11.0, BLUE).bold());
    let subsystems = [
        ("MCU (STM32)", "Bare-metal firmware, hill-climbing on 5 parameters, no app/cloud", GREEN),
        (
            "Strain Gauge + HX711",
            "Force-curve feedback at 10-80 Hz, cycle outcome classification",
            PURPLE,
        ),
        (
            "DC Motor + H-bridge",
            "Wand dip and 175-degree arm rotation, bidirectional control",
            GREEN,
        ),
        ("DC Fan + MOSFET", "PWM-controlled airflow ramp for gentle bubble inflation", BLUE),
        (
            "Power (4xAA batteries)",
            "~7 hr runtime, simple replacement, no charging needed",
            ORANGE,
        ),
        (
            "Enclosure (IPX4)",
            "215x206 mm footprint, ~250 mm height, splash-resistant",
            ORANGE,
        ),
    ];
    for (i, (name, desc, color)) in subsystems.iter().enumerate() {
        let y = mm(98.0) + i as f32 * mm(17.0);
        k.card(&mut s, M, y, cw, mm(14.0), alternate(i));
        k.text(&mut s, M + mm(4.0), y + mm(4.0), name, t(11.0, WHITE).bold());
        k.text(&mut s, M + mm(4.0), y + mm(11.0), desc, t(8.0, LIGHT_GRAY));
        k.bar(&mut s, M, y, mm(1.5), mm(14.0), *color);
    }
    k.card(&mut s, M, mm(202.0), cw, mm(30.0), CARD_BG_ALT);
    k.text(
        &mut s,
        M + mm(4.0),
        mm(205.0),
        "Component Arrangement",
        t(10.0, PURPLE).bold(),
    );
    k.image(
        &mut s,
        Frame::new(M + mm(4.0), mm(210.0), cw - mm(8.0), mm(20.0)),
        &arrangement,
    );
    k.footer(&mut s, 4, TOTAL_PAGES);
    deck.slides.push(s);

    // 5. 關鍵創新
    let mut s = section_page(&k, "Key Innovation", PURPLE);
    k.text_wrap(
        &mut s,
        M,
        mm(28.0),
        "Force-curve feedback: the strain gauge on the wand arm turns every inflation cycle \
         into a learning opportunity.",
        t(13.0, LIGHT_GRAY).max_w(cw),
    );
    k.card(&mut s, M, mm(44.0), cw, mm(45.0), CARD_BG);
    k.bar(&mut s, M, mm(44.0), cw, mm(1.5), GREEN);
    k.text(&mut s, M + mm(5.0), mm(50.0), "What It Measures", t(16.0, GREEN).bold());
    for (i, line) in [
        "Force: 50-200 mN during inflation",
        "Sample rate: 10-80 Hz via HX711 ADC",
        "Resolution: sub-mN with 24-bit ADC",
    ]
    .iter()
    .enumerate()
    {
        k.text(&mut s, M + mm(5.0), mm(62.0) + i as f32 * mm(10.0), line, t(12.0, WHITE));
    }
    k.card(&mut s, M, mm(96.0), cw, mm(55.0), CARD_BG);
    k.bar(&mut s, M, mm(96.0), cw, mm(1.5), PURPLE);
    k.text(
        &mut s,
        M + mm(5.0),
        mm(102.0),
        "Cycle Outcome Classification",
        t(16.0, PURPLE).bold(),
    );
    let outcomes = [
        ("Success", "Bubble detaches cleanly -- force drops to baseline", GREEN),
        ("Pop", "Sudden force spike then zero -- film burst mid-inflation", RED),
        ("No film", "Near-zero force throughout -- dip failed to coat", ORANGE),
        ("Partial", "Force plateau then slow decay -- bubble formed but small", BLUE),
    ];
    let mut ry = mm(114.0);
    for (label, desc, color) in outcomes {
        k.text(&mut s, M + mm(5.0), ry, &format!("{}:", label), t(10.0, color).bold());
        ry = k.text_wrap(
            &mut s,
            M + mm(25.0),
            ry,
            desc,
            t(9.0, LIGHT_GRAY).max_w(cw - mm(30.0)).line_h(12.0),
        );
        ry += mm(2.0);
    }
    k.card(&mut s, M, mm(158.0), cw, mm(70.0), CARD_BG_ALT);
    k.text(
        &mut s,
        M + mm(5.0),
        mm(163.0),
        "Hill-Climbing Optimizer",
        t(13.0, ORANGE).bold(),
    );
    let params = [
        ("Fan speed ramp", "PWM duty cycle profile during inflation"),
        ("Dip duration", "How long the wand stays in the soap vat"),
        ("Blow ramp rate", "How quickly airflow increases"),
        ("Rotation speed", "Arm angular velocity during lift"),
        ("Pause duration", "Wait time between dip and blow"),
    ];
    let mut ry = mm(175.0);
    for (title, desc) in params {
        k.text(&mut s, M + mm(5.0), ry, &format!("- {}:", title), t(10.0, WHITE).bold());
        ry = k.text_wrap(
            &mut s,
            M + mm(8.0),
            ry + 12.0,
            desc,
            t(9.0, LIGHT_GRAY).max_w(cw - mm(16.0)).line_h(12.0),
        );
        ry += mm(2.0);
    }
    k.footer(&mut s, 5, TOTAL_PAGES);
    deck.slides.push(s);

    // 6. 限制與 BOM
    let mut s = section_page(&k, "Constraints & BOM", ORANGE);
    let constraints = [
        ("Bubble size", "Up to 500 mm", "Wand loop geometry + controlled airflow"),
        ("Battery life", "~7 hrs (4xAA)", "Low-power MCU, motor duty-cycled"),
        ("Footprint", "215 x 206 mm", "Compact enough for a tabletop"),
        ("Operating temp", "5-40 C", "Soap film physics limit the range"),
        ("Wind tolerance", "4 kph crosswind", "Fan ramp compensation algorithm"),
        ("Electronics", "IPX4", "Splash-resistant enclosure for outdoor use"),
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
    k.text(&mut s, M, mm(137.0), "BOM ESTIMATE (~$12.80 total)", t(11.0, GREEN).bold());
    let bom = [
        ("STM32 MCU", "$1.50"),
        ("Strain gauge + HX711 ADC", "$0.80"),
        ("DC motor + H-bridge", "$1.80"),
        ("DC fan + MOSFET driver", "$1.10"),
        ("Enclosure (molded plastic)", "$3.50"),
        ("Wand + loop + shaft", "$1.50"),
        ("Misc (PCB, connectors, passives)", "$2.60"),
    ];
    for (i, (item, cost)) in bom.iter().enumerate() {
        let y = mm(144.0) + i as f32 * mm(9.0);
        k.card_flat(&mut s, M + mm(2.0), y, cw - mm(4.0), mm(7.5), alternate(i));
        k.text(&mut s, M + mm(6.0), y + mm(2.0), item, t(9.0, SOFT_WHITE));
        k.text(
            &mut s,
            M + mm(6.0),
            y + mm(2.0),
            cost,
            t(9.0, WHITE).bold().right(cw - mm(16.0)),
        );
    }
    k.card_flat(&mut s, M + mm(2.0), mm(210.0), cw - mm(4.0), mm(7.0), ORANGE);
    k.text(&mut s, M + mm(6.0), mm(212.0), "Total BOM", t(10.0, WHITE).bold());
    k.text(
        &mut s,
        M + mm(6.0),
        mm(212.0),
        "~$12.80  |  Target retail: sub-$50",
        t(10.0, WHITE).bold().right(cw - mm(16.0)),
    );
    k.text_wrap(
        &mut s,
        M,
        mm(222.0),
        "4xAA batteries not included in BOM. No app, no cloud -- keeps ongoing costs at zero.",
        t(9.0, LIGHT_GRAY).max_w(cw),
    );
    k.footer(&mut s, 6, TOTAL_PAGES);
    deck.slides.push(s);

    // 7. 最難的問題
    let mut s = section_page(&k, "Hardest Problems", RED);
    let hard = [
        (
            "Film survival during rotation",
            "The soap film must survive a 175-degree arm rotation from the vat to the blow \
             position without breaking. Film thickness, rotation speed, and acceleration profile \
             all matter. Too fast and the film tears from inertia; too slow and it drains and \
             thins. Requires empirical tuning of the motor ramp curve.",
        ),
        (
            "Force-curve interpretation",
            "Classifying cycle outcomes (success, pop, no-film, partial) from noisy strain gauge \
             signals at 10-80 Hz. The HX711 output includes mechanical vibration, motor coupling, \
             and wind noise. Signal conditioning and threshold-based classification must be \
             reliable enough for the hill-climbing optimizer to converge.",
        ),
        (
            "Wind compensation at 4 kph",
            "Outdoor use means crosswind. A 4 kph breeze changes the effective airflow through \
             the soap film, shifting optimal fan speed and blow duration. The optimizer must \
             detect wind-induced pop patterns and compensate within a few cycles. No wind sensor \
             -- inferred from force-curve anomalies only.",
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
        "All three require physical prototyping. Soap film behavior cannot be fully simulated \
         -- build, measure, iterate.",
        t(11.0, ORANGE).max_w(cw - mm(8.0)).line_h(14.0),
    );
    k.footer(&mut s, 7, TOTAL_PAGES);
    deck.slides.push(s);

    // 8. 關卡結果與下一步
    let mut s = section_page(&k, "Gate Result & Next", GREEN);
    k.card(&mut s, M, mm(28.0), cw, mm(22.0), CARD_BG);
    k.card(&mut s, M + mm(4.0), mm(31.0), mm(50.0), mm(16.0), GREEN);
    k.text(&mut s, M + mm(8.0), mm(35.0), "GATE: PASS", t(16.0, WHITE).bold());
    k.text(&mut s, M + mm(8.0), mm(43.0), "62 pass / 23 N/A / 3 minor", t(9.0, WHITE));
    k.text(&mut s, M + mm(60.0), mm(36.0), "System description complete.", t(11.0, WHITE));
    k.text(
        &mut s,
        M + mm(60.0),
        mm(44.0),
        "Ready to proceed to PRD.",
        t(11.0, GREEN).bold(),
    );
    k.card(&mut s, M, mm(54.0), cw, mm(28.0), CARD_BG);
    k.text(&mut s, M + mm(4.0), mm(58.0), "KEY SPECS", t(10.0, BLUE).bold());
    k.text(
        &mut s,
        M + mm(4.0),
        mm(66.0),
        "Bubbles up to 500 mm  |  4xAA (~7 hr)  |  215x206 mm footprint",
        t(10.0, WHITE),
    );
    k.text(
        &mut s,
        M + mm(4.0),
        mm(74.0),
        "~250 mm height  |  IPX4  |  5-40 C  |  BOM ~$12.80  |  Sub-$50 retail",
        t(10.0, LIGHT_GRAY),
    );
    k.card(&mut s, M, mm(86.0), cw, mm(18.0), CARD_BG_ALT);
    k.text(&mut s, M + mm(4.0), mm(90.0), "ARCHITECTURE", t(10.0, PURPLE).bold());
    k.text(
        &mut s,
        M + mm(4.0),
        mm(98.0),
        "Strain gauge + HX711 + STM32  |  Bare-metal FW  |  No app, no cloud",
        t(10.0, WHITE),
    );
    k.bar(&mut s, M, mm(110.0), cw, mm(1.0), ORANGE);
    k.text(&mut s, M, mm(114.0), "3 MINOR GAPS", t(11.0, ORANGE).bold());
    let gaps = [
        ("Gap 1", "FW versioning scheme not yet defined"),
        ("Gap 2", "Decision consequences formatting incomplete"),
        ("Gap 3", "Schedule milestones need dates"),
    ];
    for (i, (label, desc)) in gaps.iter().enumerate() {
        let y = mm(120.0) + i as f32 * mm(14.0);
        k.card(&mut s, M, y, cw, mm(11.0), alternate(i));
        k.text(&mut s, M + mm(4.0), y + mm(3.5), label, t(9.0, ORANGE).bold());
        k.text(&mut s, M + mm(22.0), y + mm(3.5), desc, t(9.0, SOFT_WHITE));
    }
    k.bar(&mut s, M, mm(166.0), cw, mm(1.0), GREEN);
    k.text(&mut s, M, mm(170.0), "WHAT'S NEXT", t(11.0, GREEN).bold());
    let next_items = [
        "Build a functional prototype with off-the-shelf motor, fan, and HX711 breakout",
        "Validate soap film survival during arm rotation (175 deg)",
        "Test force-curve classification accuracy across soap formulations",
        "Measure wind compensation convergence at 4 kph crosswind",
        "Confirm 4xAA battery life target with real duty cycles",
    ];
    let mut ry = mm(178.0);
    for item in next_items {
        ry = k.text_wrap(
            &mut s,
            M + mm(4.0),
            ry,
            &format!("- {}", item),
            t(9.0, LIGHT_GRAY).max_w(cw - mm(8.0)).line_h(12.0),
        );
        ry += mm(1.0);
    }
    k.card(&mut s, M, mm(218.0), cw, mm(16.0), CARD_BG);
    k.text_wrap(
        &mut s,
        M + mm(4.0),
        mm(222.0),
        "Next step: build the mechanical prototype. Validate film survival, force sensing, and \
         the optimization loop before committing to PCB.",
        t(10.0, WHITE).max_w(cw - mm(8.0)).line_h(13.0),
    );
    k.footer(&mut s, 8, TOTAL_PAGES);
    deck.slides.push(s);

    deck
}

// ── 方塊圖 ──

const BD_BG: Color = Color::hex(0x1A1A2E);
const BD_TEXT: Color = Color::hex(0xE8E8E8);
const BD_SUB: Color = Color::hex(0xAAAACC);
const BD_ACCENT: Color = Color::hex(0xFF9F43);
const MECH_FILL: Color = Color::hex(0x3A5BA0);
const ELEC_FILL: Color = Color::hex(0xA05C3A);
const SENSE_FILL: Color = Color::hex(0x6B3A8A);
const POWER_FILL: Color = Color::hex(0x3A7A4A);
const UI_FILL: Color = Color::hex(0x7A7A3A);
const FLUID_FILL: Color = Color::hex(0x2A6A7A);
const SIGNAL: Color = Color::hex(0xFFDD57);
const POWER_LINE: Color = Color::hex(0x55EFC4);
const FORCE: Color = Color::hex(0x74B9FF);
const AIRFLOW: Color = Color::hex(0x81ECEC);

#[allow(clippy::too_many_arguments)]
fn block(
    panel: &mut Panel,
    x: f32,
    y: f32,
    w: f32,
    h: f32,
    label: &str,
    sublabel: &str,
    fill: Color,
    border: Option<Color>,
) {
    let pad = 0.08;
    panel.add(Mark::rounded(
        x - pad,
        y - pad,
        w + 2.0 * pad,
        h + 2.0 * pad,
        pad,
        Style::filled(fill).stroke(Stroke::new(border.unwrap_or(Color::hex(0x555577)), 1.5)),
    ));
    panel.add(Mark::Text(
        TextMark::new(x + w / 2.0, y + h / 2.0 + 0.12, label)
            .size(9.0)
            .color(BD_TEXT)
            .bold()
            .centered(),
    ));
    panel.add(Mark::Text(
        TextMark::new(x + w / 2.0, y + h / 2.0 - 0.18, sublabel)
            .size(6.5)
            .color(BD_SUB)
            .italic()
            .centered(),
    ));
}

fn link(panel: &mut Panel, from: (f32, f32), to: (f32, f32), color: Color, label: &str, curve: f32) {
    let mut arrow = ArrowMark::new(from, to, color).curve(curve);
    if !label.is_empty() {
        arrow = arrow.label(label, 6.0, 0.18);
    }
    panel.add(Mark::Arrow(arrow));
}

/// 系統方塊圖（14 × 9 in @ 180 dpi）
pub fn block_diagram() -> Figure {
    let mut fig = Figure::new(14.0, 9.0, 180.0, BD_BG);
    let mut p = Panel::new(
        Viewport {
            left: 0.01,
            bottom: 0.01,
            width: 0.98,
            height: 0.98,
        },
        (0.0, 14.0),
        (0.0, 9.0),
    );

    p.add(Mark::Text(
        TextMark::new(7.0, 8.6, "Bubbler \u{2014} System Block Diagram")
            .size(16.0)
            .color(BD_ACCENT)
            .bold()
            .centered(),
    ));
    p.add(Mark::Text(
        TextMark::new(7.0, 8.25, "Large-bubble machine with force-sensing auto-optimization")
            .size(9.0)
            .color(BD_SUB)
            .centered(),
    ));

    p.add(Mark::line(
        &[(0.3, 4.3), (13.7, 4.3)],
        Stroke::new(Color::hex(0x444466), 1.0).dash(Dash::Dashed),
    ));
    let domain = Color::hex(0x666688);
    p.add(Mark::Text(TextMark::new(0.6, 4.45, "ELECTRONIC DOMAIN").size(7.0).color(domain).bold()));
    p.add(Mark::Text(TextMark::new(0.6, 4.1, "MECHANICAL DOMAIN").size(7.0).color(domain).bold()));

    // 機構
    block(&mut p, 0.5, 0.5, 2.5, 1.2, "Open Vat", "soap solution reservoir", FLUID_FILL, None);
    block(&mut p, 4.0, 0.5, 3.0, 1.2, "Wand Arm + Loop", "160mm loop, dip-rotate pivot", MECH_FILL, None);
    block(&mut p, 8.2, 0.5, 2.8, 1.2, "Blower Fan", "60-80mm, gentle laminar flow", MECH_FILL, None);
    block(
        &mut p,
        11.5,
        0.5,
        2.0,
        1.2,
        "Bubble",
        "\u{2264}500mm, detach & float",
        Color::hex(0x3A3A5A),
        Some(BD_ACCENT),
    );
    block(&mut p, 4.0, 2.3, 2.2, 1.0, "Pivot Motor", "geared DC / servo", MECH_FILL, None);
    block(&mut p, 7.0, 2.3, 2.5, 1.0, "Strain Gauge", "on wand arm pivot", SENSE_FILL, None);

    link(&mut p, (3.0, 1.1), (4.0, 1.1), FORCE, "dip into\nsolution", 0.0);
    link(&mut p, (7.0, 1.1), (8.2, 1.1), AIRFLOW, "soap film", 0.0);
    link(&mut p, (11.0, 1.1), (11.5, 1.1), AIRFLOW, "inflate", 0.0);
    link(&mut p, (8.2, 1.5), (7.0, 1.5), AIRFLOW, "airflow", -0.15);
    link(&mut p, (5.1, 2.3), (5.5, 1.7), FORCE, "rotate", 0.0);
    link(&mut p, (7.0, 1.7), (7.8, 2.3), SIGNAL, "force signal", 0.0);

    // 電子
    block(
        &mut p,
        4.5,
        5.5,
        3.5,
        1.5,
        "MCU + Firmware",
        "control loop, optimization, state machine",
        ELEC_FILL,
        Some(BD_ACCENT),
    );
    block(&mut p, 9.0, 5.5, 2.5, 1.0, "HX711 ADC", "strain gauge amplifier", SENSE_FILL, None);
    block(&mut p, 9.0, 7.0, 2.5, 1.0, "Fan Motor Driver", "MOSFET + PWM", ELEC_FILL, None);
    block(&mut p, 1.0, 5.5, 2.5, 1.0, "Pivot Driver", "H-bridge / servo PWM", ELEC_FILL, None);
    block(
        &mut p,
        1.0,
        7.2,
        2.5,
        1.0,
        "Battery + Regulator",
        "4\u{00D7}AA or LiPo, 3.3V reg",
        POWER_FILL,
        None,
    );
    block(&mut p, 4.5, 7.5, 3.0, 0.9, "User Controls", "power btn, mode dial, LEDs", UI_FILL, None);

    link(&mut p, (8.0, 6.0), (9.0, 6.0), SIGNAL, "SPI/DOUT+SCK", 0.0);
    link(&mut p, (8.0, 6.8), (9.0, 7.3), SIGNAL, "PWM", 0.0);
    link(&mut p, (4.5, 6.0), (3.5, 6.0), SIGNAL, "PWM / DIR", 0.0);
    link(&mut p, (6.0, 7.0), (6.0, 7.5), SIGNAL, "GPIO", 0.0);
    link(&mut p, (3.5, 7.5), (4.5, 7.0), POWER_LINE, "3.3V", 0.0);
    link(&mut p, (3.5, 7.7), (9.0, 7.5), POWER_LINE, "V_bat", -0.1);
    link(&mut p, (2.25, 7.2), (2.25, 6.5), POWER_LINE, "V_bat", 0.0);

    // 跨領域
    link(&mut p, (2.25, 5.5), (4.5, 3.3), POWER_LINE, "motor power", 0.2);
    link(&mut p, (10.25, 7.0), (9.6, 1.7), POWER_LINE, "motor power", -0.3);
    link(&mut p, (8.5, 3.3), (10.0, 5.5), SIGNAL, "analog mV", -0.15);

    let legend = [
        (SIGNAL, "Signal / Data"),
        (POWER_LINE, "Power"),
        (FORCE, "Mechanical Force"),
        (AIRFLOW, "Airflow / Fluid"),
    ];
    for (i, (color, label)) in legend.iter().enumerate() {
        let x = 1.5 + i as f32 * 3.2;
        p.add(Mark::line(&[(x - 0.3, 0.15), (x + 0.3, 0.15)], Stroke::new(*color, 2.0)));
        p.add(Mark::Text(
            TextMark::new(x + 0.5, 0.15, *label)
                .size(7.0)
                .color(*color)
                .valign(VAlign::Center),
        ));
    }

    fig.panels.push(p);
    fig
}

// ── 元件配置圖 ──

const AR_MECH: Color = Color::hex(0x1A5276);
const AR_ELEC: Color = Color::hex(0xC0392B);
const AR_SENSE: Color = Color::hex(0x7D3C98);
const AR_POWER: Color = Color::hex(0x27AE60);
const AR_FLOW: Color = Color::hex(0x2E86C1);
const AR_STRUCT: Color = Color::hex(0x5D6D7E);
const AR_TEXT: Color = Color::hex(0x1A1A1A);
const AR_ACCENT: Color = Color::hex(0xD35400);
const AR_AIR: Color = Color::hex(0x0E6655);
const AR_WAND: Color = Color::hex(0x2471A3);
const AR_LOOP: Color = Color::hex(0x1A5276);
const AR_WIRE: Color = Color::hex(0xB9770E);
const SOLUTION: Color = Color::hex(0x85C1E9);
const DUCT_FILL: Color = Color::hex(0xD5E8F0);

/// 1 個資料單位 = 12 mm
const S: f32 = 1.0 / 12.0;

struct Dims {
    base_thick: f32,
    vat_depth: f32,
    vat_wall: f32,
    clearance: f32,
    arm_len: f32,
    loop_diam: f32,
    loop_r: f32,
    duct_r: f32,
    prot_top_half: f32,
    sol_depth: f32,
    foot_h: f32,
}

const DIMS: Dims = Dims {
    base_thick: 10.0 * S,
    vat_depth: 20.0 * S,
    vat_wall: 3.0 * S,
    clearance: 5.0 * S,
    arm_len: 30.0 * S,
    loop_diam: 160.0 * S,
    loop_r: 80.0 * S,
    duct_r: 20.0 * S,
    // 40 mm 風管加上兩側各 10 mm 間隙
    prot_top_half: (40.0 * S + 2.0 * 10.0 * S) / 2.0,
    sol_depth: 12.0 * S,
    foot_h: 5.0 * S,
};

fn panel_titles(panel: &mut Panel, title: &str, sub: &str) {
    let (x0, x1) = panel.x_range;
    let top = panel.y_range.1;
    let mid = (x0 + x1) / 2.0;
    panel.add(Mark::Text(
        TextMark::new(mid, top - 0.3, title)
            .size(13.0)
            .color(AR_ACCENT)
            .bold()
            .align(Align::Center),
    ));
    panel.add(Mark::Text(
        TextMark::new(mid, top - 0.9, sub)
            .size(8.0)
            .color(Color::hex(0x555555))
            .italic()
            .align(Align::Center),
    ));
}

#[allow(clippy::too_many_arguments)]
fn rbox(
    panel: &mut Panel,
    x: f32,
    y: f32,
    w: f32,
    h: f32,
    label: &str,
    sub: &str,
    fill: Color,
    border: Option<Color>,
    size: f32,
) {
    let pad = 0.04;
    panel.add(Mark::rounded(
        x - pad,
        y - pad,
        w + 2.0 * pad,
        h + 2.0 * pad,
        pad,
        Style::filled(fill)
            .opacity(0.85)
            .stroke(Stroke::new(border.unwrap_or(Color::hex(0x667788)), 1.2).opacity(0.85)),
    ));
    panel.add(Mark::Text(
        TextMark::new(x + w / 2.0, y + h / 2.0 + 0.1, label)
            .size(size)
            .color(AR_TEXT)
            .bold()
            .centered(),
    ));
    if !sub.is_empty() {
        panel.add(Mark::Text(
            TextMark::new(x + w / 2.0, y + h / 2.0 - 0.2, sub)
                .size(5.0)
                .color(Color::hex(0x666666))
                .centered(),
        ));
    }
}

#[derive(Clone, Copy)]
enum LabelSide {
    Auto,
    Left,
    Right,
}

fn dimline(panel: &mut Panel, from: (f32, f32), to: (f32, f32), label: &str, side: LabelSide) {
    let off = 0.2;
    panel.add(Mark::Arrow(
        ArrowMark::new(from, to, AR_ACCENT).width(0.9).head(ArrowHead::Both),
    ));
    let (mx, my) = ((from.0 + to.0) / 2.0, (from.1 + to.1) / 2.0);
    let text = TextMark::new(mx, my, label).size(6.0).color(AR_ACCENT);
    let horizontal = (to.0 - from.0).abs() > (to.1 - from.1).abs();
    let text = match side {
        LabelSide::Left => TextMark {
            x: mx - off - 0.1,
            ..text.align(Align::Right).valign(VAlign::Center)
        },
        LabelSide::Right => TextMark {
            x: mx + off + 0.1,
            ..text.valign(VAlign::Center)
        },
        LabelSide::Auto if horizontal => TextMark {
            y: my + off,
            ..text.align(Align::Center)
        },
        LabelSide::Auto => TextMark {
            x: mx + off + 0.1,
            ..text.valign(VAlign::Center)
        },
    };
    panel.add(Mark::Text(text));
}

fn flow(panel: &mut Panel, from: (f32, f32), to: (f32, f32), label: &str) {
    panel.add(Mark::Arrow(ArrowMark::new(from, to, AR_AIR).width(1.8)));
    if !label.is_empty() {
        let (mx, my) = ((from.0 + to.0) / 2.0, (from.1 + to.1) / 2.0);
        panel.add(Mark::Text(
            TextMark::new(mx, my + 0.25, label)
                .size(5.5)
                .color(AR_AIR)
                .align(Align::Center),
        ));
    }
}

fn rubber_feet(panel: &mut Panel, left: f32, width: f32) {
    for fx in [left + 0.3, left + width - 0.3] {
        panel.add(Mark::rounded(
            fx - 0.27,
            -0.02,
            0.54,
            DIMS.foot_h + 0.04,
            0.02,
            Style::filled(Color::hex(0x888888)).stroke(Stroke::new(Color::hex(0x555555), 1.0)),
        ));
    }
}

/// U 形水槽剖面與槽內肥皂水
fn vat_profile(panel: &mut Panel, x: f32, y: f32, width: f32) {
    let d = &DIMS;
    let right = x + width;
    panel.add(Mark::Polygon {
        points: vec![
            (x, y),
            (right, y),
            (right, y + d.vat_depth),
            (right - d.vat_wall, y + d.vat_depth),
            (right - d.vat_wall, y + d.vat_wall),
            (x + d.vat_wall, y + d.vat_wall),
            (x + d.vat_wall, y + d.vat_depth),
            (x, y + d.vat_depth),
        ],
        style: Style::filled(AR_FLOW).opacity(0.6),
    });
    panel.add(Mark::rect(
        x + d.vat_wall,
        y + d.vat_wall,
        width - 2.0 * d.vat_wall,
        d.sol_depth,
        Style::filled(SOLUTION).opacity(0.3),
    ));
}

fn base_plate(panel: &mut Panel, x: f32, width: f32, label: &str) {
    let d = &DIMS;
    panel.add(Mark::rect(
        x,
        d.foot_h,
        width,
        d.base_thick,
        Style::filled(AR_STRUCT)
            .opacity(0.85)
            .stroke(Stroke::new(Color::hex(0x444444), 1.2)),
    ));
    panel.add(Mark::Text(
        TextMark::new(x + width / 2.0, d.foot_h + d.base_thick / 2.0, label)
            .size(6.0)
            .color(AR_TEXT)
            .align(Align::Center),
    ));
}

fn lerp(a: f32, b: f32, t: f32) -> f32 {
    a + t * (b - a)
}

fn side_section() -> Panel {
    let d = &DIMS;
    let mut p = Panel::new(
        Viewport {
            left: 0.01,
            bottom: 0.04,
            width: 0.48,
            height: 0.91,
        },
        (-3.0, 22.0),
        (-2.0, 22.0),
    )
    .equal_aspect()
    .background(Color::WHITE);
    panel_titles(
        &mut p,
        "Side Cross-Section",
        "Looking along long axis \u{2014} shaft on right, tapered protrusion with duct",
    );

    let vat_short = 170.0 * S;
    let base_short = vat_short + 2.0 * d.vat_wall + 60.0 * S + 10.0 * S;
    let base_x = 0.5;

    rubber_feet(&mut p, base_x, base_short);
    base_plate(&mut p, base_x, base_short, "BASE");

    let vat_ext = vat_short + 2.0 * d.vat_wall;
    let vat_x = base_x + 3.0 * S;
    let vat_y = d.foot_h + d.base_thick;
    let vat_right = vat_x + vat_ext;
    vat_profile(&mut p, vat_x, vat_y, vat_ext);
    p.add(Mark::Text(
        TextMark::new((vat_x + vat_right) / 2.0, vat_y + d.vat_depth / 2.0, "VAT (170mm)")
            .size(6.0)
            .color(AR_TEXT)
            .bold()
            .align(Align::Center),
    ));

    // 轉軸在右側，緊鄰凸出部
    let shaft_y = vat_y + d.vat_depth + d.clearance;
    let shaft_x = vat_right - 5.0 * S;
    p.add(Mark::Marker {
        x: shaft_x,
        y: shaft_y,
        shape: MarkerShape::Circle,
        size: 9.0,
        color: AR_ACCENT,
    });
    p.add(Mark::Text(
        TextMark::new(shaft_x + 0.4, shaft_y + 0.2, "shaft")
            .size(5.5)
            .color(AR_ACCENT)
            .bold(),
    ));

    // 吹氣位置：手臂朝正上方
    let arm_tip_y = shaft_y + d.arm_len;
    p.add(Mark::line(&[(shaft_x, shaft_y), (shaft_x, arm_tip_y)], Stroke::new(AR_WAND, 4.0)));
    let loop_bot = arm_tip_y;
    let loop_top = arm_tip_y + d.loop_diam;
    let loop_center_y = (loop_bot + loop_top) / 2.0;
    p.add(Mark::line(&[(shaft_x, loop_bot), (shaft_x, loop_top)], Stroke::new(AR_LOOP, 3.0)));
    p.add(Mark::Text(
        TextMark::new(shaft_x - 0.5, loop_center_y, "loop\n(edge-on)\n160mm")
            .size(5.5)
            .color(AR_LOOP)
            .bold()
            .align(Align::Right),
    ));
    p.add(Mark::Marker {
        x: shaft_x,
        y: loop_center_y,
        shape: MarkerShape::Plus,
        size: 8.0,
        color: AR_LOOP,
    });

    // 沾液位置：旋轉 175° 到 265°
    let dip = 265f32.to_radians();
    let dip_x = shaft_x + d.arm_len * dip.cos();
    let dip_y = shaft_y + d.arm_len * dip.sin();
    p.add(Mark::line(
        &[(shaft_x, shaft_y), (dip_x, dip_y)],
        Stroke::new(AR_WAND, 2.0).dash(Dash::Dashed).opacity(0.35),
    ));
    let loop_flat_y = vat_y + d.vat_wall + 0.02;
    p.add(Mark::line(
        &[(dip_x - d.loop_r, loop_flat_y), (dip_x + d.loop_r * 0.5, loop_flat_y)],
        Stroke::new(AR_LOOP, 2.5).dash(Dash::Dashed).opacity(0.35),
    ));
    p.add(Mark::Text(
        TextMark::new(dip_x - d.loop_r * 0.3, loop_flat_y + 0.2, "loop flat (dip)")
            .size(5.0)
            .color(AR_LOOP)
            .opacity(0.5)
            .align(Align::Center),
    ));

    let arc_r = d.arm_len * 1.5;
    p.add(Mark::Arc {
        cx: shaft_x,
        cy: shaft_y,
        r: arc_r,
        theta1: 90.0,
        theta2: 265.0,
        stroke: Stroke::new(AR_ACCENT, 1.3).dash(Dash::Dotted),
    });
    p.add(Mark::Text(
        TextMark::new(shaft_x - arc_r * 0.9, shaft_y - arc_r * 0.3, "175\u{00B0}")
            .size(5.5)
            .color(AR_ACCENT),
    ));

    p.add(Mark::Marker {
        x: shaft_x - 0.15,
        y: shaft_y + 0.2,
        shape: MarkerShape::Square,
        size: 5.0,
        color: AR_SENSE,
    });
    p.add(Mark::Text(
        TextMark::new(shaft_x - 0.6, shaft_y + 0.25, "strain\ngauge")
            .size(4.5)
            .color(AR_SENSE)
            .align(Align::Right),
    ));

    // 梯形凸出部：底寬、頂端收窄到風管加間隙
    let prot_base_left = vat_right + 2.0 * S;
    let prot_base_right = base_x + base_short - 2.0 * S;
    let prot_center_x = (prot_base_left + prot_base_right) / 2.0;
    let prot_top_left = prot_center_x - d.prot_top_half;
    let prot_top_right = prot_center_x + d.prot_top_half;
    let prot_bot_y = vat_y;
    let prot_top_y = loop_center_y + d.duct_r + 15.0 * S;
    p.add(Mark::Polygon {
        points: vec![
            (prot_base_left, prot_bot_y),
            (prot_base_right, prot_bot_y),
            (prot_top_right, prot_top_y),
            (prot_top_left, prot_top_y),
        ],
        style: Style::filled(Color::hex(0xE0E0E0))
            .opacity(0.5)
            .stroke(Stroke::new(AR_STRUCT, 2.5).opacity(0.5)),
    });
    p.add(Mark::Text(
        TextMark::new(prot_center_x, prot_top_y + 0.3, "TAPERED PROTRUSION")
            .size(6.0)
            .color(AR_STRUCT)
            .bold()
            .align(Align::Center),
    ));

    let batt_w = (prot_base_right - prot_base_left) - 2.0 * S;
    let batt_h = 15.0 * S;
    let batt_x = prot_base_left + S;
    let batt_y = prot_bot_y + 2.0 * S;
    rbox(&mut p, batt_x, batt_y, batt_w, batt_h, "Battery", "4\u{00D7}AA", AR_POWER, None, 6.0);

    let pcba_w = batt_w - 2.0 * S;
    let pcba_h = 10.0 * S;
    let pcba_x = batt_x + S;
    let pcba_y = batt_y + batt_h + 2.0 * S;
    rbox(&mut p, pcba_x, pcba_y, pcba_w, pcba_h, "PCBA", "MCU, HX711", AR_ELEC, None, 6.0);

    let motor_w = 15.0 * S;
    let motor_h = 12.0 * S;
    let motor_x = prot_base_left + S;
    let motor_y = shaft_y - motor_h / 2.0;
    rbox(&mut p, motor_x, motor_y, motor_w, motor_h, "Motor", "on rim", AR_MECH, None, 5.0);
    p.add(Mark::line(
        &[(motor_x, shaft_y), (shaft_x, shaft_y)],
        Stroke::new(AR_MECH, 1.5).dash(Dash::Dotted).opacity(0.6),
    ));

    // 風扇所在高度的凸出部寬度
    let fan_y = prot_top_y - 15.0 * S;
    let t_fan = (fan_y - prot_bot_y) / (prot_top_y - prot_bot_y);
    let fan_left = lerp(prot_base_left, prot_top_left, t_fan);
    let fan_right = lerp(prot_base_right, prot_top_right, t_fan);
    let fan_w = (fan_right - fan_left) - 2.0 * S;
    let fan_x = fan_left + S;
    rbox(
        &mut p,
        fan_x,
        fan_y,
        fan_w,
        10.0 * S,
        "Fan",
        "on rim",
        AR_MECH,
        Some(Color::hex(0x5588CC)),
        5.5,
    );

    // 水平風管：從凸出部吹向環中心
    let duct_y = loop_center_y;
    let duct_left = shaft_x + 0.3;
    let t_duct = (duct_y - prot_bot_y) / (prot_top_y - prot_bot_y);
    let duct_right = lerp(prot_base_left, prot_top_left, t_duct);
    p.add(Mark::rect(
        duct_left,
        duct_y - d.duct_r,
        duct_right - duct_left,
        2.0 * d.duct_r,
        Style::filled(DUCT_FILL).opacity(0.3),
    ));
    for edge in [duct_y + d.duct_r, duct_y - d.duct_r] {
        p.add(Mark::line(&[(duct_left, edge), (duct_right, edge)], Stroke::new(AR_MECH, 2.0)));
    }
    p.add(Mark::Text(
        TextMark::new((duct_left + duct_right) / 2.0, duct_y, "DUCT\n\u{00D8}40")
            .size(5.5)
            .color(AR_MECH)
            .bold()
            .centered(),
    ));
    for x in [prot_center_x - d.duct_r, prot_center_x + d.duct_r] {
        p.add(Mark::line(
            &[(x, fan_y), (x, duct_y + d.duct_r)],
            Stroke::new(AR_MECH, 1.5).opacity(0.4),
        ));
    }

    flow(&mut p, (duct_right - 0.5, duct_y), (duct_left + 0.2, duct_y), "air \u{2192}");
    flow(
        &mut p,
        (prot_center_x, fan_y - 0.1),
        (prot_center_x, duct_y + d.duct_r + 0.5),
        "\u{2193}",
    );

    let wire = Stroke::new(AR_WIRE, 1.0).dash(Dash::DashDot).opacity(0.6);
    p.add(Mark::line(
        &[(pcba_x + pcba_w * 0.3, pcba_y + pcba_h), (motor_x + motor_w * 0.5, motor_y)],
        wire,
    ));
    p.add(Mark::line(
        &[(pcba_x + pcba_w * 0.6, pcba_y + pcba_h), (fan_x + fan_w * 0.3, fan_y)],
        wire,
    ));

    // 左側最小框緣
    let rim_lx = vat_x - 3.0 * S;
    let rim_top = shaft_y + 10.0 * S;
    p.add(Mark::line(
        &[(rim_lx, vat_y), (rim_lx, rim_top), (vat_right, rim_top)],
        Stroke::new(AR_STRUCT, 2.5),
    ));
    p.add(Mark::Text(
        TextMark::new(rim_lx - 0.15, (vat_y + rim_top) / 2.0, "rim\n(min)")
            .size(5.0)
            .color(AR_STRUCT)
            .align(Align::Right)
            .valign(VAlign::Center),
    ));

    dimline(
        &mut p,
        (-2.0, 0.0),
        (-2.0, prot_top_y),
        &format!("~{}mm", (prot_top_y / S) as i32),
        LabelSide::Left,
    );
    dimline(
        &mut p,
        (-2.0, 0.0),
        (-2.0, loop_top),
        &format!("~{}mm\nloop top", (loop_top / S) as i32),
        LabelSide::Left,
    );
    dimline(
        &mut p,
        (vat_x + d.vat_wall, -1.2),
        (vat_right - d.vat_wall, -1.2),
        "170mm (vat)",
        LabelSide::Auto,
    );
    dimline(
        &mut p,
        (base_x, -0.5),
        (base_x + base_short, -0.5),
        &format!("{}mm (base)", (base_short / S) as i32),
        LabelSide::Auto,
    );
    dimline(
        &mut p,
        (20.5, vat_y),
        (20.5, vat_y + d.vat_depth),
        "20mm",
        LabelSide::Right,
    );
    dimline(
        &mut p,
        (prot_top_left, prot_top_y + 0.5),
        (prot_top_right, prot_top_y + 0.5),
        &format!("{}mm (duct+clr)", (d.prot_top_half * 2.0 / S) as i32),
        LabelSide::Auto,
    );

    let note_at = (shaft_x - d.loop_r - 2.0, loop_top + 1.0);
    p.add(Mark::Arrow(
        ArrowMark::new(note_at, (shaft_x - d.loop_r, loop_top + 0.3), AR_ACCENT)
            .width(1.2)
            .head(ArrowHead::Open),
    ));
    p.add(Mark::Text(
        TextMark::new(note_at.0, note_at.1, "bubbles inflate\ninto page \u{2297}")
            .size(7.0)
            .color(AR_ACCENT)
            .bold()
            .align(Align::Center),
    ));

    p
}

fn front_view() -> Panel {
    let d = &DIMS;
    let mut p = Panel::new(
        Viewport {
            left: 0.51,
            bottom: 0.04,
            width: 0.48,
            height: 0.91,
        },
        (-3.0, 20.0),
        (-2.0, 22.0),
    )
    .equal_aspect()
    .background(Color::WHITE);
    panel_titles(
        &mut p,
        "Front View",
        "Looking along airflow (short axis) \u{2014} duct exit concentric with loop",
    );

    let fb_w = 215.0 * S;
    let fb_x = 0.5;
    rubber_feet(&mut p, fb_x, fb_w);
    base_plate(&mut p, fb_x, fb_w, "BASE (215mm)");

    let fvt = 200.0 * S + 2.0 * d.vat_wall;
    let fvx = fb_x + (fb_w - fvt) / 2.0;
    let fvy = d.foot_h + d.base_thick;
    vat_profile(&mut p, fvx, fvy, fvt);
    p.add(Mark::Text(
        TextMark::new(fvx + fvt / 2.0, fvy + d.vat_depth / 2.0, "VAT (200mm)")
            .size(6.0)
            .color(AR_TEXT)
            .bold()
            .align(Align::Center),
    ));

    // 橫跨水槽的轉軸
    let fs_y = fvy + d.vat_depth + d.clearance;
    let fs_x1 = fvx + 3.0 * S;
    let fs_x2 = fvx + fvt - 3.0 * S;
    p.add(Mark::line(&[(fs_x1, fs_y), (fs_x2, fs_y)], Stroke::new(AR_ACCENT, 3.0)));
    p.add(Mark::Text(
        TextMark::new((fs_x1 + fs_x2) / 2.0, fs_y + 0.25, "SHAFT (~180mm)")
            .size(6.0)
            .color(AR_ACCENT)
            .bold()
            .align(Align::Center),
    ));
    for bx in [fs_x1, fs_x2] {
        p.add(Mark::Marker {
            x: bx,
            y: fs_y,
            shape: MarkerShape::Square,
            size: 6.0,
            color: AR_STRUCT,
        });
    }

    let arm_top = fs_y + d.arm_len;
    let loop_cx = (fs_x1 + fs_x2) / 2.0;
    p.add(Mark::line(&[(loop_cx, fs_y), (loop_cx, arm_top)], Stroke::new(AR_WAND, 3.5)));

    let loop_cy = arm_top + d.loop_r;
    p.add(Mark::Circle {
        cx: loop_cx,
        cy: loop_cy,
        r: d.loop_r,
        style: Style::outlined(Stroke::new(AR_LOOP, 3.0)),
    });
    p.add(Mark::Text(
        TextMark::new(loop_cx, loop_cy + d.loop_r * 0.35, "160mm \u{00D8} loop")
            .size(7.0)
            .color(AR_LOOP)
            .bold()
            .align(Align::Center),
    ));

    p.add(Mark::Circle {
        cx: loop_cx,
        cy: loop_cy,
        r: d.duct_r,
        style: Style::filled(DUCT_FILL)
            .opacity(0.6)
            .stroke(Stroke::new(AR_AIR, 2.5).opacity(0.6)),
    });
    p.add(Mark::Text(
        TextMark::new(loop_cx, loop_cy, "DUCT\n\u{00D8}40")
            .size(6.5)
            .color(AR_AIR)
            .bold()
            .centered(),
    ));

    // 每 45° 一支放射狀氣流箭頭
    for step in 0..8 {
        let a = (step as f32 * 45.0).to_radians();
        p.add(Mark::Arrow(
            ArrowMark::new(
                (loop_cx + d.duct_r * 0.6 * a.cos(), loop_cy + d.duct_r * 0.6 * a.sin()),
                (loop_cx + d.loop_r * 0.85 * a.cos(), loop_cy + d.loop_r * 0.85 * a.sin()),
                AR_AIR,
            )
            .width(0.8)
            .opacity(0.5),
        ));
    }
    p.add(Mark::Text(
        TextMark::new(loop_cx, loop_cy - d.loop_r - 0.5, "air disperses through film")
            .size(5.5)
            .color(AR_AIR)
            .italic()
            .align(Align::Center),
    ));

    let fp_top = loop_cy + d.duct_r + 15.0 * S;
    let fp_left_bot = fvx + 2.0 * S;
    let fp_right_bot = fvx + fvt - 2.0 * S;
    p.add(Mark::Polygon {
        points: vec![
            (fp_left_bot, fvy),
            (fp_right_bot, fvy),
            (loop_cx + d.prot_top_half, fp_top),
            (loop_cx - d.prot_top_half, fp_top),
        ],
        style: Style::outlined(Stroke::new(AR_STRUCT, 1.5).dash(Dash::Dashed).opacity(0.4)),
    });
    p.add(Mark::Text(
        TextMark::new(fp_right_bot + 0.5, fp_top - 1.0, "protrusion\n(behind)")
            .size(5.0)
            .color(AR_STRUCT)
            .opacity(0.5),
    ));

    dimline(
        &mut p,
        (fvx + d.vat_wall, -1.0),
        (fvx + fvt - d.vat_wall, -1.0),
        "200mm (vat long)",
        LabelSide::Auto,
    );
    dimline(&mut p, (fb_x, -0.3), (fb_x + fb_w, -0.3), "215mm (base)", LabelSide::Auto);
    dimline(
        &mut p,
        (-2.0, 0.0),
        (-2.0, loop_cy + d.loop_r),
        &format!("~{}mm", ((loop_cy + d.loop_r) / S) as i32),
        LabelSide::Left,
    );

    let note_at = (loop_cx + d.loop_r + 2.0, loop_cy + d.loop_r * 0.3);
    p.add(Mark::Arrow(
        ArrowMark::new(note_at, (loop_cx + d.loop_r, loop_cy), AR_ACCENT)
            .width(1.2)
            .head(ArrowHead::Open),
    ));
    p.add(Mark::Text(
        TextMark::new(note_at.0, note_at.1, "bubbles toward viewer \u{2299}")
            .size(7.0)
            .color(AR_ACCENT)
            .bold()
            .align(Align::Center),
    ));

    p
}

/// 側剖面與正視圖（18 × 13 in @ 180 dpi）
pub fn arrangement() -> Figure {
    let mut fig = Figure::new(18.0, 13.0, 180.0, Color::hex(0xF0F0F0));
    fig.panels.push(side_section());
    fig.panels.push(front_view());

    let legend = [
        (AR_MECH, "Mechanical"),
        (AR_ELEC, "Electronic"),
        (AR_SENSE, "Sensing"),
        (AR_POWER, "Power"),
        (AR_FLOW, "Vat / Fluid"),
        (AR_STRUCT, "Structure"),
        (AR_AIR, "Airflow / Duct"),
        (AR_WAND, "Wand Arm"),
        (AR_LOOP, "Loop"),
    ];
    for (i, (color, label)) in legend.iter().enumerate() {
        let (col, row) = (i % 5, i / 5);
        fig.texts.push(
            TextMark::new(
                0.06 + col as f32 * 0.19,
                0.025 - row as f32 * 0.018,
                format!("\u{25A0} {}", label),
            )
            .size(7.5)
            .color(*color)
            .bold()
            .valign(VAlign::Center),
        );
    }
    fig.texts.push(
        TextMark::new(0.5, 0.98, "Bubbler \u{2014} Component Arrangement (Side + Front Views)")
            .size(15.0)
            .color(AR_ACCENT)
            .bold()
            .align(Align::Center)
            .valign(VAlign::Top),
    );
    fig
}

const CHAT_PROMPT_PREFIX: &str = r#"I've attached a technical arrangement diagram of my product as a reference image. Use it as the basis for the component layout, proportions, and spatial relationships.

Now create two BEAUTIFUL, DETAILED illustrations of this automated soap bubble machine called "Bubbler":

1. A detailed SIDE CROSS-SECTION ILLUSTRATION (matching the "Side Cross-Section" view in the reference diagram) rendered as a polished product cutaway — not a schematic, but an artist's technical illustration with realistic materials and shading. Show:
   - The flat base plate with rubber feet at corners
   - The shallow oval vat on top filled with blue soap solution
   - The tapered protrusion on the right side (wide at base, narrow at top) — CUT AWAY to reveal internal components stacked vertically: battery pack at bottom, green circuit board (PCBA) above, small motor, and centrifugal fan near top
   - The L-shaped air duct bending from the fan to exit horizontally
   - The rotating shaft with wand arm and wire loop standing upright above the vat (in blow position)
   - A dashed arc showing the loop's rotation path down into the vat
   - A translucent soap bubble being inflated from the loop
   - Clean component labels with thin leader lines
   Style: Professional product cutaway illustration, realistic materials (gray plastic enclosure, blue soap solution, green PCB, copper/silver metallic parts), warm lighting

2. An ISOMETRIC PRODUCT CONCEPT showing the finished exterior on a wooden outdoor table in a park:
   - The compact device with open oval vat (iridescent soap surface)
   - Tapered dark housing on one side
   - Wire loop standing upright with a large rainbow-reflecting soap bubble (~400mm) floating away
   - Warm afternoon sunlight, green grass background
   Style: Photorealistic product rendering, consumer electronics quality

Here are the design documents:

"#;

const CROSS_SECTION_PROMPT: &str = r#"Create a detailed technical SIDE CROSS-SECTION illustration of an automated soap bubble machine called "Bubbler". Engineering cutaway style, clean labels, white background.

The device viewed from the side (looking along its long axis):
- FLAT BASE PLATE at the bottom (215x206mm footprint) with 4 rubber leveling feet at corners
- On top of the base: a SHALLOW OVAL VAT (200x170mm, 20mm deep) filled with blue-tinted soap solution
- On the RIGHT SIDE: a TAPERED ENCLOSURE PROTRUSION (inverse-U rim) — wide at the base (~80mm), narrowing to ~60mm at the top. This protrusion is cut away to reveal internal components stacked vertically:
  - Near the base: 4xAA BATTERY HOLDER (2x2 flat arrangement)
  - Above batteries: MAIN PCB (50x35mm, green circuit board with labeled chips: MCU, HX711, H-bridge)
  - At shaft height: small GEARED DC MOTOR
  - Near the top: flat CENTRIFUGAL BLOWER FAN (40x40x10mm)
  - An L-SHAPED AIR DUCT from the fan bending 90° to exit horizontally through a round 40mm outlet
- LEFT SIDE of rim is minimal (~15mm above vat)
- A ROTATING SHAFT spans across the top of the vat, with a small pivot bearing on each side
- From the shaft, a 30mm WAND ARM extends left, with a 160mm FLEXIBLE WIRE LOOP at the end shown as a vertical line (edge-on view) standing upright above the vat (blow position)
- A DASHED ARC shows the loop's rotation path: ~175° from vertical (upright, blow position) sweeping down-left into the vat (dip position)
- The AIR DUCT EXIT is horizontally aligned with the center of the upright loop
- A small STRAIN GAUGE shown bonded near the shaft bearing
- Label every component clearly with leader lines

Style: Technical product illustration, clean engineering cutaway, precise proportions, white/light background, colored components (blue for mechanical, orange for electronics, green for PCB, gray for enclosure)."#;

const ISOMETRIC_PROMPT: &str = r#"Create a photorealistic ISOMETRIC PRODUCT CONCEPT illustration of an automated soap bubble machine called "Bubbler" on a wooden outdoor table in a sunny park setting.

The device is a compact tabletop machine (~215x206mm footprint, ~250mm tall):
- A flat rectangular BASE in matte dark gray plastic with small rubber feet
- On top: an OPEN OVAL VAT filled with iridescent soap solution (shimmering rainbow surface)
- On one long side: a TAPERED HOUSING/PROTRUSION in dark gray plastic — wider at the base, narrowing toward the top, with subtle ventilation grilles and two small buttons (one green LED glowing)
- Rising from the top of the housing: a thin metal WAND ARM with a large circular WIRE LOOP (160mm diameter) standing upright above the vat
- A large, beautiful SOAP BUBBLE (~400mm) being inflated from the loop, catching rainbow light refractions
- The round air duct outlet visible on the housing, pointing at the loop center
- Clean, modern consumer product design — think Apple-like simplicity in dark gray/charcoal plastic
- Outdoor setting: wooden picnic table, green grass, warm afternoon sunlight, maybe a child's hand reaching toward the bubble in the background (blurred)

Style: Photorealistic product rendering, warm natural lighting, shallow depth of field on background."#;

#[cfg(test)]
mod tests {
    use super::*;
    use crate::domain::deck::Shape;

    #[test]
    fn test_carousel_has_eight_numbered_pages() {
        let deck = carousel();
        assert_eq!(deck.slides.len(), TOTAL_PAGES);
        for (i, slide) in deck.slides.iter().enumerate() {
            let footer = format!("{}/{}", i + 1, TOTAL_PAGES);
            assert!(slide.text_content().contains(&footer.as_str()));
        }
    }

    #[test]
    fn test_carousel_embeds_arrangement_diagram() {
        let deck = carousel();
        let paths = deck.image_paths();
        assert_eq!(paths.len(), 1);
        assert!(paths[0].ends_with(ARRANGEMENT_FILE));
        let on_architecture_page = deck.slides[3]
            .shapes
            .iter()
            .any(|s| matches!(s, Shape::Image { .. }));
        assert!(on_architecture_page);
    }

    #[test]
    fn test_figure_sizes() {
        assert_eq!(block_diagram().pixel_size(), (2520, 1620));
        assert_eq!(arrangement().pixel_size(), (3240, 2340));
        assert_eq!(arrangement().panels.len(), 2);
    }

    #[test]
    fn test_chat_illustration_uses_reference_diagram() {
        let spec = Bubbler.chat_illustration().unwrap();
        assert_eq!(spec.design_files.len(), 2);
        assert_eq!(spec.reference_image.as_deref(), Some("bubbler/arrangement_options.png"));
        assert!(spec.prompt_prefix.ends_with("design documents:\n\n"));
    }

    #[test]
    fn test_two_api_images() {
        let images = Bubbler.api_images();
        assert_eq!(images.len(), 2);
        assert_ne!(images[0].output_file, images[1].output_file);
    }
}
