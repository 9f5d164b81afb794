//! ChillStream：相變蓄冷飲水機的主管簡報與剖面圖。

use super::{product_path, ConceptProduct, DeckSpec, DiagramSpec};
use crate::app::layout::{Para, SlideKit, TextSpec};
use crate::config::toml_config::RenderConfig;
use crate::domain::deck::{inches, Deck, Frame, Slide};
use crate::domain::figure::{
    ArrowHead, ArrowMark, CalloutMark, Dash, Figure, Mark, Panel, Stroke, Style, TextMark, VAlign,
    Viewport,
};
use crate::domain::model::{Align, ArtifactKind, Color};

const KEY: &str = "chillstream";
const CROSS_SECTION_FILE: &str = "cross_section.png";
/// 剖面圖尺寸（英吋），簡報內嵌時依此維持比例
const CROSS_SECTION_SIZE: (f32, f32) = (20.0, 26.0);

const DARK_BG: Color = Color::hex(0x1A1A2E);
const BLUE: Color = Color::hex(0x009BF5);
const CYAN: Color = Color::hex(0x00D4AA);
const WHITE: Color = Color::WHITE;
const LIGHT_GRAY: Color = Color::hex(0xBBBBCC);
const ORANGE: Color = Color::hex(0xFF8C00);
const RED: Color = Color::hex(0xFF4545);
const SOFT_WHITE: Color = Color::hex(0xF0F0F5);
const CARD: Color = Color::hex(0x22223A);
const CARD_ALT: Color = Color::hex(0x1E1E34);
const RULE: Color = Color::hex(0x333355);
const NOTE_BG: Color = Color::hex(0x181828);

pub struct ChillStream;

impl ConceptProduct for ChillStream {
    fn key(&self) -> &'static str {
        KEY
    }

    fn display_name(&self) -> &'static str {
        "ChillStream"
    }

    fn decks(&self) -> Vec<DeckSpec> {
        vec![DeckSpec {
            stem: product_path(KEY, "ChillStream_Executive_Deck"),
            formats: vec![ArtifactKind::Pptx],
            deck: executive_deck(),
        }]
    }

    fn diagrams(&self, render: &RenderConfig) -> Vec<DiagramSpec> {
        vec![DiagramSpec {
            name: "cross_section",
            file: product_path(KEY, CROSS_SECTION_FILE),
            figure: cross_section(render.cross_section_dpi),
        }]
    }
}

fn t(size: f32, color: Color) -> TextSpec {
    TextSpec::new(size, color)
}

fn right(spec: TextSpec) -> TextSpec {
    TextSpec {
        align: Align::Right,
        ..spec
    }
}

fn center(spec: TextSpec) -> TextSpec {
    TextSpec {
        align: Align::Center,
        ..spec
    }
}

/// 以英吋為單位的簡報頁
struct Page {
    kit: SlideKit,
    slide: Slide,
}

impl Page {
    fn titled(kit: SlideKit, title: &str, stripe: Color) -> Self {
        let mut page = Self {
            kit,
            slide: kit.page(),
        };
        page.kit.stripe(&mut page.slide, stripe);
        page.text(0.8, 0.4, 11.0, title, t(36.0, WHITE).bold());
        page
    }

    fn rect(&mut self, x: f32, y: f32, w: f32, h: f32, color: Color) {
        self.kit
            .rect(&mut self.slide, inches(x), inches(y), inches(w), inches(h), color);
    }

    fn accent_bar(&mut self, x: f32, y: f32, h: f32, color: Color) {
        self.kit
            .accent_bar(&mut self.slide, inches(x), inches(y), inches(h), color);
    }

    fn text(&mut self, x: f32, y: f32, w: f32, text: &str, spec: TextSpec) {
        self.kit
            .text(&mut self.slide, inches(x), inches(y), inches(w), text, spec);
    }

    fn paras(&mut self, x: f32, y: f32, w: f32, paras: &[Para]) {
        self.kit
            .text_box(&mut self.slide, inches(x), inches(y), inches(w), paras);
    }

    /// 上緣帶色條的卡片
    fn card(&mut self, x: f32, y: f32, w: f32, h: f32, bar: Color) {
        self.rect(x, y, w, h, CARD);
        self.rect(x, y, w, 0.06, bar);
    }

    fn done(self, deck: &mut Deck) {
        deck.slides.push(self.slide);
    }
}

fn p(text: &str, spec: TextSpec) -> Para {
    Para::new(text, spec).space_before(6.0)
}

fn bullet(text: &str, spec: TextSpec) -> Para {
    Para::new(text, spec).space_before(4.0)
}

/// 16:9 主管簡報
pub fn executive_deck() -> Deck {
    let kit = SlideKit::widescreen(DARK_BG);
    let mut deck = Deck::new("ChillStream", kit.width, kit.height).with_typeface("Calibri");

    // 封面
    let mut s = Page {
        kit,
        slide: kit.page(),
    };
    s.kit.stripe(&mut s.slide, BLUE);
    s.paras(
        1.0,
        1.8,
        11.0,
        &[
            Para::new("ChillStream", t(60.0, WHITE).bold()),
            p("Phase-Change Thermal Battery Water Dispenser", t(28.0, CYAN)).space_before(12.0),
        ],
    );
    s.text(
        1.0,
        4.0,
        9.0,
        "Cold water for the 50th person in line \u{2014} not just the first.",
        t(22.0, LIGHT_GRAY),
    );
    s.rect(0.0, 6.5, 13.333, 0.005, RULE);
    s.text(
        1.0,
        6.6,
        11.0,
        "Executive Overview  \u{2022}  Product Investment Proposal  \u{2022}  2026",
        t(14.0, LIGHT_GRAY),
    );
    s.done(&mut deck);

    problem_slide(kit, &mut deck);
    solution_slide(kit, &mut deck);
    architecture_slide(kit, &mut deck);

    // 剖面圖，依圖檔比例置中
    let mut s = Page::titled(kit, "Inside ChillStream", CYAN);
    let img_h = inches(5.5);
    let img_w = img_h * CROSS_SECTION_SIZE.0 / CROSS_SECTION_SIZE.1;
    s.kit.picture(
        &mut s.slide,
        Frame::new((kit.width - img_w) / 2.0, inches(1.4), img_w, img_h),
        product_path(KEY, CROSS_SECTION_FILE),
    );
    s.text(
        0.8,
        7.0,
        11.0,
        "Annotated cross-section \u{2014} all major subsystems visible. Section references map \
         to the system description document.",
        t(13.0, LIGHT_GRAY),
    );
    s.done(&mut deck);

    platform_slide(kit, &mut deck);
    market_slide(kit, &mut deck);
    economics_slide(kit, &mut deck);
    recurring_slide(kit, &mut deck);
    advantages_slide(kit, &mut deck);
    roadmap_slide(kit, &mut deck);
    ask_slide(kit, &mut deck);

    deck
}

fn problem_slide(kit: SlideKit, deck: &mut Deck) {
    let mut s = Page::titled(kit, "The Problem", BLUE);
    s.accent_bar(0.8, 1.6, 4.2, RED);

    let mut story = vec![Para::new(
        "Water coolers fail at the moment of peak demand",
        t(22.0, WHITE).bold(),
    )];
    for line in [
        "School lunch bell rings \u{2014} 60 students, 5 minutes",
        "Office break time \u{2014} 30 people cluster at the cooler",
        "Traditional cooler: 2-5L of pre-chilled water",
        "After 10-15 pours, reservoir is depleted",
        "Incoming mains water at 25\u{00B0}C mixes with remaining cold",
        "Recovery time: 20-40 minutes",
    ] {
        story.push(bullet(line, t(17.0, LIGHT_GRAY)));
    }
    story.push(p("", t(10.0, WHITE)));
    story.push(p("The first users get cold water.", t(20.0, WHITE).bold()));
    story.push(p("Everyone else gets lukewarm.", t(20.0, RED).bold()));
    s.paras(1.2, 1.6, 5.5, &story);

    let stats = [
        ("20-40 min", "Recovery time after peak demand depletes the reservoir"),
        ("85%+", "Of pours during rush hour served above target temperature"),
        (
            "$0",
            "Revenue from solving this \u{2014} no product addresses peak demand in countertop form factor",
        ),
    ];
    for (i, (stat, desc)) in stats.iter().enumerate() {
        let y = 1.6 + i as f32 * 1.4;
        s.rect(7.5, y, 4.8, 1.15, CARD);
        s.text(7.8, y + 0.15, 4.2, stat, t(30.0, ORANGE).bold());
        s.text(7.8, y + 0.65, 4.2, desc, t(14.0, LIGHT_GRAY));
    }
    s.done(deck);
}

fn solution_slide(kit: SlideKit, deck: &mut Deck) {
    let mut s = Page::titled(kit, "The Solution: Phase-Change Thermal Battery", CYAN);
    let columns = [
        (
            "Store",
            "IDLE TIME",
            "Compressor freezes PCM coating\non submerged HX plates to -5\u{00B0}C.\nCold energy stored as latent heat.\nNo water movement needed.",
            BLUE,
        ),
        (
            "Deliver",
            "PEAK DEMAND",
            "User opens tap. Mains pressure\npushes water through PCM-coated\nplates. Water chills from 25\u{00B0}C to\n4\u{00B0}C on contact. No pump.",
            CYAN,
        ),
        (
            "Recover",
            "BETWEEN RUSHES",
            "Compressor recharges the PCM.\n33 min for full 5L recharge.\nPartial recharge much faster.\n50-min school period = full reset.",
            ORANGE,
        ),
    ];
    for (i, (title, subtitle, desc, color)) in columns.iter().enumerate() {
        let x = 0.8 + i as f32 * 4.1;
        s.rect(x, 1.8, 3.6, 0.06, *color);
        s.rect(x, 1.86, 3.6, 4.2, CARD);
        s.text(x + 0.3, 2.1, 3.0, title, t(28.0, *color).bold());
        s.text(x + 0.3, 2.7, 3.0, subtitle, t(12.0, LIGHT_GRAY).bold());
        s.text(x + 0.3, 3.2, 3.0, desc, t(16.0, SOFT_WHITE));
    }
    s.text(
        0.8,
        6.4,
        11.0,
        "Latent heat stores 5-10x more energy per kg than sensible heat \u{2014} enabling \
         countertop form factor with 50-pour capacity.",
        t(16.0, CYAN),
    );
    s.done(deck);
}

fn architecture_slide(kit: SlideKit, deck: &mut Deck) {
    let mut s = Page::titled(kit, "Product Architecture", BLUE);
    let components = [
        (
            "Insulated Tank",
            "Simple SS vessel\nHolds water at rest\nOpen top, sealed by cover\nServiceable \u{2014} lift cover to clean",
            "No pressure rating needed\nNo embedded channels\nFood-grade stainless steel",
        ),
        (
            "Submerged Plate HX",
            "Brazed SS plates with\nPCM coating (-5 to -10\u{00B0}C)\nRefrigerant channels freeze PCM\nWater channels chill on pour",
            "Standard component (Kaori, SWEP)\nScales by plate count:\n4 plates = 5L  |  8 plates = 10L",
        ),
        (
            "Cover / Manifold",
            "Routes all fluid connections:\n\u{2022} Mains water in (top)\n\u{2022} Chilled water out (to tap)\n\u{2022} Refrigerant lines (to HX)",
            "Only complex manufactured part\nLifts off for full tank access\nInjection-molded + brazed fittings",
        ),
    ];
    for (i, (title, desc, note)) in components.iter().enumerate() {
        let x = 0.8 + i as f32 * 4.1;
        s.rect(x, 1.6, 3.6, 3.8, CARD);
        s.rect(x, 1.6, 3.6, 0.06, BLUE);
        s.kit.numbered_circle(
            &mut s.slide,
            inches(x + 0.2),
            inches(1.85),
            inches(0.45),
            i + 1,
            BLUE,
            18.0,
        );
        s.text(x + 0.8, 1.85, 2.6, title, t(20.0, WHITE).bold());
        s.text(x + 0.3, 2.5, 3.0, desc, t(14.0, LIGHT_GRAY));
        s.rect(x + 0.15, 4.2, 3.3, 1.0, NOTE_BG);
        s.text(x + 0.3, 4.25, 3.0, note, t(12.0, CYAN));
    }
    s.paras(
        0.8,
        5.8,
        11.5,
        &[
            Para::new("Key design principle:", t(16.0, WHITE).bold()),
            p(
                "Water moves only when the tap is open (mains pressure driven). No circulation \
                 pump. The cover is the single point of service \u{2014} lift it off, and the tank \
                 is accessible for cleaning. The HX comes out with the cover.",
                t(15.0, LIGHT_GRAY),
            ),
        ],
    );
    s.done(deck);
}

fn platform_slide(kit: SlideKit, deck: &mut Deck) {
    let mut s = Page::titled(kit, "Fleet-First IoT Platform", CYAN);
    s.accent_bar(0.8, 1.6, 4.5, CYAN);

    let mut left = vec![Para::new("Fleet Dashboard", t(24.0, CYAN).bold())];
    for (title, desc) in [
        (
            "Real-time monitoring",
            "Temperatures, capacity %, compressor state across all units",
        ),
        (
            "Usage analytics",
            "Pours/day, peak times, demand vs. capacity \u{2014} sizing recommendations",
        ),
        (
            "Predictive maintenance",
            "Compressor anomaly detection, condenser fouling alerts",
        ),
        (
            "Filter management",
            "Fleet-wide filter life tracking, replacement scheduling",
        ),
        (
            "OTA firmware updates",
            "Staged rollout, automatic rollback, zero downtime",
        ),
        (
            "Remote commands",
            "Reboot, config push, maintenance mode, diagnostics",
        ),
    ] {
        left.push(Para::new("", t(6.0, WHITE)).space_before(8.0));
        left.push(Para::new(title, t(17.0, WHITE).bold()).space_before(2.0));
        left.push(Para::new(desc, t(14.0, LIGHT_GRAY)));
    }
    s.paras(1.2, 1.6, 5.5, &left);

    s.card(7.5, 1.6, 4.8, 2.2, BLUE);
    s.text(7.8, 1.8, 4.2, "On-Unit Display", t(20.0, BLUE).bold());
    let display = [
        "\u{2022} Cold capacity gauge (% remaining)",
        "\u{2022} Live output temperature during pour",
        "\u{2022} Filter life indicator",
        "\u{2022} Recharge ETA when capacity is low",
        "\u{2022} PIN-protected operator settings",
    ];
    s.paras(7.8, 2.3, 4.2, &list(&display, t(14.0, LIGHT_GRAY)));

    s.card(7.5, 4.2, 4.8, 2.2, ORANGE);
    s.text(7.8, 4.4, 4.2, "Connectivity", t(20.0, ORANGE).bold());
    let connectivity = [
        "\u{2022} WiFi (ESP32-S3, built-in \u{2014} $0 extra HW)",
        "\u{2022} MQTT telemetry + HTTPS for OTA/config",
        "\u{2022} TLS 1.3, X.509 device certificates",
        "\u{2022} Works fully offline \u{2014} buffers 7 days locally",
        "\u{2022} AP mode captive portal for setup",
    ];
    s.paras(7.8, 4.9, 4.2, &list(&connectivity, t(14.0, LIGHT_GRAY)));
    s.done(deck);
}

/// 第一段沒有段前距，其餘為 `add_paragraph` 的預設值
fn list(items: &[&str], spec: TextSpec) -> Vec<Para> {
    items
        .iter()
        .enumerate()
        .map(|(i, item)| {
            if i == 0 {
                Para::new(*item, spec)
            } else {
                p(item, spec)
            }
        })
        .collect()
}

fn market_slide(kit: SlideKit, deck: &mut Deck) {
    let mut s = Page::titled(kit, "Market Opportunity", BLUE);
    let segments = [
        (
            "Schools (K-12)",
            "130,000+ in the US alone",
            "Peak demand at every bell \u{2014} the hardest use case.\nBudget-sensitive. Fleet purchases by district.",
            "$800-1,100",
        ),
        (
            "Offices",
            "~1M commercial offices in US",
            "Steady use with lunch/break clusters.\nFacility managers want zero-maintenance.",
            "$600-900",
        ),
        (
            "Healthcare / Clinics",
            "~230,000 medical offices",
            "Waiting rooms, staff areas.\nHygiene and compliance matter.",
            "$800-1,100",
        ),
        (
            "Hospitality",
            "Hotels, coworking, airports",
            "High-visibility locations.\nPremium positioning possible.",
            "$900-1,200",
        ),
    ];
    for (i, (name, size, desc, price)) in segments.iter().enumerate() {
        let y = 1.5 + i as f32 * 1.35;
        s.rect(0.8, y, 11.5, 1.2, if i % 2 == 0 { CARD } else { CARD_ALT });
        s.text(1.0, y + 0.15, 2.2, name, t(20.0, CYAN).bold());
        s.text(1.0, y + 0.65, 2.2, size, t(13.0, LIGHT_GRAY));
        s.text(3.5, y + 0.15, 5.5, desc, t(14.0, LIGHT_GRAY));
        s.text(9.5, y + 0.25, 2.5, price, right(t(22.0, WHITE).bold()));
        s.text(9.5, y + 0.7, 2.5, "per unit", right(t(12.0, LIGHT_GRAY)));
    }
    s.text(
        0.8,
        6.5,
        11.0,
        "Entry point: Schools (hardest use case = best proof point) and offices (highest volume).",
        t(16.0, CYAN),
    );
    s.done(deck);
}

fn economics_slide(kit: SlideKit, deck: &mut Deck) {
    let mut s = Page::titled(kit, "Unit Economics", CYAN);
    s.rect(0.8, 1.5, 5.8, 0.5, BLUE);
    s.text(1.0, 1.55, 5.4, "5L MODEL \u{2014} BOM BREAKDOWN", t(16.0, WHITE).bold());

    let bom = [
        ("Cold assembly (tank + HX + cover + PCM)", "$75", "30%", CYAN),
        ("Refrigeration system", "$50", "20%", BLUE),
        ("Hot water system", "$25", "10%", LIGHT_GRAY),
        ("Water path (valves, flow sensor, filter housing)", "$20", "8%", LIGHT_GRAY),
        ("Electronics (ESP32, PCB, sensors, relays, PSU)", "$25", "10%", LIGHT_GRAY),
        ("Display + UI", "$15", "6%", LIGHT_GRAY),
        ("Enclosure + packaging + misc", "$43", "17%", LIGHT_GRAY),
    ];
    for (i, (item, cost, pct, color)) in bom.iter().enumerate() {
        let y = 2.2 + i as f32 * 0.4;
        s.text(1.0, y, 3.8, item, t(13.0, LIGHT_GRAY));
        s.text(4.9, y, 0.8, cost, right(t(14.0, *color).bold()));
        s.text(5.8, y, 0.6, pct, right(t(12.0, LIGHT_GRAY)));
    }

    let mut y = 2.2 + bom.len() as f32 * 0.4 + 0.1;
    s.rect(1.0, y, 5.4, 0.01, LIGHT_GRAY);
    y += 0.08;
    s.text(1.0, y, 3.8, "Materials subtotal", t(14.0, WHITE).bold());
    s.text(4.9, y, 0.8, "$253", right(t(14.0, WHITE).bold()));
    y += 0.35;
    s.text(1.0, y, 3.8, "Assembly + test + brazing + scrap (5%)", t(13.0, LIGHT_GRAY));
    s.text(4.9, y, 0.8, "$133", right(t(14.0, LIGHT_GRAY)));
    y += 0.4;
    s.rect(1.0, y, 5.4, 0.01, CYAN);
    y += 0.08;
    s.text(1.0, y, 3.8, "TOTAL COGS \u{2014} 5L UNIT", t(16.0, CYAN).bold());
    s.text(4.6, y, 1.4, "$386", right(t(22.0, CYAN).bold()));

    let models = [
        ("5L Model", "$749", BLUE, ["COGS: $386", "Gross margin: 48%", "Offices, small clinics"]),
        ("10L Model", "$999", CYAN, ["COGS: $442", "Gross margin: 56%", "Schools, large offices"]),
    ];
    for (i, (name, price, color, lines)) in models.iter().enumerate() {
        let x = 7.3 + i as f32 * 2.8;
        s.card(x, 1.5, 2.5, 2.8, *color);
        s.text(x + 0.2, 1.7, 2.1, name, t(18.0, WHITE).bold());
        s.text(x + 0.2, 2.2, 2.1, price, t(36.0, *color).bold());
        s.paras(x + 0.2, 2.8, 2.1, &list(lines, t(13.0, LIGHT_GRAY)));
    }

    s.card(7.3, 4.6, 5.3, 1.4, ORANGE);
    s.text(7.5, 4.8, 2.5, "Filter Cartridge", t(18.0, ORANGE).bold());
    s.text(7.5, 5.2, 2.0, "$20", t(30.0, ORANGE).bold());
    let mut filter = list(
        &[
            "COGS: $6  |  Margin: 70%",
            "2-3 replacements/year per unit",
            "NFC tag for auto lifecycle tracking",
        ],
        t(13.0, LIGHT_GRAY),
    );
    filter.push(p("Proprietary twist-lock (recurring revenue)", t(13.0, CYAN)));
    s.paras(10.1, 4.8, 2.3, &filter);
    s.done(deck);
}

fn recurring_slide(kit: SlideKit, deck: &mut Deck) {
    let mut s = Page::titled(kit, "Recurring Revenue Model", ORANGE);
    s.accent_bar(0.8, 1.6, 3.0, ORANGE);
    s.paras(
        1.2,
        1.6,
        5.5,
        &[
            Para::new("Two recurring streams per unit:", t(20.0, WHITE).bold()),
            p("", t(8.0, WHITE)),
            p("Filter cartridges", t(20.0, ORANGE).bold()).space_before(12.0),
            p(
                "$20/cartridge \u{00D7} 2-3/year = $40-60/unit/year",
                t(16.0, LIGHT_GRAY),
            )
            .space_before(2.0),
            p(
                "70% gross margin. Proprietary twist-lock with NFC.",
                t(14.0, LIGHT_GRAY),
            ),
            p("Cloud SaaS (optional)", t(20.0, ORANGE).bold()).space_before(16.0),
            p("$10/month/unit = $120/unit/year", t(16.0, LIGHT_GRAY)).space_before(2.0),
            p(
                "85% gross margin. Fleet dashboard, analytics, OTA.",
                t(14.0, LIGHT_GRAY),
            ),
            p("", t(8.0, WHITE)),
            p("Combined: $160-180/unit/year", t(20.0, WHITE).bold()).space_before(12.0),
        ],
    );

    s.rect(7.3, 1.5, 5.3, 0.5, BLUE);
    s.text(7.5, 1.55, 4.8, "ANNUAL RECURRING AT FLEET SCALE", t(14.0, WHITE).bold());
    let fleet = [
        ("10 units", "$1,600-1,800", "Single site (small office building)"),
        ("50 units", "$8,000-9,000", "School district or multi-floor office"),
        ("100 units", "$16,000-18,000", "Regional facility operator"),
        ("500 units", "$80,000-90,000", "National FM company"),
        ("1,000 units", "$160,000-180,000", "Enterprise account"),
    ];
    for (i, (units, revenue, desc)) in fleet.iter().enumerate() {
        let y = 2.2 + i as f32 * 0.65;
        s.rect(7.3, y, 5.3, 0.55, if i % 2 == 0 { CARD } else { CARD_ALT });
        s.text(7.5, y + 0.08, 1.2, units, t(15.0, WHITE).bold());
        s.text(8.8, y + 0.08, 1.8, revenue, t(15.0, ORANGE).bold());
        s.text(10.7, y + 0.08, 1.7, desc, t(12.0, LIGHT_GRAY));
    }

    s.paras(
        0.8,
        6.2,
        11.5,
        &[
            Para::new(
                "Hardware is the door opener. Recurring revenue is the business model.",
                t(20.0, WHITE).bold(),
            ),
            p(
                "At 1,000 deployed units, annual recurring exceeds initial hardware revenue \
                 within 12-18 months of fleet buildout.",
                t(15.0, LIGHT_GRAY),
            ),
        ],
    );
    s.done(deck);
}

fn advantages_slide(kit: SlideKit, deck: &mut Deck) {
    let mut s = Page::titled(kit, "Why ChillStream Wins", BLUE);
    let reasons = [
        (
            "Physics advantage",
            "Latent heat stores 5-10x more energy than sensible heat per kg. A 3 kg PCM mass \
             replaces a 15-20L cold water tank. This is why we fit in a countertop form factor.",
            BLUE,
        ),
        (
            "No moving parts in the water path",
            "No pump, no circulator. Water moves on mains pressure only. Fewer failure modes. \
             Lower cost. Silent during dispense.",
            CYAN,
        ),
        (
            "Standard components, novel assembly",
            "The plate HX is off-the-shelf (Kaori, SWEP). The compressor is catalog (Secop, \
             Embraco). The tank is a simple vessel. The innovation is in the assembly and the PCM \
             coating \u{2014} not in reinventing the parts.",
            ORANGE,
        ),
        (
            "Fleet-first IoT from day one",
            "Built for operators managing 10-1,000 units. Not a consumer gadget with an app bolted \
             on. Predictive maintenance, sizing recommendations, OTA updates, compliance reporting.",
            BLUE,
        ),
        (
            "Recurring revenue built into the product",
            "Proprietary filter with NFC lifecycle tracking. Cloud SaaS for fleet management. \
             Combined: $160-180/unit/year at 70-85% margin.",
            CYAN,
        ),
    ];
    for (i, (title, desc, color)) in reasons.iter().enumerate() {
        let y = 1.5 + i as f32 * 1.1;
        s.accent_bar(0.8, y + 0.05, 0.85, *color);
        s.text(1.2, y, 3.0, title, t(18.0, *color).bold());
        s.text(4.5, y, 8.0, desc, t(15.0, LIGHT_GRAY));
    }
    s.done(deck);
}

fn roadmap_slide(kit: SlideKit, deck: &mut Deck) {
    let mut s = Page::titled(kit, "Roadmap & Key Risks", BLUE);
    s.rect(0.8, 1.5, 6.5, 0.5, BLUE);
    s.text(1.0, 1.55, 6.0, "18-MONTH DEVELOPMENT ROADMAP", t(14.0, WHITE).bold());

    let milestones = [
        (
            "M1-M3",
            "PCM + HX prototype",
            "Material selection, thermal simulation, bench prototype of submerged plate HX",
        ),
        (
            "M4-M6",
            "Full functional prototype",
            "Complete unit: cold + hot + electronics + display + WiFi",
        ),
        (
            "M7-M9",
            "EVT",
            "Engineering validation. Performance testing. Begin certification.",
        ),
        (
            "M10-M12",
            "DVT",
            "Design validation. Reliability testing. 10,000-cycle PCM test.",
        ),
        (
            "M13-M14",
            "Pilot fleet",
            "5-10 units deployed in real schools and offices. Field data.",
        ),
        (
            "M15-M18",
            "PVT \u{2192} Production",
            "Manufacturing validation. Certification complete. Ship.",
        ),
    ];
    for (i, (when, name, desc)) in milestones.iter().enumerate() {
        let y = 2.2 + i as f32 * 0.7;
        let badge = match i {
            0 | 1 => BLUE,
            2 | 3 => CYAN,
            _ => ORANGE,
        };
        s.rect(0.8, y, 1.0, 0.45, badge);
        s.text(0.8, y + 0.05, 1.0, when, center(t(13.0, WHITE).bold()));
        s.text(2.0, y, 2.0, name, t(15.0, WHITE).bold());
        s.text(4.1, y, 3.2, desc, t(12.0, LIGHT_GRAY));
    }

    s.rect(7.8, 1.5, 4.8, 0.5, RED);
    s.text(8.0, 1.55, 4.4, "TOP RISKS & MITIGATIONS", t(14.0, WHITE).bold());
    let risks = [
        (
            "PCM encapsulation durability",
            "Can coated plates survive 10,000+ freeze-thaw cycles? \u{2192} Material science \
             partnership + accelerated life test by M3",
        ),
        (
            "HX thermal performance",
            "Can 4 plates achieve 25\u{00B0}C\u{2192}4\u{00B0}C at 1 L/min? \u{2192} Thermal \
             simulation + bench prototype by M3",
        ),
        (
            "Cover manifold complexity",
            "Single part routes water + refrigerant + sensors. \u{2192} Industrial design + \
             mechanical prototype by M4",
        ),
        (
            "Mineral fouling",
            "HX plates always submerged in water. \u{2192} Upstream filter + descaling protocol + \
             accelerated fouling test",
        ),
    ];
    for (i, (risk, mitigation)) in risks.iter().enumerate() {
        let y = 2.2 + i as f32 * 1.2;
        s.rect(7.8, y, 4.8, 1.0, CARD);
        s.text(8.0, y + 0.08, 4.4, risk, t(14.0, RED).bold());
        s.text(8.0, y + 0.42, 4.4, mitigation, t(12.0, LIGHT_GRAY));
    }
    s.done(deck);
}

fn ask_slide(kit: SlideKit, deck: &mut Deck) {
    let mut s = Page::titled(kit, "The Ask", CYAN);
    let phases = [
        (
            "Phase 1: Prove the Physics",
            "M1-M6",
            "$250K",
            BLUE,
            [
                "PCM material selection and encapsulation testing",
                "Submerged plate HX thermal prototype",
                "Cover manifold mechanical prototype",
                "Full functional prototype (1 unit)",
                "Thermal performance validation",
            ],
        ),
        (
            "Phase 2: Validate the Product",
            "M7-M14",
            "$400K",
            CYAN,
            [
                "EVT + DVT (10-20 units)",
                "Certification (UL, NSF, FCC/CE)",
                "IoT platform development (dashboard, OTA)",
                "Pilot fleet: 5-10 units in real deployments",
                "Field data collection and iteration",
            ],
        ),
        (
            "Phase 3: Scale to Market",
            "M15-M18+",
            "$350K",
            ORANGE,
            [
                "PVT and production tooling",
                "Manufacturing line setup",
                "First 500-unit production run",
                "Sales team and channel partnerships",
                "Launch marketing",
            ],
        ),
    ];
    for (i, (title, timeline, cost, color, items)) in phases.iter().enumerate() {
        let x = 0.8 + i as f32 * 4.1;
        s.card(x, 1.5, 3.6, 4.8, *color);
        s.text(x + 0.25, 1.7, 3.1, title, t(16.0, *color).bold());
        s.text(x + 0.25, 2.3, 1.5, timeline, t(14.0, LIGHT_GRAY));
        s.text(x + 2.0, 2.3, 1.4, cost, right(t(22.0, *color).bold()));
        s.rect(x + 0.2, 2.85, 3.2, 0.01, RULE);
        s.paras(x + 0.25, 3.0, 3.1, &list(items, t(13.0, LIGHT_GRAY)));
    }

    s.card(0.8, 6.5, 11.5, 0.7, WHITE);
    s.text(1.2, 6.6, 5.0, "Total investment to production:", t(18.0, WHITE).bold());
    s.text(8.5, 6.55, 3.5, "$1M over 18 months", right(t(26.0, CYAN).bold()));
    s.done(deck);
}

// ── 剖面圖 ──

const STEEL: Color = Color::hex(0x8899AA);
const STEEL_DARK: Color = Color::hex(0x556677);
const INSULATION: Color = Color::hex(0xFFD966);
const WATER_COLD: Color = Color::hex(0x4FC3F7);
const WATER_WARM: Color = Color::hex(0xFF8A65);
const WATER_HOT: Color = Color::hex(0xFF5252);
const PCM_FROZEN: Color = Color::hex(0x00BCD4);
const REFRIG: Color = Color::hex(0xE040FB);
const COPPER: Color = Color::hex(0xD4874E);
const COPPER_EDGE: Color = Color::hex(0x8B5E3C);
const PLASTIC: Color = Color::hex(0x78909C);
const ELECTRONICS: Color = Color::hex(0x66BB6A);
const ACCENT: Color = Color::hex(0x00D4AA);
const FIG_WHITE: Color = Color::hex(0xF0F0F5);
const GRAY: Color = Color::hex(0x99AABB);
const FILTER: Color = Color::hex(0xAED581);
const FILTER_EDGE: Color = Color::hex(0x558B2F);
const GASKET: Color = Color::hex(0xEF5350);
const DRIP: Color = Color::hex(0x546E7A);
const HEATER: Color = Color::hex(0xFF6D00);
const FIG_BG: Color = Color::hex(0x0E0E1A);

/// 實心矩形，可加邊框；`opacity` 同時作用於填色與邊框
fn block(panel: &mut Panel, frame: (f32, f32, f32, f32), fill: Color, edge: Option<(Color, f32)>, opacity: f32) {
    let (x, y, w, h) = frame;
    let mut style = Style::filled(fill).opacity(opacity);
    if let Some((color, width)) = edge {
        style = style.stroke(Stroke::new(color, width).opacity(opacity));
    }
    panel.add(Mark::rect(x, y, w, h, style));
}

fn outline(panel: &mut Panel, frame: (f32, f32, f32, f32), color: Color, width: f32) {
    let (x, y, w, h) = frame;
    panel.add(Mark::rect(x, y, w, h, Style::outlined(Stroke::new(color, width))));
}

fn label(x: f32, y: f32, text: &str, size: f32, color: Color) -> TextMark {
    TextMark::new(x, y, text).size(size).color(color).centered()
}

fn pipe(panel: &mut Panel, points: &[(f32, f32)], color: Color, opacity: f32) {
    panel.add(Mark::line(points, Stroke::new(color, 2.0).opacity(opacity)));
}

/// 標註：圓角底框文字加上指向元件的弧形箭頭
fn callout(panel: &mut Panel, text: &str, target: (f32, f32), anchor: (f32, f32), color: Color, arrow: Color, bold: bool) {
    let mut mark = CalloutMark::new(text, target, anchor, color).size(8.0).arrow_color(arrow);
    if bold {
        mark = mark.bold();
    }
    panel.add(Mark::Callout(mark));
}

/// 帶標註的飲水機剖面圖
pub fn cross_section(dpi: f32) -> Figure {
    let (w_in, h_in) = CROSS_SECTION_SIZE;
    let mut fig = Figure::new(w_in, h_in, dpi, FIG_BG);
    // 右側標註從 x = 18 起，範圍向右延伸讓文字留在圖內
    let mut ax = Panel::new(Viewport::FULL, (-1.5, 23.5), (-1.5, 33.0))
        .equal_aspect()
        .background(FIG_BG);

    let title = label(10.0, 32.2, "ChillStream", 28.0, FIG_WHITE).bold();
    ax.add(Mark::Text(title));
    let subtitle = label(
        10.0,
        31.5,
        "Cross-Section View \u{2014} Component Layout",
        14.0,
        GRAY,
    );
    ax.add(Mark::Text(subtitle));
    ax.add(Mark::line(&[(3.0, 31.1), (17.0, 31.1)], Stroke::new(ACCENT, 1.5).opacity(0.6)));

    // 外殼
    let (enc_x, enc_y, enc_w, enc_h) = (3.0, 2.5, 14.0, 25.0);
    ax.add(Mark::rounded(
        enc_x + 0.05,
        enc_y + 0.05,
        enc_w - 0.1,
        enc_h - 0.1,
        0.8,
        Style::filled(PLASTIC).opacity(0.06),
    ));
    ax.add(Mark::rounded(
        enc_x,
        enc_y,
        enc_w,
        enc_h,
        0.8,
        Style::outlined(Stroke::new(PLASTIC, 2.5)),
    ));

    // 保溫冷水槽與漸層水體
    let (tank_x, tank_y, tank_w, tank_h) = (4.0, 10.0, 8.5, 13.8);
    block(
        &mut ax,
        (tank_x - 0.6, tank_y - 0.6, tank_w + 1.2, tank_h + 1.2),
        INSULATION,
        None,
        0.25,
    );
    ax.add(Mark::rect(
        tank_x - 0.6,
        tank_y - 0.6,
        tank_w + 1.2,
        tank_h + 1.2,
        Style::outlined(Stroke::new(INSULATION, 1.5).opacity(0.6)),
    ));
    let bands = 20;
    let band_h = (tank_h - 0.2) / bands as f32;
    for i in 0..bands {
        let frac = i as f32 / bands as f32;
        let color = WATER_COLD.mix(WATER_WARM, frac * 0.3);
        let band_y = tank_y + 0.1 + (tank_h - 0.2) * (1.0 - frac) - band_h;
        block(&mut ax, (tank_x + 0.1, band_y, tank_w - 0.2, band_h), color, None, 0.3);
    }
    outline(&mut ax, (tank_x, tank_y, tank_w, tank_h), STEEL, 2.0);

    // 浸沒式板式熱交換器
    let (hx_x, hx_y, hx_w, hx_h) = (tank_x + 1.5, tank_y + 1.5, 5.5, 8.0);
    let plates = 5;
    let spacing = hx_h / (plates + 1) as f32;
    let plate_h = 0.35;
    let coat = 0.18;
    for plate in 0..plates {
        let py = hx_y + spacing * (plate as f32 + 0.5);
        let channel_y = py + plate_h + coat;
        let channel_h = spacing - plate_h - 2.0 * coat;
        // 水道與冷媒道交錯
        let (channel_color, channel_alpha, channel_name) = if plate % 2 == 0 {
            (WATER_COLD, 0.2, "water")
        } else {
            (REFRIG, 0.15, "refrigerant")
        };
        if channel_h > 0.1 {
            block(
                &mut ax,
                (hx_x + 0.3, channel_y, hx_w - 0.6, channel_h),
                channel_color,
                None,
                channel_alpha,
            );
            if plate < 2 {
                ax.add(Mark::Text(
                    TextMark::new(hx_x + hx_w / 2.0, channel_y + channel_h / 2.0, channel_name)
                        .size(7.0)
                        .color(channel_color)
                        .italic()
                        .opacity(0.8)
                        .centered(),
                ));
            }
        }
        block(
            &mut ax,
            (hx_x + 0.2, py, hx_w - 0.4, plate_h),
            STEEL_DARK,
            Some((STEEL, 1.0)),
            1.0,
        );
        block(&mut ax, (hx_x + 0.3, py + plate_h, hx_w - 0.6, coat), PCM_FROZEN, None, 0.8);
        block(&mut ax, (hx_x + 0.3, py - coat, hx_w - 0.6, coat), PCM_FROZEN, None, 0.8);
    }
    outline(&mut ax, (hx_x, hx_y, hx_w, hx_h), STEEL, 2.0);

    // 上蓋與歧管
    let cover_y = 24.0;
    let cover_h = 3.2;
    for line_x in [9.0, 11.0] {
        block(
            &mut ax,
            (line_x, hx_y + hx_h, 0.35, cover_y - (hx_y + hx_h)),
            COPPER,
            Some((COPPER_EDGE, 1.0)),
            1.0,
        );
    }
    block(&mut ax, (5.0, hx_y - 0.5, 0.6, 0.5), WATER_COLD, Some((STEEL_DARK, 1.0)), 0.7);
    block(
        &mut ax,
        (5.0, hx_y + hx_h, 0.6, cover_y - (hx_y + hx_h)),
        WATER_COLD,
        Some((STEEL_DARK, 1.0)),
        0.5,
    );

    block(
        &mut ax,
        (3.3, cover_y, 13.4, cover_h),
        Color::hex(0x2A3A4A),
        Some((STEEL, 2.0)),
        1.0,
    );
    block(&mut ax, (3.3, cover_y - 0.15, 13.4, 0.15), GASKET, None, 1.0);
    block(&mut ax, (14.0, cover_y + 0.5, 2.2, 0.6), WATER_WARM, Some((STEEL_DARK, 1.0)), 0.7);
    block(&mut ax, (14.5, cover_y - 0.15, 0.6, 0.65), WATER_WARM, Some((STEEL_DARK, 1.0)), 0.7);
    block(&mut ax, (4.0, cover_y + 0.5, 2.5, 0.6), WATER_COLD, Some((STEEL_DARK, 1.0)), 0.7);
    block(&mut ax, (5.0, cover_y - 0.15, 0.6, 0.65), WATER_COLD, Some((STEEL_DARK, 1.0)), 0.7);
    block(&mut ax, (3.0, cover_y + 0.5, 0.8, 0.6), STEEL, Some((STEEL_DARK, 1.5)), 1.0);
    block(&mut ax, (2.5, cover_y + 0.55, 0.5, 0.5), WATER_COLD, Some((STEEL_DARK, 1.0)), 0.8);
    for line_x in [9.0, 11.0] {
        block(&mut ax, (line_x, cover_y + 1.8, 0.35, 1.4), COPPER, Some((COPPER_EDGE, 1.0)), 1.0);
        block(&mut ax, (line_x, cover_y - 0.15, 0.35, 2.0), COPPER, Some((COPPER_EDGE, 1.0)), 1.0);
    }
    block(&mut ax, (12.5, cover_y, 0.15, cover_h * 0.4), ELECTRONICS, None, 0.8);
    ax.add(Mark::rounded(
        8.85,
        cover_y + 2.2,
        2.3,
        0.6,
        0.2,
        Style::filled(Color::hex(0x2A3A4A)).stroke(Stroke::new(ACCENT, 1.0)),
    ));
    let cover_label = label(10.0, cover_y + 2.5, "COVER / MANIFOLD", 10.0, FIG_WHITE).bold();
    ax.add(Mark::Text(cover_label));

    // 熱水槽
    let (hot_x, hot_y, hot_w, hot_h) = (13.5, 10.0, 3.0, 6.0);
    block(
        &mut ax,
        (hot_x - 0.3, hot_y - 0.3, hot_w + 0.6, hot_h + 0.6),
        INSULATION,
        Some((INSULATION, 1.0)),
        0.2,
    );
    block(&mut ax, (hot_x + 0.1, hot_y + 0.1, hot_w - 0.2, hot_h - 0.2), WATER_HOT, None, 0.3);
    outline(&mut ax, (hot_x, hot_y, hot_w, hot_h), STEEL, 2.0);
    for i in 0..4 {
        block(
            &mut ax,
            (hot_x + 0.4, hot_y + 0.5 + i as f32 * 0.6, hot_w - 0.8, 0.25),
            HEATER,
            Some((Color::hex(0xBF360C), 1.0)),
            0.8,
        );
    }
    let hot_label = label(hot_x + hot_w / 2.0, hot_y + hot_h / 2.0 + 0.5, "HOT\nTANK", 10.0, WATER_HOT).bold();
    ax.add(Mark::Text(hot_label));
    let hot_spec = label(
        hot_x + hot_w / 2.0,
        hot_y + hot_h / 2.0 - 0.8,
        "1.5L\n85-95\u{00B0}C",
        8.0,
        GRAY,
    );
    ax.add(Mark::Text(hot_spec));
    block(&mut ax, (hot_x + 1.0, cover_y + 1.5, 0.6, 0.6), WATER_HOT, Some((STEEL_DARK, 1.0)), 0.7);
    block(&mut ax, (16.7, cover_y + 1.5, 0.8, 0.6), STEEL, Some((STEEL_DARK, 1.5)), 1.0);
    block(
        &mut ax,
        (hot_x + 1.0, hot_y + hot_h, 0.6, cover_y - (hot_y + hot_h)),
        WATER_HOT,
        Some((STEEL_DARK, 1.0)),
        0.5,
    );

    // 冷凍循環
    let ref_y = 3.0;
    let (comp_x, comp_y, comp_r) = (5.5, ref_y + 1.5, 1.2);
    let (cond_x, cond_y, cond_w, cond_h) = (13.0, ref_y, 3.5, 3.5);
    pipe(&mut ax, &[(cond_x, cond_y + cond_h), (cond_x - 1.0, ref_y + 4.0), (9.35, hx_y)], COPPER, 0.7);
    ax.add(Mark::Text(
        TextMark::new(10.5, ref_y + 5.0, "capillary\ntube")
            .size(7.0)
            .color(COPPER)
            .italic()
            .opacity(0.7)
            .centered(),
    ));
    ax.add(Mark::line(
        &[(11.35, hx_y), (11.35, ref_y + 3.0), (comp_x + comp_r, comp_y + 0.5)],
        Stroke::new(REFRIG, 2.0).dash(Dash::Dashed).opacity(0.5),
    ));
    pipe(
        &mut ax,
        &[(comp_x + comp_r, comp_y), (8.0, ref_y + 2.5), (cond_x, cond_y + 1.0)],
        REFRIG,
        0.5,
    );

    ax.add(Mark::Circle {
        cx: comp_x,
        cy: comp_y,
        r: comp_r,
        style: Style::filled(Color::hex(0x37474F)).stroke(Stroke::new(STEEL, 2.0)),
    });
    ax.add(Mark::Circle {
        cx: comp_x,
        cy: comp_y,
        r: 0.6,
        style: Style::filled(Color::hex(0x455A64)).stroke(Stroke::new(STEEL_DARK, 1.0)),
    });
    let comp_label = label(comp_x, comp_y, "COMP", 8.0, FIG_WHITE).bold();
    ax.add(Mark::Text(comp_label));

    block(
        &mut ax,
        (cond_x, cond_y, cond_w, cond_h),
        Color::hex(0x37474F),
        Some((STEEL, 2.0)),
        1.0,
    );
    for i in 0..8 {
        block(
            &mut ax,
            (cond_x + 0.2, cond_y + 0.3 + i as f32 * 0.35, cond_w - 0.4, 0.15),
            STEEL,
            None,
            0.5,
        );
    }
    let cond_label = label(
        cond_x + cond_w / 2.0,
        cond_y + cond_h / 2.0 + 0.5,
        "CONDENSER",
        8.0,
        FIG_WHITE,
    )
    .bold();
    ax.add(Mark::Text(cond_label));
    let fan_label = label(cond_x + cond_w / 2.0, cond_y + cond_h / 2.0 - 0.3, "+ FAN", 8.0, GRAY);
    ax.add(Mark::Text(fan_label));
    for i in 0..6 {
        block(
            &mut ax,
            (13.2 + i as f32 * 0.55, 2.5, 0.3, 0.4),
            FIG_BG,
            Some((PLASTIC, 0.5)),
            1.0,
        );
    }

    // 控制板
    let (pcb_x, pcb_y) = (13.5, 18.0);
    block(
        &mut ax,
        (pcb_x, pcb_y, 3.0, 5.5),
        Color::hex(0x1B5E20),
        Some((ELECTRONICS, 1.5)),
        0.8,
    );
    let chips = [
        ((pcb_x + 0.3, pcb_y + 3.5, 1.4, 0.8), Color::hex(0x333333), ELECTRONICS, "ESP32-S3", 6.0),
        ((pcb_x + 0.3, pcb_y + 2.2, 1.0, 0.8), Color::hex(0x1A237E), ELECTRONICS, "SSR", 6.0),
        ((pcb_x + 1.5, pcb_y + 2.2, 1.0, 0.8), Color::hex(0x1A237E), ELECTRONICS, "Relay", 6.0),
        ((pcb_x + 0.3, pcb_y + 0.5, 2.4, 1.2), Color::hex(0x212121), Color::hex(0x616161), "AC-DC PSU", 7.0),
    ];
    for (frame, fill, edge, name, size) in chips {
        block(&mut ax, frame, fill, Some((edge, 1.0)), 1.0);
        let chip = label(frame.0 + frame.2 / 2.0, frame.1 + frame.3 / 2.0, name, size, FIG_WHITE);
        ax.add(Mark::Text(chip));
    }
    block(
        &mut ax,
        (pcb_x + 2.2, pcb_y + 3.5, 0.6, 2.0),
        Color::hex(0x0D47A1),
        Some((Color::hex(0x1565C0), 1.0)),
        1.0,
    );
    let lcd = label(pcb_x + 2.5, pcb_y + 4.5, "LCD", 6.0, FIG_WHITE).rotation(90.0);
    ax.add(Mark::Text(lcd));
    let board = label(pcb_x + 1.5, pcb_y + 5.2, "CONTROL\nBOARD", 8.0, ELECTRONICS).bold();
    ax.add(Mark::Text(board));

    // 濾芯與進水
    let (filter_x, filter_y, filter_w, filter_h) = (14.5, 17.0, 1.5, 3.5);
    block(&mut ax, (16.5, filter_y + 1.5, 0.5, 0.4), STEEL, Some((STEEL_DARK, 1.5)), 1.0);
    pipe(
        &mut ax,
        &[(16.5, filter_y + 1.7), (filter_x + filter_w, filter_y + 1.7)],
        WATER_WARM,
        0.7,
    );
    ax.add(Mark::rounded(
        filter_x,
        filter_y,
        filter_w,
        filter_h,
        0.3,
        Style::filled(FILTER).opacity(0.4).stroke(Stroke::new(FILTER_EDGE, 2.0)),
    ));
    let filter_name = label(
        filter_x + filter_w / 2.0,
        filter_y + filter_h / 2.0 + 0.3,
        "FILTER",
        8.0,
        Color::hex(0x33691E),
    )
    .bold();
    ax.add(Mark::Text(filter_name));
    let filter_lock = label(
        filter_x + filter_w / 2.0,
        filter_y + filter_h / 2.0 - 0.4,
        "twist-\nlock",
        7.0,
        FILTER_EDGE,
    );
    ax.add(Mark::Text(filter_lock));
    block(
        &mut ax,
        (filter_x + 0.3, filter_y + 0.3, 0.9, 0.5),
        Color::hex(0xE8F5E9),
        Some((FILTER_EDGE, 0.8)),
        1.0,
    );
    let nfc = label(filter_x + 0.75, filter_y + 0.55, "NFC", 6.0, Color::hex(0x2E7D32)).bold();
    ax.add(Mark::Text(nfc));

    // 電磁閥分流
    let (valve_x, valve_y) = (13.8, 16.0);
    pipe(
        &mut ax,
        &[
            (filter_x + filter_w / 2.0, filter_y),
            (filter_x + filter_w / 2.0, valve_y + 0.8),
            (valve_x + 0.6, valve_y + 0.8),
        ],
        WATER_WARM,
        0.7,
    );
    pipe(
        &mut ax,
        &[(valve_x, valve_y + 0.4), (14.8, valve_y + 0.4), (14.8, cover_y + 0.8)],
        WATER_WARM,
        0.5,
    );
    pipe(
        &mut ax,
        &[(valve_x + 0.6, valve_y), (valve_x + 0.6, hot_y + hot_h), (hot_x + 1.3, hot_y + hot_h)],
        WATER_HOT,
        0.5,
    );
    block(
        &mut ax,
        (valve_x, valve_y, 1.2, 0.8),
        Color::hex(0x455A64),
        Some((STEEL, 1.5)),
        1.0,
    );
    let valve = label(valve_x + 0.6, valve_y + 0.4, "VALVE", 6.0, FIG_WHITE).bold();
    ax.add(Mark::Text(valve));

    // 接水盤
    let drip_y = 27.4;
    block(&mut ax, (2.3, drip_y - 0.1, 3.5, 0.5), DRIP, Some((STEEL_DARK, 1.5)), 1.0);
    let drip = label(4.0, drip_y + 0.15, "DRIP TRAY", 7.0, FIG_WHITE).bold();
    ax.add(Mark::Text(drip));

    // 水流方向
    ax.add(Mark::Arrow(
        ArrowMark::new((7.0, cover_y - 0.5), (7.0, hx_y + hx_h + 2.0), WATER_WARM)
            .width(2.5)
            .head(ArrowHead::Open)
            .opacity(0.6),
    ));
    ax.add(Mark::Text(
        TextMark::new(7.8, hx_y + hx_h + 1.0, "mains\nwater\nin")
            .size(7.0)
            .color(WATER_WARM)
            .italic()
            .opacity(0.7)
            .centered(),
    ));
    ax.add(Mark::Arrow(
        ArrowMark::new((5.3, hx_y + hx_h - 0.5), (5.3, hx_y + 0.5), WATER_COLD)
            .width(2.5)
            .head(ArrowHead::Open)
            .opacity(0.6),
    ));
    ax.add(Mark::Text(
        TextMark::new(4.2, hx_y + hx_h / 2.0, "water\nthrough\nHX")
            .size(7.0)
            .color(WATER_COLD)
            .italic()
            .opacity(0.7)
            .centered(),
    ));

    // 左側標註
    callout(
        &mut ax,
        "COVER / MANIFOLD\nRoutes all fluid connections:\n\u{2022} Mains water inlet\n\u{2022} Chilled water outlet\n\u{2022} Refrigerant lines to HX\n\u{2022} Sensor wires\nLifts off for tank service",
        (10.0, cover_y + 1.5),
        (-0.5, cover_y + 2.0),
        ACCENT,
        ACCENT,
        true,
    );
    callout(
        &mut ax,
        "Food-grade silicone gasket\nClamp or twist-lock seal",
        (8.0, cover_y - 0.08),
        (-0.5, cover_y - 1.2),
        GASKET,
        GASKET,
        false,
    );
    let cold_tap = CalloutMark::new("COLD TAP\n4\u{00B0}C output", (2.5, cover_y + 0.8), (-0.5, cover_y + 4.0), WATER_COLD)
        .size(9.0)
        .bold();
    ax.add(Mark::Callout(cold_tap));
    callout(
        &mut ax,
        "PU foam insulation",
        (tank_x - 0.4, tank_y + tank_h / 2.0),
        (-0.5, tank_y + tank_h / 2.0 + 2.0),
        INSULATION,
        INSULATION,
        false,
    );
    callout(
        &mut ax,
        "PCM COATING (-5 to -10\u{00B0}C)\nEncapsulated phase-change material\nbonded to plate surfaces\nFreezes during idle \u{2192} stores cold energy\nMelts during pour \u{2192} chills water",
        (hx_x + 2.0, hx_y + 3.5),
        (-0.5, hx_y + 1.0),
        PCM_FROZEN,
        PCM_FROZEN,
        true,
    );
    callout(
        &mut ax,
        "Copper refrigerant lines\nLiquid + suction\nThrough cover to HX",
        (9.17, cover_y - 0.5),
        (-0.5, 21.5),
        COPPER,
        COPPER,
        false,
    );
    callout(
        &mut ax,
        "COMPRESSOR\n100-200W input\nR600a refrigerant\nSame class as mini-fridge",
        (comp_x, comp_y),
        (-0.5, ref_y + 0.5),
        FIG_WHITE,
        STEEL,
        true,
    );
    callout(
        &mut ax,
        "Drip tray\nRemovable, dishwasher-safe",
        (3.0, drip_y + 0.15),
        (-0.5, drip_y + 1.5),
        DRIP,
        DRIP,
        false,
    );
    callout(
        &mut ax,
        "ENCLOSURE\nABS/PC outer shell\n~30cm W \u{00D7} 40cm D \u{00D7} 45cm H\nSS dispense area",
        (3.0, enc_y + enc_h / 2.0),
        (-0.5, enc_y + enc_h / 2.0 - 3.0),
        PLASTIC,
        PLASTIC,
        true,
    );

    // 右側標註
    let hot_tap = CalloutMark::new("HOT TAP\n85-95\u{00B0}C", (17.1, cover_y + 1.8), (18.5, cover_y + 4.0), WATER_HOT)
        .size(9.0)
        .bold();
    ax.add(Mark::Callout(hot_tap));
    callout(
        &mut ax,
        "INSULATED TANK\nFood-grade SS 304/316\n5L model: 15cm \u{00D8} \u{00D7} 30cm\n10L model: 15cm \u{00D8} \u{00D7} 50cm\nOpen top \u{2014} no pressure rating",
        (tank_x + tank_w, tank_y + tank_h / 2.0),
        (18.0, tank_y + tank_h / 2.0 + 3.0),
        STEEL,
        STEEL,
        true,
    );
    callout(
        &mut ax,
        "SUBMERGED PLATE HX\nBrazed SS plates (Kaori/SWEP)\n4 plates (5L) or 8 plates (10L)\nAlternating channels:\n  \u{2022} Water (to tap)\n  \u{2022} Refrigerant (from compressor)",
        (hx_x + hx_w, hx_y + hx_h / 2.0),
        (18.0, hx_y + hx_h / 2.0 - 2.0),
        STEEL,
        STEEL,
        true,
    );
    callout(
        &mut ax,
        "CONDENSER + FAN\nFin-and-tube, air-cooled\nRear ventilation grilles",
        (cond_x + cond_w / 2.0, cond_y + cond_h),
        (18.0, ref_y + 5.5),
        FIG_WHITE,
        STEEL,
        true,
    );
    callout(
        &mut ax,
        "HOT WATER TANK\n1.5L insulated SS\n1.5-2 kW heating element\nThermal fuse + overheat cutoff\nChild lock on dispense",
        (hot_x + hot_w, hot_y + hot_h / 2.0),
        (18.0, hot_y + hot_h / 2.0),
        WATER_HOT,
        WATER_HOT,
        true,
    );
    callout(
        &mut ax,
        "Heating element\n1.5 kW (office)\n2.0 kW (high-throughput)",
        (hot_x + hot_w / 2.0, hot_y + 1.5),
        (18.0, hot_y - 1.0),
        HEATER,
        HEATER,
        false,
    );
    callout(
        &mut ax,
        "CONTROL BOARD\nESP32-S3 (WiFi built-in)\nSSR + Relay drivers\nAC-DC PSU module\n3.5\" TFT LCD display\n100mm \u{00D7} 80mm, 2-layer FR4\nConformal coated",
        (pcb_x + 1.5, pcb_y + 2.5),
        (18.0, pcb_y + 2.0),
        ELECTRONICS,
        ELECTRONICS,
        true,
    );
    callout(
        &mut ax,
        "FILTER MODULE\nTwist-lock bayonet (proprietary)\nNFC tag for lifecycle tracking\nCarbon / UV / RO options\nNo-tool replacement",
        (filter_x, filter_y + filter_h / 2.0),
        (18.0, filter_y + filter_h / 2.0),
        FILTER,
        FILTER_EDGE,
        true,
    );
    callout(
        &mut ax,
        "Solenoid flow valve\nDiverts to cold or hot path",
        (valve_x, valve_y + 0.4),
        (18.0, valve_y),
        GRAY,
        GRAY,
        false,
    );
    callout(
        &mut ax,
        "MAINS WATER INLET\n3/8\" BSP compression\n1-6 bar pressure",
        (16.8, filter_y + 1.7),
        (18.0, filter_y + 4.0),
        WATER_WARM,
        WATER_WARM,
        true,
    );
    callout(
        &mut ax,
        "IEC C14 power inlet\n110-240V AC universal",
        (16.5, 2.7),
        (18.0, 1.5),
        GRAY,
        GRAY,
        true,
    );

    // 圖例：每列 6 項
    let legend = [
        (WATER_COLD, "Cold water path"),
        (WATER_WARM, "Mains / warm water"),
        (WATER_HOT, "Hot water"),
        (REFRIG, "Refrigerant"),
        (COPPER, "Copper lines"),
        (PCM_FROZEN, "PCM coating (frozen)"),
        (INSULATION, "PU insulation"),
        (STEEL, "Stainless steel"),
        (ELECTRONICS, "Electronics"),
        (FILTER, "Filter module"),
        (GASKET, "Gasket / seal"),
    ];
    for (i, (color, name)) in legend.iter().enumerate() {
        let lx = 0.5 + (i % 6) as f32 * 3.4;
        let ly = -0.5 - (i / 6) as f32 * 0.5;
        block(&mut ax, (lx, ly, 0.4, 0.3), *color, None, 0.8);
        ax.add(Mark::Text(
            TextMark::new(lx + 0.55, ly + 0.15, *name)
                .size(8.0)
                .color(GRAY)
                .valign(VAlign::Center),
        ));
    }

    fig.panels.push(ax);
    fig
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::domain::deck::Shape;

    #[test]
    fn test_deck_has_twelve_widescreen_slides() {
        let deck = executive_deck();
        assert_eq!(deck.slides.len(), 12);
        assert!((deck.width - 960.0).abs() < 0.1);
        assert!((deck.height - 540.0).abs() < 0.1);
    }

    #[test]
    fn test_cross_section_slide_keeps_figure_aspect() {
        let deck = executive_deck();
        let frame = deck.slides[4]
            .shapes
            .iter()
            .find_map(|s| match s {
                Shape::Image { frame, path, .. } => {
                    assert!(path.ends_with(CROSS_SECTION_FILE));
                    Some(*frame)
                }
                _ => None,
            })
            .unwrap();
        let aspect = frame.w / frame.h;
        assert!((aspect - CROSS_SECTION_SIZE.0 / CROSS_SECTION_SIZE.1).abs() < 1e-4);
        assert!(((frame.x + frame.w / 2.0) - deck.width / 2.0).abs() < 0.1);
    }

    #[test]
    fn test_cross_section_dpi_follows_render_config() {
        let diagrams = ChillStream.diagrams(&RenderConfig {
            cross_section_dpi: 50.0,
        });
        assert_eq!(diagrams.len(), 1);
        assert_eq!(diagrams[0].figure.pixel_size(), (1000, 1300));
        assert_eq!(diagrams[0].file, "chillstream/cross_section.png");
    }

    #[test]
    fn test_every_slide_starts_with_background_stripe() {
        for slide in executive_deck().slides {
            assert!(matches!(slide.shapes.first(), Some(Shape::Rect { .. })));
        }
    }
}
