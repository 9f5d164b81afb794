//! Shusher：對著大聲講話的人發出「噓」的桌上小圓盤。
//!
//! 插圖透過聊天網頁產生，輪播封面直接使用這張插圖。

use super::carousel::{
    alternate, cover_image_and_strip, kit, new_deck, section_page, t, BLUE, CARD_BG, CARD_BG_ALT,
    GREEN, LIGHT_GRAY, M, ORANGE, PURPLE, RED, SOFT_WHITE, TOTAL_PAGES, WHITE,
};
use super::{product_path, ChatIllustrationSpec, ConceptProduct, DeckSpec};
use crate::domain::deck::{mm, Deck, Frame};
use crate::domain::model::ArtifactKind;

const KEY: &str = "shusher";
const ILLUSTRATION_FILE: &str = "cross_section_illustration_shusher.png";

pub struct Shusher;

impl ConceptProduct for Shusher {
    fn key(&self) -> &'static str {
        KEY
    }

    fn display_name(&self) -> &'static str {
        "Shusher"
    }

    fn decks(&self) -> Vec<DeckSpec> {
        vec![DeckSpec {
            stem: product_path(KEY, "Shusher_Carousel"),
            formats: vec![ArtifactKind::Pdf, ArtifactKind::Pptx],
            deck: carousel(),
        }]
    }

    fn chat_illustration(&self) -> Option<ChatIllustrationSpec> {
        Some(ChatIllustrationSpec {
            prompt_prefix: "create a longitudinal cross section illustration and an isometric artist \
                            concept of this product. Here is the design document:\n\n",
            design_files: vec![product_path(KEY, "high_level_design.md")],
            reference_image: None,
            output_file: product_path(KEY, ILLUSTRATION_FILE),
        })
    }
}

pub fn carousel() -> Deck {
    let k = kit();
    let cw = k.content_width();
    let mut deck = new_deck("Shusher");

    // 1. 封面
    let mut s = k.page();
    k.accent_strip(&mut s, PURPLE);
    k.text(&mut s, M, mm(14.0), "Shusher", t(42.0, WHITE).bold());
    k.bar(&mut s, M, mm(28.0), mm(35.0), mm(1.0), PURPLE);
    k.text_wrap(
        &mut s,
        M,
        mm(34.0),
        "The polite nudge you never had to give.",
        t(18.0, GREEN).max_w(cw),
    );
    k.text_wrap(
        &mut s,
        M,
        mm(48.0),
        "A palm-sized puck that listens for sustained loud speech, then fires a discreet, \
         human-sounding \"shhh\" toward the offender. You aim it. It does the rest.",
        t(11.0, LIGHT_GRAY).max_w(cw),
    );
    cover_image_and_strip(
        &k,
        &mut s,
        Frame::new(M, mm(70.0), cw, mm(140.0)),
        &product_path(KEY, ILLUSTRATION_FILE),
    );
    k.footer(&mut s, 1, TOTAL_PAGES);
    deck.slides.push(s);

    // 2. 問題
    let mut s = section_page(&k, "The Problem", RED);
    let problems = [
        (
            "Loud talkers and speakerphone abusers",
            "Cafes, coworking spaces, trains -- someone always decides the whole room needs to \
             hear their call. You tolerate it, or you confront a stranger. Neither feels good.",
            RED,
        ),
        (
            "Confrontation is awkward",
            "Asking someone to lower their voice means making yourself the center of attention. \
             Most people avoid it. The loud talker wins by default.",
            ORANGE,
        ),
        (
            "No passive, low-effort solution exists",
            "Noise-cancelling headphones help you, but they don't signal anything to the \
             offender. There's no device that delivers a social nudge without making you the \
             messenger.",
            ORANGE,
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
        "Remote workers  |  Students  |  Commuters",
        t(12.0, WHITE).bold(),
    );
    k.text(
        &mut s,
        M + mm(4.0),
        mm(222.0),
        "Library goers  |  Introverts  |  Anyone who values quiet",
        t(12.0, WHITE).bold(),
    );
    k.footer(&mut s, 2, TOTAL_PAGES);
    deck.slides.push(s);

    // 3. 運作方式
    let mut s = section_page(&k, "How It Works", GREEN);
    let steps = [
        (
            "Aim",
            "Point the puck at the noise source",
            "Place Shusher on your table and aim the front face toward the loud talker. Press \
             the side button once. A brief vibration confirms it's active.",
            BLUE,
        ),
        (
            "Detect",
            "Device listens and compares",
            "Two mics -- front (cardioid) and rear (omni) -- measure audio levels continuously. \
             When the front mic detects sustained loud speech 10+ dB above the ambient baseline \
             for 6+ seconds, the trigger fires.",
            GREEN,
        ),
        (
            "Shush",
            "A natural \"shhh\" fires forward",
            "A pre-recorded human shush plays through a front-facing speaker with waveguide. \
             Audible at the offender's table (2-5m), but blends with cafe noise for everyone \
             else. Sounds human. Plausibly deniable.",
            PURPLE,
        ),
        (
            "Cool",
            "Wait, then repeat if needed",
            "After a shush, a 30-60 second cooldown prevents re-triggering. One polite nudge per \
             incident. If they get loud again, another shush fires.",
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
    k.text(&mut s, M + mm(4.0), mm(32.0), "Detection Chain", t(11.0, BLUE).bold());
    k.text(
        &mut s,
        M + mm(4.0),
        mm(41.0),
        "Front mic  -->  Bandpass  -->  RMS  -->  Differential  -->  Trigger",
        t(12.0, WHITE).bold(),
    );
    k.text(
        &mut s,
        M + mm(4.0),
        mm(49.0),
        "cardioid PDM    300-4kHz IIR    50ms window    front vs rear    sustained >6s",
        t(8.0, LIGHT_GRAY),
    );
    k.card(&mut s, M, mm(60.0), cw, mm(22.0), CARD_BG);
    k.text(&mut s, M + mm(4.0), mm(64.0), "Shush Chain", t(11.0, GREEN).bold());
    k.text(
        &mut s,
        M + mm(4.0),
        mm(72.0),
        "Flash sample  -->  I2S  -->  MAX98357A  -->  Speaker + Waveguide",
        t(10.0, WHITE).bold(),
    );
    k.bar(&mut s, M, mm(88.0), cw, mm(1.0), BLUE);
    k.text(&mut s, M, mm(92.0), "SUBSYSTEMS", t(11.0, BLUE).bold());
    let subsystems = [
        ("MCU (ESP32-S3)", "Dual-core 240 MHz, audio DSP, BLE 5.0, 8MB flash", GREEN),
        (
            "Front mic (ICS-43434)",
            "Cardioid via acoustic porting, PDM 16 kHz, 65 dB SNR",
            PURPLE,
        ),
        ("Rear mic (ICS-43434)", "Omnidirectional, ambient baseline reference", GREEN),
        (
            "Speaker (28mm + waveguide)",
            "Forward-biased shush output, 80-85 dB @ 10cm",
            BLUE,
        ),
        ("Amp (MAX98357A)", "I2S class-D, auto-shutdown when idle", ORANGE),
        ("Power (1200 mAh LiPo)", "USB-C charging, ~3 days per charge", ORANGE),
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
        "Designed to disappear",
        t(13.0, PURPLE).bold(),
    );
    k.text_wrap(
        &mut s,
        M + mm(4.0),
        mm(216.0),
        "No visible LEDs during operation. No electronic sound artifacts. The shush sounds \
         human -- breathy, variable, naturally timed. The offender wonders if someone nearby \
         shushed them. Not a gadget.",
        t(9.0, LIGHT_GRAY).max_w(cw - mm(8.0)).line_h(12.0),
    );
    k.footer(&mut s, 4, TOTAL_PAGES);
    deck.slides.push(s);

    // 5. 不著痕跡
    let mut s = section_page(&k, "Plausible Deniability", PURPLE);
    k.text_wrap(
        &mut s,
        M,
        mm(28.0),
        "The product works only if nobody knows it's there.",
        t(13.0, LIGHT_GRAY).max_w(cw),
    );
    k.card(&mut s, M, mm(42.0), cw, mm(45.0), CARD_BG);
    k.bar(&mut s, M, mm(42.0), cw, mm(1.5), GREEN);
    k.text(&mut s, M + mm(5.0), mm(48.0), "Looks like a coaster", t(16.0, GREEN).bold());
    k.text_wrap(
        &mut s,
        M + mm(5.0),
        mm(60.0),
        "70mm diameter, 15mm tall, matte dark puck. No branding on top. Speaker slot disguised \
         as a seam line. Mic port looks like a mold mark. Sits naturally on any cafe table.",
        t(11.0, LIGHT_GRAY).max_w(cw - mm(10.0)).line_h(14.0),
    );
    k.card(&mut s, M, mm(94.0), cw, mm(55.0), CARD_BG);
    k.bar(&mut s, M, mm(94.0), cw, mm(1.5), PURPLE);
    k.text(&mut s, M + mm(5.0), mm(100.0), "Sounds human", t(16.0, PURPLE).bold());
    k.text_wrap(
        &mut s,
        M + mm(5.0),
        mm(112.0),
        "20+ pre-recorded shush variants across 5 styles: classic \"shhh,\" throat clear, \
         gentle \"ahem,\" whispered \"excuse me,\" and passive-aggressive sigh. Each firing \
         picks a different sample. Breathy, slightly variable, naturally timed. No robotic \
         quality, no beeps, no electronic artifacts.",
        t(11.0, LIGHT_GRAY).max_w(cw - mm(10.0)).line_h(14.0),
    );
    k.card(&mut s, M, mm(158.0), cw, mm(70.0), CARD_BG_ALT);
    k.text(
        &mut s,
        M + mm(5.0),
        mm(163.0),
        "The discretion stack",
        t(13.0, ORANGE).bold(),
    );
    let discretion = [
        (
            "No LEDs during operation",
            "A single LED under the device confirms power-on, then goes dark. Invisible on a table.",
        ),
        (
            "Forward-biased audio",
            "Waveguide provides ~4-6 dB front-to-side ratio. The target hears it; side-facing \
             listeners don't.",
        ),
        (
            "Cooldown prevents harassment",
            "Max one shush per 30-60 seconds. A polite nudge, not a weapon. The offender \
             self-corrects or doesn't.",
        ),
    ];
    let mut ry = mm(175.0);
    for (title, desc) in discretion {
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
        ("Battery life", "~3 days", "1200 mAh LiPo, 4-hr daily active sessions"),
        ("Size", "70mm x 15mm", "Coaster-sized puck, fits naturally on a table"),
        ("Shush range", "2-5 meters", "Audible to the target, blends beyond 5m"),
        ("Trigger latency", "~6 seconds", "Sustained loud speech, not brief bursts"),
        ("False positive rate", "< 1 / hour", "Shushing the barista is a product killer"),
        ("Weight", "~65g", "PCB 20g + battery 25g + enclosure 15g + speaker 5g"),
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
        ("ESP32-S3-WROOM-1 (N8)", "$2.80"),
        ("Front MEMS mic (ICS-43434)", "$0.80"),
        ("Rear MEMS mic (ICS-43434)", "$0.80"),
        ("MAX98357A class-D amp", "$1.20"),
        ("28mm dynamic speaker", "$0.60"),
        ("LRA haptic motor (8mm)", "$0.50"),
        ("LiPo battery (1200 mAh)", "$2.50"),
        ("MCP73831 charge IC + USB-C", "$0.80"),
        ("LDO + passives + RGB LED", "$0.50"),
        ("PCB (55mm round, 4-layer)", "$1.20"),
        ("Enclosure (2-piece + waveguide)", "$2.50"),
        ("Packaging + assembly + test", "$2.80"),
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
        "~$17.25  (5k: ~$13.50)",
        t(10.0, WHITE).bold().right(cw - mm(16.0)),
    );
    k.footer(&mut s, 6, TOTAL_PAGES);
    deck.slides.push(s);

    // 7. 最難的問題
    let mut s = section_page(&k, "Hardest Problems", RED);
    let hard = [
        (
            "Distinguishing shush-worthy noise from cafe ambiance",
            "The front mic picks up everything in the aimed direction -- the loud talker, but \
             also music, dish clatter, espresso machines. The classifier must isolate sustained \
             loud speech above the ambient baseline and hold for seconds before triggering. Too \
             sensitive: shushes the barista. Too conservative: never fires.",
        ),
        (
            "Making the shush sound convincingly human",
            "If the shush sounds electronic or robotic, the product fails socially. It needs to \
             sound like a real person -- breathy, slightly variable, naturally timed. Speaker \
             coloration, waveguide resonances, and enclosure vibration could add artifacts. \
             Multiple recordings with randomized selection on each firing.",
        ),
        (
            "Achieving useful directivity from a small speaker",
            "A 70mm puck with a 28mm speaker and short waveguide won't produce a tight beam. \
             Target: ~4-6 dB front-to-side ratio at 2-4 kHz (the \"shhh\" frequency range). \
             Enough to make the shush louder for the target than for people at 90 degrees, but \
             not a laser. Waveguide geometry and speaker placement are critical.",
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
        "All three require physical prototyping. Acoustic porting, waveguide geometry, and \
         sound recording quality can only be validated by building and testing in real \
         environments.",
        t(11.0, ORANGE).max_w(cw - mm(8.0)).line_h(14.0),
    );
    k.footer(&mut s, 7, TOTAL_PAGES);
    deck.slides.push(s);

    // 8. 關卡結果與待辦
    let mut s = section_page(&k, "Gate Result & Next", GREEN);
    k.card(&mut s, M, mm(28.0), cw, mm(22.0), CARD_BG);
    k.card(&mut s, M + mm(4.0), mm(31.0), mm(50.0), mm(16.0), ORANGE);
    k.text(&mut s, M + mm(8.0), mm(35.0), "GATE: 74 PASS", t(16.0, WHITE).bold());
    k.text(&mut s, M + mm(8.0), mm(43.0), "74 pass / 6 N/A / 8 fail", t(9.0, WHITE));
    k.text(&mut s, M + mm(60.0), mm(36.0), "System description complete.", t(11.0, WHITE));
    k.text(
        &mut s,
        M + mm(60.0),
        mm(44.0),
        "8 items need prototype validation.",
        t(11.0, ORANGE).bold(),
    );
    k.card(&mut s, M, mm(54.0), cw, mm(22.0), CARD_BG);
    k.text(&mut s, M + mm(4.0), mm(58.0), "POWER", t(10.0, BLUE).bold());
    k.text(
        &mut s,
        M + mm(4.0),
        mm(66.0),
        "84 mA active  |  2.3 mA standby  |  1200 mAh battery",
        t(11.0, WHITE),
    );
    k.text(
        &mut s,
        M + mm(4.0),
        mm(73.0),
        "~3 days typical  |  USB-C charge  |  ~2.5 hr 0-100%",
        t(10.0, LIGHT_GRAY),
    );
    k.card(&mut s, M, mm(80.0), cw, mm(22.0), CARD_BG_ALT);
    k.text(&mut s, M + mm(4.0), mm(84.0), "KEY SPECS", t(10.0, PURPLE).bold());
    k.text(
        &mut s,
        M + mm(4.0),
        mm(92.0),
        "70mm x 15mm puck  |  ~65g  |  ESP32-S3  |  BLE 5.0",
        t(10.0, WHITE),
    );
    k.text(
        &mut s,
        M + mm(4.0),
        mm(99.0),
        "2 MEMS mics  |  Waveguide speaker  |  $50-70 retail",
        t(10.0, LIGHT_GRAY),
    );
    k.bar(&mut s, M, mm(108.0), cw, mm(1.0), ORANGE);
    k.text(&mut s, M, mm(112.0), "KEY OPEN ITEMS", t(11.0, ORANGE).bold());
    let open_items = [
        ("M2", "Cardioid mic porting: 10-15 dB front-to-rear rejection?"),
        ("M2", "Waveguide: >4 dB front-to-side ratio at 2-4 kHz?"),
        ("M2", "Shush naturalness through 28mm speaker in plastic enclosure"),
        ("M3", "False positive rate in 5+ real cafe environments"),
        ("M2", "ESP32-S3 BLE + dual-mic audio coexistence under load"),
        ("M2", "Sound recording session: 20+ shush variants, 5 styles"),
        ("M1", "Market positioning: $50 tool vs. $30 fun gadget"),
        ("M3", "DSP duty-cycle optimization for extended battery life"),
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
        "Next step: breadboard prototype on an ESP32-S3 devkit with two MEMS mics and a small \
         speaker. Test the front/rear differential in a real cafe. Record the shush samples. \
         Validate before committing to PCB and enclosure tooling.",
        t(10.0, WHITE).max_w(cw - mm(8.0)).line_h(13.0),
    );
    k.footer(&mut s, 8, TOTAL_PAGES);
    deck.slides.push(s);

    deck
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_chat_illustration_has_no_reference() {
        assert!(Shusher.api_images().is_empty());
        let spec = Shusher.chat_illustration().unwrap();
        assert!(spec.reference_image.is_none());
        assert!(spec
            .prompt_prefix
            .starts_with("create a longitudinal cross section illustration and an isometric artist concept"));
    }

    #[test]
    fn test_carousel_cover_uses_chat_illustration() {
        let decks = Shusher.decks();
        assert_eq!(decks.len(), 1);
        assert_eq!(decks[0].file_for(ArtifactKind::Pdf), "shusher/Shusher_Carousel.pdf");
        let deck = &decks[0].deck;
        assert_eq!(deck.slides.len(), TOTAL_PAGES);
        let illustration = Shusher.chat_illustration().unwrap().output_file;
        let paths = deck.image_paths();
        assert_eq!(paths.len(), 1);
        assert_eq!(paths[0].to_str(), Some(illustration.as_str()));
    }

    #[test]
    fn test_gate_page_lists_eight_open_items() {
        let deck = carousel();
        let gate = deck.slides[7].text_content();
        assert!(gate.contains(&"GATE: 74 PASS"));
        assert_eq!(gate.iter().filter(|s| s.starts_with('M') && s.len() == 2).count(), 8);
        assert!(deck.slides[7].text_content().contains(&"8/8"));
    }
}
