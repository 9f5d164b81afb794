//! Advance widths for the base-14 Helvetica faces, in 1/1000 em.
//!
//! Wrapping decisions in both deck renderers are made with these tables, so
//! PDF and PPTX break lines at the same words.

const HELVETICA: [u16; 95] = [
    278, 278, 355, 556, 556, 889, 667, 191, 333, 333, 389, 584, 278, 333, 278, 278, // ' '..'/'
    556, 556, 556, 556, 556, 556, 556, 556, 556, 556, 278, 278, 584, 584, 584, 556, // '0'..'?'
    1015, 667, 667, 722, 722, 667, 611, 778, 722, 278, 500, 667, 556, 833, 722, 778, // '@'..'O'
    667, 778, 722, 667, 611, 722, 667, 944, 667, 667, 611, 278, 278, 278, 469, 556, // 'P'..'_'
    333, 556, 556, 500, 556, 556, 278, 556, 556, 222, 222, 500, 222, 833, 556, 556, // '`'..'o'
    556, 556, 333, 500, 278, 556, 500, 722, 500, 500, 500, 334, 260, 334, 584, // 'p'..'~'
];

const HELVETICA_BOLD: [u16; 95] = [
    278, 333, 474, 556, 556, 889, 722, 238, 333, 333, 389, 584, 278, 333, 278, 278,
    556, 556, 556, 556, 556, 556, 556, 556, 556, 556, 333, 333, 584, 584, 584, 611,
    975, 722, 722, 722, 722, 667, 611, 778, 722, 278, 556, 722, 611, 833, 722, 778,
    667, 778, 722, 667, 611, 722, 667, 944, 667, 667, 611, 333, 278, 333, 584, 556,
    333, 556, 611, 556, 611, 556, 333, 611, 611, 278, 278, 556, 278, 889, 611, 611,
    611, 611, 389, 556, 333, 611, 556, 778, 556, 556, 500, 389, 280, 389, 584,
];

const FALLBACK_WIDTH: u16 = 556;

fn char_width(c: char, bold: bool) -> u16 {
    let code = c as u32;
    if (32..=126).contains(&code) {
        let idx = (code - 32) as usize;
        return if bold { HELVETICA_BOLD[idx] } else { HELVETICA[idx] };
    }
    match c {
        '\u{00B0}' => 400,
        '\u{00D7}' | '\u{00B1}' => 584,
        '\u{00D8}' => 778,
        '\u{2022}' => 350,
        '\u{2013}' => 556,
        '\u{2014}' => 1000,
        '\u{2018}' | '\u{2019}' => {
            if bold {
                278
            } else {
                222
            }
        }
        '\u{201C}' | '\u{201D}' => {
            if bold {
                500
            } else {
                333
            }
        }
        _ => FALLBACK_WIDTH,
    }
}

/// Width of `text` in points at `size` pt.
pub fn string_width(text: &str, size: f32, bold: bool) -> f32 {
    let units: u32 = text.chars().map(|c| char_width(c, bold) as u32).sum();
    units as f32 * size / 1000.0
}

/// Greedy word wrap. A single word wider than `max_width` gets its own line.
pub fn wrap_words(text: &str, size: f32, bold: bool, max_width: f32) -> Vec<String> {
    let mut lines = Vec::new();
    let mut current = String::new();

    for word in text.split_whitespace() {
        let candidate = if current.is_empty() {
            word.to_string()
        } else {
            format!("{} {}", current, word)
        };
        if string_width(&candidate, size, bold) > max_width {
            if !current.is_empty() {
                lines.push(std::mem::take(&mut current));
            }
            current = word.to_string();
        } else {
            current = candidate;
        }
    }
    if !current.is_empty() {
        lines.push(current);
    }
    lines
}

/// Encodes text as WinAnsiEncoding bytes. Unmappable characters become `?`.
pub fn encode_win_ansi(text: &str) -> Vec<u8> {
    text.chars()
        .map(|c| match c {
            '\u{20AC}' => 0x80,
            '\u{2018}' => 0x91,
            '\u{2019}' => 0x92,
            '\u{201C}' => 0x93,
            '\u{201D}' => 0x94,
            '\u{2022}' => 0x95,
            '\u{2013}' => 0x96,
            '\u{2014}' => 0x97,
            '\u{2122}' => 0x99,
            c if (c as u32) < 0x80 => c as u8,
            c if (0xA0..=0xFF).contains(&(c as u32)) => c as u32 as u8,
            _ => b'?',
        })
        .collect()
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_string_width_matches_afm() {
        // "Hello" = 722 + 556 + 222 + 222 + 556
        assert!((string_width("Hello", 10.0, false) - 22.78).abs() < 1e-3);
        // bold "Hi" = 722 + 278
        assert!((string_width("Hi", 10.0, true) - 10.0).abs() < 1e-3);
    }

    #[test]
    fn test_wrap_words_breaks_on_width() {
        let lines = wrap_words("one two three four", 10.0, false, 40.0);
        assert!(lines.len() > 1);
        for line in &lines {
            assert!(string_width(line, 10.0, false) <= 40.0 || !line.contains(' '));
        }
        assert_eq!(lines.join(" "), "one two three four");
    }

    #[test]
    fn test_wrap_keeps_long_word_on_own_line() {
        let lines = wrap_words("a supercalifragilistic b", 10.0, false, 30.0);
        assert_eq!(lines, vec!["a", "supercalifragilistic", "b"]);
    }

    #[test]
    fn test_win_ansi_encoding() {
        assert_eq!(encode_win_ansi("A\u{2014}B"), vec![b'A', 0x97, b'B']);
        assert_eq!(encode_win_ansi("25\u{00B0}C"), vec![b'2', b'5', 0xB0, b'C']);
        assert_eq!(encode_win_ansi("\u{2192}"), vec![b'?']);
    }
}
