//! Label line-breaking and SVG text helpers.

use std::borrow::Cow;

/// Labels shorter than this many characters stay on one line.
pub const MAX_LINE_CHARS: usize = 24;

/// Break a label into one or two lines of roughly equal length.
///
/// This balances character counts, not rendered width, which is good enough
/// for the card font. A line break is only tried between the first and the
/// last word; when no such position exists the label stays on one line.
pub fn fit_lines(s: &str) -> Vec<String> {
    if s.chars().count() < MAX_LINE_CHARS {
        return vec![s.to_string()];
    }

    let words: Vec<&str> = s.split(' ').collect();
    let mut best: Option<(String, String)> = None;
    let mut diff: usize = words.iter().map(|w| w.chars().count()).sum();

    for i in 1..words.len().saturating_sub(1) {
        let top = words[..i].join(" ");
        let bot = words[i..].join(" ");
        let d = top.chars().count().abs_diff(bot.chars().count());
        if d < diff {
            diff = d;
            best = Some((top, bot));
        }
    }

    match best {
        Some((top, bot)) => vec![top, bot],
        None => vec![s.to_string()],
    }
}

/// Escape text for embedding in SVG content or attributes.
pub fn escape(s: &str) -> Cow<'_, str> {
    htmlize::escape_all_quotes(s)
}

/// Format a coordinate with at most three decimals and no trailing zeros.
pub fn num(v: f64) -> String {
    let rounded = (v * 1000.0).round() / 1000.0;
    if rounded == 0.0 {
        return "0".to_string();
    }
    let s = format!("{rounded:.3}");
    s.trim_end_matches('0').trim_end_matches('.').to_string()
}

#[cfg(test)]
mod tests {
    use super::*;
    use pretty_assertions::assert_eq;

    #[test]
    fn short_labels_are_untouched() {
        for s in ["", "Abba", "Waterloo", "exactly twenty-three ch"] {
            assert!(s.chars().count() < MAX_LINE_CHARS);
            assert_eq!(fit_lines(s), vec![s.to_string()]);
        }
    }

    #[test]
    fn picks_most_balanced_split() {
        let lines = fit_lines("AAAA BBBB CCCC DDDDDDDDDDDDDDD");
        assert_eq!(lines, vec!["AAAA BBBB", "CCCC DDDDDDDDDDDDDDD"]);
    }

    #[test]
    fn never_splits_before_last_word() {
        // Breaking before "zzz…" would balance better, but the last word
        // always shares a line with its predecessor.
        let lines = fit_lines("x yyyyyyyyyyyy zzzzzzzzzzzz");
        assert_eq!(lines, vec!["x", "yyyyyyyyyyyy zzzzzzzzzzzz"]);
    }

    #[test]
    fn ties_keep_the_earliest_split() {
        // Splits after word 1 and word 2 both give a difference of 7.
        let lines = fit_lines("aaaaaaaaaaa bbbbbb ccccc ddddd");
        assert_eq!(lines, vec!["aaaaaaaaaaa", "bbbbbb ccccc ddddd"]);
    }

    #[test]
    fn split_lines_reconstruct_the_input() {
        let inputs = [
            "Everybody Wants to Rule the World",
            "The Rhythm of the Night (Radio Edit)",
            "Don't You (Forget About Me) – Single Version",
        ];
        for s in inputs {
            let lines = fit_lines(s);
            assert_eq!(lines.len(), 2, "{s}");
            assert_eq!(format!("{} {}", lines[0], lines[1]), s);
        }
    }

    #[test]
    fn unsplittable_labels_stay_on_one_line() {
        let one = "Supercalifragilisticexpialidocious";
        assert_eq!(fit_lines(one), vec![one.to_string()]);
        let two = "Supercalifragilistic expialidocious";
        assert_eq!(fit_lines(two), vec![two.to_string()]);
    }

    #[test]
    fn escapes_markup() {
        assert_eq!(escape("Simon & Garfunkel"), "Simon &amp; Garfunkel");
        assert_eq!(escape("<b>"), "&lt;b&gt;");
    }

    #[test]
    fn formats_numbers_compactly() {
        assert_eq!(num(12.0), "12");
        assert_eq!(num(2.4000000000000004), "2.4");
        assert_eq!(num(-0.0001), "0");
        assert_eq!(num(43.25), "43.25");
    }
}
