//! Season number inference from free-text series titles.
//!
//! Rules are tried in order and the first one that yields a number wins:
//!
//! | # | Rule              | Example                       | Season |
//! |---|-------------------|-------------------------------|--------|
//! | 1 | `s_or_season`     | `Haikyuu!! S2`, `Season 3`    | 2, 3   |
//! | 2 | `ordinal_season`  | `Kaguya-sama 2nd Season`      | 2      |
//! | 3 | `season`          | `Season 4`                    | 4      |
//! | 4 | `part`            | `Final Season Part 2`         | 2      |
//! | 5 | `roman`           | `Overlord IV`                 | 4      |
//! | 6 | `trailing_number` | `One Punch Man 3`             | 3      |
//!
//! This is a heuristic over noisy titles. False positives such as
//! `Final Fantasy VII` are accepted.

use once_cell::sync::Lazy;
use regex::{Captures, Regex};

/// Largest trailing number still treated as a season.
const MAX_TRAILING_SEASON: u32 = 10;

/// One pattern/extractor pair of the inference ladder.
pub struct SeasonRule {
    /// Stable rule name, used in logs.
    pub name: &'static str,
    pattern: Regex,
    extract: fn(&Captures) -> Option<u32>,
}

impl SeasonRule {
    fn new(name: &'static str, pattern: &str, extract: fn(&Captures) -> Option<u32>) -> Self {
        Self {
            name,
            pattern: Regex::new(pattern).expect("Invalid season rule pattern"),
            extract,
        }
    }

    /// Apply this rule alone to a title.
    pub fn apply(&self, title: &str) -> Option<u32> {
        self.pattern
            .captures(title)
            .and_then(|caps| (self.extract)(&caps))
    }
}

/// All rules, highest priority first.
pub static SEASON_RULES: Lazy<Vec<SeasonRule>> = Lazy::new(|| {
    vec![
        SeasonRule::new("s_or_season", r"(?i)\bS(?:eason)?\s*([0-9]{1,2})\b", number),
        SeasonRule::new(
            "ordinal_season",
            r"(?i)\b([0-9]{1,2})(?:st|nd|rd|th)\s+Season\b",
            number,
        ),
        // Already covered by `s_or_season`, kept as a fallback.
        SeasonRule::new("season", r"(?i)\bSeason\s*([0-9]{1,2})\b", number),
        SeasonRule::new("part", r"(?i)\bPart\s*([0-9]{1,2})\b", number),
        SeasonRule::new("roman", r"\b(II|III|IV|V|VI|VII|VIII|IX|X)\b", roman),
        SeasonRule::new("trailing_number", r"([0-9]{1,2})\s*$", trailing_number),
    ]
});

fn number(caps: &Captures) -> Option<u32> {
    caps.get(1)?.as_str().parse().ok()
}

fn roman(caps: &Captures) -> Option<u32> {
    roman_value(caps.get(1)?.as_str())
}

fn trailing_number(caps: &Captures) -> Option<u32> {
    number(caps).filter(|n| (1..=MAX_TRAILING_SEASON).contains(n))
}

/// Value of a Roman numeral token between II and X.
///
/// A lone `I` has no mapping.
pub fn roman_value(token: &str) -> Option<u32> {
    match token {
        "II" => Some(2),
        "III" => Some(3),
        "IV" => Some(4),
        "V" => Some(5),
        "VI" => Some(6),
        "VII" => Some(7),
        "VIII" => Some(8),
        "IX" => Some(9),
        "X" => Some(10),
        _ => None,
    }
}

/// Infer a season number from a series title.
///
/// # Example
/// ```ignore
/// assert_eq!(infer_season("Attack on Titan Season 3"), Some(3));
/// assert_eq!(infer_season("Your Name."), None);
/// ```
pub fn infer_season(title: &str) -> Option<u32> {
    infer_season_with_rule(title).map(|(season, _)| season)
}

/// Infer a season number and report the name of the rule that produced it.
pub fn infer_season_with_rule(title: &str) -> Option<(u32, &'static str)> {
    if title.is_empty() {
        return None;
    }

    SEASON_RULES
        .iter()
        .find_map(|rule| rule.apply(title).map(|season| (season, rule.name)))
}

#[cfg(test)]
mod tests {
    use super::*;

    fn rule(name: &str) -> &'static SeasonRule {
        SEASON_RULES
            .iter()
            .find(|r| r.name == name)
            .expect("unknown rule")
    }

    #[test]
    fn test_rule_order() {
        let names: Vec<&str> = SEASON_RULES.iter().map(|r| r.name).collect();
        assert_eq!(
            names,
            vec![
                "s_or_season",
                "ordinal_season",
                "season",
                "part",
                "roman",
                "trailing_number"
            ]
        );
    }

    #[test]
    fn test_s_or_season_rule() {
        let r = rule("s_or_season");
        assert_eq!(r.apply("Attack on Titan Season 3"), Some(3));
        assert_eq!(r.apply("Haikyuu!! S2"), Some(2));
        assert_eq!(r.apply("toradora s 4"), Some(4));
        assert_eq!(r.apply("SEASON12"), Some(12));
        assert_eq!(r.apply("Season 123"), None);
        assert_eq!(r.apply("Steins;Gate"), None);
    }

    #[test]
    fn test_ordinal_season_rule() {
        let r = rule("ordinal_season");
        assert_eq!(r.apply("Kaguya-sama wa Kokurasetai 2nd Season"), Some(2));
        assert_eq!(r.apply("Yuru Camp 3RD SEASON"), Some(3));
        assert_eq!(r.apply("Gintama 1st season"), Some(1));
        assert_eq!(r.apply("Mushoku Tensei 2nd Cour"), None);
    }

    #[test]
    fn test_season_rule() {
        let r = rule("season");
        assert_eq!(r.apply("Season 4"), Some(4));
        assert_eq!(r.apply("season7"), Some(7));
        assert_eq!(r.apply("S4"), None);
    }

    #[test]
    fn test_part_rule() {
        let r = rule("part");
        assert_eq!(r.apply("JoJo no Kimyou na Bouken Part 5"), Some(5));
        assert_eq!(r.apply("Final Season part2"), Some(2));
        assert_eq!(r.apply("Party Time"), None);
    }

    #[test]
    fn test_roman_rule() {
        let r = rule("roman");
        assert_eq!(r.apply("Mob Psycho 100 II"), Some(2));
        assert_eq!(r.apply("Overlord IV"), Some(4));
        assert_eq!(r.apply("Hunter x Hunter X"), Some(10));
        assert_eq!(r.apply("Durarara!! VIII"), Some(8));
        assert_eq!(r.apply("Kaiji I"), None);
        assert_eq!(r.apply("Overlord iv"), None);
        assert_eq!(r.apply("VIVY"), None);
    }

    #[test]
    fn test_trailing_number_rule() {
        let r = rule("trailing_number");
        assert_eq!(r.apply("One Punch Man 3"), Some(3));
        assert_eq!(r.apply("Title 10  "), Some(10));
        assert_eq!(r.apply("Title 11"), None);
        assert_eq!(r.apply("Steins;Gate 0"), None);
        assert_eq!(r.apply("Mob Psycho 100"), None);
        assert_eq!(r.apply("3 Gatsu no Lion"), None);
        // ASCII digits only
        assert_eq!(r.apply("Title ３"), None);
        assert_eq!(infer_season("Title ３"), None);
    }

    #[test]
    fn test_priority_order() {
        // Season beats Part
        assert_eq!(
            infer_season_with_rule("Show Season 2 Part 3"),
            Some((2, "s_or_season"))
        );
        // Part beats Roman numerals
        assert_eq!(
            infer_season_with_rule("Overlord II Part 3"),
            Some((3, "part"))
        );
        // Roman numerals beat trailing numbers
        assert_eq!(infer_season_with_rule("Title IV 7"), Some((4, "roman")));
        assert_eq!(
            infer_season_with_rule("Shingeki no Kyojin: The Final Season Part 2"),
            Some((2, "part"))
        );
        assert_eq!(
            infer_season_with_rule("Kaguya-sama 2nd Season"),
            Some((2, "ordinal_season"))
        );
    }

    #[test]
    fn test_no_inference() {
        assert_eq!(infer_season(""), None);
        assert_eq!(infer_season("Your Name."), None);
        assert_eq!(infer_season("Fullmetal Alchemist: Brotherhood"), None);
        assert_eq!(infer_season("Mob Psycho 100"), None);
    }

    #[test]
    fn test_deterministic() {
        for title in ["One Punch Man 3", "Overlord IV", "Your Name."] {
            assert_eq!(infer_season(title), infer_season(title));
        }
    }

    #[test]
    fn test_roman_value() {
        assert_eq!(roman_value("II"), Some(2));
        assert_eq!(roman_value("X"), Some(10));
        assert_eq!(roman_value("I"), None);
        assert_eq!(roman_value("XI"), None);
    }
}
