//! Life-like rule notation (`B3/S23`) and the built-in presets.

use std::fmt;
use std::str::FromStr;

use crate::error::{SimError, SimResult};

/// Birth and survival masks over neighbor counts 0..=8.
///
/// Bit `k` of `birth_mask` means a dead cell with exactly `k` live neighbors is
/// born; bit `k` of `survive_mask` means a live cell with `k` live neighbors
/// stays alive.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash)]
pub struct RuleMasks {
    pub birth_mask: u32,
    pub survive_mask: u32,
}

/// Conway's Life, B3/S23.
pub const LIFE_MASKS: RuleMasks = RuleMasks {
    birth_mask: 1 << 3,
    survive_mask: (1 << 2) | (1 << 3),
};

/// HighLife, B36/S23.
pub const HIGHLIFE_MASKS: RuleMasks = RuleMasks {
    birth_mask: (1 << 3) | (1 << 6),
    survive_mask: (1 << 2) | (1 << 3),
};

/// Highest neighbor count in a Moore neighborhood
const MAX_NEIGHBORS: u32 = 8;

impl RuleMasks {
    /// Whether a dead cell with `neighbors` live neighbors is born.
    pub fn births(&self, neighbors: u32) -> bool {
        neighbors <= MAX_NEIGHBORS && self.birth_mask & (1 << neighbors) != 0
    }

    /// Whether a live cell with `neighbors` live neighbors survives.
    pub fn survives(&self, neighbors: u32) -> bool {
        neighbors <= MAX_NEIGHBORS && self.survive_mask & (1 << neighbors) != 0
    }
}

impl Default for RuleMasks {
    fn default() -> Self {
        LIFE_MASKS
    }
}

impl fmt::Display for RuleMasks {
    /// Formats the masks back into `B.../S...` notation with sorted digits.
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "B")?;
        for k in (0..=MAX_NEIGHBORS).filter(|k| self.births(*k)) {
            write!(f, "{k}")?;
        }
        write!(f, "/S")?;
        for k in (0..=MAX_NEIGHBORS).filter(|k| self.survives(*k)) {
            write!(f, "{k}")?;
        }
        Ok(())
    }
}

impl FromStr for RuleMasks {
    type Err = SimError;

    fn from_str(s: &str) -> SimResult<Self> {
        parse_rule_string(s)
    }
}

/// Named rule choices offered to the host.
#[derive(Clone, Copy, Debug, Default, PartialEq, Eq, Hash)]
pub enum RulePreset {
    #[default]
    Life,
    HighLife,
    /// Use the accompanying rule string.
    Custom,
}

/// A preset plus the rule string consulted for [`RulePreset::Custom`].
#[derive(Clone, Debug, Default, PartialEq, Eq)]
pub struct RuleSpec {
    pub rule: RulePreset,
    pub rule_string: Option<String>,
}

impl RuleSpec {
    pub fn preset(rule: RulePreset) -> Self {
        Self {
            rule,
            rule_string: None,
        }
    }

    pub fn custom(rule_string: impl Into<String>) -> Self {
        Self {
            rule: RulePreset::Custom,
            rule_string: Some(rule_string.into()),
        }
    }
}

/// Build a mask from neighbor counts, rejecting anything outside 0..=8.
pub fn digits_to_mask(digits: &[u32]) -> SimResult<u32> {
    digits.iter().try_fold(0u32, |mask, &d| {
        if d > MAX_NEIGHBORS {
            return Err(SimError::InvalidNeighborDigit(d));
        }
        Ok(mask | (1 << d))
    })
}

/// Neighbor counts of one side of the rule. Non-digit characters are a syntax
/// error; the digit 9 is reported as an invalid neighbor count.
fn side_digits(side: &str, original: &str) -> SimResult<Vec<u32>> {
    side.chars()
        .map(|c| {
            c.to_digit(10)
                .ok_or_else(|| SimError::InvalidRuleSyntax(original.to_string()))
        })
        .collect()
}

/// Parse Life-like notation such as `B3/S23` or `b36 / s23`.
///
/// The string is trimmed and matched case-insensitively against
/// `B<digits>/S<digits>`; whitespace is allowed only around the slash.
/// Either digit list may be empty.
pub fn parse_rule_string(rule_string: &str) -> SimResult<RuleMasks> {
    let syntax = || SimError::InvalidRuleSyntax(rule_string.to_string());
    let raw = rule_string.trim().to_ascii_uppercase();

    let rest = raw.strip_prefix('B').ok_or_else(syntax)?;
    let (birth, survive) = rest.split_once('/').ok_or_else(syntax)?;
    let survive = survive.trim_start().strip_prefix('S').ok_or_else(syntax)?;

    let birth_digits = side_digits(birth.trim_end(), rule_string)?;
    let survive_digits = side_digits(survive, rule_string)?;

    Ok(RuleMasks {
        birth_mask: digits_to_mask(&birth_digits)?,
        survive_mask: digits_to_mask(&survive_digits)?,
    })
}

/// Resolve a preset (or custom string) to masks.
pub fn resolve_rule_masks(spec: &RuleSpec) -> SimResult<RuleMasks> {
    match spec.rule {
        RulePreset::Life => Ok(LIFE_MASKS),
        RulePreset::HighLife => Ok(HIGHLIFE_MASKS),
        RulePreset::Custom => match spec.rule_string.as_deref() {
            Some(s) if !s.is_empty() => parse_rule_string(s),
            _ => Err(SimError::MissingRuleString),
        },
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_parse_life() {
        assert_eq!(parse_rule_string("B3/S23").unwrap(), LIFE_MASKS);
    }

    #[test]
    fn test_parse_highlife() {
        assert_eq!(parse_rule_string("B36/S23").unwrap(), HIGHLIFE_MASKS);
    }

    #[test]
    fn test_parse_case_and_whitespace() {
        assert_eq!(parse_rule_string("  b36 / s23 \n").unwrap(), HIGHLIFE_MASKS);
    }

    #[test]
    fn test_parse_empty_sides() {
        let masks = parse_rule_string("B/S").unwrap();
        assert_eq!(masks.birth_mask, 0);
        assert_eq!(masks.survive_mask, 0);

        let seeds = parse_rule_string("B2/S").unwrap();
        assert_eq!(seeds.birth_mask, 1 << 2);
        assert_eq!(seeds.survive_mask, 0);
    }

    #[test]
    fn test_parse_repeated_digits() {
        assert_eq!(parse_rule_string("B33/S2323").unwrap(), LIFE_MASKS);
    }

    #[test]
    fn test_rejects_bad_syntax() {
        for bad in ["life", "", "B3S23", "S23/B3", "B3/23", "B 3/S23", "B3/S2x", "B-1/S23"] {
            assert!(
                matches!(parse_rule_string(bad), Err(SimError::InvalidRuleSyntax(_))),
                "'{}' should be a syntax error",
                bad
            );
        }
    }

    #[test]
    fn test_rejects_digit_nine() {
        assert!(matches!(
            parse_rule_string("B9/S23"),
            Err(SimError::InvalidNeighborDigit(9))
        ));
        assert!(matches!(
            parse_rule_string("B3/S239"),
            Err(SimError::InvalidNeighborDigit(9))
        ));
    }

    #[test]
    fn test_digits_to_mask() {
        assert_eq!(digits_to_mask(&[0, 8]).unwrap(), 0b1_0000_0001);
        assert!(matches!(
            digits_to_mask(&[3, 12]),
            Err(SimError::InvalidNeighborDigit(12))
        ));
    }

    #[test]
    fn test_resolve_presets() {
        let life = resolve_rule_masks(&RuleSpec::preset(RulePreset::Life)).unwrap();
        assert_eq!(life.birth_mask, 0b1000);
        assert_eq!(life.survive_mask, 0b1100);

        let high = resolve_rule_masks(&RuleSpec::preset(RulePreset::HighLife)).unwrap();
        assert_eq!(high.birth_mask, (1 << 3) | (1 << 6));
        assert_eq!(high.survive_mask, (1 << 2) | (1 << 3));
    }

    #[test]
    fn test_resolve_custom() {
        let masks = resolve_rule_masks(&RuleSpec::custom("B36/S23")).unwrap();
        assert_eq!(masks, HIGHLIFE_MASKS);

        let missing = RuleSpec::preset(RulePreset::Custom);
        assert!(matches!(
            resolve_rule_masks(&missing),
            Err(SimError::MissingRuleString)
        ));
    }

    #[test]
    fn test_display_round_trip() {
        // Every birth/survive mask pair formats to a string that parses back
        for birth_mask in 0..512u32 {
            for survive_mask in 0..512u32 {
                let masks = RuleMasks {
                    birth_mask,
                    survive_mask,
                };
                let text = masks.to_string();
                let reparsed: RuleMasks = text.parse().unwrap();
                assert_eq!(masks, reparsed, "round trip via '{}'", text);
            }
        }
        assert_eq!(HIGHLIFE_MASKS.to_string(), "B36/S23");
        assert_eq!(parse_rule_string("B63/S32").unwrap(), HIGHLIFE_MASKS);
    }

    #[test]
    fn test_mask_queries() {
        assert!(LIFE_MASKS.births(3));
        assert!(!LIFE_MASKS.births(2));
        assert!(LIFE_MASKS.survives(2));
        assert!(!LIFE_MASKS.survives(4));
        assert!(!LIFE_MASKS.survives(40));
    }
}
