use std::fmt;
use std::str::FromStr;

use thiserror::Error;

use crate::cell;

/// Rules of Conway's Game of Life, the only rule [`Population`](crate::Population) runs.
pub const B3S23: Rule = Rule::new(1 << cell::BIRTH_COUNT, 0b1100);

/// A life-like rulestring, parsed only so pattern files can be checked against [`B3S23`].
///
/// # Representation
/// Births and survivals are each a bitmask over neighbor counts: bit `i` on means `i`
/// neighbors is in the set.
/// ```notrust
/// b3s23:                births 0_0000_1000, survivals 0_0000_1100
/// b012345678s012345678: births 1_1111_1111, survivals 1_1111_1111
/// ```
///
/// # Format
///
/// Any of `B3/S23`, `b3s23`, `S23/B3` or the nameless `23/3` (survivals first).
///
/// See: https://conwaylife.com/wiki/Rulestring
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct Rule {
    births: u16,
    survivals: u16,
}

impl Default for Rule {
    fn default() -> Self {
        B3S23
    }
}

impl Rule {
    /// Anything past the 9th bit is ignored.
    pub const fn new(births: u16, survivals: u16) -> Self {
        Self {
            births: births & 0x1FF,
            survivals: survivals & 0x1FF,
        }
    }

    pub fn births(&self) -> u16 {
        self.births
    }

    pub fn survivals(&self) -> u16 {
        self.survivals
    }

    pub fn is_conway(&self) -> bool {
        *self == B3S23
    }
}

#[derive(Debug, Error, PartialEq, Eq)]
pub enum RuleError {
    #[error("Empty rule")]
    Empty,

    #[error("Invalid neighbor count '{got}', expected 0-8")]
    InvalidDigit { got: char },

    #[error("Expected births and survivals, found \"{got}\"")]
    Malformed { got: String },
}

impl FromStr for Rule {
    type Err = RuleError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        let s = s.trim();
        if s.is_empty() {
            return Err(RuleError::Empty);
        }

        let malformed = || RuleError::Malformed { got: s.to_string() };

        let (mut births, mut survivals) = (None, None);

        let first = s.as_bytes()[0];
        if first.is_ascii_digit() || first == b'/' {
            // nameless, survivals first
            let (s_part, b_part) = s.split_once('/').ok_or_else(malformed)?;

            survivals = Some(counts(s_part)?);
            births = Some(counts(b_part)?);
        } else {
            // split on the letters, so both `b3/s23` and `b3s23` work
            let mut rest = s;
            while let Some(c) = rest.chars().next() {
                let tail = &rest[c.len_utf8()..];
                let end = tail.find(|c: char| !c.is_ascii_digit()).unwrap_or(tail.len());
                let (digits, tail) = tail.split_at(end);

                let slot = match c {
                    'b' | 'B' => &mut births,
                    's' | 'S' => &mut survivals,
                    _ => return Err(malformed()),
                };

                if slot.is_some() {
                    return Err(malformed());
                }

                *slot = Some(counts(digits)?);

                rest = tail.strip_prefix('/').unwrap_or(tail);
            }
        }

        match (births, survivals) {
            (Some(b), Some(s)) => Ok(Rule::new(b, s)),
            _ => Err(malformed()),
        }
    }
}

/// Convert the human readable neighbor counts to a packed bit representation
fn counts(digits: &str) -> Result<u16, RuleError> {
    let mut n = 0;

    for c in digits.chars() {
        match c.to_digit(10) {
            Some(d) if d <= 8 => n |= 1 << d,
            _ => return Err(RuleError::InvalidDigit { got: c }),
        }
    }

    Ok(n)
}

impl fmt::Display for Rule {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let digits = |mask: u16| -> String {
            (0..=8u8)
                .filter(|i| mask & (1 << i) != 0)
                .map(|i| char::from(b'0' + i))
                .collect()
        };

        write!(f, "B{}/S{}", digits(self.births), digits(self.survivals))
    }
}

#[cfg(test)]
mod test {
    use super::*;

    #[test]
    fn conway_matches_the_cell_rules() {
        for n in 0..=8u8 {
            assert_eq!(B3S23.births() & (1 << n) != 0, cell::is_born(n), "birth {n}");
            assert_eq!(
                B3S23.survivals() & (1 << n) != 0,
                cell::survives(n),
                "survival {n}"
            );
        }
    }

    #[test]
    fn rulestring_forms() {
        for s in ["B3/S23", "b3s23", "S23/B3", "23/3", " b3/s23 "] {
            let rule: Rule = s.parse().unwrap();
            assert!(rule.is_conway(), "{s}");
        }
    }

    #[test]
    fn other_rules_parse_but_are_not_conway() {
        let highlife: Rule = "B36/S23".parse().unwrap();

        assert!(!highlife.is_conway());
        assert_eq!(highlife.births(), 0b100_1000);
        assert_eq!(highlife.to_string(), "B36/S23");
    }

    #[test]
    fn empty_birth_set() {
        let rule: Rule = "B/S012345678".parse().unwrap();

        assert_eq!(rule.births(), 0);
        assert_eq!(rule.survivals(), 0x1FF);
    }

    #[test]
    fn invalid_rules() {
        assert_eq!("".parse::<Rule>(), Err(RuleError::Empty));
        assert_eq!(
            "B9/S23".parse::<Rule>(),
            Err(RuleError::InvalidDigit { got: '9' })
        );
        assert!(matches!(
            "B3".parse::<Rule>(),
            Err(RuleError::Malformed { .. })
        ));
        assert!(matches!(
            "B3/S2/B3".parse::<Rule>(),
            Err(RuleError::Malformed { .. })
        ));
        assert!(matches!(
            "x3/y23".parse::<Rule>(),
            Err(RuleError::Malformed { .. })
        ));
    }
}
