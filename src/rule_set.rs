use std::fmt;
use std::str::FromStr;

use thiserror::Error;

use crate::cell::Cell;

/// Rules of Conway's Game of Life.
pub const B3S23: RuleSet = RuleSet::new(0b1000, 0b1100);

/// # Representation
/// Life rules are represented as
/// ```notrust
/// |------birth------|
/// 0000_0000_0000_0000_0000_0000_0000_0000
///                     |----survival-----|
/// ```
///
/// # Examples
/// ```notrust
/// b3s23:                0000_0000_0000_1000_0000_0000_0000_1100
///
/// b0s0:                 0000_0000_0000_0000_0000_0000_0000_0000
/// b012345678s012345678: 0000_0001_1111_1111_0000_0001_1111_1111
/// ```
///
/// See: https://conwaylife.com/wiki/Rulestring
#[repr(transparent)]
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub struct RuleSet {
    rule: u32,
}

impl Default for RuleSet {
    fn default() -> Self {
        B3S23
    }
}

impl RuleSet {
    /// Create a new `RuleSet` for the given births and survivals. For both `b` and
    /// `s`, numbers are set on a bit basis. For instance if bit `i` in `b` is on, it
    /// means `i` is included in the set of births. Any bit past the 8th is ignored.
    pub const fn new(b: u16, s: u16) -> Self {
        let b = b & 0x1FF;
        let s = s & 0x1FF;

        Self {
            rule: (b as u32) << 16 | s as u32,
        }
    }

    pub const fn births(&self) -> u16 {
        ((self.rule & 0x1FF0000) >> 0x10) as u16
    }

    pub const fn survivals(&self) -> u16 {
        (self.rule & 0x1FF) as u16
    }

    /// State of a cell in the next generation, given its current state and how many of its
    /// neighbors are alive.
    pub const fn next(&self, cell: Cell, alive_neighbors: u8) -> Cell {
        // Counts past 8 can't come from any neighborhood we know of
        if alive_neighbors > 8 {
            return Cell::Dead;
        }

        let n = 1 << alive_neighbors;
        let set = match cell {
            Cell::Alive => self.survivals(),
            Cell::Dead => self.births(),
        };

        if set & n == n { Cell::Alive } else { Cell::Dead }
    }
}

#[derive(Debug, Error, Clone, PartialEq, Eq)]
pub enum RuleError {
    #[error("Expected 'B' or 'S' before any count, found '{got}'")]
    MissingSection { got: char },

    #[error("Invalid neighbor count '{got}', counts go from 0 to 8")]
    InvalidCount { got: char },

    #[error("Section '{section}' appears more than once")]
    Repeated { section: char },

    #[error("Empty rulestring")]
    Empty,
}

/// Parses rulestrings such as `B3/S23`, `b3s23` or `B36/S23`.
impl FromStr for RuleSet {
    type Err = RuleError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        #[derive(PartialEq)]
        enum State {
            Start,
            Birth,
            Survival,
        }

        let s = s.trim();
        if s.is_empty() {
            return Err(RuleError::Empty);
        }

        let mut state = State::Start;
        let (mut seen_b, mut seen_s) = (false, false);
        let (mut b, mut s_bits) = (0u16, 0u16);

        for c in s.chars() {
            match c {
                'b' | 'B' => {
                    if seen_b {
                        return Err(RuleError::Repeated { section: 'B' });
                    }
                    seen_b = true;
                    state = State::Birth;
                }
                's' | 'S' => {
                    if seen_s {
                        return Err(RuleError::Repeated { section: 'S' });
                    }
                    seen_s = true;
                    state = State::Survival;
                }
                '/' => {}
                n => {
                    if state == State::Start {
                        return Err(RuleError::MissingSection { got: n });
                    }

                    let n = match n.to_digit(10) {
                        Some(n) if n <= 8 => n,
                        _ => return Err(RuleError::InvalidCount { got: n }),
                    };

                    match state {
                        State::Birth => b |= 1 << n,
                        State::Survival => s_bits |= 1 << n,
                        State::Start => unreachable!("checked above"),
                    }
                }
            }
        }

        Ok(RuleSet::new(b, s_bits))
    }
}

impl fmt::Display for RuleSet {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let digits = |bits: u16| -> String {
            (0..=8u8)
                .filter(|n| bits & (1 << n) != 0)
                .map(|n| char::from(b'0' + n))
                .collect()
        };

        write!(f, "B{}/S{}", digits(self.births()), digits(self.survivals()))
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn conway_rules() {
        let rule = B3S23;

        for n in 0..=8 {
            let survives = rule.next(Cell::Alive, n);
            let born = rule.next(Cell::Dead, n);

            assert_eq!(survives.is_alive(), n == 2 || n == 3, "survival with {n}");
            assert_eq!(born.is_alive(), n == 3, "birth with {n}");
        }
    }

    #[test]
    fn parse() {
        assert_eq!("B3/S23".parse(), Ok(B3S23));
        assert_eq!("b3s23".parse(), Ok(B3S23));
        assert_eq!(" S23/B3 ".parse(), Ok(B3S23));

        let highlife: RuleSet = "B36/S23".parse().unwrap();
        assert_eq!(highlife.births(), 0b100_1000);
        assert_eq!(highlife.survivals(), 0b1100);

        let all: RuleSet = "B012345678/S012345678".parse().unwrap();
        assert_eq!(all.births(), 0x1FF);
        assert_eq!(all.survivals(), 0x1FF);
    }

    #[test]
    fn parse_errors() {
        assert_eq!("".parse::<RuleSet>(), Err(RuleError::Empty));
        assert_eq!(
            "23/3".parse::<RuleSet>(),
            Err(RuleError::MissingSection { got: '2' })
        );
        assert_eq!(
            "B9/S23".parse::<RuleSet>(),
            Err(RuleError::InvalidCount { got: '9' })
        );
        assert_eq!(
            "B3/S2/B3".parse::<RuleSet>(),
            Err(RuleError::Repeated { section: 'B' })
        );
    }

    #[test]
    fn display() {
        assert_eq!(B3S23.to_string(), "B3/S23");
        assert_eq!(RuleSet::new(0, 0).to_string(), "B/S");
        assert_eq!(RuleSet::default(), B3S23);
    }
}
