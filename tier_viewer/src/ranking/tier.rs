//! Tier labels: `HT1..HT5` and `LT1..LT5`.

use std::fmt;

/// Number of numbered tier groups.
pub const TIER_COUNT: usize = 5;

/// High (`H`) or low (`L`) half of a numbered tier.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash, PartialOrd, Ord)]
pub enum Band {
    High,
    Low,
}

/// A parsed, well-formed tier label.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash)]
pub struct Tier {
    pub band: Band,
    /// 1..=TIER_COUNT
    pub rank: u8,
}

impl Tier {
    pub const fn new(band: Band, rank: u8) -> Self {
        Self { band, rank }
    }

    /// Parses `(H|L)T(1-5)` case-insensitively after trimming.
    /// Anything else, retired markers included, yields `None`.
    pub fn parse(raw: &str) -> Option<Tier> {
        let &[band, t, digit] = raw.trim().as_bytes() else {
            return None;
        };
        let band = match band.to_ascii_uppercase() {
            b'H' => Band::High,
            b'L' => Band::Low,
            _ => return None,
        };
        if !t.eq_ignore_ascii_case(&b'T') {
            return None;
        }
        let rank = digit.checked_sub(b'0')?;
        if !(1..=TIER_COUNT as u8).contains(&rank) {
            return None;
        }
        Some(Tier { band, rank })
    }

    /// Zero-based index into the tier group array.
    pub fn group_index(&self) -> usize {
        usize::from(self.rank - 1)
    }
}

impl fmt::Display for Tier {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let band = match self.band {
            Band::High => 'H',
            Band::Low => 'L',
        };
        write!(f, "{band}T{}", self.rank)
    }
}

/// Strength order shown in the ranking legend: HT1, LT1, HT2, LT2, ...
pub fn legend() -> impl Iterator<Item = Tier> {
    (1..=TIER_COUNT as u8)
        .flat_map(|rank| [Tier::new(Band::High, rank), Tier::new(Band::Low, rank)])
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn parses_well_formed_labels() {
        assert_eq!(Tier::parse("HT1"), Some(Tier::new(Band::High, 1)));
        assert_eq!(Tier::parse("lt5"), Some(Tier::new(Band::Low, 5)));
        assert_eq!(Tier::parse(" Ht3 "), Some(Tier::new(Band::High, 3)));
    }

    #[test]
    fn rejects_malformed_labels() {
        for raw in ["", "HT", "HT0", "HT6", "HT10", "XT1", "HX1", "R5", "RHT1", "H T1", "ΗT1"] {
            assert_eq!(Tier::parse(raw), None, "{raw:?} should not parse");
        }
    }

    #[test]
    fn display_is_canonical_uppercase() {
        assert_eq!(Tier::parse("lt2").unwrap().to_string(), "LT2");
    }

    #[test]
    fn legend_interleaves_bands() {
        let labels: Vec<String> = legend().map(|t| t.to_string()).collect();
        assert_eq!(
            labels,
            ["HT1", "LT1", "HT2", "LT2", "HT3", "LT3", "HT4", "LT4", "HT5", "LT5"]
        );
    }
}
