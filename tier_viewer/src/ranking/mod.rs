//! Ranking engine: pure views over a roster snapshot.
//!
//! Nothing here clones or mutates records. Every view borrows from
//! the snapshot it was built from and is rebuilt on each render pass.
//!
//! The leaderboard orders by the tier text itself (`ht1 < ht2 < ... < lt1`),
//! so every high band comes before every low band. The grouped tierlist is
//! the view that pairs `HTn` with `LTn`.

mod tier;

use std::array;

use crate::data::PlayerRecord;

pub use tier::{legend, Band, Tier, TIER_COUNT};

/// Leaderboard length in the shipped configuration.
pub const DEFAULT_LEADERBOARD_SIZE: usize = 10;

/// One numbered tier with its high and low halves, each sorted by IGN.
#[derive(Debug)]
pub struct TierGroup<'a> {
    pub rank: u8,
    pub high: Vec<&'a PlayerRecord>,
    pub low: Vec<&'a PlayerRecord>,
}

impl<'a> TierGroup<'a> {
    fn empty(rank: u8) -> Self {
        Self {
            rank,
            high: Vec::new(),
            low: Vec::new(),
        }
    }

    pub fn is_empty(&self) -> bool {
        self.high.is_empty() && self.low.is_empty()
    }

    pub fn len(&self) -> usize {
        self.high.len() + self.low.len()
    }

    /// Display order: every high entry, then every low entry.
    pub fn iter(&self) -> impl Iterator<Item = (Band, &'a PlayerRecord)> + '_ {
        self.high
            .iter()
            .map(|r| (Band::High, *r))
            .chain(self.low.iter().map(|r| (Band::Low, *r)))
    }

    pub fn badge(&self) -> RankBadge {
        RankBadge::for_position(usize::from(self.rank) - 1)
    }
}

/// Buckets every well-formed, non-retired record into tiers 1..=5.
pub fn group_by_tier(records: &[PlayerRecord]) -> [TierGroup<'_>; TIER_COUNT] {
    let mut groups: [TierGroup<'_>; TIER_COUNT] =
        array::from_fn(|i| TierGroup::empty(i as u8 + 1));

    for (record, tier) in ranked(records) {
        let group = &mut groups[tier.group_index()];
        match tier.band {
            Band::High => group.high.push(record),
            Band::Low => group.low.push(record),
        }
    }

    for group in &mut groups {
        group.high.sort_by_cached_key(|r| ign_key(*r));
        group.low.sort_by_cached_key(|r| ign_key(*r));
    }
    groups
}

/// A leaderboard row. Title and badge follow from `position` alone.
#[derive(Debug, Clone, Copy)]
pub struct RankedEntry<'a> {
    /// Zero-based row index.
    pub position: usize,
    pub record: &'a PlayerRecord,
    pub tier: Tier,
}

impl RankedEntry<'_> {
    pub fn title(&self) -> RankTitle {
        RankTitle::for_position(self.position)
    }

    pub fn badge(&self) -> RankBadge {
        RankBadge::for_position(self.position)
    }
}

/// First `n` well-formed, non-retired records by (tier text, IGN), case-insensitive.
pub fn top_n(records: &[PlayerRecord], n: usize) -> Vec<RankedEntry<'_>> {
    let mut rows: Vec<(&PlayerRecord, Tier)> = ranked(records).collect();
    rows.sort_by_cached_key(|&(r, _)| leaderboard_key(r));
    rows.into_iter()
        .take(n)
        .enumerate()
        .map(|(position, (record, tier))| RankedEntry {
            position,
            record,
            tier,
        })
        .collect()
}

/// Exact, case-insensitive IGN lookup over the whole snapshot, retired players included.
pub fn find_by_ign<'a>(records: &'a [PlayerRecord], query: &str) -> Option<&'a PlayerRecord> {
    let needle = query.trim().to_lowercase();
    if needle.is_empty() {
        return None;
    }
    records
        .iter()
        .filter(|r| r.canonical_ign() == needle)
        .min_by_key(|r| leaderboard_key(*r))
}

fn ranked(records: &[PlayerRecord]) -> impl Iterator<Item = (&PlayerRecord, Tier)> {
    records
        .iter()
        .filter(|r| !r.is_retired())
        .filter_map(|r| Tier::parse(&r.tier).map(|tier| (r, tier)))
}

// The raw fields trail each key so that records equal under case folding
// still land in one fixed order.
type SortKey<'a> = (String, String, &'a str, &'a str, &'a str, &'a str);

fn ign_key(record: &PlayerRecord) -> SortKey<'_> {
    (
        record.ign.to_lowercase(),
        record.tier.trim().to_lowercase(),
        &record.ign,
        &record.tier,
        &record.region,
        &record.gamemode,
    )
}

fn leaderboard_key(record: &PlayerRecord) -> SortKey<'_> {
    (
        record.tier.trim().to_lowercase(),
        record.ign.to_lowercase(),
        &record.ign,
        &record.tier,
        &record.region,
        &record.gamemode,
    )
}

/// Title shown under a leaderboard name.
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub enum RankTitle {
    GrandMaster,
    Master,
    Ace,
    Pro,
}

impl RankTitle {
    pub fn for_position(position: usize) -> Self {
        match position {
            0 => RankTitle::GrandMaster,
            1..=3 => RankTitle::Master,
            4..=6 => RankTitle::Ace,
            _ => RankTitle::Pro,
        }
    }

    pub fn label(&self) -> &'static str {
        match self {
            RankTitle::GrandMaster => "Crystal GrandMaster",
            RankTitle::Master => "Crystal Master",
            RankTitle::Ace => "Crystal Ace",
            RankTitle::Pro => "Crystal Pro",
        }
    }

    /// Legend text for the information popover.
    pub fn span(&self) -> &'static str {
        match self {
            RankTitle::GrandMaster => "Top 1",
            RankTitle::Master => "Top 2-4",
            RankTitle::Ace => "Top 5-7",
            RankTitle::Pro => "Top 8-10",
        }
    }

    pub const ALL: [RankTitle; 4] = [
        RankTitle::GrandMaster,
        RankTitle::Master,
        RankTitle::Ace,
        RankTitle::Pro,
    ];
}

/// Medal colour of the position box.
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub enum RankBadge {
    Gold,
    Silver,
    Bronze,
    Plain,
}

impl RankBadge {
    pub fn for_position(position: usize) -> Self {
        match position {
            0 => RankBadge::Gold,
            1 => RankBadge::Silver,
            2 => RankBadge::Bronze,
            _ => RankBadge::Plain,
        }
    }

    pub fn is_medal(&self) -> bool {
        !matches!(self, RankBadge::Plain)
    }
}
