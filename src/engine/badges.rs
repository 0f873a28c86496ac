use serde::{Deserialize, Serialize};

/// Only full-length single-mode rounds earn badges.
pub const BADGE_ROUND_LENGTH: u32 = 40;
const MIN_TABLES: usize = 5;
const TEN_TABLES: usize = 10;
const ALL_TABLES: usize = 12;

#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum Badge {
    Diamond,
    Gold,
    Silver,
    Bronze,
    GoldTen,
    SilverTen,
    BronzeTen,
}

impl Badge {
    pub fn label(self) -> &'static str {
        match self {
            Badge::Diamond => "Diamond",
            Badge::Gold => "Gold",
            Badge::Silver => "Silver",
            Badge::Bronze => "Bronze",
            Badge::GoldTen => "Gold (10 tables)",
            Badge::SilverTen => "Silver (10 tables)",
            Badge::BronzeTen => "Bronze (10 tables)",
        }
    }
}

#[derive(Clone, Copy, PartialEq, Eq)]
enum Tier {
    Gold,
    Silver,
    Bronze,
}

fn tier(score: u32, total: u32) -> Option<Tier> {
    if total != BADGE_ROUND_LENGTH {
        return None;
    }
    match score {
        40.. => Some(Tier::Gold),
        38..=39 => Some(Tier::Silver),
        36..=37 => Some(Tier::Bronze),
        _ => None,
    }
}

/// Every badge a single result earns: Diamond, then the regular tier, then
/// the ten-table variant.
pub fn badges_for(score: u32, total: u32, tables_count: usize) -> Vec<Badge> {
    let mut badges = Vec::new();
    if tables_count < MIN_TABLES {
        return badges;
    }

    let tier = tier(score, total);
    if tables_count == ALL_TABLES && tier == Some(Tier::Gold) {
        badges.push(Badge::Diamond);
    }

    match tier {
        Some(Tier::Gold) => badges.push(Badge::Gold),
        Some(Tier::Silver) => badges.push(Badge::Silver),
        Some(Tier::Bronze) => badges.push(Badge::Bronze),
        None => {}
    }

    if tables_count >= TEN_TABLES {
        match tier {
            Some(Tier::Gold) => badges.push(Badge::GoldTen),
            Some(Tier::Silver) => badges.push(Badge::SilverTen),
            Some(Tier::Bronze) => badges.push(Badge::BronzeTen),
            None => {}
        }
    }
    badges
}
