//! Hand-authored lookup tables. Read-only, fixed at build time.

use crate::types::Urgency;

/// Base priority per issue category.
pub const CATEGORY_WEIGHTS: &[(&str, i32)] = &[
    ("safety", 8),
    ("electricity", 7),
    ("water", 6),
    ("road", 5),
    ("waste", 4),
    ("other", 3),
];

/// Base priority for categories missing from [`CATEGORY_WEIGHTS`].
pub const DEFAULT_CATEGORY_WEIGHT: i32 = 5;

/// Look up a category's base priority, case-insensitively.
pub fn category_weight(category: &str) -> i32 {
    let category = category.to_lowercase();
    CATEGORY_WEIGHTS
        .iter()
        .find(|(name, _)| *name == category)
        .map(|(_, weight)| *weight)
        .unwrap_or(DEFAULT_CATEGORY_WEIGHT)
}

/// Urgency tiers used by priority scoring, in precedence order, with the
/// modifier each tier adds to the base priority.
pub const PRIORITY_URGENCY_TIERS: &[(Urgency, i32, &[&str])] = &[
    (
        Urgency::Critical,
        3,
        &["emergency", "fire", "accident", "collapse", "electrocution"],
    ),
    (
        Urgency::High,
        2,
        &["flooding", "broken", "exposed", "dangerous", "blocked"],
    ),
    (Urgency::Medium, 1, &["leaking", "damaged", "crack", "pothole"]),
    (Urgency::Low, -1, &["minor", "small", "slight", "cosmetic"]),
];

/// Category vocabulary for keyword-based complaint analysis. Order matters:
/// on equal hit counts the earlier category wins.
pub const TEXT_CATEGORY_KEYWORDS: &[(&str, &[&str])] = &[
    (
        "road",
        &["road", "pothole", "street", "pavement", "traffic", "highway", "crack", "asphalt", "driving"],
    ),
    (
        "water",
        &["water", "pipe", "leak", "flood", "drain", "sewage", "tap", "supply", "plumbing"],
    ),
    (
        "electricity",
        &["electricity", "power", "light", "wire", "pole", "outage", "transformer", "voltage"],
    ),
    (
        "safety",
        &["safety", "danger", "hazard", "crime", "theft", "broken", "accident", "vandalism"],
    ),
    (
        "waste",
        &["garbage", "trash", "waste", "dump", "litter", "rubbish", "bin", "debris", "pollution"],
    ),
];

/// Urgency vocabulary for keyword-based complaint analysis, in precedence order.
pub const TEXT_URGENCY_KEYWORDS: &[(Urgency, &[&str])] = &[
    (
        Urgency::Critical,
        &["emergency", "urgent", "immediate", "dangerous", "critical", "life-threatening", "fire"],
    ),
    (
        Urgency::High,
        &["serious", "major", "severe", "important", "hazardous", "risk"],
    ),
    (
        Urgency::Medium,
        &["moderate", "concerning", "needs attention", "repair needed"],
    ),
    (
        Urgency::Low,
        &["minor", "small", "cosmetic", "inconvenience", "slight"],
    ),
];

pub const NEGATIVE_WORDS: &[&str] = &[
    "bad", "terrible", "awful", "horrible", "worst", "angry", "frustrated",
];

pub const URGENT_WORDS: &[&str] = &["please", "help", "urgent", "asap", "immediately"];
