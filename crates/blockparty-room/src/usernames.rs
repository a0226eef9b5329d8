//! Display names handed out on connect.

use blockparty_engine::Randomizer;

const ADJECTIVES: [&str; 24] = [
    "Brave", "Swift", "Mighty", "Clever", "Fierce", "Gentle", "Wild", "Wise", "Bright", "Bold",
    "Calm", "Dark", "Epic", "Fair", "Grand", "Kind", "Noble", "Quick", "Royal", "Sharp", "Sleek",
    "Smart", "Solid", "Warm",
];

const NOUNS: [&str; 24] = [
    "Wolf", "Eagle", "Tiger", "Dragon", "Phoenix", "Bear", "Lion", "Hawk", "Falcon", "Deer",
    "Fox", "Owl", "Panda", "Shark", "Snake", "Star", "Moon", "Sun", "Storm", "Cloud", "River",
    "Ocean", "Mountain", "Forest",
];

/// An `Adjective-Noun` name such as `Brave-Wolf`.
///
/// Names are not guaranteed unique within a room; ids are.
pub fn generate_username<R: Randomizer + ?Sized>(rng: &mut R) -> String {
    let adjective = ADJECTIVES[rng.pick(ADJECTIVES.len())];
    let noun = NOUNS[rng.pick(NOUNS.len())];
    format!("{adjective}-{noun}")
}
