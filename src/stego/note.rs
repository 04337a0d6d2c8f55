// Copyright (c) 2026 Christoph Gaffga
// SPDX-License-Identifier: GPL-3.0-only
// https://github.com/cgaffga/phasmcore

//! Security notes and the combined key-derivation secret.
//!
//! A note is the human-memorable secret shown once after encoding. It comes
//! in two styles:
//!
//! - **Phrase**: three words and a 4-digit number, `amber-falcon-river-4821`
//!   (24 bits from the words plus ~13 from the digits).
//! - **Token**: 24 alphanumeric characters (~142 bits).
//!
//! The KDF input is `note + password` (password defaults to empty). This is a
//! plain string concatenation and must not change: existing images depend on it.

use rand::rngs::OsRng;
use rand::Rng;
use zeroize::Zeroizing;

/// Note generation style.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum NoteStyle {
    /// Three words plus four digits, dash-separated.
    #[default]
    Phrase,
    /// 24 characters from `[A-Za-z0-9]`.
    Token,
}

/// Length of a [`NoteStyle::Token`] note.
pub const TOKEN_LEN: usize = 24;

const TOKEN_ALPHABET: &[u8; 62] =
    b"ABCDEFGHIJKLMNOPQRSTUVWXYZabcdefghijklmnopqrstuvwxyz0123456789";

/// 256 short, unambiguous English words.
const WORDS: [&str; 256] = [
    "acorn", "alpine", "amber", "anchor", "apple", "arrow", "aspen", "atlas",
    "autumn", "badge", "bamboo", "banner", "barley", "basil", "beacon", "berry",
    "birch", "bison", "blaze", "bloom", "border", "breeze", "brick", "bridge",
    "bronze", "brook", "cabin", "cactus", "camel", "candle", "canyon", "carbon",
    "cargo", "castle", "cedar", "cello", "chalk", "cherry", "cider", "cinder",
    "citrus", "clover", "cobalt", "comet", "copper", "coral", "cotton", "crane",
    "crater", "crystal", "cypress", "dahlia", "dawn", "delta", "desert", "dingo",
    "dolphin", "dragon", "dune", "eagle", "echo", "ember", "emerald", "falcon",
    "fern", "ferry", "fiddle", "field", "flame", "flint", "forest", "fossil",
    "fox", "frost", "galaxy", "garden", "garnet", "geyser", "ginger", "glacier",
    "globe", "granite", "grape", "gravel", "harbor", "hazel", "heron", "hickory",
    "hollow", "honey", "horizon", "husky", "igloo", "indigo", "iris", "island",
    "ivory", "jade", "jasmine", "jetty", "juniper", "kayak", "kelp", "kernel",
    "kettle", "kiwi", "lagoon", "lantern", "larch", "lava", "lemon", "lilac",
    "linen", "lotus", "lunar", "lynx", "magnet", "mango", "maple", "marble",
    "meadow", "melon", "mesa", "meteor", "mint", "mirror", "mist", "monsoon",
    "moss", "muffin", "nectar", "nickel", "nimbus", "north", "nutmeg", "oasis",
    "ocean", "olive", "onyx", "opal", "orbit", "orchid", "otter", "owl",
    "oyster", "paddle", "panda", "paper", "parrot", "pebble", "pepper", "pier",
    "pine", "pixel", "planet", "plum", "polar", "poppy", "prairie", "prism",
    "pumpkin", "quartz", "quill", "rabbit", "radar", "raven", "reef", "ridge",
    "river", "robin", "rocket", "ruby", "saddle", "saffron", "sage", "salmon",
    "sapphire", "satin", "scarlet", "shadow", "shell", "sierra", "silver", "slate",
    "sparrow", "spruce", "squid", "stone", "storm", "summit", "sunset", "swan",
    "tango", "thistle", "thunder", "tiger", "timber", "topaz", "torch", "tulip",
    "tundra", "turtle", "valley", "velvet", "violet", "viper", "walnut", "walrus",
    "willow", "window", "winter", "wolf", "yarrow", "yonder", "zebra", "zenith",
    "zephyr", "zinc", "badger", "biscuit", "breadth", "canoe", "caramel", "cashew",
    "chisel", "cocoa", "compass", "cricket", "daisy", "denim", "drift", "fable",
    "feather", "fjord", "goblet", "gopher", "hammock", "harvest", "helmet", "jigsaw",
    "koala", "ladder", "locket", "mammoth", "mustard", "napkin", "noodle", "orange",
    "pelican", "puffin", "quiver", "rhubarb", "sequoia", "tamarind", "trumpet", "vortex",
];

/// Generate a fresh note from the OS CSPRNG.
pub fn generate_note(style: NoteStyle) -> String {
    generate_note_with(style, &mut OsRng)
}

/// Generate a note from the given RNG.
pub fn generate_note_with<R: Rng>(style: NoteStyle, rng: &mut R) -> String {
    match style {
        NoteStyle::Phrase => {
            let words: Vec<&str> = (0..3).map(|_| WORDS[rng.gen_range(0..WORDS.len())]).collect();
            let digits: u32 = rng.gen_range(0..10_000);
            format!("{}-{digits:04}", words.join("-"))
        }
        NoteStyle::Token => (0..TOKEN_LEN)
            .map(|_| TOKEN_ALPHABET[rng.gen_range(0..TOKEN_ALPHABET.len())] as char)
            .collect(),
    }
}

/// The KDF input for one encode/decode call: `note + password`.
///
/// Wiped from memory on drop.
pub struct SecretMaterial {
    combined: Zeroizing<String>,
    has_password: bool,
}

impl SecretMaterial {
    pub fn combine(note: &str, password: Option<&str>) -> Self {
        let password = password.unwrap_or("");
        let mut combined = Zeroizing::new(String::with_capacity(note.len() + password.len()));
        combined.push_str(note);
        combined.push_str(password);
        Self {
            combined,
            has_password: !password.is_empty(),
        }
    }

    pub fn as_str(&self) -> &str {
        &self.combined
    }

    /// Whether a non-empty password was supplied.
    pub fn has_password(&self) -> bool {
        self.has_password
    }
}

impl std::fmt::Debug for SecretMaterial {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("SecretMaterial")
            .field("has_password", &self.has_password)
            .finish_non_exhaustive()
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use rand::SeedableRng;
    use rand_chacha::ChaCha20Rng;

    #[test]
    fn wordlist_has_no_duplicates() {
        let mut sorted = WORDS.to_vec();
        sorted.sort_unstable();
        sorted.dedup();
        assert_eq!(sorted.len(), 256);
        assert!(WORDS.iter().all(|w| !w.contains('-') && w.is_ascii()));
    }

    #[test]
    fn phrase_shape() {
        let mut rng = ChaCha20Rng::seed_from_u64(1);
        for _ in 0..50 {
            let note = generate_note_with(NoteStyle::Phrase, &mut rng);
            let parts: Vec<&str> = note.split('-').collect();
            assert_eq!(parts.len(), 4, "{note}");
            assert!(parts[..3].iter().all(|w| WORDS.contains(w)));
            assert_eq!(parts[3].len(), 4);
            assert!(parts[3].bytes().all(|b| b.is_ascii_digit()));
        }
    }

    #[test]
    fn token_shape() {
        let note = generate_note(NoteStyle::Token);
        assert_eq!(note.len(), TOKEN_LEN);
        assert!(note.bytes().all(|b| b.is_ascii_alphanumeric()));
    }

    #[test]
    fn notes_differ() {
        assert_ne!(generate_note(NoteStyle::Token), generate_note(NoteStyle::Token));
    }

    #[test]
    fn combine_is_plain_concatenation() {
        let s = SecretMaterial::combine("note", Some("pw"));
        assert_eq!(s.as_str(), "notepw");
        assert!(s.has_password());

        let s = SecretMaterial::combine("note", None);
        assert_eq!(s.as_str(), "note");
        assert!(!s.has_password());

        let s = SecretMaterial::combine("note", Some(""));
        assert!(!s.has_password());
    }

    #[test]
    fn debug_does_not_leak() {
        let s = SecretMaterial::combine("hunter2", Some("pw"));
        assert!(!format!("{s:?}").contains("hunter2"));
    }
}
