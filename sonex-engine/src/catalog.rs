//! Style catalog
//!
//! Static table mapping keyword sets to a named style and its suggested
//! composition layers. Pure data, read-only at runtime; declaration order is
//! the documented tie-break when several equally-weighted styles match one
//! prompt.

/// One catalog entry
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct StyleNode {
    /// Stable identifier, also the key used in weighted memory
    pub id: &'static str,

    /// Trigger keywords, matched by lower-cased substring containment
    pub keywords: &'static [&'static str],

    /// Suggested composition layers, in mix order
    pub layers: &'static [&'static str],
}

/// The style catalog, in declaration (tie-break) order
pub const STYLE_CATALOG: &[StyleNode] = &[
    StyleNode {
        id: "cyberpunk",
        keywords: &["cyberpunk", "neon", "sci-fi"],
        layers: &["Deep Saw Bass", "Vangelis Synth Pad", "Neon Arpeggio"],
    },
    StyleNode {
        id: "synthwave",
        keywords: &["synthwave", "retro", "80s"],
        layers: &[
            "Retro Drum Machine",
            "Analog Bass 16th Notes",
            "Dreamy Synth Leads",
        ],
    },
    StyleNode {
        id: "lofi",
        keywords: &["lofi", "chill", "study"],
        layers: &[
            "Dusty Vinyl Crackle",
            "Mellow Rhodes Chords",
            "Slow Boom Bap Beat",
        ],
    },
    StyleNode {
        id: "hiphop",
        keywords: &["hiphop", "rap", "beat"],
        layers: &["Heavy Kick and Snare", "Sampled Jazz Loop", "Deep Sub Bass"],
    },
    StyleNode {
        id: "trap",
        keywords: &["trap", "drill"],
        layers: &["Rattling Hi-Hats", "808 Glides", "Dark Minor Bells"],
    },
    StyleNode {
        id: "ambient",
        keywords: &["ambient", "drone", "sleep"],
        layers: &[
            "Ethereal Drone",
            "Soft Wind Texture",
            "Sparse Piano Droplets",
        ],
    },
    StyleNode {
        id: "meditation",
        keywords: &["meditation", "yoga", "zen"],
        layers: &[
            "Tibetan Bowl Drone",
            "Slow Breathing Texture",
            "Soft Theta Waves",
        ],
    },
    StyleNode {
        id: "techno",
        keywords: &["techno", "rave", "warehouse"],
        layers: &["Rumbling Kick", "Industrial Hi-Hats", "Acid 303 Line"],
    },
    StyleNode {
        id: "house",
        keywords: &["house", "dance", "club"],
        layers: &[
            "Four-on-the-Floor Kick",
            "Piano House Chords",
            "Funky Bassline",
        ],
    },
    StyleNode {
        id: "dnb",
        keywords: &["dnb", "jungle", "drum and bass"],
        layers: &["Fast Breakbeat (174bpm)", "Reese Bass", "Atmospheric Pad"],
    },
    StyleNode {
        id: "cinematic",
        keywords: &["cinematic", "movie", "score"],
        layers: &["Orchestral Swell", "Deep Braaam Impact", "Tension Strings"],
    },
    StyleNode {
        id: "orchestral",
        keywords: &["orchestral", "symphony", "classical"],
        layers: &["Violin Section Staccato", "Brass Horn Blast", "Timpani Roll"],
    },
];

/// All catalog entries whose keyword set intersects the prompt,
/// in declaration order. Expects a lower-cased prompt.
pub fn matching_styles(prompt_lower: &str) -> Vec<&'static StyleNode> {
    STYLE_CATALOG
        .iter()
        .filter(|node| node.keywords.iter().any(|k| prompt_lower.contains(k)))
        .collect()
}
