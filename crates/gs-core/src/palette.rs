//! Static symbol palettes: character sets and emoji sets.
//!
//! Every palette is ordered darkest → brightest. Character sets start with
//! the densest glyph, emoji sets with the darkest emoji.

use std::sync::Arc;

use crate::error::{CoreError, Result};

/// 10 niveaux, équilibré.
pub const CHARSET_STANDARD: &str = "@%#*+=-:. ";

/// 70 caractères, Paul Bourke, résolution maximale (dense→clair).
pub const CHARSET_DETAILED: &str =
    "$@B%8&WM#*oahkbdpqwmZO0QLCJUYXzcvunxrjft/\\|()1{}[]?-_+~<>i!lI;:,\"^`'. ";

/// Minimal, haut contraste.
pub const CHARSET_SIMPLE: &str = "@#*:. ";

/// Blocs Unicode, pseudo-pixels.
pub const CHARSET_BLOCKS: &str = "█▓▒░ ";

/// Chiffres uniquement.
pub const CHARSET_NUMBERS: &str = "0123456789 ";

/// Lettres uniquement.
pub const CHARSET_LETTERS: &str = "MWNXK0Okxdolc:;,. ";

/// Whether a palette is made of single glyphs or emoji strings.
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub enum SymbolKind {
    /// One char per symbol, one terminal column wide.
    Glyph,
    /// Emoji strings, two terminal columns wide.
    Emoji,
}

impl SymbolKind {
    /// Number of terminal columns one symbol occupies.
    #[must_use]
    pub fn cell_columns(self) -> u16 {
        match self {
            Self::Glyph => 1,
            Self::Emoji => 2,
        }
    }
}

enum Symbols {
    Glyphs(&'static str),
    Emoji(&'static [&'static str]),
}

/// Registry entry: a named palette with a short description.
pub struct PaletteEntry {
    /// Lookup key, lowercase.
    pub key: &'static str,
    /// One-line description for listings.
    pub description: &'static str,
    symbols: Symbols,
}

impl PaletteEntry {
    /// Materialize the entry into a palette.
    #[must_use]
    pub fn palette(&self) -> SymbolPalette {
        match self.symbols {
            Symbols::Glyphs(s) => SymbolPalette {
                symbols: s.chars().map(String::from).collect(),
                kind: SymbolKind::Glyph,
            },
            Symbols::Emoji(list) => SymbolPalette {
                symbols: list.iter().map(|e| (*e).to_string()).collect(),
                kind: SymbolKind::Emoji,
            },
        }
    }

    /// Symbols as a single display string (emoji separated by spaces).
    #[must_use]
    pub fn preview(&self) -> String {
        match self.symbols {
            Symbols::Glyphs(s) => s.to_string(),
            Symbols::Emoji(list) => list.join(" "),
        }
    }
}

static CHARACTER_SETS: &[PaletteEntry] = &[
    PaletteEntry {
        key: "standard",
        description: "Balanced 10-level set",
        symbols: Symbols::Glyphs(CHARSET_STANDARD),
    },
    PaletteEntry {
        key: "detailed",
        description: "High precision 70-level set",
        symbols: Symbols::Glyphs(CHARSET_DETAILED),
    },
    PaletteEntry {
        key: "simple",
        description: "Basic 6-level set",
        symbols: Symbols::Glyphs(CHARSET_SIMPLE),
    },
    PaletteEntry {
        key: "blocks",
        description: "Unicode shade blocks",
        symbols: Symbols::Glyphs(CHARSET_BLOCKS),
    },
    PaletteEntry {
        key: "numbers",
        description: "Numeric characters",
        symbols: Symbols::Glyphs(CHARSET_NUMBERS),
    },
    PaletteEntry {
        key: "letters",
        description: "Letter characters",
        symbols: Symbols::Glyphs(CHARSET_LETTERS),
    },
];

static EMOJI_SETS: &[PaletteEntry] = &[
    PaletteEntry {
        key: "brightness",
        description: "Brightness-based squares",
        symbols: Symbols::Emoji(&["⬛", "🟫", "🟥", "🟧", "🟨", "🟩", "🟦", "🟪", "⬜"]),
    },
    PaletteEntry {
        key: "grayscale",
        description: "Colored circles, brown before red",
        symbols: Symbols::Emoji(&["⚫", "🟤", "🔴", "🟠", "🟡", "🟢", "🔵", "🟣", "⚪"]),
    },
    PaletteEntry {
        key: "hearts",
        description: "Heart emojis, 🤎 for brown (no 💗)",
        symbols: Symbols::Emoji(&["🖤", "🤎", "❤️", "🧡", "💛", "💚", "💙", "💜", "🤍"]),
    },
    PaletteEntry {
        key: "squares",
        description: "Colored squares",
        symbols: Symbols::Emoji(&["⬛", "🟫", "🟥", "🟧", "🟨", "🟩", "🟦", "🟪", "⬜"]),
    },
    PaletteEntry {
        key: "nature",
        description: "Nature theme",
        symbols: Symbols::Emoji(&["🌑", "🌲", "🌳", "🌴", "🌿", "🍀", "🌸", "🌼", "☀️"]),
    },
    PaletteEntry {
        key: "space",
        description: "Space and celestial",
        symbols: Symbols::Emoji(&["⬛", "🌑", "🌙", "⭐", "✨", "💫", "🌟", "⚡", "☀️"]),
    },
    PaletteEntry {
        key: "ocean",
        description: "Ocean creatures",
        symbols: Symbols::Emoji(&["🌊", "🐳", "🐬", "🐠", "🐟", "🦈", "🐙", "🦑", "💎"]),
    },
    PaletteEntry {
        key: "food",
        description: "Food and sweets",
        symbols: Symbols::Emoji(&["🍫", "🍩", "🍪", "🧁", "🍰", "🍨", "🍦", "🎂", "🍬"]),
    },
    PaletteEntry {
        key: "faces",
        description: "Face expressions",
        symbols: Symbols::Emoji(&["😈", "👿", "😠", "😐", "🙂", "😊", "😄", "😁", "🌟"]),
    },
    PaletteEntry {
        key: "weather",
        description: "Weather icons, 🌥️ before 🌤️",
        symbols: Symbols::Emoji(&["🌑", "☁️", "🌧️", "⛈️", "🌥️", "⛅", "🌤️", "☀️", "✨"]),
    },
    PaletteEntry {
        key: "fire",
        description: "Fire and energy",
        symbols: Symbols::Emoji(&["⬛", "🟤", "🔴", "🟠", "🟡", "🔥", "💥", "⭐", "💫"]),
    },
    PaletteEntry {
        key: "geometric",
        description: "Geometric shapes",
        symbols: Symbols::Emoji(&["◼️", "◾", "▪️", "◽", "◻️", "⬜", "🔲", "🔳", "💠"]),
    },
];

/// An ordered, immutable list of symbols used as quantization buckets.
///
/// Cheap to clone: the symbols are shared.
///
/// # Example
/// ```
/// use gs_core::palette::SymbolPalette;
/// let p = SymbolPalette::from_glyphs(" .:#@").unwrap();
/// assert_eq!(p.len(), 5);
/// assert_eq!(p.symbol(4), "@");
/// ```
#[derive(Clone, Debug, PartialEq, Eq)]
pub struct SymbolPalette {
    symbols: Arc<[String]>,
    kind: SymbolKind,
}

impl SymbolPalette {
    /// Build a custom glyph palette, one symbol per char.
    ///
    /// # Errors
    /// `InvalidParameter` if the string has fewer than 2 chars.
    pub fn from_glyphs(glyphs: &str) -> Result<Self> {
        let symbols: Arc<[String]> = glyphs.chars().map(String::from).collect();
        if symbols.len() < 2 {
            return Err(CoreError::InvalidParameter {
                name: "glyphs",
                value: format!("{glyphs:?} (au moins 2 symboles requis)"),
            });
        }
        Ok(Self {
            symbols,
            kind: SymbolKind::Glyph,
        })
    }

    /// Number of buckets.
    #[inline]
    #[must_use]
    pub fn len(&self) -> usize {
        self.symbols.len()
    }

    /// Always false: a palette holds at least two symbols.
    #[inline]
    #[must_use]
    pub fn is_empty(&self) -> bool {
        self.symbols.is_empty()
    }

    /// Symbol at `index`, clamped to the last bucket.
    #[inline]
    #[must_use]
    pub fn symbol(&self, index: usize) -> &str {
        &self.symbols[index.min(self.symbols.len() - 1)]
    }

    #[must_use]
    pub fn kind(&self) -> SymbolKind {
        self.kind
    }
}

/// All character-set entries, in listing order.
#[must_use]
pub fn list_character_sets() -> &'static [PaletteEntry] {
    CHARACTER_SETS
}

/// All emoji-set entries, in listing order.
#[must_use]
pub fn list_emoji_sets() -> &'static [PaletteEntry] {
    EMOJI_SETS
}

fn find(entries: &'static [PaletteEntry], kind: &'static str, key: &str) -> Result<SymbolPalette> {
    let wanted = key.trim().to_ascii_lowercase();
    entries
        .iter()
        .find(|e| e.key == wanted)
        .map(PaletteEntry::palette)
        .ok_or_else(|| CoreError::UnknownSymbolSet {
            kind,
            key: key.to_string(),
        })
}

/// Look up a character set by key (case-insensitive).
///
/// # Errors
/// `UnknownSymbolSet` if the key is not registered.
///
/// # Example
/// ```
/// use gs_core::palette::character_set;
/// assert_eq!(character_set("standard").unwrap().len(), 10);
/// assert!(character_set("nonexistent").is_err());
/// ```
pub fn character_set(key: &str) -> Result<SymbolPalette> {
    find(CHARACTER_SETS, "charset", key)
}

/// Look up an emoji set by key (case-insensitive).
///
/// # Errors
/// `UnknownSymbolSet` if the key is not registered.
pub fn emoji_set(key: &str) -> Result<SymbolPalette> {
    find(EMOJI_SETS, "emoji", key)
}
