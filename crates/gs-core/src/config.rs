use std::fmt;
use std::path::Path;
use std::str::FromStr;

use serde::Deserialize;

use crate::error::{CoreError, Result};
use crate::palette::{self, SymbolKind, SymbolPalette};

/// Correction aspect ratio par défaut pour les glyphes (cellule ≈ 2× plus haute que large).
pub const CHAR_ASPECT_RATIO: f32 = 2.0;

/// Correction pour les emoji, qui occupent deux colonnes (cellule ≈ carrée).
pub const EMOJI_ASPECT_RATIO: f32 = 1.0;

/// Output color mode.
///
/// # Example
/// ```
/// use gs_core::config::ColorMode;
/// let mode: ColorMode = "ansi_bg".parse().unwrap();
/// assert_eq!(mode, ColorMode::AnsiFgBg);
/// assert!("rainbow".parse::<ColorMode>().is_err());
/// ```
#[derive(Clone, Copy, Debug, Default, PartialEq, Eq)]
pub enum ColorMode {
    /// Texte brut.
    #[default]
    None,
    /// ANSI truecolor foreground.
    AnsiFg,
    /// ANSI truecolor foreground + background.
    AnsiFgBg,
    /// HTML, couleur du texte.
    HtmlFg,
    /// HTML, couleur du texte + fond.
    HtmlFgBg,
}

impl ColorMode {
    /// Every mode, in listing order.
    pub const ALL: [Self; 5] = [
        Self::None,
        Self::AnsiFg,
        Self::AnsiFgBg,
        Self::HtmlFg,
        Self::HtmlFgBg,
    ];

    #[must_use]
    pub fn as_str(self) -> &'static str {
        match self {
            Self::None => "none",
            Self::AnsiFg => "ansi",
            Self::AnsiFgBg => "ansi_bg",
            Self::HtmlFg => "html",
            Self::HtmlFgBg => "html_bg",
        }
    }

    #[must_use]
    pub fn is_ansi(self) -> bool {
        matches!(self, Self::AnsiFg | Self::AnsiFgBg)
    }

    #[must_use]
    pub fn is_html(self) -> bool {
        matches!(self, Self::HtmlFg | Self::HtmlFgBg)
    }

    #[must_use]
    pub fn has_background(self) -> bool {
        matches!(self, Self::AnsiFgBg | Self::HtmlFgBg)
    }
}

impl FromStr for ColorMode {
    type Err = CoreError;

    fn from_str(s: &str) -> Result<Self> {
        let wanted = s.trim().to_ascii_lowercase();
        Self::ALL
            .into_iter()
            .find(|m| m.as_str() == wanted)
            .ok_or_else(|| CoreError::UnsupportedColorMode {
                value: s.to_string(),
            })
    }
}

impl fmt::Display for ColorMode {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

/// Background rendering style for the `*FgBg` color modes.
///
/// # Example
/// ```
/// use gs_core::config::BgStyle;
/// let bg = BgStyle::default();
/// assert!(matches!(bg, BgStyle::Black));
/// ```
#[derive(Clone, Copy, Debug, Default, PartialEq, Eq)]
pub enum BgStyle {
    /// Pure black background.
    #[default]
    Black,
    /// Complément RGB du pixel source.
    Complement,
    /// Source pixel color, dimmed.
    SourceDim,
}

impl FromStr for BgStyle {
    type Err = CoreError;

    fn from_str(s: &str) -> Result<Self> {
        match s.trim().to_ascii_lowercase().as_str() {
            "black" => Ok(Self::Black),
            "complement" => Ok(Self::Complement),
            "source_dim" | "dim" => Ok(Self::SourceDim),
            _ => Err(CoreError::InvalidParameter {
                name: "bg_style",
                value: s.to_string(),
            }),
        }
    }
}

/// Which palette a conversion draws from.
#[derive(Clone, Debug, PartialEq, Eq)]
pub enum SymbolSetId {
    /// Registered character set key.
    Charset(String),
    /// Registered emoji set key.
    Emoji(String),
    /// Ad-hoc glyph string, darkest → brightest.
    Custom(String),
}

impl SymbolSetId {
    fn resolve(&self) -> Result<SymbolPalette> {
        match self {
            Self::Charset(key) => palette::character_set(key),
            Self::Emoji(key) => palette::emoji_set(key),
            Self::Custom(glyphs) => SymbolPalette::from_glyphs(glyphs),
        }
    }
}

impl Default for SymbolSetId {
    fn default() -> Self {
        Self::Charset("detailed".into())
    }
}

impl fmt::Display for SymbolSetId {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::Charset(k) => write!(f, "charset:{k}"),
            Self::Emoji(k) => write!(f, "emoji:{k}"),
            Self::Custom(g) => write!(f, "custom:{g:?}"),
        }
    }
}

/// Configuration complète d'une conversion, validée et immuable.
///
/// Built through [`SettingsBuilder`]; every field has a sane default.
///
/// # Example
/// ```
/// use gs_core::config::{ColorMode, ConversionSettings};
/// let settings = ConversionSettings::builder()
///     .width(40)
///     .color_mode(ColorMode::AnsiFg)
///     .build()
///     .unwrap();
/// assert_eq!(settings.width(), 40);
/// assert_eq!(settings.palette().len(), 70);
/// ```
#[allow(clippy::struct_excessive_bools)]
#[derive(Clone, Debug)]
pub struct ConversionSettings {
    width: u32,
    height: Option<u32>,
    symbols: SymbolSetId,
    palette: SymbolPalette,
    color_mode: ColorMode,
    invert: bool,
    contrast: f32,
    brightness: f32,
    edge_detection: bool,
    denoise: bool,
    sharpen: f32,
    color_emoji: bool,
    aspect_ratio: f32,
    dither: bool,
    auto_enhance: bool,
    bg_style: BgStyle,
}

impl ConversionSettings {
    #[must_use]
    pub fn builder() -> SettingsBuilder {
        SettingsBuilder::default()
    }

    /// Target width in cells.
    #[must_use]
    pub fn width(&self) -> u32 {
        self.width
    }

    /// Explicit height override; `None` derives it from the aspect ratio.
    #[must_use]
    pub fn height(&self) -> Option<u32> {
        self.height
    }

    #[must_use]
    pub fn symbols(&self) -> &SymbolSetId {
        &self.symbols
    }

    /// Palette résolue au build.
    #[must_use]
    pub fn palette(&self) -> &SymbolPalette {
        &self.palette
    }

    #[must_use]
    pub fn is_emoji(&self) -> bool {
        self.palette.kind() == SymbolKind::Emoji
    }

    #[must_use]
    pub fn color_mode(&self) -> ColorMode {
        self.color_mode
    }

    #[must_use]
    pub fn invert(&self) -> bool {
        self.invert
    }

    #[must_use]
    pub fn contrast(&self) -> f32 {
        self.contrast
    }

    #[must_use]
    pub fn brightness(&self) -> f32 {
        self.brightness
    }

    #[must_use]
    pub fn edge_detection(&self) -> bool {
        self.edge_detection
    }

    #[must_use]
    pub fn denoise(&self) -> bool {
        self.denoise
    }

    #[must_use]
    pub fn sharpen(&self) -> f32 {
        self.sharpen
    }

    #[must_use]
    pub fn color_emoji(&self) -> bool {
        self.color_emoji
    }

    /// Character-cell height/width correction.
    #[must_use]
    pub fn aspect_ratio(&self) -> f32 {
        self.aspect_ratio
    }

    #[must_use]
    pub fn dither(&self) -> bool {
        self.dither
    }

    #[must_use]
    pub fn auto_enhance(&self) -> bool {
        self.auto_enhance
    }

    #[must_use]
    pub fn bg_style(&self) -> BgStyle {
        self.bg_style
    }
}

/// Builder for [`ConversionSettings`]. Validation happens once, in [`build`](Self::build).
#[allow(clippy::struct_excessive_bools)]
#[derive(Clone, Debug)]
pub struct SettingsBuilder {
    width: u32,
    height: Option<u32>,
    symbols: SymbolSetId,
    color_mode: ColorMode,
    invert: bool,
    contrast: f32,
    brightness: f32,
    edge_detection: bool,
    denoise: bool,
    sharpen: f32,
    color_emoji: bool,
    aspect_ratio: Option<f32>,
    dither: bool,
    auto_enhance: bool,
    bg_style: BgStyle,
}

impl Default for SettingsBuilder {
    fn default() -> Self {
        Self {
            width: 100,
            height: None,
            symbols: SymbolSetId::default(),
            color_mode: ColorMode::None,
            invert: false,
            contrast: 1.2,
            brightness: 1.0,
            edge_detection: false,
            denoise: true,
            sharpen: 0.0,
            color_emoji: false,
            aspect_ratio: None,
            dither: false,
            auto_enhance: false,
            bg_style: BgStyle::Black,
        }
    }
}

impl SettingsBuilder {
    #[must_use]
    pub fn width(mut self, width: u32) -> Self {
        self.width = width;
        self
    }

    #[must_use]
    pub fn height(mut self, height: Option<u32>) -> Self {
        self.height = height;
        self
    }

    #[must_use]
    pub fn symbols(mut self, symbols: SymbolSetId) -> Self {
        self.symbols = symbols;
        self
    }

    /// Shorthand for `symbols(SymbolSetId::Charset(key))`.
    #[must_use]
    pub fn charset(self, key: &str) -> Self {
        self.symbols(SymbolSetId::Charset(key.to_string()))
    }

    /// Shorthand for `symbols(SymbolSetId::Emoji(key))`.
    #[must_use]
    pub fn emoji_set(self, key: &str) -> Self {
        self.symbols(SymbolSetId::Emoji(key.to_string()))
    }

    #[must_use]
    pub fn color_mode(mut self, mode: ColorMode) -> Self {
        self.color_mode = mode;
        self
    }

    #[must_use]
    pub fn invert(mut self, invert: bool) -> Self {
        self.invert = invert;
        self
    }

    #[must_use]
    pub fn contrast(mut self, contrast: f32) -> Self {
        self.contrast = contrast;
        self
    }

    #[must_use]
    pub fn brightness(mut self, brightness: f32) -> Self {
        self.brightness = brightness;
        self
    }

    #[must_use]
    pub fn edge_detection(mut self, edge: bool) -> Self {
        self.edge_detection = edge;
        self
    }

    #[must_use]
    pub fn denoise(mut self, denoise: bool) -> Self {
        self.denoise = denoise;
        self
    }

    #[must_use]
    pub fn sharpen(mut self, sharpen: f32) -> Self {
        self.sharpen = sharpen;
        self
    }

    #[must_use]
    pub fn color_emoji(mut self, color_emoji: bool) -> Self {
        self.color_emoji = color_emoji;
        self
    }

    /// Override the cell aspect correction. `None` picks the per-kind default.
    #[must_use]
    pub fn aspect_ratio(mut self, aspect: Option<f32>) -> Self {
        self.aspect_ratio = aspect;
        self
    }

    #[must_use]
    pub fn dither(mut self, dither: bool) -> Self {
        self.dither = dither;
        self
    }

    #[must_use]
    pub fn auto_enhance(mut self, auto_enhance: bool) -> Self {
        self.auto_enhance = auto_enhance;
        self
    }

    #[must_use]
    pub fn bg_style(mut self, bg_style: BgStyle) -> Self {
        self.bg_style = bg_style;
        self
    }

    /// Validate every field and resolve the palette.
    ///
    /// # Errors
    /// - `InvalidDimension` for a zero width or zero explicit height.
    /// - `InvalidParameter` for non-positive contrast/brightness/aspect,
    ///   negative sharpen, or `color_emoji` without an emoji set.
    /// - `UnknownSymbolSet` for an unregistered key.
    pub fn build(self) -> Result<ConversionSettings> {
        if self.width == 0 || self.height == Some(0) {
            return Err(CoreError::InvalidDimension {
                width: self.width,
                height: self.height.unwrap_or(0),
            });
        }
        positive("contrast", self.contrast)?;
        positive("brightness", self.brightness)?;
        if !self.sharpen.is_finite() || self.sharpen < 0.0 {
            return Err(CoreError::InvalidParameter {
                name: "sharpen",
                value: self.sharpen.to_string(),
            });
        }
        if let Some(aspect) = self.aspect_ratio {
            positive("aspect_ratio", aspect)?;
        }

        let palette = self.symbols.resolve()?;
        let is_emoji = palette.kind() == SymbolKind::Emoji;
        if self.color_emoji && !is_emoji {
            return Err(CoreError::InvalidParameter {
                name: "color_emoji",
                value: format!("true avec {} (jeu d'emoji requis)", self.symbols),
            });
        }
        let aspect_ratio = self.aspect_ratio.unwrap_or(if is_emoji {
            EMOJI_ASPECT_RATIO
        } else {
            CHAR_ASPECT_RATIO
        });

        log::debug!(
            "Settings validés : {}×{:?}, {}, mode {}",
            self.width,
            self.height,
            self.symbols,
            self.color_mode
        );

        Ok(ConversionSettings {
            width: self.width,
            height: self.height,
            symbols: self.symbols,
            palette,
            color_mode: self.color_mode,
            invert: self.invert,
            contrast: self.contrast,
            brightness: self.brightness,
            edge_detection: self.edge_detection,
            denoise: self.denoise,
            sharpen: self.sharpen,
            color_emoji: self.color_emoji,
            aspect_ratio,
            dither: self.dither,
            auto_enhance: self.auto_enhance,
            bg_style: self.bg_style,
        })
    }
}

fn positive(name: &'static str, value: f32) -> Result<()> {
    if value.is_finite() && value > 0.0 {
        Ok(())
    } else {
        Err(CoreError::InvalidParameter {
            name,
            value: value.to_string(),
        })
    }
}

/// Structure TOML intermédiaire pour désérialisation avec valeurs optionnelles.
#[derive(Deserialize)]
#[serde(deny_unknown_fields)]
struct ConfigFile {
    conversion: Option<ConversionSection>,
}

/// Conversion section of the TOML config, all fields optional for partial override.
#[derive(Deserialize)]
#[serde(deny_unknown_fields)]
struct ConversionSection {
    width: Option<u32>,
    height: Option<u32>,
    charset: Option<String>,
    emoji_set: Option<String>,
    glyphs: Option<String>,
    color_mode: Option<String>,
    invert: Option<bool>,
    contrast: Option<f32>,
    brightness: Option<f32>,
    edge_detection: Option<bool>,
    denoise: Option<bool>,
    sharpen: Option<f32>,
    color_emoji: Option<bool>,
    aspect_ratio: Option<f32>,
    dither: Option<bool>,
    auto_enhance: Option<bool>,
    bg_style: Option<String>,
}

/// Parse TOML text and merge it over the defaults.
///
/// Returns a builder so that callers (CLI flags) can override further before
/// validation.
///
/// # Errors
/// `Config` on malformed TOML or when more than one of `charset`,
/// `emoji_set` and `glyphs` is given, `UnsupportedColorMode`/`InvalidParameter`
/// on bad enum strings.
///
/// # Example
/// ```
/// use gs_core::config::parse_config;
/// let settings = parse_config("[conversion]\nwidth = 42\ncharset = \"blocks\"")
///     .unwrap()
///     .build()
///     .unwrap();
/// assert_eq!(settings.width(), 42);
/// ```
pub fn parse_config(content: &str) -> Result<SettingsBuilder> {
    let file: ConfigFile =
        toml::from_str(content).map_err(|e| CoreError::Config(e.to_string()))?;

    let mut b = SettingsBuilder::default();
    let Some(c) = file.conversion else {
        return Ok(b);
    };

    if let Some(v) = c.width {
        b.width = v;
    }
    if c.height.is_some() {
        b.height = c.height;
    }
    match (c.charset, c.emoji_set, c.glyphs) {
        (None, None, None) => {}
        (Some(v), None, None) => b.symbols = SymbolSetId::Charset(v),
        (None, Some(v), None) => b.symbols = SymbolSetId::Emoji(v),
        (None, None, Some(v)) => b.symbols = SymbolSetId::Custom(v),
        _ => {
            return Err(CoreError::Config(
                "charset, emoji_set et glyphs sont exclusifs".to_string(),
            ));
        }
    }
    if let Some(v) = c.color_mode {
        b.color_mode = v.parse()?;
    }
    if let Some(v) = c.invert {
        b.invert = v;
    }
    if let Some(v) = c.contrast {
        b.contrast = v;
    }
    if let Some(v) = c.brightness {
        b.brightness = v;
    }
    if let Some(v) = c.edge_detection {
        b.edge_detection = v;
    }
    if let Some(v) = c.denoise {
        b.denoise = v;
    }
    if let Some(v) = c.sharpen {
        b.sharpen = v;
    }
    if let Some(v) = c.color_emoji {
        b.color_emoji = v;
    }
    if c.aspect_ratio.is_some() {
        b.aspect_ratio = c.aspect_ratio;
    }
    if let Some(v) = c.dither {
        b.dither = v;
    }
    if let Some(v) = c.auto_enhance {
        b.auto_enhance = v;
    }
    if let Some(v) = c.bg_style {
        b.bg_style = v.parse()?;
    }

    Ok(b)
}

/// Charge un fichier TOML et fusionne avec les valeurs par défaut.
///
/// # Errors
/// `Io` if the file cannot be read, otherwise as [`parse_config`].
///
/// # Example
/// ```no_run
/// use gs_core::config::load_config;
/// use std::path::Path;
/// let settings = load_config(Path::new("config/default.toml")).unwrap().build().unwrap();
/// ```
pub fn load_config(path: &Path) -> Result<SettingsBuilder> {
    let content = std::fs::read_to_string(path).map_err(|source| CoreError::Io {
        path: path.to_path_buf(),
        source,
    })?;
    parse_config(&content).map_err(|e| match e {
        CoreError::Config(msg) => CoreError::Config(format!("{} : {msg}", path.display())),
        other => other,
    })
}
