//! Color sets, color presets, color properties and hex colors.

use serde::{Deserialize, Serialize};

use crate::enums::ColorGroup;
use crate::species::Species;
use crate::NO_ID;

/// Linear RGBA color with components in `[0, 1]`.
#[derive(Clone, Copy, Debug, PartialEq, Serialize, Deserialize)]
pub struct Color {
    pub r: f32,
    pub g: f32,
    pub b: f32,
    pub a: f32,
}

impl Color {
    pub const WHITE: Color = Color::rgb(1.0, 1.0, 1.0);
    pub const BLACK: Color = Color::rgb(0.0, 0.0, 0.0);

    pub const fn rgb(r: f32, g: f32, b: f32) -> Self {
        Self { r, g, b, a: 1.0 }
    }

    /// Parse exactly six hex digits.
    pub fn from_hex(digits: &str) -> Option<Self> {
        if digits.len() != 6 || !digits.bytes().all(|b| b.is_ascii_hexdigit()) {
            return None;
        }
        let channel = |range: std::ops::Range<usize>| {
            u8::from_str_radix(&digits[range], 16)
                .ok()
                .map(|v| f32::from(v) / 255.0)
        };
        Some(Self::rgb(channel(0..2)?, channel(2..4)?, channel(4..6)?))
    }

    /// Six uppercase hex digits, alpha dropped.
    pub fn to_hex(self) -> String {
        let byte = |c: f32| (c.clamp(0.0, 1.0) * 255.0).round() as u8;
        format!("{:02X}{:02X}{:02X}", byte(self.r), byte(self.g), byte(self.b))
    }
}

/// A hex color string as stored in the catalog, with its parsed value cached.
///
/// The raw text is kept verbatim so it survives a save/load cycle unchanged.
/// Text that is not exactly six hex digits parses to opaque white.
#[derive(Clone, Debug, PartialEq, Serialize, Deserialize)]
#[serde(from = "String", into = "String")]
pub struct HexColor {
    raw: String,
    parsed: Color,
}

impl HexColor {
    pub fn new(raw: impl Into<String>) -> Self {
        let raw = raw.into();
        let parsed = Color::from_hex(&raw).unwrap_or(Color::WHITE);
        Self { raw, parsed }
    }

    pub fn from_color(color: Color) -> Self {
        Self {
            raw: color.to_hex(),
            parsed: Color { a: 1.0, ..color },
        }
    }

    pub fn as_str(&self) -> &str {
        &self.raw
    }

    pub fn color(&self) -> Color {
        self.parsed
    }

    /// True when the raw text parsed as a color rather than falling back to white.
    pub fn is_valid(&self) -> bool {
        Color::from_hex(&self.raw).is_some()
    }
}

impl From<String> for HexColor {
    fn from(raw: String) -> Self {
        Self::new(raw)
    }
}

impl From<HexColor> for String {
    fn from(hex: HexColor) -> Self {
        hex.raw
    }
}

impl Default for HexColor {
    fn default() -> Self {
        Self::from_color(Color::WHITE)
    }
}

/// One of the six material channels a color row carries.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum ColorChannel {
    Color,
    Metallic,
    Smoothness,
    Reflection,
    Emission,
    Opacity,
}

impl ColorChannel {
    pub const ALL: [ColorChannel; 6] = [
        Self::Color,
        Self::Metallic,
        Self::Smoothness,
        Self::Reflection,
        Self::Emission,
        Self::Opacity,
    ];

    /// Name used for the channel's source texture, e.g. `T_MetallicMap.png`.
    pub fn texture_name(self) -> &'static str {
        match self {
            Self::Color => "Color",
            Self::Metallic => "Metallic",
            Self::Smoothness => "Smoothness",
            Self::Reflection => "Reflection",
            Self::Emission => "Emission",
            Self::Opacity => "Opacity",
        }
    }
}

/// Values of all six channels for one color property.
#[derive(Clone, Debug, PartialEq, Serialize, Deserialize)]
pub struct ColorChannels {
    pub color: HexColor,
    pub metallic: HexColor,
    pub smoothness: HexColor,
    pub reflection: HexColor,
    pub emission: HexColor,
    pub opacity: HexColor,
}

impl ColorChannels {
    pub fn get(&self, channel: ColorChannel) -> &HexColor {
        match channel {
            ColorChannel::Color => &self.color,
            ColorChannel::Metallic => &self.metallic,
            ColorChannel::Smoothness => &self.smoothness,
            ColorChannel::Reflection => &self.reflection,
            ColorChannel::Emission => &self.emission,
            ColorChannel::Opacity => &self.opacity,
        }
    }

    pub fn set(&mut self, channel: ColorChannel, value: HexColor) {
        match channel {
            ColorChannel::Color => self.color = value,
            ColorChannel::Metallic => self.metallic = value,
            ColorChannel::Smoothness => self.smoothness = value,
            ColorChannel::Reflection => self.reflection = value,
            ColorChannel::Emission => self.emission = value,
            ColorChannel::Opacity => self.opacity = value,
        }
    }
}

impl Default for ColorChannels {
    /// White albedo, fully opaque, every other channel off.
    fn default() -> Self {
        let black = HexColor::from_color(Color::BLACK);
        Self {
            color: HexColor::from_color(Color::WHITE),
            metallic: black.clone(),
            smoothness: black.clone(),
            reflection: black.clone(),
            emission: black,
            opacity: HexColor::from_color(Color::WHITE),
        }
    }
}

/// A named material slot addressed by its texel in the color atlas.
#[derive(Clone, Debug, PartialEq, Serialize, Deserialize)]
pub struct ColorProperty {
    pub id: i64,
    pub group: ColorGroup,
    pub name: String,
    pub u: i32,
    pub v: i32,
}

/// Source texture paths of a color set, one per channel.
#[derive(Clone, Debug, Default, PartialEq, Serialize, Deserialize)]
pub struct TexturePaths {
    pub color: String,
    pub metallic: String,
    pub smoothness: String,
    pub reflection: String,
    pub emission: String,
    pub opacity: String,
}

impl TexturePaths {
    /// Paths `<dir>/T_<Channel>Map.png` for every channel.
    pub fn in_directory(dir: &str) -> Self {
        let path = |c: ColorChannel| format!("{dir}/T_{}Map.png", c.texture_name());
        Self {
            color: path(ColorChannel::Color),
            metallic: path(ColorChannel::Metallic),
            smoothness: path(ColorChannel::Smoothness),
            reflection: path(ColorChannel::Reflection),
            emission: path(ColorChannel::Emission),
            opacity: path(ColorChannel::Opacity),
        }
    }
}

/// A complete set of color rows, optionally tied to one species.
#[derive(Clone, Debug, PartialEq, Serialize, Deserialize)]
pub struct ColorSet {
    pub id: i64,
    /// `-1` marks the global default set.
    pub species_id: i64,
    pub name: String,
    pub textures: TexturePaths,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub species: Option<Species>,
}

impl ColorSet {
    pub fn new(name: impl Into<String>, species_id: i64) -> Self {
        Self {
            id: NO_ID,
            species_id,
            name: name.into(),
            textures: TexturePaths::default(),
            species: None,
        }
    }

    pub fn is_default(&self) -> bool {
        self.species_id == NO_ID
    }
}

/// Channel values of one property within a color set.
#[derive(Clone, Debug, PartialEq, Serialize, Deserialize)]
pub struct ColorRow {
    pub id: i64,
    pub color_set_id: i64,
    pub color_property_id: i64,
    pub channels: ColorChannels,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub color_property: Option<ColorProperty>,
}

impl ColorRow {
    pub fn new(color_set_id: i64, color_property_id: i64, channels: ColorChannels) -> Self {
        Self {
            id: NO_ID,
            color_set_id,
            color_property_id,
            channels,
            color_property: None,
        }
    }

    /// Unsaved row in `color_set_id` carrying a preset row's values.
    pub fn from_preset_row(color_set_id: i64, row: &ColorPresetRow) -> Self {
        Self {
            id: NO_ID,
            color_set_id,
            color_property_id: row.color_property_id,
            channels: row.channels.clone(),
            color_property: row.color_property.clone(),
        }
    }
}

/// A named palette for one color group.
#[derive(Clone, Debug, PartialEq, Serialize, Deserialize)]
pub struct ColorPreset {
    pub id: i64,
    pub name: String,
    pub group: ColorGroup,
    pub species_id: i64,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub species: Option<Species>,
}

impl ColorPreset {
    pub fn new(name: impl Into<String>, group: ColorGroup, species_id: i64) -> Self {
        Self {
            id: NO_ID,
            name: name.into(),
            group,
            species_id,
            species: None,
        }
    }
}

#[derive(Clone, Debug, PartialEq, Serialize, Deserialize)]
pub struct ColorPresetRow {
    pub id: i64,
    pub color_preset_id: i64,
    pub color_property_id: i64,
    pub channels: ColorChannels,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub color_property: Option<ColorProperty>,
}

impl ColorPresetRow {
    pub fn new(color_preset_id: i64, color_property_id: i64, channels: ColorChannels) -> Self {
        Self {
            id: NO_ID,
            color_preset_id,
            color_property_id,
            channels,
            color_property: None,
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_hex_parse() {
        let c = Color::from_hex("FF8000").expect("parse");
        assert_eq!(c.r, 1.0);
        assert!((c.g - 128.0 / 255.0).abs() < f32::EPSILON);
        assert_eq!(c.b, 0.0);
        assert_eq!(c.a, 1.0);
        assert!(Color::from_hex("00ff00").is_some());
        assert!(Color::from_hex("#00ff00").is_none());
    }

    #[test]
    fn test_invalid_hex_is_white() {
        for raw in ["", "FFF", "GG0000", "FF000000", "#12345", "#FF0000"] {
            let hex = HexColor::new(raw);
            assert_eq!(hex.color(), Color::WHITE, "{raw}");
            assert!(!hex.is_valid());
            assert_eq!(hex.as_str(), raw);
        }
    }

    #[test]
    fn test_to_hex_uppercase() {
        assert_eq!(Color::rgb(1.0, 0.0, 0.5).to_hex(), "FF0080");
        assert_eq!(HexColor::from_color(Color::BLACK).as_str(), "000000");
    }

    #[test]
    fn test_hex_color_serde_as_string() {
        let hex = HexColor::new("1A2B3C");
        let json = serde_json::to_string(&hex).expect("serialize");
        assert_eq!(json, "\"1A2B3C\"");
        let back: HexColor = serde_json::from_str(&json).expect("deserialize");
        assert_eq!(back, hex);
        assert_eq!(back.color(), hex.color());
    }

    #[test]
    fn test_channels_get_set() {
        let mut channels = ColorChannels::default();
        assert_eq!(channels.get(ColorChannel::Opacity).as_str(), "FFFFFF");
        channels.set(ColorChannel::Emission, HexColor::new("00FF00"));
        assert_eq!(channels.emission.as_str(), "00FF00");
    }

    #[test]
    fn test_texture_paths() {
        let paths = TexturePaths::in_directory("Resources/Textures");
        assert_eq!(paths.metallic, "Resources/Textures/T_MetallicMap.png");
    }
}
