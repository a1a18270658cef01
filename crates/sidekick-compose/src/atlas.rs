//! Six-channel color atlas painted from color rows.
//!
//! Each color property owns the 2x2 texel block whose lower-left corner is
//! `(2u, 2v)`. Several properties may share a block; the last write wins.

use serde::Serialize;
use sidekick_types::{Color, ColorChannel, ColorChannels, ColorProperty};

/// Default edge length of each channel texture.
pub const DEFAULT_ATLAS_SIZE: u32 = 32;

#[derive(Clone, Debug, PartialEq, Serialize)]
pub struct ColorAtlas {
    size: u32,
    textures: [Vec<Color>; 6],
}

fn slot(channel: ColorChannel) -> usize {
    match channel {
        ColorChannel::Color => 0,
        ColorChannel::Metallic => 1,
        ColorChannel::Smoothness => 2,
        ColorChannel::Reflection => 3,
        ColorChannel::Emission => 4,
        ColorChannel::Opacity => 5,
    }
}

impl ColorAtlas {
    /// A `size` x `size` atlas filled with the default channel values.
    pub fn new(size: u32) -> Self {
        let base = ColorChannels::default();
        let texels = (size as usize) * (size as usize);
        let textures = ColorChannel::ALL.map(|c| vec![base.get(c).color(); texels]);
        Self { size, textures }
    }

    pub fn size(&self) -> u32 {
        self.size
    }

    /// Row-major texels of one channel, `y` growing upward.
    pub fn texture(&self, channel: ColorChannel) -> &[Color] {
        &self.textures[slot(channel)]
    }

    pub fn texel(&self, channel: ColorChannel, x: u32, y: u32) -> Option<Color> {
        if x >= self.size || y >= self.size {
            return None;
        }
        self.texture(channel)
            .get((y as usize) * (self.size as usize) + x as usize)
            .copied()
    }

    /// Write all six channels of a property. Returns `false` when the block
    /// falls outside the atlas.
    pub fn paint(&mut self, property: &ColorProperty, channels: &ColorChannels) -> bool {
        if property.u < 0 || property.v < 0 {
            return false;
        }
        let (x, y) = (property.u as u32 * 2, property.v as u32 * 2);
        if x + 1 >= self.size || y + 1 >= self.size {
            return false;
        }
        let stride = self.size as usize;
        for channel in ColorChannel::ALL {
            let color = channels.get(channel).color();
            let texture = &mut self.textures[slot(channel)];
            for (dx, dy) in [(0, 0), (1, 0), (0, 1), (1, 1)] {
                texture[(y as usize + dy) * stride + x as usize + dx] = color;
            }
        }
        true
    }
}

impl Default for ColorAtlas {
    fn default() -> Self {
        Self::new(DEFAULT_ATLAS_SIZE)
    }
}
