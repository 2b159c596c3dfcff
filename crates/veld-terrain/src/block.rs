//! The closed block-type enumeration and the height classification rule.

use std::fmt;

use crate::settings::BuildSettings;

/// Terrain cell type, derived from a height classification.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash)]
pub enum BlockType {
    /// Below the ocean cutoff.
    Ocean,
    /// Within the river band around mid-height.
    River,
    /// Everything that is neither water nor mountain.
    Grassland,
    /// Above the mountain cutoff.
    Mountain,
}

impl BlockType {
    /// All variants, in classification precedence order (grassland last as
    /// the fallback).
    pub const ALL: [BlockType; 4] = [
        BlockType::Ocean,
        BlockType::River,
        BlockType::Grassland,
        BlockType::Mountain,
    ];

    /// Classify a terrain height.
    ///
    /// The checks run in a fixed order -- ocean, river, mountain, then
    /// grassland as the fallback -- and the first match wins. The river band
    /// can overlap the ocean band just below the ocean cutoff; checking
    /// ocean first resolves that overlap identically for every caller.
    pub fn classify(height: f64, settings: &BuildSettings) -> BlockType {
        let world_height = settings.world_height();
        if height < settings.ocean_threshold() * world_height {
            BlockType::Ocean
        } else if (height - settings.mid_height()).abs()
            < settings.river_threshold() * world_height
        {
            BlockType::River
        } else if height > settings.mountain_threshold() * world_height {
            BlockType::Mountain
        } else {
            BlockType::Grassland
        }
    }

    /// Human-readable label for this block type.
    pub fn label(self) -> &'static str {
        match self {
            BlockType::Ocean => "Ocean",
            BlockType::River => "River",
            BlockType::Grassland => "Grassland",
            BlockType::Mountain => "Mountain",
        }
    }
}

impl fmt::Display for BlockType {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.label())
    }
}
