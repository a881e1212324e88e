//! Palette module - colour definitions and their appearance tiers

use crate::error::ConfigError;
use crate::types::{ColorId, Tier, APPEARANCE_TIERS};

/// One tile colour and the appearance keys for each tier
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ColorDef {
    pub name: String,
    /// Appearance keys (sprite names), indexed by `Tier::index()`
    pub tiers: Vec<String>,
}

impl ColorDef {
    /// Colour with the conventional `<name>_0..<name>_3` appearance keys
    pub fn named(name: &str) -> Self {
        Self {
            name: name.to_string(),
            tiers: (0..APPEARANCE_TIERS).map(|i| format!("{}_{}", name, i)).collect(),
        }
    }
}

/// Ordered list of colours; a tile's `ColorId` indexes into it
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Palette {
    colors: Vec<ColorDef>,
}

impl Palette {
    /// Validate and build a palette
    ///
    /// Fails if the list is empty, too long for a `ColorId`, or any colour
    /// lacks one of the appearance tiers.
    pub fn new(colors: Vec<ColorDef>) -> Result<Self, ConfigError> {
        if colors.is_empty() {
            return Err(ConfigError::EmptyPalette);
        }
        if colors.len() > usize::from(ColorId::MAX) + 1 {
            return Err(ConfigError::PaletteTooLarge(colors.len()));
        }
        if let Some(bad) = colors.iter().find(|c| c.tiers.len() < APPEARANCE_TIERS) {
            return Err(ConfigError::MissingTiers {
                color: bad.name.clone(),
                found: bad.tiers.len(),
            });
        }
        Ok(Self { colors })
    }

    /// `n` colours named `color0..color{n-1}`
    pub fn numbered(n: usize) -> Result<Self, ConfigError> {
        Self::new((0..n).map(|i| ColorDef::named(&format!("color{}", i))).collect())
    }

    /// The five-colour set used by default
    pub fn classic() -> Self {
        Self {
            colors: ["red", "green", "blue", "yellow", "purple"]
                .iter()
                .map(|n| ColorDef::named(n))
                .collect(),
        }
    }

    pub fn len(&self) -> usize {
        self.colors.len()
    }

    pub fn is_empty(&self) -> bool {
        self.colors.is_empty()
    }

    pub fn get(&self, color: ColorId) -> Option<&ColorDef> {
        self.colors.get(usize::from(color))
    }

    pub fn colors(&self) -> &[ColorDef] {
        &self.colors
    }

    /// Appearance key a renderer should draw for `color` at `tier`
    ///
    /// # Examples
    ///
    /// ```
    /// use tilepop_core::Palette;
    /// use tilepop_core::types::Tier;
    ///
    /// let palette = Palette::classic();
    /// assert_eq!(palette.appearance(2, Tier::Large), Some("blue_2"));
    /// assert_eq!(palette.appearance(9, Tier::Base), None);
    /// ```
    pub fn appearance(&self, color: ColorId, tier: Tier) -> Option<&str> {
        self.get(color)
            .and_then(|c| c.tiers.get(tier.index()))
            .map(String::as_str)
    }
}

impl Default for Palette {
    fn default() -> Self {
        Self::classic()
    }
}
