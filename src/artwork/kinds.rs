use std::fmt;
use std::str::FromStr;

use serde::{Deserialize, Serialize};
use thiserror::Error;

/// Artwork categories the server can scrape for a ROM.
///
/// Declaration order is the canonical enumeration order and drives `Ord`.
#[derive(
    Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize, Deserialize,
)]
#[serde(rename_all = "snake_case")]
pub enum AssetKind {
    /// Composite image of box, screenshot and logo.
    Miximage,
    /// Rendered 3D box.
    Box3d,
    /// Front of the box.
    Box2d,
    /// Spine of the box.
    Box2dSide,
    /// Back of the box.
    Box2dBack,
    /// Unfolded box, front and back.
    Fullbox,
    /// In-game screenshot.
    Screenshot,
    /// Title screen capture.
    TitleScreen,
    /// Transparent logo wheel.
    Wheel,
    /// Arcade marquee.
    Marquee,
    /// Fan artwork.
    Fanart,
    /// Wide banner.
    Banner,
    /// Photo of the cartridge or disc.
    Physical,
    /// Screen bezel overlay.
    Bezel,
    /// Game logo.
    Logo,
    /// Steam grid image.
    Steamgrid,
}

impl AssetKind {
    /// Every kind, in canonical order.
    pub const ALL: [AssetKind; 16] = [
        Self::Miximage,
        Self::Box3d,
        Self::Box2d,
        Self::Box2dSide,
        Self::Box2dBack,
        Self::Fullbox,
        Self::Screenshot,
        Self::TitleScreen,
        Self::Wheel,
        Self::Marquee,
        Self::Fanart,
        Self::Banner,
        Self::Physical,
        Self::Bezel,
        Self::Logo,
        Self::Steamgrid,
    ];

    /// Name used on the wire and for local directories.
    pub fn as_str(self) -> &'static str {
        match self {
            Self::Miximage => "miximage",
            Self::Box3d => "box3d",
            Self::Box2d => "box2d",
            Self::Box2dSide => "box2d_side",
            Self::Box2dBack => "box2d_back",
            Self::Fullbox => "fullbox",
            Self::Screenshot => "screenshot",
            Self::TitleScreen => "title_screen",
            Self::Wheel => "wheel",
            Self::Marquee => "marquee",
            Self::Fanart => "fanart",
            Self::Banner => "banner",
            Self::Physical => "physical",
            Self::Bezel => "bezel",
            Self::Logo => "logo",
            Self::Steamgrid => "steamgrid",
        }
    }
}

impl fmt::Display for AssetKind {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

/// A name that is not one of the recognised artwork kinds.
#[derive(Debug, Clone, PartialEq, Eq, Error)]
#[error("unknown artwork kind {0:?}")]
pub struct UnknownAssetKind(pub String);

impl FromStr for AssetKind {
    type Err = UnknownAssetKind;

    fn from_str(value: &str) -> Result<Self, Self::Err> {
        Self::ALL
            .into_iter()
            .find(|kind| kind.as_str() == value)
            .ok_or_else(|| UnknownAssetKind(value.to_string()))
    }
}
