// ── Button feedback ──
//
// Pure functions turning a cached headset into button colors. The
// palettes default to the colors operators already know from the device
// panel; hosts may override any of them.

use std::fmt;

use serde::{Deserialize, Serialize};

use crate::model::{BusLabel, ChannelTarget, Headset};

/// A 24-bit RGB color, `0xRRGGBB`.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(transparent)]
pub struct Rgb(pub u32);

impl Rgb {
    pub const BLACK: Rgb = Rgb(0x00_0000);
    pub const WHITE: Rgb = Rgb(0xFF_FFFF);
    pub const RED: Rgb = Rgb(0xFF_0000);
    pub const ORANGE: Rgb = Rgb(0xFF_8000);
    pub const YELLOW: Rgb = Rgb(0xFF_FF00);
    pub const GREEN: Rgb = Rgb(0x00_9000);
    pub const GRAY: Rgb = Rgb(0x66_6666);

    pub fn components(self) -> (u8, u8, u8) {
        let [_, r, g, b] = self.0.to_be_bytes();
        (r, g, b)
    }
}

impl fmt::Display for Rgb {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "#{:06X}", self.0)
    }
}

/// Colors to apply to a button. `None` leaves the host's own style.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct ButtonStyle {
    pub color: Option<Rgb>,
    pub bgcolor: Option<Rgb>,
}

impl ButtonStyle {
    pub fn new(color: Rgb, bgcolor: Rgb) -> Self {
        Self {
            color: Some(color),
            bgcolor: Some(bgcolor),
        }
    }

    pub fn background(bgcolor: Rgb) -> Self {
        Self {
            color: None,
            bgcolor: Some(bgcolor),
        }
    }

    pub fn is_empty(&self) -> bool {
        self.color.is_none() && self.bgcolor.is_none()
    }
}

/// Why cached feedback should be recomputed.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum FeedbackInvalidation {
    /// A poll or explicit refresh replaced the snapshot.
    Refreshed,
    /// A mutation committed against one headset.
    Mutated { headset_id: u32 },
}

// ── Online ───────────────────────────────────────────────────────────

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub struct OnlinePalette {
    pub online_bg: Rgb,
    pub offline_bg: Rgb,
}

impl Default for OnlinePalette {
    fn default() -> Self {
        Self {
            online_bg: Rgb::GREEN,
            offline_bg: Rgb::RED,
        }
    }
}

pub fn online_style(headset: &Headset, palette: OnlinePalette) -> ButtonStyle {
    if headset.is_online() {
        ButtonStyle::background(palette.online_bg)
    } else {
        ButtonStyle::background(palette.offline_bg)
    }
}

// ── Signal strength ──────────────────────────────────────────────────

/// Text and background per RSSI level 0-4.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub struct RssiPalette {
    pub levels: [ButtonStyle; 5],
}

impl Default for RssiPalette {
    fn default() -> Self {
        Self {
            levels: [
                ButtonStyle::new(Rgb::WHITE, Rgb(0x92_9292)),
                ButtonStyle::new(Rgb::WHITE, Rgb::RED),
                ButtonStyle::new(Rgb::WHITE, Rgb::ORANGE),
                ButtonStyle::new(Rgb::BLACK, Rgb::YELLOW),
                ButtonStyle::new(Rgb::WHITE, Rgb::GREEN),
            ],
        }
    }
}

pub fn rssi_style(headset: &Headset, palette: &RssiPalette) -> ButtonStyle {
    palette
        .levels
        .get(usize::from(headset.rssi))
        .copied()
        .unwrap_or(ButtonStyle::new(Rgb::WHITE, Rgb::GRAY))
}

// ── Battery ──────────────────────────────────────────────────────────

/// Background per battery cell level 1-7.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub struct CellPalette {
    pub levels: [Rgb; 7],
}

impl Default for CellPalette {
    fn default() -> Self {
        Self {
            levels: [
                Rgb(0xCC_0000),
                Rgb::RED,
                Rgb::ORANGE,
                Rgb::YELLOW,
                Rgb(0x00_6600),
                Rgb::GREEN,
                Rgb(0x00_00FF),
            ],
        }
    }
}

pub fn cell_style(headset: &Headset, palette: &CellPalette) -> ButtonStyle {
    let bg = usize::from(headset.cell)
        .checked_sub(1)
        .and_then(|i| palette.levels.get(i))
        .copied()
        .unwrap_or(Rgb::GRAY);
    ButtonStyle::new(Rgb::WHITE, bg)
}

// ── Role ─────────────────────────────────────────────────────────────

/// Fixed colors for the stock role names; anything else is white on black.
pub fn role_style(headset: &Headset) -> ButtonStyle {
    let name = headset.role.as_ref().map_or("", |r| r.name.as_str());
    match name {
        "Production" => ButtonStyle::new(Rgb::WHITE, Rgb::RED),
        "CamA" | "CamB" => ButtonStyle::new(Rgb::WHITE, Rgb::ORANGE),
        "Lighting" => ButtonStyle::new(Rgb::BLACK, Rgb::YELLOW),
        "Grip" => ButtonStyle::new(Rgb::WHITE, Rgb::GREEN),
        "Unassigned" => ButtonStyle::new(Rgb::WHITE, Rgb::GRAY),
        _ => ButtonStyle::new(Rgb::WHITE, Rgb::BLACK),
    }
}

// ── Channel match ────────────────────────────────────────────────────

pub const DEFAULT_MATCHED_BG: Rgb = Rgb(0x00_0090);

/// Highlight when `bus` sits in `target`'s slot. `ChannelTarget::None`
/// never matches.
pub fn channel_match_style(
    headset: &Headset,
    bus: BusLabel,
    target: ChannelTarget,
    matched_bg: Rgb,
) -> ButtonStyle {
    let slot = usize::from(target.position());
    if slot != 0 && headset.slots_for(bus.as_str()).contains(&slot) {
        ButtonStyle::background(matched_bg)
    } else {
        ButtonStyle::default()
    }
}
