use serde::{Deserialize, Serialize};
use std::fmt;
use std::ops::{BitAnd, BitOr, BitXor};
use std::str::FromStr;

use crate::error::SixAxisError;

/// Maximum number of npad slots tracked at once
pub const NPAD_COUNT_MAX: usize = 4;

/// Logical controller slot
#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
pub enum NpadId {
    No1,
    No2,
    No3,
    No4,
}

impl NpadId {
    pub const ALL: [NpadId; NPAD_COUNT_MAX] = [NpadId::No1, NpadId::No2, NpadId::No3, NpadId::No4];

    pub fn index(self) -> usize {
        self as usize
    }
}

impl fmt::Display for NpadId {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "No{}", self.index() + 1)
    }
}

impl FromStr for NpadId {
    type Err = SixAxisError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.trim().to_ascii_lowercase().as_str() {
            "no1" | "1" => Ok(NpadId::No1),
            "no2" | "2" => Ok(NpadId::No2),
            "no3" | "3" => Ok(NpadId::No3),
            "no4" | "4" => Ok(NpadId::No4),
            _ => Err(SixAxisError::UnknownNpad(s.to_string())),
        }
    }
}

// ─── Buttons ─────────────────────────────────────────────────────────────────

#[derive(Clone, Copy, Debug, PartialEq, Eq, Serialize, Deserialize)]
pub enum NpadButton {
    A,
    B,
    X,
    Y,
    StickL,
    StickR,
    L,
    R,
    ZL,
    ZR,
    Plus,
    Minus,
    Left,
    Up,
    Right,
    Down,
}

impl NpadButton {
    pub fn mask(self) -> u64 {
        1 << (self as u64)
    }
}

/// Set of pressed buttons
#[derive(Clone, Copy, Debug, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct NpadButtonSet(pub u64);

impl NpadButtonSet {
    pub fn empty() -> Self {
        Self(0)
    }

    pub fn from_buttons(buttons: &[NpadButton]) -> Self {
        Self(buttons.iter().fold(0, |bits, b| bits | b.mask()))
    }

    pub fn contains(&self, button: NpadButton) -> bool {
        self.0 & button.mask() != 0
    }

    pub fn is_any_on(&self) -> bool {
        self.0 != 0
    }

    pub fn set(&mut self, button: NpadButton) {
        self.0 |= button.mask();
    }

    /// Release every button
    pub fn reset(&mut self) {
        self.0 = 0;
    }
}

impl BitXor for NpadButtonSet {
    type Output = Self;
    fn bitxor(self, rhs: Self) -> Self {
        Self(self.0 ^ rhs.0)
    }
}

impl BitAnd for NpadButtonSet {
    type Output = Self;
    fn bitand(self, rhs: Self) -> Self {
        Self(self.0 & rhs.0)
    }
}

impl BitOr for NpadButtonSet {
    type Output = Self;
    fn bitor(self, rhs: Self) -> Self {
        Self(self.0 | rhs.0)
    }
}

impl From<NpadButton> for NpadButtonSet {
    fn from(button: NpadButton) -> Self {
        Self(button.mask())
    }
}

/// Buttons that went from released to pressed between two polls
pub fn trigger_buttons(current: NpadButtonSet, previous: NpadButtonSet) -> NpadButtonSet {
    (current ^ previous) & current
}

/// Plus and Minus held together ends the session
pub fn is_terminate_chord(buttons: &NpadButtonSet) -> bool {
    buttons.contains(NpadButton::Plus) && buttons.contains(NpadButton::Minus)
}

// ─── Styles ──────────────────────────────────────────────────────────────────

/// Operating style of an npad
#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
pub enum NpadStyle {
    FullKey,
    Handheld,
    JoyDual,
    JoyLeft,
    JoyRight,
}

impl NpadStyle {
    pub const ALL: [NpadStyle; 5] = [
        NpadStyle::FullKey,
        NpadStyle::Handheld,
        NpadStyle::JoyDual,
        NpadStyle::JoyLeft,
        NpadStyle::JoyRight,
    ];

    pub fn mask(self) -> u32 {
        1 << (self as u32)
    }

    /// Button that recenters the pointer and rotation in this style
    pub fn recenter_button(self) -> NpadButton {
        match self {
            // A left Joy-Con alone has no Plus button
            NpadStyle::JoyLeft => NpadButton::Minus,
            _ => NpadButton::Plus,
        }
    }

    /// Number of six-axis sensors a device in this style exposes
    pub fn sensor_count(self) -> usize {
        match self {
            NpadStyle::Handheld | NpadStyle::JoyDual => 2,
            _ => 1,
        }
    }
}

impl fmt::Display for NpadStyle {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let name = match self {
            NpadStyle::FullKey => "FullKey",
            NpadStyle::Handheld => "Handheld",
            NpadStyle::JoyDual => "JoyDual",
            NpadStyle::JoyLeft => "JoyLeft",
            NpadStyle::JoyRight => "JoyRight",
        };
        f.write_str(name)
    }
}

/// Styles currently active on an npad
#[derive(Clone, Copy, Debug, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct NpadStyleSet(pub u32);

impl NpadStyleSet {
    pub fn empty() -> Self {
        Self(0)
    }

    pub fn from_styles(styles: &[NpadStyle]) -> Self {
        Self(styles.iter().fold(0, |bits, s| bits | s.mask()))
    }

    pub fn contains(&self, style: NpadStyle) -> bool {
        self.0 & style.mask() != 0
    }

    pub fn is_empty(&self) -> bool {
        self.0 == 0
    }

    pub fn styles(&self) -> Vec<NpadStyle> {
        NpadStyle::ALL.iter().copied().filter(|s| self.contains(*s)).collect()
    }
}

impl From<NpadStyle> for NpadStyleSet {
    fn from(style: NpadStyle) -> Self {
        Self(style.mask())
    }
}
