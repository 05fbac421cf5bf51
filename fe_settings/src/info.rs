use serde::{Deserialize, Serialize};

/// Screen rotation applied on top of the physical display, in clockwise
/// quarter turns.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Default, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum RotationState {
    #[default]
    None,
    Right,
    Flip,
    Left,
}

impl RotationState {
    pub const ALL: [RotationState; 4] = [
        RotationState::None,
        RotationState::Right,
        RotationState::Flip,
        RotationState::Left,
    ];

    /// Maps any integer onto the four states, wrapping in both directions.
    pub fn from_index(index: i32) -> Self {
        Self::ALL[index.rem_euclid(4) as usize]
    }

    pub fn index(self) -> i32 {
        match self {
            RotationState::None => 0,
            RotationState::Right => 1,
            RotationState::Flip => 2,
            RotationState::Left => 3,
        }
    }

    /// Quarter turns of `self` followed by `other`.
    pub fn combine(self, other: RotationState) -> Self {
        Self::from_index(self.index() + other.index())
    }

    /// True when the rotation swaps the display axes.
    pub fn is_sideways(self) -> bool {
        matches!(self, RotationState::Right | RotationState::Left)
    }

    pub fn name(self) -> &'static str {
        match self {
            RotationState::None => "None",
            RotationState::Right => "Right",
            RotationState::Flip => "Flip",
            RotationState::Left => "Left",
        }
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum SoundKind {
    Sound,
    Movie,
}

/// Per-game fields exposed to layouts through `game_info` and the `Info`
/// enumeration. Order is part of the script contract.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub enum InfoField {
    Name,
    Title,
    Emulator,
    Cloneof,
    Year,
    Manufacturer,
    Category,
    Players,
    Rotation,
    Control,
    Status,
    DisplayCount,
    DisplayType,
    AltRomname,
    AltTitle,
    Extra,
}

impl InfoField {
    pub const ALL: [InfoField; 16] = [
        InfoField::Name,
        InfoField::Title,
        InfoField::Emulator,
        InfoField::Cloneof,
        InfoField::Year,
        InfoField::Manufacturer,
        InfoField::Category,
        InfoField::Players,
        InfoField::Rotation,
        InfoField::Control,
        InfoField::Status,
        InfoField::DisplayCount,
        InfoField::DisplayType,
        InfoField::AltRomname,
        InfoField::AltTitle,
        InfoField::Extra,
    ];

    pub fn from_index(index: i32) -> Option<Self> {
        usize::try_from(index)
            .ok()
            .and_then(|idx| Self::ALL.get(idx).copied())
    }

    pub fn index(self) -> i32 {
        Self::ALL
            .iter()
            .position(|field| *field == self)
            .map(|idx| idx as i32)
            .unwrap_or(0)
    }

    pub fn name(self) -> &'static str {
        match self {
            InfoField::Name => "Name",
            InfoField::Title => "Title",
            InfoField::Emulator => "Emulator",
            InfoField::Cloneof => "Cloneof",
            InfoField::Year => "Year",
            InfoField::Manufacturer => "Manufacturer",
            InfoField::Category => "Category",
            InfoField::Players => "Players",
            InfoField::Rotation => "Rotation",
            InfoField::Control => "Control",
            InfoField::Status => "Status",
            InfoField::DisplayCount => "DisplayCount",
            InfoField::DisplayType => "DisplayType",
            InfoField::AltRomname => "AltRomname",
            InfoField::AltTitle => "AltTitle",
            InfoField::Extra => "Extra",
        }
    }

    pub fn from_name(name: &str) -> Option<Self> {
        Self::ALL
            .iter()
            .copied()
            .find(|field| field.name().eq_ignore_ascii_case(name))
    }
}
