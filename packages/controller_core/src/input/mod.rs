mod buttons;
mod direction;

pub use buttons::ButtonDebouncer;
pub use direction::{DebounceCounter, DirectionDebouncer};

#[derive(Clone, Copy, Debug, Default, Eq, PartialEq)]
pub enum Direction {
    #[default]
    Center,
    Up,
    Down,
    Left,
    Right,
}

impl Direction {
    pub const fn is_center(self) -> bool {
        matches!(self, Self::Center)
    }

    pub const fn as_str(self) -> &'static str {
        match self {
            Self::Center => "center",
            Self::Up => "up",
            Self::Down => "down",
            Self::Left => "left",
            Self::Right => "right",
        }
    }
}

#[derive(Clone, Copy, Debug, Default, Eq, PartialEq)]
pub enum ButtonEvent {
    #[default]
    None,
    B1,
    B2,
    B1B2,
    Ps2Short,
    Ps2Long,
}

impl ButtonEvent {
    pub const fn is_none(self) -> bool {
        matches!(self, Self::None)
    }

    pub const fn as_str(self) -> &'static str {
        match self {
            Self::None => "none",
            Self::B1 => "b1",
            Self::B2 => "b2",
            Self::B1B2 => "b1b2",
            Self::Ps2Short => "ps2",
            Self::Ps2Long => "ps2_long",
        }
    }
}

/// One raw reading of both stick axes.
#[derive(Clone, Copy, Debug, Default, Eq, PartialEq)]
pub struct StickSample {
    pub raw_x: u16,
    pub raw_y: u16,
}

/// Button levels with `true` meaning pressed, independent of pin polarity.
#[derive(Clone, Copy, Debug, Default, Eq, PartialEq)]
pub struct ButtonLevels {
    pub b1: bool,
    pub b2: bool,
    pub ps2: bool,
}
