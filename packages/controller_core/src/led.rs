use crate::config::{active_config, ControllerConfig};
use crate::mode::Mode;

/// On/off state of the three LED channels.
#[derive(Clone, Copy, Debug, Default, Eq, PartialEq)]
pub struct Rgb {
    pub red: bool,
    pub green: bool,
    pub blue: bool,
}

impl Rgb {
    pub const OFF: Self = Self::new(false, false, false);
    pub const RED: Self = Self::new(true, false, false);
    pub const GREEN: Self = Self::new(false, true, false);
    pub const BLUE: Self = Self::new(false, false, true);
    pub const CYAN: Self = Self::new(false, true, true);
    pub const MAGENTA: Self = Self::new(true, false, true);
    pub const YELLOW: Self = Self::new(true, true, false);
    pub const WHITE: Self = Self::new(true, true, true);

    pub const fn new(red: bool, green: bool, blue: bool) -> Self {
        Self { red, green, blue }
    }
}

/// Static indicator color once the base station is known. Party and Scary
/// share `OFF`.
pub const fn mode_color(mode: Mode) -> Rgb {
    match mode {
        Mode::Chase => Rgb::BLUE,
        Mode::Idle => Rgb::GREEN,
        Mode::LightSelection => Rgb::CYAN,
        Mode::ControlSelection => Rgb::RED,
        Mode::ColorWheel => Rgb::MAGENTA,
        Mode::Dmx => Rgb::YELLOW,
        Mode::Preset => Rgb::WHITE,
        Mode::Party | Mode::Scary => Rgb::OFF,
    }
}

pub const PARTY_CYCLE: [Rgb; 4] = [Rgb::RED, Rgb::GREEN, Rgb::BLUE, Rgb::OFF];

#[derive(Clone, Copy, Debug, Eq, PartialEq)]
pub enum MorseElement {
    Dot,
    Dash,
    ElementBreak,
    LetterBreak,
    WordBreak,
}

impl MorseElement {
    pub const fn units(self) -> u16 {
        match self {
            Self::Dot | Self::ElementBreak => 1,
            Self::Dash | Self::LetterBreak => 3,
            Self::WordBreak => 7,
        }
    }

    pub const fn is_pulse(self) -> bool {
        matches!(self, Self::Dot | Self::Dash)
    }
}

use MorseElement::{Dash, Dot, ElementBreak, LetterBreak, WordBreak};

/// "-... . . .--." followed by a word break.
pub const BANNER: [MorseElement; 20] = [
    Dash,
    ElementBreak,
    Dot,
    ElementBreak,
    Dot,
    ElementBreak,
    Dot,
    LetterBreak,
    Dot,
    LetterBreak,
    Dot,
    LetterBreak,
    Dot,
    ElementBreak,
    Dash,
    ElementBreak,
    Dash,
    ElementBreak,
    Dot,
    WordBreak,
];

const BANNER_COLOR: Rgb = Rgb::WHITE;

/// Tick-driven pre-connect animation over [`BANNER`].
pub struct MorseAnimator {
    unit_ticks: u16,
    index: usize,
    elapsed: u16,
    lit: bool,
}

impl Default for MorseAnimator {
    fn default() -> Self {
        Self::new(active_config())
    }
}

impl MorseAnimator {
    pub fn new(config: &'static ControllerConfig) -> Self {
        Self {
            unit_ticks: config.led.morse_unit_ticks,
            index: 0,
            elapsed: 0,
            lit: false,
        }
    }

    pub fn restart(&mut self) {
        self.index = 0;
        self.elapsed = 0;
        self.lit = false;
    }

    pub fn index(&self) -> usize {
        self.index
    }

    pub fn is_lit(&self) -> bool {
        self.lit
    }

    pub fn dot(&mut self) -> bool {
        self.pulse(Dot.units())
    }

    pub fn dash(&mut self) -> bool {
        self.pulse(Dash.units())
    }

    pub fn element_break(&mut self) -> bool {
        self.gap(ElementBreak.units())
    }

    pub fn letter_break(&mut self) -> bool {
        self.gap(LetterBreak.units())
    }

    pub fn word_break(&mut self) -> bool {
        self.gap(WordBreak.units())
    }

    /// Advances one tick. Returns a color only when the LED has to change.
    pub fn tick(&mut self) -> Option<Rgb> {
        let was_lit = self.lit;
        let done = match BANNER[self.index] {
            Dot => self.dot(),
            Dash => self.dash(),
            ElementBreak => self.element_break(),
            LetterBreak => self.letter_break(),
            WordBreak => self.word_break(),
        };
        if done {
            self.index = (self.index + 1) % BANNER.len();
        }

        if self.lit == was_lit {
            None
        } else if self.lit {
            Some(BANNER_COLOR)
        } else {
            Some(Rgb::OFF)
        }
    }

    fn pulse(&mut self, units: u16) -> bool {
        self.elapsed = self.elapsed.saturating_add(1);
        if self.elapsed == 1 {
            self.lit = true;
        }
        if self.elapsed >= units.saturating_mul(self.unit_ticks) {
            self.lit = false;
            self.elapsed = 0;
            return true;
        }
        false
    }

    fn gap(&mut self, units: u16) -> bool {
        self.elapsed = self.elapsed.saturating_add(1);
        if self.elapsed >= units.saturating_mul(self.unit_ticks) {
            self.elapsed = 0;
            return true;
        }
        false
    }
}
