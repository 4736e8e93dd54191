use crate::config::{active_config, ControllerConfig};

use super::{ButtonEvent, ButtonLevels};

/// Debounces the three buttons and classifies presses.
///
/// A raw level combination is accepted only once it has been stable for
/// `button_ticks`. B1/B2 fire on the accepted press, and a press that grows
/// into both buttons fires `B1B2` once. PS2 fires `Ps2Long` while still held
/// past `ps2_long_press_ticks`, otherwise `Ps2Short` on release.
pub struct ButtonDebouncer {
    config: &'static ControllerConfig,
    candidate: ButtonLevels,
    stable_for: u16,
    accepted: ButtonLevels,
    chord_fired: bool,
    ps2_held: u16,
    ps2_long_fired: bool,
    pending: ButtonEvent,
}

impl Default for ButtonDebouncer {
    fn default() -> Self {
        Self::new(active_config())
    }
}

impl ButtonDebouncer {
    pub fn new(config: &'static ControllerConfig) -> Self {
        Self {
            config,
            candidate: ButtonLevels::default(),
            stable_for: 0,
            accepted: ButtonLevels::default(),
            chord_fired: false,
            ps2_held: 0,
            ps2_long_fired: false,
            pending: ButtonEvent::None,
        }
    }

    pub fn reset(&mut self) {
        *self = Self::new(self.config);
    }

    pub fn read_buttons(&mut self, levels: ButtonLevels) -> ButtonEvent {
        let debounce = self.config.debounce;

        if levels == self.candidate {
            self.stable_for = self.stable_for.saturating_add(1);
        } else {
            self.candidate = levels;
            self.stable_for = 1;
        }

        let mut face = ButtonEvent::None;
        let mut ps2 = ButtonEvent::None;

        if self.stable_for >= debounce.button_ticks && self.candidate != self.accepted {
            let before = self.accepted;
            let after = self.candidate;
            self.accepted = after;
            face = self.face_transition(before, after);
            ps2 = self.ps2_transition(before.ps2, after.ps2);
        } else if self.accepted.ps2 && !self.ps2_long_fired {
            self.ps2_held = self.ps2_held.saturating_add(1);
            if self.ps2_held >= debounce.ps2_long_press_ticks {
                self.ps2_long_fired = true;
                ps2 = ButtonEvent::Ps2Long;
            }
        }

        // One event per tick; a collision defers the second one.
        let queued = core::mem::take(&mut self.pending);
        let mut ready = [queued, face, ps2]
            .into_iter()
            .filter(|event| !event.is_none());
        let event = ready.next().unwrap_or_default();
        self.pending = ready.next().unwrap_or_default();
        event
    }

    fn face_transition(&mut self, before: ButtonLevels, after: ButtonLevels) -> ButtonEvent {
        if !after.b1 && !after.b2 {
            self.chord_fired = false;
            return ButtonEvent::None;
        }
        if after.b1 && after.b2 {
            if self.chord_fired {
                return ButtonEvent::None;
            }
            self.chord_fired = true;
            return ButtonEvent::B1B2;
        }
        if before.b1 || before.b2 {
            // Releasing one half of a chord, or sliding from one button to the other.
            return if self.chord_fired {
                ButtonEvent::None
            } else if after.b1 && !before.b1 {
                ButtonEvent::B1
            } else if after.b2 && !before.b2 {
                ButtonEvent::B2
            } else {
                ButtonEvent::None
            };
        }
        if after.b1 {
            ButtonEvent::B1
        } else {
            ButtonEvent::B2
        }
    }

    fn ps2_transition(&mut self, before: bool, after: bool) -> ButtonEvent {
        match (before, after) {
            (false, true) => {
                self.ps2_held = self.config.debounce.button_ticks;
                self.ps2_long_fired = false;
                ButtonEvent::None
            }
            (true, false) => {
                let long_fired = self.ps2_long_fired;
                self.ps2_held = 0;
                self.ps2_long_fired = false;
                if long_fired {
                    ButtonEvent::None
                } else {
                    ButtonEvent::Ps2Short
                }
            }
            _ => ButtonEvent::None,
        }
    }
}
