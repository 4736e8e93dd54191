use crate::config::{active_config, ControllerConfig};

use super::{Direction, StickSample};

const UP: usize = 0;
const DOWN: usize = 1;
const LEFT: usize = 2;
const RIGHT: usize = 3;

/// Per-direction hold state. `held` is the zero-based index of the latest
/// tick the direction was observed on.
#[derive(Clone, Copy, Debug, Default, Eq, PartialEq)]
pub enum DebounceCounter {
    #[default]
    Idle,
    Counting {
        held: u16,
    },
    Latched {
        held: u16,
    },
    Repeat {
        since_fire: u16,
    },
}

#[derive(Clone, Copy, Debug, Eq, PartialEq)]
enum AxisClass {
    Negative,
    Center,
    Positive,
}

impl AxisClass {
    fn inverted(self, invert: bool) -> Self {
        match (self, invert) {
            (Self::Negative, true) => Self::Positive,
            (Self::Positive, true) => Self::Negative,
            (class, _) => class,
        }
    }
}

pub struct DirectionDebouncer {
    config: &'static ControllerConfig,
    counters: [DebounceCounter; 4],
}

impl Default for DirectionDebouncer {
    fn default() -> Self {
        Self::new(active_config())
    }
}

impl DirectionDebouncer {
    pub fn new(config: &'static ControllerConfig) -> Self {
        Self {
            config,
            counters: [DebounceCounter::Idle; 4],
        }
    }

    /// Counters in `Up, Down, Left, Right` order.
    pub fn counters(&self) -> [DebounceCounter; 4] {
        self.counters
    }

    pub fn is_clear(&self) -> bool {
        self.counters
            .iter()
            .all(|counter| matches!(counter, DebounceCounter::Idle))
    }

    pub fn reset(&mut self) {
        self.counters = [DebounceCounter::Idle; 4];
    }

    pub fn read_direction(
        &mut self,
        sample: StickSample,
        continuous_read_enabled: bool,
    ) -> Direction {
        let Some(observed) = self.classify(sample) else {
            self.reset();
            return Direction::Center;
        };

        let slot = match observed {
            Direction::Up => UP,
            Direction::Down => DOWN,
            Direction::Left => LEFT,
            Direction::Right => RIGHT,
            Direction::Center => {
                self.reset();
                return Direction::Center;
            }
        };

        for (idx, counter) in self.counters.iter_mut().enumerate() {
            if idx != slot {
                *counter = DebounceCounter::Idle;
            }
        }

        let (next, fired) = self.advance(self.counters[slot], continuous_read_enabled);
        self.counters[slot] = next;
        if fired {
            observed
        } else {
            Direction::Center
        }
    }

    /// `None` means a diagonal reading.
    fn classify(&self, sample: StickSample) -> Option<Direction> {
        let stick = self.config.stick;
        let x = classify_axis(
            sample.raw_x,
            stick.negative_threshold(stick.x_center),
            stick.positive_threshold(),
        );
        let y = classify_axis(
            sample.raw_y,
            stick.negative_threshold(stick.y_center),
            stick.positive_threshold(),
        );
        let (horizontal, vertical) = if stick.swap_axes { (y, x) } else { (x, y) };
        let horizontal = horizontal.inverted(stick.invert_x);
        let vertical = vertical.inverted(stick.invert_y);

        match (horizontal, vertical) {
            (AxisClass::Center, AxisClass::Center) => Some(Direction::Center),
            (AxisClass::Negative, AxisClass::Center) => Some(Direction::Left),
            (AxisClass::Positive, AxisClass::Center) => Some(Direction::Right),
            (AxisClass::Center, AxisClass::Negative) => Some(Direction::Down),
            (AxisClass::Center, AxisClass::Positive) => Some(Direction::Up),
            _ => None,
        }
    }

    fn advance(&self, counter: DebounceCounter, continuous: bool) -> (DebounceCounter, bool) {
        let debounce = self.config.debounce;
        let fire_at = debounce.direction_ticks.saturating_sub(1);

        match counter {
            DebounceCounter::Idle => {
                if fire_at == 0 {
                    (DebounceCounter::Latched { held: 0 }, true)
                } else {
                    (DebounceCounter::Counting { held: 0 }, false)
                }
            }
            DebounceCounter::Counting { held } => {
                let held = held.saturating_add(1);
                if held >= fire_at {
                    (DebounceCounter::Latched { held }, true)
                } else {
                    (DebounceCounter::Counting { held }, false)
                }
            }
            DebounceCounter::Latched { held } if continuous => {
                let held = held.saturating_add(1);
                if held >= debounce.long_hold_ticks {
                    (DebounceCounter::Repeat { since_fire: 0 }, false)
                } else {
                    (DebounceCounter::Latched { held }, false)
                }
            }
            DebounceCounter::Latched { .. } => (counter, false),
            DebounceCounter::Repeat { since_fire } if continuous => {
                let since_fire = since_fire.saturating_add(1);
                if since_fire >= debounce.repeat_ticks {
                    (DebounceCounter::Repeat { since_fire: 0 }, true)
                } else {
                    (DebounceCounter::Repeat { since_fire }, false)
                }
            }
            DebounceCounter::Repeat { .. } => (counter, false),
        }
    }
}

fn classify_axis(raw: u16, negative_below: u16, positive_above: u16) -> AxisClass {
    if raw < negative_below {
        AxisClass::Negative
    } else if raw > positive_above {
        AxisClass::Positive
    } else {
        AxisClass::Center
    }
}
