use statig::{blocking::IntoStateMachineExt as _, prelude::*};

use crate::config::{active_config, ControllerConfig};
use crate::input::{ButtonEvent, Direction};

/// One qualifying input for the sequence matcher.
#[derive(Clone, Copy, Debug, Eq, PartialEq)]
pub enum Symbol {
    Up,
    Down,
    Left,
    Right,
    B1,
    B2,
    Ps2,
    /// B1+B2 together. Part of neither sequence.
    Chord,
}

impl Symbol {
    /// The tick's qualifying event. Direction wins over button.
    pub fn from_events(direction: Direction, button: ButtonEvent) -> Option<Self> {
        match direction {
            Direction::Up => Some(Self::Up),
            Direction::Down => Some(Self::Down),
            Direction::Left => Some(Self::Left),
            Direction::Right => Some(Self::Right),
            Direction::Center => match button {
                ButtonEvent::None => None,
                ButtonEvent::B1 => Some(Self::B1),
                ButtonEvent::B2 => Some(Self::B2),
                ButtonEvent::B1B2 => Some(Self::Chord),
                ButtonEvent::Ps2Short | ButtonEvent::Ps2Long => Some(Self::Ps2),
            },
        }
    }
}

pub const FORWARD_SEQUENCE: [Symbol; 11] = [
    Symbol::Up,
    Symbol::Up,
    Symbol::Down,
    Symbol::Down,
    Symbol::Left,
    Symbol::Right,
    Symbol::Left,
    Symbol::Right,
    Symbol::B2,
    Symbol::B1,
    Symbol::Ps2,
];

pub const REVERSE_SEQUENCE: [Symbol; 11] = [
    Symbol::Down,
    Symbol::Down,
    Symbol::Up,
    Symbol::Up,
    Symbol::Right,
    Symbol::Left,
    Symbol::Right,
    Symbol::Left,
    Symbol::Ps2,
    Symbol::B1,
    Symbol::B2,
];

/// Steps (1-based, after the advance) that report `PartialMatch`.
const PARTIAL_STEPS: [u8; 2] = [7, 8];

#[derive(Clone, Copy, Debug, Default, Eq, PartialEq)]
pub enum PatternSignal {
    #[default]
    None,
    PartialMatch,
    ForwardComplete,
    ReverseComplete,
}

impl PatternSignal {
    pub const fn is_complete(self) -> bool {
        matches!(self, Self::ForwardComplete | Self::ReverseComplete)
    }
}

#[derive(Clone, Copy, Debug, Default, Eq, PartialEq)]
pub struct KonamiState {
    pub forward_step: u8,
    pub reverse_step: u8,
    pub elapsed_ticks: u16,
}

impl KonamiState {
    pub const fn is_clear(self) -> bool {
        self.forward_step == 0 && self.reverse_step == 0
    }
}

#[derive(Clone, Copy, Debug, Eq, PartialEq)]
enum Path {
    Forward,
    Reverse,
}

impl Path {
    const fn sequence(self) -> &'static [Symbol; 11] {
        match self {
            Self::Forward => &FORWARD_SEQUENCE,
            Self::Reverse => &REVERSE_SEQUENCE,
        }
    }

    const fn completion(self) -> PatternSignal {
        match self {
            Self::Forward => PatternSignal::ForwardComplete,
            Self::Reverse => PatternSignal::ReverseComplete,
        }
    }
}

#[derive(Clone, Copy, Debug)]
struct KonamiEvent {
    symbol: Option<Symbol>,
}

#[derive(Default)]
struct DispatchContext {
    signal: PatternSignal,
}

pub struct KonamiEngine {
    machine: statig::blocking::StateMachine<KonamiMachine>,
}

impl Default for KonamiEngine {
    fn default() -> Self {
        Self::new(active_config())
    }
}

impl KonamiEngine {
    pub fn new(config: &'static ControllerConfig) -> Self {
        Self {
            machine: KonamiMachine::new(config).state_machine(),
        }
    }

    pub fn check_sequence(&mut self, direction: Direction, button: ButtonEvent) -> PatternSignal {
        let event = KonamiEvent {
            symbol: Symbol::from_events(direction, button),
        };
        let mut context = DispatchContext::default();
        self.machine.handle_with_context(&event, &mut context);
        context.signal
    }

    pub fn state(&self) -> KonamiState {
        self.machine.inner().progress
    }

    pub fn reset(&mut self) {
        let config = self.machine.inner().config;
        *self = Self::new(config);
    }
}

struct KonamiMachine {
    config: &'static ControllerConfig,
    progress: KonamiState,
}

impl KonamiMachine {
    fn new(config: &'static ControllerConfig) -> Self {
        Self {
            config,
            progress: KonamiState::default(),
        }
    }

    fn clear(&mut self) {
        self.progress = KonamiState::default();
    }

    /// Ages the shared timer and clears stale progress.
    fn expire(&mut self) -> bool {
        self.progress.elapsed_ticks = self.progress.elapsed_ticks.saturating_add(1);
        if self.progress.is_clear()
            || self.progress.elapsed_ticks <= self.config.konami.timeout_ticks
        {
            return false;
        }
        log::debug!(
            "konami: progress expired forward={} reverse={} elapsed={}",
            self.progress.forward_step,
            self.progress.reverse_step,
            self.progress.elapsed_ticks
        );
        self.clear();
        true
    }

    fn step_mut(&mut self, path: Path) -> &mut u8 {
        match path {
            Path::Forward => &mut self.progress.forward_step,
            Path::Reverse => &mut self.progress.reverse_step,
        }
    }

    fn start(&mut self, context: &mut DispatchContext, symbol: Option<Symbol>) -> Outcome<State> {
        match symbol {
            Some(symbol) if symbol == FORWARD_SEQUENCE[0] => {
                self.advance(context, Path::Forward, symbol)
            }
            Some(symbol) if symbol == REVERSE_SEQUENCE[0] => {
                self.advance(context, Path::Reverse, symbol)
            }
            _ => Transition(State::idle()),
        }
    }

    fn advance(
        &mut self,
        context: &mut DispatchContext,
        path: Path,
        symbol: Symbol,
    ) -> Outcome<State> {
        let step = *self.step_mut(path);
        if path.sequence()[step as usize] != symbol {
            self.clear();
            return Transition(State::idle());
        }

        let step = step + 1;
        *self.step_mut(path) = step;
        self.progress.elapsed_ticks = 0;

        if step as usize == path.sequence().len() {
            log::info!("konami: {:?} sequence complete", path);
            self.clear();
            context.signal = path.completion();
            return Transition(State::idle());
        }

        if PARTIAL_STEPS.contains(&step) {
            context.signal = PatternSignal::PartialMatch;
        }
        match path {
            Path::Forward => Transition(State::forward()),
            Path::Reverse => Transition(State::reverse()),
        }
    }

    fn track(
        &mut self,
        context: &mut DispatchContext,
        path: Path,
        event: &KonamiEvent,
    ) -> Outcome<State> {
        if self.expire() {
            return self.start(context, event.symbol);
        }
        match event.symbol {
            Some(symbol) => self.advance(context, path, symbol),
            None => Handled,
        }
    }
}

#[state_machine(initial = "State::idle()")]
impl KonamiMachine {
    #[state]
    fn idle(&mut self, context: &mut DispatchContext, event: &KonamiEvent) -> Outcome<State> {
        self.expire();
        match event.symbol {
            Some(_) => self.start(context, event.symbol),
            None => Handled,
        }
    }

    #[state]
    fn forward(&mut self, context: &mut DispatchContext, event: &KonamiEvent) -> Outcome<State> {
        self.track(context, Path::Forward, event)
    }

    #[state]
    fn reverse(&mut self, context: &mut DispatchContext, event: &KonamiEvent) -> Outcome<State> {
        self.track(context, Path::Reverse, event)
    }
}
