use statig::{blocking::IntoStateMachineExt as _, prelude::*};

use crate::konami::PatternSignal;

#[derive(Clone, Copy, Debug, Default, Eq, PartialEq)]
#[repr(u8)]
pub enum Mode {
    Chase = 0,
    #[default]
    Idle = 1,
    LightSelection = 2,
    ControlSelection = 3,
    ColorWheel = 4,
    Dmx = 5,
    Preset = 6,
    Party = 7,
    Scary = 8,
}

impl Mode {
    pub const ALL: [Self; 9] = [
        Self::Chase,
        Self::Idle,
        Self::LightSelection,
        Self::ControlSelection,
        Self::ColorWheel,
        Self::Dmx,
        Self::Preset,
        Self::Party,
        Self::Scary,
    ];

    pub const fn from_wire(value: u8) -> Option<Self> {
        match value {
            0 => Some(Self::Chase),
            1 => Some(Self::Idle),
            2 => Some(Self::LightSelection),
            3 => Some(Self::ControlSelection),
            4 => Some(Self::ColorWheel),
            5 => Some(Self::Dmx),
            6 => Some(Self::Preset),
            7 => Some(Self::Party),
            8 => Some(Self::Scary),
            _ => None,
        }
    }

    pub const fn as_wire(self) -> u8 {
        self as u8
    }

    /// Whether a held direction re-fires after the long-hold duration.
    pub const fn continuous_read(self) -> bool {
        matches!(self, Self::Chase | Self::Dmx)
    }

    pub const fn as_str(self) -> &'static str {
        match self {
            Self::Chase => "chase",
            Self::Idle => "idle",
            Self::LightSelection => "light_selection",
            Self::ControlSelection => "control_selection",
            Self::ColorWheel => "color_wheel",
            Self::Dmx => "dmx",
            Self::Preset => "preset",
            Self::Party => "party",
            Self::Scary => "scary",
        }
    }
}

#[derive(Clone, Copy, Debug, Eq, PartialEq)]
pub enum ModeEvent {
    /// Local pattern completion. Only honored while idle.
    Pattern(PatternSignal),
    /// Mode field of a received Command or Poll packet.
    Remote(Mode),
}

#[derive(Clone, Copy, Debug, Eq, PartialEq)]
pub enum ModeApplyStatus {
    Applied,
    Unchanged,
    InvalidTransition,
}

#[derive(Clone, Copy, Debug, Eq, PartialEq)]
pub struct ModeApplyResult {
    pub before: Mode,
    pub after: Mode,
    pub status: ModeApplyStatus,
}

impl ModeApplyResult {
    pub fn changed(self) -> bool {
        matches!(self.status, ModeApplyStatus::Applied)
    }
}

struct DispatchContext {
    status: ModeApplyStatus,
}

impl Default for DispatchContext {
    fn default() -> Self {
        Self {
            status: ModeApplyStatus::Unchanged,
        }
    }
}

pub struct ModeEngine {
    machine: statig::blocking::StateMachine<ModeMachine>,
}

impl Default for ModeEngine {
    fn default() -> Self {
        Self::new()
    }
}

impl ModeEngine {
    pub fn new() -> Self {
        Self {
            machine: ModeMachine { mode: Mode::Idle }.state_machine(),
        }
    }

    pub fn mode(&self) -> Mode {
        self.machine.inner().mode
    }

    pub fn apply(&mut self, event: ModeEvent) -> ModeApplyResult {
        let before = self.mode();
        let mut context = DispatchContext::default();
        self.machine.handle_with_context(&event, &mut context);
        let after = self.mode();
        ModeApplyResult {
            before,
            after,
            status: context.status,
        }
    }
}

struct ModeMachine {
    mode: Mode,
}

impl ModeMachine {
    fn enter(&mut self, context: &mut DispatchContext, mode: Mode) -> Outcome<State> {
        context.status = if self.mode == mode {
            ModeApplyStatus::Unchanged
        } else {
            ModeApplyStatus::Applied
        };
        self.mode = mode;
        if matches!(mode, Mode::Idle) {
            Transition(State::idle())
        } else {
            Transition(State::engaged())
        }
    }
}

#[state_machine(initial = "State::idle()")]
impl ModeMachine {
    #[state(superstate = "remote_controlled")]
    fn idle(&mut self, context: &mut DispatchContext, event: &ModeEvent) -> Outcome<State> {
        match event {
            ModeEvent::Pattern(PatternSignal::ForwardComplete) => {
                self.enter(context, Mode::Party)
            }
            ModeEvent::Pattern(PatternSignal::ReverseComplete) => {
                self.enter(context, Mode::Scary)
            }
            ModeEvent::Pattern(_) => Handled,
            ModeEvent::Remote(_) => Super,
        }
    }

    /// Every mode other than idle.
    #[state(superstate = "remote_controlled")]
    fn engaged(&mut self, context: &mut DispatchContext, event: &ModeEvent) -> Outcome<State> {
        match event {
            ModeEvent::Pattern(signal) if signal.is_complete() => {
                context.status = ModeApplyStatus::InvalidTransition;
                Handled
            }
            ModeEvent::Pattern(_) => Handled,
            ModeEvent::Remote(_) => Super,
        }
    }

    #[superstate]
    fn remote_controlled(
        &mut self,
        context: &mut DispatchContext,
        event: &ModeEvent,
    ) -> Outcome<State> {
        match event {
            ModeEvent::Remote(mode) => self.enter(context, *mode),
            ModeEvent::Pattern(_) => Handled,
        }
    }
}
