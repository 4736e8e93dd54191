use crate::config::{active_config, ControllerConfig};
use crate::input::{
    ButtonDebouncer, ButtonEvent, ButtonLevels, Direction, DirectionDebouncer, StickSample,
};
use crate::konami::{KonamiEngine, KonamiState, PatternSignal};
use crate::led::{mode_color, MorseAnimator, Rgb, PARTY_CYCLE};
use crate::mode::{Mode, ModeApplyResult, ModeEngine, ModeEvent};
pub use crate::motion::MotionSample;
use crate::motion::MotionFilter;
use crate::protocol::{DataPayload, TelemetryPacket, UserAction};

#[derive(Clone, Copy, Debug, Eq, PartialEq)]
pub enum SensorFault {
    Bus,
    NotResponding,
}

impl SensorFault {
    pub const fn as_str(self) -> &'static str {
        match self {
            Self::Bus => "bus",
            Self::NotResponding => "not_responding",
        }
    }
}

/// Hardware seen by the tick loop. Every call is one bounded transaction.
pub trait ControllerIo {
    fn read_stick(&mut self) -> StickSample;
    fn read_buttons(&mut self) -> ButtonLevels;
    fn read_motion(&mut self) -> Result<MotionSample, SensorFault>;
    fn set_led(&mut self, color: Rgb);
}

/// Requests from the network side, applied between ticks.
#[derive(Clone, Copy, Debug, Eq, PartialEq)]
pub enum Directive {
    SetMode(Mode),
    LinkEstablished,
}

#[derive(Clone, Copy, Debug)]
pub struct TelemetryBuffer {
    len: usize,
    slots: [Option<TelemetryPacket>; Self::MAX],
}

impl TelemetryBuffer {
    pub const MAX: usize = 4;

    pub const fn new() -> Self {
        Self {
            len: 0,
            slots: [None; Self::MAX],
        }
    }

    pub fn push(&mut self, packet: TelemetryPacket) {
        if self.len >= Self::MAX {
            return;
        }
        self.slots[self.len] = Some(packet);
        self.len += 1;
    }

    pub fn len(&self) -> usize {
        self.len
    }

    pub fn is_empty(&self) -> bool {
        self.len == 0
    }

    pub fn iter(&self) -> impl Iterator<Item = &TelemetryPacket> {
        self.slots[..self.len].iter().filter_map(Option::as_ref)
    }
}

impl Default for TelemetryBuffer {
    fn default() -> Self {
        Self::new()
    }
}

#[derive(Clone, Copy, Debug, Default)]
pub struct TickReport {
    pub direction: Direction,
    pub button: ButtonEvent,
    pub pattern: PatternSignal,
    pub mode_change: Option<ModeApplyResult>,
    pub motion_fault: Option<SensorFault>,
    pub motion_magnitude: Option<u32>,
    pub telemetry: TelemetryBuffer,
}

#[derive(Clone, Copy, Debug, Default, Eq, PartialEq)]
pub struct Health {
    pub motion_faults: u32,
    pub last_motion_fault: Option<SensorFault>,
}

impl Health {
    /// Wire error code for PollReply.
    pub const fn error_code(self) -> u8 {
        match self.last_motion_fault {
            None => 0,
            Some(_) => 1,
        }
    }

    pub const fn message(self) -> &'static str {
        match self.last_motion_fault {
            None => "ok",
            Some(_) => "motion_fault",
        }
    }
}

/// Mode-local state. Cleared on every mode change.
#[derive(Clone, Copy, Debug, Default)]
struct ModeBody {
    flash: Option<(Rgb, u16)>,
    party_step: usize,
    party_timer: u16,
    joystick_timer: u16,
    motion_timer: u16,
}

const fn flash_color(direction: Direction) -> Option<Rgb> {
    match direction {
        Direction::Left => Some(Rgb::BLUE),
        Direction::Right => Some(Rgb::RED),
        Direction::Down => Some(Rgb::GREEN),
        Direction::Up => Some(Rgb::WHITE),
        Direction::Center => None,
    }
}

pub struct Controller {
    config: &'static ControllerConfig,
    mode: ModeEngine,
    direction: DirectionDebouncer,
    buttons: ButtonDebouncer,
    konami: KonamiEngine,
    animator: MorseAnimator,
    body: ModeBody,
    connected: bool,
    led: Option<Rgb>,
    health: Health,
    motion: MotionFilter,
}

impl Default for Controller {
    fn default() -> Self {
        Self::new(active_config())
    }
}

impl Controller {
    pub fn new(config: &'static ControllerConfig) -> Self {
        Self {
            config,
            mode: ModeEngine::new(),
            direction: DirectionDebouncer::new(config),
            buttons: ButtonDebouncer::new(config),
            konami: KonamiEngine::new(config),
            animator: MorseAnimator::new(config),
            body: ModeBody::default(),
            connected: false,
            led: None,
            health: Health::default(),
            motion: MotionFilter::new(),
        }
    }

    pub fn mode(&self) -> Mode {
        self.mode.mode()
    }

    pub fn is_connected(&self) -> bool {
        self.connected
    }

    pub fn health(&self) -> Health {
        self.health
    }

    /// Marks the motion sensor faulty until a later read succeeds.
    pub fn record_boot_fault(&mut self, fault: SensorFault) {
        log::warn!("controller: motion sensor absent at boot fault={}", fault.as_str());
        self.record_motion_fault(fault);
    }

    pub fn konami_state(&self) -> KonamiState {
        self.konami.state()
    }

    pub fn apply_remote(&mut self, directive: Directive) -> Option<ModeApplyResult> {
        match directive {
            Directive::SetMode(mode) => {
                let result = self.mode.apply(ModeEvent::Remote(mode));
                if result.changed() {
                    log::info!(
                        "controller: remote mode {} -> {}",
                        result.before.as_str(),
                        result.after.as_str()
                    );
                    self.on_mode_changed();
                }
                Some(result)
            }
            Directive::LinkEstablished => {
                if !self.connected {
                    log::info!("controller: base station linked");
                    self.connected = true;
                    self.body.flash = None;
                    self.led = None;
                }
                None
            }
        }
    }

    pub fn tick<IO: ControllerIo>(&mut self, io: &mut IO) -> TickReport {
        let mode = self.mode.mode();
        let stick = io.read_stick();
        let direction = self
            .direction
            .read_direction(stick, mode.continuous_read());
        let button = self.buttons.read_buttons(io.read_buttons());

        let mut report = TickReport {
            direction,
            button,
            ..TickReport::default()
        };

        if matches!(mode, Mode::Idle) && self.run_pattern(direction, button, &mut report) {
            self.refresh_led(io);
            return report;
        }

        self.run_mode_body(mode, stick, direction, io, &mut report);

        if let Some(action) = UserAction::from_events(direction, button) {
            report.telemetry.push(TelemetryPacket {
                mode,
                payload: DataPayload::UserAction(action),
            });
        }

        self.refresh_led(io);
        report
    }

    /// Returns `true` when the pattern matcher consumed the tick.
    fn run_pattern(
        &mut self,
        direction: Direction,
        button: ButtonEvent,
        report: &mut TickReport,
    ) -> bool {
        let signal = self.konami.check_sequence(direction, button);
        report.pattern = signal;

        let action = match signal {
            PatternSignal::None => return false,
            PatternSignal::PartialMatch => return true,
            PatternSignal::ForwardComplete => UserAction::Konami,
            PatternSignal::ReverseComplete => UserAction::ReverseKonami,
        };

        let result = self.mode.apply(ModeEvent::Pattern(signal));
        report.mode_change = Some(result);
        if result.changed() {
            log::info!(
                "controller: pattern mode {} -> {}",
                result.before.as_str(),
                result.after.as_str()
            );
            self.on_mode_changed();
        }
        report.telemetry.push(TelemetryPacket {
            mode: result.after,
            payload: DataPayload::UserAction(action),
        });
        true
    }

    fn run_mode_body<IO: ControllerIo>(
        &mut self,
        mode: Mode,
        stick: StickSample,
        direction: Direction,
        io: &mut IO,
        report: &mut TickReport,
    ) {
        match mode {
            Mode::Chase | Mode::Dmx => {
                if let Some(color) = flash_color(direction) {
                    self.body.flash = Some((color, self.config.led.flash_ticks));
                }
            }
            Mode::ColorWheel => {
                if due(
                    &mut self.body.joystick_timer,
                    self.config.telemetry.joystick_interval_ticks,
                ) {
                    report.telemetry.push(TelemetryPacket {
                        mode,
                        payload: DataPayload::Joystick {
                            x: i32::from(stick.raw_x),
                            y: i32::from(stick.raw_y),
                        },
                    });
                }
            }
            Mode::Party => {
                if due(
                    &mut self.body.party_timer,
                    self.config.led.party_cycle_ticks,
                ) {
                    self.body.party_step = (self.body.party_step + 1) % PARTY_CYCLE.len();
                }
                self.sample_motion(mode, io, report);
            }
            Mode::Scary => self.sample_motion(mode, io, report),
            Mode::Idle | Mode::LightSelection | Mode::ControlSelection | Mode::Preset => {}
        }
    }

    fn sample_motion<IO: ControllerIo>(&mut self, mode: Mode, io: &mut IO, report: &mut TickReport) {
        if !due(
            &mut self.body.motion_timer,
            self.config.telemetry.motion_interval_ticks,
        ) {
            return;
        }

        match io.read_motion() {
            Ok(sample) => {
                self.health.last_motion_fault = None;
                let magnitude = self.motion.magnitude(sample);
                log::debug!("controller: motion magnitude={}", magnitude);
                report.motion_magnitude = Some(magnitude);
                report.telemetry.push(TelemetryPacket {
                    mode,
                    payload: DataPayload::Gyro {
                        x: i32::from(sample.x),
                        y: i32::from(sample.y),
                        z: i32::from(sample.z),
                    },
                });
            }
            Err(fault) => {
                log::warn!("controller: motion read failed fault={}", fault.as_str());
                self.record_motion_fault(fault);
                report.motion_fault = Some(fault);
            }
        }
    }

    fn record_motion_fault(&mut self, fault: SensorFault) {
        self.health.motion_faults = self.health.motion_faults.wrapping_add(1);
        self.health.last_motion_fault = Some(fault);
    }

    fn on_mode_changed(&mut self) {
        self.body = ModeBody::default();
        self.konami.reset();
        self.direction.reset();
        self.led = None;
    }

    fn refresh_led<IO: ControllerIo>(&mut self, io: &mut IO) {
        if !self.connected {
            if let Some(color) = self.animator.tick() {
                self.drive_led(io, color);
            }
            return;
        }
        let color = self.steady_color();
        self.drive_led(io, color);
    }

    fn steady_color(&mut self) -> Rgb {
        if let Some((color, remaining)) = self.body.flash {
            self.body.flash = match remaining.saturating_sub(1) {
                0 => None,
                left => Some((color, left)),
            };
            return color;
        }
        match self.mode.mode() {
            Mode::Party => PARTY_CYCLE[self.body.party_step],
            mode => mode_color(mode),
        }
    }

    fn drive_led<IO: ControllerIo>(&mut self, io: &mut IO, color: Rgb) {
        if self.led != Some(color) {
            io.set_led(color);
            self.led = Some(color);
        }
    }
}

/// Counts one tick on `timer` and reports when `interval` has elapsed.
fn due(timer: &mut u16, interval: u16) -> bool {
    *timer = timer.saturating_add(1);
    if *timer >= interval {
        *timer = 0;
        true
    } else {
        false
    }
}

#[cfg(test)]
mod tests;
