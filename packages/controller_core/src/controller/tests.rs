use super::*;
use crate::config::CONTROLLER_CONFIG;
use crate::konami::{Symbol, FORWARD_SEQUENCE, REVERSE_SEQUENCE};

const CENTER: StickSample = StickSample {
    raw_x: 1900,
    raw_y: 1900,
};

struct FakeIo {
    stick: StickSample,
    buttons: ButtonLevels,
    motion: Result<MotionSample, SensorFault>,
    led: Vec<Rgb>,
}

impl Default for FakeIo {
    fn default() -> Self {
        Self {
            stick: CENTER,
            buttons: ButtonLevels::default(),
            motion: Ok(MotionSample { x: 10, y: -20, z: 30 }),
            led: Vec::new(),
        }
    }
}

impl ControllerIo for FakeIo {
    fn read_stick(&mut self) -> StickSample {
        self.stick
    }

    fn read_buttons(&mut self) -> ButtonLevels {
        self.buttons
    }

    fn read_motion(&mut self) -> Result<MotionSample, SensorFault> {
        self.motion
    }

    fn set_led(&mut self, color: Rgb) {
        self.led.push(color);
    }
}

fn run(controller: &mut Controller, io: &mut FakeIo, ticks: u32) -> Vec<TelemetryPacket> {
    let mut sent = Vec::new();
    for _ in 0..ticks {
        let report = controller.tick(io);
        sent.extend(report.telemetry.iter().copied());
    }
    sent
}

fn connected() -> Controller {
    let mut controller = Controller::default();
    controller.apply_remote(Directive::LinkEstablished);
    controller
}

fn stick_for(direction: Direction) -> StickSample {
    match direction {
        Direction::Up => StickSample {
            raw_x: 1900,
            raw_y: 4095,
        },
        Direction::Down => StickSample {
            raw_x: 1900,
            raw_y: 0,
        },
        Direction::Left => StickSample {
            raw_x: 0,
            raw_y: 1900,
        },
        Direction::Right => StickSample {
            raw_x: 4095,
            raw_y: 1900,
        },
        Direction::Center => CENTER,
    }
}

/// Presses and releases one symbol, returning everything emitted.
fn enter(controller: &mut Controller, io: &mut FakeIo, symbol: Symbol) -> Vec<TelemetryPacket> {
    let mut sent = Vec::new();
    match symbol {
        Symbol::Up | Symbol::Down | Symbol::Left | Symbol::Right => {
            let direction = match symbol {
                Symbol::Up => Direction::Up,
                Symbol::Down => Direction::Down,
                Symbol::Left => Direction::Left,
                _ => Direction::Right,
            };
            io.stick = stick_for(direction);
            sent.extend(run(controller, io, 6));
            io.stick = CENTER;
            sent.extend(run(controller, io, 2));
        }
        Symbol::B1 | Symbol::B2 | Symbol::Ps2 | Symbol::Chord => {
            io.buttons = ButtonLevels {
                b1: matches!(symbol, Symbol::B1 | Symbol::Chord),
                b2: matches!(symbol, Symbol::B2 | Symbol::Chord),
                ps2: matches!(symbol, Symbol::Ps2),
            };
            sent.extend(run(controller, io, 6));
            io.buttons = ButtonLevels::default();
            sent.extend(run(controller, io, 6));
        }
    }
    sent
}

fn user_action(mode: Mode, action: UserAction) -> TelemetryPacket {
    TelemetryPacket {
        mode,
        payload: DataPayload::UserAction(action),
    }
}

#[test]
fn idle_direction_emits_one_user_action() {
    let mut controller = connected();
    let mut io = FakeIo::default();
    io.stick = stick_for(Direction::Left);
    let sent = run(&mut controller, &mut io, 100);
    assert_eq!(sent, vec![user_action(Mode::Idle, UserAction::Left)]);
}

#[test]
fn button_event_emits_when_no_direction() {
    let mut controller = connected();
    let mut io = FakeIo::default();
    let sent = enter(&mut controller, &mut io, Symbol::B2);
    assert_eq!(sent, vec![user_action(Mode::Idle, UserAction::B2)]);
}

#[test]
fn forward_konami_enters_party_and_reports_it() {
    let mut controller = connected();
    let mut io = FakeIo::default();
    let mut sent = Vec::new();
    for symbol in FORWARD_SEQUENCE {
        sent.extend(enter(&mut controller, &mut io, symbol));
    }

    assert_eq!(controller.mode(), Mode::Party);
    // Steps seven and eight are swallowed; the last step becomes the Konami code.
    let actions: Vec<_> = sent
        .iter()
        .map(|packet| match packet.payload {
            DataPayload::UserAction(action) => action,
            other => panic!("unexpected payload {other:?}"),
        })
        .collect();
    assert_eq!(
        actions,
        vec![
            UserAction::Up,
            UserAction::Up,
            UserAction::Down,
            UserAction::Down,
            UserAction::Left,
            UserAction::Right,
            UserAction::B2,
            UserAction::B1,
            UserAction::Konami,
        ]
    );
    assert_eq!(sent.last().map(|p| p.mode), Some(Mode::Party));
}

#[test]
fn reverse_konami_enters_scary() {
    let mut controller = connected();
    let mut io = FakeIo::default();
    let mut last = None;
    for symbol in REVERSE_SEQUENCE {
        last = enter(&mut controller, &mut io, symbol).last().copied();
    }
    assert_eq!(controller.mode(), Mode::Scary);
    assert_eq!(last, Some(user_action(Mode::Scary, UserAction::ReverseKonami)));
}

#[test]
fn konami_is_ignored_outside_idle() {
    let mut controller = connected();
    controller.apply_remote(Directive::SetMode(Mode::LightSelection));
    let mut io = FakeIo::default();
    for symbol in FORWARD_SEQUENCE {
        enter(&mut controller, &mut io, symbol);
    }
    assert_eq!(controller.mode(), Mode::LightSelection);
    assert!(controller.konami_state().is_clear());
}

#[test]
fn remote_mode_change_clears_pattern_progress() {
    let mut controller = connected();
    let mut io = FakeIo::default();
    for symbol in &FORWARD_SEQUENCE[..5] {
        enter(&mut controller, &mut io, *symbol);
    }
    assert_eq!(controller.konami_state().forward_step, 5);

    let result = controller
        .apply_remote(Directive::SetMode(Mode::Chase))
        .expect("mode directive reports a result");
    assert!(result.changed());
    controller.apply_remote(Directive::SetMode(Mode::Idle));
    assert!(controller.konami_state().is_clear());
}

#[test]
fn color_wheel_reports_joystick_on_its_cadence() {
    let mut controller = connected();
    controller.apply_remote(Directive::SetMode(Mode::ColorWheel));
    let mut io = FakeIo::default();
    io.stick = StickSample {
        raw_x: 2500,
        raw_y: 1200,
    };

    let interval = u32::from(CONTROLLER_CONFIG.telemetry.joystick_interval_ticks);
    let sent = run(&mut controller, &mut io, interval * 3);
    assert_eq!(sent.len(), 3);
    assert!(sent.iter().all(|packet| packet
        == &TelemetryPacket {
            mode: Mode::ColorWheel,
            payload: DataPayload::Joystick { x: 2500, y: 1200 },
        }));
}

#[test]
fn party_cycles_led_and_samples_motion() {
    let mut controller = connected();
    controller.apply_remote(Directive::SetMode(Mode::Party));
    let mut io = FakeIo::default();

    let cycle = u32::from(CONTROLLER_CONFIG.led.party_cycle_ticks);
    let interval = u32::from(CONTROLLER_CONFIG.telemetry.motion_interval_ticks);
    let sent = run(&mut controller, &mut io, cycle * 4);

    assert_eq!(io.led, vec![Rgb::RED, Rgb::GREEN, Rgb::BLUE, Rgb::OFF, Rgb::RED]);
    assert_eq!(sent.len() as u32, cycle * 4 / interval);
    assert_eq!(
        sent[0].payload,
        DataPayload::Gyro {
            x: 10,
            y: -20,
            z: 30
        }
    );
}

#[test]
fn scary_samples_motion_without_cycling() {
    let mut controller = connected();
    controller.apply_remote(Directive::SetMode(Mode::Scary));
    let mut io = FakeIo::default();
    let interval = u32::from(CONTROLLER_CONFIG.telemetry.motion_interval_ticks);
    let sent = run(&mut controller, &mut io, interval * 2);
    assert_eq!(sent.len(), 2);
    assert_eq!(io.led, vec![Rgb::OFF]);
}

#[test]
fn motion_fault_skips_the_sample_and_is_reported() {
    let mut controller = connected();
    controller.apply_remote(Directive::SetMode(Mode::Scary));
    let mut io = FakeIo {
        motion: Err(SensorFault::Bus),
        ..FakeIo::default()
    };
    let interval = u32::from(CONTROLLER_CONFIG.telemetry.motion_interval_ticks);
    let sent = run(&mut controller, &mut io, interval);
    assert!(sent.is_empty());
    assert_eq!(controller.health().motion_faults, 1);
    assert_eq!(controller.health().error_code(), 1);

    io.motion = Ok(MotionSample::default());
    run(&mut controller, &mut io, interval);
    assert_eq!(controller.health().error_code(), 0);
    assert_eq!(controller.health().message(), "ok");
}

#[test]
fn boot_fault_reports_until_a_read_succeeds() {
    let mut controller = connected();
    controller.record_boot_fault(SensorFault::NotResponding);
    let mut io = FakeIo::default();
    run(&mut controller, &mut io, 50);
    assert_eq!(controller.health().error_code(), 1);
    assert_eq!(controller.health().message(), "motion_fault");
    assert_eq!(controller.health().motion_faults, 1);

    controller.apply_remote(Directive::SetMode(Mode::Scary));
    let interval = u32::from(CONTROLLER_CONFIG.telemetry.motion_interval_ticks);
    run(&mut controller, &mut io, interval);
    assert_eq!(controller.health().error_code(), 0);
}

#[test]
fn motion_samples_report_shake_magnitude() {
    let mut controller = connected();
    controller.apply_remote(Directive::SetMode(Mode::Scary));
    let mut io = FakeIo::default();
    let interval = CONTROLLER_CONFIG.telemetry.motion_interval_ticks;

    let mut magnitudes = Vec::new();
    for _ in 0..interval * 2 {
        let report = controller.tick(&mut io);
        magnitudes.extend(report.motion_magnitude);
    }
    // 10, -20, 30 against an empty window, then against an average of 0, -1, 2.
    assert_eq!(magnitudes, vec![60, 57]);
}

#[test]
fn chase_flashes_direction_color_then_restores_mode_color() {
    let mut controller = connected();
    controller.apply_remote(Directive::SetMode(Mode::Chase));
    let mut io = FakeIo::default();
    run(&mut controller, &mut io, 1);
    assert_eq!(io.led, vec![Rgb::BLUE]);

    io.stick = stick_for(Direction::Right);
    let flash = u32::from(CONTROLLER_CONFIG.led.flash_ticks);
    let sent = run(&mut controller, &mut io, 4);
    assert_eq!(sent, vec![user_action(Mode::Chase, UserAction::Right)]);
    io.stick = CENTER;
    run(&mut controller, &mut io, flash);
    assert_eq!(io.led, vec![Rgb::BLUE, Rgb::RED, Rgb::BLUE]);
}

#[test]
fn chase_repeats_held_direction() {
    let mut controller = connected();
    controller.apply_remote(Directive::SetMode(Mode::Chase));
    let mut io = FakeIo::default();
    io.stick = stick_for(Direction::Up);
    let debounce = CONTROLLER_CONFIG.debounce;
    let ticks = u32::from(debounce.long_hold_ticks) + 2 * u32::from(debounce.repeat_ticks) + 1;
    let sent = run(&mut controller, &mut io, ticks);
    assert_eq!(sent.len(), 3);
}

#[test]
fn led_animates_until_the_base_station_links() {
    let mut controller = Controller::default();
    let mut io = FakeIo::default();
    run(&mut controller, &mut io, 1);
    assert_eq!(io.led, vec![Rgb::WHITE]);

    controller.apply_remote(Directive::LinkEstablished);
    run(&mut controller, &mut io, 1);
    assert_eq!(io.led.last(), Some(&mode_color(Mode::Idle)));
}

#[test]
fn remote_mode_refreshes_led() {
    let mut controller = connected();
    let mut io = FakeIo::default();
    run(&mut controller, &mut io, 1);
    controller.apply_remote(Directive::SetMode(Mode::Dmx));
    run(&mut controller, &mut io, 1);
    assert_eq!(io.led, vec![Rgb::GREEN, Rgb::YELLOW]);
}

#[test]
fn same_mode_directive_is_unchanged() {
    let mut controller = connected();
    let result = controller
        .apply_remote(Directive::SetMode(Mode::Idle))
        .expect("mode directive reports a result");
    assert!(!result.changed());
}
