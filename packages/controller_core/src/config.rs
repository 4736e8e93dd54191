#[derive(Clone, Copy, Debug)]
pub struct TickConfig {
    pub period_ms: u32,
}

/// Raw ADC calibration for the two stick axes plus the wiring map from
/// physical axes to logical directions.
#[derive(Clone, Copy, Debug)]
pub struct StickConfig {
    pub x_center: u16,
    pub y_center: u16,
    pub full_scale: u16,
    pub tolerance_percent: u8,
    pub swap_axes: bool,
    pub invert_x: bool,
    pub invert_y: bool,
}

impl StickConfig {
    /// Readings below this are a negative deflection.
    pub const fn negative_threshold(self, center: u16) -> u16 {
        ((center as u32 * (100 - self.tolerance_percent as u32)) / 100) as u16
    }

    /// Readings above this are a positive deflection.
    pub const fn positive_threshold(self) -> u16 {
        ((self.full_scale as u32 * self.tolerance_percent as u32) / 100) as u16
    }
}

#[derive(Clone, Copy, Debug)]
pub struct DebounceConfig {
    pub direction_ticks: u16,
    pub button_ticks: u16,
    pub long_hold_ticks: u16,
    pub repeat_ticks: u16,
    pub ps2_long_press_ticks: u16,
}

#[derive(Clone, Copy, Debug)]
pub struct KonamiConfig {
    pub timeout_ticks: u16,
}

#[derive(Clone, Copy, Debug)]
pub struct LedConfig {
    pub morse_unit_ticks: u16,
    pub flash_ticks: u16,
    pub party_cycle_ticks: u16,
}

#[derive(Clone, Copy, Debug)]
pub struct TelemetryConfig {
    pub udp_port: u16,
    pub joystick_interval_ticks: u16,
    pub motion_interval_ticks: u16,
}

#[derive(Clone, Copy, Debug)]
pub struct ControllerConfig {
    pub tick: TickConfig,
    pub stick: StickConfig,
    pub debounce: DebounceConfig,
    pub konami: KonamiConfig,
    pub led: LedConfig,
    pub telemetry: TelemetryConfig,
}

include!(concat!(env!("OUT_DIR"), "/controller_config.rs"));

pub fn active_config() -> &'static ControllerConfig {
    &CONTROLLER_CONFIG
}
