// @generated by controller_config_compiler from config/controller.toml
pub const CONTROLLER_CONFIG: ControllerConfig = ControllerConfig {
    tick: TickConfig {
        period_ms: 5,
    },
    stick: StickConfig {
        x_center: 1900,
        y_center: 7150,
        full_scale: 4095,
        tolerance_percent: 90,
        swap_axes: false,
        invert_x: false,
        invert_y: false,
    },
    debounce: DebounceConfig {
        direction_ticks: 4,
        button_ticks: 4,
        long_hold_ticks: 300,
        repeat_ticks: 30,
        ps2_long_press_ticks: 200,
    },
    konami: KonamiConfig {
        timeout_ticks: 300,
    },
    led: LedConfig {
        morse_unit_ticks: 113,
        flash_ticks: 20,
        party_cycle_ticks: 10,
    },
    telemetry: TelemetryConfig {
        udp_port: 6454,
        joystick_interval_ticks: 30,
        motion_interval_ticks: 30,
    },
};
