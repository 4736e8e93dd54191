#![cfg_attr(not(test), no_std)]

pub mod config;
pub mod controller;
pub mod input;
pub mod konami;
pub mod led;
pub mod link;
pub mod mode;
pub mod motion;
pub mod protocol;

pub use config::{active_config, ControllerConfig};
pub use controller::{
    Controller, ControllerIo, Directive, Health, MotionSample, SensorFault, TickReport,
};
pub use mode::Mode;
