//! Datagram framing shared with the base station.
//!
//! Every packet starts with a 10-byte header: the 8-byte [`IDENTIFIER`], a
//! packet type tag and the sender's current mode. Multi-byte fields are
//! little-endian.
//!
//! | tag    | packet    | payload                                               |
//! |--------|-----------|-------------------------------------------------------|
//! | `0x33` | Data      | kind u8, user action u8, joystick 2×i32, gyro 3×i32   |
//! | `0x36` | Command   | command u8                                            |
//! | `0x87` | Poll      | none                                                  |
//! | `0x1E` | PollReply | battery f32, error code u8, length u8, message bytes  |

use heapless::Vec;

use crate::input::{ButtonEvent, Direction};
use crate::mode::Mode;

pub const IDENTIFIER: [u8; 8] = [b'J', b'E', 0x10, b'M', b'K', 0x03, b'C', b'K'];
pub const HEADER_LEN: usize = 10;
pub const DATA_LEN: usize = 32;
pub const COMMAND_LEN: usize = 11;
pub const POLL_LEN: usize = HEADER_LEN;
pub const POLL_REPLY_FIXED_LEN: usize = 16;
pub const POLL_REPLY_MESSAGE_MAX: usize = 64;
pub const MAX_DATAGRAM_LEN: usize = POLL_REPLY_FIXED_LEN + POLL_REPLY_MESSAGE_MAX;

/// Battery level reported when no fuel gauge is fitted.
pub const BATTERY_UNKNOWN: f32 = -1.0;

pub type Datagram = Vec<u8, MAX_DATAGRAM_LEN>;
pub type StatusMessage = Vec<u8, POLL_REPLY_MESSAGE_MAX>;

#[derive(Clone, Copy, Debug, Eq, PartialEq)]
#[repr(u8)]
pub enum PacketType {
    Data = 0x33,
    Command = 0x36,
    Poll = 0x87,
    PollReply = 0x1E,
}

impl PacketType {
    pub const fn from_wire(value: u8) -> Option<Self> {
        match value {
            0x33 => Some(Self::Data),
            0x36 => Some(Self::Command),
            0x87 => Some(Self::Poll),
            0x1E => Some(Self::PollReply),
            _ => None,
        }
    }

    const fn min_len(self) -> usize {
        match self {
            Self::Data => DATA_LEN,
            Self::Command => COMMAND_LEN,
            Self::Poll => POLL_LEN,
            Self::PollReply => POLL_REPLY_FIXED_LEN,
        }
    }
}

const DATA_KIND_USER_ACTION: u8 = 0x13;
const DATA_KIND_JOYSTICK: u8 = 0x23;
const DATA_KIND_GYRO: u8 = 0x33;

/// Event codes carried by a UserAction data packet.
#[derive(Clone, Copy, Debug, Eq, PartialEq)]
#[repr(u8)]
pub enum UserAction {
    Ps2 = 0x01,
    B1 = 0x02,
    B2 = 0x03,
    B1B2 = 0x04,
    Up = 0x11,
    Down = 0x12,
    Left = 0x13,
    Right = 0x14,
    Konami = 0x31,
    ReverseKonami = 0x32,
    Ps2Long = 0x41,
}

impl UserAction {
    pub const fn from_wire(value: u8) -> Option<Self> {
        match value {
            0x01 => Some(Self::Ps2),
            0x02 => Some(Self::B1),
            0x03 => Some(Self::B2),
            0x04 => Some(Self::B1B2),
            0x11 => Some(Self::Up),
            0x12 => Some(Self::Down),
            0x13 => Some(Self::Left),
            0x14 => Some(Self::Right),
            0x31 => Some(Self::Konami),
            0x32 => Some(Self::ReverseKonami),
            0x41 => Some(Self::Ps2Long),
            _ => None,
        }
    }

    /// Direction first, then button.
    pub const fn from_events(direction: Direction, button: ButtonEvent) -> Option<Self> {
        match direction {
            Direction::Up => Some(Self::Up),
            Direction::Down => Some(Self::Down),
            Direction::Left => Some(Self::Left),
            Direction::Right => Some(Self::Right),
            Direction::Center => match button {
                ButtonEvent::None => None,
                ButtonEvent::B1 => Some(Self::B1),
                ButtonEvent::B2 => Some(Self::B2),
                ButtonEvent::B1B2 => Some(Self::B1B2),
                ButtonEvent::Ps2Short => Some(Self::Ps2),
                ButtonEvent::Ps2Long => Some(Self::Ps2Long),
            },
        }
    }
}

#[derive(Clone, Copy, Debug, Eq, PartialEq)]
pub enum RemoteCommand {
    Noop,
    HardReset,
    SoftReset,
    Unknown(u8),
}

impl RemoteCommand {
    pub const fn from_wire(value: u8) -> Self {
        match value {
            0x00 => Self::Noop,
            0x99 => Self::HardReset,
            0x39 => Self::SoftReset,
            other => Self::Unknown(other),
        }
    }

    pub const fn as_wire(self) -> u8 {
        match self {
            Self::Noop => 0x00,
            Self::HardReset => 0x99,
            Self::SoftReset => 0x39,
            Self::Unknown(other) => other,
        }
    }

    pub const fn is_reset(self) -> bool {
        matches!(self, Self::HardReset | Self::SoftReset)
    }
}

#[derive(Clone, Copy, Debug, Eq, PartialEq)]
pub enum DataPayload {
    UserAction(UserAction),
    Joystick { x: i32, y: i32 },
    Gyro { x: i32, y: i32, z: i32 },
}

/// Outbound controller telemetry: a Data packet.
#[derive(Clone, Copy, Debug, Eq, PartialEq)]
pub struct TelemetryPacket {
    pub mode: Mode,
    pub payload: DataPayload,
}

#[derive(Clone, Debug, PartialEq)]
pub struct PollReply {
    pub battery: f32,
    pub error_code: u8,
    pub message: StatusMessage,
}

impl PollReply {
    /// Builds a reply, truncating `message` to the wire maximum.
    pub fn new(battery: f32, error_code: u8, message: &str) -> Self {
        let bytes = message.as_bytes();
        let len = bytes.len().min(POLL_REPLY_MESSAGE_MAX);
        let mut stored = StatusMessage::new();
        // `len` never exceeds the capacity.
        let _ = stored.extend_from_slice(&bytes[..len]);
        Self {
            battery,
            error_code,
            message: stored,
        }
    }
}

#[derive(Clone, Debug, PartialEq)]
pub enum Packet {
    Data(TelemetryPacket),
    Command { mode: Mode, command: RemoteCommand },
    Poll { mode: Mode },
    PollReply { mode: Mode, reply: PollReply },
}

#[derive(Clone, Copy, Debug, Eq, PartialEq)]
pub enum DecodeError {
    /// The first eight bytes are not [`IDENTIFIER`].
    ForeignIdentifier,
    Truncated { expected: usize, actual: usize },
    UnknownPacketType(u8),
    InvalidMode(u8),
    UnknownDataKind(u8),
    UnknownUserAction(u8),
    MessageTooLong(u8),
    /// Declared PollReply message length disagrees with the trailing bytes.
    LengthMismatch { declared: u8, actual: usize },
}

impl DecodeError {
    pub const fn as_str(self) -> &'static str {
        match self {
            Self::ForeignIdentifier => "foreign_identifier",
            Self::Truncated { .. } => "truncated",
            Self::UnknownPacketType(_) => "unknown_packet_type",
            Self::InvalidMode(_) => "invalid_mode",
            Self::UnknownDataKind(_) => "unknown_data_kind",
            Self::UnknownUserAction(_) => "unknown_user_action",
            Self::MessageTooLong(_) => "message_too_long",
            Self::LengthMismatch { .. } => "length_mismatch",
        }
    }
}

#[derive(Clone, Copy, Debug, Eq, PartialEq)]
pub enum EncodeError {
    BufferFull,
}

impl Packet {
    pub const fn packet_type(&self) -> PacketType {
        match self {
            Self::Data(_) => PacketType::Data,
            Self::Command { .. } => PacketType::Command,
            Self::Poll { .. } => PacketType::Poll,
            Self::PollReply { .. } => PacketType::PollReply,
        }
    }

    pub const fn mode(&self) -> Mode {
        match self {
            Self::Data(telemetry) => telemetry.mode,
            Self::Command { mode, .. } | Self::Poll { mode } | Self::PollReply { mode, .. } => {
                *mode
            }
        }
    }

    pub fn encode(&self) -> Result<Datagram, EncodeError> {
        let mut out = Writer::default();
        out.put(&IDENTIFIER)?;
        out.put(&[self.packet_type() as u8, self.mode().as_wire()])?;

        match self {
            Self::Data(telemetry) => encode_data(&mut out, telemetry.payload)?,
            Self::Command { command, .. } => out.put(&[command.as_wire()])?,
            Self::Poll { .. } => {}
            Self::PollReply { reply, .. } => {
                out.put(&reply.battery.to_le_bytes())?;
                out.put(&[reply.error_code, reply.message.len() as u8])?;
                out.put(&reply.message)?;
            }
        }
        Ok(out.finish())
    }

    pub fn decode(bytes: &[u8]) -> Result<Self, DecodeError> {
        if bytes.len() < HEADER_LEN {
            // Too short to even carry the identifier: still a foreign datagram.
            if bytes.len() < IDENTIFIER.len() || bytes[..IDENTIFIER.len()] != IDENTIFIER {
                return Err(DecodeError::ForeignIdentifier);
            }
            return Err(DecodeError::Truncated {
                expected: HEADER_LEN,
                actual: bytes.len(),
            });
        }
        if bytes[..IDENTIFIER.len()] != IDENTIFIER {
            return Err(DecodeError::ForeignIdentifier);
        }

        let tag = bytes[8];
        let packet_type =
            PacketType::from_wire(tag).ok_or(DecodeError::UnknownPacketType(tag))?;
        let mode = Mode::from_wire(bytes[9]).ok_or(DecodeError::InvalidMode(bytes[9]))?;
        let expected = packet_type.min_len();
        if bytes.len() < expected {
            return Err(DecodeError::Truncated {
                expected,
                actual: bytes.len(),
            });
        }

        match packet_type {
            PacketType::Data => Ok(Self::Data(TelemetryPacket {
                mode,
                payload: decode_data(bytes)?,
            })),
            PacketType::Command => Ok(Self::Command {
                mode,
                command: RemoteCommand::from_wire(bytes[10]),
            }),
            PacketType::Poll => Ok(Self::Poll { mode }),
            PacketType::PollReply => Ok(Self::PollReply {
                mode,
                reply: decode_poll_reply(bytes)?,
            }),
        }
    }
}

fn encode_data(out: &mut Writer, payload: DataPayload) -> Result<(), EncodeError> {
    let (kind, action, joystick, gyro) = match payload {
        DataPayload::UserAction(action) => (DATA_KIND_USER_ACTION, action as u8, [0; 2], [0; 3]),
        DataPayload::Joystick { x, y } => (DATA_KIND_JOYSTICK, 0, [x, y], [0; 3]),
        DataPayload::Gyro { x, y, z } => (DATA_KIND_GYRO, 0, [0; 2], [x, y, z]),
    };
    out.put(&[kind, action])?;
    for value in joystick.into_iter().chain(gyro) {
        out.put(&value.to_le_bytes())?;
    }
    Ok(())
}

fn decode_data(bytes: &[u8]) -> Result<DataPayload, DecodeError> {
    let kind = bytes[10];
    match kind {
        DATA_KIND_USER_ACTION => UserAction::from_wire(bytes[11])
            .map(DataPayload::UserAction)
            .ok_or(DecodeError::UnknownUserAction(bytes[11])),
        DATA_KIND_JOYSTICK => Ok(DataPayload::Joystick {
            x: read_i32(bytes, 12),
            y: read_i32(bytes, 16),
        }),
        DATA_KIND_GYRO => Ok(DataPayload::Gyro {
            x: read_i32(bytes, 20),
            y: read_i32(bytes, 24),
            z: read_i32(bytes, 28),
        }),
        other => Err(DecodeError::UnknownDataKind(other)),
    }
}

fn decode_poll_reply(bytes: &[u8]) -> Result<PollReply, DecodeError> {
    let battery = f32::from_le_bytes([bytes[10], bytes[11], bytes[12], bytes[13]]);
    let error_code = bytes[14];
    let declared = bytes[15];
    let trailing = &bytes[POLL_REPLY_FIXED_LEN..];

    if declared as usize > POLL_REPLY_MESSAGE_MAX {
        return Err(DecodeError::MessageTooLong(declared));
    }
    if trailing.len() != declared as usize {
        return Err(DecodeError::LengthMismatch {
            declared,
            actual: trailing.len(),
        });
    }

    let mut message = StatusMessage::new();
    message
        .extend_from_slice(trailing)
        .map_err(|_| DecodeError::MessageTooLong(declared))?;
    Ok(PollReply {
        battery,
        error_code,
        message,
    })
}

/// Callers check the packet length first.
fn read_i32(bytes: &[u8], at: usize) -> i32 {
    i32::from_le_bytes([bytes[at], bytes[at + 1], bytes[at + 2], bytes[at + 3]])
}

#[derive(Default)]
struct Writer {
    buf: Datagram,
}

impl Writer {
    fn put(&mut self, bytes: &[u8]) -> Result<(), EncodeError> {
        self.buf
            .extend_from_slice(bytes)
            .map_err(|_| EncodeError::BufferFull)
    }

    fn finish(self) -> Datagram {
        self.buf
    }
}
