use crate::mode::Mode;
use crate::protocol::{DecodeError, Packet, PacketType, RemoteCommand};

/// What the receive path should do with one datagram.
#[derive(Clone, Copy, Debug, Eq, PartialEq)]
pub enum Inbound {
    /// Reply with a PollReply right away and apply `mode`.
    Poll { mode: Mode },
    /// Apply `mode`, then act on `command`.
    Command { mode: Mode, command: RemoteCommand },
    /// Well-formed but not addressed to a controller (Data, PollReply).
    Ignored(PacketType),
    Dropped(DecodeError),
}

#[derive(Clone, Copy, Debug, Default, Eq, PartialEq)]
pub struct LinkStats {
    pub received: u32,
    pub dropped_malformed: u32,
    pub polls: u32,
    pub commands: u32,
    pub sent: u32,
    pub dropped_no_destination: u32,
}

/// Base-station bookkeeping for one controller socket.
///
/// The destination is the sender of the most recent Poll. Outbound packets
/// are only addressed once a Poll has been seen.
pub struct TelemetryLink<A> {
    destination: Option<A>,
    stats: LinkStats,
}

impl<A> Default for TelemetryLink<A> {
    fn default() -> Self {
        Self::new()
    }
}

impl<A> TelemetryLink<A> {
    pub const fn new() -> Self {
        Self {
            destination: None,
            stats: LinkStats {
                received: 0,
                dropped_malformed: 0,
                polls: 0,
                commands: 0,
                sent: 0,
                dropped_no_destination: 0,
            },
        }
    }

    pub fn stats(&self) -> LinkStats {
        self.stats
    }

    pub fn is_connected(&self) -> bool {
        self.destination.is_some()
    }
}

impl<A: Copy> TelemetryLink<A> {
    pub fn destination(&self) -> Option<A> {
        self.destination
    }

    pub fn handle_datagram(&mut self, bytes: &[u8], sender: A) -> Inbound {
        self.stats.received = self.stats.received.wrapping_add(1);
        match Packet::decode(bytes) {
            Ok(Packet::Poll { mode }) => {
                self.destination = Some(sender);
                self.stats.polls = self.stats.polls.wrapping_add(1);
                Inbound::Poll { mode }
            }
            Ok(Packet::Command { mode, command }) => {
                self.stats.commands = self.stats.commands.wrapping_add(1);
                Inbound::Command { mode, command }
            }
            Ok(other) => Inbound::Ignored(other.packet_type()),
            Err(err) => {
                self.stats.dropped_malformed = self.stats.dropped_malformed.wrapping_add(1);
                log::debug!(
                    "link: dropped datagram len={} reason={}",
                    bytes.len(),
                    err.as_str()
                );
                Inbound::Dropped(err)
            }
        }
    }

    /// Address for the next send, or `None` when it must be dropped.
    pub fn route(&mut self) -> Option<A> {
        match self.destination {
            Some(destination) => {
                self.stats.sent = self.stats.sent.wrapping_add(1);
                Some(destination)
            }
            None => {
                self.stats.dropped_no_destination =
                    self.stats.dropped_no_destination.wrapping_add(1);
                None
            }
        }
    }
}
