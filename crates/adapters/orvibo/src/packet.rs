//! Orvibo S20 packet codec.
//!
//! Pure functions on `&[u8]`; no socket involved. Every packet is framed as
//!
//! | Offset | Field | Type |
//! |--------|-------|------|
//! | 0–1 | Magic | `"hd"` |
//! | 2–3 | Total length | u16 BE, header included |
//! | 4–5 | Command | 2 ASCII bytes |
//! | 6– | Payload | command specific |
//!
//! Sockets answer on UDP port [`PORT`], replying to the sender's address.

use pihum_domain::device::{MacAddress, PowerState};

use crate::error::PacketError;

/// UDP port Orvibo sockets listen and answer on.
pub const PORT: u16 = 10000;

const MAGIC: [u8; 2] = *b"hd";
const HEADER_LEN: usize = 6;
const PADDING: [u8; 6] = [0x20; 6];

const DISCOVER: [u8; 2] = *b"qa";
const SUBSCRIBE: [u8; 2] = *b"cl";
const POWER: [u8; 2] = *b"dc";
const STATE_CHANGED: [u8; 2] = *b"sf";

const DISCOVER_REPLY_LEN: usize = 42;
const SUBSCRIBE_REPLY_LEN: usize = 24;
const STATE_CHANGED_LEN: usize = 23;
const SOCKET_TYPE: &[u8] = b"SOC";

/// A decoded packet received from the network.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum Packet {
    /// A socket answered the discovery broadcast.
    DiscoverReply { mac: MacAddress, power: PowerState },
    /// A socket acknowledged a subscription.
    SubscribeReply { mac: MacAddress, power: PowerState },
    /// A socket reports that its relay changed.
    StateChanged { mac: MacAddress, power: PowerState },
    /// Anything else, including our own discovery broadcast and replies of
    /// non-socket Orvibo devices.
    Other { command: String },
}

impl Packet {
    /// Two-letter command of the packet, for logging.
    #[must_use]
    pub fn command(&self) -> &str {
        match self {
            Self::DiscoverReply { .. } => "qa",
            Self::SubscribeReply { .. } => "cl",
            Self::StateChanged { .. } => "sf",
            Self::Other { command } => command,
        }
    }
}

/// Discovery broadcast, asking every socket to announce itself.
#[must_use]
pub fn discover() -> Vec<u8> {
    frame(DISCOVER, &[])
}

/// Subscription request; sockets ignore power commands from unsubscribed peers.
#[must_use]
pub fn subscribe(mac: MacAddress) -> Vec<u8> {
    let mut reversed = mac.octets();
    reversed.reverse();

    let mut payload = Vec::with_capacity(24);
    payload.extend_from_slice(&mac.octets());
    payload.extend_from_slice(&PADDING);
    payload.extend_from_slice(&reversed);
    payload.extend_from_slice(&PADDING);
    frame(SUBSCRIBE, &payload)
}

/// Power command switching the relay of the socket with `mac`.
#[must_use]
pub fn power(mac: MacAddress, on: bool) -> Vec<u8> {
    let mut payload = Vec::with_capacity(17);
    payload.extend_from_slice(&mac.octets());
    payload.extend_from_slice(&PADDING);
    payload.extend_from_slice(&[0, 0, 0, 0, u8::from(on)]);
    frame(POWER, &payload)
}

fn frame(command: [u8; 2], payload: &[u8]) -> Vec<u8> {
    let len = HEADER_LEN + payload.len();
    let mut buf = Vec::with_capacity(len);
    buf.extend_from_slice(&MAGIC);
    // Packets are at most a few dozen bytes.
    buf.extend_from_slice(&u16::try_from(len).unwrap_or(u16::MAX).to_be_bytes());
    buf.extend_from_slice(&command);
    buf.extend_from_slice(payload);
    buf
}

/// Decode one datagram.
///
/// # Errors
///
/// Returns [`PacketError`] when the frame is malformed or a known command
/// has the wrong size.
pub fn decode(data: &[u8]) -> Result<Packet, PacketError> {
    if data.len() < HEADER_LEN {
        return Err(PacketError::TooShort { actual: data.len() });
    }
    if data[0..2] != MAGIC {
        return Err(PacketError::BadMagic([data[0], data[1]]));
    }
    let declared = usize::from(u16::from_be_bytes([data[2], data[3]]));
    if declared != data.len() {
        return Err(PacketError::LengthMismatch {
            declared,
            actual: data.len(),
        });
    }

    let command = [data[4], data[5]];
    match command {
        // Our own broadcast, looped back.
        DISCOVER if data.len() == HEADER_LEN => Ok(other(command)),
        DISCOVER => {
            expect_len("qa", DISCOVER_REPLY_LEN, data)?;
            if !data[31..37].starts_with(SOCKET_TYPE) {
                return Ok(other(command));
            }
            Ok(Packet::DiscoverReply {
                mac: mac_at(data, 7),
                power: power_state(data[41]),
            })
        }
        SUBSCRIBE => {
            expect_len("cl", SUBSCRIBE_REPLY_LEN, data)?;
            Ok(Packet::SubscribeReply {
                mac: mac_at(data, 6),
                power: power_state(data[23]),
            })
        }
        STATE_CHANGED => {
            expect_len("sf", STATE_CHANGED_LEN, data)?;
            Ok(Packet::StateChanged {
                mac: mac_at(data, 6),
                power: power_state(data[22]),
            })
        }
        _ => Ok(other(command)),
    }
}

fn expect_len(command: &'static str, expected: usize, data: &[u8]) -> Result<(), PacketError> {
    if data.len() == expected {
        Ok(())
    } else {
        Err(PacketError::WrongLength {
            command,
            expected,
            actual: data.len(),
        })
    }
}

fn mac_at(data: &[u8], offset: usize) -> MacAddress {
    let mut octets = [0u8; 6];
    octets.copy_from_slice(&data[offset..offset + 6]);
    MacAddress::new(octets)
}

fn power_state(byte: u8) -> PowerState {
    match byte {
        0x00 => PowerState::Off,
        0x01 => PowerState::On,
        _ => PowerState::Unknown,
    }
}

fn other(command: [u8; 2]) -> Packet {
    Packet::Other {
        command: String::from_utf8_lossy(&command).into_owned(),
    }
}

#[cfg(test)]
pub(crate) mod tests {
    use super::*;

    pub(crate) const MAC: MacAddress = MacAddress::new([0xAC, 0xCF, 0x23, 0x24, 0x19, 0xC0]);

    /// A discovery reply as sent by an S20 socket.
    pub(crate) fn discover_reply(mac: MacAddress, state: u8) -> Vec<u8> {
        let mut reversed = mac.octets();
        reversed.reverse();
        let mut payload = vec![0x00];
        payload.extend_from_slice(&mac.octets());
        payload.extend_from_slice(&PADDING);
        payload.extend_from_slice(&reversed);
        payload.extend_from_slice(&PADDING);
        payload.extend_from_slice(b"SOC002");
        payload.extend_from_slice(&[0x86, 0x3E, 0x5C, 0xD8]);
        payload.push(state);
        frame(DISCOVER, &payload)
    }

    #[test]
    fn should_encode_discover_broadcast() {
        assert_eq!(discover(), b"hd\x00\x06qa".to_vec());
    }

    #[test]
    fn should_encode_subscribe_with_reversed_mac() {
        let packet = subscribe(MAC);
        assert_eq!(packet.len(), 30);
        assert_eq!(&packet[0..6], b"hd\x00\x1ecl");
        assert_eq!(&packet[6..12], &MAC.octets());
        assert_eq!(&packet[12..18], &PADDING);
        assert_eq!(&packet[18..24], &[0xC0, 0x19, 0x24, 0x23, 0xCF, 0xAC]);
        assert_eq!(&packet[24..30], &PADDING);
    }

    #[test]
    fn should_encode_power_commands() {
        let on = power(MAC, true);
        assert_eq!(on.len(), 23);
        assert_eq!(&on[0..6], b"hd\x00\x17dc");
        assert_eq!(&on[6..12], &MAC.octets());
        assert_eq!(&on[18..23], &[0, 0, 0, 0, 0x01]);
        assert_eq!(power(MAC, false)[22], 0x00);
    }

    #[test]
    fn should_decode_discover_reply() {
        let packet = decode(&discover_reply(MAC, 0x01)).unwrap();
        assert_eq!(
            packet,
            Packet::DiscoverReply {
                mac: MAC,
                power: PowerState::On
            }
        );
        assert_eq!(packet.command(), "qa");
    }

    #[test]
    fn should_treat_own_broadcast_as_other() {
        let packet = decode(&discover()).unwrap();
        assert_eq!(
            packet,
            Packet::Other {
                command: "qa".to_string()
            }
        );
    }

    #[test]
    fn should_treat_non_socket_discover_reply_as_other() {
        let mut reply = discover_reply(MAC, 0x00);
        reply[31..37].copy_from_slice(b"IRD005");
        assert!(matches!(decode(&reply).unwrap(), Packet::Other { .. }));
    }

    #[test]
    fn should_decode_state_change() {
        let mut data = b"hd\x00\x17sf".to_vec();
        data.extend_from_slice(&MAC.octets());
        data.extend_from_slice(&PADDING);
        data.extend_from_slice(&[0, 0, 0, 0, 0x00]);
        assert_eq!(
            decode(&data).unwrap(),
            Packet::StateChanged {
                mac: MAC,
                power: PowerState::Off
            }
        );
    }

    #[test]
    fn should_decode_subscribe_reply() {
        let mut data = b"hd\x00\x18cl".to_vec();
        data.extend_from_slice(&MAC.octets());
        data.extend_from_slice(&PADDING);
        data.extend_from_slice(&[0, 0, 0, 0, 0, 0x01]);
        assert_eq!(
            decode(&data).unwrap(),
            Packet::SubscribeReply {
                mac: MAC,
                power: PowerState::On
            }
        );
    }

    #[test]
    fn should_pass_through_unknown_commands() {
        let packet = decode(b"hd\x00\x08zz\x01\x02").unwrap();
        assert_eq!(packet.command(), "zz");
    }

    #[test]
    fn should_reject_short_datagram() {
        assert!(matches!(decode(b"hd\x00"), Err(PacketError::TooShort { actual: 3 })));
    }

    #[test]
    fn should_reject_bad_magic() {
        assert!(matches!(decode(b"xx\x00\x06qa"), Err(PacketError::BadMagic(_))));
    }

    #[test]
    fn should_reject_length_mismatch() {
        assert!(matches!(
            decode(b"hd\x00\x09qa"),
            Err(PacketError::LengthMismatch {
                declared: 9,
                actual: 6
            })
        ));
    }

    #[test]
    fn should_reject_truncated_discover_reply() {
        let mut reply = discover_reply(MAC, 0x01);
        reply.truncate(30);
        reply[3] = 30;
        assert!(matches!(
            decode(&reply),
            Err(PacketError::WrongLength {
                command: "qa",
                expected: 42,
                actual: 30
            })
        ));
    }

    #[test]
    fn should_map_unexpected_state_byte_to_unknown() {
        assert_eq!(power_state(0x07), PowerState::Unknown);
    }
}
