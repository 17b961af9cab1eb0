use super::error::ArtNetError;
use super::layout;
use super::reader::ArtNetReader;

/// Opcode carried in bytes 8..10 of every Art-Net packet.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Opcode {
    Poll,
    PollReply,
    Dmx,
    Sync,
    Unknown(u16),
}

impl Opcode {
    pub fn from_raw(raw: u16) -> Self {
        match raw {
            layout::OP_POLL => Opcode::Poll,
            layout::OP_POLL_REPLY => Opcode::PollReply,
            layout::OP_DMX => Opcode::Dmx,
            layout::OP_SYNC => Opcode::Sync,
            other => Opcode::Unknown(other),
        }
    }

    pub fn raw(self) -> u16 {
        match self {
            Opcode::Poll => layout::OP_POLL,
            Opcode::PollReply => layout::OP_POLL_REPLY,
            Opcode::Dmx => layout::OP_DMX,
            Opcode::Sync => layout::OP_SYNC,
            Opcode::Unknown(raw) => raw,
        }
    }
}

/// One ArtDmx payload, borrowing its channel data from the datagram.
///
/// `length` is the value found on the wire; it is not checked against the
/// 512-slot universe size here. `data` always holds exactly `length` bytes.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct DmxFrame<'a> {
    pub universe: u16,
    pub sequence: u8,
    pub length: u16,
    pub data: &'a [u8],
}

/// A classified datagram with its typed payload.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ArtPacket<'a> {
    Poll,
    PollReply,
    Dmx(DmxFrame<'a>),
    Sync,
}

/// Validate framing and return the opcode.
///
/// Empty and oversized datagrams are rejected before the identifier is looked
/// at. The identifier comparison covers all eight bytes, including the NUL.
pub fn classify(payload: &[u8]) -> Result<Opcode, ArtNetError> {
    if payload.is_empty() {
        return Err(ArtNetError::Empty);
    }
    if payload.len() > layout::MAX_PACKET_LEN {
        return Err(ArtNetError::Oversized {
            max: layout::MAX_PACKET_LEN,
            actual: payload.len(),
        });
    }

    let reader = ArtNetReader::new(payload);
    reader.require_len(layout::ID_RANGE.end)?;
    if reader.read_signature()? != layout::ARTNET_ID {
        return Err(ArtNetError::InvalidId);
    }

    let opcode = reader.read_u16_le(layout::OP_CODE_RANGE)?;
    Ok(Opcode::from_raw(opcode))
}

/// Classify a datagram and decode the payload for the supported opcodes.
pub fn parse_packet(payload: &[u8]) -> Result<ArtPacket<'_>, ArtNetError> {
    match classify(payload)? {
        Opcode::Poll => Ok(ArtPacket::Poll),
        Opcode::PollReply => Ok(ArtPacket::PollReply),
        Opcode::Dmx => parse_artdmx(payload).map(ArtPacket::Dmx),
        Opcode::Sync => Ok(ArtPacket::Sync),
        Opcode::Unknown(opcode) => Err(ArtNetError::UnsupportedOpcode { opcode }),
    }
}

/// Decode the ArtDmx fields of an already classified packet.
pub fn parse_artdmx(payload: &[u8]) -> Result<DmxFrame<'_>, ArtNetError> {
    let reader = ArtNetReader::new(payload);
    reader.require_len(layout::DMX_DATA_OFFSET)?;

    let sequence = reader.read_u8(layout::SEQUENCE_OFFSET)?;
    let universe = reader.read_u16_le(layout::UNIVERSE_RANGE)?;
    let length = reader.read_u16_be(layout::LENGTH_RANGE)?;

    let end = layout::DMX_DATA_OFFSET + length as usize;
    let data = reader.read_slice(layout::DMX_DATA_OFFSET..end)?;

    Ok(DmxFrame {
        universe,
        sequence,
        length,
        data,
    })
}

#[cfg(test)]
mod tests {
    use super::{ArtPacket, Opcode, classify, parse_packet};
    use crate::protocols::artnet::error::ArtNetError;
    use crate::protocols::artnet::layout;
    use crate::protocols::artnet::writer::{encode_artdmx, encode_header};

    #[test]
    fn parse_valid_artdmx() {
        let payload = encode_artdmx(1, 0x12, &[1, 2, 3, 4]);

        let parsed = parse_packet(&payload).unwrap();
        let ArtPacket::Dmx(frame) = parsed else {
            panic!("expected ArtDmx, got {parsed:?}");
        };
        assert_eq!(frame.universe, 1);
        assert_eq!(frame.sequence, 0x12);
        assert_eq!(frame.length, 4);
        assert_eq!(frame.data, &[1, 2, 3, 4]);
    }

    #[test]
    fn sequence_zero_is_kept_verbatim() {
        let payload = encode_artdmx(0, 0, &[9]);
        let ArtPacket::Dmx(frame) = parse_packet(&payload).unwrap() else {
            panic!("expected ArtDmx");
        };
        assert_eq!(frame.sequence, 0);
    }

    #[test]
    fn length_above_universe_size_is_not_rejected() {
        let data = vec![7u8; layout::DMX_UNIVERSE_SIZE + 6];
        let payload = encode_artdmx(3, 1, &data);
        let ArtPacket::Dmx(frame) = parse_packet(&payload).unwrap() else {
            panic!("expected ArtDmx");
        };
        assert_eq!(frame.length as usize, layout::DMX_UNIVERSE_SIZE + 6);
        assert_eq!(frame.data.len(), frame.length as usize);
    }

    #[test]
    fn truncated_channel_data_is_rejected() {
        let mut payload = encode_artdmx(0, 0, &[1, 2, 3, 4, 5, 6]);
        payload.truncate(layout::DMX_DATA_OFFSET + 2);
        let err = parse_packet(&payload).unwrap_err();
        assert_eq!(
            err,
            ArtNetError::TooShort {
                needed: layout::DMX_DATA_OFFSET + 6,
                actual: layout::DMX_DATA_OFFSET + 2,
            }
        );
    }

    #[test]
    fn truncated_dmx_header_is_rejected() {
        let mut payload = encode_header(layout::OP_DMX);
        payload.resize(layout::DMX_DATA_OFFSET - 1, 0);
        let err = parse_packet(&payload).unwrap_err();
        assert!(err.to_string().contains("payload too short"));
    }

    #[test]
    fn classify_rejects_foreign_identifier() {
        let mut payload = encode_header(layout::OP_POLL);
        payload[0] = b'a';
        assert_eq!(classify(&payload), Err(ArtNetError::InvalidId));
    }

    #[test]
    fn classify_requires_trailing_nul() {
        let mut payload = encode_header(layout::OP_POLL);
        payload[7] = b'!';
        assert_eq!(classify(&payload), Err(ArtNetError::InvalidId));
    }

    #[test]
    fn classify_rejects_empty_and_oversized() {
        assert_eq!(classify(&[]), Err(ArtNetError::Empty));

        let mut payload = encode_header(layout::OP_DMX);
        payload.resize(layout::MAX_PACKET_LEN + 1, 0);
        assert_eq!(
            classify(&payload),
            Err(ArtNetError::Oversized {
                max: layout::MAX_PACKET_LEN,
                actual: layout::MAX_PACKET_LEN + 1,
            })
        );
    }

    #[test]
    fn classify_accepts_max_sized_packet() {
        let mut payload = encode_header(layout::OP_SYNC);
        payload.resize(layout::MAX_PACKET_LEN, 0);
        assert_eq!(classify(&payload), Ok(Opcode::Sync));
    }

    #[test]
    fn classify_rejects_missing_opcode() {
        let payload = layout::ARTNET_ID.to_vec();
        assert!(matches!(
            classify(&payload),
            Err(ArtNetError::TooShort { needed: 10, .. })
        ));
    }

    #[test]
    fn classify_maps_known_opcodes() {
        for (raw, expected) in [
            (layout::OP_POLL, Opcode::Poll),
            (layout::OP_POLL_REPLY, Opcode::PollReply),
            (layout::OP_DMX, Opcode::Dmx),
            (layout::OP_SYNC, Opcode::Sync),
        ] {
            assert_eq!(classify(&encode_header(raw)), Ok(expected));
            assert_eq!(expected.raw(), raw);
        }
    }

    #[test]
    fn unknown_opcode_is_unsupported() {
        let payload = encode_header(0xF800);
        assert_eq!(classify(&payload), Ok(Opcode::Unknown(0xF800)));
        assert_eq!(
            parse_packet(&payload),
            Err(ArtNetError::UnsupportedOpcode { opcode: 0xF800 })
        );
    }
}
