use std::net::Ipv4Addr;

use super::layout;
use crate::protocols::common::reader::write_nul_padded;

/// Fixed-size record builder addressed by the offsets in `layout`.
pub struct ArtNetWriter {
    buf: Vec<u8>,
}

impl ArtNetWriter {
    /// Zero-filled record of `len` bytes, carrying the Art-Net ID and `opcode`.
    pub fn with_header(len: usize, opcode: u16) -> Self {
        let mut writer = Self {
            buf: vec![0u8; len.max(layout::HEADER_LEN)],
        };
        writer.put_slice(layout::ID_RANGE, layout::ARTNET_ID);
        writer.put_u16_le(layout::OP_CODE_RANGE, opcode);
        writer
    }

    pub fn put_u8(&mut self, offset: usize, value: u8) {
        self.buf[offset] = value;
    }

    pub fn put_u16_le(&mut self, range: std::ops::Range<usize>, value: u16) {
        self.buf[range].copy_from_slice(&value.to_le_bytes());
    }

    pub fn put_u16_be(&mut self, range: std::ops::Range<usize>, value: u16) {
        self.buf[range].copy_from_slice(&value.to_be_bytes());
    }

    pub fn put_ipv4(&mut self, range: std::ops::Range<usize>, value: Ipv4Addr) {
        self.buf[range].copy_from_slice(&value.octets());
    }

    pub fn put_slice(&mut self, range: std::ops::Range<usize>, value: &[u8]) {
        self.buf[range].copy_from_slice(value);
    }

    /// Writes a NUL-terminated string, truncating to fit the field.
    pub fn put_string(&mut self, range: std::ops::Range<usize>, value: &str) {
        write_nul_padded(&mut self.buf[range], value);
    }

    pub fn into_bytes(self) -> Vec<u8> {
        self.buf
    }
}

/// Bare header: ID followed by `opcode`.
pub fn encode_header(opcode: u16) -> Vec<u8> {
    ArtNetWriter::with_header(layout::HEADER_LEN, opcode).into_bytes()
}

/// ArtPoll with protocol version 14 and default flags.
pub fn encode_poll() -> Vec<u8> {
    let mut writer = ArtNetWriter::with_header(14, layout::OP_POLL);
    writer.put_u16_be(layout::PROTOCOL_VERSION_RANGE, layout::PROTOCOL_VERSION);
    writer.into_bytes()
}

pub fn encode_sync() -> Vec<u8> {
    let mut writer = ArtNetWriter::with_header(14, layout::OP_SYNC);
    writer.put_u16_be(layout::PROTOCOL_VERSION_RANGE, layout::PROTOCOL_VERSION);
    writer.into_bytes()
}

/// ArtDmx carrying `data` verbatim; the length field is `data.len()`.
pub fn encode_artdmx(universe: u16, sequence: u8, data: &[u8]) -> Vec<u8> {
    let len = layout::DMX_DATA_OFFSET + data.len();
    let mut writer = ArtNetWriter::with_header(len, layout::OP_DMX);
    writer.put_u16_be(layout::PROTOCOL_VERSION_RANGE, layout::PROTOCOL_VERSION);
    writer.put_u8(layout::SEQUENCE_OFFSET, sequence);
    writer.put_u8(layout::PHYSICAL_OFFSET, 0);
    writer.put_u16_le(layout::UNIVERSE_RANGE, universe);
    writer.put_u16_be(layout::LENGTH_RANGE, data.len() as u16);
    writer.put_slice(layout::DMX_DATA_OFFSET..len, data);
    writer.into_bytes()
}

#[cfg(test)]
mod tests {
    use super::{encode_artdmx, encode_poll};
    use crate::protocols::artnet::layout;

    #[test]
    fn artdmx_byte_layout() {
        let packet = encode_artdmx(0x0102, 7, &[0xAA; 512]);

        assert_eq!(&packet[..8], b"Art-Net\0");
        assert_eq!(&packet[8..10], &[0x00, 0x50]);
        assert_eq!(&packet[10..12], &[0, 14]);
        assert_eq!(packet[12], 7);
        assert_eq!(&packet[14..16], &[0x02, 0x01]);
        assert_eq!(&packet[16..18], &[0x02, 0x00]);
        assert_eq!(packet.len(), layout::DMX_DATA_OFFSET + 512);
    }

    #[test]
    fn poll_byte_layout() {
        let packet = encode_poll();
        assert_eq!(packet.len(), 14);
        assert_eq!(&packet[8..10], &[0x00, 0x20]);
    }
}
