use std::net::Ipv4Addr;

use super::error::ArtNetError;
use super::layout;
use super::reader::ArtNetReader;
use super::writer::ArtNetWriter;
use crate::node::NodeIdentity;

/// One ArtPollReply record, decoded.
///
/// Only the fields the node fills in are represented; spare and filler bytes
/// are written as zero and ignored when parsing.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct PollReply {
    pub ip: Ipv4Addr,
    pub port: u16,
    pub firmware_version: (u8, u8),
    pub net_switch: u8,
    pub sub_switch: u8,
    pub oem: u16,
    pub ubea_version: u8,
    pub status1: u8,
    pub esta_manufacturer: [u8; 2],
    pub short_name: String,
    pub long_name: String,
    pub node_report: String,
    pub num_ports: u16,
    pub port_types: [u8; layout::REPLY_MAX_PORTS],
    pub good_input: [u8; layout::REPLY_MAX_PORTS],
    pub good_output: [u8; layout::REPLY_MAX_PORTS],
    pub sw_in: [u8; layout::REPLY_MAX_PORTS],
    pub sw_out: [u8; layout::REPLY_MAX_PORTS],
    pub sw_video: u8,
    pub sw_macro: u8,
    pub sw_remote: u8,
    pub style: u8,
    pub mac: [u8; 6],
    pub bind_ip: Ipv4Addr,
    pub bind_index: u8,
    pub status2: u8,
}

impl PollReply {
    pub fn to_bytes(&self) -> Vec<u8> {
        let mut w = ArtNetWriter::with_header(layout::POLL_REPLY_LEN, layout::OP_POLL_REPLY);
        w.put_ipv4(layout::REPLY_IP_RANGE, self.ip);
        w.put_u16_le(layout::REPLY_PORT_RANGE, self.port);
        w.put_u8(layout::REPLY_VERS_INFO_H_OFFSET, self.firmware_version.0);
        w.put_u8(layout::REPLY_VERS_INFO_L_OFFSET, self.firmware_version.1);
        w.put_u8(layout::REPLY_NET_SWITCH_OFFSET, self.net_switch);
        w.put_u8(layout::REPLY_SUB_SWITCH_OFFSET, self.sub_switch);
        let [oem_hi, oem_lo] = self.oem.to_be_bytes();
        w.put_u8(layout::REPLY_OEM_HI_OFFSET, oem_hi);
        w.put_u8(layout::REPLY_OEM_OFFSET, oem_lo);
        w.put_u8(layout::REPLY_UBEA_VERSION_OFFSET, self.ubea_version);
        w.put_u8(layout::REPLY_STATUS1_OFFSET, self.status1);
        w.put_slice(layout::REPLY_ESTA_MAN_RANGE, &self.esta_manufacturer);
        w.put_string(layout::REPLY_SHORT_NAME_RANGE, &self.short_name);
        w.put_string(layout::REPLY_LONG_NAME_RANGE, &self.long_name);
        w.put_string(layout::REPLY_NODE_REPORT_RANGE, &self.node_report);
        w.put_u16_be(layout::REPLY_NUM_PORTS_RANGE, self.num_ports);
        w.put_slice(layout::REPLY_PORT_TYPES_RANGE, &self.port_types);
        w.put_slice(layout::REPLY_GOOD_INPUT_RANGE, &self.good_input);
        w.put_slice(layout::REPLY_GOOD_OUTPUT_RANGE, &self.good_output);
        w.put_slice(layout::REPLY_SW_IN_RANGE, &self.sw_in);
        w.put_slice(layout::REPLY_SW_OUT_RANGE, &self.sw_out);
        w.put_u8(layout::REPLY_SW_VIDEO_OFFSET, self.sw_video);
        w.put_u8(layout::REPLY_SW_MACRO_OFFSET, self.sw_macro);
        w.put_u8(layout::REPLY_SW_REMOTE_OFFSET, self.sw_remote);
        w.put_u8(layout::REPLY_STYLE_OFFSET, self.style);
        w.put_slice(layout::REPLY_MAC_RANGE, &self.mac);
        w.put_ipv4(layout::REPLY_BIND_IP_RANGE, self.bind_ip);
        w.put_u8(layout::REPLY_BIND_INDEX_OFFSET, self.bind_index);
        w.put_u8(layout::REPLY_STATUS2_OFFSET, self.status2);
        w.into_bytes()
    }

    /// Parse a full ArtPollReply, including ID and opcode checks.
    pub fn parse(payload: &[u8]) -> Result<Self, ArtNetError> {
        let reader = ArtNetReader::new(payload);
        reader.require_len(layout::POLL_REPLY_LEN)?;
        if reader.read_signature()? != layout::ARTNET_ID {
            return Err(ArtNetError::InvalidId);
        }
        let opcode = reader.read_u16_le(layout::OP_CODE_RANGE)?;
        if opcode != layout::OP_POLL_REPLY {
            return Err(ArtNetError::UnsupportedOpcode { opcode });
        }

        let oem_hi = reader.read_u8(layout::REPLY_OEM_HI_OFFSET)?;
        let oem_lo = reader.read_u8(layout::REPLY_OEM_OFFSET)?;

        Ok(Self {
            ip: reader.read_ipv4(layout::REPLY_IP_RANGE)?,
            port: reader.read_u16_le(layout::REPLY_PORT_RANGE)?,
            firmware_version: (
                reader.read_u8(layout::REPLY_VERS_INFO_H_OFFSET)?,
                reader.read_u8(layout::REPLY_VERS_INFO_L_OFFSET)?,
            ),
            net_switch: reader.read_u8(layout::REPLY_NET_SWITCH_OFFSET)?,
            sub_switch: reader.read_u8(layout::REPLY_SUB_SWITCH_OFFSET)?,
            oem: u16::from_be_bytes([oem_hi, oem_lo]),
            ubea_version: reader.read_u8(layout::REPLY_UBEA_VERSION_OFFSET)?,
            status1: reader.read_u8(layout::REPLY_STATUS1_OFFSET)?,
            esta_manufacturer: reader.read_array(layout::REPLY_ESTA_MAN_RANGE)?,
            short_name: reader.read_string(layout::REPLY_SHORT_NAME_RANGE)?,
            long_name: reader.read_string(layout::REPLY_LONG_NAME_RANGE)?,
            node_report: reader.read_string(layout::REPLY_NODE_REPORT_RANGE)?,
            num_ports: reader.read_u16_be(layout::REPLY_NUM_PORTS_RANGE)?,
            port_types: reader.read_array(layout::REPLY_PORT_TYPES_RANGE)?,
            good_input: reader.read_array(layout::REPLY_GOOD_INPUT_RANGE)?,
            good_output: reader.read_array(layout::REPLY_GOOD_OUTPUT_RANGE)?,
            sw_in: reader.read_array(layout::REPLY_SW_IN_RANGE)?,
            sw_out: reader.read_array(layout::REPLY_SW_OUT_RANGE)?,
            sw_video: reader.read_u8(layout::REPLY_SW_VIDEO_OFFSET)?,
            sw_macro: reader.read_u8(layout::REPLY_SW_MACRO_OFFSET)?,
            sw_remote: reader.read_u8(layout::REPLY_SW_REMOTE_OFFSET)?,
            style: reader.read_u8(layout::REPLY_STYLE_OFFSET)?,
            mac: reader.read_array(layout::REPLY_MAC_RANGE)?,
            bind_ip: reader.read_ipv4(layout::REPLY_BIND_IP_RANGE)?,
            bind_index: reader.read_u8(layout::REPLY_BIND_INDEX_OFFSET)?,
            status2: reader.read_u8(layout::REPLY_STATUS2_OFFSET)?,
        })
    }
}

/// Build the reply records answering one ArtPoll.
///
/// Each record advertises at most four ports, all sharing one Net/SubNet.
/// Larger nodes answer with several records distinguished by a 1-based bind
/// index. A node without outputs still answers with a single record
/// advertising zero ports.
pub fn build_poll_replies(identity: &NodeIdentity) -> Vec<PollReply> {
    let ip = identity.ip();
    let node_report = format!(
        "{} DMX output universes active.",
        identity.universe_count()
    );

    (1..=u8::MAX)
        .zip(port_groups(identity.port_universes()))
        .map(|(bind_index, group)| {
            let first = group.first().copied().unwrap_or(0);
            let mut reply = PollReply {
                ip,
                port: layout::ARTNET_PORT,
                firmware_version: (layout::FIRMWARE_VERSION_HI, layout::FIRMWARE_VERSION_LO),
                net_switch: ((first >> 8) & 0x7F) as u8,
                sub_switch: ((first >> 4) & 0x0F) as u8,
                oem: u16::from_be_bytes([layout::OEM_HI, layout::OEM_LO]),
                ubea_version: 0,
                status1: layout::STATUS1,
                esta_manufacturer: [0, 0],
                short_name: identity.short_name().to_string(),
                long_name: identity.long_name().to_string(),
                node_report: node_report.clone(),
                num_ports: group.len() as u16,
                port_types: [0; layout::REPLY_MAX_PORTS],
                good_input: [0; layout::REPLY_MAX_PORTS],
                good_output: [0; layout::REPLY_MAX_PORTS],
                sw_in: [0; layout::REPLY_MAX_PORTS],
                sw_out: [0; layout::REPLY_MAX_PORTS],
                sw_video: 0,
                sw_macro: 0,
                sw_remote: 0,
                style: layout::STYLE_NODE,
                mac: identity.mac(),
                bind_ip: ip,
                bind_index,
                status2: layout::STATUS2,
            };
            for (slot, universe) in group.iter().enumerate() {
                let port_address = (*universe & 0x0F) as u8;
                reply.port_types[slot] = layout::PORT_TYPE_DMX512;
                reply.good_input[slot] = layout::GOOD_INPUT_DISABLED;
                reply.good_output[slot] = layout::GOOD_OUTPUT_ACTIVE;
                reply.sw_in[slot] = port_address;
                reply.sw_out[slot] = port_address;
            }
            reply
        })
        .collect()
}

/// Split port universes into runs of at most four that share `universe >> 4`.
/// SwIn/SwOut only carry the low nibble, so a run may not cross a SubNet.
fn port_groups(ports: &[u16]) -> Vec<&[u16]> {
    if ports.is_empty() {
        return vec![ports];
    }
    let mut groups = Vec::new();
    let mut start = 0;
    for (i, universe) in ports.iter().enumerate().skip(1) {
        if i - start == layout::REPLY_MAX_PORTS || universe >> 4 != ports[start] >> 4 {
            groups.push(&ports[start..i]);
            start = i;
        }
    }
    groups.push(&ports[start..]);
    groups
}

#[cfg(test)]
mod tests {
    use std::net::Ipv4Addr;

    use super::{PollReply, build_poll_replies};
    use crate::node::NodeIdentity;
    use crate::protocols::artnet::error::ArtNetError;
    use crate::protocols::artnet::layout;
    use crate::routing::{MAX_OUTPUTS, UniverseMap};

    fn identity(outputs: u16) -> NodeIdentity {
        identity_from(0, outputs)
    }

    fn identity_from(start_universe: u16, outputs: u16) -> NodeIdentity {
        let map = UniverseMap::new(start_universe, 2, outputs, 340).unwrap();
        NodeIdentity::new(
            "Light Node",
            "Art-Net Light Node",
            Ipv4Addr::new(192, 168, 1, 116),
            [0x04, 0xE9, 0xE5, 0x00, 0x00, 0x02],
            &map,
        )
    }

    #[test]
    fn reply_header_fields_are_fixed() {
        let replies = build_poll_replies(&identity(2));
        assert_eq!(replies.len(), 1);
        let bytes = replies[0].to_bytes();

        assert_eq!(bytes.len(), layout::POLL_REPLY_LEN);
        assert_eq!(bytes.len(), 239);
        assert_eq!(&bytes[0..8], b"Art-Net\0");
        assert_eq!(&bytes[8..10], &[0x00, 0x21]);
        assert_eq!(&bytes[10..14], &[192, 168, 1, 116]);
        assert_eq!(&bytes[14..16], &[0x36, 0x19]);
    }

    #[test]
    fn reply_field_offsets() {
        let bytes = build_poll_replies(&identity(2))[0].to_bytes();

        assert_eq!(bytes[16], 1);
        assert_eq!(bytes[17], 0);
        assert_eq!(bytes[20], 0x00);
        assert_eq!(bytes[21], 0xFF);
        assert_eq!(bytes[23], 0xD2);
        assert_eq!(&bytes[26..36], b"Light Node");
        assert_eq!(bytes[36], 0);
        assert_eq!(&bytes[44..62], b"Art-Net Light Node");
        assert!(bytes[108..172].starts_with(b"4 DMX output universes active."));
        assert_eq!(&bytes[172..174], &[0, 2]);
        assert_eq!(&bytes[174..178], &[0xC0, 0xC0, 0, 0]);
        assert_eq!(&bytes[178..182], &[0x08, 0x08, 0, 0]);
        assert_eq!(&bytes[182..186], &[0x80, 0x80, 0, 0]);
        assert_eq!(&bytes[186..190], &[0, 2, 0, 0]);
        assert_eq!(&bytes[190..194], &[0, 2, 0, 0]);
        assert_eq!(&bytes[194..200], &[0; 6]);
        assert_eq!(bytes[200], 0);
        assert_eq!(&bytes[201..207], &[0x04, 0xE9, 0xE5, 0x00, 0x00, 0x02]);
        assert_eq!(&bytes[207..211], &[192, 168, 1, 116]);
        assert_eq!(bytes[211], 1);
        assert_eq!(bytes[212], 0x08);
        assert!(bytes[213..].iter().all(|b| *b == 0));
    }

    #[test]
    fn more_than_four_outputs_split_into_bind_indexes() {
        let replies = build_poll_replies(&identity(10));
        assert_eq!(replies.len(), 3);
        assert_eq!(
            replies.iter().map(|r| r.num_ports).collect::<Vec<_>>(),
            vec![4, 4, 2]
        );
        assert_eq!(
            replies.iter().map(|r| r.bind_index).collect::<Vec<_>>(),
            vec![1, 2, 3]
        );
        // second record starts at output 4 -> universe 8
        assert_eq!(replies[1].sw_out, [8, 10, 12, 14]);
        // third record starts at universe 16 -> sub switch 1
        assert_eq!(replies[2].sub_switch, 1);
        assert_eq!(replies[2].sw_out, [0, 2, 0, 0]);
    }

    fn advertised_universes(replies: &[PollReply]) -> Vec<u16> {
        replies
            .iter()
            .flat_map(|r| {
                let base = (u16::from(r.net_switch) << 8) | (u16::from(r.sub_switch) << 4);
                r.sw_out[..r.num_ports as usize]
                    .iter()
                    .map(move |sw| base | u16::from(*sw))
            })
            .collect()
    }

    #[test]
    fn ports_crossing_a_subnet_start_a_new_record() {
        let identity = identity_from(10, 4);
        let replies = build_poll_replies(&identity);
        assert_eq!(identity.port_universes(), &[10, 12, 14, 16]);
        assert_eq!(
            replies.iter().map(|r| r.num_ports).collect::<Vec<_>>(),
            vec![3, 1]
        );
        assert_eq!(
            replies.iter().map(|r| r.bind_index).collect::<Vec<_>>(),
            vec![1, 2]
        );
        assert_eq!(advertised_universes(&replies), vec![10, 12, 14, 16]);
    }

    #[test]
    fn advertised_universes_match_ports_across_nets() {
        let identity = identity_from(250, 8);
        let replies = build_poll_replies(&identity);
        assert_eq!(advertised_universes(&replies), identity.port_universes());
        assert!(replies.iter().any(|r| r.net_switch == 1));
    }

    #[test]
    fn bind_index_never_wraps() {
        let map = UniverseMap::new(0, 16, MAX_OUTPUTS, 170).unwrap();
        let identity = NodeIdentity::new("n", "n", Ipv4Addr::UNSPECIFIED, [0; 6], &map);
        let replies = build_poll_replies(&identity);
        assert_eq!(replies.len(), MAX_OUTPUTS as usize);
        assert_eq!(replies.first().map(|r| r.bind_index), Some(1));
        assert_eq!(replies.last().map(|r| r.bind_index), Some(255));
    }

    #[test]
    fn zero_outputs_still_answer() {
        let replies = build_poll_replies(&identity(0));
        assert_eq!(replies.len(), 1);
        assert_eq!(replies[0].num_ports, 0);
        assert_eq!(replies[0].port_types, [0; 4]);
    }

    #[test]
    fn long_names_are_truncated_with_terminator() {
        let map = UniverseMap::new(0, 1, 1, 170).unwrap();
        let identity = NodeIdentity::new(
            "a very long short name indeed",
            "x",
            Ipv4Addr::UNSPECIFIED,
            [0; 6],
            &map,
        );
        let bytes = build_poll_replies(&identity)[0].to_bytes();
        assert_eq!(bytes[43], 0);
        let parsed = PollReply::parse(&bytes).unwrap();
        assert_eq!(parsed.short_name, "a very long short");
    }

    #[test]
    fn serialized_reply_parses_back() {
        let reply = build_poll_replies(&identity(3)).remove(0);
        let parsed = PollReply::parse(&reply.to_bytes()).unwrap();
        assert_eq!(parsed, reply);
    }

    #[test]
    fn parse_rejects_wrong_opcode() {
        let mut bytes = build_poll_replies(&identity(1))[0].to_bytes();
        bytes[9] = 0x50;
        assert_eq!(
            PollReply::parse(&bytes),
            Err(ArtNetError::UnsupportedOpcode { opcode: 0x5000 })
        );
    }

    #[test]
    fn parse_rejects_short_record() {
        let bytes = build_poll_replies(&identity(1))[0].to_bytes();
        let err = PollReply::parse(&bytes[..200]).unwrap_err();
        assert!(matches!(err, ArtNetError::TooShort { needed: 239, .. }));
    }
}
