pub const ARTNET_ID: &[u8; 8] = b"Art-Net\0";
pub const ARTNET_PORT: u16 = 6454;

/// Largest datagram accepted by the node.
pub const MAX_PACKET_LEN: usize = 1060;

pub const ID_RANGE: std::ops::Range<usize> = 0..8;
pub const OP_CODE_RANGE: std::ops::Range<usize> = 8..10;
pub const HEADER_LEN: usize = OP_CODE_RANGE.end;

pub const OP_POLL: u16 = 0x2000;
pub const OP_POLL_REPLY: u16 = 0x2100;
pub const OP_DMX: u16 = 0x5000;
pub const OP_SYNC: u16 = 0x5200;

// ArtDmx
pub const PROTOCOL_VERSION_RANGE: std::ops::Range<usize> = 10..12;
pub const SEQUENCE_OFFSET: usize = 12;
pub const PHYSICAL_OFFSET: usize = 13;
pub const UNIVERSE_RANGE: std::ops::Range<usize> = 14..16;
pub const LENGTH_RANGE: std::ops::Range<usize> = 16..18;
pub const DMX_DATA_OFFSET: usize = 18;
pub const DMX_UNIVERSE_SIZE: usize = 512;

pub const PROTOCOL_VERSION: u16 = 14;

// ArtPollReply
pub const REPLY_IP_RANGE: std::ops::Range<usize> = 10..14;
pub const REPLY_PORT_RANGE: std::ops::Range<usize> = 14..16;
pub const REPLY_VERS_INFO_H_OFFSET: usize = 16;
pub const REPLY_VERS_INFO_L_OFFSET: usize = 17;
pub const REPLY_NET_SWITCH_OFFSET: usize = 18;
pub const REPLY_SUB_SWITCH_OFFSET: usize = 19;
pub const REPLY_OEM_HI_OFFSET: usize = 20;
pub const REPLY_OEM_OFFSET: usize = 21;
pub const REPLY_UBEA_VERSION_OFFSET: usize = 22;
pub const REPLY_STATUS1_OFFSET: usize = 23;
pub const REPLY_ESTA_MAN_RANGE: std::ops::Range<usize> = 24..26;
pub const REPLY_SHORT_NAME_RANGE: std::ops::Range<usize> = 26..44;
pub const REPLY_LONG_NAME_RANGE: std::ops::Range<usize> = 44..108;
pub const REPLY_NODE_REPORT_RANGE: std::ops::Range<usize> = 108..172;
pub const REPLY_NUM_PORTS_RANGE: std::ops::Range<usize> = 172..174;
pub const REPLY_PORT_TYPES_RANGE: std::ops::Range<usize> = 174..178;
pub const REPLY_GOOD_INPUT_RANGE: std::ops::Range<usize> = 178..182;
pub const REPLY_GOOD_OUTPUT_RANGE: std::ops::Range<usize> = 182..186;
pub const REPLY_SW_IN_RANGE: std::ops::Range<usize> = 186..190;
pub const REPLY_SW_OUT_RANGE: std::ops::Range<usize> = 190..194;
pub const REPLY_SW_VIDEO_OFFSET: usize = 194;
pub const REPLY_SW_MACRO_OFFSET: usize = 195;
pub const REPLY_SW_REMOTE_OFFSET: usize = 196;
pub const REPLY_STYLE_OFFSET: usize = 200;
pub const REPLY_MAC_RANGE: std::ops::Range<usize> = 201..207;
pub const REPLY_BIND_IP_RANGE: std::ops::Range<usize> = 207..211;
pub const REPLY_BIND_INDEX_OFFSET: usize = 211;
pub const REPLY_STATUS2_OFFSET: usize = 212;
pub const REPLY_FILLER_RANGE: std::ops::Range<usize> = 213..239;
pub const POLL_REPLY_LEN: usize = REPLY_FILLER_RANGE.end;

pub const REPLY_MAX_PORTS: usize = 4;

pub const FIRMWARE_VERSION_HI: u8 = 1;
pub const FIRMWARE_VERSION_LO: u8 = 0;
pub const OEM_HI: u8 = 0x00;
pub const OEM_LO: u8 = 0xFF;
pub const STATUS1: u8 = 0xD2;
pub const STATUS2: u8 = 0x08;
pub const STYLE_NODE: u8 = 0x00;
/// Port can output and input DMX512.
pub const PORT_TYPE_DMX512: u8 = 0xC0;
/// Input disabled.
pub const GOOD_INPUT_DISABLED: u8 = 0x08;
/// Data is being transmitted.
pub const GOOD_OUTPUT_ACTIVE: u8 = 0x80;
