use std::fs::File;
use std::path::Path;

use pcap_parser::{
    Block, LegacyPcapReader, Linktype, PcapBlockOwned, PcapError, PcapNGReader,
    traits::PcapReaderIterator,
};
use tracing::trace;

use crate::protocols::artnet::layout::ARTNET_PORT;
use crate::source::udp::extract_udp;
use crate::source::{Datagram, DatagramSource, SourceError};

use super::error::PcapSourceError;
use super::layout;
use super::reader::{
    is_pcapng_magic, legacy_ts_to_seconds, linktype_for_interface, pcapng_ts_to_seconds,
    read_magic_and_rewind,
};

/// One captured link-layer frame.
struct Frame {
    ts: f64,
    linktype: Linktype,
    data: Vec<u8>,
}

/// Frame counters kept while reading a capture.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub struct CaptureCounters {
    /// Every packet record in the file.
    pub frames: u64,
    /// Frames that were UDP to the Art-Net port.
    pub datagrams: u64,
    /// Frames that could not be sliced into IP/UDP.
    pub undecodable: u64,
}

/// Capture file replayed as a stream of Art-Net datagrams.
pub struct PcapFileSource {
    inner: PcapReader,
    counters: CaptureCounters,
}

enum PcapReader {
    Legacy {
        reader: LegacyPcapReader<File>,
        linktype: Option<Linktype>,
    },
    Ng {
        reader: PcapNGReader<File>,
        linktypes: Vec<Linktype>,
    },
}

impl PcapFileSource {
    pub fn open(path: &Path) -> Result<Self, SourceError> {
        let file = File::open(path)?;
        let inner = create_reader(file)?;
        Ok(Self {
            inner,
            counters: CaptureCounters::default(),
        })
    }

    pub fn counters(&self) -> CaptureCounters {
        self.counters
    }
}

impl DatagramSource for PcapFileSource {
    fn next_datagram(&mut self) -> Result<Option<Datagram>, SourceError> {
        while let Some(frame) = next_frame(&mut self.inner)? {
            self.counters.frames += 1;
            let udp = match extract_udp(frame.linktype, &frame.data) {
                Ok(Some(udp)) => udp,
                Ok(None) => continue,
                Err(err) => {
                    self.counters.undecodable += 1;
                    trace!(frame = self.counters.frames, error = %err, "skipping frame");
                    continue;
                }
            };
            if udp.destination.port() != ARTNET_PORT {
                continue;
            }
            self.counters.datagrams += 1;
            return Ok(Some(Datagram {
                ts: Some(frame.ts),
                sender: udp.source,
                payload: udp.payload.to_vec(),
            }));
        }
        Ok(None)
    }
}

fn create_reader(mut file: File) -> Result<PcapReader, PcapSourceError> {
    let magic = read_magic_and_rewind(&mut file)?;

    if is_pcapng_magic(&magic) {
        let reader = PcapNGReader::new(layout::PCAP_READER_BUFFER_SIZE, file).map_err(|e| {
            PcapSourceError::Pcap {
                context: "pcapng reader init",
                message: e.to_string(),
            }
        })?;
        Ok(PcapReader::Ng {
            reader,
            linktypes: Vec::new(),
        })
    } else {
        let reader = LegacyPcapReader::new(layout::PCAP_READER_BUFFER_SIZE, file).map_err(|e| {
            PcapSourceError::Pcap {
                context: "pcap reader init",
                message: e.to_string(),
            }
        })?;
        Ok(PcapReader::Legacy {
            reader,
            linktype: None,
        })
    }
}

fn next_frame(reader: &mut PcapReader) -> Result<Option<Frame>, PcapSourceError> {
    loop {
        match reader {
            PcapReader::Legacy { reader, linktype } => match reader.next() {
                Ok((offset, block)) => {
                    let frame = match block {
                        PcapBlockOwned::LegacyHeader(header) => {
                            *linktype = Some(header.network);
                            None
                        }
                        PcapBlockOwned::Legacy(packet) => Some(Frame {
                            ts: legacy_ts_to_seconds(packet.ts_sec, packet.ts_usec),
                            linktype: linktype.unwrap_or(Linktype::ETHERNET),
                            data: packet.data.to_vec(),
                        }),
                        _ => None,
                    };
                    reader.consume(offset);
                    if frame.is_some() {
                        return Ok(frame);
                    }
                }
                Err(PcapError::Eof) => return Ok(None),
                Err(PcapError::Incomplete(_)) => {
                    reader.refill().map_err(|e| PcapSourceError::Pcap {
                        context: "pcap reader refill",
                        message: e.to_string(),
                    })?;
                }
                Err(e) => {
                    return Err(PcapSourceError::Pcap {
                        context: "pcap reader next",
                        message: e.to_string(),
                    });
                }
            },
            PcapReader::Ng { reader, linktypes } => match reader.next() {
                Ok((offset, block)) => {
                    let frame = match block {
                        PcapBlockOwned::NG(Block::InterfaceDescription(intf)) => {
                            linktypes.push(intf.linktype);
                            None
                        }
                        PcapBlockOwned::NG(Block::EnhancedPacket(packet)) => Some(Frame {
                            ts: pcapng_ts_to_seconds(packet.ts_high, packet.ts_low),
                            linktype: linktype_for_interface(linktypes, packet.if_id),
                            data: packet.data.to_vec(),
                        }),
                        _ => None,
                    };
                    reader.consume(offset);
                    if frame.is_some() {
                        return Ok(frame);
                    }
                }
                Err(PcapError::Eof) => return Ok(None),
                Err(PcapError::Incomplete(_)) => {
                    reader.refill().map_err(|e| PcapSourceError::Pcap {
                        context: "pcapng reader refill",
                        message: e.to_string(),
                    })?;
                }
                Err(e) => {
                    return Err(PcapSourceError::Pcap {
                        context: "pcapng reader next",
                        message: e.to_string(),
                    });
                }
            },
        }
    }
}
