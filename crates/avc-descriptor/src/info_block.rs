//! AV/C info block parser.
//!
//! Parses the tree of typed information blocks carried inside a descriptor,
//! most prominently the music subunit status descriptor. Never fails: a
//! malformed region becomes an absent parsed variant with the raw bytes
//! still reachable, and parsing never reads past the backing slice.

/// Recognized info block types. Values follow the 1394TA general descriptor
/// mechanism (name/raw-text) and music subunit status descriptor (the
/// `0x81xx` range) specifications.
pub mod block_type {
    pub const NAME: u16 = 0x0001;
    pub const RAW_TEXT: u16 = 0x000a;
    pub const GENERAL_MUSIC_STATUS: u16 = 0x8100;
    pub const MUSIC_OUTPUT_PLUG_STATUS: u16 = 0x8101;
    pub const SOURCE_PLUG_STATUS: u16 = 0x8102;
    pub const AUDIO_INFO: u16 = 0x8103;
    pub const MIDI_INFO: u16 = 0x8104;
    pub const SMPTE_TIME_CODE_INFO: u16 = 0x8105;
    pub const SAMPLE_COUNT_INFO: u16 = 0x8106;
    pub const AUDIO_SYNC_INFO: u16 = 0x8107;
    pub const ROUTING_STATUS: u16 = 0x8108;
    pub const SUBUNIT_PLUG_INFO: u16 = 0x8109;
    pub const CLUSTER_INFO: u16 = 0x810a;
    pub const MUSIC_PLUG_INFO: u16 = 0x810b;
}

/// One `(music_plug_id, stream_position, stream_location)` entry of a
/// Cluster Info block's signal list.
#[derive(Copy, Clone, Debug, Eq, PartialEq)]
pub struct ClusterSignalInfo {
    pub music_plug_id: u16,
    pub stream_position: u8,
    pub stream_location: u8,
}

/// One end (source or destination) of a Music Plug Info block's routing.
#[derive(Copy, Clone, Debug, Eq, PartialEq)]
pub struct MusicPlugReference {
    pub plug_function_type: u8,
    pub plug_id: u16,
    pub plug_function_block_id: u8,
    pub stream_position: u8,
    pub stream_location: u8,
}

/// The type-specific primary-fields payload of an info block, when the type
/// is recognized and enough bytes were available to decode it.
#[derive(Clone, Debug, Eq, PartialEq)]
pub enum InfoBlockData {
    Name {
        name_data_reference_type: u8,
        name_data_attributes: u8,
        maximum_number_of_characters: u16,
    },
    GeneralMusicStatus {
        current_transmit_capability: u8,
        current_receive_capability: u8,
        current_latency_capability: u32,
    },
    MusicOutputPlugStatus {
        number_of_source_plugs: u16,
    },
    SourcePlugStatus {
        source_plug_number: u16,
    },
    AudioInfo {
        number_of_audio_streams: u8,
    },
    MidiInfo {
        number_of_midi_streams: u8,
    },
    SmpteTimeCodeInfo {
        activity: u8,
    },
    SampleCountInfo {
        activity: u8,
    },
    AudioSyncInfo {
        activity: u8,
    },
    RoutingStatus {
        number_of_subunit_dest_plugs: u16,
        number_of_subunit_source_plugs: u16,
        number_of_music_plugs: u16,
    },
    SubunitPlugInfo {
        subunit_plug_id: u8,
        signal_format: u16,
        plug_type: u8,
        number_of_clusters: u16,
        number_of_channels: u16,
    },
    ClusterInfo {
        stream_format: u8,
        port_type: u8,
        number_of_signals: u8,
        signals: Vec<ClusterSignalInfo>,
    },
    MusicPlugInfo {
        music_plug_type: u16,
        music_plug_id: u16,
        routing_support: u8,
        source: MusicPlugReference,
        destination: MusicPlugReference,
    },
    RawText {
        text: Vec<u8>,
    },
}

/// One node of the info block tree. Carries its own header fields, raw
/// backing bytes, decoded primary-fields payload (if any), and nested
/// blocks found in its secondary-fields area.
#[derive(Clone, Debug, Eq, PartialEq)]
pub struct AvcInfoBlock {
    pub block_type: u16,
    pub compound_length: u16,
    pub primary_fields_length: u16,
    /// True if the backing slice was shorter than `compound_length + 2`.
    pub truncated: bool,
    pub raw: Vec<u8>,
    pub data: Option<InfoBlockData>,
    pub nested: Vec<AvcInfoBlock>,
}

const HEADER_LEN: usize = 6;

/// Parses a single info block (and its nested tree) from `buf`. `buf` is
/// expected to start at the block's compound-length field; it may be
/// shorter than the block claims, in which case the block is marked
/// truncated and parsing proceeds against the bytes actually present.
pub fn parse(buf: &[u8]) -> AvcInfoBlock {
    if buf.len() < HEADER_LEN {
        return AvcInfoBlock {
            block_type: 0,
            compound_length: 0,
            primary_fields_length: 0,
            truncated: true,
            raw: buf.to_vec(),
            data: None,
            nested: Vec::new(),
        };
    }

    let compound_length = u16::from_be_bytes([buf[0], buf[1]]);
    let block_type = u16::from_be_bytes([buf[2], buf[3]]);
    let primary_fields_length = u16::from_be_bytes([buf[4], buf[5]]);

    let claimed_total = compound_length as usize + 2;
    let truncated = buf.len() < claimed_total;
    let total = claimed_total.min(buf.len());
    let raw = buf[..total].to_vec();

    let primary_end = (HEADER_LEN + primary_fields_length as usize).min(total);
    let primary_fields = &buf[HEADER_LEN..primary_end];
    let data = decode_primary_fields(block_type, primary_fields);

    let nested = if primary_end < total {
        parse_nested_blocks(&buf[primary_end..total])
    } else {
        Vec::new()
    };

    AvcInfoBlock {
        block_type,
        compound_length,
        primary_fields_length,
        truncated,
        raw,
        data,
        nested,
    }
}

fn parse_nested_blocks(mut buf: &[u8]) -> Vec<AvcInfoBlock> {
    let mut blocks = Vec::new();
    while buf.len() >= 2 {
        let claimed_compound_length = u16::from_be_bytes([buf[0], buf[1]]);
        let claimed_total = claimed_compound_length as usize + 2;

        if claimed_total < 4 {
            // Invalid claimed size: skip a fixed stride and keep scanning.
            let advance = buf.len().min(4);
            buf = &buf[advance..];
            continue;
        }

        if claimed_total > buf.len() {
            // Alignment cannot be recovered: parse what's available and stop.
            blocks.push(parse(buf));
            break;
        }

        let (this_block, rest) = buf.split_at(claimed_total);
        blocks.push(parse(this_block));
        buf = rest;
    }
    blocks
}

fn decode_primary_fields(kind: u16, f: &[u8]) -> Option<InfoBlockData> {
    use block_type as bt;
    match kind {
        bt::NAME if f.len() >= 4 => Some(InfoBlockData::Name {
            name_data_reference_type: f[0],
            name_data_attributes: f[1],
            maximum_number_of_characters: u16::from_be_bytes([f[2], f[3]]),
        }),
        bt::GENERAL_MUSIC_STATUS if f.len() >= 6 => Some(InfoBlockData::GeneralMusicStatus {
            current_transmit_capability: f[0],
            current_receive_capability: f[1],
            current_latency_capability: u32::from_be_bytes([f[2], f[3], f[4], f[5]]),
        }),
        bt::MUSIC_OUTPUT_PLUG_STATUS if f.len() >= 2 => {
            Some(InfoBlockData::MusicOutputPlugStatus {
                number_of_source_plugs: u16::from_be_bytes([f[0], f[1]]),
            })
        }
        bt::SOURCE_PLUG_STATUS if f.len() >= 2 => Some(InfoBlockData::SourcePlugStatus {
            source_plug_number: u16::from_be_bytes([f[0], f[1]]),
        }),
        bt::AUDIO_INFO if !f.is_empty() => Some(InfoBlockData::AudioInfo {
            number_of_audio_streams: f[0],
        }),
        bt::MIDI_INFO if !f.is_empty() => Some(InfoBlockData::MidiInfo {
            number_of_midi_streams: f[0],
        }),
        bt::SMPTE_TIME_CODE_INFO if !f.is_empty() => {
            Some(InfoBlockData::SmpteTimeCodeInfo { activity: f[0] })
        }
        bt::SAMPLE_COUNT_INFO if !f.is_empty() => {
            Some(InfoBlockData::SampleCountInfo { activity: f[0] })
        }
        bt::AUDIO_SYNC_INFO if !f.is_empty() => {
            Some(InfoBlockData::AudioSyncInfo { activity: f[0] })
        }
        bt::ROUTING_STATUS if f.len() >= 6 => Some(InfoBlockData::RoutingStatus {
            number_of_subunit_dest_plugs: u16::from_be_bytes([f[0], f[1]]),
            number_of_subunit_source_plugs: u16::from_be_bytes([f[2], f[3]]),
            number_of_music_plugs: u16::from_be_bytes([f[4], f[5]]),
        }),
        bt::SUBUNIT_PLUG_INFO if f.len() >= 8 => Some(InfoBlockData::SubunitPlugInfo {
            subunit_plug_id: f[0],
            signal_format: u16::from_be_bytes([f[1], f[2]]),
            plug_type: f[3],
            number_of_clusters: u16::from_be_bytes([f[4], f[5]]),
            number_of_channels: u16::from_be_bytes([f[6], f[7]]),
        }),
        bt::CLUSTER_INFO if f.len() >= 3 => {
            let stream_format = f[0];
            let port_type = f[1];
            let number_of_signals = f[2];
            let mut signals = Vec::new();
            let mut off = 3;
            for _ in 0..number_of_signals {
                if off + 4 > f.len() {
                    break;
                }
                signals.push(ClusterSignalInfo {
                    music_plug_id: u16::from_be_bytes([f[off], f[off + 1]]),
                    stream_position: f[off + 2],
                    stream_location: f[off + 3],
                });
                off += 4;
            }
            Some(InfoBlockData::ClusterInfo {
                stream_format,
                port_type,
                number_of_signals,
                signals,
            })
        }
        bt::MUSIC_PLUG_INFO if f.len() >= 17 => {
            let parse_ref = |f: &[u8]| MusicPlugReference {
                plug_function_type: f[0],
                plug_id: u16::from_be_bytes([f[1], f[2]]),
                plug_function_block_id: f[3],
                stream_position: f[4],
                stream_location: f[5],
            };
            Some(InfoBlockData::MusicPlugInfo {
                music_plug_type: u16::from_be_bytes([f[0], f[1]]),
                music_plug_id: u16::from_be_bytes([f[2], f[3]]),
                routing_support: f[4],
                source: parse_ref(&f[5..11]),
                destination: parse_ref(&f[11..17]),
            })
        }
        bt::RAW_TEXT => Some(InfoBlockData::RawText { text: f.to_vec() }),
        _ => None,
    }
}

#[cfg(test)]
mod test {
    use super::*;

    #[test]
    fn audio_info_block() {
        // E3: compound_length=8, type=0x8103, primary_length=1, primary=05, remainder=00.
        let raw: &[u8] = &[0x00, 0x08, 0x81, 0x03, 0x00, 0x01, 0x05, 0x00];
        let block = parse(raw);
        assert_eq!(block.block_type, block_type::AUDIO_INFO);
        assert_eq!(
            block.data,
            Some(InfoBlockData::AudioInfo {
                number_of_audio_streams: 5
            })
        );
        assert!(block.nested.is_empty());
        assert!(!block.truncated);
    }

    #[test]
    fn cluster_info_block() {
        let mut raw = vec![0x00, 0x00, 0x81, 0x0a, 0x00, 0x03];
        raw[0..2].copy_from_slice(&14u16.to_be_bytes());
        raw.extend_from_slice(&[0x02, 0x01, 0x01]); // stream_format, port_type, number_of_signals
        raw.extend_from_slice(&[0x00, 0x01, 0x00, 0x00]); // one signal entry
        let block = parse(&raw);
        assert_eq!(
            block.data,
            Some(InfoBlockData::ClusterInfo {
                stream_format: 0x02,
                port_type: 0x01,
                number_of_signals: 1,
                signals: vec![ClusterSignalInfo {
                    music_plug_id: 1,
                    stream_position: 0,
                    stream_location: 0,
                }],
            })
        );
    }

    #[test]
    fn truncated_block_tolerated() {
        let raw: &[u8] = &[0x00, 0xff, 0x81, 0x03, 0x00, 0x01, 0x05];
        let block = parse(raw);
        assert!(block.truncated);
        assert_eq!(
            block.data,
            Some(InfoBlockData::AudioInfo {
                number_of_audio_streams: 5
            })
        );
    }

    #[test]
    fn too_short_for_header_never_panics() {
        let block = parse(&[0x00, 0x01]);
        assert!(block.truncated);
        assert_eq!(block.data, None);
    }

    #[test]
    fn nested_block_with_oversized_claim_stops_siblings() {
        let mut parent = vec![0x00, 0x00, 0x81, 0x00, 0x00, 0x00];
        // secondary fields: one nested block claiming more bytes than exist,
        // followed by bytes that would be a second sibling if parsing continued.
        let oversized_nested = [0x00, 0xff, 0x00, 0x01, 0x00, 0x00];
        parent.extend_from_slice(&oversized_nested);
        parent.extend_from_slice(&[0xaa, 0xbb]);
        let compound_length = (parent.len() - 2) as u16;
        parent[0..2].copy_from_slice(&compound_length.to_be_bytes());

        let block = parse(&parent);
        assert_eq!(block.nested.len(), 1);
        assert!(block.nested[0].truncated);
    }

    #[test]
    fn nested_block_with_tiny_claim_is_skipped() {
        let mut parent = vec![0x00, 0x00, 0x81, 0x00, 0x00, 0x00];
        parent.extend_from_slice(&[0x00, 0x00]); // claimed_total = 2, invalid (<4)
        parent.extend_from_slice(&[0x00, 0x02, 0x00, 0x01, 0x00, 0x00]); // a valid nested block
        let compound_length = (parent.len() - 2) as u16;
        parent[0..2].copy_from_slice(&compound_length.to_be_bytes());

        let block = parse(&parent);
        assert_eq!(block.nested.len(), 1);
        assert_eq!(block.nested[0].block_type, 0x0001);
    }
}
