// SPDX-License-Identifier: MIT
// Copyright (c) 2022 Takashi Sakamoto

use avc_general::AvcAddrSubunit;

/// Direction of a plug's signal flow, independent of the wire encoding used by any
/// particular AV/C command.
#[derive(Clone, Copy, Debug, Eq, PartialEq)]
pub enum Direction {
    Input,
    Output,
}

/// What a plug is attached to.
#[derive(Clone, Copy, Debug, Eq, PartialEq)]
pub enum PlugUsage {
    Isochronous,
    External,
    MusicSubunit,
    AudioSubunit,
}

/// The addressing tuple of a plug (§3).
#[derive(Clone, Copy, Debug, Eq, PartialEq)]
pub struct PlugAddress {
    pub subunit: Option<AvcAddrSubunit>,
    pub plug_number: u8,
    pub direction: Direction,
    pub usage: PlugUsage,
}

/// Nominal sample rate of a stream format, or one of the two non-numeric states the
/// wire format can express (§3, §4.6.1).
#[derive(Clone, Copy, Debug, Eq, PartialEq)]
pub enum SampleRate {
    R22050,
    R24000,
    R32000,
    R44100,
    R48000,
    R88200,
    R96000,
    R176400,
    R192000,
    DontCare,
    Unknown,
}

/// A single channel-format entry of a Compound AM824 stream (§3).
#[derive(Clone, Copy, Debug, Eq, PartialEq)]
pub enum ChannelFormatCode {
    Mbla,
    Iec60958_3,
    Iec61937_3,
    Iec61937_4,
    Iec61937_5,
    Iec61937_6,
    Iec61937_7,
    OneBitPlainRaw,
    OneBitPlainSacd,
    OneBitEncodedRaw,
    OneBitEncodedSacd,
    HighPrecisionMbla,
    MidiConformant,
    SmpteTimeCode,
    SampleCount,
    Ancillary,
    SyncStream,
    DontCare,
    Reserved(u8),
}

/// A run of `channel_count` channels sharing `format_code` (§3).
#[derive(Clone, Copy, Debug, Eq, PartialEq)]
pub struct ChannelFormatInfo {
    pub channel_count: u8,
    pub format_code: ChannelFormatCode,
}

/// The wire shape a parsed stream format was found in (§3, §4.6.1).
#[derive(Clone, Copy, Debug, Eq, PartialEq)]
pub enum StreamFormatType {
    CompoundAm824,
    SimpleAm824,
    Unknown,
}

/// A plug's current or supported stream format (§3).
#[derive(Clone, Debug, Eq, PartialEq)]
pub struct AudioStreamFormat {
    pub format_type: StreamFormatType,
    pub sample_rate: SampleRate,
    pub sync_source: bool,
    pub channels: Vec<ChannelFormatInfo>,
}

/// A standard `SIGNAL SOURCE` upstream connection (§4.6 step 3).
#[derive(Clone, Copy, Debug, Eq, PartialEq)]
pub struct StandardConnection {
    pub source_subunit: Option<AvcAddrSubunit>,
    pub source_plug: u8,
    pub status_byte: u8,
}

/// A music-subunit `DESTINATION PLUG CONFIGURE` fallback connection (§4.6 step 3).
#[derive(Clone, Copy, Debug, Eq, PartialEq)]
pub struct MusicSubunitConnection {
    pub dest_subunit_plug_id: u8,
    pub stream_position_0: u8,
    pub stream_position_1: u8,
}

/// Upstream connection of an input plug, whichever query produced it.
#[derive(Clone, Copy, Debug, Eq, PartialEq)]
pub enum Connection {
    Standard(StandardConnection),
    MusicSubunit(MusicSubunitConnection),
}

/// A single plug and everything the topology/plug-detail parsers learned about it (§3).
#[derive(Clone, Debug, Eq, PartialEq)]
pub struct AudioPlug {
    pub address: PlugAddress,
    pub current_format: Option<AudioStreamFormat>,
    pub supported_formats: Vec<AudioStreamFormat>,
    pub connection: Option<Connection>,
    pub name: Option<String>,
}

impl AudioPlug {
    pub(crate) fn new(address: PlugAddress) -> Self {
        Self {
            address,
            current_format: None,
            supported_formats: Vec::new(),
            connection: None,
            name: None,
        }
    }
}

/// The music subunit, including its parsed status-descriptor info-block tree (§3, stage 5).
#[derive(Clone, Debug, Eq, PartialEq, Default)]
pub struct MusicSubunit {
    pub subunit_id: u8,
    pub dest_plugs: Vec<AudioPlug>,
    pub source_plugs: Vec<AudioPlug>,
    pub status_descriptor_raw: Vec<u8>,
    pub status_descriptor: Vec<avc_descriptor::AvcInfoBlock>,
}

impl MusicSubunit {
    pub(crate) fn new(subunit_id: u8) -> Self {
        Self {
            subunit_id,
            ..Default::default()
        }
    }
}

/// The audio subunit (§3).
#[derive(Clone, Debug, Eq, PartialEq, Default)]
pub struct AudioSubunit {
    pub subunit_id: u8,
    pub dest_plugs: Vec<AudioPlug>,
    pub source_plugs: Vec<AudioPlug>,
}

impl AudioSubunit {
    pub(crate) fn new(subunit_id: u8) -> Self {
        Self {
            subunit_id,
            ..Default::default()
        }
    }
}

/// Tagged union over the subunits this library understands; anything else is recorded by
/// raw type/id without further interpretation (§9: tagged union, not inheritance).
#[derive(Clone, Debug, Eq, PartialEq)]
pub enum Subunit {
    Music(MusicSubunit),
    Audio(AudioSubunit),
    Unknown { subunit_type: u8, subunit_id: u8 },
}

/// Root of the topology model built once at device attach (§3). Read-only after
/// construction; a fresh `DeviceInfo` is built for any re-discovery.
#[derive(Clone, Debug, Eq, PartialEq, Default)]
pub struct DeviceInfo {
    pub iso_in_plugs: u8,
    pub iso_out_plugs: u8,
    pub ext_in_plugs: u8,
    pub ext_out_plugs: u8,
    pub iso_input_plugs: Vec<AudioPlug>,
    pub iso_output_plugs: Vec<AudioPlug>,
    pub ext_input_plugs: Vec<AudioPlug>,
    pub ext_output_plugs: Vec<AudioPlug>,
    pub subunits: Vec<Subunit>,
}

impl DeviceInfo {
    pub fn music_subunit(&self) -> Option<&MusicSubunit> {
        self.subunits.iter().find_map(|s| match s {
            Subunit::Music(m) => Some(m),
            _ => None,
        })
    }

    pub fn audio_subunit(&self) -> Option<&AudioSubunit> {
        self.subunits.iter().find_map(|s| match s {
            Subunit::Audio(a) => Some(a),
            _ => None,
        })
    }
}
