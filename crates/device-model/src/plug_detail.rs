// SPDX-License-Identifier: MIT
// Copyright (c) 2022 Takashi Sakamoto

use std::cell::Cell;
use std::marker::PhantomData;

use avc_general::*;
use avc_stream_format::{
    AmStream, CompoundAm824StreamFormat, ExtendedStreamFormatList, ExtendedStreamFormatSingle,
    FunctionBlockPlugData, PlugAddr as BcoPlugAddr, PlugAddrMode, PlugDirection as BcoPlugDirection,
    StreamFormat as BcoStreamFormat, SubunitPlugData, UnitPlugData, UnitPlugType,
};

use crate::model::*;

const PRIMARY_STREAM_FORMAT_OPCODE: u8 = 0xbf;
const ALTERNATE_STREAM_FORMAT_OPCODE: u8 = 0x2f;

const OPCODE_SIGNAL_SOURCE: u8 = 0x1a;
const OPCODE_DESTINATION_PLUG_CONFIGURE: u8 = 0x40;

const MAX_SUPPORTED_FORMAT_INDICES: u8 = 16;

fn bco_direction(direction: Direction) -> BcoPlugDirection {
    match direction {
        Direction::Input => BcoPlugDirection::Input,
        Direction::Output => BcoPlugDirection::Output,
    }
}

fn bco_plug_addr(address: &PlugAddress) -> BcoPlugAddr {
    let mode = match (address.subunit, address.usage) {
        (None, PlugUsage::Isochronous) => PlugAddrMode::Unit(UnitPlugData {
            unit_type: UnitPlugType::Pcr,
            plug_id: address.plug_number,
        }),
        (None, PlugUsage::External) => PlugAddrMode::Unit(UnitPlugData {
            unit_type: UnitPlugType::External,
            plug_id: address.plug_number,
        }),
        (None, _) => PlugAddrMode::FunctionBlock(FunctionBlockPlugData {
            fb_type: 0xff,
            fb_id: 0xff,
            plug_id: address.plug_number,
        }),
        (Some(_), _) => PlugAddrMode::Subunit(SubunitPlugData {
            plug_id: address.plug_number,
        }),
    };
    BcoPlugAddr {
        direction: bco_direction(address.direction),
        mode,
    }
}

fn target_addr(address: &PlugAddress) -> AvcAddr {
    match address.subunit {
        Some(subunit) => AvcAddr::Subunit(subunit),
        None => AvcAddr::Unit,
    }
}

fn sample_rate_from_freq(freq: u32) -> SampleRate {
    match freq {
        22050 => SampleRate::R22050,
        24000 => SampleRate::R24000,
        32000 => SampleRate::R32000,
        44100 => SampleRate::R44100,
        48000 => SampleRate::R48000,
        88200 => SampleRate::R88200,
        96000 => SampleRate::R96000,
        176400 => SampleRate::R176400,
        192000 => SampleRate::R192000,
        _ => SampleRate::Unknown,
    }
}

fn channel_format_code(format: &CompoundAm824StreamFormat) -> ChannelFormatCode {
    match format {
        CompoundAm824StreamFormat::Iec60958_3 => ChannelFormatCode::Iec60958_3,
        CompoundAm824StreamFormat::Iec61937_3 => ChannelFormatCode::Iec61937_3,
        CompoundAm824StreamFormat::Iec61937_4 => ChannelFormatCode::Iec61937_4,
        CompoundAm824StreamFormat::Iec61937_5 => ChannelFormatCode::Iec61937_5,
        CompoundAm824StreamFormat::Iec61937_6 => ChannelFormatCode::Iec61937_6,
        CompoundAm824StreamFormat::Iec61937_7 => ChannelFormatCode::Iec61937_7,
        CompoundAm824StreamFormat::MultiBitLinearAudioRaw => ChannelFormatCode::Mbla,
        CompoundAm824StreamFormat::MultiBitLinearAudioDvd => ChannelFormatCode::Mbla,
        CompoundAm824StreamFormat::HighPrecisionMultiBitLinearAudio => {
            ChannelFormatCode::HighPrecisionMbla
        }
        CompoundAm824StreamFormat::MidiConformant => ChannelFormatCode::MidiConformant,
        CompoundAm824StreamFormat::SmpteTimeCodeConformant => ChannelFormatCode::SmpteTimeCode,
        CompoundAm824StreamFormat::SampleCount => ChannelFormatCode::SampleCount,
        CompoundAm824StreamFormat::AncillaryData => ChannelFormatCode::Ancillary,
        CompoundAm824StreamFormat::SyncStream => ChannelFormatCode::SyncStream,
        CompoundAm824StreamFormat::Reserved(val) => ChannelFormatCode::Reserved(*val),
    }
}

fn simple_am824_channel(format: &avc_stream_format::Am824Stream) -> (ChannelFormatCode, SampleRate) {
    use avc_stream_format::Am824Stream::*;
    match format {
        Iec60958_3(attr) => (ChannelFormatCode::Iec60958_3, sample_rate_from_freq(attr.freq)),
        Iec61937_3(attr) => (ChannelFormatCode::Iec61937_3, sample_rate_from_freq(attr.freq)),
        Iec61937_4(attr) => (ChannelFormatCode::Iec61937_4, sample_rate_from_freq(attr.freq)),
        Iec61937_5(attr) => (ChannelFormatCode::Iec61937_5, sample_rate_from_freq(attr.freq)),
        Iec61937_6(attr) => (ChannelFormatCode::Iec61937_6, sample_rate_from_freq(attr.freq)),
        Iec61937_7(attr) => (ChannelFormatCode::Iec61937_7, sample_rate_from_freq(attr.freq)),
        MultiBitLinearAudioRaw(attr) => (ChannelFormatCode::Mbla, sample_rate_from_freq(attr.freq)),
        MultiBitLinearAudioDvd(attr) => (ChannelFormatCode::Mbla, sample_rate_from_freq(attr.freq)),
        OneBitAudioPlainRaw(_) => (ChannelFormatCode::OneBitPlainRaw, SampleRate::Unknown),
        OneBitAudioPlainSacd(_) => (ChannelFormatCode::OneBitPlainSacd, SampleRate::Unknown),
        OneBitAudioEncodedRaw(_) => (ChannelFormatCode::OneBitEncodedRaw, SampleRate::Unknown),
        OneBitAudioEncodedSacd(_) => (ChannelFormatCode::OneBitEncodedSacd, SampleRate::Unknown),
        HighPrecisionMultiBitLinearAudio(attr) => {
            (ChannelFormatCode::HighPrecisionMbla, sample_rate_from_freq(attr.freq))
        }
        MidiConformant(_) => (ChannelFormatCode::MidiConformant, SampleRate::Unknown),
        Reserved(raw) => (ChannelFormatCode::Reserved(raw[0]), SampleRate::Unknown),
    }
}

fn convert_stream_format(raw: &BcoStreamFormat) -> AudioStreamFormat {
    match raw {
        BcoStreamFormat::Am(AmStream::CompoundAm824(s)) => AudioStreamFormat {
            format_type: StreamFormatType::CompoundAm824,
            sample_rate: sample_rate_from_freq(s.freq),
            sync_source: s.sync_src,
            channels: s
                .entries
                .iter()
                .map(|entry| ChannelFormatInfo {
                    channel_count: entry.count,
                    format_code: channel_format_code(&entry.format),
                })
                .collect(),
        },
        BcoStreamFormat::Am(AmStream::Am824(format)) => {
            let (format_code, sample_rate) = simple_am824_channel(format);
            AudioStreamFormat {
                format_type: StreamFormatType::SimpleAm824,
                sample_rate,
                sync_source: false,
                channels: vec![ChannelFormatInfo {
                    channel_count: 1,
                    format_code,
                }],
            }
        }
        _ => AudioStreamFormat {
            format_type: StreamFormatType::Unknown,
            sample_rate: SampleRate::Unknown,
            sync_source: false,
            channels: Vec::new(),
        },
    }
}

/// Per-discovery-session state for §4.6: queries a plug's current and supported stream
/// formats and its upstream connection, remembering which stream-format opcode actually
/// worked so later plugs on the same device skip the failed primary opcode (§9: this is
/// session-local, never persisted).
pub struct PlugDetailParser<'a, A, T>
where
    A: Ta1394Avc<T>,
    T: std::fmt::Display + Clone,
{
    avc: &'a A,
    timeout_ms: u32,
    stream_format_opcode: Cell<u8>,
    _marker: PhantomData<T>,
}

impl<'a, A, T> PlugDetailParser<'a, A, T>
where
    A: Ta1394Avc<T>,
    T: std::fmt::Display + Clone,
{
    pub fn new(avc: &'a A, timeout_ms: u32) -> Self {
        Self {
            avc,
            timeout_ms,
            stream_format_opcode: Cell::new(PRIMARY_STREAM_FORMAT_OPCODE),
            _marker: PhantomData,
        }
    }

    fn status_with_opcode<O>(
        &self,
        addr: &AvcAddr,
        op: &mut O,
        opcode: u8,
    ) -> Result<AvcRespCode, Ta1394AvcError<T>>
    where
        O: AvcStatus,
    {
        let mut operands = Vec::new();
        AvcStatus::build_operands(op, addr, &mut operands).map_err(Ta1394AvcError::CmdBuild)?;
        let frame = A::compose_command_frame(AvcCmdType::Status, addr, opcode, &operands);
        let resp = self
            .avc
            .transaction(&frame, self.timeout_ms)
            .map_err(Ta1394AvcError::CommunicationFailure)?;
        let (rcode, resp_operands) =
            A::detect_response_operands(&resp, addr, opcode).map_err(Ta1394AvcError::RespParse)?;
        if let AvcRespCode::ImplementedStable = rcode {
            AvcStatus::parse_operands(op, addr, resp_operands).map_err(Ta1394AvcError::RespParse)?;
        }
        Ok(rcode)
    }

    /// §4.6 step 1: current stream format, with `0xBF`/`0x2F` opcode fallback.
    pub fn current_stream_format(
        &self,
        address: &PlugAddress,
    ) -> Result<Option<AudioStreamFormat>, Ta1394AvcError<T>> {
        let addr = target_addr(address);
        let plug_addr = bco_plug_addr(address);
        let mut op = ExtendedStreamFormatSingle::new(&plug_addr);

        let opcode = self.stream_format_opcode.get();
        let rcode = self.status_with_opcode(&addr, &mut op, opcode)?;
        if let AvcRespCode::NotImplemented = rcode {
            if opcode == PRIMARY_STREAM_FORMAT_OPCODE {
                let mut retry = ExtendedStreamFormatSingle::new(&plug_addr);
                let rcode = self.status_with_opcode(&addr, &mut retry, ALTERNATE_STREAM_FORMAT_OPCODE)?;
                if let AvcRespCode::ImplementedStable = rcode {
                    self.stream_format_opcode.set(ALTERNATE_STREAM_FORMAT_OPCODE);
                    return Ok(Some(convert_stream_format(&retry.stream_format)));
                }
            }
            return Ok(None);
        }

        Ok(Some(convert_stream_format(&op.stream_format)))
    }

    /// §4.6 step 2: supported stream formats, `list_index = 0, 1, 2, …` up to 16 entries,
    /// stopping on `REJECTED`/`NOT IMPLEMENTED`.
    pub fn supported_stream_formats(
        &self,
        address: &PlugAddress,
    ) -> Result<Vec<AudioStreamFormat>, Ta1394AvcError<T>> {
        let addr = target_addr(address);
        let plug_addr = bco_plug_addr(address);
        let opcode = self.stream_format_opcode.get();

        let mut formats = Vec::new();
        for index in 0..MAX_SUPPORTED_FORMAT_INDICES {
            let mut op = ExtendedStreamFormatList::new(&plug_addr, index);
            let rcode = self.status_with_opcode(&addr, &mut op, opcode)?;
            match rcode {
                AvcRespCode::ImplementedStable => formats.push(convert_stream_format(&op.stream_format)),
                AvcRespCode::Rejected | AvcRespCode::NotImplemented => break,
                _ => break,
            }
        }
        Ok(formats)
    }

    /// §4.6 step 3: `SIGNAL SOURCE`, with a `DESTINATION PLUG CONFIGURE` fallback for
    /// music-subunit plugs that don't implement it.
    pub fn signal_source(&self, address: &PlugAddress) -> Result<Option<Connection>, Ta1394AvcError<T>> {
        let addr = target_addr(address);
        let dst = signal_addr(address);
        let mut op = avc_ccm::SignalSource::new(&dst);

        let mut operands = Vec::new();
        AvcStatus::build_operands(&mut op, &addr, &mut operands).map_err(Ta1394AvcError::CmdBuild)?;
        let frame = A::compose_command_frame(AvcCmdType::Status, &addr, OPCODE_SIGNAL_SOURCE, &operands);
        let resp = self
            .avc
            .transaction(&frame, self.timeout_ms)
            .map_err(Ta1394AvcError::CommunicationFailure)?;
        let (rcode, resp_operands) = A::detect_response_operands(&resp, &addr, OPCODE_SIGNAL_SOURCE)
            .map_err(Ta1394AvcError::RespParse)?;

        match rcode {
            AvcRespCode::ImplementedStable => {
                AvcStatus::parse_operands(&mut op, &addr, resp_operands)
                    .map_err(Ta1394AvcError::RespParse)?;
                let (source_subunit, source_plug) = match op.src {
                    avc_ccm::SignalAddr::Unit(avc_ccm::SignalUnitAddr::Isoc(plug))
                    | avc_ccm::SignalAddr::Unit(avc_ccm::SignalUnitAddr::Ext(plug)) => (None, plug),
                    avc_ccm::SignalAddr::Subunit(s) => (Some(s.subunit), s.plug_id),
                };
                Ok(Some(Connection::Standard(StandardConnection {
                    source_subunit,
                    source_plug,
                    status_byte: resp_operands.first().copied().unwrap_or(0xff),
                })))
            }
            AvcRespCode::NotImplemented if matches!(address.usage, PlugUsage::MusicSubunit) => {
                self.destination_plug_configure(address)
            }
            _ => Ok(None),
        }
    }

    fn destination_plug_configure(
        &self,
        address: &PlugAddress,
    ) -> Result<Option<Connection>, Ta1394AvcError<T>> {
        let addr = target_addr(address);
        let operands = vec![0xff, address.plug_number, 0xff, 0xff, 0xff, 0xff];
        let frame = A::compose_command_frame(
            AvcCmdType::Status,
            &addr,
            OPCODE_DESTINATION_PLUG_CONFIGURE,
            &operands,
        );
        let resp = self
            .avc
            .transaction(&frame, self.timeout_ms)
            .map_err(Ta1394AvcError::CommunicationFailure)?;
        let (rcode, resp_operands) =
            A::detect_response_operands(&resp, &addr, OPCODE_DESTINATION_PLUG_CONFIGURE)
                .map_err(Ta1394AvcError::RespParse)?;
        if rcode != AvcRespCode::ImplementedStable || resp_operands.len() < 6 {
            return Ok(None);
        }
        match resp_operands[5] {
            0x00 => Ok(Some(Connection::MusicSubunit(MusicSubunitConnection {
                dest_subunit_plug_id: resp_operands.get(1).copied().unwrap_or(0xff),
                stream_position_0: resp_operands.get(2).copied().unwrap_or(0xff),
                stream_position_1: resp_operands.get(3).copied().unwrap_or(0xff),
            }))),
            _ => Ok(None),
        }
    }

    /// Runs all three §4.6 steps and fills the plug's optional fields in place.
    pub fn parse(&self, plug: &mut AudioPlug) -> Result<(), Ta1394AvcError<T>> {
        plug.current_format = self.current_stream_format(&plug.address)?;
        plug.supported_formats = self.supported_stream_formats(&plug.address)?;
        if plug.address.direction == Direction::Input {
            plug.connection = self.signal_source(&plug.address)?;
        }
        Ok(())
    }
}

fn signal_addr(address: &PlugAddress) -> avc_ccm::SignalAddr {
    match address.subunit {
        Some(subunit) => avc_ccm::SignalAddr::new_for_subunit(
            subunit.subunit_type,
            subunit.subunit_id,
            address.plug_number,
        ),
        None => match address.usage {
            PlugUsage::External => avc_ccm::SignalAddr::new_for_ext_unit(address.plug_number),
            _ => avc_ccm::SignalAddr::new_for_isoc_unit(address.plug_number),
        },
    }
}

#[cfg(test)]
mod test {
    use super::*;
    use std::cell::RefCell;
    use std::collections::VecDeque;

    struct FakeAvc {
        responses: RefCell<VecDeque<Vec<u8>>>,
    }

    impl Ta1394Avc<String> for FakeAvc {
        fn transaction(&self, _command_frame: &[u8], _timeout_ms: u32) -> Result<Vec<u8>, String> {
            self.responses
                .borrow_mut()
                .pop_front()
                .ok_or_else(|| "no response queued".to_string())
        }
    }

    fn fake(responses: Vec<Vec<u8>>) -> FakeAvc {
        FakeAvc {
            responses: RefCell::new(responses.into_iter().collect()),
        }
    }

    fn resp(status: u8, addr: u8, opcode: u8, fields: &[u8]) -> Vec<u8> {
        let mut frame = vec![status, addr, opcode];
        frame.extend_from_slice(fields);
        frame
    }

    const STATUS_IMPLEMENTED_STABLE: u8 = 0x0c;
    const STATUS_NOT_IMPLEMENTED: u8 = 0x08;

    // Isoc output plug 0, addressed to the unit: direction=Output(1),
    // mode=Unit(unit_type=Pcr(0), plug_id=0) -> [0x01, 0x00, 0x00, 0x00, 0xff].
    fn isoc_output_plug_0() -> PlugAddress {
        PlugAddress {
            subunit: None,
            plug_number: 0,
            direction: Direction::Output,
            usage: PlugUsage::Isochronous,
        }
    }

    fn extended_stream_format_single_fields(support_status: u8, stream_format_byte: u8) -> Vec<u8> {
        let mut fields = vec![0xc0, 0x01, 0x00, 0x00, 0x00, 0xff, support_status];
        fields.push(stream_format_byte);
        fields
    }

    #[test]
    fn current_stream_format_falls_back_to_alternate_opcode_and_remembers_it() {
        let avc = fake(vec![
            resp(STATUS_NOT_IMPLEMENTED, 0xff, PRIMARY_STREAM_FORMAT_OPCODE, &[]),
            resp(
                STATUS_IMPLEMENTED_STABLE,
                0xff,
                ALTERNATE_STREAM_FORMAT_OPCODE,
                &extended_stream_format_single_fields(0x00, 0x00),
            ),
        ]);
        let parser = PlugDetailParser::new(&avc, 100);
        let address = isoc_output_plug_0();

        let format = parser.current_stream_format(&address).unwrap();
        assert!(format.is_some());
        assert_eq!(parser.stream_format_opcode.get(), ALTERNATE_STREAM_FORMAT_OPCODE);

        // A second query on the same parser skips the failed primary opcode entirely.
        let avc2 = fake(vec![resp(
            STATUS_IMPLEMENTED_STABLE,
            0xff,
            ALTERNATE_STREAM_FORMAT_OPCODE,
            &extended_stream_format_single_fields(0x00, 0x00),
        )]);
        let parser2 = PlugDetailParser::new(&avc2, 100);
        parser2.stream_format_opcode.set(ALTERNATE_STREAM_FORMAT_OPCODE);
        let format = parser2.current_stream_format(&address).unwrap();
        assert!(format.is_some());
    }

    #[test]
    fn current_stream_format_not_implemented_on_both_opcodes_yields_none() {
        let avc = fake(vec![
            resp(STATUS_NOT_IMPLEMENTED, 0xff, PRIMARY_STREAM_FORMAT_OPCODE, &[]),
            resp(STATUS_NOT_IMPLEMENTED, 0xff, ALTERNATE_STREAM_FORMAT_OPCODE, &[]),
        ]);
        let parser = PlugDetailParser::new(&avc, 100);
        let format = parser.current_stream_format(&isoc_output_plug_0()).unwrap();
        assert!(format.is_none());
    }

    #[test]
    fn destination_plug_configure_fallback_parses_music_connection() {
        // §4.6 step 3: SIGNAL SOURCE not implemented on a music-subunit input
        // plug falls back to DESTINATION PLUG CONFIGURE.
        let music_plug_0 = PlugAddress {
            subunit: Some(AvcAddrSubunit::new(AvcSubunitType::Music, 0)),
            plug_number: 0,
            direction: Direction::Input,
            usage: PlugUsage::MusicSubunit,
        };
        let addr_byte = u8::from(AvcAddrSubunit::new(AvcSubunitType::Music, 0));
        let avc = fake(vec![
            resp(STATUS_NOT_IMPLEMENTED, addr_byte, OPCODE_SIGNAL_SOURCE, &[]),
            resp(
                STATUS_IMPLEMENTED_STABLE,
                addr_byte,
                OPCODE_DESTINATION_PLUG_CONFIGURE,
                &[0xff, 0x02, 0x01, 0x02, 0xff, 0x00],
            ),
        ]);
        let parser = PlugDetailParser::new(&avc, 100);
        let connection = parser.signal_source(&music_plug_0).unwrap().unwrap();
        match connection {
            Connection::MusicSubunit(c) => {
                assert_eq!(c.dest_subunit_plug_id, 0x02);
                assert_eq!(c.stream_position_0, 0x01);
                assert_eq!(c.stream_position_1, 0x02);
            }
            _ => panic!("expected a music-subunit fallback connection"),
        }
    }
}
