// SPDX-License-Identifier: MIT
// Copyright (c) 2022 Takashi Sakamoto

use avc_descriptor::{DescriptorAccessor, DescriptorSizes, DescriptorSpecifier};
use avc_general::general::{PlugInfo, PlugInfoSubunitData, PlugInfoUnitData, SubunitInfo};
use avc_general::*;
use tracing::{instrument, warn};

use crate::error::DeviceModelError;
use crate::model::*;
use crate::plug_detail::PlugDetailParser;

const SUBUNIT_INFO_PAGE: u8 = 7;

/// The raw 1394TA address byte doesn't agree with `avc_general::AvcSubunitType::AUDIO`
/// (see the crate's design ledger): the Audio subunit type code on the wire is `0x08`,
/// which the general enum has no named variant for and therefore parses into
/// `Reserved(0x08)`. Matching on that preserves the correct wire encoding when we later
/// address the subunit, rather than bending the general-purpose enum.
const AUDIO_SUBUNIT_TYPE_CODE: u8 = 0x08;

/// Builds a fresh, read-only `DeviceInfo` by running the five staged discovery steps of
/// §4.5. Per-object failures in stages 2, 4, and 5 are logged and leave the affected
/// field absent/empty; only stage 1 (unit plug counts) and stage 3 (subunit discovery)
/// are fatal to the whole parse (§7).
#[instrument(skip(avc))]
pub fn discover<A, T>(avc: &A, timeout_ms: u32) -> Result<DeviceInfo, DeviceModelError<T>>
where
    A: Ta1394Avc<T>,
    T: std::fmt::Display + std::fmt::Debug + Clone,
{
    let parser = PlugDetailParser::new(avc, timeout_ms);
    let mut device = DeviceInfo::default();

    // Stage 1: unit plug counts. Fatal on failure.
    let mut unit_plugs = PlugInfo::new_for_unit_isoc_ext_plugs();
    avc.status(&AvcAddr::Unit, &mut unit_plugs, timeout_ms)?;
    let counts = match unit_plugs {
        PlugInfo::Unit(PlugInfoUnitData::IsocExt(d)) => d,
        _ => unreachable!("new_for_unit_isoc_ext_plugs always builds the IsocExt variant"),
    };
    device.iso_in_plugs = counts.isoc_input_plugs;
    device.iso_out_plugs = counts.isoc_output_plugs;
    device.ext_in_plugs = counts.external_input_plugs;
    device.ext_out_plugs = counts.external_output_plugs;

    // Stage 2: parse each unit plug.
    device.iso_input_plugs = build_unit_plugs(
        &parser,
        device.iso_in_plugs,
        Direction::Input,
        PlugUsage::Isochronous,
    );
    device.iso_output_plugs = build_unit_plugs(
        &parser,
        device.iso_out_plugs,
        Direction::Output,
        PlugUsage::Isochronous,
    );
    device.ext_input_plugs = build_unit_plugs(
        &parser,
        device.ext_in_plugs,
        Direction::Input,
        PlugUsage::External,
    );
    device.ext_output_plugs = build_unit_plugs(
        &parser,
        device.ext_out_plugs,
        Direction::Output,
        PlugUsage::External,
    );

    // Stage 3: discover subunits. Fatal on failure.
    let mut subunit_info = SubunitInfo::new(SUBUNIT_INFO_PAGE, 0);
    avc.status(&AvcAddr::Unit, &mut subunit_info, timeout_ms)?;

    let mut music_subunit_id = None;
    let mut audio_subunit_id = None;
    device.subunits = subunit_info
        .entries
        .iter()
        .filter_map(|entry| match entry.subunit_type {
            AvcSubunitType::Music => {
                let id = *music_subunit_id.get_or_insert(entry.maximum_id);
                Some(Subunit::Music(MusicSubunit::new(id)))
            }
            AvcSubunitType::Reserved(AUDIO_SUBUNIT_TYPE_CODE) => {
                let id = *audio_subunit_id.get_or_insert(entry.maximum_id);
                Some(Subunit::Audio(AudioSubunit::new(id)))
            }
            other => Some(Subunit::Unknown {
                subunit_type: u8::from(other),
                subunit_id: entry.maximum_id,
            }),
        })
        .collect();

    // Stage 4 + 5: per-subunit plug discovery and (music-only) status descriptor.
    for subunit in device.subunits.iter_mut() {
        match subunit {
            Subunit::Music(music) => {
                let addr = AvcAddrSubunit::new(AvcSubunitType::Music, music.subunit_id);
                if let Some((dst, src)) = discover_subunit_plug_counts(avc, addr, timeout_ms) {
                    music.dest_plugs = build_subunit_plugs(
                        &parser,
                        addr,
                        dst,
                        Direction::Input,
                        PlugUsage::MusicSubunit,
                    );
                    music.source_plugs = build_subunit_plugs(
                        &parser,
                        addr,
                        src,
                        Direction::Output,
                        PlugUsage::MusicSubunit,
                    );
                }
                read_music_status_descriptor(avc, addr, timeout_ms, music);
            }
            Subunit::Audio(audio) => {
                let addr = AvcAddrSubunit::new(AvcSubunitType::Reserved(AUDIO_SUBUNIT_TYPE_CODE), audio.subunit_id);
                if let Some((dst, src)) = discover_subunit_plug_counts(avc, addr, timeout_ms) {
                    audio.dest_plugs = build_subunit_plugs(
                        &parser,
                        addr,
                        dst,
                        Direction::Input,
                        PlugUsage::AudioSubunit,
                    );
                    audio.source_plugs = build_subunit_plugs(
                        &parser,
                        addr,
                        src,
                        Direction::Output,
                        PlugUsage::AudioSubunit,
                    );
                }
            }
            Subunit::Unknown { .. } => {}
        }
    }

    Ok(device)
}

fn build_unit_plugs<A, T>(
    parser: &PlugDetailParser<A, T>,
    count: u8,
    direction: Direction,
    usage: PlugUsage,
) -> Vec<AudioPlug>
where
    A: Ta1394Avc<T>,
    T: std::fmt::Display + Clone,
{
    (0..count)
        .map(|plug_number| {
            let address = PlugAddress {
                subunit: None,
                plug_number,
                direction,
                usage,
            };
            let mut plug = AudioPlug::new(address);
            if let Err(cause) = parser.parse(&mut plug) {
                warn!(plug_number, %cause, "failed to parse unit plug details");
            }
            plug
        })
        .collect()
}

fn build_subunit_plugs<A, T>(
    parser: &PlugDetailParser<A, T>,
    subunit: AvcAddrSubunit,
    count: u8,
    direction: Direction,
    usage: PlugUsage,
) -> Vec<AudioPlug>
where
    A: Ta1394Avc<T>,
    T: std::fmt::Display + Clone,
{
    (0..count)
        .map(|plug_number| {
            let address = PlugAddress {
                subunit: Some(subunit),
                plug_number,
                direction,
                usage,
            };
            let mut plug = AudioPlug::new(address);
            if let Err(cause) = parser.parse(&mut plug) {
                warn!(plug_number, %cause, "failed to parse subunit plug details");
            }
            plug
        })
        .collect()
}

/// Queries `PLUG INFO` for one subunit. A `NOT IMPLEMENTED` (or any other) response
/// marks the subunit as having no accessible plugs without failing discovery (§4.5).
fn discover_subunit_plug_counts<A, T>(
    avc: &A,
    subunit: AvcAddrSubunit,
    timeout_ms: u32,
) -> Option<(u8, u8)>
where
    A: Ta1394Avc<T>,
    T: std::fmt::Display + Clone,
{
    let addr = AvcAddr::Subunit(subunit);
    let mut op = PlugInfo::new_for_subunit_plugs();
    match avc.status(&addr, &mut op, timeout_ms) {
        Ok(()) => match op {
            PlugInfo::Subunit(PlugInfoSubunitData { dst_plugs, src_plugs }) => {
                Some((dst_plugs, src_plugs))
            }
            _ => unreachable!("new_for_subunit_plugs always builds the Subunit variant"),
        },
        Err(cause) => {
            warn!(?subunit, %cause, "subunit has no accessible plugs");
            None
        }
    }
}

fn read_music_status_descriptor<A, T>(
    avc: &A,
    subunit: AvcAddrSubunit,
    timeout_ms: u32,
    music: &mut MusicSubunit,
) where
    A: Ta1394Avc<T>,
    T: std::fmt::Display + Clone,
{
    let accessor = DescriptorAccessor::new(avc, AvcAddr::Subunit(subunit), DescriptorSizes::default(), timeout_ms);
    let specifier = DescriptorSpecifier::UnitOrSubunit;

    if let Err(cause) = accessor.open_for_read(&specifier) {
        warn!(%cause, "failed to open music subunit status descriptor");
        return;
    }

    match accessor.read_self_describing(&specifier) {
        Ok(raw) => {
            music.status_descriptor = parse_info_block_sequence(&raw);
            music.status_descriptor_raw = raw;
        }
        Err(cause) => warn!(%cause, "failed to read music subunit status descriptor"),
    }

    if let Err(cause) = accessor.close(&specifier) {
        warn!(%cause, "failed to close music subunit status descriptor");
    }
}

/// The descriptor body is a flat concatenation of sibling info blocks (mirrors
/// `avc_descriptor`'s own nested-block walk, duplicated here since that helper is
/// private to its crate).
fn parse_info_block_sequence(buf: &[u8]) -> Vec<avc_descriptor::AvcInfoBlock> {
    let mut blocks = Vec::new();
    let mut offset = 0;
    while offset + 2 <= buf.len() {
        let block = avc_descriptor::parse(&buf[offset..]);
        let advance = (block.compound_length as usize + 2).max(1);
        blocks.push(block);
        offset += advance;
    }
    blocks
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

    // Response frames are `[status, addr, opcode, ..fields]`.
    fn resp(status: u8, addr: u8, opcode: u8, fields: &[u8]) -> Vec<u8> {
        let mut frame = vec![status, addr, opcode];
        frame.extend_from_slice(fields);
        frame
    }

    const STATUS_IMPLEMENTED_STABLE: u8 = 0x0c;
    const STATUS_NOT_IMPLEMENTED: u8 = 0x08;

    #[test]
    fn unit_plug_counts_e1() {
        // E1: send 01 FF 02 00 FF FF FF FF, receive 0C FF 02 00 01 01 02 02.
        let avc = fake(vec![resp(
            STATUS_IMPLEMENTED_STABLE,
            0xff,
            0x02,
            &[0x00, 0x01, 0x01, 0x02, 0x02],
        )]);
        let device = discover(&avc, 100).unwrap();
        assert_eq!(device.iso_in_plugs, 1);
        assert_eq!(device.iso_out_plugs, 1);
        assert_eq!(device.ext_in_plugs, 2);
        assert_eq!(device.ext_out_plugs, 2);
    }

    #[test]
    fn unit_plug_count_failure_is_fatal() {
        let avc = fake(vec![resp(STATUS_NOT_IMPLEMENTED, 0xff, 0x02, &[0x00])]);
        let err = discover(&avc, 100).unwrap_err();
        assert!(matches!(err, DeviceModelError::Transport(_)));
    }

    #[test]
    fn subunit_discovery_classifies_music_and_audio_and_unknown() {
        // No unit plugs, so stage 2 sends nothing. `SUBUNIT INFO` reports one
        // music subunit (type 0x0c -> addr byte 0x60), one audio subunit (type
        // 0x08 -> addr byte 0x40), and one unrecognized type (0x15, id 5 ->
        // addr byte 0xad), then every per-subunit `PLUG INFO` query is rejected
        // so stage 4 leaves the music/audio plug vectors empty and stage 5
        // fails to open the music subunit's status descriptor.
        let avc = fake(vec![
            resp(STATUS_IMPLEMENTED_STABLE, 0xff, 0x02, &[0x00, 0x00, 0x00, 0x00, 0x00]),
            resp(
                STATUS_IMPLEMENTED_STABLE,
                0xff,
                0x31,
                &[0x07, 0x60, 0x40, 0xad, 0xff],
            ),
            resp(STATUS_NOT_IMPLEMENTED, 0x60, 0x02, &[]),
            resp(STATUS_NOT_IMPLEMENTED, 0x60, 0x08, &[]),
            resp(STATUS_NOT_IMPLEMENTED, 0x40, 0x02, &[]),
        ]);
        let device = discover(&avc, 100).unwrap();
        assert_eq!(device.subunits.len(), 3);
        assert!(device.music_subunit().is_some());
        assert!(device.audio_subunit().is_some());
        assert!(device
            .subunits
            .iter()
            .any(|s| matches!(s, Subunit::Unknown { subunit_type: 0x15, subunit_id: 5 })));
        assert!(device.music_subunit().unwrap().dest_plugs.is_empty());
        assert!(device.music_subunit().unwrap().status_descriptor.is_empty());
    }
}
