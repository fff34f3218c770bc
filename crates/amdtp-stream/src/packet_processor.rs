// SPDX-License-Identifier: MIT
// Copyright (c) 2022 Takashi Sakamoto

//! Stateful per-session decode of received isochronous packets into AM824
//! stereo samples, with DBC-continuity tracking across NO_DATA gaps (§4.9).

use tracing::{debug, error, trace, warn};

use crate::frame::{PacketTimingInfo, ProcessedSample};

const AMDTP_FMT: u8 = 0x10;
const NO_DATA_FDF: u8 = 0xFF;
const BYTES_PER_AM824_SAMPLE: usize = 4;
const MAX_24BIT_SIGNED: f32 = 8_388_607.0; // 2^23 - 1

/// Decoded 32-bit isoch header (§4.9 step 1).
#[derive(Clone, Copy, Debug, Eq, PartialEq)]
pub struct IsochHeader {
    pub data_length: u16,
    pub tag: u8,
    pub channel: u8,
    pub tcode: u8,
    pub sy: u8,
}

impl IsochHeader {
    pub fn decode(bytes: [u8; 4]) -> Self {
        let word = u32::from_be_bytes(bytes);
        Self {
            data_length: (word >> 16) as u16,
            tag: ((word >> 14) & 0x03) as u8,
            channel: ((word >> 8) & 0x3f) as u8,
            tcode: ((word >> 4) & 0x0f) as u8,
            sy: (word & 0x0f) as u8,
        }
    }
}

/// Decoded two-quadlet CIP header (§4.9 step 2).
#[derive(Clone, Copy, Debug, Eq, PartialEq)]
pub struct CipHeader {
    pub sid: u8,
    pub dbs: u8,
    pub dbc: u8,
    pub fmt: u8,
    pub fdf: u8,
    pub syt: u16,
}

impl CipHeader {
    pub fn decode(bytes: [u8; 8]) -> Self {
        let quad0 = u32::from_be_bytes([bytes[0], bytes[1], bytes[2], bytes[3]]);
        let quad1 = u32::from_be_bytes([bytes[4], bytes[5], bytes[6], bytes[7]]);
        Self {
            sid: ((quad0 >> 24) & 0x3f) as u8,
            dbs: ((quad0 >> 16) & 0xff) as u8,
            dbc: (quad0 & 0xff) as u8,
            fmt: ((quad1 >> 24) & 0x3f) as u8,
            fdf: ((quad1 >> 16) & 0xff) as u8,
            syt: (quad1 & 0xffff) as u16,
        }
    }

    pub fn is_no_data(&self) -> bool {
        self.fdf == NO_DATA_FDF
    }

    /// Sample-frequency code: the low 3 bits of FDF for AM824 streams.
    pub fn sfc(&self) -> u8 {
        self.fdf & 0x07
    }
}

/// One received packet, already split into its three header/data regions by
/// the buffer manager and DCL program (§4.9 input tuple).
pub struct PacketInput<'a> {
    pub isoch_header: [u8; 4],
    pub cip_header: [u8; 8],
    pub data: &'a [u8],
    pub fw_timestamp: u32,
}

/// Samples plus timing for one emission. A single `process_packet` call yields
/// one `ProcessedPacket` normally, and two on the very first DATA packet ever
/// seen: a zero-sample record for PLL seeding, followed by the packet's own
/// decoded samples (§4.9 step 4).
#[derive(Clone, Debug, PartialEq)]
pub struct ProcessedPacket {
    pub samples: Vec<ProcessedSample>,
    pub timing: PacketTimingInfo,
    /// Frames lost to a forward DBC jump detected on this packet, if any.
    pub lost_frames: Option<u64>,
}

/// Stateful AMDTP packet decoder, one instance per receive session (§4.9).
pub struct PacketProcessor {
    expected_dbc: u8,
    dbc_initialized: bool,
    current_absolute_sample_index: u64,
    sample_index_initialized: bool,
    last_packet_num_data_blocks: u32,
    last_packet_was_no_data: bool,
}

impl Default for PacketProcessor {
    fn default() -> Self {
        Self::new()
    }
}

impl PacketProcessor {
    pub fn new() -> Self {
        Self {
            expected_dbc: 0,
            dbc_initialized: false,
            current_absolute_sample_index: 0,
            sample_index_initialized: false,
            last_packet_num_data_blocks: 0,
            last_packet_was_no_data: false,
        }
    }

    /// Reset all continuity state on a signalled buffer overrun (§4.9 step 7).
    pub fn handle_overrun(&mut self) {
        error!("isoch buffer overrun, resetting DBC/sample-index state");
        self.dbc_initialized = false;
        self.sample_index_initialized = false;
        self.last_packet_num_data_blocks = 0;
        self.last_packet_was_no_data = false;
        self.current_absolute_sample_index = 0;
    }

    pub fn process_packet(&mut self, input: &PacketInput<'_>) -> Vec<ProcessedPacket> {
        let isoch = IsochHeader::decode(input.isoch_header);
        let cip = CipHeader::decode(input.cip_header);
        trace!(?isoch, ?cip, "decoded packet headers");

        if cip.fmt != AMDTP_FMT {
            warn!(fmt = cip.fmt, "dropping non-AMDTP packet");
            return Vec::new();
        }

        let dbs_bytes = cip.dbs as usize * BYTES_PER_AM824_SAMPLE;
        let samples_per_block = if dbs_bytes > 0 { dbs_bytes / BYTES_PER_AM824_SAMPLE } else { 0 };
        let num_data_blocks = if dbs_bytes > 0 { input.data.len() / dbs_bytes } else { 0 };
        let total_samples_in_packet = (num_data_blocks * samples_per_block) as u32;
        let is_no_data = cip.is_no_data();

        let mut results = Vec::with_capacity(2);
        let mut packet_start_abs_sample_index = self.current_absolute_sample_index;
        let mut discontinuity_frames: Option<u64> = None;

        if !self.dbc_initialized {
            if is_no_data {
                debug!("first packet is NO_DATA, waiting for data to initialize DBC");
                self.last_packet_was_no_data = true;
            } else {
                self.expected_dbc = cip.dbc;
                self.last_packet_num_data_blocks = num_data_blocks as u32;
                self.last_packet_was_no_data = false;
                self.dbc_initialized = true;
                packet_start_abs_sample_index = 0;

                if !self.sample_index_initialized {
                    self.current_absolute_sample_index = 0;
                    self.sample_index_initialized = true;
                    if cip.syt != 0xffff {
                        results.push(ProcessedPacket {
                            samples: Vec::new(),
                            timing: PacketTimingInfo {
                                fw_timestamp: input.fw_timestamp,
                                syt: cip.syt,
                                first_dbc: cip.dbc,
                                num_samples_in_packet: 0,
                                fdf: cip.fdf,
                                sfc: cip.sfc(),
                                first_abs_sample_index: 0,
                            },
                            lost_frames: None,
                        });
                    }
                }
            }
        } else {
            let next_expected_dbc = if self.last_packet_was_no_data {
                self.expected_dbc
            } else {
                self.expected_dbc.wrapping_add(self.last_packet_num_data_blocks as u8)
            };

            if cip.dbc != next_expected_dbc {
                let diff = cip.dbc.wrapping_sub(next_expected_dbc) as i8;
                warn!(expected = next_expected_dbc, got = cip.dbc, diff, "DBC discontinuity");

                if self.sample_index_initialized && !is_no_data && diff > 0 && diff < 128 && samples_per_block > 0 {
                    let lost_samples = diff as u64 * samples_per_block as u64;
                    let lost_frames = lost_samples / 2;
                    self.current_absolute_sample_index += lost_frames;
                    discontinuity_frames = Some(lost_frames);
                }
            }

            self.expected_dbc = cip.dbc;
            self.last_packet_num_data_blocks = num_data_blocks as u32;
            self.last_packet_was_no_data = is_no_data;

            packet_start_abs_sample_index = self.current_absolute_sample_index;

            if !self.sample_index_initialized && !is_no_data {
                self.current_absolute_sample_index = 0;
                packet_start_abs_sample_index = 0;
                self.sample_index_initialized = true;
                if cip.syt != 0xffff {
                    results.push(ProcessedPacket {
                        samples: Vec::new(),
                        timing: PacketTimingInfo {
                            fw_timestamp: input.fw_timestamp,
                            syt: cip.syt,
                            first_dbc: cip.dbc,
                            num_samples_in_packet: 0,
                            fdf: cip.fdf,
                            sfc: cip.sfc(),
                            first_abs_sample_index: 0,
                        },
                        lost_frames: None,
                    });
                }
            }
        }

        let mut samples = Vec::new();
        if !is_no_data && total_samples_in_packet > 0 {
            for block_idx in 0..num_data_blocks {
                let block = &input.data[block_idx * dbs_bytes..(block_idx + 1) * dbs_bytes];
                let mut sample_idx = 0;
                while sample_idx + 1 < samples_per_block {
                    let frame_abs_index = packet_start_abs_sample_index
                        + (block_idx * samples_per_block + sample_idx) as u64 / 2;
                    let left = decode_am824_sample(&block[sample_idx * BYTES_PER_AM824_SAMPLE..]);
                    let right = decode_am824_sample(&block[(sample_idx + 1) * BYTES_PER_AM824_SAMPLE..]);
                    samples.push(ProcessedSample {
                        left,
                        right,
                        absolute_sample_index: frame_abs_index,
                    });
                    sample_idx += 2;
                }
            }
            self.current_absolute_sample_index += total_samples_in_packet as u64 / 2;
        }

        results.push(ProcessedPacket {
            timing: PacketTimingInfo {
                fw_timestamp: input.fw_timestamp,
                syt: cip.syt,
                first_dbc: cip.dbc,
                num_samples_in_packet: total_samples_in_packet,
                fdf: cip.fdf,
                sfc: cip.sfc(),
                first_abs_sample_index: packet_start_abs_sample_index,
            },
            samples,
            lost_frames: discontinuity_frames,
        });

        results
    }
}

/// Decode one big-endian AM824 word into `[-1, 1]`: mask the low 24 bits, sign-extend
/// from bit 23, normalize by `2^23 - 1` (§4.9 step 5, E4).
fn decode_am824_sample(word_bytes: &[u8]) -> f32 {
    let word = u32::from_be_bytes([word_bytes[0], word_bytes[1], word_bytes[2], word_bytes[3]]);
    let mut sample24 = (word & 0x00ff_ffff) as i32;
    if sample24 & 0x0080_0000 != 0 {
        sample24 |= !0x00ff_ffffu32 as i32;
    }
    sample24 as f32 / MAX_24BIT_SIGNED
}
