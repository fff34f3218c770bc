// SPDX-License-Identifier: MIT
// Copyright (c) 2022 Takashi Sakamoto

use tracing::debug;

use crate::error::BufferError;

/// Size in bytes of one packet's isoch-header slot (§4.7).
pub const ISOCH_HEADER_SIZE: usize = 4;
/// Size in bytes of one packet's CIP-header slot (§4.7).
pub const CIP_HEADER_SIZE: usize = 8;
/// Size in bytes of one packet's timestamp slot (§4.7).
pub const TIMESTAMP_SIZE: usize = 4;

const PAGE_SIZE: usize = 4096;

fn align_to_page(size: usize) -> usize {
    (size + PAGE_SIZE - 1) / PAGE_SIZE * PAGE_SIZE
}

/// A single page-aligned buffer subdivided into four parallel per-packet regions
/// (isoch-header, CIP-header, packet-data, timestamp), so that DMA scatter/gather
/// descriptors for one packet reference three non-contiguous slots within one
/// allocation (§4.7).
pub struct BufferManager {
    buffer: Vec<u8>,
    total_packets: usize,
    packet_data_size: usize,
    isoch_header_base: usize,
    cip_header_base: usize,
    packet_data_base: usize,
    timestamp_base: usize,
}

impl BufferManager {
    pub fn new(
        num_groups: u32,
        packets_per_group: u32,
        packet_data_size: usize,
    ) -> Result<Self, BufferError> {
        if num_groups == 0 {
            return Err(BufferError::InvalidConfig("num_groups must be non-zero"));
        }
        if packets_per_group == 0 {
            return Err(BufferError::InvalidConfig("packets_per_group must be non-zero"));
        }
        if packet_data_size == 0 {
            return Err(BufferError::InvalidConfig("packet_data_size must be non-zero"));
        }

        let total_packets = num_groups as usize * packets_per_group as usize;

        let isoch_header_base = 0;
        let isoch_header_region = ISOCH_HEADER_SIZE * total_packets;
        let cip_header_base = isoch_header_base + isoch_header_region;
        let cip_header_region = CIP_HEADER_SIZE * total_packets;
        let packet_data_base = cip_header_base + cip_header_region;
        let packet_data_region = packet_data_size * total_packets;
        let timestamp_base = packet_data_base + packet_data_region;
        let timestamp_region = TIMESTAMP_SIZE * total_packets;

        let total_size = align_to_page(timestamp_base + timestamp_region);

        debug!(
            total_packets,
            packet_data_size,
            total_size,
            "allocated isoch buffer"
        );

        Ok(Self {
            buffer: vec![0u8; total_size],
            total_packets,
            packet_data_size,
            isoch_header_base,
            cip_header_base,
            packet_data_base,
            timestamp_base,
        })
    }

    pub fn total_packets(&self) -> usize {
        self.total_packets
    }

    pub fn packet_data_size(&self) -> usize {
        self.packet_data_size
    }

    /// The whole contiguous allocation, passed to the OS as a single DMA range.
    pub fn dma_range(&self) -> &[u8] {
        &self.buffer
    }

    pub fn dma_range_mut(&mut self) -> &mut [u8] {
        &mut self.buffer
    }

    fn check_index(&self, packet_index: usize) -> Result<(), BufferError> {
        if packet_index >= self.total_packets {
            return Err(BufferError::PacketIndexOutOfRange {
                index: packet_index,
                total_packets: self.total_packets,
            });
        }
        Ok(())
    }

    /// Byte offset into [`dma_range`](Self::dma_range) of `packet_index`'s isoch-header slot.
    pub fn isoch_header_offset(&self, packet_index: usize) -> Result<usize, BufferError> {
        self.check_index(packet_index)?;
        Ok(self.isoch_header_base + packet_index * ISOCH_HEADER_SIZE)
    }

    pub fn cip_header_offset(&self, packet_index: usize) -> Result<usize, BufferError> {
        self.check_index(packet_index)?;
        Ok(self.cip_header_base + packet_index * CIP_HEADER_SIZE)
    }

    pub fn packet_data_offset(&self, packet_index: usize) -> Result<usize, BufferError> {
        self.check_index(packet_index)?;
        Ok(self.packet_data_base + packet_index * self.packet_data_size)
    }

    pub fn timestamp_offset(&self, packet_index: usize) -> Result<usize, BufferError> {
        self.check_index(packet_index)?;
        Ok(self.timestamp_base + packet_index * TIMESTAMP_SIZE)
    }

    pub fn isoch_header_slice(&self, packet_index: usize) -> Result<&[u8], BufferError> {
        let off = self.isoch_header_offset(packet_index)?;
        Ok(&self.buffer[off..off + ISOCH_HEADER_SIZE])
    }

    pub fn cip_header_slice(&self, packet_index: usize) -> Result<&[u8], BufferError> {
        let off = self.cip_header_offset(packet_index)?;
        Ok(&self.buffer[off..off + CIP_HEADER_SIZE])
    }

    pub fn packet_data_slice(&self, packet_index: usize) -> Result<&[u8], BufferError> {
        let off = self.packet_data_offset(packet_index)?;
        Ok(&self.buffer[off..off + self.packet_data_size])
    }

    pub fn timestamp_slice(&self, packet_index: usize) -> Result<&[u8], BufferError> {
        let off = self.timestamp_offset(packet_index)?;
        Ok(&self.buffer[off..off + TIMESTAMP_SIZE])
    }

    /// Whether a byte offset into [`dma_range`](Self::dma_range) falls within the
    /// packet-data region (the region a client reads payload bytes from).
    pub fn offset_in_packet_data_region(&self, offset: usize) -> bool {
        offset >= self.packet_data_base
            && offset < self.packet_data_base + self.packet_data_size * self.total_packets
    }
}
