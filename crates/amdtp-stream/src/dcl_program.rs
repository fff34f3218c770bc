// SPDX-License-Identifier: MIT
// Copyright (c) 2022 Takashi Sakamoto

//! Construction of the receive DCL program (§4.8).
//!
//! The FireWire DCL program is inherently an OS service (IOKit's NuDCL pool on
//! Darwin, the 1394 raw API elsewhere); this module builds the *logical*
//! program — per-packet descriptors, group boundaries, and link order — and
//! drives an injected [`DclPool`] collaborator to realize it. No platform code
//! lives here.

use crate::buffer_manager::{BufferManager, CIP_HEADER_SIZE, ISOCH_HEADER_SIZE, TIMESTAMP_SIZE};
use crate::error::{BufferError, DclProgramError};

/// The three-range scatter list and timestamp target for one receive DCL (§4.8).
#[derive(Clone, Copy, Debug, Eq, PartialEq)]
pub struct DclDescriptor {
    pub packet_index: usize,
    pub isoch_header_range: (usize, usize),
    pub cip_header_range: (usize, usize),
    pub data_range: (usize, usize),
    pub timestamp_offset: usize,
    /// Group this packet belongs to; set on the group's last DCL so the pool can
    /// attach a completion callback carrying this index (§9: no back-pointers,
    /// ephemeral context passed by value instead).
    pub group_index: u32,
    pub is_group_boundary: bool,
}

/// Collaborator that turns [`DclDescriptor`]s into real, linked DCL commands.
/// Implemented by the platform-specific isoch port; this crate only calls it.
pub trait DclPool {
    type DclHandle: Copy;
    type Error;

    /// Allocate one receive DCL matching `descriptor`.
    fn allocate_receive_dcl(
        &mut self,
        descriptor: &DclDescriptor,
    ) -> Result<Self::DclHandle, Self::Error>;

    /// Branch `from` to `to` (used both for in-order linking and the final
    /// circular wraparound).
    fn link(&mut self, from: Self::DclHandle, to: Self::DclHandle) -> Result<(), Self::Error>;

    /// Attach the group-completion callback to a group-boundary DCL.
    fn set_completion_callback(
        &mut self,
        dcl: Self::DclHandle,
        group_index: u32,
    ) -> Result<(), Self::Error>;

    /// Notify the local port that a jump target changed.
    fn notify_jump_update(&mut self, dcl: Self::DclHandle) -> Result<(), Self::Error>;
}

/// Program layout (§4.8): group/packet counts and callback cadence.
#[derive(Clone, Copy, Debug, Eq, PartialEq)]
pub struct DclProgramConfig {
    pub num_groups: u32,
    pub packets_per_group: u32,
    /// Callback fires after every Nth group; 1 = every group.
    pub callback_group_interval: u32,
}

impl Default for DclProgramConfig {
    fn default() -> Self {
        Self {
            num_groups: 8,
            packets_per_group: 16,
            callback_group_interval: 1,
        }
    }
}

/// Owns the logical DCL chain built against a [`BufferManager`]'s layout and
/// drives a [`DclPool`] to realize and later re-link it.
pub struct DclProgram<H> {
    config: DclProgramConfig,
    dcls: Vec<H>,
    built: bool,
}

impl<H: Copy> DclProgram<H> {
    pub fn new(config: DclProgramConfig) -> Self {
        Self {
            config,
            dcls: Vec::new(),
            built: false,
        }
    }

    fn descriptor(&self, buffer: &BufferManager, packet_index: usize) -> Result<DclDescriptor, BufferError> {
        let iso_off = buffer.isoch_header_offset(packet_index)?;
        let cip_off = buffer.cip_header_offset(packet_index)?;
        let data_off = buffer.packet_data_offset(packet_index)?;
        let ts_off = buffer.timestamp_offset(packet_index)?;

        let packets_per_group = self.config.packets_per_group as usize;
        let group_index = (packet_index / packets_per_group) as u32;
        let packet_in_group = packet_index % packets_per_group;
        let is_last_in_group = packet_in_group + 1 == packets_per_group;
        let interval = self.config.callback_group_interval.max(1);
        let is_group_boundary = is_last_in_group && (group_index + 1) % interval == 0;

        Ok(DclDescriptor {
            packet_index,
            isoch_header_range: (iso_off, ISOCH_HEADER_SIZE),
            cip_header_range: (cip_off, CIP_HEADER_SIZE),
            data_range: (data_off, buffer.packet_data_size()),
            timestamp_offset: ts_off,
            group_index,
            is_group_boundary,
        })
    }

    /// Build the full chain: one DCL per packet slot, linked in order, the
    /// last branched back to the first, with a completion callback on every
    /// Nth group's last DCL. Returns the head DCL.
    pub fn build<P: DclPool<DclHandle = H>>(
        &mut self,
        buffer: &BufferManager,
        pool: &mut P,
    ) -> Result<H, DclProgramError<P::Error>> {
        self.dcls.clear();
        self.built = false;

        let total_packets = buffer.total_packets();
        for packet_index in 0..total_packets {
            let descriptor = self.descriptor(buffer, packet_index)?;

            let handle = pool
                .allocate_receive_dcl(&descriptor)
                .map_err(DclProgramError::Pool)?;

            if let Some(&previous) = self.dcls.last() {
                pool.link(previous, handle).map_err(DclProgramError::Pool)?;
            }

            if descriptor.is_group_boundary {
                pool.set_completion_callback(handle, descriptor.group_index)
                    .map_err(DclProgramError::Pool)?;
            }

            self.dcls.push(handle);
        }

        let first = *self.dcls.first().ok_or(DclProgramError::ProgramNotBuilt)?;
        let last = *self.dcls.last().unwrap();
        pool.link(last, first).map_err(DclProgramError::Pool)?;

        self.built = true;
        Ok(first)
    }

    /// Re-link the last DCL to the first and notify the local port, once the
    /// program is bound (§4.8: `fixup_jumps`).
    pub fn fixup_jumps<P: DclPool<DclHandle = H>>(
        &mut self,
        pool: &mut P,
    ) -> Result<(), DclProgramError<P::Error>> {
        if !self.built {
            return Err(DclProgramError::ProgramNotBuilt);
        }
        let first = *self.dcls.first().ok_or(DclProgramError::ProgramNotBuilt)?;
        let last = *self.dcls.last().unwrap();
        pool.link(last, first).map_err(DclProgramError::Pool)?;
        pool.notify_jump_update(last).map_err(DclProgramError::Pool)?;
        Ok(())
    }

    pub fn head(&self) -> Option<H> {
        self.dcls.first().copied()
    }

    pub fn reset(&mut self) {
        self.dcls.clear();
        self.built = false;
    }
}
