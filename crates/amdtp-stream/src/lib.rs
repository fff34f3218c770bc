// SPDX-License-Identifier: MIT
// Copyright (c) 2022 Takashi Sakamoto

//! Isochronous receive-path plumbing for AM824/AMDTP streams (§4.7–§4.9): a
//! page-aligned four-region buffer layout, an OS-agnostic DCL program
//! builder, a stateful CIP/AM824 packet decoder, and the output frame types
//! shared with the orchestrator crate.

mod buffer_manager;
mod dcl_program;
mod error;
mod frame;
mod packet_processor;

pub use buffer_manager::{BufferManager, CIP_HEADER_SIZE, ISOCH_HEADER_SIZE, TIMESTAMP_SIZE};
pub use dcl_program::{DclDescriptor, DclPool, DclProgram, DclProgramConfig};
pub use error::{BufferError, DclProgramError};
pub use frame::{frame_ring, FrameConsumer, FrameProducer, PacketTimingInfo, ProcessedAudioFrame, ProcessedSample};
pub use packet_processor::{CipHeader, IsochHeader, PacketInput, PacketProcessor, ProcessedPacket};
