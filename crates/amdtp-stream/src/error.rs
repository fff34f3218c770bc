// SPDX-License-Identifier: MIT
// Copyright (c) 2022 Takashi Sakamoto

use std::fmt;

/// Failure modes of the buffer manager (§4.7).
#[derive(Debug, Eq, PartialEq)]
pub enum BufferError {
    /// `num_groups`, `packets_per_group`, or `packet_data_size` was zero.
    InvalidConfig(&'static str),
    /// A packet index was outside `[0, total_packets)`.
    PacketIndexOutOfRange { index: usize, total_packets: usize },
}

impl fmt::Display for BufferError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::InvalidConfig(reason) => write!(f, "invalid buffer configuration: {}", reason),
            Self::PacketIndexOutOfRange { index, total_packets } => write!(
                f,
                "packet index {} out of range (total_packets = {})",
                index, total_packets
            ),
        }
    }
}

impl std::error::Error for BufferError {}

/// Failure modes of the DCL program builder (§4.8), parameterized over the
/// error type of the OS-provided DCL pool abstraction it drives.
#[derive(Debug)]
pub enum DclProgramError<E> {
    /// The underlying buffer manager reported a configuration or range error.
    Buffer(BufferError),
    /// The DCL program was queried (head, fixup) before `build` was called.
    ProgramNotBuilt,
    /// The OS-provided DCL pool failed to allocate, link, or notify.
    Pool(E),
}

impl<E: fmt::Display> fmt::Display for DclProgramError<E> {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::Buffer(cause) => write!(f, "{}", cause),
            Self::ProgramNotBuilt => write!(f, "DCL program has not been built yet"),
            Self::Pool(cause) => write!(f, "DCL pool operation failed: {}", cause),
        }
    }
}

impl<E: fmt::Debug + fmt::Display> std::error::Error for DclProgramError<E> {}

impl<E> From<BufferError> for DclProgramError<E> {
    fn from(cause: BufferError) -> Self {
        Self::Buffer(cause)
    }
}
