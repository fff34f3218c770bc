// SPDX-License-Identifier: MIT
// Copyright (c) 2022 Takashi Sakamoto

use std::fmt;

use amdtp_stream::{BufferError, DclProgramError};

#[derive(Debug)]
pub enum IsochError<E> {
    NotInitialized,
    AlreadyInitialized,
    Busy,
    Buffer(BufferError),
    DclProgram(DclProgramError<E>),
    Port(E),
}

impl<E: fmt::Display> fmt::Display for IsochError<E> {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::NotInitialized => write!(f, "receiver is not initialized"),
            Self::AlreadyInitialized => write!(f, "receiver is already initialized"),
            Self::Busy => write!(f, "receiver cannot perform this operation in its current state"),
            Self::Buffer(cause) => write!(f, "buffer error: {}", cause),
            Self::DclProgram(cause) => write!(f, "DCL program error: {}", cause),
            Self::Port(cause) => write!(f, "OS isoch port error: {}", cause),
        }
    }
}

impl<E: fmt::Debug + fmt::Display> std::error::Error for IsochError<E> {}

impl<E> From<BufferError> for IsochError<E> {
    fn from(cause: BufferError) -> Self {
        Self::Buffer(cause)
    }
}

impl<E> From<DclProgramError<E>> for IsochError<E> {
    fn from(cause: DclProgramError<E>) -> Self {
        Self::DclProgram(cause)
    }
}
