// SPDX-License-Identifier: MIT
// Copyright (c) 2022 Takashi Sakamoto

use std::fmt;

use avc_general::Ta1394AvcError;

/// Fatal failure of topology discovery (§7: stage 1 unit plug counts, and
/// inability to discover subunits, are the only stages whose failure aborts
/// the whole parse rather than yielding a partial `DeviceInfo`).
#[derive(Debug)]
pub enum DeviceModelError<T: fmt::Display + fmt::Debug + Clone> {
    /// Transaction failure talking to the unit itself.
    Transport(Ta1394AvcError<T>),
}

impl<T: fmt::Display + fmt::Debug + Clone> fmt::Display for DeviceModelError<T> {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::Transport(cause) => write!(f, "failed to discover device topology: {}", cause),
        }
    }
}

impl<T: fmt::Display + fmt::Debug + Clone> std::error::Error for DeviceModelError<T> {}

impl<T: fmt::Display + fmt::Debug + Clone> From<Ta1394AvcError<T>> for DeviceModelError<T> {
    fn from(cause: Ta1394AvcError<T>) -> Self {
        Self::Transport(cause)
    }
}
