// SPDX-License-Identifier: MIT
// Copyright (c) 2022 Takashi Sakamoto

#![doc = include_str!("../README.md")]

mod accessor;
mod info_block;
mod specifier;

pub use accessor::*;
pub use info_block::*;
pub use specifier::*;
