// SPDX-License-Identifier: MIT
// Copyright (c) 2022 Takashi Sakamoto

#![doc = include_str!("../README.md")]

mod error;
mod os_port;
mod receiver;

pub use error::*;
pub use os_port::*;
pub use receiver::*;
