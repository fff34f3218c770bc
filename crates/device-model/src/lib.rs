// SPDX-License-Identifier: MIT
// Copyright (c) 2022 Takashi Sakamoto

#![doc = include_str!("../README.md")]

mod error;
mod model;
mod plug_detail;
mod topology;

pub use error::*;
pub use model::*;
pub use plug_detail::*;
pub use topology::*;
