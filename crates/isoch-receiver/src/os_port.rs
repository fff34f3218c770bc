// SPDX-License-Identifier: MIT
// Copyright (c) 2022 Takashi Sakamoto

//! The OS-specific isochronous port collaborator (§4.11): pool/port/channel
//! creation is inherently IOKit on Darwin (or the raw 1394 API elsewhere), so
//! this crate only depends on the trait, never a concrete implementation.

use amdtp_stream::DclPool;

/// Port/channel lifecycle the orchestrator drives, layered over [`DclPool`]
/// (the same collaborator realizes both the DCL program and the channel).
pub trait OsIsochPort: DclPool {
    /// Set isochronous speed and channel number before starting the transport.
    fn configure(&mut self, speed: u32, channel: u32) -> Result<(), Self::Error>;

    /// The channel number actually allocated, once started.
    fn active_channel(&self) -> Result<u32, Self::Error>;

    fn start(&mut self) -> Result<(), Self::Error>;

    fn stop(&mut self) -> Result<(), Self::Error>;

    /// An atomically-read `(host_abs, fw_cycle_timestamp)` pair, used to seed
    /// and steer the clock PLL.
    fn now(&self) -> (u64, u32);

    /// Host monotonic clock ticks per second, for converting timeouts and PLL
    /// ratios between host ticks and wall-clock time.
    fn host_ticks_per_second(&self) -> u64;
}
