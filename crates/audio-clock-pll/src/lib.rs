// SPDX-License-Identifier: MIT
// Copyright (c) 2022 Takashi Sakamoto

//! PI-controlled estimator of the ratio between the 24.576 MHz FireWire cycle
//! timer and the host monotonic clock, anchored on CIP SYT timestamps (§4.10).

use std::fmt;

use amdtp_stream::PacketTimingInfo;
use tracing::{debug, trace, warn};

/// FireWire cycle timer frequency: 8 kHz cycles × 3072 ticks/cycle.
const FW_CLOCK_HZ: f64 = 24_576_000.0;
const FW_CLOCK_TICKS_PER_SECOND: i64 = 24_576_000;

/// Default PI-controller gains and clamps, taken from the device this crate
/// was ported from (not stated by the distilled behavioral description).
pub const DEFAULT_KP: f64 = 0.01;
pub const DEFAULT_KI: f64 = 0.0005;
pub const DEFAULT_INTEGRAL_MAX: f64 = 0.001;
const RATIO_MIN: f64 = 0.999;
const RATIO_MAX: f64 = 1.001;
const IIR_ALPHA: f64 = 0.1;

#[derive(Debug, Eq, PartialEq)]
pub enum PllError {
    /// Queried before `initialize`/`update` ever seeded the PLL.
    NotInitialized,
}

impl fmt::Display for PllError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::NotInitialized => write!(f, "PLL has not been initialized yet"),
        }
    }
}

impl std::error::Error for PllError {}

#[derive(Clone, Copy, Debug)]
struct InitialAnchor {
    host_abs: u64,
    #[allow(dead_code)]
    fw_ts: u32,
}

#[derive(Clone, Copy, Debug)]
struct SytAnchor {
    syt: u16,
    fw_ts: u32,
    abs_sample_index: u64,
    host_abs: u64,
}

/// A PI-controlled clock-ratio estimator, one instance per receive session (§4.10).
pub struct AudioClockPll {
    target_sample_rate: f64,
    host_ticks_per_second: u64,

    initialized: bool,
    initial_anchor: Option<InitialAnchor>,
    syt_anchor: Option<SytAnchor>,

    last_host_abs: u64,
    last_fw_ts: u32,

    current_ratio: f64,
    phase_error_accumulator: f64,

    kp: f64,
    ki: f64,
    integral_max: f64,
}

impl AudioClockPll {
    pub fn new(target_sample_rate: f64, host_ticks_per_second: u64) -> Self {
        let mut pll = Self {
            target_sample_rate,
            host_ticks_per_second,
            initialized: false,
            initial_anchor: None,
            syt_anchor: None,
            last_host_abs: 0,
            last_fw_ts: 0,
            current_ratio: 1.0,
            phase_error_accumulator: 0.0,
            kp: DEFAULT_KP,
            ki: DEFAULT_KI,
            integral_max: DEFAULT_INTEGRAL_MAX,
        };
        pll.reset();
        pll
    }

    pub fn set_gains(&mut self, kp: f64, ki: f64, integral_max: f64) {
        self.kp = kp;
        self.ki = ki;
        self.integral_max = integral_max;
    }

    pub fn set_sample_rate(&mut self, rate: f64) {
        if rate > 0.0 {
            self.target_sample_rate = rate;
        } else {
            warn!(rate, "ignoring invalid target sample rate");
        }
    }

    pub fn is_initialized(&self) -> bool {
        self.initialized
    }

    pub fn reset(&mut self) {
        self.initialized = false;
        self.initial_anchor = None;
        self.syt_anchor = None;
        self.last_host_abs = 0;
        self.last_fw_ts = 0;
        self.current_ratio = 1.0;
        self.phase_error_accumulator = 0.0;
        debug!("PLL state reset");
    }

    /// Seed both anchor pairs from a single host-time/cycle-time correlation (§4.10).
    pub fn initialize(&mut self, host_abs: u64, fw_ts: u32) {
        self.reset();
        self.initial_anchor = Some(InitialAnchor { host_abs, fw_ts });
        self.last_host_abs = host_abs;
        self.last_fw_ts = fw_ts;
        self.initialized = true;
        debug!(host_abs, fw_ts, "PLL initialized");
    }

    /// Anchor the SYT-based pair, called once when the first valid SYT is observed.
    /// `host_abs` is the host time at which this SYT was processed.
    pub fn update_initial_syt(
        &mut self,
        first_syt: u16,
        first_syt_fw_ts: u32,
        first_abs_sample_index: u64,
        host_abs: u64,
    ) {
        if !self.initialized {
            warn!("update_initial_syt called before initialize");
            return;
        }
        if self.syt_anchor.is_none() {
            self.syt_anchor = Some(SytAnchor {
                syt: first_syt,
                fw_ts: first_syt_fw_ts,
                abs_sample_index: first_abs_sample_index,
                host_abs,
            });
            debug!(first_syt, first_syt_fw_ts, first_abs_sample_index, "PLL initial SYT anchor captured");
        }
    }

    /// Advance the PLL with one packet's timing info (§4.10).
    pub fn update(&mut self, timing: &PacketTimingInfo, now_host_abs: u64) {
        if !self.initialized {
            if timing.fw_timestamp != 0 {
                self.initialize(now_host_abs, timing.fw_timestamp);
                if timing.syt != 0xffff {
                    self.update_initial_syt(timing.syt, timing.fw_timestamp, timing.first_abs_sample_index, now_host_abs);
                }
            } else {
                warn!("PLL update: waiting for a valid FireWire timestamp to initialize");
                return;
            }
        }

        if now_host_abs <= self.last_host_abs || timing.num_samples_in_packet == 0 {
            return;
        }

        if timing.syt != 0xffff {
            if let Some(anchor) = self.syt_anchor {
                if timing.syt != anchor.syt {
                    self.update_syt_locked(timing, now_host_abs, anchor);
                }
            }
        }

        self.last_fw_ts = timing.fw_timestamp;
        self.last_host_abs = now_host_abs;
    }

    fn update_syt_locked(&mut self, timing: &PacketTimingInfo, now_host_abs: u64, anchor: SytAnchor) {
        let samples_since = if timing.first_abs_sample_index >= anchor.abs_sample_index {
            timing.first_abs_sample_index - anchor.abs_sample_index
        } else {
            0
        };

        if samples_since == 0 || self.target_sample_rate <= 0.0 {
            return;
        }

        let expected_fw_ticks = (samples_since as f64 / self.target_sample_rate) * FW_CLOCK_HZ;

        let mut fw_ticks_delta = timing.fw_timestamp as i64 - anchor.fw_ts as i64;
        let half_second_ticks = FW_CLOCK_TICKS_PER_SECOND / 2;
        if fw_ticks_delta < -half_second_ticks {
            fw_ticks_delta += FW_CLOCK_TICKS_PER_SECOND;
        } else if fw_ticks_delta > half_second_ticks {
            fw_ticks_delta -= FW_CLOCK_TICKS_PER_SECOND;
        }

        let phase_error_ticks = fw_ticks_delta as f64 - expected_fw_ticks;

        self.phase_error_accumulator += phase_error_ticks * self.ki;
        self.phase_error_accumulator = self
            .phase_error_accumulator
            .clamp(-self.integral_max, self.integral_max);

        let host_ticks_elapsed = now_host_abs.saturating_sub(anchor.host_abs);
        let host_seconds_elapsed = self.ticks_to_nanos(host_ticks_elapsed) as f64 / 1e9;

        if host_seconds_elapsed > 1e-9 {
            let freq_error_hz = (phase_error_ticks / host_seconds_elapsed) / FW_CLOCK_HZ;
            let adjustment_factor = freq_error_hz * self.kp + self.phase_error_accumulator * self.ki;
            let new_ratio = (self.current_ratio * (1.0 + adjustment_factor)).clamp(RATIO_MIN, RATIO_MAX);
            self.current_ratio = IIR_ALPHA * new_ratio + (1.0 - IIR_ALPHA) * self.current_ratio;

            trace!(
                samples_since,
                fw_ticks_delta,
                expected_fw_ticks,
                phase_error_ticks,
                freq_error_hz,
                current_ratio = self.current_ratio,
                "PLL SYT update"
            );
        }

        self.syt_anchor = Some(SytAnchor {
            syt: timing.syt,
            fw_ts: timing.fw_timestamp,
            abs_sample_index: timing.first_abs_sample_index,
            host_abs: now_host_abs,
        });
    }

    /// Estimated host-clock presentation time, in nanoseconds, for `absolute_sample_index` (§4.10).
    pub fn presentation_time_nanos(&self, absolute_sample_index: u64) -> Result<u64, PllError> {
        if !self.initialized {
            return Err(PllError::NotInitialized);
        }

        let (anchor_host_abs, anchor_abs_sample_index) = match self.syt_anchor {
            Some(anchor) => (anchor.host_abs, anchor.abs_sample_index),
            None => (self.initial_anchor.expect("initialized implies initial_anchor").host_abs, 0),
        };

        if absolute_sample_index < anchor_abs_sample_index {
            return Ok(self.ticks_to_nanos(anchor_host_abs));
        }

        if self.target_sample_rate <= 0.0 {
            return Ok(self.ticks_to_nanos(anchor_host_abs));
        }

        let samples_since_anchor = absolute_sample_index - anchor_abs_sample_index;
        let host_ticks_per_sample_nominal = self.host_ticks_per_second as f64 / self.target_sample_rate;
        let estimated_host_tick_delta = samples_since_anchor as f64 * host_ticks_per_sample_nominal / self.current_ratio;
        let estimated_host_abs = anchor_host_abs + estimated_host_tick_delta as u64;

        Ok(self.ticks_to_nanos(estimated_host_abs))
    }

    fn ticks_to_nanos(&self, ticks: u64) -> u64 {
        if self.host_ticks_per_second == 0 {
            return 0;
        }
        (ticks as u128 * 1_000_000_000 / self.host_ticks_per_second as u128) as u64
    }
}

#[cfg(test)]
mod test {
    use super::*;

    fn timing(syt: u16, fw_timestamp: u32, first_abs_sample_index: u64, num_samples_in_packet: u32) -> PacketTimingInfo {
        PacketTimingInfo {
            fw_timestamp,
            syt,
            first_dbc: 0,
            num_samples_in_packet,
            fdf: 0x02,
            sfc: 2,
            first_abs_sample_index,
        }
    }

    #[test]
    fn presentation_time_before_any_syt_uses_the_initial_anchor() {
        let host_ticks_per_second = 1_000_000_000u64;
        let mut pll = AudioClockPll::new(48000.0, host_ticks_per_second);
        pll.initialize(1_000_000, 0);
        let t = pll.presentation_time_nanos(0).unwrap();
        assert_eq!(t, 1_000_000);
    }

    #[test]
    fn not_initialized_is_an_error() {
        let pll = AudioClockPll::new(48000.0, 1_000_000_000);
        assert_eq!(pll.presentation_time_nanos(0), Err(PllError::NotInitialized));
    }

    // E6: initialize, then steady-state SYT update holds the ratio within a
    // few ppm of 1.0 and predicts presentation time accurately.
    #[test]
    fn e6_pll_initialization_and_steady_state() {
        let host_ticks_per_second = 1_000_000_000u64; // nanosecond-resolution host clock
        let target_rate = 48000.0;
        let mut pll = AudioClockPll::new(target_rate, host_ticks_per_second);

        pll.initialize(1_000_000, 0);
        pll.update_initial_syt(0x1234, 0, 0, 1_000_000);

        // Quarter-second step: samples_since = 12,000 at 48kHz = 0.25s ->
        // expected_fw_ticks = 6,144,000, matching fw_ticks_delta exactly and
        // staying well clear of the half-second wraparound boundary.
        let now = 1_000_000 + host_ticks_per_second / 4;
        let t = timing(0x1234 + 1, 6_144_000, 12_000, 48_000);
        pll.update(&t, now);

        assert!((pll.current_ratio - 1.0).abs() < 1e-6, "ratio = {}", pll.current_ratio);

        // Query an index past the now-current SYT anchor (12,000), so the
        // estimate is driven by the anchor this update just set, not the
        // "precedes anchor" fallback.
        let presentation = pll.presentation_time_nanos(24_000).unwrap();
        let expected = now + host_ticks_per_second / 4;
        let diff = (presentation as i64 - expected as i64).abs();
        assert!(diff < 1_000, "presentation={} expected={}", presentation, expected);
    }

    #[test]
    fn update_before_any_valid_timestamp_does_not_initialize() {
        let mut pll = AudioClockPll::new(48000.0, 1_000_000_000);
        let t = timing(0xffff, 0, 0, 0);
        pll.update(&t, 500);
        assert!(!pll.is_initialized());
    }

    #[test]
    fn update_seeds_from_first_packet_with_a_nonzero_timestamp() {
        let mut pll = AudioClockPll::new(48000.0, 1_000_000_000);
        let t = timing(0x10, 12345, 0, 10);
        pll.update(&t, 42);
        assert!(pll.is_initialized());
    }
}
