// SPDX-License-Identifier: MIT
// Copyright (c) 2022 Takashi Sakamoto

use ringbuf::HeapRb;

/// Timing metadata emitted alongside every decoded (or NO_DATA) packet (§3, §4.9).
#[derive(Clone, Copy, Debug, PartialEq)]
pub struct PacketTimingInfo {
    /// DCL-completion cycle timestamp (24 bits of cycle timer).
    pub fw_timestamp: u32,
    /// 16-bit CIP SYT field, `0xFFFF` if invalid.
    pub syt: u16,
    /// Data-block counter of the first block in the packet.
    pub first_dbc: u8,
    /// Total per-channel samples decoded from this packet.
    pub num_samples_in_packet: u32,
    pub fdf: u8,
    pub sfc: u8,
    /// Running per-stream frame index of the first sample in this packet.
    pub first_abs_sample_index: u64,
}

/// One decoded stereo frame (§3).
#[derive(Clone, Copy, Debug, PartialEq)]
pub struct ProcessedSample {
    pub left: f32,
    pub right: f32,
    pub absolute_sample_index: u64,
}

/// Ring-buffer element handed to application-level consumers (§3, §4.11). Unlike
/// `ProcessedSample`, it carries a host-clock presentation time rather than a
/// stream-relative sample index, so frames need not be consumed at a fixed rate.
#[derive(Clone, Copy, Debug, PartialEq)]
pub struct ProcessedAudioFrame {
    pub left: f32,
    pub right: f32,
    pub presentation_nanos: u64,
}

/// Producer half of the output frame ring (§5: wait-free SPSC, power-of-two capacity).
pub type FrameProducer = ringbuf::HeapProd<ProcessedAudioFrame>;
/// Consumer half of the output frame ring.
pub type FrameConsumer = ringbuf::HeapCons<ProcessedAudioFrame>;

/// Build a wait-free SPSC frame ring. `capacity` is rounded up to a power of two
/// per §5/§4.11 (sized by the caller for its target buffering latency).
pub fn frame_ring(capacity: usize) -> (FrameProducer, FrameConsumer) {
    use ringbuf::traits::Split;

    let capacity = capacity.next_power_of_two().max(2);
    HeapRb::<ProcessedAudioFrame>::new(capacity).split()
}

#[cfg(test)]
mod test {
    use super::*;
    use ringbuf::traits::{Consumer, Observer, Producer};

    #[test]
    fn capacity_rounds_up_to_a_power_of_two() {
        let (prod, _cons) = frame_ring(200);
        assert_eq!(prod.capacity().get(), 256);
    }

    #[test]
    fn preserves_order_for_a_producer_consumer_pair() {
        let (mut prod, mut cons) = frame_ring(16);
        for i in 0..10u64 {
            let frame = ProcessedAudioFrame {
                left: i as f32,
                right: -(i as f32),
                presentation_nanos: i * 1000,
            };
            prod.try_push(frame).unwrap();
        }
        for i in 0..10u64 {
            let frame = cons.try_pop().unwrap();
            assert_eq!(frame.presentation_nanos, i * 1000);
            assert_eq!(frame.left, i as f32);
        }
        assert!(cons.try_pop().is_none());
    }
}
