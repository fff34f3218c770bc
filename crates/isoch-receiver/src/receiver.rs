// SPDX-License-Identifier: MIT
// Copyright (c) 2022 Takashi Sakamoto

//! Receiver lifecycle and per-group packet pump (§4.11).

use std::convert::TryInto;
use std::sync::Mutex;

use amdtp_stream::{
    frame_ring, BufferManager, DclProgram, DclProgramConfig, FrameConsumer, FrameProducer,
    PacketInput, PacketProcessor, ProcessedAudioFrame,
};
use audio_clock_pll::AudioClockPll;
use tracing::{debug, error, info, warn};

use crate::error::IsochError;
use crate::os_port::OsIsochPort;

/// Construction parameters for one receive session (§4.7, §4.8, §4.10, §4.11).
#[derive(Clone, Copy, Debug)]
pub struct ReceiverConfig {
    pub num_groups: u32,
    pub packets_per_group: u32,
    pub packet_data_size: usize,
    pub callback_group_interval: u32,
    pub target_sample_rate: f64,
    pub no_data_timeout_ms: u64,
    /// Rounded up to a power of two; sized for the caller's target buffering
    /// latency (spec guidance: at least 200 ms of audio).
    pub ring_capacity: usize,
}

impl Default for ReceiverConfig {
    fn default() -> Self {
        Self {
            num_groups: 8,
            packets_per_group: 16,
            packet_data_size: 4 * 8, // 8 AM824 quadlets/block, matches a typical 2-channel stream
            callback_group_interval: 1,
            target_sample_rate: 48_000.0,
            no_data_timeout_ms: 200,
            ring_capacity: 16_384,
        }
    }
}

/// Status messages the client receives alongside processed data (§4.11, §7).
#[derive(Clone, Copy, Debug, PartialEq)]
pub enum ReceiverMessage {
    Overrun,
    DbcDiscontinuity { lost_frames: u64 },
    NoDataTimeout { last_fw_timestamp: u32 },
    TransportStarted,
    TransportStopped,
}

#[derive(Clone, Copy, Debug, Eq, PartialEq)]
enum Phase {
    Uninitialized,
    Initialized,
    Running,
}

struct Session<P: OsIsochPort> {
    os_port: P,
    buffer: BufferManager,
    dcl_program: DclProgram<P::DclHandle>,
    pll: AudioClockPll,
    host_ticks_per_second: u64,
    producer: FrameProducer,
    last_activity_host_abs: u64,
    last_fw_timestamp: u32,
}

struct State<P: OsIsochPort> {
    phase: Phase,
    processor: PacketProcessor,
    session: Option<Session<P>>,
    consumer: Option<FrameConsumer>,
    message_callback: Option<Box<dyn FnMut(ReceiverMessage) + Send>>,
    group_listener: Option<Box<dyn FnMut(u32) + Send>>,
}

/// Orchestrates the receive path end to end: buffer allocation, DCL program
/// construction, per-packet decode, PLL timestamping, and the output ring
/// buffer. Lifecycle operations are serialized by a single internal mutex,
/// which also covers the completion/overrun callbacks since this crate has
/// no thread of its own — the injected [`OsIsochPort`] owns the isoch thread
/// and is expected to call back into this type from it alone.
pub struct IsochReceiver<P: OsIsochPort> {
    config: ReceiverConfig,
    state: Mutex<State<P>>,
}

impl<P: OsIsochPort> IsochReceiver<P> {
    pub fn new(config: ReceiverConfig) -> Self {
        Self {
            config,
            state: Mutex::new(State {
                phase: Phase::Uninitialized,
                processor: PacketProcessor::new(),
                session: None,
                consumer: None,
                message_callback: None,
                group_listener: None,
            }),
        }
    }

    pub fn set_message_callback<F>(&self, callback: F)
    where
        F: FnMut(ReceiverMessage) + Send + 'static,
    {
        self.state.lock().unwrap().message_callback = Some(Box::new(callback));
    }

    pub fn set_group_listener<F>(&self, listener: F)
    where
        F: FnMut(u32) + Send + 'static,
    {
        self.state.lock().unwrap().group_listener = Some(Box::new(listener));
    }

    /// Takes ownership of the consumer half of the output ring buffer. Returns
    /// `None` if already taken or the receiver has not been initialized.
    pub fn take_consumer(&self) -> Option<FrameConsumer> {
        self.state.lock().unwrap().consumer.take()
    }

    /// Borrow the DMA buffer to write packet bytes into it (§5: the orchestrator
    /// owns the buffer; the OS driver only borrows it for the session's
    /// duration). Returns `None` before `initialize`.
    pub fn with_buffer_mut<R>(&self, f: impl FnOnce(&mut BufferManager) -> R) -> Option<R> {
        let mut state = self.state.lock().unwrap();
        state.session.as_mut().map(|session| f(&mut session.buffer))
    }

    /// Acquire a pool/port/channel from `os_port`, allocate buffers, build the
    /// DCL program, create the packet processor, PLL, and output ring buffer,
    /// and attempt to seed the PLL from the port's atomic cycle-time/host-uptime
    /// primitive (§4.11 step 1).
    pub fn initialize(&self, mut os_port: P) -> Result<(), IsochError<P::Error>> {
        let mut state = self.state.lock().unwrap();
        if state.phase != Phase::Uninitialized {
            return Err(IsochError::AlreadyInitialized);
        }

        let buffer = BufferManager::new(
            self.config.num_groups,
            self.config.packets_per_group,
            self.config.packet_data_size,
        )?;

        let mut dcl_program = DclProgram::new(DclProgramConfig {
            num_groups: self.config.num_groups,
            packets_per_group: self.config.packets_per_group,
            callback_group_interval: self.config.callback_group_interval,
        });
        dcl_program.build(&buffer, &mut os_port)?;

        let host_ticks_per_second = os_port.host_ticks_per_second();
        let mut pll = AudioClockPll::new(self.config.target_sample_rate, host_ticks_per_second);
        let (host_abs, fw_ts) = os_port.now();
        pll.initialize(host_abs, fw_ts);

        let (producer, consumer) = frame_ring(self.config.ring_capacity);

        state.session = Some(Session {
            os_port,
            buffer,
            dcl_program,
            pll,
            host_ticks_per_second,
            producer,
            last_activity_host_abs: host_abs,
            last_fw_timestamp: fw_ts,
        });
        state.consumer = Some(consumer);
        state.processor = PacketProcessor::new();
        state.phase = Phase::Initialized;

        info!("isoch receiver initialized");
        Ok(())
    }

    pub fn configure(&self, speed: u32, channel: u32) -> Result<(), IsochError<P::Error>> {
        let mut state = self.state.lock().unwrap();
        if state.phase == Phase::Uninitialized {
            return Err(IsochError::NotInitialized);
        }
        if state.phase == Phase::Running {
            return Err(IsochError::Busy);
        }
        let session = state.session.as_mut().ok_or(IsochError::NotInitialized)?;
        session.os_port.configure(speed, channel).map_err(IsochError::Port)
    }

    /// Fix up DCL jump targets against the now-known local port, then start
    /// the transport (§4.11 step 3).
    pub fn start_receive(&self) -> Result<(), IsochError<P::Error>> {
        let mut state = self.state.lock().unwrap();
        if state.phase == Phase::Uninitialized {
            return Err(IsochError::NotInitialized);
        }
        if state.phase == Phase::Running {
            return Err(IsochError::Busy);
        }
        let session = state.session.as_mut().ok_or(IsochError::NotInitialized)?;
        session.dcl_program.fixup_jumps(&mut session.os_port)?;
        session.os_port.start().map_err(IsochError::Port)?;

        let (host_abs, fw_ts) = session.os_port.now();
        session.last_activity_host_abs = host_abs;
        session.last_fw_timestamp = fw_ts;

        state.phase = Phase::Running;
        Self::notify(&mut state.message_callback, ReceiverMessage::TransportStarted);
        info!("isoch receive started");
        Ok(())
    }

    /// Stop the transport, using the same lock order as `start_receive` (§4.11
    /// step 3, §5 cancellation).
    pub fn stop_receive(&self) -> Result<(), IsochError<P::Error>> {
        let mut state = self.state.lock().unwrap();
        if state.phase != Phase::Running {
            return Err(IsochError::Busy);
        }
        let session = state.session.as_mut().ok_or(IsochError::NotInitialized)?;
        session.os_port.stop().map_err(IsochError::Port)?;

        state.phase = Phase::Initialized;
        Self::notify(&mut state.message_callback, ReceiverMessage::TransportStopped);
        info!("isoch receive stopped");
        Ok(())
    }

    /// Buffer-group completion callback (§4.11 step 4): decode every packet in
    /// the group, timestamp the resulting frames, and push them to the ring.
    pub fn handle_group_complete(&self, group_index: u32) -> Result<(), IsochError<P::Error>> {
        let mut state = self.state.lock().unwrap();
        if state.phase != Phase::Running {
            return Ok(());
        }

        let State {
            session,
            processor,
            message_callback,
            group_listener,
            ..
        } = &mut *state;
        let session = session.as_mut().ok_or(IsochError::NotInitialized)?;

        let (now_host_abs, _) = session.os_port.now();
        let packets_per_group = self.config.packets_per_group as usize;
        let start = group_index as usize * packets_per_group;

        for packet_index in start..start + packets_per_group {
            let isoch_header: [u8; 4] = session
                .buffer
                .isoch_header_slice(packet_index)?
                .try_into()
                .expect("isoch header slot is exactly 4 bytes");
            let cip_header: [u8; 8] = session
                .buffer
                .cip_header_slice(packet_index)?
                .try_into()
                .expect("CIP header slot is exactly 8 bytes");
            let timestamp_bytes: [u8; 4] = session
                .buffer
                .timestamp_slice(packet_index)?
                .try_into()
                .expect("timestamp slot is exactly 4 bytes");
            let fw_timestamp = u32::from_be_bytes(timestamp_bytes);
            let data = session.buffer.packet_data_slice(packet_index)?;

            let input = PacketInput {
                isoch_header,
                cip_header,
                data,
                fw_timestamp,
            };

            for processed in processor.process_packet(&input) {
                if let Some(lost_frames) = processed.lost_frames {
                    Self::notify(message_callback, ReceiverMessage::DbcDiscontinuity { lost_frames });
                }

                // The zero-sample seed record emitted once per session (see
                // `PacketProcessor`) is also the PLL's one chance to anchor its
                // SYT pair; `update_initial_syt` is a no-op once already seeded.
                if processed.timing.num_samples_in_packet == 0 && processed.timing.syt != 0xffff {
                    session.pll.update_initial_syt(
                        processed.timing.syt,
                        processed.timing.fw_timestamp,
                        processed.timing.first_abs_sample_index,
                        now_host_abs,
                    );
                }

                session.pll.update(&processed.timing, now_host_abs);

                for sample in &processed.samples {
                    let presentation_nanos = match session.pll.presentation_time_nanos(sample.absolute_sample_index) {
                        Ok(nanos) => nanos,
                        Err(cause) => {
                            warn!(?cause, "dropping frame, PLL not ready to timestamp it");
                            continue;
                        }
                    };

                    let frame = ProcessedAudioFrame {
                        left: sample.left,
                        right: sample.right,
                        presentation_nanos,
                    };
                    if session.producer.try_push(frame).is_err() {
                        warn!("output ring buffer full, dropping frame");
                    }
                }
            }

            session.last_activity_host_abs = now_host_abs;
            session.last_fw_timestamp = fw_timestamp;
        }

        if let Some(listener) = group_listener {
            listener(group_index);
        }

        Ok(())
    }

    /// Overrun callback (§4.11 step 5, §7): stop, fix up jumps, restart.
    /// Recovered overrun is surfaced as a message, not an error; a failed
    /// recovery step is propagated and the receiver is left stopped.
    pub fn handle_overrun(&self) -> Result<(), IsochError<P::Error>> {
        let mut state = self.state.lock().unwrap();
        if state.phase != Phase::Running {
            return Err(IsochError::Busy);
        }
        error!("isoch buffer overrun detected");
        state.processor.handle_overrun();

        let session = state.session.as_mut().ok_or(IsochError::NotInitialized)?;
        let recovery = (|| -> Result<(), IsochError<P::Error>> {
            session.os_port.stop().map_err(IsochError::Port)?;
            session.dcl_program.fixup_jumps(&mut session.os_port)?;
            session.os_port.start().map_err(IsochError::Port)?;
            Ok(())
        })();

        match recovery {
            Ok(()) => {
                let (host_abs, fw_ts) = session.os_port.now();
                session.last_activity_host_abs = host_abs;
                session.last_fw_timestamp = fw_ts;
                Self::notify(&mut state.message_callback, ReceiverMessage::Overrun);
                Ok(())
            }
            Err(cause) => {
                error!("overrun recovery failed, stopping receiver");
                state.phase = Phase::Initialized;
                Err(cause)
            }
        }
    }

    /// Fire the no-data message if `timeout_ms` elapsed since the last packet,
    /// then re-arm. Intended to be driven by an externally-scheduled timer
    /// source (§5: cancellation/timeouts), since timer scheduling is itself an
    /// OS service out of this crate's scope.
    pub fn poll_no_data_timeout(&self, now_host_abs: u64) {
        let mut state = self.state.lock().unwrap();
        if state.phase != Phase::Running {
            return;
        }
        let config = self.config;
        let State {
            session,
            message_callback,
            ..
        } = &mut *state;
        let session = match session.as_mut() {
            Some(session) => session,
            None => return,
        };

        let timeout_ticks = config.no_data_timeout_ms.saturating_mul(session.host_ticks_per_second) / 1000;
        let elapsed = now_host_abs.saturating_sub(session.last_activity_host_abs);
        if elapsed >= timeout_ticks {
            debug!(last_fw_timestamp = session.last_fw_timestamp, "no-data timeout");
            Self::notify(
                message_callback,
                ReceiverMessage::NoDataTimeout {
                    last_fw_timestamp: session.last_fw_timestamp,
                },
            );
            session.last_activity_host_abs = now_host_abs;
        }
    }

    fn notify(callback: &mut Option<Box<dyn FnMut(ReceiverMessage) + Send>>, message: ReceiverMessage) {
        if let Some(callback) = callback {
            callback(message);
        }
    }
}

#[cfg(test)]
mod test {
    use super::*;
    use amdtp_stream::DclDescriptor;
    use ringbuf::traits::Consumer;
    use std::cell::Cell;
    use std::rc::Rc;
    use std::sync::{Arc, Mutex as StdMutex};

    #[derive(Debug)]
    struct FakeError;

    impl std::fmt::Display for FakeError {
        fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
            write!(f, "fake port error")
        }
    }

    struct FakePort {
        next_handle: u32,
        running: bool,
        now_host_abs: Cell<u64>,
        host_ticks_per_second: u64,
        fail_start: Rc<Cell<bool>>,
    }

    impl FakePort {
        fn new(host_abs: u64, host_ticks_per_second: u64) -> Self {
            Self {
                next_handle: 0,
                running: false,
                now_host_abs: Cell::new(host_abs),
                host_ticks_per_second,
                fail_start: Rc::new(Cell::new(false)),
            }
        }

        fn with_fail_start_flag(host_abs: u64, host_ticks_per_second: u64) -> (Self, Rc<Cell<bool>>) {
            let port = Self::new(host_abs, host_ticks_per_second);
            let flag = port.fail_start.clone();
            (port, flag)
        }
    }

    impl amdtp_stream::DclPool for FakePort {
        type DclHandle = u32;
        type Error = FakeError;

        fn allocate_receive_dcl(&mut self, _descriptor: &DclDescriptor) -> Result<u32, FakeError> {
            let handle = self.next_handle;
            self.next_handle += 1;
            Ok(handle)
        }

        fn link(&mut self, _from: u32, _to: u32) -> Result<(), FakeError> {
            Ok(())
        }

        fn set_completion_callback(&mut self, _dcl: u32, _group_index: u32) -> Result<(), FakeError> {
            Ok(())
        }

        fn notify_jump_update(&mut self, _dcl: u32) -> Result<(), FakeError> {
            Ok(())
        }
    }

    impl OsIsochPort for FakePort {
        fn configure(&mut self, _speed: u32, _channel: u32) -> Result<(), FakeError> {
            Ok(())
        }

        fn active_channel(&self) -> Result<u32, FakeError> {
            Ok(0)
        }

        fn start(&mut self) -> Result<(), FakeError> {
            if self.fail_start.get() {
                return Err(FakeError);
            }
            self.running = true;
            Ok(())
        }

        fn stop(&mut self) -> Result<(), FakeError> {
            self.running = false;
            Ok(())
        }

        fn now(&self) -> (u64, u32) {
            (self.now_host_abs.get(), 0)
        }

        fn host_ticks_per_second(&self) -> u64 {
            self.host_ticks_per_second
        }
    }

    fn small_config() -> ReceiverConfig {
        ReceiverConfig {
            num_groups: 1,
            packets_per_group: 1,
            packet_data_size: 32, // dbs=8 -> 32 bytes/block, 1 block -> 8 samples -> 4 stereo frames
            callback_group_interval: 1,
            target_sample_rate: 48_000.0,
            no_data_timeout_ms: 50,
            ring_capacity: 16,
        }
    }

    fn cip_bytes(dbs: u8, dbc: u8, fmt: u8, fdf: u8, syt: u16) -> [u8; 8] {
        let quad0 = (dbs as u32) << 16 | dbc as u32;
        let quad1 = ((fmt as u32 & 0x3f) << 24) | ((fdf as u32) << 16) | syt as u32;
        let mut out = [0u8; 8];
        out[0..4].copy_from_slice(&quad0.to_be_bytes());
        out[4..8].copy_from_slice(&quad1.to_be_bytes());
        out
    }

    #[test]
    fn lifecycle_runs_start_then_stop() {
        let receiver: IsochReceiver<FakePort> = IsochReceiver::new(small_config());
        receiver.initialize(FakePort::new(1_000_000, 1_000_000_000)).unwrap();
        receiver.configure(100, 0).unwrap();
        receiver.start_receive().unwrap();
        receiver.stop_receive().unwrap();
    }

    #[test]
    fn start_before_initialize_is_an_error() {
        let receiver: IsochReceiver<FakePort> = IsochReceiver::new(small_config());
        assert!(matches!(receiver.start_receive(), Err(IsochError::NotInitialized)));
    }

    #[test]
    fn configure_while_running_is_busy() {
        let receiver: IsochReceiver<FakePort> = IsochReceiver::new(small_config());
        receiver.initialize(FakePort::new(0, 1_000_000_000)).unwrap();
        receiver.start_receive().unwrap();
        assert!(matches!(receiver.configure(100, 0), Err(IsochError::Busy)));
    }

    #[test]
    fn group_complete_before_running_is_a_noop() {
        let receiver: IsochReceiver<FakePort> = IsochReceiver::new(small_config());
        receiver.initialize(FakePort::new(0, 1_000_000_000)).unwrap();
        assert!(receiver.handle_group_complete(0).is_ok());
    }

    #[test]
    fn group_complete_decodes_and_pushes_frames() {
        let receiver: IsochReceiver<FakePort> = IsochReceiver::new(small_config());
        receiver.initialize(FakePort::new(1_000_000, 1_000_000_000)).unwrap();
        receiver.configure(100, 0).unwrap();
        receiver.start_receive().unwrap();

        receiver.with_buffer_mut(|buffer| {
            let iso_off = buffer.isoch_header_offset(0).unwrap();
            let cip_off = buffer.cip_header_offset(0).unwrap();
            let data_off = buffer.packet_data_offset(0).unwrap();
            let ts_off = buffer.timestamp_offset(0).unwrap();
            let cip = cip_bytes(8, 0, 0x10, 0x02, 0x1234);
            buffer.dma_range_mut()[iso_off..iso_off + 4].copy_from_slice(&[0u8; 4]);
            buffer.dma_range_mut()[cip_off..cip_off + 8].copy_from_slice(&cip);
            buffer.dma_range_mut()[data_off..data_off + 32].copy_from_slice(&[0u8; 32]);
            buffer.dma_range_mut()[ts_off..ts_off + 4].copy_from_slice(&100u32.to_be_bytes());
        });

        receiver.handle_group_complete(0).unwrap();

        let mut consumer = receiver.take_consumer().unwrap();
        let mut count = 0;
        while consumer.try_pop().is_some() {
            count += 1;
        }
        assert_eq!(count, 4);
    }

    #[test]
    fn overrun_recovery_notifies_and_stays_running() {
        let receiver: IsochReceiver<FakePort> = IsochReceiver::new(small_config());
        receiver.initialize(FakePort::new(0, 1_000_000_000)).unwrap();
        receiver.start_receive().unwrap();

        let messages = Arc::new(StdMutex::new(Vec::new()));
        let sink = messages.clone();
        receiver.set_message_callback(move |msg| sink.lock().unwrap().push(msg));

        receiver.handle_overrun().unwrap();

        assert_eq!(*messages.lock().unwrap(), vec![ReceiverMessage::Overrun]);
    }

    #[test]
    fn overrun_recovery_failure_stops_the_receiver_and_propagates() {
        let receiver: IsochReceiver<FakePort> = IsochReceiver::new(small_config());
        let (port, fail_start) = FakePort::with_fail_start_flag(0, 1_000_000_000);
        receiver.initialize(port).unwrap();
        receiver.start_receive().unwrap();

        fail_start.set(true);
        assert!(receiver.handle_overrun().is_err());
        assert!(matches!(receiver.configure(100, 0), Ok(())));
    }

    #[test]
    fn no_data_timeout_fires_once_elapsed_and_rearms() {
        let receiver: IsochReceiver<FakePort> = IsochReceiver::new(small_config());
        receiver.initialize(FakePort::new(0, 1_000_000_000)).unwrap();
        receiver.start_receive().unwrap();

        let messages = Arc::new(StdMutex::new(Vec::new()));
        let sink = messages.clone();
        receiver.set_message_callback(move |msg| sink.lock().unwrap().push(msg));

        receiver.poll_no_data_timeout(10_000_000); // 10ms, below the 50ms timeout
        assert!(messages.lock().unwrap().is_empty());

        receiver.poll_no_data_timeout(60_000_000); // 60ms, past the 50ms timeout
        assert_eq!(
            *messages.lock().unwrap(),
            vec![ReceiverMessage::NoDataTimeout { last_fw_timestamp: 0 }]
        );
    }
}
