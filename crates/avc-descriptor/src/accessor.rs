//! Descriptor accessor.
//!
//! Opens, reads, writes, creates, and deletes descriptors and info blocks,
//! building each AV/C frame directly, dispatching it through a
//! [`Ta1394Avc`] transport, and validating the response per the AV/C
//! descriptor mechanism's status and write-subfunction rules.

use avc_general::{AvcAddr, AvcCmdType, Ta1394Avc};
use std::fmt::Display;
use tracing::warn;

use crate::specifier::{DescriptorSizes, DescriptorSpecifier};

const OPCODE_READ_INFO_BLOCK: u8 = 0x06;
const OPCODE_WRITE_INFO_BLOCK: u8 = 0x07;
const OPCODE_OPEN_DESCRIPTOR: u8 = 0x08;
const OPCODE_READ_DESCRIPTOR: u8 = 0x09;
const OPCODE_WRITE_DESCRIPTOR: u8 = 0x0a;
const OPCODE_CREATE_DESCRIPTOR: u8 = 0x0c;

const SUBFUNC_OPEN_CLOSE: u8 = 0x00;
const SUBFUNC_OPEN_READ: u8 = 0x01;
const SUBFUNC_OPEN_WRITE: u8 = 0x03;
const SUBFUNC_WRITE_DELETE: u8 = 0x40;
const SUBFUNC_WRITE_PARTIAL_REPLACE: u8 = 0x50;

const STATUS_NOT_IMPLEMENTED: u8 = 0x08;
const STATUS_ACCEPTED: u8 = 0x09;
const STATUS_REJECTED: u8 = 0x0a;
const STATUS_IMPLEMENTED: u8 = 0x0c;
const STATUS_INTERIM: u8 = 0x0f;

const READ_RESULT_COMPLETE: u8 = 0x10;
const READ_RESULT_MORE_DATA: u8 = 0x11;
const READ_RESULT_TOO_LARGE: u8 = 0x12;

const MAX_READ_CHUNK_SIZE: usize = 256;
const MAX_READ_ATTEMPTS: usize = 1024;

/// Errors surfaced by [`DescriptorAccessor`] operations.
#[derive(Clone, Debug, Eq, PartialEq)]
pub enum DescriptorAccessError<T> {
    /// The underlying transport (C1) failed.
    Transport(T),
    /// Target returned `REJECTED`.
    NotPermitted,
    /// Target returned `NOT IMPLEMENTED`.
    Unsupported,
    /// Response was malformed, too short, or carried an unrecognized status.
    BadResponse,
    /// A write operation's response subfunction nibble indicated rejection.
    TargetRejected,
    /// The chunked read loop exceeded `MAX_READ_ATTEMPTS`.
    Timeout,
}

impl<T: Display> Display for DescriptorAccessError<T> {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            Self::Transport(cause) => write!(f, "transport failure: {}", cause),
            Self::NotPermitted => write!(f, "target rejected the request"),
            Self::Unsupported => write!(f, "target does not implement this command"),
            Self::BadResponse => write!(f, "malformed or unrecognized response"),
            Self::TargetRejected => write!(f, "target-side rejection of write subfunction"),
            Self::Timeout => write!(f, "chunked read did not terminate within attempt limit"),
        }
    }
}

/// Result of [`DescriptorAccessor::create`].
#[derive(Copy, Clone, Debug, Eq, PartialEq, Default)]
pub struct CreateDescriptorResult {
    pub list_id: Option<u64>,
    pub entry_position: Option<u64>,
}

fn check_status<T>(resp: &[u8]) -> Result<(), DescriptorAccessError<T>> {
    match resp.first() {
        Some(&STATUS_ACCEPTED) | Some(&STATUS_IMPLEMENTED) | Some(&STATUS_INTERIM) => Ok(()),
        Some(&STATUS_REJECTED) => Err(DescriptorAccessError::NotPermitted),
        Some(&STATUS_NOT_IMPLEMENTED) => Err(DescriptorAccessError::Unsupported),
        _ => Err(DescriptorAccessError::BadResponse),
    }
}

/// The response frame mirrors the command layout: `[status, addr, opcode,
/// ..operands]`. Operand-level parsing in this module always works on the
/// slice past those first three bytes.
fn response_operands<T>(resp: &[u8]) -> Result<&[u8], DescriptorAccessError<T>> {
    if resp.len() < 3 {
        Err(DescriptorAccessError::BadResponse)
    } else {
        Ok(&resp[3..])
    }
}

fn check_write_subfunction<T>(subfunction: u8) -> Result<(), DescriptorAccessError<T>> {
    match subfunction >> 4 {
        0 | 1 | 3 | 4 => Ok(()),
        2 => Err(DescriptorAccessError::TargetRejected),
        _ => Err(DescriptorAccessError::BadResponse),
    }
}

/// Drives descriptor and info-block access for one target address.
pub struct DescriptorAccessor<'a, A> {
    avc: &'a A,
    addr: AvcAddr,
    sizes: DescriptorSizes,
    timeout_ms: u32,
}

impl<'a, A> DescriptorAccessor<'a, A> {
    pub fn new(avc: &'a A, addr: AvcAddr, sizes: DescriptorSizes, timeout_ms: u32) -> Self {
        DescriptorAccessor {
            avc,
            addr,
            sizes,
            timeout_ms,
        }
    }
}

impl<'a, A, T> DescriptorAccessor<'a, A>
where
    A: Ta1394Avc<T>,
    T: Display + Clone,
{
    fn transact(&self, opcode: u8, operands: &[u8]) -> Result<Vec<u8>, DescriptorAccessError<T>> {
        let frame =
            A::compose_command_frame(AvcCmdType::Control, &self.addr, opcode, operands);
        self.avc
            .transaction(&frame, self.timeout_ms)
            .map_err(DescriptorAccessError::Transport)
    }

    fn open(
        &self,
        specifier: &DescriptorSpecifier,
        subfunction: u8,
    ) -> Result<(), DescriptorAccessError<T>> {
        let mut operands = vec![subfunction];
        operands.extend_from_slice(&specifier.build(&self.sizes));
        let resp = self.transact(OPCODE_OPEN_DESCRIPTOR, &operands)?;
        check_status(&resp)
    }

    pub fn open_for_read(
        &self,
        specifier: &DescriptorSpecifier,
    ) -> Result<(), DescriptorAccessError<T>> {
        self.open(specifier, SUBFUNC_OPEN_READ)
    }

    pub fn open_for_write(
        &self,
        specifier: &DescriptorSpecifier,
    ) -> Result<(), DescriptorAccessError<T>> {
        self.open(specifier, SUBFUNC_OPEN_WRITE)
    }

    pub fn close(&self, specifier: &DescriptorSpecifier) -> Result<(), DescriptorAccessError<T>> {
        self.open(specifier, SUBFUNC_OPEN_CLOSE)
    }

    /// Reads `length` bytes at `offset`, or until the target signals
    /// completion if `length == 0`. Implements the chunked read loop of
    /// §4.3: cap 256 bytes per request, terminate on `0x10`/`0x12`, continue
    /// on `0x11` unless no bytes were appended (livelock guard), fail after
    /// 1024 iterations.
    pub fn read(
        &self,
        specifier: &DescriptorSpecifier,
        offset: u64,
        length: usize,
    ) -> Result<Vec<u8>, DescriptorAccessError<T>> {
        self.chunked_read(OPCODE_READ_DESCRIPTOR, specifier, offset, length)
    }

    /// Reads an info block at the given offset within the descriptor
    /// identified by `path` (a sequence of specifiers navigating to it).
    pub fn read_info_block(
        &self,
        path: &[DescriptorSpecifier],
        offset: u64,
        length: usize,
    ) -> Result<Vec<u8>, DescriptorAccessError<T>> {
        self.chunked_read_path(OPCODE_READ_INFO_BLOCK, path, offset, length)
    }

    fn chunked_read(
        &self,
        opcode: u8,
        specifier: &DescriptorSpecifier,
        offset: u64,
        length: usize,
    ) -> Result<Vec<u8>, DescriptorAccessError<T>> {
        self.chunked_read_path(opcode, std::slice::from_ref(specifier), offset, length)
    }

    fn chunked_read_path(
        &self,
        opcode: u8,
        path: &[DescriptorSpecifier],
        offset: u64,
        length: usize,
    ) -> Result<Vec<u8>, DescriptorAccessError<T>> {
        let mut accumulator = Vec::new();
        let mut cur_offset = offset;
        let mut remaining = length;

        for _ in 0..MAX_READ_ATTEMPTS {
            let chunk = if length == 0 {
                MAX_READ_CHUNK_SIZE
            } else {
                MAX_READ_CHUNK_SIZE.min(remaining)
            };

            let mut operands = Vec::new();
            for specifier in path {
                operands.extend_from_slice(&specifier.build(&self.sizes));
            }
            operands.extend_from_slice(&(chunk as u16).to_be_bytes());
            operands.extend_from_slice(&(cur_offset as u32).to_be_bytes());

            let resp = self.transact(opcode, &operands)?;
            check_status(&resp)?;
            let fields = response_operands(&resp)?;
            if fields.is_empty() {
                return Err(DescriptorAccessError::BadResponse);
            }
            let read_result_status = fields[0];
            let payload = &fields[1..];

            let appended = payload.len();
            accumulator.extend_from_slice(payload);
            cur_offset += appended as u64;
            if length != 0 {
                remaining = remaining.saturating_sub(appended);
            }

            match read_result_status {
                READ_RESULT_COMPLETE | READ_RESULT_TOO_LARGE => {
                    return Ok(finish_read(accumulator, length, &self.sizes));
                }
                READ_RESULT_MORE_DATA => {
                    if appended == 0 {
                        return Ok(finish_read(accumulator, length, &self.sizes));
                    }
                }
                _ => return Err(DescriptorAccessError::BadResponse),
            }
        }
        Err(DescriptorAccessError::Timeout)
    }

    pub fn create(
        &self,
        subfunction: u8,
        specifier_where: &DescriptorSpecifier,
        specifier_what: &DescriptorSpecifier,
    ) -> Result<CreateDescriptorResult, DescriptorAccessError<T>> {
        let mut operands = vec![subfunction];
        operands.extend_from_slice(&specifier_where.build(&self.sizes));
        operands.extend_from_slice(&specifier_what.build(&self.sizes));
        let resp = self.transact(OPCODE_CREATE_DESCRIPTOR, &operands)?;
        check_status(&resp)?;
        let fields = response_operands(&resp)?;
        if fields.is_empty() {
            return Ok(CreateDescriptorResult::default());
        }

        let parsed = crate::specifier::parse(&fields[1..], &self.sizes);
        let result = match parsed.specifier {
            Some(DescriptorSpecifier::ListById { list_id }) => CreateDescriptorResult {
                list_id: Some(list_id),
                entry_position: None,
            },
            Some(DescriptorSpecifier::EntryByPosition {
                list_id,
                entry_position,
            }) => CreateDescriptorResult {
                list_id: Some(list_id),
                entry_position: Some(entry_position),
            },
            _ => CreateDescriptorResult::default(),
        };
        Ok(result)
    }

    pub fn delete(
        &self,
        specifier: &DescriptorSpecifier,
        group_tag: u8,
    ) -> Result<(), DescriptorAccessError<T>> {
        let mut operands = vec![SUBFUNC_WRITE_DELETE, group_tag];
        operands.extend_from_slice(&specifier.build(&self.sizes));
        let resp = self.transact(OPCODE_WRITE_DESCRIPTOR, &operands)?;
        check_status(&resp)?;
        let fields = response_operands(&resp)?;
        if fields.is_empty() {
            return Err(DescriptorAccessError::BadResponse);
        }
        check_write_subfunction(fields[0])
    }

    pub fn write_partial_replace(
        &self,
        specifier: &DescriptorSpecifier,
        offset: u64,
        original_length: u16,
        replacement: &[u8],
        group_tag: u8,
    ) -> Result<(), DescriptorAccessError<T>> {
        let mut operands = vec![SUBFUNC_WRITE_PARTIAL_REPLACE, group_tag];
        operands.extend_from_slice(&specifier.build(&self.sizes));
        operands.extend_from_slice(&(offset as u32).to_be_bytes());
        operands.extend_from_slice(&original_length.to_be_bytes());
        operands.extend_from_slice(&(replacement.len() as u16).to_be_bytes());
        operands.extend_from_slice(replacement);
        let resp = self.transact(OPCODE_WRITE_DESCRIPTOR, &operands)?;
        check_status(&resp)?;
        let fields = response_operands(&resp)?;
        if fields.is_empty() {
            return Err(DescriptorAccessError::BadResponse);
        }
        check_write_subfunction(fields[0])
    }

    pub fn write_info_block(
        &self,
        path: &[DescriptorSpecifier],
        offset: u64,
        original_length: u16,
        replacement: &[u8],
        group_tag: u8,
    ) -> Result<(), DescriptorAccessError<T>> {
        let mut operands = vec![SUBFUNC_WRITE_PARTIAL_REPLACE, group_tag];
        for specifier in path {
            operands.extend_from_slice(&specifier.build(&self.sizes));
        }
        operands.extend_from_slice(&(offset as u32).to_be_bytes());
        operands.extend_from_slice(&original_length.to_be_bytes());
        operands.extend_from_slice(&(replacement.len() as u16).to_be_bytes());
        operands.extend_from_slice(replacement);
        let resp = self.transact(OPCODE_WRITE_INFO_BLOCK, &operands)?;
        check_status(&resp)?;
        let fields = response_operands(&resp)?;
        if fields.is_empty() {
            return Err(DescriptorAccessError::BadResponse);
        }
        check_write_subfunction(fields[0])
    }
}

/// Applies the discard-and-reread fallback: if the first two bytes of the
/// accumulated body describe a self-declared length exceeding what was
/// accumulated, the caller is expected to have already re-issued the read
/// against that length (see `DescriptorAccessor::read_self_describing`).
/// Here we only apply the length trim the standard loop promises.
fn finish_read(mut accumulator: Vec<u8>, requested_length: usize, _sizes: &DescriptorSizes) -> Vec<u8> {
    if requested_length != 0 && accumulator.len() > requested_length {
        accumulator.truncate(requested_length);
    }
    accumulator
}

impl<'a, A, T> DescriptorAccessor<'a, A>
where
    A: Ta1394Avc<T>,
    T: Display + Clone,
{
    /// Reads a descriptor body tolerating targets that misreport residual
    /// length: if the first two bytes of the first chunk declare a body
    /// length exceeding what the standard status loop accumulated, discard
    /// the accumulator and re-read from offset 0 using only that
    /// self-described length as the termination criterion.
    pub fn read_self_describing(
        &self,
        specifier: &DescriptorSpecifier,
    ) -> Result<Vec<u8>, DescriptorAccessError<T>> {
        let accumulated = self.read(specifier, 0, 0)?;
        if accumulated.len() < 2 {
            return Ok(accumulated);
        }
        let declared_len = u16::from_be_bytes([accumulated[0], accumulated[1]]) as usize;
        if declared_len > accumulated.len() {
            warn!(
                declared_len,
                accumulated_len = accumulated.len(),
                "descriptor body self-described length exceeds standard read; re-reading",
            );
            self.read(specifier, 0, declared_len)
        } else {
            Ok(accumulated)
        }
    }
}

#[cfg(test)]
mod test {
    use super::*;
    use std::cell::RefCell;
    use std::collections::VecDeque;

    struct FakeAvc {
        responses: RefCell<VecDeque<Vec<u8>>>,
    }

    impl Ta1394Avc<String> for FakeAvc {
        fn transaction(&self, _command_frame: &[u8], _timeout_ms: u32) -> Result<Vec<u8>, String> {
            self.responses
                .borrow_mut()
                .pop_front()
                .ok_or_else(|| "no response queued".to_string())
        }
    }

    fn fake(responses: Vec<Vec<u8>>) -> FakeAvc {
        FakeAvc {
            responses: RefCell::new(responses.into_iter().collect()),
        }
    }

    // Response frames are `[status, addr, opcode, ..fields]`.
    fn resp(status: u8, opcode: u8, fields: &[u8]) -> Vec<u8> {
        let mut frame = vec![status, 0xff, opcode];
        frame.extend_from_slice(fields);
        frame
    }

    #[test]
    fn chunked_read_terminates_on_complete() {
        // Matches E2: first chunk more-data, second chunk complete.
        let avc = fake(vec![
            resp(
                STATUS_ACCEPTED,
                OPCODE_READ_DESCRIPTOR,
                &[READ_RESULT_MORE_DATA, 0x00, 0x0a, 0x81, 0x03, 0x00, 0x02, 0x00, 0x01],
            ),
            resp(
                STATUS_ACCEPTED,
                OPCODE_READ_DESCRIPTOR,
                &[READ_RESULT_COMPLETE, 0x00, 0x00],
            ),
        ]);
        let accessor = DescriptorAccessor::new(&avc, AvcAddr::Unit, DescriptorSizes::default(), 100);
        let specifier = DescriptorSpecifier::UnitOrSubunit;
        let result = accessor.read(&specifier, 0, 0).unwrap();
        assert_eq!(
            result,
            [0x00, 0x0a, 0x81, 0x03, 0x00, 0x02, 0x00, 0x01, 0x00, 0x00]
        );
    }

    #[test]
    fn rejected_status_maps_to_not_permitted() {
        let avc = fake(vec![resp(STATUS_REJECTED, OPCODE_OPEN_DESCRIPTOR, &[])]);
        let accessor = DescriptorAccessor::new(&avc, AvcAddr::Unit, DescriptorSizes::default(), 100);
        let err = accessor
            .open_for_read(&DescriptorSpecifier::UnitOrSubunit)
            .unwrap_err();
        assert_eq!(err, DescriptorAccessError::NotPermitted);
    }

    #[test]
    fn not_implemented_status_maps_to_unsupported() {
        let avc = fake(vec![resp(STATUS_NOT_IMPLEMENTED, OPCODE_OPEN_DESCRIPTOR, &[])]);
        let accessor = DescriptorAccessor::new(&avc, AvcAddr::Unit, DescriptorSizes::default(), 100);
        let err = accessor
            .open_for_read(&DescriptorSpecifier::UnitOrSubunit)
            .unwrap_err();
        assert_eq!(err, DescriptorAccessError::Unsupported);
    }

    #[test]
    fn write_subfunction_target_rejection() {
        // High nibble 2 of the echoed subfunction byte means target-side rejection.
        let avc = fake(vec![resp(STATUS_ACCEPTED, OPCODE_WRITE_DESCRIPTOR, &[0x20])]);
        let accessor = DescriptorAccessor::new(&avc, AvcAddr::Unit, DescriptorSizes::default(), 100);
        let err = accessor
            .delete(&DescriptorSpecifier::UnitOrSubunit, 0)
            .unwrap_err();
        assert_eq!(err, DescriptorAccessError::TargetRejected);
    }

    #[test]
    fn livelock_guard_on_zero_byte_more_data() {
        let avc = fake(vec![resp(
            STATUS_ACCEPTED,
            OPCODE_READ_DESCRIPTOR,
            &[READ_RESULT_MORE_DATA, 0x00],
        )]);
        let accessor = DescriptorAccessor::new(&avc, AvcAddr::Unit, DescriptorSizes::default(), 100);
        let result = accessor
            .read(&DescriptorSpecifier::UnitOrSubunit, 0, 0)
            .unwrap();
        assert!(result.is_empty());
    }

    #[test]
    fn timeout_after_max_attempts() {
        let mut responses = Vec::new();
        for _ in 0..MAX_READ_ATTEMPTS {
            responses.push(resp(
                STATUS_ACCEPTED,
                OPCODE_READ_DESCRIPTOR,
                &[READ_RESULT_MORE_DATA, 0xaa],
            ));
        }
        let avc = fake(responses);
        let accessor = DescriptorAccessor::new(&avc, AvcAddr::Unit, DescriptorSizes::default(), 100);
        let err = accessor
            .read(&DescriptorSpecifier::UnitOrSubunit, 0, 0)
            .unwrap_err();
        assert_eq!(err, DescriptorAccessError::Timeout);
    }
}
