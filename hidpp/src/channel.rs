//! Defines the boundary to the underlying HID transport.
//!
//! This crate does not talk to HID devices itself. Every transport capable of
//! writing and reading raw reports can be bridged by implementing
//! [`RawHidChannel`].

use std::{collections::VecDeque, error::Error};

use thiserror::Error;

/// Represents an arbitrary HID communication channel that is both readable and
/// writable.
///
/// Both operations are synchronous. Timeouts, if any, are the responsibility
/// of the implementation.
pub trait RawHidChannel {
    /// An implementation-specific error type.
    type Error: Error;

    /// Writes a raw report to the channel.
    ///
    /// Returns the exact amount of written bytes on success.
    fn write_report(&mut self, src: &[u8]) -> Result<usize, Self::Error>;

    /// Reads a single raw report from the channel.
    ///
    /// If the buffer is not large enough to fit the whole report, its remainder
    /// should be discarded and must not be returned by any succeeding call to
    /// [`Self::read_report`].
    ///
    /// Returns the exact amount of read bytes on success.
    fn read_report(&mut self, buf: &mut [u8]) -> Result<usize, Self::Error>;
}

impl<T: RawHidChannel + ?Sized> RawHidChannel for &mut T {
    type Error = T::Error;

    fn write_report(&mut self, src: &[u8]) -> Result<usize, Self::Error> {
        (**self).write_report(src)
    }

    fn read_report(&mut self, buf: &mut [u8]) -> Result<usize, Self::Error> {
        (**self).read_report(buf)
    }
}

/// A channel returning every written report unchanged on the next read.
///
/// Useful for testing the message layer without any device attached.
#[derive(Clone, Default, Debug)]
pub struct Loopback {
    /// Written reports that were not read back yet.
    queue: VecDeque<Vec<u8>>,
}

impl Loopback {
    pub fn new() -> Self {
        Self::default()
    }

    /// The amount of written reports waiting to be read back.
    pub fn pending(&self) -> usize {
        self.queue.len()
    }
}

impl RawHidChannel for Loopback {
    type Error = LoopbackError;

    fn write_report(&mut self, src: &[u8]) -> Result<usize, Self::Error> {
        self.queue.push_back(src.to_vec());
        Ok(src.len())
    }

    fn read_report(&mut self, buf: &mut [u8]) -> Result<usize, Self::Error> {
        let report = self.queue.pop_front().ok_or(LoopbackError::NothingWritten)?;

        let len = report.len().min(buf.len());
        buf[..len].copy_from_slice(&report[..len]);
        Ok(len)
    }
}

/// Represents an error returned by the [`Loopback`] channel.
#[derive(Clone, Copy, PartialEq, Eq, Debug, Error)]
pub enum LoopbackError {
    /// Indicates that a report was read before any report was written.
    #[error("no report was written that could be read back")]
    NothingWritten,
}
