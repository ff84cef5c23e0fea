//! Implements the HID++2.0 protocol driver issuing commands to a single
//! device.

use std::error::Error;

use thiserror::Error;
use tracing::{debug, trace, warn};

use crate::{
    channel::RawHidChannel,
    message::{ErrorCode, Message, MessageError, MessageHeader},
    nibble::U4,
    report::{self, MAX_REPORT_LENGTH, SHORT_REPORT_ID},
};

/// The software ID used if none is configured.
///
/// `0x0` is avoided as devices use it for notifications they send on their
/// own.
pub const DEFAULT_SW_ID: U4 = U4::from_lo(0x1);

/// Configures the behavior of a [`Driver`].
#[derive(Clone, Copy, PartialEq, Eq, Hash, Debug)]
pub struct DriverConfig {
    /// The report ID used for outgoing requests.
    ///
    /// Defaults to short reports, which every HID++2.0 device supports.
    pub report_id: u8,

    /// Whether the header of every reply has to match the header of the
    /// request it answers.
    ///
    /// If disabled, any well-formed report read after sending a request is
    /// accepted as its reply.
    pub verify_replies: bool,

    /// Whether error responses of the device are turned into
    /// [`DriverError::Device`].
    ///
    /// If disabled, error responses are returned like any other reply.
    pub detect_errors: bool,

    /// Whether the software ID advances after every command, cycling through
    /// `0x1..=0xf`.
    ///
    /// This eases telling replies of consecutive requests apart.
    pub rotate_sw_id: bool,
}

impl Default for DriverConfig {
    fn default() -> Self {
        Self {
            report_id: SHORT_REPORT_ID,
            verify_replies: false,
            detect_errors: true,
            rotate_sw_id: false,
        }
    }
}

/// Represents a HID++2.0 device reachable via a [`RawHidChannel`].
///
/// Every command borrows the driver mutably, so a request and the read of its
/// reply are never interleaved with another command of the same driver.
/// Drivers sharing a single physical channel must be serialized by the
/// channel implementation.
#[derive(Debug)]
pub struct Driver<T: RawHidChannel> {
    /// The underlying raw HID channel.
    chan: T,

    /// The index of the device on the channel.
    device_index: u8,

    /// The software ID included in every request.
    sw_id: U4,

    config: DriverConfig,
}

impl<T: RawHidChannel> Driver<T> {
    /// Creates a driver for the device with the given index using the default
    /// configuration.
    pub fn new(chan: T, device_index: u8) -> Self {
        Self {
            chan,
            device_index,
            sw_id: DEFAULT_SW_ID,
            config: DriverConfig::default(),
        }
    }

    /// Creates a driver using a custom configuration.
    ///
    /// Returns [`MessageError::UnknownReportId`] if the configured report ID
    /// is not part of the report size table.
    pub fn with_config(
        chan: T,
        device_index: u8,
        config: DriverConfig,
    ) -> Result<Self, MessageError> {
        if report::report_length(config.report_id).is_none() {
            return Err(MessageError::UnknownReportId(config.report_id));
        }

        Ok(Self {
            config,
            ..Self::new(chan, device_index)
        })
    }

    /// The index of the device on the channel.
    pub fn device_index(&self) -> u8 {
        self.device_index
    }

    /// The software ID the next request will carry.
    pub fn sw_id(&self) -> U4 {
        self.sw_id
    }

    /// Sets the software ID included in subsequent requests.
    pub fn set_sw_id(&mut self, sw_id: U4) {
        self.sw_id = sw_id;
    }

    pub fn config(&self) -> &DriverConfig {
        &self.config
    }

    /// Gives access to the underlying channel.
    pub fn channel(&mut self) -> &mut T {
        &mut self.chan
    }

    /// Consumes the driver, returning the underlying channel.
    pub fn into_channel(self) -> T {
        self.chan
    }

    /// Sends a message to the device and reads its reply.
    ///
    /// This is a single write followed by a single read. Nothing is retried.
    /// Whether the reply is checked against the request depends on
    /// [`DriverConfig::verify_replies`] and [`DriverConfig::detect_errors`].
    pub fn command(&mut self, msg: &Message) -> Result<Message, DriverError<T::Error>> {
        let raw = msg.to_bytes();
        trace!(report = ?raw, "writing report");
        let written = self.chan.write_report(&raw).map_err(DriverError::Channel)?;
        if written != raw.len() {
            return Err(DriverError::IncompleteWrite {
                expected: raw.len(),
                actual: written,
            });
        }

        // The request is on the wire, so its software ID is spent even if no
        // reply arrives.
        if self.config.rotate_sw_id {
            self.sw_id = match self.sw_id.wrapping_next() {
                U4::MIN => DEFAULT_SW_ID,
                next => next,
            };
        }

        let mut buf = [0u8; MAX_REPORT_LENGTH];
        let len = self.chan.read_report(&mut buf).map_err(DriverError::Channel)?;
        trace!(report = ?&buf[..len], "read report");

        let reply = Message::from_bytes(&buf[..len])?;

        if self.config.detect_errors {
            if let Some(err) = reply.error_reply() {
                warn!(
                    feature_index = err.feature_index,
                    function_id = %err.function_id,
                    code = ?err.code,
                    "device returned an error response"
                );
                return Err(DriverError::Device {
                    feature_index: err.feature_index,
                    function_id: err.function_id,
                    code: err.code,
                });
            }
        }

        if self.config.verify_replies && reply.header() != msg.header() {
            warn!(sent = ?msg.header(), received = ?reply.header(), "reply does not match request");
            return Err(DriverError::UnexpectedReply {
                sent: msg.header(),
                received: reply.header(),
            });
        }

        debug!(%reply, "command completed");
        Ok(reply)
    }
}

/// Represents an error that occurred while issuing a command to a device.
#[derive(Debug, Error)]
pub enum DriverError<E: Error> {
    /// Indicates that the [`RawHidChannel`] implementation returned an error.
    #[error("the HID channel implementation returned an error")]
    Channel(#[source] E),

    /// Indicates that the channel accepted fewer bytes than the report holds.
    #[error("only {actual} of {expected} report bytes were written")]
    IncompleteWrite { expected: usize, actual: usize },

    /// Indicates that a message could not be constructed or a reply could not
    /// be decoded.
    #[error("malformed HID++ message")]
    Message(#[from] MessageError),

    /// Indicates that the device answered with an error response.
    #[error("the device rejected the request to feature index {feature_index:#04x}, function {function_id}: {code:?}")]
    Device {
        feature_index: u8,
        function_id: U4,
        code: ErrorCode,
    },

    /// Indicates that the reply does not belong to the sent request.
    #[error("received a reply not matching the request")]
    UnexpectedReply {
        sent: MessageHeader,
        received: MessageHeader,
    },
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::channel::{Loopback, LoopbackError};

    fn request(driver: &Driver<Loopback>, args: &[u8]) -> Message {
        Message::new(
            driver.config().report_id,
            driver.device_index(),
            0x00,
            U4::from_lo(1),
            driver.sw_id(),
            args,
        )
        .unwrap()
    }

    #[test]
    fn loopback_command_returns_the_request() {
        let mut driver = Driver::new(Loopback::new(), 0x02);
        let msg = request(&driver, &[0xaa, 0xbb, 0xcc]);

        assert_eq!(driver.command(&msg).unwrap(), msg);
    }

    #[test]
    fn rejects_unknown_report_ids_in_config() {
        let config = DriverConfig {
            report_id: 0x20,
            ..Default::default()
        };
        assert_eq!(
            Driver::with_config(Loopback::new(), 0x01, config).err(),
            Some(MessageError::UnknownReportId(0x20))
        );
    }

    #[test]
    fn surfaces_channel_errors() {
        struct WriteOnly;

        impl RawHidChannel for WriteOnly {
            type Error = LoopbackError;

            fn write_report(&mut self, src: &[u8]) -> Result<usize, Self::Error> {
                Ok(src.len())
            }

            fn read_report(&mut self, _: &mut [u8]) -> Result<usize, Self::Error> {
                Err(LoopbackError::NothingWritten)
            }
        }

        let mut driver = Driver::new(WriteOnly, 0x01);
        let msg = Message::new(SHORT_REPORT_ID, 0x01, 0, U4::MIN, U4::MIN, &[]).unwrap();
        assert!(matches!(
            driver.command(&msg),
            Err(DriverError::Channel(LoopbackError::NothingWritten))
        ));
    }

    #[test]
    fn rotates_sw_id_skipping_zero() {
        let config = DriverConfig {
            rotate_sw_id: true,
            ..Default::default()
        };
        let mut driver = Driver::with_config(Loopback::new(), 0x01, config).unwrap();
        driver.set_sw_id(U4::from_lo(0xe));

        let msg = request(&driver, &[]);
        driver.command(&msg).unwrap();
        assert_eq!(driver.sw_id(), U4::MAX);

        let msg = request(&driver, &[]);
        driver.command(&msg).unwrap();
        assert_eq!(driver.sw_id(), DEFAULT_SW_ID);
    }
}
