//! Implements the HID++2.0 message envelope and its wire format.
//!
//! Every message is encoded as a fixed-length report:
//!
//! ```text
//! byte 0:        report ID
//! byte 1:        device index
//! byte 2:        feature index
//! byte 3:        (function ID << 4) | software ID
//! bytes 4..N-1:  arguments, zero-padded to (report length - 4)
//! ```
//!
//! The total length `N` is determined by the report ID, see
//! [`crate::report`].

use std::fmt;

use num_enum::{FromPrimitive, IntoPrimitive};
use thiserror::Error;

use crate::{
    nibble::{self, U4},
    report::{self, HEADER_LENGTH},
};

/// The feature index devices use to indicate an error response.
pub const ERROR_FEATURE_INDEX: u8 = 0xff;

/// Represents the header that every HID++2.0 message starts with, following
/// the report ID.
///
/// Two messages with equal headers belong to the same request/response
/// exchange.
#[derive(Clone, Copy, PartialEq, Eq, Hash, Debug)]
#[cfg_attr(feature = "serde", derive(serde::Serialize))]
pub struct MessageHeader {
    /// The index of the device involved in the communication.
    pub device_index: u8,

    /// The index of the feature the message belongs to.
    ///
    /// This is not the same as the feature ID, but the index of the feature in
    /// the device's feature table.
    pub feature_index: u8,

    /// The ID of the function involved in the communication.
    pub function_id: U4,

    /// The ID of the software communicating with the device.
    pub software_id: U4,
}

/// Represents a single HID++2.0 message.
///
/// The argument buffer always has the exact capacity of the report type, so
/// the encoded message length always matches the report size table.
#[derive(Clone, PartialEq, Eq, Hash, Debug)]
#[cfg_attr(feature = "serde", derive(serde::Serialize))]
pub struct Message {
    report_id: u8,

    /// The header of the message.
    pub header: MessageHeader,

    args: Vec<u8>,
}

impl Message {
    /// Constructs a new message, padding `args` with zeroes up to the argument
    /// capacity of the report.
    ///
    /// Returns [`MessageError::UnknownReportId`] if the report ID is not part
    /// of the report size table and [`MessageError::PayloadTooLong`] if `args`
    /// does not fit into the report.
    pub fn new(
        report_id: u8,
        device_index: u8,
        feature_index: u8,
        function_id: U4,
        software_id: U4,
        args: &[u8],
    ) -> Result<Self, MessageError> {
        Self::with_header(
            report_id,
            MessageHeader {
                device_index,
                feature_index,
                function_id,
                software_id,
            },
            args,
        )
    }

    /// Constructs a new message from an already assembled header.
    ///
    /// See [`Self::new`] for the possible errors.
    pub fn with_header(
        report_id: u8,
        header: MessageHeader,
        args: &[u8],
    ) -> Result<Self, MessageError> {
        let capacity =
            report::payload_capacity(report_id).ok_or(MessageError::UnknownReportId(report_id))?;

        if args.len() > capacity {
            return Err(MessageError::PayloadTooLong {
                report_id,
                capacity,
                actual: args.len(),
            });
        }

        let mut padded = vec![0u8; capacity];
        padded[..args.len()].copy_from_slice(args);

        Ok(Self {
            report_id,
            header,
            args: padded,
        })
    }

    /// Tries to read a message from raw report data.
    ///
    /// The length of `data` has to match the length of the report type
    /// indicated by its first byte exactly.
    pub fn from_bytes(data: &[u8]) -> Result<Self, MessageError> {
        let Some(&report_id) = data.first() else {
            return Err(MessageError::Empty);
        };

        let expected =
            report::report_length(report_id).ok_or(MessageError::UnknownReportId(report_id))?;
        if data.len() != expected {
            return Err(MessageError::LengthMismatch {
                report_id,
                expected,
                actual: data.len(),
            });
        }

        let (function_id, software_id) = nibble::split(data[3]);

        Ok(Self {
            report_id,
            header: MessageHeader {
                device_index: data[1],
                feature_index: data[2],
                function_id,
                software_id,
            },
            args: data[HEADER_LENGTH..].to_vec(),
        })
    }

    /// Writes the message in its raw byte form into a buffer.
    ///
    /// Returns the amount of written bytes, which always equals the length of
    /// the report type.
    ///
    /// # Panics
    ///
    /// Panics if `buf` is shorter than [`Self::len`].
    pub fn write_raw(&self, buf: &mut [u8]) -> usize {
        let len = self.len();

        buf[0] = self.report_id;
        buf[1] = self.header.device_index;
        buf[2] = self.header.feature_index;
        buf[3] = nibble::combine(self.header.function_id, self.header.software_id);
        buf[HEADER_LENGTH..len].copy_from_slice(&self.args);

        assert_eq!(
            Some(len),
            report::report_length(self.report_id),
            "encoded message length disagrees with the report size table"
        );

        len
    }

    /// Encodes the message into a newly allocated buffer.
    pub fn to_bytes(&self) -> Vec<u8> {
        let mut buf = vec![0u8; self.len()];
        self.write_raw(&mut buf);
        buf
    }

    /// The report ID selecting the report type and thus its length.
    pub fn report_id(&self) -> u8 {
        self.report_id
    }

    /// The encoded length of the message, header included.
    #[allow(clippy::len_without_is_empty)]
    pub fn len(&self) -> usize {
        HEADER_LENGTH + self.args.len()
    }

    /// Extracts the header of the message.
    pub fn header(&self) -> MessageHeader {
        self.header
    }

    /// The argument bytes of the message.
    pub fn args(&self) -> &[u8] {
        &self.args
    }

    /// Mutable access to the argument bytes.
    ///
    /// The length of the argument buffer is fixed by the report type and can
    /// not be changed.
    pub fn args_mut(&mut self) -> &mut [u8] {
        &mut self.args
    }

    /// Interprets the message as an error response.
    ///
    /// Returns [`None`] if the message is a regular response.
    pub fn error_reply(&self) -> Option<ErrorReply> {
        if self.header.feature_index != ERROR_FEATURE_INDEX {
            return None;
        }

        // Error responses move the original header one byte to the right, so
        // the byte usually holding function and software ID is the original
        // feature index.
        let (function_id, software_id) = nibble::split(self.args[0]);
        Some(ErrorReply {
            feature_index: nibble::combine(self.header.function_id, self.header.software_id),
            function_id,
            software_id,
            code: ErrorCode::from(self.args[1]),
        })
    }
}

impl fmt::Display for Message {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(
            f,
            "Message(report={:#04x}, device={}, feature={:#06x}, function={}, sw_id={}, args=[",
            self.report_id,
            self.header.device_index,
            self.header.feature_index,
            self.header.function_id,
            self.header.software_id,
        )?;

        for (i, byte) in self.args.iter().enumerate() {
            if i != 0 {
                f.write_str(" ")?;
            }
            write!(f, "{byte:#04x}")?;
        }

        f.write_str("])")
    }
}

impl TryFrom<&[u8]> for Message {
    type Error = MessageError;

    fn try_from(data: &[u8]) -> Result<Self, Self::Error> {
        Self::from_bytes(data)
    }
}

/// Represents the content of an error response sent by a device when it
/// could not process a request.
#[derive(Clone, Copy, PartialEq, Eq, Hash, Debug)]
#[cfg_attr(feature = "serde", derive(serde::Serialize))]
pub struct ErrorReply {
    /// The feature index of the failed request.
    pub feature_index: u8,

    /// The function ID of the failed request.
    pub function_id: U4,

    /// The software ID of the failed request.
    pub software_id: U4,

    /// The reason the request failed.
    pub code: ErrorCode,
}

/// Represents an error code a HID++2.0 device includes in error responses.
#[derive(Clone, Copy, PartialEq, Eq, Hash, Debug, IntoPrimitive, FromPrimitive)]
#[cfg_attr(feature = "serde", derive(serde::Serialize))]
#[repr(u8)]
pub enum ErrorCode {
    /// No error.
    NoError = 0x00,

    /// An unspecified error occurred.
    Unknown = 0x01,

    /// An argument of the request is invalid.
    InvalidArgument = 0x02,

    /// An argument of the request is out of the supported range.
    OutOfRange = 0x03,

    /// The device reported a hardware failure.
    HardwareError = 0x04,

    /// Reserved for Logitech-internal use.
    LogitechInternal = 0x05,

    /// The feature index of the request does not point to a feature.
    InvalidFeatureIndex = 0x06,

    /// The function ID of the request is not defined for the feature.
    InvalidFunctionId = 0x07,

    /// The device is busy and can not process the request right now.
    Busy = 0x08,

    /// The request is not supported by the device.
    Unsupported = 0x09,

    /// An error code not known to this crate.
    #[num_enum(catch_all)]
    Other(u8),
}

/// Represents an error that occurred while constructing, encoding or decoding
/// a [`Message`].
#[derive(Clone, Copy, PartialEq, Eq, Debug, Error)]
pub enum MessageError {
    /// Indicates that the report ID is not part of the report size table.
    #[error("unknown report ID {0:#04x}")]
    UnknownReportId(u8),

    /// Indicates that the arguments do not fit into the report.
    #[error(
        "report {report_id:#04x} holds {capacity} argument bytes, but {actual} were given"
    )]
    PayloadTooLong {
        report_id: u8,
        capacity: usize,
        actual: usize,
    },

    /// Indicates that raw report data does not have the length its report ID
    /// requires.
    #[error("report {report_id:#04x} must be {expected} bytes long, but {actual} were given")]
    LengthMismatch {
        report_id: u8,
        expected: usize,
        actual: usize,
    },

    /// Indicates that raw report data was empty.
    #[error("the report data is empty")]
    Empty,
}
