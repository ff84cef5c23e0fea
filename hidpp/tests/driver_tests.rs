//! Driver Tests
//!
//! Exercises the command loop and the root feature functions against
//! loopback and scripted channels.

use std::collections::VecDeque;

use hidpp20::{
    channel::{Loopback, LoopbackError, RawHidChannel},
    driver::{Driver, DriverConfig, DriverError},
    message::{ErrorCode, Message, MessageError},
    nibble::U4,
    registry::KnownFunction,
    report::{LONG_REPORT_ID, SHORT_REPORT_ID},
    request::Request,
};

/// A channel recording every written report and answering with prepared
/// replies.
#[derive(Default)]
struct ScriptedChannel {
    written: Vec<Vec<u8>>,
    replies: VecDeque<Vec<u8>>,
    /// Caps the byte count reported by `write_report`.
    write_limit: Option<usize>,
}

impl ScriptedChannel {
    fn replying(replies: &[&[u8]]) -> Self {
        Self {
            written: Vec::new(),
            replies: replies.iter().map(|r| r.to_vec()).collect(),
            write_limit: None,
        }
    }
}

impl RawHidChannel for ScriptedChannel {
    type Error = LoopbackError;

    fn write_report(&mut self, src: &[u8]) -> Result<usize, Self::Error> {
        self.written.push(src.to_vec());
        Ok(self.write_limit.map_or(src.len(), |limit| limit.min(src.len())))
    }

    fn read_report(&mut self, buf: &mut [u8]) -> Result<usize, Self::Error> {
        let reply = self
            .replies
            .pop_front()
            .ok_or(LoopbackError::NothingWritten)?;
        buf[..reply.len()].copy_from_slice(&reply);
        Ok(reply.len())
    }
}

// =============================================================================
// Wire Format
// =============================================================================

#[test]
fn test_end_to_end_short_report() {
    let msg = Message::new(
        SHORT_REPORT_ID,
        0x01,
        0x01,
        U4::from_lo(1),
        U4::from_lo(3),
        &[],
    )
    .unwrap();
    let raw = msg.to_bytes();
    assert_eq!(raw, [0x10, 0x01, 0x01, 0x13, 0x00, 0x00, 0x00]);

    let parsed = Message::from_bytes(&raw).unwrap();
    assert_eq!(parsed.header.function_id, U4::from_lo(1));
    assert_eq!(parsed.header.software_id, U4::from_lo(3));
    assert_eq!(parsed.header.feature_index, 0x01);
    assert_eq!(parsed.args(), [0, 0, 0]);
    assert_eq!(parsed, msg);
}

// =============================================================================
// Ping
// =============================================================================

#[test]
fn test_ping_over_loopback() {
    let mut driver = Driver::new(Loopback::new(), 0x01);
    assert_eq!(driver.ping(0x42).unwrap(), 0x42);
}

#[test]
fn test_ping_writes_data_into_third_argument() {
    let chan = ScriptedChannel::replying(&[&[0x10, 0x02, 0x00, 0x11, 0x04, 0x02, 0x99]]);
    let mut driver = Driver::new(chan, 0x02);

    assert_eq!(driver.ping(0x99).unwrap(), 0x99);

    let chan = driver.into_channel();
    assert_eq!(chan.written, [vec![0x10, 0x02, 0x00, 0x11, 0x00, 0x00, 0x99]]);
}

#[test]
fn test_ping_uses_configured_report_type() {
    let config = DriverConfig {
        report_id: LONG_REPORT_ID,
        ..Default::default()
    };
    let mut driver = Driver::with_config(Loopback::new(), 0xff, config).unwrap();

    assert_eq!(driver.ping(0x07).unwrap(), 0x07);
}

#[test]
fn test_protocol_version() {
    let chan = ScriptedChannel::replying(&[&[0x10, 0x01, 0x00, 0x11, 0x04, 0x05, 0x00]]);
    let mut driver = Driver::new(chan, 0x01);

    let version = driver.protocol_version().unwrap();
    assert_eq!(version.protocol_num, 4);
    assert_eq!(version.target_sw, 5);
}

// =============================================================================
// GetFeature
// =============================================================================

#[test]
fn test_get_feature() {
    let chan = ScriptedChannel::replying(&[&[0x10, 0x01, 0x00, 0x01, 0x05, 0x40, 0x02]]);
    let mut driver = Driver::new(chan, 0x01);

    let info = driver.get_feature(0x1004).unwrap().unwrap();
    assert_eq!(info.index, 0x05);
    assert!(info.typ.hidden);
    assert!(!info.typ.obsolete);
    assert_eq!(info.version, 0x02);

    let chan = driver.into_channel();
    assert_eq!(chan.written[0], [0x10, 0x01, 0x00, 0x01, 0x10, 0x04, 0x00]);
}

// =============================================================================
// Reply Handling
// =============================================================================

#[test]
fn test_mismatching_reply_passes_by_default() {
    // Reply carries a different software ID and function.
    let chan = ScriptedChannel::replying(&[&[0x10, 0x01, 0x00, 0x05, 0x00, 0x00, 0x42]]);
    let mut driver = Driver::new(chan, 0x01);

    assert_eq!(driver.ping(0x42).unwrap(), 0x42);
}

#[test]
fn test_mismatching_reply_is_rejected_when_verified() {
    let chan = ScriptedChannel::replying(&[&[0x10, 0x01, 0x00, 0x05, 0x00, 0x00, 0x42]]);
    let config = DriverConfig {
        verify_replies: true,
        ..Default::default()
    };
    let mut driver = Driver::with_config(chan, 0x01, config).unwrap();

    match driver.ping(0x42) {
        Err(DriverError::UnexpectedReply { sent, received }) => {
            assert_eq!(sent.function_id, U4::from_lo(1));
            assert_eq!(received.function_id, U4::from_lo(0));
            assert_eq!(received.software_id, U4::from_lo(5));
        },
        other => panic!("Expected UnexpectedReply, got {other:?}"),
    }
}

#[test]
fn test_matching_reply_passes_when_verified() {
    let config = DriverConfig {
        verify_replies: true,
        ..Default::default()
    };
    let mut driver = Driver::with_config(Loopback::new(), 0x01, config).unwrap();

    assert_eq!(driver.ping(0x10).unwrap(), 0x10);
}

#[test]
fn test_error_reply_is_detected() {
    let chan = ScriptedChannel::replying(&[&[0x10, 0x01, 0xff, 0x00, 0x11, 0x09, 0x00]]);
    let mut driver = Driver::new(chan, 0x01);

    match driver.ping(0x01) {
        Err(DriverError::Device {
            feature_index,
            function_id,
            code,
        }) => {
            assert_eq!(feature_index, 0x00);
            assert_eq!(function_id, U4::from_lo(1));
            assert_eq!(code, ErrorCode::Unsupported);
        },
        other => panic!("Expected Device error, got {other:?}"),
    }
}

#[test]
fn test_error_reply_is_returned_when_detection_disabled() {
    let chan = ScriptedChannel::replying(&[&[0x10, 0x01, 0xff, 0x00, 0x11, 0x09, 0x00]]);
    let config = DriverConfig {
        detect_errors: false,
        ..Default::default()
    };
    let mut driver = Driver::with_config(chan, 0x01, config).unwrap();

    let msg = Request::root(KnownFunction::GetProtocolVersion)
        .build(&driver)
        .unwrap();
    let reply = driver.command(&msg).unwrap();
    assert_eq!(reply.error_reply().map(|err| err.code), Some(ErrorCode::Unsupported));
}

#[test]
fn test_truncated_reply_fails() {
    let chan = ScriptedChannel::replying(&[&[0x10, 0x01, 0x00, 0x11, 0x00]]);
    let mut driver = Driver::new(chan, 0x01);

    assert!(matches!(
        driver.ping(0x01),
        Err(DriverError::Message(MessageError::LengthMismatch {
            expected: 7,
            actual: 5,
            ..
        }))
    ));
}

#[test]
fn test_unknown_reply_report_fails() {
    let chan = ScriptedChannel::replying(&[&[0x20, 0x01, 0x00, 0x11, 0x00, 0x00, 0x00]]);
    let mut driver = Driver::new(chan, 0x01);

    assert!(matches!(
        driver.ping(0x01),
        Err(DriverError::Message(MessageError::UnknownReportId(0x20)))
    ));
}

#[test]
fn test_missing_reply_fails() {
    let mut driver = Driver::new(ScriptedChannel::default(), 0x01);

    assert!(matches!(
        driver.ping(0x01),
        Err(DriverError::Channel(LoopbackError::NothingWritten))
    ));
    // The request was still written.
    assert_eq!(driver.into_channel().written.len(), 1);
}

#[test]
fn test_short_write_fails() {
    let chan = ScriptedChannel {
        write_limit: Some(0),
        ..ScriptedChannel::replying(&[&[0x10, 0x01, 0x00, 0x11, 0x00, 0x00, 0x42]])
    };
    let mut driver = Driver::new(chan, 0x01);

    assert!(matches!(
        driver.ping(0x42),
        Err(DriverError::IncompleteWrite {
            expected: 7,
            actual: 0
        })
    ));
    // The reply was never consumed.
    assert_eq!(driver.into_channel().replies.len(), 1);
}

// =============================================================================
// Software ID Rotation
// =============================================================================

#[test]
fn test_sw_id_advances_when_reply_is_missing() {
    let config = DriverConfig {
        rotate_sw_id: true,
        verify_replies: true,
        ..Default::default()
    };
    let mut driver = Driver::with_config(ScriptedChannel::default(), 0x01, config).unwrap();
    let before = driver.sw_id();

    assert!(matches!(driver.ping(0x42), Err(DriverError::Channel(_))));
    assert_ne!(driver.sw_id(), before);
}

#[test]
fn test_late_reply_is_rejected_after_rotation() {
    // Both answers carry sw_id 1: the first request gets a truncated reply,
    // the second one receives the stale answer to the first.
    let chan = ScriptedChannel::replying(&[
        &[0x10, 0x01, 0x00, 0x11],
        &[0x10, 0x01, 0x00, 0x11, 0x00, 0x00, 0x42],
    ]);
    let config = DriverConfig {
        rotate_sw_id: true,
        verify_replies: true,
        ..Default::default()
    };
    let mut driver = Driver::with_config(chan, 0x01, config).unwrap();

    assert!(matches!(driver.ping(0x42), Err(DriverError::Message(_))));
    match driver.ping(0x42) {
        Err(DriverError::UnexpectedReply { sent, received }) => {
            assert_eq!(sent.software_id, U4::from_lo(2));
            assert_eq!(received.software_id, U4::from_lo(1));
        },
        other => panic!("Expected UnexpectedReply, got {other:?}"),
    }
}
