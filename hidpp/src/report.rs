//! The report size table.
//!
//! Every HID++ report starts with a report ID that determines the total length
//! of the report. Only report IDs listed here can be encoded or decoded.

use std::collections::HashMap;

use lazy_static::lazy_static;

/// The report ID of short HID++ messages.
pub const SHORT_REPORT_ID: u8 = 0x10;

/// The total length of short HID++ messages, including the header.
pub const SHORT_REPORT_LENGTH: usize = 7;

/// The report ID of long HID++ messages.
pub const LONG_REPORT_ID: u8 = 0x11;

/// The total length of long HID++ messages, including the header.
pub const LONG_REPORT_LENGTH: usize = 20;

/// The report ID of very long HID++ messages.
///
/// These are rarely supported and mostly used by devices with large onboard
/// memory transfers.
pub const VERY_LONG_REPORT_ID: u8 = 0x12;

/// The total length of very long HID++ messages, including the header.
pub const VERY_LONG_REPORT_LENGTH: usize = 64;

/// The length of the header every HID++2.0 report starts with: report ID,
/// device index, feature index and the combined function/software ID byte.
pub const HEADER_LENGTH: usize = 4;

/// The length of the largest known report.
/// Buffers incoming reports are read into are sized accordingly.
pub const MAX_REPORT_LENGTH: usize = VERY_LONG_REPORT_LENGTH;

lazy_static! {
    static ref REPORT_SIZES: HashMap<u8, usize> = HashMap::from([
        (SHORT_REPORT_ID, SHORT_REPORT_LENGTH),
        (LONG_REPORT_ID, LONG_REPORT_LENGTH),
        (VERY_LONG_REPORT_ID, VERY_LONG_REPORT_LENGTH),
    ]);
}

/// Looks up the total length of a report, header included.
///
/// Returns [`None`] for report IDs that are not part of HID++.
pub fn report_length(report_id: u8) -> Option<usize> {
    REPORT_SIZES.get(&report_id).copied()
}

/// Looks up how many argument bytes a report can carry after its header.
pub fn payload_capacity(report_id: u8) -> Option<usize> {
    report_length(report_id).map(|len| len - HEADER_LENGTH)
}
