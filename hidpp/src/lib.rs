//! The message layer of Logitech's HID++ 2.0 protocol.
//!
//! Many of Logitech's more modern peripheral devices (mice, keyboards etc.)
//! expose their capabilities as so-called features. Every feature is
//! identified by a 16-bit ID and consists of up to 16 functions. A device
//! stores its supported features in a feature table, and requests address a
//! feature by its index in that table, not by its ID. Only the root feature
//! is guaranteed to live at index `0`.
//!
//! Requests and responses are exchanged as fixed-length HID reports. The
//! length of a report is determined by its first byte, the report ID (see
//! [`report`]). This crate implements:
//!
//! - encoding and decoding of HID++2.0 messages ([`message`])
//! - a registry of well-known features and functions for diagnostics
//!   ([`registry`])
//! - the convention used to bind operations to a feature/function pair
//!   ([`request`])
//! - a driver issuing commands to a single device ([`driver`]) and the root
//!   feature functions implemented on top of it ([`feature::root`])
//!
//! # Quickstart
//!
//! This crate does not implement the underlying HID communication. The trait
//! used for bridging your HID implementation to this crate is
//! [`channel::RawHidChannel`]. A [`channel::Loopback`] implementation echoing
//! every written report is provided for testing.
//!
//! ```
//! use hidpp20::{channel::Loopback, driver::Driver, nibble::U4};
//!
//! // The device index identifies a device among several sharing a channel,
//! // e.g. devices paired to a wireless receiver.
//! let mut driver = Driver::new(Loopback::new(), 0x01);
//!
//! // HID++2.0 includes an arbitrary "software ID" in every message, which the
//! // device echoes back in its response.
//! driver.set_sw_id(U4::from_lo(0xa));
//!
//! // Every device supports the root feature, which can be pinged.
//! assert_eq!(driver.ping(0x42).unwrap(), 0x42);
//! ```

pub mod channel;
pub mod driver;
pub mod feature;
pub mod message;
pub mod nibble;
pub mod registry;
pub mod report;
pub mod request;
