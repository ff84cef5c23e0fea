//! Implements the functions of the `IRoot` feature that every HID++2.0 device
//! supports at feature index `0`.

use super::FeatureType;
use crate::{
    channel::RawHidChannel,
    driver::{Driver, DriverError},
    registry::{KnownFeature, KnownFunction},
    request::Request,
};

const GET_FEATURE: Request = Request::root(KnownFunction::GetFeature);
const GET_PROTOCOL_VERSION: Request = Request::root(KnownFunction::GetProtocolVersion);

impl<T: RawHidChannel> Driver<T> {
    /// Pings the device with an arbitrary data byte. The device will respond
    /// with the same data if communication succeeds.
    pub fn ping(&mut self, data: u8) -> Result<u8, DriverError<T::Error>> {
        GET_PROTOCOL_VERSION.invoke(self, |driver, mut msg| {
            msg.args_mut()[2] = data;

            let response = driver.command(&msg)?;

            Ok(response.args()[2])
        })
    }

    /// Retrieves the protocol version the device reports.
    ///
    /// This uses the same function as [`Self::ping`].
    pub fn protocol_version(&mut self) -> Result<ProtocolVersion, DriverError<T::Error>> {
        GET_PROTOCOL_VERSION.invoke(self, |driver, msg| {
            let response = driver.command(&msg)?;
            let args = response.args();

            Ok(ProtocolVersion {
                protocol_num: args[0],
                target_sw: args[1],
            })
        })
    }

    /// Retrieves information about a specific feature ID, including its index
    /// in the feature table, its type and its version.
    ///
    /// If the feature is not supported by the device, [`None`] is returned.
    ///
    /// If the device only supports the root feature version 1, the
    /// [`FeatureInformation::version`] field will be `0` for all features.
    pub fn get_feature(
        &mut self,
        id: u16,
    ) -> Result<Option<FeatureInformation>, DriverError<T::Error>> {
        GET_FEATURE.invoke(self, |driver, mut msg| {
            msg.args_mut()[..2].copy_from_slice(&id.to_be_bytes());

            let response = driver.command(&msg)?;
            let args = response.args();

            // The root feature itself is the only one allowed to live at index 0.
            if args[0] == 0 && id != KnownFeature::Root.code() {
                return Ok(None);
            }

            Ok(Some(FeatureInformation {
                index: args[0],
                typ: FeatureType::from(args[1]),
                version: args[2],
            }))
        })
    }
}

/// Represents the protocol version a device reports.
///
/// Traditionally, the version was split into a major and a minor version.
/// These two values were later redefined to hint at which host software to
/// target.
#[derive(Clone, Copy, PartialEq, Eq, Hash, Debug)]
#[cfg_attr(feature = "serde", derive(serde::Serialize))]
pub struct ProtocolVersion {
    /// `2` targets Logitech SetPoint, `3` and `4` target the software
    /// described in [`Self::target_sw`].
    pub protocol_num: u8,

    /// When `protocol_num >= 3` this field further hints at which software
    /// should support the device. Otherwise the value is zero.
    pub target_sw: u8,
}

/// Represents information about a specific feature as returned by
/// [`Driver::get_feature`].
#[derive(Clone, Copy, PartialEq, Eq, Hash, Debug)]
#[cfg_attr(feature = "serde", derive(serde::Serialize))]
pub struct FeatureInformation {
    /// The index of the feature in the feature table.
    /// This is used for invocations of functions of that feature.
    pub index: u8,

    /// The type of the feature.
    pub typ: FeatureType,

    /// The latest supported version of the feature.
    pub version: u8,
}
