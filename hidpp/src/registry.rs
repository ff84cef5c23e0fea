//! Maintains a registry of well-known HID++2.0 features and their functions.
//!
//! The names are used for diagnostics only. Devices are free to expose
//! features this registry does not know about, so looking up an unknown code
//! never fails but resolves to [`UNKNOWN`].

use std::fmt;

use num_enum::{IntoPrimitive, TryFromPrimitive};

use crate::nibble::U4;

/// The name every unknown feature or function resolves to.
pub const UNKNOWN: &str = "Unknown";

/// Represents a HID++2.0 feature known to this crate.
#[derive(Clone, Copy, PartialEq, Eq, Hash, Debug, IntoPrimitive, TryFromPrimitive)]
#[cfg_attr(feature = "serde", derive(serde::Serialize))]
#[non_exhaustive]
#[repr(u16)]
pub enum KnownFeature {
    /// The root feature every device supports. It is always located at
    /// feature index `0`.
    Root = 0x0001,
}

impl KnownFeature {
    /// The protocol ID of the feature.
    pub const fn code(self) -> u16 {
        self as u16
    }

    /// The feature index the feature is always located at, if it has a fixed
    /// one. All other features have to be looked up in the device's feature
    /// table first.
    pub const fn fixed_index(self) -> Option<u8> {
        match self {
            Self::Root => Some(0x00),
        }
    }

    /// The interface name of the feature as found in Logitech's
    /// documentation.
    pub const fn name(self) -> &'static str {
        match self {
            Self::Root => "IRoot",
        }
    }
}

/// Represents a HID++2.0 function known to this crate.
///
/// Function IDs are only unique within their feature.
#[derive(Clone, Copy, PartialEq, Eq, Hash, Debug)]
#[cfg_attr(feature = "serde", derive(serde::Serialize))]
#[non_exhaustive]
pub enum KnownFunction {
    /// `IRoot` function `0`: looks up the index of a feature by its ID.
    GetFeature,

    /// `IRoot` function `1`: reports the protocol version and echoes a ping
    /// byte.
    GetProtocolVersion,
}

impl KnownFunction {
    /// All known functions.
    pub const ALL: &'static [KnownFunction] = &[Self::GetFeature, Self::GetProtocolVersion];

    /// The feature the function belongs to.
    pub const fn feature(self) -> KnownFeature {
        match self {
            Self::GetFeature | Self::GetProtocolVersion => KnownFeature::Root,
        }
    }

    /// The ID of the function within its feature.
    pub const fn number(self) -> U4 {
        match self {
            Self::GetFeature => U4::from_lo(0),
            Self::GetProtocolVersion => U4::from_lo(1),
        }
    }

    /// A short description of the function's inputs and outputs.
    pub const fn description(self) -> &'static str {
        match self {
            Self::GetFeature => "featIndex, featType, featVer = GetFeature(featId)",
            Self::GetProtocolVersion => "version, ping = GetProtocolVersion(ping)",
        }
    }

    /// Looks up a function by the code of its feature and its number.
    pub fn lookup(feature_code: u16, number: U4) -> Option<Self> {
        Self::ALL
            .iter()
            .copied()
            .find(|func| func.feature().code() == feature_code && func.number() == number)
    }
}

/// Represents a feature as seen on the wire.
///
/// The raw code is always kept, even if the feature is unknown to the
/// registry.
#[derive(Clone, Copy, PartialEq, Eq, Hash, Debug)]
#[cfg_attr(feature = "serde", derive(serde::Serialize))]
pub struct Feature {
    /// The protocol ID of the feature.
    pub code: u16,

    /// The resolved feature, if known.
    pub known: Option<KnownFeature>,
}

impl Feature {
    /// The display name of the feature, or [`UNKNOWN`].
    pub fn name(&self) -> &'static str {
        self.known.map_or(UNKNOWN, KnownFeature::name)
    }
}

impl From<u16> for Feature {
    fn from(code: u16) -> Self {
        Self {
            code,
            known: KnownFeature::try_from(code).ok(),
        }
    }
}

impl From<KnownFeature> for Feature {
    fn from(known: KnownFeature) -> Self {
        Self {
            code: known.code(),
            known: Some(known),
        }
    }
}

impl fmt::Display for Feature {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{} ({:#06x})", self.name(), self.code)
    }
}

/// Represents a function of a specific feature as seen on the wire.
#[derive(Clone, Copy, PartialEq, Eq, Hash, Debug)]
#[cfg_attr(feature = "serde", derive(serde::Serialize))]
pub struct Function {
    /// The feature the function belongs to.
    pub feature: Feature,

    /// The ID of the function within the feature.
    pub number: U4,

    /// The resolved function, if known.
    pub known: Option<KnownFunction>,
}

impl Function {
    /// Resolves a function from its feature code and number.
    pub fn new(feature_code: u16, number: U4) -> Self {
        Self {
            feature: Feature::from(feature_code),
            number,
            known: KnownFunction::lookup(feature_code, number),
        }
    }

    /// The display description of the function, or [`UNKNOWN`].
    pub fn description(&self) -> &'static str {
        self.known.map_or(UNKNOWN, KnownFunction::description)
    }
}

impl From<KnownFunction> for Function {
    fn from(known: KnownFunction) -> Self {
        Self {
            feature: known.feature().into(),
            number: known.number(),
            known: Some(known),
        }
    }
}

impl fmt::Display for Function {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "({}) {}", self.number, self.description())
    }
}

/// Looks up the display name of a feature code.
pub fn feature_name(code: u16) -> &'static str {
    Feature::from(code).name()
}

/// Looks up the display description of a function.
pub fn function_description(feature_code: u16, number: U4) -> &'static str {
    Function::new(feature_code, number).description()
}
