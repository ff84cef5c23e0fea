//! Implementations of device feature functions.
//!
//! Only the root feature is implemented here. Every other feature follows the
//! same convention: a [`crate::request::Request`] per function and a fixed
//! argument layout agreed upon with the device firmware.

pub mod root;

/// A bitfield describing some properties of a feature.
///
/// Documentation is taken from <https://drive.google.com/file/d/1ULmw9uJL8b8iwwUo5xjSS9F5Zvno-86y/view>.
#[derive(Clone, Copy, PartialEq, Eq, Hash, Debug, Default)]
#[cfg_attr(feature = "serde", derive(serde::Serialize))]
pub struct FeatureType {
    /// The feature has been replaced by a newer one, but is still advertised
    /// for older software.
    pub obsolete: bool,

    /// The feature should not be managed by end user configuration software.
    pub hidden: bool,

    /// A hidden feature disabled for user software. Used for internal testing
    /// and manufacturing.
    pub engineering: bool,

    /// A manufacturing feature that can be permanently deactivated.
    pub manufacturing_deactivatable: bool,

    /// A compliance feature that can be permanently deactivated.
    pub compliance_deactivatable: bool,
}

impl FeatureType {
    const OBSOLETE: u8 = 1 << 7;
    const HIDDEN: u8 = 1 << 6;
    const ENGINEERING: u8 = 1 << 5;
    const MANUFACTURING_DEACTIVATABLE: u8 = 1 << 4;
    const COMPLIANCE_DEACTIVATABLE: u8 = 1 << 3;
}

impl From<u8> for FeatureType {
    fn from(bits: u8) -> Self {
        Self {
            obsolete: bits & Self::OBSOLETE != 0,
            hidden: bits & Self::HIDDEN != 0,
            engineering: bits & Self::ENGINEERING != 0,
            manufacturing_deactivatable: bits & Self::MANUFACTURING_DEACTIVATABLE != 0,
            compliance_deactivatable: bits & Self::COMPLIANCE_DEACTIVATABLE != 0,
        }
    }
}

impl From<FeatureType> for u8 {
    fn from(typ: FeatureType) -> Self {
        [
            (typ.obsolete, FeatureType::OBSOLETE),
            (typ.hidden, FeatureType::HIDDEN),
            (typ.engineering, FeatureType::ENGINEERING),
            (
                typ.manufacturing_deactivatable,
                FeatureType::MANUFACTURING_DEACTIVATABLE,
            ),
            (
                typ.compliance_deactivatable,
                FeatureType::COMPLIANCE_DEACTIVATABLE,
            ),
        ]
        .into_iter()
        .filter(|(set, _)| *set)
        .fold(0, |bits, (_, flag)| bits | flag)
    }
}
