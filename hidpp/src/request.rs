//! Implements the convention used to dispatch requests to HID++2.0 functions.
//!
//! Every operation is bound to a fixed feature/function pair via a
//! [`Request`]. Invoking the request builds a fresh [`Message`] addressed to
//! that pair and hands it to the operation, which fills in its arguments,
//! issues the command and interprets the reply:
//!
//! ```
//! use hidpp20::{
//!     channel::Loopback,
//!     driver::Driver,
//!     registry::KnownFunction,
//!     request::Request,
//! };
//!
//! const PING: Request = Request::root(KnownFunction::GetProtocolVersion);
//!
//! let mut driver = Driver::new(Loopback::new(), 0x01);
//! let echoed = PING
//!     .invoke(&mut driver, |driver, mut msg| {
//!         msg.args_mut()[2] = 0x42;
//!         let reply = driver.command(&msg)?;
//!         Ok(reply.args()[2])
//!     })
//!     .unwrap();
//! assert_eq!(echoed, 0x42);
//! ```

use tracing::debug;

use crate::{
    channel::RawHidChannel,
    driver::{Driver, DriverError},
    message::{Message, MessageError, MessageHeader},
    registry::{Feature, Function, KnownFunction},
};

/// Binds an operation to a specific function of a specific feature.
#[derive(Clone, Copy, PartialEq, Eq, Hash, Debug)]
pub struct Request {
    /// The addressed function.
    function: Function,

    /// The index of the function's feature in the device's feature table.
    feature_index: u8,
}

impl Request {
    /// Binds a request to a function of the root feature, which is always
    /// located at feature index `0`.
    ///
    /// # Panics
    ///
    /// Panics if the function does not belong to a feature with a fixed
    /// feature index. In constant contexts, this is a compile error.
    pub const fn root(function: KnownFunction) -> Self {
        let Some(feature_index) = function.feature().fixed_index() else {
            panic!("the function's feature has no fixed feature index");
        };

        Self {
            function: Function {
                feature: Feature {
                    code: function.feature().code(),
                    known: Some(function.feature()),
                },
                number: function.number(),
                known: Some(function),
            },
            feature_index,
        }
    }

    /// Binds a request to a function of a feature located at a feature index
    /// obtained from the device.
    pub const fn at_index(function: Function, feature_index: u8) -> Self {
        Self {
            function,
            feature_index,
        }
    }

    /// The addressed function.
    pub fn function(&self) -> Function {
        self.function
    }

    /// The feature index requests are addressed to.
    pub fn feature_index(&self) -> u8 {
        self.feature_index
    }

    /// A human-readable description of the addressed feature and function.
    pub fn description(&self) -> String {
        format!(
            "HID++ 2.0 function\n\nFeature: {} ({:#06x})\nFunction: {}",
            self.function.feature.name(),
            self.function.feature.code,
            self.function,
        )
    }

    /// Builds a message with empty arguments addressed to the function, using
    /// the device index, software ID and report ID of the driver.
    pub fn build<T: RawHidChannel>(&self, driver: &Driver<T>) -> Result<Message, MessageError> {
        Message::with_header(
            driver.config().report_id,
            MessageHeader {
                device_index: driver.device_index(),
                feature_index: self.feature_index,
                function_id: self.function.number,
                software_id: driver.sw_id(),
            },
            &[],
        )
    }

    /// Builds a fresh message via [`Self::build`] and passes it to `op`
    /// together with the driver.
    ///
    /// The message is moved into `op`, which owns it for the duration of the
    /// exchange. Whatever `op` returns is returned from this method.
    pub fn invoke<T, R, F>(&self, driver: &mut Driver<T>, op: F) -> Result<R, DriverError<T::Error>>
    where
        T: RawHidChannel,
        F: FnOnce(&mut Driver<T>, Message) -> Result<R, DriverError<T::Error>>,
    {
        let msg = self.build(driver)?;
        debug!(
            feature = %self.function.feature,
            function = %self.function,
            feature_index = self.feature_index,
            "dispatching request"
        );

        op(driver, msg)
    }
}
