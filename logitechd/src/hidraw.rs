//! Implements HID communication using Linux hidraw device nodes.
//!
//! Every read from a hidraw node returns exactly one input report and every
//! write sends exactly one output report, which maps directly onto
//! [`RawHidChannel`].

use std::{
    fs::{File, OpenOptions},
    io::{self, Read, Write},
    path::Path,
};

use hidpp20::channel::RawHidChannel;
use tracing::debug;

/// A HID channel backed by an opened `/dev/hidrawN` node.
pub struct HidrawChannel(File);

impl HidrawChannel {
    /// Opens a hidraw node for reading and writing.
    pub fn open(path: &Path) -> io::Result<Self> {
        let file = OpenOptions::new().read(true).write(true).open(path)?;
        debug!(path = %path.display(), "opened hidraw node");
        Ok(Self(file))
    }
}

impl RawHidChannel for HidrawChannel {
    type Error = io::Error;

    fn write_report(&mut self, src: &[u8]) -> Result<usize, Self::Error> {
        self.0.write(src)
    }

    fn read_report(&mut self, buf: &mut [u8]) -> Result<usize, Self::Error> {
        self.0.read(buf)
    }
}
