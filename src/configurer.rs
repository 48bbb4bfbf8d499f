//! Applying the extended joystick format.
//!
//! [`DeviceFormatConfigurer`] performs exactly one step: it hands
//! [`EXTENDED_JOYSTICK`] to a device and converts the platform's answer into a
//! `Result`. It does not open, acquire, poll, log or retry.
//!
//! # Ordering
//! Call it after the device has been created and before it is acquired; the
//! platform refuses format changes on an acquired device (`DIERR_ACQUIRED`).
//! Sequencing belongs to whoever owns the device lifecycle.
//!
//! # Example
//! ```
//! use stickfmt::{DataFormat, DeviceFormatConfigurer, FormatTarget, Status};
//!
//! /// A driver that only knows the extended joystick layout.
//! struct Driver;
//!
//! impl FormatTarget for Driver {
//!     fn set_data_format(&self, format: &DataFormat<'_>) -> Status {
//!         if format.data_size == 272 { Status::OK } else { Status::UNSUPPORTED }
//!     }
//! }
//!
//! DeviceFormatConfigurer::configure(&Driver).expect("driver accepts the format");
//! ```

use crate::device::FormatTarget;
use crate::error::ConfigError;
use crate::format::{DataFormat, EXTENDED_JOYSTICK};

/// Applies the standard extended joystick report format to a borrowed device.
#[derive(Clone, Copy, Debug, Default)]
pub struct DeviceFormatConfigurer;

impl DeviceFormatConfigurer {
    /// The only format this configurer ever requests.
    pub const FORMAT: &'static DataFormat<'static> = &EXTENDED_JOYSTICK;

    /// Ask `device` to report state as `DIJOYSTATE2` from now on.
    ///
    /// Idempotent. On failure the platform status is kept in the error.
    pub fn configure<D: FormatTarget + ?Sized>(device: &D) -> Result<(), ConfigError> {
        device.set_data_format(Self::FORMAT).ok()
    }
}

/// Shorthand for [`DeviceFormatConfigurer::configure`].
#[inline]
pub fn configure<D: FormatTarget + ?Sized>(device: &D) -> Result<(), ConfigError> {
    DeviceFormatConfigurer::configure(device)
}
