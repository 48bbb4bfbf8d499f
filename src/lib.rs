//! stickfmt: extended joystick data format for DirectInput devices.
//!
//! Puts a joystick-class device into the standard `DIJOYSTATE2` report layout
//! before the host application starts reading it. The crate does one thing:
//! [`configure`] hands the [`EXTENDED_JOYSTICK`] descriptor to a device the caller
//! already opened, and reports the platform's answer as a typed [`ConfigError`].
//!
//! Opening, acquiring and polling devices is left to the caller.
//!
//! ```no_run
//! # #[cfg(windows)]
//! # fn demo(raw_device: *mut core::ffi::c_void) -> Result<(), stickfmt::ConfigError> {
//! use stickfmt::backends::windows::configure_raw;
//!
//! stickfmt::platform_support()?;
//! // `raw_device` comes from IDirectInput8W::CreateDevice and is not acquired yet.
//! unsafe { configure_raw(raw_device) }?;
//! // then SetCooperativeLevel / Acquire / GetDeviceState(size_of::<JoyState2>())
//! # Ok(())
//! # }
//! ```

#![cfg_attr(docsrs, feature(doc_cfg))]

pub mod backends;
pub mod channel;
pub mod configurer;
pub mod device;
pub mod error;
pub mod format;
pub mod state;

pub use backends::platform_support;
pub use channel::{describe, layout_json, ChannelDesc, ChannelKind};
pub use configurer::{configure, DeviceFormatConfigurer};
pub use device::FormatTarget;
pub use error::{ConfigError, Status};
pub use format::{DataFormat, ObjectFormat, EXTENDED_JOYSTICK};
pub use state::JoyState2;
