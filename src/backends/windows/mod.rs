#![cfg(target_os = "windows")]

//! Windows backend.
//!
//! DirectInput 8 is the platform that owns report formats on Windows. This module
//! holds the one native call the crate makes (`IDirectInputDevice8W::SetDataFormat`)
//! and the startup capability probe.
//!
//! Device creation, cooperative levels, acquisition and polling stay with the
//! caller. Most users only need:
//! - [`probe`] once at startup
//! - [`DeviceHandle::from_raw`] + [`configure`](crate::configure), or
//!   [`configure_raw`] for a bare pointer

pub mod dinput;

pub use dinput::{configure_raw, probe, DeviceHandle};
