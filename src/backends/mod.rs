//! Backends for `stickfmt`.
//!
//! Implementations of [`FormatTarget`](crate::device::FormatTarget).
//!
//! # Feature flags
//! - **`dinput`**: enables the Windows DirectInput 8 backend (default).
//! - **`simulated`**: enables `simulated::SimulatedDevice`, an in-process device for
//!   tests and demos (off by default).
//!
//! Neither backend opens or owns devices; they only accept a data format.

use crate::error::ConfigError;

#[cfg(all(feature = "dinput", target_os = "windows"))]
#[cfg_attr(docsrs, doc(cfg(all(feature = "dinput", target_os = "windows"))))]
pub mod windows;

#[cfg(feature = "simulated")]
#[cfg_attr(docsrs, doc(cfg(feature = "simulated")))]
pub mod simulated;

/// Startup capability check for the native platform.
///
/// `Ok` when DirectInput 8 can be loaded. On other targets, or without the
/// `dinput` feature, this fails with `DIERR_UNSUPPORTED`. Devices handed to
/// [`configure`](crate::configure) later still report their own status per call.
pub fn platform_support() -> Result<(), ConfigError> {
    #[cfg(all(feature = "dinput", target_os = "windows"))]
    {
        crate::backends::windows::probe()
    }

    #[cfg(not(all(feature = "dinput", target_os = "windows")))]
    {
        crate::error::Status::UNSUPPORTED.ok()
    }
}

#[cfg(all(test, not(all(feature = "dinput", target_os = "windows"))))]
mod tests {
    use super::*;
    use crate::error::Status;

    #[test]
    fn unsupported_off_windows() {
        let err = platform_support().unwrap_err();
        assert_eq!(err.status(), Status::UNSUPPORTED);
    }
}
