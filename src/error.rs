//! Platform status codes and the configuration error.
//!
//! DirectInput reports every outcome as an `HRESULT`. [`Status`] keeps that value
//! intact so callers can inspect it; [`ConfigError`] is the single error kind the
//! crate surfaces when the platform rejects a data format.

use std::fmt;

/// Raw platform status (`HRESULT`) returned by a native call.
///
/// Negative values are failures, everything else is success (possibly with
/// information, e.g. `S_FALSE`).
#[derive(Clone, Copy, PartialEq, Eq, Hash)]
#[repr(transparent)]
pub struct Status(pub i32);

// Local constants (kept here instead of relying on windows-sys so the simulated
// backend and the tests can use them on every target).
impl Status {
    /// `DI_OK` / `S_OK`.
    pub const OK: Status = Status(0);
    /// `S_FALSE` / `DI_NOEFFECT`: the request was already satisfied.
    pub const FALSE: Status = Status(1);
    /// `E_NOTIMPL`, reported by DirectInput as `DIERR_UNSUPPORTED`.
    pub const UNSUPPORTED: Status = Status(0x8000_4001_u32 as i32);
    /// `E_POINTER`: a null interface pointer.
    pub const POINTER: Status = Status(0x8000_4003_u32 as i32);
    /// `E_FAIL` / `DIERR_GENERIC`.
    pub const GENERIC: Status = Status(0x8000_4005_u32 as i32);
    /// `DIERR_NOTACQUIRED`: `HRESULT_FROM_WIN32(ERROR_INVALID_ACCESS)`.
    pub const NOT_ACQUIRED: Status = Status(0x8007_000C_u32 as i32);
    /// `DIERR_NOTINITIALIZED`: `HRESULT_FROM_WIN32(ERROR_NOT_READY)`.
    pub const NOT_INITIALIZED: Status = Status(0x8007_0015_u32 as i32);
    /// `DIERR_INVALIDPARAM` / `E_INVALIDARG`.
    pub const INVALID_PARAM: Status = Status(0x8007_0057_u32 as i32);
    /// `DIERR_ACQUIRED`: `HRESULT_FROM_WIN32(ERROR_BUSY)`.
    pub const ACQUIRED: Status = Status(0x8007_00AA_u32 as i32);

    /// `true` for any non-negative `HRESULT`.
    #[inline]
    pub const fn is_success(self) -> bool {
        self.0 >= 0
    }

    /// Wrap a Win32 error code the way `HRESULT_FROM_WIN32` does.
    pub const fn from_win32(code: u32) -> Status {
        if code as i32 <= 0 {
            Status(code as i32)
        } else {
            Status(((code & 0x0000_FFFF) | (7 << 16) | 0x8000_0000) as i32)
        }
    }

    /// Symbolic DirectInput name for the codes this crate knows about.
    pub fn name(self) -> Option<&'static str> {
        let name = match self {
            Status::OK => "DI_OK",
            Status::FALSE => "S_FALSE",
            Status::UNSUPPORTED => "DIERR_UNSUPPORTED",
            Status::POINTER => "E_POINTER",
            Status::GENERIC => "DIERR_GENERIC",
            Status::NOT_ACQUIRED => "DIERR_NOTACQUIRED",
            Status::NOT_INITIALIZED => "DIERR_NOTINITIALIZED",
            Status::INVALID_PARAM => "DIERR_INVALIDPARAM",
            Status::ACQUIRED => "DIERR_ACQUIRED",
            _ => return None,
        };
        Some(name)
    }

    /// Turn the status into a `Result`, keeping failures as [`ConfigError`].
    #[inline]
    pub fn ok(self) -> Result<(), ConfigError> {
        if self.is_success() {
            Ok(())
        } else {
            Err(ConfigError::new(self))
        }
    }
}

impl fmt::Debug for Status {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "Status({:#010x})", self.0 as u32)
    }
}

impl fmt::Display for Status {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self.name() {
            Some(name) => write!(f, "{name} ({:#010x})", self.0 as u32),
            None => write!(f, "HRESULT {:#010x}", self.0 as u32),
        }
    }
}

/// The platform rejected a data format request.
///
/// Sub-causes (invalid handle, unsupported shape, device already acquired) are not
/// split into variants; they are carried as the native [`Status`].
#[derive(Debug, Clone, Copy, PartialEq, Eq, thiserror::Error)]
#[error("device rejected the extended joystick data format: {status}")]
pub struct ConfigError {
    status: Status,
}

impl ConfigError {
    pub(crate) fn new(status: Status) -> Self {
        debug_assert!(!status.is_success(), "success status wrapped as error");
        Self { status }
    }

    /// Native status code returned by the platform.
    #[inline]
    pub fn status(&self) -> Status {
        self.status
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn success_is_non_negative() {
        assert!(Status::OK.is_success());
        assert!(Status::FALSE.is_success());
        assert!(!Status::ACQUIRED.is_success());
        assert!(!Status::POINTER.is_success());
    }

    #[test]
    fn win32_codes_are_wrapped_like_hresult_from_win32() {
        assert_eq!(Status::from_win32(0), Status::OK);
        assert_eq!(Status::from_win32(0xAA), Status::ACQUIRED);
        assert_eq!(Status::from_win32(0x15), Status::NOT_INITIALIZED);
        assert_eq!(Status::from_win32(0x57), Status::INVALID_PARAM);
        assert_eq!(Status::from_win32(126).0 as u32, 0x8007_007E);
    }

    #[test]
    fn ok_keeps_the_native_status() {
        assert_eq!(Status::OK.ok(), Ok(()));
        let err = Status::ACQUIRED.ok().unwrap_err();
        assert_eq!(err.status(), Status::ACQUIRED);
    }

    #[test]
    fn display_names_known_codes() {
        assert_eq!(
            Status::ACQUIRED.to_string(),
            "DIERR_ACQUIRED (0x800700aa)"
        );
        assert_eq!(Status(0x8123_4567_u32 as i32).to_string(), "HRESULT 0x81234567");

        let err = ConfigError::new(Status::INVALID_PARAM);
        assert!(err.to_string().contains("DIERR_INVALIDPARAM"));
    }
}
