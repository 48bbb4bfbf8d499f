#![cfg(target_os = "windows")]

//! DirectInput 8 boundary.
//!
//! Everything `unsafe` in the crate lives here:
//! - [`DeviceHandle`]: a borrowed `IDirectInputDevice8W*` that has been checked for null
//! - the native `DIDATAFORMAT` / `DIOBJECTDATAFORMAT` mirrors and the prebuilt
//!   extended joystick table
//! - the raw `SetDataFormat` vtable call
//! - [`probe`], the startup capability check for `dinput8.dll`
//!
//! ## Why the table is built here
//! `windows-sys` does not bind the `c_dfDIJoystick2` data export, so the native table is
//! produced at compile time from [`EXTENDED_JOYSTICK_OBJECTS`] and stored in statics. The
//! GUID pointers in it point at statics in this module, which keeps the whole table valid
//! for the life of the process and lets `SetDataFormat` run without allocating.
//!
//! ## Handles from other bindings
//! Callers holding a `windows::Win32::Devices::HumanInterfaceDevice::IDirectInputDevice8W`
//! pass `device.as_raw()`.

use core::ffi::c_void;
use core::marker::PhantomData;
use core::mem::{offset_of, size_of};
use core::ptr::{self, NonNull};
use std::ffi::OsStr;
use std::os::windows::ffi::OsStrExt;

use windows_sys::core::{GUID, HRESULT};
use windows_sys::Win32::Foundation::GetLastError;
use windows_sys::Win32::System::LibraryLoader::{FreeLibrary, GetProcAddress, LoadLibraryW};

use crate::configurer::configure;
use crate::device::FormatTarget;
use crate::error::{ConfigError, Status};
use crate::format::{
    DataFormat, ObjectFormat, ObjectGuid, EXTENDED_JOYSTICK, EXTENDED_JOYSTICK_OBJECTS,
    EXTENDED_JOYSTICK_OBJECT_COUNT,
};

/// `DIOBJECTDATAFORMAT`.
#[repr(C)]
#[derive(Clone, Copy, Debug)]
struct RawObjectFormat {
    pguid: *const GUID,
    dw_ofs: u32,
    dw_type: u32,
    dw_flags: u32,
}

/// `DIDATAFORMAT`.
#[repr(C)]
#[derive(Debug)]
struct RawDataFormat {
    dw_size: u32,
    dw_obj_size: u32,
    dw_flags: u32,
    dw_data_size: u32,
    dw_num_objs: u32,
    rgodf: *mut RawObjectFormat,
}

/// Leading part of the `IDirectInputDevice8W` vtable, up to `SetDataFormat`.
#[repr(C)]
struct DeviceVtbl {
    /// QueryInterface, AddRef, Release.
    _unknown: [*const c_void; 3],
    /// GetCapabilities .. GetDeviceData.
    _before: [*const c_void; 8],
    set_data_format:
        unsafe extern "system" fn(this: *mut c_void, format: *const RawDataFormat) -> HRESULT,
}

const SET_DATA_FORMAT_SLOT: usize = 11;
const _: () = assert!(
    offset_of!(DeviceVtbl, set_data_format) == SET_DATA_FORMAT_SLOT * size_of::<usize>()
);

const NULL_GUID: GUID = GUID::from_u128(0);
const NULL_OBJECT: RawObjectFormat = RawObjectFormat {
    pguid: ptr::null(),
    dw_ofs: 0,
    dw_type: 0,
    dw_flags: 0,
};

const fn guid_table() -> [GUID; 8] {
    let mut out = [NULL_GUID; 8];
    let mut i = 0;
    while i < ObjectGuid::ALL.len() {
        out[ObjectGuid::ALL[i] as usize] = GUID::from_u128(ObjectGuid::ALL[i].as_u128());
        i += 1;
    }
    out
}

/// Object type GUIDs, indexed by `ObjectGuid as usize`.
static GUIDS: [GUID; 8] = guid_table();

const fn marshal_object(obj: &ObjectFormat, guids: &[GUID; 8]) -> RawObjectFormat {
    RawObjectFormat {
        pguid: match obj.guid {
            Some(guid) => &guids[guid as usize] as *const GUID,
            None => ptr::null(),
        },
        dw_ofs: obj.offset,
        dw_type: obj.type_flags(),
        dw_flags: obj.flags(),
    }
}

const fn marshal_extended(
    objs: &[ObjectFormat; EXTENDED_JOYSTICK_OBJECT_COUNT],
    guids: &[GUID; 8],
) -> [RawObjectFormat; EXTENDED_JOYSTICK_OBJECT_COUNT] {
    let mut out = [NULL_OBJECT; EXTENDED_JOYSTICK_OBJECT_COUNT];
    let mut i = 0;
    while i < EXTENDED_JOYSTICK_OBJECT_COUNT {
        out[i] = marshal_object(&objs[i], guids);
        i += 1;
    }
    out
}

#[repr(transparent)]
struct NativeObjects([RawObjectFormat; EXTENDED_JOYSTICK_OBJECT_COUNT]);
// SAFETY: never written after initialization; the GUID pointers target `GUIDS`.
unsafe impl Sync for NativeObjects {}

#[repr(transparent)]
struct NativeFormat(RawDataFormat);
// SAFETY: never written after initialization; `rgodf` targets `EXTENDED_OBJECTS`.
unsafe impl Sync for NativeFormat {}

static EXTENDED_OBJECTS: NativeObjects =
    NativeObjects(marshal_extended(&EXTENDED_JOYSTICK_OBJECTS, &GUIDS));

/// Native equivalent of `c_dfDIJoystick2`.
static EXTENDED_FORMAT: NativeFormat = NativeFormat(RawDataFormat {
    dw_size: size_of::<RawDataFormat>() as u32,
    dw_obj_size: size_of::<RawObjectFormat>() as u32,
    dw_flags: EXTENDED_JOYSTICK.flags,
    dw_data_size: EXTENDED_JOYSTICK.data_size,
    dw_num_objs: EXTENDED_JOYSTICK_OBJECT_COUNT as u32,
    rgodf: ptr::addr_of!(EXTENDED_OBJECTS.0) as *const RawObjectFormat as *mut RawObjectFormat,
});

/// Native table for a format other than the extended joystick one.
///
/// `header.rgodf` points into `objects`' heap buffer, which does not move with the struct.
struct OwnedFormat {
    header: RawDataFormat,
    _objects: Vec<RawObjectFormat>,
}

impl OwnedFormat {
    fn marshal(format: &DataFormat<'_>) -> Self {
        let mut objects: Vec<RawObjectFormat> = format
            .objects
            .iter()
            .map(|obj| marshal_object(obj, &GUIDS))
            .collect();
        let header = RawDataFormat {
            dw_size: size_of::<RawDataFormat>() as u32,
            dw_obj_size: size_of::<RawObjectFormat>() as u32,
            dw_flags: format.flags,
            dw_data_size: format.data_size,
            dw_num_objs: objects.len() as u32,
            rgodf: objects.as_mut_ptr(),
        };
        Self {
            header,
            _objects: objects,
        }
    }
}

/// Borrowed, non-null `IDirectInputDevice8W*`.
///
/// The device stays owned by whoever created it; this type never calls `AddRef` or
/// `Release`. It is neither `Send` nor `Sync`: the platform leaves concurrent
/// configuration of one device undefined, so a handle stays on the thread that made it.
#[derive(Debug)]
pub struct DeviceHandle<'a> {
    raw: NonNull<c_void>,
    _device: PhantomData<&'a c_void>,
}

impl<'a> DeviceHandle<'a> {
    /// Wrap a raw device interface pointer. Returns `None` for null.
    ///
    /// # Safety
    /// A non-null `raw` must point to a live `IDirectInputDevice8W` (created by
    /// `IDirectInput8W::CreateDevice`) that outlives `'a`.
    pub unsafe fn from_raw(raw: *mut c_void) -> Option<Self> {
        NonNull::new(raw).map(|raw| Self {
            raw,
            _device: PhantomData,
        })
    }

    #[inline]
    pub fn as_raw(&self) -> *mut c_void {
        self.raw.as_ptr()
    }

    /// # Safety
    /// `format` and every pointer it holds must stay valid for the call.
    unsafe fn call_set_data_format(&self, format: *const RawDataFormat) -> Status {
        let this = self.raw.as_ptr();
        let vtbl = *(this as *const *const DeviceVtbl);
        Status(((*vtbl).set_data_format)(this, format))
    }
}

impl FormatTarget for DeviceHandle<'_> {
    fn set_data_format(&self, format: &DataFormat<'_>) -> Status {
        // SAFETY: `from_raw` guarantees a live device; both tables outlive the call.
        let status = if *format == EXTENDED_JOYSTICK {
            unsafe { self.call_set_data_format(&EXTENDED_FORMAT.0) }
        } else {
            let owned = OwnedFormat::marshal(format);
            unsafe { self.call_set_data_format(&owned.header) }
        };

        #[cfg(feature = "debug-log")]
        {
            if !status.is_success() {
                tracing::debug!(device = ?self.raw, %status, "SetDataFormat rejected");
            }
        }

        status
    }
}

/// Configure a raw `IDirectInputDevice8W*` with the extended joystick format.
///
/// A null pointer fails with `E_POINTER` without touching the platform.
///
/// # Safety
/// Same contract as [`DeviceHandle::from_raw`].
pub unsafe fn configure_raw(device: *mut c_void) -> Result<(), ConfigError> {
    match DeviceHandle::from_raw(device) {
        Some(handle) => configure(&handle),
        None => Err(ConfigError::new(Status::POINTER)),
    }
}

fn last_error_status() -> Status {
    // SAFETY: reads thread-local error state only.
    let code = unsafe { GetLastError() };
    match Status::from_win32(code) {
        s if s.is_success() => Status::GENERIC,
        s => s,
    }
}

/// Check that DirectInput 8 is available on this machine.
///
/// Loads `dinput8.dll` and resolves `DirectInput8Create`, then unloads it again.
/// Meant to run once at startup, before the device owner tries to open anything.
pub fn probe() -> Result<(), ConfigError> {
    let name: Vec<u16> = OsStr::new("dinput8.dll")
        .encode_wide()
        .chain(Some(0))
        .collect();

    unsafe {
        let module = LoadLibraryW(name.as_ptr());
        if module.is_null() {
            let status = last_error_status();
            #[cfg(feature = "debug-log")]
            tracing::debug!(%status, "dinput8.dll not loadable");
            return Err(ConfigError::new(status));
        }

        let entry = GetProcAddress(module, b"DirectInput8Create\0".as_ptr());
        let missing = entry.is_none().then(last_error_status);
        let _ = FreeLibrary(module);

        match missing {
            Some(status) => {
                #[cfg(feature = "debug-log")]
                tracing::debug!(%status, "DirectInput8Create not exported");
                Err(ConfigError::new(status))
            }
            None => {
                #[cfg(feature = "debug-log")]
                tracing::debug!("DirectInput 8 available");
                Ok(())
            }
        }
    }
}
