//! In-process stand-in for a DirectInput device.
//!
//! [`SimulatedDevice`] follows the platform's rules for the calls around formatting
//! (set format, acquire, read state, release) closely enough to exercise
//! [`configure`](crate::configure) end to end on any OS. It is what the crate's own
//! tests run against, and it is handy for host applications that want to test their
//! device-lifecycle code without hardware.
//!
//! ## Rules enforced by `set_data_format`
//! - destroyed device → `DIERR_NOTINITIALIZED`
//! - acquired device → `DIERR_ACQUIRED`
//! - zero or non-DWORD-multiple data size, empty object list, object past the end of
//!   the buffer, or a 4-byte object at an unaligned offset → `DIERR_INVALIDPARAM`
//! - a non-optional object the device cannot bind → `DIERR_UNSUPPORTED`
//! - anything set with [`SimulatedDevice::reject_formats_with`] wins over all of the above
//!
//! ## State reads
//! Format objects bind to device controls in descriptor order: the n-th object with
//! a given GUID and aspect takes the n-th such control; buttons and POVs bind by
//! position. Unbound axes read `0`, unbound POVs read centered, pressed buttons `0x80`.

use crate::device::FormatTarget;
use crate::error::Status;
use crate::format::{Aspect, DataFormat, ObjectFormat, ObjectGuid, ObjectKind};
use crate::state::{JoyState2, POV_CENTERED};
use std::collections::HashMap;
use std::mem::size_of;
use std::sync::{Mutex, MutexGuard, PoisonError};

/// Where a simulated device is in its lifecycle.
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub enum Lifecycle {
    /// Created, not acquired. Format changes allowed.
    Created,
    /// Acquired. Format changes refused, state reads allowed.
    Acquired,
    /// Released by its owner. Every call fails.
    Destroyed,
}

#[derive(Default)]
struct Controls {
    /// `(guid, aspect)` → one value per instance.
    axes: HashMap<(ObjectGuid, Aspect), Vec<i32>>,
    /// `None` = centered.
    povs: Vec<Option<u32>>,
    buttons: Vec<bool>,
}

/// Owned copy of an applied format.
#[derive(Clone, Debug, PartialEq, Eq)]
struct AppliedFormat {
    flags: u32,
    data_size: u32,
    objects: Vec<ObjectFormat>,
}

struct SimState {
    lifecycle: Lifecycle,
    format: Option<AppliedFormat>,
    controls: Controls,
    forced: Option<Status>,
}

/// A scriptable device with declared axes, POVs and buttons.
pub struct SimulatedDevice {
    id: String,
    name: String,
    state: Mutex<SimState>,
}

impl SimulatedDevice {
    /// A device with no controls.
    pub fn new(id: &str, name: &str) -> Self {
        Self {
            id: id.to_string(),
            name: name.to_string(),
            state: Mutex::new(SimState {
                lifecycle: Lifecycle::Created,
                format: None,
                controls: Controls::default(),
                forced: None,
            }),
        }
    }

    /// A typical stick: X, Y, Z, Rz, two sliders, one POV hat and 32 buttons.
    pub fn joystick(id: &str, name: &str) -> Self {
        Self::new(id, name)
            .with_axis(ObjectGuid::XAxis, Aspect::Position)
            .with_axis(ObjectGuid::YAxis, Aspect::Position)
            .with_axis(ObjectGuid::ZAxis, Aspect::Position)
            .with_axis(ObjectGuid::RzAxis, Aspect::Position)
            .with_axis(ObjectGuid::Slider, Aspect::Position)
            .with_axis(ObjectGuid::Slider, Aspect::Position)
            .with_povs(1)
            .with_buttons(32)
    }

    /// Add one instance of an axis (call twice for two sliders).
    pub fn with_axis(self, guid: ObjectGuid, aspect: Aspect) -> Self {
        self.lock()
            .controls
            .axes
            .entry((guid, aspect))
            .or_default()
            .push(0);
        self
    }

    pub fn with_povs(self, count: usize) -> Self {
        self.lock().controls.povs.resize(count, None);
        self
    }

    pub fn with_buttons(self, count: usize) -> Self {
        self.lock().controls.buttons.resize(count, false);
        self
    }

    pub fn id(&self) -> &str {
        &self.id
    }

    pub fn name(&self) -> &str {
        &self.name
    }

    fn lock(&self) -> MutexGuard<'_, SimState> {
        self.state.lock().unwrap_or_else(PoisonError::into_inner)
    }

    pub fn lifecycle(&self) -> Lifecycle {
        self.lock().lifecycle
    }

    /// `(flags, data_size, object count)` of the applied format, if any.
    pub fn format_summary(&self) -> Option<(u32, u32, usize)> {
        self.lock()
            .format
            .as_ref()
            .map(|f| (f.flags, f.data_size, f.objects.len()))
    }

    /// `true` if the applied format is exactly `format`.
    pub fn has_format(&self, format: &DataFormat<'_>) -> bool {
        self.lock().format.as_ref().is_some_and(|f| {
            f.flags == format.flags && f.data_size == format.data_size && f.objects == format.objects
        })
    }

    /// Make every following `set_data_format` fail with `status` (driver refusal).
    ///
    /// A success status is not a refusal: it clears any earlier one instead.
    pub fn reject_formats_with(&self, status: Status) {
        self.lock().forced = (!status.is_success()).then_some(status);
    }

    /// Set an axis instance. Returns `false` if the device has no such control.
    pub fn set_axis(&self, guid: ObjectGuid, aspect: Aspect, instance: usize, value: i32) -> bool {
        match self
            .lock()
            .controls
            .axes
            .get_mut(&(guid, aspect))
            .and_then(|v| v.get_mut(instance))
        {
            Some(slot) => {
                *slot = value;
                true
            }
            None => false,
        }
    }

    /// Set a POV in hundredths of a degree, or `None` for centered.
    pub fn set_pov(&self, index: usize, hundredths: Option<u32>) -> bool {
        match self.lock().controls.povs.get_mut(index) {
            Some(slot) => {
                *slot = hundredths;
                true
            }
            None => false,
        }
    }

    pub fn set_button(&self, index: usize, pressed: bool) -> bool {
        match self.lock().controls.buttons.get_mut(index) {
            Some(slot) => {
                *slot = pressed;
                true
            }
            None => false,
        }
    }

    /// `Acquire`: requires an applied format. `S_FALSE` if already acquired.
    pub fn acquire(&self) -> Status {
        let mut st = self.lock();
        let lifecycle = st.lifecycle;
        match lifecycle {
            Lifecycle::Destroyed => Status::NOT_INITIALIZED,
            Lifecycle::Acquired => Status::FALSE,
            Lifecycle::Created if st.format.is_none() => Status::INVALID_PARAM,
            Lifecycle::Created => {
                st.lifecycle = Lifecycle::Acquired;
                #[cfg(feature = "debug-log")]
                tracing::debug!(device = %self.id, "acquired");
                Status::OK
            }
        }
    }

    /// `Unacquire`: `S_FALSE` if the device was not acquired.
    pub fn unacquire(&self) -> Status {
        let mut st = self.lock();
        let lifecycle = st.lifecycle;
        match lifecycle {
            Lifecycle::Destroyed => Status::NOT_INITIALIZED,
            Lifecycle::Created => Status::FALSE,
            Lifecycle::Acquired => {
                st.lifecycle = Lifecycle::Created;
                #[cfg(feature = "debug-log")]
                tracing::debug!(device = %self.id, "unacquired");
                Status::OK
            }
        }
    }

    /// Release the device. Every later call fails with `DIERR_NOTINITIALIZED`.
    pub fn destroy(&self) {
        let mut st = self.lock();
        st.lifecycle = Lifecycle::Destroyed;
        st.format = None;
        #[cfg(feature = "debug-log")]
        tracing::debug!(device = %self.id, "destroyed");
    }

    /// `GetDeviceState`: write current state into `out` using the applied format.
    ///
    /// `out.len()` must equal the format's data size.
    pub fn get_device_state(&self, out: &mut [u8]) -> Status {
        let st = self.lock();
        match st.lifecycle {
            Lifecycle::Destroyed => return Status::NOT_INITIALIZED,
            Lifecycle::Created => return Status::NOT_ACQUIRED,
            Lifecycle::Acquired => {}
        }
        let Some(format) = st.format.as_ref() else {
            return Status::NOT_ACQUIRED;
        };
        if out.len() != format.data_size as usize {
            return Status::INVALID_PARAM;
        }

        out.fill(0);
        let controls = &st.controls;
        let mut next_axis: HashMap<(ObjectGuid, Aspect), usize> = HashMap::new();
        let mut next_pov = 0;
        let mut next_button = 0;

        for obj in &format.objects {
            let at = obj.offset as usize;
            match obj.kind {
                ObjectKind::Axis => {
                    let value = match obj.guid {
                        Some(guid) => {
                            let key = (guid, obj.aspect.unwrap_or(Aspect::Position));
                            let n = next_axis.entry(key).or_insert(0);
                            let value = controls.axes.get(&key).and_then(|v| v.get(*n)).copied();
                            *n += 1;
                            value.unwrap_or(0)
                        }
                        None => 0,
                    };
                    out[at..at + 4].copy_from_slice(&value.to_le_bytes());
                }
                ObjectKind::Pov => {
                    let value = controls
                        .povs
                        .get(next_pov)
                        .copied()
                        .flatten()
                        .unwrap_or(POV_CENTERED);
                    next_pov += 1;
                    out[at..at + 4].copy_from_slice(&value.to_le_bytes());
                }
                ObjectKind::Button => {
                    let pressed = controls.buttons.get(next_button).copied().unwrap_or(false);
                    next_button += 1;
                    out[at] = if pressed { 0x80 } else { 0 };
                }
            }
        }
        Status::OK
    }

    /// Read state as [`JoyState2`]. Fails unless the applied format is 272 bytes.
    pub fn read_joystate(&self) -> Result<JoyState2, Status> {
        let mut buf = [0u8; size_of::<JoyState2>()];
        let status = self.get_device_state(&mut buf);
        if !status.is_success() {
            return Err(status);
        }
        JoyState2::from_bytes(&buf).ok_or(Status::INVALID_PARAM)
    }
}

fn validate(format: &DataFormat<'_>) -> Result<(), Status> {
    if format.data_size == 0 || format.data_size % 4 != 0 || format.objects.is_empty() {
        return Err(Status::INVALID_PARAM);
    }
    for obj in format.objects {
        match obj.end() {
            Some(end) if end <= format.data_size => {}
            _ => return Err(Status::INVALID_PARAM),
        }
        if obj.kind.width() == 4 && obj.offset % 4 != 0 {
            return Err(Status::INVALID_PARAM);
        }
    }
    Ok(())
}

impl Controls {
    /// Can every non-optional object of `format` bind to a control?
    fn binds_required(&self, format: &DataFormat<'_>) -> bool {
        let mut used: HashMap<(Option<ObjectGuid>, Option<Aspect>, ObjectKind), usize> =
            HashMap::new();
        for obj in format.objects {
            let n = used.entry((obj.guid, obj.aspect, obj.kind)).or_insert(0);
            let instance = *n;
            *n += 1;
            if obj.optional {
                continue;
            }
            let present = match (obj.kind, obj.guid) {
                (ObjectKind::Button, _) => instance < self.buttons.len(),
                (ObjectKind::Pov, _) => instance < self.povs.len(),
                (ObjectKind::Axis, Some(guid)) => {
                    let key = (guid, obj.aspect.unwrap_or(Aspect::Position));
                    self.axes.get(&key).is_some_and(|v| instance < v.len())
                }
                (ObjectKind::Axis, None) => {
                    instance < self.axes.values().map(Vec::len).sum::<usize>()
                }
            };
            if !present {
                return false;
            }
        }
        true
    }
}

impl FormatTarget for SimulatedDevice {
    fn set_data_format(&self, format: &DataFormat<'_>) -> Status {
        let mut st = self.lock();
        if st.lifecycle == Lifecycle::Destroyed {
            return Status::NOT_INITIALIZED;
        }
        if let Some(status) = st.forced {
            return status;
        }
        if st.lifecycle == Lifecycle::Acquired {
            return Status::ACQUIRED;
        }
        if let Err(status) = validate(format) {
            return status;
        }
        if !st.controls.binds_required(format) {
            return Status::UNSUPPORTED;
        }

        st.format = Some(AppliedFormat {
            flags: format.flags,
            data_size: format.data_size,
            objects: format.objects.to_vec(),
        });
        #[cfg(feature = "debug-log")]
        tracing::debug!(
            device = %self.id,
            objects = format.objects.len(),
            data_size = format.data_size,
            "data format applied"
        );
        Status::OK
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::configure;
    use crate::format::{DIDF_ABSAXIS, EXTENDED_JOYSTICK};

    fn required_axis(guid: ObjectGuid, offset: u32) -> ObjectFormat {
        ObjectFormat {
            guid: Some(guid),
            offset,
            kind: ObjectKind::Axis,
            aspect: Some(Aspect::Position),
            optional: false,
        }
    }

    #[test]
    fn fresh_device_accepts_format_and_can_be_acquired() {
        let dev = SimulatedDevice::joystick("sim:0", "Stick");
        assert_eq!(dev.acquire(), Status::INVALID_PARAM);
        configure(&dev).unwrap();
        assert!(dev.has_format(&EXTENDED_JOYSTICK));
        assert_eq!(dev.acquire(), Status::OK);
        assert_eq!(dev.acquire(), Status::FALSE);
        assert_eq!(dev.lifecycle(), Lifecycle::Acquired);
    }

    #[test]
    fn acquired_device_refuses_format_changes() {
        let dev = SimulatedDevice::joystick("sim:0", "Stick");
        configure(&dev).unwrap();
        dev.acquire();
        let err = configure(&dev).unwrap_err();
        assert_eq!(err.status(), Status::ACQUIRED);

        assert_eq!(dev.unacquire(), Status::OK);
        assert_eq!(dev.unacquire(), Status::FALSE);
        assert!(configure(&dev).is_ok());
    }

    #[test]
    fn destroyed_device_fails_everything() {
        let dev = SimulatedDevice::joystick("sim:0", "Stick");
        dev.destroy();
        assert_eq!(configure(&dev).unwrap_err().status(), Status::NOT_INITIALIZED);
        assert_eq!(dev.acquire(), Status::NOT_INITIALIZED);
        assert_eq!(dev.get_device_state(&mut [0u8; 272]), Status::NOT_INITIALIZED);
        assert_eq!(dev.format_summary(), None);
    }

    #[test]
    fn malformed_formats_are_invalid_params() {
        let dev = SimulatedDevice::joystick("sim:0", "Stick");
        let x = [required_axis(ObjectGuid::XAxis, 0)];
        let misaligned = [required_axis(ObjectGuid::XAxis, 2)];
        let past_end = [required_axis(ObjectGuid::XAxis, 4)];
        let wrapping = [ObjectFormat {
            guid: Some(ObjectGuid::Pov),
            offset: 0xFFFF_FFFC,
            kind: ObjectKind::Pov,
            aspect: None,
            optional: true,
        }];

        let cases = [
            DataFormat { flags: DIDF_ABSAXIS, data_size: 0, objects: &x },
            DataFormat { flags: DIDF_ABSAXIS, data_size: 6, objects: &x },
            DataFormat { flags: DIDF_ABSAXIS, data_size: 4, objects: &[] },
            DataFormat { flags: DIDF_ABSAXIS, data_size: 8, objects: &misaligned },
            DataFormat { flags: DIDF_ABSAXIS, data_size: 4, objects: &past_end },
            DataFormat { flags: DIDF_ABSAXIS, data_size: 4, objects: &wrapping },
        ];
        for case in &cases {
            assert_eq!(dev.set_data_format(case), Status::INVALID_PARAM, "{case:?}");
        }
        assert_eq!(dev.format_summary(), None);
        assert_eq!(dev.acquire(), Status::INVALID_PARAM);
    }

    #[test]
    fn missing_required_object_is_unsupported() {
        let dev = SimulatedDevice::new("sim:1", "Wheel").with_axis(ObjectGuid::XAxis, Aspect::Position);
        let rx = [required_axis(ObjectGuid::RxAxis, 0)];
        let fmt = DataFormat { flags: DIDF_ABSAXIS, data_size: 4, objects: &rx };
        assert_eq!(dev.set_data_format(&fmt), Status::UNSUPPORTED);

        let x = [required_axis(ObjectGuid::XAxis, 0)];
        let fmt = DataFormat { flags: DIDF_ABSAXIS, data_size: 4, objects: &x };
        assert_eq!(dev.set_data_format(&fmt), Status::OK);
    }

    #[test]
    fn extended_format_fits_devices_without_controls() {
        let dev = SimulatedDevice::new("sim:2", "Bare");
        configure(&dev).unwrap();
        dev.acquire();
        let state = dev.read_joystate().unwrap();
        assert_eq!(state, JoyState2::default());
    }

    #[test]
    fn forced_rejection_surfaces_its_status() {
        let dev = SimulatedDevice::joystick("sim:0", "Stick");
        dev.reject_formats_with(Status::GENERIC);
        assert_eq!(configure(&dev).unwrap_err().status(), Status::GENERIC);
        assert_eq!(dev.format_summary(), None);
    }

    #[test]
    fn success_status_clears_forced_rejection() {
        let dev = SimulatedDevice::joystick("sim:0", "Stick");
        dev.reject_formats_with(Status::OK);
        configure(&dev).unwrap();
        assert!(dev.has_format(&EXTENDED_JOYSTICK));

        let other = SimulatedDevice::joystick("sim:1", "Stick");
        other.reject_formats_with(Status::GENERIC);
        other.reject_formats_with(Status::FALSE);
        configure(&other).unwrap();
        assert!(other.acquire().is_success());
    }

    #[test]
    fn state_reads_need_acquisition_and_matching_buffer() {
        let dev = SimulatedDevice::joystick("sim:0", "Stick");
        configure(&dev).unwrap();
        assert_eq!(dev.get_device_state(&mut [0u8; 272]), Status::NOT_ACQUIRED);
        dev.acquire();
        assert_eq!(dev.get_device_state(&mut [0u8; 80]), Status::INVALID_PARAM);
        assert_eq!(dev.get_device_state(&mut [0u8; 272]), Status::OK);
    }

    #[test]
    fn controls_land_in_their_fields() {
        let dev = SimulatedDevice::joystick("sim:0", "Stick")
            .with_axis(ObjectGuid::XAxis, Aspect::Velocity);
        assert!(dev.set_axis(ObjectGuid::XAxis, Aspect::Position, 0, 1000));
        assert!(dev.set_axis(ObjectGuid::RzAxis, Aspect::Position, 0, -20));
        assert!(dev.set_axis(ObjectGuid::Slider, Aspect::Position, 1, 65535));
        assert!(dev.set_axis(ObjectGuid::XAxis, Aspect::Velocity, 0, 7));
        assert!(dev.set_pov(0, Some(27000)));
        assert!(dev.set_button(31, true));
        assert!(!dev.set_button(32, true));
        assert!(!dev.set_axis(ObjectGuid::RxAxis, Aspect::Position, 0, 1));

        configure(&dev).unwrap();
        dev.acquire();
        let s = dev.read_joystate().unwrap();
        assert_eq!((s.x, s.rz, s.rx), (1000, -20, 0));
        assert_eq!(s.sliders, [0, 65535]);
        assert_eq!(s.vx, 7);
        assert_eq!(s.povs[0], 27000);
        assert!(s.pov_centered(1));
        assert!(s.button_pressed(31));
        assert!(!s.button_pressed(0));
    }
}
