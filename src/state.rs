//! `DIJOYSTATE2` state layout.
//!
//! [`JoyState2`] is the buffer shape a device produces once it has been configured
//! with [`EXTENDED_JOYSTICK`](crate::format::EXTENDED_JOYSTICK). Reading state is
//! the polling collaborator's job; this type only pins down what those bytes mean.
//!
//! ## Value conventions (platform-defined, not normalized here)
//! - Axes and sliders are raw `i32` values in the device's configured range.
//! - POVs are hundredths of a degree clockwise from north; a low word of
//!   `0xFFFF` means centered.
//! - Buttons are pressed when the high bit (`0x80`) is set.

use crate::format::EXTENDED_JOYSTICK_DATA_SIZE;
use std::mem::{offset_of, size_of};

/// Value of a centered POV.
pub const POV_CENTERED: u32 = 0xFFFF_FFFF;

/// Mirror of `DIJOYSTATE2`. Field order is the descriptor's object order.
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
#[repr(C)]
pub struct JoyState2 {
    pub x: i32,
    pub y: i32,
    pub z: i32,
    pub rx: i32,
    pub ry: i32,
    pub rz: i32,
    pub sliders: [i32; 2],
    pub povs: [u32; 4],
    pub buttons: [u8; 128],
    pub vx: i32,
    pub vy: i32,
    pub vz: i32,
    pub vrx: i32,
    pub vry: i32,
    pub vrz: i32,
    pub v_sliders: [i32; 2],
    pub ax: i32,
    pub ay: i32,
    pub az: i32,
    pub arx: i32,
    pub ary: i32,
    pub arz: i32,
    pub a_sliders: [i32; 2],
    pub fx: i32,
    pub fy: i32,
    pub fz: i32,
    pub frx: i32,
    pub fry: i32,
    pub frz: i32,
    pub f_sliders: [i32; 2],
}

const _: () = assert!(size_of::<JoyState2>() == EXTENDED_JOYSTICK_DATA_SIZE as usize);

impl Default for JoyState2 {
    fn default() -> Self {
        Self {
            x: 0,
            y: 0,
            z: 0,
            rx: 0,
            ry: 0,
            rz: 0,
            sliders: [0; 2],
            povs: [POV_CENTERED; 4],
            buttons: [0; 128],
            vx: 0,
            vy: 0,
            vz: 0,
            vrx: 0,
            vry: 0,
            vrz: 0,
            v_sliders: [0; 2],
            ax: 0,
            ay: 0,
            az: 0,
            arx: 0,
            ary: 0,
            arz: 0,
            a_sliders: [0; 2],
            fx: 0,
            fy: 0,
            fz: 0,
            frx: 0,
            fry: 0,
            frz: 0,
            f_sliders: [0; 2],
        }
    }
}

#[inline]
fn word(bytes: &[u8], at: usize) -> [u8; 4] {
    [bytes[at], bytes[at + 1], bytes[at + 2], bytes[at + 3]]
}

impl JoyState2 {
    /// Decode a state buffer as written by the platform (native little-endian).
    ///
    /// Returns `None` if `bytes` is shorter than `DIJOYSTATE2`.
    pub fn from_bytes(bytes: &[u8]) -> Option<Self> {
        if bytes.len() < size_of::<Self>() {
            return None;
        }
        let long = |at: usize| i32::from_le_bytes(word(bytes, at));
        let longs2 = |at: usize| [long(at), long(at + 4)];

        let mut povs = [0u32; 4];
        for (i, pov) in povs.iter_mut().enumerate() {
            *pov = u32::from_le_bytes(word(bytes, offset_of!(Self, povs) + i * 4));
        }
        let mut buttons = [0u8; 128];
        let b = offset_of!(Self, buttons);
        buttons.copy_from_slice(&bytes[b..b + 128]);

        Some(Self {
            x: long(offset_of!(Self, x)),
            y: long(offset_of!(Self, y)),
            z: long(offset_of!(Self, z)),
            rx: long(offset_of!(Self, rx)),
            ry: long(offset_of!(Self, ry)),
            rz: long(offset_of!(Self, rz)),
            sliders: longs2(offset_of!(Self, sliders)),
            povs,
            buttons,
            vx: long(offset_of!(Self, vx)),
            vy: long(offset_of!(Self, vy)),
            vz: long(offset_of!(Self, vz)),
            vrx: long(offset_of!(Self, vrx)),
            vry: long(offset_of!(Self, vry)),
            vrz: long(offset_of!(Self, vrz)),
            v_sliders: longs2(offset_of!(Self, v_sliders)),
            ax: long(offset_of!(Self, ax)),
            ay: long(offset_of!(Self, ay)),
            az: long(offset_of!(Self, az)),
            arx: long(offset_of!(Self, arx)),
            ary: long(offset_of!(Self, ary)),
            arz: long(offset_of!(Self, arz)),
            a_sliders: longs2(offset_of!(Self, a_sliders)),
            fx: long(offset_of!(Self, fx)),
            fy: long(offset_of!(Self, fy)),
            fz: long(offset_of!(Self, fz)),
            frx: long(offset_of!(Self, frx)),
            fry: long(offset_of!(Self, fry)),
            frz: long(offset_of!(Self, frz)),
            f_sliders: longs2(offset_of!(Self, f_sliders)),
        })
    }

    /// `true` if button `index` has its high bit set. Out-of-range indices are released.
    #[inline]
    pub fn button_pressed(&self, index: usize) -> bool {
        self.buttons.get(index).is_some_and(|b| b & 0x80 != 0)
    }

    /// `true` if POV `index` is centered (or does not exist).
    #[inline]
    pub fn pov_centered(&self, index: usize) -> bool {
        self.povs.get(index).map_or(true, |p| p & 0xFFFF == 0xFFFF)
    }
}
