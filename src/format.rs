//! Report format descriptors.
//!
//! A [`DataFormat`] tells DirectInput how to lay out the state buffer returned by
//! `GetDeviceState`: how many bytes, and which device object lands at which
//! offset. The platform ships its standard descriptors only as linker symbols
//! (`c_dfDIJoystick2` in `dinput8.lib`); this module spells the extended joystick
//! one out as a Rust constant instead, [`EXTENDED_JOYSTICK`].
//!
//! ## Extended joystick layout (`DIJOYSTATE2`, 272 bytes, 164 objects)
//! | offset  | objects                                             | aspect        |
//! |---------|-----------------------------------------------------|---------------|
//! | 0..32   | X, Y, Z, Rx, Ry, Rz, Slider, Slider                 | position      |
//! | 32..48  | POV 0..3                                            | -             |
//! | 48..176 | Button 0..127 (one byte each)                       | -             |
//! | 176..208| X, Y, Z, Rx, Ry, Rz, Slider, Slider                 | velocity      |
//! | 208..240| X, Y, Z, Rx, Ry, Rz, Slider, Slider                 | acceleration  |
//! | 240..272| X, Y, Z, Rx, Ry, Rz, Slider, Slider                 | force         |
//!
//! Every object is `DIDFT_OPTIONAL | DIDFT_ANYINSTANCE`, so a device without a given
//! control still accepts the format and simply reports a neutral value there.
//!
//! The table must stay byte-for-byte equivalent to the platform's own definition:
//! the platform trusts these offsets when it writes state into caller memory.

use serde::{Deserialize, Serialize};

/// `DIDF_ABSAXIS`: axes report absolute positions.
pub const DIDF_ABSAXIS: u32 = 0x0000_0001;
/// `DIDF_RELAXIS`: axes report relative motion.
pub const DIDF_RELAXIS: u32 = 0x0000_0002;

/// `DIDFT_OPTIONAL`: the format is accepted even if the device lacks the object.
pub const DIDFT_OPTIONAL: u32 = 0x8000_0000;
/// `DIDFT_ANYINSTANCE`: bind to whichever instance of the object type is next.
pub const DIDFT_ANYINSTANCE: u32 = 0x00FF_FF00;
/// `DIDFT_AXIS` (`DIDFT_RELAXIS | DIDFT_ABSAXIS`).
pub const DIDFT_AXIS: u32 = 0x0000_0003;
/// `DIDFT_BUTTON` (`DIDFT_PSHBUTTON | DIDFT_TGLBUTTON`).
pub const DIDFT_BUTTON: u32 = 0x0000_000C;
/// `DIDFT_POV`.
pub const DIDFT_POV: u32 = 0x0000_0010;

/// Byte size of `DIJOYSTATE2`.
pub const EXTENDED_JOYSTICK_DATA_SIZE: u32 = 272;
/// Number of objects in `c_dfDIJoystick2`.
pub const EXTENDED_JOYSTICK_OBJECT_COUNT: usize = 164;

/// Axes per aspect block: six axes plus two sliders.
const AXES_PER_BLOCK: usize = 8;
const POV_COUNT: usize = 4;
const BUTTON_COUNT: usize = 128;

/// Well-known DirectInput object type GUIDs.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub enum ObjectGuid {
    XAxis,
    YAxis,
    ZAxis,
    RxAxis,
    RyAxis,
    RzAxis,
    Slider,
    Pov,
}

impl ObjectGuid {
    /// All GUIDs, in discriminant order.
    pub const ALL: [ObjectGuid; 8] = [
        ObjectGuid::XAxis,
        ObjectGuid::YAxis,
        ObjectGuid::ZAxis,
        ObjectGuid::RxAxis,
        ObjectGuid::RyAxis,
        ObjectGuid::RzAxis,
        ObjectGuid::Slider,
        ObjectGuid::Pov,
    ];

    /// GUID value as a `u128` (`GUID::from_u128` order).
    pub const fn as_u128(self) -> u128 {
        match self {
            ObjectGuid::XAxis => 0xA36D02E0_C9F3_11CF_BFC7_444553540000,
            ObjectGuid::YAxis => 0xA36D02E1_C9F3_11CF_BFC7_444553540000,
            ObjectGuid::ZAxis => 0xA36D02E2_C9F3_11CF_BFC7_444553540000,
            ObjectGuid::RxAxis => 0xA36D02F4_C9F3_11CF_BFC7_444553540000,
            ObjectGuid::RyAxis => 0xA36D02F5_C9F3_11CF_BFC7_444553540000,
            ObjectGuid::RzAxis => 0xA36D02E3_C9F3_11CF_BFC7_444553540000,
            ObjectGuid::Slider => 0xA36D02E4_C9F3_11CF_BFC7_444553540000,
            ObjectGuid::Pov => 0xA36D02F2_C9F3_11CF_BFC7_444553540000,
        }
    }

    /// Short axis label used for channel names (`"Rx"`, `"Slider"`, ...).
    pub const fn label(self) -> &'static str {
        match self {
            ObjectGuid::XAxis => "X",
            ObjectGuid::YAxis => "Y",
            ObjectGuid::ZAxis => "Z",
            ObjectGuid::RxAxis => "Rx",
            ObjectGuid::RyAxis => "Ry",
            ObjectGuid::RzAxis => "Rz",
            ObjectGuid::Slider => "Slider",
            ObjectGuid::Pov => "POV",
        }
    }
}

/// Object category, i.e. the `DIDFT_*` type bits.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub enum ObjectKind {
    Axis,
    Pov,
    Button,
}

impl ObjectKind {
    pub const fn type_bits(self) -> u32 {
        match self {
            ObjectKind::Axis => DIDFT_AXIS,
            ObjectKind::Pov => DIDFT_POV,
            ObjectKind::Button => DIDFT_BUTTON,
        }
    }

    /// Bytes the object occupies in the state buffer.
    pub const fn width(self) -> u32 {
        match self {
            ObjectKind::Axis | ObjectKind::Pov => 4,
            ObjectKind::Button => 1,
        }
    }
}

/// What an axis measures (`DIDOI_ASPECT*`).
#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub enum Aspect {
    Position,
    Velocity,
    Acceleration,
    Force,
}

impl Aspect {
    pub const ALL: [Aspect; 4] = [
        Aspect::Position,
        Aspect::Velocity,
        Aspect::Acceleration,
        Aspect::Force,
    ];

    pub const fn flag_bits(self) -> u32 {
        match self {
            Aspect::Position => 0x0000_0100,
            Aspect::Velocity => 0x0000_0200,
            Aspect::Acceleration => 0x0000_0300,
            Aspect::Force => 0x0000_0400,
        }
    }

    /// Channel-name prefix matching the `DIJOYSTATE2` field names (`lVX`, `lAX`, `lFX`).
    pub const fn prefix(self) -> &'static str {
        match self {
            Aspect::Position => "",
            Aspect::Velocity => "V",
            Aspect::Acceleration => "A",
            Aspect::Force => "F",
        }
    }
}

/// One entry of a data format (`DIOBJECTDATAFORMAT`).
#[derive(Clone, Copy, Debug, PartialEq, Eq, Serialize, Deserialize)]
pub struct ObjectFormat {
    /// Object type GUID; `None` matches any object of `kind`.
    pub guid: Option<ObjectGuid>,
    /// Byte offset into the state buffer.
    pub offset: u32,
    pub kind: ObjectKind,
    /// Axis aspect; `None` leaves `dwFlags` at zero.
    pub aspect: Option<Aspect>,
    /// Mirrors `DIDFT_OPTIONAL`.
    pub optional: bool,
}

impl ObjectFormat {
    /// Native `dwType` value.
    pub const fn type_flags(&self) -> u32 {
        let optional = if self.optional { DIDFT_OPTIONAL } else { 0 };
        optional | self.kind.type_bits() | DIDFT_ANYINSTANCE
    }

    /// Native `dwFlags` value.
    pub const fn flags(&self) -> u32 {
        match self.aspect {
            Some(aspect) => aspect.flag_bits(),
            None => 0,
        }
    }

    /// End offset (exclusive) in the state buffer, `None` if it does not fit in `u32`.
    pub const fn end(&self) -> Option<u32> {
        self.offset.checked_add(self.kind.width())
    }
}

/// A complete data format (`DIDATAFORMAT` without the size fields, which depend on
/// the native struct layout and are filled in at the boundary).
#[derive(Clone, Copy, Debug, PartialEq, Eq, Serialize)]
pub struct DataFormat<'a> {
    /// `DIDF_ABSAXIS` or `DIDF_RELAXIS`.
    pub flags: u32,
    /// Size of the state buffer in bytes.
    pub data_size: u32,
    pub objects: &'a [ObjectFormat],
}

impl DataFormat<'_> {
    #[inline]
    pub fn object_count(&self) -> usize {
        self.objects.len()
    }
}

const fn axis(guid: ObjectGuid, offset: u32, aspect: Aspect) -> ObjectFormat {
    ObjectFormat {
        guid: Some(guid),
        offset,
        kind: ObjectKind::Axis,
        aspect: Some(aspect),
        optional: true,
    }
}

const PLACEHOLDER: ObjectFormat = ObjectFormat {
    guid: None,
    offset: 0,
    kind: ObjectKind::Button,
    aspect: None,
    optional: true,
};

/// GUID order inside one aspect block.
const BLOCK_GUIDS: [ObjectGuid; AXES_PER_BLOCK] = [
    ObjectGuid::XAxis,
    ObjectGuid::YAxis,
    ObjectGuid::ZAxis,
    ObjectGuid::RxAxis,
    ObjectGuid::RyAxis,
    ObjectGuid::RzAxis,
    ObjectGuid::Slider,
    ObjectGuid::Slider,
];

const fn build_extended_joystick() -> [ObjectFormat; EXTENDED_JOYSTICK_OBJECT_COUNT] {
    let mut out = [PLACEHOLDER; EXTENDED_JOYSTICK_OBJECT_COUNT];
    let mut n = 0;
    let mut offset = 0u32;

    // position block
    let mut i = 0;
    while i < AXES_PER_BLOCK {
        out[n] = axis(BLOCK_GUIDS[i], offset, Aspect::Position);
        n += 1;
        offset += 4;
        i += 1;
    }

    let mut i = 0;
    while i < POV_COUNT {
        out[n] = ObjectFormat {
            guid: Some(ObjectGuid::Pov),
            offset,
            kind: ObjectKind::Pov,
            aspect: None,
            optional: true,
        };
        n += 1;
        offset += 4;
        i += 1;
    }

    let mut i = 0;
    while i < BUTTON_COUNT {
        out[n] = ObjectFormat {
            guid: None,
            offset,
            kind: ObjectKind::Button,
            aspect: None,
            optional: true,
        };
        n += 1;
        offset += 1;
        i += 1;
    }

    // velocity, acceleration, force
    let mut a = 1;
    while a < Aspect::ALL.len() {
        let mut i = 0;
        while i < AXES_PER_BLOCK {
            out[n] = axis(BLOCK_GUIDS[i], offset, Aspect::ALL[a]);
            n += 1;
            offset += 4;
            i += 1;
        }
        a += 1;
    }

    assert!(n == EXTENDED_JOYSTICK_OBJECT_COUNT);
    assert!(offset == EXTENDED_JOYSTICK_DATA_SIZE);
    out
}

/// Object table of the extended joystick format, in platform order.
pub const EXTENDED_JOYSTICK_OBJECTS: [ObjectFormat; EXTENDED_JOYSTICK_OBJECT_COUNT] =
    build_extended_joystick();

/// The standard extended joystick format (`c_dfDIJoystick2`).
pub const EXTENDED_JOYSTICK: DataFormat<'static> = DataFormat {
    flags: DIDF_ABSAXIS,
    data_size: EXTENDED_JOYSTICK_DATA_SIZE,
    objects: &EXTENDED_JOYSTICK_OBJECTS,
};

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn header_matches_platform_definition() {
        assert_eq!(EXTENDED_JOYSTICK.flags, DIDF_ABSAXIS);
        assert_eq!(EXTENDED_JOYSTICK.data_size, 272);
        assert_eq!(EXTENDED_JOYSTICK.object_count(), 164);
    }

    #[test]
    fn objects_tile_the_buffer_without_gaps() {
        let mut expected = 0;
        for obj in EXTENDED_JOYSTICK.objects {
            assert_eq!(obj.offset, expected, "gap before {obj:?}");
            expected = obj.end().unwrap();
        }
        assert_eq!(expected, EXTENDED_JOYSTICK.data_size);
    }

    #[test]
    fn end_offset_does_not_wrap() {
        let pov = ObjectFormat {
            guid: Some(ObjectGuid::Pov),
            offset: 0xFFFF_FFFC,
            kind: ObjectKind::Pov,
            aspect: None,
            optional: true,
        };
        assert_eq!(pov.end(), None);

        let button = ObjectFormat { offset: 0xFFFF_FFFE, kind: ObjectKind::Button, guid: None, ..pov };
        assert_eq!(button.end(), Some(u32::MAX));
    }

    #[test]
    fn native_type_and_flag_words() {
        let objs = EXTENDED_JOYSTICK.objects;

        // X position
        assert_eq!(objs[0].type_flags(), 0x80FF_FF03);
        assert_eq!(objs[0].flags(), 0x100);
        // POV 0
        assert_eq!(objs[8].type_flags(), 0x80FF_FF10);
        assert_eq!(objs[8].flags(), 0);
        assert_eq!(objs[8].offset, 32);
        // Button 0 / 127
        assert_eq!(objs[12].type_flags(), 0x80FF_FF0C);
        assert_eq!(objs[12].guid, None);
        assert_eq!(objs[12].offset, 48);
        assert_eq!(objs[139].offset, 175);
        // velocity X, accel X, force slider 1
        assert_eq!((objs[140].offset, objs[140].flags()), (176, 0x200));
        assert_eq!((objs[148].offset, objs[148].flags()), (208, 0x300));
        assert_eq!((objs[163].offset, objs[163].flags()), (268, 0x400));
        assert_eq!(objs[163].guid, Some(ObjectGuid::Slider));
    }

    #[test]
    fn every_object_is_optional() {
        assert!(EXTENDED_JOYSTICK.objects.iter().all(|o| o.optional));
    }

    #[test]
    fn aspect_blocks_repeat_the_same_guid_order() {
        let objs = EXTENDED_JOYSTICK.objects;
        let position: Vec<_> = objs[..8].iter().map(|o| o.guid).collect();
        for start in [140, 148, 156] {
            let block: Vec<_> = objs[start..start + 8].iter().map(|o| o.guid).collect();
            assert_eq!(block, position);
        }
    }

    #[test]
    fn guid_values() {
        assert_eq!(
            ObjectGuid::XAxis.as_u128(),
            0xa36d02e0_c9f3_11cf_bfc7_444553540000
        );
        assert_eq!(
            ObjectGuid::RxAxis.as_u128(),
            0xa36d02f4_c9f3_11cf_bfc7_444553540000
        );
        assert_eq!(
            ObjectGuid::Pov.as_u128(),
            0xa36d02f2_c9f3_11cf_bfc7_444553540000
        );
    }
}
