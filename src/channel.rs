//! Channel descriptions derived from a data format.
//!
//! A [`DataFormat`] is a flat list of offsets; UIs, logs and binding tools want
//! names. [`describe`] walks a format and produces one [`ChannelDesc`] per object,
//! numbering channels per kind in descriptor order.
//!
//! ## Naming
//! - Axes use the `DIJOYSTATE2` field stems: `X`, `Rz`, `VX`, `ARy`, `FSlider1`.
//!   Sliders are numbered per aspect (`Slider0`, `Slider1`).
//! - POVs are `POV0..`; buttons `Button0..`.
//! - Objects without a GUID that are not buttons fall back to `Axis{n}` / `POV{n}`.

use crate::format::{Aspect, DataFormat, ObjectGuid, ObjectKind};
use serde::{Deserialize, Serialize};
use std::collections::HashMap;

/// Category of a channel.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub enum ChannelKind {
    Axis,
    Button,
    Pov,
}

impl From<ObjectKind> for ChannelKind {
    fn from(kind: ObjectKind) -> Self {
        match kind {
            ObjectKind::Axis => ChannelKind::Axis,
            ObjectKind::Button => ChannelKind::Button,
            ObjectKind::Pov => ChannelKind::Pov,
        }
    }
}

/// Describes one object of a data format.
#[derive(Clone, Debug, PartialEq, Eq, Serialize, Deserialize)]
pub struct ChannelDesc {
    pub kind: ChannelKind,
    /// Index among channels of the same kind, in descriptor order.
    pub idx: u16,
    /// Human-friendly name (see module docs).
    pub name: String,
    /// Axis aspect, when the object carries one.
    pub aspect: Option<Aspect>,
    /// Byte offset into the state buffer.
    pub offset: u32,
}

/// Describe every object of `format`.
pub fn describe(format: &DataFormat<'_>) -> Vec<ChannelDesc> {
    let mut out = Vec::with_capacity(format.object_count());
    let mut per_kind: HashMap<ChannelKind, u16> = HashMap::new();
    let mut sliders: HashMap<Option<Aspect>, u16> = HashMap::new();

    for obj in format.objects {
        let kind = ChannelKind::from(obj.kind);
        let idx = *per_kind.entry(kind).and_modify(|n| *n += 1).or_insert(0);
        let prefix = obj.aspect.map_or("", Aspect::prefix);

        let name = match (obj.kind, obj.guid) {
            (ObjectKind::Button, _) => format!("Button{idx}"),
            (ObjectKind::Pov, _) => format!("POV{idx}"),
            (ObjectKind::Axis, Some(ObjectGuid::Slider)) => {
                let n = *sliders
                    .entry(obj.aspect)
                    .and_modify(|n| *n += 1)
                    .or_insert(0);
                format!("{prefix}Slider{n}")
            }
            (ObjectKind::Axis, Some(guid)) => format!("{prefix}{}", guid.label()),
            (ObjectKind::Axis, None) => format!("{prefix}Axis{idx}"),
        };

        out.push(ChannelDesc {
            kind,
            idx,
            name,
            aspect: obj.aspect,
            offset: obj.offset,
        });
    }
    out
}

/// Channel map of `format` as pretty JSON, for device reports and tooling.
pub fn layout_json(format: &DataFormat<'_>) -> serde_json::Result<String> {
    serde_json::to_string_pretty(&describe(format))
}
