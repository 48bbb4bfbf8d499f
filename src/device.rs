use crate::error::Status;
use crate::format::DataFormat;

/// Anything that can be asked to adopt a data format.
///
/// Takes `&self`: the device record being changed belongs to the platform, not to
/// the caller. Implementations hand back the raw platform status untouched.
pub trait FormatTarget {
    fn set_data_format(&self, format: &DataFormat<'_>) -> Status;
}

impl<T: FormatTarget + ?Sized> FormatTarget for &T {
    fn set_data_format(&self, format: &DataFormat<'_>) -> Status {
        (**self).set_data_format(format)
    }
}
