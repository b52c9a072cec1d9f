//! Text decoding of HDF5 metadata datasets and attributes
//!
//! Metadata arrays may hold fixed- or variable-length strings, or numbers.
//! Every value comes back as text with trailing padding removed; numbers are
//! formatted the way they print in the tools that write these stores.

use crate::resolver::trim_str_padding;
use gct_core::FormatError;
use hdf5::types::{FixedAscii, FixedUnicode, FloatSize, TypeDescriptor, VarLenAscii, VarLenUnicode};
use hdf5::Container;

/// Decoding failure: either the HDF5 read or the stored type
#[derive(Debug)]
pub(crate) enum DecodeError {
    Hdf5(hdf5::Error),
    Format(FormatError),
}

impl From<hdf5::Error> for DecodeError {
    fn from(err: hdf5::Error) -> Self {
        DecodeError::Hdf5(err)
    }
}

impl From<FormatError> for DecodeError {
    fn from(err: FormatError) -> Self {
        DecodeError::Format(err)
    }
}

type Decoded<T> = std::result::Result<T, DecodeError>;

/// Read every element of a container as text
pub(crate) fn text_values(container: &Container) -> Decoded<Vec<String>> {
    match container.dtype()?.to_descriptor()? {
        TypeDescriptor::VarLenUnicode => {
            decode_all(container.read_raw::<VarLenUnicode>()?.iter().map(|v| v.as_bytes()))
        }
        TypeDescriptor::VarLenAscii => {
            decode_all(container.read_raw::<VarLenAscii>()?.iter().map(|v| v.as_bytes()))
        }
        TypeDescriptor::FixedAscii(width) => read_fixed_ascii(container, width),
        TypeDescriptor::FixedUnicode(width) => read_fixed_unicode(container, width),
        TypeDescriptor::Integer(_) => Ok(format_all(container.read_raw::<i64>()?)),
        TypeDescriptor::Unsigned(_) => Ok(format_all(container.read_raw::<u64>()?)),
        TypeDescriptor::Float(FloatSize::U4) => Ok(format_floats(container.read_raw::<f32>()?)),
        TypeDescriptor::Float(_) => Ok(format_floats(container.read_raw::<f64>()?)),
        TypeDescriptor::Boolean => Ok(container
            .read_raw::<bool>()?
            .into_iter()
            .map(|b| if b { "True" } else { "False" }.to_string())
            .collect()),
        _ => Err(FormatError::UnknownDataType.into()),
    }
}

/// Read a scalar container as text
pub(crate) fn text_scalar(container: &Container) -> Decoded<String> {
    text_values(container)?
        .into_iter()
        .next()
        .ok_or_else(|| FormatError::InvalidRank.into())
}

// Fixed-width strings convert to any wider fixed width, so each stored width
// is read into the smallest buffer width that holds it.
macro_rules! read_fixed {
    ($name:ident, $ty:ident, [$($n:literal),+]) => {
        fn $name(container: &Container, width: usize) -> Decoded<Vec<String>> {
            $(
                if width <= $n {
                    let values = container.read_raw::<$ty<$n>>()?;
                    return decode_all(values.iter().map(|v| v.as_bytes()));
                }
            )+
            Err(FormatError::ArraySizeOverflow.into())
        }
    };
}

read_fixed!(read_fixed_ascii, FixedAscii, [16, 64, 256, 1024, 4096]);
read_fixed!(read_fixed_unicode, FixedUnicode, [16, 64, 256, 1024, 4096]);

fn decode_all<'a>(values: impl Iterator<Item = &'a [u8]>) -> Decoded<Vec<String>> {
    values
        .map(|bytes| {
            let text = std::str::from_utf8(bytes).map_err(|_| FormatError::InvalidUtf8)?;
            Ok(trim_str_padding(text).to_string())
        })
        .collect()
}

fn format_all<T: ToString>(values: Vec<T>) -> Vec<String> {
    values.iter().map(ToString::to_string).collect()
}

/// Floats keep a fractional part (`5.0`, not `5`)
fn format_floats<T: std::fmt::Debug>(values: Vec<T>) -> Vec<String> {
    values.iter().map(|v| format!("{v:?}")).collect()
}
