use std::{
    any::type_name,
    ops::{Add, Rem, Sub},
};

use zerocopy::FromBytes;

use crate::ReadError;

/// Returns the bytes of `data` starting at `offset`, or an error naming the requested structure.
pub fn tail<T>(data: &[u8], offset: u64) -> Result<&[u8], ReadError> {
    usize::try_from(offset)
        .ok()
        .and_then(|offset| data.get(offset..))
        .ok_or_else(|| ReadError(format!("{} at {:#x} outside of {:#x}", type_name::<T>(), offset, data.len())))
}

/// Returns `data[offset..offset + length]`, or an error if the range is out of bounds.
pub fn range(data: &[u8], offset: u64, length: u64) -> Result<&[u8], ReadError> {
    offset
        .checked_add(length)
        .and_then(|end| data.get(usize::try_from(offset).ok()?..usize::try_from(end).ok()?))
        .ok_or_else(|| {
            ReadError(format!("range {:#x}+{:#x} outside of {:#x}", offset, length, data.len()))
        })
}

pub fn read<T: FromBytes + Copy>(resource: &[u8]) -> Result<T, ReadError> {
    T::read_from_prefix(resource)
        .map_err(|_| ReadError(type_name::<T>().to_string()))
        .map(|(value, _)| value)
}

/// Reads a `T` at `offset` in `data`.
pub fn read_at<T: FromBytes + Copy>(data: &[u8], offset: u64) -> Result<T, ReadError> {
    read::<T>(tail::<T>(data, offset)?)
}

pub fn aligned_to<T: Add<Output = T> + Sub<Output = T> + Rem<Output = T> + Eq + Copy + Default>(
    value: T, alignment: T,
) -> T {
    if value % alignment == T::default() {
        return value;
    }
    value + alignment - (value % alignment)
}
