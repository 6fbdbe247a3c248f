//! Primitive wire-level reads and writes. Everything multi-byte on this wire is
//! big-endian; strings are a u16 byte count followed by UTF-8 data.

use std::io::{Read, Result as IoResult, Write};
use std::mem::ManuallyDrop;

use byteorder::{BigEndian, ReadBytesExt as _, WriteBytesExt as _};

use crate::io::NbtIoError;
use crate::tag::NbtTag;


type NbtResult<T> = Result<T, NbtIoError>;


#[inline]
pub(crate) const fn id_for_tag(tag: Option<&NbtTag>) -> u8 {
    match tag {
        None => 0x0, // TAG_End
        Some(NbtTag::Byte(..))      => 0x1,
        Some(NbtTag::Short(..))     => 0x2,
        Some(NbtTag::Int(..))       => 0x3,
        Some(NbtTag::Long(..))      => 0x4,
        Some(NbtTag::Float(..))     => 0x5,
        Some(NbtTag::Double(..))    => 0x6,
        Some(NbtTag::ByteArray(..)) => 0x7,
        Some(NbtTag::String(..))    => 0x8,
        Some(NbtTag::List(..))      => 0x9,
        Some(NbtTag::Compound(..))  => 0xA,
        Some(NbtTag::IntArray(..))  => 0xB,
        Some(NbtTag::LongArray(..)) => 0xC,
    }
}

#[inline]
pub(crate) fn read_u8<R: Read>(reader: &mut R) -> IoResult<u8> {
    reader.read_u8()
}

#[inline]
pub(crate) fn read_i8<R: Read>(reader: &mut R) -> IoResult<i8> {
    reader.read_i8()
}

#[inline]
pub(crate) fn read_i16<R: Read>(reader: &mut R) -> IoResult<i16> {
    reader.read_i16::<BigEndian>()
}

#[inline]
pub(crate) fn read_i32<R: Read>(reader: &mut R) -> IoResult<i32> {
    reader.read_i32::<BigEndian>()
}

#[inline]
pub(crate) fn read_i64<R: Read>(reader: &mut R) -> IoResult<i64> {
    reader.read_i64::<BigEndian>()
}

#[inline]
pub(crate) fn read_f32<R: Read>(reader: &mut R) -> IoResult<f32> {
    reader.read_f32::<BigEndian>()
}

#[inline]
pub(crate) fn read_f64<R: Read>(reader: &mut R) -> IoResult<f64> {
    reader.read_f64::<BigEndian>()
}

/// Reads a 4-byte signed element count; negative counts are a decode error.
#[inline]
pub(crate) fn read_len<R: Read>(reader: &mut R) -> NbtResult<usize> {
    let len = read_i32(reader)?;
    usize::try_from(len).map_err(|_| NbtIoError::NegativeLength(len))
}

pub(crate) fn read_string<R: Read>(reader: &mut R) -> NbtResult<String> {
    let len = usize::from(reader.read_u16::<BigEndian>()?);
    let mut bytes = vec![0; len];
    reader.read_exact(&mut bytes)?;

    match String::from_utf8(bytes) {
        Ok(string) => Ok(string),
        Err(_) => Err(NbtIoError::InvalidUtf8String),
    }
}

pub(crate) fn read_i32_array<R: Read>(reader: &mut R, len: usize) -> IoResult<Vec<i32>> {
    // Element-at-a-time with an explicit big-endian decode; no byteswap branch needed.
    (0 .. len).map(|_| read_i32(reader)).collect()
}

pub(crate) fn read_i64_array<R: Read>(reader: &mut R, len: usize) -> IoResult<Vec<i64>> {
    (0 .. len).map(|_| read_i64(reader)).collect()
}

#[inline]
pub(crate) fn write_u8<W: Write>(writer: &mut W, value: u8) -> IoResult<()> {
    writer.write_u8(value)
}

#[inline]
pub(crate) fn write_i8<W: Write>(writer: &mut W, value: i8) -> IoResult<()> {
    writer.write_i8(value)
}

#[inline]
pub(crate) fn write_i16<W: Write>(writer: &mut W, value: i16) -> IoResult<()> {
    writer.write_i16::<BigEndian>(value)
}

#[inline]
pub(crate) fn write_i32<W: Write>(writer: &mut W, value: i32) -> IoResult<()> {
    writer.write_i32::<BigEndian>(value)
}

#[inline]
pub(crate) fn write_i64<W: Write>(writer: &mut W, value: i64) -> IoResult<()> {
    writer.write_i64::<BigEndian>(value)
}

#[inline]
pub(crate) fn write_f32<W: Write>(writer: &mut W, value: f32) -> IoResult<()> {
    writer.write_f32::<BigEndian>(value)
}

#[inline]
pub(crate) fn write_f64<W: Write>(writer: &mut W, value: f64) -> IoResult<()> {
    writer.write_f64::<BigEndian>(value)
}

#[inline]
pub(crate) fn write_len<W: Write>(writer: &mut W, len: usize) -> NbtResult<()> {
    let len = i32::try_from(len).map_err(|_| NbtIoError::ExcessiveLength(len))?;
    write_i32(writer, len)?;
    Ok(())
}

#[inline]
pub(crate) fn write_string<W: Write>(writer: &mut W, string: &str) -> NbtResult<()> {
    let bytes = string.as_bytes();
    let len = u16::try_from(bytes.len())
        .map_err(|_| NbtIoError::ExcessiveLength(bytes.len()))?;
    writer.write_u16::<BigEndian>(len)?;
    writer.write_all(bytes).map_err(NbtIoError::StdIo)
}

#[expect(unsafe_code)]
#[inline]
pub(crate) fn cast_byte_buf_to_signed(buf: Vec<u8>) -> Vec<i8> {
    let mut me = ManuallyDrop::new(buf);
    let ptr = me.as_mut_ptr() as *mut i8;
    let length = me.len();
    let capacity = me.capacity();

    // SAFETY:
    // * `ptr` was allocated by a Vec
    // * i8 has the same size and alignment as u8
    // * `length` and `capacity` came from a valid Vec
    unsafe { Vec::from_raw_parts(ptr, length, capacity) }
}

#[expect(unsafe_code)]
#[inline]
pub(crate) fn cast_bytes_to_unsigned(bytes: &[i8]) -> &[u8] {
    let data = bytes.as_ptr() as *const u8;
    let len = bytes.len();

    // SAFETY:
    // * `data` is valid for `len` bytes and came from a single allocated object
    // * u8 has the same size and alignment as i8
    // * the constructed reference adopts the lifetime of the provided reference
    unsafe { std::slice::from_raw_parts(data, len) }
}
