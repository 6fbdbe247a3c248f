//! Binary NBT readers and writers.
//!
//! A root NBT stream is one tag preceded by its type id and name. The file-level
//! readers detect gzip by its magic bytes rather than by file extension, so compressed
//! and uncompressed files go through the same entry points.

use std::io;
use std::{fs::File, path::Path};
use std::io::{BufReader, BufWriter, Chain, Cursor, Read, Write};

use flate2::Compression;
use flate2::{read::GzDecoder, write::GzEncoder};
use thiserror::Error;

use crate::raw;
use crate::tag::{NbtCompound, NbtList, NbtTag, TagType};


const GZIP_MAGIC: [u8; 2] = [0x1F, 0x8B];

/// Compression applied at the outer boundary of an NBT file.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum NbtCompression {
    Uncompressed,
    Gzip,
}

/// Reads a root NBT stream from the given reader, returning the tag and its root name.
///
/// Any non-End tag type is accepted as the root.
pub fn read_tag<R: Read>(reader: &mut R) -> Result<(NbtTag, String), NbtIoError> {
    let root_id = raw::read_u8(reader)?;
    let Some(root_type) = TagType::from_id(root_id) else {
        return Err(NbtIoError::InvalidTagId(root_id));
    };
    if root_type == TagType::End {
        return Err(NbtIoError::InvalidRootTag);
    }

    let root_name = raw::read_string(reader)?;
    let tag = read_tag_body(reader, root_type)?;
    Ok((tag, root_name))
}

/// Reads a root NBT stream whose root must be a compound, returning the compound and
/// its root name.
pub fn read_compound<R: Read>(reader: &mut R) -> Result<(NbtCompound, String), NbtIoError> {
    let root_id = raw::read_u8(reader)?;
    if root_id != TagType::Compound.id() {
        return Err(NbtIoError::TagTypeMismatch {
            expected: TagType::Compound.id(),
            found: root_id,
        });
    }

    let root_name = raw::read_string(reader)?;
    match read_tag_body(reader, TagType::Compound)? {
        NbtTag::Compound(compound) => Ok((compound, root_name)),
        _ => unreachable!("read_tag_body returns the requested variant"),
    }
}

/// Reads a root NBT stream, transparently decompressing it when the first two bytes are
/// the gzip magic number.
pub fn read_tag_compressed<R: Read>(reader: R) -> Result<(NbtTag, String), NbtIoError> {
    let (is_gzip, mut reader) = sniff_gzip(reader)?;
    if is_gzip {
        read_tag(&mut GzDecoder::new(reader))
    } else {
        read_tag(&mut reader)
    }
}

/// Reads an NBT file, transparently decompressing gzip, returning the root tag and its
/// name.
pub fn read_nbt_file<P: AsRef<Path>>(path: P) -> Result<(NbtTag, String), NbtIoError> {
    let file = File::open(path)?;
    read_tag_compressed(BufReader::new(file))
}

/// Peeks at the first two bytes of the stream and reports whether they are the gzip
/// magic number. The consumed bytes are handed back at the front of the returned
/// reader.
fn sniff_gzip<R: Read>(
    mut reader: R,
) -> Result<(bool, Chain<Cursor<Vec<u8>>, R>), NbtIoError> {
    let mut magic = [0_u8; 2];
    let mut filled = 0;
    while filled < magic.len() {
        let count = reader.read(&mut magic[filled ..])?;
        if count == 0 {
            break;
        }
        filled += count;
    }

    let is_gzip = filled == magic.len() && magic == GZIP_MAGIC;
    Ok((is_gzip, Cursor::new(magic[.. filled].to_vec()).chain(reader)))
}

fn read_tag_body<R: Read>(reader: &mut R, tag_type: TagType) -> Result<NbtTag, NbtIoError> {
    let tag = match tag_type {
        TagType::End => return Err(NbtIoError::InvalidTagId(TagType::End.id())),
        TagType::Byte   => NbtTag::Byte(raw::read_i8(reader)?),
        TagType::Short  => NbtTag::Short(raw::read_i16(reader)?),
        TagType::Int    => NbtTag::Int(raw::read_i32(reader)?),
        TagType::Long   => NbtTag::Long(raw::read_i64(reader)?),
        TagType::Float  => NbtTag::Float(raw::read_f32(reader)?),
        TagType::Double => NbtTag::Double(raw::read_f64(reader)?),
        TagType::ByteArray => {
            let len = raw::read_len(reader)?;
            let mut array = vec![0_u8; len];
            reader.read_exact(&mut array)?;
            NbtTag::ByteArray(raw::cast_byte_buf_to_signed(array))
        }
        TagType::String => NbtTag::String(raw::read_string(reader)?),
        TagType::List => {
            let element_id = raw::read_u8(reader)?;
            let Some(element_type) = TagType::from_id(element_id) else {
                return Err(NbtIoError::InvalidTagId(element_id));
            };
            let raw_len = raw::read_i32(reader)?;

            if element_type == TagType::End {
                // An empty list may be written with element id 0; a nonempty list of
                // TAG_End cannot exist.
                return if raw_len <= 0 {
                    Ok(NbtTag::List(NbtList::new(TagType::End)))
                } else {
                    Err(NbtIoError::InvalidTagId(element_id))
                };
            }

            let len = usize::try_from(raw_len)
                .map_err(|_| NbtIoError::NegativeLength(raw_len))?;
            let mut list = NbtList::with_capacity(element_type, len);
            for _ in 0 .. len {
                list.tags.push(read_tag_body(reader, element_type)?);
            }
            NbtTag::List(list)
        }
        TagType::Compound => {
            let mut compound = NbtCompound::new();
            let mut tag_id = raw::read_u8(reader)?;

            // Read until TAG_End
            while tag_id != 0x0 {
                let Some(entry_type) = TagType::from_id(tag_id) else {
                    return Err(NbtIoError::InvalidTagId(tag_id));
                };
                let name = raw::read_string(reader)?;
                let tag = read_tag_body(reader, entry_type)?;
                compound.insert(name, tag);
                tag_id = raw::read_u8(reader)?;
            }

            NbtTag::Compound(compound)
        }
        TagType::IntArray => {
            let len = raw::read_len(reader)?;
            NbtTag::IntArray(raw::read_i32_array(reader, len)?)
        }
        TagType::LongArray => {
            let len = raw::read_len(reader)?;
            NbtTag::LongArray(raw::read_i64_array(reader, len)?)
        }
    };

    Ok(tag)
}

/// Writes the given tag to the writer as an uncompressed root NBT stream.
pub fn write_tag<W: Write>(
    writer: &mut W,
    root_name: &str,
    tag: &NbtTag,
) -> Result<(), NbtIoError> {
    raw::write_u8(writer, raw::id_for_tag(Some(tag)))?;
    raw::write_string(writer, root_name)?;
    write_tag_body(writer, tag)
}

/// Writes the given tag to the writer as a root NBT stream, optionally gzip-compressed.
pub fn write_tag_compressed<W: Write>(
    writer: &mut W,
    root_name: &str,
    tag: &NbtTag,
    compression: NbtCompression,
) -> Result<(), NbtIoError> {
    match compression {
        NbtCompression::Uncompressed => write_tag(writer, root_name, tag),
        NbtCompression::Gzip => {
            let mut encoder = GzEncoder::new(writer, Compression::default());
            write_tag(&mut encoder, root_name, tag)?;
            encoder.finish()?;
            Ok(())
        }
    }
}

/// Writes the given tag to a file as a root NBT stream, optionally gzip-compressed.
pub fn write_nbt_file<P: AsRef<Path>>(
    path: P,
    root_name: &str,
    tag: &NbtTag,
    compression: NbtCompression,
) -> Result<(), NbtIoError> {
    let file = File::create(path)?;
    let mut writer = BufWriter::new(file);
    write_tag_compressed(&mut writer, root_name, tag, compression)?;
    writer.flush()?;
    Ok(())
}

fn write_tag_body<W: Write>(writer: &mut W, tag: &NbtTag) -> Result<(), NbtIoError> {
    match tag {
        &NbtTag::Byte(value)   => raw::write_i8(writer, value)?,
        &NbtTag::Short(value)  => raw::write_i16(writer, value)?,
        &NbtTag::Int(value)    => raw::write_i32(writer, value)?,
        &NbtTag::Long(value)   => raw::write_i64(writer, value)?,
        &NbtTag::Float(value)  => raw::write_f32(writer, value)?,
        &NbtTag::Double(value) => raw::write_f64(writer, value)?,
        NbtTag::ByteArray(value) => {
            raw::write_len(writer, value.len())?;
            writer.write_all(raw::cast_bytes_to_unsigned(value.as_slice()))?;
        }
        NbtTag::String(value) => raw::write_string(writer, value)?,
        NbtTag::List(value) => {
            // The declared element type is emitted even for empty lists; the container
            // guarantees the elements match it.
            raw::write_u8(writer, value.element_type().id())?;
            raw::write_len(writer, value.len())?;
            for sub_tag in value {
                write_tag_body(writer, sub_tag)?;
            }
        }
        NbtTag::Compound(value) => {
            for (name, tag) in value.inner() {
                raw::write_u8(writer, raw::id_for_tag(Some(tag)))?;
                raw::write_string(writer, name)?;
                write_tag_body(writer, tag)?;
            }

            // TAG_End
            raw::write_u8(writer, raw::id_for_tag(None))?;
        }
        NbtTag::IntArray(value) => {
            raw::write_len(writer, value.len())?;
            for &int in value {
                raw::write_i32(writer, int)?;
            }
        }
        NbtTag::LongArray(value) => {
            raw::write_len(writer, value.len())?;
            for &long in value {
                raw::write_i64(writer, long)?;
            }
        }
    }

    Ok(())
}

/// Describes an error which occurred during the reading or writing of NBT byte data.
#[derive(Error, Debug)]
pub enum NbtIoError {
    /// A native I/O error.
    #[error(transparent)]
    StdIo(#[from] io::Error),
    /// A TAG_End id where a root tag was expected. All NBT byte data starts with the id
    /// of a non-End root tag.
    #[error("NBT tree does not start with a valid root tag")]
    InvalidRootTag,
    /// An invalid tag ID was encountered.
    #[error("encountered invalid tag ID 0x{0:X} during deserialization")]
    InvalidTagId(u8),
    /// The first tag ID was expected, but the second was found.
    #[error("tag type mismatch: expected 0x{expected:X} but found 0x{found:X}")]
    TagTypeMismatch {
        /// The expected ID.
        expected: u8,
        /// The found ID.
        found: u8,
    },
    /// The length prefix of a string or sequential type was negative.
    #[error("length of a string or sequential type was negative: {0}")]
    NegativeLength(i32),
    /// The length of a string or sequential type was too large to fit in the numeric
    /// type of its length prefix.
    #[error("length {0} does not fit in the length prefix of its type")]
    ExcessiveLength(usize),
    /// An invalid UTF-8 string was encountered.
    #[error("encountered invalid UTF-8 string")]
    InvalidUtf8String,
}
