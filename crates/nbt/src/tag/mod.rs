mod compound;
mod list;

use std::fmt;
use std::fmt::{Debug, Display, Formatter};

use crate::{io, raw, snbt};
use crate::io::NbtIoError;
use crate::repr::NbtStructureError;
use crate::snbt::SnbtError;

pub use self::compound::NbtCompound;
pub use self::list::NbtList;


/// The map type backing [`NbtCompound`]. `IndexMap` iterates over keys and values in
/// insertion order, which keeps a decode→encode cycle byte-exact.
pub type Map<T> = indexmap::IndexMap<String, T>;


/// The thirteen tag types of the wire format, by numeric id.
///
/// `End` (id 0) only appears on the wire, as the terminator of a compound and as the
/// element type of never-typed empty lists; it is not a value.
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash)]
pub enum TagType {
    End,
    Byte,
    Short,
    Int,
    Long,
    Float,
    Double,
    ByteArray,
    String,
    List,
    Compound,
    IntArray,
    LongArray,
}

impl TagType {
    /// Returns the tag type with the given wire id, or `None` for an unassigned id.
    pub const fn from_id(id: u8) -> Option<Self> {
        match id {
            0x0 => Some(Self::End),
            0x1 => Some(Self::Byte),
            0x2 => Some(Self::Short),
            0x3 => Some(Self::Int),
            0x4 => Some(Self::Long),
            0x5 => Some(Self::Float),
            0x6 => Some(Self::Double),
            0x7 => Some(Self::ByteArray),
            0x8 => Some(Self::String),
            0x9 => Some(Self::List),
            0xA => Some(Self::Compound),
            0xB => Some(Self::IntArray),
            0xC => Some(Self::LongArray),
            _ => None,
        }
    }

    /// Returns this type's wire id.
    #[inline]
    pub const fn id(self) -> u8 {
        self as u8
    }

    pub const fn name(self) -> &'static str {
        match self {
            Self::End       => "End",
            Self::Byte      => "Byte",
            Self::Short     => "Short",
            Self::Int       => "Int",
            Self::Long      => "Long",
            Self::Float     => "Float",
            Self::Double    => "Double",
            Self::ByteArray => "ByteArray",
            Self::String    => "String",
            Self::List      => "List",
            Self::Compound  => "Compound",
            Self::IntArray  => "IntArray",
            Self::LongArray => "LongArray",
        }
    }
}

impl Display for TagType {
    fn fmt(&self, f: &mut Formatter<'_>) -> fmt::Result {
        f.write_str(self.name())
    }
}

/// The generic NBT tag type, containing all supported tag variants which wrap around a
/// corresponding rust type.
///
/// Tags are plain values: they are built with the constructors below (or by one of the
/// decoders), mutated through the [`NbtList`] and [`NbtCompound`] container interfaces,
/// and cloned deeply. The `Display` and `Debug` implementations both emit compact SNBT;
/// the alternate form (`{:#}` / `{:#?}`) pretty-prints with indentation.
#[derive(Clone, PartialEq)]
pub enum NbtTag {
    /// A signed, one-byte integer.
    Byte(i8),
    /// A signed, two-byte integer.
    Short(i16),
    /// A signed, four-byte integer.
    Int(i32),
    /// A signed, eight-byte integer.
    Long(i64),
    /// A 32-bit floating point value.
    Float(f32),
    /// A 64-bit floating point value.
    Double(f64),
    /// An array (vec) of signed, one-byte integers.
    ByteArray(Vec<i8>),
    /// A UTF-8 string.
    String(String),
    /// An NBT tag list.
    List(NbtList),
    /// An NBT tag compound.
    Compound(NbtCompound),
    /// An array (vec) of signed, four-byte integers.
    IntArray(Vec<i32>),
    /// An array (vec) of signed, eight-byte integers.
    LongArray(Vec<i64>),
}

impl NbtTag {
    /// Returns this tag's type.
    pub fn tag_type(&self) -> TagType {
        match self {
            Self::Byte(..)      => TagType::Byte,
            Self::Short(..)     => TagType::Short,
            Self::Int(..)       => TagType::Int,
            Self::Long(..)      => TagType::Long,
            Self::Float(..)     => TagType::Float,
            Self::Double(..)    => TagType::Double,
            Self::ByteArray(..) => TagType::ByteArray,
            Self::String(..)    => TagType::String,
            Self::List(..)      => TagType::List,
            Self::Compound(..)  => TagType::Compound,
            Self::IntArray(..)  => TagType::IntArray,
            Self::LongArray(..) => TagType::LongArray,
        }
    }

    #[inline]
    pub(crate) fn tag_name(&self) -> &'static str {
        self.tag_type().name()
    }

    /// Creates a Byte tag, truncating the value two's-complement to eight bits.
    #[inline]
    pub fn byte(value: i64) -> Self {
        Self::Byte(value as i8)
    }

    /// Creates a Short tag, truncating the value two's-complement to sixteen bits.
    #[inline]
    pub fn short(value: i64) -> Self {
        Self::Short(value as i16)
    }

    /// Creates an Int tag, truncating the value two's-complement to thirty-two bits.
    #[inline]
    pub fn int(value: i64) -> Self {
        Self::Int(value as i32)
    }

    #[inline]
    pub fn long(value: i64) -> Self {
        Self::Long(value)
    }

    /// Creates a Float tag, rounding the value to the nearest binary32.
    #[inline]
    pub fn float(value: f64) -> Self {
        Self::Float(value as f32)
    }

    #[inline]
    pub fn double(value: f64) -> Self {
        Self::Double(value)
    }

    /// Converts a numeric tag to an integer, truncating floats toward zero.
    /// Returns `None` for non-numeric tags.
    pub fn as_i64(&self) -> Option<i64> {
        match *self {
            Self::Byte(value)   => Some(i64::from(value)),
            Self::Short(value)  => Some(i64::from(value)),
            Self::Int(value)    => Some(i64::from(value)),
            Self::Long(value)   => Some(value),
            Self::Float(value)  => Some(value as i64),
            Self::Double(value) => Some(value as i64),
            _ => None,
        }
    }

    /// Converts a numeric tag to a float. Returns `None` for non-numeric tags.
    pub fn as_f64(&self) -> Option<f64> {
        match *self {
            Self::Byte(value)   => Some(f64::from(value)),
            Self::Short(value)  => Some(f64::from(value)),
            Self::Int(value)    => Some(f64::from(value)),
            Self::Long(value)   => Some(value as f64),
            Self::Float(value)  => Some(f64::from(value)),
            Self::Double(value) => Some(value),
            _ => None,
        }
    }

    /// Serializes this tag as an uncompressed root NBT stream with an empty root name.
    pub fn to_bytes(&self) -> Result<Vec<u8>, NbtIoError> {
        let mut bytes = Vec::new();
        io::write_tag(&mut bytes, "", self)?;
        Ok(bytes)
    }

    /// Reads a tag and its root name from an uncompressed root NBT stream.
    pub fn from_bytes(mut bytes: &[u8]) -> Result<(Self, String), NbtIoError> {
        io::read_tag(&mut bytes)
    }

    /// Parses an NBT tag from SNBT.
    #[inline]
    pub fn from_snbt(input: &str) -> Result<Self, SnbtError> {
        snbt::parse_any(input)
    }

    /// Converts this tag into a valid, parsable SNBT string with no extraneous spacing.
    #[inline]
    pub fn to_snbt(&self) -> String {
        format!("{self}")
    }

    /// Converts this tag into a valid, parsable SNBT string with extra spacing for
    /// readability.
    #[inline]
    pub fn to_pretty_snbt(&self) -> String {
        format!("{self:#}")
    }

    /// Like [`to_snbt`](Self::to_snbt), but compound keys are emitted in ascending
    /// lexicographic order rather than insertion order.
    pub fn to_snbt_sorted(&self) -> String {
        struct Sorted<'a>(&'a NbtTag);

        impl Display for Sorted<'_> {
            fn fmt(&self, f: &mut Formatter<'_>) -> fmt::Result {
                self.0.recursively_format_snbt(&mut String::new(), f, true)
            }
        }

        format!("{}", Sorted(self))
    }

    /// Returns whether the given string must be quoted to survive an SNBT round trip.
    /// Compound keys are the only strings ever emitted unquoted.
    #[inline]
    pub fn should_quote(string: &str) -> bool {
        string.is_empty() || !string.chars().all(snbt::allowed_unquoted)
    }

    /// Wraps the given string in double quotes, escaping backslashes and double quotes.
    pub fn string_to_snbt(string: &str) -> String {
        let mut snbt_string = String::with_capacity(2 + string.len());
        snbt_string.push('"');
        for ch in string.chars() {
            if ch == '"' || ch == '\\' {
                snbt_string.push('\\');
            }
            snbt_string.push(ch);
        }
        snbt_string.push('"');
        snbt_string
    }

    pub(crate) fn recursively_format_snbt(
        &self,
        indent: &mut String,
        f: &mut Formatter<'_>,
        sort: bool,
    ) -> fmt::Result {
        fn write_prim_list<T: Display>(
            list: &[T],
            prefix: &str,
            suffix: &str,
            f: &mut Formatter<'_>,
        ) -> fmt::Result {
            write!(f, "[{prefix};")?;

            let last_index = list.len().wrapping_sub(1);
            for (index, element) in list.iter().enumerate() {
                if f.alternate() {
                    write!(f, " ")?;
                }
                write!(f, "{element}{suffix}")?;
                if index != last_index {
                    write!(f, ",")?;
                }
            }

            write!(f, "]")
        }

        match self {
            Self::Byte(value)   => write!(f, "{value}b"),
            Self::Short(value)  => write!(f, "{value}s"),
            Self::Int(value)    => write!(f, "{value}"),
            Self::Long(value)   => write!(f, "{value}l"),
            Self::Float(value)  => write!(f, "{value}f"),
            Self::Double(value) => write!(f, "{value}d"),
            Self::ByteArray(value) => write_prim_list(value, "B", "b", f),
            Self::String(value)    => f.write_str(&Self::string_to_snbt(value)),
            Self::List(value)      => value.recursively_format_snbt(indent, f, sort),
            Self::Compound(value)  => value.recursively_format_snbt(indent, f, sort),
            Self::IntArray(value)  => write_prim_list(value, "I", "", f),
            Self::LongArray(value) => write_prim_list(value, "L", "l", f),
        }
    }
}

macro_rules! display_and_debug {
    ($type:ty) => {
        impl Display for $type {
            fn fmt(&self, f: &mut Formatter<'_>) -> fmt::Result {
                self.recursively_format_snbt(&mut String::new(), f, false)
            }
        }

        impl Debug for $type {
            fn fmt(&self, f: &mut Formatter<'_>) -> fmt::Result {
                Display::fmt(self, f)
            }
        }
    };
}

display_and_debug!(NbtTag);
display_and_debug!(NbtList);
display_and_debug!(NbtCompound);

// Implement the from trait for all the tag's internal types
macro_rules! tag_from {
    ($($type:ty, $tag:ident);*) => {
        $(
            impl From<$type> for NbtTag {
                #[inline]
                fn from(value: $type) -> Self {
                    Self::$tag(value)
                }
            }
        )*
    };
}

tag_from!(
    i8, Byte;
    i16, Short;
    i32, Int;
    i64, Long;
    f32, Float;
    f64, Double;
    Vec<i8>, ByteArray;
    String, String;
    NbtList, List;
    NbtCompound, Compound;
    Vec<i32>, IntArray;
    Vec<i64>, LongArray
);

impl From<&str> for NbtTag {
    #[inline]
    fn from(value: &str) -> Self {
        Self::String(value.to_owned())
    }
}

impl From<&String> for NbtTag {
    #[inline]
    fn from(value: &String) -> Self {
        Self::String(value.clone())
    }
}

impl From<bool> for NbtTag {
    #[inline]
    fn from(value: bool) -> Self {
        Self::Byte(if value { 1 } else { 0 })
    }
}

impl From<Vec<u8>> for NbtTag {
    #[inline]
    fn from(value: Vec<u8>) -> Self {
        Self::ByteArray(raw::cast_byte_buf_to_signed(value))
    }
}

macro_rules! prim_from_tag {
    ($($type:ty, $tag:ident);*) => {
        $(
            impl TryFrom<&NbtTag> for $type {
                type Error = NbtStructureError;

                #[inline]
                fn try_from(tag: &NbtTag) -> Result<Self, Self::Error> {
                    if let NbtTag::$tag(value) = tag {
                        Ok(*value)
                    } else {
                        Err(NbtStructureError::type_mismatch(
                            stringify!($tag),
                            tag.tag_name(),
                        ))
                    }
                }
            }
        )*
    };
}

prim_from_tag!(
    i8, Byte;
    i16, Short;
    i32, Int;
    i64, Long;
    f32, Float;
    f64, Double
);

impl TryFrom<&NbtTag> for bool {
    type Error = NbtStructureError;

    fn try_from(tag: &NbtTag) -> Result<Self, Self::Error> {
        match *tag {
            NbtTag::Byte(value)  => Ok(value != 0),
            NbtTag::Short(value) => Ok(value != 0),
            NbtTag::Int(value)   => Ok(value != 0),
            NbtTag::Long(value)  => Ok(value != 0),
            _ => Err(NbtStructureError::type_mismatch(
                "Byte, Short, Int, or Long",
                tag.tag_name(),
            )),
        }
    }
}

macro_rules! ref_from_tag {
    ($($type:ty, $tag:ident);*) => {
        $(
            impl<'a> TryFrom<&'a NbtTag> for &'a $type {
                type Error = NbtStructureError;

                #[inline]
                fn try_from(tag: &'a NbtTag) -> Result<Self, Self::Error> {
                    if let NbtTag::$tag(value) = tag {
                        Ok(value)
                    } else {
                        Err(NbtStructureError::type_mismatch(
                            stringify!($tag),
                            tag.tag_name(),
                        ))
                    }
                }
            }

            impl<'a> TryFrom<&'a mut NbtTag> for &'a mut $type {
                type Error = NbtStructureError;

                #[inline]
                fn try_from(tag: &'a mut NbtTag) -> Result<Self, Self::Error> {
                    if let NbtTag::$tag(value) = tag {
                        Ok(value)
                    } else {
                        Err(NbtStructureError::type_mismatch(
                            stringify!($tag),
                            tag.tag_name(),
                        ))
                    }
                }
            }
        )*
    };
}

ref_from_tag!(
    i8, Byte;
    i16, Short;
    i32, Int;
    i64, Long;
    f32, Float;
    f64, Double;
    Vec<i8>, ByteArray;
    [i8], ByteArray;
    String, String;
    str, String;
    NbtList, List;
    NbtCompound, Compound;
    Vec<i32>, IntArray;
    [i32], IntArray;
    Vec<i64>, LongArray;
    [i64], LongArray
);

macro_rules! from_tag {
    ($($type:ty, $tag:ident);*) => {
        $(
            impl TryFrom<NbtTag> for $type {
                type Error = NbtStructureError;

                #[inline]
                fn try_from(tag: NbtTag) -> Result<Self, Self::Error> {
                    if let NbtTag::$tag(value) = tag {
                        Ok(value)
                    } else {
                        Err(NbtStructureError::type_mismatch(
                            stringify!($tag),
                            tag.tag_name(),
                        ))
                    }
                }
            }
        )*
    };
}

from_tag!(
    i8, Byte;
    i16, Short;
    i32, Int;
    i64, Long;
    f32, Float;
    f64, Double;
    Vec<i8>, ByteArray;
    String, String;
    NbtList, List;
    NbtCompound, Compound;
    Vec<i32>, IntArray;
    Vec<i64>, LongArray
);
