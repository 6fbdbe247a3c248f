use std::fmt;
use std::{borrow::Cow, fmt::Display, fmt::Formatter, ops::Index};

use crate::snbt;
use crate::repr::{NbtReprError, NbtStructureError};
use crate::snbt::SnbtError;

use super::{Map, NbtTag};


/// The NBT tag compound type: a mapping from string keys to tag values.
///
/// Iteration order is insertion order, and is preserved across a decode→encode cycle.
/// Equality compares the key set and the value stored under each key; insertion order
/// does not participate.
#[repr(transparent)]
#[derive(Clone, PartialEq)]
pub struct NbtCompound(pub(crate) Map<NbtTag>);

impl NbtCompound {
    /// Returns a new NBT tag compound with an empty internal map.
    #[inline]
    pub fn new() -> Self {
        Self(Map::new())
    }

    /// Returns a new NBT tag compound with the given initial capacity.
    #[inline]
    pub fn with_capacity(capacity: usize) -> Self {
        Self(Map::with_capacity(capacity))
    }

    /// Returns a reference to the internal map of this compound.
    #[inline]
    pub fn inner(&self) -> &Map<NbtTag> {
        &self.0
    }

    /// Returns the internal map of this NBT compound.
    #[inline]
    pub fn into_inner(self) -> Map<NbtTag> {
        self.0
    }

    /// Returns the number of tags in this compound.
    #[inline]
    pub fn len(&self) -> usize {
        self.0.len()
    }

    /// Returns true if the length of this compound is zero, false otherwise.
    #[inline]
    pub fn is_empty(&self) -> bool {
        self.0.is_empty()
    }

    /// Returns the value of the tag with the given name converted to the specified
    /// type, or an error if no tag exists with the given name or the conversion fails.
    /// This method should be used to obtain primitives as well as shared references to
    /// lists and compounds.
    pub fn get<'a, T>(&'a self, name: &str) -> Result<T, NbtReprError>
    where
        T: TryFrom<&'a NbtTag>,
        T::Error: Into<anyhow::Error>,
    {
        T::try_from(
            self.0
                .get(name)
                .ok_or_else(|| NbtStructureError::missing_tag(name))?,
        )
        .map_err(NbtReprError::from_any)
    }

    /// Like [`get`](Self::get), but converts from a mutable tag reference. This method
    /// should be used to obtain mutable references to lists and compounds.
    pub fn get_mut<'a, T>(&'a mut self, name: &str) -> Result<T, NbtReprError>
    where
        T: TryFrom<&'a mut NbtTag>,
        T::Error: Into<anyhow::Error>,
    {
        T::try_from(
            self.0
                .get_mut(name)
                .ok_or_else(|| NbtStructureError::missing_tag(name))?,
        )
        .map_err(NbtReprError::from_any)
    }

    /// Returns whether or not this compound has a tag with the given name.
    #[inline]
    pub fn contains_key(&self, key: &str) -> bool {
        self.0.contains_key(key)
    }

    /// Returns a reference to the tag with the given name without any casting, or
    /// `None` if no tag exists with the given name.
    #[inline]
    pub fn get_tag(&self, key: &str) -> Option<&NbtTag> {
        self.0.get(key)
    }

    /// Returns a mutable reference to the tag with the given name without any casting,
    /// or `None` if no tag exists with the given name.
    #[inline]
    pub fn get_tag_mut(&mut self, key: &str) -> Option<&mut NbtTag> {
        self.0.get_mut(key)
    }

    /// Adds the given value to this compound with the given name after wrapping that
    /// value in an `NbtTag`. Returns the tag previously stored under that name, if any.
    #[inline]
    pub fn insert<K: Into<String>, T: Into<NbtTag>>(
        &mut self,
        name: K,
        value: T,
    ) -> Option<NbtTag> {
        self.0.insert(name.into(), value.into())
    }

    /// Removes and returns the tag with the given name, preserving the insertion order
    /// of the remaining entries.
    #[inline]
    pub fn remove(&mut self, key: &str) -> Option<NbtTag> {
        self.0.shift_remove(key)
    }

    #[inline]
    pub fn iter(&self) -> <&Map<NbtTag> as IntoIterator>::IntoIter {
        self.into_iter()
    }

    #[inline]
    pub fn iter_mut(&mut self) -> <&mut Map<NbtTag> as IntoIterator>::IntoIter {
        self.into_iter()
    }

    /// Iterates over this tag compound, converting each tag reference into the
    /// specified type. Each key is paired with the result of the attempted conversion.
    /// The iterator does not terminate early if some conversions fail.
    #[inline]
    pub fn iter_map<'a, T: TryFrom<&'a NbtTag>>(
        &'a self,
    ) -> impl Iterator<Item = (&'a str, Result<T, <T as TryFrom<&'a NbtTag>>::Error>)> + 'a
    {
        self.0
            .iter()
            .map(|(key, tag)| (key.as_str(), T::try_from(tag)))
    }

    /// Parses an NBT compound from SNBT.
    #[inline]
    pub fn from_snbt(input: &str) -> Result<Self, SnbtError> {
        snbt::parse_compound(input)
    }

    /// Converts this tag compound into a valid SNBT string. See
    /// `NbtTag::`[`to_snbt`](crate::NbtTag::to_snbt) for details.
    #[inline]
    pub fn to_snbt(&self) -> String {
        format!("{self}")
    }

    /// Converts this tag compound into a valid SNBT string with extra spacing for
    /// readability.
    #[inline]
    pub fn to_pretty_snbt(&self) -> String {
        format!("{self:#}")
    }

    /// Like [`to_snbt`](Self::to_snbt), but keys are emitted in ascending
    /// lexicographic order rather than insertion order.
    pub fn to_snbt_sorted(&self) -> String {
        struct Sorted<'a>(&'a NbtCompound);

        impl Display for Sorted<'_> {
            fn fmt(&self, f: &mut Formatter<'_>) -> fmt::Result {
                self.0.recursively_format_snbt(&mut String::new(), f, true)
            }
        }

        format!("{}", Sorted(self))
    }

    pub(crate) fn recursively_format_snbt(
        &self,
        indent: &mut String,
        f: &mut Formatter<'_>,
        sort: bool,
    ) -> fmt::Result {
        fn key_to_snbt(key: &str) -> Cow<'_, str> {
            if NbtTag::should_quote(key) {
                Cow::Owned(NbtTag::string_to_snbt(key))
            } else {
                Cow::Borrowed(key)
            }
        }

        if self.is_empty() {
            return write!(f, "{{}}");
        }

        if f.alternate() {
            indent.push_str("    ");
            writeln!(f, "{{")?;
        } else {
            write!(f, "{{")?;
        }

        let mut entries: Vec<(&String, &NbtTag)> = self.0.iter().collect();
        if sort {
            entries.sort_by_key(|&(key, _)| key);
        }

        let last_index = entries.len() - 1;
        for (index, (key, value)) in entries.into_iter().enumerate() {
            let key = key_to_snbt(key);

            if f.alternate() {
                write!(f, "{indent}{key}: ")?;
            } else {
                write!(f, "{key}:")?;
            }

            value.recursively_format_snbt(indent, f, sort)?;

            if index != last_index {
                if f.alternate() {
                    writeln!(f, ",")?;
                } else {
                    write!(f, ",")?;
                }
            }
        }

        if f.alternate() {
            indent.truncate(indent.len() - 4);
            write!(f, "\n{indent}}}")
        } else {
            write!(f, "}}")
        }
    }
}

impl Default for NbtCompound {
    #[inline]
    fn default() -> Self {
        Self::new()
    }
}

impl IntoIterator for NbtCompound {
    type IntoIter = <Map<NbtTag> as IntoIterator>::IntoIter;
    type Item = <Map<NbtTag> as IntoIterator>::Item;

    #[inline]
    fn into_iter(self) -> Self::IntoIter {
        self.0.into_iter()
    }
}

impl<'a> IntoIterator for &'a NbtCompound {
    type IntoIter = <&'a Map<NbtTag> as IntoIterator>::IntoIter;
    type Item = <&'a Map<NbtTag> as IntoIterator>::Item;

    #[inline]
    fn into_iter(self) -> Self::IntoIter {
        self.0.iter()
    }
}

impl<'a> IntoIterator for &'a mut NbtCompound {
    type IntoIter = <&'a mut Map<NbtTag> as IntoIterator>::IntoIter;
    type Item = (&'a String, &'a mut NbtTag);

    #[inline]
    fn into_iter(self) -> Self::IntoIter {
        self.0.iter_mut()
    }
}

impl FromIterator<(String, NbtTag)> for NbtCompound {
    #[inline]
    fn from_iter<T: IntoIterator<Item = (String, NbtTag)>>(iter: T) -> Self {
        Self(Map::from_iter(iter))
    }
}

impl Extend<(String, NbtTag)> for NbtCompound {
    #[inline]
    fn extend<T: IntoIterator<Item = (String, NbtTag)>>(&mut self, iter: T) {
        self.0.extend(iter);
    }
}

impl Index<&str> for NbtCompound {
    type Output = NbtTag;

    #[inline]
    fn index(&self, key: &str) -> &NbtTag {
        &self.0[key]
    }
}
