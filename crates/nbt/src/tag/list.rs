use std::fmt;
use std::{fmt::Formatter, ops::Index, slice};

use crate::repr::{NbtReprError, NbtStructureError};

use super::{NbtTag, TagType};


/// The NBT tag list type: a homogeneous sequence of tags with a declared element type.
///
/// Every element's type equals [`element_type`](Self::element_type); mutations which
/// would break that invariant are rejected with a [`NbtStructureError`]. An empty list
/// may carry any declared element type (a list decoded from the wire with element id 0
/// carries [`TagType::End`] and accepts no elements).
///
/// Two lists are equal when both their element types and their element sequences are
/// equal.
#[derive(Clone, PartialEq)]
pub struct NbtList {
    pub(crate) element_type: TagType,
    pub(crate) tags: Vec<NbtTag>,
}

impl NbtList {
    /// Returns a new, empty tag list with the given declared element type.
    #[inline]
    pub const fn new(element_type: TagType) -> Self {
        Self {
            element_type,
            tags: Vec::new(),
        }
    }

    /// Returns a new tag list with the given element type and initial capacity.
    #[inline]
    pub fn with_capacity(element_type: TagType, capacity: usize) -> Self {
        Self {
            element_type,
            tags: Vec::with_capacity(capacity),
        }
    }

    /// Builds a tag list with the given element type from a vec of tags, rejecting any
    /// tag whose type differs from `element_type`.
    pub fn try_from_vec(
        element_type: TagType,
        tags: Vec<NbtTag>,
    ) -> Result<Self, NbtStructureError> {
        for tag in &tags {
            if tag.tag_type() != element_type {
                return Err(NbtStructureError::list_type_mismatch(
                    element_type.name(),
                    tag.tag_name(),
                ));
            }
        }
        Ok(Self { element_type, tags })
    }

    /// The declared element type of this list.
    #[inline]
    pub fn element_type(&self) -> TagType {
        self.element_type
    }

    /// Returns the internal vector of this NBT list.
    #[inline]
    pub fn into_inner(self) -> Vec<NbtTag> {
        self.tags
    }

    #[inline]
    pub fn as_slice(&self) -> &[NbtTag] {
        &self.tags
    }

    /// Returns the number of tags in this list.
    #[inline]
    pub fn len(&self) -> usize {
        self.tags.len()
    }

    /// Returns true if this list is empty.
    #[inline]
    pub fn is_empty(&self) -> bool {
        self.tags.is_empty()
    }

    /// Returns a reference to the tag at the given index, or `None` if the index is out
    /// of bounds.
    #[inline]
    pub fn get_tag(&self, index: usize) -> Option<&NbtTag> {
        self.tags.get(index)
    }

    /// Returns a mutable reference to the tag at the given index. Mutating an element
    /// through this reference cannot change its tag type, so the homogeneity invariant
    /// holds.
    #[inline]
    pub fn get_tag_mut(&mut self, index: usize) -> Option<&mut NbtTag> {
        self.tags.get_mut(index)
    }

    /// Returns the value of the tag at the given index converted to the specified type,
    /// or an error if the index is out of bounds or the conversion fails.
    pub fn get<'a, T>(&'a self, index: usize) -> Result<T, NbtReprError>
    where
        T: TryFrom<&'a NbtTag>,
        T::Error: Into<anyhow::Error>,
    {
        T::try_from(
            self.tags
                .get(index)
                .ok_or_else(|| NbtStructureError::invalid_index(index, self.tags.len()))?,
        )
        .map_err(NbtReprError::from_any)
    }

    /// Replaces the tag at the given index. Fails if the index is out of bounds or the
    /// new tag's type differs from the list's element type.
    pub fn set<T: Into<NbtTag>>(
        &mut self,
        index: usize,
        tag: T,
    ) -> Result<(), NbtStructureError> {
        let tag = self.check_element(tag.into())?;
        match self.tags.get_mut(index) {
            Some(slot) => {
                *slot = tag;
                Ok(())
            }
            None => Err(NbtStructureError::invalid_index(index, self.tags.len())),
        }
    }

    /// Inserts a tag at the given index, shifting later elements toward the back. Fails
    /// if `index > len` or the tag's type differs from the list's element type.
    pub fn insert<T: Into<NbtTag>>(
        &mut self,
        index: usize,
        tag: T,
    ) -> Result<(), NbtStructureError> {
        let tag = self.check_element(tag.into())?;
        if index > self.tags.len() {
            return Err(NbtStructureError::invalid_index(index, self.tags.len()));
        }
        self.tags.insert(index, tag);
        Ok(())
    }

    /// Appends a tag to the back of the list. Fails if the tag's type differs from the
    /// list's element type.
    pub fn push<T: Into<NbtTag>>(&mut self, tag: T) -> Result<(), NbtStructureError> {
        let tag = self.check_element(tag.into())?;
        self.tags.push(tag);
        Ok(())
    }

    /// Removes and returns the tag at the given index, shifting later elements toward
    /// the front. Fails if the index is out of bounds.
    pub fn remove(&mut self, index: usize) -> Result<NbtTag, NbtStructureError> {
        if index < self.tags.len() {
            Ok(self.tags.remove(index))
        } else {
            Err(NbtStructureError::invalid_index(index, self.tags.len()))
        }
    }

    /// Iterates over references to each tag in this tag list.
    #[inline]
    pub fn iter(&self) -> slice::Iter<'_, NbtTag> {
        self.tags.iter()
    }

    /// Iterates over this tag list, converting each tag reference into the specified
    /// type. The iterator does not terminate early if some conversions fail.
    #[inline]
    pub fn iter_map<'a, T: TryFrom<&'a NbtTag>>(
        &'a self,
    ) -> impl Iterator<Item = Result<T, <T as TryFrom<&'a NbtTag>>::Error>> + 'a {
        self.tags.iter().map(|tag| T::try_from(tag))
    }

    fn check_element(&self, tag: NbtTag) -> Result<NbtTag, NbtStructureError> {
        if tag.tag_type() == self.element_type {
            Ok(tag)
        } else {
            Err(NbtStructureError::list_type_mismatch(
                self.element_type.name(),
                tag.tag_name(),
            ))
        }
    }

    pub(crate) fn recursively_format_snbt(
        &self,
        indent: &mut String,
        f: &mut Formatter<'_>,
        sort: bool,
    ) -> fmt::Result {
        if self.is_empty() {
            return write!(f, "[]");
        }

        if f.alternate() {
            indent.push_str("    ");
            writeln!(f, "[")?;
        } else {
            write!(f, "[")?;
        }

        let last_index = self.len() - 1;
        for (index, value) in self.tags.iter().enumerate() {
            if f.alternate() {
                write!(f, "{indent}")?;
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
            write!(f, "\n{indent}]")
        } else {
            write!(f, "]")
        }
    }
}

impl IntoIterator for NbtList {
    type IntoIter = <Vec<NbtTag> as IntoIterator>::IntoIter;
    type Item = NbtTag;

    #[inline]
    fn into_iter(self) -> Self::IntoIter {
        self.tags.into_iter()
    }
}

impl<'a> IntoIterator for &'a NbtList {
    type IntoIter = slice::Iter<'a, NbtTag>;
    type Item = &'a NbtTag;

    #[inline]
    fn into_iter(self) -> Self::IntoIter {
        self.tags.iter()
    }
}

impl Index<usize> for NbtList {
    type Output = NbtTag;

    #[inline]
    fn index(&self, index: usize) -> &NbtTag {
        &self.tags[index]
    }
}
