#![allow(dead_code)]

use stronghold_nbt::TagType;

/// Builder for binary NBT payloads. Tests use this so that decoding is checked against
/// independently constructed bytes rather than against the crate's own encoder. It
/// deliberately does not guarantee that the result is valid NBT; malformed payloads
/// are useful for testing too.
pub struct Builder {
    payload: Vec<u8>,
}

impl Builder {
    pub fn new() -> Self {
        Builder {
            payload: Vec::new(),
        }
    }

    pub fn build(self) -> Vec<u8> {
        self.payload
    }

    pub fn tag(mut self, tag_type: TagType) -> Self {
        self.payload.push(tag_type.id());
        self
    }

    pub fn raw(mut self, bytes: &[u8]) -> Self {
        self.payload.extend_from_slice(bytes);
        self
    }

    pub fn name(mut self, name: &str) -> Self {
        let bytes = name.as_bytes();
        self.payload.extend_from_slice(&(bytes.len() as u16).to_be_bytes());
        self.payload.extend_from_slice(bytes);
        self
    }

    pub fn start_compound(self, name: &str) -> Self {
        self.tag(TagType::Compound).name(name)
    }

    pub fn end_compound(self) -> Self {
        self.tag(TagType::End)
    }

    pub fn start_list(self, name: &str, element_type: TagType, size: i32) -> Self {
        self.tag(TagType::List)
            .name(name)
            .tag(element_type)
            .int_payload(size)
    }

    pub fn start_anon_list(self, element_type: TagType, size: i32) -> Self {
        self.tag(element_type).int_payload(size)
    }

    pub fn byte(self, name: &str, value: i8) -> Self {
        self.tag(TagType::Byte).name(name).byte_payload(value)
    }

    pub fn short(self, name: &str, value: i16) -> Self {
        self.tag(TagType::Short).name(name).short_payload(value)
    }

    pub fn int(self, name: &str, value: i32) -> Self {
        self.tag(TagType::Int).name(name).int_payload(value)
    }

    pub fn long(self, name: &str, value: i64) -> Self {
        self.tag(TagType::Long).name(name).long_payload(value)
    }

    pub fn float(self, name: &str, value: f32) -> Self {
        self.tag(TagType::Float).name(name).float_payload(value)
    }

    pub fn double(self, name: &str, value: f64) -> Self {
        self.tag(TagType::Double).name(name).double_payload(value)
    }

    pub fn string(self, name: &str, value: &str) -> Self {
        self.tag(TagType::String).name(name).string_payload(value)
    }

    pub fn byte_array(self, name: &str, values: &[i8]) -> Self {
        self.tag(TagType::ByteArray)
            .name(name)
            .int_payload(values.len() as i32)
            .byte_array_payload(values)
    }

    pub fn int_array(self, name: &str, values: &[i32]) -> Self {
        self.tag(TagType::IntArray)
            .name(name)
            .int_payload(values.len() as i32)
            .int_array_payload(values)
    }

    pub fn long_array(self, name: &str, values: &[i64]) -> Self {
        self.tag(TagType::LongArray)
            .name(name)
            .int_payload(values.len() as i32)
            .long_array_payload(values)
    }

    pub fn string_payload(self, value: &str) -> Self {
        self.name(value)
    }

    pub fn byte_payload(mut self, value: i8) -> Self {
        self.payload.push(value as u8);
        self
    }

    pub fn short_payload(mut self, value: i16) -> Self {
        self.payload.extend_from_slice(&value.to_be_bytes());
        self
    }

    pub fn int_payload(mut self, value: i32) -> Self {
        self.payload.extend_from_slice(&value.to_be_bytes());
        self
    }

    pub fn long_payload(mut self, value: i64) -> Self {
        self.payload.extend_from_slice(&value.to_be_bytes());
        self
    }

    pub fn float_payload(mut self, value: f32) -> Self {
        self.payload.extend_from_slice(&value.to_be_bytes());
        self
    }

    pub fn double_payload(mut self, value: f64) -> Self {
        self.payload.extend_from_slice(&value.to_be_bytes());
        self
    }

    pub fn byte_array_payload(mut self, values: &[i8]) -> Self {
        for value in values {
            self.payload.push(*value as u8);
        }
        self
    }

    pub fn int_array_payload(mut self, values: &[i32]) -> Self {
        for value in values {
            self.payload.extend_from_slice(&value.to_be_bytes());
        }
        self
    }

    pub fn long_array_payload(mut self, values: &[i64]) -> Self {
        for value in values {
            self.payload.extend_from_slice(&value.to_be_bytes());
        }
        self
    }
}
