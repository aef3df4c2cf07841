//! Pre-pass that rejects NaN and infinities.
//!
//! `serde_json::to_value` maps non-finite floats to `null`, which would make
//! `{"x": NaN}` and `{"x": null}` share a digest. This serializer walks the same
//! data first and reports the path of the first non-finite float.

use serde::ser::{self, Serialize};
use std::fmt;

#[derive(Debug)]
pub(crate) enum FiniteCheckError {
    NonFinite(String),
    Custom(String),
}

impl fmt::Display for FiniteCheckError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            FiniteCheckError::NonFinite(path) => write!(f, "non-finite number at {}", path),
            FiniteCheckError::Custom(msg) => f.write_str(msg),
        }
    }
}

impl std::error::Error for FiniteCheckError {}

impl ser::Error for FiniteCheckError {
    fn custom<T: fmt::Display>(msg: T) -> Self {
        FiniteCheckError::Custom(msg.to_string())
    }
}

type Result<T = ()> = std::result::Result<T, FiniteCheckError>;

/// Fails with [`FiniteCheckError::NonFinite`] on the first NaN or infinity.
pub(crate) fn check_finite<T: Serialize + ?Sized>(value: &T) -> Result {
    value.serialize(&mut FiniteCheck::default())
}

#[derive(Default)]
struct FiniteCheck {
    segments: Vec<String>,
    indices: Vec<usize>,
    pending_key: Option<String>,
}

impl FiniteCheck {
    fn path(&self) -> String {
        if self.segments.is_empty() {
            "root".to_string()
        } else {
            self.segments.join(".")
        }
    }

    fn float(&self, value: f64) -> Result {
        if value.is_finite() {
            Ok(())
        } else {
            Err(FiniteCheckError::NonFinite(self.path()))
        }
    }

    fn nested<T: Serialize + ?Sized>(&mut self, segment: String, value: &T) -> Result {
        self.segments.push(segment);
        let result = value.serialize(&mut *self);
        self.segments.pop();
        result
    }

    fn element<T: Serialize + ?Sized>(&mut self, value: &T) -> Result {
        let index = self.indices.last().copied().unwrap_or(0);
        let result = self.nested(format!("[{}]", index), value);
        if let Some(last) = self.indices.last_mut() {
            *last += 1;
        }
        result
    }

    fn open_seq(&mut self) {
        self.indices.push(0);
    }

    fn close_seq(&mut self) -> Result {
        self.indices.pop();
        Ok(())
    }
}

fn key_name<T: Serialize + ?Sized>(key: &T) -> String {
    match serde_json::to_value(key) {
        Ok(serde_json::Value::String(name)) => name,
        Ok(other) => other.to_string(),
        Err(_) => "?".to_string(),
    }
}

impl<'a> ser::Serializer for &'a mut FiniteCheck {
    type Ok = ();
    type Error = FiniteCheckError;
    type SerializeSeq = Self;
    type SerializeTuple = Self;
    type SerializeTupleStruct = Self;
    type SerializeTupleVariant = Self;
    type SerializeMap = Self;
    type SerializeStruct = Self;
    type SerializeStructVariant = Self;

    fn serialize_bool(self, _v: bool) -> Result {
        Ok(())
    }
    fn serialize_i8(self, _v: i8) -> Result {
        Ok(())
    }
    fn serialize_i16(self, _v: i16) -> Result {
        Ok(())
    }
    fn serialize_i32(self, _v: i32) -> Result {
        Ok(())
    }
    fn serialize_i64(self, _v: i64) -> Result {
        Ok(())
    }
    fn serialize_i128(self, _v: i128) -> Result {
        Ok(())
    }
    fn serialize_u8(self, _v: u8) -> Result {
        Ok(())
    }
    fn serialize_u16(self, _v: u16) -> Result {
        Ok(())
    }
    fn serialize_u32(self, _v: u32) -> Result {
        Ok(())
    }
    fn serialize_u64(self, _v: u64) -> Result {
        Ok(())
    }
    fn serialize_u128(self, _v: u128) -> Result {
        Ok(())
    }
    fn serialize_f32(self, v: f32) -> Result {
        self.float(f64::from(v))
    }
    fn serialize_f64(self, v: f64) -> Result {
        self.float(v)
    }
    fn serialize_char(self, _v: char) -> Result {
        Ok(())
    }
    fn serialize_str(self, _v: &str) -> Result {
        Ok(())
    }
    fn serialize_bytes(self, _v: &[u8]) -> Result {
        Ok(())
    }
    fn serialize_none(self) -> Result {
        Ok(())
    }
    fn serialize_some<T: Serialize + ?Sized>(self, value: &T) -> Result {
        value.serialize(self)
    }
    fn serialize_unit(self) -> Result {
        Ok(())
    }
    fn serialize_unit_struct(self, _name: &'static str) -> Result {
        Ok(())
    }
    fn serialize_unit_variant(self, _name: &'static str, _index: u32, _variant: &'static str) -> Result {
        Ok(())
    }
    fn serialize_newtype_struct<T: Serialize + ?Sized>(self, _name: &'static str, value: &T) -> Result {
        value.serialize(self)
    }
    fn serialize_newtype_variant<T: Serialize + ?Sized>(
        self,
        _name: &'static str,
        _index: u32,
        variant: &'static str,
        value: &T,
    ) -> Result {
        self.nested(variant.to_string(), value)
    }
    fn serialize_seq(self, _len: Option<usize>) -> Result<Self> {
        self.open_seq();
        Ok(self)
    }
    fn serialize_tuple(self, _len: usize) -> Result<Self> {
        self.open_seq();
        Ok(self)
    }
    fn serialize_tuple_struct(self, _name: &'static str, _len: usize) -> Result<Self> {
        self.open_seq();
        Ok(self)
    }
    fn serialize_tuple_variant(
        self,
        _name: &'static str,
        _index: u32,
        variant: &'static str,
        _len: usize,
    ) -> Result<Self> {
        self.segments.push(variant.to_string());
        self.open_seq();
        Ok(self)
    }
    fn serialize_map(self, _len: Option<usize>) -> Result<Self> {
        Ok(self)
    }
    fn serialize_struct(self, _name: &'static str, _len: usize) -> Result<Self> {
        Ok(self)
    }
    fn serialize_struct_variant(
        self,
        _name: &'static str,
        _index: u32,
        variant: &'static str,
        _len: usize,
    ) -> Result<Self> {
        self.segments.push(variant.to_string());
        Ok(self)
    }
}

impl<'a> ser::SerializeSeq for &'a mut FiniteCheck {
    type Ok = ();
    type Error = FiniteCheckError;

    fn serialize_element<T: Serialize + ?Sized>(&mut self, value: &T) -> Result {
        self.element(value)
    }
    fn end(self) -> Result {
        self.close_seq()
    }
}

impl<'a> ser::SerializeTuple for &'a mut FiniteCheck {
    type Ok = ();
    type Error = FiniteCheckError;

    fn serialize_element<T: Serialize + ?Sized>(&mut self, value: &T) -> Result {
        self.element(value)
    }
    fn end(self) -> Result {
        self.close_seq()
    }
}

impl<'a> ser::SerializeTupleStruct for &'a mut FiniteCheck {
    type Ok = ();
    type Error = FiniteCheckError;

    fn serialize_field<T: Serialize + ?Sized>(&mut self, value: &T) -> Result {
        self.element(value)
    }
    fn end(self) -> Result {
        self.close_seq()
    }
}

impl<'a> ser::SerializeTupleVariant for &'a mut FiniteCheck {
    type Ok = ();
    type Error = FiniteCheckError;

    fn serialize_field<T: Serialize + ?Sized>(&mut self, value: &T) -> Result {
        self.element(value)
    }
    fn end(self) -> Result {
        self.segments.pop();
        self.close_seq()
    }
}

impl<'a> ser::SerializeMap for &'a mut FiniteCheck {
    type Ok = ();
    type Error = FiniteCheckError;

    fn serialize_key<T: Serialize + ?Sized>(&mut self, key: &T) -> Result {
        self.pending_key = Some(key_name(key));
        Ok(())
    }
    fn serialize_value<T: Serialize + ?Sized>(&mut self, value: &T) -> Result {
        let key = self.pending_key.take().unwrap_or_else(|| "?".to_string());
        self.nested(key, value)
    }
    fn end(self) -> Result {
        Ok(())
    }
}

impl<'a> ser::SerializeStruct for &'a mut FiniteCheck {
    type Ok = ();
    type Error = FiniteCheckError;

    fn serialize_field<T: Serialize + ?Sized>(&mut self, key: &'static str, value: &T) -> Result {
        self.nested(key.to_string(), value)
    }
    fn end(self) -> Result {
        Ok(())
    }
}

impl<'a> ser::SerializeStructVariant for &'a mut FiniteCheck {
    type Ok = ();
    type Error = FiniteCheckError;

    fn serialize_field<T: Serialize + ?Sized>(&mut self, key: &'static str, value: &T) -> Result {
        self.nested(key.to_string(), value)
    }
    fn end(self) -> Result {
        self.segments.pop();
        Ok(())
    }
}
