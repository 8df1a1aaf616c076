//! `serde::Serializer` that produces a [`DumpNode`] tree.

use serde::ser::{self, Serialize};
use std::fmt;
use thiserror::Error;

use super::node::DumpNode;

/// Deepest nesting level that is still expanded. Anything below is folded
/// into a digest of its rendering.
pub const MAX_DEPTH: usize = 64;

#[derive(Debug, Error)]
pub enum DumpError {
    #[error("{0}")]
    Custom(String),
    #[error("map value serialized without a key")]
    MissingKey,
    #[error("unsupported value: {0}")]
    NonFiniteFloat(String),
}

impl ser::Error for DumpError {
    fn custom<T: fmt::Display>(msg: T) -> Self {
        DumpError::Custom(msg.to_string())
    }
}

#[derive(Debug, Default, Clone, Copy)]
pub struct DumpSerializer {
    depth: usize,
    reject_non_finite: bool,
}

impl DumpSerializer {
    /// A serializer that fails on NaN and infinite floats, which have no
    /// JSON encoding.
    pub fn rejecting_non_finite() -> Self {
        Self {
            depth: 0,
            reject_non_finite: true,
        }
    }

    fn child<T: Serialize + ?Sized>(&self, value: &T) -> Result<DumpNode, DumpError> {
        let node = value.serialize(DumpSerializer {
            depth: self.depth + 1,
            ..*self
        })?;
        if self.depth >= MAX_DEPTH {
            return Ok(DumpNode::truncated(&node));
        }
        Ok(node)
    }

    fn float(self, ty: &str, v: f64, repr: String) -> Result<DumpNode, DumpError> {
        if self.reject_non_finite && !v.is_finite() {
            return Err(DumpError::NonFiniteFloat(repr));
        }
        Ok(DumpNode::scalar(ty, repr))
    }
}

fn variant_name(name: &str, variant: &str) -> String {
    format!("{name}::{variant}")
}

pub struct SeqCollector {
    serializer: DumpSerializer,
    ty: String,
    open: char,
    close: char,
    items: Vec<DumpNode>,
}

pub struct MapCollector {
    serializer: DumpSerializer,
    pending_key: Option<DumpNode>,
    entries: Vec<(DumpNode, DumpNode)>,
}

pub struct StructCollector {
    serializer: DumpSerializer,
    ty: String,
    fields: Vec<(&'static str, DumpNode)>,
}

impl DumpSerializer {
    fn seq(self, ty: impl Into<String>, open: char, close: char, len: Option<usize>) -> SeqCollector {
        SeqCollector {
            serializer: self,
            ty: ty.into(),
            open,
            close,
            items: Vec::with_capacity(len.unwrap_or_default()),
        }
    }

    fn record(self, ty: impl Into<String>, len: usize) -> StructCollector {
        StructCollector {
            serializer: self,
            ty: ty.into(),
            fields: Vec::with_capacity(len),
        }
    }
}

impl ser::Serializer for DumpSerializer {
    type Ok = DumpNode;
    type Error = DumpError;
    type SerializeSeq = SeqCollector;
    type SerializeTuple = SeqCollector;
    type SerializeTupleStruct = SeqCollector;
    type SerializeTupleVariant = SeqCollector;
    type SerializeMap = MapCollector;
    type SerializeStruct = StructCollector;
    type SerializeStructVariant = StructCollector;

    fn serialize_bool(self, v: bool) -> Result<DumpNode, DumpError> {
        Ok(DumpNode::scalar("bool", v.to_string()))
    }

    fn serialize_i8(self, v: i8) -> Result<DumpNode, DumpError> {
        Ok(DumpNode::scalar("i8", v.to_string()))
    }

    fn serialize_i16(self, v: i16) -> Result<DumpNode, DumpError> {
        Ok(DumpNode::scalar("i16", v.to_string()))
    }

    fn serialize_i32(self, v: i32) -> Result<DumpNode, DumpError> {
        Ok(DumpNode::scalar("i32", v.to_string()))
    }

    fn serialize_i64(self, v: i64) -> Result<DumpNode, DumpError> {
        Ok(DumpNode::scalar("i64", v.to_string()))
    }

    fn serialize_i128(self, v: i128) -> Result<DumpNode, DumpError> {
        Ok(DumpNode::scalar("i128", v.to_string()))
    }

    fn serialize_u8(self, v: u8) -> Result<DumpNode, DumpError> {
        Ok(DumpNode::scalar("u8", v.to_string()))
    }

    fn serialize_u16(self, v: u16) -> Result<DumpNode, DumpError> {
        Ok(DumpNode::scalar("u16", v.to_string()))
    }

    fn serialize_u32(self, v: u32) -> Result<DumpNode, DumpError> {
        Ok(DumpNode::scalar("u32", v.to_string()))
    }

    fn serialize_u64(self, v: u64) -> Result<DumpNode, DumpError> {
        Ok(DumpNode::scalar("u64", v.to_string()))
    }

    fn serialize_u128(self, v: u128) -> Result<DumpNode, DumpError> {
        Ok(DumpNode::scalar("u128", v.to_string()))
    }

    fn serialize_f32(self, v: f32) -> Result<DumpNode, DumpError> {
        self.float("f32", f64::from(v), format!("{v:?}"))
    }

    fn serialize_f64(self, v: f64) -> Result<DumpNode, DumpError> {
        self.float("f64", v, format!("{v:?}"))
    }

    fn serialize_char(self, v: char) -> Result<DumpNode, DumpError> {
        Ok(DumpNode::scalar("char", format!("{v:?}")))
    }

    fn serialize_str(self, v: &str) -> Result<DumpNode, DumpError> {
        Ok(DumpNode::scalar(
            "str",
            format!("(len={}) {v:?}", v.len()),
        ))
    }

    fn serialize_bytes(self, v: &[u8]) -> Result<DumpNode, DumpError> {
        let hex: String = v.iter().map(|b| format!("{b:02x}")).collect();
        Ok(DumpNode::scalar("bytes", format!("(len={}) {hex}", v.len())))
    }

    fn serialize_none(self) -> Result<DumpNode, DumpError> {
        Ok(DumpNode::marker("None"))
    }

    fn serialize_some<T: Serialize + ?Sized>(self, value: &T) -> Result<DumpNode, DumpError> {
        Ok(DumpNode::Wrapped {
            ty: "Some".to_string(),
            inner: Box::new(self.child(value)?),
        })
    }

    fn serialize_unit(self) -> Result<DumpNode, DumpError> {
        Ok(DumpNode::marker("()"))
    }

    fn serialize_unit_struct(self, name: &'static str) -> Result<DumpNode, DumpError> {
        Ok(DumpNode::marker(name))
    }

    fn serialize_unit_variant(
        self,
        name: &'static str,
        _variant_index: u32,
        variant: &'static str,
    ) -> Result<DumpNode, DumpError> {
        Ok(DumpNode::marker(variant_name(name, variant)))
    }

    fn serialize_newtype_struct<T: Serialize + ?Sized>(
        self,
        name: &'static str,
        value: &T,
    ) -> Result<DumpNode, DumpError> {
        Ok(DumpNode::Wrapped {
            ty: name.to_string(),
            inner: Box::new(self.child(value)?),
        })
    }

    fn serialize_newtype_variant<T: Serialize + ?Sized>(
        self,
        name: &'static str,
        _variant_index: u32,
        variant: &'static str,
        value: &T,
    ) -> Result<DumpNode, DumpError> {
        Ok(DumpNode::Wrapped {
            ty: variant_name(name, variant),
            inner: Box::new(self.child(value)?),
        })
    }

    fn serialize_seq(self, len: Option<usize>) -> Result<SeqCollector, DumpError> {
        Ok(self.seq("seq", '[', ']', len))
    }

    fn serialize_tuple(self, len: usize) -> Result<SeqCollector, DumpError> {
        Ok(self.seq("tuple", '(', ')', Some(len)))
    }

    fn serialize_tuple_struct(
        self,
        name: &'static str,
        len: usize,
    ) -> Result<SeqCollector, DumpError> {
        Ok(self.seq(name, '(', ')', Some(len)))
    }

    fn serialize_tuple_variant(
        self,
        name: &'static str,
        _variant_index: u32,
        variant: &'static str,
        len: usize,
    ) -> Result<SeqCollector, DumpError> {
        Ok(self.seq(variant_name(name, variant), '(', ')', Some(len)))
    }

    fn serialize_map(self, len: Option<usize>) -> Result<MapCollector, DumpError> {
        Ok(MapCollector {
            serializer: self,
            pending_key: None,
            entries: Vec::with_capacity(len.unwrap_or_default()),
        })
    }

    fn serialize_struct(
        self,
        name: &'static str,
        len: usize,
    ) -> Result<StructCollector, DumpError> {
        Ok(self.record(name, len))
    }

    fn serialize_struct_variant(
        self,
        name: &'static str,
        _variant_index: u32,
        variant: &'static str,
        len: usize,
    ) -> Result<StructCollector, DumpError> {
        Ok(self.record(variant_name(name, variant), len))
    }
}

impl SeqCollector {
    fn push<T: Serialize + ?Sized>(&mut self, value: &T) -> Result<(), DumpError> {
        let item = self.serializer.child(value)?;
        self.items.push(item);
        Ok(())
    }

    fn finish(self) -> DumpNode {
        DumpNode::Seq {
            ty: self.ty,
            open: self.open,
            close: self.close,
            items: self.items,
        }
    }
}

impl ser::SerializeSeq for SeqCollector {
    type Ok = DumpNode;
    type Error = DumpError;

    fn serialize_element<T: Serialize + ?Sized>(&mut self, value: &T) -> Result<(), DumpError> {
        self.push(value)
    }

    fn end(self) -> Result<DumpNode, DumpError> {
        Ok(self.finish())
    }
}

impl ser::SerializeTuple for SeqCollector {
    type Ok = DumpNode;
    type Error = DumpError;

    fn serialize_element<T: Serialize + ?Sized>(&mut self, value: &T) -> Result<(), DumpError> {
        self.push(value)
    }

    fn end(self) -> Result<DumpNode, DumpError> {
        Ok(self.finish())
    }
}

impl ser::SerializeTupleStruct for SeqCollector {
    type Ok = DumpNode;
    type Error = DumpError;

    fn serialize_field<T: Serialize + ?Sized>(&mut self, value: &T) -> Result<(), DumpError> {
        self.push(value)
    }

    fn end(self) -> Result<DumpNode, DumpError> {
        Ok(self.finish())
    }
}

impl ser::SerializeTupleVariant for SeqCollector {
    type Ok = DumpNode;
    type Error = DumpError;

    fn serialize_field<T: Serialize + ?Sized>(&mut self, value: &T) -> Result<(), DumpError> {
        self.push(value)
    }

    fn end(self) -> Result<DumpNode, DumpError> {
        Ok(self.finish())
    }
}

impl ser::SerializeMap for MapCollector {
    type Ok = DumpNode;
    type Error = DumpError;

    fn serialize_key<T: Serialize + ?Sized>(&mut self, key: &T) -> Result<(), DumpError> {
        self.pending_key = Some(self.serializer.child(key)?);
        Ok(())
    }

    fn serialize_value<T: Serialize + ?Sized>(&mut self, value: &T) -> Result<(), DumpError> {
        let key = self.pending_key.take().ok_or(DumpError::MissingKey)?;
        let value = self.serializer.child(value)?;
        self.entries.push((key, value));
        Ok(())
    }

    fn end(self) -> Result<DumpNode, DumpError> {
        Ok(DumpNode::Map {
            ty: "map".to_string(),
            entries: self.entries,
        })
    }
}

impl StructCollector {
    fn push<T: Serialize + ?Sized>(
        &mut self,
        key: &'static str,
        value: &T,
    ) -> Result<(), DumpError> {
        let value = self.serializer.child(value)?;
        self.fields.push((key, value));
        Ok(())
    }

    fn finish(self) -> DumpNode {
        DumpNode::Struct {
            ty: self.ty,
            fields: self.fields,
        }
    }
}

impl ser::SerializeStruct for StructCollector {
    type Ok = DumpNode;
    type Error = DumpError;

    fn serialize_field<T: Serialize + ?Sized>(
        &mut self,
        key: &'static str,
        value: &T,
    ) -> Result<(), DumpError> {
        self.push(key, value)
    }

    fn end(self) -> Result<DumpNode, DumpError> {
        Ok(self.finish())
    }
}

impl ser::SerializeStructVariant for StructCollector {
    type Ok = DumpNode;
    type Error = DumpError;

    fn serialize_field<T: Serialize + ?Sized>(
        &mut self,
        key: &'static str,
        value: &T,
    ) -> Result<(), DumpError> {
        self.push(key, value)
    }

    fn end(self) -> Result<DumpNode, DumpError> {
        Ok(self.finish())
    }
}
