#![allow(dead_code)]

//! Shared test fixture: a small classfile byte builder.
//!
//! Synthesizes structurally valid classfiles without a Java compiler, so tests can
//! exercise exact header layouts (constant pool slot widths, attribute tables,
//! annotation element values) and targeted malformations.

/// Serialized element value inside an annotation.
#[derive(Clone)]
pub enum ElementValue {
    /// A primitive or string constant: tag character plus const_value_index.
    Const(u8, u16),
    /// An enum constant: type_name_index plus const_name_index.
    Enum(u16, u16),
    /// A class reference: class_info_index.
    Class(u16),
    /// A nested annotation against the given type descriptor utf8 index.
    Nested(u16, Vec<(u16, ElementValue)>),
    /// An array of element values.
    Array(Vec<ElementValue>),
}

/// A field attribute to serialize.
pub enum FieldAttr<'a> {
    /// ConstantValue attribute pointing at a pool index.
    ConstantValue(u16),
    /// Signature attribute pointing at a utf8 pool index.
    Signature(u16),
    /// An arbitrary named attribute with an opaque payload.
    Opaque(u16, &'a [u8]),
}

/// Incrementally builds one classfile. Pool entries are allocated eagerly as
/// `utf8`/`class_ref`/... are called; `build` assembles the final byte stream.
pub struct ClassfileBuilder {
    magic: u32,
    access_flags: u16,
    this_class: u16,
    super_class: u16,
    interfaces: Vec<u16>,
    pool_bytes: Vec<u8>,
    pool_count: u16,
    field_bytes: Vec<u8>,
    field_count: u16,
    method_bytes: Vec<u8>,
    method_count: u16,
    annotations: Vec<Vec<u8>>,
    class_attrs: Vec<(u16, Vec<u8>)>,
}

fn push_u16(out: &mut Vec<u8>, value: u16) {
    out.extend_from_slice(&value.to_be_bytes());
}

fn push_u32(out: &mut Vec<u8>, value: u32) {
    out.extend_from_slice(&value.to_be_bytes());
}

impl ClassfileBuilder {
    pub fn new() -> Self {
        ClassfileBuilder {
            magic: 0xCAFE_BABE,
            access_flags: 0x0021,
            this_class: 0,
            super_class: 0,
            interfaces: Vec::new(),
            pool_bytes: Vec::new(),
            pool_count: 1,
            field_bytes: Vec::new(),
            field_count: 0,
            method_bytes: Vec::new(),
            method_count: 0,
            annotations: Vec::new(),
            class_attrs: Vec::new(),
        }
    }

    pub fn magic(mut self, magic: u32) -> Self {
        self.magic = magic;
        self
    }

    pub fn access_flags(mut self, flags: u16) -> Self {
        self.access_flags = flags;
        self
    }

    /// Allocate a utf8 pool entry holding raw bytes, returning its index.
    pub fn utf8_bytes(&mut self, bytes: &[u8]) -> u16 {
        let idx = self.pool_count;
        self.pool_count += 1;
        self.pool_bytes.push(1);
        push_u16(&mut self.pool_bytes, bytes.len() as u16);
        self.pool_bytes.extend_from_slice(bytes);
        idx
    }

    /// Allocate a utf8 pool entry, returning its index.
    pub fn utf8(&mut self, s: &str) -> u16 {
        self.utf8_bytes(s.as_bytes())
    }

    /// Allocate a Class entry referencing the internal (slashed) name.
    pub fn class_ref(&mut self, internal_name: &str) -> u16 {
        let name_idx = self.utf8(internal_name);
        self.class_ref_to(name_idx)
    }

    /// Allocate a Class entry referencing an existing utf8 index (0 for a null string).
    pub fn class_ref_to(&mut self, name_idx: u16) -> u16 {
        let idx = self.pool_count;
        self.pool_count += 1;
        self.pool_bytes.push(7);
        push_u16(&mut self.pool_bytes, name_idx);
        idx
    }

    pub fn integer(&mut self, value: i32) -> u16 {
        let idx = self.pool_count;
        self.pool_count += 1;
        self.pool_bytes.push(3);
        push_u32(&mut self.pool_bytes, value as u32);
        idx
    }

    pub fn float(&mut self, value: f32) -> u16 {
        let idx = self.pool_count;
        self.pool_count += 1;
        self.pool_bytes.push(4);
        push_u32(&mut self.pool_bytes, value.to_bits());
        idx
    }

    /// Allocate a Long entry; consumes two pool slots.
    pub fn long(&mut self, value: i64) -> u16 {
        let idx = self.pool_count;
        self.pool_count += 2;
        self.pool_bytes.push(5);
        self.pool_bytes.extend_from_slice(&value.to_be_bytes());
        idx
    }

    /// Allocate a Double entry; consumes two pool slots.
    pub fn double(&mut self, value: f64) -> u16 {
        let idx = self.pool_count;
        self.pool_count += 2;
        self.pool_bytes.push(6);
        self.pool_bytes.extend_from_slice(&value.to_bits().to_be_bytes());
        idx
    }

    /// Allocate a String entry (tag 8) referencing a new utf8 entry.
    pub fn string_const(&mut self, s: &str) -> u16 {
        let utf_idx = self.utf8(s);
        let idx = self.pool_count;
        self.pool_count += 1;
        self.pool_bytes.push(8);
        push_u16(&mut self.pool_bytes, utf_idx);
        idx
    }

    /// Append a pool entry with an arbitrary tag and payload, for malformation tests.
    pub fn raw_pool_entry(&mut self, tag: u8, payload: &[u8]) -> u16 {
        let idx = self.pool_count;
        self.pool_count += 1;
        self.pool_bytes.push(tag);
        self.pool_bytes.extend_from_slice(payload);
        idx
    }

    /// Set this_class from an internal (slashed) name.
    pub fn this_class(mut self, internal_name: &str) -> Self {
        let idx = self.class_ref(internal_name);
        self.this_class = idx;
        self
    }

    /// Set this_class from an existing Class pool index.
    pub fn this_class_idx(mut self, idx: u16) -> Self {
        self.this_class = idx;
        self
    }

    /// Set super_class from an internal (slashed) name.
    pub fn super_class(mut self, internal_name: &str) -> Self {
        let idx = self.class_ref(internal_name);
        self.super_class = idx;
        self
    }

    /// Set super_class to `java/lang/Object`.
    pub fn super_object(self) -> Self {
        self.super_class("java/lang/Object")
    }

    pub fn interface(mut self, internal_name: &str) -> Self {
        let idx = self.class_ref(internal_name);
        self.interfaces.push(idx);
        self
    }

    /// Append a field with no attributes.
    pub fn field(mut self, access: u16, name: &str, descriptor: &str) -> Self {
        self.push_field(access, name, descriptor, &[]);
        self
    }

    /// Append a field with the given attributes.
    pub fn field_with_attrs(
        mut self,
        access: u16,
        name: &str,
        descriptor: &str,
        attrs: &[FieldAttr<'_>],
    ) -> Self {
        self.push_field(access, name, descriptor, attrs);
        self
    }

    fn push_field(&mut self, access: u16, name: &str, descriptor: &str, attrs: &[FieldAttr<'_>]) {
        let name_idx = self.utf8(name);
        let desc_idx = self.utf8(descriptor);
        let mut serialized: Vec<(u16, Vec<u8>)> = Vec::new();
        for attr in attrs {
            match attr {
                FieldAttr::ConstantValue(value_idx) => {
                    let attr_name = self.utf8("ConstantValue");
                    let mut payload = Vec::new();
                    push_u16(&mut payload, *value_idx);
                    serialized.push((attr_name, payload));
                }
                FieldAttr::Signature(sig_idx) => {
                    let attr_name = self.utf8("Signature");
                    let mut payload = Vec::new();
                    push_u16(&mut payload, *sig_idx);
                    serialized.push((attr_name, payload));
                }
                FieldAttr::Opaque(attr_name, payload) => {
                    serialized.push((*attr_name, payload.to_vec()));
                }
            }
        }
        self.field_count += 1;
        push_u16(&mut self.field_bytes, access);
        push_u16(&mut self.field_bytes, name_idx);
        push_u16(&mut self.field_bytes, desc_idx);
        push_u16(&mut self.field_bytes, serialized.len() as u16);
        for (attr_name, payload) in serialized {
            push_u16(&mut self.field_bytes, attr_name);
            push_u32(&mut self.field_bytes, payload.len() as u32);
            self.field_bytes.extend_from_slice(&payload);
        }
    }

    /// Append a method with a fake Code attribute; the parser must skip it wholesale.
    pub fn method(mut self, access: u16, name: &str, descriptor: &str) -> Self {
        let name_idx = self.utf8(name);
        let desc_idx = self.utf8(descriptor);
        let code_name = self.utf8("Code");
        self.method_count += 1;
        push_u16(&mut self.method_bytes, access);
        push_u16(&mut self.method_bytes, name_idx);
        push_u16(&mut self.method_bytes, desc_idx);
        push_u16(&mut self.method_bytes, 1);
        push_u16(&mut self.method_bytes, code_name);
        let body = [0xAAu8; 13];
        push_u32(&mut self.method_bytes, body.len() as u32);
        self.method_bytes.extend_from_slice(&body);
        self
    }

    fn write_element_value(out: &mut Vec<u8>, value: &ElementValue) {
        match value {
            ElementValue::Const(tag, idx) => {
                out.push(*tag);
                push_u16(out, *idx);
            }
            ElementValue::Enum(type_idx, const_idx) => {
                out.push(b'e');
                push_u16(out, *type_idx);
                push_u16(out, *const_idx);
            }
            ElementValue::Class(idx) => {
                out.push(b'c');
                push_u16(out, *idx);
            }
            ElementValue::Nested(type_idx, pairs) => {
                out.push(b'@');
                Self::write_annotation(out, *type_idx, pairs);
            }
            ElementValue::Array(values) => {
                out.push(b'[');
                push_u16(out, values.len() as u16);
                for nested in values {
                    Self::write_element_value(out, nested);
                }
            }
        }
    }

    fn write_annotation(out: &mut Vec<u8>, type_idx: u16, pairs: &[(u16, ElementValue)]) {
        push_u16(out, type_idx);
        push_u16(out, pairs.len() as u16);
        for (name_idx, value) in pairs {
            push_u16(out, *name_idx);
            Self::write_element_value(out, value);
        }
    }

    /// Add a runtime-visible class annotation with the given element-value pairs.
    /// `descriptor` is the annotation's field descriptor, e.g. `Lcom/xyz/Marker;`.
    pub fn class_annotation(mut self, descriptor: &str, pairs: &[(u16, ElementValue)]) -> Self {
        let type_idx = self.utf8(descriptor);
        let mut serialized = Vec::new();
        Self::write_annotation(&mut serialized, type_idx, pairs);
        self.annotations.push(serialized);
        self
    }

    /// Add an arbitrary class-level attribute; the parser must skip it by length.
    pub fn class_attribute(mut self, name: &str, payload: &[u8]) -> Self {
        let name_idx = self.utf8(name);
        self.class_attrs.push((name_idx, payload.to_vec()));
        self
    }

    pub fn build(mut self) -> Vec<u8> {
        // One RuntimeVisibleAnnotations attribute holds all class annotations; its name
        // entry can still be allocated here because the pool is serialized below.
        let annotations = std::mem::take(&mut self.annotations);
        let mut attrs: Vec<(u16, Vec<u8>)> = std::mem::take(&mut self.class_attrs);
        if !annotations.is_empty() {
            let name_idx = self.utf8("RuntimeVisibleAnnotations");
            let mut payload = Vec::new();
            push_u16(&mut payload, annotations.len() as u16);
            for annotation in &annotations {
                payload.extend_from_slice(annotation);
            }
            attrs.push((name_idx, payload));
        }

        let mut out = Vec::new();
        push_u32(&mut out, self.magic);
        push_u16(&mut out, 0); // minor version
        push_u16(&mut out, 0x34); // major version
        push_u16(&mut out, self.pool_count);
        out.extend_from_slice(&self.pool_bytes);
        push_u16(&mut out, self.access_flags);
        push_u16(&mut out, self.this_class);
        push_u16(&mut out, self.super_class);
        push_u16(&mut out, self.interfaces.len() as u16);
        for interface_idx in &self.interfaces {
            push_u16(&mut out, *interface_idx);
        }
        push_u16(&mut out, self.field_count);
        out.extend_from_slice(&self.field_bytes);
        push_u16(&mut out, self.method_count);
        out.extend_from_slice(&self.method_bytes);
        push_u16(&mut out, attrs.len() as u16);
        for (name_idx, payload) in &attrs {
            push_u16(&mut out, *name_idx);
            push_u32(&mut out, payload.len() as u32);
            out.extend_from_slice(payload);
        }
        out
    }
}
