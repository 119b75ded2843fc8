//! Binary classfile header parser.
//!
//! [`ClassfileParser`] walks the fixed layout of one classfile — magic, versions,
//! constant pool, access flags, this/super class, interfaces, fields, methods, class
//! attributes — and produces one [`UnlinkedClass`] record, or nothing when the file is
//! skipped or malformed. It implements its own buffering to avoid per-value stream
//! overhead, and should only be used by a single thread at a time, but can be re-used to
//! scan multiple classfiles in sequence, to avoid re-allocating buffer memory.
//!
//! Method bodies are never inspected: methods and all unrecognized attributes are
//! skipped by their declared length, which is also what keeps the parser insensitive to
//! new classfile versions.

use std::io::Read;
use std::sync::Arc;

use rustc_hash::{FxHashMap, FxHashSet};

use crate::{
    file::ClassfileReader,
    metadata::{
        descriptor,
        filter::ScanFilter,
        flags::{ClassAccessFlags, FieldAccessFlags},
        intern::InternTable,
        log::DeferredLog,
        pool::{ConstantPool, ConstantValue},
        unlinked::{FieldConstant, UnlinkedClass},
    },
    Result,
};

/// The classfile magic number.
pub const CLASSFILE_MAGIC: u32 = 0xCAFE_BABE;

/// Static final fields to capture, as a map from dotted class name to field names.
///
/// Only fields pre-registered here have their `ConstantValue` attributes resolved; for
/// every other field the parser skips attribute payloads without decoding them.
pub type StaticFieldMatches = FxHashMap<String, FxHashSet<String>>;

/// Tunables consumed at parser construction.
#[derive(Debug, Clone, Copy)]
pub struct ScanOptions {
    /// Emit per-classfile diagnostics (skipped files, found classes) to the deferred
    /// log. Off by default.
    pub verbose: bool,
    /// Scan non-public fields as well as public ones. Off by default, matching runtime
    /// reflection visibility.
    pub scan_non_public_fields: bool,
}

impl Default for ScanOptions {
    fn default() -> Self {
        ScanOptions {
            verbose: false,
            scan_non_public_fields: false,
        }
    }
}

/// A reusable single-thread classfile header parser.
///
/// The byte buffer, constant-pool index and deferred log persist between invocations on
/// the same instance; distinct instances share nothing but the intern table and may run
/// on distinct threads in parallel.
///
/// # Examples
///
/// ```rust,no_run
/// use jvmscope::metadata::{ClassfileParser, ScanOptions, StaticFieldMatches, AcceptAll, InternTable};
/// use std::sync::Arc;
///
/// let mut parser = ClassfileParser::new(
///     Arc::new(AcceptAll),
///     Arc::new(StaticFieldMatches::default()),
///     Arc::new(InternTable::new()),
///     ScanOptions::default(),
/// );
/// let mut file = std::fs::File::open("target/classes/com/example/App.class")?;
/// if let Some(record) = parser.parse(&mut file, "com/example/App.class") {
///     println!("parsed {}", record.class_name);
/// }
/// # Ok::<(), std::io::Error>(())
/// ```
pub struct ClassfileParser {
    filter: Arc<dyn ScanFilter>,
    matches: Arc<StaticFieldMatches>,
    intern: Arc<InternTable>,
    options: ScanOptions,
    /// Classfile byte buffer, reused across parses.
    buf: Vec<u8>,
    /// Constant pool index, reused across parses.
    pool: ConstantPool,
    log: DeferredLog,
}

impl ClassfileParser {
    /// Create a parser with the given scan filter, static-field match specification,
    /// shared intern table and options.
    #[must_use]
    pub fn new(
        filter: Arc<dyn ScanFilter>,
        matches: Arc<StaticFieldMatches>,
        intern: Arc<InternTable>,
        options: ScanOptions,
    ) -> Self {
        ClassfileParser {
            filter,
            matches,
            intern,
            options,
            buf: Vec::new(),
            pool: ConstantPool::new(),
            log: DeferredLog::new(),
        }
    }

    /// Read one classfile header from `input` and build its [`UnlinkedClass`] record.
    ///
    /// `relative_path` is the archive-relative path of the classfile
    /// (`pkg/.../Name.class`); a classfile whose `this_class` disagrees with it is
    /// skipped. Returns `None` when the file is skipped (`java.lang.Object`, path
    /// mismatch) or malformed; parse errors are recorded in the deferred log and never
    /// propagate, so one bad classfile cannot abort a scan.
    pub fn parse(&mut self, input: &mut dyn Read, relative_path: &str) -> Option<UnlinkedClass> {
        match self.parse_inner(input, relative_path) {
            Ok(record) => record,
            Err(err) => {
                self.log.log(
                    2,
                    format!(
                        "Exception while attempting to load classfile {relative_path}: {err}"
                    ),
                );
                None
            }
        }
    }

    /// Take the deferred log accumulated by this parser, leaving it empty.
    pub fn take_log(&mut self) -> DeferredLog {
        std::mem::take(&mut self.log)
    }

    fn parse_inner(
        &mut self,
        input: &mut dyn Read,
        relative_path: &str,
    ) -> Result<Option<UnlinkedClass>> {
        let Self {
            filter,
            matches,
            intern,
            options,
            buf,
            pool,
            log,
        } = self;
        let mut reader = ClassfileReader::new(buf, input)?;

        if reader.u32()? != CLASSFILE_MAGIC {
            return Err(malformed_error!(
                "Classfile {} does not have correct classfile magic number",
                relative_path
            ));
        }
        // Minor and major version
        reader.skip(4)?;

        pool.parse(&mut reader)?;

        let flags = ClassAccessFlags::from_bits_retain(reader.u16()?);
        let is_interface = flags.contains(ClassAccessFlags::INTERFACE);
        let is_annotation = flags.contains(ClassAccessFlags::ANNOTATION);

        let this_class_idx = reader.u16()? as usize;
        let Some(class_name) = pool.class_name(&reader, this_class_idx)? else {
            return Err(malformed_error!(
                "Classfile {} has a null this_class entry",
                relative_path
            ));
        };
        if class_name == "java.lang.Object" {
            // java.lang.Object has no scannable relationships of its own
            return Ok(None);
        }
        if !class_name_matches(&class_name, relative_path) {
            if options.verbose {
                log.log(
                    2,
                    format!(
                        "Class {class_name} is at incorrect relative path {relative_path} -- ignoring"
                    ),
                );
            }
            return Ok(None);
        }

        let mut record = UnlinkedClass::new(&class_name, is_interface, is_annotation, intern);

        let super_class_idx = reader.u16()? as usize;
        if super_class_idx != 0 {
            if let Some(superclass_name) = pool.class_name(&reader, super_class_idx)? {
                if superclass_name != "java.lang.Object" && filter.is_allowed(&superclass_name) {
                    record.add_superclass(&superclass_name, intern);
                }
            }
        }

        let interface_count = reader.u16()? as usize;
        for _ in 0..interface_count {
            let interface_idx = reader.u16()? as usize;
            if let Some(interface_name) = pool.class_name(&reader, interface_idx)? {
                if filter.is_allowed(&interface_name) {
                    record.add_implemented_interface(&interface_name, intern);
                }
            }
        }

        let fields_to_match = matches.get(class_name.as_str());
        let field_count = reader.u16()? as usize;
        for _ in 0..field_count {
            let access = FieldAccessFlags::from_bits_retain(reader.u16()?);
            let scan_field =
                access.contains(FieldAccessFlags::PUBLIC) || options.scan_non_public_fields;
            if !scan_field {
                // Skip name and descriptor indices without resolving strings
                reader.skip(4)?;
                skip_attributes(&mut reader)?;
                continue;
            }

            let is_static_final = access.is_static_final();
            let field_name_idx = reader.u16()? as usize;
            let mut matched_field: Option<String> = None;
            if let Some(wanted) = fields_to_match {
                if let Some(field_name) = pool.string(&reader, field_name_idx, false)? {
                    if wanted.contains(&field_name) {
                        matched_field = Some(field_name);
                    }
                }
            }

            let descriptor_idx = reader.u16()? as usize;
            let field_descriptor = pool.string(&reader, descriptor_idx, false)?;
            let attribute_count = reader.u16()? as usize;

            if let Some(field_descriptor) = field_descriptor.as_deref() {
                descriptor::extract_type_names(field_descriptor, |type_name| {
                    if filter.is_allowed(&type_name) {
                        record.add_field_type(&type_name, intern);
                    }
                });
            }

            if !is_static_final {
                if let Some(field_name) = matched_field.as_deref() {
                    log.log(
                        2,
                        format!(
                            "Cannot match requested field {}.{field_name} because it is either not static or not final",
                            record.class_name
                        ),
                    );
                }
            }

            let mut found_constant_value = false;
            for _ in 0..attribute_count {
                let attribute_name_idx = reader.u16()? as usize;
                let attribute_len = reader.u32()? as usize;
                let wants_constant = is_static_final && matched_field.is_some();
                if wants_constant && pool.string_equals(&reader, attribute_name_idx, "ConstantValue")? {
                    let value_idx = reader.u16()? as usize;
                    let value = pool.value(&reader, value_idx)?;
                    let Some(field_descriptor) = field_descriptor.as_deref() else {
                        return Err(malformed_error!(
                            "Field in class {} carries a ConstantValue but has a null type descriptor",
                            record.class_name
                        ));
                    };
                    let constant = coerce_constant(value, field_descriptor, &record.class_name)?;
                    if let Some(field_name) = matched_field.as_deref() {
                        record.add_field_constant(field_name, constant, intern);
                        found_constant_value = true;
                    }
                } else if pool.string_equals(&reader, attribute_name_idx, "Signature")? {
                    // The signature carries generic type parameters the erased
                    // descriptor does not
                    let signature_idx = reader.u16()? as usize;
                    if let Some(signature) = pool.string(&reader, signature_idx, false)? {
                        descriptor::extract_type_names(&signature, |type_name| {
                            if filter.is_allowed(&type_name) {
                                record.add_field_type(&type_name, intern);
                            }
                        });
                    }
                } else {
                    reader.skip(attribute_len)?;
                }
            }
            if is_static_final && !found_constant_value {
                if let Some(field_name) = matched_field.as_deref() {
                    log.log(
                        2,
                        format!(
                            "Requested static final field {}.{field_name} is not initialized with a constant literal value, \
                             so there is no initializer value in the constant pool of the classfile",
                            record.class_name
                        ),
                    );
                }
            }
        }

        let method_count = reader.u16()? as usize;
        for _ in 0..method_count {
            // access_flags, name_index, descriptor_index
            reader.skip(6)?;
            skip_attributes(&mut reader)?;
        }

        let attribute_count = reader.u16()? as usize;
        for _ in 0..attribute_count {
            let attribute_name_idx = reader.u16()? as usize;
            let attribute_len = reader.u32()? as usize;
            if pool.string_equals(&reader, attribute_name_idx, "RuntimeVisibleAnnotations")? {
                let annotation_count = reader.u16()? as usize;
                for _ in 0..annotation_count {
                    let annotation_name = read_annotation(&mut reader, pool)?;
                    if filter.is_allowed(&annotation_name) {
                        record.add_annotation(&annotation_name, intern);
                    }
                }
            } else {
                reader.skip(attribute_len)?;
            }
        }

        if options.verbose {
            let kind = if record.is_annotation {
                "annotation class"
            } else if record.is_interface {
                "interface class"
            } else {
                "class"
            };
            log.log(2, format!("Found {kind} {}", record.class_name));
        }

        Ok(Some(record))
    }
}

/// Skip an attribute table: a 2-byte count, then per attribute a 2-byte name index, a
/// 4-byte length and that many payload bytes.
fn skip_attributes(reader: &mut ClassfileReader<'_>) -> Result<()> {
    let attribute_count = reader.u16()? as usize;
    for _ in 0..attribute_count {
        reader.skip(2)?;
        let attribute_len = reader.u32()? as usize;
        reader.skip(attribute_len)?;
    }
    Ok(())
}

/// Read one annotation: its type descriptor and its (discarded) element-value pairs.
/// Returns the annotation's dotted class name.
fn read_annotation(reader: &mut ClassfileReader<'_>, pool: &ConstantPool) -> Result<String> {
    let type_idx = reader.u16()? as usize;
    let Some(type_descriptor) = pool.class_name(reader, type_idx)? else {
        return Err(malformed_error!(
            "Annotation type descriptor is a null constant pool entry"
        ));
    };
    // Lcom.xyz.Annotation; -> com.xyz.Annotation
    let annotation_class_name = type_descriptor
        .strip_prefix('L')
        .and_then(|name| name.strip_suffix(';'))
        .unwrap_or(&type_descriptor)
        .to_string();
    let pair_count = reader.u16()? as usize;
    for _ in 0..pair_count {
        // element_name_index
        reader.skip(2)?;
        read_annotation_element_value(reader, pool)?;
    }
    Ok(annotation_class_name)
}

/// Skip one annotation element value, recursing through nested annotations and arrays.
fn read_annotation_element_value(
    reader: &mut ClassfileReader<'_>,
    pool: &ConstantPool,
) -> Result<()> {
    let tag = reader.u8()?;
    match tag {
        // primitive or string constant: const_value_index
        b'B' | b'C' | b'D' | b'F' | b'I' | b'J' | b'S' | b'Z' | b's' => reader.skip(2)?,
        // enum_const_value: type name and const name indices
        b'e' => reader.skip(4)?,
        // class_info_index
        b'c' => reader.skip(2)?,
        // nested annotation
        b'@' => {
            read_annotation(reader, pool)?;
        }
        // array_value
        b'[' => {
            let count = reader.u16()? as usize;
            for _ in 0..count {
                read_annotation_element_value(reader, pool)?;
            }
        }
        _ => {
            return Err(malformed_error!(
                "Unknown annotation element type tag '{}': element size unknown",
                tag as char
            ))
        }
    }
    Ok(())
}

/// True if the dotted class name (e.g. `com.x.MyClass`) matches the relative path
/// (e.g. `com/x/MyClass.class`), compared without allocating.
fn class_name_matches(class_name: &str, relative_path: &str) -> bool {
    let name = class_name.as_bytes();
    let path = relative_path.as_bytes();
    if path.len() != name.len() + 6 || !relative_path.ends_with(".class") {
        return false;
    }
    name.iter()
        .zip(path)
        .all(|(&n, &p)| (n == b'.' && p == b'/') || n == p)
}

/// Coerce a pool constant to the field's declared type, keyed by the first character of
/// the type descriptor. `byte`, `char`, `short` and `boolean` initializers are stored as
/// 4-byte pool integers and converted here.
fn coerce_constant(
    value: ConstantValue,
    field_descriptor: &str,
    class_name: &str,
) -> Result<FieldConstant> {
    let mismatch = || {
        malformed_error!(
            "ConstantValue type does not match field descriptor {} in class {}",
            field_descriptor,
            class_name
        )
    };
    match field_descriptor.as_bytes().first() {
        Some(b'B') => match value {
            ConstantValue::Int(v) => Ok(FieldConstant::Byte(v as i8)),
            _ => Err(mismatch()),
        },
        Some(b'C') => match value {
            ConstantValue::Int(v) => Ok(FieldConstant::Char(v as u16)),
            _ => Err(mismatch()),
        },
        Some(b'S') => match value {
            ConstantValue::Int(v) => Ok(FieldConstant::Short(v as i16)),
            _ => Err(mismatch()),
        },
        Some(b'Z') => match value {
            ConstantValue::Int(v) => Ok(FieldConstant::Boolean(v != 0)),
            _ => Err(mismatch()),
        },
        Some(b'I') => match value {
            ConstantValue::Int(v) => Ok(FieldConstant::Int(v)),
            _ => Err(mismatch()),
        },
        Some(b'J') => match value {
            ConstantValue::Long(v) => Ok(FieldConstant::Long(v)),
            _ => Err(mismatch()),
        },
        Some(b'F') => match value {
            ConstantValue::Float(v) => Ok(FieldConstant::Float(v)),
            _ => Err(mismatch()),
        },
        Some(b'D') => match value {
            ConstantValue::Double(v) => Ok(FieldConstant::Double(v)),
            _ => Err(mismatch()),
        },
        _ if field_descriptor == "Ljava/lang/String;" => match value {
            ConstantValue::String(v) => Ok(FieldConstant::String(Arc::from(v.as_str()))),
            _ => Err(mismatch()),
        },
        _ => Err(malformed_error!(
            "Unknown constant initializer type {} for class {}",
            field_descriptor,
            class_name
        )),
    }
}
