//! Class graph nodes and category predicates.

use std::sync::Arc;

use rustc_hash::{FxHashMap, FxHashSet};

use crate::metadata::unlinked::FieldConstant;

/// Dense index of a node within its [`crate::graph::ClassGraph`].
///
/// Ids are only meaningful relative to the graph (or builder) that issued them.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord)]
pub struct ClassId(pub(crate) u32);

impl ClassId {
    #[inline]
    pub(crate) fn index(self) -> usize {
        self.0 as usize
    }
}

/// The kind of relationship between two classes.
///
/// The first three pairs are recorded symmetrically: whenever a forward edge is added,
/// the paired inverse edge is added on the target. Field-type edges are one-way.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum Relation {
    /// Superclasses of this class. At most one entry for a scanned class; absent when
    /// the superclass is `java.lang.Object` or unknown.
    Superclass,
    /// Subclasses of this class.
    Subclass,
    /// Interfaces this class implements, or superinterfaces if this is an interface.
    /// May include annotations, since an annotation is an interface one can implement.
    ImplementedInterface,
    /// Classes implementing this interface, including sub-interfaces.
    ImplementingClass,
    /// Annotations on this class, or meta-annotations if this is an annotation.
    Annotation,
    /// Classes annotated by this annotation.
    AnnotatedClass,
    /// The classes referenced by this class's field types. One-way.
    FieldType,
}

/// Category used to select classes from query results.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ClassCategory {
    /// Any class, interface or annotation.
    All,
    /// A standard class (not an interface or annotation).
    StandardClass,
    /// An interface, including an annotation that some class implements as an
    /// interface. (Named "implemented interface" to distinguish it from an annotation.)
    ImplementedInterface,
    /// An annotation.
    Annotation,
    /// An interface or annotation.
    InterfaceOrAnnotation,
}

/// One node of the class graph: everything known about a single dotted class name,
/// whether from scanning its classfile or from references by other classfiles.
///
/// Identity and ordering are by name. The `is_interface` / `is_annotation` flags are
/// monotonic: they are set by the defining classfile and by any classfile that uses the
/// node as an interface or annotation, and never reset.
#[derive(Debug)]
pub struct ClassInfo {
    pub(crate) name: Arc<str>,
    pub(crate) is_interface: bool,
    pub(crate) is_annotation: bool,
    pub(crate) classfile_scanned: bool,
    pub(crate) companion_scanned: bool,
    pub(crate) trait_methods_scanned: bool,
    pub(crate) field_values: FxHashMap<Arc<str>, FieldConstant>,
    pub(crate) related: FxHashMap<Relation, FxHashSet<ClassId>>,
}

impl ClassInfo {
    pub(crate) fn new(name: Arc<str>) -> Self {
        ClassInfo {
            name,
            is_interface: false,
            is_annotation: false,
            classfile_scanned: false,
            companion_scanned: false,
            trait_methods_scanned: false,
            field_values: FxHashMap::default(),
            related: FxHashMap::default(),
        }
    }

    /// Fully-qualified dotted name of this class.
    #[must_use]
    pub fn name(&self) -> &str {
        &self.name
    }

    /// True if some classfile declared this node as an interface, or used it as one.
    #[must_use]
    pub fn is_interface(&self) -> bool {
        self.is_interface
    }

    /// True if some classfile declared this node as an annotation, or used it as one.
    #[must_use]
    pub fn is_annotation(&self) -> bool {
        self.is_annotation
    }

    /// True when the classfile defining this node was itself scanned, as opposed to the
    /// node only being referenced from other classfiles.
    #[must_use]
    pub fn classfile_scanned(&self) -> bool {
        self.classfile_scanned
    }

    /// True when the Scala companion object classfile (`Name$`) for this base name was
    /// scanned.
    #[must_use]
    pub fn companion_scanned(&self) -> bool {
        self.companion_scanned
    }

    /// True when the Scala trait-methods classfile (`Name$class`) for this base name
    /// was scanned.
    #[must_use]
    pub fn trait_methods_scanned(&self) -> bool {
        self.trait_methods_scanned
    }

    /// Captured static final field constants, keyed by field name.
    #[must_use]
    pub fn field_values(&self) -> &FxHashMap<Arc<str>, FieldConstant> {
        &self.field_values
    }

    /// The ids directly related to this node under `relation`.
    pub fn related(&self, relation: Relation) -> impl Iterator<Item = ClassId> + '_ {
        self.related.get(&relation).into_iter().flatten().copied()
    }

    /// True when this node has at least one edge under `relation`.
    #[must_use]
    pub fn has_related(&self, relation: Relation) -> bool {
        self.related
            .get(&relation)
            .is_some_and(|set| !set.is_empty())
    }

    /// True for a non-annotation interface, or for any node some class implements as an
    /// interface — which covers an annotation that is also used as an interface.
    #[must_use]
    pub fn is_implemented_interface(&self) -> bool {
        self.has_related(Relation::ImplementingClass) || (self.is_interface && !self.is_annotation)
    }

    /// True for a standard class. Defined defensively: a node that is not an annotation
    /// and either participates in a class hierarchy or is not an implemented interface,
    /// which tolerates pathological classpaths defining one name as both class and
    /// interface.
    #[must_use]
    pub fn is_standard_class(&self) -> bool {
        !self.is_annotation
            && (self.has_related(Relation::Subclass)
                || self.has_related(Relation::Superclass)
                || !self.is_implemented_interface())
    }

    /// True when this node falls in `category`.
    #[must_use]
    pub fn in_category(&self, category: ClassCategory) -> bool {
        match category {
            ClassCategory::All => true,
            ClassCategory::StandardClass => self.is_standard_class(),
            ClassCategory::ImplementedInterface => self.is_implemented_interface(),
            ClassCategory::Annotation => self.is_annotation,
            ClassCategory::InterfaceOrAnnotation => {
                self.is_implemented_interface() || self.is_annotation
            }
        }
    }
}

/// Strip Scala auxiliary class suffixes from a class name: `Name$` (companion object)
/// and `Name$class` (trait methods) both map to `Name`.
#[must_use]
pub fn scala_base_name(class_name: &str) -> &str {
    if let Some(base) = class_name.strip_suffix("$class") {
        base
    } else if let Some(base) = class_name.strip_suffix('$') {
        base
    } else {
        class_name
    }
}
