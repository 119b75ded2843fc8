//! Cross-linking of unlinked records into the class graph, and the query surface over
//! the finished graph.
//!
//! Linking is deliberately single-threaded: parsers may produce [`UnlinkedClass`]
//! records in parallel, but all mutation of the name→node map happens on the linking
//! thread, which removes every cross-node race window without locking. The finished
//! [`ClassGraph`] is immutable and freely shareable.

use std::collections::VecDeque;
use std::sync::Arc;

use rustc_hash::{FxHashMap, FxHashSet};

use crate::{
    graph::classinfo::{scala_base_name, ClassCategory, ClassId, ClassInfo, Relation},
    metadata::{intern::InternTable, unlinked::FieldConstant, unlinked::UnlinkedClass},
    Error, Result,
};

/// Accumulates [`UnlinkedClass`] records into class graph nodes.
///
/// Nodes are created on first mention, whether that mention is a scanned classfile or a
/// mere reference from another classfile's header. Scala auxiliary classfiles (`Name$`,
/// `Name$class`) merge into the node of their base name, each auxiliary form accepted at
/// most once.
///
/// # Examples
///
/// ```rust
/// use jvmscope::graph::ClassGraphBuilder;
/// use jvmscope::metadata::InternTable;
/// use std::sync::Arc;
///
/// let builder = ClassGraphBuilder::new(Arc::new(InternTable::new()));
/// let graph = builder.build();
/// assert!(graph.is_empty());
/// ```
pub struct ClassGraphBuilder {
    nodes: Vec<ClassInfo>,
    ids_by_name: FxHashMap<Arc<str>, ClassId>,
    intern: Arc<InternTable>,
}

impl ClassGraphBuilder {
    /// Create an empty builder sharing `intern` with the parse phase.
    #[must_use]
    pub fn new(intern: Arc<InternTable>) -> Self {
        ClassGraphBuilder {
            nodes: Vec::new(),
            ids_by_name: FxHashMap::default(),
            intern,
        }
    }

    fn get_or_create(&mut self, class_name: &str) -> ClassId {
        let base_name = scala_base_name(class_name);
        if let Some(&id) = self.ids_by_name.get(base_name) {
            return id;
        }
        let name = self.intern.intern(base_name);
        let id = ClassId(self.nodes.len() as u32);
        self.nodes.push(ClassInfo::new(name.clone()));
        self.ids_by_name.insert(name, id);
        id
    }

    fn add_edge(&mut self, from: ClassId, relation: Relation, to: ClassId) {
        self.nodes[from.index()]
            .related
            .entry(relation)
            .or_default()
            .insert(to);
    }

    /// Register the scanned classfile itself, handling the Scala auxiliary forms.
    fn add_scanned_class(
        &mut self,
        class_name: &str,
        is_interface: bool,
        is_annotation: bool,
    ) -> Result<ClassId> {
        let is_companion = class_name.ends_with('$');
        let is_trait_methods = class_name.ends_with("$class");
        let id = self.get_or_create(class_name);
        let info = &mut self.nodes[id.index()];
        let already_scanned = if is_trait_methods {
            info.trait_methods_scanned
        } else if is_companion {
            info.companion_scanned
        } else {
            info.classfile_scanned
        };
        if already_scanned {
            // The classpath walker masks duplicate relative paths, so a second
            // classfile for the same name is a broken input stream
            return Err(Error::DuplicateClass(class_name.to_string()));
        }
        if is_trait_methods {
            info.trait_methods_scanned = true;
        } else if is_companion {
            info.companion_scanned = true;
        } else {
            info.classfile_scanned = true;
        }
        info.is_interface |= is_interface;
        info.is_annotation |= is_annotation;
        Ok(id)
    }

    fn add_superclass(&mut self, id: ClassId, superclass_name: &str) {
        if superclass_name == "java.lang.Object" {
            return;
        }
        let super_id = self.get_or_create(superclass_name);
        self.add_edge(id, Relation::Superclass, super_id);
        self.add_edge(super_id, Relation::Subclass, id);
    }

    fn add_implemented_interface(&mut self, id: ClassId, interface_name: &str) {
        let interface_id = self.get_or_create(interface_name);
        self.nodes[interface_id.index()].is_interface = true;
        self.add_edge(id, Relation::ImplementedInterface, interface_id);
        self.add_edge(interface_id, Relation::ImplementingClass, id);
    }

    fn add_annotation(&mut self, id: ClassId, annotation_name: &str) {
        let annotation_id = self.get_or_create(annotation_name);
        self.nodes[annotation_id.index()].is_annotation = true;
        self.add_edge(id, Relation::Annotation, annotation_id);
        self.add_edge(annotation_id, Relation::AnnotatedClass, id);
    }

    fn add_field_type(&mut self, id: ClassId, field_type_name: &str) {
        let field_type_id = self.get_or_create(field_type_name);
        self.add_edge(id, Relation::FieldType, field_type_id);
    }

    /// Link one record into the graph.
    ///
    /// # Errors
    /// Returns [`Error::DuplicateClass`] when a classfile (or the same Scala auxiliary
    /// form) for this name was already linked.
    pub fn link(&mut self, record: &UnlinkedClass) -> Result<()> {
        let id = self.add_scanned_class(
            &record.class_name,
            record.is_interface,
            record.is_annotation,
        )?;
        if let Some(superclass_name) = &record.superclass_name {
            self.add_superclass(id, superclass_name);
        }
        for interface_name in &record.implemented_interfaces {
            self.add_implemented_interface(id, interface_name);
        }
        for annotation_name in &record.annotations {
            self.add_annotation(id, annotation_name);
        }
        for field_type_name in &record.field_types {
            self.add_field_type(id, field_type_name);
        }
        for (field_name, value) in &record.static_final_field_values {
            self.nodes[id.index()]
                .field_values
                .insert(field_name.clone(), value.clone());
        }
        Ok(())
    }

    /// Link a sequence of records in order.
    ///
    /// # Errors
    /// Returns the first [`Error::DuplicateClass`] encountered.
    pub fn link_all<'a>(
        &mut self,
        records: impl IntoIterator<Item = &'a UnlinkedClass>,
    ) -> Result<()> {
        for record in records {
            self.link(record)?;
        }
        Ok(())
    }

    /// Finalize into an immutable, queryable graph.
    #[must_use]
    pub fn build(self) -> ClassGraph {
        ClassGraph {
            nodes: self.nodes,
            ids_by_name: self.ids_by_name,
        }
    }
}

/// The cross-linked class graph: one node per dotted class name ever observed, with
/// relation sets per node.
pub struct ClassGraph {
    nodes: Vec<ClassInfo>,
    ids_by_name: FxHashMap<Arc<str>, ClassId>,
}

impl ClassGraph {
    /// Number of nodes (scanned and referenced) in the graph.
    #[must_use]
    pub fn len(&self) -> usize {
        self.nodes.len()
    }

    /// True when the graph holds no nodes at all.
    #[must_use]
    pub fn is_empty(&self) -> bool {
        self.nodes.is_empty()
    }

    /// Resolve a dotted class name to its id. Scala auxiliary suffixes are stripped, so
    /// `Outer$` resolves to the node of `Outer`.
    #[must_use]
    pub fn id_of(&self, class_name: &str) -> Option<ClassId> {
        self.ids_by_name.get(scala_base_name(class_name)).copied()
    }

    /// The node for `id`.
    ///
    /// # Panics
    /// Panics if `id` was issued by a different graph and is out of range.
    #[must_use]
    pub fn info(&self, id: ClassId) -> &ClassInfo {
        &self.nodes[id.index()]
    }

    /// The node for a dotted class name, if present.
    #[must_use]
    pub fn class(&self, class_name: &str) -> Option<&ClassInfo> {
        self.id_of(class_name).map(|id| self.info(id))
    }

    /// Iterate over all nodes with their ids.
    pub fn iter(&self) -> impl Iterator<Item = (ClassId, &ClassInfo)> {
        self.nodes
            .iter()
            .enumerate()
            .map(|(index, info)| (ClassId(index as u32), info))
    }

    /// The ids directly related to `id` under `relation`.
    pub fn related(&self, id: ClassId, relation: Relation) -> impl Iterator<Item = ClassId> + '_ {
        self.info(id).related(relation)
    }

    /// All ids reachable from `id` over repeated application of `relation`, excluding
    /// `id` itself. Cycle-safe; the result is an unordered set.
    #[must_use]
    pub fn reachable(&self, id: ClassId, relation: Relation) -> FxHashSet<ClassId> {
        let mut reachable: FxHashSet<ClassId> = self.info(id).related(relation).collect();
        let mut queue: VecDeque<ClassId> = reachable.iter().copied().collect();
        while let Some(head) = queue.pop_front() {
            for next in self.info(head).related(relation) {
                if reachable.insert(next) {
                    queue.push_back(next);
                }
            }
        }
        reachable.remove(&id);
        reachable
    }

    /// Select the subset of `class_ids` in any of `categories` (an empty list selects
    /// all categories). When `include_externals` is false, only scanned classes are
    /// retained.
    ///
    /// Runs a check pass first and returns the input set unchanged when nothing is
    /// filtered out.
    #[must_use]
    pub fn filter_classes(
        &self,
        class_ids: FxHashSet<ClassId>,
        include_externals: bool,
        categories: &[ClassCategory],
    ) -> FxHashSet<ClassId> {
        let retained = |id: &ClassId| {
            let info = self.info(*id);
            (include_externals || info.classfile_scanned)
                && (categories.is_empty()
                    || categories.iter().any(|&category| info.in_category(category)))
        };
        if class_ids.iter().all(retained) {
            return class_ids;
        }
        class_ids.iter().filter(|id| retained(*id)).copied().collect()
    }

    /// The sorted dotted names of a collection of ids.
    #[must_use]
    pub fn class_names(&self, class_ids: impl IntoIterator<Item = ClassId>) -> Vec<String> {
        let mut names: Vec<String> = class_ids
            .into_iter()
            .map(|id| self.info(id).name().to_string())
            .collect();
        names.sort_unstable();
        names
    }

    fn reachable_names(
        &self,
        class_name: &str,
        relation: Relation,
        include_externals: bool,
        categories: &[ClassCategory],
    ) -> Vec<String> {
        match self.id_of(class_name) {
            None => Vec::new(),
            Some(id) => {
                let reachable = self.reachable(id, relation);
                self.class_names(self.filter_classes(reachable, include_externals, categories))
            }
        }
    }

    /// Sorted names of all scanned classes transitively extending `class_name`.
    #[must_use]
    pub fn subclasses_of(&self, class_name: &str) -> Vec<String> {
        self.reachable_names(
            class_name,
            Relation::Subclass,
            false,
            &[ClassCategory::StandardClass],
        )
    }

    /// Sorted names of all scanned classes `class_name` transitively extends.
    #[must_use]
    pub fn superclasses_of(&self, class_name: &str) -> Vec<String> {
        self.reachable_names(
            class_name,
            Relation::Superclass,
            false,
            &[ClassCategory::StandardClass],
        )
    }

    /// Sorted names of all scanned classes (and sub-interfaces) transitively
    /// implementing the interface `class_name`.
    #[must_use]
    pub fn classes_implementing(&self, class_name: &str) -> Vec<String> {
        self.reachable_names(class_name, Relation::ImplementingClass, false, &[])
    }

    /// Sorted names of all interfaces `class_name` implements, directly or through
    /// superinterfaces. Interfaces outside the scanned classpath are included.
    #[must_use]
    pub fn interfaces_implemented_by(&self, class_name: &str) -> Vec<String> {
        self.reachable_names(
            class_name,
            Relation::ImplementedInterface,
            true,
            &[ClassCategory::ImplementedInterface],
        )
    }

    /// Sorted names of the annotations directly present on `class_name`. Annotations
    /// outside the scanned classpath are included.
    #[must_use]
    pub fn annotations_of(&self, class_name: &str) -> Vec<String> {
        match self.id_of(class_name) {
            None => Vec::new(),
            Some(id) => self.class_names(self.related(id, Relation::Annotation).collect::<Vec<_>>()),
        }
    }

    /// Sorted names of all scanned classes transitively annotated (or meta-annotated)
    /// by `class_name`.
    #[must_use]
    pub fn classes_annotated_by(&self, class_name: &str) -> Vec<String> {
        self.reachable_names(class_name, Relation::AnnotatedClass, false, &[])
    }

    /// The captured static final constant of `class_name.field_name`, if the field was
    /// pre-registered for the scan and carried a compile-time constant.
    #[must_use]
    pub fn field_value(&self, class_name: &str, field_name: &str) -> Option<&FieldConstant> {
        self.class(class_name)
            .and_then(|info| info.field_values.get(field_name))
    }
}
