//! The graph container holding every decoded element.
//!
//! Elements are partitioned by kind; each partition keeps insertion order and
//! an identifier index. The same identifier may appear in more than one
//! partition (the format allows it even though well-formed files avoid it),
//! so partitions are never merged.

use rustc_hash::FxHashMap;

use crate::model::{
    BuildFile, BuildPhase, CopyFilesBuildPhase, FileReference, Object, ObjectId, ObjectKind,
    VariantGroup,
};

/// One kind's elements, in insertion order, indexed by identifier.
#[derive(Debug, Clone, Default)]
struct Partition {
    order: Vec<ObjectId>,
    items: FxHashMap<ObjectId, Object>,
}

// Insertion order is not part of a partition's identity.
impl PartialEq for Partition {
    fn eq(&self, other: &Self) -> bool {
        self.items == other.items
    }
}

impl Partition {
    fn insert(&mut self, object: Object) -> Option<Object> {
        let id = object.reference();
        let previous = self.items.insert(id, object);
        if previous.is_none() {
            self.order.push(id);
        }
        previous
    }

    fn remove(&mut self, id: &ObjectId) -> Option<Object> {
        let removed = self.items.remove(id)?;
        self.order.retain(|o| o != id);
        Some(removed)
    }

    fn iter(&self) -> impl Iterator<Item = &Object> {
        self.order.iter().filter_map(|id| self.items.get(id))
    }
}

/// All elements of one project graph.
///
/// Elements are values: to change one, build its replacement with an update
/// operation and [`insert`](ProjectObjects::insert) it over the old one.
/// Two containers are equal when they hold the same elements, regardless of
/// insertion order.
#[derive(Debug, Clone, Default, PartialEq)]
pub struct ProjectObjects {
    partitions: [Partition; ObjectKind::ALL.len()],
}

impl ProjectObjects {
    /// Creates an empty container.
    pub fn new() -> Self {
        Self::default()
    }

    /// Inserts an element, replacing the one with the same identifier and
    /// kind. Replacement keeps the original insertion position.
    pub fn insert(&mut self, object: impl Into<Object>) -> Option<Object> {
        let object = object.into();
        self.partitions[object.kind().index()].insert(object)
    }

    /// Removes an element of the given kind.
    pub fn remove(&mut self, kind: ObjectKind, id: &ObjectId) -> Option<Object> {
        self.partitions[kind.index()].remove(id)
    }

    /// Looks up an element by identifier, searching kinds in section order.
    pub fn get(&self, id: &ObjectId) -> Option<&Object> {
        self.partitions.iter().find_map(|p| p.items.get(id))
    }

    /// Looks up an element of a specific kind.
    pub fn get_of_kind(&self, kind: ObjectKind, id: &ObjectId) -> Option<&Object> {
        self.partitions[kind.index()].items.get(id)
    }

    /// Returns every kind under which `id` is stored.
    pub fn kinds_of(&self, id: &ObjectId) -> Vec<ObjectKind> {
        ObjectKind::ALL
            .into_iter()
            .filter(|kind| self.partitions[kind.index()].items.contains_key(id))
            .collect()
    }

    /// Returns true if any partition holds `id`.
    pub fn contains(&self, id: &ObjectId) -> bool {
        self.partitions.iter().any(|p| p.items.contains_key(id))
    }

    /// Returns the first element matching `predicate`, in iteration order.
    pub fn find<P>(&self, mut predicate: P) -> Option<&Object>
    where
        P: FnMut(&Object) -> bool,
    {
        self.iter().find(|o| predicate(*o))
    }

    /// Iterates every element: kinds in section order, then insertion order.
    pub fn iter(&self) -> impl Iterator<Item = &Object> {
        self.partitions.iter().flat_map(|p| p.iter())
    }

    /// Iterates the elements of one kind in insertion order.
    pub fn iter_kind(&self, kind: ObjectKind) -> impl Iterator<Item = &Object> {
        self.partitions[kind.index()].iter()
    }

    /// Iterates every build phase of any kind.
    pub fn build_phases(&self) -> impl Iterator<Item = &Object> {
        self.iter().filter(|o| o.kind().is_build_phase())
    }

    /// Total number of elements.
    pub fn len(&self) -> usize {
        self.partitions.iter().map(|p| p.items.len()).sum()
    }

    /// Returns true if there are no elements.
    pub fn is_empty(&self) -> bool {
        self.partitions.iter().all(|p| p.items.is_empty())
    }

    // =========================================================================
    // Typed accessors
    // =========================================================================

    /// Looks up a build file.
    pub fn build_file(&self, id: &ObjectId) -> Option<&BuildFile> {
        match self.get_of_kind(ObjectKind::BuildFile, id)? {
            Object::BuildFile(o) => Some(o),
            _ => None,
        }
    }

    /// Looks up a file reference.
    pub fn file_reference(&self, id: &ObjectId) -> Option<&FileReference> {
        match self.get_of_kind(ObjectKind::FileReference, id)? {
            Object::FileReference(o) => Some(o),
            _ => None,
        }
    }

    /// Looks up a variant group.
    pub fn variant_group(&self, id: &ObjectId) -> Option<&VariantGroup> {
        match self.get_of_kind(ObjectKind::VariantGroup, id)? {
            Object::VariantGroup(o) => Some(o),
            _ => None,
        }
    }

    /// Looks up a copy-files build phase.
    pub fn copy_files_build_phase(&self, id: &ObjectId) -> Option<&CopyFilesBuildPhase> {
        match self.get_of_kind(ObjectKind::CopyFilesBuildPhase, id)? {
            Object::CopyFilesBuildPhase(o) => Some(o),
            _ => None,
        }
    }

    /// Looks up a sources, resources, frameworks or headers phase.
    pub fn build_phase(&self, id: &ObjectId) -> Option<&BuildPhase> {
        [
            ObjectKind::FrameworksBuildPhase,
            ObjectKind::HeadersBuildPhase,
            ObjectKind::ResourcesBuildPhase,
            ObjectKind::SourcesBuildPhase,
        ]
        .into_iter()
        .find_map(|kind| match self.get_of_kind(kind, id) {
            Some(Object::BuildPhase(o)) => Some(o),
            _ => None,
        })
    }

    // =========================================================================
    // Cross-reference lookups
    // =========================================================================

    /// Resolves a file reference or variant group to its display name.
    pub fn file_name(&self, id: &ObjectId) -> Option<&str> {
        if let Some(file) = self.file_reference(id) {
            return file.display_name();
        }
        self.variant_group(id).and_then(VariantGroup::display_name)
    }

    /// Resolves a build file to the display name of the file it builds.
    pub fn build_file_name(&self, build_file: &ObjectId) -> Option<&str> {
        let file_ref = self.build_file(build_file)?.file_ref?;
        self.file_name(&file_ref)
    }

    /// Finds the build phase listing `build_file` among its members.
    pub fn phase_containing(&self, build_file: &ObjectId) -> Option<&Object> {
        self.build_phases()
            .find(|phase| phase.files().is_some_and(|files| files.contains(build_file)))
    }
}

impl FromIterator<Object> for ProjectObjects {
    fn from_iter<I: IntoIterator<Item = Object>>(iter: I) -> Self {
        let mut objects = ProjectObjects::new();
        for object in iter {
            objects.insert(object);
        }
        objects
    }
}
