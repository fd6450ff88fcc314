//! The closed set of element kinds and the tagged union over them.

use std::collections::BTreeSet;
use std::fmt;

use crate::model::{
    BuildFile, BuildPhase, BuildPhaseKind, CopyFilesBuildPhase, FileReference, ObjectId,
    VariantGroup,
};

/// Element kinds, identified on disk by their `isa` tag.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord)]
pub enum ObjectKind {
    BuildFile,
    CopyFilesBuildPhase,
    FileReference,
    FrameworksBuildPhase,
    HeadersBuildPhase,
    ResourcesBuildPhase,
    SourcesBuildPhase,
    VariantGroup,
}

impl ObjectKind {
    /// Every kind, in object-table section order (sorted by `isa`).
    pub const ALL: [ObjectKind; 8] = [
        ObjectKind::BuildFile,
        ObjectKind::CopyFilesBuildPhase,
        ObjectKind::FileReference,
        ObjectKind::FrameworksBuildPhase,
        ObjectKind::HeadersBuildPhase,
        ObjectKind::ResourcesBuildPhase,
        ObjectKind::SourcesBuildPhase,
        ObjectKind::VariantGroup,
    ];

    /// Returns the `isa` tag.
    pub fn isa(self) -> &'static str {
        match self {
            ObjectKind::BuildFile => "PBXBuildFile",
            ObjectKind::CopyFilesBuildPhase => "PBXCopyFilesBuildPhase",
            ObjectKind::FileReference => "PBXFileReference",
            ObjectKind::FrameworksBuildPhase => "PBXFrameworksBuildPhase",
            ObjectKind::HeadersBuildPhase => "PBXHeadersBuildPhase",
            ObjectKind::ResourcesBuildPhase => "PBXResourcesBuildPhase",
            ObjectKind::SourcesBuildPhase => "PBXSourcesBuildPhase",
            ObjectKind::VariantGroup => "PBXVariantGroup",
        }
    }

    /// Looks up a kind by its `isa` tag.
    pub fn from_isa(isa: &str) -> Option<ObjectKind> {
        ObjectKind::ALL.into_iter().find(|kind| kind.isa() == isa)
    }

    /// Position in [`ObjectKind::ALL`].
    pub fn index(self) -> usize {
        self as usize
    }

    /// Returns true for the build phase kinds.
    pub fn is_build_phase(self) -> bool {
        self == ObjectKind::CopyFilesBuildPhase || BuildPhaseKind::from_object_kind(self).is_some()
    }
}

impl fmt::Display for ObjectKind {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.isa())
    }
}

/// One element of the project graph.
#[derive(Debug, Clone, PartialEq, Eq, Hash)]
pub enum Object {
    BuildFile(BuildFile),
    FileReference(FileReference),
    VariantGroup(VariantGroup),
    CopyFilesBuildPhase(CopyFilesBuildPhase),
    BuildPhase(BuildPhase),
}

impl Object {
    /// The element's own identifier.
    pub fn reference(&self) -> ObjectId {
        match self {
            Object::BuildFile(o) => o.reference,
            Object::FileReference(o) => o.reference,
            Object::VariantGroup(o) => o.reference,
            Object::CopyFilesBuildPhase(o) => o.reference,
            Object::BuildPhase(o) => o.reference,
        }
    }

    /// The element's kind.
    pub fn kind(&self) -> ObjectKind {
        match self {
            Object::BuildFile(_) => ObjectKind::BuildFile,
            Object::FileReference(_) => ObjectKind::FileReference,
            Object::VariantGroup(_) => ObjectKind::VariantGroup,
            Object::CopyFilesBuildPhase(_) => ObjectKind::CopyFilesBuildPhase,
            Object::BuildPhase(o) => o.kind.object_kind(),
        }
    }

    /// Member build files, for build phases.
    pub fn files(&self) -> Option<&BTreeSet<ObjectId>> {
        match self {
            Object::CopyFilesBuildPhase(o) => Some(&o.files),
            Object::BuildPhase(o) => Some(&o.files),
            _ => None,
        }
    }

    /// Role name used in member comments, for build phases.
    pub fn phase_name(&self) -> Option<&'static str> {
        match self {
            Object::CopyFilesBuildPhase(o) => Some(o.name()),
            Object::BuildPhase(o) => Some(o.kind.name()),
            _ => None,
        }
    }

    /// Display name, for file references and variant groups.
    pub fn file_name(&self) -> Option<&str> {
        match self {
            Object::FileReference(o) => o.display_name(),
            Object::VariantGroup(o) => o.display_name(),
            _ => None,
        }
    }
}

impl From<BuildFile> for Object {
    fn from(o: BuildFile) -> Self {
        Object::BuildFile(o)
    }
}

impl From<FileReference> for Object {
    fn from(o: FileReference) -> Self {
        Object::FileReference(o)
    }
}

impl From<VariantGroup> for Object {
    fn from(o: VariantGroup) -> Self {
        Object::VariantGroup(o)
    }
}

impl From<CopyFilesBuildPhase> for Object {
    fn from(o: CopyFilesBuildPhase) -> Self {
        Object::CopyFilesBuildPhase(o)
    }
}

impl From<BuildPhase> for Object {
    fn from(o: BuildPhase) -> Self {
        Object::BuildPhase(o)
    }
}
