//! Build phase elements.
//!
//! Every build phase carries a build action mask, a set of member build
//! files and a deployment-postprocessing flag. Copy-files phases add a
//! destination path and a destination kind.

use std::collections::BTreeSet;
use std::hash::{Hash, Hasher};

use crate::model::{ObjectId, ObjectKind};

/// Build action mask meaning "apply in all configurations".
pub const DEFAULT_BUILD_ACTION_MASK: u64 = 2147483647;

/// Destination of a copy-files phase (`dstSubfolderSpec`).
///
/// The on-disk format is maintained independently of this crate, so codes
/// outside the known set are kept verbatim in [`SubFolder::Other`] instead of
/// failing the decode.
///
/// Equality and hashing go by [`code`](SubFolder::code), so `Other(7)` equals
/// `Resources`.
#[derive(Debug, Clone, Copy)]
pub enum SubFolder {
    AbsolutePath,
    Wrapper,
    Executables,
    Resources,
    Frameworks,
    SharedFrameworks,
    SharedSupport,
    Plugins,
    JavaResources,
    ProductsDirectory,
    /// Unrecognized code, preserved for lossless re-encoding.
    Other(u64),
}

impl SubFolder {
    /// Every named destination, in code order.
    pub const KNOWN: [SubFolder; 10] = [
        SubFolder::AbsolutePath,
        SubFolder::Wrapper,
        SubFolder::Executables,
        SubFolder::Resources,
        SubFolder::Frameworks,
        SubFolder::SharedFrameworks,
        SubFolder::SharedSupport,
        SubFolder::Plugins,
        SubFolder::JavaResources,
        SubFolder::ProductsDirectory,
    ];

    /// Maps a wire code to its destination. Never fails.
    pub fn from_code(code: u64) -> SubFolder {
        match code {
            0 => SubFolder::AbsolutePath,
            1 => SubFolder::Wrapper,
            6 => SubFolder::Executables,
            7 => SubFolder::Resources,
            10 => SubFolder::Frameworks,
            11 => SubFolder::SharedFrameworks,
            12 => SubFolder::SharedSupport,
            13 => SubFolder::Plugins,
            15 => SubFolder::JavaResources,
            16 => SubFolder::ProductsDirectory,
            other => SubFolder::Other(other),
        }
    }

    /// Returns the wire code.
    pub fn code(self) -> u64 {
        match self {
            SubFolder::AbsolutePath => 0,
            SubFolder::Wrapper => 1,
            SubFolder::Executables => 6,
            SubFolder::Resources => 7,
            SubFolder::Frameworks => 10,
            SubFolder::SharedFrameworks => 11,
            SubFolder::SharedSupport => 12,
            SubFolder::Plugins => 13,
            SubFolder::JavaResources => 15,
            SubFolder::ProductsDirectory => 16,
            SubFolder::Other(code) => code,
        }
    }

    /// Returns the named destination when the code has one.
    pub fn normalized(self) -> SubFolder {
        SubFolder::from_code(self.code())
    }

    /// Returns true for codes outside the known set.
    pub fn is_other(self) -> bool {
        matches!(self.normalized(), SubFolder::Other(_))
    }
}

impl PartialEq for SubFolder {
    fn eq(&self, other: &Self) -> bool {
        self.code() == other.code()
    }
}

impl Eq for SubFolder {}

impl Hash for SubFolder {
    fn hash<H: Hasher>(&self, state: &mut H) {
        self.code().hash(state);
    }
}

/// A `PBXCopyFilesBuildPhase`.
///
/// Equality compares every field; hashing uses `reference` only, so two
/// values that hash alike may still differ.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct CopyFilesBuildPhase {
    /// Own identifier.
    pub reference: ObjectId,
    /// Destination path, unquoted.
    pub dst_path: String,
    pub build_action_mask: u64,
    pub dst_subfolder_spec: SubFolder,
    /// Member build files.
    pub files: BTreeSet<ObjectId>,
    pub run_only_for_deployment_postprocessing: u64,
}

impl CopyFilesBuildPhase {
    /// Creates a phase with the default mask, no files and the flag cleared.
    pub fn new(reference: ObjectId, dst_path: impl Into<String>, dst_subfolder_spec: SubFolder) -> Self {
        Self {
            reference,
            dst_path: dst_path.into(),
            build_action_mask: DEFAULT_BUILD_ACTION_MASK,
            dst_subfolder_spec: dst_subfolder_spec.normalized(),
            files: BTreeSet::new(),
            run_only_for_deployment_postprocessing: 0,
        }
    }

    /// Sets the build action mask.
    pub fn with_build_action_mask(mut self, mask: u64) -> Self {
        self.build_action_mask = mask;
        self
    }

    /// Sets the member files.
    pub fn with_files(mut self, files: impl IntoIterator<Item = ObjectId>) -> Self {
        self.files = files.into_iter().collect();
        self
    }

    /// Sets the deployment-postprocessing flag.
    pub fn with_run_only_for_deployment_postprocessing(mut self, flag: bool) -> Self {
        self.run_only_for_deployment_postprocessing = flag as u64;
        self
    }

    /// Returns a copy with `file` added to the member set.
    pub fn adding_member(&self, file: ObjectId) -> Self {
        let mut next = self.clone();
        next.files.insert(file);
        next
    }

    /// Returns a copy with `file` removed from the member set.
    pub fn removing_member(&self, file: ObjectId) -> Self {
        let mut next = self.clone();
        next.files.remove(&file);
        next
    }

    /// Role name used in comments.
    pub fn name(&self) -> &'static str {
        "CopyFiles"
    }
}

impl Hash for CopyFilesBuildPhase {
    fn hash<H: Hasher>(&self, state: &mut H) {
        self.reference.hash(state);
    }
}

/// The build phases that carry no configuration beyond their member files.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum BuildPhaseKind {
    Sources,
    Resources,
    Frameworks,
    Headers,
}

impl BuildPhaseKind {
    /// Role name used in comments.
    pub fn name(self) -> &'static str {
        match self {
            BuildPhaseKind::Sources => "Sources",
            BuildPhaseKind::Resources => "Resources",
            BuildPhaseKind::Frameworks => "Frameworks",
            BuildPhaseKind::Headers => "Headers",
        }
    }

    /// The object kind a phase of this kind is stored under.
    pub fn object_kind(self) -> ObjectKind {
        match self {
            BuildPhaseKind::Sources => ObjectKind::SourcesBuildPhase,
            BuildPhaseKind::Resources => ObjectKind::ResourcesBuildPhase,
            BuildPhaseKind::Frameworks => ObjectKind::FrameworksBuildPhase,
            BuildPhaseKind::Headers => ObjectKind::HeadersBuildPhase,
        }
    }

    /// Inverse of [`BuildPhaseKind::object_kind`].
    pub fn from_object_kind(kind: ObjectKind) -> Option<BuildPhaseKind> {
        match kind {
            ObjectKind::SourcesBuildPhase => Some(BuildPhaseKind::Sources),
            ObjectKind::ResourcesBuildPhase => Some(BuildPhaseKind::Resources),
            ObjectKind::FrameworksBuildPhase => Some(BuildPhaseKind::Frameworks),
            ObjectKind::HeadersBuildPhase => Some(BuildPhaseKind::Headers),
            _ => None,
        }
    }
}

/// A sources, resources, frameworks or headers build phase.
///
/// Same equality/hash split as [`CopyFilesBuildPhase`].
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct BuildPhase {
    pub reference: ObjectId,
    pub kind: BuildPhaseKind,
    pub build_action_mask: u64,
    pub files: BTreeSet<ObjectId>,
    pub run_only_for_deployment_postprocessing: u64,
}

impl BuildPhase {
    /// Creates an empty phase with default settings.
    pub fn new(reference: ObjectId, kind: BuildPhaseKind) -> Self {
        Self {
            reference,
            kind,
            build_action_mask: DEFAULT_BUILD_ACTION_MASK,
            files: BTreeSet::new(),
            run_only_for_deployment_postprocessing: 0,
        }
    }

    /// Sets the member files.
    pub fn with_files(mut self, files: impl IntoIterator<Item = ObjectId>) -> Self {
        self.files = files.into_iter().collect();
        self
    }

    /// Returns a copy with `file` added to the member set.
    pub fn adding_member(&self, file: ObjectId) -> Self {
        let mut next = self.clone();
        next.files.insert(file);
        next
    }

    /// Returns a copy with `file` removed from the member set.
    pub fn removing_member(&self, file: ObjectId) -> Self {
        let mut next = self.clone();
        next.files.remove(&file);
        next
    }
}

impl Hash for BuildPhase {
    fn hash<H: Hasher>(&self, state: &mut H) {
        self.reference.hash(state);
    }
}

#[cfg(test)]
mod tests {
    use std::collections::hash_map::DefaultHasher;

    use proptest::prelude::*;

    use super::*;

    fn id(n: u8) -> ObjectId {
        ObjectId::from_bytes([n; 12])
    }

    fn hash_of<T: Hash>(value: &T) -> u64 {
        let mut hasher = DefaultHasher::new();
        value.hash(&mut hasher);
        hasher.finish()
    }

    #[test]
    fn test_sub_folder_codes() {
        for known in SubFolder::KNOWN {
            assert_eq!(SubFolder::from_code(known.code()), known);
            assert!(!known.is_other());
        }
        assert_eq!(SubFolder::from_code(0), SubFolder::AbsolutePath);
        assert_eq!(SubFolder::from_code(16), SubFolder::ProductsDirectory);
    }

    #[test]
    fn test_unknown_code_is_preserved() {
        let folder = SubFolder::from_code(99);
        assert_eq!(folder, SubFolder::Other(99));
        assert_eq!(folder.code(), 99);
        assert!(folder.is_other());
    }

    #[test]
    fn test_sub_folder_compares_by_code() {
        assert_eq!(SubFolder::Other(7), SubFolder::Resources);
        assert_eq!(hash_of(&SubFolder::Other(7)), hash_of(&SubFolder::Resources));
        assert!(!SubFolder::Other(7).is_other());
        assert_ne!(SubFolder::Other(8), SubFolder::Resources);

        let phase = CopyFilesBuildPhase::new(id(1), "", SubFolder::Other(16));
        assert!(matches!(phase.dst_subfolder_spec, SubFolder::ProductsDirectory));
    }

    #[test]
    fn test_new_defaults() {
        let phase = CopyFilesBuildPhase::new(id(1), "/usr/share", SubFolder::AbsolutePath);
        assert_eq!(phase.build_action_mask, DEFAULT_BUILD_ACTION_MASK);
        assert_eq!(phase.run_only_for_deployment_postprocessing, 0);
        assert!(phase.files.is_empty());
    }

    #[test]
    fn test_add_twice_remove_once() {
        let phase = CopyFilesBuildPhase::new(id(1), "", SubFolder::Frameworks);
        let updated = phase.adding_member(id(2)).adding_member(id(2)).removing_member(id(2));
        assert_eq!(updated, phase);
    }

    #[test]
    fn test_updates_do_not_touch_receiver() {
        let phase = CopyFilesBuildPhase::new(id(1), "", SubFolder::Frameworks);
        let added = phase.adding_member(id(2));
        assert!(phase.files.is_empty());
        assert_eq!(added.files.len(), 1);
        assert_eq!(added.dst_subfolder_spec, phase.dst_subfolder_spec);
    }

    #[test]
    fn test_hash_by_reference_eq_by_fields() {
        let a = CopyFilesBuildPhase::new(id(1), "a", SubFolder::Wrapper);
        let b = CopyFilesBuildPhase::new(id(1), "b", SubFolder::Wrapper);
        assert_ne!(a, b);
        assert_eq!(hash_of(&a), hash_of(&b));

        let c = BuildPhase::new(id(3), BuildPhaseKind::Sources);
        let d = c.adding_member(id(4));
        assert_ne!(c, d);
        assert_eq!(hash_of(&c), hash_of(&d));
    }

    #[test]
    fn test_build_phase_kind_mapping() {
        for kind in [
            BuildPhaseKind::Sources,
            BuildPhaseKind::Resources,
            BuildPhaseKind::Frameworks,
            BuildPhaseKind::Headers,
        ] {
            assert_eq!(BuildPhaseKind::from_object_kind(kind.object_kind()), Some(kind));
        }
        assert_eq!(BuildPhaseKind::from_object_kind(ObjectKind::BuildFile), None);
    }

    proptest! {
        #[test]
        fn prop_add_then_remove_restores(files in prop::collection::btree_set(any::<[u8; 12]>(), 0..8), extra in any::<[u8; 12]>()) {
            let files: BTreeSet<ObjectId> = files.into_iter().map(ObjectId::from_bytes).collect();
            let extra = ObjectId::from_bytes(extra);
            prop_assume!(!files.contains(&extra));

            let phase = CopyFilesBuildPhase::new(id(0), "dst", SubFolder::Resources).with_files(files);
            prop_assert_eq!(phase.adding_member(extra).removing_member(extra), phase);
        }

        #[test]
        fn prop_remove_then_add_restores(files in prop::collection::btree_set(any::<[u8; 12]>(), 1..8)) {
            let files: Vec<ObjectId> = files.into_iter().map(ObjectId::from_bytes).collect();
            let member = files[0];

            let phase = CopyFilesBuildPhase::new(id(0), "dst", SubFolder::Resources).with_files(files);
            prop_assert_eq!(phase.removing_member(member).adding_member(member), phase);
        }

        #[test]
        fn prop_duplicate_add_is_noop(bytes in any::<[u8; 12]>()) {
            let member = ObjectId::from_bytes(bytes);
            let phase = BuildPhase::new(id(0), BuildPhaseKind::Headers);
            let once = phase.adding_member(member);
            prop_assert_eq!(once.adding_member(member), once);
        }

        #[test]
        fn prop_other_matches_from_code(code in any::<u64>()) {
            prop_assert_eq!(SubFolder::Other(code), SubFolder::from_code(code));
            prop_assert_eq!(SubFolder::Other(code).normalized().code(), code);
        }

        #[test]
        fn prop_unknown_codes_fall_back(code in any::<u64>()) {
            let folder = SubFolder::from_code(code);
            prop_assert_eq!(folder.code(), code);
            let known = [0u64, 1, 6, 7, 10, 11, 12, 13, 15, 16].contains(&code);
            prop_assert_eq!(folder.is_other(), !known);
        }
    }
}
