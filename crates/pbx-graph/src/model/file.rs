//! File-like elements: build files, file references and variant groups.

use std::hash::{Hash, Hasher};

use crate::model::{ObjectId, PlistDict};

/// A `PBXBuildFile`: the membership record linking a file into a build phase.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct BuildFile {
    pub reference: ObjectId,
    /// The file reference or variant group being built.
    pub file_ref: Option<ObjectId>,
    /// Per-file build settings (e.g. `ATTRIBUTES`), kept verbatim.
    pub settings: Option<PlistDict>,
}

impl BuildFile {
    /// Creates a build file pointing at `file_ref`.
    pub fn new(reference: ObjectId, file_ref: ObjectId) -> Self {
        Self {
            reference,
            file_ref: Some(file_ref),
            settings: None,
        }
    }

    /// Sets the per-file settings.
    pub fn with_settings(mut self, settings: PlistDict) -> Self {
        self.settings = Some(settings);
        self
    }
}

impl Hash for BuildFile {
    fn hash<H: Hasher>(&self, state: &mut H) {
        self.reference.hash(state);
    }
}

/// A `PBXFileReference`.
#[derive(Debug, Clone, PartialEq, Eq, Default)]
pub struct FileReference {
    pub reference: ObjectId,
    pub file_encoding: Option<u64>,
    pub explicit_file_type: Option<String>,
    pub include_in_index: Option<u64>,
    pub last_known_file_type: Option<String>,
    pub name: Option<String>,
    pub path: Option<String>,
    pub source_tree: Option<String>,
}

impl FileReference {
    /// Creates a group-relative reference to `path`.
    pub fn new(reference: ObjectId, path: impl Into<String>) -> Self {
        Self {
            reference,
            path: Some(path.into()),
            source_tree: Some("<group>".to_string()),
            ..Self::default()
        }
    }

    /// Sets the display name.
    pub fn with_name(mut self, name: impl Into<String>) -> Self {
        self.name = Some(name.into());
        self
    }

    /// Sets the last known file type (e.g. `image.png`).
    pub fn with_last_known_file_type(mut self, file_type: impl Into<String>) -> Self {
        self.last_known_file_type = Some(file_type.into());
        self
    }

    /// Name shown in comments: the explicit name, else the path.
    pub fn display_name(&self) -> Option<&str> {
        self.name.as_deref().or(self.path.as_deref())
    }
}

impl Hash for FileReference {
    fn hash<H: Hasher>(&self, state: &mut H) {
        self.reference.hash(state);
    }
}

/// A `PBXVariantGroup`: localized variants of one logical file.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct VariantGroup {
    pub reference: ObjectId,
    /// Variant file references, in display order.
    pub children: Vec<ObjectId>,
    pub name: Option<String>,
    pub path: Option<String>,
    pub source_tree: Option<String>,
}

impl VariantGroup {
    /// Creates an empty group-relative variant group.
    pub fn new(reference: ObjectId, name: impl Into<String>) -> Self {
        Self {
            reference,
            children: Vec::new(),
            name: Some(name.into()),
            path: None,
            source_tree: Some("<group>".to_string()),
        }
    }

    /// Returns a copy with `child` appended, unless already present.
    pub fn adding_child(&self, child: ObjectId) -> Self {
        let mut next = self.clone();
        if !next.children.contains(&child) {
            next.children.push(child);
        }
        next
    }

    /// Returns a copy without `child`.
    pub fn removing_child(&self, child: ObjectId) -> Self {
        let mut next = self.clone();
        next.children.retain(|c| *c != child);
        next
    }

    /// Name shown in comments: the explicit name, else the path.
    pub fn display_name(&self) -> Option<&str> {
        self.name.as_deref().or(self.path.as_deref())
    }
}

impl Hash for VariantGroup {
    fn hash<H: Hasher>(&self, state: &mut H) {
        self.reference.hash(state);
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn id(n: u8) -> ObjectId {
        ObjectId::from_bytes([n; 12])
    }

    #[test]
    fn test_display_name_prefers_name() {
        let file = FileReference::new(id(1), "Assets/icon.png");
        assert_eq!(file.display_name(), Some("Assets/icon.png"));

        let named = file.with_name("icon.png");
        assert_eq!(named.display_name(), Some("icon.png"));

        let bare = FileReference {
            reference: id(2),
            ..FileReference::default()
        };
        assert_eq!(bare.display_name(), None);
    }

    #[test]
    fn test_variant_group_children() {
        let group = VariantGroup::new(id(1), "Localizable.strings");
        let updated = group.adding_child(id(2)).adding_child(id(3)).adding_child(id(2));
        assert_eq!(updated.children, vec![id(2), id(3)]);

        let removed = updated.removing_child(id(2));
        assert_eq!(removed.children, vec![id(3)]);
        assert_eq!(group.removing_child(id(9)), group);
    }
}
