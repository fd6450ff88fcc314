//! Decode and encode contracts for project elements.
//!
//! [`ProjectElement`] turns one raw record into a typed element, all or
//! nothing. [`PlistSerializable`] turns an element back into its ordered
//! record, reading the graph only to derive comments. [`Object`] implements
//! both by dispatching on its variant.

use std::collections::BTreeSet;

use tracing::debug;

use crate::codec::comments::{build_file_comment, file_comment, member_comment};
use crate::codec::record::{RecordReader, RecordWriter};
use crate::error::DecodeError;
use crate::model::{
    BuildFile, BuildPhase, BuildPhaseKind, CommentedString, CopyFilesBuildPhase, FileReference,
    Object, ObjectId, ObjectKind, PlistDict, PlistValue, ProjectObjects, SubFolder, VariantGroup,
};

/// Decode contract: builds a validated element from its raw record.
pub trait ProjectElement: Sized {
    /// Decodes the record of element `reference`.
    ///
    /// Fails when a required key is absent or holds a value that cannot be
    /// read as its expected type. Never produces a partial element.
    fn decode(reference: ObjectId, record: &PlistDict) -> Result<Self, DecodeError>;
}

/// Encode contract: produces the object-table entry for an element.
pub trait PlistSerializable {
    /// Returns the commented object-table key and the ordered record.
    ///
    /// `objects` is only read, to derive comments for references.
    fn plist_key_and_value(&self, objects: &ProjectObjects) -> (CommentedString, PlistValue);
}

/// Encodes a set of member build files with their derived comments.
fn member_list(objects: &ProjectObjects, files: &BTreeSet<ObjectId>, phase_name: &str) -> Vec<PlistValue> {
    files
        .iter()
        .map(|file| PlistValue::commented(file.as_str(), member_comment(objects, file, phase_name)))
        .collect()
}

// =============================================================================
// PBXCopyFilesBuildPhase
// =============================================================================

impl ProjectElement for CopyFilesBuildPhase {
    fn decode(reference: ObjectId, record: &PlistDict) -> Result<Self, DecodeError> {
        let reader = RecordReader::new(ObjectKind::CopyFilesBuildPhase, reference, record);

        let dst_path = reader.required_str("dstPath")?.to_string();
        let build_action_mask = reader.required_uint("buildActionMask")?;
        let code = reader.required_uint("dstSubfolderSpec")?;
        let dst_subfolder_spec = SubFolder::from_code(code);
        if dst_subfolder_spec.is_other() {
            debug!(%reference, code, "unrecognized dstSubfolderSpec, keeping raw code");
        }
        let files = reader.required_id_list("files")?.into_iter().collect();
        let run_only_for_deployment_postprocessing =
            reader.required_uint("runOnlyForDeploymentPostprocessing")?;

        Ok(CopyFilesBuildPhase {
            reference,
            dst_path,
            build_action_mask,
            dst_subfolder_spec,
            files,
            run_only_for_deployment_postprocessing,
        })
    }
}

impl PlistSerializable for CopyFilesBuildPhase {
    fn plist_key_and_value(&self, objects: &ProjectObjects) -> (CommentedString, PlistValue) {
        let mut writer = RecordWriter::new(ObjectKind::CopyFilesBuildPhase);
        writer.write_uint("buildActionMask", self.build_action_mask);
        writer.write_str("dstPath", &self.dst_path);
        writer.write_uint("dstSubfolderSpec", self.dst_subfolder_spec.code());
        writer.write_array("files", member_list(objects, &self.files, self.name()));
        writer.write_uint(
            "runOnlyForDeploymentPostprocessing",
            self.run_only_for_deployment_postprocessing,
        );
        writer.finish_entry(CommentedString::with_comment(self.reference.as_str(), self.name()))
    }
}

// =============================================================================
// Sources / Resources / Frameworks / Headers
// =============================================================================

impl ProjectElement for BuildPhase {
    /// The phase kind comes from the record's `isa`.
    fn decode(reference: ObjectId, record: &PlistDict) -> Result<Self, DecodeError> {
        let isa = record
            .get("isa")
            .and_then(PlistValue::as_str)
            .ok_or(DecodeError::MissingIsa { reference })?;
        let kind = ObjectKind::from_isa(isa)
            .and_then(BuildPhaseKind::from_object_kind)
            .ok_or_else(|| DecodeError::UnknownIsa {
                reference,
                isa: isa.to_string(),
            })?;
        let reader = RecordReader::new(kind.object_kind(), reference, record);

        Ok(BuildPhase {
            reference,
            kind,
            build_action_mask: reader.required_uint("buildActionMask")?,
            files: reader.required_id_list("files")?.into_iter().collect(),
            run_only_for_deployment_postprocessing: reader
                .required_uint("runOnlyForDeploymentPostprocessing")?,
        })
    }
}

impl PlistSerializable for BuildPhase {
    fn plist_key_and_value(&self, objects: &ProjectObjects) -> (CommentedString, PlistValue) {
        let mut writer = RecordWriter::new(self.kind.object_kind());
        writer.write_uint("buildActionMask", self.build_action_mask);
        writer.write_array("files", member_list(objects, &self.files, self.kind.name()));
        writer.write_uint(
            "runOnlyForDeploymentPostprocessing",
            self.run_only_for_deployment_postprocessing,
        );
        writer.finish_entry(CommentedString::with_comment(self.reference.as_str(), self.kind.name()))
    }
}

// =============================================================================
// PBXBuildFile
// =============================================================================

impl ProjectElement for BuildFile {
    fn decode(reference: ObjectId, record: &PlistDict) -> Result<Self, DecodeError> {
        let reader = RecordReader::new(ObjectKind::BuildFile, reference, record);
        Ok(BuildFile {
            reference,
            file_ref: reader.optional_id("fileRef")?,
            settings: reader.optional_dict("settings")?.cloned(),
        })
    }
}

impl PlistSerializable for BuildFile {
    fn plist_key_and_value(&self, objects: &ProjectObjects) -> (CommentedString, PlistValue) {
        let mut writer = RecordWriter::new(ObjectKind::BuildFile);
        if let Some(file_ref) = self.file_ref {
            writer.write_reference("fileRef", file_ref, file_comment(objects, &file_ref));
        }
        if let Some(settings) = &self.settings {
            writer.write_dict("settings", settings.clone());
        }
        let comment = build_file_comment(objects, &self.reference);
        writer.finish_entry(CommentedString::with_optional_comment(self.reference.as_str(), comment))
    }
}

// =============================================================================
// PBXFileReference
// =============================================================================

impl ProjectElement for FileReference {
    fn decode(reference: ObjectId, record: &PlistDict) -> Result<Self, DecodeError> {
        let reader = RecordReader::new(ObjectKind::FileReference, reference, record);
        Ok(FileReference {
            reference,
            file_encoding: reader.optional_uint("fileEncoding")?,
            explicit_file_type: reader.optional_string("explicitFileType")?,
            include_in_index: reader.optional_uint("includeInIndex")?,
            last_known_file_type: reader.optional_string("lastKnownFileType")?,
            name: reader.optional_string("name")?,
            path: reader.optional_string("path")?,
            source_tree: reader.optional_string("sourceTree")?,
        })
    }
}

impl PlistSerializable for FileReference {
    fn plist_key_and_value(&self, _objects: &ProjectObjects) -> (CommentedString, PlistValue) {
        let mut writer = RecordWriter::new(ObjectKind::FileReference);
        writer.write_opt_uint("fileEncoding", self.file_encoding);
        writer.write_opt_str("explicitFileType", self.explicit_file_type.as_deref());
        writer.write_opt_uint("includeInIndex", self.include_in_index);
        writer.write_opt_str("lastKnownFileType", self.last_known_file_type.as_deref());
        writer.write_opt_str("name", self.name.as_deref());
        writer.write_opt_str("path", self.path.as_deref());
        writer.write_opt_str("sourceTree", self.source_tree.as_deref());
        let comment = self.display_name().map(str::to_string);
        writer.finish_entry(CommentedString::with_optional_comment(self.reference.as_str(), comment))
    }
}

// =============================================================================
// PBXVariantGroup
// =============================================================================

impl ProjectElement for VariantGroup {
    fn decode(reference: ObjectId, record: &PlistDict) -> Result<Self, DecodeError> {
        let reader = RecordReader::new(ObjectKind::VariantGroup, reference, record);
        let mut children = Vec::new();
        for child in reader.required_id_list("children")? {
            if !children.contains(&child) {
                children.push(child);
            }
        }
        Ok(VariantGroup {
            reference,
            children,
            name: reader.optional_string("name")?,
            path: reader.optional_string("path")?,
            source_tree: reader.optional_string("sourceTree")?,
        })
    }
}

impl PlistSerializable for VariantGroup {
    fn plist_key_and_value(&self, objects: &ProjectObjects) -> (CommentedString, PlistValue) {
        let mut writer = RecordWriter::new(ObjectKind::VariantGroup);
        let children = self
            .children
            .iter()
            .map(|child| PlistValue::commented(child.as_str(), file_comment(objects, child)))
            .collect();
        writer.write_array("children", children);
        writer.write_opt_str("name", self.name.as_deref());
        writer.write_opt_str("path", self.path.as_deref());
        writer.write_opt_str("sourceTree", self.source_tree.as_deref());
        let comment = self.display_name().map(str::to_string);
        writer.finish_entry(CommentedString::with_optional_comment(self.reference.as_str(), comment))
    }
}

// =============================================================================
// Object dispatch
// =============================================================================

impl ProjectElement for Object {
    /// Dispatches on the record's `isa`.
    fn decode(reference: ObjectId, record: &PlistDict) -> Result<Self, DecodeError> {
        let isa = record
            .get("isa")
            .and_then(PlistValue::as_str)
            .ok_or(DecodeError::MissingIsa { reference })?;
        let kind = ObjectKind::from_isa(isa).ok_or_else(|| DecodeError::UnknownIsa {
            reference,
            isa: isa.to_string(),
        })?;

        match kind {
            ObjectKind::BuildFile => BuildFile::decode(reference, record).map(Object::BuildFile),
            ObjectKind::FileReference => {
                FileReference::decode(reference, record).map(Object::FileReference)
            }
            ObjectKind::VariantGroup => {
                VariantGroup::decode(reference, record).map(Object::VariantGroup)
            }
            ObjectKind::CopyFilesBuildPhase => {
                CopyFilesBuildPhase::decode(reference, record).map(Object::CopyFilesBuildPhase)
            }
            ObjectKind::FrameworksBuildPhase
            | ObjectKind::HeadersBuildPhase
            | ObjectKind::ResourcesBuildPhase
            | ObjectKind::SourcesBuildPhase => {
                BuildPhase::decode(reference, record).map(Object::BuildPhase)
            }
        }
    }
}

impl PlistSerializable for Object {
    fn plist_key_and_value(&self, objects: &ProjectObjects) -> (CommentedString, PlistValue) {
        match self {
            Object::BuildFile(o) => o.plist_key_and_value(objects),
            Object::FileReference(o) => o.plist_key_and_value(objects),
            Object::VariantGroup(o) => o.plist_key_and_value(objects),
            Object::CopyFilesBuildPhase(o) => o.plist_key_and_value(objects),
            Object::BuildPhase(o) => o.plist_key_and_value(objects),
        }
    }
}
