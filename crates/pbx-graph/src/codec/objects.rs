//! Decoding and encoding of a whole object table.

use tracing::{debug, warn};

use crate::codec::element::{PlistSerializable, ProjectElement};
use crate::error::DecodeError;
use crate::model::{CommentedString, Object, ObjectId, ObjectKind, PlistDict, PlistValue, ProjectObjects};

/// Options for decoding an object table.
#[derive(Debug, Clone, Copy, Default)]
pub struct DecodeOptions {
    /// Stop at the first failing record.
    ///
    /// When disabled (the default), failing records are skipped and returned
    /// in [`Decoded::failures`], so one bad record never sinks the load.
    pub strict: bool,
}

impl DecodeOptions {
    /// Creates default (lenient) decoding options.
    pub fn new() -> Self {
        Self::default()
    }

    /// Creates strict decoding options.
    pub fn strict() -> Self {
        Self { strict: true }
    }
}

/// Result of decoding an object table.
#[derive(Debug, Clone, Default)]
pub struct Decoded {
    pub objects: ProjectObjects,
    /// Records that were skipped, in table order.
    pub failures: Vec<DecodeError>,
}

impl Decoded {
    /// Returns true if every record decoded.
    pub fn is_complete(&self) -> bool {
        self.failures.is_empty()
    }
}

/// Decodes one object-table entry.
pub fn decode_entry(key: &str, value: &PlistValue) -> Result<Object, DecodeError> {
    let reference = ObjectId::parse(key).map_err(|_| DecodeError::InvalidObjectKey {
        value: key.to_string(),
    })?;
    let record = value.as_dictionary().ok_or_else(|| DecodeError::NotADictionary {
        reference: key.to_string(),
    })?;
    Object::decode(reference, record)
}

/// Decodes every record of an object table.
pub fn decode_objects(table: &PlistDict, options: DecodeOptions) -> Result<Decoded, DecodeError> {
    let mut decoded = Decoded::default();

    for (key, value) in table.iter() {
        match decode_entry(&key.value, value) {
            Ok(object) => {
                decoded.objects.insert(object);
            }
            Err(err) if options.strict => return Err(err),
            Err(err) => {
                warn!(key = %key.value, error = %err, "skipping undecodable object");
                decoded.failures.push(err);
            }
        }
    }

    debug!(
        objects = decoded.objects.len(),
        failures = decoded.failures.len(),
        "decoded object table"
    );
    Ok(decoded)
}

/// Decodes the `objects` table of a project root dictionary.
pub fn decode_project_root(root: &PlistValue, options: DecodeOptions) -> Result<Decoded, DecodeError> {
    let table = root
        .as_dictionary()
        .and_then(|dict| dict.get("objects"))
        .and_then(PlistValue::as_dictionary)
        .ok_or(DecodeError::MissingObjectTable)?;
    decode_objects(table, options)
}

/// Encodes one element against the graph.
pub fn encode_object(object: &Object, objects: &ProjectObjects) -> (CommentedString, PlistValue) {
    object.plist_key_and_value(objects)
}

/// Encodes every element into an object table.
///
/// Entries are grouped by kind in section order, identifiers ascending
/// within a kind, so output does not depend on insertion history. An
/// identifier held by two kinds keeps one entry, the later kind's record.
pub fn encode_objects(objects: &ProjectObjects) -> PlistDict {
    let mut table = PlistDict::with_capacity(objects.len());
    for kind in ObjectKind::ALL {
        let mut section: Vec<(CommentedString, PlistValue)> = objects
            .iter_kind(kind)
            .map(|object| object.plist_key_and_value(objects))
            .collect();
        section.sort_by(|a, b| a.0.cmp(&b.0));
        for (key, value) in section {
            if table.get(&key.value).is_some() {
                warn!(
                    reference = %key.value,
                    isa = kind.isa(),
                    "identifier used by more than one kind; later record replaces earlier"
                );
            }
            table.insert(key, value);
        }
    }
    table
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::error::ErrorCode;
    use crate::model::{BuildFile, BuildPhase, BuildPhaseKind, CopyFilesBuildPhase, FileReference, SubFolder};

    fn id(n: u8) -> ObjectId {
        ObjectId::from_bytes([n; 12])
    }

    fn graph() -> ProjectObjects {
        let mut objects = ProjectObjects::new();
        objects.insert(FileReference::new(id(1), "icon.png"));
        objects.insert(BuildFile::new(id(2), id(1)));
        objects.insert(CopyFilesBuildPhase::new(id(3), "Assets", SubFolder::Resources).with_files([id(2)]));
        objects.insert(BuildPhase::new(id(4), BuildPhaseKind::Sources));
        objects
    }

    #[test]
    fn test_table_roundtrip() {
        let objects = graph();
        let table = encode_objects(&objects);
        assert_eq!(table.len(), 4);

        let decoded = decode_objects(&table, DecodeOptions::strict()).unwrap();
        assert!(decoded.is_complete());
        assert_eq!(decoded.objects.len(), 4);
        for object in objects.iter() {
            assert_eq!(decoded.objects.get_of_kind(object.kind(), &object.reference()), Some(object));
        }
    }

    #[test]
    fn test_collision_keeps_later_kind() {
        let mut objects = graph();
        objects.insert(FileReference::new(id(2), "shadow.png"));

        let table = encode_objects(&objects);
        assert_eq!(table.len(), 4);
        let record = table.get(id(2).as_str()).and_then(PlistValue::as_dictionary).unwrap();
        assert_eq!(record.get("isa").and_then(PlistValue::as_str), Some("PBXFileReference"));
        assert_eq!(record.get("path").and_then(PlistValue::as_str), Some("shadow.png"));
    }

    #[test]
    fn test_sections_in_isa_order() {
        let table = encode_objects(&graph());
        let isas: Vec<&str> = table
            .iter()
            .filter_map(|(_, v)| v.as_dictionary()?.get("isa")?.as_str())
            .collect();
        assert_eq!(
            isas,
            ["PBXBuildFile", "PBXCopyFilesBuildPhase", "PBXFileReference", "PBXSourcesBuildPhase"]
        );
    }

    #[test]
    fn test_lenient_collects_failures() {
        let mut table = encode_objects(&graph());

        let mut broken = PlistDict::new();
        broken.insert("isa", PlistValue::string("PBXCopyFilesBuildPhase"));
        table.insert(id(9), PlistValue::Dictionary(broken));

        let mut unknown = PlistDict::new();
        unknown.insert("isa", PlistValue::string("PBXNativeTarget"));
        table.insert(id(10), PlistValue::Dictionary(unknown));

        table.insert("nope", PlistValue::string("x"));

        let decoded = decode_objects(&table, DecodeOptions::new()).unwrap();
        assert_eq!(decoded.objects.len(), 4);
        assert_eq!(decoded.failures.len(), 3);
        assert_eq!(decoded.failures[0].reference(), Some(id(9)));
        assert_eq!(decoded.failures[0].code(), ErrorCode::MissingKey);
        assert_eq!(decoded.failures[1].code(), ErrorCode::UnsupportedIsa);
        assert_eq!(decoded.failures[2].code(), ErrorCode::InvalidIdentifier);
    }

    #[test]
    fn test_strict_stops_at_first_failure() {
        let mut table = encode_objects(&graph());
        table.insert(id(9), PlistValue::Array(vec![]));

        let err = decode_objects(&table, DecodeOptions::strict()).unwrap_err();
        assert!(matches!(err, DecodeError::NotADictionary { .. }));
    }

    #[test]
    fn test_decode_project_root() {
        let mut root = PlistDict::new();
        root.insert("archiveVersion", PlistValue::string("1"));
        root.insert("objects", PlistValue::Dictionary(encode_objects(&graph())));

        let decoded = decode_project_root(&PlistValue::Dictionary(root), DecodeOptions::new()).unwrap();
        assert_eq!(decoded.objects.len(), 4);

        let err = decode_project_root(&PlistValue::string("x"), DecodeOptions::new()).unwrap_err();
        assert_eq!(err, DecodeError::MissingObjectTable);
    }

    #[test]
    fn test_encode_after_replacement_recomputes_comments() {
        let mut objects = graph();
        let phase = objects.copy_files_build_phase(&id(3)).unwrap().removing_member(id(2));
        objects.insert(phase);

        let build_file = Object::BuildFile(objects.build_file(&id(2)).unwrap().clone());
        let (key, _) = encode_object(&build_file, &objects);
        assert_eq!(key.comment.as_deref(), Some("icon.png"));
    }
}
