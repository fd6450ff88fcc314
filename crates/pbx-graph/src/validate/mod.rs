//! Consistency checks over a decoded project graph.
//!
//! Decode only checks each record in isolation. The checks here look across
//! records: every reference must resolve, and a build file belongs to at
//! most one phase. Findings are advisory; nothing in the codec calls this.

use rustc_hash::FxHashMap;

use crate::error::ValidationError;
use crate::model::{Object, ObjectId, ObjectKind, ProjectObjects};

/// Validates cross-references in a project graph.
///
/// Returns every finding, in a stable order: collisions first, then one
/// pass over elements in container order.
pub fn validate_objects(objects: &ProjectObjects) -> Vec<ValidationError> {
    let mut errors = Vec::new();
    check_collisions(objects, &mut errors);

    let mut owners: FxHashMap<ObjectId, usize> = FxHashMap::default();
    for object in objects.iter() {
        match object {
            Object::BuildFile(build_file) => {
                if let Some(file_ref) = build_file.file_ref {
                    if objects.file_reference(&file_ref).is_none()
                        && objects.variant_group(&file_ref).is_none()
                    {
                        errors.push(ValidationError::DanglingFileReference {
                            build_file: build_file.reference,
                            file_ref,
                        });
                    }
                }
            }
            Object::VariantGroup(group) => {
                for child in &group.children {
                    if !objects.contains(child) {
                        errors.push(ValidationError::DanglingChild {
                            group: group.reference,
                            child: *child,
                        });
                    }
                }
            }
            Object::CopyFilesBuildPhase(_) | Object::BuildPhase(_) => {
                let phase = object.reference();
                for member in object.files().into_iter().flatten() {
                    if objects.build_file(member).is_none() {
                        errors.push(ValidationError::DanglingBuildFile {
                            phase,
                            build_file: *member,
                        });
                    }
                    *owners.entry(*member).or_default() += 1;
                }
            }
            Object::FileReference(_) => {}
        }
    }

    let mut shared: Vec<ObjectId> = owners
        .into_iter()
        .filter(|(_, count)| *count > 1)
        .map(|(id, _)| id)
        .collect();
    shared.sort();
    errors.extend(
        shared
            .into_iter()
            .map(|build_file| ValidationError::SharedBuildFile { build_file }),
    );

    errors
}

fn check_collisions(objects: &ProjectObjects, errors: &mut Vec<ValidationError>) {
    let mut seen: Vec<ObjectId> = Vec::new();
    for kind in ObjectKind::ALL {
        for object in objects.iter_kind(kind) {
            let id = object.reference();
            if objects.kinds_of(&id).len() > 1 && !seen.contains(&id) {
                seen.push(id);
                errors.push(ValidationError::IdentifierCollision { reference: id });
            }
        }
    }
}
