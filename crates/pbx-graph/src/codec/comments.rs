//! Derived comments for encoded references.
//!
//! Comments are never stored on elements. Each one is recomputed from the
//! current graph on every write, and an unresolvable name yields no comment.

use tracing::trace;

use crate::model::{ObjectId, ProjectObjects};

/// Comment for a build phase member: `"<file name> in <phase name>"`.
pub fn member_comment(objects: &ProjectObjects, member: &ObjectId, phase_name: &str) -> Option<String> {
    match objects.build_file_name(member) {
        Some(name) => Some(format!("{name} in {phase_name}")),
        None => {
            trace!(%member, phase = phase_name, "no file name for build phase member");
            None
        }
    }
}

/// Comment for a build file's own object-table key.
///
/// Uses the owning phase when one lists the build file, else the file name
/// alone.
pub fn build_file_comment(objects: &ProjectObjects, build_file: &ObjectId) -> Option<String> {
    let phase_name = objects
        .phase_containing(build_file)
        .and_then(|phase| phase.phase_name());
    match phase_name {
        Some(phase_name) => member_comment(objects, build_file, phase_name),
        None => file_comment(objects, &objects.build_file(build_file)?.file_ref?),
    }
}

/// Comment for a reference to a file reference or variant group.
pub fn file_comment(objects: &ProjectObjects, file: &ObjectId) -> Option<String> {
    let name = objects.file_name(file).map(str::to_string);
    if name.is_none() {
        trace!(%file, "no display name for file reference");
    }
    name
}
