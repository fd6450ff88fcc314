//! Data model types for project files.
//!
//! This module contains the in-memory object graph:
//! - Identifiers (24-character tokens)
//! - Generic plist values (commented strings, arrays, dictionaries)
//! - Elements (build files, file references, variant groups, build phases)
//! - The graph container indexing every element

pub mod build_phase;
pub mod file;
pub mod id;
pub mod object;
pub mod objects;
pub mod value;

pub use build_phase::{BuildPhase, BuildPhaseKind, CopyFilesBuildPhase, SubFolder, DEFAULT_BUILD_ACTION_MASK};
pub use file::{BuildFile, FileReference, VariantGroup};
pub use id::{ObjectId, ID_LEN, NIL_ID};
pub use object::{Object, ObjectKind};
pub use objects::ProjectObjects;
pub use value::{CommentedString, PlistDict, PlistValue};
