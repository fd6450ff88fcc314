//! pbx-graph: typed object graph for Xcode project files.
//!
//! This crate decodes the `objects` table of a `project.pbxproj` file into
//! typed elements, lets callers change them through value-returning updates,
//! and encodes them back with reference comments derived from the graph.
//!
//! # Overview
//!
//! A project file is an old-style plist whose `objects` dictionary maps
//! 24-character identifiers to records tagged with an `isa`. Records refer to
//! one another by identifier:
//! - **Build phases** list build files
//! - **Build files** point at a file reference or variant group
//! - **Comments** (`/* icon.png in CopyFiles */`) are recomputed on every
//!   write and never stored
//!
//! # Quick Start
//!
//! ```rust
//! use pbx_graph::codec::{decode_project_root, encode_objects, parse, write_project};
//! use pbx_graph::{
//!     BuildFile, CopyFilesBuildPhase, DecodeOptions, FileReference, ObjectId, PlistDict,
//!     PlistValue, ProjectObjects, SubFolder, WriteOptions,
//! };
//!
//! let file = ObjectId::derived(b"icon.png");
//! let build_file = ObjectId::derived(b"icon.png in CopyFiles");
//! let phase = ObjectId::derived(b"CopyFiles");
//!
//! let mut objects = ProjectObjects::new();
//! objects.insert(FileReference::new(file, "icon.png"));
//! objects.insert(BuildFile::new(build_file, file));
//! objects.insert(CopyFilesBuildPhase::new(phase, "", SubFolder::Resources).adding_member(build_file));
//!
//! // Render the project file
//! let mut root = PlistDict::new();
//! root.insert("objects", PlistValue::Dictionary(encode_objects(&objects)));
//! let text = write_project(&root, WriteOptions::new());
//! assert!(text.contains("/* icon.png in CopyFiles */"));
//!
//! // Read it back
//! let decoded = decode_project_root(&parse(&text).unwrap(), DecodeOptions::strict()).unwrap();
//! assert_eq!(decoded.objects, objects);
//! ```
//!
//! # Modules
//!
//! - [`model`]: Identifiers, plist values, elements and the graph container
//! - [`codec`]: Element decode/encode, object tables, text reader and writer
//! - [`validate`]: Cross-reference checks
//! - [`error`]: Error types

pub mod codec;
pub mod error;
pub mod model;
pub mod validate;

// Re-export commonly used types at crate root
pub use codec::{
    decode_objects, decode_project_root, encode_objects, parse, write_project, DecodeOptions,
    Decoded, PlistSerializable, ProjectElement, WriteOptions,
};
pub use error::{DecodeError, ErrorCode, IdError, ParseError, ValidationError};
pub use model::{
    BuildFile, BuildPhase, BuildPhaseKind, CommentedString, CopyFilesBuildPhase, FileReference,
    Object, ObjectId, ObjectKind, PlistDict, PlistValue, ProjectObjects, SubFolder, VariantGroup,
    DEFAULT_BUILD_ACTION_MASK,
};
pub use validate::validate_objects;

/// Crate version.
pub const VERSION: &str = env!("CARGO_PKG_VERSION");
