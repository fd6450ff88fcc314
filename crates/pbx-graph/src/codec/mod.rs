//! Plist encoding/decoding for project objects.
//!
//! [`element`] holds the per-element contracts, [`objects`] lifts them to a
//! whole object table, and [`reader`]/[`writer`] move plist values to and
//! from old-style text.

pub mod comments;
pub mod element;
pub mod objects;
pub mod reader;
pub mod record;
pub mod writer;

pub use element::{PlistSerializable, ProjectElement};
pub use objects::{
    decode_entry, decode_objects, decode_project_root, encode_object, encode_objects, DecodeOptions,
    Decoded,
};
pub use reader::{parse, Reader};
pub use writer::{comment_text, write_entry, write_project, write_value, Indent, WriteOptions, Writer, FILE_HEADER};
