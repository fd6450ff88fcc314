//! Error types for project object decoding, text parsing and validation.

use thiserror::Error;

use crate::model::{ObjectId, ObjectKind};

/// Stable error codes for decode failures.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ErrorCode {
    /// E001: Required key absent
    MissingKey,
    /// E002: Key present with a value of the wrong shape
    MalformedValue,
    /// E003: Missing or unsupported `isa`
    UnsupportedIsa,
    /// E004: Malformed object identifier
    InvalidIdentifier,
}

impl ErrorCode {
    /// Returns the error code string (e.g., "E001").
    pub fn code(&self) -> &'static str {
        match self {
            ErrorCode::MissingKey => "E001",
            ErrorCode::MalformedValue => "E002",
            ErrorCode::UnsupportedIsa => "E003",
            ErrorCode::InvalidIdentifier => "E004",
        }
    }
}

/// Error while decoding one object record into a typed element.
///
/// Every variant is attributable to a single record, so failures can be
/// collected across a whole object table and reported together.
#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum DecodeError {
    // === E001: Missing key ===
    #[error("[E001] element {reference} ({kind}): missing key `{key}`")]
    MissingKey {
        kind: ObjectKind,
        reference: ObjectId,
        key: &'static str,
    },

    // === E002: Malformed value ===
    #[error("[E002] element {reference} ({kind}): malformed key `{key}`, expected {expected}")]
    MalformedKey {
        kind: ObjectKind,
        reference: ObjectId,
        key: &'static str,
        expected: &'static str,
    },

    #[error("[E002] object record {reference} is not a dictionary")]
    NotADictionary { reference: String },

    // === E003: isa ===
    #[error("[E003] object record {reference} has no `isa`")]
    MissingIsa { reference: ObjectId },

    #[error("[E003] object record {reference} has unsupported isa `{isa}`")]
    UnknownIsa { reference: ObjectId, isa: String },

    // === E004: Identifiers ===
    #[error("[E004] element {reference} ({kind}): key `{key}` holds invalid identifier {value:?}")]
    InvalidReference {
        kind: ObjectKind,
        reference: ObjectId,
        key: &'static str,
        value: String,
    },

    #[error("[E004] object table key {value:?} is not a valid identifier")]
    InvalidObjectKey { value: String },

    #[error("[E002] object table is missing or not a dictionary")]
    MissingObjectTable,
}

impl DecodeError {
    /// Returns the error code for this error.
    pub fn code(&self) -> ErrorCode {
        match self {
            DecodeError::MissingKey { .. } => ErrorCode::MissingKey,
            DecodeError::MalformedKey { .. }
            | DecodeError::NotADictionary { .. }
            | DecodeError::MissingObjectTable => ErrorCode::MalformedValue,
            DecodeError::MissingIsa { .. } | DecodeError::UnknownIsa { .. } => {
                ErrorCode::UnsupportedIsa
            }
            DecodeError::InvalidReference { .. } | DecodeError::InvalidObjectKey { .. } => {
                ErrorCode::InvalidIdentifier
            }
        }
    }

    /// Returns the identifier of the offending record, when it is known.
    pub fn reference(&self) -> Option<ObjectId> {
        match self {
            DecodeError::MissingKey { reference, .. }
            | DecodeError::MalformedKey { reference, .. }
            | DecodeError::MissingIsa { reference }
            | DecodeError::UnknownIsa { reference, .. }
            | DecodeError::InvalidReference { reference, .. } => Some(*reference),
            DecodeError::NotADictionary { .. }
            | DecodeError::InvalidObjectKey { .. }
            | DecodeError::MissingObjectTable => None,
        }
    }

    /// Returns the offending key, for key-level failures.
    pub fn key(&self) -> Option<&'static str> {
        match self {
            DecodeError::MissingKey { key, .. }
            | DecodeError::MalformedKey { key, .. }
            | DecodeError::InvalidReference { key, .. } => Some(*key),
            _ => None,
        }
    }

    /// Returns the element kind the record declared, when it is known.
    pub fn kind(&self) -> Option<ObjectKind> {
        match self {
            DecodeError::MissingKey { kind, .. }
            | DecodeError::MalformedKey { kind, .. }
            | DecodeError::InvalidReference { kind, .. } => Some(*kind),
            _ => None,
        }
    }
}

/// Error while parsing an object identifier token.
#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum IdError {
    #[error("identifier must be 24 characters, found {len}")]
    InvalidLength { len: usize },

    #[error("identifier contains non-hex character {char:?}")]
    InvalidChar { char: char },
}

/// Error while reading old-style plist text.
#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum ParseError {
    #[error("unexpected end of input while reading {context}")]
    UnexpectedEof { context: &'static str },

    #[error("unexpected character {found:?} at byte {offset}, expected {expected}")]
    UnexpectedChar {
        found: char,
        offset: usize,
        expected: &'static str,
    },

    #[error("unterminated comment starting at byte {offset}")]
    UnterminatedComment { offset: usize },

    #[error("invalid escape sequence at byte {offset}")]
    InvalidEscape { offset: usize },

    #[error("trailing content at byte {offset}")]
    TrailingContent { offset: usize },
}

/// Graph consistency finding.
#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum ValidationError {
    #[error("build phase {phase} lists {build_file}, which is not a build file")]
    DanglingBuildFile { phase: ObjectId, build_file: ObjectId },

    #[error("build file {build_file} references {file_ref}, which is not a file reference or variant group")]
    DanglingFileReference { build_file: ObjectId, file_ref: ObjectId },

    #[error("build file {build_file} is listed by more than one build phase")]
    SharedBuildFile { build_file: ObjectId },

    #[error("identifier {reference} appears in more than one object kind")]
    IdentifierCollision { reference: ObjectId },

    #[error("variant group {group} lists child {child}, which does not exist")]
    DanglingChild { group: ObjectId, child: ObjectId },
}
