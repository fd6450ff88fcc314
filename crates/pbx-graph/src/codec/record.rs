//! Field-level access to one object record.
//!
//! [`RecordReader`] pulls typed fields out of a raw record and attributes
//! every failure to the record's kind, reference and key. [`RecordWriter`]
//! builds the ordered output record, `isa` first.

use crate::error::DecodeError;
use crate::model::{CommentedString, ObjectId, ObjectKind, PlistDict, PlistValue};

// =============================================================================
// DECODING
// =============================================================================

/// Reader over one raw object record.
#[derive(Debug, Clone, Copy)]
pub struct RecordReader<'a> {
    kind: ObjectKind,
    reference: ObjectId,
    record: &'a PlistDict,
}

impl<'a> RecordReader<'a> {
    /// Creates a reader for the record of element `reference`.
    pub fn new(kind: ObjectKind, reference: ObjectId, record: &'a PlistDict) -> Self {
        Self {
            kind,
            reference,
            record,
        }
    }

    fn missing(&self, key: &'static str) -> DecodeError {
        DecodeError::MissingKey {
            kind: self.kind,
            reference: self.reference,
            key,
        }
    }

    fn malformed(&self, key: &'static str, expected: &'static str) -> DecodeError {
        DecodeError::MalformedKey {
            kind: self.kind,
            reference: self.reference,
            key,
            expected,
        }
    }

    /// Reads a required value of any shape.
    pub fn required(&self, key: &'static str) -> Result<&'a PlistValue, DecodeError> {
        self.record.get(key).ok_or_else(|| self.missing(key))
    }

    /// Reads a required string.
    pub fn required_str(&self, key: &'static str) -> Result<&'a str, DecodeError> {
        self.required(key)?
            .as_str()
            .ok_or_else(|| self.malformed(key, "string"))
    }

    /// Reads an optional string. A present non-string is malformed.
    pub fn optional_str(&self, key: &'static str) -> Result<Option<&'a str>, DecodeError> {
        match self.record.get(key) {
            None => Ok(None),
            Some(value) => value
                .as_str()
                .map(Some)
                .ok_or_else(|| self.malformed(key, "string")),
        }
    }

    /// Reads an optional string as an owned value.
    pub fn optional_string(&self, key: &'static str) -> Result<Option<String>, DecodeError> {
        Ok(self.optional_str(key)?.map(str::to_string))
    }

    /// Reads a required unsigned integer (decimal string on disk).
    pub fn required_uint(&self, key: &'static str) -> Result<u64, DecodeError> {
        let raw = self
            .required(key)?
            .as_str()
            .ok_or_else(|| self.malformed(key, "unsigned integer"))?;
        self.parse_uint(key, raw)
    }

    /// Reads an optional unsigned integer.
    pub fn optional_uint(&self, key: &'static str) -> Result<Option<u64>, DecodeError> {
        match self.record.get(key) {
            None => Ok(None),
            Some(value) => {
                let raw = value
                    .as_str()
                    .ok_or_else(|| self.malformed(key, "unsigned integer"))?;
                self.parse_uint(key, raw).map(Some)
            }
        }
    }

    /// Plain decimal digits only. `str::parse` alone also accepts a leading `+`.
    fn parse_uint(&self, key: &'static str, raw: &str) -> Result<u64, DecodeError> {
        if raw.is_empty() || !raw.bytes().all(|b| b.is_ascii_digit()) {
            return Err(self.malformed(key, "unsigned integer"));
        }
        raw.parse::<u64>()
            .map_err(|_| self.malformed(key, "unsigned integer"))
    }

    fn parse_id(&self, key: &'static str, raw: &str) -> Result<ObjectId, DecodeError> {
        ObjectId::parse(raw).map_err(|_| DecodeError::InvalidReference {
            kind: self.kind,
            reference: self.reference,
            key,
            value: raw.to_string(),
        })
    }

    /// Reads an optional identifier.
    pub fn optional_id(&self, key: &'static str) -> Result<Option<ObjectId>, DecodeError> {
        match self.optional_str(key)? {
            None => Ok(None),
            Some(raw) => self.parse_id(key, raw).map(Some),
        }
    }

    /// Reads a required list of identifiers, preserving order and duplicates.
    pub fn required_id_list(&self, key: &'static str) -> Result<Vec<ObjectId>, DecodeError> {
        let items = self
            .required(key)?
            .as_array()
            .ok_or_else(|| self.malformed(key, "array of identifiers"))?;
        let mut ids = Vec::with_capacity(items.len());
        for item in items {
            let raw = item
                .as_str()
                .ok_or_else(|| self.malformed(key, "array of identifiers"))?;
            ids.push(self.parse_id(key, raw)?);
        }
        Ok(ids)
    }

    /// Reads an optional dictionary.
    pub fn optional_dict(&self, key: &'static str) -> Result<Option<&'a PlistDict>, DecodeError> {
        match self.record.get(key) {
            None => Ok(None),
            Some(value) => value
                .as_dictionary()
                .map(Some)
                .ok_or_else(|| self.malformed(key, "dictionary")),
        }
    }
}

// =============================================================================
// ENCODING
// =============================================================================

/// Builder for one ordered output record.
#[derive(Debug, Clone)]
pub struct RecordWriter {
    dict: PlistDict,
}

impl RecordWriter {
    /// Starts a record for `kind`, writing its `isa` first.
    pub fn new(kind: ObjectKind) -> Self {
        let mut dict = PlistDict::with_capacity(8);
        dict.insert("isa", PlistValue::string(kind.isa()));
        Self { dict }
    }

    /// Writes a string.
    pub fn write_str(&mut self, key: &str, value: &str) {
        self.dict.insert(key, PlistValue::string(value));
    }

    /// Writes a string if present.
    pub fn write_opt_str(&mut self, key: &str, value: Option<&str>) {
        if let Some(value) = value {
            self.write_str(key, value);
        }
    }

    /// Writes an unsigned integer as a decimal string.
    pub fn write_uint(&mut self, key: &str, value: u64) {
        self.dict.insert(key, PlistValue::string(value.to_string()));
    }

    /// Writes an unsigned integer if present.
    pub fn write_opt_uint(&mut self, key: &str, value: Option<u64>) {
        if let Some(value) = value {
            self.write_uint(key, value);
        }
    }

    /// Writes a reference with its derived comment.
    pub fn write_reference(&mut self, key: &str, id: ObjectId, comment: Option<String>) {
        self.dict.insert(key, PlistValue::commented(id.as_str(), comment));
    }

    /// Writes an array.
    pub fn write_array(&mut self, key: &str, items: Vec<PlistValue>) {
        self.dict.insert(key, PlistValue::Array(items));
    }

    /// Writes a nested dictionary.
    pub fn write_dict(&mut self, key: &str, dict: PlistDict) {
        self.dict.insert(key, PlistValue::Dictionary(dict));
    }

    /// Finishes the record.
    pub fn finish(self) -> PlistValue {
        PlistValue::Dictionary(self.dict)
    }

    /// Finishes the record paired with its object-table key.
    pub fn finish_entry(self, key: CommentedString) -> (CommentedString, PlistValue) {
        (key, self.finish())
    }
}
