//! Old-style plist text output.
//!
//! Renders [`PlistValue`] trees the way project files are laid out on disk:
//! `key = value;` pairs, `( a, b, )` arrays, `/* comment */` annotations and
//! `/* Begin X section */` markers around each kind in the object table.

use std::borrow::Cow;

use crate::model::{CommentedString, PlistDict, PlistValue};

/// Header line of every project file.
pub const FILE_HEADER: &str = "// !$*UTF8*$!";

/// Kinds whose records are written on one line even in multiline mode.
const INLINE_ISAS: [&str; 2] = ["PBXBuildFile", "PBXFileReference"];

/// Indentation unit for multiline output.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub enum Indent {
    #[default]
    Tabs,
    Spaces(usize),
}

/// Layout options for text output.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct WriteOptions {
    /// Break dictionaries and arrays over multiple lines.
    pub multiline: bool,
    pub indent: Indent,
}

impl Default for WriteOptions {
    fn default() -> Self {
        Self {
            multiline: true,
            indent: Indent::Tabs,
        }
    }
}

impl WriteOptions {
    /// Creates default (multiline, tab-indented) options.
    pub fn new() -> Self {
        Self::default()
    }

    /// Creates options that render everything on one line.
    pub fn single_line() -> Self {
        Self {
            multiline: false,
            ..Self::default()
        }
    }
}

/// Returns true if `s` must be quoted to survive a read.
pub fn needs_quotes(s: &str) -> bool {
    s.is_empty()
        || s.contains("//")
        || s.contains("___")
        || !s
            .bytes()
            .all(|b| b.is_ascii_alphanumeric() || matches!(b, b'_' | b'$' | b'/' | b':' | b'.' | b'-'))
}

/// Quotes and escapes `s` when needed.
pub fn quote(s: &str) -> String {
    if !needs_quotes(s) {
        return s.to_string();
    }
    let mut out = String::with_capacity(s.len() + 2);
    out.push('"');
    for c in s.chars() {
        match c {
            '\\' => out.push_str("\\\\"),
            '"' => out.push_str("\\\""),
            '\n' => out.push_str("\\n"),
            '\t' => out.push_str("\\t"),
            '\r' => out.push_str("\\r"),
            c => out.push(c),
        }
    }
    out.push('"');
    out
}

/// Makes `comment` safe to place between `/*` and `*/`.
///
/// A `*/` inside the text would close the comment early, so it is written
/// as `(*)/`. Comments are never read back, only recomputed.
pub fn comment_text(comment: &str) -> Cow<'_, str> {
    if comment.contains("*/") {
        Cow::Owned(comment.replace("*/", "(*)/"))
    } else {
        Cow::Borrowed(comment)
    }
}

/// Text writer accumulating into a string buffer.
#[derive(Debug, Clone)]
pub struct Writer {
    buf: String,
    options: WriteOptions,
    depth: usize,
}

impl Writer {
    /// Creates a writer with the given layout options.
    pub fn new(options: WriteOptions) -> Self {
        Self {
            buf: String::new(),
            options,
            depth: 0,
        }
    }

    /// Returns the written text.
    pub fn into_string(self) -> String {
        self.buf
    }

    fn newline(&mut self, multiline: bool) {
        if !multiline {
            return;
        }
        self.buf.push('\n');
        for _ in 0..self.depth {
            match self.options.indent {
                Indent::Tabs => self.buf.push('\t'),
                Indent::Spaces(n) => self.buf.extend(std::iter::repeat_n(' ', n)),
            }
        }
    }

    /// Writes a string with its comment.
    pub fn write_string(&mut self, s: &CommentedString) {
        self.buf.push_str(&quote(&s.value));
        if let Some(comment) = &s.comment {
            self.buf.push_str(" /* ");
            self.buf.push_str(&comment_text(comment));
            self.buf.push_str(" */");
        }
    }

    /// Writes any value.
    pub fn write_value(&mut self, value: &PlistValue) {
        let multiline = self.options.multiline;
        self.write_value_with(value, multiline);
    }

    fn write_value_with(&mut self, value: &PlistValue, multiline: bool) {
        match value {
            PlistValue::String(s) => self.write_string(s),
            PlistValue::Array(items) => self.write_array(items, multiline),
            PlistValue::Dictionary(dict) => self.write_dict(dict, multiline),
        }
    }

    fn write_array(&mut self, items: &[PlistValue], multiline: bool) {
        self.buf.push('(');
        self.depth += 1;
        for item in items {
            self.newline(multiline);
            self.write_value_with(item, multiline);
            self.buf.push(',');
            if !multiline {
                self.buf.push(' ');
            }
        }
        self.depth -= 1;
        self.newline(multiline);
        self.buf.push(')');
    }

    fn write_dict(&mut self, dict: &PlistDict, multiline: bool) {
        self.buf.push('{');
        self.depth += 1;
        for (key, value) in dict.iter() {
            self.newline(multiline);
            self.write_entry_with(key, value, multiline);
            if !multiline {
                self.buf.push(' ');
            }
        }
        self.depth -= 1;
        self.newline(multiline);
        self.buf.push('}');
    }

    fn write_entry_with(&mut self, key: &CommentedString, value: &PlistValue, multiline: bool) {
        self.write_string(key);
        self.buf.push_str(" = ");
        self.write_value_with(value, multiline);
        self.buf.push(';');
    }

    /// Writes one `key = value;` entry.
    ///
    /// Build file and file reference records stay on one line, as on disk.
    pub fn write_entry(&mut self, key: &CommentedString, value: &PlistValue) {
        let inline = isa_of(value).is_some_and(|isa| INLINE_ISAS.contains(&isa));
        let multiline = self.options.multiline && !inline;
        self.write_entry_with(key, value, multiline);
    }

    /// Writes an object table with section markers around each kind.
    pub fn write_object_table(&mut self, table: &PlistDict) {
        let multiline = self.options.multiline;
        self.buf.push('{');
        self.depth += 1;
        let mut section: Option<&str> = None;
        for (key, value) in table.iter() {
            let isa = isa_of(value);
            if isa != section {
                if let Some(previous) = section {
                    self.section_marker("End", previous, multiline);
                }
                if let Some(next) = isa {
                    if multiline {
                        self.buf.push('\n');
                    }
                    self.section_marker("Begin", next, multiline);
                }
                section = isa;
            }
            self.newline(multiline);
            self.write_entry(key, value);
            if !multiline {
                self.buf.push(' ');
            }
        }
        if let Some(previous) = section {
            self.section_marker("End", previous, multiline);
        }
        self.depth -= 1;
        self.newline(multiline);
        self.buf.push('}');
    }

    fn section_marker(&mut self, edge: &str, isa: &str, multiline: bool) {
        if multiline {
            // Markers sit at column zero.
            self.buf.push('\n');
        } else {
            self.buf.push(' ');
        }
        self.buf.push_str("/* ");
        self.buf.push_str(edge);
        self.buf.push(' ');
        self.buf.push_str(isa);
        self.buf.push_str(" section */");
        if !multiline {
            self.buf.push(' ');
        }
    }
}

fn isa_of(value: &PlistValue) -> Option<&str> {
    value.as_dictionary()?.get("isa")?.as_str()
}

/// Renders one value.
pub fn write_value(value: &PlistValue, options: WriteOptions) -> String {
    let mut writer = Writer::new(options);
    writer.write_value(value);
    writer.into_string()
}

/// Renders one `key = value;` entry, e.g. an object-table record.
pub fn write_entry(key: &CommentedString, value: &PlistValue, options: WriteOptions) -> String {
    let mut writer = Writer::new(options);
    writer.write_entry(key, value);
    writer.into_string()
}

/// Renders a whole project file: header, then the root dictionary with its
/// `objects` table laid out in sections.
pub fn write_project(root: &PlistDict, options: WriteOptions) -> String {
    let multiline = options.multiline;
    let mut writer = Writer::new(options);
    writer.buf.push_str(FILE_HEADER);
    writer.buf.push('\n');
    writer.buf.push('{');
    writer.depth += 1;
    for (key, value) in root.iter() {
        writer.newline(multiline);
        match (key.value.as_str(), value) {
            ("objects", PlistValue::Dictionary(table)) => {
                writer.write_string(key);
                writer.buf.push_str(" = ");
                writer.write_object_table(table);
                writer.buf.push(';');
            }
            _ => writer.write_entry_with(key, value, multiline),
        }
        if !multiline {
            writer.buf.push(' ');
        }
    }
    writer.depth -= 1;
    writer.newline(multiline);
    writer.buf.push_str("}\n");
    writer.into_string()
}
