//! Old-style plist text input.
//!
//! Parses project-file text into a [`PlistValue`] tree. Comments are
//! skipped: they are derived data and get recomputed on write.

use crate::error::ParseError;
use crate::model::{CommentedString, PlistDict, PlistValue};

/// Reader over old-style plist text.
///
/// Tracks a byte position into the source; every error reports the offset
/// and what the reader was looking for.
#[derive(Debug, Clone)]
pub struct Reader<'a> {
    src: &'a str,
    pos: usize,
}

impl<'a> Reader<'a> {
    /// Creates a reader over `src`.
    pub fn new(src: &'a str) -> Self {
        Self { src, pos: 0 }
    }

    /// Returns the current byte position.
    pub fn position(&self) -> usize {
        self.pos
    }

    /// Returns true once only whitespace and comments remain.
    pub fn is_at_end(&mut self) -> Result<bool, ParseError> {
        self.skip_trivia()?;
        Ok(self.pos >= self.src.len())
    }

    fn bytes(&self) -> &'a [u8] {
        self.src.as_bytes()
    }

    fn peek(&self) -> Option<u8> {
        self.bytes().get(self.pos).copied()
    }

    fn peek_at(&self, offset: usize) -> Option<u8> {
        self.bytes().get(self.pos + offset).copied()
    }

    fn unexpected(&self, expected: &'static str) -> ParseError {
        match self.src[self.pos..].chars().next() {
            Some(found) => ParseError::UnexpectedChar {
                found,
                offset: self.pos,
                expected,
            },
            None => ParseError::UnexpectedEof { context: expected },
        }
    }

    /// Skips whitespace, `/* */` comments and `//` line comments.
    fn skip_trivia(&mut self) -> Result<(), ParseError> {
        loop {
            match (self.peek(), self.peek_at(1)) {
                (Some(b), _) if b.is_ascii_whitespace() => self.pos += 1,
                (Some(b'/'), Some(b'*')) => {
                    let start = self.pos;
                    match self.src[self.pos + 2..].find("*/") {
                        Some(end) => self.pos += 2 + end + 2,
                        None => return Err(ParseError::UnterminatedComment { offset: start }),
                    }
                }
                (Some(b'/'), Some(b'/')) => match self.src[self.pos..].find('\n') {
                    Some(end) => self.pos += end + 1,
                    None => self.pos = self.src.len(),
                },
                _ => return Ok(()),
            }
        }
    }

    fn expect(&mut self, byte: u8, expected: &'static str) -> Result<(), ParseError> {
        self.skip_trivia()?;
        if self.peek() == Some(byte) {
            self.pos += 1;
            Ok(())
        } else {
            Err(self.unexpected(expected))
        }
    }

    /// Reads any value.
    pub fn read_value(&mut self) -> Result<PlistValue, ParseError> {
        self.skip_trivia()?;
        match self.peek() {
            Some(b'{') => self.read_dict().map(PlistValue::Dictionary),
            Some(b'(') => self.read_array().map(PlistValue::Array),
            Some(_) => self.read_string().map(PlistValue::String),
            None => Err(ParseError::UnexpectedEof { context: "value" }),
        }
    }

    /// Reads a quoted or bare string.
    pub fn read_string(&mut self) -> Result<CommentedString, ParseError> {
        self.skip_trivia()?;
        match self.peek() {
            Some(b'"') => self.read_quoted(b'"'),
            Some(b'\'') => self.read_quoted(b'\''),
            Some(b) if is_bare(b) => Ok(CommentedString::new(self.read_bare())),
            Some(_) => Err(self.unexpected("string")),
            None => Err(ParseError::UnexpectedEof { context: "string" }),
        }
    }

    fn read_bare(&mut self) -> &'a str {
        let start = self.pos;
        while let Some(b) = self.peek() {
            let comment_start = b == b'/' && matches!(self.peek_at(1), Some(b'*' | b'/'));
            if !is_bare(b) || comment_start {
                break;
            }
            self.pos += 1;
        }
        &self.src[start..self.pos]
    }

    fn read_quoted(&mut self, quote: u8) -> Result<CommentedString, ParseError> {
        self.pos += 1;
        let mut out = String::new();
        let mut run_start = self.pos;
        loop {
            match self.peek() {
                None => return Err(ParseError::UnexpectedEof { context: "quoted string" }),
                Some(b) if b == quote => {
                    out.push_str(&self.src[run_start..self.pos]);
                    self.pos += 1;
                    return Ok(CommentedString::new(out));
                }
                Some(b'\\') => {
                    out.push_str(&self.src[run_start..self.pos]);
                    let escape_at = self.pos;
                    let escaped = match self.peek_at(1) {
                        Some(b'n') => '\n',
                        Some(b't') => '\t',
                        Some(b'r') => '\r',
                        Some(b'\\') => '\\',
                        Some(b'"') => '"',
                        Some(b'\'') => '\'',
                        None => return Err(ParseError::UnexpectedEof { context: "escape" }),
                        Some(_) => return Err(ParseError::InvalidEscape { offset: escape_at }),
                    };
                    out.push(escaped);
                    self.pos += 2;
                    run_start = self.pos;
                }
                Some(_) => self.pos += 1,
            }
        }
    }

    fn read_array(&mut self) -> Result<Vec<PlistValue>, ParseError> {
        self.expect(b'(', "'('")?;
        let mut items = Vec::new();
        loop {
            self.skip_trivia()?;
            if self.peek() == Some(b')') {
                self.pos += 1;
                return Ok(items);
            }
            items.push(self.read_value()?);
            self.skip_trivia()?;
            match self.peek() {
                Some(b',') => self.pos += 1,
                Some(b')') => {}
                _ => return Err(self.unexpected("',' or ')'")),
            }
        }
    }

    fn read_dict(&mut self) -> Result<PlistDict, ParseError> {
        self.expect(b'{', "'{'")?;
        let mut dict = PlistDict::new();
        loop {
            self.skip_trivia()?;
            if self.peek() == Some(b'}') {
                self.pos += 1;
                return Ok(dict);
            }
            let key = self.read_string()?;
            self.expect(b'=', "'='")?;
            let value = self.read_value()?;
            self.expect(b';', "';'")?;
            dict.insert(key, value);
        }
    }
}

fn is_bare(b: u8) -> bool {
    !b.is_ascii_whitespace() && !matches!(b, b'{' | b'}' | b'(' | b')' | b'=' | b';' | b',' | b'"' | b'\'')
}

/// Parses a complete document into its root value.
pub fn parse(src: &str) -> Result<PlistValue, ParseError> {
    let mut reader = Reader::new(src);
    let value = reader.read_value()?;
    if !reader.is_at_end()? {
        return Err(ParseError::TrailingContent {
            offset: reader.position(),
        });
    }
    Ok(value)
}

#[cfg(test)]
mod tests {
    use proptest::prelude::*;

    use super::*;
    use crate::codec::objects::{decode_project_root, encode_objects, DecodeOptions};
    use crate::codec::writer::{write_project, WriteOptions};
    use crate::model::{
        BuildFile, CopyFilesBuildPhase, FileReference, ObjectId, ProjectObjects, SubFolder,
    };

    /// Writes `objects` as a project file and reads it back.
    fn through_text(objects: &ProjectObjects) -> ProjectObjects {
        let mut root = PlistDict::new();
        root.insert("objects", PlistValue::Dictionary(encode_objects(objects)));
        let text = write_project(&root, WriteOptions::new());
        let parsed = parse(&text).unwrap();
        decode_project_root(&parsed, DecodeOptions::strict()).unwrap().objects
    }

    fn copied_file(name: &str, dst_path: &str, sub_folder: SubFolder) -> ProjectObjects {
        let file = ObjectId::derived(b"file");
        let build_file = ObjectId::derived(b"build");
        let mut objects = ProjectObjects::new();
        objects.insert(FileReference::new(file, name).with_name(name));
        objects.insert(BuildFile::new(build_file, file));
        objects.insert(
            CopyFilesBuildPhase::new(ObjectId::derived(b"phase"), dst_path, sub_folder)
                .with_files([build_file]),
        );
        objects
    }

    #[test]
    fn test_comment_terminator_in_file_name() {
        let objects = copied_file("weird*/name.png", "", SubFolder::Resources);
        assert_eq!(through_text(&objects), objects);
    }

    proptest! {
        #[test]
        fn prop_arbitrary_names_survive_text(
            name in "[ -~]{0,24}",
            dst_path in "[ -~]{0,24}",
            code in any::<u64>(),
        ) {
            let objects = copied_file(&name, &dst_path, SubFolder::from_code(code));
            prop_assert_eq!(through_text(&objects), objects);
        }
    }

    const PROJECT: &str = r#"// !$*UTF8*$!
{
	archiveVersion = 1;
	classes = {
	};
	objectVersion = 56;
	objects = {

/* Begin PBXBuildFile section */
		0A1B2C3D4E5F60718293A4B5 /* icon.png in Embed Resources */ = {isa = PBXBuildFile; fileRef = 0A1B2C3D4E5F60718293A4B6 /* icon.png */; };
		0A1B2C3D4E5F60718293A4B7 /* main.swift in Sources */ = {isa = PBXBuildFile; fileRef = 0A1B2C3D4E5F60718293A4B8 /* main.swift */; settings = {COMPILER_FLAGS = "-Wall -Werror"; }; };
/* End PBXBuildFile section */

/* Begin PBXCopyFilesBuildPhase section */
		0A1B2C3D4E5F60718293A4C0 /* Embed Resources */ = {
			isa = PBXCopyFilesBuildPhase;
			buildActionMask = 2147483647;
			dstPath = "";
			dstSubfolderSpec = 7;
			files = (
				0A1B2C3D4E5F60718293A4B5 /* icon.png in Embed Resources */,
			);
			runOnlyForDeploymentPostprocessing = 0;
		};
/* End PBXCopyFilesBuildPhase section */

/* Begin PBXFileReference section */
		0A1B2C3D4E5F60718293A4B6 /* icon.png */ = {isa = PBXFileReference; lastKnownFileType = image.png; path = icon.png; sourceTree = "<group>"; };
		0A1B2C3D4E5F60718293A4B8 /* main.swift */ = {isa = PBXFileReference; lastKnownFileType = sourcecode.swift; path = main.swift; sourceTree = "<group>"; };
/* End PBXFileReference section */

/* Begin PBXSourcesBuildPhase section */
		0A1B2C3D4E5F60718293A4C1 /* Sources */ = {
			isa = PBXSourcesBuildPhase;
			buildActionMask = 2147483647;
			files = (
				0A1B2C3D4E5F60718293A4B7 /* main.swift in Sources */,
			);
			runOnlyForDeploymentPostprocessing = 0;
		};
/* End PBXSourcesBuildPhase section */
	};
	rootObject = 0A1B2C3D4E5F60718293A4C2 /* Project object */;
}
"#;

    fn object_id(s: &str) -> ObjectId {
        ObjectId::parse(s).unwrap()
    }

    #[test]
    fn test_project_fragment_roundtrip() {
        let root = parse(PROJECT).unwrap();
        let decoded = decode_project_root(&root, DecodeOptions::strict()).unwrap();
        assert_eq!(decoded.objects.len(), 6);

        let phase = decoded
            .objects
            .copy_files_build_phase(&object_id("0A1B2C3D4E5F60718293A4C0"))
            .unwrap();
        assert_eq!(phase.dst_subfolder_spec, SubFolder::Resources);
        assert_eq!(phase.dst_path, "");

        let build_file = decoded
            .objects
            .build_file(&object_id("0A1B2C3D4E5F60718293A4B7"))
            .unwrap();
        let settings = build_file.settings.as_ref().unwrap();
        assert_eq!(
            settings.get("COMPILER_FLAGS").and_then(PlistValue::as_str),
            Some("-Wall -Werror")
        );

        // Re-encode into the original root and check the text reads back the same.
        let mut root = root.as_dictionary().unwrap().clone();
        root.insert("objects", PlistValue::Dictionary(encode_objects(&decoded.objects)));
        let text = write_project(&root, WriteOptions::new());
        assert!(text.contains("/* icon.png in CopyFiles */"));
        assert!(text.contains("/* main.swift in Sources */"));
        assert!(text.contains("/* Begin PBXCopyFilesBuildPhase section */"));

        let reread = decode_project_root(&parse(&text).unwrap(), DecodeOptions::strict()).unwrap();
        assert_eq!(reread.objects, decoded.objects);
    }

    #[test]
    fn test_parse_record_with_comments() {
        let text = "// !$*UTF8*$!\n{\n\tA /* icon.png in CopyFiles */ = {isa = PBXBuildFile; \
                    fileRef = B /* icon.png */; };\n}\n";
        let root = parse(text).unwrap();
        let record = root.as_dictionary().unwrap().get("A").unwrap().as_dictionary().unwrap();
        assert_eq!(record.get("isa").and_then(PlistValue::as_str), Some("PBXBuildFile"));
        assert_eq!(record.get("fileRef"), Some(&PlistValue::string("B")));
    }

    #[test]
    fn test_parse_quoted_strings() {
        let root = parse(r#"{ a = "My App"; b = ""; c = "say \"hi\"\n"; d = '<group>'; }"#).unwrap();
        let dict = root.as_dictionary().unwrap();
        assert_eq!(dict.get("a").and_then(PlistValue::as_str), Some("My App"));
        assert_eq!(dict.get("b").and_then(PlistValue::as_str), Some(""));
        assert_eq!(dict.get("c").and_then(PlistValue::as_str), Some("say \"hi\"\n"));
        assert_eq!(dict.get("d").and_then(PlistValue::as_str), Some("<group>"));
    }

    #[test]
    fn test_parse_arrays() {
        let root = parse("( a, b /* note */, (c), )").unwrap();
        assert_eq!(
            root,
            PlistValue::Array(vec![
                PlistValue::string("a"),
                PlistValue::string("b"),
                PlistValue::Array(vec![PlistValue::string("c")]),
            ])
        );
        assert_eq!(parse("()").unwrap(), PlistValue::Array(vec![]));
    }

    #[test]
    fn test_bare_path_with_slashes() {
        let root = parse("{ path = Sources/App/main.swift; }").unwrap();
        let dict = root.as_dictionary().unwrap();
        assert_eq!(dict.get("path").and_then(PlistValue::as_str), Some("Sources/App/main.swift"));
    }

    #[test]
    fn test_errors_report_position() {
        assert_eq!(
            parse("{ a = b }"),
            Err(ParseError::UnexpectedChar {
                found: '}',
                offset: 8,
                expected: "';'",
            })
        );
        assert_eq!(parse("{ a = b;"), Err(ParseError::UnexpectedEof { context: "string" }));
        assert_eq!(parse("/* open"), Err(ParseError::UnterminatedComment { offset: 0 }));
        assert_eq!(parse("\"bad \\q\""), Err(ParseError::InvalidEscape { offset: 5 }));
        assert_eq!(parse("a b"), Err(ParseError::TrailingContent { offset: 2 }));
    }
}
