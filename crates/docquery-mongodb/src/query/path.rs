//! Field paths into document-shaped entities.

use std::fmt;

/// One step of a [`FieldPath`].
#[derive(Debug, Clone, PartialEq, Eq, Hash)]
pub enum PathSegment {
    /// Named field of an embedded document
    Field(String),
    /// Position inside an array
    Index(usize),
}

/// Location of a (possibly nested, possibly array-indexed) field.
///
/// Parsed from text such as `Statistics.VotesCount`, `Comments[1].AuthorName`
/// or `Comments.1.AuthorName`. Text that does not parse cleanly is kept as a
/// literal field segment and fails schema resolution later.
#[derive(Debug, Clone, PartialEq, Eq, Hash)]
pub struct FieldPath {
    segments: Vec<PathSegment>,
}

impl FieldPath {
    /// Path with a single named segment
    pub fn new(field: impl Into<String>) -> Self {
        Self {
            segments: vec![PathSegment::Field(field.into())],
        }
    }

    /// Parse dotted / bracketed path text
    pub fn parse(text: &str) -> Self {
        let mut segments = Vec::new();
        for part in text.split('.') {
            segments.extend(parse_part(part));
        }
        Self { segments }
    }

    /// Append a named segment
    pub fn field(mut self, name: impl Into<String>) -> Self {
        self.segments.push(PathSegment::Field(name.into()));
        self
    }

    /// Append an array index segment
    pub fn index(mut self, index: usize) -> Self {
        self.segments.push(PathSegment::Index(index));
        self
    }

    pub fn segments(&self) -> &[PathSegment] {
        &self.segments
    }

    pub fn is_empty(&self) -> bool {
        self.segments.is_empty()
    }
}

/// `name`, `7`, or `name[1][2]`. Anything else stays a literal field.
fn parse_part(part: &str) -> Vec<PathSegment> {
    if !part.is_empty() && part.bytes().all(|b| b.is_ascii_digit()) {
        if let Ok(index) = part.parse() {
            return vec![PathSegment::Index(index)];
        }
    }

    let Some(open) = part.find('[') else {
        return vec![PathSegment::Field(part.to_string())];
    };

    let name = &part[..open];
    let mut rest = &part[open..];
    let mut segments = vec![PathSegment::Field(name.to_string())];
    while !rest.is_empty() {
        let parsed = rest
            .strip_prefix('[')
            .and_then(|r| r.split_once(']'))
            .and_then(|(digits, tail)| digits.parse::<usize>().ok().map(|i| (i, tail)));
        match parsed {
            Some((index, tail)) if !name.is_empty() => {
                segments.push(PathSegment::Index(index));
                rest = tail;
            }
            _ => return vec![PathSegment::Field(part.to_string())],
        }
    }
    segments
}

impl From<&str> for FieldPath {
    fn from(text: &str) -> Self {
        FieldPath::parse(text)
    }
}

impl From<String> for FieldPath {
    fn from(text: String) -> Self {
        FieldPath::parse(&text)
    }
}

impl fmt::Display for FieldPath {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        for (i, segment) in self.segments.iter().enumerate() {
            match segment {
                PathSegment::Field(name) => {
                    if i > 0 {
                        f.write_str(".")?;
                    }
                    f.write_str(name)?;
                }
                PathSegment::Index(index) => write!(f, "[{}]", index)?,
            }
        }
        Ok(())
    }
}
