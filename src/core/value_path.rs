use crate::error::PathError;
use serde::{Serialize, Serializer};
use serde_json::{Map, Value};
use std::fmt;

#[derive(Debug, Clone, PartialEq, Eq, Hash)]
pub enum PathSegment {
    Key(String),
    Index(usize),
}

/// Dotted/indexed field path such as `Events[2].Date`.
///
/// Keys are written bare; a key that would be ambiguous (empty, padded with
/// whitespace, or holding `.`, `[` or `]`) is written as `["key"]` so the
/// path parses back.
#[derive(Debug, Clone, PartialEq, Eq, Hash, Default)]
pub struct ValuePath {
    segments: Vec<PathSegment>,
}

impl ValuePath {
    pub fn new(segments: Vec<PathSegment>) -> Self {
        Self { segments }
    }

    pub fn empty() -> Self {
        Self::default()
    }

    pub fn is_empty(&self) -> bool {
        self.segments.is_empty()
    }

    pub fn segments(&self) -> &[PathSegment] {
        self.segments.as_slice()
    }

    pub fn parse(input: &str) -> Result<Self, PathError> {
        parse_path(input)
    }

    /// Parses a field code, treating a code that is not a valid path as a
    /// single key.
    pub fn from_code(code: &str) -> Self {
        Self::parse(code).unwrap_or_else(|_| Self::new(vec![PathSegment::Key(code.to_string())]))
    }

    pub fn child_key(&self, key: impl Into<String>) -> Self {
        let mut segments = self.segments.clone();
        segments.push(PathSegment::Key(key.into()));
        Self { segments }
    }

    pub fn child_index(&self, index: usize) -> Self {
        let mut segments = self.segments.clone();
        segments.push(PathSegment::Index(index));
        Self { segments }
    }
}

impl fmt::Display for ValuePath {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        for (idx, segment) in self.segments.iter().enumerate() {
            match segment {
                PathSegment::Key(key) if needs_quoting(key) => {
                    f.write_str("[\"")?;
                    f.write_str(key.replace('\\', "\\\\").replace('"', "\\\"").as_str())?;
                    f.write_str("\"]")?;
                }
                PathSegment::Key(key) => {
                    if idx > 0 {
                        f.write_str(".")?;
                    }
                    f.write_str(key)?;
                }
                PathSegment::Index(index) => {
                    write!(f, "[{index}]")?;
                }
            }
        }
        Ok(())
    }
}

impl Serialize for ValuePath {
    fn serialize<S: Serializer>(&self, serializer: S) -> Result<S::Ok, S::Error> {
        serializer.collect_str(self)
    }
}

fn parse_path(input: &str) -> Result<ValuePath, PathError> {
    if input.is_empty() {
        return Ok(ValuePath::empty());
    }

    let chars: Vec<char> = input.chars().collect();
    let mut idx = 0usize;
    let mut out = Vec::<PathSegment>::new();

    while idx < chars.len() {
        let ch = chars[idx];
        if ch == '.' {
            if out.is_empty() {
                return Err(PathError::new("path cannot start with '.'"));
            }
            idx += 1;
            let key = parse_key(&chars, &mut idx)?;
            out.push(PathSegment::Key(key));
            continue;
        }

        if ch == '[' {
            let segment = parse_bracket_segment(&chars, &mut idx)?;
            out.push(segment);
            continue;
        }

        if out.is_empty() {
            let key = parse_key(&chars, &mut idx)?;
            out.push(PathSegment::Key(key));
            continue;
        }

        return Err(PathError::new(format!(
            "unexpected character '{}' at position {}",
            ch, idx
        )));
    }

    Ok(ValuePath::new(out))
}

fn parse_key(chars: &[char], idx: &mut usize) -> Result<String, PathError> {
    let start = *idx;
    while *idx < chars.len() {
        let ch = chars[*idx];
        if ch == '.' || ch == '[' || ch == ']' {
            break;
        }
        *idx += 1;
    }
    if *idx == start {
        return Err(PathError::new(format!("expected key at position {}", start)));
    }
    Ok(chars[start..*idx].iter().collect::<String>())
}

fn parse_bracket_segment(chars: &[char], idx: &mut usize) -> Result<PathSegment, PathError> {
    if chars.get(*idx).copied() != Some('[') {
        return Err(PathError::new("expected '['"));
    }
    *idx += 1;
    if *idx >= chars.len() {
        return Err(PathError::new("unterminated '[' segment"));
    }

    let ch = chars[*idx];
    if ch == '"' || ch == '\'' {
        let quote = ch;
        *idx += 1;
        let mut key = String::new();
        let mut closed = false;
        while *idx < chars.len() {
            let c = chars[*idx];
            *idx += 1;
            if c == '\\' {
                let Some(next) = chars.get(*idx).copied() else {
                    return Err(PathError::new("unterminated escape in quoted key"));
                };
                key.push(next);
                *idx += 1;
                continue;
            }
            if c == quote {
                closed = true;
                break;
            }
            key.push(c);
        }
        if !closed {
            return Err(PathError::new("unterminated quoted key"));
        }
        if chars.get(*idx).copied() != Some(']') {
            return Err(PathError::new("expected closing ']'"));
        }
        *idx += 1;
        return Ok(PathSegment::Key(key));
    }

    let start = *idx;
    while *idx < chars.len() && chars[*idx] != ']' {
        *idx += 1;
    }
    if *idx >= chars.len() {
        return Err(PathError::new("unterminated '[' segment"));
    }
    let raw = chars[start..*idx].iter().collect::<String>();
    *idx += 1;
    if raw.trim().is_empty() {
        return Err(PathError::new("empty bracket segment"));
    }
    if let Ok(index) = raw.trim().parse::<usize>() {
        return Ok(PathSegment::Index(index));
    }
    Ok(PathSegment::Key(raw))
}

fn needs_quoting(key: &str) -> bool {
    key.is_empty() || key.trim() != key || key.contains(['.', '[', ']'])
}

fn container_for_next(next: Option<&PathSegment>) -> Value {
    match next {
        Some(PathSegment::Index(_)) => Value::Array(Vec::new()),
        Some(PathSegment::Key(_)) => Value::Object(Map::new()),
        None => Value::Null,
    }
}

/// Walks `path` inside `root`, replacing mismatched containers and creating
/// missing ones, and returns the slot at the end of the path.
pub fn ensure_value_path_mut<'a>(root: &'a mut Value, path: &ValuePath) -> &'a mut Value {
    let segments = path.segments();
    let mut current = root;
    for (idx, segment) in segments.iter().enumerate() {
        let next = segments.get(idx + 1);
        match segment {
            PathSegment::Key(key) => {
                if !current.is_object() {
                    *current = Value::Object(Map::new());
                }
                let Value::Object(map) = current else {
                    continue;
                };
                current = map
                    .entry(key.clone())
                    .or_insert_with(|| container_for_next(next));
            }
            PathSegment::Index(index) => {
                if !current.is_array() {
                    *current = Value::Array(Vec::new());
                }
                let Value::Array(list) = current else {
                    continue;
                };
                if list.len() <= *index {
                    list.resize_with(index + 1, || Value::Null);
                }
                if list[*index].is_null() {
                    list[*index] = container_for_next(next);
                }
                current = &mut list[*index];
            }
        }
    }
    current
}
