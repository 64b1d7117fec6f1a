//! Node identity values: names, path segments, paths, and locations.
//!
//! A [`Location`] is the identity of one matched node in one result row. Its
//! path drives the structural sort keys (depth, path, name, local name).

use std::fmt;
use std::str::FromStr;

use serde::{Deserialize, Serialize};
use smallvec::SmallVec;

use super::{NodeId, QuiverError, Result};

/// Qualified node or property name with an optional namespace prefix.
#[derive(Clone, Debug, Eq, PartialEq, Ord, PartialOrd, Hash, Serialize, Deserialize)]
pub struct Name {
    /// Namespace prefix, if any.
    pub namespace: Option<String>,
    /// Local part of the name.
    pub local: String,
}

impl Name {
    /// Creates a name without a namespace.
    pub fn new(local: impl Into<String>) -> Self {
        Self {
            namespace: None,
            local: local.into(),
        }
    }

    /// Creates a namespaced name.
    pub fn qualified(namespace: impl Into<String>, local: impl Into<String>) -> Self {
        Self {
            namespace: Some(namespace.into()),
            local: local.into(),
        }
    }
}

impl FromStr for Name {
    type Err = QuiverError;

    fn from_str(s: &str) -> Result<Self> {
        if s.is_empty() {
            return Err(QuiverError::invalid("name cannot be empty"));
        }
        match s.split_once(':') {
            Some((ns, local)) if !ns.is_empty() && !local.is_empty() => {
                Ok(Name::qualified(ns, local))
            }
            Some(_) => Err(QuiverError::invalid(format!("malformed name '{s}'"))),
            None => Ok(Name::new(s)),
        }
    }
}

impl fmt::Display for Name {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match &self.namespace {
            Some(ns) => write!(f, "{ns}:{}", self.local),
            None => f.write_str(&self.local),
        }
    }
}

/// One path segment: a name plus its 1-based same-name-sibling index.
#[derive(Clone, Debug, Eq, PartialEq, Ord, PartialOrd, Hash, Serialize, Deserialize)]
pub struct Segment {
    /// Segment name.
    pub name: Name,
    /// Same-name-sibling index, starting at 1.
    pub index: u32,
}

impl Segment {
    /// Creates a segment with the default index of 1.
    pub fn new(name: Name) -> Self {
        Self { name, index: 1 }
    }

    /// Creates a segment with an explicit same-name-sibling index.
    pub fn with_index(name: Name, index: u32) -> Self {
        Self { name, index }
    }
}

impl FromStr for Segment {
    type Err = QuiverError;

    fn from_str(s: &str) -> Result<Self> {
        let Some(open) = s.find('[') else {
            return Ok(Segment::new(s.parse()?));
        };
        let index = s[open..]
            .strip_prefix('[')
            .and_then(|rest| rest.strip_suffix(']'))
            .and_then(|digits| digits.parse::<u32>().ok())
            .filter(|idx| *idx >= 1)
            .ok_or_else(|| QuiverError::invalid(format!("malformed segment index in '{s}'")))?;
        Ok(Segment::with_index(s[..open].parse()?, index))
    }
}

impl fmt::Display for Segment {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        if self.index > 1 {
            write!(f, "{}[{}]", self.name, self.index)
        } else {
            write!(f, "{}", self.name)
        }
    }
}

/// Absolute path from the repository root to a node.
#[derive(Clone, Debug, Default, Eq, PartialEq, Ord, PartialOrd, Hash, Serialize, Deserialize)]
pub struct Path {
    segments: SmallVec<[Segment; 8]>,
}

impl Path {
    /// The root path `/`.
    pub fn root() -> Self {
        Self::default()
    }

    /// Builds a path from already-parsed segments.
    pub fn from_segments(segments: impl IntoIterator<Item = Segment>) -> Self {
        Self {
            segments: segments.into_iter().collect(),
        }
    }

    /// Returns a child path with `segment` appended.
    pub fn child(&self, segment: Segment) -> Self {
        let mut segments = self.segments.clone();
        segments.push(segment);
        Self { segments }
    }

    /// Returns true for the root path.
    pub fn is_root(&self) -> bool {
        self.segments.is_empty()
    }

    /// Number of segments below the root.
    pub fn depth(&self) -> usize {
        self.segments.len()
    }

    /// Segments from the root down.
    pub fn segments(&self) -> &[Segment] {
        &self.segments
    }

    /// Last segment, or `None` for the root.
    pub fn last_segment(&self) -> Option<&Segment> {
        self.segments.last()
    }

    /// Parent path, or `None` for the root.
    pub fn parent(&self) -> Option<Path> {
        if self.is_root() {
            return None;
        }
        let mut segments = self.segments.clone();
        segments.pop();
        Some(Self { segments })
    }
}

impl FromStr for Path {
    type Err = QuiverError;

    fn from_str(s: &str) -> Result<Self> {
        let rest = s
            .strip_prefix('/')
            .ok_or_else(|| QuiverError::invalid(format!("path '{s}' must be absolute")))?;
        if rest.is_empty() {
            return Ok(Path::root());
        }
        let segments = rest
            .split('/')
            .map(|part| {
                if part.is_empty() {
                    Err(QuiverError::invalid(format!("path '{s}' has an empty segment")))
                } else {
                    part.parse::<Segment>()
                }
            })
            .collect::<Result<SmallVec<[Segment; 8]>>>()?;
        Ok(Self { segments })
    }
}

impl fmt::Display for Path {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        if self.is_root() {
            return f.write_str("/");
        }
        for segment in &self.segments {
            write!(f, "/{segment}")?;
        }
        Ok(())
    }
}

/// Identity of a matched node: its path plus an optional connector id.
#[derive(Clone, Debug, Eq, PartialEq, Ord, PartialOrd, Hash, Serialize, Deserialize)]
pub struct Location {
    /// Path of the node.
    pub path: Path,
    /// Stable identifier, when the connector supplies one.
    pub id: Option<NodeId>,
}

impl Location {
    /// Creates a location from a path alone.
    pub fn new(path: Path) -> Self {
        Self { path, id: None }
    }

    /// Creates a location carrying both path and id.
    pub fn with_id(path: Path, id: NodeId) -> Self {
        Self { path, id: Some(id) }
    }

    /// Parses `path` and wraps it in a location.
    pub fn parse(path: &str) -> Result<Self> {
        Ok(Self::new(path.parse()?))
    }

    /// Number of path segments below the root.
    pub fn depth(&self) -> usize {
        self.path.depth()
    }

    /// Last path segment including its same-name-sibling index.
    pub fn name(&self) -> Option<&Segment> {
        self.path.last_segment()
    }

    /// Local part of the last segment's name, or `""` for the root.
    pub fn local_name(&self) -> &str {
        self.path
            .last_segment()
            .map(|segment| segment.name.local.as_str())
            .unwrap_or("")
    }
}

impl fmt::Display for Location {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self.id {
            Some(id) => write!(f, "{} (id {id})", self.path),
            None => write!(f, "{}", self.path),
        }
    }
}
