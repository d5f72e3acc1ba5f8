//! In-memory representation of a Cobertura coverage report. The loader
//! produces a `CoverageDocument` which the normalizer, badge and summary
//! renderers each consume independently.
//!
//! Attribute values are kept as raw strings in source order: the normalizer
//! re-serializes the tree and must not reformat numbers or shuffle
//! attributes it does not touch.

/// An ordered attribute list. Unlike a hash map, iteration preserves the
/// relative order the attributes appeared in the source document, which the
/// canonical serializer depends on.
#[derive(Debug, Clone, Default, PartialEq)]
pub struct Attrs(Vec<(String, String)>);

impl Attrs {
    pub fn new() -> Self {
        Self::default()
    }

    #[must_use]
    pub fn get(&self, key: &str) -> Option<&str> {
        self.0
            .iter()
            .find(|(k, _)| k == key)
            .map(|(_, v)| v.as_str())
    }

    /// Set an attribute, replacing it in place if present (keeping its
    /// original position) or appending it otherwise.
    pub fn set(&mut self, key: &str, value: &str) {
        match self.0.iter_mut().find(|(k, _)| k == key) {
            Some((_, v)) => *v = value.to_string(),
            None => self.0.push((key.to_string(), value.to_string())),
        }
    }

    pub fn push(&mut self, key: String, value: String) {
        self.0.push((key, value));
    }

    pub fn iter(&self) -> impl Iterator<Item = (&str, &str)> {
        self.0.iter().map(|(k, v)| (k.as_str(), v.as_str()))
    }

    /// Parse an attribute as a float, defaulting to 0.0 when absent or
    /// unparsable.
    #[must_use]
    pub fn get_f64(&self, key: &str) -> f64 {
        self.get(key)
            .and_then(|v| v.trim().parse::<f64>().ok())
            .unwrap_or(0.0)
    }

    /// Parse an attribute as an integer count. Some generators emit counts
    /// as floating-point strings ("12.0"), so parse as float and truncate.
    #[must_use]
    pub fn get_count(&self, key: &str) -> i64 {
        self.get_f64(key) as i64
    }
}

/// One source line's hit count, e.g. `<line number="12" hits="3"/>`.
/// Extra attributes (`branch`, `condition-coverage`) are carried through.
#[derive(Debug, Clone, Default)]
pub struct LineRecord {
    pub attrs: Attrs,
}

impl LineRecord {
    #[must_use]
    pub fn number(&self) -> Option<u32> {
        self.attrs.get("number").and_then(|v| v.parse().ok())
    }

    /// Hit count, truncated to an integer ("0.0" counts as zero hits).
    #[must_use]
    pub fn hits(&self) -> i64 {
        self.attrs.get_count("hits")
    }
}

/// One source file's coverage entry (a `<class>` element).
#[derive(Debug, Clone, Default)]
pub struct ClassEntry {
    pub attrs: Attrs,
    /// `None` when the class has no `<lines>` element at all, which is
    /// distinct from an empty one for summary rendering.
    pub lines: Option<Vec<LineRecord>>,
}

impl ClassEntry {
    #[must_use]
    pub fn filename(&self) -> &str {
        self.attrs.get("filename").unwrap_or("")
    }

    #[must_use]
    pub fn line_rate(&self) -> f64 {
        self.attrs.get_f64("line-rate")
    }

    #[must_use]
    pub fn branch_rate(&self) -> f64 {
        self.attrs.get_f64("branch-rate")
    }
}

/// A named grouping of classes. After normalization every package holds
/// exactly one class and is named after that class's filename.
#[derive(Debug, Clone, Default)]
pub struct Package {
    pub attrs: Attrs,
    pub classes: Vec<ClassEntry>,
}

/// The root `<coverage>` document.
#[derive(Debug, Clone, Default)]
pub struct CoverageDocument {
    pub attrs: Attrs,
    /// `<sources><source>...</source></sources>` entries, in order.
    pub sources: Vec<String>,
    /// `None` when the `<packages>` container is absent entirely.
    pub packages: Option<Vec<Package>>,
}

impl CoverageDocument {
    /// Iterate every class across every package, package-major.
    pub fn classes(&self) -> impl Iterator<Item = &ClassEntry> {
        self.packages
            .iter()
            .flatten()
            .flat_map(|p| p.classes.iter())
    }

    #[must_use]
    pub fn class_count(&self) -> usize {
        self.classes().count()
    }
}
