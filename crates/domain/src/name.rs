use std::fmt;

/// A DNS name, stored as lowercase-canonicalized labels, most-specific
/// label first (so `www.example.com` is `["www", "example", "com"]`).
///
/// Comparison and hashing operate on the canonical (lowercased) form, the
/// same convention the wire-format builders in the DNSSEC crate use when
/// turning a name into the bytes a signature covers. Ordering follows
/// RFC 4034 §6.1 canonical name order: labels are compared starting from
/// the root end, not the owner end, so `a.example.` sorts before
/// `z.example.` but `z.example.` also sorts before `a.b.example.` (the
/// shorter name is a "prefix" from the root's perspective only once all
/// shared labels match).
#[derive(Debug, Clone, PartialEq, Eq, Hash)]
pub struct Name {
    labels: Vec<String>,
}

impl PartialOrd for Name {
    fn partial_cmp(&self, other: &Self) -> Option<std::cmp::Ordering> {
        Some(self.cmp(other))
    }
}

impl Ord for Name {
    fn cmp(&self, other: &Self) -> std::cmp::Ordering {
        let a = self.labels.iter().rev();
        let b = other.labels.iter().rev();
        a.cmp(b)
    }
}

impl Name {
    /// Parses a presentation-format name (`www.example.com` or
    /// `www.example.com.`), canonicalizing to lowercase.
    pub fn parse(s: &str) -> Self {
        let trimmed = s.strip_suffix('.').unwrap_or(s);
        if trimmed.is_empty() {
            return Name { labels: Vec::new() };
        }
        let labels = trimmed
            .split('.')
            .map(|label| label.to_lowercase())
            .collect();
        Name { labels }
    }

    pub fn root() -> Self {
        Name { labels: Vec::new() }
    }

    pub fn is_root(&self) -> bool {
        self.labels.is_empty()
    }

    pub fn labels(&self) -> &[String] {
        &self.labels
    }

    pub fn label_count(&self) -> usize {
        self.labels.len()
    }

    /// The immediate parent name, or `None` for the root.
    pub fn parent(&self) -> Option<Name> {
        if self.labels.is_empty() {
            None
        } else {
            Some(Name {
                labels: self.labels[1..].to_vec(),
            })
        }
    }

    /// All ancestors from the immediate parent up to (and including) the
    /// root, nearest first.
    pub fn ancestors(&self) -> Vec<Name> {
        let mut out = Vec::new();
        let mut cur = self.clone();
        while let Some(p) = cur.parent() {
            out.push(p.clone());
            cur = p;
        }
        out
    }

    /// True if `self` is equal to or a subdomain of `other`.
    pub fn is_subdomain_of(&self, other: &Name) -> bool {
        if other.labels.len() > self.labels.len() {
            return false;
        }
        let offset = self.labels.len() - other.labels.len();
        self.labels[offset..] == other.labels[..]
    }

    /// True if `self` is a strict subdomain of `other`.
    pub fn is_strict_subdomain_of(&self, other: &Name) -> bool {
        self.labels.len() > other.labels.len() && self.is_subdomain_of(other)
    }

    /// Replaces the leftmost label with `*`, producing the wildcard name
    /// for this owner name's parent (e.g. `a.example.com` -> `*.example.com`).
    pub fn wildcard(&self) -> Name {
        let mut labels = self.labels.clone();
        if !labels.is_empty() {
            labels[0] = "*".to_string();
        } else {
            labels.push("*".to_string());
        }
        Name { labels }
    }

    /// Prepends `label` to `parent`, e.g. `from_text("*", example.com)` ->
    /// `*.example.com`. The general form of `wildcard()` for building a
    /// name under an arbitrary ancestor, not just the direct parent.
    pub fn from_text(label: &str, parent: &Name) -> Name {
        let mut labels = vec![label.to_lowercase()];
        labels.extend(parent.labels.iter().cloned());
        Name { labels }
    }

    /// The last `n` labels of this name, i.e. this name truncated to an
    /// `n`-label suffix counted from the root end (e.g. `labels_from_end(2)`
    /// on `a.b.example.com` yields `example.com`). Used to compute a
    /// next-closer name from a query name and an encloser's label count.
    pub fn labels_from_end(&self, n: usize) -> Name {
        let start = self.labels.len().saturating_sub(n);
        Name {
            labels: self.labels[start..].to_vec(),
        }
    }

    /// True if this name's leftmost label is the wildcard label `*`.
    pub fn is_wildcard(&self) -> bool {
        self.labels.first().map(|l| l.as_str()) == Some("*")
    }

    /// Number of labels a signature's RRSIG `labels` field would claim for
    /// this owner name, per RFC 4034 §3.1.3 (the root counts as zero).
    pub fn signer_label_count(&self) -> u8 {
        self.labels.len() as u8
    }

    pub fn to_canonical_string(&self) -> String {
        if self.labels.is_empty() {
            ".".to_string()
        } else {
            format!("{}.", self.labels.join("."))
        }
    }
}

impl fmt::Display for Name {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.to_canonical_string())
    }
}
