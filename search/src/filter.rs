use std::collections::HashSet;

/// Pathnames excluded from the search and recency surfaces.
///
/// Some file and directory names are pure aggregation artifacts (re-export
/// barrels); they stay in the index for routing but never surface in search.
/// Matching is by lowercased final path segment.
#[derive(Debug, Clone)]
pub struct ExcludedPathnames {
    segments: HashSet<String>,
}

impl Default for ExcludedPathnames {
    fn default() -> Self {
        Self::new(["tsl-base", "nodes", "tsl"])
    }
}

impl ExcludedPathnames {
    pub fn new<I, S>(segments: I) -> Self
    where
        I: IntoIterator<Item = S>,
        S: Into<String>,
    {
        Self {
            segments: segments
                .into_iter()
                .map(|segment| segment.into().to_lowercase())
                .collect(),
        }
    }

    /// No exclusions at all; useful for tests and alternate surfaces.
    pub fn none() -> Self {
        Self {
            segments: HashSet::new(),
        }
    }

    pub fn is_excluded(&self, pathname: &str) -> bool {
        match pathname.rsplit('/').next() {
            Some(last) if !last.is_empty() => self.segments.contains(&last.to_lowercase()),
            _ => false,
        }
    }
}
