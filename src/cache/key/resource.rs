use std::fmt;

//
// ResourcePath
//

/// Tokenized URL path.
///
/// Only the path segments are kept: scheme, authority, query and fragment are dropped, as are
/// empty segments. This allows resource relationships to be tested on segment boundaries
/// rather than on raw substrings, e.g. "/clusters" is related to "/clusters/1" but not to
/// "/clustersets" or "/clusters10".
#[derive(Clone, Debug, Default, Eq, Hash, PartialEq)]
pub struct ResourcePath {
    /// Segments.
    pub segments: Vec<String>,
}

impl ResourcePath {
    /// Parse a URL, an absolute path, or a relative path.
    pub fn parse(url: &str) -> Self {
        // Drop fragment and query
        let url = url.split('#').next().unwrap_or_default();
        let url = url.split('?').next().unwrap_or_default();

        // Drop scheme and authority
        let path = match url.find("://") {
            Some(index) => {
                let rest = &url[index + 3..];
                match rest.find('/') {
                    Some(slash) => &rest[slash..],
                    None => "",
                }
            }

            None => url,
        };

        Self {
            segments: path
                .split('/')
                .filter(|segment| !segment.is_empty())
                .map(|segment| segment.into())
                .collect(),
        }
    }

    /// True if there are no segments.
    pub fn is_empty(&self) -> bool {
        self.segments.is_empty()
    }

    /// True if we start with all of the other's segments.
    pub fn starts_with(&self, prefix: &ResourcePath) -> bool {
        self.segments.starts_with(&prefix.segments)
    }

    /// True if all of the other's segments appear in us as a contiguous run.
    ///
    /// An empty path is contained in nothing.
    pub fn contains(&self, resource: &ResourcePath) -> bool {
        if resource.is_empty() {
            return false;
        }

        self.segments
            .windows(resource.segments.len())
            .any(|window| window == resource.segments.as_slice())
    }
}

impl From<&str> for ResourcePath {
    fn from(url: &str) -> Self {
        Self::parse(url)
    }
}

impl fmt::Display for ResourcePath {
    fn fmt(&self, formatter: &mut fmt::Formatter) -> fmt::Result {
        for segment in &self.segments {
            write!(formatter, "/{}", segment)?;
        }
        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn parse_drops_origin_query_and_empty_segments() {
        let path = ResourcePath::parse("https://api.example.com:8443/api//dashboard/clusters/owned?x=1#top");
        assert_eq!(path.to_string(), "/api/dashboard/clusters/owned");

        assert_eq!(ResourcePath::parse("https://api.example.com").segments.len(), 0);
        assert_eq!(ResourcePath::parse("dashboard/projects").to_string(), "/dashboard/projects");
    }

    #[test]
    fn contains_respects_segment_boundaries() {
        let key = ResourcePath::parse("https://api/v1/dashboard/clusters/owned");
        assert!(key.contains(&"/dashboard/clusters".into()));
        assert!(key.contains(&"/clusters/owned".into()));
        assert!(!key.contains(&"/dashboard/cluster".into()));
        assert!(!key.contains(&"/clusters/dashboard".into()));

        let sets = ResourcePath::parse("https://api/v1/dashboard/clustersets");
        assert!(!sets.contains(&"/dashboard/clusters".into()));

        let teamspace = ResourcePath::parse("/dashboard/teamspaces/1/clusters");
        assert!(!teamspace.contains(&"/dashboard/clusters".into()));
    }

    #[test]
    fn empty_resource_matches_nothing() {
        let key = ResourcePath::parse("/dashboard");
        assert!(!key.contains(&ResourcePath::default()));
        assert!(key.starts_with(&ResourcePath::default()));
    }
}
