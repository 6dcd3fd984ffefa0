//! # Attribute Globs
//!
//! A single attribute pattern: an optional negation marker followed by a
//! dotted property path. Each segment is a literal or holds one `*`
//! wildcard, read as `prefix*suffix`.

use std::fmt;
use std::str::FromStr;

use crate::error::{GlobError, GlobResult};

/// A parsed attribute glob.
///
/// # Example
///
/// ```
/// use acl_glob::AttributeGlob;
///
/// let glob = AttributeGlob::parse("!user.password").unwrap();
/// assert!(glob.is_negated());
/// assert!(glob.matches_path(&["user", "password"]));
/// assert!(!glob.matches_path(&["user", "name"]));
/// assert_eq!(glob.to_string(), "!user.password");
/// ```
#[derive(Debug, Clone, PartialEq, Eq, Hash)]
pub struct AttributeGlob {
    negated: bool,
    segments: Vec<String>,
}

impl AttributeGlob {
    /// Parse a glob such as `*`, `title`, `user.*` or `!secret`.
    ///
    /// # Errors
    ///
    /// Returns `GlobError::EmptyPattern` for blank patterns,
    /// `GlobError::EmptySegment` for paths like `a..b` and
    /// `GlobError::RepeatedWildcard` for segments like `*a*`.
    pub fn parse(raw: &str) -> GlobResult<Self> {
        let trimmed = raw.trim();
        let (negated, body) = match trimmed.strip_prefix('!') {
            Some(rest) => (true, rest.trim()),
            None => (false, trimmed),
        };

        if body.is_empty() {
            return Err(GlobError::EmptyPattern(raw.to_string()));
        }

        let segments: Vec<String> = body.split('.').map(str::to_string).collect();
        if segments.iter().any(|s| s.is_empty()) {
            return Err(GlobError::EmptySegment(raw.to_string()));
        }
        if segments.iter().any(|s| s.matches('*').count() > 1) {
            return Err(GlobError::RepeatedWildcard(raw.to_string()));
        }

        Ok(Self { negated, segments })
    }

    /// Whether this is an exclusion (`!pattern`).
    pub fn is_negated(&self) -> bool {
        self.negated
    }

    /// The dotted path segments, without the negation marker.
    pub fn segments(&self) -> &[String] {
        &self.segments
    }

    /// Number of path segments.
    pub fn depth(&self) -> usize {
        self.segments.len()
    }

    /// Whether no segment contains a wildcard.
    pub fn is_literal(&self) -> bool {
        self.segments.iter().all(|s| !s.contains('*'))
    }

    /// Ranking used when several globs match the same path; greater wins.
    ///
    /// Deeper globs beat shallower ones, then globs with more literal
    /// segments, then globs with more fixed characters around their
    /// wildcards (`tag_*` beats `*`), then a negation beats a positive glob.
    /// A glob matching a strict subset of another's paths always ranks
    /// higher, ignoring negation.
    pub fn specificity(&self) -> (usize, usize, usize, bool) {
        let mut literals = 0;
        let mut fixed = 0;
        for segment in &self.segments {
            match split_wildcard(segment) {
                Some((prefix, suffix)) => fixed += prefix.len() + suffix.len(),
                None => literals += 1,
            }
        }
        (self.depth(), literals, fixed, self.negated)
    }

    /// Check whether the glob matches a concrete property path.
    ///
    /// Matching is by prefix: `user` matches `user` and `user.name`.
    pub fn matches_path<S: AsRef<str>>(&self, path: &[S]) -> bool {
        path.len() >= self.segments.len() && self.matches_prefix(path)
    }

    /// Check whether the leading segments of this glob match every segment
    /// of `path`, i.e. the glob may apply to something nested under `path`.
    pub(crate) fn matches_prefix<S: AsRef<str>>(&self, path: &[S]) -> bool {
        self.segments
            .iter()
            .zip(path)
            .all(|(pattern, segment)| wildcard_match(pattern, segment.as_ref()))
    }

    /// Check whether this glob matches every path that `other` matches,
    /// ignoring negation on both sides.
    pub(crate) fn covers(&self, other: &AttributeGlob) -> bool {
        other.depth() >= self.depth()
            && self
                .segments
                .iter()
                .zip(&other.segments)
                .all(|(mine, theirs)| covers_segment(mine, theirs))
    }

    /// Disjoint globs that together match exactly the paths matched by both
    /// `self` and `other`. Empty when no path matches both. The results are
    /// never negated.
    pub(crate) fn meet(&self, other: &AttributeGlob) -> Vec<AttributeGlob> {
        let (long, short) = if self.depth() >= other.depth() {
            (self, other)
        } else {
            (other, self)
        };

        let mut partials: Vec<Vec<String>> = vec![Vec::with_capacity(long.depth())];
        for (idx, segment) in long.segments.iter().enumerate() {
            let choices = match short.segments.get(idx) {
                Some(theirs) => meet_segment(segment, theirs),
                None => vec![segment.clone()],
            };
            partials = partials
                .iter()
                .flat_map(|head| {
                    choices.iter().map(move |choice| {
                        let mut next = head.clone();
                        next.push(choice.clone());
                        next
                    })
                })
                .collect();
        }

        partials
            .into_iter()
            .map(|segments| AttributeGlob {
                negated: false,
                segments,
            })
            .collect()
    }

    /// This glob without its negation marker.
    pub(crate) fn body(&self) -> AttributeGlob {
        self.with_negation(false)
    }

    pub(crate) fn with_negation(&self, negated: bool) -> AttributeGlob {
        AttributeGlob {
            negated,
            segments: self.segments.clone(),
        }
    }
}

impl fmt::Display for AttributeGlob {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        if self.negated {
            f.write_str("!")?;
        }
        f.write_str(&self.segments.join("."))
    }
}

impl FromStr for AttributeGlob {
    type Err = GlobError;

    fn from_str(s: &str) -> GlobResult<Self> {
        Self::parse(s)
    }
}

/// `Some((prefix, suffix))` for a wildcard segment, `None` for a literal.
fn split_wildcard(segment: &str) -> Option<(&str, &str)> {
    segment.split_once('*')
}

fn covers_segment(mine: &str, theirs: &str) -> bool {
    match (split_wildcard(mine), split_wildcard(theirs)) {
        (None, None) => mine == theirs,
        (None, Some(_)) => false,
        (Some(_), None) => wildcard_match(mine, theirs),
        (Some((prefix, suffix)), Some((their_prefix, their_suffix))) => {
            their_prefix.starts_with(prefix) && their_suffix.ends_with(suffix)
        }
    }
}

/// Disjoint segment patterns matching exactly the strings both match.
fn meet_segment(a: &str, b: &str) -> Vec<String> {
    match (split_wildcard(a), split_wildcard(b)) {
        (None, None) if a == b => vec![a.to_string()],
        (None, None) => Vec::new(),
        (None, Some(_)) if wildcard_match(b, a) => vec![a.to_string()],
        (Some(_), None) if wildcard_match(a, b) => vec![b.to_string()],
        (None, Some(_)) | (Some(_), None) => Vec::new(),
        (Some((p1, s1)), Some((p2, s2))) => meet_wildcards((p1, s1), (p2, s2)),
    }
}

/// Intersection of `p1*s1` and `p2*s2`: `prefix*suffix` built from the longer
/// prefix and suffix, plus the shorter literals where that prefix and suffix
/// overlap.
fn meet_wildcards((p1, s1): (&str, &str), (p2, s2): (&str, &str)) -> Vec<String> {
    let prefix = match (p1.starts_with(p2), p2.starts_with(p1)) {
        (true, _) => p1,
        (_, true) => p2,
        _ => return Vec::new(),
    };
    let suffix = match (s1.ends_with(s2), s2.ends_with(s1)) {
        (true, _) => s1,
        (_, true) => s2,
        _ => return Vec::new(),
    };

    let full = prefix.len() + suffix.len();
    let shortest = (p1.len() + s1.len()).max(p2.len() + s2.len());

    let mut pieces = vec![format!("{}*{}", prefix, suffix)];
    for len in shortest..full {
        let overlap = full - len;
        if overlap > prefix.len() || overlap > suffix.len() {
            continue;
        }
        let shared = (prefix.get(prefix.len() - overlap..), suffix.get(..overlap), suffix.get(overlap..));
        if let (Some(tail), Some(head), Some(rest)) = shared {
            if tail == head {
                pieces.push(format!("{}{}", prefix, rest));
            }
        }
    }
    pieces
}

/// Iterative single-segment wildcard match. `*` matches any run of characters,
/// including an empty one.
fn wildcard_match(pattern: &str, text: &str) -> bool {
    let pattern = pattern.as_bytes();
    let text = text.as_bytes();

    let mut p_idx = 0;
    let mut t_idx = 0;
    let mut star_idx: Option<usize> = None;
    let mut match_idx = 0;

    while let Some(text_char) = text.get(t_idx).copied() {
        match pattern.get(p_idx).copied() {
            Some(b'*') => {
                star_idx = Some(p_idx);
                match_idx = t_idx;
                p_idx += 1;
            }
            Some(c) if c == text_char => {
                p_idx += 1;
                t_idx += 1;
            }
            _ => match star_idx {
                Some(star) => {
                    p_idx = star + 1;
                    match_idx += 1;
                    t_idx = match_idx;
                }
                None => return false,
            },
        }
    }

    while pattern.get(p_idx).copied() == Some(b'*') {
        p_idx += 1;
    }

    p_idx == pattern.len()
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_parse_positive_and_negated() {
        let glob = AttributeGlob::parse("title").unwrap();
        assert!(!glob.is_negated());
        assert_eq!(glob.segments(), &["title".to_string()]);

        let glob = AttributeGlob::parse(" ! user.secret ").unwrap();
        assert!(glob.is_negated());
        assert_eq!(glob.depth(), 2);
        assert_eq!(glob.to_string(), "!user.secret");
    }

    #[test]
    fn test_parse_rejects_empty() {
        assert_eq!(
            AttributeGlob::parse(""),
            Err(GlobError::EmptyPattern(String::new()))
        );
        assert!(matches!(AttributeGlob::parse("!"), Err(GlobError::EmptyPattern(_))));
        assert!(matches!(AttributeGlob::parse("a..b"), Err(GlobError::EmptySegment(_))));
        assert!(matches!(AttributeGlob::parse("a."), Err(GlobError::EmptySegment(_))));
        assert!(matches!(AttributeGlob::parse("*a*"), Err(GlobError::RepeatedWildcard(_))));
        assert!(matches!(AttributeGlob::parse("a.**"), Err(GlobError::RepeatedWildcard(_))));
    }

    #[test]
    fn test_matches_path_by_prefix() {
        let glob = AttributeGlob::parse("user").unwrap();
        assert!(glob.matches_path(&["user"]));
        assert!(glob.matches_path(&["user", "name"]));
        assert!(!glob.matches_path(&["username"]));

        let nested = AttributeGlob::parse("user.name").unwrap();
        assert!(!nested.matches_path(&["user"]));
    }

    #[test]
    fn test_segment_wildcards() {
        let glob = AttributeGlob::parse("meta.tag_*").unwrap();
        assert!(glob.matches_path(&["meta", "tag_a"]));
        assert!(glob.matches_path(&["meta", "tag_"]));
        assert!(!glob.matches_path(&["meta", "label"]));

        let star = AttributeGlob::parse("*").unwrap();
        assert!(star.matches_path(&["anything"]));
        assert!(star.matches_path(&["deep", "path"]));
    }

    #[test]
    fn test_wildcard_match() {
        assert!(wildcard_match("*", ""));
        assert!(wildcard_match("a*c", "abbbc"));
        assert!(wildcard_match("*b*", "abc"));
        assert!(!wildcard_match("a*c", "abd"));
        assert!(!wildcard_match("abc", "ab"));
    }

    #[test]
    fn test_specificity_ordering() {
        let star = AttributeGlob::parse("*").unwrap();
        let title = AttributeGlob::parse("title").unwrap();
        let not_title = AttributeGlob::parse("!title").unwrap();
        let nested = AttributeGlob::parse("*.title").unwrap();

        assert!(title.specificity() > star.specificity());
        assert!(not_title.specificity() > title.specificity());
        assert!(nested.specificity() > not_title.specificity());

        let tag = AttributeGlob::parse("tag_*").unwrap();
        let not_tag_x = AttributeGlob::parse("!tag_*x").unwrap();
        assert!(tag.specificity() > star.specificity());
        assert!(not_tag_x.specificity() > tag.specificity());
        assert!(title.specificity() > not_tag_x.specificity());
    }

    #[test]
    fn test_covers() {
        let star = AttributeGlob::parse("*").unwrap();
        let user = AttributeGlob::parse("user").unwrap();
        let any_secret = AttributeGlob::parse("*.secret").unwrap();
        let user_secret = AttributeGlob::parse("user.secret").unwrap();

        assert!(star.covers(&user));
        assert!(star.covers(&any_secret));
        assert!(user.covers(&user_secret));
        assert!(any_secret.covers(&user_secret));
        assert!(!user_secret.covers(&any_secret));
        assert!(!user.covers(&star));

        let prefixed = AttributeGlob::parse("a*").unwrap();
        let both = AttributeGlob::parse("a*b").unwrap();
        let suffixed = AttributeGlob::parse("*b").unwrap();
        assert!(prefixed.covers(&both));
        assert!(suffixed.covers(&both));
        assert!(star.covers(&prefixed));
        assert!(!prefixed.covers(&suffixed));
        assert!(!both.covers(&prefixed));
    }

    #[test]
    fn test_meet() {
        let parse = |s: &str| AttributeGlob::parse(s).unwrap();

        assert_eq!(parse("*").meet(&parse("title")), vec![parse("title")]);
        assert_eq!(parse("a.*").meet(&parse("*.b")), vec![parse("a.b")]);
        assert_eq!(parse("user").meet(&parse("*.secret")), vec![parse("user.secret")]);
        assert_eq!(parse("!a").meet(&parse("a.b")), vec![parse("a.b")]);
        assert_eq!(parse("a").meet(&parse("b")), Vec::new());
        assert_eq!(parse("tag_*").meet(&parse("tag_x")), vec![parse("tag_x")]);
    }

    #[test]
    fn test_meet_partial_wildcards() {
        let parse = |s: &str| AttributeGlob::parse(s).unwrap();

        assert_eq!(parse("a*").meet(&parse("*b")), vec![parse("a*b")]);
        assert_eq!(parse("a*").meet(&parse("*a")), vec![parse("a*a"), parse("a")]);
        assert_eq!(parse("ab*").meet(&parse("a*")), vec![parse("ab*")]);
        assert_eq!(parse("ab*").meet(&parse("b*")), Vec::new());
        assert_eq!(
            parse("ab*").meet(&parse("*bc")),
            vec![parse("ab*bc"), parse("abc")]
        );
        assert_eq!(parse("x.a*").meet(&parse("*.*b")), vec![parse("x.a*b")]);
    }
}
