//! # Glob Lists
//!
//! Decisions, union and normalization over lists of attribute globs.
//!
//! A list allows a path when the most specific glob matching that path is a
//! positive one. Lists are handled as plain string slices at the API surface
//! so grants can store them verbatim; unparsable globs are ignored.

use std::collections::HashSet;

use crate::pattern::AttributeGlob;

/// Parse every valid glob in `globs`, skipping invalid ones.
pub(crate) fn parse_list<S: AsRef<str>>(globs: &[S]) -> Vec<AttributeGlob> {
    globs
        .iter()
        .filter_map(|g| AttributeGlob::parse(g.as_ref()).ok())
        .collect()
}

/// Decide a concrete path: `Some(allowed)` from the winning glob, `None` when
/// no glob matches.
pub(crate) fn decide<S: AsRef<str>>(globs: &[AttributeGlob], path: &[S]) -> Option<bool> {
    globs
        .iter()
        .filter(|g| g.matches_path(path))
        .max_by_key(|g| g.specificity())
        .map(|g| !g.is_negated())
}

/// Decide a glob body: the sign of the most specific glob covering it.
fn includes<'a, I>(globs: I, target: &AttributeGlob) -> bool
where
    I: IntoIterator<Item = &'a AttributeGlob>,
{
    globs
        .into_iter()
        .filter(|g| g.covers(target))
        .max_by_key(|g| g.specificity())
        .map(|g| !g.is_negated())
        .unwrap_or(false)
}

/// Check whether a dotted property path is allowed by a glob list.
///
/// # Example
///
/// ```
/// use acl_glob::is_allowed;
///
/// let globs = ["*", "!user.password"];
/// assert!(is_allowed(&globs, "user.name"));
/// assert!(!is_allowed(&globs, "user.password"));
/// assert!(!is_allowed(&[] as &[&str], "anything"));
/// ```
pub fn is_allowed<S: AsRef<str>>(globs: &[S], path: &str) -> bool {
    let segments: Vec<&str> = path.split('.').collect();
    decide(&parse_list(globs), segments.as_slice()).unwrap_or(false)
}

/// Union of two glob lists.
///
/// The resulting list allows exactly the paths allowed by either input.
/// Every glob body of both lists, together with the intersections of those
/// bodies, is re-emitted once, negated only when neither input allows it.
/// The list is then normalized.
///
/// # Example
///
/// ```
/// use acl_glob::{is_allowed, union};
///
/// let merged = union(&["*", "!secret"], &["secret"]);
/// assert!(is_allowed(&merged, "secret"));
/// assert!(is_allowed(&merged, "title"));
///
/// let merged = union(&["title"], &["body"]);
/// assert!(is_allowed(&merged, "title"));
/// assert!(is_allowed(&merged, "body"));
/// assert!(!is_allowed(&merged, "secret"));
/// ```
pub fn union<A: AsRef<str>, B: AsRef<str>>(a: &[A], b: &[B]) -> Vec<String> {
    let a = parse_list(a);
    let b = parse_list(b);

    let mut seen = HashSet::new();
    let mut bodies: Vec<AttributeGlob> = Vec::new();
    for glob in a.iter().chain(&b) {
        let body = glob.body();
        if seen.insert(body.clone()) {
            bodies.push(body);
        }
    }

    // Close under intersection so that, for any path, the most specific
    // matching body is covered by every other body matching that path.
    let mut idx = 0;
    while idx < bodies.len() {
        for other in 0..idx {
            for met in bodies[idx].meet(&bodies[other]) {
                if seen.insert(met.clone()) {
                    bodies.push(met);
                }
            }
        }
        idx += 1;
    }

    let signed = bodies
        .iter()
        .map(|body| body.with_negation(!(includes(&a, body) || includes(&b, body))))
        .collect();

    render(simplify(signed))
}

/// Normalize a glob list: drop invalid and duplicate globs, and literal globs
/// whose removal would not change any decision.
///
/// # Example
///
/// ```
/// use acl_glob::normalize;
///
/// assert_eq!(normalize(&["*", "title", "*"]), vec!["*".to_string()]);
/// assert_eq!(normalize(&["!secret"]), Vec::<String>::new());
/// ```
pub fn normalize<S: AsRef<str>>(globs: &[S]) -> Vec<String> {
    render(simplify(parse_list(globs)))
}

fn simplify(globs: Vec<AttributeGlob>) -> Vec<AttributeGlob> {
    let mut seen = HashSet::new();
    let mut kept: Vec<AttributeGlob> = globs.into_iter().filter(|g| seen.insert(g.clone())).collect();

    // A literal glob only decides paths at or below its own path, and every
    // shallower glob matching those paths also matches the glob's own path.
    // So it is redundant when the rest of the list already decides its own
    // path the same way.
    let mut idx = 0;
    while idx < kept.len() {
        let candidate = &kept[idx];
        let redundant = candidate.is_literal() && {
            let others = kept
                .iter()
                .enumerate()
                .filter(|(i, _)| *i != idx)
                .map(|(_, g)| g);
            includes(others, candidate) != candidate.is_negated()
        };

        if redundant {
            kept.remove(idx);
        } else {
            idx += 1;
        }
    }

    kept
}

fn render(globs: Vec<AttributeGlob>) -> Vec<String> {
    globs.iter().map(ToString::to_string).collect()
}
