//! The routing tree.
//!
//! One [`Tree`] per HTTP method. Each node matches exactly one slash-delimited
//! path segment, in one of four ways:
//!
//! | Pattern segment  | Kind     | Matches |
//! |------------------|----------|---------|
//! | `users`          | static   | the literal text `users` |
//! | `:name(pattern)` | regex    | a segment `pattern` matches, captured as `name` |
//! | `:name`          | param    | any single segment, captured as `name` |
//! | `*`              | wildcard | the entire remainder of the path |
//!
//! At every node the matcher tries those rules in that order and commits to
//! the first that applies. There is **no backtracking**: if a deeper segment
//! later fails to match, the matcher does not retry a sibling branch at a
//! shallower level. With `/user/:name/profile` and `/user/admin` registered,
//! `/user/admin/profile` is a miss — `admin` binds to the static node, which
//! has no `profile` child. This is deliberate; resolving such overlaps is the
//! route author's job, and it keeps lookup a single root-to-leaf pass.
//!
//! To keep the tree unambiguous, the param, regex, and wildcard children of a
//! node are mutually exclusive, and every conflict is detected at
//! registration time as a [`RouteError`] rather than surfacing as silent
//! mis-routing under traffic.
//!
//! The tree is generic over the stored value. The router instantiates it with
//! a boxed handler; tests use plain integers.

use std::collections::HashMap;

use regex::Regex;

use crate::error::RouteError;

/// How a node matches its path segment.
#[derive(Clone, Copy, Debug, Eq, PartialEq)]
pub(crate) enum SegmentKind {
    Static,
    Regex,
    Param,
    Wildcard,
}

/// One segment's matching rule plus its children.
pub(crate) struct Node<T> {
    kind: SegmentKind,
    /// The declared segment text (`users`, `:id`, `:id([0-9]+)`, `*`).
    /// Used for diagnostics and equality checks, not for matching.
    segment: String,
    /// Binding name for `Param` and `Regex` nodes.
    param_name: Option<String>,
    /// Compiled expression for `Regex` nodes.
    pattern: Option<Regex>,
    /// Set only on nodes that terminate a registered route.
    value: Option<T>,
    static_children: HashMap<String, Node<T>>,
    // At most one of these three may be populated at a time.
    param_child: Option<Box<Node<T>>>,
    regex_child: Option<Box<Node<T>>>,
    wildcard_child: Option<Box<Node<T>>>,
}

/// A successful lookup: the stored value and the captured path parameters.
pub(crate) struct Match<'a, T> {
    pub(crate) value: &'a T,
    pub(crate) params: HashMap<String, String>,
}

/// The routing tree for a single HTTP method.
///
/// Build it with repeated [`insert`](Tree::insert) calls during startup, then
/// only read it. Nothing mutates nodes after registration, so shared lookups
/// need no locking.
pub(crate) struct Tree<T> {
    root: Node<T>,
}

impl<T> Tree<T> {
    pub(crate) fn new() -> Self {
        Self { root: Node::new(SegmentKind::Static, "/") }
    }

    /// Registers `pattern` with `value`, creating intermediate nodes as
    /// needed.
    ///
    /// Fails on malformed patterns and on any registration that would make
    /// matching ambiguous (see [`RouteError`]). A failed call never alters
    /// which routes match: intermediate nodes created before the conflict
    /// point carry no handler and are only reachable as prefixes.
    pub(crate) fn insert(&mut self, pattern: &str, value: T) -> Result<(), RouteError> {
        if pattern.is_empty() {
            return Err(RouteError::Empty);
        }
        if !pattern.starts_with('/') {
            return Err(RouteError::NotAbsolute { pattern: pattern.to_owned() });
        }
        if pattern == "/" {
            if self.root.value.is_some() {
                return Err(RouteError::Duplicate { pattern: pattern.to_owned() });
            }
            self.root.value = Some(value);
            return Ok(());
        }
        if pattern.ends_with('/') {
            return Err(RouteError::TrailingSlash { pattern: pattern.to_owned() });
        }
        if pattern.contains("//") {
            return Err(RouteError::EmptySegment { pattern: pattern.to_owned() });
        }

        let mut node = &mut self.root;
        for segment in pattern[1..].split('/') {
            node = node.child_or_create(segment)?;
        }
        if node.value.is_some() {
            return Err(RouteError::Duplicate { pattern: pattern.to_owned() });
        }
        node.value = Some(value);
        Ok(())
    }

    /// Walks the tree for a concrete request path.
    ///
    /// Returns `None` both when no node matches and when the matched node
    /// carries no value — an intermediate node with children but no handler
    /// of its own is not routable.
    pub(crate) fn at(&self, path: &str) -> Option<Match<'_, T>> {
        if path == "/" {
            return self.root.value.as_ref().map(|value| Match { value, params: HashMap::new() });
        }

        let mut params = HashMap::new();
        let mut node = &self.root;
        for segment in path.trim_matches('/').split('/') {
            match node.child_for(segment) {
                Some(child) => {
                    if let Some(name) = &child.param_name {
                        // Same name at two depths: the deeper capture wins.
                        params.insert(name.clone(), segment.to_owned());
                    }
                    node = child;
                }
                // A wildcard consumes whatever remains of the path.
                None if node.kind == SegmentKind::Wildcard => break,
                None => return None,
            }
        }
        node.value.as_ref().map(|value| Match { value, params })
    }
}

impl<T> Default for Tree<T> {
    fn default() -> Self {
        Self::new()
    }
}

impl<T> Node<T> {
    fn new(kind: SegmentKind, segment: &str) -> Self {
        Self {
            kind,
            segment: segment.to_owned(),
            param_name: None,
            pattern: None,
            value: None,
            static_children: HashMap::new(),
            param_child: None,
            regex_child: None,
            wildcard_child: None,
        }
    }

    /// Find-or-create the child for one pattern segment, enforcing the
    /// mutual-exclusion and uniqueness invariants.
    fn child_or_create(&mut self, segment: &str) -> Result<&mut Node<T>, RouteError> {
        if segment == "*" {
            return self.wildcard_child_or_create(segment);
        }
        if let Some(declaration) = segment.strip_prefix(':') {
            if declaration.contains('(') {
                return self.regex_child_or_create(segment, declaration);
            }
            return self.param_child_or_create(segment, declaration);
        }
        Ok(self
            .static_children
            .entry(segment.to_owned())
            .or_insert_with(|| Node::new(SegmentKind::Static, segment)))
    }

    fn wildcard_child_or_create(&mut self, segment: &str) -> Result<&mut Node<T>, RouteError> {
        if self.wildcard_child.is_none() {
            if self.param_child.is_some() {
                return Err(RouteError::KindConflict { existing: "parameter", segment: segment.to_owned() });
            }
            if self.regex_child.is_some() {
                return Err(RouteError::KindConflict { existing: "regex", segment: segment.to_owned() });
            }
            self.wildcard_child = Some(Box::new(Node::new(SegmentKind::Wildcard, segment)));
        }
        Ok(self.wildcard_child.as_mut().expect("wildcard child just ensured"))
    }

    fn param_child_or_create(&mut self, segment: &str, name: &str) -> Result<&mut Node<T>, RouteError> {
        if name.is_empty() {
            return Err(RouteError::MalformedSegment { segment: segment.to_owned() });
        }
        match &self.param_child {
            Some(existing) if existing.param_name.as_deref() == Some(name) => {}
            Some(existing) => {
                return Err(RouteError::ParamNameConflict {
                    existing: existing.segment.clone(),
                    requested: segment.to_owned(),
                });
            }
            None => {
                if self.wildcard_child.is_some() {
                    return Err(RouteError::KindConflict { existing: "wildcard", segment: segment.to_owned() });
                }
                if self.regex_child.is_some() {
                    return Err(RouteError::KindConflict { existing: "regex", segment: segment.to_owned() });
                }
                let mut child = Node::new(SegmentKind::Param, segment);
                child.param_name = Some(name.to_owned());
                self.param_child = Some(Box::new(child));
            }
        }
        Ok(self.param_child.as_mut().expect("param child just ensured"))
    }

    fn regex_child_or_create(&mut self, segment: &str, declaration: &str) -> Result<&mut Node<T>, RouteError> {
        // `declaration` is `name(body)` — split at the first `(`, require the
        // closing `)` to be the final character.
        let malformed = || RouteError::MalformedSegment { segment: segment.to_owned() };
        let open = declaration.find('(').ok_or_else(malformed)?;
        let name = &declaration[..open];
        let body = declaration[open + 1..].strip_suffix(')').ok_or_else(malformed)?;
        if name.is_empty() {
            return Err(malformed());
        }
        match &self.regex_child {
            Some(existing) => {
                let same = existing.param_name.as_deref() == Some(name)
                    && existing.pattern.as_ref().map(Regex::as_str) == Some(body);
                if !same {
                    return Err(RouteError::RegexConflict {
                        existing: existing.segment.clone(),
                        requested: segment.to_owned(),
                    });
                }
            }
            None => {
                if self.wildcard_child.is_some() {
                    return Err(RouteError::KindConflict { existing: "wildcard", segment: segment.to_owned() });
                }
                if self.param_child.is_some() {
                    return Err(RouteError::KindConflict { existing: "parameter", segment: segment.to_owned() });
                }
                let pattern = Regex::new(body).map_err(|source| RouteError::InvalidRegex {
                    segment: segment.to_owned(),
                    source,
                })?;
                let mut child = Node::new(SegmentKind::Regex, segment);
                child.param_name = Some(name.to_owned());
                child.pattern = Some(pattern);
                self.regex_child = Some(Box::new(child));
            }
        }
        Ok(self.regex_child.as_mut().expect("regex child just ensured"))
    }

    /// Selects the child for one request segment: static exact match, then
    /// regex, then param, then wildcard. First rule that applies wins.
    fn child_for(&self, segment: &str) -> Option<&Node<T>> {
        if let Some(child) = self.static_children.get(segment) {
            return Some(child);
        }
        if let Some(child) = self.regex_child.as_deref() {
            if child.pattern.as_ref().is_some_and(|re| re.is_match(segment)) {
                return Some(child);
            }
        }
        if let Some(child) = self.param_child.as_deref() {
            return Some(child);
        }
        self.wildcard_child.as_deref()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    /// Builds a tree from `(pattern, value)` pairs, panicking on conflicts.
    fn tree(routes: &[(&str, usize)]) -> Tree<usize> {
        let mut tree = Tree::new();
        for (pattern, value) in routes {
            tree.insert(pattern, *value)
                .unwrap_or_else(|e| panic!("insert `{pattern}`: {e}"));
        }
        tree
    }

    fn params(pairs: &[(&str, &str)]) -> HashMap<String, String> {
        pairs.iter().map(|(k, v)| (k.to_string(), v.to_string())).collect()
    }

    #[test]
    fn static_routes() {
        let tree = tree(&[
            ("/", 0),
            ("/user", 1),
            ("/user/home", 2),
            ("/order/detail", 3),
        ]);

        let hit = tree.at("/user/home").unwrap();
        assert_eq!(*hit.value, 2);
        assert!(hit.params.is_empty());
        assert_eq!(*tree.at("/user").unwrap().value, 1);
        assert_eq!(*tree.at("/").unwrap().value, 0);
        assert!(tree.at("/order").is_none(), "intermediate node has no handler");
        assert!(tree.at("/user/home/missing").is_none());
    }

    #[test]
    fn root_only() {
        let tree = tree(&[("/", 7)]);
        assert_eq!(*tree.at("/").unwrap().value, 7);
        assert!(tree.at("/anything").is_none());
    }

    #[test]
    fn lookups_are_deterministic() {
        let tree = tree(&[("/a/:b", 1), ("/a/c", 2)]);
        for _ in 0..3 {
            assert_eq!(*tree.at("/a/c").unwrap().value, 2);
            let hit = tree.at("/a/x").unwrap();
            assert_eq!(*hit.value, 1);
            assert_eq!(hit.params, params(&[("b", "x")]));
        }
    }

    #[test]
    fn param_capture() {
        let tree = tree(&[("/login/:username", 1)]);
        let hit = tree.at("/login/alice").unwrap();
        assert_eq!(*hit.value, 1);
        assert_eq!(hit.params, params(&[("username", "alice")]));
    }

    #[test]
    fn static_beats_param() {
        let tree = tree(&[("/user/admin", 1), ("/user/:name", 2)]);

        let hit = tree.at("/user/admin").unwrap();
        assert_eq!(*hit.value, 1);
        assert!(hit.params.is_empty());

        let hit = tree.at("/user/bob").unwrap();
        assert_eq!(*hit.value, 2);
        assert_eq!(hit.params, params(&[("name", "bob")]));
    }

    #[test]
    fn static_beats_regex() {
        let tree = tree(&[("/files/latest", 1), ("/files/:id([0-9]+)", 2)]);
        assert_eq!(*tree.at("/files/latest").unwrap().value, 1);
        assert_eq!(*tree.at("/files/42").unwrap().value, 2);
    }

    #[test]
    fn static_beats_wildcard() {
        let tree = tree(&[("/files/readme", 1), ("/files/*", 2)]);
        assert_eq!(*tree.at("/files/readme").unwrap().value, 1);
        assert_eq!(*tree.at("/files/other").unwrap().value, 2);
    }

    #[test]
    fn regex_segment_match_and_miss() {
        let tree = tree(&[("/orders/:id([0-9]+)", 1)]);

        let hit = tree.at("/orders/123").unwrap();
        assert_eq!(*hit.value, 1);
        assert_eq!(hit.params, params(&[("id", "123")]));

        // No digits anywhere in the segment: the regex child is rejected and
        // no other child exists, so the lookup fails without backtracking.
        assert!(tree.at("/orders/abc").is_none());
    }

    #[test]
    fn wildcard_consumes_remainder() {
        let tree = tree(&[("/files/*", 1)]);
        assert_eq!(*tree.at("/files/a").unwrap().value, 1);
        assert_eq!(*tree.at("/files/a/b/c").unwrap().value, 1);
        assert!(tree.at("/files").is_none());
    }

    #[test]
    fn wildcard_keeps_earlier_captures() {
        let tree = tree(&[("/user/:id/*", 1)]);
        let hit = tree.at("/user/7/a/b").unwrap();
        assert_eq!(*hit.value, 1);
        assert_eq!(hit.params, params(&[("id", "7")]));
    }

    #[test]
    fn wildcard_with_static_children() {
        // A wildcard node may itself have children that take precedence over
        // stopping at the wildcard.
        let tree = tree(&[("/*", 1), ("/*/aaa", 2), ("/*/aaa/*", 3)]);
        assert_eq!(*tree.at("/x").unwrap().value, 1);
        assert_eq!(*tree.at("/x/aaa").unwrap().value, 2);
        assert_eq!(*tree.at("/x/aaa/y/z").unwrap().value, 3);
        // `/x/bbb` falls off the `*` node with no matching child; the node
        // itself is a wildcard, so it absorbs the rest.
        assert_eq!(*tree.at("/x/bbb").unwrap().value, 1);
    }

    #[test]
    fn no_backtracking() {
        let tree = tree(&[("/user/:name/profile", 1), ("/user/admin", 2)]);
        // `admin` commits to the static branch, which has no `profile` child.
        // A backtracking matcher would retry `:name`; this one must not.
        assert!(tree.at("/user/admin/profile").is_none());
        assert_eq!(*tree.at("/user/bob/profile").unwrap().value, 1);
    }

    #[test]
    fn repeated_param_name_deeper_wins() {
        let tree = tree(&[("/user/:id/detail/:id", 1)]);
        let hit = tree.at("/user/1/detail/2").unwrap();
        assert_eq!(hit.params, params(&[("id", "2")]));
    }

    #[test]
    fn empty_request_segment_is_literal() {
        // `//` cannot be registered, but a request path containing it must
        // be matched segment-for-segment, not silently collapsed.
        let tree = tree(&[("/a/:x/b", 1), ("/a/b", 2)]);
        let hit = tree.at("/a//b").unwrap();
        assert_eq!(*hit.value, 1);
        assert_eq!(hit.params, params(&[("x", "")]));
    }

    #[test]
    fn pattern_validation() {
        let mut tree: Tree<usize> = Tree::new();
        assert!(matches!(tree.insert("", 0), Err(RouteError::Empty)));
        assert!(matches!(tree.insert("aaa", 0), Err(RouteError::NotAbsolute { .. })));
        assert!(matches!(tree.insert("/aaa/", 0), Err(RouteError::TrailingSlash { .. })));
        assert!(matches!(tree.insert("/aa//a", 0), Err(RouteError::EmptySegment { .. })));
        assert!(matches!(tree.insert("/x/:", 0), Err(RouteError::MalformedSegment { .. })));
        assert!(matches!(tree.insert("/x/:id(abc", 0), Err(RouteError::MalformedSegment { .. })));
        assert!(matches!(tree.insert("/x/:([0-9]+)", 0), Err(RouteError::MalformedSegment { .. })));
        assert!(matches!(tree.insert("/x/:id([)", 0), Err(RouteError::InvalidRegex { .. })));
    }

    #[test]
    fn duplicate_route_rejected() {
        let mut tree = Tree::new();
        tree.insert("/x/y", 1).unwrap();
        assert!(matches!(tree.insert("/x/y", 2), Err(RouteError::Duplicate { .. })));

        let mut tree = Tree::new();
        tree.insert("/", 1).unwrap();
        assert!(matches!(tree.insert("/", 2), Err(RouteError::Duplicate { .. })));
    }

    #[test]
    fn param_name_conflict() {
        let mut tree = Tree::new();
        tree.insert("/user/:id", 1).unwrap();
        assert!(matches!(
            tree.insert("/user/:name", 2),
            Err(RouteError::ParamNameConflict { .. })
        ));
        // Same name at the same position is idempotent.
        tree.insert("/user/:id/home", 3).unwrap();
    }

    #[test]
    fn regex_pair_conflict() {
        let mut tree = Tree::new();
        tree.insert("/orders/:id([0-9]+)", 1).unwrap();
        assert!(matches!(
            tree.insert("/orders/:id([a-z]+)/x", 2),
            Err(RouteError::RegexConflict { .. })
        ));
        assert!(matches!(
            tree.insert("/orders/:code([0-9]+)/x", 2),
            Err(RouteError::RegexConflict { .. })
        ));
        // Identical name and pattern reuse the existing node.
        tree.insert("/orders/:id([0-9]+)/items", 3).unwrap();
    }

    #[test]
    fn dynamic_kinds_are_mutually_exclusive() {
        let cases: &[(&str, &str)] = &[
            ("/login/*", "/login/:id"),
            ("/login/:id", "/login/*"),
            ("/login/*", "/login/:id([0-9]+)"),
            ("/login/:id([0-9]+)", "/login/*"),
            ("/login/:id", "/login/:id([0-9]+)"),
            ("/login/:id([0-9]+)", "/login/:id"),
        ];
        for (first, second) in cases {
            let mut tree = Tree::new();
            tree.insert(first, 1).unwrap();
            assert!(
                matches!(tree.insert(second, 2), Err(RouteError::KindConflict { .. })),
                "`{second}` after `{first}` should be a kind conflict"
            );
        }
    }

    #[test]
    fn failed_insert_leaves_table_unchanged() {
        let mut tree = Tree::new();
        tree.insert("/login/:id", 1).unwrap();
        tree.insert("/login", 2).unwrap();

        assert!(tree.insert("/login/*", 3).is_err());
        assert!(tree.insert("/login/:name", 3).is_err());

        let hit = tree.at("/login/alice").unwrap();
        assert_eq!(*hit.value, 1);
        assert_eq!(hit.params, params(&[("id", "alice")]));
        assert_eq!(*tree.at("/login").unwrap().value, 2);
        assert!(tree.at("/login/a/b").is_none(), "no wildcard was added");
    }

    #[test]
    fn conflict_messages_name_the_segment() {
        let mut tree = Tree::new();
        tree.insert("/login/:id", 1).unwrap();
        let err = tree.insert("/login/*", 2).unwrap_err();
        let msg = err.to_string();
        assert!(msg.contains('*'), "unexpected message: {msg}");
        assert!(msg.contains("parameter"), "unexpected message: {msg}");
    }
}
