//! Ability path algebra
//!
//! Ability paths are dot-separated, e.g. `"user.update.self"`. The segment
//! separator is `.` and there is no escaping. Hierarchy runs right to left:
//! stripping the last segment yields the parent, and holding an ancestor
//! implies every path beneath it.

/// Checks if a token is blank (empty or whitespace-only)
///
/// Blank tokens come from host-side splitting of stored ability text and are
/// filtered during set normalization. Kept tokens are stored verbatim.
pub fn is_blank(token: &str) -> bool {
    token.trim().is_empty()
}

/// Returns the parent of an ability path, stripping the last segment
///
/// Returns `None` for a single-segment path.
///
/// # Examples
///
/// ```rust
/// use permits::ability::parent;
///
/// assert_eq!(parent("user.update.self"), Some("user.update"));
/// assert_eq!(parent("user.update"), Some("user"));
/// assert_eq!(parent("user"), None);
/// ```
pub fn parent(path: &str) -> Option<&str> {
    path.rsplit_once('.').map(|(head, _)| head)
}

/// Iterates an ability path and its ancestors, most specific first
///
/// The path itself comes first, then each successively shorter prefix down to
/// the root segment. Hierarchical membership is defined over exactly this
/// walk: a set grants a path iff it contains any entry of the walk verbatim.
///
/// # Examples
///
/// ```rust
/// use permits::ability::ancestors;
///
/// let chain: Vec<&str> = ancestors("user.update.self").collect();
/// assert_eq!(chain, vec!["user.update.self", "user.update", "user"]);
/// ```
pub fn ancestors(path: &str) -> Ancestors<'_> {
    Ancestors { next: Some(path) }
}

/// Iterator over an ability path and its ancestors
///
/// Created by [`ancestors`].
#[derive(Debug, Clone)]
pub struct Ancestors<'a> {
    next: Option<&'a str>,
}

impl<'a> Iterator for Ancestors<'a> {
    type Item = &'a str;

    fn next(&mut self) -> Option<&'a str> {
        let current = self.next?;
        self.next = parent(current);
        Some(current)
    }
}

/// Splits an ability path into `(prefix, owner)` when its last segment is a
/// decimal integer
///
/// The suffix must be non-empty, all ASCII digits, and fit in `u64`. Anything
/// else (dotless paths, signs, empty or mixed suffixes, overflow) yields
/// `None`. This feeds the ownership special case: `"user.update.7"` with an
/// owner context of `7` is granted to a principal holding
/// `"user.update.self"`.
///
/// # Examples
///
/// ```rust
/// use permits::ability::owner_suffix;
///
/// assert_eq!(owner_suffix("user.update.7"), Some(("user.update", 7)));
/// assert_eq!(owner_suffix("user.update.self"), None);
/// assert_eq!(owner_suffix("7"), None);
/// ```
pub fn owner_suffix(path: &str) -> Option<(&str, u64)> {
    let (prefix, suffix) = path.rsplit_once('.')?;
    if suffix.is_empty() || !suffix.bytes().all(|b| b.is_ascii_digit()) {
        return None;
    }
    let owner = suffix.parse::<u64>().ok()?;
    Some((prefix, owner))
}
