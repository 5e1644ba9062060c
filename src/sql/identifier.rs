//! Identifier validation.
//!
//! Names handed to the compiler may be too long for the target database,
//! collide with a reserved word, or clash with a name already used in the
//! schema. [`IdentifierValidator::validate`] repairs all three
//! deterministically; [`IdentifierValidator::check_name_length`] only
//! reports, for names a user chose explicitly.

use std::collections::BTreeSet;

use tracing::trace;

use crate::error::{CompileError, CompileResult};
use crate::sql::dialect::{DialectProfile, NameKind};

const VOWELS: [char; 5] = ['A', 'E', 'I', 'O', 'U'];

/// Names already taken in one namespace (a schema, or a table's columns).
///
/// Comparison ignores ASCII case.
#[derive(Debug, Clone, Default)]
pub struct NameSet {
    names: BTreeSet<String>,
}

impl NameSet {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn contains(&self, name: &str) -> bool {
        self.names.contains(&name.to_ascii_uppercase())
    }

    /// Returns false when the name was already taken.
    pub fn insert(&mut self, name: &str) -> bool {
        self.names.insert(name.to_ascii_uppercase())
    }

    pub fn remove(&mut self, name: &str) -> bool {
        self.names.remove(&name.to_ascii_uppercase())
    }

    pub fn len(&self) -> usize {
        self.names.len()
    }

    pub fn is_empty(&self) -> bool {
        self.names.is_empty()
    }
}

impl<S: AsRef<str>> FromIterator<S> for NameSet {
    fn from_iter<I: IntoIterator<Item = S>>(iter: I) -> Self {
        let mut set = NameSet::new();
        for name in iter {
            set.insert(name.as_ref());
        }
        set
    }
}

/// Shorten `name` to `target` characters.
///
/// Interior vowels go first (A, then E, I, O, U), then the middle character,
/// until the name fits. The first and last characters are kept.
pub fn shorten(name: &str, target: usize) -> String {
    let mut chars: Vec<char> = name.chars().collect();
    while chars.len() > target {
        if !strip_interior_vowel(&mut chars) {
            let mid = chars.len() / 2;
            chars.remove(mid);
        }
    }
    chars.into_iter().collect()
}

fn strip_interior_vowel(chars: &mut Vec<char>) -> bool {
    if chars.len() < 3 {
        return false;
    }
    let last = chars.len() - 1;
    for vowel in VOWELS {
        if let Some(pos) = (1..last).find(|&i| chars[i].to_ascii_uppercase() == vowel) {
            chars.remove(pos);
            return true;
        }
    }
    false
}

/// Validates and repairs identifiers against one profile's naming rules.
#[derive(Debug, Clone, Copy)]
pub struct IdentifierValidator<'p> {
    profile: &'p DialectProfile,
}

impl<'p> IdentifierValidator<'p> {
    pub fn new(profile: &'p DialectProfile) -> Self {
        Self { profile }
    }

    /// Make `raw` a valid `kind` name.
    ///
    /// A name that already fits, is not reserved and (when checked) is unused
    /// comes back unchanged. The result is not added to `names`; use
    /// [`IdentifierValidator::claim`] for that.
    pub fn validate(
        &self,
        raw: &str,
        kind: NameKind,
        names: &NameSet,
        check_uniqueness: bool,
    ) -> CompileResult<String> {
        let max = self.profile.max_name_length(kind);

        if let Some(body) = self.delimited_body(raw) {
            let (open, close) = self.profile.delimiters();
            let body = shorten(body, max.saturating_sub(2));
            let body = if check_uniqueness {
                self.make_unique(&body, |candidate| {
                    names.contains(&format!("{}{}{}", open, candidate, close))
                })?
            } else {
                body
            };
            return Ok(format!("{}{}{}", open, body, close));
        }

        let mut name = shorten(raw, max);
        if self.profile.is_reserved(&name) {
            name = format!("{}0", shorten(&name, max.saturating_sub(1)));
        }
        if check_uniqueness {
            name = self.make_unique(&name, |candidate| names.contains(candidate))?;
        }

        if name != raw {
            trace!(raw, name = %name, ?kind, "identifier adjusted");
        }
        Ok(name)
    }

    /// Validate and record the result in `names`.
    pub fn claim(&self, raw: &str, kind: NameKind, names: &mut NameSet) -> CompileResult<String> {
        let name = self.validate(raw, kind, names, true)?;
        names.insert(&name);
        Ok(name)
    }

    /// Fail when a user-chosen name exceeds the limit for its kind.
    pub fn check_name_length(&self, name: &str, kind: NameKind) -> CompileResult<()> {
        let max = self.profile.max_name_length(kind);
        let length = name.chars().count();
        if length > max {
            return Err(CompileError::NameTooLong {
                name: name.to_string(),
                length,
                max,
            });
        }
        Ok(())
    }

    fn delimited_body<'a>(&self, raw: &'a str) -> Option<&'a str> {
        let (open, close) = self.profile.delimiters();
        let body = raw.strip_prefix(open)?.strip_suffix(close)?;
        (!body.is_empty()).then_some(body)
    }

    /// Replace trailing characters with `0`..`9`, then `00`..`99`, ... until
    /// `taken` rejects the candidate.
    fn make_unique(&self, name: &str, taken: impl Fn(&str) -> bool) -> CompileResult<String> {
        if !taken(name) {
            return Ok(name.to_string());
        }

        let chars: Vec<char> = name.chars().collect();
        let widest = chars.len().min(18);
        for width in 1..=widest {
            let stem: String = chars[..chars.len() - width].iter().collect();
            let limit = 10u64.pow(width as u32);
            for n in 0..limit {
                let candidate = format!("{}{:0width$}", stem, n, width = width);
                if !taken(&candidate) {
                    return Ok(candidate);
                }
            }
        }

        Err(CompileError::NameSpaceExhausted {
            name: name.to_string(),
        })
    }
}
