//! Special Token Policy
//!
//! Which special tokens [`Encoding::encode`](crate::encoders::Encoding::encode)
//! emits as reserved ranks, and which it refuses to see in the input at all.

use crate::types::TMHashSet;

/// A set of special token strings, or "all of them".
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum SpecialTokenSet {
    /// Every special token of the encoding.
    All,

    /// Exactly these strings.
    Only(TMHashSet<String>),
}

impl Default for SpecialTokenSet {
    fn default() -> Self {
        Self::none()
    }
}

impl<S: Into<String>> FromIterator<S> for SpecialTokenSet {
    fn from_iter<I: IntoIterator<Item = S>>(iter: I) -> Self {
        Self::Only(iter.into_iter().map(Into::into).collect())
    }
}

impl SpecialTokenSet {
    /// The empty set.
    pub fn none() -> Self {
        Self::Only(TMHashSet::default())
    }

    /// Is `token` in the set?
    pub fn contains(
        &self,
        token: &str,
    ) -> bool {
        match self {
            Self::All => true,
            Self::Only(set) => set.contains(token),
        }
    }

    /// Is this the empty set?
    pub fn is_empty(&self) -> bool {
        match self {
            Self::All => false,
            Self::Only(set) => set.is_empty(),
        }
    }
}

/// Allowed/disallowed special token policy.
///
/// The default allows nothing and disallows everything; i.e. any special
/// token string in the input is an error.
///
/// `disallowed = All` means "every special token not in `allowed`".
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct SpecialPolicy {
    /// Special tokens emitted as their reserved rank.
    pub allowed: SpecialTokenSet,

    /// Special tokens which may not appear in the input.
    pub disallowed: SpecialTokenSet,
}

impl Default for SpecialPolicy {
    fn default() -> Self {
        Self {
            allowed: SpecialTokenSet::none(),
            disallowed: SpecialTokenSet::All,
        }
    }
}

impl SpecialPolicy {
    /// Encode special token strings as ordinary text, without complaint.
    pub fn ordinary() -> Self {
        Self {
            allowed: SpecialTokenSet::none(),
            disallowed: SpecialTokenSet::none(),
        }
    }

    /// Emit every special token as its reserved rank.
    pub fn allow_all() -> Self {
        Self {
            allowed: SpecialTokenSet::All,
            disallowed: SpecialTokenSet::All,
        }
    }

    /// Set the allowed set.
    pub fn with_allowed<S: Into<SpecialTokenSet>>(
        mut self,
        allowed: S,
    ) -> Self {
        self.allowed = allowed.into();
        self
    }

    /// Allow the given tokens.
    pub fn with_allowed_tokens<I, S>(
        self,
        tokens: I,
    ) -> Self
    where
        I: IntoIterator<Item = S>,
        S: Into<String>,
    {
        self.with_allowed(tokens.into_iter().collect::<SpecialTokenSet>())
    }

    /// Set the disallowed set.
    pub fn with_disallowed<S: Into<SpecialTokenSet>>(
        mut self,
        disallowed: S,
    ) -> Self {
        self.disallowed = disallowed.into();
        self
    }

    /// Disallow exactly the given tokens.
    pub fn with_disallowed_tokens<I, S>(
        self,
        tokens: I,
    ) -> Self
    where
        I: IntoIterator<Item = S>,
        S: Into<String>,
    {
        self.with_disallowed(tokens.into_iter().collect::<SpecialTokenSet>())
    }

    /// Resolve the disallowed list against the encoding's special tokens.
    pub fn resolve_disallowed<'a, I>(
        &'a self,
        specials: I,
    ) -> Vec<&'a str>
    where
        I: IntoIterator<Item = &'a str>,
    {
        match &self.disallowed {
            SpecialTokenSet::All => specials
                .into_iter()
                .filter(|s| !self.allowed.contains(s))
                .collect(),
            SpecialTokenSet::Only(set) => set.iter().map(String::as_str).collect(),
        }
    }
}
