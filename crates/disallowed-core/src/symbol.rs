//! Qualified symbol names and the wildcard patterns matched against them.

use std::fmt;
use std::hash::{Hash, Hasher};

use serde::{Deserialize, Serialize};

use crate::normalizer::{normalize_symbol, trim_symbol, MEMBER_SEPARATOR, NAMESPACE_SEPARATOR};

/// Wildcard marker accepted at the end of a member name.
pub const WILDCARD: char = '*';

/// What kind of callable a symbol names.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "kebab-case")]
pub enum SymbolKind {
    /// A free function, optionally namespaced (`Foo\bar`).
    Function,
    /// A static method (`Foo::bar` called statically).
    StaticMethod,
    /// An instance method (`$foo->bar()`).
    InstanceMethod,
}

impl SymbolKind {
    /// Returns true for both method kinds.
    #[must_use]
    pub fn is_method(self) -> bool {
        matches!(self, Self::StaticMethod | Self::InstanceMethod)
    }
}

/// A qualified name of a function or method.
///
/// The spelling is kept as given; equality and hashing use the
/// normalized (case-insensitive) form and ignore [`SymbolKind`].
#[derive(Debug, Clone)]
pub struct Symbol {
    kind: SymbolKind,
    qualifier: Option<String>,
    member: String,
    key: String,
}

impl Symbol {
    /// Parses `Class::member`, `Ns\function` or `function`, with optional
    /// leading `\` and trailing `()`.
    ///
    /// A name containing `::` is a method; `kind` is only used to tell static
    /// from instance methods and is forced to [`SymbolKind::Function`] when
    /// there is no `::`.
    ///
    /// # Errors
    ///
    /// Returns an error if the name or its member part is empty.
    pub fn parse(name: &str, kind: SymbolKind) -> Result<Self, SymbolError> {
        let trimmed = trim_symbol(name);
        if trimmed.is_empty() {
            return Err(SymbolError::Empty);
        }
        let (qualifier, member, kind) = split_qualified(trimmed, kind);
        if member.is_empty() {
            return Err(SymbolError::EmptyMember {
                name: name.to_string(),
            });
        }
        Ok(Self {
            kind,
            qualifier: qualifier.map(str::to_string),
            member: member.to_string(),
            key: normalize_symbol(trimmed),
        })
    }

    /// Parses a function name.
    ///
    /// # Errors
    ///
    /// See [`Symbol::parse`].
    pub fn function(name: &str) -> Result<Self, SymbolError> {
        Self::parse(name, SymbolKind::Function)
    }

    /// Parses an instance method name (`Class::method`).
    ///
    /// # Errors
    ///
    /// See [`Symbol::parse`].
    pub fn method(name: &str) -> Result<Self, SymbolError> {
        Self::parse(name, SymbolKind::InstanceMethod)
    }

    /// Parses a static method name (`Class::method`).
    ///
    /// # Errors
    ///
    /// See [`Symbol::parse`].
    pub fn static_method(name: &str) -> Result<Self, SymbolError> {
        Self::parse(name, SymbolKind::StaticMethod)
    }

    /// Returns the symbol kind.
    #[must_use]
    pub fn kind(&self) -> SymbolKind {
        self.kind
    }

    /// Returns the namespace (functions) or class (methods), as spelled.
    #[must_use]
    pub fn qualifier(&self) -> Option<&str> {
        self.qualifier.as_deref()
    }

    /// Returns the member name, as spelled.
    #[must_use]
    pub fn member(&self) -> &str {
        &self.member
    }

    /// Returns the normalized comparison key.
    #[must_use]
    pub fn normalized(&self) -> &str {
        &self.key
    }

    /// Renders the name with a trailing `()`, the way diagnostics show it.
    #[must_use]
    pub fn display_call(&self) -> String {
        format!("{self}()")
    }
}

impl PartialEq for Symbol {
    fn eq(&self, other: &Self) -> bool {
        self.key == other.key
    }
}

impl Eq for Symbol {}

impl Hash for Symbol {
    fn hash<H: Hasher>(&self, state: &mut H) {
        self.key.hash(state);
    }
}

impl fmt::Display for Symbol {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match (&self.qualifier, self.kind.is_method()) {
            (Some(q), true) => write!(f, "{q}{MEMBER_SEPARATOR}{}", self.member),
            (Some(q), false) => write!(f, "{q}{NAMESPACE_SEPARATOR}{}", self.member),
            (None, _) => write!(f, "{}", self.member),
        }
    }
}

fn split_qualified(name: &str, kind: SymbolKind) -> (Option<&str>, &str, SymbolKind) {
    if let Some((class, member)) = name.rsplit_once(MEMBER_SEPARATOR) {
        let kind = if kind.is_method() {
            kind
        } else {
            SymbolKind::StaticMethod
        };
        return (Some(class), member, kind);
    }
    match name.rsplit_once(NAMESPACE_SEPARATOR) {
        Some((ns, member)) => (Some(ns), member, SymbolKind::Function),
        None => (None, name, SymbolKind::Function),
    }
}

fn normalize_qualifier(qualifier: Option<&str>) -> Option<String> {
    qualifier.map(str::to_lowercase)
}

/// A compiled symbol pattern.
///
/// Accepted forms:
/// - `Foo\Bar::baz()` or `Foo\baz()`: exact match
/// - `Foo\Bar::ba*()` or `Foo\ba*()`: member name prefix
/// - `Foo\Bar::*` or `Foo\*`: any member of the qualifier
///
/// Matching is case-insensitive; [`SymbolPattern::as_str`] keeps the
/// configured spelling for diagnostics.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct SymbolPattern {
    raw: String,
    kind: PatternKind,
}

#[derive(Debug, Clone, PartialEq, Eq)]
enum PatternKind {
    Exact {
        key: String,
    },
    MemberPrefix {
        scope: Scope,
        prefix: String,
    },
    AnyMember {
        scope: Scope,
    },
}

/// Qualifier half of a wildcard pattern: the normalized qualifier and
/// whether it names a class (`::`) or a namespace (`\`).
#[derive(Debug, Clone, PartialEq, Eq)]
struct Scope {
    qualifier: Option<String>,
    methods: bool,
}

impl Scope {
    fn contains(&self, symbol: &Symbol) -> bool {
        self.methods == symbol.kind().is_method()
            && normalize_qualifier(symbol.qualifier()) == self.qualifier
    }
}

impl SymbolPattern {
    /// Compiles a pattern string.
    ///
    /// # Errors
    ///
    /// Rejects empty patterns, empty members, glob metacharacters other than
    /// a single trailing `*`, and wildcards inside the qualifier.
    pub fn new(pattern: &str) -> Result<Self, PatternError> {
        let trimmed = trim_symbol(pattern);
        if trimmed.is_empty() {
            return Err(PatternError::Empty);
        }
        if trimmed.contains(['?', '[', ']']) {
            return Err(PatternError::UnsupportedMetacharacter {
                pattern: pattern.to_string(),
            });
        }

        let (qualifier, member, symbol_kind) = split_qualified(trimmed, SymbolKind::Function);
        if qualifier.is_some_and(|q| q.contains(WILDCARD)) {
            return Err(PatternError::WildcardInQualifier {
                pattern: pattern.to_string(),
            });
        }
        if member.is_empty() {
            return Err(PatternError::EmptyMember {
                pattern: pattern.to_string(),
            });
        }

        let wildcards = member.matches(WILDCARD).count();
        let kind = match wildcards {
            0 => PatternKind::Exact {
                key: normalize_symbol(trimmed),
            },
            1 if member.ends_with(WILDCARD) => {
                let prefix = member.trim_end_matches(WILDCARD).to_lowercase();
                let scope = Scope {
                    qualifier: normalize_qualifier(qualifier),
                    methods: symbol_kind.is_method(),
                };
                if prefix.is_empty() {
                    PatternKind::AnyMember { scope }
                } else {
                    PatternKind::MemberPrefix { scope, prefix }
                }
            }
            1 => {
                return Err(PatternError::WildcardNotTrailing {
                    pattern: pattern.to_string(),
                })
            }
            _ => {
                return Err(PatternError::MultipleWildcards {
                    pattern: pattern.to_string(),
                })
            }
        };

        Ok(Self {
            raw: trimmed.to_string(),
            kind,
        })
    }

    /// Tests whether a symbol matches this pattern.
    #[must_use]
    pub fn matches(&self, symbol: &Symbol) -> bool {
        match &self.kind {
            PatternKind::Exact { key } => key == symbol.normalized(),
            PatternKind::MemberPrefix { scope, prefix } => {
                scope.contains(symbol)
                    && symbol.member().to_lowercase().starts_with(prefix.as_str())
            }
            PatternKind::AnyMember { scope } => scope.contains(symbol),
        }
    }

    /// Returns true if the pattern contains a wildcard.
    #[must_use]
    pub fn is_wildcard(&self) -> bool {
        !matches!(self.kind, PatternKind::Exact { .. })
    }

    /// Returns the configured spelling without decoration.
    #[must_use]
    pub fn as_str(&self) -> &str {
        &self.raw
    }

    /// Renders the pattern with a trailing `()`, the way diagnostics show it.
    #[must_use]
    pub fn display_call(&self) -> String {
        format!("{}()", self.raw)
    }
}

impl fmt::Display for SymbolPattern {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(&self.raw)
    }
}

/// Errors building a [`Symbol`].
#[derive(Debug, Clone, PartialEq, Eq, thiserror::Error)]
pub enum SymbolError {
    /// The name is empty.
    #[error("symbol name must not be empty")]
    Empty,

    /// The member part after the last separator is empty.
    #[error("symbol `{name}` has no member name")]
    EmptyMember {
        /// The offending name.
        name: String,
    },
}

/// Errors compiling a [`SymbolPattern`].
#[derive(Debug, Clone, PartialEq, Eq, thiserror::Error)]
pub enum PatternError {
    /// The pattern is empty.
    #[error("symbol pattern must not be empty")]
    Empty,

    /// The member part after the last separator is empty.
    #[error("symbol pattern `{pattern}` has no member name")]
    EmptyMember {
        /// The offending pattern.
        pattern: String,
    },

    /// A wildcard appears in the namespace or class part.
    #[error("symbol pattern `{pattern}`: wildcard is only allowed at the end of the member name")]
    WildcardInQualifier {
        /// The offending pattern.
        pattern: String,
    },

    /// A wildcard appears before the end of the member name.
    #[error("symbol pattern `{pattern}`: wildcard must be the last character")]
    WildcardNotTrailing {
        /// The offending pattern.
        pattern: String,
    },

    /// More than one wildcard.
    #[error("symbol pattern `{pattern}`: at most one wildcard is allowed")]
    MultipleWildcards {
        /// The offending pattern.
        pattern: String,
    },

    /// `?` or character classes.
    #[error("symbol pattern `{pattern}`: only a trailing `*` wildcard is supported")]
    UnsupportedMetacharacter {
        /// The offending pattern.
        pattern: String,
    },
}
