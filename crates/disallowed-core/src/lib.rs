//! # disallowed-core
//!
//! Policy engine deciding whether resolved call sites hit configured
//! disallowed-call rules.
//!
//! The engine never parses source code: an analyzer front-end resolves each
//! call (which symbol was invoked, which class or interface declares it,
//! which literal arguments were passed) and hands over [`CallSite`] values.
//! This crate provides:
//!
//! - [`SymbolPattern`] and [`PathGlob`] for the matching primitives
//! - [`DisallowedCall`] for one configured directive and [`RuleSet`] for all of them
//! - [`Allowed`] for the exemption policy (paths, callers, parameter values)
//! - [`Engine`] for evaluating call sites into [`Diagnostic`]s
//!
//! ## Example
//!
//! ```ignore
//! use disallowed_core::{declarative, CallSite, Engine, FilePath, Symbol};
//!
//! let rules = declarative::load_rules_from_toml(&toml, &FilePath::new("/project")?)?;
//! let engine = Engine::builder().root("/project").rule_set(rules).build()?;
//!
//! let call = CallSite::new(Symbol::function("exec")?, "src/a.php", 12);
//! for diagnostic in engine.evaluate(&call) {
//!     println!("{diagnostic}");
//! }
//! ```

#![forbid(unsafe_code)]
#![warn(missing_docs)]

mod alias;
mod allowed;
mod call_site;
mod config;
mod engine;
mod error;
mod normalizer;
mod params;
mod path;
mod rule;
mod rule_errors;
mod ruleset;
mod symbol;
mod types;

/// TOML configuration of rules.
pub mod declarative;

pub use alias::{alias_note, candidates};
pub use allowed::{check as check_exemption, Allowed, DisallowReason, ExemptReason, Exemption};
pub use call_site::{parse_call_sites, CallSite, CallSiteDto, CallSiteError};
pub use config::{Config, ConfigError, EngineConfig};
pub use engine::{Engine, EngineBuilder, EngineError};
pub use error::ModelError;
pub use normalizer::{normalize_path, normalize_symbol};
pub use params::{ArgValue, ForbiddenCheck, ParamConstraints};
pub use path::{FilePath, PathGlob};
pub use rule::{DisallowedCall, DisallowedCallBuilder, RuleKind};
pub use rule_errors::{
    default_identifier, MatchResult, RuleErrors, FUNCTION_IDENTIFIER, METHOD_IDENTIFIER,
    STATIC_CALL_IDENTIFIER,
};
pub use ruleset::{RuleMatch, RuleSet};
pub use symbol::{PatternError, Symbol, SymbolError, SymbolKind, SymbolPattern};
pub use types::{Diagnostic, Location, RenderedDiagnostic, Report, Severity};
