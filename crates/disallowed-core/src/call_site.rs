//! Resolved call-site descriptors handed over by the analyzer front-end.

use std::path::{Path, PathBuf};

use serde::Deserialize;

use crate::error::ModelError;
use crate::params::ArgValue;
use crate::symbol::{Symbol, SymbolKind};

/// One call discovered in analyzed code.
///
/// `invoked` is the symbol as written at the call site; `declaring` is the
/// symbol that actually owns the member (a parent class, trait or the class
/// itself). `also_declared_in` lists further symbols the member is reachable
/// as, such as the interfaces declaring it.
#[derive(Debug, Clone)]
pub struct CallSite {
    invoked: Symbol,
    declaring: Symbol,
    also_declared_in: Vec<Symbol>,
    caller: Option<Symbol>,
    file: PathBuf,
    line: usize,
    args: Vec<ArgValue>,
}

impl CallSite {
    /// Creates a call site whose declaring symbol is the invoked one.
    #[must_use]
    pub fn new(invoked: Symbol, file: impl Into<PathBuf>, line: usize) -> Self {
        Self {
            declaring: invoked.clone(),
            invoked,
            also_declared_in: Vec::new(),
            caller: None,
            file: file.into(),
            line,
            args: Vec::new(),
        }
    }

    /// Sets the declaring symbol.
    #[must_use]
    pub fn declared_as(mut self, declaring: Symbol) -> Self {
        self.declaring = declaring;
        self
    }

    /// Adds a further symbol the member is reachable as.
    #[must_use]
    pub fn also_declared_in(mut self, symbol: Symbol) -> Self {
        self.also_declared_in.push(symbol);
        self
    }

    /// Sets the enclosing function or method.
    #[must_use]
    pub fn called_from(mut self, caller: Symbol) -> Self {
        self.caller = Some(caller);
        self
    }

    /// Sets the argument values.
    #[must_use]
    pub fn with_args(mut self, args: Vec<ArgValue>) -> Self {
        self.args = args;
        self
    }

    /// Returns the call kind, taken from the invoked symbol.
    #[must_use]
    pub fn kind(&self) -> SymbolKind {
        self.invoked.kind()
    }

    /// Returns the invoked symbol.
    #[must_use]
    pub fn invoked(&self) -> &Symbol {
        &self.invoked
    }

    /// Returns the declaring symbol.
    #[must_use]
    pub fn declaring(&self) -> &Symbol {
        &self.declaring
    }

    /// Returns the extra declaring symbols.
    #[must_use]
    pub fn also_declared(&self) -> &[Symbol] {
        &self.also_declared_in
    }

    /// Returns the enclosing function or method.
    #[must_use]
    pub fn caller(&self) -> Option<&Symbol> {
        self.caller.as_ref()
    }

    /// Returns the file path as reported.
    #[must_use]
    pub fn file(&self) -> &Path {
        &self.file
    }

    /// Returns the 1-based line.
    #[must_use]
    pub fn line(&self) -> usize {
        self.line
    }

    /// Returns the argument values.
    #[must_use]
    pub fn args(&self) -> &[ArgValue] {
        &self.args
    }
}

/// JSON representation of a call site.
///
/// ```json
/// {
///   "kind": "instance-method",
///   "invoked": "Inheritance\\Sub::x()",
///   "declaring": "Inheritance\\Base::x()",
///   "file": "src/disallowed/methodCalls.php",
///   "line": 22,
///   "args": [42, true, {}]
/// }
/// ```
///
/// Arguments are JSON scalars; arrays and objects (`{}` by convention) mark
/// values the analyzer could not resolve.
#[derive(Debug, Clone, Deserialize)]
#[serde(rename_all = "kebab-case")]
pub struct CallSiteDto {
    /// Call kind.
    pub kind: SymbolKind,
    /// Symbol as written.
    pub invoked: String,
    /// Owning symbol (defaults to `invoked`).
    #[serde(default)]
    pub declaring: Option<String>,
    /// Interfaces or traits the member is also declared in.
    #[serde(default)]
    pub also_declared_in: Vec<String>,
    /// Enclosing function or method.
    #[serde(default)]
    pub caller: Option<String>,
    /// File path.
    pub file: PathBuf,
    /// 1-based line.
    pub line: usize,
    /// Argument values.
    #[serde(default)]
    pub args: Vec<serde_json::Value>,
}

impl TryFrom<CallSiteDto> for CallSite {
    type Error = ModelError;

    fn try_from(dto: CallSiteDto) -> Result<Self, Self::Error> {
        let invoked = Symbol::parse(&dto.invoked, dto.kind)?;
        let mut site = Self::new(invoked, dto.file, dto.line)
            .with_args(dto.args.iter().map(ArgValue::from_json).collect());
        if let Some(declaring) = dto.declaring {
            site = site.declared_as(Symbol::parse(&declaring, dto.kind)?);
        }
        for extra in &dto.also_declared_in {
            site = site.also_declared_in(Symbol::parse(extra, dto.kind)?);
        }
        if let Some(caller) = dto.caller {
            let kind = if caller.contains("::") {
                SymbolKind::InstanceMethod
            } else {
                SymbolKind::Function
            };
            site = site.called_from(Symbol::parse(&caller, kind)?);
        }
        Ok(site)
    }
}

/// Errors reading call sites from JSON.
#[derive(Debug, thiserror::Error)]
pub enum CallSiteError {
    /// The JSON is malformed.
    #[error("invalid call-site JSON: {0}")]
    Json(#[from] serde_json::Error),

    /// A symbol in a descriptor is invalid.
    #[error("call site #{index}: {source}")]
    Model {
        /// 0-based index of the descriptor.
        index: usize,
        /// The underlying model error.
        source: ModelError,
    },
}

/// Parses a JSON array of call sites, or one JSON object per line.
///
/// # Errors
///
/// Returns an error for malformed JSON or invalid symbols.
pub fn parse_call_sites(content: &str) -> Result<Vec<CallSite>, CallSiteError> {
    let trimmed = content.trim_start();
    let dtos: Vec<CallSiteDto> = if trimmed.starts_with('[') {
        serde_json::from_str(trimmed)?
    } else {
        trimmed
            .lines()
            .filter(|l| !l.trim().is_empty())
            .map(serde_json::from_str)
            .collect::<Result<_, _>>()?
    };
    dtos.into_iter()
        .enumerate()
        .map(|(index, dto)| {
            CallSite::try_from(dto).map_err(|source| CallSiteError::Model { index, source })
        })
        .collect()
}
