//! DTO → Domain model conversion with validation.

use crate::error::ModelError;
use crate::params::{ArgValue, ParamConstraints};
use crate::path::{FilePath, PathGlob};
use crate::rule::{DisallowedCall, RuleKind};
use crate::ruleset::RuleSet;
use crate::symbol::SymbolPattern;
use crate::types::Severity;

use super::config_dto::{DisallowedCallDto, ParamsDto, RulesConfigDto};

/// Errors during DTO → Domain conversion.
#[derive(Debug, thiserror::Error)]
pub enum LoadError {
    /// A field-level validation error.
    #[error("{context}: {source}")]
    Validation {
        /// Where the error occurred (e.g., "disallowed-method-calls[0].allow-in[1]").
        context: String,
        /// The underlying model error.
        source: ModelError,
    },

    /// Unknown severity string.
    #[error("{context}: unknown severity `{value}`, expected: error, warning, info")]
    UnknownSeverity {
        /// Where the error occurred.
        context: String,
        /// The invalid value.
        value: String,
    },
}

/// Converts a `RulesConfigDto` to a validated [`RuleSet`].
///
/// Path globs are anchored at the root of `paths`. Method rules come first,
/// then function rules, each in file order.
///
/// # Errors
///
/// Returns the first error encountered during conversion.
pub fn load(dto: RulesConfigDto, paths: &FilePath) -> Result<RuleSet, LoadError> {
    let methods = dto
        .method_calls
        .into_iter()
        .enumerate()
        .map(|(i, d)| convert_rule(d, RuleKind::Method, &format!("disallowed-method-calls[{i}]"), paths));
    let functions = dto
        .function_calls
        .into_iter()
        .enumerate()
        .map(|(i, d)| {
            convert_rule(d, RuleKind::Function, &format!("disallowed-function-calls[{i}]"), paths)
        });
    methods.chain(functions).collect()
}

fn validation(context: impl Into<String>) -> impl FnOnce(ModelError) -> LoadError {
    let context = context.into();
    move |source| LoadError::Validation { context, source }
}

fn convert_rule(
    dto: DisallowedCallDto,
    kind: RuleKind,
    ctx: &str,
    paths: &FilePath,
) -> Result<DisallowedCall, LoadError> {
    let calls = match (dto.method, dto.function) {
        (Some(calls), None) | (None, Some(calls)) => calls.into_vec(),
        (Some(_), Some(_)) => return Err(validation(ctx)(ModelError::AmbiguousCallKey)),
        (None, None) => return Err(validation(ctx)(ModelError::NoCalls)),
    };

    let mut builder = DisallowedCall::builder(kind).message(dto.message);

    for (i, call) in calls.iter().enumerate() {
        builder = builder.call(pattern(call, &format!("{ctx}.calls[{i}]"))?);
    }
    for (i, exclude) in dto.exclude.into_vec().iter().enumerate() {
        builder = builder.exclude(pattern(exclude, &format!("{ctx}.exclude[{i}]"))?);
    }
    for (i, glob) in dto.allow_in.iter().enumerate() {
        builder = builder.allow_in(path_glob(glob, paths, &format!("{ctx}.allow-in[{i}]"))?);
    }
    for (i, glob) in dto.allow_except_in.iter().enumerate() {
        builder = builder
            .allow_except_in(path_glob(glob, paths, &format!("{ctx}.allow-except-in[{i}]"))?);
    }
    for (i, caller) in dto.allow_in_callers.iter().enumerate() {
        builder = builder
            .allow_in_caller(pattern(caller, &format!("{ctx}.allow-in-callers[{i}]"))?);
    }
    for (i, caller) in dto.allow_except_in_callers.iter().enumerate() {
        builder = builder.allow_except_in_caller(pattern(
            caller,
            &format!("{ctx}.allow-except-in-callers[{i}]"),
        )?);
    }

    builder = builder
        .allow_params_in_allowed(params(
            &dto.allow_params_in_allowed,
            &format!("{ctx}.allow-params-in-allowed"),
        )?)
        .allow_except_params_in_allowed(params(
            &dto.allow_except_params_in_allowed,
            &format!("{ctx}.allow-except-params-in-allowed"),
        )?)
        .allow_params_anywhere(params(
            &dto.allow_params_anywhere,
            &format!("{ctx}.allow-params-anywhere"),
        )?)
        .allow_except_params(params(
            &dto.allow_except_params,
            &format!("{ctx}.allow-except-params"),
        )?);

    if let Some(tip) = dto.error_tip {
        builder = builder.error_tip(tip);
    }
    if let Some(identifier) = dto.error_identifier {
        builder = builder.error_identifier(identifier);
    }
    builder = builder.severity(parse_severity(&dto.severity, ctx)?);

    builder.build().map_err(validation(ctx))
}

fn pattern(raw: &str, ctx: &str) -> Result<SymbolPattern, LoadError> {
    SymbolPattern::new(raw)
        .map_err(ModelError::from)
        .map_err(validation(ctx))
}

fn path_glob(raw: &str, paths: &FilePath, ctx: &str) -> Result<PathGlob, LoadError> {
    PathGlob::new(raw, paths).map_err(validation(ctx))
}

fn params(dto: &ParamsDto, ctx: &str) -> Result<ParamConstraints, LoadError> {
    let mut constraints = ParamConstraints::new();
    for (key, value) in dto {
        let position: usize = key
            .trim()
            .parse()
            .map_err(|_| ModelError::InvalidParamPosition {
                position: key.clone(),
            })
            .map_err(validation(ctx))?;
        let value = ArgValue::from_toml(value)
            .ok_or_else(|| ModelError::UnsupportedParamValue {
                position,
                value: value.to_string(),
            })
            .map_err(validation(ctx))?;
        constraints
            .insert(position, value)
            .map_err(validation(ctx))?;
    }
    Ok(constraints)
}

fn parse_severity(value: &str, context: &str) -> Result<Severity, LoadError> {
    Severity::parse(value).ok_or_else(|| LoadError::UnknownSeverity {
        context: context.to_string(),
        value: value.to_string(),
    })
}
