//! Validation of parsed configuration documents.

use std::collections::HashMap;

use miette::SourceSpan;
use odatagen_core::is_identifier;

use crate::{Config, Result, error::SourceContext};

/// Check the invariants serde cannot express.
pub(crate) fn validate_config(config: &Config, ctx: &SourceContext) -> Result<()> {
    if config.output.trim().is_empty() {
        return Err(ctx.validation_error_at(
            "output directory must not be empty",
            find_key_span(ctx.src(), "output"),
        ));
    }

    if config.services.is_empty() {
        return Err(ctx.validation_error_at(
            "at least one service must be configured",
            find_key_span(ctx.src(), "services"),
        ));
    }

    let mut seen: HashMap<&str, usize> = HashMap::new();
    for (index, service) in config.services.iter().enumerate() {
        let spans = find_value_spans(ctx.src(), &service.namespace);
        let occurrence = seen.get(service.namespace.as_str()).copied().unwrap_or(0);

        if let Some(reason) = namespace_error(&service.namespace) {
            return Err(ctx.invalid_identifier_error(
                &service.namespace,
                format!("namespace of service #{}", index + 1),
                reason,
                spans.get(occurrence).copied(),
            ));
        }

        if occurrence > 0 {
            return Err(ctx.duplicate_namespace_error(
                &service.namespace,
                spans.first().copied(),
                spans.get(occurrence).copied(),
            ));
        }
        seen.insert(&service.namespace, occurrence + 1);

        if service.metadata.trim().is_empty() {
            return Err(ctx.validation_error_at(
                format!("service '{}' has no metadata location", service.namespace),
                find_key_span(ctx.src(), "metadata"),
            ));
        }

        if let Some(context_name) = &service.context_name {
            if !is_identifier(context_name) {
                return Err(ctx.invalid_identifier_error(
                    context_name,
                    format!("context name of service '{}'", service.namespace),
                    identifier_reason(context_name),
                    find_value_spans(ctx.src(), context_name).first().copied(),
                ));
            }
        }
    }

    Ok(())
}

/// Namespaces may be dotted; every segment must be an identifier.
fn namespace_error(namespace: &str) -> Option<&'static str> {
    if namespace.is_empty() {
        return Some("namespace cannot be empty");
    }
    namespace
        .split('.')
        .find(|segment| !is_identifier(segment))
        .map(identifier_reason)
}

fn identifier_reason(name: &str) -> &'static str {
    match name.chars().next() {
        None => "name cannot be empty",
        Some(c) if !(c.is_alphabetic() || c == '_') => {
            "name must start with a letter or underscore"
        }
        _ => "name must contain only letters, numbers, and underscores",
    }
}

/// Find every quoted occurrence of `value` in the source.
///
/// Matches both TOML quoting styles and JSON strings; spans exclude quotes.
pub(crate) fn find_value_spans(src: &str, value: &str) -> Vec<SourceSpan> {
    let mut spans = Vec::new();
    for quote in ['"', '\''] {
        let pattern = format!("{quote}{value}{quote}");
        spans.extend(
            src.match_indices(&pattern)
                .map(|(pos, _)| SourceSpan::from((pos + 1, value.len()))),
        );
    }
    spans.sort_by_key(|span| span.offset());
    spans
}

/// Find a key as written in TOML (`key =`, `[[key]]`) or JSON (`"key":`).
pub(crate) fn find_key_span(src: &str, key: &str) -> Option<SourceSpan> {
    let patterns = [
        format!("[[{key}]]"),
        format!("\"{key}\""),
        format!("{key} ="),
        format!("{key}="),
    ];

    patterns.iter().find_map(|pattern| {
        src.find(pattern.as_str()).map(|pos| {
            let start = pos + pattern.find(key).unwrap_or(0);
            SourceSpan::from((start, key.len()))
        })
    })
}
