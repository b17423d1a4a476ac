//! Consumed and produced media types.

use std::collections::BTreeSet;

use crate::config::ExtractorConfig;
use crate::descriptor::{Endpoint, Operation};

/// Resolves the media types of an operation.
///
/// Operation-level markers win over type-level ones. When neither declares
/// anything the configured default applies, so the result is never empty.
pub struct MediaResolver;

impl MediaResolver {
    pub fn consumes(
        operation: &Operation,
        endpoint: &Endpoint,
        config: &ExtractorConfig,
    ) -> BTreeSet<String> {
        resolve(operation.consumed(), endpoint.consumed(), config)
    }

    pub fn produces(
        operation: &Operation,
        endpoint: &Endpoint,
        config: &ExtractorConfig,
    ) -> BTreeSet<String> {
        resolve(operation.produced(), endpoint.produced(), config)
    }
}

fn resolve(operation: &[String], owner: &[String], config: &ExtractorConfig) -> BTreeSet<String> {
    let declared = clean(operation);
    if !declared.is_empty() {
        return declared;
    }
    let declared = clean(owner);
    if !declared.is_empty() {
        return declared;
    }
    BTreeSet::from([config.default_media.clone()])
}

fn clean(media: &[String]) -> BTreeSet<String> {
    media
        .iter()
        .filter_map(|m| canonical(m))
        .collect()
}

/// Lowercases `type/subtype`; parameters keep their declared case.
fn canonical(media: &str) -> Option<String> {
    let media = media.trim();
    if media.is_empty() {
        return None;
    }
    Some(match media.split_once(';') {
        Some((essence, params)) => {
            format!("{}; {}", essence.trim().to_ascii_lowercase(), params.trim())
        }
        None => media.to_ascii_lowercase(),
    })
}
