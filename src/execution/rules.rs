//! Rule evaluation - decides which watch rules fire for a set of changed files

use crate::core::{DiffError, Pattern, WatchRule};
use tracing::debug;

/// Select the rules that fire for `changed_files`, in declaration order.
///
/// A non-default rule fires when any file matches one of its paths and no
/// file matches one of its skip paths. The default rule fires alone, and
/// only when nothing else did.
pub fn evaluate_rules<'a>(
    changed_files: &[String],
    rules: &'a [WatchRule],
) -> Result<Vec<&'a WatchRule>, DiffError> {
    let mut default_rule: Option<&WatchRule> = None;
    let mut matched = Vec::new();

    for (index, rule) in rules.iter().enumerate() {
        if rule.is_default {
            if default_rule.is_some() {
                return Err(DiffError::ConfigParse(
                    "only one default watch rule is allowed".to_string(),
                ));
            }
            default_rule = Some(rule);
            continue;
        }

        let included = any_match(&rule.paths, changed_files);
        let skipped = included && any_match(&rule.skip_paths, changed_files);
        debug!(
            "watch rule {} ({}): matched={} skipped={}",
            index,
            describe(&rule.paths),
            included,
            skipped
        );

        if included && !skipped {
            matched.push(rule);
        }
    }

    if matched.is_empty() {
        if let Some(rule) = default_rule {
            debug!("no watch rule matched, using the default rule");
            return Ok(vec![rule]);
        }
    }

    Ok(matched)
}

fn any_match(patterns: &[Pattern], files: &[String]) -> bool {
    files
        .iter()
        .any(|file| patterns.iter().any(|pattern| pattern.matches(file)))
}

fn describe(patterns: &[Pattern]) -> String {
    patterns
        .iter()
        .map(Pattern::as_str)
        .collect::<Vec<_>>()
        .join(", ")
}
