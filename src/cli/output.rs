//! CLI output formatting

use crate::{
    core::{PluginConfig, RuleAction, WatchRule},
    execution::Outcome,
};
use console::Emoji;

// Re-export style
pub use console::style;

// Emojis for output
pub static CHECK: Emoji<'_, '_> = Emoji("✅ ", "✓ ");
pub static CROSS: Emoji<'_, '_> = Emoji("❌ ", "✗ ");
pub static INFO: Emoji<'_, '_> = Emoji("ℹ️  ", "i ");
pub static ROCKET: Emoji<'_, '_> = Emoji("🚀 ", "> ");

/// Format the result of an upload run
pub fn format_outcome(outcome: &Outcome) -> String {
    match outcome {
        Outcome::NoChanges => format!("{} No changes detected, nothing to upload", INFO),
        Outcome::NoSteps => format!("{} No watch rule produced steps, nothing to upload", INFO),
        Outcome::DryRun { .. } => format!("{} Dry run, pipeline not uploaded", INFO),
        Outcome::Uploaded { command, args } => format!(
            "{} Uploaded pipeline with {}",
            ROCKET,
            style(format!("{} {}", command, args.join(" "))).dim()
        ),
    }
}

/// One line describing a watch rule
pub fn format_watch_rule(rule: &WatchRule) -> String {
    let paths = if rule.is_default {
        style("(default)".to_string()).yellow().to_string()
    } else {
        rule.paths
            .iter()
            .map(|p| p.as_str())
            .collect::<Vec<_>>()
            .join(", ")
    };

    let action = match &rule.action {
        RuleAction::Static(_) => style("static step").cyan().to_string(),
        RuleAction::Generator(command) => format!("generator `{}`", style(command).cyan()),
    };

    if rule.skip_paths.is_empty() {
        format!("{} -> {}", paths, action)
    } else {
        let skip = rule
            .skip_paths
            .iter()
            .map(|p| p.as_str())
            .collect::<Vec<_>>()
            .join(", ");
        format!("{} (skip {}) -> {}", paths, style(skip).dim(), action)
    }
}

/// Summary printed by `validate`
pub fn format_config_summary(config: &PluginConfig) -> Vec<String> {
    let mut lines = vec![
        format!("  Diff: {}", style(&config.diff).bold()),
        format!("  Watch rules: {}", style(config.watch.len()).cyan()),
    ];
    for rule in &config.watch {
        lines.push(format!("    - {}", format_watch_rule(rule)));
    }
    lines.push(format!("  Wait barrier: {}", config.wait));
    lines.push(format!("  Hooks: {}", style(config.hooks.len()).cyan()));
    lines.push(format!("  Notify targets: {}", style(config.notify.len()).cyan()));
    lines.push(format!("  Interpolation: {}", config.interpolation));
    lines
}
