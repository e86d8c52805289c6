//! Scenario-based tests for monorepo-diff

mod helpers;

mod submission;
