//! Black-box tests for the `cadence` binary.

use std::sync::Arc;

use cadence_core::db::establish_connection;
use cadence_core::repository::SqliteRepository;
use predicates::prelude::*;

mod helpers;
use helpers::CliTestHarness;

#[test]
fn test_help_lists_commands() {
    let harness = CliTestHarness::new();
    harness
        .run_success(&["--help"])
        .stdout(predicate::str::contains("rule"))
        .stdout(predicate::str::contains("refresh"))
        .stdout(predicate::str::contains("preview"));
    harness.run_failure(&["bogus"]);
}

#[test]
fn test_weekly_rule_refresh_is_idempotent() {
    let harness = CliTestHarness::new();
    harness.add_rule(&[
        "Timesheet", "--every", "weekly", "--on", "mon,fri", "--start", "2024-01-01",
    ]);

    harness
        .run_success(&["refresh", "--today", "2024-01-01", "--horizon", "14"])
        .stdout(predicate::str::contains("Generated 3 task(s)"))
        .stdout(predicate::str::contains("2024-01-05"))
        .stdout(predicate::str::contains("2024-01-08"))
        .stdout(predicate::str::contains("2024-01-12"));

    harness
        .run_success(&["refresh", "--today", "2024-01-01", "--horizon", "14"])
        .stdout(predicate::str::contains("Generated 0 task(s)"));

    harness
        .run_success(&["tasks"])
        .stdout(predicate::str::contains("Timesheet").count(3));
}

#[test]
fn test_invalid_rule_is_rejected() {
    let harness = CliTestHarness::new();
    harness
        .run_failure(&["rule", "add", "Broken", "--every", "weekly", "--on", "9"])
        .stderr(predicate::str::contains("Invalid rule"));
    harness
        .run_failure(&["rule", "add", "Broken", "--every", "daily", "--interval", "0"])
        .stderr(predicate::str::contains("Invalid rule"));
    harness
        .run_failure(&["rule", "add", "Broken", "--every", "fortnightly"]);
    harness
        .run_success(&["rule", "list", "--all"])
        .stdout(predicate::str::contains("No rules found."));
}

#[test]
fn test_completion_by_rule_and_date() {
    let harness = CliTestHarness::new();
    let id = harness.add_rule(&[
        "Standup", "--every", "daily", "--start", "2024-01-01", "--until", "2024-01-03",
    ]);

    harness
        .run_success(&["complete", &id, "2024-01-01"])
        .stdout(predicate::str::contains("Created next task 'Standup' due 2024-01-02"));
    harness
        .run_success(&["complete", &id, "2024-01-01"])
        .stdout(predicate::str::contains("No new occurrence generated."));
    harness
        .run_success(&["complete", &id, "2024-01-03"])
        .stdout(predicate::str::contains("No new occurrence generated."));
}

#[tokio::test]
async fn test_done_generates_successor_and_updates_status() {
    let harness = CliTestHarness::new();
    let id = harness.add_rule(&[
        "Invoice", "--every", "monthly", "--day", "31", "--start", "2024-01-31",
    ]);
    harness.run_success(&["complete", &id, "2024-01-31"]);

    let pool = establish_connection(&harness.db_path().to_string_lossy()).await.unwrap();
    let repo = Arc::new(SqliteRepository::new(pool));
    let tasks = repo.find_tasks(false).await.unwrap();
    assert_eq!(tasks.len(), 1);
    assert_eq!(tasks[0].due_date.to_string(), "2024-02-29");

    harness
        .run_success(&["done", &tasks[0].id])
        .stdout(predicate::str::contains("Completed task: 'Invoice'"))
        .stdout(predicate::str::contains("due 2024-03-31"));

    harness
        .run_success(&["rule", "show", &id])
        .stdout(predicate::str::contains("1/2 completed"))
        .stdout(predicate::str::contains("every month on day 31"))
        .stdout(predicate::str::contains("2024-04-30"));
}

#[test]
fn test_preview_clamps_to_month_end() {
    let harness = CliTestHarness::new();
    let id = harness.add_rule(&[
        "Rent", "--every", "monthly", "--day", "31", "--start", "2024-01-01",
    ]);

    harness
        .run_success(&["preview", &id, "--after", "2024-01-31", "--count", "3"])
        .stdout(predicate::str::contains("2024-02-29"))
        .stdout(predicate::str::contains("2024-03-31"))
        .stdout(predicate::str::contains("2024-04-30"))
        .stdout(predicate::str::contains("2024-05-31").not());
}

#[test]
fn test_disable_and_enable() {
    let harness = CliTestHarness::new();
    let id = harness.add_rule(&["Water plants", "--every", "daily", "--start", "2024-01-01"]);

    harness
        .run_success(&["rule", "disable", &id])
        .stdout(predicate::str::contains("Disabled rule 'Water plants'"));
    harness
        .run_success(&["rule", "list"])
        .stdout(predicate::str::contains("No rules found."));
    harness
        .run_success(&["rule", "list", "--all"])
        .stdout(predicate::str::contains("Water plants"));
    harness
        .run_success(&["refresh", "--today", "2024-01-01", "--horizon", "5"])
        .stdout(predicate::str::contains("Generated 0 task(s)"));

    harness.run_success(&["rule", "enable", &id]);
    harness
        .run_success(&["refresh", "--today", "2024-01-01", "--horizon", "5"])
        .stdout(predicate::str::contains("Generated 4 task(s)"));
}

#[test]
fn test_edit_changes_pattern() {
    let harness = CliTestHarness::new();
    let id = harness.add_rule(&["Review", "--every", "daily", "--start", "2024-01-01"]);

    harness
        .run_success(&["rule", "edit", &id, "--every", "weekly", "--on", "wed", "--interval", "2"])
        .stdout(predicate::str::contains("every 2 weeks on Wed"));
    harness
        .run_success(&["preview", &id, "--after", "2024-01-01", "--count", "2"])
        .stdout(predicate::str::contains("2024-01-03"))
        .stdout(predicate::str::contains("2024-01-17"));
}

#[test]
fn test_accounts_are_isolated() {
    let harness = CliTestHarness::new();
    let id = harness.add_rule(&["Payroll", "--account", "work", "--every", "daily", "--start", "2024-01-01"]);

    harness
        .run_success(&["rule", "list"])
        .stdout(predicate::str::contains("No rules found."));
    harness
        .run_success(&["rule", "list", "--account", "work"])
        .stdout(predicate::str::contains("Payroll"));
    harness
        .run_success(&["refresh", "--today", "2024-01-01", "--horizon", "3"])
        .stdout(predicate::str::contains("Generated 0 task(s)"));

    // A rule id from another account resolves to nothing.
    harness
        .run_failure(&["rule", "disable", &id])
        .stderr(predicate::str::contains("No rule found"));
    harness.run_failure(&["rule", "show", &id]);
    harness.run_failure(&["preview", &id]);
    harness.run_failure(&["complete", &id, "2024-01-01"]);
    harness
        .run_success(&["rule", "list", "--account", "work"])
        .stdout(predicate::str::contains("yes"));

    harness
        .run_success(&["rule", "disable", &id, "--account", "work"])
        .stdout(predicate::str::contains("Disabled rule 'Payroll'"));
}

#[test]
fn test_unknown_ids() {
    let harness = CliTestHarness::new();
    harness
        .run_failure(&["rule", "show", "ffffffff"])
        .stderr(predicate::str::contains("No rule found"));
    harness
        .run_failure(&["done", "x"])
        .stderr(predicate::str::contains("at least 2 characters"));
}
