use cadence_core::models::{Frequency, RecurrenceRule, RuleStatus};
use cadence_core::repository::LocalTask;
use chrono::{Month, NaiveDate, Utc, Weekday};
use comfy_table::{Attribute, Cell, Color, Row, Table};

use crate::util::short_id;

/// Human-readable summary such as "every 2 weeks on Mon, Fri".
pub fn describe_pattern(rule: &RecurrenceRule) -> String {
    let every = |unit: &str| {
        if rule.interval == 1 {
            format!("every {}", unit)
        } else {
            format!("every {} {}s", rule.interval, unit)
        }
    };

    match &rule.frequency {
        Frequency::Daily => every("day"),
        Frequency::Weekly { weekdays } | Frequency::Custom { weekdays } => {
            let days: Vec<String> = weekdays
                .iter()
                .filter_map(|d| Weekday::try_from(*d).ok())
                .map(|d| d.to_string())
                .collect();
            format!("{} on {}", every("week"), days.join(", "))
        }
        Frequency::Monthly { day_of_month } => format!("{} on day {}", every("month"), day_of_month),
        Frequency::Yearly {
            month_of_year,
            day_of_month,
        } => {
            let month = u8::try_from(*month_of_year)
                .ok()
                .and_then(|m| Month::try_from(m).ok())
                .map(|m| m.name().get(..3).unwrap_or(m.name()))
                .unwrap_or("?");
            format!("{} on {} {}", every("year"), month, day_of_month)
        }
    }
}

pub fn display_rules(rules: &[RecurrenceRule]) {
    if rules.is_empty() {
        println!("No rules found.");
        return;
    }

    let mut table = Table::new();
    table.set_header(vec!["ID", "Title", "Pattern", "Start", "Until", "List", "Active"]);

    for rule in rules {
        let mut row = Row::new();
        row.add_cell(Cell::new(short_id(&rule.id.to_string(), 8)));

        let title = Cell::new(&rule.title);
        row.add_cell(if rule.is_active {
            title
        } else {
            title.fg(Color::DarkGrey)
        });
        row.add_cell(Cell::new(describe_pattern(rule)));
        row.add_cell(Cell::new(rule.start_date));
        row.add_cell(Cell::new(
            rule.end_date.map(|d| d.to_string()).unwrap_or_else(|| "-".to_string()),
        ));
        row.add_cell(Cell::new(&rule.list_id));
        row.add_cell(if rule.is_active {
            Cell::new("yes").fg(Color::Green)
        } else {
            Cell::new("no").fg(Color::DarkGrey)
        });
        table.add_row(row);
    }

    println!("{table}");
}

pub fn display_tasks(tasks: &[LocalTask]) {
    if tasks.is_empty() {
        println!("No tasks found.");
        return;
    }

    let today = Utc::now().date_naive();
    let mut table = Table::new();
    table.set_header(vec!["ID", "Title", "Due", "List", "Status"]);

    for task in tasks {
        let mut row = Row::new();
        row.add_cell(Cell::new(short_id(&task.id, 8)));

        let mut title = Cell::new(&task.title);
        if task.completed {
            title = title.add_attribute(Attribute::CrossedOut).fg(Color::DarkGrey);
        }
        row.add_cell(title);

        let due = Cell::new(task.due_date);
        row.add_cell(match (task.completed, task.due_date.cmp(&today)) {
            (false, std::cmp::Ordering::Less) => due.fg(Color::Red),
            (false, std::cmp::Ordering::Equal) => due.fg(Color::Yellow),
            _ => due,
        });
        row.add_cell(Cell::new(&task.list_id));
        row.add_cell(if task.completed {
            Cell::new("Completed").fg(Color::Green)
        } else {
            Cell::new("Pending")
        });
        table.add_row(row);
    }

    println!("{table}");
}

/// Prints a rule followed by its instance history.
pub fn display_rule_status(status: &RuleStatus) {
    let rule = &status.rule;
    if rule.is_active {
        println!("{}", rule.title);
    } else {
        println!("{} (disabled)", rule.title);
    }
    println!("  ID:       {}", rule.id);
    println!("  Pattern:  {}", describe_pattern(rule));
    println!("  Start:    {}", rule.start_date);
    if let Some(end) = rule.end_date {
        println!("  Until:    {}", end);
    }
    println!("  List:     {}", rule.list_id);
    println!("  Source:   {}", rule.source_task_id);
    if let Some(notes) = &rule.notes {
        println!("  Notes:    {}", notes);
    }
    println!(
        "  Progress: {}/{} completed",
        status.completed_instances(),
        status.instances.len()
    );
    match status.next_due_date {
        Some(next) => println!("  Next:     {}", next),
        None => println!("  Next:     -"),
    }

    if status.instances.is_empty() {
        return;
    }

    let mut table = Table::new();
    table.set_header(vec!["Due", "Task", "Done"]);
    for instance in &status.instances {
        let done = status.is_completed(instance);
        table.add_row(vec![
            Cell::new(instance.due_date),
            Cell::new(short_id(&instance.generated_task_id, 8)),
            if done {
                Cell::new("✓").fg(Color::Green)
            } else {
                Cell::new("")
            },
        ]);
    }
    println!("{table}");
}

pub fn display_dates(dates: &[NaiveDate]) {
    if dates.is_empty() {
        println!("No upcoming occurrences.");
        return;
    }
    for date in dates {
        println!("{}  {}", date, date.format("%A"));
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use cadence_core::models::RuleSpec;

    fn rule(frequency: Frequency, interval: u32) -> RecurrenceRule {
        RecurrenceRule::from_spec(RuleSpec {
            source_task_id: "t".to_string(),
            list_id: "inbox".to_string(),
            account_scope: "me".to_string(),
            frequency,
            interval,
            start_date: NaiveDate::from_ymd_opt(2024, 1, 1).unwrap(),
            end_date: None,
            title: "x".to_string(),
            notes: None,
        })
    }

    #[test]
    fn test_describe_pattern() {
        assert_eq!(describe_pattern(&rule(Frequency::Daily, 1)), "every day");
        assert_eq!(
            describe_pattern(&rule(
                Frequency::Weekly {
                    weekdays: [4, 0].into_iter().collect()
                },
                2
            )),
            "every 2 weeks on Mon, Fri"
        );
        assert_eq!(
            describe_pattern(&rule(
                Frequency::Custom {
                    weekdays: [6].into_iter().collect()
                },
                1
            )),
            "every week on Sun"
        );
        assert_eq!(
            describe_pattern(&rule(Frequency::Monthly { day_of_month: 31 }, 1)),
            "every month on day 31"
        );
        assert_eq!(
            describe_pattern(&rule(
                Frequency::Yearly {
                    month_of_year: 2,
                    day_of_month: 29
                },
                1
            )),
            "every year on Feb 29"
        );
    }
}
