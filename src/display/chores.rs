//! Chore views

use tabled::Tabled;

use super::{date, progress_bar, table, truncate};
use crate::config::settings::Settings;
use crate::engine::ChoreShare;
use crate::models::ChoreTemplate;
use crate::services::{ChoreStatement, LoggedChore};

fn points(value: f64) -> String {
    if value.fract() == 0.0 {
        format!("{:.0}", value)
    } else {
        format!("{:.2}", value)
    }
}

#[derive(Tabled)]
struct TemplateRow {
    #[tabled(rename = "ID")]
    id: String,
    #[tabled(rename = "Chore")]
    name: String,
    #[tabled(rename = "Kind")]
    kind: String,
    #[tabled(rename = "Weight")]
    weight: String,
    #[tabled(rename = "")]
    origin: &'static str,
}

pub fn format_chore_templates(templates: &[ChoreTemplate]) -> String {
    if templates.is_empty() {
        return "No chores available.".to_string();
    }

    table(
        templates
            .iter()
            .map(|t| TemplateRow {
                id: t.id.to_string(),
                name: t.name.clone(),
                kind: t.kind.to_string(),
                weight: format!("{} ({})", t.weight, t.weight.points()),
                origin: if t.is_built_in() { "built-in" } else { "" },
            })
            .collect(),
    )
}

#[derive(Tabled)]
struct EntryRow {
    #[tabled(rename = "ID")]
    id: String,
    #[tabled(rename = "Date")]
    date: String,
    #[tabled(rename = "Chore")]
    chore: String,
    #[tabled(rename = "Member")]
    member: String,
    #[tabled(rename = "Hours")]
    hours: String,
    #[tabled(rename = "Points")]
    points: String,
    #[tabled(rename = "Note")]
    note: String,
}

pub fn format_chore_entries(entries: &[LoggedChore], settings: &Settings) -> String {
    if entries.is_empty() {
        return "No chores logged for this month.".to_string();
    }

    table(
        entries
            .iter()
            .map(|c| EntryRow {
                id: c.entry.id.to_string(),
                date: date(settings, c.entry.completed_on),
                chore: c.template.name.clone(),
                member: c.member.clone(),
                hours: c.entry.hours.map(points).unwrap_or_else(|| "-".to_string()),
                points: points(c.points()),
                note: truncate(&c.entry.note, 24),
            })
            .collect(),
    )
}

#[derive(Tabled)]
struct ShareRow {
    #[tabled(rename = "Member")]
    name: String,
    #[tabled(rename = "Points")]
    points: String,
    #[tabled(rename = "Share")]
    share: String,
}

pub fn format_chore_statement(statement: &ChoreStatement) -> String {
    let report = &statement.report;
    let mut output = format!(
        "Chores for {}: {}\n\n",
        statement.household.name, statement.period
    );

    let row = |share: &ChoreShare| ShareRow {
        name: statement.member_name(share.user_id).to_string(),
        points: points(share.points),
        share: format!("{} {:>5.1}%", progress_bar(share.percentage, 10), share.percentage),
    };
    output.push_str(&table(vec![row(&report.user1), row(&report.user2)]));
    output.push('\n');

    output.push_str(&format!(
        "{} chores, {} points\n",
        statement.entries,
        points(report.total_points)
    ));
    if report.total_points <= 0.0 {
        output.push_str("Nothing logged yet.\n");
    } else {
        match report.leader() {
            Some(leader) => output.push_str(&format!(
                "{} did {:.1}% of the chores\n",
                statement.member_name(leader.user_id),
                leader.percentage
            )),
            None => output.push_str("Chores were shared evenly.\n"),
        }
    }

    output
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::engine::{compute_chore_equity, ChoreRecord};
    use crate::models::{
        built_in_chores, ChoreEntry, ChoreWeight, Household, MonthPeriod, User,
    };
    use chrono::NaiveDate;

    fn statement(records: impl Fn(&User, &User) -> Vec<ChoreRecord>) -> ChoreStatement {
        let household = Household::new("Home", "ABCD1234");
        let (ana, bruno) = (User::new("Ana", ""), User::new("Bruno", ""));
        let chores = records(&ana, &bruno);
        let report = compute_chore_equity(&[ana.id, bruno.id], &chores).unwrap();
        ChoreStatement {
            household,
            period: MonthPeriod::new(2025, 3).unwrap(),
            user1: ana,
            user2: bruno,
            report,
            entries: chores.len(),
        }
    }

    #[test]
    fn test_statement_names_the_leader() {
        let output = format_chore_statement(&statement(|ana, bruno| {
            vec![
                ChoreRecord { user_id: ana.id, weight: ChoreWeight::Heavy, hours: Some(2.0) },
                ChoreRecord { user_id: ana.id, weight: ChoreWeight::Light, hours: None },
                ChoreRecord { user_id: bruno.id, weight: ChoreWeight::Medium, hours: Some(1.5) },
            ]
        }));
        assert!(output.contains("Chores for Home: 2025-03"));
        assert!(output.contains("3 chores, 10 points"));
        assert!(output.contains("Ana did 70.0% of the chores"));
    }

    #[test]
    fn test_statement_without_chores() {
        let output = format_chore_statement(&statement(|_, _| Vec::new()));
        assert!(output.contains("0 chores, 0 points"));
        assert!(output.contains("Nothing logged yet."));
    }

    #[test]
    fn test_entry_list_shows_points() {
        let template = built_in_chores().remove(0);
        let mut entry = ChoreEntry::new(
            crate::models::HouseholdId::new(),
            crate::models::UserId::new(),
            template.id,
            NaiveDate::from_ymd_opt(2025, 3, 4).unwrap(),
        );
        entry.hours = Some(1.5);
        let logged = LoggedChore {
            entry,
            template,
            member: "Bruno".into(),
        };

        let output = format_chore_entries(&[logged], &Settings::default());
        assert!(output.contains("Wash dishes"));
        assert!(output.contains("1.50"));
        assert!(output.contains("3"));
        assert!(output.contains("Bruno"));
        assert_eq!(
            format_chore_entries(&[], &Settings::default()),
            "No chores logged for this month."
        );
    }

    #[test]
    fn test_template_list_marks_built_ins() {
        let output = format_chore_templates(&built_in_chores());
        assert!(output.contains("built-in"));
        assert!(output.contains("Heavy (3)"));
    }
}
