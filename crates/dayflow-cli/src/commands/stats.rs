use clap::Subcommand;
use dayflow_core::stats::{DayCount, SessionSummary};
use dayflow_core::StatsReport;

use super::{open_store, today};

#[derive(Subcommand)]
pub enum StatsAction {
    /// Streak, rolling average and today's count
    Show {
        /// Output the full report as JSON
        #[arg(long)]
        json: bool,
    },
    /// Tasks per day over the last 30 days
    Heatmap,
    /// Today's tasks per session against the targets
    Sessions,
}

/// One shade per heatmap bucket: 0, 1-2, 3-4, 5-7, 8+.
fn shade(count: u32) -> char {
    match count {
        0 => '.',
        1..=2 => '░',
        3..=4 => '▒',
        5..=7 => '▓',
        _ => '█',
    }
}

fn heatmap_row(day: &DayCount) -> String {
    format!("{}  {}  {}", day.day, shade(day.count), day.count)
}

fn session_row(summary: &SessionSummary) -> String {
    let mark = if summary.target_met { "done" } else { "" };
    format!(
        "{:<9}  {:<11}  {}/{}  {mark}",
        summary.name, summary.time_range, summary.count, summary.target
    )
    .trim_end()
    .to_string()
}

fn summary(report: &StatsReport) -> Vec<String> {
    vec![
        format!("Streak:          {} days", report.streak),
        format!("30-day average:  {:.2} tasks/day", report.rolling_average),
        format!("Today:           {} tasks", report.today_count),
        format!("Total:           {} tasks", report.total_tasks),
        format!(
            "Quietest day:    {} ({})",
            report.darkest_day.day, report.darkest_day.count
        ),
    ]
}

pub fn run(action: StatsAction) -> Result<(), Box<dyn std::error::Error>> {
    let store = open_store()?;
    let report = store.state().report(today());

    match action {
        StatsAction::Show { json } => {
            if json {
                println!("{}", serde_json::to_string_pretty(&report)?);
            } else {
                for line in summary(&report) {
                    println!("{line}");
                }
            }
        }
        StatsAction::Heatmap => {
            for day in &report.heatmap {
                println!("{}", heatmap_row(day));
            }
        }
        StatsAction::Sessions => {
            for session in &report.sessions {
                println!("{}", session_row(session));
            }
        }
    }
    Ok(())
}
