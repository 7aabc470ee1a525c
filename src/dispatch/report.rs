// gitconductor: GitLab Group Mirror Tool
//
// SPDX-FileCopyrightText: 2026 Romeo Ahmed
// SPDX-License-Identifier: GPL-3.0-or-later

//! Progress and result reporting for a dispatch.
//!
//! The dispatcher talks to a [`Reporter`] only; it never writes to the
//! terminal itself.

use std::sync::OnceLock;

use indicatif::{ProgressBar, ProgressDrawTarget, ProgressStyle};

use super::{OperationKind, Outcome, ResultRow, Summary};
use crate::viz::format_table;

/// Receives dispatch progress.
pub trait Reporter: Send {
    fn begin(&mut self, kind: OperationKind, total: usize);

    /// Called once per project, in traversal order.
    fn row(&mut self, row: &ResultRow);

    fn finish(&mut self, kind: OperationKind, rows: &[ResultRow], summary: &Summary);
}

fn bar_style() -> ProgressStyle {
    static STYLE: OnceLock<ProgressStyle> = OnceLock::new();
    STYLE
        .get_or_init(|| {
            ProgressStyle::with_template(
                "{spinner:.green} [{elapsed_precise}] [{wide_bar:.cyan/blue}] {pos}/{len} {msg}",
            )
            .unwrap_or_else(|_| ProgressStyle::default_bar())
            .progress_chars("#>-")
        })
        .clone()
}

/// Progress bar on stderr, result table on stdout.
#[derive(Debug, Default)]
pub struct ConsoleReporter {
    quiet: bool,
    bar: Option<ProgressBar>,
}

impl ConsoleReporter {
    #[must_use]
    pub fn new(quiet: bool) -> Self {
        Self { quiet, bar: None }
    }
}

impl Reporter for ConsoleReporter {
    fn begin(&mut self, kind: OperationKind, total: usize) {
        if self.quiet {
            return;
        }
        let len = u64::try_from(total).unwrap_or(u64::MAX);
        let bar = ProgressBar::with_draw_target(Some(len), ProgressDrawTarget::stderr());
        bar.set_style(bar_style());
        bar.set_message(kind.name());
        self.bar = Some(bar);
    }

    fn row(&mut self, row: &ResultRow) {
        if let Some(bar) = &self.bar {
            bar.set_message(row.fullname.clone());
            bar.inc(1);
        }
    }

    fn finish(&mut self, kind: OperationKind, rows: &[ResultRow], summary: &Summary) {
        if let Some(bar) = self.bar.take() {
            bar.finish_and_clear();
        }
        let table = render_rows(kind, rows);
        if !table.is_empty() {
            println!("{table}");
        }
        if !self.quiet {
            eprintln!("{summary}");
        }
    }
}

/// Keeps every row; used where no terminal is involved.
#[derive(Debug, Default)]
pub struct CollectingReporter {
    pub begun: Option<(OperationKind, usize)>,
    pub rows: Vec<ResultRow>,
    pub summary: Option<Summary>,
}

impl Reporter for CollectingReporter {
    fn begin(&mut self, kind: OperationKind, total: usize) {
        self.begun = Some((kind, total));
    }

    fn row(&mut self, row: &ResultRow) {
        self.rows.push(row.clone());
    }

    fn finish(&mut self, _kind: OperationKind, _rows: &[ResultRow], summary: &Summary) {
        self.summary = Some(*summary);
    }
}

fn result_cell(outcome: &Outcome) -> String {
    match outcome {
        Outcome::Cloned => "cloned".to_string(),
        Outcome::AlreadyCloned => "already cloned".to_string(),
        Outcome::BranchCreated { .. } => "created".to_string(),
        Outcome::CheckedOut { .. } => "switched".to_string(),
        Outcome::Staged { files } => format!("{} staged", files.len()),
        Outcome::Committed { files, .. } => format!("{} committed", files.len()),
        Outcome::NothingToCommit => "nothing to commit".to_string(),
        Outcome::Status(status) if status.is_clean() => "clean".to_string(),
        Outcome::Status(_) => "changed".to_string(),
        Outcome::Pushed => "pushed".to_string(),
        Outcome::Failed(message) => format!("error: {message}"),
        Outcome::Cancelled => "cancelled".to_string(),
    }
}

/// Column headers and cells for the rows of one operation.
#[must_use]
pub fn table_for(kind: OperationKind, rows: &[ResultRow]) -> (Vec<&'static str>, Vec<Vec<String>>) {
    let headers = match kind {
        OperationKind::Clone => vec!["Name", "Tree", "Branch", "Path", "Remote", "Result"],
        OperationKind::Branch | OperationKind::Checkout => {
            vec!["Name", "Tree", "Old Branch", "New Branch", "Result"]
        }
        OperationKind::Add => vec!["Name", "Branch", "File"],
        OperationKind::Commit => vec!["Name", "Branch", "File", "Message"],
        OperationKind::Status => vec!["Repository", "File", "Status"],
        OperationKind::Push => vec!["Name", "Branch", "Remote", "Result"],
    };

    let mut cells = Vec::new();
    for row in rows {
        let result = result_cell(&row.outcome);
        match (&row.outcome, kind) {
            (_, OperationKind::Clone) => cells.push(vec![
                row.name.clone(),
                row.fullname.clone(),
                row.branch.clone(),
                row.rel_path.clone(),
                row.remote.clone(),
                result,
            ]),
            (
                Outcome::BranchCreated { from, name } | Outcome::CheckedOut { from, name },
                _,
            ) => cells.push(vec![
                row.name.clone(),
                row.fullname.clone(),
                from.clone(),
                name.clone(),
                result,
            ]),
            (_, OperationKind::Branch | OperationKind::Checkout) => cells.push(vec![
                row.name.clone(),
                row.fullname.clone(),
                row.branch.clone(),
                String::new(),
                result,
            ]),
            (Outcome::Staged { files }, _) => cells.extend(
                files
                    .iter()
                    .map(|f| vec![row.name.clone(), row.branch.clone(), f.clone()]),
            ),
            (Outcome::Committed { files, message }, _) => {
                cells.extend(files.iter().map(|f| {
                    vec![row.name.clone(), row.branch.clone(), f.clone(), message.clone()]
                }));
            }
            (Outcome::NothingToCommit, _) => {}
            (Outcome::Status(status), _) => {
                let groups = [
                    (&status.staged, "Changes to be committed"),
                    (&status.modified, "Changes not staged for commit"),
                    (&status.untracked, "Untracked files"),
                ];
                for (files, label) in groups {
                    cells.extend(
                        files
                            .iter()
                            .map(|f| vec![row.fullname.clone(), f.clone(), label.to_string()]),
                    );
                }
            }
            (_, OperationKind::Status) => {
                cells.push(vec![row.fullname.clone(), String::new(), result]);
            }
            (_, OperationKind::Add) => {
                cells.push(vec![row.name.clone(), row.branch.clone(), result]);
            }
            (_, OperationKind::Commit) => {
                cells.push(vec![row.name.clone(), row.branch.clone(), String::new(), result]);
            }
            (_, OperationKind::Push) => cells.push(vec![
                row.name.clone(),
                row.branch.clone(),
                row.remote.clone(),
                result,
            ]),
        }
    }
    (headers, cells)
}

/// Render the rows of one operation as an aligned table.
///
/// Returns an empty string if there is nothing to show.
#[must_use]
pub fn render_rows(kind: OperationKind, rows: &[ResultRow]) -> String {
    let (headers, cells) = table_for(kind, rows);
    if cells.is_empty() {
        return String::new();
    }
    format_table(&headers, &cells)
}
