//! # Rendering
//!
//! Plain string builders for terminal output. Every function returns a
//! `String` so tests can compare output without capturing stdout; the
//! handlers in `commands.rs` do the printing.
//!
//! Column math is Unicode-aware (`unicode-width`), so project names with wide
//! characters still line up. Colors come from `colored` and are switched off
//! by the caller when stdout is not a terminal.

use colored::Colorize;
use patchbook_store::{CleanupReport, DeleteOutcome, Project, ProjectVersion, Stats, Timestamp};
use unicode_width::{UnicodeWidthChar, UnicodeWidthStr};

pub const LINE_WIDTH: usize = 100;
pub const ID_WIDTH: usize = 18;
pub const TIME_WIDTH: usize = 16;
const ELLIPSIS: char = '…';

/// Lines of `id  name  updated`, newest first (the order given).
pub fn project_list(projects: &[Project], now: Timestamp) -> String {
    if projects.is_empty() {
        return format!("{}\n", "No projects yet.".dimmed());
    }
    let name_width = LINE_WIDTH - ID_WIDTH - TIME_WIDTH - 4;
    let mut out = String::new();
    for project in projects {
        let name = truncate_to_width(&project.name, name_width);
        let padding = " ".repeat(name_width.saturating_sub(name.width()));
        out.push_str(&format!(
            "{:<id_w$}  {}{}  {}\n",
            project.id.as_str().dimmed(),
            name.bold(),
            padding,
            format_time_ago(project.updated_at, now).dimmed(),
            id_w = ID_WIDTH
        ));
    }
    out
}

pub fn project_detail(project: &Project, versions: &[ProjectVersion], now: Timestamp) -> String {
    let mut out = format!("{}  {}\n", project.name.bold(), project.id.as_str().dimmed());
    if let Some(description) = &project.description {
        out.push_str(&format!("{}\n", description));
    }
    out.push_str(&format!(
        "created {}, updated {}\n",
        format_time_ago(project.created_at, now).trim(),
        format_time_ago(project.updated_at, now).trim()
    ));
    out.push('\n');
    out.push_str(&project.code);
    if !project.code.ends_with('\n') {
        out.push('\n');
    }
    if !versions.is_empty() {
        out.push_str(&format!("\n{}\n", "Versions".underline()));
        out.push_str(&version_list(versions, now, false));
    }
    out
}

/// Lines of `id  [label]  when`, optionally prefixed by the owning project id.
pub fn version_list(versions: &[ProjectVersion], now: Timestamp, show_project: bool) -> String {
    if versions.is_empty() {
        return format!("{}\n", "No versions.".dimmed());
    }
    let mut out = String::new();
    for version in versions {
        if show_project {
            out.push_str(&format!(
                "{:<w$}  ",
                version.project_id.as_str().dimmed(),
                w = ID_WIDTH
            ));
        }
        let label = version
            .label
            .as_deref()
            .map(|l| truncate_to_width(l, 40))
            .unwrap_or_default();
        out.push_str(&format!(
            "{:<w$}  {:<40}  {}\n",
            version.id.as_str(),
            label.cyan(),
            format_time_ago(version.timestamp, now).dimmed(),
            w = ID_WIDTH
        ));
    }
    out
}

pub fn not_found(id: &str) -> String {
    format!("{}\n", format!("No project with id {id}.").dimmed())
}

pub fn saved(project: &Project) -> String {
    format!("Saved {} {}\n", project.name.bold(), project.id.as_str().dimmed())
}

pub fn snapshot(version: &ProjectVersion) -> String {
    match &version.label {
        Some(label) => format!("Recorded version {} ({})\n", version.id, label.cyan()),
        None => format!("Recorded version {}\n", version.id),
    }
}

pub fn deleted(project: &Project, outcome: &DeleteOutcome) -> String {
    format!(
        "Deleted {} and {} version{}\n",
        project.name.red(),
        outcome.versions_removed,
        plural(outcome.versions_removed)
    )
}

pub fn cleanup(report: &CleanupReport) -> String {
    if report.deleted == 0 {
        return "Nothing to clean up\n".to_string();
    }
    let mut out = format!(
        "Removed {} old version{} from {} project{}\n",
        report.deleted,
        plural(report.deleted),
        report.projects.len(),
        plural(report.projects.len())
    );
    for entry in &report.projects {
        out.push_str(&format!(
            "  {:<w$}  {}\n",
            entry.project_id.as_str().dimmed(),
            entry.deleted,
            w = ID_WIDTH
        ));
    }
    out
}

pub fn stats(stats: &Stats) -> String {
    format!(
        "{} project{}, {} version{}\n",
        stats.project_count,
        plural(stats.project_count),
        stats.version_count,
        plural(stats.version_count)
    )
}

fn plural(n: usize) -> &'static str {
    if n == 1 {
        ""
    } else {
        "s"
    }
}

/// Cut `text` to at most `width` display columns, ending in an ellipsis when
/// anything was dropped.
pub fn truncate_to_width(text: &str, width: usize) -> String {
    if text.width() <= width {
        return text.to_string();
    }
    if width == 0 {
        return String::new();
    }
    let budget = width - 1;
    let mut used = 0;
    let mut out = String::new();
    for c in text.chars() {
        let w = c.width().unwrap_or(0);
        if used + w > budget {
            break;
        }
        used += w;
        out.push(c);
    }
    out.push(ELLIPSIS);
    out
}

fn format_time_ago(timestamp: Timestamp, now: Timestamp) -> String {
    let elapsed = std::time::Duration::from_millis(now.saturating_sub(timestamp).max(0) as u64);
    let formatter = timeago::Formatter::new();
    format!("{:>width$}", formatter.convert(elapsed), width = TIME_WIDTH)
}

#[cfg(test)]
mod tests {
    use super::*;
    use patchbook_store::{Id, ProjectCleanup};

    const NOW: Timestamp = 1_704_067_200_000;

    fn project(name: &str, updated_at: Timestamp) -> Project {
        Project {
            id: Id::from("lqz5k2a1b3c4d5e6f7"),
            name: name.to_string(),
            code: "osc(440).out()".to_string(),
            description: None,
            created_at: updated_at,
            updated_at,
        }
    }

    fn plain() {
        colored::control::set_override(false);
    }

    #[test]
    fn test_truncate_to_width() {
        assert_eq!(truncate_to_width("Sine", 10), "Sine");
        assert_eq!(truncate_to_width("Sine Wave", 5), "Sine…");
        assert_eq!(truncate_to_width("Sine", 0), "");
        // Wide characters count as two columns
        assert_eq!(truncate_to_width("日本語の曲", 5), "日本…");
        assert!(truncate_to_width("日本語の曲", 5).width() <= 5);
    }

    #[test]
    fn test_project_list_columns() {
        plain();
        let out = project_list(&[project("Sine", NOW - 3 * 60 * 60 * 1000)], NOW);
        assert!(out.starts_with("lqz5k2a1b3c4d5e6f7  Sine"));
        assert!(out.trim_end().ends_with("3 hours ago"));
        assert_eq!(out.trim_end().width(), LINE_WIDTH);
    }

    #[test]
    fn test_empty_lists() {
        plain();
        assert_eq!(project_list(&[], NOW), "No projects yet.\n");
        assert_eq!(version_list(&[], NOW, true), "No versions.\n");
    }

    #[test]
    fn test_project_detail_includes_code_and_versions() {
        plain();
        let mut p = project("Sine", NOW);
        p.description = Some("A plain sine".into());
        let versions = vec![ProjectVersion {
            id: Id::from("v1"),
            project_id: p.id.clone(),
            code: "osc(441)".into(),
            timestamp: NOW,
            label: Some("detuned".into()),
        }];

        let out = project_detail(&p, &versions, NOW);
        assert!(out.contains("A plain sine\n"));
        assert!(out.contains("osc(440).out()\n"));
        assert!(out.contains("Versions"));
        assert!(out.contains("detuned"));
    }

    #[test]
    fn test_cleanup_summary() {
        plain();
        assert_eq!(cleanup(&CleanupReport::default()), "Nothing to clean up\n");

        let report = CleanupReport {
            deleted: 5,
            projects: vec![ProjectCleanup {
                project_id: Id::from("p1"),
                deleted: 5,
            }],
        };
        assert!(cleanup(&report).starts_with("Removed 5 old versions from 1 project\n"));
    }

    #[test]
    fn test_not_found_notice() {
        plain();
        assert_eq!(not_found("nope"), "No project with id nope.\n");
    }

    #[test]
    fn test_stats_pluralization() {
        let out = stats(&Stats {
            project_count: 1,
            version_count: 15,
        });
        assert_eq!(out, "1 project, 15 versions\n");
    }
}
