use std::path::Path;

use anyhow::Context;
use matrec_audit::ReconciliationReport;
use serde::Serialize;

use crate::cli::OutputFormat;
use crate::ui;

pub mod table;

/// Render a serializable value as JSON. `table` has no generic layout here,
/// so it falls back to pretty JSON.
pub fn render<T: Serialize>(value: &T, format: OutputFormat) -> anyhow::Result<String> {
    match format {
        OutputFormat::Json | OutputFormat::Table => Ok(serde_json::to_string_pretty(value)?),
        OutputFormat::Raw => Ok(serde_json::to_string(value)?),
    }
}

/// Print a serializable value in the requested format.
pub fn output<T: Serialize>(value: &T, format: OutputFormat) -> anyhow::Result<()> {
    let rendered = render(value, format)?;
    println!("{rendered}");
    Ok(())
}

/// Render a report in the requested format.
pub fn render_report(report: &ReconciliationReport, format: OutputFormat) -> anyhow::Result<String> {
    match format {
        OutputFormat::Json => Ok(report.to_json(true)?),
        OutputFormat::Raw => Ok(report.to_json(false)?),
        OutputFormat::Table => Ok(render_report_table(report)),
    }
}

/// Write a report to `path`, or to stdout when no path is given.
pub fn write_report(
    report: &ReconciliationReport,
    format: OutputFormat,
    path: Option<&Path>,
) -> anyhow::Result<()> {
    let rendered = render_report(report, format)?;
    match path {
        Some(path) => std::fs::write(path, format!("{rendered}\n"))
            .with_context(|| format!("failed to write report to {}", path.display())),
        None => {
            println!("{rendered}");
            Ok(())
        }
    }
}

fn render_report_table(report: &ReconciliationReport) -> String {
    let prefs = ui::prefs();
    let options = table::TableOptions {
        max_width: prefs.term_width,
        color: prefs.table_color,
    };

    let s = &report.summary;
    let counts = [
        ("materials", s.materials),
        ("matched", s.matched),
        ("mismatched", s.mismatched),
        ("ambiguous", s.ambiguous),
        ("unattributed", s.unattributed),
        ("storage objects", s.storage_objects),
        ("orphaned folders", s.orphaned_teacher_folders),
        ("unregistered", s.unregistered_artifacts),
        ("complex classes", s.complex_classes),
        ("corrupt ordering", s.corrupt_ordering),
        ("warnings", s.warnings),
    ];
    let count_rows: Vec<Vec<String>> = counts
        .iter()
        .map(|(name, count)| vec![(*name).to_string(), count.to_string()])
        .collect();

    let findings = finding_rows(report);
    let mut out = table::render_table(&["category", "count"], &count_rows, options);
    out.push_str("\n\n");
    if findings.is_empty() {
        out.push_str("(no findings)");
    } else {
        out.push_str(&table::render_table(
            &["finding", "subject", "detail"],
            &findings,
            options,
        ));
    }
    out
}

fn finding_rows(report: &ReconciliationReport) -> Vec<Vec<String>> {
    let mut rows = Vec::new();
    let mut push = |kind: &str, subject: &str, detail: String| {
        rows.push(vec![kind.to_string(), subject.to_string(), detail]);
    };

    for a in &report.mismatched_materials {
        push("mismatched", &a.material_id, a.evidence.note.clone());
    }
    for a in &report.ambiguous_materials {
        let names: Vec<&str> = a.evidence.candidates.iter().map(|c| c.name.as_str()).collect();
        push("ambiguous", &a.material_id, names.join(", "));
    }
    for a in &report.unattributed_materials {
        push("unattributed", &a.material_id, a.evidence.note.clone());
    }
    for o in &report.orphaned_teacher_folders {
        push("orphaned_folder", &o.path, format!("{} objects", o.object_count));
    }
    for u in &report.unregistered_artifacts {
        push("unregistered", &u.path, u.matched_names.join(", "));
    }
    for c in &report.complex_classes {
        push("complex_class", &c.class_id, format!("{} materials", c.materials.len()));
    }
    for c in &report.corrupt_ordering {
        push(
            "corrupt_ordering",
            &c.class_id,
            format!(
                "duplicates {:?}, missing {:?}",
                c.duplicate_indices, c.missing_indices
            ),
        );
    }
    for w in &report.warnings {
        push("warning", &w.subject, format!("{}: {}", w.kind, w.message));
    }
    rows
}
