//! Rendering of check reports in pretty, text and JSON modes.
//!
//! Text mode is the plain line format: grouped relations, then equality
//! groups that take part in none, then the verdict and any violations.

use std::io::{self, Write};

use ineqcheck_core::{Group, Operator, Report};
use serde::Serialize;

use crate::output::{OutputMode, pretty_kv, pretty_rule, pretty_section};

pub const CONSISTENT: &str = "inequalities are consistent";
pub const VIOLATED: &str = "strictness violated for these inequalities:";

/// A checked input, ready to render.
#[derive(Debug)]
pub struct Checked {
    pub source: String,
    pub report: Report<String>,
}

#[derive(Debug, Serialize)]
struct ReportView<'a> {
    source: &'a str,
    consistent: bool,
    violated: Vec<String>,
    groups: &'a [Group<String>],
    grouped: Vec<GroupedView>,
    condensed_edges: Vec<(usize, usize)>,
}

#[derive(Debug, Serialize)]
struct GroupedView {
    left: usize,
    op: Operator,
    right: usize,
    display: String,
}

impl<'a> ReportView<'a> {
    fn new(checked: &'a Checked) -> Self {
        let report = &checked.report;
        Self {
            source: &checked.source,
            consistent: report.consistent,
            violated: report.violated.iter().map(ToString::to_string).collect(),
            groups: &report.groups,
            grouped: report
                .grouped
                .iter()
                .filter_map(|rel| {
                    report.display_grouped(rel).map(|display| GroupedView {
                        left: rel.left,
                        op: rel.operator(),
                        right: rel.right,
                        display,
                    })
                })
                .collect(),
            condensed_edges: report.condensed.edges().map(|(u, v)| (*u, *v)).collect(),
        }
    }
}

/// Render all checked inputs in `mode`.
///
/// JSON mode writes a single object for one input and an array otherwise.
/// Human modes put a `==> source <==` header before each report when there
/// is more than one.
pub fn render_all(
    mode: OutputMode,
    checked: &[Checked],
    quiet: bool,
    w: &mut dyn Write,
) -> anyhow::Result<()> {
    if mode.is_json() {
        let views: Vec<ReportView<'_>> = checked.iter().map(ReportView::new).collect();
        match views.as_slice() {
            [single] => serde_json::to_writer_pretty(&mut *w, single)?,
            _ => serde_json::to_writer_pretty(&mut *w, &views)?,
        }
        writeln!(w)?;
        return Ok(());
    }

    let headers = checked.len() > 1;
    for (idx, item) in checked.iter().enumerate() {
        if headers {
            if idx > 0 {
                writeln!(w)?;
            }
            writeln!(w, "==> {} <==", item.source)?;
        }
        match mode {
            OutputMode::Pretty => render_pretty(&item.report, quiet, w)?,
            OutputMode::Text | OutputMode::Json => render_text(&item.report, quiet, w)?,
        }
    }
    Ok(())
}

/// Plain line output.
pub fn render_text(report: &Report<String>, quiet: bool, w: &mut dyn Write) -> io::Result<()> {
    for rel in &report.grouped {
        if let Some(line) = report.display_grouped(rel) {
            writeln!(w, "{line}")?;
        }
    }
    for group in report.standalone_groups() {
        writeln!(w, "{group}")?;
    }

    if report.consistent {
        if !quiet {
            writeln!(w, "{CONSISTENT}")?;
        }
    } else {
        writeln!(w, "{VIOLATED}")?;
        for rel in &report.violated {
            writeln!(w, "{rel}")?;
        }
    }
    Ok(())
}

fn render_pretty(report: &Report<String>, quiet: bool, w: &mut dyn Write) -> io::Result<()> {
    pretty_section(w, &format!("Grouped relations ({})", report.grouped.len()))?;
    if report.grouped.is_empty() {
        writeln!(w, "  (none)")?;
    }
    for rel in &report.grouped {
        if let Some(line) = report.display_grouped(rel) {
            writeln!(w, "  {line}")?;
        }
    }

    let standalone: Vec<&Group<String>> = report.standalone_groups().collect();
    if !standalone.is_empty() {
        writeln!(w)?;
        pretty_section(w, &format!("Equalities ({})", standalone.len()))?;
        for group in standalone {
            writeln!(w, "  {group}")?;
        }
    }

    writeln!(w)?;
    pretty_section(w, "Summary")?;
    pretty_kv(w, "terms", report.component_of.len().to_string())?;
    pretty_kv(w, "groups", report.groups.len().to_string())?;
    pretty_kv(w, "relations", report.grouped.len().to_string())?;
    pretty_kv(w, "violations", report.violated.len().to_string())?;

    if report.consistent {
        if !quiet {
            pretty_rule(w)?;
            writeln!(w, "✓ {CONSISTENT}")?;
        }
    } else {
        pretty_rule(w)?;
        writeln!(w, "✗ {VIOLATED}")?;
        for rel in &report.violated {
            writeln!(w, "  - {rel}")?;
        }
    }
    Ok(())
}
