use std::io::{self, Write};
use std::path::PathBuf;

use implant_probe::analysis::{
    ANGSTROM_PER_NM, Classification, DepthReport, Histogram, NvAnalysis, NvCriteria,
    PairCriteria, PeriodicCell,
};

use crate::util::text::{angstrom, short_path, truncate};

const INDENT: &str = "      ";

const BOX_INNER_WIDTH: usize = 62;
const SAFE_TABLE_WIDTH: usize = BOX_INNER_WIDTH - INDENT.len();

const MAX_INPUT_ROWS: usize = 12;
const MAX_BIN_ROWS: usize = 20;

pub fn print_input_summary(inputs: &[PathBuf]) {
    let stderr = io::stderr();
    let mut out = stderr.lock();

    let mut rows: Vec<(String, String)> = inputs
        .iter()
        .take(MAX_INPUT_ROWS)
        .enumerate()
        .map(|(i, path)| (format!("#{}", i + 1), short_path(path)))
        .collect();

    if inputs.len() > MAX_INPUT_ROWS {
        rows.push((
            "…".to_string(),
            format!("{} more", inputs.len() - MAX_INPUT_ROWS),
        ));
    }

    print_kv_table(
        &mut out,
        &format!("Inputs ({})", inputs.len()),
        ("Input", "Path"),
        &rows,
    );
}

pub fn print_depth_report(report: &DepthReport) {
    let stderr = io::stderr();
    let mut out = stderr.lock();

    let kept = report.summaries().count();
    let skipped = report.skipped().count();

    let mut rows = vec![
        ("Files Used".to_string(), format!("{} of {}", kept, kept + skipped)),
        ("Depths".to_string(), report.depths.len().to_string()),
        ("Mean Depth".to_string(), angstrom(Some(report.mean_depth))),
        ("Deepest".to_string(), angstrom(report.depths.max())),
        (
            "Depth Limit".to_string(),
            report
                .max_depth
                .map(|l| format!("{l:.1} Å"))
                .unwrap_or_else(|| "none".to_string()),
        ),
        (
            "Bins".to_string(),
            format!(
                "{} × {:.2} Å",
                report.histogram.len(),
                report.histogram.width()
            ),
        ),
    ];

    for (path, reason) in report.skipped() {
        rows.push((format!("skip {}", short_path(path)), reason.to_string()));
    }

    print_kv_table(&mut out, "Depth Summary", ("Metric", "Value"), &rows);
    print_histogram_table(&mut out, &report.histogram);
}

pub fn print_classification(result: &Classification, criteria: &PairCriteria) {
    let stderr = io::stderr();
    let mut out = stderr.lock();

    let nm = |a: f64| format!("{:.1} nm", a / ANGSTROM_PER_NM);

    let rows = vec![
        ("Implants".to_string(), result.total.to_string()),
        (
            format!("Deeper {}", nm(criteria.min_depth)),
            result.deep.to_string(),
        ),
        (
            "Window".to_string(),
            format!(
                "{} – {}",
                nm(criteria.pair_min),
                nm(criteria.pair_max)
            ),
        ),
        ("Candidate Pairs".to_string(), result.candidate_pairs.to_string()),
        ("Isolation".to_string(), nm(criteria.isolation)),
        ("Isolated Pairs".to_string(), result.pairs.len().to_string()),
        ("Qualifying".to_string(), result.qualifying_count().to_string()),
    ];

    print_kv_table(&mut out, "Pair Classification", ("Metric", "Value"), &rows);
}

pub fn print_nv_summary(result: &NvAnalysis, criteria: &NvCriteria, cell: Option<&PeriodicCell>) {
    let stderr = io::stderr();
    let mut out = stderr.lock();
    print_kv_table(
        &mut out,
        "NV Centres",
        ("Metric", "Value"),
        &nv_rows(result, criteria, cell),
    );
}

fn nv_rows(
    result: &NvAnalysis,
    criteria: &NvCriteria,
    cell: Option<&PeriodicCell>,
) -> Vec<(String, String)> {
    let cell_label = match cell {
        Some(c) => {
            let [x, y, z] = c.lengths();
            format!("{x:.2} × {y:.2} × {z:.2} Å")
        }
        None => "open".to_string(),
    };

    let mut rows = vec![
        ("Nitrogen".to_string(), result.nitrogen.to_string()),
        ("Carbon".to_string(), result.carbon.to_string()),
        ("Cell".to_string(), cell_label),
        (
            "Neighbours".to_string(),
            format!(
                "{} within {:.2} Å",
                criteria.coordination, criteria.bond_cutoff
            ),
        ),
        ("Candidates".to_string(), result.candidates.len().to_string()),
        ("Pairs".to_string(), result.pairs.len().to_string()),
    ];

    if let Some(stats) = &result.stats {
        let a = |v: f64| angstrom(Some(v));
        rows.push(("Mean".to_string(), a(stats.mean)));
        rows.push(("Median".to_string(), a(stats.median)));
        rows.push((
            "P10 / P90".to_string(),
            format!("{} / {}", a(stats.p10), a(stats.p90)),
        ));
        rows.push((
            "P25 / P75".to_string(),
            format!("{} / {}", a(stats.p25), a(stats.p75)),
        ));
    }
    rows
}

fn print_histogram_table(out: &mut impl Write, histogram: &Histogram) {
    let range_w = 16usize;
    let count_w = 8usize;
    let sep_overhead = 6;
    let dist_w = SAFE_TABLE_WIDTH.saturating_sub(range_w + count_w + sep_overhead);
    let max_bar_width = dist_w.saturating_sub(8).min(20);

    let total = histogram.total();
    if total == 0 {
        return;
    }

    let occupied: Vec<_> = histogram.bins().filter(|b| b.count > 0).collect();

    let _ = writeln!(
        out,
        "{}┌─ {} ─┐",
        INDENT,
        truncate("Depth Distribution", SAFE_TABLE_WIDTH - 6)
    );
    let _ = writeln!(
        out,
        "{}┌{r_line}┬{c_line}┬{d_line}┐",
        INDENT,
        r_line = "─".repeat(range_w + 2),
        c_line = "─".repeat(count_w + 2),
        d_line = "─".repeat(dist_w + 2)
    );
    let _ = writeln!(
        out,
        "{}│ {:<range_w$} │ {:>count_w$} │ {:<dist_w$} │",
        INDENT, "Depth (Å)", "Count", "Distribution",
    );
    let _ = writeln!(
        out,
        "{}├{r_line}┼{c_line}┼{d_line}┤",
        INDENT,
        r_line = "─".repeat(range_w + 2),
        c_line = "─".repeat(count_w + 2),
        d_line = "─".repeat(dist_w + 2)
    );

    for bin in occupied.iter().take(MAX_BIN_ROWS) {
        let pct = (bin.count as f64 / total as f64) * 100.0;
        let range = format!("{:.1}–{:.1}", bin.lower, bin.upper);
        let dist_cell = format!("{}  {:>5.1}%", make_bar(pct, max_bar_width), pct);
        let _ = writeln!(
            out,
            "{}│ {:<range_w$} │ {:>count_w$} │ {:<dist_w$} │",
            INDENT,
            truncate(&range, range_w),
            bin.count,
            dist_cell,
        );
    }

    if occupied.len() > MAX_BIN_ROWS {
        let rest = format!("{} more bins", occupied.len() - MAX_BIN_ROWS);
        let _ = writeln!(
            out,
            "{}│ {:<range_w$} │ {:>count_w$} │ {:<dist_w$} │",
            INDENT, "…", "", rest,
        );
    }

    let _ = writeln!(
        out,
        "{}└{r_line}┴{c_line}┴{d_line}┘",
        INDENT,
        r_line = "─".repeat(range_w + 2),
        c_line = "─".repeat(count_w + 2),
        d_line = "─".repeat(dist_w + 2)
    );
}

fn print_kv_table(
    out: &mut impl Write,
    title: &str,
    (key_header, val_header): (&str, &str),
    rows: &[(String, String)],
) {
    let key_w = 16usize;
    let sep_overhead = 6;
    let val_w = SAFE_TABLE_WIDTH.saturating_sub(key_w + sep_overhead);

    let _ = writeln!(
        out,
        "{}┌─ {} ─┐",
        INDENT,
        truncate(title, SAFE_TABLE_WIDTH - 6)
    );
    let _ = writeln!(
        out,
        "{}┌{k_line}┬{v_line}┐",
        INDENT,
        k_line = "─".repeat(key_w + 2),
        v_line = "─".repeat(val_w + 2)
    );
    let _ = writeln!(
        out,
        "{}│ {:<key_w$} │ {:>val_w$} │",
        INDENT, key_header, val_header,
    );
    let _ = writeln!(
        out,
        "{}├{k_line}┼{v_line}┤",
        INDENT,
        k_line = "─".repeat(key_w + 2),
        v_line = "─".repeat(val_w + 2)
    );

    for (key, val) in rows {
        let _ = writeln!(
            out,
            "{}│ {:<key_w$} │ {:>val_w$} │",
            INDENT,
            truncate(key, key_w),
            truncate(val, val_w),
        );
    }

    let _ = writeln!(
        out,
        "{}└{k_line}┴{v_line}┘",
        INDENT,
        k_line = "─".repeat(key_w + 2),
        v_line = "─".repeat(val_w + 2)
    );
}

fn make_bar(pct: f64, max_width: usize) -> String {
    let filled = ((pct / 100.0) * max_width as f64).round() as usize;
    let empty = max_width.saturating_sub(filled);
    format!("{}{}", "█".repeat(filled), "░".repeat(empty))
}
