// Report renderers for reconciliation output.
// Pure formatting: a finished report in, bytes out. No feedback into the
// engine; record order is preserved and the <missing> sentinel is printed
// literally.

use crosscheck_recon::ReconReport;

use crate::CliError;

pub const REPORT_CONTRACT_VERSION: u32 = 1;

// ---------------------------------------------------------------------------
// Text
// ---------------------------------------------------------------------------

pub fn render_text(report: &ReconReport) -> Vec<u8> {
    let mut out = String::new();

    if report.mismatches.is_empty() {
        out.push_str("all compared columns match in both datasets\n");
        return out.into_bytes();
    }

    out.push_str(&format!("found {} mismatches:\n\n", report.mismatches.len()));
    for m in &report.mismatches {
        out.push_str(&format!(
            "{}, column '{}': left='{}' right='{}'\n",
            m.locator, m.column, m.left, m.right
        ));
    }
    out.into_bytes()
}

// ---------------------------------------------------------------------------
// CSV
// ---------------------------------------------------------------------------

pub fn render_csv(report: &ReconReport) -> Result<Vec<u8>, CliError> {
    let mut writer = csv::WriterBuilder::new().from_writer(Vec::new());

    writer
        .write_record(["locator", "column", "left_value", "right_value"])
        .map_err(|e| CliError::io(e.to_string()))?;

    for m in &report.mismatches {
        let locator = m.locator.to_string();
        writer
            .write_record([
                locator.as_str(),
                m.column.as_str(),
                m.left.as_str(),
                m.right.as_str(),
            ])
            .map_err(|e| CliError::io(e.to_string()))?;
    }

    writer
        .into_inner()
        .map_err(|e| CliError::io(e.to_string()))
}

// ---------------------------------------------------------------------------
// HTML
// ---------------------------------------------------------------------------

pub fn render_html(report: &ReconReport) -> Vec<u8> {
    let s = &report.summary;
    let mut out = String::new();

    out.push_str("<!DOCTYPE html>\n<html>\n<head>\n<meta charset=\"utf-8\">\n");
    out.push_str("<title>Reconciliation report</title>\n");
    out.push_str(
        "<style>\n\
         body { font-family: sans-serif; margin: 2em; }\n\
         table { border-collapse: collapse; }\n\
         th, td { border: 1px solid #999; padding: 0.3em 0.8em; text-align: left; }\n\
         th { background: #eee; }\n\
         </style>\n</head>\n<body>\n",
    );
    out.push_str("<h1>Reconciliation report</h1>\n");
    out.push_str(&format!(
        "<p>mode: {} &middot; left: {} rows &middot; right: {} rows &middot; \
         compared: {} &middot; mismatches: {}</p>\n",
        report.meta.mode, s.left_rows, s.right_rows, s.compared, s.mismatches
    ));

    if report.mismatches.is_empty() {
        out.push_str("<p>all compared columns match in both datasets</p>\n");
    } else {
        out.push_str("<table>\n<thead><tr><th>locator</th><th>column</th>");
        out.push_str("<th>left value</th><th>right value</th></tr></thead>\n<tbody>\n");
        for m in &report.mismatches {
            out.push_str(&format!(
                "<tr><td>{}</td><td>{}</td><td>{}</td><td>{}</td></tr>\n",
                escape(&m.locator.to_string()),
                escape(&m.column),
                escape(&m.left),
                escape(&m.right)
            ));
        }
        out.push_str("</tbody>\n</table>\n");
    }

    out.push_str("</body>\n</html>\n");
    out.into_bytes()
}

fn escape(value: &str) -> String {
    let mut out = String::with_capacity(value.len());
    for c in value.chars() {
        match c {
            '&' => out.push_str("&amp;"),
            '<' => out.push_str("&lt;"),
            '>' => out.push_str("&gt;"),
            '"' => out.push_str("&quot;"),
            '\'' => out.push_str("&#39;"),
            _ => out.push(c),
        }
    }
    out
}

// ---------------------------------------------------------------------------
// JSON
// ---------------------------------------------------------------------------

pub fn render_json(report: &ReconReport) -> Result<Vec<u8>, CliError> {
    let top = serde_json::json!({
        "contract_version": REPORT_CONTRACT_VERSION,
        "meta": &report.meta,
        "summary": &report.summary,
        "mismatches": &report.mismatches,
    });

    let mut bytes = serde_json::to_vec_pretty(&top).map_err(|e| CliError::io(e.to_string()))?;
    bytes.push(b'\n');
    Ok(bytes)
}
