//! Self-contained HTML rendering of a report document.

use crate::reports::document::{DocumentRow, ReportDocument, ReportSection, ValueField};

const STYLE: &str = r"
        body { font-family: -apple-system, BlinkMacSystemFont, 'Segoe UI', Roboto, sans-serif; margin: 20px; color: #333; }
        h1 { border-bottom: 3px solid #3498db; padding-bottom: 10px; }
        h2 { margin-top: 30px; border-left: 4px solid #3498db; padding-left: 10px; }
        .period { color: #7f8c8d; margin: 0 0 10px 0; }
        .description { font-style: italic; }
        table { width: 100%; border-collapse: collapse; margin: 10px 0 20px 0; }
        th, td { padding: 8px 12px; text-align: left; border-bottom: 1px solid #ddd; }
        th { background: #f5f5f5; font-weight: 600; }
        td.amount, th.amount { text-align: right; font-variant-numeric: tabular-nums; }
        td.negative { color: #c0392b; }
        tfoot td { font-weight: 600; border-top: 2px solid #333; }
        .skipped { color: #7f8c8d; font-size: 0.9em; }
";

/// Renders a [`ReportDocument`] as one HTML page.
pub struct HtmlRenderer;

impl HtmlRenderer {
    /// Renders `document` with embedded CSS; all text is escaped.
    #[must_use]
    pub fn render(document: &ReportDocument) -> String {
        let mut html = String::new();
        Self::write_document(&mut html, document);
        html
    }

    fn write_document(out: &mut String, document: &ReportDocument) {
        let title = html_escape(&document.title);
        out.push_str(&format!(
            "<!DOCTYPE html>\n<html lang=\"en\">\n<head>\n    <meta charset=\"UTF-8\">\n    <title>{title}</title>\n    <style>{STYLE}    </style>\n</head>\n<body>\n<h1>{title}</h1>\n"
        ));

        if document.sections.is_empty() {
            out.push_str("<p>No rows selected.</p>\n");
        }
        for section in &document.sections {
            Self::write_section(out, document, section);
        }

        if !document.skipped.is_empty() {
            out.push_str("<h2>Skipped</h2>\n<ul class=\"skipped\">\n");
            for pair in &document.skipped {
                out.push_str(&format!(
                    "<li>Budget {} / account {}: {}</li>\n",
                    pair.budget_id,
                    pair.account_id,
                    pair.reason.describe()
                ));
            }
            out.push_str("</ul>\n");
        }

        out.push_str("</body>\n</html>\n");
    }

    fn write_section(out: &mut String, document: &ReportDocument, section: &ReportSection) {
        out.push_str(&format!("<h2>{}</h2>\n", html_escape(&section.budget_name)));
        out.push_str(&format!(
            "<p class=\"period\">{} to {}</p>\n",
            section.period.start(),
            section.period.end()
        ));
        // Requested but empty still gets its element.
        if let Some(description) = &section.description {
            out.push_str(&format!(
                "<p class=\"description\">{}</p>\n",
                html_escape(description)
            ));
        }

        out.push_str("<table>\n<thead><tr><th>Account</th><th>Group</th>");
        if document.account_descriptions {
            out.push_str("<th>Description</th>");
        }
        for kind in &document.columns {
            out.push_str(&format!("<th class=\"amount\">{}</th>", kind.label()));
        }
        out.push_str("</tr></thead>\n<tbody>\n");

        for row in &section.rows {
            Self::write_row(out, row);
        }
        out.push_str("</tbody>\n");

        if !section.totals.is_empty() {
            let span = if document.account_descriptions { 3 } else { 2 };
            out.push_str(&format!("<tfoot><tr><td colspan=\"{span}\">Total</td>"));
            for field in &section.totals {
                write_amount(out, field);
            }
            out.push_str("</tr></tfoot>\n");
        }

        out.push_str("</table>\n");
    }

    fn write_row(out: &mut String, row: &DocumentRow) {
        out.push_str(&format!(
            "<tr><td>{}</td><td>{}</td>",
            html_escape(&row.account_name),
            html_escape(row.group_name.as_deref().unwrap_or_default())
        ));
        if let Some(description) = &row.description {
            out.push_str(&format!("<td>{}</td>", html_escape(description)));
        }
        for field in &row.values {
            write_amount(out, field);
        }
        out.push_str("</tr>\n");
    }
}

fn write_amount(out: &mut String, field: &ValueField) {
    let class = if field.value.is_negative() {
        "amount negative"
    } else {
        "amount"
    };
    out.push_str(&format!("<td class=\"{class}\">{}</td>", field.value));
}

fn html_escape(text: &str) -> String {
    text.replace('&', "&amp;")
        .replace('<', "&lt;")
        .replace('>', "&gt;")
        .replace('"', "&quot;")
        .replace('\'', "&#39;")
}
