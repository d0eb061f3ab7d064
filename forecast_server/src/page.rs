//! HTML page with the upload form and, after a run, the results.

use forecast_compare::{ComparisonReport, ModelKind, ServiceConfig};
use std::fmt::Write;

/// Escape text for use in HTML content and attribute values
pub fn escape_html(text: &str) -> String {
    let mut escaped = String::with_capacity(text.len());
    for c in text.chars() {
        match c {
            '&' => escaped.push_str("&amp;"),
            '<' => escaped.push_str("&lt;"),
            '>' => escaped.push_str("&gt;"),
            '"' => escaped.push_str("&quot;"),
            '\'' => escaped.push_str("&#39;"),
            c => escaped.push(c),
        }
    }
    escaped
}

fn upload_form() -> String {
    let mut options = String::new();
    for kind in ModelKind::ALL {
        let _ = write!(
            options,
            r#"<option value="{}">{}</option>"#,
            kind.id(),
            escape_html(kind.label())
        );
    }

    format!(
        r#"<form action="/forecast" method="post" enctype="multipart/form-data">
  <label>CSV file <input type="file" name="file" accept=".csv" required></label>
  <label>Date column <input type="text" name="date_col" required></label>
  <label>Value column <input type="text" name="value_col" required></label>
  <label>Months to forecast <input type="number" name="periods" min="1" value="12" required></label>
  <label>Model <select name="model">{}</select></label>
  <button type="submit">Forecast</button>
</form>"#,
        options
    )
}

fn results(report: &ComparisonReport, config: &ServiceConfig) -> String {
    let mut html = String::new();

    let _ = write!(
        html,
        "<h2>Selected model: {}</h2>\n<p>Accuracy: {}</p>\n",
        escape_html(&report.selected.id().to_uppercase()),
        escape_html(&report.accuracy.to_string())
    );

    html.push_str("<h3>Model accuracies</h3>\n<table>\n<tr><th>Model</th><th>Accuracy</th></tr>\n");
    for (kind, accuracy) in &report.model_accuracies {
        let _ = writeln!(
            html,
            "<tr><td>{}</td><td>{}</td></tr>",
            kind.id(),
            escape_html(&accuracy.to_string())
        );
    }
    html.push_str("</table>\n");

    html.push_str("<h3>Forecast</h3>\n<table>\n<tr><th>ds</th><th>yhat</th></tr>\n");
    for record in &report.predictions {
        let _ = writeln!(
            html,
            "<tr><td>{}</td><td>{:.2}</td></tr>",
            escape_html(&record.ds),
            record.yhat
        );
    }
    html.push_str("</table>\n");

    let _ = write!(
        html,
        r#"<h3>Charts</h3>
<img src="/static/{}" alt="Model Comparison">
<img src="/static/{}" alt="{}">
<p><a href="/download_csv">Download forecast CSV</a> | <a href="/download_chart">Download chart</a></p>
"#,
        escape_html(&config.comparison_chart_file),
        escape_html(&config.selected_chart_file),
        escape_html(report.selected.label())
    );

    html
}

/// Render the page, with results when a report is given
pub fn render_page(report: Option<&ComparisonReport>, config: &ServiceConfig) -> String {
    let body = match report {
        Some(report) => format!("{}\n{}", upload_form(), results(report, config)),
        None => upload_form(),
    };

    format!(
        r#"<!DOCTYPE html>
<html lang="en">
<head>
<meta charset="utf-8">
<title>Forecast Comparison</title>
</head>
<body>
<h1>Forecast Comparison</h1>
{}
</body>
</html>
"#,
        body
    )
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_escape_html() {
        assert_eq!(
            escape_html(r#"<a href="x">Tom & 'Jerry'</a>"#),
            "&lt;a href=&quot;x&quot;&gt;Tom &amp; &#39;Jerry&#39;&lt;/a&gt;"
        );
    }

    #[test]
    fn test_form_only_page() {
        let page = render_page(None, &ServiceConfig::default());

        for field in ["file", "date_col", "value_col", "periods", "model"] {
            assert!(page.contains(&format!(r#"name="{}""#, field)));
        }
        assert!(page.contains(r#"<option value="holtwinters">"#));
        assert!(!page.contains("/download_csv"));
    }
}
