//! Standalone HTML export of a SHAP report
//!
//! Plot images are linked by URL, not embedded, so the saved document
//! re-fetches them when opened.

use std::fmt::Write as FmtWrite;
use std::path::Path;

use super::error::ReportError;
use super::types::{plot_caption, ShapReport};

pub const REPORT_FILE_NAME: &str = "shap_analysis_report.html";

const REPORT_CSS: &str = "\
body{font-family:-apple-system,BlinkMacSystemFont,'Segoe UI',sans-serif;padding:40px;max-width:1200px;margin:0 auto;background:#f8f9fa;}
.header{background:linear-gradient(to right,#7c3aed,#9333ea);color:white;padding:30px;border-radius:16px;margin-bottom:30px;}
.header h1{margin:0 0 5px 0;font-size:28px;}
.header p{margin:0;opacity:0.9;font-size:14px;}
.summary{background:white;border:2px solid #dbeafe;border-radius:12px;padding:20px;margin-bottom:30px;}
.summary h2{color:#1e40af;margin:0 0 15px 0;font-size:18px;}
.summary pre{margin:0;white-space:pre-wrap;font-family:'Courier New',monospace;font-size:13px;line-height:1.6;color:#334155;}
.stats{background:white;border:1px solid #e2e8f0;border-radius:12px;padding:15px 20px;margin-bottom:30px;font-size:14px;color:#64748b;}
.gallery{display:grid;grid-template-columns:repeat(auto-fill,minmax(350px,1fr));gap:24px;}
.plot-card{background:white;border:1px solid #e2e8f0;border-radius:12px;overflow:hidden;box-shadow:0 1px 3px rgba(0,0,0,0.1);page-break-inside:avoid;}
.plot-image{width:100%;height:auto;display:block;padding:10px;box-sizing:border-box;}
.plot-footer{padding:15px;border-top:1px solid #f1f5f9;}
.plot-title{font-weight:600;color:#334155;margin:0 0 5px 0;font-size:14px;}
.plot-subtitle{color:#94a3b8;margin:0;font-size:12px;}
.plot-number{display:inline-block;background:#7c3aed;color:white;padding:4px 12px;border-radius:999px;font-size:11px;font-weight:bold;margin:12px 12px 0 12px;}
@media print{body{background:white;padding:20px;}}
";

/// Render the full report document
pub fn render_report(report: &ShapReport) -> Result<String, ReportError> {
    let mut html = String::with_capacity(8 * 1024);

    writeln!(html, "<!DOCTYPE html>")?;
    writeln!(html, "<html lang=\"en\">")?;
    writeln!(html, "<head>")?;
    writeln!(html, "<meta charset=\"UTF-8\"/>")?;
    writeln!(html, "<title>SHAP Analysis Report</title>")?;
    writeln!(html, "<style>\n{}</style>", REPORT_CSS)?;
    writeln!(html, "</head>")?;
    writeln!(html, "<body>")?;

    writeln!(html, "<div class=\"header\">")?;
    writeln!(html, "<h1>SHAP Analysis Report</h1>")?;
    writeln!(html, "<p>Feature Importance &amp; Interpretability</p>")?;
    writeln!(html, "</div>")?;

    if let Some(summary) = report.summary.as_deref().filter(|s| !s.is_empty()) {
        writeln!(html, "<div class=\"summary\">")?;
        writeln!(html, "<h2>Analysis Summary</h2>")?;
        writeln!(html, "<pre>{}</pre>", html_escape(summary))?;
        writeln!(html, "</div>")?;
    }

    writeln!(
        html,
        "<div class=\"stats\">{}</div>",
        stats_line(report.plots.len())
    )?;

    writeln!(html, "<div class=\"gallery\">")?;
    for (i, url) in report.plots.iter().enumerate() {
        plot_card(&mut html, i + 1, url)?;
    }
    writeln!(html, "</div>")?;

    writeln!(html, "</body>")?;
    writeln!(html, "</html>")?;
    Ok(html)
}

/// Render and write the report to `path`
pub fn write_report(report: &ShapReport, path: &Path) -> Result<(), ReportError> {
    let html = render_report(report)?;
    std::fs::write(path, html)?;
    tracing::info!(path = %path.display(), plots = report.plots.len(), "SHAP report exported");
    Ok(())
}

fn stats_line(count: usize) -> String {
    format!(
        "<strong>{}</strong> visualization{} generated",
        count,
        if count == 1 { "" } else { "s" }
    )
}

fn plot_card(html: &mut String, number: usize, url: &str) -> std::fmt::Result {
    let caption = html_escape(&plot_caption(url));
    let url = html_escape(url);
    writeln!(html, "<div class=\"plot-card\">")?;
    writeln!(html, "<span class=\"plot-number\">#{}</span>", number)?;
    writeln!(
        html,
        "<img src=\"{}\" alt=\"Plot {}\" class=\"plot-image\"/>",
        url, number
    )?;
    writeln!(html, "<div class=\"plot-footer\">")?;
    writeln!(
        html,
        "<p class=\"plot-title\">{}</p>",
        caption
    )?;
    writeln!(html, "<p class=\"plot-subtitle\">SHAP Visualization</p>")?;
    writeln!(html, "</div>")?;
    writeln!(html, "</div>")
}

fn html_escape(text: &str) -> String {
    text.replace('&', "&amp;")
        .replace('<', "&lt;")
        .replace('>', "&gt;")
        .replace('"', "&quot;")
        .replace('\'', "&#39;")
}

#[cfg(test)]
mod tests {
    use super::*;

    fn report(plots: &[&str], summary: Option<&str>) -> ShapReport {
        ShapReport {
            message: "SHAP analysis complete".to_string(),
            summary: summary.map(str::to_string),
            plots: plots.iter().map(|p| p.to_string()).collect(),
        }
    }

    #[test]
    fn test_image_count_matches_plots() {
        let r = report(
            &[
                "https://h/plots/shap_summary_bar.png",
                "https://h/plots/waterfall_BRCA1.png",
                "https://h/plots/force_plot.png",
            ],
            Some("Top features:\n  pos 12 (G)"),
        );
        let html = render_report(&r).unwrap();
        assert_eq!(html.matches("<img ").count(), 3);
        assert!(html.contains("<strong>3</strong> visualizations generated"));
    }

    #[test]
    fn test_captions_from_urls() {
        let r = report(
            &["https://h/plots/shap_summary_bar.png", "https://h/plots/waterfall_BRCA1.png"],
            None,
        );
        let html = render_report(&r).unwrap();
        assert!(html.contains("<p class=\"plot-title\">shap summary bar</p>"));
        assert!(html.contains("<p class=\"plot-title\">waterfall BRCA1</p>"));
        assert!(html.contains("src=\"https://h/plots/shap_summary_bar.png\""));
        assert!(html.contains("#1") && html.contains("#2"));
    }

    #[test]
    fn test_summary_section_optional() {
        let without = render_report(&report(&["a.png"], None)).unwrap();
        assert!(!without.contains("Analysis Summary"));
        assert!(without.contains("<strong>1</strong> visualization generated"));

        let with = render_report(&report(&["a.png"], Some("x < y & z"))).unwrap();
        assert!(with.contains("Analysis Summary"));
        assert!(with.contains("<pre>x &lt; y &amp; z</pre>"));
    }

    #[test]
    fn test_url_with_query_escaped() {
        let r = report(&["https://h/p/plot_a.png?v=1&t=2"], None);
        let html = render_report(&r).unwrap();
        assert!(html.contains("src=\"https://h/p/plot_a.png?v=1&amp;t=2\""));
    }

    #[test]
    fn test_empty_plot_list() {
        let html = render_report(&report(&[], Some("nothing"))).unwrap();
        assert_eq!(html.matches("<img ").count(), 0);
        assert!(html.contains("<strong>0</strong> visualizations generated"));
    }

    #[test]
    fn test_write_report() {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join(REPORT_FILE_NAME);
        let r = report(&["https://h/plots/shap_bar.png"], Some("summary"));
        write_report(&r, &path).unwrap();

        let written = std::fs::read_to_string(&path).unwrap();
        assert!(written.starts_with("<!DOCTYPE html>"));
        assert!(written.contains("shap bar"));
    }
}
