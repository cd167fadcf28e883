//! HTML results page generator.
//!
//! Produces a self-contained HTML file with all CSS inlined: the final
//! score, the tier headline, and a review box for each wrong answer.

use anyhow::{Context, Result};
use std::path::Path;

use quizshow_core::narration::Locale;
use quizshow_core::report::SessionReport;
use quizshow_core::scoring::Tier;

/// Escape a string for safe HTML insertion.
fn html_escape(s: &str) -> String {
    s.replace('&', "&amp;")
        .replace('<', "&lt;")
        .replace('>', "&gt;")
        .replace('"', "&quot;")
        .replace('\'', "&#x27;")
}

fn tier_color(tier: Tier) -> &'static str {
    match tier {
        Tier::Top => "#FFD700",
        Tier::Mid => "#4CAF50",
        Tier::Low => "#FFA500",
    }
}

/// Generate the results page for a finished quiz.
///
/// The tier headline is shown in `locale`, matching the narration.
pub fn generate_html(report: &SessionReport, locale: Locale) -> String {
    let summary = &report.summary;
    let mut html = String::new();

    html.push_str("<!DOCTYPE html>\n<html lang=\"en\">\n<head>\n");
    html.push_str("<meta charset=\"utf-8\">\n");
    html.push_str("<meta name=\"viewport\" content=\"width=device-width, initial-scale=1\">\n");
    html.push_str(&format!(
        "<title>quizshow results — {}</title>\n",
        html_escape(&report.bank)
    ));
    html.push_str("<style>\n");
    html.push_str(CSS);
    html.push_str("</style>\n");
    html.push_str("</head>\n<body>\n");

    // Header
    html.push_str("<header>\n");
    html.push_str("<h1>Final result</h1>\n");
    html.push_str(&format!(
        "<p class=\"meta\">Bank: <strong>{}</strong> | {}</p>\n",
        html_escape(&report.bank),
        report.created_at.format("%Y-%m-%d %H:%M:%S UTC")
    ));
    html.push_str("</header>\n");

    // Score box
    html.push_str("<section class=\"result\">\n");
    html.push_str(&format!(
        "<p class=\"score\">{} / {}</p>\n",
        summary.correct, summary.total
    ));
    html.push_str(&format!(
        "<p class=\"percentage\">{}% correct</p>\n",
        summary.percentage
    ));
    html.push_str(&generate_score_bar(summary.percentage, summary.tier));
    html.push_str(&format!(
        "<h2 class=\"tier\" style=\"color: {}\">{}</h2>\n",
        tier_color(summary.tier),
        html_escape(locale.headline(summary.tier))
    ));
    html.push_str("</section>\n");

    // Incorrect answers
    if !summary.incorrect.is_empty() {
        html.push_str("<section class=\"review\">\n");
        html.push_str("<h2>Incorrect answers</h2>\n");
        for record in &summary.incorrect {
            html.push_str("<div class=\"error-box\">\n");
            html.push_str(&format!(
                "<p><strong>{}. {}</strong></p>\n",
                record.number,
                html_escape(&record.text)
            ));
            html.push_str(&format!(
                "<p class=\"yours\">Your answer: {}. {}</p>\n",
                record.user,
                html_escape(record.user_option())
            ));
            html.push_str(&format!(
                "<p class=\"correct\">Correct: {}. {}</p>\n",
                record.correct,
                html_escape(record.correct_option())
            ));
            html.push_str("</div>\n");
        }
        html.push_str("</section>\n");
    }

    // Raw JSON
    html.push_str("<section class=\"raw-data\">\n");
    html.push_str("<details>\n<summary>Raw JSON Data</summary>\n");
    html.push_str("<pre><code>");
    html.push_str(&html_escape(
        &serde_json::to_string_pretty(report).unwrap_or_default(),
    ));
    html.push_str("</code></pre>\n");
    html.push_str("</details>\n</section>\n");

    html.push_str("</body>\n</html>");
    html
}

/// Write the results page to a file.
pub fn write_html_report(report: &SessionReport, locale: Locale, path: &Path) -> Result<()> {
    let html = generate_html(report, locale);
    if let Some(parent) = path.parent() {
        std::fs::create_dir_all(parent)?;
    }
    std::fs::write(path, html)
        .with_context(|| format!("failed to write HTML report to {}", path.display()))?;
    Ok(())
}

fn generate_score_bar(percentage: u32, tier: Tier) -> String {
    let max_width = 400;
    let bar_height = 24;
    let width = percentage.min(100) as usize * max_width / 100;

    let mut svg = format!(
        "<svg width=\"{}\" height=\"{}\" xmlns=\"http://www.w3.org/2000/svg\">\n",
        max_width, bar_height
    );
    svg.push_str(&format!(
        "  <rect x=\"0\" y=\"0\" width=\"{max_width}\" height=\"{bar_height}\" fill=\"#126a83\" rx=\"4\"/>\n"
    ));
    svg.push_str(&format!(
        "  <rect x=\"0\" y=\"0\" width=\"{}\" height=\"{}\" fill=\"{}\" rx=\"4\"/>\n",
        width,
        bar_height,
        tier_color(tier)
    ));
    svg.push_str("</svg>\n");
    svg
}

const CSS: &str = r#"
:root { --bg: #072022; --panel: #0a3d62; --fg: #ffffff; --wrong: #ff5555; --right: #4CAF50; }
body { font-family: -apple-system, BlinkMacSystemFont, 'Segoe UI', sans-serif; margin: 0; padding: 2rem; background: var(--bg); color: var(--fg); }
header { background: #fff; color: #000; padding: 1rem; border-radius: 10px; text-align: center; }
.meta { color: #6b7280; }
.result { background: var(--panel); padding: 2.5rem; border-radius: 20px; text-align: center; margin: 2rem 0; }
.score { font-size: 60px; font-weight: bold; color: var(--right); margin: 0; }
.percentage { font-size: 32px; margin: 0.5rem 0; }
.error-box { background: #1a1a1a; padding: 1rem 1.25rem; border-radius: 10px; margin: 0.75rem 0; border-left: 5px solid var(--wrong); }
.yours { color: var(--wrong); }
.correct { color: var(--right); }
pre { overflow-x: auto; padding: 1rem; background: #1a1a1a; border-radius: 8px; }
code { font-family: 'JetBrains Mono', 'Fira Code', monospace; font-size: 0.85rem; }
details { margin: 1rem 0; }
summary { cursor: pointer; font-weight: bold; }
svg { margin: 1rem 0; }
"#;
