//! HTML pages served by the calculator.
//!
//! Pages are plain strings built around a shared layout; the stylesheet is
//! served separately from `/styles.css`.

use tax_core::{BracketTaxCalculator, TaxResult};

use crate::form::InputMethod;
use crate::utils::{escape_html, format_currency, format_percent};

pub const STYLES_CSS: &str = include_str!("../assets/styles.css");

const APP_TITLE: &str = "Beautiful Bill Tax Calculator";

const TOGGLE_SCRIPT: &str = r#"<script>
    function toggleSections(method) {
        document.getElementById('basic').classList.toggle('hidden', method !== 'basic');
        document.getElementById('roi').classList.toggle('hidden', method !== 'roi');
    }
</script>"#;

fn layout(
    title: &str,
    body: &str,
) -> String {
    format!(
        r#"<!DOCTYPE html>
<html>
<head>
    <meta charset="utf-8">
    <meta name="viewport" content="width=device-width, initial-scale=1">
    <title>{title}</title>
    <link rel="stylesheet" href="/styles.css">
</head>
<body>
    <div class="container">
{body}
    </div>
</body>
</html>
"#
    )
}

fn method_options() -> String {
    InputMethod::all()
        .iter()
        .map(|m| {
            format!(
                r#"            <option value="{}">{}</option>"#,
                m.as_str(),
                escape_html(m.label())
            )
        })
        .collect::<Vec<_>>()
        .join("\n")
}

/// The calculator input form.
pub fn render_form_page(default_tax_year: i32) -> String {
    let options = method_options();
    let body = format!(
        r#"        <h1>🎲 {APP_TITLE}</h1>
        <form method="POST" action="/">
            <label for="year">Tax Year:</label>
            <input type="number" id="year" name="year" value="{default_tax_year}" required>

            <label for="method">Choose input method:</label>
            <select id="method" name="method" required onchange="toggleSections(this.value)">
{options}
            </select>

            <div id="basic" class="section">
                <label for="winnings">Total Winnings ($):</label>
                <input type="number" id="winnings" name="winnings" step="0.01" placeholder="e.g., 200000">
                <label for="losses">Total Losses ($):</label>
                <input type="number" id="losses" name="losses" step="0.01" placeholder="e.g., 210000">
            </div>

            <div id="roi" class="section hidden">
                <label for="profit">Total Profit ($):</label>
                <input type="number" id="profit" name="profit" step="0.01">
                <label for="roi-input">ROI (%):</label>
                <input type="number" id="roi-input" name="roi" step="0.01" placeholder="e.g., -5 for -5%">
            </div>

            <button type="submit">Calculate Tax</button>
        </form>
        {TOGGLE_SCRIPT}"#
    );

    layout(APP_TITLE, &body)
}

/// The breakdown for a successful calculation.
pub fn render_result_page(result: &TaxResult) -> String {
    let marginal_rate = BracketTaxCalculator::default()
        .marginal_rate(result.taxable_income)
        .map(format_percent)
        .unwrap_or_else(|| "—".to_string());

    let phantom_note = if result.has_phantom_income() {
        format!(
            r#"
                <p class="note">Your losses met or exceeded your winnings, yet {} is still taxable because only part of your losses can be deducted.</p>"#,
            format_currency(result.phantom_income)
        )
    } else {
        String::new()
    };

    let body = format!(
        r#"        <h1>🧾 Tax Calculation Results</h1>
        <div class="result">
            <h2>Tax Calculation Results</h2>
            <p><strong>Rule Applied:</strong> {rule}</p>
            <p><strong>Winnings:</strong> {winnings}</p>
            <p><strong>Losses:</strong> {losses}</p>
            <div class="breakdown">
                <p><strong>Maximum Deductible Losses:</strong> {max_deductible}</p>
                <p><strong>Taxable Income:</strong> {taxable_income}</p>
                <p><strong>Phantom Income:</strong> {phantom_income}</p>
                <p><strong>Marginal Rate:</strong> {marginal_rate}</p>
                <p><strong>Tax Owed:</strong> {tax_owed}</p>{phantom_note}
            </div>
        </div>
        <a href="/" class="back-link">Calculate Again</a>"#,
        rule = escape_html(result.rule_applied.as_str()),
        winnings = format_currency(result.winnings),
        losses = format_currency(result.losses),
        max_deductible = format_currency(result.max_deductible),
        taxable_income = format_currency(result.taxable_income),
        phantom_income = format_currency(result.phantom_income),
        tax_owed = format_currency(result.tax_owed),
    );

    layout(&format!("{APP_TITLE} - Results"), &body)
}

/// A rejected submission.
pub fn render_error_page(message: &str) -> String {
    let body = format!(
        r#"        <h1>Error</h1>
        <div class="error"><strong>Error:</strong> {}</div>
        <a href="/" class="back-link">Back to Calculator</a>"#,
        escape_html(message)
    );

    layout(&format!("{APP_TITLE} - Error"), &body)
}

pub fn render_not_found_page() -> String {
    let body = r#"        <h1>Not Found</h1>
        <div class="error">The page you requested does not exist.</div>
        <a href="/" class="back-link">Back to Calculator</a>"#;

    layout(&format!("{APP_TITLE} - Not Found"), body)
}
