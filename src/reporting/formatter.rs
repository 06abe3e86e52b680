use crate::models::{CampaignResult, VulnerabilityResult};

/// Status label of one target in the summary table.
pub fn target_status(result: &VulnerabilityResult) -> &'static str {
    if result.priming_error.is_some() {
        "PRIMING FAILED"
    } else if result.unreachable {
        "UNREACHABLE"
    } else if result.is_reached() {
        "REACHED"
    } else if result.attempts.is_empty() {
        "NO ATTEMPT"
    } else {
        "NOT REACHED"
    }
}

/// Plain-text table with one row per target, followed by totals.
pub fn format_campaign_summary(result: &CampaignResult) -> String {
    let rows: Vec<[String; 5]> = result
        .vulnerability_results
        .iter()
        .map(|v| {
            [
                v.target.id.clone(),
                v.attempts.len().to_string(),
                v.success_count().to_string(),
                v.best_fitness()
                    .map(|f| format!("{:.3}", f))
                    .unwrap_or_else(|| "-".to_string()),
                target_status(v).to_string(),
            ]
        })
        .collect();

    let headers = ["Vulnerability", "Attempts", "Successes", "Best fitness", "Status"];
    let mut widths = headers.map(str::len);
    for row in &rows {
        for (width, cell) in widths.iter_mut().zip(row.iter()) {
            *width = (*width).max(cell.len());
        }
    }

    let format_row = |cells: &[String]| -> String {
        cells
            .iter()
            .zip(widths.iter())
            .map(|(cell, width)| format!("{:<width$}", cell, width = *width))
            .collect::<Vec<_>>()
            .join("  ")
            .trim_end()
            .to_string()
    };

    let mut out = String::new();
    out.push_str(&format!("Project: {}\n", result.project_path.display()));
    out.push_str(&format_row(&headers.map(String::from)));
    out.push('\n');
    out.push_str(&widths.iter().map(|w| "-".repeat(*w)).collect::<Vec<_>>().join("  "));
    out.push('\n');
    for row in &rows {
        out.push_str(&format_row(row));
        out.push('\n');
    }
    out.push_str(&format!(
        "{} vulnerabilities | {} reached | {} unreachable | {} attempts | {} successes\n",
        result.vulnerability_results.len(),
        result.reached_targets(),
        result.unreachable_targets(),
        result.total_attempts(),
        result.total_successes(),
    ));
    out
}
