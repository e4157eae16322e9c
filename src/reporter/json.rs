use crate::error::Result;
use crate::solver::GenerateOutcome;

/// Generate JSON report of the full outcome
pub fn generate_json_report(outcome: &GenerateOutcome) -> Result<String> {
    Ok(serde_json::to_string_pretty(outcome)?)
}

/// Summary statistics as JSON
#[derive(serde::Serialize)]
#[serde(rename_all = "camelCase")]
pub struct JsonSummary {
    pub success: bool,
    pub scheduled_items: usize,
    pub unplaced_sessions: usize,
    pub unscheduled_courses: usize,
    pub warnings: usize,
    pub processing_time_ms: u64,
}

pub fn generate_json_summary(outcome: &GenerateOutcome) -> Result<String> {
    let summary = JsonSummary {
        success: outcome.success,
        scheduled_items: outcome.schedules.len(),
        unplaced_sessions: outcome.metrics.unplaced_sessions,
        unscheduled_courses: outcome.unscheduled_courses.len(),
        warnings: outcome.warnings.len(),
        processing_time_ms: outcome.processing_time_ms,
    };

    Ok(serde_json::to_string_pretty(&summary)?)
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::solver::SolveMetrics;

    #[test]
    fn test_summary_counts() {
        let outcome = GenerateOutcome {
            success: true,
            schedules: vec![],
            metrics: SolveMetrics::default(),
            conflicts: vec![],
            unscheduled_courses: vec![],
            warnings: vec![],
            processing_time_ms: 42,
            diagnostics: vec![],
        };
        let json = generate_json_summary(&outcome).unwrap();
        let value: serde_json::Value = serde_json::from_str(&json).unwrap();
        assert_eq!(value["success"], true);
        assert_eq!(value["processingTimeMs"], 42);
    }
}
