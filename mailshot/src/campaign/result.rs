//! Outcome aggregation.

use super::types::{CampaignResult, CompositionMode, JobOutcome};

/// Reduce per-job outcomes into the campaign result.
///
/// Order is preserved and nothing is deduplicated, so a recipient listed
/// twice shows up twice.
pub fn aggregate(outcomes: &[JobOutcome]) -> CampaignResult {
    let total_jobs = outcomes.len();
    let succeeded_count = outcomes.iter().filter(|o| o.success).count();

    CampaignResult {
        total_jobs,
        succeeded_count,
        summary: summary_line(succeeded_count, total_jobs),
        outcomes: outcomes.to_vec(),
    }
}

pub fn summary_line(succeeded: usize, total: usize) -> String {
    format!("{}/{} sent successfully", succeeded, total)
}

/// Operator-facing message for a finished campaign.
///
/// Single campaigns surface the one outcome's own message.
pub fn campaign_message(mode: CompositionMode, result: &CampaignResult) -> String {
    match mode {
        CompositionMode::Single => result
            .outcomes
            .first()
            .map(|o| o.message.clone())
            .unwrap_or_else(|| result.summary.clone()),
        CompositionMode::BulkTemplated => format!("Bulk emails: {}", result.summary),
        CompositionMode::BulkPersonalized => format!("Personalized emails: {}", result.summary),
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn outcome(recipient: &str, success: bool) -> JobOutcome {
        JobOutcome {
            recipient: recipient.to_string(),
            success,
            message: if success { "sent" } else { "failed" }.to_string(),
        }
    }

    #[test]
    fn test_aggregate_counts_and_order() {
        let outcomes = vec![
            outcome("a@example.com", true),
            outcome("b@example.com", false),
            outcome("c@example.com", true),
            outcome("d@example.com", true),
        ];

        let result = aggregate(&outcomes);

        assert_eq!(result.total_jobs, 4);
        assert_eq!(result.succeeded_count, 3);
        assert_eq!(result.summary, "3/4 sent successfully");
        assert_eq!(result.outcomes, outcomes);
    }

    #[test]
    fn test_aggregate_keeps_duplicates() {
        let outcomes = vec![outcome("a@example.com", true), outcome("a@example.com", false)];

        let result = aggregate(&outcomes);

        assert_eq!(result.outcomes.len(), 2);
        assert_eq!(result.summary, "1/2 sent successfully");
    }

    #[test]
    fn test_aggregate_idempotent() {
        let outcomes = vec![outcome("a@example.com", false), outcome("b@example.com", true)];

        assert_eq!(aggregate(&outcomes), aggregate(&outcomes));
    }

    #[test]
    fn test_aggregate_empty() {
        let result = aggregate(&[]);
        assert_eq!(result.summary, "0/0 sent successfully");
        assert_eq!(result.failed_count(), 0);
    }

    #[test]
    fn test_campaign_message() {
        let result = aggregate(&[outcome("a@example.com", true), outcome("b@example.com", false)]);

        assert_eq!(
            campaign_message(CompositionMode::BulkPersonalized, &result),
            "Personalized emails: 1/2 sent successfully"
        );
        assert_eq!(
            campaign_message(CompositionMode::BulkTemplated, &result),
            "Bulk emails: 1/2 sent successfully"
        );

        let single = aggregate(&[outcome("a@example.com", false)]);
        assert_eq!(campaign_message(CompositionMode::Single, &single), "failed");
    }
}
