use actix_web::{HttpRequest, HttpResponse, Result as ActixResult};

use super::ReportService;
use crate::models::{
    ApiResponse,
    reports::responses::{AttemptReport, DistributionBucket, RankingEntry, ScoreStats, round2},
    submissions::entities::{SubmissionStatus, SubmissionSummary},
};
use crate::services::access::{current_user, internal_error, load_attempt};

/// 已交卷学生按得分率排名，并列同名次
pub fn build_ranking(summaries: &[SubmissionSummary]) -> Vec<RankingEntry> {
    let mut submitted: Vec<&SubmissionSummary> = summaries
        .iter()
        .filter(|s| s.submission.status == SubmissionStatus::Submitted)
        .collect();
    submitted.sort_by(|a, b| {
        let pa = a.submission.percentage().unwrap_or(-1.0);
        let pb = b.submission.percentage().unwrap_or(-1.0);
        pb.total_cmp(&pa)
            .then_with(|| a.student_username.cmp(&b.student_username))
    });

    let mut ranking = Vec::with_capacity(submitted.len());
    let mut previous: Option<f64> = None;
    let mut rank = 0;

    for (index, summary) in submitted.into_iter().enumerate() {
        let percentage = summary.submission.percentage().map(round2);
        if previous.is_none() || percentage != previous {
            rank = index as i64 + 1;
        }
        previous = percentage;

        ranking.push(RankingEntry {
            rank,
            student_id: summary.submission.student_id,
            username: summary.student_username.clone(),
            display_name: summary.student_display_name.clone(),
            score: summary.submission.score,
            max_score: summary.submission.max_score,
            percentage,
        });
    }

    ranking
}

pub async fn attempt_report(
    service: &ReportService,
    attempt_id: i64,
    request: &HttpRequest,
) -> ActixResult<HttpResponse> {
    let user = try_response!(current_user(request));
    let storage = service.get_storage(request);
    let (attempt, evaluation) = try_response!(load_attempt(&storage, &user, attempt_id).await);

    let summaries = match storage.list_submission_summaries(attempt_id).await {
        Ok(summaries) => summaries,
        Err(e) => return Ok(internal_error("Failed to list submissions", e)),
    };

    let submitted = summaries
        .iter()
        .filter(|s| s.submission.status == SubmissionStatus::Submitted)
        .count() as i64;
    let percentages: Vec<f64> = summaries
        .iter()
        .filter(|s| s.submission.status == SubmissionStatus::Submitted)
        .filter_map(|s| s.submission.percentage())
        .collect();

    Ok(HttpResponse::Ok().json(ApiResponse::success(
        AttemptReport {
            attempt,
            evaluation_title: evaluation.title,
            participants: summaries.len() as i64,
            submitted,
            in_progress: summaries.len() as i64 - submitted,
            stats: ScoreStats::from_percentages(&percentages),
            distribution: DistributionBucket::histogram(&percentages),
            ranking: build_ranking(&summaries),
        },
        "Attempt report generated successfully",
    )))
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::models::submissions::entities::Submission;

    fn summary(name: &str, score: Option<f64>, status: SubmissionStatus) -> SubmissionSummary {
        let now = chrono::Utc::now();
        SubmissionSummary {
            submission: Submission {
                id: 1,
                attempt_id: 1,
                student_id: name.len() as i64,
                status,
                score,
                max_score: 10.0,
                started_at: now,
                last_activity_at: now,
                submitted_at: None,
            },
            student_username: name.to_string(),
            student_display_name: None,
            answered_count: 0,
        }
    }

    #[test]
    fn test_ranking_with_ties() {
        let summaries = vec![
            summary("carol", Some(7.0), SubmissionStatus::Submitted),
            summary("alice", Some(9.0), SubmissionStatus::Submitted),
            summary("bob", Some(7.0), SubmissionStatus::Submitted),
            summary("dave", Some(3.0), SubmissionStatus::Submitted),
            summary("erin", None, SubmissionStatus::InProgress),
        ];

        let ranking = build_ranking(&summaries);
        let ranks: Vec<(i64, &str)> = ranking
            .iter()
            .map(|r| (r.rank, r.username.as_str()))
            .collect();
        assert_eq!(
            ranks,
            vec![(1, "alice"), (2, "bob"), (2, "carol"), (4, "dave")]
        );
        assert_eq!(ranking[0].percentage, Some(90.0));
    }
}
