use serde::Serialize;
use ts_rs::TS;

use crate::models::attempts::entities::Attempt;
use crate::models::evaluations::entities::Evaluation;
use crate::models::questions::entities::QuestionType;

#[derive(Debug, Clone, Default, Serialize, TS)]
#[ts(export, export_to = "../frontend/src/types/generated/report.ts")]
pub struct ReportTotals {
    pub areas: i64,
    pub teachers: i64,
    pub students: i64,
    pub evaluations: i64,
    pub questions: i64,
    pub attempts: i64,
    pub submissions: i64,
}

// 分组计数
#[derive(Debug, Clone, PartialEq, Serialize, TS)]
#[ts(export, export_to = "../frontend/src/types/generated/report.ts")]
pub struct GroupCount {
    pub key: String,
    pub count: i64,
}

#[derive(Debug, Clone, Serialize, TS)]
#[ts(export, export_to = "../frontend/src/types/generated/report.ts")]
pub struct OverviewReport {
    pub totals: ReportTotals,
    pub average_percentage: Option<f64>,
    pub evaluations_by_area: Vec<GroupCount>,
    pub teachers_by_area: Vec<GroupCount>,
    pub questions_by_type: Vec<GroupCount>,
}

// 百分比统计
#[derive(Debug, Clone, Default, PartialEq, Serialize, TS)]
#[ts(export, export_to = "../frontend/src/types/generated/report.ts")]
pub struct ScoreStats {
    pub count: i64,
    pub average: Option<f64>,
    pub max: Option<f64>,
    pub min: Option<f64>,
}

#[derive(Debug, Clone, PartialEq, Serialize, TS)]
#[ts(export, export_to = "../frontend/src/types/generated/report.ts")]
pub struct DistributionBucket {
    pub label: String,
    pub count: i64,
}

#[derive(Debug, Clone, Serialize, TS)]
#[ts(export, export_to = "../frontend/src/types/generated/report.ts")]
pub struct QuestionStat {
    pub question_id: i64,
    pub text: String,
    pub question_type: QuestionType,
    pub answered: i64,
    pub correct: i64,
    pub correct_rate: Option<f64>,
}

#[derive(Debug, Clone, Serialize, TS)]
#[ts(export, export_to = "../frontend/src/types/generated/report.ts")]
pub struct EvaluationReport {
    pub evaluation: Evaluation,
    pub attempts: i64,
    pub submissions: i64,
    pub submitted: i64,
    pub stats: ScoreStats,
    pub distribution: Vec<DistributionBucket>,
    pub questions: Vec<QuestionStat>,
}

#[derive(Debug, Clone, Serialize, TS)]
#[ts(export, export_to = "../frontend/src/types/generated/report.ts")]
pub struct RankingEntry {
    pub rank: i64,
    pub student_id: i64,
    pub username: String,
    pub display_name: Option<String>,
    pub score: Option<f64>,
    pub max_score: f64,
    pub percentage: Option<f64>,
}

#[derive(Debug, Clone, Serialize, TS)]
#[ts(export, export_to = "../frontend/src/types/generated/report.ts")]
pub struct AttemptReport {
    pub attempt: Attempt,
    pub evaluation_title: String,
    pub participants: i64,
    pub submitted: i64,
    pub in_progress: i64,
    pub stats: ScoreStats,
    pub distribution: Vec<DistributionBucket>,
    pub ranking: Vec<RankingEntry>,
}

/// 保留两位小数
pub fn round2(value: f64) -> f64 {
    (value * 100.0).round() / 100.0
}

// 分数段（百分比）
const BUCKETS: [(&str, f64, f64); 5] = [
    ("0-59", 0.0, 60.0),
    ("60-69", 60.0, 70.0),
    ("70-79", 70.0, 80.0),
    ("80-89", 80.0, 90.0),
    ("90-100", 90.0, f64::INFINITY),
];

impl ScoreStats {
    pub fn from_percentages(values: &[f64]) -> Self {
        if values.is_empty() {
            return Self::default();
        }

        let sum: f64 = values.iter().sum();
        let max = values.iter().copied().fold(f64::MIN, f64::max);
        let min = values.iter().copied().fold(f64::MAX, f64::min);

        Self {
            count: values.len() as i64,
            average: Some(round2(sum / values.len() as f64)),
            max: Some(round2(max)),
            min: Some(round2(min)),
        }
    }
}

impl DistributionBucket {
    /// 按固定分数段统计，始终返回全部五个分段
    pub fn histogram(values: &[f64]) -> Vec<Self> {
        BUCKETS
            .iter()
            .map(|(label, low, high)| DistributionBucket {
                label: label.to_string(),
                count: values.iter().filter(|v| **v >= *low && **v < *high).count() as i64,
            })
            .collect()
    }
}

/// 分组计数，按数量降序、键升序
pub fn group_counts<I>(keys: I) -> Vec<GroupCount>
where
    I: IntoIterator<Item = String>,
{
    group_totals(keys.into_iter().map(|key| (key, 1)))
}

/// 合并已聚合的 (键, 数量)，同键累加后按数量降序
pub fn group_totals<I>(rows: I) -> Vec<GroupCount>
where
    I: IntoIterator<Item = (String, i64)>,
{
    let mut map: std::collections::HashMap<String, i64> = std::collections::HashMap::new();
    for (key, count) in rows {
        *map.entry(key).or_default() += count;
    }

    let mut groups: Vec<GroupCount> = map
        .into_iter()
        .map(|(key, count)| GroupCount { key, count })
        .collect();
    groups.sort_by(|a, b| b.count.cmp(&a.count).then_with(|| a.key.cmp(&b.key)));
    groups
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_score_stats() {
        let stats = ScoreStats::from_percentages(&[50.0, 75.0, 100.0]);
        assert_eq!(stats.count, 3);
        assert_eq!(stats.average, Some(75.0));
        assert_eq!(stats.max, Some(100.0));
        assert_eq!(stats.min, Some(50.0));

        let empty = ScoreStats::from_percentages(&[]);
        assert_eq!(empty.count, 0);
        assert_eq!(empty.average, None);
    }

    #[test]
    fn test_round2() {
        assert_eq!(round2(66.666_666), 66.67);
        assert_eq!(round2(10.0), 10.0);
    }

    #[test]
    fn test_histogram_edges() {
        let buckets = DistributionBucket::histogram(&[0.0, 59.99, 60.0, 79.5, 89.99, 90.0, 100.0]);
        let counts: Vec<i64> = buckets.iter().map(|b| b.count).collect();
        assert_eq!(counts, vec![2, 1, 1, 1, 2]);
        assert_eq!(buckets[4].label, "90-100");
    }

    #[test]
    fn test_group_totals_merges_keys() {
        let groups = group_totals(vec![
            ("unassigned".to_string(), 2),
            ("Physics".to_string(), 1),
            ("unassigned".to_string(), 3),
        ]);
        assert_eq!(groups[0], GroupCount { key: "unassigned".into(), count: 5 });
        assert_eq!(groups[1], GroupCount { key: "Physics".into(), count: 1 });
    }

    #[test]
    fn test_group_counts_order() {
        let groups = group_counts(
            ["b", "a", "b", "c", "a", "b"]
                .into_iter()
                .map(String::from),
        );
        assert_eq!(groups[0], GroupCount { key: "b".into(), count: 3 });
        assert_eq!(groups[1], GroupCount { key: "a".into(), count: 2 });
        assert_eq!(groups[2], GroupCount { key: "c".into(), count: 1 });
    }
}
