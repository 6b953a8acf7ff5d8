use serde::{Deserialize, Serialize};
use ts_rs::TS;

// 贡献者参与度级别
#[derive(Debug, Clone, Copy, Serialize, Deserialize, PartialEq, Eq, TS)]
#[serde(rename_all = "lowercase")]
#[ts(export, export_to = "../frontend/src/types/generated/analyzer.ts")]
pub enum ContributorLevel {
    Core,
    Regular,
    Occasional,
}

impl ContributorLevel {
    pub fn from_score(score: f64) -> Self {
        if score >= 40.0 {
            ContributorLevel::Core
        } else if score >= 15.0 {
            ContributorLevel::Regular
        } else {
            ContributorLevel::Occasional
        }
    }
}

impl std::fmt::Display for ContributorLevel {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            ContributorLevel::Core => write!(f, "core"),
            ContributorLevel::Regular => write!(f, "regular"),
            ContributorLevel::Occasional => write!(f, "occasional"),
        }
    }
}

#[derive(Debug, Clone, Serialize, Deserialize, PartialEq, TS)]
#[ts(export, export_to = "../frontend/src/types/generated/analyzer.ts")]
pub struct LanguageShare {
    pub name: String,
    pub bytes: i64,
    pub percentage: f64,
}

#[derive(Debug, Clone, Serialize, Deserialize, PartialEq, TS)]
#[ts(export, export_to = "../frontend/src/types/generated/analyzer.ts")]
pub struct ContributorReport {
    pub login: String,
    pub avatar_url: Option<String>,
    pub html_url: Option<String>,
    pub commits: i64,
    pub additions: i64,
    pub deletions: i64,
    pub active_weeks: i64,
    // 周起始时间（UNIX 秒）
    pub first_active_week: Option<i64>,
    pub last_active_week: Option<i64>,
    pub commit_share: f64,
    pub score: f64,
    pub level: ContributorLevel,
}

#[derive(Debug, Clone, Default, Serialize, Deserialize, PartialEq, TS)]
#[ts(export, export_to = "../frontend/src/types/generated/analyzer.ts")]
pub struct RepositoryTotals {
    pub commits: i64,
    pub additions: i64,
    pub deletions: i64,
    pub weeks_observed: i64,
    pub contributors: i64,
}

// 仓库分析报告（可缓存）
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq, TS)]
#[ts(export, export_to = "../frontend/src/types/generated/analyzer.ts")]
pub struct RepositoryReport {
    pub owner: String,
    pub repo: String,
    pub full_name: String,
    pub description: Option<String>,
    pub html_url: String,
    pub default_branch: Option<String>,
    pub stars: i64,
    pub forks: i64,
    pub open_issues: i64,
    pub created_at: Option<String>,
    pub pushed_at: Option<String>,
    pub languages: Vec<LanguageShare>,
    pub contributors: Vec<ContributorReport>,
    pub totals: RepositoryTotals,
    // 贡献统计尚在计算（202）时为 false
    pub stats_available: bool,
    pub analyzed_at: chrono::DateTime<chrono::Utc>,
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_level_thresholds() {
        assert_eq!(ContributorLevel::from_score(40.0), ContributorLevel::Core);
        assert_eq!(ContributorLevel::from_score(39.99), ContributorLevel::Regular);
        assert_eq!(ContributorLevel::from_score(15.0), ContributorLevel::Regular);
        assert_eq!(ContributorLevel::from_score(14.9), ContributorLevel::Occasional);
    }
}
