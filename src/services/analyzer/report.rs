//! 贡献度聚合与评分

use chrono::{DateTime, Utc};
use std::collections::HashMap;

use super::github::{RawContributorStats, RepositorySnapshot};
use crate::models::analyzer::entities::{
    ContributorLevel, ContributorReport, LanguageShare, RepositoryReport, RepositoryTotals,
};

const WEEK_SECS: i64 = 7 * 24 * 3600;
const COMMIT_WEIGHT: f64 = 0.5;
const LINE_WEIGHT: f64 = 0.3;
const ACTIVITY_WEIGHT: f64 = 0.2;

fn round2(value: f64) -> f64 {
    (value * 100.0).round() / 100.0
}

fn ratio(part: i64, total: i64) -> f64 {
    if total <= 0 {
        0.0
    } else {
        part as f64 / total as f64
    }
}

/// 0..=100 的贡献分
pub fn contributor_score(commit_share: f64, line_share: f64, activity_ratio: f64) -> f64 {
    let raw = COMMIT_WEIGHT * commit_share + LINE_WEIGHT * line_share + ACTIVITY_WEIGHT * activity_ratio;
    round2((raw * 100.0).clamp(0.0, 100.0))
}

/// 按字节数降序的语言占比
pub fn language_shares(languages: &HashMap<String, i64>) -> Vec<LanguageShare> {
    let total: i64 = languages.values().copied().filter(|b| *b > 0).sum();
    let mut shares: Vec<LanguageShare> = languages
        .iter()
        .map(|(name, bytes)| LanguageShare {
            name: name.clone(),
            bytes: *bytes,
            percentage: round2(ratio(*bytes, total) * 100.0),
        })
        .collect();
    shares.sort_by(|a, b| b.bytes.cmp(&a.bytes).then_with(|| a.name.cmp(&b.name)));
    shares
}

/// 有提交的首尾周之间的周数（含首尾）
fn observed_weeks(stats: &[RawContributorStats]) -> i64 {
    let active = stats
        .iter()
        .flat_map(|s| s.weeks.iter())
        .filter(|w| w.c > 0)
        .map(|w| w.w);
    let (mut first, mut last) = (i64::MAX, i64::MIN);
    for week in active {
        first = first.min(week);
        last = last.max(week);
    }
    if first > last {
        0
    } else {
        (last - first) / WEEK_SECS + 1
    }
}

#[derive(Default)]
struct Tally {
    avatar_url: Option<String>,
    html_url: Option<String>,
    commits: i64,
    additions: i64,
    deletions: i64,
    active_weeks: i64,
    first_active_week: Option<i64>,
    last_active_week: Option<i64>,
}

pub fn build_report(snapshot: RepositorySnapshot, analyzed_at: DateTime<Utc>) -> RepositoryReport {
    // 保留贡献者列表的原始顺序作为同分时的次序
    let mut order: Vec<String> = Vec::new();
    let mut tallies: HashMap<String, Tally> = HashMap::new();

    for c in &snapshot.contributors {
        if !tallies.contains_key(&c.login) {
            order.push(c.login.clone());
        }
        let tally = tallies.entry(c.login.clone()).or_default();
        tally.avatar_url = c.avatar_url.clone();
        tally.html_url = c.html_url.clone();
        tally.commits = c.contributions;
    }

    let stats_available = snapshot.stats.is_some();
    let stats = snapshot.stats.unwrap_or_default();
    for s in &stats {
        let Some(author) = &s.author else { continue };
        if !tallies.contains_key(&author.login) {
            order.push(author.login.clone());
        }
        let tally = tallies.entry(author.login.clone()).or_default();
        if tally.avatar_url.is_none() {
            tally.avatar_url = author.avatar_url.clone();
        }
        if tally.html_url.is_none() {
            tally.html_url = author.html_url.clone();
        }
        tally.commits = s.total;
        tally.additions = s.weeks.iter().map(|w| w.a).sum();
        tally.deletions = s.weeks.iter().map(|w| w.d).sum();
        let active: Vec<i64> = s.weeks.iter().filter(|w| w.c > 0).map(|w| w.w).collect();
        tally.active_weeks = active.len() as i64;
        tally.first_active_week = active.iter().min().copied();
        tally.last_active_week = active.iter().max().copied();
    }

    let weeks_observed = observed_weeks(&stats);
    let total_commits: i64 = tallies.values().map(|t| t.commits).sum();
    let total_additions: i64 = tallies.values().map(|t| t.additions).sum();
    let total_deletions: i64 = tallies.values().map(|t| t.deletions).sum();
    let total_lines = total_additions + total_deletions;

    let mut contributors: Vec<ContributorReport> = order
        .into_iter()
        .filter_map(|login| {
            let t = tallies.remove(&login)?;
            let commit_share = ratio(t.commits, total_commits);
            let score = contributor_score(
                commit_share,
                ratio(t.additions + t.deletions, total_lines),
                ratio(t.active_weeks, weeks_observed),
            );
            Some(ContributorReport {
                login,
                avatar_url: t.avatar_url,
                html_url: t.html_url,
                commits: t.commits,
                additions: t.additions,
                deletions: t.deletions,
                active_weeks: t.active_weeks,
                first_active_week: t.first_active_week,
                last_active_week: t.last_active_week,
                commit_share: round2(commit_share * 100.0),
                score,
                level: ContributorLevel::from_score(score),
            })
        })
        .collect();
    // 稳定排序，同分保持原顺序
    contributors.sort_by(|a, b| b.score.total_cmp(&a.score));

    let repository = snapshot.repository;
    RepositoryReport {
        totals: RepositoryTotals {
            commits: total_commits,
            additions: total_additions,
            deletions: total_deletions,
            weeks_observed,
            contributors: contributors.len() as i64,
        },
        owner: snapshot.owner,
        repo: snapshot.repo,
        full_name: repository.full_name,
        description: repository.description,
        html_url: repository.html_url,
        default_branch: repository.default_branch,
        stars: repository.stargazers_count,
        forks: repository.forks_count,
        open_issues: repository.open_issues_count,
        created_at: repository.created_at,
        pushed_at: repository.pushed_at,
        languages: language_shares(&snapshot.languages),
        contributors,
        stats_available,
        analyzed_at,
    }
}

#[cfg(test)]
pub(crate) mod tests {
    use super::*;
    use crate::services::analyzer::github::{RawAuthor, RawContributor, RawRepository, RawWeek};

    const W0: i64 = 1_700_000_000;

    fn contributor(login: &str, contributions: i64) -> RawContributor {
        RawContributor {
            login: login.into(),
            avatar_url: None,
            html_url: Some(format!("https://github.com/{login}")),
            contributions,
        }
    }

    fn stats(login: &str, weeks: &[(i64, i64, i64, i64)]) -> RawContributorStats {
        RawContributorStats {
            author: Some(RawAuthor {
                login: login.into(),
                avatar_url: None,
                html_url: None,
            }),
            total: weeks.iter().map(|w| w.3).sum(),
            weeks: weeks
                .iter()
                .map(|&(w, a, d, c)| RawWeek { w, a, d, c })
                .collect(),
        }
    }

    pub(crate) fn snapshot(with_stats: bool) -> RepositorySnapshot {
        RepositorySnapshot {
            owner: "acme".into(),
            repo: "widget".into(),
            repository: RawRepository {
                full_name: "acme/widget".into(),
                description: Some("Widgets".into()),
                html_url: "https://github.com/acme/widget".into(),
                default_branch: Some("main".into()),
                stargazers_count: 12,
                forks_count: 3,
                open_issues_count: 1,
                created_at: None,
                pushed_at: None,
            },
            languages: HashMap::from([("Rust".to_string(), 750), ("Shell".to_string(), 250)]),
            contributors: vec![contributor("alice", 8), contributor("bob", 2)],
            stats: with_stats.then(|| {
                vec![
                    stats(
                        "alice",
                        &[(W0, 100, 20, 4), (W0 + WEEK_SECS, 0, 0, 0), (W0 + 2 * WEEK_SECS, 60, 20, 4)],
                    ),
                    stats("bob", &[(W0, 0, 0, 0), (W0 + WEEK_SECS, 40, 0, 2), (W0 + 2 * WEEK_SECS, 0, 0, 0)]),
                ]
            }),
        }
    }

    #[test]
    fn test_language_shares() {
        let shares = language_shares(&snapshot(false).languages);
        assert_eq!(shares[0].name, "Rust");
        assert_eq!(shares[0].percentage, 75.0);
        assert_eq!(shares[1].percentage, 25.0);
    }

    #[test]
    fn test_score_bounds() {
        assert_eq!(contributor_score(1.0, 1.0, 1.0), 100.0);
        assert_eq!(contributor_score(0.0, 0.0, 0.0), 0.0);
        assert_eq!(contributor_score(0.5, 0.25, 0.5), 42.5);
    }

    #[test]
    fn test_build_report_with_stats() {
        let report = build_report(snapshot(true), Utc::now());
        assert!(report.stats_available);
        assert_eq!(report.totals.commits, 10);
        assert_eq!(report.totals.additions, 200);
        assert_eq!(report.totals.deletions, 40);
        assert_eq!(report.totals.weeks_observed, 3);

        let alice = &report.contributors[0];
        assert_eq!(alice.login, "alice");
        assert_eq!(alice.active_weeks, 2);
        assert_eq!(alice.first_active_week, Some(W0));
        assert_eq!(alice.last_active_week, Some(W0 + 2 * WEEK_SECS));
        assert_eq!(alice.commit_share, 80.0);
        // 0.5*0.8 + 0.3*(200/240) + 0.2*(2/3)
        assert_eq!(alice.score, 78.33);
        assert_eq!(alice.level, ContributorLevel::Core);

        let bob = &report.contributors[1];
        assert_eq!(bob.html_url.as_deref(), Some("https://github.com/bob"));
        assert_eq!(bob.level, ContributorLevel::Regular);
    }

    #[test]
    fn test_build_report_without_stats() {
        let report = build_report(snapshot(false), Utc::now());
        assert!(!report.stats_available);
        assert_eq!(report.totals.weeks_observed, 0);
        assert_eq!(report.totals.additions, 0);
        assert_eq!(report.contributors[0].score, 40.0);
        assert_eq!(report.contributors[1].score, 10.0);
        assert_eq!(report.contributors[1].level, ContributorLevel::Occasional);
    }
}
