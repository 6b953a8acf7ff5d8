//! GitHub REST v3 客户端

use reqwest::StatusCode;
use serde::Deserialize;
use std::collections::HashMap;
use std::time::Duration;
use tracing::debug;

use crate::config::GitHubConfig;
use crate::errors::{EvalAdminError, Result};

const USER_AGENT: &str = concat!(env!("CARGO_PKG_NAME"), "/", env!("CARGO_PKG_VERSION"));

#[derive(Debug, Clone, Deserialize)]
pub struct RawRepository {
    pub full_name: String,
    #[serde(default)]
    pub description: Option<String>,
    pub html_url: String,
    #[serde(default)]
    pub default_branch: Option<String>,
    #[serde(default)]
    pub stargazers_count: i64,
    #[serde(default)]
    pub forks_count: i64,
    #[serde(default)]
    pub open_issues_count: i64,
    #[serde(default)]
    pub created_at: Option<String>,
    #[serde(default)]
    pub pushed_at: Option<String>,
}

#[derive(Debug, Clone, Deserialize)]
pub struct RawContributor {
    pub login: String,
    #[serde(default)]
    pub avatar_url: Option<String>,
    #[serde(default)]
    pub html_url: Option<String>,
    #[serde(default)]
    pub contributions: i64,
}

#[derive(Debug, Clone, Deserialize)]
pub struct RawAuthor {
    pub login: String,
    #[serde(default)]
    pub avatar_url: Option<String>,
    #[serde(default)]
    pub html_url: Option<String>,
}

/// 每周统计：w 周起始时间，a 新增行，d 删除行，c 提交数
#[derive(Debug, Clone, Deserialize)]
pub struct RawWeek {
    pub w: i64,
    #[serde(default)]
    pub a: i64,
    #[serde(default)]
    pub d: i64,
    #[serde(default)]
    pub c: i64,
}

#[derive(Debug, Clone, Deserialize)]
pub struct RawContributorStats {
    #[serde(default)]
    pub author: Option<RawAuthor>,
    #[serde(default)]
    pub total: i64,
    #[serde(default)]
    pub weeks: Vec<RawWeek>,
}

/// 一次分析所需的原始数据
#[derive(Debug, Clone)]
pub struct RepositorySnapshot {
    pub owner: String,
    pub repo: String,
    pub repository: RawRepository,
    pub languages: HashMap<String, i64>,
    pub contributors: Vec<RawContributor>,
    // 统计仍在计算（202）时为 None
    pub stats: Option<Vec<RawContributorStats>>,
}

#[async_trait::async_trait]
pub trait RepositorySource: Send + Sync {
    async fn fetch(&self, owner: &str, repo: &str) -> Result<RepositorySnapshot>;
}

pub struct GitHubClient {
    config: GitHubConfig,
    client: reqwest::Client,
}

impl GitHubClient {
    pub fn new(config: GitHubConfig) -> Result<Self> {
        let client = reqwest::Client::builder()
            .timeout(Duration::from_secs(config.timeout_secs.max(1)))
            .user_agent(USER_AGENT)
            .build()?;
        Ok(Self { config, client })
    }

    fn url(&self, path: &str) -> String {
        format!("{}{}", self.config.api_url.trim_end_matches('/'), path)
    }

    async fn get(&self, path: &str) -> Result<reqwest::Response> {
        let mut request = self
            .client
            .get(self.url(path))
            .header("Accept", "application/vnd.github+json");
        if !self.config.token.trim().is_empty() {
            request = request.bearer_auth(self.config.token.trim());
        }

        debug!("GitHub GET {}", path);
        let response = request.send().await?;
        let status = response.status();
        if status == StatusCode::NOT_FOUND {
            return Err(EvalAdminError::not_found(format!(
                "GitHub resource not found: {path}"
            )));
        }
        if !status.is_success() {
            let error_text = response.text().await.unwrap_or_default();
            return Err(EvalAdminError::external_service(format!(
                "GitHub request {path} failed with status {status}: {error_text}"
            )));
        }
        Ok(response)
    }

    async fn get_json<T: serde::de::DeserializeOwned>(&self, path: &str) -> Result<T> {
        self.get(path).await?.json::<T>().await.map_err(|e| {
            EvalAdminError::response_parse(format!("Failed to decode GitHub response {path}: {e}"))
        })
    }
}

#[async_trait::async_trait]
impl RepositorySource for GitHubClient {
    async fn fetch(&self, owner: &str, repo: &str) -> Result<RepositorySnapshot> {
        let base = format!("/repos/{owner}/{repo}");

        let repository: RawRepository = self.get_json(&base).await?;
        let languages: HashMap<String, i64> =
            self.get_json(&format!("{base}/languages")).await?;

        // 空仓库返回 204
        let response = self
            .get(&format!("{base}/contributors?per_page=100"))
            .await?;
        let contributors: Vec<RawContributor> = if response.status() == StatusCode::NO_CONTENT {
            Vec::new()
        } else {
            response.json().await.map_err(|e| {
                EvalAdminError::response_parse(format!("Failed to decode contributors: {e}"))
            })?
        };

        let response = self.get(&format!("{base}/stats/contributors")).await?;
        let stats = match response.status() {
            StatusCode::ACCEPTED | StatusCode::NO_CONTENT => {
                debug!("Contributor statistics for {owner}/{repo} are not ready");
                None
            }
            _ => Some(response.json::<Vec<RawContributorStats>>().await.map_err(|e| {
                EvalAdminError::response_parse(format!(
                    "Failed to decode contributor statistics: {e}"
                ))
            })?),
        };

        Ok(RepositorySnapshot {
            owner: owner.to_string(),
            repo: repo.to_string(),
            repository,
            languages,
            contributors,
            stats,
        })
    }
}

#[cfg(test)]
pub(crate) mod tests {
    use super::*;

    /// 返回固定快照的数据源
    pub(crate) struct StaticSource(pub RepositorySnapshot);

    #[async_trait::async_trait]
    impl RepositorySource for StaticSource {
        async fn fetch(&self, _owner: &str, _repo: &str) -> Result<RepositorySnapshot> {
            Ok(self.0.clone())
        }
    }

    #[test]
    fn test_url() {
        let client = GitHubClient::new(GitHubConfig {
            api_url: "https://api.github.com/".into(),
            token: String::new(),
            timeout_secs: 5,
            report_ttl_secs: 60,
        })
        .unwrap();
        assert_eq!(
            client.url("/repos/a/b/languages"),
            "https://api.github.com/repos/a/b/languages"
        );
    }

    #[test]
    fn test_decode_stats() {
        let stats: Vec<RawContributorStats> = serde_json::from_str(
            r#"[{"author":{"login":"alice","avatar_url":null},"total":3,
                "weeks":[{"w":1700000000,"a":10,"d":2,"c":3}]},
               {"author":null,"total":1,"weeks":[]}]"#,
        )
        .unwrap();
        assert_eq!(stats.len(), 2);
        assert_eq!(stats[0].author.as_ref().unwrap().login, "alice");
        assert_eq!(stats[0].weeks[0].a, 10);
        assert!(stats[1].author.is_none());
    }
}
