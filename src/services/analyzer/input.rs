//! 仓库地址解析

use once_cell::sync::Lazy;
use regex::Regex;

static SHORT_FORM: Lazy<Regex> = Lazy::new(|| {
    Regex::new(r"^(?P<owner>[A-Za-z0-9](?:[A-Za-z0-9-]{0,38}))/(?P<repo>[A-Za-z0-9._-]{1,100})$")
        .expect("Invalid repository short form regex")
});

static HTTPS_FORM: Lazy<Regex> = Lazy::new(|| {
    Regex::new(
        r"^https?://(?:www\.)?github\.com/(?P<owner>[A-Za-z0-9](?:[A-Za-z0-9-]{0,38}))/(?P<repo>[A-Za-z0-9._-]{1,100}?)(?:\.git)?/?$",
    )
    .expect("Invalid repository url regex")
});

static SSH_FORM: Lazy<Regex> = Lazy::new(|| {
    Regex::new(
        r"^git@github\.com:(?P<owner>[A-Za-z0-9](?:[A-Za-z0-9-]{0,38}))/(?P<repo>[A-Za-z0-9._-]{1,100}?)(?:\.git)?$",
    )
    .expect("Invalid repository ssh regex")
});

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct RepositoryRef {
    pub owner: String,
    pub repo: String,
}

impl RepositoryRef {
    pub fn full_name(&self) -> String {
        format!("{}/{}", self.owner, self.repo)
    }

    /// 缓存键不区分大小写
    pub fn cache_key(&self) -> String {
        format!("analyzer:{}", self.full_name().to_ascii_lowercase())
    }
}

/// 支持 `owner/repo`、https 地址与 ssh 地址
pub fn parse_repository(input: &str) -> Result<RepositoryRef, String> {
    let input = input.trim();
    if input.is_empty() {
        return Err("Repository must not be empty".to_string());
    }

    let captures = SHORT_FORM
        .captures(input)
        .or_else(|| HTTPS_FORM.captures(input))
        .or_else(|| SSH_FORM.captures(input))
        .ok_or_else(|| format!("Unrecognized repository: {input}"))?;

    let owner = captures["owner"].to_string();
    let repo = captures["repo"].trim_end_matches(".git").to_string();
    if repo.is_empty() || repo == "." || repo == ".." {
        return Err(format!("Unrecognized repository: {input}"));
    }

    Ok(RepositoryRef { owner, repo })
}

#[cfg(test)]
mod tests {
    use super::*;

    fn parsed(input: &str) -> (String, String) {
        let r = parse_repository(input).unwrap();
        (r.owner, r.repo)
    }

    #[test]
    fn test_accepted_forms() {
        let expected = ("rust-lang".to_string(), "cargo".to_string());
        assert_eq!(parsed("rust-lang/cargo"), expected);
        assert_eq!(parsed("https://github.com/rust-lang/cargo"), expected);
        assert_eq!(parsed("https://github.com/rust-lang/cargo.git"), expected);
        assert_eq!(parsed("https://github.com/rust-lang/cargo/"), expected);
        assert_eq!(parsed("git@github.com:rust-lang/cargo.git"), expected);
        assert_eq!(parsed("  rust-lang/cargo  "), expected);
    }

    #[test]
    fn test_dotted_repository_names() {
        assert_eq!(
            parsed("https://github.com/vercel/next.js"),
            ("vercel".to_string(), "next.js".to_string())
        );
    }

    #[test]
    fn test_rejected_forms() {
        assert!(parse_repository("").is_err());
        assert!(parse_repository("cargo").is_err());
        assert!(parse_repository("https://gitlab.com/a/b").is_err());
        assert!(parse_repository("a/b/c").is_err());
        assert!(parse_repository("-bad/repo").is_err());
    }

    #[test]
    fn test_cache_key() {
        let r = parse_repository("Rust-Lang/Cargo").unwrap();
        assert_eq!(r.cache_key(), "analyzer:rust-lang/cargo");
    }
}
