use parking_lot::RwLock;
use reqwest::Client;
use robotstxt::DefaultMatcher;
use std::collections::HashMap;
use std::sync::Arc;
use url::Url;

/// One origin's robots.txt body. An empty body allows everything.
#[derive(Debug, Clone, Default, PartialEq)]
pub struct RobotsRules {
    body: String,
}

impl RobotsRules {
    pub fn parse(txt: &str) -> Self { Self { body: txt.to_string() } }

    pub fn allow_all() -> Self { Self::default() }

    /// Whether `agent` (a product token such as `sift-bot`) may fetch `url`.
    pub fn allows(&self, url: &str, agent: &str) -> bool {
        if self.body.trim().is_empty() {
            return true;
        }
        DefaultMatcher::default().one_agent_allowed_by_robots(&self.body, agent, url)
    }
}

/// The product token of a User-Agent header: `sift-bot/0.1 (+url)` matches as `sift-bot`.
pub fn product_token(user_agent: &str) -> &str {
    let end = user_agent
        .find(|c: char| !(c.is_ascii_alphanumeric() || c == '-' || c == '_'))
        .unwrap_or(user_agent.len());
    &user_agent[..end]
}

/// Per-origin robots.txt, fetched once and shared by all fetch workers.
pub struct RobotsCache {
    agent: String,
    origins: RwLock<HashMap<String, Arc<RobotsRules>>>,
}

impl RobotsCache {
    pub fn new(user_agent: &str) -> Self {
        Self { agent: product_token(user_agent).to_string(), origins: RwLock::new(HashMap::new()) }
    }

    pub fn agent(&self) -> &str { &self.agent }

    pub async fn allowed(&self, client: &Client, url: &Url) -> bool {
        let Some(host) = url.host_str() else { return false };
        let key = match url.port() {
            Some(port) => format!("{}://{host}:{port}", url.scheme()),
            None => format!("{}://{host}", url.scheme()),
        };
        let cached = self.origins.read().get(&key).cloned();
        let rules = match cached {
            Some(rules) => rules,
            None => {
                let rules = match client.get(format!("{key}/robots.txt")).send().await {
                    Ok(resp) if resp.status().is_success() => {
                        RobotsRules::parse(&resp.text().await.unwrap_or_default())
                    }
                    // unreachable or missing robots.txt: no restrictions
                    _ => RobotsRules::allow_all(),
                };
                tracing::debug!(origin = %key, "robots.txt cached");
                let rules = Arc::new(rules);
                self.origins.write().insert(key, rules.clone());
                rules
            }
        };
        rules.allows(url.as_str(), &self.agent)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    const AGENT: &str = "sift-bot";

    const ROBOTS: &str = "\
User-agent: googlebot
Disallow: /

User-agent: *
Disallow: /private
Allow: /private/open # comment
Disallow:
";

    fn allows(txt: &str, path: &str) -> bool {
        RobotsRules::parse(txt).allows(&format!("https://site.test{path}"), AGENT)
    }

    #[test]
    fn star_group_applies_to_unnamed_agents() {
        assert!(allows(ROBOTS, "/"));
        assert!(allows(ROBOTS, "/public/page"));
        assert!(!allows(ROBOTS, "/private/secret"));
        assert!(allows(ROBOTS, "/private/open/file"));
    }

    #[test]
    fn empty_file_allows_everything() {
        assert!(allows("", "/anything"));
        assert!(RobotsRules::allow_all().allows("https://site.test/x", AGENT));
    }

    #[test]
    fn disallow_root_blocks_all() {
        let txt = "User-agent: *\nDisallow: /\n";
        assert!(!allows(txt, "/"));
        assert!(!allows(txt, "/a/b"));
    }

    #[test]
    fn consecutive_user_agents_share_a_group() {
        assert!(!allows("User-agent: *\nUser-agent: otherbot\nDisallow: /private\n", "/private/x"));
    }

    #[test]
    fn wildcards_and_anchors_match() {
        let txt = "User-agent: *\nDisallow: /*.pdf$\n";
        assert!(!allows(txt, "/a.pdf"));
        assert!(!allows(txt, "/docs/b.pdf"));
        assert!(allows(txt, "/a.pdf.html"));
    }

    #[test]
    fn named_group_overrides_star() {
        let txt = "User-agent: sift-bot\nDisallow: /\n\nUser-agent: *\nAllow: /\n";
        assert!(!allows(txt, "/page"));
        assert!(RobotsRules::parse(txt).allows("https://site.test/page", "otherbot"));
    }

    #[test]
    fn product_token_drops_version_and_comment() {
        assert_eq!(product_token("sift-bot/0.1 (+https://example.com/bot)"), "sift-bot");
        assert_eq!(product_token("plainbot"), "plainbot");
        assert_eq!(RobotsCache::new("Sift_Bot/2").agent(), "Sift_Bot");
    }
}
