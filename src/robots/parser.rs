//! Robots.txt parsing
//!
//! Allow/deny matching is delegated to the robotstxt crate. Crawl-delay is
//! not exposed by that crate, so group parsing for it is done here.

use robotstxt::DefaultMatcher;

/// Parsed robots.txt content for one host
#[derive(Debug, Clone)]
pub struct ParsedRobots {
    /// Raw robots.txt content (empty means allow all)
    content: String,
    /// Forced verdict overriding the content, when set
    forced: Option<bool>,
}

impl ParsedRobots {
    /// Creates a new ParsedRobots from raw robots.txt content
    pub fn from_content(content: &str) -> Self {
        Self {
            content: content.to_string(),
            forced: None,
        }
    }

    /// Creates a permissive ParsedRobots that allows everything
    ///
    /// Used when robots.txt cannot be fetched or answers 4xx.
    pub fn allow_all() -> Self {
        Self {
            content: String::new(),
            forced: Some(true),
        }
    }

    /// Creates a restrictive ParsedRobots that denies everything
    ///
    /// Used when the robots.txt fetch answers 5xx.
    pub fn deny_all() -> Self {
        Self {
            content: String::new(),
            forced: Some(false),
        }
    }

    /// Checks if a URL is allowed for the given user agent
    ///
    /// # Arguments
    ///
    /// * `url` - The full URL or path to check
    /// * `user_agent` - The user agent token
    pub fn is_allowed(&self, url: &str, user_agent: &str) -> bool {
        if let Some(verdict) = self.forced {
            return verdict;
        }

        if self.content.is_empty() {
            return true;
        }

        let mut matcher = DefaultMatcher::default();
        matcher.one_agent_allowed_by_robots(&self.content, user_agent, url)
    }

    /// Gets the crawl delay in seconds for a specific user agent
    ///
    /// A Crawl-delay in the group naming this agent wins over one in the
    /// `*` group. Returns None when neither group specifies a delay.
    pub fn crawl_delay(&self, user_agent: &str) -> Option<f64> {
        if self.forced.is_some() {
            return None;
        }

        let ua = user_agent.to_lowercase();
        let mut current_agents: Vec<String> = Vec::new();
        let mut in_group_body = false;
        let mut specific_delay: Option<f64> = None;
        let mut wildcard_delay: Option<f64> = None;

        for line in self.content.lines() {
            let line = line.split('#').next().unwrap_or("").trim();
            if line.is_empty() {
                continue;
            }

            let Some((field, value)) = line.split_once(':') else {
                continue;
            };
            let field = field.trim().to_lowercase();
            let value = value.trim();

            match field.as_str() {
                "user-agent" => {
                    // A user-agent line after directives starts a new group
                    if in_group_body {
                        current_agents.clear();
                        in_group_body = false;
                    }
                    current_agents.push(value.to_lowercase());
                }
                "crawl-delay" => {
                    in_group_body = true;
                    if let Ok(delay) = value.parse::<f64>() {
                        for agent in &current_agents {
                            if agent == "*" {
                                wildcard_delay.get_or_insert(delay);
                            } else if ua.contains(agent.as_str()) {
                                specific_delay.get_or_insert(delay);
                            }
                        }
                    }
                }
                _ => {
                    in_group_body = true;
                }
            }
        }

        specific_delay.or(wildcard_delay)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_allow_all() {
        let robots = ParsedRobots::allow_all();
        assert!(robots.is_allowed("/any/path", "testbot"));
        assert!(robots.is_allowed("/admin", "testbot"));
    }

    #[test]
    fn test_deny_all() {
        let robots = ParsedRobots::deny_all();
        assert!(!robots.is_allowed("/", "testbot"));
        assert!(!robots.is_allowed("/page", "testbot"));
    }

    #[test]
    fn test_parse_disallow_all() {
        let robots = ParsedRobots::from_content("User-agent: *\nDisallow: /");
        assert!(!robots.is_allowed("/", "testbot"));
        assert!(!robots.is_allowed("/page", "testbot"));
    }

    #[test]
    fn test_parse_disallow_specific() {
        let robots = ParsedRobots::from_content("User-agent: *\nDisallow: /admin");
        assert!(robots.is_allowed("/", "testbot"));
        assert!(robots.is_allowed("/page", "testbot"));
        assert!(!robots.is_allowed("/admin", "testbot"));
        assert!(!robots.is_allowed("/admin/users", "testbot"));
    }

    #[test]
    fn test_allow_outranks_disallow_of_shorter_prefix() {
        let robots =
            ParsedRobots::from_content("User-agent: *\nDisallow: /private\nAllow: /private/public");
        assert!(robots.is_allowed("/", "testbot"));
        assert!(!robots.is_allowed("/private", "testbot"));
        assert!(robots.is_allowed("/private/public", "testbot"));
    }

    #[test]
    fn test_specific_user_agent_group() {
        let robots = ParsedRobots::from_content(
            "User-agent: badbot\nDisallow: /\n\nUser-agent: *\nAllow: /",
        );
        assert!(robots.is_allowed("/page", "goodbot"));
        assert!(!robots.is_allowed("/page", "badbot"));
    }

    #[test]
    fn test_empty_content_allows() {
        let robots = ParsedRobots::from_content("");
        assert!(robots.is_allowed("/any/path", "testbot"));
    }

    #[test]
    fn test_crawl_delay_wildcard() {
        let robots =
            ParsedRobots::from_content("User-agent: *\nCrawl-delay: 5\nDisallow: /admin");
        assert_eq!(robots.crawl_delay("testbot"), Some(5.0));
    }

    #[test]
    fn test_crawl_delay_fractional() {
        let robots = ParsedRobots::from_content("User-agent: *\nCrawl-delay: 0.5");
        assert_eq!(robots.crawl_delay("testbot"), Some(0.5));
    }

    #[test]
    fn test_crawl_delay_specific_wins_over_wildcard() {
        let robots = ParsedRobots::from_content(
            "User-agent: testbot\nCrawl-delay: 10\n\nUser-agent: *\nCrawl-delay: 2",
        );
        assert_eq!(robots.crawl_delay("testbot"), Some(10.0));
        assert_eq!(robots.crawl_delay("otherbot"), Some(2.0));
    }

    #[test]
    fn test_crawl_delay_absent() {
        let robots = ParsedRobots::from_content("User-agent: *\nDisallow: /admin");
        assert_eq!(robots.crawl_delay("testbot"), None);
    }

    #[test]
    fn test_crawl_delay_shared_group_header() {
        // Two agents heading one group both get the delay
        let robots = ParsedRobots::from_content(
            "User-agent: alpha\nUser-agent: beta\nCrawl-delay: 3",
        );
        assert_eq!(robots.crawl_delay("alpha/1.0"), Some(3.0));
        assert_eq!(robots.crawl_delay("beta/2.0"), Some(3.0));
        assert_eq!(robots.crawl_delay("gamma"), None);
    }

    #[test]
    fn test_crawl_delay_ignores_comments() {
        let robots = ParsedRobots::from_content(
            "# robots\nUser-agent: * # all\nCrawl-delay: 4 # seconds",
        );
        assert_eq!(robots.crawl_delay("testbot"), Some(4.0));
    }
}
