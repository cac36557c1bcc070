//! Route classification for the access gate.
//!
//! An ordered rule table; the first matching rule wins and unmatched paths
//! are `Protected`. Classification is a pure function of the table and the
//! path string, so it is tested here without any HTTP plumbing.

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum RouteClass {
    /// No session or role lookup.
    Public,
    /// Requires an `admin` or `superadmin` role.
    Admin,
    /// Requires a session, no particular role.
    Protected,
}

pub const PUBLIC_PAGES: &[&str] = &[
    "/",
    "/login",
    "/register",
    "/forgot-password",
    "/reset-password",
    "/cookie-preferences",
    "/privacy",
    "/terms",
    "/legal-notice",
];

/// The forwarder prefix is appended at construction.
pub const PUBLIC_API: &[&str] = &["/api/auth", "/health"];

pub const ADMIN_PAGES: &[&str] = &["/admin-test", "/admin"];

/// Paths the gate never looks at (static assets, image optimisation, favicon).
/// The forwarder prefix is appended at construction.
pub const UNGATED: &[&str] = &["/static", "/assets", "/_image", "/favicon.ico"];

/// `path == prefix` or `path` starts with `prefix + "/"`. The root entry
/// only matches `/` itself.
pub fn matches_prefix(prefix: &str, path: &str) -> bool {
    if prefix == "/" {
        return path == "/";
    }
    match path.strip_prefix(prefix) {
        Some(rest) => rest.is_empty() || rest.starts_with('/'),
        None => false,
    }
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct RouteRule {
    pub prefix: String,
    pub class: RouteClass,
}

impl RouteRule {
    pub fn new(prefix: impl Into<String>, class: RouteClass) -> Self {
        Self {
            prefix: prefix.into(),
            class,
        }
    }

    pub fn matches(&self, path: &str) -> bool {
        matches_prefix(&self.prefix, path)
    }
}

#[derive(Debug, Clone)]
pub struct RouteRules {
    rules: Vec<RouteRule>,
}

impl RouteRules {
    /// Rules are evaluated in order.
    pub fn from_rules(rules: Vec<RouteRule>) -> Self {
        Self { rules }
    }

    /// Dashboard table: public pages and API first, then admin areas.
    pub fn dashboard(proxy_prefix: &str) -> Self {
        let public = PUBLIC_PAGES
            .iter()
            .chain(PUBLIC_API)
            .map(|p| RouteRule::new(*p, RouteClass::Public))
            .chain(std::iter::once(RouteRule::new(
                proxy_prefix,
                RouteClass::Public,
            )));
        let admin = ADMIN_PAGES
            .iter()
            .map(|p| RouteRule::new(*p, RouteClass::Admin));

        Self::from_rules(public.chain(admin).collect())
    }

    pub fn classify(&self, path: &str) -> RouteClass {
        self.rules
            .iter()
            .find(|rule| rule.matches(path))
            .map(|rule| rule.class)
            .unwrap_or(RouteClass::Protected)
    }
}

/// Which requests the gate runs for at all.
#[derive(Debug, Clone)]
pub struct GateScope {
    skipped: Vec<String>,
}

impl GateScope {
    pub fn new(proxy_prefix: &str) -> Self {
        let skipped = UNGATED
            .iter()
            .map(|p| p.to_string())
            .chain(std::iter::once(proxy_prefix.to_string()))
            .collect();
        Self { skipped }
    }

    pub fn applies(&self, path: &str) -> bool {
        !self.skipped.iter().any(|p| matches_prefix(p, path))
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn rules() -> RouteRules {
        RouteRules::dashboard("/api/proxy")
    }

    #[test]
    fn public_pages_and_their_subpaths() {
        let rules = rules();
        for path in [
            "/",
            "/login",
            "/register",
            "/reset-password/abc",
            "/cookie-preferences",
            "/legal-notice",
            "/api/auth/callback",
            "/api/proxy/projects",
            "/health",
        ] {
            assert_eq!(rules.classify(path), RouteClass::Public, "{path}");
        }
    }

    #[test]
    fn root_does_not_swallow_everything() {
        assert_eq!(rules().classify("/dashboard"), RouteClass::Protected);
        assert_eq!(rules().classify("//dashboard"), RouteClass::Protected);
    }

    #[test]
    fn prefix_match_respects_segment_boundaries() {
        let rules = rules();
        assert_eq!(rules.classify("/loginx"), RouteClass::Protected);
        assert_eq!(rules.classify("/login/"), RouteClass::Public);
        assert_eq!(rules.classify("/administrator"), RouteClass::Protected);
    }

    #[test]
    fn admin_areas() {
        let rules = rules();
        assert_eq!(rules.classify("/admin"), RouteClass::Admin);
        assert_eq!(rules.classify("/admin/users"), RouteClass::Admin);
        assert_eq!(rules.classify("/admin-test"), RouteClass::Admin);
    }

    #[test]
    fn everything_else_is_protected() {
        let rules = rules();
        assert_eq!(rules.classify("/dashboard"), RouteClass::Protected);
        assert_eq!(rules.classify("/dashboard/projects/blog"), RouteClass::Protected);
        assert_eq!(rules.classify("/api/projects"), RouteClass::Protected);
    }

    #[test]
    fn first_matching_rule_wins() {
        let rules = RouteRules::from_rules(vec![
            RouteRule::new("/admin/public", RouteClass::Public),
            RouteRule::new("/admin", RouteClass::Admin),
        ]);
        assert_eq!(rules.classify("/admin/public/page"), RouteClass::Public);
        assert_eq!(rules.classify("/admin/other"), RouteClass::Admin);
    }

    #[test]
    fn scope_skips_assets_and_forwarder() {
        let scope = GateScope::new("/api/proxy");
        assert!(!scope.applies("/static/app.css"));
        assert!(!scope.applies("/_image"));
        assert!(!scope.applies("/favicon.ico"));
        assert!(!scope.applies("/api/proxy/projects"));
        assert!(scope.applies("/dashboard"));
        assert!(scope.applies("/staticfile"));
    }
}
