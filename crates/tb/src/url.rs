//! Application links.

use log::warn;
use taskboard_query::LinkBuilder;

/// Builds `?controller=…&action=…&…` links relative to a base path.
#[derive(Debug, Clone)]
pub struct UrlBuilder {
    base: String,
}

impl Default for UrlBuilder {
    fn default() -> Self {
        Self::new("/")
    }
}

impl UrlBuilder {
    pub fn new(base: impl Into<String>) -> Self {
        Self { base: base.into() }
    }

    /// Returns the link to `controller`/`action`.
    pub fn to(&self, controller: &str, action: &str, params: &[(&str, String)]) -> String {
        let mut pairs: Vec<(&str, &str)> = vec![("controller", controller), ("action", action)];
        pairs.extend(params.iter().map(|(k, v)| (*k, v.as_str())));

        match serde_urlencoded::to_string(&pairs) {
            Ok(query) => format!("{}?{query}", self.base),
            Err(err) => {
                warn!("event=url_build module=url status=error controller={controller} action={action} error={err}");
                self.base.clone()
            }
        }
    }
}

impl LinkBuilder for UrlBuilder {
    fn link(&self, controller: &str, action: &str, params: &[(&str, String)]) -> String {
        self.to(controller, action, params)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_link_encodes_params() {
        let urls = UrlBuilder::default();
        assert_eq!(
            urls.to("GanttController", "project", &[("project_id", "3".to_string())]),
            "/?controller=GanttController&action=project&project_id=3"
        );
        assert_eq!(
            urls.to("Search", "activity", &[("search", "status:open a&b".to_string())]),
            "/?controller=Search&action=activity&search=status%3Aopen+a%26b"
        );
    }

    #[test]
    fn test_custom_base() {
        let urls = UrlBuilder::new("/board/");
        assert_eq!(urls.link("GanttController", "projects", &[]), "/board/?controller=GanttController&action=projects");
    }
}
