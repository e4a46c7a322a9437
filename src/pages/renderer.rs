use chrono::{DateTime, Local};
use std::sync::Arc;

/// Toolchain version baked in by build.rs, shown as the runtime version.
const RUNTIME_VERSION: &str = env!("APPLEBITE_RUSTC_VERSION");

const HOME_TEMPLATE: &str = include_str!("templates/index.html");
const ABOUT_TEMPLATE: &str = include_str!("templates/about.html");
const CONTACT_TEMPLATE: &str = include_str!("templates/contact.html");

const TIMESTAMP_FORMAT: &str = "%Y-%m-%d %H:%M:%S";

/// One of the three fixed site pages.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Page {
    Home,
    About,
    Contact,
}

pub trait Clock: Send + Sync {
    fn now(&self) -> DateTime<Local>;
}

pub struct SystemClock;

impl Clock for SystemClock {
    fn now(&self) -> DateTime<Local> {
        Local::now()
    }
}

/// Produces the HTML document for a page. The app version and clock are
/// injected at construction; the request's host is passed per render.
pub struct PageRenderer {
    app_version: String,
    clock: Arc<dyn Clock>,
}

impl PageRenderer {
    pub fn new(app_version: impl Into<String>) -> Self {
        Self::with_clock(app_version, Arc::new(SystemClock))
    }

    pub fn with_clock(app_version: impl Into<String>, clock: Arc<dyn Clock>) -> Self {
        Self {
            app_version: app_version.into(),
            clock,
        }
    }

    /// About and contact are served verbatim; only the home page carries
    /// substitutions.
    pub fn render(&self, page: Page, host: &str) -> String {
        match page {
            Page::Home => self.render_home(host),
            Page::About => ABOUT_TEMPLATE.to_string(),
            Page::Contact => CONTACT_TEMPLATE.to_string(),
        }
    }

    fn render_home(&self, host: &str) -> String {
        let timestamp = self.clock.now().format(TIMESTAMP_FORMAT).to_string();
        HOME_TEMPLATE
            .replace("{{app_version}}", &escape_html(&self.app_version))
            .replace("{{server_name}}", &escape_html(server_name(host)))
            .replace("{{runtime_version}}", &escape_html(RUNTIME_VERSION))
            .replace("{{render_timestamp}}", &timestamp)
    }
}

/// Host header minus any port suffix. Bracketed IPv6 literals keep their
/// brackets.
fn server_name(host: &str) -> &str {
    if let Some(end) = host.rfind(']') {
        return &host[..=end];
    }
    match host.rsplit_once(':') {
        Some((name, port)) if port.chars().all(|c| c.is_ascii_digit()) => name,
        _ => host,
    }
}

fn escape_html(value: &str) -> String {
    let mut escaped = String::with_capacity(value.len());
    for c in value.chars() {
        match c {
            '&' => escaped.push_str("&amp;"),
            '<' => escaped.push_str("&lt;"),
            '>' => escaped.push_str("&gt;"),
            '"' => escaped.push_str("&quot;"),
            '\'' => escaped.push_str("&#39;"),
            _ => escaped.push(c),
        }
    }
    escaped
}

#[cfg(test)]
mod tests {
    use super::*;
    use chrono::TimeZone;

    struct FixedClock(DateTime<Local>);

    impl Clock for FixedClock {
        fn now(&self) -> DateTime<Local> {
            self.0
        }
    }

    fn fixed_renderer(app_version: &str) -> PageRenderer {
        let at = Local.with_ymd_and_hms(2024, 5, 1, 12, 30, 0).unwrap();
        PageRenderer::with_clock(app_version, Arc::new(FixedClock(at)))
    }

    fn extract_timestamp(html: &str) -> String {
        let marker = "Deployment Time:</strong> ";
        let start = html.find(marker).expect("timestamp line present") + marker.len();
        html[start..start + 19].to_string()
    }

    #[test]
    fn home_substitutes_all_runtime_values() {
        let html = fixed_renderer("2.3.0").render(Page::Home, "www.applebite.test");
        assert!(html.contains("Version: 2.3.0"));
        assert!(html.contains("Server:</strong> www.applebite.test"));
        assert!(html.contains("Deployment Time:</strong> 2024-05-01 12:30:00"));
        assert!(!html.contains("{{"));
    }

    #[test]
    fn home_strips_port_from_host() {
        let html = fixed_renderer("1.0").render(Page::Home, "www.applebite.test:8080");
        assert!(html.contains("Server:</strong> www.applebite.test</p>"));
    }

    #[test]
    fn home_escapes_substituted_values() {
        let html = fixed_renderer("1.0").render(Page::Home, "bad<host>");
        assert!(html.contains("bad&lt;host&gt;"));
        assert!(!html.contains("bad<host>"));
    }

    #[test]
    fn home_timestamp_is_non_decreasing() {
        let renderer = PageRenderer::new("1.0");
        let first = extract_timestamp(&renderer.render(Page::Home, "localhost"));
        let second = extract_timestamp(&renderer.render(Page::Home, "localhost"));
        // Lexicographic order matches chronological order for this format.
        assert!(second >= first);
    }

    #[test]
    fn about_and_contact_render_verbatim() {
        let renderer = fixed_renderer("9.9");
        assert_eq!(renderer.render(Page::About, "a"), ABOUT_TEMPLATE);
        assert_eq!(renderer.render(Page::Contact, "b"), CONTACT_TEMPLATE);
    }

    #[test]
    fn server_name_handles_host_forms() {
        assert_eq!(server_name("example.com"), "example.com");
        assert_eq!(server_name("example.com:8080"), "example.com");
        assert_eq!(server_name("[::1]:8080"), "[::1]");
        assert_eq!(server_name("[::1]"), "[::1]");
        assert_eq!(server_name("127.0.0.1:80"), "127.0.0.1");
    }

    #[test]
    fn escape_html_covers_special_characters() {
        assert_eq!(
            escape_html(r#"<a href="x">&'"#),
            "&lt;a href=&quot;x&quot;&gt;&amp;&#39;"
        );
    }
}
