use crate::forms::FormKind;
use crate::knowledge::{ KnowledgeBase, Service };
use std::fmt;

pub const SERVICES_PATH: &str = "/services";
pub const THANK_YOU_PATH: &str = "/thank-you";

#[derive(Debug, Clone, PartialEq, Eq)]
pub enum Route {
    Home,
    About,
    Services,
    ServiceDetail(String),
    Contact,
    Apply,
    Form(FormKind),
    Chat,
    ThankYou,
}

impl Route {
    /// Maps an in-app path onto a route. Query strings and fragments are
    /// ignored; anything outside the site returns `None`.
    pub fn parse(path: &str) -> Option<Route> {
        let path = path.split(['?', '#']).next().unwrap_or_default();
        let trimmed = if path.len() > 1 { path.trim_end_matches('/') } else { path };

        let route = match trimmed {
            "/" => Route::Home,
            "/about" => Route::About,
            "/services" => Route::Services,
            "/contact" => Route::Contact,
            "/apply" => Route::Apply,
            "/faq" => Route::Chat,
            "/thank-you" => Route::ThankYou,
            other => {
                if let Some(kind) = FormKind::ALL.iter().find(|k| k.path() == other) {
                    return Some(Route::Form(*kind));
                }
                let id = other.strip_prefix("/services/")?;
                if id.is_empty() || id.contains('/') {
                    return None;
                }
                Route::ServiceDetail(id.to_string())
            }
        };
        Some(route)
    }

    pub fn path(&self) -> String {
        match self {
            Route::Home => "/".to_string(),
            Route::About => "/about".to_string(),
            Route::Services => SERVICES_PATH.to_string(),
            Route::ServiceDetail(id) => format!("{}/{}", SERVICES_PATH, id),
            Route::Contact => "/contact".to_string(),
            Route::Apply => "/apply".to_string(),
            Route::Form(kind) => kind.path().to_string(),
            Route::Chat => "/faq".to_string(),
            Route::ThankYou => THANK_YOU_PATH.to_string(),
        }
    }
}

impl fmt::Display for Route {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(&self.path())
    }
}

/// Where an unknown service id sends the visitor.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Redirect(pub String);

pub fn resolve_service<'a>(kb: &'a KnowledgeBase, id: &str) -> Result<&'a Service, Redirect> {
    kb.service(id).ok_or_else(|| Redirect(SERVICES_PATH.to_string()))
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn parses_fixed_routes() {
        assert_eq!(Route::parse("/"), Some(Route::Home));
        assert_eq!(Route::parse("/contact"), Some(Route::Contact));
        assert_eq!(Route::parse("/contact/"), Some(Route::Contact));
        assert_eq!(Route::parse("/faq?x=1"), Some(Route::Chat));
        assert_eq!(Route::parse("/book-service"), Some(Route::Form(FormKind::ServiceBooking)));
        assert_eq!(
            Route::parse("/apply/job-application"),
            Some(Route::Form(FormKind::JobApplication))
        );
    }

    #[test]
    fn parses_service_detail() {
        assert_eq!(
            Route::parse("/services/training"),
            Some(Route::ServiceDetail("training".to_string()))
        );
        assert_eq!(Route::parse("/services/a/b"), None);
        assert_eq!(Route::parse("/careers"), None);
        assert_eq!(Route::parse("https://example.com/contact"), None);
    }

    #[test]
    fn path_round_trips() {
        for path in ["/", "/about", "/services/career-dev", "/apply/training-registration", "/thank-you"] {
            assert_eq!(Route::parse(path).unwrap().path(), path);
        }
    }

    #[test]
    fn unknown_service_redirects_to_listing() {
        let kb = KnowledgeBase::builtin();
        assert_eq!(resolve_service(&kb, "recruitment").unwrap().title, "Recruitment & Staffing");
        assert_eq!(resolve_service(&kb, "nope"), Err(Redirect("/services".to_string())));
    }
}
