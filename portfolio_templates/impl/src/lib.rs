use std::sync::Arc;

use portfolio_templates_contracts::{Template, TemplateService, BASE_TEMPLATE, TEMPLATES};
use tera::Tera;

#[derive(Debug, Clone)]
pub struct TemplateServiceImpl {
    tera: Arc<Tera>,
}

impl TemplateServiceImpl {
    pub fn new() -> Self {
        let mut tera = Tera::default();

        // Template names carry the .html suffix, which keeps tera's
        // autoescaping active for every rendered variable.
        tera.add_raw_template("base.html", BASE_TEMPLATE).unwrap();

        for &(name, template) in TEMPLATES {
            tera.add_raw_template(name, template).unwrap();
        }

        Self { tera: tera.into() }
    }
}

impl Default for TemplateServiceImpl {
    fn default() -> Self {
        Self::new()
    }
}

impl TemplateService for TemplateServiceImpl {
    fn render<T: Template>(&self, template: &T) -> anyhow::Result<String> {
        let context = tera::Context::from_serialize(template)?;
        self.tera.render(T::NAME, &context).map_err(Into::into)
    }
}

#[cfg(test)]
mod tests {
    use portfolio_templates_contracts::{AutoReplyTemplate, OwnerNotificationTemplate};

    use super::*;

    #[test]
    fn owner_notification() {
        let html = TemplateServiceImpl::new()
            .render(&OwnerNotificationTemplate {
                name: "Ada Lovelace".into(),
                email: "ada@example.com".into(),
                subject: "Collaboration".into(),
                message: "Hello there".into(),
                submitted_at: "2026-08-07T12:00:00+00:00".into(),
            })
            .unwrap();

        assert!(html.contains("Ada Lovelace"));
        assert!(html.contains("mailto:ada@example.com"));
        assert!(html.contains("Collaboration"));
        assert!(html.contains("Hello there"));
        assert!(html.contains("2026-08-07T12:00:00+00:00"));
    }

    #[test]
    fn auto_reply() {
        let html = TemplateServiceImpl::new()
            .render(&AutoReplyTemplate {
                name: "Ada".into(),
                subject: "Collaboration".into(),
                owner: "Valentine".into(),
            })
            .unwrap();

        assert!(html.contains("Hello <strong>Ada</strong>"));
        assert!(html.contains("Collaboration"));
        assert!(html.contains("Valentine"));
    }

    #[test]
    fn auto_reply_without_owner_signature() {
        let html = TemplateServiceImpl::new()
            .render(&AutoReplyTemplate {
                name: "Ada".into(),
                subject: "Collaboration".into(),
                owner: String::new(),
            })
            .unwrap();

        assert!(!html.contains("Best regards"));
    }

    #[test]
    fn user_content_is_escaped() {
        let html = TemplateServiceImpl::new()
            .render(&OwnerNotificationTemplate {
                name: "<script>alert(1)</script>".into(),
                email: "ada@example.com".into(),
                subject: "\"quotes\" & <tags>".into(),
                message: "<img src=x onerror=alert(1)>".into(),
                submitted_at: "2026-08-07T12:00:00+00:00".into(),
            })
            .unwrap();

        assert!(!html.contains("<script>"));
        assert!(!html.contains("<img"));
        assert!(html.contains("&lt;script&gt;alert(1)&lt;&#x2F;script&gt;"));
        assert!(html.contains("&lt;img src=x onerror=alert(1)&gt;"));
    }
}
