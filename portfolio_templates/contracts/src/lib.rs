use serde::Serialize;

#[cfg_attr(feature = "mock", mockall::automock)]
pub trait TemplateService: Send + Sync + 'static {
    /// Render the given template.
    fn render<T: Template + 'static>(&self, template: &T) -> anyhow::Result<String>;
}

#[cfg(feature = "mock")]
impl MockTemplateService {
    pub fn with_render<T: Template + Send + PartialEq + std::fmt::Debug + 'static>(
        mut self,
        template: T,
        result: String,
    ) -> Self {
        self.expect_render()
            .once()
            .with(mockall::predicate::eq(template))
            .return_once(|_| Ok(result));
        self
    }
}

pub trait Template: Serialize {
    /// Registered template name. The `.html` suffix keeps tera's autoescaping
    /// active, so user-supplied values cannot inject markup.
    const NAME: &'static str;
    const TEMPLATE: &'static str;
}

pub const BASE_TEMPLATE: &str = include_str!("../templates/base.html");

macro_rules! templates {
    ($( $ident:ident ( $path:literal ), )* ) => {
        $(
            impl Template for $ident {
                const NAME: &'static str = $path;
                const TEMPLATE: &'static str = include_str!(concat!("../templates/", $path));
            }
        )*

        pub const TEMPLATES: &[(&str, &str)] = &[
            $( ($ident::NAME, $ident::TEMPLATE) ),*
        ];
    };
}

templates! {
    OwnerNotificationTemplate("owner_notification.html"),
    AutoReplyTemplate("auto_reply.html"),
}

/// Summary of a visitor's submission, sent to the site owner.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct OwnerNotificationTemplate {
    pub name: String,
    pub email: String,
    pub subject: String,
    pub message: String,
    pub submitted_at: String,
}

/// Acknowledgment sent back to the visitor.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct AutoReplyTemplate {
    pub name: String,
    pub subject: String,
    /// Display name the reply is signed with; empty hides the signature.
    pub owner: String,
}
