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

/// A template that can be rendered by the [`TemplateService`].
///
/// Templates whose [`Template::NAME`] ends with `.html` are rendered with
/// autoescaping enabled.
pub trait Template: Serialize {
    const NAME: &'static str;
    const TEMPLATE: &'static str;
}

pub const BASE_TEMPLATE: (&str, &str) = ("base.html", include_str!("../templates/base.html"));

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
    ContactMessageHtmlTemplate("contact_message.html"),
    ContactMessageTextTemplate("contact_message.txt"),
}

/// HTML body of the email sent to the site owner for a contact message.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct ContactMessageHtmlTemplate {
    pub name: String,
    pub email: String,
    pub message: String,
}

/// Plain text body of the email sent to the site owner for a contact message.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct ContactMessageTextTemplate {
    pub name: String,
    pub email: String,
    pub message: String,
}
