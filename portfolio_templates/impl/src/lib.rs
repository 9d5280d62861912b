use std::sync::Arc;

use portfolio_di::Build;
use portfolio_templates_contracts::{Template, TemplateService, BASE_TEMPLATE, TEMPLATES};
use tera::Tera;

#[derive(Debug, Clone, Build)]
pub struct TemplateServiceImpl {
    #[state]
    state: State,
}

#[derive(Debug, Clone)]
struct State(Result<Arc<Tera>, Arc<tera::Error>>);

impl Default for State {
    fn default() -> Self {
        let mut tera = Tera::default();
        let result = tera
            .add_raw_templates(std::iter::once(BASE_TEMPLATE).chain(TEMPLATES.iter().copied()))
            .map(|()| Arc::new(tera))
            .map_err(Arc::new);
        Self(result)
    }
}

impl TemplateService for TemplateServiceImpl {
    fn render<T: Template>(&self, template: &T) -> anyhow::Result<String> {
        let tera = self
            .state
            .0
            .as_ref()
            .map_err(|err| anyhow::anyhow!("Failed to load templates: {err}"))?;
        let context = tera::Context::from_serialize(template)?;
        tera.render(T::NAME, &context).map_err(Into::into)
    }
}

#[cfg(test)]
mod tests {
    use portfolio_templates_contracts::{ContactMessageHtmlTemplate, ContactMessageTextTemplate};
    use pretty_assertions::assert_eq;

    use super::*;

    #[test]
    fn contact_message_html() {
        // Arrange
        let sut = TemplateServiceImpl {
            state: Default::default(),
        };

        // Act
        let result = sut
            .render(&ContactMessageHtmlTemplate {
                name: "Jane Doe".into(),
                email: "jane@example.com".into(),
                message: "Hello\nWorld".into(),
            })
            .unwrap();

        // Assert
        assert!(result.contains("<strong>Name:</strong> Jane Doe</p>"));
        assert!(result.contains("<strong>Email:</strong> jane@example.com</p>"));
        assert!(result.contains("white-space: pre-wrap;\">Hello\nWorld</p>"));
        assert!(result.contains("This message was sent from the contact form"));
    }

    #[test]
    fn contact_message_html_is_escaped() {
        // Arrange
        let sut = TemplateServiceImpl {
            state: Default::default(),
        };

        // Act
        let result = sut
            .render(&ContactMessageHtmlTemplate {
                name: "<b>Jane</b>".into(),
                email: "jane@example.com".into(),
                message: "<script>alert(1)</script>".into(),
            })
            .unwrap();

        // Assert
        assert!(!result.contains("<script>"));
        assert!(result.contains("&lt;script&gt;"));
        assert!(result.contains("&lt;b&gt;Jane"));
    }

    #[test]
    fn contact_message_text() {
        // Arrange
        let sut = TemplateServiceImpl {
            state: Default::default(),
        };

        // Act
        let result = sut
            .render(&ContactMessageTextTemplate {
                name: "Jane Doe".into(),
                email: "jane@example.com".into(),
                message: "Hello <World>\n\nBye & thanks".into(),
            })
            .unwrap();

        // Assert
        assert_eq!(
            result.trim_end(),
            "New Contact Form Message\n\nName: Jane Doe\nEmail: jane@example.com\n\nMessage:\nHello \
             <World>\n\nBye & thanks\n\n---\nThis message was sent from the contact form on your \
             portfolio website."
        );
    }
}
