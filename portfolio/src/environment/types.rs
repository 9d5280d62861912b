use portfolio_client::ContactFormImpl;
use portfolio_core_contact_impl::ContactFeatureServiceImpl;
use portfolio_core_health_impl::HealthFeatureServiceImpl;
use portfolio_email_impl::EmailServiceImpl;
use portfolio_extern_impl::contact::ContactRelayApiServiceImpl;
use portfolio_templates_impl::TemplateServiceImpl;

// API
pub type RestServer = portfolio_api_rest::RestServer<HealthFeature, ContactFeature>;

// Email
pub type Email = EmailServiceImpl;

// Template
pub type Template = TemplateServiceImpl;

// Extern
pub type ContactRelayApi = ContactRelayApiServiceImpl;

// Core
pub type HealthFeature = HealthFeatureServiceImpl<Email>;
pub type ContactFeature = ContactFeatureServiceImpl<Email, Template>;

// Client
pub type ContactForm = ContactFormImpl<ContactRelayApi>;
