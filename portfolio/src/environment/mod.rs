use portfolio_api_rest::RestServerConfig;
use portfolio_client::ContactFormConfig;
use portfolio_config::Config;
use portfolio_core_contact_impl::ContactFeatureConfig;
use portfolio_core_health_impl::HealthFeatureConfig;
use portfolio_di::provider;
use portfolio_email_impl::EmailServiceConfig;
use portfolio_extern_impl::contact::ContactRelayApiServiceConfig;

pub mod types;

provider! {
    /// The default provider, capable of providing all the dependencies
    pub Provider {
        // API
        rest_server_config: RestServerConfig,

        // Email
        email_service_config: EmailServiceConfig,

        // Extern
        contact_relay_api_service_config: ContactRelayApiServiceConfig,

        // Core
        contact_feature_config: ContactFeatureConfig,
        health_feature_config: HealthFeatureConfig,

        // Client
        contact_form_config: ContactFormConfig,
    }
}

impl Provider {
    pub fn new(config: &Config) -> Self {
        // API
        let rest_server_config = RestServerConfig {
            allowed_origins: config.http.allowed_origins.clone().into(),
        };

        // Email
        let email_service_config = EmailServiceConfig::new(
            config.email.api_url.clone(),
            &config.email.api_key,
            config.email.from.clone(),
        );

        // Extern
        let contact_relay_api_service_config =
            ContactRelayApiServiceConfig::new(config.client.relay_url.clone());

        // Core
        let contact_feature_config = ContactFeatureConfig {
            recipient: config.contact.recipient.clone().into(),
        };

        let health_feature_config = HealthFeatureConfig {
            cache_ttl: config.health.cache_ttl.into(),
        };

        // Client
        let contact_form_config = ContactFormConfig {
            status_reset_delay: config.client.status_reset_delay.into(),
        };

        Self {
            _cache: Default::default(),

            // API
            rest_server_config,

            // Email
            email_service_config,

            // Extern
            contact_relay_api_service_config,

            // Core
            contact_feature_config,
            health_feature_config,

            // Client
            contact_form_config,
        }
    }
}
