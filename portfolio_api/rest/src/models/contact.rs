use portfolio_models::{contact::ContactMessageReceipt, email::EmailId};
use serde::{Deserialize, Serialize};

/// Request body of the contact form.
///
/// All fields are optional here, so that missing fields can be reported with
/// a specific error instead of a generic deserialization failure.
#[derive(Debug, Clone, Deserialize)]
pub struct ApiContactMessage {
    pub name: Option<String>,
    pub email: Option<String>,
    pub message: Option<String>,
}

#[derive(Debug, Clone, Serialize)]
pub struct ApiContactReceipt {
    pub success: bool,
    pub message: &'static str,
    pub id: EmailId,
}

impl From<ContactMessageReceipt> for ApiContactReceipt {
    fn from(value: ContactMessageReceipt) -> Self {
        Self {
            success: true,
            message: "Email sent successfully",
            id: value.id,
        }
    }
}
