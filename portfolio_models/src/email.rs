use nutype::nutype;

/// Identifier assigned to a message by the email provider.
#[nutype(derive(
    Debug,
    Clone,
    PartialEq,
    Eq,
    Hash,
    From,
    Deref,
    Display,
    Serialize,
    Deserialize
))]
pub struct EmailId(String);
