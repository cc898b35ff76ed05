use serde::Serialize;

/// A supporting organization listed on the website.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct Supporter {
    pub organization: String,
    pub contact: String,
    pub contact_from_us: String,
    pub status: String,
    pub website: Option<String>,
    /// Website to link to, only set when the domain passed validation.
    pub link: Option<String>,
}
