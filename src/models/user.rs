use mongodb::bson::{DateTime, oid::ObjectId};
use serde::{Deserialize, Serialize};
use std::fmt;
use std::str::FromStr;

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum KycStatus {
    Pending,
    Approved,
    Completed,
}

impl KycStatus {
    pub fn as_str(self) -> &'static str {
        match self {
            KycStatus::Pending => "pending",
            KycStatus::Approved => "approved",
            KycStatus::Completed => "completed",
        }
    }
}

impl FromStr for KycStatus {
    type Err = String;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.to_ascii_lowercase().as_str() {
            "pending" => Ok(KycStatus::Pending),
            "approved" => Ok(KycStatus::Approved),
            "completed" => Ok(KycStatus::Completed),
            other => Err(format!("unknown KYC status: {other}")),
        }
    }
}

impl fmt::Display for KycStatus {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct User {
    #[serde(rename = "_id", skip_serializing_if = "Option::is_none")]
    pub id: Option<ObjectId>,
    pub email: String,
    /// Pre-hashed (bcrypt) password, stored as-is.
    pub password: String,
    pub first_name: String,
    pub last_name: String,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub phone_number: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub pin: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub payment_method: Option<String>,
    pub is_verified: bool,
    pub kyc_status: KycStatus,
    pub created_at: DateTime,
    pub updated_at: DateTime,
}

/// Minimal view of a user document. Only `_id` is required, so users
/// written by other tools with a different shape can still be visited.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct UserRef {
    #[serde(rename = "_id")]
    pub id: ObjectId,
    #[serde(default)]
    pub email: Option<String>,
}

impl UserRef {
    /// Email for status lines; empty when the document has none.
    pub fn email_or_empty(&self) -> &str {
        self.email.as_deref().unwrap_or_default()
    }
}

impl User {
    /// Projection of a stored user; `None` until the store assigned an id.
    pub fn as_ref_view(&self) -> Option<UserRef> {
        self.id.map(|id| UserRef {
            id,
            email: Some(self.email.clone()),
        })
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use mongodb::bson::{self, Bson, doc};
    use rstest::rstest;

    fn user(phone_number: Option<&str>) -> User {
        User {
            id: None,
            email: "test@example.com".to_owned(),
            password: "hash".to_owned(),
            first_name: "Test".to_owned(),
            last_name: "User".to_owned(),
            phone_number: phone_number.map(str::to_owned),
            pin: Some(String::new()),
            payment_method: None,
            is_verified: true,
            kyc_status: KycStatus::Pending,
            created_at: DateTime::now(),
            updated_at: DateTime::now(),
        }
    }

    #[rstest]
    fn absent_optional_fields_are_omitted() {
        let document = bson::to_document(&user(None)).expect("user serializes");

        assert!(!document.contains_key("_id"));
        assert!(!document.contains_key("phone_number"));
        assert!(!document.contains_key("payment_method"));
        assert_eq!(document.get("pin"), Some(&Bson::String(String::new())));
        assert_eq!(document.get("kyc_status"), Some(&Bson::String("pending".to_owned())));
    }

    #[rstest]
    fn user_ref_tolerates_foreign_documents() {
        let id = ObjectId::new();
        let parsed: UserRef = bson::from_document(doc! { "_id": id, "name": "legacy" })
            .expect("projection decodes");

        assert_eq!(parsed.id, id);
        assert!(parsed.email.is_none());
        assert_eq!(parsed.email_or_empty(), "");
    }

    #[rstest]
    fn user_ref_accepts_null_email() {
        let id = ObjectId::new();
        let parsed: UserRef = bson::from_document(doc! { "_id": id, "email": Bson::Null })
            .expect("null email decodes");

        assert_eq!(parsed.id, id);
        assert!(parsed.email.is_none());
    }

    #[rstest]
    #[case("pending", KycStatus::Pending)]
    #[case("APPROVED", KycStatus::Approved)]
    #[case("completed", KycStatus::Completed)]
    fn kyc_status_parses(#[case] raw: &str, #[case] expected: KycStatus) {
        assert_eq!(raw.parse::<KycStatus>(), Ok(expected));
    }

    #[rstest]
    fn view_requires_assigned_id() {
        let mut stored = user(Some("+1234567890"));
        assert!(stored.as_ref_view().is_none());

        let id = ObjectId::new();
        stored.id = Some(id);
        let view = stored.as_ref_view().expect("id assigned");
        assert_eq!(view.id, id);
        assert_eq!(view.email_or_empty(), "test@example.com");
    }
}
