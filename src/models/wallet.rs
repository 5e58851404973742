use mongodb::bson::{DateTime, oid::ObjectId};
use rust_decimal::Decimal;
use serde::{Deserialize, Serialize};
use std::fmt;
use std::str::FromStr;

/// Fiat wallet, one per user.
///
/// `balance` is written as a BSON double because the payments backend
/// decodes wallet balances as 64-bit floats.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct Wallet {
    #[serde(rename = "_id", skip_serializing_if = "Option::is_none")]
    pub id: Option<ObjectId>,
    pub user_id: ObjectId,
    #[serde(with = "rust_decimal::serde::float")]
    pub balance: Decimal,
    pub currency: String,
    pub created_at: DateTime,
    pub updated_at: DateTime,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub enum Provider {
    #[serde(rename = "MTN")]
    Mtn,
    Vodafone,
    AirtelTigo,
}

impl Provider {
    pub fn as_str(self) -> &'static str {
        match self {
            Provider::Mtn => "MTN",
            Provider::Vodafone => "Vodafone",
            Provider::AirtelTigo => "AirtelTigo",
        }
    }
}

impl fmt::Display for Provider {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

impl FromStr for Provider {
    type Err = String;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.to_ascii_lowercase().as_str() {
            "mtn" => Ok(Provider::Mtn),
            "vodafone" => Ok(Provider::Vodafone),
            "airteltigo" => Ok(Provider::AirtelTigo),
            other => Err(format!("unknown mobile money provider: {other}")),
        }
    }
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct MobileMoneyWallet {
    #[serde(rename = "_id", skip_serializing_if = "Option::is_none")]
    pub id: Option<ObjectId>,
    pub user_id: ObjectId,
    pub provider: Provider,
    pub phone_number: String,
    #[serde(with = "rust_decimal::serde::float")]
    pub balance: Decimal,
    pub is_active: bool,
    pub created_at: DateTime,
    pub updated_at: DateTime,
}

#[cfg(test)]
mod tests {
    use super::*;
    use mongodb::bson::{self, Bson};
    use rstest::rstest;

    #[rstest]
    #[case("MTN", Provider::Mtn)]
    #[case("vodafone", Provider::Vodafone)]
    #[case("AirtelTigo", Provider::AirtelTigo)]
    fn provider_parses_case_insensitively(#[case] raw: &str, #[case] expected: Provider) {
        assert_eq!(raw.parse::<Provider>(), Ok(expected));
    }

    #[rstest]
    fn unknown_provider_is_rejected() {
        assert!("MPESA".parse::<Provider>().is_err());
    }

    #[rstest]
    fn mobile_wallet_document_matches_backend_shape() {
        let wallet = MobileMoneyWallet {
            id: None,
            user_id: ObjectId::new(),
            provider: Provider::Mtn,
            phone_number: "0244123456".to_owned(),
            balance: Decimal::new(85000, 2),
            is_active: true,
            created_at: DateTime::now(),
            updated_at: DateTime::now(),
        };

        let document = bson::to_document(&wallet).expect("wallet serializes");
        assert!(!document.contains_key("_id"));
        assert_eq!(document.get("provider"), Some(&Bson::String("MTN".to_owned())));
        assert_eq!(document.get("balance"), Some(&Bson::Double(850.0)));
        assert_eq!(document.get("is_active"), Some(&Bson::Boolean(true)));
    }
}
