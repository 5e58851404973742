//! Named seed presets for the HealthyPay test environment.

use rust_decimal::Decimal;

use crate::models::{KycStatus, Provider};
use crate::seeder::{MobileMoneyDefaults, UserProfile, WalletDefaults, WalletSeedDefaults};

pub const TEST_USER_EMAIL: &str = "test@example.com";
pub const STELLAR_TEST_USER_EMAIL: &str = "stellar_test@example.com";

/// bcrypt hash of `password123`, accepted by the backend's login.
pub const PASSWORD123_HASH: &str = "$2a$10$92IXUNpkjO0rOQ5byMi.Ye4oKoEa3Ro9llC/.og/at2.uheWG/igi";

pub const DEFAULT_CURRENCY: &str = "GHS";
pub const DEFAULT_MOBILE_PHONE: &str = "0244123456";

/// Verified user with no PIN or payment method set.
pub fn test_user() -> UserProfile {
    UserProfile {
        email: TEST_USER_EMAIL.to_owned(),
        password_hash: PASSWORD123_HASH.to_owned(),
        first_name: "Test".to_owned(),
        last_name: "User".to_owned(),
        phone_number: None,
        pin: Some(String::new()),
        payment_method: Some(String::new()),
        is_verified: true,
        kyc_status: KycStatus::Pending,
    }
}

/// KYC-approved user for exercising Stellar flows.
pub fn stellar_test_user() -> UserProfile {
    UserProfile {
        email: STELLAR_TEST_USER_EMAIL.to_owned(),
        password_hash: PASSWORD123_HASH.to_owned(),
        first_name: "Stellar".to_owned(),
        last_name: "Test".to_owned(),
        phone_number: Some("+1234567890".to_owned()),
        pin: None,
        payment_method: None,
        is_verified: true,
        kyc_status: KycStatus::Approved,
    }
}

pub fn default_wallet_balance() -> Decimal {
    Decimal::new(254050, 2)
}

pub fn default_mobile_balance() -> Decimal {
    Decimal::new(85000, 2)
}

/// 2540.50 GHS wallet and an active MTN wallet holding 850.00.
pub fn wallet_defaults() -> WalletSeedDefaults {
    WalletSeedDefaults {
        wallet: WalletDefaults {
            balance: default_wallet_balance(),
            currency: DEFAULT_CURRENCY.to_owned(),
        },
        mobile_money: MobileMoneyDefaults {
            provider: Provider::Mtn,
            phone_number: DEFAULT_MOBILE_PHONE.to_owned(),
            balance: default_mobile_balance(),
            is_active: true,
        },
    }
}
