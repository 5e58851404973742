//! Command-line and environment configuration.

use clap::{Args, Parser, Subcommand};
use rust_decimal::Decimal;

use crate::fixtures::{DEFAULT_CURRENCY, DEFAULT_MOBILE_PHONE, PASSWORD123_HASH};
use crate::models::{KycStatus, Provider};
use crate::seeder::{MobileMoneyDefaults, UserProfile, WalletDefaults, WalletSeedDefaults};

pub const DEFAULT_MONGO_URI: &str = "mongodb://localhost:27017/healthypay";
pub const DEFAULT_CONNECT_TIMEOUT_SECS: u64 = 10;

#[derive(Debug, Parser)]
#[command(
    name = "healthypay-seed",
    version,
    about = "Seed a HealthyPay test database with users and wallets"
)]
pub struct Cli {
    #[command(flatten)]
    pub database: DatabaseSettings,

    /// Emit logs as JSON lines on stderr.
    #[arg(long, env = "SEED_LOG_JSON", global = true)]
    pub log_json: bool,

    #[command(subcommand)]
    pub command: Command,
}

#[derive(Debug, Clone, PartialEq, Eq, Args)]
pub struct DatabaseSettings {
    /// MongoDB connection string; its path names the database.
    #[arg(long, env = "MONGO_URI", default_value = DEFAULT_MONGO_URI, global = true)]
    pub mongo_uri: String,

    /// Database to seed, overriding the one named in the URI.
    #[arg(long = "database", env = "MONGO_DATABASE", global = true)]
    pub database: Option<String>,

    #[arg(
        long,
        env = "MONGO_CONNECT_TIMEOUT_SECS",
        default_value_t = DEFAULT_CONNECT_TIMEOUT_SECS,
        global = true
    )]
    pub connect_timeout_secs: u64,
}

#[derive(Debug, Subcommand)]
pub enum Command {
    /// Recreate test@example.com as a verified user.
    TestUser,
    /// Recreate stellar_test@example.com (KYC approved) and verify it.
    StellarTestUser,
    /// Recreate an arbitrary verified user.
    User(UserArgs),
    /// Create missing wallets and mobile money wallets for every user.
    Wallets(WalletArgs),
    /// Seed both preset users, then wallets.
    All(WalletArgs),
}

#[derive(Debug, Clone, Args)]
pub struct UserArgs {
    #[arg(long)]
    pub email: String,

    #[arg(long, default_value = "Test")]
    pub first_name: String,

    #[arg(long, default_value = "User")]
    pub last_name: String,

    #[arg(long)]
    pub phone: Option<String>,

    #[arg(long, default_value = "pending")]
    pub kyc_status: KycStatus,

    /// Pre-hashed password stored verbatim (defaults to `password123`).
    #[arg(long, default_value = PASSWORD123_HASH)]
    pub password_hash: String,

    #[arg(long)]
    pub unverified: bool,
}

impl UserArgs {
    pub fn into_profile(self) -> UserProfile {
        UserProfile {
            email: self.email,
            password_hash: self.password_hash,
            first_name: self.first_name,
            last_name: self.last_name,
            phone_number: self.phone,
            pin: None,
            payment_method: None,
            is_verified: !self.unverified,
            kyc_status: self.kyc_status,
        }
    }
}

#[derive(Debug, Clone, Args)]
pub struct WalletArgs {
    #[arg(long, default_value = "2540.50")]
    pub balance: Decimal,

    #[arg(long, default_value = DEFAULT_CURRENCY)]
    pub currency: String,

    #[arg(long, default_value = "MTN")]
    pub provider: Provider,

    #[arg(long, default_value = DEFAULT_MOBILE_PHONE)]
    pub mobile_phone: String,

    #[arg(long, default_value = "850.00")]
    pub mobile_balance: Decimal,

    /// Create mobile money wallets as inactive.
    #[arg(long)]
    pub inactive: bool,
}

impl WalletArgs {
    pub fn into_defaults(self) -> WalletSeedDefaults {
        WalletSeedDefaults {
            wallet: WalletDefaults {
                balance: self.balance,
                currency: self.currency,
            },
            mobile_money: MobileMoneyDefaults {
                provider: self.provider,
                phone_number: self.mobile_phone,
                balance: self.mobile_balance,
                is_active: !self.inactive,
            },
        }
    }
}
