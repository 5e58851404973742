//! Seeding operations for users, wallets and mobile-money wallets.
//!
//! Each operation is a single store round-trip (two for the batch, per
//! user). Failures surface as [`StoreError`] and stop the run; records
//! already written are left in place.

use std::fmt;
use std::sync::Arc;

use futures::TryStreamExt;
use mongodb::bson::{DateTime, oid::ObjectId};
use rust_decimal::Decimal;
use tracing::{debug, info};

use crate::models::{KycStatus, MobileMoneyWallet, Provider, User, UserRef, Wallet};
use crate::store::{Ensured, SeedStore, StoreError};

/// Profile fields for a seeded user. `email` is the natural key.
#[derive(Debug, Clone, PartialEq)]
pub struct UserProfile {
    pub email: String,
    pub password_hash: String,
    pub first_name: String,
    pub last_name: String,
    pub phone_number: Option<String>,
    pub pin: Option<String>,
    pub payment_method: Option<String>,
    pub is_verified: bool,
    pub kyc_status: KycStatus,
}

impl UserProfile {
    #[must_use]
    pub fn with_email(mut self, email: impl Into<String>) -> Self {
        self.email = email.into();
        self
    }

    fn into_user(self, now: DateTime) -> User {
        User {
            id: None,
            email: self.email,
            password: self.password_hash,
            first_name: self.first_name,
            last_name: self.last_name,
            phone_number: self.phone_number,
            pin: self.pin,
            payment_method: self.payment_method,
            is_verified: self.is_verified,
            kyc_status: self.kyc_status,
            created_at: now,
            updated_at: now,
        }
    }
}

#[derive(Debug, Clone, PartialEq)]
pub struct WalletDefaults {
    pub balance: Decimal,
    pub currency: String,
}

#[derive(Debug, Clone, PartialEq)]
pub struct MobileMoneyDefaults {
    pub provider: Provider,
    pub phone_number: String,
    pub balance: Decimal,
    pub is_active: bool,
}

#[derive(Debug, Clone, PartialEq)]
pub struct WalletSeedDefaults {
    pub wallet: WalletDefaults,
    pub mobile_money: MobileMoneyDefaults,
}

/// A record created during a seeding run.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum SeedEvent {
    UserSeeded { email: String, id: ObjectId },
    WalletCreated { email: String, id: ObjectId },
    MobileWalletCreated { email: String, id: ObjectId },
}

impl fmt::Display for SeedEvent {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            SeedEvent::UserSeeded { email, id } => {
                write!(f, "User {email} created with ID: {id}")
            }
            SeedEvent::WalletCreated { email, .. } => {
                write!(f, "Created wallet for user: {email}")
            }
            SeedEvent::MobileWalletCreated { email, .. } => {
                write!(f, "Created mobile wallet for user: {email}")
            }
        }
    }
}

/// Summary of a wallet batch.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct BatchReport {
    pub users_visited: usize,
    pub events: Vec<SeedEvent>,
    pub wallets_skipped: usize,
    pub mobile_wallets_skipped: usize,
}

impl BatchReport {
    pub fn wallets_created(&self) -> usize {
        self.events
            .iter()
            .filter(|e| matches!(e, SeedEvent::WalletCreated { .. }))
            .count()
    }

    pub fn mobile_wallets_created(&self) -> usize {
        self.events
            .iter()
            .filter(|e| matches!(e, SeedEvent::MobileWalletCreated { .. }))
            .count()
    }
}

#[derive(Clone)]
pub struct Seeder<S> {
    store: Arc<S>,
}

impl<S> Seeder<S> {
    pub fn new(store: Arc<S>) -> Self {
        Self { store }
    }
}

impl<S> Seeder<S>
where
    S: SeedStore,
{
    /// Replace (or create) the user keyed by `profile.email`.
    ///
    /// Reseeding an existing email keeps its id, so wallets that reference
    /// it stay attached.
    pub async fn create_verified_user(&self, profile: UserProfile) -> Result<ObjectId, StoreError> {
        let email = profile.email.clone();
        let id = self
            .store
            .replace_user(profile.into_user(DateTime::now()))
            .await?;
        info!(email = %email, user_id = %id, "user seeded");
        Ok(id)
    }

    /// Whether a user with `email` is present.
    pub async fn verify_user(&self, email: &str) -> Result<bool, StoreError> {
        let found = self.store.find_user_by_email(email).await?;
        debug!(email, found = found.is_some(), "user verification");
        Ok(found.is_some())
    }

    pub async fn ensure_wallet_for_user(
        &self,
        user_id: ObjectId,
        defaults: &WalletDefaults,
    ) -> Result<Ensured, StoreError> {
        let now = DateTime::now();
        self.store
            .ensure_wallet(Wallet {
                id: None,
                user_id,
                balance: defaults.balance,
                currency: defaults.currency.clone(),
                created_at: now,
                updated_at: now,
            })
            .await
    }

    pub async fn ensure_mobile_money_wallet_for_user(
        &self,
        user_id: ObjectId,
        defaults: &MobileMoneyDefaults,
    ) -> Result<Ensured, StoreError> {
        let now = DateTime::now();
        self.store
            .ensure_mobile_money_wallet(MobileMoneyWallet {
                id: None,
                user_id,
                provider: defaults.provider,
                phone_number: defaults.phone_number.clone(),
                balance: defaults.balance,
                is_active: defaults.is_active,
                created_at: now,
                updated_at: now,
            })
            .await
    }

    /// Give every user a wallet and a mobile-money wallet if they lack one.
    pub async fn batch_seed_wallets(
        &self,
        defaults: &WalletSeedDefaults,
    ) -> Result<BatchReport, StoreError> {
        self.batch_seed_wallets_with(defaults, |_| {}).await
    }

    /// Like [`Seeder::batch_seed_wallets`], calling `on_event` as each
    /// record is created so progress survives an aborted run.
    pub async fn batch_seed_wallets_with<F>(
        &self,
        defaults: &WalletSeedDefaults,
        mut on_event: F,
    ) -> Result<BatchReport, StoreError>
    where
        F: FnMut(&SeedEvent),
    {
        let mut users = self.store.list_users().await?;
        info!("seeding wallets");

        let mut report = BatchReport::default();
        while let Some(UserRef { id, email }) = users.try_next().await? {
            let email = email.unwrap_or_default();
            report.users_visited += 1;

            match self.ensure_wallet_for_user(id, &defaults.wallet).await? {
                Ensured::Created(wallet_id) => {
                    info!(email = %email, wallet_id = %wallet_id, "wallet created");
                    let event = SeedEvent::WalletCreated {
                        email: email.clone(),
                        id: wallet_id,
                    };
                    on_event(&event);
                    report.events.push(event);
                }
                Ensured::Existing(_) => report.wallets_skipped += 1,
            }

            match self
                .ensure_mobile_money_wallet_for_user(id, &defaults.mobile_money)
                .await?
            {
                Ensured::Created(wallet_id) => {
                    info!(email = %email, wallet_id = %wallet_id, "mobile money wallet created");
                    let event = SeedEvent::MobileWalletCreated {
                        email,
                        id: wallet_id,
                    };
                    on_event(&event);
                    report.events.push(event);
                }
                Ensured::Existing(_) => report.mobile_wallets_skipped += 1,
            }
        }

        info!(
            users = report.users_visited,
            wallets = report.wallets_created(),
            mobile_wallets = report.mobile_wallets_created(),
            "wallet seeding finished"
        );
        Ok(report)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::fixtures;
    use crate::store::MemoryStore;
    use rstest::{fixture, rstest};

    #[fixture]
    fn store() -> Arc<MemoryStore> {
        Arc::new(MemoryStore::new())
    }

    fn seeded_user(email: &str) -> User {
        fixtures::test_user()
            .with_email(email)
            .into_user(DateTime::now())
    }

    #[rstest]
    #[tokio::test]
    async fn reseeding_same_email_keeps_one_user(store: Arc<MemoryStore>) {
        let seeder = Seeder::new(store.clone());

        let first = seeder
            .create_verified_user(fixtures::test_user())
            .await
            .expect("first seed");
        let second = seeder
            .create_verified_user(fixtures::test_user())
            .await
            .expect("second seed");

        let users = store.users();
        assert_eq!(users.len(), 1);
        assert_eq!(first, second);
        assert_eq!(users[0].email, fixtures::TEST_USER_EMAIL);
    }

    #[rstest]
    #[tokio::test]
    async fn empty_store_gets_one_verified_user_and_no_wallets(store: Arc<MemoryStore>) {
        let seeder = Seeder::new(store.clone());

        let report = seeder
            .batch_seed_wallets(&fixtures::wallet_defaults())
            .await
            .expect("batch");
        assert_eq!(report, BatchReport::default());

        seeder
            .create_verified_user(fixtures::test_user())
            .await
            .expect("seed");
        let users = store.users();
        assert_eq!(users.len(), 1);
        assert!(users[0].is_verified);
        assert!(store.wallets().is_empty());
    }

    #[rstest]
    #[tokio::test]
    async fn user_without_wallets_gets_default_wallets(store: Arc<MemoryStore>) {
        let user_id = store.insert_user(seeded_user("a@example.com"));
        let seeder = Seeder::new(store.clone());

        let report = seeder
            .batch_seed_wallets(&fixtures::wallet_defaults())
            .await
            .expect("batch");

        assert_eq!(report.wallets_created(), 1);
        assert_eq!(report.mobile_wallets_created(), 1);

        let wallets = store.wallets();
        assert_eq!(wallets.len(), 1);
        assert_eq!(wallets[0].user_id, user_id);
        assert_eq!(wallets[0].balance, Decimal::new(254050, 2));
        assert_eq!(wallets[0].currency, "GHS");

        let mobile = store.mobile_money_wallets();
        assert_eq!(mobile.len(), 1);
        assert_eq!(mobile[0].provider, Provider::Mtn);
        assert_eq!(mobile[0].balance, Decimal::new(85000, 2));
        assert!(mobile[0].is_active);
    }

    #[rstest]
    #[tokio::test]
    async fn existing_wallet_is_left_untouched(store: Arc<MemoryStore>) {
        let user_id = store.insert_user(seeded_user("a@example.com"));
        let wallet_id = store.insert_wallet(Wallet {
            id: None,
            user_id,
            balance: Decimal::new(10, 0),
            currency: "USD".to_owned(),
            created_at: DateTime::now(),
            updated_at: DateTime::now(),
        });
        let seeder = Seeder::new(store.clone());

        let report = seeder
            .batch_seed_wallets(&fixtures::wallet_defaults())
            .await
            .expect("batch");

        assert_eq!(report.wallets_created(), 0);
        assert_eq!(report.wallets_skipped, 1);
        let wallets = store.wallets();
        assert_eq!(wallets.len(), 1);
        assert_eq!(wallets[0].id, Some(wallet_id));
        assert_eq!(wallets[0].balance, Decimal::new(10, 0));
    }

    #[rstest]
    #[tokio::test]
    async fn second_batch_creates_nothing(store: Arc<MemoryStore>) {
        store.insert_user(seeded_user("a@example.com"));
        store.insert_user(seeded_user("b@example.com"));
        let seeder = Seeder::new(store.clone());
        let defaults = fixtures::wallet_defaults();

        let first = seeder.batch_seed_wallets(&defaults).await.expect("first");
        let second = seeder.batch_seed_wallets(&defaults).await.expect("second");

        assert_eq!(first.events.len(), 4);
        assert!(second.events.is_empty());
        assert_eq!(second.users_visited, 2);
        assert_eq!(second.wallets_skipped, 2);
        assert_eq!(second.mobile_wallets_skipped, 2);
        assert_eq!(store.wallets().len(), 2);
        assert_eq!(store.mobile_money_wallets().len(), 2);
    }

    #[rstest]
    #[tokio::test]
    async fn failure_mid_batch_keeps_earlier_records(store: Arc<MemoryStore>) {
        let first = store.insert_user(seeded_user("a@example.com"));
        let second = store.insert_user(seeded_user("b@example.com"));
        store.insert_user(seeded_user("c@example.com"));
        store.fail_mobile_money_for(second);
        let seeder = Seeder::new(store.clone());

        let mut seen = Vec::new();
        let error = seeder
            .batch_seed_wallets_with(&fixtures::wallet_defaults(), |event| {
                seen.push(event.to_string());
            })
            .await
            .expect_err("store failure propagates");

        assert!(error.is_retryable());
        assert_eq!(
            seen,
            vec![
                "Created wallet for user: a@example.com",
                "Created mobile wallet for user: a@example.com",
                "Created wallet for user: b@example.com",
            ]
        );
        assert_eq!(store.wallets().len(), 2);
        let mobile = store.mobile_money_wallets();
        assert_eq!(mobile.len(), 1);
        assert_eq!(mobile[0].user_id, first);
    }

    #[rstest]
    #[tokio::test]
    async fn verify_reports_presence(store: Arc<MemoryStore>) {
        let seeder = Seeder::new(store.clone());
        assert!(!seeder
            .verify_user(fixtures::STELLAR_TEST_USER_EMAIL)
            .await
            .expect("lookup"));

        seeder
            .create_verified_user(fixtures::stellar_test_user())
            .await
            .expect("seed");

        assert!(seeder
            .verify_user(fixtures::STELLAR_TEST_USER_EMAIL)
            .await
            .expect("lookup"));
    }

    #[rstest]
    fn event_lines_read_like_status_output() {
        let id = ObjectId::new();
        let event = SeedEvent::UserSeeded {
            email: "test@example.com".to_owned(),
            id,
        };
        assert_eq!(
            event.to_string(),
            format!("User test@example.com created with ID: {id}")
        );
    }
}
