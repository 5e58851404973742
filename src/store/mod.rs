//! Persistence port for seeding.
//!
//! The seeder only talks to the document store through [`SeedStore`]. The
//! MongoDB adapter lives in [`mongo`]; an in-memory double is available in
//! tests and behind the `test-support` feature.

use async_trait::async_trait;
use futures::stream::BoxStream;
use mongodb::bson::oid::ObjectId;
use thiserror::Error;

use crate::models::{MobileMoneyWallet, User, UserRef, Wallet};

#[cfg(any(test, feature = "test-support"))]
pub mod memory;
pub mod mongo;

#[cfg(any(test, feature = "test-support"))]
pub use memory::MemoryStore;
pub use mongo::MongoStore;

pub const USERS: &str = "users";
pub const WALLETS: &str = "wallets";
pub const MOBILE_MONEY_WALLETS: &str = "mobile_money_wallets";

/// Single-pass stream of users produced by [`SeedStore::list_users`].
pub type UserStream = BoxStream<'static, Result<UserRef, StoreError>>;

/// Errors raised by store adapters.
#[derive(Debug, Clone, Error, PartialEq, Eq)]
pub enum StoreError {
    /// The store could not be reached or refused the session.
    #[error("store connection failed: {message}")]
    Connection { message: String },
    /// A unique index rejected the write.
    #[error("constraint violated in {collection}: {message}")]
    ConstraintViolation {
        collection: &'static str,
        message: String,
    },
    /// A document the operation depends on is missing.
    #[error("no document in {collection} for {key}")]
    NotFound {
        collection: &'static str,
        key: String,
    },
    /// A record could not be converted to or from BSON.
    #[error("bson conversion failed: {message}")]
    Serialization { message: String },
    /// Any other server-side failure.
    #[error("store query failed: {message}")]
    Query { message: String },
}

impl StoreError {
    /// Only connectivity failures are worth retrying; everything else
    /// reflects the data or the request.
    pub fn is_retryable(&self) -> bool {
        matches!(self, StoreError::Connection { .. })
    }
}

/// Outcome of an insert-if-absent.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Ensured {
    Created(ObjectId),
    Existing(ObjectId),
}

impl Ensured {
    pub fn id(self) -> ObjectId {
        match self {
            Ensured::Created(id) | Ensured::Existing(id) => id,
        }
    }

    pub fn was_created(self) -> bool {
        matches!(self, Ensured::Created(_))
    }
}

#[async_trait]
pub trait SeedStore: Send + Sync {
    /// Atomically replace the user with the same email, inserting it when
    /// none exists. Returns the stored document's id.
    async fn replace_user(&self, user: User) -> Result<ObjectId, StoreError>;

    async fn find_user_by_email(&self, email: &str) -> Result<Option<UserRef>, StoreError>;

    /// Stream every user in the store's natural order, one document at a
    /// time. Documents that cannot identify a user are skipped.
    async fn list_users(&self) -> Result<UserStream, StoreError>;

    /// Insert `wallet` unless a wallet already references its `user_id`.
    async fn ensure_wallet(&self, wallet: Wallet) -> Result<Ensured, StoreError>;

    /// Insert `wallet` unless a mobile-money wallet already references its
    /// `user_id`.
    async fn ensure_mobile_money_wallet(
        &self,
        wallet: MobileMoneyWallet,
    ) -> Result<Ensured, StoreError>;
}
