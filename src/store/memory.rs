//! In-memory [`SeedStore`] used by tests.
//!
//! Mirrors the MongoDB adapter's semantics: users are keyed by email and
//! keep their id across replacements; wallets are insert-if-absent keyed by
//! `user_id`. Iteration follows insertion order.

use std::collections::HashSet;
use std::sync::{Mutex, MutexGuard, PoisonError};

use async_trait::async_trait;
use futures::StreamExt;
use futures::stream;
use mongodb::bson::oid::ObjectId;

use super::{Ensured, MOBILE_MONEY_WALLETS, SeedStore, StoreError, UserStream};
use crate::models::{MobileMoneyWallet, User, UserRef, Wallet};

#[derive(Default)]
struct State {
    users: Vec<User>,
    wallets: Vec<Wallet>,
    mobile_money_wallets: Vec<MobileMoneyWallet>,
    failing_mobile_money_users: HashSet<ObjectId>,
}

#[derive(Default)]
pub struct MemoryStore {
    state: Mutex<State>,
}

impl MemoryStore {
    pub fn new() -> Self {
        Self::default()
    }

    fn lock(&self) -> MutexGuard<'_, State> {
        self.state.lock().unwrap_or_else(PoisonError::into_inner)
    }

    /// Insert a user as another tool would, assigning a fresh id.
    pub fn insert_user(&self, mut user: User) -> ObjectId {
        let id = ObjectId::new();
        user.id = Some(id);
        self.lock().users.push(user);
        id
    }

    /// Insert a wallet directly, bypassing the existence check.
    pub fn insert_wallet(&self, mut wallet: Wallet) -> ObjectId {
        let id = ObjectId::new();
        wallet.id = Some(id);
        self.lock().wallets.push(wallet);
        id
    }

    /// Make every mobile-money write for `user_id` fail with a connection
    /// error.
    pub fn fail_mobile_money_for(&self, user_id: ObjectId) {
        self.lock().failing_mobile_money_users.insert(user_id);
    }

    pub fn users(&self) -> Vec<User> {
        self.lock().users.clone()
    }

    pub fn wallets(&self) -> Vec<Wallet> {
        self.lock().wallets.clone()
    }

    pub fn mobile_money_wallets(&self) -> Vec<MobileMoneyWallet> {
        self.lock().mobile_money_wallets.clone()
    }
}

#[async_trait]
impl SeedStore for MemoryStore {
    async fn replace_user(&self, mut user: User) -> Result<ObjectId, StoreError> {
        let mut state = self.lock();
        if let Some(existing) = state.users.iter_mut().find(|u| u.email == user.email) {
            let id = existing.id.unwrap_or_else(ObjectId::new);
            user.id = Some(id);
            *existing = user;
            return Ok(id);
        }
        let id = ObjectId::new();
        user.id = Some(id);
        state.users.push(user);
        Ok(id)
    }

    async fn find_user_by_email(&self, email: &str) -> Result<Option<UserRef>, StoreError> {
        Ok(self
            .lock()
            .users
            .iter()
            .find(|u| u.email == email)
            .and_then(User::as_ref_view))
    }

    async fn list_users(&self) -> Result<UserStream, StoreError> {
        let users: Vec<UserRef> = self
            .lock()
            .users
            .iter()
            .filter_map(User::as_ref_view)
            .collect();
        Ok(stream::iter(users.into_iter().map(Ok)).boxed())
    }

    async fn ensure_wallet(&self, mut wallet: Wallet) -> Result<Ensured, StoreError> {
        let mut state = self.lock();
        if let Some(id) = state
            .wallets
            .iter()
            .find(|w| w.user_id == wallet.user_id)
            .and_then(|w| w.id)
        {
            return Ok(Ensured::Existing(id));
        }
        let id = ObjectId::new();
        wallet.id = Some(id);
        state.wallets.push(wallet);
        Ok(Ensured::Created(id))
    }

    async fn ensure_mobile_money_wallet(
        &self,
        mut wallet: MobileMoneyWallet,
    ) -> Result<Ensured, StoreError> {
        let mut state = self.lock();
        if state.failing_mobile_money_users.contains(&wallet.user_id) {
            return Err(StoreError::Connection {
                message: format!("{MOBILE_MONEY_WALLETS}: connection reset"),
            });
        }
        if let Some(id) = state
            .mobile_money_wallets
            .iter()
            .find(|w| w.user_id == wallet.user_id)
            .and_then(|w| w.id)
        {
            return Ok(Ensured::Existing(id));
        }
        let id = ObjectId::new();
        wallet.id = Some(id);
        state.mobile_money_wallets.push(wallet);
        Ok(Ensured::Created(id))
    }
}
