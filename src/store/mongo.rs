//! MongoDB adapter for [`SeedStore`].

use std::future;

use async_trait::async_trait;
use futures::{StreamExt, TryStreamExt};
use mongodb::bson::{self, Bson, Document, doc, oid::ObjectId};
use mongodb::error::{Error as MongoError, ErrorKind, WriteFailure};
use mongodb::options::{
    FindOneAndReplaceOptions, FindOneOptions, FindOptions, ReturnDocument, UpdateOptions,
};
use mongodb::{Collection, Database};
use serde::Serialize;
use tracing::{debug, warn};

use super::{Ensured, MOBILE_MONEY_WALLETS, SeedStore, StoreError, USERS, UserStream, WALLETS};
use crate::models::{MobileMoneyWallet, User, UserRef, Wallet};

const DUPLICATE_KEY: i32 = 11000;

pub struct MongoStore {
    db: Database,
}

impl MongoStore {
    pub fn new(db: Database) -> Self {
        Self { db }
    }

    fn users(&self) -> Collection<User> {
        self.db.collection(USERS)
    }

    fn user_documents(&self) -> Collection<Document> {
        self.db.collection(USERS)
    }

    async fn ensure_for_user<T: Serialize>(
        &self,
        collection: &'static str,
        user_id: ObjectId,
        record: &T,
    ) -> Result<Ensured, StoreError> {
        let handle: Collection<Document> = self.db.collection(collection);
        let update = set_on_insert(record)?;

        let filter = doc! { "user_id": user_id };
        let options = UpdateOptions::builder().upsert(true).build();
        let result = handle
            .update_one(filter.clone(), update, options)
            .await
            .map_err(|e| map_mongo_error(collection, e))?;

        if let Some(id) = result.upserted_id.as_ref().and_then(Bson::as_object_id) {
            debug!(collection, user_id = %user_id, id = %id, "inserted");
            return Ok(Ensured::Created(id));
        }

        let options = FindOneOptions::builder().projection(doc! { "_id": 1 }).build();
        let existing = handle
            .find_one(filter, options)
            .await
            .map_err(|e| map_mongo_error(collection, e))?
            .ok_or_else(|| StoreError::NotFound {
                collection,
                key: user_id.to_hex(),
            })?;
        let id = existing
            .get_object_id("_id")
            .map_err(|e| serialization(&e))?;
        debug!(collection, user_id = %user_id, id = %id, "already present");
        Ok(Ensured::Existing(id))
    }
}

#[async_trait]
impl SeedStore for MongoStore {
    async fn replace_user(&self, user: User) -> Result<ObjectId, StoreError> {
        let filter = doc! { "email": &user.email };
        let options = FindOneAndReplaceOptions::builder()
            .upsert(true)
            .return_document(ReturnDocument::After)
            .build();
        let stored = self
            .users()
            .find_one_and_replace(filter, &user, options)
            .await
            .map_err(|e| map_mongo_error(USERS, e))?;

        stored
            .and_then(|u| u.id)
            .ok_or_else(|| StoreError::NotFound {
                collection: USERS,
                key: user.email.clone(),
            })
    }

    async fn find_user_by_email(&self, email: &str) -> Result<Option<UserRef>, StoreError> {
        let options = FindOneOptions::builder()
            .projection(doc! { "_id": 1, "email": 1 })
            .build();
        let found = self
            .user_documents()
            .find_one(doc! { "email": email }, options)
            .await
            .map_err(|e| map_mongo_error(USERS, e))?;
        Ok(found.as_ref().and_then(user_ref_from_document))
    }

    async fn list_users(&self) -> Result<UserStream, StoreError> {
        let options = FindOptions::builder()
            .projection(doc! { "_id": 1, "email": 1 })
            .build();
        let cursor = self
            .user_documents()
            .find(None, options)
            .await
            .map_err(|e| map_mongo_error(USERS, e))?;
        Ok(cursor
            .map_err(|e| map_mongo_error(USERS, e))
            .try_filter_map(|document| future::ready(Ok(user_ref_from_document(&document))))
            .boxed())
    }

    async fn ensure_wallet(&self, wallet: Wallet) -> Result<Ensured, StoreError> {
        self.ensure_for_user(WALLETS, wallet.user_id, &wallet).await
    }

    async fn ensure_mobile_money_wallet(
        &self,
        wallet: MobileMoneyWallet,
    ) -> Result<Ensured, StoreError> {
        self.ensure_for_user(MOBILE_MONEY_WALLETS, wallet.user_id, &wallet)
            .await
    }
}

/// Project a raw user document. Users whose `_id` is not an ObjectId
/// cannot own wallets and are skipped; a missing or non-string email is
/// kept as `None`.
fn user_ref_from_document(document: &Document) -> Option<UserRef> {
    let Ok(id) = document.get_object_id("_id") else {
        warn!(id = ?document.get("_id"), "skipping user without an ObjectId _id");
        return None;
    };
    let email = document.get_str("email").ok().map(str::to_owned);
    Some(UserRef { id, email })
}

/// `$setOnInsert` update for an insert-if-absent keyed by `user_id`. The
/// key is left to the upsert filter and `_id` to the server.
fn set_on_insert<T: Serialize>(record: &T) -> Result<Document, StoreError> {
    let mut fields = bson::to_document(record).map_err(|e| serialization(&e))?;
    fields.remove("user_id");
    fields.remove("_id");
    Ok(doc! { "$setOnInsert": fields })
}

fn serialization(err: &dyn std::fmt::Display) -> StoreError {
    StoreError::Serialization {
        message: err.to_string(),
    }
}

/// Sort a driver error into connectivity, constraint, conversion or
/// generic query failures.
fn map_mongo_error(collection: &'static str, err: MongoError) -> StoreError {
    let message = err.to_string();
    match err.kind.as_ref() {
        ErrorKind::Io(_)
        | ErrorKind::ServerSelection { .. }
        | ErrorKind::DnsResolve { .. }
        | ErrorKind::ConnectionPoolCleared { .. }
        | ErrorKind::Authentication { .. } => StoreError::Connection { message },
        ErrorKind::Write(WriteFailure::WriteError(write)) if write.code == DUPLICATE_KEY => {
            StoreError::ConstraintViolation {
                collection,
                message,
            }
        }
        ErrorKind::Command(command) if command.code == DUPLICATE_KEY => {
            StoreError::ConstraintViolation {
                collection,
                message,
            }
        }
        ErrorKind::BsonSerialization(_) | ErrorKind::BsonDeserialization(_) => {
            StoreError::Serialization { message }
        }
        _ => StoreError::Query { message },
    }
}
