//! Seeding for the HealthyPay MongoDB test environment.
//!
//! [`Seeder`] recreates verified users keyed by email and gives every user a
//! wallet and a mobile money wallet when they lack one. Storage goes through
//! the [`SeedStore`] port; [`MongoStore`] is the production adapter.

pub mod config;
pub mod db;
pub mod fixtures;
pub mod logging;
pub mod models;
pub mod seeder;
pub mod store;

pub use seeder::{BatchReport, SeedEvent, Seeder, UserProfile, WalletSeedDefaults};
pub use store::{Ensured, MongoStore, SeedStore, StoreError};
