use std::sync::Arc;

use anyhow::{Context, Result};
use clap::Parser;

use healthypay_seeder::config::{Cli, Command};
use healthypay_seeder::db::connect_to_mongo;
use healthypay_seeder::logging::init_tracing;
use healthypay_seeder::{
    MongoStore, SeedEvent, SeedStore, Seeder, UserProfile, WalletSeedDefaults, fixtures,
};

#[tokio::main]
async fn main() -> Result<()> {
    let cli = Cli::parse();
    if let Err(e) = init_tracing(cli.log_json) {
        eprintln!("tracing init failed: {e}");
    }

    let db = connect_to_mongo(&cli.database).await?;
    println!("Connected to MongoDB database: {}", db.name());

    let seeder = Seeder::new(Arc::new(MongoStore::new(db)));

    match cli.command {
        Command::TestUser => seed_user(&seeder, fixtures::test_user()).await?,
        Command::StellarTestUser => seed_stellar_user(&seeder).await?,
        Command::User(args) => seed_user(&seeder, args.into_profile()).await?,
        Command::Wallets(args) => seed_wallets(&seeder, &args.into_defaults()).await?,
        Command::All(args) => {
            seed_user(&seeder, fixtures::test_user()).await?;
            seed_stellar_user(&seeder).await?;
            seed_wallets(&seeder, &args.into_defaults()).await?;
        }
    }

    Ok(())
}

async fn seed_user<S: SeedStore>(seeder: &Seeder<S>, profile: UserProfile) -> Result<()> {
    let email = profile.email.clone();
    let id = seeder
        .create_verified_user(profile)
        .await
        .with_context(|| format!("failed to seed user {email}"))?;
    println!("{}", SeedEvent::UserSeeded { email, id });
    Ok(())
}

async fn seed_stellar_user<S: SeedStore>(seeder: &Seeder<S>) -> Result<()> {
    seed_user(seeder, fixtures::stellar_test_user()).await?;
    let found = seeder
        .verify_user(fixtures::STELLAR_TEST_USER_EMAIL)
        .await
        .context("failed to verify seeded user")?;
    println!("User verification: {}", if found { "SUCCESS" } else { "FAILED" });
    Ok(())
}

async fn seed_wallets<S: SeedStore>(seeder: &Seeder<S>, defaults: &WalletSeedDefaults) -> Result<()> {
    let report = seeder
        .batch_seed_wallets_with(defaults, |event| println!("{event}"))
        .await
        .context("wallet initialization aborted")?;
    println!(
        "Wallet initialization completed! ({} users, {} wallets, {} mobile wallets created)",
        report.users_visited,
        report.wallets_created(),
        report.mobile_wallets_created()
    );
    Ok(())
}
