pub mod user;
pub mod wallet;

pub use user::{KycStatus, User, UserRef};
pub use wallet::{MobileMoneyWallet, Provider, Wallet};
