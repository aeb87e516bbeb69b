mod account;
mod order;
pub mod plan;
mod referral;
mod subscription;
mod token;
mod wallet;

pub use account::*;
pub use order::*;
pub use plan::*;
pub use referral::*;
pub use subscription::*;
pub use token::*;
pub use wallet::*;
