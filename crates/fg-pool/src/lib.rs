//! # fg-pool — Pool Builder & Rating Engine
//!
//! The only surface game code talks to.
//!
//! ```text
//! Gacha::roll
//!   ├─ draw role + bracket (weight tables)
//!   ├─ PoolBuilder::acquire_pool(role, bracket)       up to 3 attempts
//!   │    ├─ page = uniform(1..=boundary(bracket))
//!   │    ├─ media page → characters of each media     sequential
//!   │    ├─ canonical appearance per character
//!   │    ├─ drop adult / out-of-bracket, dedupe by id
//!   │    └─ rate(role, popularity)
//!   └─ uniform pick from the pool
//! ```

pub mod builder;
pub mod canonical;
pub mod error;
pub mod gacha;

pub use builder::*;
pub use canonical::*;
pub use error::*;
pub use gacha::*;
