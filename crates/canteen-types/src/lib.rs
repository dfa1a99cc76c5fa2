//! # canteen-types
//!
//! Shared identifiers, entities, errors, and configuration for the canteen
//! subsidy authorization system.
//!
//! This crate is the leaf dependency of the workspace — every other crate
//! depends on it. It defines:
//!
//! - **Identifiers**: [`EmployeeId`], [`CardId`], [`FaceTemplateId`], [`TerminalId`], [`LivenessSessionId`], [`TransactionId`]
//! - **Entities**: [`Employee`], [`Card`], [`FaceTemplate`], [`Terminal`], [`LivenessSession`], [`DailySubsidyBalance`], [`MonthlyBalance`], [`Transaction`]
//! - **Liveness model**: [`LivenessStatus`], [`LivenessCommand`], [`Pose`], [`FailReasonCode`]
//! - **Money**: [`Cents`]
//! - **Configuration**: [`CanteenConfig`]
//! - **Errors**: [`CanteenError`] with stable string codes matching the external API
//! - **Constants**: system-wide policy defaults

pub mod balance;
pub mod card;
pub mod config;
pub mod constants;
pub mod employee;
pub mod error;
pub mod face;
pub mod ids;
pub mod liveness;
pub mod money;
pub mod terminal;
pub mod transaction;

// Re-export all primary types at crate root for ergonomic imports:
//   use canteen_types::{Employee, Card, LivenessSession, CanteenError, ...};

pub use balance::*;
pub use card::*;
pub use config::*;
pub use employee::*;
pub use error::*;
pub use face::*;
pub use ids::*;
pub use liveness::*;
pub use money::*;
pub use terminal::*;
pub use transaction::*;

// Constants are accessed via `canteen_types::constants::FOO`
// (not re-exported to avoid name collisions).
