//! # canteen-store
//!
//! The Data Access Boundary (§4.6): typed accessors over entities and
//! balances, with the row-level locking discipline §4.4/§5 require.
//!
//! [`MemStore`] is the only [`Store`] implementation in this workspace —
//! no SQL driver is part of the dependency stack (§1 names the
//! persistence backend as an external collaborator, consumed only
//! through this trait).

pub mod mem_store;
pub mod row_locks;
pub mod store;

pub use mem_store::MemStore;
pub use store::{PaymentLock, Store};
