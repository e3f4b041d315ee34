//! # psc-translation — Translation Order Coordination
//!
//! Orders target-language versions of catalog entities from an external
//! vendor and applies the asynchronous results through the entity
//! version store:
//!
//! - **Orders** ([`order`]): `Pending → Completed | Failed`, terminal
//!   either way, immutable afterwards.
//!
//! - **Vendor seam** ([`vendor`]): the outbound dispatch contract with a
//!   recording implementation for tests; [`http`] is the production
//!   `reqwest` adapter.
//!
//! - **Coordinator** ([`coordinator`]): submission validation against
//!   the language capability table, fire-and-forget dispatch with a
//!   bounded timeout, and the idempotent vendor callback.
//!
//! ## Crate Policy
//!
//! - Entity mutations happen only through `psc-store` — the coordinator
//!   never touches version records directly.
//! - Dispatch transport failures never fail an order; only the vendor
//!   callback terminates it.

pub mod coordinator;
pub mod http;
pub mod order;
pub mod vendor;

pub use coordinator::{OrderError, TranslationOrderCoordinator, DEFAULT_DISPATCH_TIMEOUT};
pub use http::{HttpVendorClient, VendorConfig};
pub use order::{OrderStatus, TranslationOrder};
pub use vendor::{RecordingVendor, VendorClient, VendorError, VendorOutcome};
