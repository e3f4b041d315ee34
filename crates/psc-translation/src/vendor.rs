//! # Vendor Dispatch Seam
//!
//! The outbound half of the vendor integration: the coordinator hands a
//! persisted order to a [`VendorClient`] and moves on. Transport-level
//! dispatch failures do not fail the order — the vendor side owns
//! delivery, and the order terminates only through the inbound callback.

use std::future::Future;

use parking_lot::Mutex;
use thiserror::Error;
use tokio::sync::mpsc;

use psc_core::OrderId;

use crate::order::TranslationOrder;

/// The result the vendor reports through the inbound callback.
#[derive(Debug, Clone, Copy, PartialEq, Eq, serde::Serialize, serde::Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum VendorOutcome {
    /// Translations delivered.
    Success,
    /// The vendor could not fulfil the order.
    Failure,
}

/// Outbound dispatch failures.
#[derive(Error, Debug)]
pub enum VendorError {
    /// The vendor understood the request and said no.
    #[error("vendor rejected the order: {reason}")]
    Rejected {
        /// What the vendor answered.
        reason: String,
    },

    /// The vendor could not be reached at all.
    #[error("vendor unreachable: {reason}")]
    Unreachable {
        /// The transport failure.
        reason: String,
    },
}

/// Outbound vendor integration contract.
///
/// Implementations must tolerate re-dispatch of the same order: the
/// coordinator never re-sends on its own, but operators may.
pub trait VendorClient: Send + Sync {
    /// Hand the order to the vendor.
    fn dispatch_order(
        &self,
        order: &TranslationOrder,
    ) -> impl Future<Output = Result<(), VendorError>> + Send;
}

/// A vendor that records dispatched orders without sending anything.
/// Useful in tests: the paired receiver resolves when dispatch happens.
pub struct RecordingVendor {
    dispatched: Mutex<Vec<OrderId>>,
    signal: mpsc::UnboundedSender<OrderId>,
}

impl RecordingVendor {
    /// Create the vendor and the channel its dispatches are signalled on.
    pub fn new() -> (Self, mpsc::UnboundedReceiver<OrderId>) {
        let (signal, receiver) = mpsc::unbounded_channel();
        (
            Self {
                dispatched: Mutex::new(Vec::new()),
                signal,
            },
            receiver,
        )
    }

    /// All orders dispatched so far, in order.
    pub fn dispatched(&self) -> Vec<OrderId> {
        self.dispatched.lock().clone()
    }
}

impl VendorClient for RecordingVendor {
    async fn dispatch_order(&self, order: &TranslationOrder) -> Result<(), VendorError> {
        self.dispatched.lock().push(order.id);
        let _ = self.signal.send(order.id);
        Ok(())
    }
}
