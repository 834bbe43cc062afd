//! Per-session order submission claims.
//!
//! The pending marker in the checkout machine is persisted to the session,
//! but a request that loaded the session before that write would not see
//! it. [`InFlightOrders`] closes that gap inside one process: a handler
//! claims the session id before submitting and the claim is released when
//! the returned [`OrderClaim`] drops.

use std::collections::HashSet;
use std::sync::{Arc, Mutex, PoisonError};

use tower_sessions::session::Id;

/// Sessions with an order submission running in this process.
#[derive(Debug, Clone, Default)]
pub struct InFlightOrders {
    sessions: Arc<Mutex<HashSet<Id>>>,
}

impl InFlightOrders {
    /// Claim `session` for one submission. `None` if it is already claimed.
    #[must_use]
    pub fn claim(&self, session: Id) -> Option<OrderClaim> {
        let mut sessions = self.sessions.lock().unwrap_or_else(PoisonError::into_inner);
        sessions.insert(session).then(|| OrderClaim {
            sessions: Arc::clone(&self.sessions),
            session,
        })
    }

    /// Number of submissions running.
    #[must_use]
    pub fn len(&self) -> usize {
        self.sessions
            .lock()
            .unwrap_or_else(PoisonError::into_inner)
            .len()
    }

    #[must_use]
    pub fn is_empty(&self) -> bool {
        self.len() == 0
    }
}

/// Releases its session on drop.
#[derive(Debug)]
pub struct OrderClaim {
    sessions: Arc<Mutex<HashSet<Id>>>,
    session: Id,
}

impl Drop for OrderClaim {
    fn drop(&mut self) {
        self.sessions
            .lock()
            .unwrap_or_else(PoisonError::into_inner)
            .remove(&self.session);
    }
}

#[cfg(test)]
#[allow(clippy::unwrap_used)]
mod tests {
    use super::*;

    #[test]
    fn test_claim_is_exclusive_until_dropped() {
        let orders = InFlightOrders::default();
        let session = Id::default();

        let claim = orders.claim(session);
        assert!(claim.is_some());
        assert!(orders.claim(session).is_none());
        assert_eq!(orders.len(), 1);

        drop(claim);
        assert!(orders.is_empty());
        assert!(orders.claim(session).is_some());
    }

    #[test]
    fn test_sessions_claim_independently() {
        let orders = InFlightOrders::default();
        let _first = orders.claim(Id::default()).unwrap();
        assert!(orders.claim(Id::default()).is_some());
    }
}
