use chrono::{NaiveDate, Utc};
use tokio::sync::{RwLock, RwLockReadGuard, RwLockWriteGuard};

use crate::domain::invoice::{Currency, Invoice};

pub fn today() -> NaiveDate {
  Utc::now().date_naive()
}

/// The single invoice being edited.
///
/// Handlers run on several workers, so every action goes through the lock.
pub struct DraftSession {
  currency: Currency,
  draft: RwLock<Invoice>,
}

impl DraftSession {
  pub fn new(currency: Currency) -> Self {
    Self {
      currency,
      draft: RwLock::new(Invoice::new(today(), currency)),
    }
  }

  pub fn currency(&self) -> Currency {
    self.currency
  }

  pub async fn read(&self) -> RwLockReadGuard<'_, Invoice> {
    self.draft.read().await
  }

  pub async fn write(&self) -> RwLockWriteGuard<'_, Invoice> {
    self.draft.write().await
  }

  /// Copy of the current draft, so slow work does not hold the lock.
  pub async fn snapshot(&self) -> Invoice {
    self.draft.read().await.clone()
  }

  /// Replaces the draft with a fresh empty one dated today.
  pub async fn reset(&self) -> Invoice {
    let fresh = Invoice::new(today(), self.currency);
    let mut draft = self.draft.write().await;
    *draft = fresh.clone();
    fresh
  }
}

#[cfg(test)]
mod tests {
  use super::*;

  #[tokio::test]
  async fn test_reset_replaces_draft() {
    let session = DraftSession::new(Currency::EUR);
    let old_id = {
      let mut draft = session.write().await;
      draft.add_item();
      draft.id()
    };

    let fresh = session.reset().await;

    assert_ne!(fresh.id(), old_id);
    assert!(session.read().await.items().is_empty());
    assert_eq!(session.snapshot().await.date(), today());
  }
}
