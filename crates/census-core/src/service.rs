//! The `RecordService` trait: every network operation the front-end needs.
//!
//! The trait is implemented by `census-cli` over reqwest. The form controller
//! depends on this abstraction so it can be driven by test doubles.

use std::future::Future;

use crate::citizen::{Citizen, CitizenId, Village};

/// Abstraction over the citizen-records API.
///
/// Each call is a single request. No retries, no caching: failures are
/// handed back to the caller as-is.
pub trait RecordService: Send + Sync {
  type Error: std::error::Error + Send + Sync + 'static;

  /// List every record.
  fn list(&self) -> impl Future<Output = Result<Vec<Citizen>, Self::Error>> + Send + '_;

  /// Fetch one record. Implementations report a missing record as an error.
  fn get_by_id<'a>(
    &'a self,
    id: &'a CitizenId,
  ) -> impl Future<Output = Result<Citizen, Self::Error>> + Send + 'a;

  /// Persist a new record and return it with its assigned id.
  fn create<'a>(
    &'a self,
    record: &'a Citizen,
  ) -> impl Future<Output = Result<Citizen, Self::Error>> + Send + 'a;

  /// Persist changes to an existing record.
  fn update<'a>(
    &'a self,
    id: &'a CitizenId,
    record: &'a Citizen,
  ) -> impl Future<Output = Result<Citizen, Self::Error>> + Send + 'a;

  fn delete<'a>(
    &'a self,
    id: &'a CitizenId,
  ) -> impl Future<Output = Result<(), Self::Error>> + Send + 'a;

  /// The village lookup listing.
  fn list_villages(
    &self,
  ) -> impl Future<Output = Result<Vec<Village>, Self::Error>> + Send + '_;
}
