//! Error types for invalid input reaching the resolver or the URL builder.
//!
//! Absence (a path that does not apply on this host, an item without artwork) is never an
//! error here. These types only describe input the caller should not have produced.

use thiserror::Error;

/// A save or ROM path was requested for an unusable platform identifier.
#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum ResolveError {
  /// The slug is empty or contains characters that cannot name a directory.
  #[error("invalid platform slug {0:?}")]
  InvalidPlatform(String),
}

/// The configured server host cannot anchor an absolute URL.
#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum UrlError {
  /// No host was configured.
  #[error("server host is empty")]
  EmptyHost,
  /// The host has no scheme or no authority.
  #[error("server host {host:?} is not an absolute URL: {reason}")]
  InvalidHost {
    /// Host exactly as supplied.
    host: String,
    /// Why it was rejected.
    reason: String,
  },
}

/// A storage slot outside the two the firmware knows about.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Error)]
#[error("SD slot must be 1 or 2, got {0}")]
pub struct InvalidSdSlot(pub u8);

/// Any failure produced while planning artwork downloads.
#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum Error {
  /// See [`ResolveError`].
  #[error(transparent)]
  Resolve(#[from] ResolveError),
  /// See [`UrlError`].
  #[error(transparent)]
  Url(#[from] UrlError),
}
