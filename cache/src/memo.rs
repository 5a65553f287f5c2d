//! Memoized derived fields
//!
//! A derived field starts out unresolved and is computed at most once. Its
//! outcome is either a value or a deliberate absence (`Field::Empty`), and it
//! never goes back to unresolved.

use std::future::Future;
use std::sync::OnceLock;

use tokio::sync::OnceCell;

/// Observable state of a derived field
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Field<T> {
    /// Not computed yet
    Unresolved,

    /// Computed, nothing to show (no match for the locale, no hidden ability, ...)
    Empty,

    /// Computed value
    Resolved(T),
}

impl<T> Field<T> {
    pub fn is_resolved(&self) -> bool {
        matches!(self, Field::Resolved(_))
    }

    /// The value, if any
    pub fn value(self) -> Option<T> {
        match self {
            Field::Resolved(value) => Some(value),
            Field::Unresolved | Field::Empty => None,
        }
    }

    fn from_slot(slot: Option<&Option<T>>) -> Field<&T> {
        match slot {
            None => Field::Unresolved,
            Some(None) => Field::Empty,
            Some(Some(value)) => Field::Resolved(value),
        }
    }
}

/// Field computed from data the entity already holds
#[derive(Debug)]
pub struct Memo<T>(OnceLock<Option<T>>);

impl<T> Memo<T> {
    pub fn new() -> Self {
        Self(OnceLock::new())
    }

    pub fn state(&self) -> Field<&T> {
        Field::<T>::from_slot(self.0.get())
    }

    /// Return the memoized value, computing it with `f` on first access
    pub fn get_or_resolve(&self, f: impl FnOnce() -> Option<T>) -> Option<&T> {
        self.0.get_or_init(f).as_ref()
    }

    /// Like `get_or_resolve` for computations that can fail; a failure leaves
    /// the field unresolved
    pub fn get_or_try_resolve<E>(
        &self,
        f: impl FnOnce() -> Result<Option<T>, E>,
    ) -> Result<Option<&T>, E> {
        if let Some(slot) = self.0.get() {
            return Ok(slot.as_ref());
        }
        let value = f()?;
        Ok(self.0.get_or_init(|| value).as_ref())
    }
}

impl<T> Default for Memo<T> {
    fn default() -> Self {
        Self::new()
    }
}

/// Field whose computation may fetch related records
#[derive(Debug)]
pub struct AsyncMemo<T>(OnceCell<Option<T>>);

impl<T> AsyncMemo<T> {
    pub fn new() -> Self {
        Self(OnceCell::new())
    }

    pub fn state(&self) -> Field<&T> {
        Field::<T>::from_slot(self.0.get())
    }

    /// Return the memoized value, running `f` on first access.
    ///
    /// Concurrent callers wait for the one running computation. A failed
    /// computation leaves the field unresolved so the next call retries.
    pub async fn get_or_try_resolve<E, F, Fut>(&self, f: F) -> Result<Option<&T>, E>
    where
        F: FnOnce() -> Fut,
        Fut: Future<Output = Result<Option<T>, E>>,
    {
        self.0.get_or_try_init(f).await.map(Option::as_ref)
    }
}

impl<T> Default for AsyncMemo<T> {
    fn default() -> Self {
        Self::new()
    }
}
