//! Storable entity contract.
//!
//! # Responsibility
//! - Define the capability set a type must provide to live in a `Store`.
//!
//! # Invariants
//! - `id()` is stable for the whole lifetime of a value.
//! - `decode(&encode(e))` reproduces `e` whenever `e`'s free text contains no
//!   codec delimiter or substitute character.

use crate::codec::DecodeError;
use std::fmt::{Debug, Display};

/// A uniquely identified record that can be held and persisted by a `Store`.
///
/// State transitions are domain specific and live on the concrete type.
pub trait Entity: Sized + Send + 'static {
    type Id: Copy + Eq + Ord + Debug + Display + Send + Sync + 'static;

    fn id(&self) -> Self::Id;

    /// Encodes this value as one persisted line, without a trailing newline.
    fn encode(&self) -> String;

    /// Decodes one persisted line produced by `encode`.
    fn decode(line: &str) -> Result<Self, DecodeError>;
}
