//! Tri-state field for partial updates.
//!
//! A `PATCH` body distinguishes three cases for a nullable field: the key is
//! absent (keep the stored value), the key is `null` (clear it), or the key
//! carries a value (replace it). A plain `Option<T>` collapses the first two,
//! so nullable fields of [`UpdateEventRequest`](crate::UpdateEventRequest) use
//! [`Patch`] instead.
//!
//! Fields must be annotated with `#[serde(default)]` so that a missing key
//! deserializes to [`Patch::Keep`].

use serde::{Deserialize, Deserializer, Serialize, Serializer};

/// One field of a partial update.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub enum Patch<T> {
    /// Field absent from the request; leave the stored value untouched.
    #[default]
    Keep,
    /// Field explicitly `null`; clear the stored value.
    Clear,
    /// Field present; replace the stored value.
    Set(T),
}

impl<T> Patch<T> {
    /// Whether the request mentions this field at all.
    pub const fn is_present(&self) -> bool {
        !self.is_keep()
    }

    /// Whether the field is absent from the request.
    ///
    /// Used with `skip_serializing_if` so an absent field stays absent on the
    /// wire instead of turning into `null`.
    pub const fn is_keep(&self) -> bool {
        matches!(self, Self::Keep)
    }

    /// Apply the patch to a stored optional value.
    ///
    /// Returns `true` when the field was touched (set or cleared), even if
    /// the new value happens to equal the old one.
    pub fn apply_to(self, slot: &mut Option<T>) -> bool {
        match self {
            Self::Keep => false,
            Self::Clear => {
                *slot = None;
                true
            }
            Self::Set(value) => {
                *slot = Some(value);
                true
            }
        }
    }
}

impl<T> From<Option<T>> for Patch<T> {
    fn from(value: Option<T>) -> Self {
        value.map_or(Self::Clear, Self::Set)
    }
}

impl<'de, T: Deserialize<'de>> Deserialize<'de> for Patch<T> {
    fn deserialize<D: Deserializer<'de>>(deserializer: D) -> Result<Self, D::Error> {
        Option::<T>::deserialize(deserializer).map(Self::from)
    }
}

impl<T: Serialize> Serialize for Patch<T> {
    fn serialize<S: Serializer>(&self, serializer: S) -> Result<S::Ok, S::Error> {
        match self {
            Self::Set(value) => serializer.serialize_some(value),
            Self::Keep | Self::Clear => serializer.serialize_none(),
        }
    }
}
