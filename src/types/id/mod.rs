use serde::de::{Error as DeError, Unexpected};
use std::{
    fmt::{Debug, Display},
    hash::Hash,
    marker::PhantomData,
    num::NonZeroU64,
    str::FromStr,
};
use thiserror::Error;

use self::marker::Marker;

pub mod marker;

pub type TicketId = Id<marker::TicketMarker>;
pub type UserId = Id<marker::UserMarker>;

/// Database generated identifier. Always positive since it comes
/// from a `BIGSERIAL` column.
#[derive(Clone, Copy, PartialEq, Eq, PartialOrd, Ord)]
pub struct Id<T: Marker> {
    value: NonZeroU64,
    phantom: PhantomData<T>,
}

impl<T: Marker> Id<T> {
    /// # Panics
    ///
    /// It will panic if the value is 0.
    #[must_use]
    #[track_caller]
    pub const fn new(n: u64) -> Self {
        if let Some(id) = Self::new_checked(n) {
            id
        } else {
            panic!("value is zero")
        }
    }

    const fn from_nonzero(n: NonZeroU64) -> Self {
        Self {
            value: n,
            phantom: PhantomData,
        }
    }

    #[must_use]
    pub const fn new_checked(n: u64) -> Option<Self> {
        if let Some(n) = NonZeroU64::new(n) {
            Some(Self::from_nonzero(n))
        } else {
            None
        }
    }

    #[must_use]
    pub const fn get(self) -> u64 {
        self.value.get()
    }
}

impl<T: Marker> Debug for Id<T> {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        let name = std::any::type_name::<T>();
        let name = name.rsplit("::").next().unwrap_or(name);
        write!(f, "Id::<{name}>({})", self.get())
    }
}

impl<T: Marker> Display for Id<T> {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        Display::fmt(&self.value.get(), f)
    }
}

impl<T: Marker> Hash for Id<T> {
    fn hash<H: std::hash::Hasher>(&self, state: &mut H) {
        state.write_u64(self.value.get());
    }
}

#[derive(Debug, Error)]
#[error("invalid id")]
pub struct ParseIdError;

impl<T: Marker> FromStr for Id<T> {
    type Err = ParseIdError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        let value = s.parse::<u64>().map_err(|_| ParseIdError)?;
        if i64::try_from(value).is_err() {
            return Err(ParseIdError);
        }
        Self::new_checked(value).ok_or(ParseIdError)
    }
}

/// Clients may send ids either as JSON numbers or as the strings
/// the API hands out.
impl<'de, T: Marker> serde::Deserialize<'de> for Id<T> {
    fn deserialize<D>(deserializer: D) -> Result<Self, D::Error>
    where
        D: serde::Deserializer<'de>,
    {
        #[derive(serde::Deserialize)]
        #[serde(untagged)]
        enum Repr {
            Number(u64),
            Text(String),
        }

        match Repr::deserialize(deserializer)? {
            Repr::Number(n) => Self::new_checked(n)
                .ok_or_else(|| DeError::invalid_value(Unexpected::Unsigned(n), &"a positive id")),
            Repr::Text(text) => text
                .parse()
                .map_err(|_| DeError::invalid_value(Unexpected::Str(&text), &"a positive id")),
        }
    }
}

impl<T: Marker> serde::Serialize for Id<T> {
    fn serialize<S>(&self, serializer: S) -> Result<S::Ok, S::Error>
    where
        S: serde::Serializer,
    {
        serializer.collect_str(&self.value.get())
    }
}

impl<'q, T: Marker> sqlx::Encode<'q, sqlx::Postgres> for Id<T> {
    fn encode_by_ref(
        &self,
        buf: &mut <sqlx::Postgres as sqlx::database::HasArguments<'q>>::ArgumentBuffer,
    ) -> sqlx::encode::IsNull {
        // ids above i64::MAX never come out of a BIGSERIAL column
        match i64::try_from(self.get()) {
            Ok(value) => <i64 as sqlx::Encode<'q, sqlx::Postgres>>::encode_by_ref(&value, buf),
            Err(..) => sqlx::encode::IsNull::Yes,
        }
    }
}

impl<'r, T: Marker> sqlx::Decode<'r, sqlx::Postgres> for Id<T> {
    fn decode(
        value: <sqlx::Postgres as sqlx::database::HasValueRef<'r>>::ValueRef,
    ) -> Result<Self, sqlx::error::BoxDynError> {
        #[derive(Debug, Error)]
        #[error("got non-positive id {0}")]
        struct NonPositiveId(i64);

        let value = <i64 as sqlx::Decode<'r, sqlx::Postgres>>::decode(value)?;
        u64::try_from(value)
            .ok()
            .and_then(Self::new_checked)
            .ok_or_else(|| NonPositiveId(value).into())
    }
}

impl<T: Marker> sqlx::Type<sqlx::Postgres> for Id<T> {
    fn type_info() -> <sqlx::Postgres as sqlx::Database>::TypeInfo {
        <i64 as sqlx::Type<sqlx::Postgres>>::type_info()
    }
}
