/*!
   Exact integer token amounts.

   Balances are never compared with floating point. An [`Amount`] is
   serialized as a decimal string, matching the Cosmos SDK JSON encoding
   of `sdk.Int`.
*/

use core::fmt::{self, Display};
use core::str::FromStr;
use serde::{de, Deserialize, Deserializer, Serialize, Serializer};

use crate::error::{handle_generic_error, Error};

#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, PartialOrd, Ord, Hash)]
pub struct Amount(pub u128);

impl Amount {
    pub const fn zero() -> Self {
        Self(0)
    }

    pub fn is_zero(&self) -> bool {
        self.0 == 0
    }

    pub fn checked_add(self, rhs: impl Into<Amount>) -> Option<Self> {
        self.0.checked_add(rhs.into().0).map(Self)
    }

    pub fn checked_sub(self, rhs: impl Into<Amount>) -> Option<Self> {
        self.0.checked_sub(rhs.into().0).map(Self)
    }
}

impl From<u64> for Amount {
    fn from(amount: u64) -> Self {
        Self(amount as u128)
    }
}

impl From<u128> for Amount {
    fn from(amount: u128) -> Self {
        Self(amount)
    }
}

impl FromStr for Amount {
    type Err = Error;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        let amount = s.trim().parse::<u128>().map_err(handle_generic_error)?;
        Ok(Self(amount))
    }
}

impl Display for Amount {
    fn fmt(&self, f: &mut fmt::Formatter) -> fmt::Result {
        write!(f, "{}", self.0)
    }
}

impl Serialize for Amount {
    fn serialize<S: Serializer>(&self, serializer: S) -> Result<S::Ok, S::Error> {
        serializer.serialize_str(&self.0.to_string())
    }
}

impl<'de> Deserialize<'de> for Amount {
    fn deserialize<D: Deserializer<'de>>(deserializer: D) -> Result<Self, D::Error> {
        #[derive(Deserialize)]
        #[serde(untagged)]
        enum RawAmount {
            Str(String),
            Int(u64),
        }

        match RawAmount::deserialize(deserializer)? {
            RawAmount::Str(s) => s.parse::<u128>().map(Amount).map_err(de::Error::custom),
            RawAmount::Int(n) => Ok(Amount::from(n)),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn amount_arithmetic_is_checked() {
        let amount = Amount::from(2_000_000_000_000u64);

        assert_eq!(
            amount.checked_sub(1_000u64),
            Some(Amount(1_999_999_999_000))
        );
        assert_eq!(Amount::zero().checked_sub(1u64), None);
        assert_eq!(Amount(u128::MAX).checked_add(1u64), None);
    }

    #[test]
    fn amount_decodes_from_string_or_integer() {
        let from_str: Amount = serde_json::from_str("\"1000\"").unwrap();
        let from_int: Amount = serde_json::from_str("1000").unwrap();

        assert_eq!(from_str, Amount(1000));
        assert_eq!(from_int, Amount(1000));
        assert!(serde_json::from_str::<Amount>("\"1.5\"").is_err());
        assert_eq!(serde_json::to_string(&Amount(7)).unwrap(), "\"7\"");
    }
}
