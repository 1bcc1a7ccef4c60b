//! `serde_with` adapters for 256-bit amounts.

use {
    primitive_types::U256,
    serde::{Deserializer, Serializer, de},
    serde_with::{DeserializeAs, SerializeAs},
    std::fmt,
};

/// Serializes a `U256` as a decimal string and accepts either a decimal
/// string, a `0x` prefixed hex string or a JSON integer when deserializing.
pub struct HexOrDecimalU256;

impl<'de> DeserializeAs<'de, U256> for HexOrDecimalU256 {
    fn deserialize_as<D>(deserializer: D) -> Result<U256, D::Error>
    where
        D: Deserializer<'de>,
    {
        struct Visitor;

        impl de::Visitor<'_> for Visitor {
            type Value = U256;

            fn expecting(&self, formatter: &mut fmt::Formatter) -> fmt::Result {
                write!(formatter, "a u256 encoded as a hex or decimal string")
            }

            fn visit_u64<E>(self, value: u64) -> Result<Self::Value, E>
            where
                E: de::Error,
            {
                Ok(U256::from(value))
            }

            fn visit_str<E>(self, s: &str) -> Result<Self::Value, E>
            where
                E: de::Error,
            {
                parse(s).map_err(|err| de::Error::custom(format!("failed to parse {s:?}: {err}")))
            }
        }

        deserializer.deserialize_any(Visitor)
    }
}

impl SerializeAs<U256> for HexOrDecimalU256 {
    fn serialize_as<S>(source: &U256, serializer: S) -> Result<S::Ok, S::Error>
    where
        S: Serializer,
    {
        serializer.serialize_str(&source.to_string())
    }
}

fn parse(s: &str) -> anyhow::Result<U256> {
    match s.strip_prefix("0x") {
        Some(hex) => Ok(U256::from_str_radix(hex, 16)?),
        None => Ok(U256::from_dec_str(s)?),
    }
}

#[cfg(test)]
mod tests {
    use {
        super::*,
        serde::{Deserialize, Serialize},
        serde_with::serde_as,
    };

    #[serde_as]
    #[derive(Debug, Deserialize, Serialize, PartialEq)]
    struct Amount(#[serde_as(as = "HexOrDecimalU256")] U256);

    #[test]
    fn deserializes_all_encodings() {
        for json in [r#""1000""#, r#""0x3e8""#, "1000"] {
            let amount: Amount = serde_json::from_str(json).unwrap();
            assert_eq!(amount, Amount(1000.into()));
        }
        assert!(serde_json::from_str::<Amount>(r#""ten""#).is_err());
    }

    #[test]
    fn serializes_as_decimal() {
        let json = serde_json::to_string(&Amount(U256::exp10(18))).unwrap();
        assert_eq!(json, r#""1000000000000000000""#);
    }
}
