//! JSON representations shared by the API routes and the configuration file.

use {
    number::{Bfp, U256, serialization::HexOrDecimalU256},
    primitive_types::H160,
    serde::{Deserialize, Deserializer, Serialize, Serializer, de},
    serde_with::{DeserializeAs, DisplayFromStr, SerializeAs, serde_as},
};

/// Opaque bytes encoded as a `0x` prefixed hex string.
pub struct Bytes;

impl SerializeAs<Vec<u8>> for Bytes {
    fn serialize_as<S>(source: &Vec<u8>, serializer: S) -> Result<S::Ok, S::Error>
    where
        S: Serializer,
    {
        serializer.serialize_str(&format!("0x{}", hex::encode(source)))
    }
}

impl<'de> DeserializeAs<'de, Vec<u8>> for Bytes {
    fn deserialize_as<D>(deserializer: D) -> Result<Vec<u8>, D::Error>
    where
        D: Deserializer<'de>,
    {
        let s = String::deserialize(deserializer)?;
        let digits = s
            .strip_prefix("0x")
            .ok_or_else(|| de::Error::custom("bytes must be 0x prefixed"))?;
        hex::decode(digits).map_err(de::Error::custom)
    }
}

#[serde_as]
#[derive(Clone, Debug, Deserialize, Eq, PartialEq, Serialize)]
#[serde(rename_all = "camelCase", deny_unknown_fields)]
pub struct TokenConfig {
    pub address: H160,
    #[serde_as(as = "DisplayFromStr")]
    #[serde(default)]
    pub token_type: vault::TokenType,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub rate_provider: Option<H160>,
    #[serde(default)]
    pub pays_yield_fees: bool,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub chain_id: Option<u64>,
    pub decimals: u8,
}

impl From<TokenConfig> for vault::TokenConfig {
    fn from(value: TokenConfig) -> Self {
        Self {
            token: value.address,
            token_type: value.token_type,
            rate_provider: value.rate_provider,
            pays_yield_fees: value.pays_yield_fees,
            chain_id: value.chain_id,
            decimals: value.decimals,
        }
    }
}

impl From<&vault::TokenConfig> for TokenConfig {
    fn from(value: &vault::TokenConfig) -> Self {
        Self {
            address: value.token,
            token_type: value.token_type,
            rate_provider: value.rate_provider,
            pays_yield_fees: value.pays_yield_fees,
            chain_id: value.chain_id,
            decimals: value.decimals,
        }
    }
}

#[derive(Clone, Copy, Debug, Default, Deserialize)]
#[serde(rename_all = "camelCase", deny_unknown_fields)]
pub struct RoleAccounts {
    #[serde(default)]
    pub pause_manager: H160,
    #[serde(default)]
    pub swap_fee_manager: H160,
    #[serde(default)]
    pub pool_creator: H160,
}

#[derive(Clone, Copy, Debug, Default, Deserialize)]
#[serde(rename_all = "camelCase", deny_unknown_fields)]
pub struct LiquidityManagement {
    #[serde(default)]
    pub disable_unbalanced_liquidity: bool,
    #[serde(default)]
    pub enable_add_liquidity_custom: bool,
    #[serde(default)]
    pub enable_remove_liquidity_custom: bool,
    #[serde(default)]
    pub enable_donation: bool,
}

/// Stable pool registration request.
#[serde_as]
#[derive(Clone, Debug, Deserialize)]
#[serde(rename_all = "camelCase", deny_unknown_fields)]
pub struct PoolRegistration {
    pub pool: H160,
    pub tokens: Vec<TokenConfig>,
    /// 18 decimal fixed point fraction, `10000000000000000` is 1%.
    #[serde_as(as = "HexOrDecimalU256")]
    pub swap_fee: U256,
    /// Amplification value without precision, e.g. `200`.
    pub amplification_parameter: u64,
    #[serde(default)]
    pub pause_window_end_time: u64,
    #[serde(default)]
    pub protocol_fee_exempt: bool,
    #[serde(default)]
    pub role_accounts: RoleAccounts,
    #[serde(default)]
    pub hooks: Option<H160>,
    #[serde(default)]
    pub liquidity_management: LiquidityManagement,
}

impl PoolRegistration {
    pub fn into_domain(self) -> Result<vault::PoolRegistration, vault::ValidationError> {
        Ok(vault::PoolRegistration {
            pool: self.pool,
            tokens: self.tokens.into_iter().map(Into::into).collect(),
            swap_fee: Bfp::from_wei(self.swap_fee),
            amplification_parameter: vault::AmplificationParameter::from_value(
                self.amplification_parameter,
            )?,
            pause_window_end_time: self.pause_window_end_time,
            protocol_fee_exempt: self.protocol_fee_exempt,
            role_accounts: vault::RoleAccounts {
                pause_manager: self.role_accounts.pause_manager,
                swap_fee_manager: self.role_accounts.swap_fee_manager,
                pool_creator: self.role_accounts.pool_creator,
            },
            hooks: self.hooks,
            liquidity_management: vault::LiquidityManagement {
                disable_unbalanced_liquidity: self.liquidity_management.disable_unbalanced_liquidity,
                enable_add_liquidity_custom: self.liquidity_management.enable_add_liquidity_custom,
                enable_remove_liquidity_custom: self
                    .liquidity_management
                    .enable_remove_liquidity_custom,
                enable_donation: self.liquidity_management.enable_donation,
            },
        })
    }
}

#[cfg(test)]
mod tests {
    use {super::*, serde_json::json};

    #[serde_as]
    #[derive(Debug, Deserialize, Serialize, PartialEq)]
    struct UserData(#[serde_as(as = "Bytes")] Vec<u8>);

    #[test]
    fn bytes_are_0x_hex() {
        let data: UserData = serde_json::from_value(json!("0xcafe")).unwrap();
        assert_eq!(data, UserData(vec![0xca, 0xfe]));
        assert_eq!(serde_json::to_value(&data).unwrap(), json!("0xcafe"));
        assert_eq!(
            serde_json::to_value(UserData(Vec::new())).unwrap(),
            json!("0x")
        );

        assert!(serde_json::from_value::<UserData>(json!("cafe")).is_err());
        assert!(serde_json::from_value::<UserData>(json!("0xcaf")).is_err());
    }

    #[test]
    fn registration_defaults() {
        let registration: PoolRegistration = serde_json::from_value(json!({
            "pool": "0x0101010101010101010101010101010101010101",
            "tokens": [
                { "address": "0x0202020202020202020202020202020202020202", "decimals": 18 },
                {
                    "address": "0x0303030303030303030303030303030303030303",
                    "tokenType": "WITH_RATE",
                    "rateProvider": "0x0404040404040404040404040404040404040404",
                    "decimals": 6
                }
            ],
            "swapFee": "1000000000000",
            "amplificationParameter": 200
        }))
        .unwrap();

        let registration = registration.into_domain().unwrap();
        assert_eq!(registration.pool, H160([1; 20]));
        assert_eq!(registration.swap_fee, number::bfp!("0.000001"));
        assert_eq!(
            registration.amplification_parameter,
            vault::AmplificationParameter::from_value(200).unwrap()
        );
        assert_eq!(registration.tokens[0].token_type, vault::TokenType::Standard);
        assert_eq!(registration.tokens[0].rate_provider, None);
        assert_eq!(registration.tokens[1].token_type, vault::TokenType::WithRate);
        assert_eq!(registration.tokens[1].rate_provider, Some(H160([4; 20])));
        assert_eq!(registration.tokens[1].decimals, 6);
        assert_eq!(registration.role_accounts, vault::RoleAccounts::default());
        assert_eq!(registration.hooks, None);
        assert!(!registration.liquidity_management.disable_unbalanced_liquidity);
    }

    #[test]
    fn token_type_is_screaming_snake_case() {
        let token = TokenConfig::from(&vault::TokenConfig {
            token: H160([2; 20]),
            token_type: vault::TokenType::WithRate,
            rate_provider: Some(H160([4; 20])),
            pays_yield_fees: false,
            chain_id: None,
            decimals: 18,
        });
        assert_eq!(
            serde_json::to_value(&token).unwrap(),
            json!({
                "address": "0x0202020202020202020202020202020202020202",
                "tokenType": "WITH_RATE",
                "rateProvider": "0x0404040404040404040404040404040404040404",
                "paysYieldFees": false,
                "decimals": 18
            })
        );

        assert!(
            serde_json::from_value::<TokenConfig>(json!({
                "address": "0x0202020202020202020202020202020202020202",
                "tokenType": "withRate",
                "decimals": 18
            }))
            .is_err()
        );
    }

    #[test]
    fn registration_rejects_amplification_out_of_bounds() {
        let registration: PoolRegistration = serde_json::from_value(json!({
            "pool": "0x0101010101010101010101010101010101010101",
            "tokens": [],
            "swapFee": "0xe8d4a51000",
            "amplificationParameter": 5001
        }))
        .unwrap();
        assert_eq!(registration.swap_fee, U256::exp10(12));
        assert!(matches!(
            registration.into_domain(),
            Err(vault::ValidationError::AmplificationOutOfBounds(_))
        ));
    }
}
