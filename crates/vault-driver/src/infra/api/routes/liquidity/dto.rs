use {
    crate::infra::dto::Bytes,
    number::{U256, serialization::HexOrDecimalU256},
    primitive_types::H160,
    serde::{Deserialize, Serialize},
    serde_with::serde_as,
};

#[serde_as]
#[derive(Debug, Deserialize)]
#[serde(rename_all = "camelCase", deny_unknown_fields)]
pub struct Initialize {
    pub recipient: H160,
    #[serde_as(as = "Vec<HexOrDecimalU256>")]
    pub exact_amounts_in: Vec<U256>,
    #[serde_as(as = "HexOrDecimalU256")]
    #[serde(default)]
    pub min_bpt_amount_out: U256,
    #[serde_as(as = "Bytes")]
    #[serde(default)]
    pub user_data: Vec<u8>,
}

impl Initialize {
    pub fn into_domain(self, pool: H160) -> vault::InitializeParams {
        vault::InitializeParams {
            pool,
            recipient: self.recipient,
            exact_amounts_in: self.exact_amounts_in,
            min_bpt_amount_out: self.min_bpt_amount_out,
            user_data: self.user_data,
        }
    }
}

#[serde_as]
#[derive(Debug, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct Initialized {
    #[serde_as(as = "HexOrDecimalU256")]
    pub bpt_amount_out: U256,
}

#[serde_as]
#[derive(Debug, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct AddLiquidity {
    pub recipient: H160,
    #[serde(flatten)]
    pub kind: AddLiquidityKind,
    #[serde_as(as = "Bytes")]
    #[serde(default)]
    pub user_data: Vec<u8>,
}

#[serde_as]
#[derive(Debug, Deserialize)]
#[serde(tag = "kind", rename_all = "camelCase", rename_all_fields = "camelCase")]
pub enum AddLiquidityKind {
    Proportional {
        #[serde_as(as = "Vec<HexOrDecimalU256>")]
        max_amounts_in: Vec<U256>,
        #[serde_as(as = "HexOrDecimalU256")]
        exact_bpt_amount_out: U256,
    },
    Unbalanced {
        #[serde_as(as = "Vec<HexOrDecimalU256>")]
        exact_amounts_in: Vec<U256>,
        #[serde_as(as = "HexOrDecimalU256")]
        min_bpt_amount_out: U256,
    },
    SingleTokenExactOut {
        token_in: H160,
        #[serde_as(as = "HexOrDecimalU256")]
        max_amount_in: U256,
        #[serde_as(as = "HexOrDecimalU256")]
        exact_bpt_amount_out: U256,
    },
    Donation {
        #[serde_as(as = "Vec<HexOrDecimalU256>")]
        amounts_in: Vec<U256>,
    },
}

impl AddLiquidity {
    pub fn into_domain(self, pool: H160) -> vault::AddLiquidityParams {
        let kind = match self.kind {
            AddLiquidityKind::Proportional {
                max_amounts_in,
                exact_bpt_amount_out,
            } => vault::AddLiquidityKind::Proportional {
                max_amounts_in,
                exact_bpt_amount_out,
            },
            AddLiquidityKind::Unbalanced {
                exact_amounts_in,
                min_bpt_amount_out,
            } => vault::AddLiquidityKind::Unbalanced {
                exact_amounts_in,
                min_bpt_amount_out,
            },
            AddLiquidityKind::SingleTokenExactOut {
                token_in,
                max_amount_in,
                exact_bpt_amount_out,
            } => vault::AddLiquidityKind::SingleTokenExactOut {
                token_in,
                max_amount_in,
                exact_bpt_amount_out,
            },
            AddLiquidityKind::Donation { amounts_in } => {
                vault::AddLiquidityKind::Donation { amounts_in }
            }
        };
        vault::AddLiquidityParams {
            pool,
            recipient: self.recipient,
            kind,
            user_data: self.user_data,
        }
    }
}

#[serde_as]
#[derive(Debug, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct AddLiquidityResult {
    #[serde_as(as = "Vec<HexOrDecimalU256>")]
    pub amounts_in: Vec<U256>,
    #[serde_as(as = "HexOrDecimalU256")]
    pub bpt_amount_out: U256,
    #[serde_as(as = "Vec<HexOrDecimalU256>")]
    pub swap_fee_amounts: Vec<U256>,
}

impl From<vault::AddLiquidityResult> for AddLiquidityResult {
    fn from(result: vault::AddLiquidityResult) -> Self {
        Self {
            amounts_in: result.amounts_in,
            bpt_amount_out: result.bpt_amount_out,
            swap_fee_amounts: result.swap_fee_amounts,
        }
    }
}

#[serde_as]
#[derive(Debug, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct RemoveLiquidity {
    pub recipient: H160,
    #[serde(flatten)]
    pub kind: RemoveLiquidityKind,
    #[serde_as(as = "Bytes")]
    #[serde(default)]
    pub user_data: Vec<u8>,
}

#[serde_as]
#[derive(Debug, Deserialize)]
#[serde(tag = "kind", rename_all = "camelCase", rename_all_fields = "camelCase")]
pub enum RemoveLiquidityKind {
    Proportional {
        #[serde_as(as = "HexOrDecimalU256")]
        exact_bpt_amount_in: U256,
        #[serde_as(as = "Vec<HexOrDecimalU256>")]
        min_amounts_out: Vec<U256>,
    },
    Unbalanced {
        #[serde_as(as = "Vec<HexOrDecimalU256>")]
        exact_amounts_out: Vec<U256>,
        #[serde_as(as = "HexOrDecimalU256")]
        max_bpt_amount_in: U256,
    },
    SingleTokenExactIn {
        token_out: H160,
        #[serde_as(as = "HexOrDecimalU256")]
        exact_bpt_amount_in: U256,
        #[serde_as(as = "HexOrDecimalU256")]
        min_amount_out: U256,
    },
    SingleTokenExactOut {
        token_out: H160,
        #[serde_as(as = "HexOrDecimalU256")]
        exact_amount_out: U256,
        #[serde_as(as = "HexOrDecimalU256")]
        max_bpt_amount_in: U256,
    },
}

impl RemoveLiquidity {
    pub fn into_domain(self, pool: H160) -> vault::RemoveLiquidityParams {
        let kind = match self.kind {
            RemoveLiquidityKind::Proportional {
                exact_bpt_amount_in,
                min_amounts_out,
            } => vault::RemoveLiquidityKind::Proportional {
                exact_bpt_amount_in,
                min_amounts_out,
            },
            RemoveLiquidityKind::Unbalanced {
                exact_amounts_out,
                max_bpt_amount_in,
            } => vault::RemoveLiquidityKind::Unbalanced {
                exact_amounts_out,
                max_bpt_amount_in,
            },
            RemoveLiquidityKind::SingleTokenExactIn {
                token_out,
                exact_bpt_amount_in,
                min_amount_out,
            } => vault::RemoveLiquidityKind::SingleTokenExactIn {
                token_out,
                exact_bpt_amount_in,
                min_amount_out,
            },
            RemoveLiquidityKind::SingleTokenExactOut {
                token_out,
                exact_amount_out,
                max_bpt_amount_in,
            } => vault::RemoveLiquidityKind::SingleTokenExactOut {
                token_out,
                exact_amount_out,
                max_bpt_amount_in,
            },
        };
        vault::RemoveLiquidityParams {
            pool,
            recipient: self.recipient,
            kind,
            user_data: self.user_data,
        }
    }
}

#[serde_as]
#[derive(Debug, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct RemoveLiquidityResult {
    #[serde_as(as = "HexOrDecimalU256")]
    pub bpt_amount_in: U256,
    #[serde_as(as = "Vec<HexOrDecimalU256>")]
    pub amounts_out: Vec<U256>,
    #[serde_as(as = "Vec<HexOrDecimalU256>")]
    pub swap_fee_amounts: Vec<U256>,
}

impl From<vault::RemoveLiquidityResult> for RemoveLiquidityResult {
    fn from(result: vault::RemoveLiquidityResult) -> Self {
        Self {
            bpt_amount_in: result.bpt_amount_in,
            amounts_out: result.amounts_out,
            swap_fee_amounts: result.swap_fee_amounts,
        }
    }
}

#[cfg(test)]
mod tests {
    use {super::*, serde_json::json};

    #[test]
    fn add_liquidity_kinds() {
        let request: AddLiquidity = serde_json::from_value(json!({
            "recipient": "0x0101010101010101010101010101010101010101",
            "kind": "unbalanced",
            "exactAmountsIn": ["150000000000000000000", "0x0", 0],
            "minBptAmountOut": "1",
            "userData": "0x01"
        }))
        .unwrap();
        let params = request.into_domain(H160([9; 20]));
        assert_eq!(params.pool, H160([9; 20]));
        assert_eq!(params.recipient, H160([1; 20]));
        assert_eq!(params.user_data, vec![1]);
        assert_eq!(
            params.kind,
            vault::AddLiquidityKind::Unbalanced {
                exact_amounts_in: vec![U256::exp10(18) * 150, U256::zero(), U256::zero()],
                min_bpt_amount_out: U256::one(),
            }
        );

        let request: AddLiquidity = serde_json::from_value(json!({
            "recipient": "0x0101010101010101010101010101010101010101",
            "kind": "singleTokenExactOut",
            "tokenIn": "0x0202020202020202020202020202020202020202",
            "maxAmountIn": "100",
            "exactBptAmountOut": "10"
        }))
        .unwrap();
        assert!(request.user_data.is_empty());
        assert!(matches!(
            request.into_domain(H160::zero()).kind,
            vault::AddLiquidityKind::SingleTokenExactOut { token_in, .. } if token_in == H160([2; 20])
        ));

        assert!(
            serde_json::from_value::<AddLiquidity>(json!({
                "recipient": "0x0101010101010101010101010101010101010101",
                "kind": "swap",
                "amountsIn": []
            }))
            .is_err()
        );
    }

    #[test]
    fn remove_liquidity_kinds() {
        let request: RemoveLiquidity = serde_json::from_value(json!({
            "recipient": "0x0101010101010101010101010101010101010101",
            "kind": "proportional",
            "exactBptAmountIn": "50000000000000000000",
            "minAmountsOut": ["0", "0", "0"]
        }))
        .unwrap();
        assert_eq!(
            request.into_domain(H160::zero()).kind,
            vault::RemoveLiquidityKind::Proportional {
                exact_bpt_amount_in: U256::exp10(18) * 50,
                min_amounts_out: vec![U256::zero(); 3],
            }
        );

        let request: RemoveLiquidity = serde_json::from_value(json!({
            "recipient": "0x0101010101010101010101010101010101010101",
            "kind": "singleTokenExactOut",
            "tokenOut": "0x0202020202020202020202020202020202020202",
            "exactAmountOut": "5",
            "maxBptAmountIn": "7"
        }))
        .unwrap();
        assert_eq!(
            request.into_domain(H160::zero()).kind,
            vault::RemoveLiquidityKind::SingleTokenExactOut {
                token_out: H160([2; 20]),
                exact_amount_out: U256::from(5),
                max_bpt_amount_in: U256::from(7),
            }
        );
    }

    #[test]
    fn results_serialize_as_decimal_strings() {
        let result = AddLiquidityResult::from(vault::AddLiquidityResult {
            amounts_in: vec![U256::from(10), U256::zero()],
            bpt_amount_out: U256::from(20),
            swap_fee_amounts: vec![U256::one(), U256::zero()],
        });
        assert_eq!(
            serde_json::to_value(result).unwrap(),
            json!({
                "amountsIn": ["10", "0"],
                "bptAmountOut": "20",
                "swapFeeAmounts": ["1", "0"]
            })
        );
    }
}
