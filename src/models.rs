// SPDX-License-Identifier: AGPL-3.0-or-later
//
// Copyright (C) 2026 Relational Network

//! # Session Data Models
//!
//! Account credentials as they travel from the navigation URL into the
//! credential store, plus the currency selector read from `?account=`.
//!
//! ## Account Types
//!
//! Login ids starting with `VR` belong to demo (virtual) accounts. Every
//! other prefix (`CR`, `MF`, ...) is a real-money account.

use serde::{Deserialize, Serialize};

/// Login id prefix of demo (virtual) accounts.
pub const DEMO_PREFIX: &str = "VR";

/// Selector value that asks for the demo account.
pub const DEMO_SELECTOR: &str = "DEMO";

/// Fiat currencies accepted by the `account` selector.
pub const FIAT_CURRENCIES: &[&str] = &["USD", "EUR", "GBP", "AUD"];

/// Crypto currencies accepted by the `account` selector (upper-cased).
pub const CRYPTO_CURRENCIES: &[&str] = &[
    "TUSDT", "BTC", "ETH", "LTC", "UST", "EUSDT", "BUSD", "DAI", "EURS", "IDK", "PAX", "TUSD",
    "USDC", "USDK",
];

/// Returns true when the login id belongs to a demo account.
pub fn is_demo_login_id(login_id: &str) -> bool {
    login_id.starts_with(DEMO_PREFIX)
}

/// Returns true when `code` (any case) is in the fiat or crypto allow-list.
pub fn is_known_currency(code: &str) -> bool {
    let upper = code.to_ascii_uppercase();
    FIAT_CURRENCIES
        .iter()
        .chain(CRYPTO_CURRENCIES.iter())
        .any(|known| *known == upper)
}

// =============================================================================
// Account Credential
// =============================================================================

/// A single account credential: login id, bearer token and currency.
///
/// Serialized with the `loginid` field name used by the persisted
/// `clientAccounts` map and by the authorize API.
#[derive(Clone, Serialize, Deserialize, PartialEq, Eq)]
pub struct AccountCredential {
    #[serde(rename = "loginid")]
    pub login_id: String,
    pub token: String,
    #[serde(default)]
    pub currency: String,
}

impl AccountCredential {
    pub fn new(
        login_id: impl Into<String>,
        token: impl Into<String>,
        currency: impl Into<String>,
    ) -> Self {
        Self {
            login_id: login_id.into(),
            token: token.into(),
            currency: currency.into(),
        }
    }

    pub fn is_demo(&self) -> bool {
        is_demo_login_id(&self.login_id)
    }

    /// Case-insensitive currency comparison.
    pub fn has_currency(&self, currency: &str) -> bool {
        self.currency.eq_ignore_ascii_case(currency)
    }
}

impl std::fmt::Debug for AccountCredential {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("AccountCredential")
            .field("login_id", &self.login_id)
            .field("token", &"<redacted>")
            .field("currency", &self.currency)
            .finish()
    }
}

// =============================================================================
// Currency Selector
// =============================================================================

/// The `account` URL parameter, normalized.
///
/// Only two shapes are meaningful: the `DEMO` sentinel and a currency from
/// the allow-list. Anything else is treated as if the parameter was absent.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
#[serde(tag = "kind", content = "code", rename_all = "snake_case")]
pub enum CurrencySelector {
    Demo,
    Currency(String),
}

impl CurrencySelector {
    /// Parse a raw selector value; returns `None` for unrecognised input.
    pub fn parse(raw: &str) -> Option<Self> {
        let upper = raw.trim().to_ascii_uppercase();
        if upper == DEMO_SELECTOR {
            Some(CurrencySelector::Demo)
        } else if is_known_currency(&upper) {
            Some(CurrencySelector::Currency(upper))
        } else {
            None
        }
    }
}
