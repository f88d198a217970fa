// SPDX-License-Identifier: AGPL-3.0-or-later
//
// Copyright (C) 2026 Relational Network

//! URL credential extraction.
//!
//! The OAuth redirect carries one triple per account:
//!
//! ```text
//! /callback?acct1=CR100&token1=a1-xxx&cur1=usd&acct2=VRTC200&token2=a1-yyy&cur2=usd&account=USD
//! ```
//!
//! Parsing is tolerant: anything that does not form a complete
//! `acctN` + `tokenN` pair is dropped. Extraction has no side effects; the
//! caller purges the consumed keys once merging is done.

use std::collections::BTreeMap;

use url::Url;

use crate::models::{AccountCredential, CurrencySelector};

/// Query parameter carrying the currency / demo selector.
pub const ACCOUNT_SELECTOR_PARAM: &str = "account";

/// Query parameter purged unconditionally after bootstrap.
pub const LANG_PARAM: &str = "lang";

/// Credentials and selector read from one navigation URL.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct UrlCredentialBatch {
    /// Ordered by account index (`acct1` first), one entry per login id.
    pub credentials: Vec<AccountCredential>,
    pub selector: Option<CurrencySelector>,
    /// Keys to strip from the visible URL afterwards.
    pub params_to_delete: Vec<String>,
}

impl UrlCredentialBatch {
    pub fn is_empty(&self) -> bool {
        self.credentials.is_empty()
    }

    /// First credential by arrival order: the default active candidate.
    pub fn first(&self) -> Option<&AccountCredential> {
        self.credentials.first()
    }

    /// Credential in the batch with this login id (ids are unique).
    pub fn find(&self, login_id: &str) -> Option<&AccountCredential> {
        self.credentials.iter().find(|c| c.login_id == login_id)
    }
}

#[derive(Default)]
struct PartialCredential {
    login_id: Option<String>,
    token: Option<String>,
    currency: Option<String>,
}

enum Field {
    Account,
    Token,
    Currency,
}

/// Split `acct3` into (`Account`, 3). Index must be a positive decimal.
fn classify(key: &str) -> Option<(Field, usize)> {
    let (field, digits) = if let Some(rest) = key.strip_prefix("acct") {
        (Field::Account, rest)
    } else if let Some(rest) = key.strip_prefix("token") {
        (Field::Token, rest)
    } else if let Some(rest) = key.strip_prefix("cur") {
        (Field::Currency, rest)
    } else {
        return None;
    };

    if digits.is_empty() || !digits.bytes().all(|b| b.is_ascii_digit()) {
        return None;
    }
    match digits.parse::<usize>() {
        Ok(index) if index > 0 => Some((field, index)),
        _ => None,
    }
}

/// Read the credential batch and selector from `url`.
pub fn extract(url: &Url) -> UrlCredentialBatch {
    let mut entries: BTreeMap<usize, PartialCredential> = BTreeMap::new();
    let mut params_to_delete: Vec<String> = Vec::new();
    let mut selector_raw: Option<String> = None;

    for (key, value) in url.query_pairs() {
        if key == ACCOUNT_SELECTOR_PARAM {
            // Single-valued: the first occurrence wins.
            selector_raw.get_or_insert_with(|| value.to_string());
            continue;
        }

        let Some((field, index)) = classify(&key) else {
            continue;
        };

        if !params_to_delete.iter().any(|k| k.as_str() == &*key) {
            params_to_delete.push(key.to_string());
        }

        let value = value.trim().to_string();
        if value.is_empty() {
            continue;
        }

        let entry = entries.entry(index).or_default();
        match field {
            Field::Account => entry.login_id = Some(value),
            Field::Token => entry.token = Some(value),
            Field::Currency => entry.currency = Some(value),
        }
    }

    // Repeated login ids collapse into one entry: the last credential wins
    // and keeps the slot of the first occurrence.
    let mut credentials: Vec<AccountCredential> = Vec::new();
    for entry in entries.into_values() {
        let (Some(login_id), Some(token)) = (entry.login_id, entry.token) else {
            continue;
        };
        let credential = AccountCredential {
            login_id,
            token,
            currency: entry.currency.unwrap_or_default(),
        };
        match credentials
            .iter_mut()
            .find(|existing| existing.login_id == credential.login_id)
        {
            Some(existing) => *existing = credential,
            None => credentials.push(credential),
        }
    }

    UrlCredentialBatch {
        credentials,
        selector: selector_raw.as_deref().and_then(CurrencySelector::parse),
        params_to_delete,
    }
}

/// Return `url` without the given query keys.
///
/// The query is dropped entirely when nothing remains.
pub fn purge_params(url: &Url, keys: &[String]) -> Url {
    let kept: Vec<(String, String)> = url
        .query_pairs()
        .filter(|(key, _)| !keys.iter().any(|k| k.as_str() == &*key))
        .map(|(key, value)| (key.into_owned(), value.into_owned()))
        .collect();

    let mut cleaned = url.clone();
    if kept.is_empty() {
        cleaned.set_query(None);
    } else {
        cleaned.query_pairs_mut().clear().extend_pairs(kept);
    }
    cleaned
}

#[cfg(test)]
mod tests {
    use super::*;

    fn url(raw: &str) -> Url {
        Url::parse(raw).unwrap()
    }

    #[test]
    fn extracts_ordered_credentials() {
        let batch = extract(&url(
            "https://bot.example/callback?acct2=VRTC2&token2=t2&cur2=USD&acct1=CR1&token1=t1&cur1=usd",
        ));

        assert_eq!(
            batch.credentials,
            vec![
                AccountCredential::new("CR1", "t1", "usd"),
                AccountCredential::new("VRTC2", "t2", "USD"),
            ]
        );
        assert_eq!(batch.first().unwrap().login_id, "CR1");
        assert_eq!(batch.selector, None);
    }

    #[test]
    fn drops_incomplete_entries_but_purges_their_keys() {
        let batch = extract(&url(
            "https://bot.example/?acct1=CR1&cur1=USD&acct2=CR2&token2=t2&token3=orphan&lang=es",
        ));

        assert_eq!(batch.credentials, vec![AccountCredential::new("CR2", "t2", "")]);
        assert_eq!(
            batch.params_to_delete,
            vec!["acct1", "cur1", "acct2", "token2", "token3"]
        );
    }

    #[test]
    fn ignores_malformed_keys() {
        let batch = extract(&url(
            "https://bot.example/?acct0=CR0&token0=t0&acctX=CR9&tokenX=t9&acct=CR8&token=t8&acct01=CR1&token01=t1",
        ));

        // `01` is a valid positive index, the others are not.
        assert_eq!(batch.credentials, vec![AccountCredential::new("CR1", "t1", "")]);
        assert!(!batch.params_to_delete.contains(&"acct0".to_string()));
        assert!(!batch.params_to_delete.contains(&"acctX".to_string()));
    }

    #[test]
    fn missing_currency_defaults_to_empty() {
        let batch = extract(&url("https://bot.example/?acct1=CR1&token1=t1"));
        assert_eq!(batch.credentials[0].currency, "");
    }

    #[test]
    fn selector_is_normalized_and_validated() {
        let demo = extract(&url("https://bot.example/?account=demo"));
        assert_eq!(demo.selector, Some(CurrencySelector::Demo));

        let btc = extract(&url("https://bot.example/?account=btc&account=USD"));
        assert_eq!(btc.selector, Some(CurrencySelector::Currency("BTC".into())));

        let unknown = extract(&url("https://bot.example/?account=monopoly"));
        assert_eq!(unknown.selector, None);

        assert!(!btc.params_to_delete.contains(&"account".to_string()));
    }

    #[test]
    fn empty_url_gives_empty_batch() {
        let batch = extract(&url("https://bot.example/"));
        assert!(batch.is_empty());
        assert!(batch.params_to_delete.is_empty());
    }

    #[test]
    fn repeated_login_id_keeps_last_credential_in_first_slot() {
        let batch = extract(&url(
            "https://bot.example/?acct1=CR1&token1=old&cur1=USD&acct2=VR1&token2=v&acct3=CR1&token3=new&cur3=EUR",
        ));

        assert_eq!(
            batch.credentials,
            vec![
                AccountCredential::new("CR1", "new", "EUR"),
                AccountCredential::new("VR1", "v", ""),
            ]
        );
        assert_eq!(batch.find("CR1").unwrap().token, "new");
        assert!(batch.find("CR9").is_none());
    }

    #[test]
    fn purge_keeps_unrelated_params() {
        let original = url("https://bot.example/app?acct1=CR1&token1=t1&lang=es&account=USD");
        let cleaned = purge_params(
            &original,
            &["acct1".to_string(), "token1".to_string(), "lang".to_string()],
        );
        assert_eq!(cleaned.as_str(), "https://bot.example/app?account=USD");
    }

    #[test]
    fn purge_drops_empty_query() {
        let original = url("https://bot.example/app?acct1=CR1&token1=t1#top");
        let cleaned = purge_params(&original, &["acct1".to_string(), "token1".to_string()]);
        assert_eq!(cleaned.as_str(), "https://bot.example/app#top");
    }
}
