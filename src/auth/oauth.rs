// SPDX-License-Identifier: AGPL-3.0-or-later
//
// Copyright (C) 2026 Relational Network

//! OAuth login entry point.
//!
//! The login shell sends the user to the OAuth authorize page. After login
//! the provider redirects to `redirect_uri` with the account credentials in
//! the query string (`acct1`, `token1`, `cur1`, ...), which is exactly what
//! the URL credential extractor consumes.

use url::Url;

/// Build the OAuth authorize URL for the login shell.
pub fn login_url(oauth_url: &Url, app_id: &str, language: &str, redirect_uri: &Url) -> Url {
    let mut url = oauth_url.clone();
    url.query_pairs_mut()
        .append_pair("app_id", app_id)
        .append_pair("l", &language.to_ascii_lowercase())
        .append_pair("redirect_uri", redirect_uri.as_str());
    url
}
