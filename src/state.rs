// SPDX-License-Identifier: AGPL-3.0-or-later
//
// Copyright (C) 2026 HelpSP

use std::sync::Arc;
use std::time::Instant;

use crate::auth::TokenCodec;
use crate::storage::Store;

/// Shared application state handed to every request handler.
#[derive(Clone)]
pub struct AppState {
    pub store: Store,
    pub tokens: Arc<TokenCodec>,
    pub started_at: Instant,
}

impl AppState {
    pub fn new(store: Store, tokens: TokenCodec) -> Self {
        Self {
            store,
            tokens: Arc::new(tokens),
            started_at: Instant::now(),
        }
    }
}
