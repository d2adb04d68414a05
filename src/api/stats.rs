// SPDX-License-Identifier: AGPL-3.0-or-later
//
// Copyright (C) 2026 HelpSP

//! Marketing stats endpoint.
//!
//! The counters are the fixed numbers shown on the landing page, not live
//! aggregates.

use axum::Json;
use serde::Serialize;
use utoipa::ToSchema;

/// Landing page counters.
#[derive(Debug, Clone, Serialize, ToSchema)]
#[serde(rename_all = "camelCase")]
pub struct StatsResponse {
    pub total_applications: u32,
    pub approved_applications: u32,
    pub total_sponsors: u32,
    pub total_funded: u64,
}

/// Fetch the landing page counters. Public.
#[utoipa::path(
    get,
    path = "/api/stats",
    tag = "Stats",
    responses(
        (status = 200, description = "Landing page counters", body = StatsResponse)
    )
)]
pub async fn get_stats() -> Json<StatsResponse> {
    Json(StatsResponse {
        total_applications: 100,
        approved_applications: 75,
        total_sponsors: 10,
        total_funded: 500_000,
    })
}

#[cfg(test)]
mod tests {
    use super::*;

    #[tokio::test]
    async fn counters_serialize_in_camel_case() {
        let Json(stats) = get_stats().await;
        let value = serde_json::to_value(&stats).unwrap();

        assert_eq!(value["totalApplications"], 100);
        assert_eq!(value["approvedApplications"], 75);
        assert_eq!(value["totalSponsors"], 10);
        assert_eq!(value["totalFunded"], 500000);
    }
}
