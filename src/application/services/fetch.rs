//! Overpass fetch service
//!
//! Builds the query for a bounding box, sends it through the transport and
//! parses the element list out of the response.

use std::sync::Arc;

use tracing::{debug, info};

use crate::application::{ApplicationError, ApplicationResult};
use crate::domain::{build_overpass_query, BoundingBox, FetchResult};
use crate::infrastructure::traits::OverpassTransport;

/// Service for retrieving OSM elements from an Overpass endpoint.
pub struct FetchService {
    transport: Arc<dyn OverpassTransport>,
    endpoint: String,
    query_timeout_secs: u32,
}

impl FetchService {
    /// Create a new fetch service.
    pub fn new(
        transport: Arc<dyn OverpassTransport>,
        endpoint: impl Into<String>,
        query_timeout_secs: u32,
    ) -> Self {
        Self {
            transport,
            endpoint: endpoint.into(),
            query_timeout_secs,
        }
    }

    pub fn endpoint(&self) -> &str {
        &self.endpoint
    }

    /// Fetch all elements inside `bbox`.
    ///
    /// Exactly one request is made; transport failures, non-success statuses
    /// and undecodable bodies are returned as errors without retrying.
    pub fn fetch(&self, bbox: &BoundingBox) -> ApplicationResult<FetchResult> {
        let query = build_overpass_query(bbox, self.query_timeout_secs);
        debug!("fetch: endpoint={}, bbox={}", self.endpoint, bbox);
        debug!("fetch: query:\n{}", query);

        let body = self
            .transport
            .post_query(&self.endpoint, &query)
            .map_err(|source| ApplicationError::Fetch {
                endpoint: self.endpoint.clone(),
                source,
            })?;
        debug!("fetch: received {} bytes", body.len());

        let result: FetchResult = serde_json::from_str(&body)
            .map_err(|source| ApplicationError::MalformedResponse { source })?;

        if let Some(remark) = result.remark() {
            info!("fetch: service remark: {}", remark);
        }
        debug!("fetch: parsed {} elements", result.elements.len());

        Ok(result)
    }
}
