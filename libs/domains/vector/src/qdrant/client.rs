use std::collections::HashMap;
use std::time::Duration;

use async_trait::async_trait;
use qdrant_client::Qdrant;
use qdrant_client::qdrant::{self, PointId, SearchPointsBuilder, Value as QdrantValue};
use tracing::{debug, warn};
use uuid::Uuid;

use super::QdrantConfig;
use crate::error::{VectorError, VectorResult};
use crate::models::{SearchQuery, SearchResult};
use crate::repository::VectorRepository;

/// Qdrant-backed implementation of VectorRepository over one shared collection
pub struct QdrantRepository {
    client: Qdrant,
    collection: String,
}

impl QdrantRepository {
    /// Builds the client. The connection is opened lazily on first use.
    pub fn new(config: QdrantConfig) -> VectorResult<Self> {
        let mut builder = Qdrant::from_url(&config.url);

        if let Some(api_key) = config.api_key {
            builder = builder.api_key(api_key);
        }

        builder = builder.timeout(Duration::from_secs(config.timeout_secs));

        let client = builder
            .build()
            .map_err(|e| VectorError::Qdrant(format!("Failed to build client: {}", e)))?;

        Ok(Self {
            client,
            collection: config.collection,
        })
    }

    pub fn from_client(client: Qdrant, collection: impl Into<String>) -> Self {
        Self {
            client,
            collection: collection.into(),
        }
    }

    pub fn collection(&self) -> &str {
        &self.collection
    }
}

fn point_id_to_uuid(point_id: &PointId) -> VectorResult<Uuid> {
    match &point_id.point_id_options {
        Some(qdrant::point_id::PointIdOptions::Uuid(uuid_str)) => Uuid::parse_str(uuid_str)
            .map_err(|e| VectorError::Internal(format!("Invalid UUID: {}", e))),
        Some(qdrant::point_id::PointIdOptions::Num(num)) => Ok(Uuid::from_u128(*num as u128)),
        None => Err(VectorError::Internal("Missing point ID".to_string())),
    }
}

fn qdrant_to_payload(payload: HashMap<String, QdrantValue>) -> Option<serde_json::Value> {
    if payload.is_empty() {
        return None;
    }

    let map = payload
        .into_iter()
        .filter_map(|(key, val)| qdrant_value_to_json(val).map(|json| (key, json)))
        .collect::<serde_json::Map<_, _>>();

    Some(serde_json::Value::Object(map))
}

fn qdrant_value_to_json(val: QdrantValue) -> Option<serde_json::Value> {
    use qdrant::value::Kind;

    match val.kind {
        Some(Kind::NullValue(_)) => Some(serde_json::Value::Null),
        Some(Kind::BoolValue(b)) => Some(serde_json::Value::Bool(b)),
        Some(Kind::IntegerValue(i)) => Some(serde_json::Value::Number(i.into())),
        Some(Kind::DoubleValue(f)) => {
            serde_json::Number::from_f64(f).map(serde_json::Value::Number)
        }
        Some(Kind::StringValue(s)) => Some(serde_json::Value::String(s)),
        _ => None,
    }
}

#[async_trait]
impl VectorRepository for QdrantRepository {
    async fn search(&self, query: SearchQuery) -> VectorResult<Vec<SearchResult>> {
        if query.vector.is_empty() {
            return Err(VectorError::Validation(
                "query vector must not be empty".to_string(),
            ));
        }
        if query.limit == 0 {
            return Ok(vec![]);
        }

        let builder = SearchPointsBuilder::new(&self.collection, query.vector, query.limit)
            .with_payload(true);

        let response = self.client.search_points(builder).await?;
        debug!(
            collection = %self.collection,
            hits = response.result.len(),
            "Qdrant search completed"
        );

        let results = response
            .result
            .into_iter()
            .filter_map(|point| {
                let id = match point.id.as_ref().map(point_id_to_uuid) {
                    Some(Ok(id)) => id,
                    Some(Err(e)) => {
                        warn!(error = %e, "Skipping search hit with unusable id");
                        return None;
                    }
                    None => {
                        warn!("Skipping search hit without id");
                        return None;
                    }
                };

                Some(SearchResult {
                    id,
                    score: point.score,
                    payload: qdrant_to_payload(point.payload),
                })
            })
            .collect();

        Ok(results)
    }

    async fn health_check(&self) -> VectorResult<()> {
        self.client.health_check().await?;
        Ok(())
    }
}
