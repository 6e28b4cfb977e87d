use crate::config::AppConfig;
use crate::types::Region;
use anyhow::Result;
use axum::{
    extract::{Query, State},
    response::Json,
    routing::get,
    Router,
};
use geo::algorithm::bounding_rect::BoundingRect;
use geo::algorithm::contains::Contains;
use geo::{Point, Rect};
use rstar::{RTree, RTreeObject, AABB};
use serde::{Deserialize, Serialize};
use std::net::SocketAddr;
use std::sync::Arc;
use tower_http::cors::CorsLayer;
use tower_http::services::ServeDir;
use tracing::debug;

// Wrapper for RTree indexing
struct RegionEnvelope {
    index: usize,
    aabb: AABB<[f64; 2]>,
}

impl RTreeObject for RegionEnvelope {
    type Envelope = AABB<[f64; 2]>;
    fn envelope(&self) -> Self::Envelope {
        self.aabb
    }
}

pub struct AppState {
    pub regions: Vec<Region>,
    pub tree: RTree<RegionEnvelope>,
}

#[derive(Deserialize)]
pub struct LookupParams {
    lat: f64,
    lon: f64,
}

/// Popup payload for the region under a point. The lookup is informational
/// only: there is no navigation target, clicking goes nowhere.
#[derive(Serialize)]
pub struct LookupResponse {
    name: String,
    interactive: bool,
}

pub async fn start_server(config: AppConfig, regions: Vec<Region>) -> Result<()> {
    println!("Building spatial index for {} regions...", regions.len());
    let envelopes: Vec<RegionEnvelope> = regions
        .iter()
        .enumerate()
        .map(|(i, region)| {
            let rect = region.geometry.bounding_rect().unwrap_or(Rect::new(
                geo::Coord { x: 0.0, y: 0.0 },
                geo::Coord { x: 0.0, y: 0.0 },
            ));
            RegionEnvelope {
                index: i,
                aabb: AABB::from_corners(
                    [rect.min().x, rect.min().y],
                    [rect.max().x, rect.max().y],
                ),
            }
        })
        .collect();

    let tree = RTree::bulk_load(envelopes);

    let state = Arc::new(AppState { regions, tree });

    let port = config.server.port;
    let addr = SocketAddr::from(([127, 0, 0, 1], port));

    println!("Starting server on http://{}", addr);

    let site_service = ServeDir::new(&config.output.site_dir);

    let app = Router::new()
        .route("/api/region", get(lookup_handler))
        .fallback_service(site_service)
        .layer(CorsLayer::permissive())
        .with_state(state);

    let listener = tokio::net::TcpListener::bind(addr).await?;
    axum::serve(listener, app).await?;
    Ok(())
}

async fn lookup_handler(
    State(state): State<Arc<AppState>>,
    Query(params): Query<LookupParams>,
) -> Json<Option<LookupResponse>> {
    let point = Point::new(params.lon, params.lat);
    let envelope = AABB::from_point([params.lon, params.lat]);

    let candidates = state.tree.locate_in_envelope_intersecting(&envelope);

    for candidate in candidates {
        if let Some(region) = state.regions.get(candidate.index) {
            if region.geometry.contains(&point) {
                debug!(state = %region.name, "region lookup");
                return Json(Some(LookupResponse {
                    name: region.name.clone(),
                    interactive: region.is_interactive(),
                }));
            }
        }
    }

    Json(None)
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::types::Interactivity;
    use geo::{polygon, MultiPolygon};

    fn delhi() -> Region {
        Region {
            name: "Delhi".to_string(),
            geometry: MultiPolygon::new(vec![polygon![
                (x: 76.8, y: 28.4),
                (x: 77.3, y: 28.4),
                (x: 77.3, y: 28.9),
                (x: 76.8, y: 28.9),
                (x: 76.8, y: 28.4),
            ]]),
            interactivity: Interactivity::Interactive,
        }
    }

    fn build_state(regions: Vec<Region>) -> AppState {
        let envelopes: Vec<RegionEnvelope> = regions
            .iter()
            .enumerate()
            .map(|(i, region)| {
                let rect = region.geometry.bounding_rect().unwrap();
                RegionEnvelope {
                    index: i,
                    aabb: AABB::from_corners(
                        [rect.min().x, rect.min().y],
                        [rect.max().x, rect.max().y],
                    ),
                }
            })
            .collect();
        AppState {
            tree: RTree::bulk_load(envelopes),
            regions,
        }
    }

    #[tokio::test]
    async fn lookup_hits_the_containing_region() {
        let state = Arc::new(build_state(vec![delhi()]));
        let Json(response) = lookup_handler(
            State(state),
            Query(LookupParams { lat: 28.61, lon: 77.20 }),
        )
        .await;

        let hit = response.unwrap();
        assert_eq!(hit.name, "Delhi");
        assert!(hit.interactive);
    }

    #[tokio::test]
    async fn lookup_misses_outside_all_regions() {
        let state = Arc::new(build_state(vec![delhi()]));
        let Json(response) = lookup_handler(
            State(state),
            Query(LookupParams { lat: 8.5, lon: 76.9 }),
        )
        .await;

        assert!(response.is_none());
    }
}
