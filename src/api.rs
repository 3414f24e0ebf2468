//! REST API for the warehouse placement service.
//!
//! Provides HTTP endpoints for communication with the frontend.
//! Uses Axum as the web framework and supports CORS.

use axum::extract::rejection::JsonRejection;
use axum::extract::{Json, State};
use axum::response::sse::{Event, KeepAlive, Sse};
use axum::{
    Router,
    http::{StatusCode, Uri, header},
    response::{Html, IntoResponse, Response},
    routing::{get, post},
};
use rand::SeedableRng;
use rand::rngs::SmallRng;
use rust_embed::RustEmbed;
use serde::{Deserialize, Serialize};
#[allow(unused_imports)]
use serde_json::json;
use std::sync::OnceLock;
use tokio::sync::mpsc;
use tokio_stream::StreamExt;
use tokio_stream::wrappers::ReceiverStream;
use tower_http::cors::{Any, CorsLayer};
use utoipa::{OpenApi, ToSchema};

use crate::config::ApiConfig;
use crate::generator::{GeneratorConfig, random_fleet};
use crate::model::{PackingSession, Robot, ValidationError};
use crate::optimizer::{
    Algorithm, PackingConfig, PackingResult, PlacementStats, pack_with_config, pack_with_progress,
};
use crate::types::GridPoint;

/// Grid sizes the product accepts; the engine itself takes any positive
/// size, the range policy lives here at the boundary.
const GRID_SIZE_MIN: usize = 5;
const GRID_SIZE_MAX: usize = 50;

#[derive(Clone)]
struct ApiState {
    packing: PackingConfig,
    generator: GeneratorConfig,
}

static OPENAPI_DOC: OnceLock<utoipa::openapi::OpenApi> = OnceLock::new();

const SWAGGER_UI_HTML: &str = r##"<!DOCTYPE html>
<html lang="en">
    <head>
        <meta charset="utf-8" />
        <title>gridstow API Docs</title>
        <link
            rel="stylesheet"
            href="https://unpkg.com/swagger-ui-dist@5.17.14/swagger-ui.css"
            integrity="sha384-wxLW6kwyHktdDGr6Pv1zgm/VGJh99lfUbzSn6HNHBENZlCN7W602k9VkGdxuFvPn"
            crossorigin="anonymous"
        />
    </head>
    <body>
        <div id="swagger-ui"></div>
        <script
            src="https://unpkg.com/swagger-ui-dist@5.17.14/swagger-ui-bundle.js"
            integrity="sha384-wmyclcVGX/WhUkdkATwhaK1X1JtiNrr2EoYJ+diV3vj4v6OC5yCeSu+yW13SYJep"
            crossorigin="anonymous"
        ></script>
        <script
            src="https://unpkg.com/swagger-ui-dist@5.17.14/swagger-ui-standalone-preset.js"
            integrity="sha384-2YH8WDRaj7V2OqU/trsmzSagmk/E2SutiCsGkdgoQwC9pNUJV1u/141DHB6jgs8t"
            crossorigin="anonymous"
        ></script>
        <script>
            window.onload = function () {
                const ui = SwaggerUIBundle({
                    url: "/docs/openapi.json",
                    dom_id: "#swagger-ui",
                    presets: [SwaggerUIBundle.presets.apis, SwaggerUIStandalonePreset],
                    layout: "StandaloneLayout",
                });
                window.ui = ui;
            };
        </script>
    </body>
    </html>"##;

fn openapi_doc() -> &'static utoipa::openapi::OpenApi {
    OPENAPI_DOC.get_or_init(ApiDoc::openapi)
}

/// Embedded Web Assets (HTML, CSS, JS)
#[derive(RustEmbed)]
#[folder = "web/"]
struct WebAssets;

/// One robot record as submitted by the caller.
#[derive(Deserialize, Clone, ToSchema)]
pub struct RobotSpec {
    pub id: String,
    pub width: usize,
    pub height: usize,
    #[serde(default)]
    pub defective: bool,
}

impl RobotSpec {
    fn into_robot(self) -> Result<Robot, ValidationError> {
        Robot::new(self.id, self.width, self.height, self.defective)
    }
}

/// Request structure for the placement endpoints.
#[derive(Deserialize, ToSchema)]
#[serde(rename_all = "camelCase")]
#[schema(
    example = json!({
        "gridSize": 10,
        "robots": [
            { "id": "robot_01", "width": 2, "height": 1 },
            { "id": "robot_02", "width": 1, "height": 3 }
        ],
        "algorithm": "bestFit",
        "autoExpand": true
    })
)]
pub struct PackRequest {
    pub grid_size: usize,
    pub robots: Vec<RobotSpec>,
    #[serde(default)]
    #[schema(nullable = true)]
    pub algorithm: Option<String>,
    #[serde(default)]
    #[schema(nullable = true)]
    pub auto_expand: Option<bool>,
}

#[derive(Debug)]
struct ValidatedPackRequest {
    grid_size: usize,
    robots: Vec<Robot>,
    algorithm: Algorithm,
    auto_expand: Option<bool>,
}

impl ValidatedPackRequest {
    fn robot_count(&self) -> usize {
        self.robots.len()
    }
}

#[derive(Debug)]
enum PackRequestValidationError {
    GridSizeOutOfRange(usize),
    InvalidRobot(ValidationError),
}

impl PackRequest {
    fn into_validated(self) -> Result<ValidatedPackRequest, PackRequestValidationError> {
        if !(GRID_SIZE_MIN..=GRID_SIZE_MAX).contains(&self.grid_size) {
            return Err(PackRequestValidationError::GridSizeOutOfRange(
                self.grid_size,
            ));
        }

        let robots = self
            .robots
            .into_iter()
            .map(RobotSpec::into_robot)
            .collect::<Result<Vec<_>, ValidationError>>()
            .map_err(PackRequestValidationError::InvalidRobot)?;

        // Unknown or missing selectors fall back to best-fit.
        let algorithm = self
            .algorithm
            .as_deref()
            .map(Algorithm::from_name)
            .unwrap_or_default();

        Ok(ValidatedPackRequest {
            grid_size: self.grid_size,
            robots,
            algorithm,
            auto_expand: self.auto_expand,
        })
    }
}

/// A robot that received a position in this pass.
#[derive(Serialize, ToSchema)]
#[serde(rename_all = "camelCase")]
pub struct RobotPlacement {
    pub id: String,
    pub width: usize,
    pub height: usize,
    pub x: usize,
    pub y: usize,
    pub placed: bool,
    pub defective: bool,
}

/// A robot that stayed unplaced, with the reason.
#[derive(Serialize, ToSchema)]
#[serde(rename_all = "camelCase")]
pub struct RobotRejection {
    pub id: String,
    pub width: usize,
    pub height: usize,
    pub placed: bool,
    pub defective: bool,
    pub reason_code: String,
    pub reason: String,
}

/// Response structure for the /pack endpoint.
///
/// `grid_size` is the final edge length, after any auto-expansion.
#[derive(Serialize, ToSchema)]
#[serde(rename_all = "camelCase")]
pub struct PackResponse {
    pub grid_size: usize,
    pub placed: Vec<RobotPlacement>,
    pub unplaced: Vec<RobotRejection>,
    pub is_complete: bool,
    pub statistics: PlacementStats,
}

impl PackResponse {
    /// Builds the response from a finished packing pass.
    pub fn from_packing_result(result: PackingResult) -> Self {
        let PackingResult {
            session,
            unplaced,
            stats,
        } = result;

        let placed = session
            .robots()
            .iter()
            .filter_map(|robot| {
                robot.position.map(|pos| RobotPlacement {
                    id: robot.id.clone(),
                    width: robot.width,
                    height: robot.height,
                    x: pos.x,
                    y: pos.y,
                    placed: true,
                    defective: robot.defective,
                })
            })
            .collect();

        let unplaced = unplaced
            .into_iter()
            .map(|entry| RobotRejection {
                id: entry.robot.id,
                width: entry.robot.width,
                height: entry.robot.height,
                placed: false,
                defective: entry.robot.defective,
                reason_code: entry.reason.code().to_string(),
                reason: entry.reason.to_string(),
            })
            .collect();

        Self {
            grid_size: session.grid_size(),
            placed,
            unplaced,
            is_complete: stats.placed_robots == stats.total_robots,
            statistics: stats,
        }
    }
}

/// Footprint block of an exported robot.
#[derive(Serialize, ToSchema)]
pub struct ExportDimensions {
    pub width: usize,
    pub height: usize,
}

/// Grid size block of an exported layout.
#[derive(Serialize, ToSchema)]
pub struct ExportGridSize {
    pub width: usize,
    pub height: usize,
}

/// One placed robot in the exported layout.
#[derive(Serialize, ToSchema)]
pub struct ExportRobot {
    pub id: String,
    pub dimensions: ExportDimensions,
    pub position: GridPoint,
    pub defective: bool,
}

/// Downloadable layout document: placed robots plus statistics and an
/// ISO 8601 generation timestamp.
#[derive(Serialize, ToSchema)]
#[serde(rename_all = "camelCase")]
pub struct ExportLayout {
    pub grid_size: ExportGridSize,
    pub robots: Vec<ExportRobot>,
    pub statistics: PlacementStats,
    pub timestamp: String,
}

impl ExportLayout {
    /// Builds the export document from a finished packing pass.
    pub fn from_packing_result(result: &PackingResult) -> Self {
        let size = result.grid_size();
        let robots = result
            .session
            .robots()
            .iter()
            .filter_map(|robot| {
                robot.position.map(|pos| ExportRobot {
                    id: robot.id.clone(),
                    dimensions: ExportDimensions {
                        width: robot.width,
                        height: robot.height,
                    },
                    position: pos,
                    defective: robot.defective,
                })
            })
            .collect();

        Self {
            grid_size: ExportGridSize {
                width: size,
                height: size,
            },
            robots,
            statistics: result.stats,
            timestamp: jiff::Timestamp::now().to_string(),
        }
    }
}

/// One generated robot, in the same shape the placement endpoints accept.
#[derive(Serialize, ToSchema)]
pub struct GeneratedRobot {
    pub id: String,
    pub width: usize,
    pub height: usize,
    pub defective: bool,
}

#[derive(Serialize, ToSchema)]
struct ErrorResponse {
    error: String,
    details: String,
}

impl ErrorResponse {
    fn new(error: impl Into<String>, details: impl Into<String>) -> Self {
        Self {
            error: error.into(),
            details: details.into(),
        }
    }
}

fn error_response(
    status: StatusCode,
    error: impl Into<String>,
    details: impl Into<String>,
) -> Response {
    (status, Json(ErrorResponse::new(error, details))).into_response()
}

fn json_deserialize_error(err: JsonRejection) -> Response {
    error_response(
        StatusCode::UNPROCESSABLE_ENTITY,
        "Invalid JSON data",
        err.to_string(),
    )
}

fn validation_error(details: impl Into<String>) -> Response {
    error_response(
        StatusCode::UNPROCESSABLE_ENTITY,
        "Invalid input data",
        details,
    )
}

fn parse_pack_request(
    payload: Result<Json<PackRequest>, JsonRejection>,
) -> Result<ValidatedPackRequest, Response> {
    let Json(payload) = match payload {
        Ok(payload) => payload,
        Err(err) => return Err(json_deserialize_error(err)),
    };

    match payload.into_validated() {
        Ok(validated) => Ok(validated),
        Err(PackRequestValidationError::GridSizeOutOfRange(size)) => Err(validation_error(format!(
            "Grid size must be between {} and {}, got: {}",
            GRID_SIZE_MIN, GRID_SIZE_MAX, size
        ))),
        Err(PackRequestValidationError::InvalidRobot(err)) => {
            Err(validation_error(err.to_string()))
        }
    }
}

/// Builds the packing session, surfacing fleet-level validation failures
/// (duplicate ids) as 422 responses.
fn build_session(request: &ValidatedPackRequest) -> Result<PackingSession, Response> {
    PackingSession::new(request.grid_size, request.robots.clone())
        .map_err(|err| validation_error(err.to_string()))
}

fn effective_packing_config(base: PackingConfig, auto_expand: Option<bool>) -> PackingConfig {
    let mut config = base;
    if let Some(auto_expand) = auto_expand {
        config.auto_expand = auto_expand;
    }
    config
}

#[derive(OpenApi)]
#[openapi(
    paths(handle_pack, handle_pack_stream, handle_export, handle_random_fleet),
    components(
        schemas(
            PackRequest,
            RobotSpec,
            PackResponse,
            RobotPlacement,
            RobotRejection,
            PlacementStats,
            ExportLayout,
            ExportRobot,
            ExportDimensions,
            ExportGridSize,
            GridPoint,
            GeneratedRobot,
            ErrorResponse
        )
    ),
    tags((name = "placement", description = "Endpoints for warehouse grid placement"))
)]
struct ApiDoc;

/// Starts the API server.
///
/// Configures CORS for cross-origin requests from the frontend.
/// Blocks until the server is terminated.
pub async fn start_api_server(
    config: ApiConfig,
    packing: PackingConfig,
    generator: GeneratorConfig,
) {
    let cors = CorsLayer::new()
        .allow_methods(Any)
        .allow_origin(Any)
        .allow_headers(Any);

    let state = ApiState { packing, generator };

    let app = Router::new()
        // API endpoints
        .route("/pack", post(handle_pack))
        .route("/pack_stream", post(handle_pack_stream))
        .route("/export", post(handle_export))
        .route("/robots/random", get(handle_random_fleet))
        // API documentation
        .route("/docs/openapi.json", get(serve_openapi_json))
        .route("/docs", get(serve_openapi_ui))
        // Web-UI (embedded)
        .route("/", get(serve_index))
        .route("/{*path}", get(serve_static))
        .layer(cors)
        .with_state(state);

    let addr = config.socket_addr();
    let listener = match tokio::net::TcpListener::bind(addr).await {
        Ok(listener) => listener,
        Err(err) => {
            panic!("❌ Could not bind API server to {}: {}", addr, err);
        }
    };

    let display_host = config.display_host().to_string();
    println!(
        "🚀 Server running on http://{}:{}",
        display_host,
        config.port()
    );
    if config.binds_to_all_interfaces() {
        println!("💡 Local access: http://localhost:{}", config.port());
    }
    println!("📦 API Endpoints:");
    println!("   - POST /pack");
    println!("   - POST /pack_stream");
    println!("   - POST /export");
    println!("   - GET /robots/random");
    println!("📑 Documentation:");
    println!("   - GET /docs");
    println!("   - GET /docs/openapi.json");
    println!("🌐 Web-UI: http://{}:{}", display_host, config.port());

    if let Err(err) = axum::serve(listener, app).await {
        eprintln!("❌ API server terminated with an error: {err}");
    }
}

/// Handler for POST /pack endpoint.
///
/// Runs one placement pass over the submitted fleet and returns the
/// resulting positions and statistics.
#[utoipa::path(
    post,
    path = "/pack",
    request_body = PackRequest,
    responses(
        (status = 200, description = "Placement pass finished", body = PackResponse),
        (
            status = UNPROCESSABLE_ENTITY,
            description = "Invalid request data",
            body = ErrorResponse
        )
    ),
    tag = "placement"
)]
async fn handle_pack(
    State(state): State<ApiState>,
    payload: Result<Json<PackRequest>, JsonRejection>,
) -> impl IntoResponse {
    let request = match parse_pack_request(payload) {
        Ok(request) => request,
        Err(response) => return response,
    };
    let session = match build_session(&request) {
        Ok(session) => session,
        Err(response) => return response,
    };

    println!(
        "📥 New placement request: {} robots on a {}x{} grid ({})",
        request.robot_count(),
        request.grid_size,
        request.grid_size,
        request.algorithm.as_str()
    );

    let config = effective_packing_config(state.packing, request.auto_expand);
    let result = pack_with_config(session, request.algorithm, config);
    println!(
        "📦 Result: {}/{} robots placed, utilization {}%",
        result.placed_count(),
        result.stats.total_robots,
        result.stats.utilization
    );

    let response = PackResponse::from_packing_result(result);
    (StatusCode::OK, Json(response)).into_response()
}

/// Handler for POST /pack_stream endpoint (SSE).
///
/// Streams placement events in real-time as Server-Sent Events
/// (text/event-stream). The frontend can animate each step without
/// waiting for the complete result.
#[utoipa::path(
    post,
    path = "/pack_stream",
    request_body = PackRequest,
    responses(
        (
            status = 200,
            description = "Streams placement events in real-time",
            content_type = "text/event-stream",
            body = String
        ),
        (
            status = UNPROCESSABLE_ENTITY,
            description = "Invalid request data",
            body = ErrorResponse
        )
    ),
    tag = "placement"
)]
async fn handle_pack_stream(
    State(state): State<ApiState>,
    payload: Result<Json<PackRequest>, JsonRejection>,
) -> impl IntoResponse {
    let request = match parse_pack_request(payload) {
        Ok(request) => request,
        Err(response) => return response,
    };
    let session = match build_session(&request) {
        Ok(session) => session,
        Err(response) => return response,
    };

    let config = effective_packing_config(state.packing, request.auto_expand);
    let algorithm = request.algorithm;
    let (tx, rx) = mpsc::channel::<String>(32);

    tokio::task::spawn_blocking(move || {
        let _ = pack_with_progress(session, algorithm, config, |event| {
            if let Ok(json) = serde_json::to_string(event) {
                // A closed receiver discards the remaining events.
                let _ = tx.blocking_send(json);
            }
        });
    });

    let stream = ReceiverStream::new(rx)
        .map(|msg| Ok::<_, std::convert::Infallible>(Event::default().data(msg)));
    Sse::new(stream)
        .keep_alive(
            KeepAlive::new()
                .interval(std::time::Duration::from_secs(10))
                .text("keep-alive"),
        )
        .into_response()
}

/// Handler for POST /export endpoint.
///
/// Runs a placement pass and returns the downloadable layout document
/// with placed robots, statistics and a generation timestamp.
#[utoipa::path(
    post,
    path = "/export",
    request_body = PackRequest,
    responses(
        (status = 200, description = "Layout document", body = ExportLayout),
        (
            status = UNPROCESSABLE_ENTITY,
            description = "Invalid request data",
            body = ErrorResponse
        )
    ),
    tag = "placement"
)]
async fn handle_export(
    State(state): State<ApiState>,
    payload: Result<Json<PackRequest>, JsonRejection>,
) -> impl IntoResponse {
    let request = match parse_pack_request(payload) {
        Ok(request) => request,
        Err(response) => return response,
    };
    let session = match build_session(&request) {
        Ok(session) => session,
        Err(response) => return response,
    };

    let config = effective_packing_config(state.packing, request.auto_expand);
    let result = pack_with_config(session, request.algorithm, config);
    let layout = ExportLayout::from_packing_result(&result);
    (StatusCode::OK, Json(layout)).into_response()
}

/// Handler for GET /robots/random endpoint.
///
/// Returns a freshly generated fleet in the request shape, ready to be
/// fed back into the placement endpoints.
#[utoipa::path(
    get,
    path = "/robots/random",
    responses(
        (status = 200, description = "Generated fleet", body = [GeneratedRobot])
    ),
    tag = "placement"
)]
async fn handle_random_fleet(State(state): State<ApiState>) -> impl IntoResponse {
    let mut rng = SmallRng::from_os_rng();
    let fleet = random_fleet(&state.generator, &mut rng);

    let robots: Vec<GeneratedRobot> = fleet
        .into_iter()
        .map(|robot| GeneratedRobot {
            id: robot.id,
            width: robot.width,
            height: robot.height,
            defective: robot.defective,
        })
        .collect();

    (StatusCode::OK, Json(robots)).into_response()
}

/// Serves the index.html main page
async fn serve_index() -> Response {
    match WebAssets::get("index.html") {
        Some(content) => Html(content.data).into_response(),
        None => (StatusCode::NOT_FOUND, "404 Not Found").into_response(),
    }
}

/// Serves static assets (JS, CSS, etc.)
async fn serve_static(uri: Uri) -> Response {
    let path = uri.path().trim_start_matches('/');

    match WebAssets::get(path) {
        Some(content) => {
            let mime = mime_guess::from_path(path).first_or_octet_stream();
            ([(header::CONTENT_TYPE, mime.as_ref())], content.data).into_response()
        }
        None => (StatusCode::NOT_FOUND, "404 Not Found").into_response(),
    }
}

async fn serve_openapi_json(State(_state): State<ApiState>) -> impl IntoResponse {
    Json(openapi_doc())
}

async fn serve_openapi_ui(State(_state): State<ApiState>) -> impl IntoResponse {
    Html(SWAGGER_UI_HTML)
}

#[cfg(test)]
mod tests {
    use super::*;

    fn spec(id: &str, width: usize, height: usize) -> RobotSpec {
        RobotSpec {
            id: id.to_string(),
            width,
            height,
            defective: false,
        }
    }

    fn request(grid_size: usize, robots: Vec<RobotSpec>) -> PackRequest {
        PackRequest {
            grid_size,
            robots,
            algorithm: None,
            auto_expand: None,
        }
    }

    #[test]
    fn openapi_doc_lists_expected_paths() {
        let doc = openapi_doc();
        let paths = &doc.paths.paths;
        for path in ["/pack", "/pack_stream", "/export", "/robots/random"] {
            assert!(
                paths.contains_key(path),
                "OpenAPI documentation is missing the {} path",
                path
            );
        }
    }

    #[test]
    fn openapi_doc_contains_key_schemas() {
        let doc = openapi_doc();
        let components = doc
            .components
            .as_ref()
            .expect("OpenAPI documentation contains no components");
        let schemas = &components.schemas;
        for name in ["PackRequest", "PackResponse", "ExportLayout", "ErrorResponse"] {
            assert!(
                schemas.contains_key(name),
                "Expected schema '{}' is missing from OpenAPI spec",
                name
            );
        }
    }

    #[test]
    fn pack_request_parses_camel_case_fields() {
        let json = r#"{
            "gridSize": 10,
            "robots": [{"id": "robot_01", "width": 2, "height": 1}],
            "algorithm": "bottomLeft",
            "autoExpand": false
        }"#;
        let request: PackRequest = serde_json::from_str(json).expect("Should parse valid JSON");
        assert_eq!(request.grid_size, 10);
        assert_eq!(request.auto_expand, Some(false));

        let validated = request.into_validated().expect("Should validate");
        assert_eq!(validated.algorithm, Algorithm::BottomLeft);
        assert!(!validated.robots[0].defective);
    }

    #[test]
    fn unknown_algorithm_falls_back_to_best_fit() {
        let mut req = request(10, vec![spec("a", 1, 1)]);
        req.algorithm = Some("quantumAnneal".to_string());

        let validated = req.into_validated().expect("Should validate");
        assert_eq!(validated.algorithm, Algorithm::BestFit);
    }

    #[test]
    fn missing_algorithm_falls_back_to_best_fit() {
        let validated = request(10, vec![spec("a", 1, 1)])
            .into_validated()
            .expect("Should validate");
        assert_eq!(validated.algorithm, Algorithm::BestFit);
    }

    #[test]
    fn grid_size_range_is_enforced_at_the_boundary() {
        assert!(matches!(
            request(4, Vec::new()).into_validated(),
            Err(PackRequestValidationError::GridSizeOutOfRange(4))
        ));
        assert!(matches!(
            request(51, Vec::new()).into_validated(),
            Err(PackRequestValidationError::GridSizeOutOfRange(51))
        ));
        assert!(request(5, Vec::new()).into_validated().is_ok());
        assert!(request(50, Vec::new()).into_validated().is_ok());
    }

    #[test]
    fn zero_dimension_robot_is_rejected() {
        let result = request(10, vec![spec("a", 0, 2)]).into_validated();
        assert!(matches!(
            result,
            Err(PackRequestValidationError::InvalidRobot(
                ValidationError::InvalidDimension(_)
            ))
        ));
    }

    #[test]
    fn duplicate_ids_are_rejected_when_building_the_session() {
        let validated = request(10, vec![spec("a", 1, 1), spec("a", 2, 2)])
            .into_validated()
            .expect("per-robot validation passes");
        assert!(build_session(&validated).is_err());
    }

    #[test]
    fn pack_response_reports_both_sides() {
        let validated = request(5, vec![spec("a", 2, 2), spec("wide", 6, 1)])
            .into_validated()
            .unwrap();
        let session = build_session(&validated).unwrap();
        let result = pack_with_config(
            session,
            Algorithm::FirstFit,
            PackingConfig::builder().auto_expand(false).build(),
        );

        let response = PackResponse::from_packing_result(result);
        assert_eq!(response.placed.len(), 1);
        assert_eq!(response.unplaced.len(), 1);
        assert!(!response.is_complete);
        assert!(response.placed[0].placed);
        assert!(!response.unplaced[0].placed);
        assert_eq!(response.unplaced[0].reason_code, "exceeds_grid_bounds");

        let value = serde_json::to_value(&response).unwrap();
        assert!(value.get("gridSize").is_some());
        assert!(value.get("isComplete").is_some());
        assert!(value["statistics"].get("totalRobots").is_some());
        assert!(value["statistics"].get("placedRobots").is_some());
    }

    #[test]
    fn export_layout_contains_placed_robots_only() {
        let validated = request(5, vec![spec("a", 2, 2), spec("wide", 6, 1)])
            .into_validated()
            .unwrap();
        let session = build_session(&validated).unwrap();
        let result = pack_with_config(
            session,
            Algorithm::BestFit,
            PackingConfig::builder().auto_expand(false).build(),
        );

        let layout = ExportLayout::from_packing_result(&result);
        assert_eq!(layout.robots.len(), 1);
        assert_eq!(layout.robots[0].id, "a");
        assert_eq!(layout.grid_size.width, layout.grid_size.height);

        let value = serde_json::to_value(&layout).unwrap();
        assert!(value.get("gridSize").is_some());
        assert!(value.get("statistics").is_some());
        assert!(value.get("timestamp").is_some());
        assert!(value["robots"][0].get("dimensions").is_some());
        assert!(value["robots"][0].get("position").is_some());
    }

    #[test]
    fn auto_expand_override_wins_over_config() {
        let base = PackingConfig::builder().auto_expand(false).build();
        assert!(effective_packing_config(base, Some(true)).auto_expand);
        assert!(!effective_packing_config(base, None).auto_expand);

        let base = PackingConfig::default();
        assert!(!effective_packing_config(base, Some(false)).auto_expand);
    }
}
