//! HTTP server setup and configuration.
//!
//! # Responsibilities
//! - Create Axum Router with the proxy handler
//! - Wire up middleware (request ID, tracing, timeout)
//! - Bind server to listener, plain or TLS
//! - Direct each request through the route table
//! - Forward requests to upstream backends

use axum::{
    body::Body,
    extract::{ConnectInfo, State},
    http::{Request, StatusCode, Version},
    response::{IntoResponse, Response},
    routing::any,
    Router,
};
use axum_server::tls_rustls::RustlsConfig;
use http_body_util::BodyExt;
use hyper::body::Incoming;
use hyper_util::{
    client::legacy::{connect::HttpConnector, Client},
    rt::TokioExecutor,
};
use std::net::SocketAddr;
use std::sync::Arc;
use std::time::{Duration, Instant};
use tokio::net::TcpListener;
use tokio::sync::{broadcast, OwnedSemaphorePermit, Semaphore};
use tower::ServiceBuilder;
use tower_http::{
    request_id::{PropagateRequestIdLayer, SetRequestIdLayer},
    timeout::TimeoutLayer,
    trace::TraceLayer,
};

use crate::config::ProxyConfig;
use crate::http::director::Director;
use crate::http::request::{request_id, UuidRequestId};
use crate::observability::metrics;
use crate::routing::RouteStore;
use crate::security::headers;

/// How long in-flight TLS connections may drain after shutdown.
const TLS_DRAIN_SECS: u64 = 10;

/// Application state injected into handlers.
#[derive(Clone)]
pub struct AppState {
    pub director: Director,
    pub client: Client<HttpConnector, Body>,
    pub in_flight: Arc<Semaphore>,
}

/// HTTP server for the reverse proxy.
pub struct HttpServer {
    router: Router,
    config: ProxyConfig,
}

impl HttpServer {
    /// Create a new HTTP server routing through `store`.
    pub fn new(config: ProxyConfig, store: Arc<RouteStore>) -> Self {
        let mut connector = HttpConnector::new();
        connector.set_connect_timeout(Some(Duration::from_secs(config.timeouts.connect_secs)));
        let client = Client::builder(TokioExecutor::new()).build(connector);

        let state = AppState {
            director: Director::new(store),
            client,
            in_flight: Arc::new(Semaphore::new(config.listener.max_connections)),
        };

        let router = Self::build_router(&config, state);
        Self { router, config }
    }

    /// Build the Axum router with all middleware layers.
    #[allow(deprecated)]
    fn build_router(config: &ProxyConfig, state: AppState) -> Router {
        Router::new()
            .route("/{*path}", any(proxy_handler))
            .route("/", any(proxy_handler))
            .with_state(state)
            .layer(
                ServiceBuilder::new()
                    .layer(SetRequestIdLayer::x_request_id(UuidRequestId))
                    .layer(TraceLayer::new_for_http())
                    .layer(PropagateRequestIdLayer::x_request_id())
                    .layer(TimeoutLayer::new(Duration::from_secs(
                        config.timeouts.request_secs,
                    ))),
            )
    }

    /// Serve plain HTTP on `listener` until shutdown.
    pub async fn run(
        self,
        listener: TcpListener,
        mut shutdown: broadcast::Receiver<()>,
    ) -> Result<(), std::io::Error> {
        let addr = listener.local_addr()?;
        tracing::info!(address = %addr, "HTTP server starting");

        let app = self.router.into_make_service_with_connect_info::<SocketAddr>();
        axum::serve(listener, app)
            .with_graceful_shutdown(async move {
                let _ = shutdown.recv().await;
                tracing::info!("HTTP server received shutdown signal");
            })
            .await?;

        tracing::info!("HTTP server stopped");
        Ok(())
    }

    /// Serve HTTPS on `addr` until shutdown.
    pub async fn run_tls(
        self,
        addr: SocketAddr,
        tls: RustlsConfig,
        mut shutdown: broadcast::Receiver<()>,
    ) -> Result<(), std::io::Error> {
        tracing::info!(address = %addr, "HTTPS server starting");

        let handle = axum_server::Handle::new();
        let drain = handle.clone();
        tokio::spawn(async move {
            let _ = shutdown.recv().await;
            tracing::info!("HTTPS server received shutdown signal");
            drain.graceful_shutdown(Some(Duration::from_secs(TLS_DRAIN_SECS)));
        });

        axum_server::bind_rustls(addr, tls)
            .handle(handle)
            .serve(self.router.into_make_service_with_connect_info::<SocketAddr>())
            .await?;

        tracing::info!("HTTPS server stopped");
        Ok(())
    }

    /// Get a reference to the config.
    pub fn config(&self) -> &ProxyConfig {
        &self.config
    }
}

/// Main proxy handler.
/// Directs the request to its backend and forwards it.
async fn proxy_handler(
    State(state): State<AppState>,
    ConnectInfo(peer): ConnectInfo<SocketAddr>,
    mut request: Request<Body>,
) -> Response {
    let start_time = Instant::now();
    let method = request.method().to_string();
    let request_id = request_id(request.headers()).to_string();

    let Ok(permit) = state.in_flight.clone().acquire_owned().await else {
        return (StatusCode::SERVICE_UNAVAILABLE, "Proxy is shutting down").into_response();
    };

    let directed = match state.director.direct(&mut request) {
        Ok(directed) => directed,
        Err(e) => {
            tracing::warn!(request_id = %request_id, error = %e, "Request not routable");
            metrics::record_request(&method, 502, "none", start_time);
            return (StatusCode::BAD_GATEWAY, "No route for host").into_response();
        }
    };

    tracing::debug!(
        request_id = %request_id,
        method = %method,
        key = %directed.key,
        backend = %directed.backend,
        path = %directed.path,
        "Proxying request"
    );

    *request.version_mut() = Version::HTTP_11;
    headers::strip_hop_by_hop(request.headers_mut());
    headers::append_forwarded_for(request.headers_mut(), peer.ip());

    match state.client.request(request).await {
        Ok(response) => {
            metrics::record_request(&method, response.status().as_u16(), &directed.backend, start_time);
            let (mut parts, body) = response.into_parts();
            headers::strip_hop_by_hop(&mut parts.headers);
            Response::from_parts(parts, hold_until_done(body, permit))
        }
        Err(e) => {
            tracing::error!(
                request_id = %request_id,
                backend = %directed.backend,
                error = %e,
                "Upstream error"
            );
            metrics::record_request(&method, 502, &directed.backend, start_time);
            (StatusCode::BAD_GATEWAY, "Upstream request failed").into_response()
        }
    }
}

/// Keep `permit` alive until the upstream body is fully streamed or dropped.
fn hold_until_done(body: Incoming, permit: OwnedSemaphorePermit) -> Body {
    Body::new(body.map_frame(move |frame| {
        let _held = &permit;
        frame
    }))
}
