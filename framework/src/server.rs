use crate::config::{Config, ServerConfig};
use crate::container::App;
use crate::error::FrameworkError;
use crate::http::{HttpResponse, Request};
use crate::routing::Router;
use bytes::Bytes;
use http_body_util::Full;
use hyper::server::conn::http1;
use hyper::service::service_fn;
use hyper_util::rt::TokioIo;
use std::convert::Infallible;
use std::net::{IpAddr, SocketAddr};
use std::sync::Arc;
use std::time::Instant;
use tokio::net::TcpListener;

pub struct Server {
    router: Arc<Router>,
    host: String,
    port: u16,
}

impl Server {
    pub fn new(router: impl Into<Router>) -> Self {
        Self {
            router: Arc::new(router.into()),
            host: "127.0.0.1".to_string(),
            port: 8080,
        }
    }

    /// Build a server from the registered `ServerConfig`
    ///
    /// Initializes the application container as well; register providers
    /// before or after this call.
    pub fn from_config(router: impl Into<Router>) -> Self {
        App::init();

        let config = Config::get::<ServerConfig>().unwrap_or_else(ServerConfig::from_env);
        Self {
            router: Arc::new(router.into()),
            host: config.host,
            port: config.port,
        }
    }

    pub fn host(mut self, host: &str) -> Self {
        self.host = host.to_string();
        self
    }

    pub fn port(mut self, port: u16) -> Self {
        self.port = port;
        self
    }

    fn addr(&self) -> Result<SocketAddr, FrameworkError> {
        let ip: IpAddr = self.host.parse().map_err(|_| {
            FrameworkError::internal(format!("invalid server host: {}", self.host))
        })?;
        Ok(SocketAddr::new(ip, self.port))
    }

    pub async fn run(self) -> Result<(), Box<dyn std::error::Error + Send + Sync>> {
        let addr = self.addr()?;
        let listener = TcpListener::bind(addr).await?;

        tracing::info!(%addr, "server listening");

        let router = self.router;

        loop {
            let (stream, peer) = listener.accept().await?;
            let io = TokioIo::new(stream);
            let router = router.clone();

            tokio::spawn(async move {
                let service = service_fn(move |req: hyper::Request<hyper::body::Incoming>| {
                    let router = router.clone();
                    async move { Ok::<_, Infallible>(handle_request(router, req).await) }
                });

                if let Err(err) = http1::Builder::new().serve_connection(io, service).await {
                    tracing::warn!(%peer, error = ?err, "error serving connection");
                }
            });
        }
    }
}

async fn handle_request(
    router: Arc<Router>,
    req: hyper::Request<hyper::body::Incoming>,
) -> hyper::Response<Full<Bytes>> {
    let started = Instant::now();
    let method = req.method().clone();
    let path = req.uri().path().to_string();

    let response = match Request::from_incoming(req).await {
        Ok(request) => router.handle(request).await,
        Err(err) => HttpResponse::from(err),
    };

    tracing::info!(
        %method,
        %path,
        status = response.status_code(),
        elapsed_ms = started.elapsed().as_millis() as u64,
        "request handled"
    );

    response.into_hyper()
}
