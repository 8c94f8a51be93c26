use chrono::Utc;
use log::{debug, info};
use rouille::{Request, Response, input::json::JsonError};
use serde::de::DeserializeOwned;
use serde_json::json;

use crate::{
    config::{AppConfig, HttpConfig},
    gateway::{
        Backends,
        discover::{self, Feed},
        error::GatewayError,
        frame,
        generate::{GenerateRequest, GenerateResponse},
        mint::MintRequest,
        pin::UploadRequest,
    },
    http::error::ApiError,
};

pub const SERVICE_NAME: &str = "zaounz-api";

const ALLOWED_METHODS: &str = "GET,HEAD,PUT,PATCH,POST,DELETE";

pub struct HttpServer {
    backends: Backends,
    app: AppConfig,
    pub config: HttpConfig,
}

impl HttpServer {
    pub fn new(backends: Backends, app: AppConfig, config: HttpConfig) -> Self {
        Self {
            backends,
            app,
            config,
        }
    }

    pub fn run(self) {
        let addr = format!("{}:{}", self.config.bind_addr, self.config.port);
        rouille::start_server(addr, move |request| self.handle_request(request));
    }

    fn handle_request(&self, request: &Request) -> Response {
        Self::log_request(request);

        let response = if request.method() == "OPTIONS" {
            Self::handle_preflight(request)
        } else {
            rouille::router!(request,
                (GET) (/api/health) => {
                    Response::json(&json!({ "status": "ok", "service": SERVICE_NAME }))
                },

                (POST) (/api/generate) => {
                    respond(self.generate(request))
                },

                (GET) (/api/discover/trending) => {
                    let feed = Feed::trending(request.get_param("genre"), request.get_param("time"));
                    respond(self.discover(Ok(feed)))
                },
                (GET) (/api/discover/underground) => {
                    respond(self.discover(Ok(Feed::Underground)))
                },
                (GET) (/api/discover/search) => {
                    respond(self.discover(Feed::search(request.get_param("q"))))
                },

                (POST) (/api/upload) => {
                    respond(self.upload(request))
                },

                (POST) (/api/mint) => {
                    respond(self.mint(request))
                },
                (GET) (/api/mint/{contract: String}/{token_id: String}) => {
                    self.handle_frame(request, &contract, &token_id)
                },
                (GET) (/api/frame/mint/{contract: String}/{token_id: String}) => {
                    self.handle_frame(request, &contract, &token_id)
                },
                (GET) (/api/og) => {
                    let svg = frame::render_og(request.get_param("title").as_deref());
                    Response::from_data("image/svg+xml", svg)
                },

                _ => Response::empty_404()
            )
        };

        let response = response.with_additional_header("Access-Control-Allow-Origin", "*");
        info!("Response: {} {}", request.method(), response.status_code);
        response
    }

    fn log_request(request: &Request) {
        info!("{} {}", request.method(), request.raw_url());
    }

    fn handle_preflight(request: &Request) -> Response {
        if !request.url().starts_with("/api/") {
            return Response::empty_404();
        }
        let headers = request
            .header("Access-Control-Request-Headers")
            .unwrap_or("Content-Type")
            .to_string();

        Response::empty_204()
            .with_additional_header("Access-Control-Allow-Methods", ALLOWED_METHODS)
            .with_additional_header("Access-Control-Allow-Headers", headers)
    }

    fn generate(&self, request: &Request) -> Result<Response, ApiError> {
        let body: GenerateRequest = read_json(request)?;
        let (prompt, duration) = body.validate()?;
        let generated = self.backends.generator.generate(prompt, duration)?;
        Ok(Response::json(&GenerateResponse::from(generated)))
    }

    fn discover(&self, feed: Result<Feed, GatewayError>) -> Result<Response, ApiError> {
        let data = discover::discover(self.backends.discovery.as_ref(), &feed?)?;
        Ok(Response::json(&data))
    }

    fn upload(&self, request: &Request) -> Result<Response, ApiError> {
        let upload: UploadRequest = read_json_or_default(request)?;
        let receipt = self
            .backends
            .pinner
            .pin(&upload, Utc::now())
            .map_err(|e| ApiError::from_gateway("Upload failed", e))?;
        Ok(Response::json(&receipt))
    }

    /// never fails on bad input: the response is a demo placeholder either way
    fn mint(&self, request: &Request) -> Result<Response, ApiError> {
        let mint: MintRequest = rouille::input::json_input(request).unwrap_or_else(|e| {
            debug!("unreadable mint body, minting with defaults: {e}");
            MintRequest::default()
        });
        let receipt = self
            .backends
            .minter
            .mint(mint)
            .map_err(|e| ApiError::from_gateway("Mint creation failed", e))?;
        Ok(Response::json(&receipt))
    }

    fn handle_frame(&self, request: &Request, contract: &str, token_id: &str) -> Response {
        let title = request.get_param("title");
        Response::html(frame::render_frame(&self.app, contract, token_id, title.as_deref()))
    }
}

fn respond(result: Result<Response, ApiError>) -> Response {
    match result {
        Ok(r) => r,
        Err(e) => e.into_response(),
    }
}

fn read_json<T: DeserializeOwned>(request: &Request) -> Result<T, ApiError> {
    rouille::input::json_input(request)
        .map_err(|e| ApiError::BadRequest(format!("invalid JSON body: {e}")))
}

/// A body that is not declared as JSON reads as empty; a JSON body that does not parse is still a 400.
fn read_json_or_default<T: DeserializeOwned + Default>(request: &Request) -> Result<T, ApiError> {
    match rouille::input::json_input(request) {
        Ok(value) => Ok(value),
        Err(JsonError::WrongContentType) => {
            debug!("non-JSON body on {}, using defaults", request.url());
            Ok(T::default())
        }
        Err(e) => Err(ApiError::BadRequest(format!("invalid JSON body: {e}"))),
    }
}

#[cfg(test)]
pub fn parse_json_response<T: serde::de::DeserializeOwned>(
    response: rouille::Response,
) -> anyhow::Result<T> {
    Ok(serde_json::from_reader(
        response.data.into_reader_and_size().0,
    )?)
}
