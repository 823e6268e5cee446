//! gloo-net transport for the Supabase client

use gloo_net::http::{Method as HttpMethod, RequestBuilder};
use shared::supabase::{HttpRequest, HttpResponse, Method, SupabaseApi, Transport};
use shared::ApiError;

use crate::utils;

/// The API used by the browser app
pub type WebApi = SupabaseApi<GlooTransport>;

pub fn web_api() -> WebApi {
    SupabaseApi::new(utils::api_config(), GlooTransport)
}

#[derive(Debug, Clone, Copy, Default)]
pub struct GlooTransport;

impl Transport for GlooTransport {
    async fn send(&self, request: HttpRequest) -> Result<HttpResponse, ApiError> {
        let method = match request.method {
            Method::Get => HttpMethod::GET,
            Method::Post => HttpMethod::POST,
            Method::Patch => HttpMethod::PATCH,
            Method::Delete => HttpMethod::DELETE,
        };

        let mut builder = RequestBuilder::new(&request.url).method(method);
        for (name, value) in &request.headers {
            builder = builder.header(name, value);
        }

        let built = match request.body {
            Some(bytes) => builder.body(js_sys::Uint8Array::from(bytes.as_slice())),
            None => builder.build(),
        }
        .map_err(|e| ApiError::Network(e.to_string()))?;

        let response = built
            .send()
            .await
            .map_err(|e| ApiError::Network(e.to_string()))?;
        let status = response.status();
        let body = response
            .binary()
            .await
            .map_err(|e| ApiError::Network(e.to_string()))?;

        Ok(HttpResponse { status, body })
    }
}
