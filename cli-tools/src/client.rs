//! Native transport for the Supabase client using reqwest

use reqwest::Client;
use shared::supabase::{HttpRequest, HttpResponse, Method, SupabaseApi, Transport};
use shared::{ApiClientConfig, ApiError};

/// The API used by the command line
pub type NativeApi = SupabaseApi<ReqwestTransport>;

pub fn native_api(config: ApiClientConfig) -> Result<NativeApi, ApiError> {
    Ok(SupabaseApi::new(config, ReqwestTransport::new()?))
}

#[derive(Debug, Clone)]
pub struct ReqwestTransport {
    client: Client,
}

impl ReqwestTransport {
    pub fn new() -> Result<Self, ApiError> {
        let client = Client::builder()
            .user_agent(concat!("studyflow-cli/", env!("CARGO_PKG_VERSION")))
            .build()
            .map_err(|e| ApiError::Network(e.to_string()))?;
        Ok(Self { client })
    }
}

fn http_method(method: Method) -> reqwest::Method {
    match method {
        Method::Get => reqwest::Method::GET,
        Method::Post => reqwest::Method::POST,
        Method::Patch => reqwest::Method::PATCH,
        Method::Delete => reqwest::Method::DELETE,
    }
}

impl Transport for ReqwestTransport {
    async fn send(&self, request: HttpRequest) -> Result<HttpResponse, ApiError> {
        let mut builder = self
            .client
            .request(http_method(request.method), &request.url);
        for (name, value) in &request.headers {
            builder = builder.header(name.as_str(), value.as_str());
        }
        if let Some(body) = request.body {
            builder = builder.body(body);
        }

        tracing::debug!("{} {}", request.method.as_str(), request.url);
        let response = builder
            .send()
            .await
            .map_err(|e| ApiError::Network(e.to_string()))?;

        let status = response.status().as_u16();
        let body = response
            .bytes()
            .await
            .map_err(|e| ApiError::Network(e.to_string()))?
            .to_vec();

        Ok(HttpResponse { status, body })
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_method_mapping() {
        assert_eq!(http_method(Method::Get), reqwest::Method::GET);
        assert_eq!(http_method(Method::Post), reqwest::Method::POST);
        assert_eq!(http_method(Method::Patch), reqwest::Method::PATCH);
        assert_eq!(http_method(Method::Delete), reqwest::Method::DELETE);
    }

    #[tokio::test]
    async fn test_unreachable_server_is_network_error() {
        let transport = ReqwestTransport::new().unwrap();
        let request = HttpRequest::new(Method::Get, "http://127.0.0.1:9/rest/v1/subjects");
        let err = transport.send(request).await.unwrap_err();
        assert!(matches!(err, ApiError::Network(_)));
    }
}
