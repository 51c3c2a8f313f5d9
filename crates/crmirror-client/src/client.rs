use async_trait::async_trait;
use reqwest::{Client, Method, RequestBuilder, Response, StatusCode};
use serde_json::Value;
use std::time::Duration;
use url::Url;

use crate::api::ResourceApi;
use crate::error::ClientError;
use crate::types::{ClientConfig, ObjectMeta, ResourceObject};
use crmirror_types::{GlobalCoordinates, ResourceInstance};

/// Resource client speaking the custom-objects REST surface.
///
/// Paths follow `/apis/{group}/{version}/namespaces/{namespace}/{plural}`
/// with the instance name appended for object-level calls. Every request
/// carries the builder-level timeout from [`ClientConfig`].
#[derive(Debug)]
pub struct HttpResourceClient {
    client: Client,
    base_url: String,
    coords: GlobalCoordinates,
    bearer_token: Option<String>,
}

impl HttpResourceClient {
    pub fn new(config: ClientConfig, coords: GlobalCoordinates) -> Result<Self, ClientError> {
        let base_url = config.base_url.trim_end_matches('/').to_string();
        Url::parse(&base_url).map_err(|e| ClientError::InvalidBaseUrl {
            url: config.base_url.clone(),
            message: e.to_string(),
        })?;

        let mut builder = Client::builder().timeout(Duration::from_secs(config.timeout_secs));
        if let Some(pem) = &config.ca_bundle_pem {
            let cert = reqwest::Certificate::from_pem(pem)?;
            builder = builder.add_root_certificate(cert);
        }
        if config.accept_invalid_certs {
            builder = builder.danger_accept_invalid_certs(true);
        }
        let client = builder.build()?;

        Ok(Self { client, base_url, coords, bearer_token: config.bearer_token })
    }

    fn collection_url(&self, plural: &str) -> String {
        format!(
            "{}/apis/{}/{}/namespaces/{}/{}",
            self.base_url, self.coords.group, self.coords.version, self.coords.namespace, plural
        )
    }

    fn object_url(&self, plural: &str, name: &str) -> String {
        format!("{}/{}", self.collection_url(plural), name)
    }

    fn request(&self, method: Method, url: &str) -> RequestBuilder {
        let mut req = self.client.request(method, url);
        if let Some(token) = &self.bearer_token {
            req = req.header("Authorization", format!("Bearer {}", token));
        }
        req
    }

    fn write_body(&self, name: &str, payload: &Value, resource_version: Option<&str>) -> ResourceObject {
        ResourceObject {
            api_version: self.coords.api_version(),
            kind: self.coords.kind.clone(),
            metadata: ObjectMeta {
                name: name.to_string(),
                namespace: Some(self.coords.namespace.clone()),
                resource_version: resource_version.map(str::to_string),
            },
            data: payload.clone(),
        }
    }

    async fn failure(resp: Response) -> ClientError {
        let status = resp.status().as_u16();
        let retry_after = resp
            .headers()
            .get("retry-after")
            .and_then(|v| v.to_str().ok())
            .and_then(|s| s.parse().ok());
        let message = resp.text().await.unwrap_or_default();
        classify(status, retry_after, message)
    }

    fn instance_from(obj: ResourceObject) -> ResourceInstance {
        ResourceInstance::new(obj.data, obj.metadata.resource_version.unwrap_or_default())
    }
}

#[async_trait]
impl ResourceApi for HttpResourceClient {
    async fn fetch(
        &self,
        plural: &str,
        name: &str,
    ) -> Result<Option<ResourceInstance>, ClientError> {
        let resp = self
            .request(Method::GET, &self.object_url(plural, name))
            .send()
            .await?;

        if resp.status() == StatusCode::NOT_FOUND {
            return Ok(None);
        }
        if !resp.status().is_success() {
            return Err(Self::failure(resp).await);
        }

        let obj: ResourceObject = resp
            .json()
            .await
            .map_err(|e| ClientError::InvalidResponse(e.to_string()))?;
        Ok(Some(Self::instance_from(obj)))
    }

    async fn upsert(
        &self,
        plural: &str,
        name: &str,
        payload: &Value,
        resource_version: Option<&str>,
    ) -> Result<ResourceInstance, ClientError> {
        let body = self.write_body(name, payload, resource_version);

        let resp = match resource_version {
            Some(_) => {
                tracing::debug!("Replacing {}/{}", plural, name);
                self.request(Method::PUT, &self.object_url(plural, name))
                    .json(&body)
                    .send()
                    .await?
            }
            None => {
                tracing::debug!("Creating {}/{}", plural, name);
                self.request(Method::POST, &self.collection_url(plural))
                    .json(&body)
                    .send()
                    .await?
            }
        };

        if resp.status() == StatusCode::NOT_FOUND {
            // PUT 404: the object vanished between fetch and replace; the
            // next tick re-fetches and creates. POST 404: the collection
            // itself is missing, so the type was never registered.
            return Err(match resource_version {
                Some(_) => ClientError::Conflict {
                    message: format!("{}/{} vanished during replace", plural, name),
                },
                None => ClientError::UnknownResourceType { plural: plural.to_string() },
            });
        }
        if !resp.status().is_success() {
            return Err(Self::failure(resp).await);
        }

        let obj: ResourceObject = resp
            .json()
            .await
            .map_err(|e| ClientError::InvalidResponse(e.to_string()))?;
        Ok(Self::instance_from(obj))
    }
}

fn classify(status: u16, retry_after: Option<u64>, message: String) -> ClientError {
    match status {
        429 => ClientError::Throttled { retry_after },
        401 | 403 => ClientError::Unauthorized { status, message },
        409 => ClientError::Conflict { message },
        422 => ClientError::SchemaRejected { message },
        s if s >= 500 => ClientError::Server { status, message },
        _ => ClientError::Rejected { status, message },
    }
}
