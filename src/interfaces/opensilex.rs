//! REST client for the OpenSILEX web service.
//!
//! The four operations the import pipeline needs are behind the
//! [`PhenotypingApi`] trait, so importers can be exercised against an
//! in-process double.

use std::sync::Arc;
use std::time::Duration;

use backoff::{retry_notify, ExponentialBackoff};
use serde::{Deserialize, Serialize};
use thiserror::Error;
use url::Url;

use crate::constants::defaults;
use crate::helpers;
use crate::settings::Credentials;

#[derive(Error, Debug)]
pub enum ApiError {
    #[error("HTTP error: {0}")]
    Http(#[from] Box<ureq::Error>),
    #[error("could not decode response: {0}")]
    Decode(#[from] std::io::Error),
    #[error("could not build TLS connector: {0}")]
    Tls(#[from] native_tls::Error),
    #[error("invalid API base URL: {0}")]
    BaseUrl(#[from] url::ParseError),
    #[error("could not serialize request: {0}")]
    Serialize(#[from] serde_json::Error),
    #[error("response contained no result")]
    EmptyResult,
}

/// Creation request for one scientific object (an orchard tree).
#[derive(Clone, Debug, Serialize)]
pub struct ScientificObjectCreation {
    pub rdf_type: String,
    pub name: String,
    pub geometry: Geometry,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub publication_date: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub germplasm: Option<String>,
}

#[derive(Clone, Debug, Serialize)]
pub struct Geometry {
    #[serde(rename = "type")]
    pub geometry_type: String,
    /// Longitude, latitude.
    pub coordinates: [f64; 2],
}

impl Geometry {
    pub fn point(longitude: f64, latitude: f64) -> Self {
        Geometry {
            geometry_type: "Point".into(),
            coordinates: [longitude, latitude],
        }
    }
}

#[derive(Clone, Debug, Deserialize)]
pub struct ScientificObjectSummary {
    pub uri: String,
    pub name: String,
}

#[derive(Clone, Debug, Deserialize)]
pub struct GermplasmSummary {
    pub uri: String,
    #[serde(default)]
    pub code: Option<String>,
    #[serde(default)]
    pub name: Option<String>,
}

/// JSON part of a data-file upload.
#[derive(Clone, Debug, Serialize)]
pub struct DataFileDescription {
    pub target: String,
    pub rdf_type: String,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub provenance: Option<ProvenanceRef>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub date: Option<String>,
    pub file: String,
}

#[derive(Clone, Debug, Serialize)]
pub struct ProvenanceRef {
    pub uri: String,
}

pub trait PhenotypingApi {
    fn create_scientific_object(
        &self,
        request: &ScientificObjectCreation,
    ) -> Result<String, ApiError>;

    fn search_scientific_objects(
        &self,
        name_pattern: &str,
    ) -> Result<Vec<ScientificObjectSummary>, ApiError>;

    fn search_germplasm(
        &self,
        code: Option<&str>,
        species: Option<&str>,
    ) -> Result<Vec<GermplasmSummary>, ApiError>;

    fn post_data_file(
        &self,
        description: &DataFileDescription,
        file_name: &str,
        payload: &[u8],
    ) -> Result<String, ApiError>;
}

/// Responses arrive wrapped in `{"result": ..., "metadata": ...}`; only the
/// result is of interest.
#[derive(Debug, Deserialize)]
struct Envelope<T> {
    result: T,
}

#[derive(Debug, Deserialize, Serialize)]
struct AuthResult {
    token: String,
}

#[derive(Debug)]
pub struct OpenSilexClient {
    agent: ureq::Agent,
    api_root: String,
    token: String,
}

impl OpenSilexClient {
    /// Authenticate against the web service and return a ready client.
    /// Transport errors during the handshake are retried with exponential
    /// backoff; an HTTP status error (bad credentials) is permanent.
    pub fn connect(credentials: &Credentials) -> Result<Self, ApiError> {
        let agent = get_ureq_agent()?;
        let api_root = Url::parse(&credentials.host)?
            .as_str()
            .trim_end_matches('/')
            .to_string();
        let token = authenticate(&agent, &api_root, credentials)?;
        log::info!("Connected to OpenSILEX at {api_root}");
        Ok(OpenSilexClient {
            agent,
            api_root,
            token,
        })
    }

    fn endpoint(&self, path: &str) -> String {
        format!("{}/{}", self.api_root, path)
    }
}

impl PhenotypingApi for OpenSilexClient {
    fn create_scientific_object(
        &self,
        request: &ScientificObjectCreation,
    ) -> Result<String, ApiError> {
        let resp: Envelope<Vec<String>> = self
            .agent
            .post(&self.endpoint("core/scientific_objects"))
            .set("Authorization", &self.token)
            .send_json(request)
            .map_err(Box::new)?
            .into_json()?;
        resp.result.into_iter().next().ok_or(ApiError::EmptyResult)
    }

    fn search_scientific_objects(
        &self,
        name_pattern: &str,
    ) -> Result<Vec<ScientificObjectSummary>, ApiError> {
        let resp: Envelope<Vec<ScientificObjectSummary>> = self
            .agent
            .get(&self.endpoint("core/scientific_objects"))
            .set("Authorization", &self.token)
            .query("name", name_pattern)
            .call()
            .map_err(Box::new)?
            .into_json()?;
        Ok(resp.result)
    }

    fn search_germplasm(
        &self,
        code: Option<&str>,
        species: Option<&str>,
    ) -> Result<Vec<GermplasmSummary>, ApiError> {
        let mut request = self
            .agent
            .get(&self.endpoint("core/germplasm"))
            .set("Authorization", &self.token);
        if let Some(code) = code {
            request = request.query("code", code);
        }
        if let Some(species) = species {
            request = request.query("species", species);
        }
        let resp: Envelope<Vec<GermplasmSummary>> =
            request.call().map_err(Box::new)?.into_json()?;
        Ok(resp.result)
    }

    fn post_data_file(
        &self,
        description: &DataFileDescription,
        file_name: &str,
        payload: &[u8],
    ) -> Result<String, ApiError> {
        let boundary = format!("----osi-{}", helpers::rand_hex(16));
        let body = multipart_body(
            &boundary,
            &serde_json::to_vec(description)?,
            file_name,
            payload,
        );
        let resp: Envelope<Vec<String>> = self
            .agent
            .post(&self.endpoint("core/data/file"))
            .set("Authorization", &self.token)
            .set(
                "Content-Type",
                &format!("multipart/form-data; boundary={boundary}"),
            )
            .send_bytes(&body)
            .map_err(Box::new)?
            .into_json()?;
        resp.result.into_iter().next().ok_or(ApiError::EmptyResult)
    }
}

fn get_ureq_agent() -> Result<ureq::Agent, ApiError> {
    Ok(ureq::AgentBuilder::new()
        .tls_connector(Arc::new(native_tls::TlsConnector::new()?))
        .timeout(defaults::API_REQUEST_TIMEOUT)
        .build())
}

fn authenticate(
    agent: &ureq::Agent,
    api_root: &str,
    credentials: &Credentials,
) -> Result<String, ApiError> {
    let body = serde_json::json!({
        "identifier": credentials.identifier,
        "password": credentials.password,
    });

    let request = || {
        log::debug!("Authenticating against {api_root}");
        agent
            .post(&format!("{api_root}/security/authenticate"))
            .send_json(&body)
            .map_err(|e| match e {
                ureq::Error::Status(..) => backoff::Error::permanent(e),
                _ => backoff::Error::transient(e),
            })
    };

    let notify = |err, dur: Duration| {
        log::error!("Request error after {:.1}s: {}", dur.as_secs_f32(), err);
    };

    let resp: Envelope<AuthResult> = retry_notify(ExponentialBackoff::default(), request, notify)
        .map_err(|e| {
            Box::new(match e {
                backoff::Error::Permanent(err) => err,
                backoff::Error::Transient { err, .. } => err,
            })
        })?
        .into_json()?;

    Ok(resp.result.token)
}

/// `multipart/form-data` body with a JSON `description` part and a binary
/// `file` part. ureq has no multipart support of its own.
fn multipart_body(
    boundary: &str,
    description_json: &[u8],
    file_name: &str,
    payload: &[u8],
) -> Vec<u8> {
    let mut body = Vec::new();
    body.extend_from_slice(format!("--{boundary}\r\n").as_bytes());
    body.extend_from_slice(b"Content-Disposition: form-data; name=\"description\"\r\n");
    body.extend_from_slice(b"Content-Type: application/json\r\n\r\n");
    body.extend_from_slice(description_json);
    body.extend_from_slice(format!("\r\n--{boundary}\r\n").as_bytes());
    body.extend_from_slice(
        format!("Content-Disposition: form-data; name=\"file\"; filename=\"{file_name}\"\r\n")
            .as_bytes(),
    );
    body.extend_from_slice(b"Content-Type: application/octet-stream\r\n\r\n");
    body.extend_from_slice(payload);
    body.extend_from_slice(format!("\r\n--{boundary}--\r\n").as_bytes());
    body
}
