//! Classification of Kubernetes documents into typed buckets.
//!
//! Decoding happens in two stages. Every document is first decoded into a
//! [`ResourceProbe`] holding only `kind` and `metadata.name`; a missing or
//! mistyped field fails the whole batch with [`Error::Decode`] naming the
//! document's position. Recognised kinds are then built into a
//! [`KubernetesObject`] from the probe, with the remaining fields read
//! leniently, while everything else is kept as the original generic mapping
//! in [`KubernetesResources::others`].

use std::collections::BTreeMap;
use std::fmt;
use std::path::PathBuf;

use serde::{Deserialize, Serialize};
use serde_yaml::{Mapping, Value};
use tracing::{debug, error, info};

use crate::contract::DevfileUtils;
use crate::error::{Error, Result};
use crate::http::HttpRequestParams;

pub const DEPLOYMENT_KIND: &str = "Deployment";
pub const SERVICE_KIND: &str = "Service";
pub const ROUTE_KIND: &str = "Route";
pub const INGRESS_KIND: &str = "Ingress";

#[derive(Debug, Deserialize)]
struct ResourceProbe {
    kind: String,
    metadata: ProbeMetadata,
}

#[derive(Debug, Deserialize)]
struct ProbeMetadata {
    name: String,
}

/// Labels and annotations keep scalar values rendered as strings; entries
/// with nested values are dropped.
#[derive(Debug, Clone, Default, PartialEq, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct ObjectMeta {
    pub name: String,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub namespace: Option<String>,
    #[serde(skip_serializing_if = "BTreeMap::is_empty")]
    pub labels: BTreeMap<String, String>,
    #[serde(skip_serializing_if = "BTreeMap::is_empty")]
    pub annotations: BTreeMap<String, String>,
}

/// A Deployment, Service, Route or Ingress.
#[derive(Debug, Clone, PartialEq, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct KubernetesObject {
    #[serde(skip_serializing_if = "Option::is_none")]
    pub api_version: Option<String>,
    pub kind: String,
    pub metadata: ObjectMeta,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub spec: Option<Value>,
}

impl KubernetesObject {
    pub fn name(&self) -> &str {
        &self.metadata.name
    }

    fn from_probe(probe: ResourceProbe, document: &Mapping) -> Self {
        let metadata = document.get("metadata");
        Self {
            api_version: document.get("apiVersion").and_then(scalar_string),
            kind: probe.kind,
            metadata: ObjectMeta {
                name: probe.metadata.name,
                namespace: metadata
                    .and_then(|metadata| metadata.get("namespace"))
                    .and_then(scalar_string),
                labels: string_map(metadata.and_then(|metadata| metadata.get("labels"))),
                annotations: string_map(
                    metadata.and_then(|metadata| metadata.get("annotations")),
                ),
            },
            spec: document.get("spec").cloned(),
        }
    }
}

fn scalar_string(value: &Value) -> Option<String> {
    match value {
        Value::String(s) => Some(s.clone()),
        Value::Number(n) => Some(n.to_string()),
        Value::Bool(b) => Some(b.to_string()),
        _ => None,
    }
}

fn string_map(value: Option<&Value>) -> BTreeMap<String, String> {
    value
        .and_then(Value::as_mapping)
        .map(|mapping| {
            mapping
                .iter()
                .filter_map(|(key, value)| Some((scalar_string(key)?, scalar_string(value)?)))
                .collect()
        })
        .unwrap_or_default()
}

/// The classified resource set. Bucket order follows input order.
#[derive(Debug, Clone, Default, PartialEq, Serialize)]
pub struct KubernetesResources {
    pub deployments: Vec<KubernetesObject>,
    pub services: Vec<KubernetesObject>,
    pub routes: Vec<KubernetesObject>,
    pub ingresses: Vec<KubernetesObject>,
    /// Documents of any other kind, untouched.
    pub others: Vec<Mapping>,
}

impl KubernetesResources {
    pub fn is_empty(&self) -> bool {
        self.len() == 0
    }

    pub fn len(&self) -> usize {
        self.deployments.len()
            + self.services.len()
            + self.routes.len()
            + self.ingresses.len()
            + self.others.len()
    }

    /// `metadata.name` of every document in `others`.
    pub fn other_names(&self) -> Vec<&str> {
        self.others
            .iter()
            .filter_map(|doc| doc.get("metadata"))
            .filter_map(|metadata| metadata.get("name"))
            .filter_map(Value::as_str)
            .collect()
    }
}

/// Names of the objects in one bucket, in order.
pub fn names(objects: &[KubernetesObject]) -> Vec<&str> {
    objects.iter().map(KubernetesObject::name).collect()
}

/// Groups decoded documents by `kind`.
///
/// An empty input yields an empty set, not an error. The input is only read.
pub fn classify(documents: &[Value]) -> Result<KubernetesResources> {
    let mut resources = KubernetesResources::default();

    for (index, document) in documents.iter().enumerate() {
        let Value::Mapping(mapping) = document else {
            error!(index, "Kubernetes document is not a mapping");
            return Err(Error::Decode {
                index,
                message: "document should be a mapping".into(),
            });
        };
        let probe: ResourceProbe = decode(index, document)?;
        debug!(index, kind = %probe.kind, name = %probe.metadata.name, "Classifying document");

        let bucket = match probe.kind.as_str() {
            DEPLOYMENT_KIND => &mut resources.deployments,
            SERVICE_KIND => &mut resources.services,
            ROUTE_KIND => &mut resources.routes,
            INGRESS_KIND => &mut resources.ingresses,
            _ => {
                resources.others.push(mapping.clone());
                continue;
            }
        };
        bucket.push(KubernetesObject::from_probe(probe, mapping));
    }

    info!(
        deployments = resources.deployments.len(),
        services = resources.services.len(),
        routes = resources.routes.len(),
        ingresses = resources.ingresses.len(),
        others = resources.others.len(),
        "Classified kubernetes documents"
    );
    Ok(resources)
}

fn decode<T: serde::de::DeserializeOwned>(index: usize, document: &Value) -> Result<T> {
    serde_yaml::from_value(document.clone()).map_err(|e| {
        error!(index, error = %e, "Kubernetes document failed to decode");
        Error::Decode {
            index,
            message: e.to_string(),
        }
    })
}

/// Splits a multi-document YAML stream and classifies it. Empty documents
/// (for example a trailing `---`) are skipped.
pub fn parse_kubernetes_yaml(data: &[u8]) -> Result<KubernetesResources> {
    let mut documents = Vec::new();
    for document in serde_yaml::Deserializer::from_slice(data) {
        let value = Value::deserialize(document)?;
        if !value.is_null() {
            documents.push(value);
        }
    }
    classify(&documents)
}

/// Where a Kubernetes YAML stream comes from.
#[derive(Clone)]
pub enum YamlSource {
    Url { url: String, token: String },
    Path(PathBuf),
    Data(Vec<u8>),
}

impl fmt::Debug for YamlSource {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            YamlSource::Url { url, .. } => f
                .debug_struct("Url")
                .field("url", url)
                .finish_non_exhaustive(),
            YamlSource::Path(path) => f.debug_tuple("Path").field(path).finish(),
            YamlSource::Data(data) => write!(f, "Data({} bytes)", data.len()),
        }
    }
}

/// Reads a YAML stream from `source` and classifies it. URLs are fetched
/// through `client`.
pub async fn read_kubernetes_yaml(
    source: YamlSource,
    client: &dyn DevfileUtils,
    timeout: Option<u64>,
) -> Result<KubernetesResources> {
    let data = match source {
        YamlSource::Url { url, token } => {
            let params = HttpRequestParams::new(url)
                .with_token(token)
                .with_timeout(timeout);
            client.download_in_memory(params).await?
        }
        YamlSource::Path(path) => std::fs::read(&path).map_err(|e| {
            error!(path = %path.display(), error = %e, "Failed to read kubernetes yaml");
            Error::Io(e)
        })?,
        YamlSource::Data(data) => data,
    };
    parse_kubernetes_yaml(&data)
}
