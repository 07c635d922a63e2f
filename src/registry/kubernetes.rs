//! Kubernetes Services as a registry.

use async_trait::async_trait;
use k8s_openapi::api::core::v1::Service;
use kube::api::{Api, ListParams};
use kube::Client;

use super::{FetchError, RegistryFetcher, ServiceRecord};

/// Lists Services in every namespace the client can see.
pub struct KubernetesFetcher {
    client: Client,
}

impl KubernetesFetcher {
    pub fn new(client: Client) -> Self {
        Self { client }
    }

    /// Build a client from the in-cluster environment or local kubeconfig.
    pub async fn try_default() -> Result<Self, FetchError> {
        let client = Client::try_default().await?;
        Ok(Self::new(client))
    }
}

#[async_trait]
impl RegistryFetcher for KubernetesFetcher {
    async fn fetch(&self) -> Result<Vec<ServiceRecord>, FetchError> {
        let api: Api<Service> = Api::all(self.client.clone());
        let list = api.list(&ListParams::default()).await?;
        Ok(list.items.into_iter().map(to_record).collect())
    }

    fn name(&self) -> &'static str {
        "kubernetes"
    }
}

fn to_record(service: Service) -> ServiceRecord {
    let ports = service
        .spec
        .and_then(|spec| spec.ports)
        .unwrap_or_default()
        .into_iter()
        .filter_map(|p| u16::try_from(p.port).ok())
        .collect();

    ServiceRecord {
        name: service.metadata.name.unwrap_or_default(),
        namespace: service.metadata.namespace.unwrap_or_default(),
        ports,
        annotations: service
            .metadata
            .annotations
            .unwrap_or_default()
            .into_iter()
            .collect(),
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use k8s_openapi::api::core::v1::{ServicePort, ServiceSpec};
    use k8s_openapi::apimachinery::pkg::apis::meta::v1::ObjectMeta;
    use std::collections::BTreeMap;

    #[test]
    fn test_service_conversion() {
        let service = Service {
            metadata: ObjectMeta {
                name: Some("blog".into()),
                namespace: Some("web".into()),
                annotations: Some(BTreeMap::from([(
                    "ingress.director/target".to_string(),
                    "blog.example.com".to_string(),
                )])),
                ..Default::default()
            },
            spec: Some(ServiceSpec {
                ports: Some(vec![
                    ServicePort { port: 8080, ..Default::default() },
                    ServicePort { port: 9090, ..Default::default() },
                ]),
                ..Default::default()
            }),
            ..Default::default()
        };

        let record = to_record(service);
        assert_eq!(record.name, "blog");
        assert_eq!(record.namespace, "web");
        assert_eq!(record.ports, vec![8080, 9090]);
        assert_eq!(
            record.annotations.get("ingress.director/target").map(String::as_str),
            Some("blog.example.com")
        );
    }

    #[test]
    fn test_service_without_spec_has_no_ports() {
        let record = to_record(Service::default());
        assert!(record.ports.is_empty());
        assert!(record.backend_target().is_none());
    }
}
