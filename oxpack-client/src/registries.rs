//! Registry endpoints

use reqwest::header::CONTENT_TYPE;
use tracing::debug;

use crate::RegistryClient;
use crate::error::Result;
use oxpack_core::domain::registry::Registry;
use oxpack_core::dto::source::SourceUploadInfo;

impl RegistryClient {
    /// Fetch a registry by name
    ///
    /// # Arguments
    /// * `name` - The registry name
    /// * `resource_group` - Optional resource group to disambiguate
    ///   registries with the same name
    ///
    /// # Returns
    /// The registry, including its service tier
    pub async fn get_registry(&self, name: &str, resource_group: Option<&str>) -> Result<Registry> {
        let mut url = format!("{}/api/registries/{}", self.base_url, name);
        if let Some(group) = resource_group {
            url.push_str("?resource_group=");
            url.push_str(group);
        }
        debug!("Fetching registry {}", name);

        let response = self.client.get(&url).send().await?;

        self.handle_response(response).await
    }

    /// Request an upload slot for a source archive
    ///
    /// # Arguments
    /// * `registry` - The registry the source belongs to
    ///
    /// # Returns
    /// A pre-authorized upload URL and the relative path to reference the
    /// archive by in a run request
    pub async fn request_source_upload(&self, registry: &str) -> Result<SourceUploadInfo> {
        let url = format!("{}/api/registries/{}/uploads", self.base_url, registry);
        let response = self.client.post(&url).send().await?;

        self.handle_response(response).await
    }

    /// Upload a gzipped source archive to a previously requested slot
    ///
    /// # Arguments
    /// * `upload_url` - The pre-authorized URL from [`request_source_upload`](Self::request_source_upload)
    /// * `archive` - The gzipped tar bytes
    pub async fn upload_source(&self, upload_url: &str, archive: Vec<u8>) -> Result<()> {
        debug!("Uploading source archive ({} bytes)", archive.len());

        let response = self
            .client
            .put(upload_url)
            .header(CONTENT_TYPE, "application/gzip")
            .body(archive)
            .send()
            .await?;

        self.handle_empty_response(response).await
    }
}
