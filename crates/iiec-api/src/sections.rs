// Project section endpoints
//
// Sections are listed and created under their parent
// (`/projects/{project_id}/sections`) but addressed by their own id for
// reads, updates, and deletes (`/projects/sections/{section_id}`).

use secrecy::SecretString;
use serde::Serialize;
use serde::de::DeserializeOwned;
use tracing::debug;

use crate::client::ApiClient;
use crate::error::Error;

impl ApiClient {
    /// `GET /projects/{project_id}/sections`
    pub async fn list_sections<T: DeserializeOwned>(
        &self,
        project_id: i64,
        token: Option<&SecretString>,
    ) -> Result<Vec<T>, Error> {
        let url = self.url(&format!("projects/{project_id}/sections"))?;
        debug!(project_id, "listing project sections");
        self.get(url, token).await
    }

    /// `GET /projects/sections/{section_id}`
    pub async fn fetch_section<T: DeserializeOwned>(
        &self,
        section_id: i64,
        token: Option<&SecretString>,
    ) -> Result<T, Error> {
        let url = self.url(&format!("projects/sections/{section_id}"))?;
        self.get(url, token).await
    }

    /// `POST /projects/{project_id}/sections`
    pub async fn create_section<B: Serialize, T: DeserializeOwned>(
        &self,
        project_id: i64,
        body: &B,
        token: Option<&SecretString>,
    ) -> Result<T, Error> {
        let url = self.url(&format!("projects/{project_id}/sections"))?;
        self.post(url, body, token).await
    }

    /// `PUT /projects/sections/{section_id}`
    pub async fn update_section<B: Serialize, T: DeserializeOwned>(
        &self,
        section_id: i64,
        body: &B,
        token: Option<&SecretString>,
    ) -> Result<T, Error> {
        let url = self.url(&format!("projects/sections/{section_id}"))?;
        self.put(url, body, token).await
    }

    /// `DELETE /projects/sections/{section_id}`
    pub async fn remove_section(
        &self,
        section_id: i64,
        token: Option<&SecretString>,
    ) -> Result<(), Error> {
        let url = self.url(&format!("projects/sections/{section_id}"))?;
        self.delete(url, token).await
    }
}
