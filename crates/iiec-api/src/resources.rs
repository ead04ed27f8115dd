// Top-level CRUD resources
//
// Projects, events, and products share one URL shape:
// `GET /{resource}`, `POST /{resource}/`, `PUT|DELETE /{resource}/{id}`.
// Record types are chosen by the caller, so the same four calls serve
// typed records and raw `serde_json::Value` alike.

use secrecy::SecretString;
use serde::Serialize;
use serde::de::DeserializeOwned;
use tracing::debug;

use crate::client::ApiClient;
use crate::error::Error;

impl ApiClient {
    /// List every record of a resource.
    ///
    /// `GET /{resource}`
    pub async fn list<T: DeserializeOwned>(
        &self,
        resource: &str,
        token: Option<&SecretString>,
    ) -> Result<Vec<T>, Error> {
        let url = self.url(resource)?;
        debug!(resource, "listing records");
        self.get(url, token).await
    }

    /// Fetch a single record.
    ///
    /// `GET /{resource}/{id}`
    pub async fn fetch<T: DeserializeOwned>(
        &self,
        resource: &str,
        id: i64,
        token: Option<&SecretString>,
    ) -> Result<T, Error> {
        let url = self.url(&format!("{resource}/{id}"))?;
        self.get(url, token).await
    }

    /// Create a record and return the stored version.
    ///
    /// `POST /{resource}/`
    pub async fn create<B: Serialize, T: DeserializeOwned>(
        &self,
        resource: &str,
        body: &B,
        token: Option<&SecretString>,
    ) -> Result<T, Error> {
        let url = self.url(&format!("{resource}/"))?;
        self.post(url, body, token).await
    }

    /// Replace a record and return the stored version.
    ///
    /// `PUT /{resource}/{id}`
    pub async fn update<B: Serialize, T: DeserializeOwned>(
        &self,
        resource: &str,
        id: i64,
        body: &B,
        token: Option<&SecretString>,
    ) -> Result<T, Error> {
        let url = self.url(&format!("{resource}/{id}"))?;
        self.put(url, body, token).await
    }

    /// Delete a record.
    ///
    /// `DELETE /{resource}/{id}`
    pub async fn remove(
        &self,
        resource: &str,
        id: i64,
        token: Option<&SecretString>,
    ) -> Result<(), Error> {
        let url = self.url(&format!("{resource}/{id}"))?;
        self.delete(url, token).await
    }
}
