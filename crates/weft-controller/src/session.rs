//! Controller API session.
//!
//! Reads return a tagged [`Lookup`] so that "not found" is an ordinary
//! answer driving the create branch of locate-or-create, while every other
//! failure propagates verbatim as [`WeftError::Api`]. The session performs
//! no retries; one invocation makes one synchronous attempt per call.

use reqwest::StatusCode;
use reqwest::blocking::Client;

use weft_common::error::{Result, WeftError};

use crate::resources::{Fqn, Resource};

/// Outcome of a read against the controller.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum Lookup<T> {
    /// The resource exists; here is its current snapshot.
    Found(T),
    /// The controller holds no resource under that name.
    Missing,
}

impl<T> Lookup<T> {
    /// Converts into an `Option`, discarding the distinction's provenance.
    pub fn found(self) -> Option<T> {
        match self {
            Self::Found(value) => Some(value),
            Self::Missing => None,
        }
    }
}

/// Typed access to the controller resource graph.
///
/// One implementation talks HTTP to the real controller; tests substitute
/// an in-memory resource store.
pub trait ControllerApi {
    /// Reads a resource by fully-qualified name.
    ///
    /// # Errors
    ///
    /// Returns an error for any failure other than "not found".
    fn read<R: Resource>(&self, fqn: &Fqn) -> Result<Lookup<R>>;

    /// Reads a resource by controller-assigned UUID.
    ///
    /// # Errors
    ///
    /// Returns an error for any failure other than "not found".
    fn read_by_uuid<R: Resource>(&self, uuid: &str) -> Result<Lookup<R>>;

    /// Persists a new resource, returning the stored form with its
    /// controller-assigned identity (and any allocated attributes).
    ///
    /// # Errors
    ///
    /// Returns an error if the controller rejects the create.
    fn create<R: Resource>(&self, resource: &R) -> Result<R>;

    /// Deletes a resource by UUID. Deleting an absent resource succeeds.
    ///
    /// # Errors
    ///
    /// Returns an error for any failure other than "not found".
    fn delete<R: Resource>(&self, uuid: &str) -> Result<()>;
}

/// Blocking HTTP session against the controller's REST API.
#[derive(Debug)]
pub struct HttpSession {
    client: Client,
    base: String,
}

impl HttpSession {
    /// Creates a session for the given controller endpoint.
    #[must_use]
    pub fn new(endpoint: &str) -> Self {
        Self {
            client: Client::new(),
            base: endpoint.trim_end_matches('/').to_string(),
        }
    }

    fn api_error(err: &reqwest::Error) -> WeftError {
        WeftError::Api {
            message: err.to_string(),
        }
    }

    fn decode<R: Resource>(response: reqwest::blocking::Response) -> Result<Lookup<R>> {
        if response.status() == StatusCode::NOT_FOUND {
            return Ok(Lookup::Missing);
        }
        let response = response.error_for_status().map_err(|e| Self::api_error(&e))?;
        let resource = response.json::<R>().map_err(|e| Self::api_error(&e))?;
        Ok(Lookup::Found(resource))
    }
}

impl ControllerApi for HttpSession {
    fn read<R: Resource>(&self, fqn: &Fqn) -> Result<Lookup<R>> {
        let url = format!("{}/{}/fq-name/{fqn}", self.base, R::KIND);
        let response = self.client.get(url).send().map_err(|e| Self::api_error(&e))?;
        Self::decode(response)
    }

    fn read_by_uuid<R: Resource>(&self, uuid: &str) -> Result<Lookup<R>> {
        let url = format!("{}/{}/{uuid}", self.base, R::KIND);
        let response = self.client.get(url).send().map_err(|e| Self::api_error(&e))?;
        Self::decode(response)
    }

    fn create<R: Resource>(&self, resource: &R) -> Result<R> {
        let url = format!("{}/{}", self.base, R::KIND);
        let response = self
            .client
            .post(url)
            .json(resource)
            .send()
            .map_err(|e| Self::api_error(&e))?
            .error_for_status()
            .map_err(|e| Self::api_error(&e))?;
        tracing::debug!(kind = R::KIND, fqn = %resource.fq_name(), "resource created");
        response.json::<R>().map_err(|e| Self::api_error(&e))
    }

    fn delete<R: Resource>(&self, uuid: &str) -> Result<()> {
        let url = format!("{}/{}/{uuid}", self.base, R::KIND);
        let response = self
            .client
            .delete(url)
            .send()
            .map_err(|e| Self::api_error(&e))?;
        if response.status() == StatusCode::NOT_FOUND {
            return Ok(());
        }
        let _ = response.error_for_status().map_err(|e| Self::api_error(&e))?;
        tracing::debug!(kind = R::KIND, uuid, "resource deleted");
        Ok(())
    }
}
