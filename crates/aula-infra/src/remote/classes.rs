//! HTTP class directory.
//!
//! Reads the signed-in user's classes from the `classes` REST resource.
//! Row-level security on the backend limits the rows to the token's owner.

use aula_core::auth::AuthSession;
use aula_core::directory::ClassDirectory;
use aula_types::error::RepositoryError;
use aula_types::wizard::ClassSummary;

use super::{RemoteEndpoint, status_error};

const CLASS_COLUMNS: &str = "id,subject,grade,total_students,has_special_needs,special_needs_notes";

pub struct HttpClassDirectory {
    endpoint: RemoteEndpoint,
}

impl HttpClassDirectory {
    pub fn new(endpoint: RemoteEndpoint) -> Self {
        Self { endpoint }
    }
}

impl ClassDirectory for HttpClassDirectory {
    async fn list_classes(
        &self,
        session: &AuthSession,
    ) -> Result<Vec<ClassSummary>, RepositoryError> {
        let url = self.endpoint.table_url("classes");

        let response = self
            .endpoint
            .get(&url, session)
            .query(&[("select", CLASS_COLUMNS), ("order", "grade.asc,subject.asc")])
            .send()
            .await
            .map_err(|e| RepositoryError::Query(format!("HTTP request failed: {e}")))?;

        let status = response.status();
        if !status.is_success() {
            let body = response.text().await.unwrap_or_default();
            return Err(status_error(status, &body));
        }

        response
            .json::<Vec<ClassSummary>>()
            .await
            .map_err(|e| RepositoryError::Query(format!("invalid class list: {e}")))
    }
}
