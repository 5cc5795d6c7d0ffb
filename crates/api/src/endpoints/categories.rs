//! `/categories` endpoints.

use reqwest::Method;
use tracing::instrument;

use coloring_bliss_core::CategoryId;

use crate::client::ApiClient;
use crate::error::ApiError;
use crate::types::{Category, CategoryEnvelope, CategoryForm, CategoryList};

impl ApiClient {
    /// `GET /categories`
    #[instrument(skip(self))]
    pub async fn list_categories(&self) -> Result<Vec<Category>, ApiError> {
        let list: CategoryList = self.get(self.endpoint(&["categories"])).await?;
        Ok(list.categories)
    }

    /// `GET /categories/id/{id}`
    #[instrument(skip(self), fields(category_id = %id))]
    pub async fn category_by_id(&self, id: &CategoryId) -> Result<Category, ApiError> {
        let envelope: CategoryEnvelope = self
            .get(self.endpoint(&["categories", "id", id.as_str()]))
            .await?;
        Ok(envelope.category)
    }

    /// `POST /categories` (admin)
    #[instrument(skip(self, form), fields(name = %form.name))]
    pub async fn create_category(&self, form: &CategoryForm) -> Result<(), ApiError> {
        self.send_unit_json(Method::POST, self.endpoint(&["categories"]), form)
            .await
    }

    /// `PUT /categories/{id}` (admin)
    #[instrument(skip(self, form), fields(category_id = %id))]
    pub async fn update_category(
        &self,
        id: &CategoryId,
        form: &CategoryForm,
    ) -> Result<(), ApiError> {
        self.send_unit_json(
            Method::PUT,
            self.endpoint(&["categories", id.as_str()]),
            form,
        )
        .await
    }

    /// `DELETE /categories/{id}` (admin)
    #[instrument(skip(self), fields(category_id = %id))]
    pub async fn delete_category(&self, id: &CategoryId) -> Result<(), ApiError> {
        self.send_unit(
            Method::DELETE,
            self.endpoint(&["categories", id.as_str()]),
        )
        .await
    }
}
