//! `/auth` endpoints: session, profile, addresses, wishlist.

use reqwest::Method;
use tracing::instrument;

use coloring_bliss_core::{AddressId, ProductId};

use crate::client::ApiClient;
use crate::error::ApiError;
use crate::types::user::WishlistAdd;
use crate::types::{
    AddressInput, AuthSession, Credentials, PasswordChange, Product, ProfileUpdate,
    Registration, User, UserEnvelope, Wishlist,
};

/// `PUT /auth/address/{id}` body that only flips the default flag.
#[derive(serde::Serialize)]
#[serde(rename_all = "camelCase")]
struct MakeDefault {
    is_default: bool,
}

impl ApiClient {
    /// `POST /auth/login`
    #[instrument(skip(self, credentials))]
    pub async fn login(&self, credentials: &Credentials) -> Result<AuthSession, ApiError> {
        self.post(self.endpoint(&["auth", "login"]), credentials)
            .await
    }

    /// `POST /auth/register`
    #[instrument(skip(self, registration))]
    pub async fn register(&self, registration: &Registration) -> Result<AuthSession, ApiError> {
        self.post(self.endpoint(&["auth", "register"]), registration)
            .await
    }

    /// `GET /auth/me`
    #[instrument(skip(self))]
    pub async fn me(&self) -> Result<User, ApiError> {
        let envelope: UserEnvelope = self.get(self.endpoint(&["auth", "me"])).await?;
        Ok(envelope.user)
    }

    /// `PUT /auth/me`
    #[instrument(skip(self, profile))]
    pub async fn update_profile(&self, profile: &ProfileUpdate) -> Result<User, ApiError> {
        let envelope: UserEnvelope = self.put(self.endpoint(&["auth", "me"]), profile).await?;
        Ok(envelope.user)
    }

    /// `PUT /auth/password`
    #[instrument(skip(self, change))]
    pub async fn change_password(&self, change: &PasswordChange) -> Result<(), ApiError> {
        self.send_unit_json(Method::PUT, self.endpoint(&["auth", "password"]), change)
            .await
    }

    /// `POST /auth/address`
    #[instrument(skip(self, address))]
    pub async fn add_address(&self, address: &AddressInput) -> Result<User, ApiError> {
        let envelope: UserEnvelope = self
            .post(self.endpoint(&["auth", "address"]), address)
            .await?;
        Ok(envelope.user)
    }

    /// `PUT /auth/address/{id}`
    #[instrument(skip(self, address), fields(address_id = %id))]
    pub async fn update_address(
        &self,
        id: &AddressId,
        address: &AddressInput,
    ) -> Result<User, ApiError> {
        let envelope: UserEnvelope = self
            .put(self.endpoint(&["auth", "address", id.as_str()]), address)
            .await?;
        Ok(envelope.user)
    }

    /// `PUT /auth/address/{id}` with only `isDefault: true`.
    #[instrument(skip(self), fields(address_id = %id))]
    pub async fn set_default_address(&self, id: &AddressId) -> Result<User, ApiError> {
        let envelope: UserEnvelope = self
            .put(
                self.endpoint(&["auth", "address", id.as_str()]),
                &MakeDefault { is_default: true },
            )
            .await?;
        Ok(envelope.user)
    }

    /// `DELETE /auth/address/{id}`
    #[instrument(skip(self), fields(address_id = %id))]
    pub async fn delete_address(&self, id: &AddressId) -> Result<User, ApiError> {
        let envelope: UserEnvelope = self
            .delete(self.endpoint(&["auth", "address", id.as_str()]))
            .await?;
        Ok(envelope.user)
    }

    /// `GET /auth/wishlist`: populated wishlist products.
    #[instrument(skip(self))]
    pub async fn wishlist(&self) -> Result<Vec<Product>, ApiError> {
        let wishlist: Wishlist = self.get(self.endpoint(&["auth", "wishlist"])).await?;
        Ok(wishlist.wishlist)
    }

    /// `POST /auth/wishlist`
    #[instrument(skip(self), fields(product_id = %product_id))]
    pub async fn add_to_wishlist(&self, product_id: &ProductId) -> Result<(), ApiError> {
        self.send_unit_json(
            Method::POST,
            self.endpoint(&["auth", "wishlist"]),
            &WishlistAdd {
                product_id: product_id.as_str(),
            },
        )
        .await
    }

    /// `DELETE /auth/wishlist/{productId}`
    #[instrument(skip(self), fields(product_id = %product_id))]
    pub async fn remove_from_wishlist(&self, product_id: &ProductId) -> Result<(), ApiError> {
        self.send_unit(
            Method::DELETE,
            self.endpoint(&["auth", "wishlist", product_id.as_str()]),
        )
        .await
    }
}
