//! Account wire types and request bodies.

use coloring_bliss_core::{AddressId, UserId, UserRole};
use serde::{Deserialize, Serialize};

use super::{
    order::{ShippingAddress, default_country},
    product::{Product, ProductRef},
};

/// A shopper or admin account.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct User {
    #[serde(rename = "_id", default)]
    pub id: UserId,
    pub first_name: String,
    pub last_name: String,
    pub email: String,
    #[serde(default)]
    pub phone: Option<String>,
    #[serde(default)]
    pub role: UserRole,
    #[serde(default)]
    pub addresses: Vec<Address>,
    #[serde(default)]
    pub wishlist: Vec<ProductRef>,
}

impl User {
    #[must_use]
    pub fn full_name(&self) -> String {
        format!("{} {}", self.first_name, self.last_name).trim().to_string()
    }

    #[must_use]
    pub fn is_admin(&self) -> bool {
        self.role == UserRole::Admin
    }

    /// The address flagged default, or the first saved one.
    #[must_use]
    pub fn default_address(&self) -> Option<&Address> {
        self.addresses
            .iter()
            .find(|a| a.is_default)
            .or_else(|| self.addresses.first())
    }

    #[must_use]
    pub fn has_in_wishlist(&self, product_id: &str) -> bool {
        self.wishlist.iter().any(|p| p.id().as_str() == product_id)
    }
}

/// A saved address on the account.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Address {
    #[serde(rename = "_id", default)]
    pub id: Option<AddressId>,
    #[serde(default)]
    pub label: Option<String>,
    #[serde(default)]
    pub first_name: String,
    #[serde(default)]
    pub last_name: String,
    #[serde(default)]
    pub street: String,
    #[serde(default)]
    pub city: String,
    #[serde(default)]
    pub state: String,
    #[serde(default)]
    pub zip_code: String,
    #[serde(default = "default_country")]
    pub country: String,
    #[serde(default)]
    pub phone: String,
    #[serde(default)]
    pub is_default: bool,
}

impl From<&Address> for ShippingAddress {
    fn from(address: &Address) -> Self {
        Self {
            first_name: address.first_name.clone(),
            last_name: address.last_name.clone(),
            email: None,
            street: address.street.clone(),
            city: address.city.clone(),
            state: address.state.clone(),
            zip_code: address.zip_code.clone(),
            country: address.country.clone(),
            phone: address.phone.clone(),
        }
    }
}

/// Body for `POST /auth/address` and `PUT /auth/address/{id}`.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct AddressInput {
    #[serde(skip_serializing_if = "Option::is_none")]
    pub label: Option<String>,
    pub first_name: String,
    pub last_name: String,
    pub street: String,
    pub city: String,
    pub state: String,
    pub zip_code: String,
    pub country: String,
    pub phone: String,
    pub is_default: bool,
}

impl AddressInput {
    /// Street, city, state and zip code must be filled in.
    #[must_use]
    pub fn is_complete(&self) -> bool {
        [&self.street, &self.city, &self.state, &self.zip_code]
            .iter()
            .all(|field| !field.trim().is_empty())
    }

    /// A saved copy of a checkout shipping address.
    #[must_use]
    pub fn from_shipping(address: &ShippingAddress, is_default: bool) -> Self {
        Self {
            label: Some("Home".to_string()),
            first_name: address.first_name.clone(),
            last_name: address.last_name.clone(),
            street: address.street.clone(),
            city: address.city.clone(),
            state: address.state.clone(),
            zip_code: address.zip_code.clone(),
            country: address.country.clone(),
            phone: address.phone.clone(),
            is_default,
        }
    }
}

/// `POST /auth/login` body.
#[derive(Debug, Clone, Serialize)]
pub struct Credentials {
    pub email: String,
    pub password: String,
}

/// `POST /auth/register` body. The confirmation never leaves the process.
#[derive(Debug, Clone, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct Registration {
    pub first_name: String,
    pub last_name: String,
    pub email: String,
    pub password: String,
    #[serde(skip)]
    pub confirm_password: String,
}

/// `PUT /auth/me` body.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct ProfileUpdate {
    pub first_name: String,
    pub last_name: String,
    pub phone: String,
}

/// `PUT /auth/password` body. The confirmation never leaves the process.
#[derive(Debug, Clone, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct PasswordChange {
    pub current_password: String,
    pub new_password: String,
    #[serde(skip)]
    pub confirm_password: String,
}

/// `data` of login and register responses.
#[derive(Debug, Clone, PartialEq, Deserialize)]
pub struct AuthSession {
    pub user: User,
    pub token: String,
}

/// `data` of responses that return the refreshed account.
#[derive(Debug, Clone, PartialEq, Deserialize)]
pub struct UserEnvelope {
    pub user: User,
}

/// `GET /auth/wishlist` payload.
#[derive(Debug, Clone, Default, PartialEq, Deserialize)]
pub struct Wishlist {
    #[serde(default)]
    pub wishlist: Vec<Product>,
}

/// `POST /auth/wishlist` body.
#[derive(Debug, Clone, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct WishlistAdd<'a> {
    pub product_id: &'a str,
}

#[cfg(test)]
#[allow(clippy::unwrap_used)]
mod tests {
    use serde_json::json;

    use super::*;

    #[test]
    fn test_decodes_user_with_mixed_wishlist() {
        let user: User = serde_json::from_value(json!({
            "_id": "u1",
            "firstName": "Ana",
            "lastName": "Reyes",
            "email": "ana@example.ph",
            "role": "admin",
            "addresses": [
                { "_id": "a1", "street": "1 Rizal Ave", "city": "Manila",
                  "state": "Metro Manila", "zipCode": "1000" },
                { "_id": "a2", "street": "2 Luna St", "city": "Pasig",
                  "state": "Metro Manila", "zipCode": "1600", "isDefault": true }
            ],
            "wishlist": ["p1", { "_id": "p2", "name": "Planner", "slug": "planner", "price": 300 }]
        }))
        .unwrap();

        assert!(user.is_admin());
        assert_eq!(user.full_name(), "Ana Reyes");
        assert_eq!(
            user.default_address().and_then(|a| a.id.as_ref()).map(AddressId::as_str),
            Some("a2")
        );
        assert_eq!(user.addresses[0].country, "Philippines");
        assert!(user.has_in_wishlist("p1"));
        assert!(user.has_in_wishlist("p2"));
        assert!(!user.has_in_wishlist("p3"));
    }

    #[test]
    fn test_registration_never_sends_confirmation() {
        let body = serde_json::to_value(Registration {
            first_name: "Ana".to_string(),
            last_name: "Reyes".to_string(),
            email: "ana@example.ph".to_string(),
            password: "secret1".to_string(),
            confirm_password: "secret1".to_string(),
        })
        .unwrap();
        assert!(body.get("confirmPassword").is_none());
        assert_eq!(body["firstName"], "Ana");
    }

    #[test]
    fn test_address_completeness() {
        let mut input = AddressInput::from_shipping(&ShippingAddress::default(), false);
        assert!(!input.is_complete());
        input.street = "1 Rizal Ave".to_string();
        input.city = "Manila".to_string();
        input.state = "Metro Manila".to_string();
        input.zip_code = "1000".to_string();
        assert!(input.is_complete());
    }
}
