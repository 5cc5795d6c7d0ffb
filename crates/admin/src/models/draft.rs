//! Image list of the product form being edited.
//!
//! Uploads land on the store API immediately but only become part of a
//! product when the form is saved. Until then the list lives in the session,
//! tied to the product it was opened for (`None` for a new product).

use coloring_bliss_api::types::{Product, ProductImage};
use coloring_bliss_core::ProductId;
use serde::{Deserialize, Serialize};

use crate::forms::MAX_PRODUCT_IMAGES;

/// One image on the form. `saved` images already belong to the product, so
/// removing them from the form leaves the stored file alone.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct DraftImage {
    pub url: String,
    pub saved: bool,
}

/// Ordered images of the open product form; the first is primary.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct ImageDraft {
    pub product_id: Option<ProductId>,
    pub images: Vec<DraftImage>,
}

impl ImageDraft {
    /// Empty list for the new product form.
    #[must_use]
    pub fn for_new() -> Self {
        Self::default()
    }

    /// The product's stored images, primary first.
    #[must_use]
    pub fn for_product(product: &Product) -> Self {
        let mut images: Vec<DraftImage> = product
            .images
            .iter()
            .map(|image| DraftImage {
                url: image.url.clone(),
                saved: true,
            })
            .collect();
        if let Some(primary) = product.images.iter().position(|image| image.is_primary) {
            let image = images.remove(primary);
            images.insert(0, image);
        }

        Self {
            product_id: Some(product.id.clone()),
            images,
        }
    }

    /// Whether this draft was opened for `product_id`.
    #[must_use]
    pub fn is_for(&self, product_id: Option<&ProductId>) -> bool {
        self.product_id.as_ref() == product_id
    }

    /// Slots left before the image limit.
    #[must_use]
    pub fn remaining(&self) -> usize {
        MAX_PRODUCT_IMAGES.saturating_sub(self.images.len())
    }

    /// Append newly uploaded images.
    pub fn add(&mut self, urls: Vec<String>) {
        self.images
            .extend(urls.into_iter().map(|url| DraftImage { url, saved: false }));
    }

    /// Take `url` off the form, returning it if it was there.
    pub fn remove(&mut self, url: &str) -> Option<DraftImage> {
        let index = self.images.iter().position(|image| image.url == url)?;
        Some(self.images.remove(index))
    }

    /// Move `url` to the front. Returns false when it is not on the form.
    pub fn make_primary(&mut self, url: &str) -> bool {
        match self.images.iter().position(|image| image.url == url) {
            Some(index) => {
                let image = self.images.remove(index);
                self.images.insert(0, image);
                true
            }
            None => false,
        }
    }

    /// Images for the save request; alt text is the product name.
    #[must_use]
    pub fn to_images(&self, alt: &str) -> Vec<ProductImage> {
        self.images
            .iter()
            .enumerate()
            .map(|(index, image)| ProductImage {
                url: image.url.clone(),
                alt: Some(alt.to_string()),
                is_primary: index == 0,
            })
            .collect()
    }

    /// Form page this draft belongs to.
    #[must_use]
    pub fn form_path(&self) -> String {
        self.product_id
            .as_ref()
            .map_or_else(|| "/products/new".to_string(), |id| format!("/products/{id}/edit"))
    }
}
