pub mod draft;
pub mod session;

pub use draft::{DraftImage, ImageDraft};
pub use session::{CurrentAdmin, Flash, FlashKind, keys};
