pub mod category;
pub mod draft;
pub mod hashtags;
pub mod reaction;

pub use category::{Category, ALL_CATEGORIES};
pub use draft::{ComposeError, LocationRef, PostDraft, PostShape};
pub use hashtags::{extract_hashtags, normalize_hashtag};
pub use reaction::ReactionKind;
