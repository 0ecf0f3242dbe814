use super::category::Category;
use super::hashtags::{extract_hashtags, normalize_hashtag};
use crate::db::Post;
use crate::settings::settings;
use strum::Display;

#[derive(Debug, Clone, PartialEq, Eq, Display)]
pub enum ComposeError {
    #[strum(serialize = "missing-category")]
    MissingCategory,
    #[strum(serialize = "missing-location")]
    MissingLocation,
    #[strum(serialize = "body-too-short")]
    BodyTooShort(usize),
    #[strum(serialize = "body-too-long")]
    BodyTooLong(usize),
    #[strum(serialize = "too-many-hashtags")]
    TooManyHashtags(usize),
    #[strum(serialize = "too-many-images")]
    TooManyImages(usize),
    #[strum(serialize = "empty-image-url")]
    EmptyImageUrl,
}

impl std::error::Error for ComposeError {}

/// Where a post happened, down to the cell. All three levels are recorded on
/// the row so each rollup can filter without joins.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct LocationRef {
    pub cell_id: String,
    pub sector_id: String,
    pub district_id: String,
}

/// Content shape of a finished post. Selecting the shape picks the
/// validation rules: a text post stands on its body, an image post may lean
/// on its pictures.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum PostShape {
    Text,
    Image,
}

impl PostShape {
    pub fn from_content(images: &[String]) -> PostShape {
        if images.is_empty() {
            PostShape::Text
        } else {
            PostShape::Image
        }
    }
}

/// Incremental assembly of a post record. Nothing is validated until
/// `finalize`, which either yields a well-formed row or the first rule the
/// draft breaks.
#[derive(Debug, Clone)]
pub struct PostDraft {
    id: String,
    author: String,
    body: String,
    category: Option<Category>,
    location: Option<LocationRef>,
    hashtags: Vec<String>,
    images: Vec<String>,
}

impl PostDraft {
    pub fn new(id: impl Into<String>, author: impl Into<String>) -> Self {
        Self {
            id: id.into(),
            author: author.into(),
            body: String::new(),
            category: None,
            location: None,
            hashtags: Vec::new(),
            images: Vec::new(),
        }
    }

    pub fn body(mut self, body: impl Into<String>) -> Self {
        self.body = body.into();
        self
    }

    pub fn category(mut self, category: Category) -> Self {
        self.category = Some(category);
        self
    }

    pub fn location(mut self, location: LocationRef) -> Self {
        self.location = Some(location);
        self
    }

    pub fn hashtag(mut self, tag: impl AsRef<str>) -> Self {
        if let Some(tag) = normalize_hashtag(tag.as_ref()) {
            if !self.hashtags.contains(&tag) {
                self.hashtags.push(tag);
            }
        }
        self
    }

    pub fn image(mut self, url: impl Into<String>) -> Self {
        self.images.push(url.into());
        self
    }

    pub fn finalize(self, created_at: i64) -> Result<Post, ComposeError> {
        let s = settings();

        let category = self.category.ok_or(ComposeError::MissingCategory)?;
        let location = self.location.ok_or(ComposeError::MissingLocation)?;

        let body = self.body.trim().to_string();
        if body.chars().count() > s.compose.max_body_length {
            return Err(ComposeError::BodyTooLong(body.chars().count()));
        }

        match PostShape::from_content(&self.images) {
            PostShape::Text => {
                if body.chars().count() < s.compose.min_body_length {
                    return Err(ComposeError::BodyTooShort(body.chars().count()));
                }
            }
            PostShape::Image => {
                if self.images.len() > s.compose.max_images {
                    return Err(ComposeError::TooManyImages(self.images.len()));
                }
                if self.images.iter().any(|url| url.trim().is_empty()) {
                    return Err(ComposeError::EmptyImageUrl);
                }
            }
        }

        let mut hashtags = self.hashtags;
        for tag in extract_hashtags(&body) {
            if !hashtags.contains(&tag) {
                hashtags.push(tag);
            }
        }
        if hashtags.len() > s.compose.max_hashtags {
            return Err(ComposeError::TooManyHashtags(hashtags.len()));
        }

        Ok(Post {
            id: self.id,
            author: self.author,
            body,
            category: category.to_string(),
            hashtags: serde_json::to_string(&hashtags).expect("string list serializes"),
            images: serde_json::to_string(&self.images).expect("string list serializes"),
            cell_id: location.cell_id,
            sector_id: location.sector_id,
            district_id: location.district_id,
            created_at,
        })
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn kimironko() -> LocationRef {
        LocationRef {
            cell_id: "cell-kibagabaga".into(),
            sector_id: "sector-kimironko".into(),
            district_id: "district-gasabo".into(),
        }
    }

    fn draft() -> PostDraft {
        PostDraft::new("post-1", "did:umg:alice")
            .category(Category::Environment)
            .location(kimironko())
    }

    #[test]
    fn test_text_post_requires_body() {
        let err = draft().body("   ").finalize(100).unwrap_err();
        assert_eq!(err, ComposeError::BodyTooShort(0));
    }

    #[test]
    fn test_image_post_allows_empty_body() {
        let post = draft().image("https://cdn.example/umuganda.jpg").finalize(100).unwrap();
        assert_eq!(post.body, "");
        assert_eq!(post.images, r#"["https://cdn.example/umuganda.jpg"]"#);
    }

    #[test]
    fn test_missing_category_rejected() {
        let err = PostDraft::new("post-1", "did:umg:alice")
            .location(kimironko())
            .body("Planted 40 trees")
            .finalize(100)
            .unwrap_err();
        assert_eq!(err, ComposeError::MissingCategory);
    }

    #[test]
    fn test_missing_location_rejected() {
        let err = PostDraft::new("post-1", "did:umg:alice")
            .category(Category::Environment)
            .body("Planted 40 trees")
            .finalize(100)
            .unwrap_err();
        assert_eq!(err, ComposeError::MissingLocation);
    }

    #[test]
    fn test_image_limit() {
        let mut d = draft().body("Before and after");
        for i in 0..6 {
            d = d.image(format!("https://cdn.example/{i}.jpg"));
        }
        assert_eq!(d.finalize(100).unwrap_err(), ComposeError::TooManyImages(6));
    }

    #[test]
    fn test_hashtag_limit_counts_body_tags() {
        let body = "Big day #t1 #t2 #t3 #t4 #t5 #t6 #t7 #t8 #t9 #t10 #t11";
        let err = draft().body(body).finalize(100).unwrap_err();
        assert_eq!(err, ComposeError::TooManyHashtags(11));
    }

    #[test]
    fn test_explicit_and_body_hashtags_merge_without_duplicates() {
        let post = draft()
            .hashtag("#Umuganda")
            .body("Tree planting #umuganda #gasabo")
            .finalize(100)
            .unwrap();
        assert_eq!(post.hashtags, r##"["#umuganda","#gasabo"]"##);
    }

    #[test]
    fn test_shape_dispatch() {
        assert_eq!(PostShape::from_content(&[]), PostShape::Text);
        assert_eq!(
            PostShape::from_content(&["https://cdn.example/a.jpg".to_string()]),
            PostShape::Image
        );
    }
}
