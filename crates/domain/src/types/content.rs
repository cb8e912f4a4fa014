//! Moderated content: posts, marketplace products and reviews

use serde::{Deserialize, Serialize};

/// Content filter accepted by the content endpoints.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "UPPERCASE")]
pub enum ContentKind {
    Post,
    Product,
    Review,
}

impl ContentKind {
    #[must_use]
    pub const fn as_str(self) -> &'static str {
        match self {
            Self::Post => "POST",
            Self::Product => "PRODUCT",
            Self::Review => "REVIEW",
        }
    }

    /// Path segment of the matching delete action.
    #[must_use]
    pub const fn delete_segment(self) -> &'static str {
        match self {
            Self::Post => "delete_post",
            Self::Product => "delete_product",
            Self::Review => "delete_review",
        }
    }
}

impl std::str::FromStr for ContentKind {
    type Err = String;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.trim().to_ascii_uppercase().as_str() {
            "POST" | "POSTS" => Ok(Self::Post),
            "PRODUCT" | "PRODUCTS" => Ok(Self::Product),
            "REVIEW" | "REVIEWS" => Ok(Self::Review),
            other => Err(format!("unknown content type '{other}'")),
        }
    }
}

/// Author summary embedded in content records.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Author {
    pub id: String,
    pub username: String,
    #[serde(default)]
    pub fullname: Option<String>,
    #[serde(default)]
    pub profile_picture: Option<String>,
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct PostMedia {
    pub id: String,
    pub file: String,
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct MediaFile {
    pub id: u64,
    pub file: String,
    #[serde(default)]
    pub media_type: Option<String>,
}

/// Post quoted by another post.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct QuotedPost {
    pub id: String,
    pub user: Author,
    pub body: String,
    #[serde(default)]
    pub media: Vec<PostMedia>,
    pub created_at: String,
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Post {
    pub id: String,
    pub user: Author,
    pub body: String,
    #[serde(default)]
    pub media: Vec<PostMedia>,
    #[serde(default)]
    pub parent_post: Option<String>,
    #[serde(default)]
    pub quoted_post: Option<String>,
    #[serde(default)]
    pub quoted_post_detail: Option<QuotedPost>,
    #[serde(default)]
    pub like_count: u64,
    #[serde(default)]
    pub bookmarks_count: u64,
    #[serde(default)]
    pub quotes_count: u64,
    #[serde(default)]
    pub share_count: u64,
    #[serde(default)]
    pub comments_count: u64,
    #[serde(default)]
    pub is_promoted: bool,
    pub created_at: String,
    #[serde(default)]
    pub updated_at: Option<String>,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Product {
    pub id: u64,
    pub user: Author,
    pub name: String,
    #[serde(default)]
    pub description: String,
    /// Decimal string as sent by the marketplace
    pub price: String,
    #[serde(default)]
    pub category: Option<String>,
    #[serde(default)]
    pub location: Option<String>,
    #[serde(default)]
    pub media_files: Vec<MediaFile>,
    #[serde(default)]
    pub is_promoted: bool,
    #[serde(default)]
    pub average_rating: Option<f64>,
    #[serde(default)]
    pub ratings_count: u64,
    pub created_at: String,
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct ReviewVendor {
    pub id: String,
    pub full_name: String,
    pub username: String,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct ReviewItem {
    pub id: u64,
    pub price: f64,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Review {
    pub id: u64,
    pub user: Author,
    pub vendor: ReviewVendor,
    pub item: ReviewItem,
    pub text: String,
    pub rating: f64,
    #[serde(default)]
    pub media_files: Vec<MediaFile>,
    pub created_at: String,
}

/// Any moderated record. The backend does not tag the variants, so they are
/// told apart by their required fields (reviews first, posts last).
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(untagged)]
pub enum Content {
    Review(Review),
    Product(Product),
    Post(Post),
}

impl Content {
    #[must_use]
    pub const fn kind(&self) -> ContentKind {
        match self {
            Self::Post(_) => ContentKind::Post,
            Self::Product(_) => ContentKind::Product,
            Self::Review(_) => ContentKind::Review,
        }
    }

    /// Identifier rendered the way it appears in action paths.
    #[must_use]
    pub fn id(&self) -> String {
        match self {
            Self::Post(post) => post.id.clone(),
            Self::Product(product) => product.id.to_string(),
            Self::Review(review) => review.id.to_string(),
        }
    }
}
