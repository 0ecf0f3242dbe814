use serde::{Deserialize, Serialize};
use strum::{Display, EnumString};

/// The nine activity categories a post must carry. Stored as their
/// serialized names, so renaming a variant is a data migration.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Display, EnumString, Serialize, Deserialize)]
#[serde(rename_all = "kebab-case")]
pub enum Category {
    #[strum(serialize = "environment")]
    Environment,
    #[strum(serialize = "infrastructure")]
    Infrastructure,
    #[strum(serialize = "education")]
    Education,
    #[strum(serialize = "health")]
    Health,
    #[strum(serialize = "security")]
    Security,
    #[strum(serialize = "agriculture")]
    Agriculture,
    #[strum(serialize = "sanitation")]
    Sanitation,
    #[strum(serialize = "social-welfare")]
    SocialWelfare,
    #[strum(serialize = "other")]
    Other,
}

pub const ALL_CATEGORIES: &[Category] = &[
    Category::Environment,
    Category::Infrastructure,
    Category::Education,
    Category::Health,
    Category::Security,
    Category::Agriculture,
    Category::Sanitation,
    Category::SocialWelfare,
    Category::Other,
];
