use serde::{Deserialize, Serialize};
use strum::{Display, EnumString};

/// The four reactions a member can leave on a post or a comment.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Display, EnumString, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum ReactionKind {
    #[strum(serialize = "like")]
    Like,
    #[strum(serialize = "celebrate")]
    Celebrate,
    #[strum(serialize = "support")]
    Support,
    #[strum(serialize = "inspire")]
    Inspire,
}
