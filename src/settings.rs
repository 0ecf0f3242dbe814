use serde::{Deserialize, Serialize};
use std::fs;
use std::path::Path;
use std::sync::OnceLock;

static SETTINGS: OnceLock<Settings> = OnceLock::new();

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct Settings {
    pub database: Database,
    pub analytics: Analytics,
    pub compose: Compose,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct Database {
    pub url: String,
    pub pool_size: u32,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct Analytics {
    pub weights: EngagementWeights,
    pub top_hashtags: usize,
    pub location_top_categories: usize,
    pub leaderboard_size: usize,
}

/// Per-interaction weights for the engagement score. A repost spreads an
/// activity to a new audience and a comment is a conversation, so both
/// outweigh a plain reaction.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct EngagementWeights {
    pub post: f64,
    pub comment: f64,
    pub reaction: f64,
    pub repost: f64,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct Compose {
    pub min_body_length: usize,
    pub max_body_length: usize,
    pub max_hashtags: usize,
    pub max_images: usize,
}

impl Default for Settings {
    fn default() -> Self {
        Self {
            database: Database {
                url: "umuganda.db".to_string(),
                pool_size: 5,
            },
            analytics: Analytics {
                weights: EngagementWeights {
                    post: 1.0,
                    comment: 2.0,
                    reaction: 1.0,
                    repost: 3.0,
                },
                top_hashtags: 10,
                location_top_categories: 5,
                leaderboard_size: 10,
            },
            compose: Compose {
                min_body_length: 1,
                max_body_length: 2000,
                max_hashtags: 10,
                max_images: 5,
            },
        }
    }
}

impl Settings {
    pub fn load() -> &'static Settings {
        SETTINGS.get_or_init(Self::load_from_files)
    }

    fn load_from_files() -> Settings {
        let default_path = Path::new("settings.default.ron");
        let override_path = Path::new("settings.ron");

        let mut settings = if default_path.exists() {
            fs::read_to_string(default_path)
                .ok()
                .and_then(|content| ron::from_str(&content).ok())
                .unwrap_or_default()
        } else {
            Settings::default()
        };

        if override_path.exists() {
            if let Ok(content) = fs::read_to_string(override_path) {
                if let Ok(overrides) = ron::from_str::<Settings>(&content) {
                    settings = overrides;
                }
            }
        }

        settings
    }
}

pub fn settings() -> &'static Settings {
    Settings::load()
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_default_weights_match_scoring_policy() {
        let s = Settings::default();
        assert_eq!(s.analytics.weights.post, 1.0);
        assert_eq!(s.analytics.weights.comment, 2.0);
        assert_eq!(s.analytics.weights.reaction, 1.0);
        assert_eq!(s.analytics.weights.repost, 3.0);
    }

    #[test]
    fn test_default_limits() {
        let s = Settings::default();
        assert_eq!(s.analytics.top_hashtags, 10);
        assert_eq!(s.analytics.location_top_categories, 5);
        assert_eq!(s.compose.max_hashtags, 10);
        assert_eq!(s.compose.max_images, 5);
    }
}
