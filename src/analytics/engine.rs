use super::breakdown::{category_breakdown, hashtag_breakdown};
use super::locations::location_stats;
use super::summary::{AnalyticsSummary, LeaderboardEntry, NationalTotals, Period};
use super::trending::post_leaderboard;
use crate::db::{self, DbPool, LocationLevel};
use crate::settings::settings;
use chrono::Utc;
use diesel::prelude::*;
use diesel::result::Error as DieselError;
use diesel::sqlite::SqliteConnection;
use std::sync::atomic::{AtomicI64, Ordering};

/// One engine is built at process start and shared by reference; it owns no
/// per-call state, so concurrent summaries need no locking. The only thing
/// it remembers is when it last finished an aggregation.
pub struct AnalyticsEngine {
    pool: DbPool,
    last_updated: AtomicI64,
}

impl AnalyticsEngine {
    pub fn new(pool: DbPool) -> Self {
        Self {
            pool,
            last_updated: AtomicI64::new(0),
        }
    }

    /// Unix timestamp of the last aggregation that ran to completion.
    pub fn last_updated(&self) -> Option<i64> {
        match self.last_updated.load(Ordering::Relaxed) {
            0 => None,
            ts => Some(ts),
        }
    }

    async fn read<T, F>(&self, f: F) -> QueryResult<T>
    where
        T: Send + 'static,
        F: FnOnce(&mut SqliteConnection) -> QueryResult<T> + Send + 'static,
    {
        let pool = self.pool.clone();
        tokio::task::spawn_blocking(move || {
            let mut conn = pool
                .get()
                .map_err(|_| DieselError::BrokenTransactionManager)?;
            f(&mut conn)
        })
        .await
        .unwrap_or(Err(DieselError::BrokenTransactionManager))
    }

    /// Recomputes the full summary for `[start, end]` from the store, all or
    /// nothing. The independent read paths fan out; any failure aborts the
    /// whole call with the store error, and nothing is cached.
    pub async fn generate_summary(&self, start: i64, end: i64) -> QueryResult<AnalyticsSummary> {
        let national = self.read(move |conn| {
            let total_posts = db::count_posts_between(conn, start, end)?;
            let total_comments = db::count_comments_between(conn, start, end)?;
            let total_reactions = db::count_reactions_between(conn, start, end)?;
            let total_reposts = db::count_reposts_between(conn, start, end)?;
            Ok(NationalTotals {
                total_posts,
                total_comments,
                total_reactions,
                total_reposts,
                total_engagement: total_posts + total_comments + total_reactions + total_reposts,
            })
        });
        let window = self.read(move |conn| db::load_window_posts(conn, start, end));
        let cells = self.read(move |conn| location_stats(conn, LocationLevel::Cell, start, end));
        let sectors =
            self.read(move |conn| location_stats(conn, LocationLevel::Sector, start, end));
        let districts =
            self.read(move |conn| location_stats(conn, LocationLevel::District, start, end));

        let (national, window, cell_stats, sector_stats, district_stats) =
            tokio::try_join!(national, window, cells, sectors, districts)?;

        let top_categories = category_breakdown(window.iter().map(|p| p.category.as_str()));
        let top_hashtags = hashtag_breakdown(
            window
                .iter()
                .flat_map(|p| p.hashtags.iter().map(String::as_str)),
            settings().analytics.top_hashtags,
        );

        let last_updated = Utc::now().timestamp();
        self.last_updated.store(last_updated, Ordering::Relaxed);

        Ok(AnalyticsSummary {
            period: Period {
                start_date: start,
                end_date: end,
            },
            national,
            top_categories,
            top_hashtags,
            cell_stats,
            sector_stats,
            district_stats,
            last_updated,
        })
    }

    pub async fn post_leaderboard(
        &self,
        start: i64,
        end: i64,
    ) -> QueryResult<Vec<LeaderboardEntry>> {
        let limit = settings().analytics.leaderboard_size;
        self.read(move |conn| post_leaderboard(conn, start, end, limit))
            .await
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::db::test_support::memory_pool;
    use crate::db::{Cell, Comment, District, Post, Reaction, Repost, Sector};

    const T0: i64 = 1_700_000_000;

    fn seed_locations(conn: &mut SqliteConnection) {
        for (id, name) in [("d-gasabo", "Gasabo"), ("d-kicukiro", "Kicukiro")] {
            db::insert_district(
                conn,
                &District {
                    id: id.into(),
                    name: name.into(),
                },
            )
            .unwrap();
        }
        for (id, name, district) in [
            ("s-remera", "Remera", "d-gasabo"),
            ("s-niboye", "Niboye", "d-kicukiro"),
        ] {
            db::insert_sector(
                conn,
                &Sector {
                    id: id.into(),
                    name: name.into(),
                    district_id: district.into(),
                },
            )
            .unwrap();
        }
        for (id, name, sector) in [
            ("c-nyabisindu", "Nyabisindu", "s-remera"),
            ("c-gatare", "Gatare", "s-niboye"),
        ] {
            db::insert_cell(
                conn,
                &Cell {
                    id: id.into(),
                    name: name.into(),
                    sector_id: sector.into(),
                },
            )
            .unwrap();
        }
    }

    fn post(id: &str, category: &str, hashtags: &str, cell: &str, created_at: i64) -> Post {
        let (sector, district) = match cell {
            "c-nyabisindu" => ("s-remera", "d-gasabo"),
            _ => ("s-niboye", "d-kicukiro"),
        };
        Post {
            id: id.into(),
            author: "did:umg:alice".into(),
            body: "Umuganda morning".into(),
            category: category.into(),
            hashtags: hashtags.into(),
            images: "[]".into(),
            cell_id: cell.into(),
            sector_id: sector.into(),
            district_id: district.into(),
            created_at,
        }
    }

    fn comment(id: &str, post_id: &str, created_at: i64) -> Comment {
        Comment {
            id: id.into(),
            post_id: post_id.into(),
            author: "did:umg:bob".into(),
            body: "Byiza cyane".into(),
            created_at,
        }
    }

    fn reaction(id: &str, post_id: &str, created_at: i64) -> Reaction {
        Reaction {
            id: id.into(),
            post_id: Some(post_id.into()),
            comment_id: None,
            kind: "like".into(),
            created_at,
        }
    }

    fn repost(id: &str, post_id: &str, created_at: i64) -> Repost {
        Repost {
            id: id.into(),
            post_id: post_id.into(),
            author: "did:umg:carol".into(),
            created_at,
        }
    }

    fn seed_fixture(pool: &DbPool) {
        let mut conn = pool.get().unwrap();
        seed_locations(&mut conn);

        // Two in-window posts in Nyabisindu, one in Gatare, one outside.
        db::insert_post(
            &mut conn,
            &post("p1", "environment", r##"["#a","#umuganda"]"##, "c-nyabisindu", T0 + 10),
        )
        .unwrap();
        db::insert_post(
            &mut conn,
            &post("p2", "environment", r##"["#a"]"##, "c-nyabisindu", T0 + 20),
        )
        .unwrap();
        db::insert_post(
            &mut conn,
            &post("p3", "health", r##"["#a","#b"]"##, "c-gatare", T0 + 30),
        )
        .unwrap();
        db::insert_post(
            &mut conn,
            &post("p9", "security", r##"["#z"]"##, "c-gatare", T0 - 500),
        )
        .unwrap();

        // Nested engagement; c2 is outside the window on purpose.
        db::insert_comment(&mut conn, &comment("c1", "p1", T0 + 15)).unwrap();
        db::insert_comment(&mut conn, &comment("c2", "p1", T0 + 5_000)).unwrap();
        db::insert_reaction(&mut conn, &reaction("r1", "p2", T0 + 25)).unwrap();
        db::insert_repost(&mut conn, &repost("rp1", "p2", T0 + 26)).unwrap();
    }

    fn window() -> (i64, i64) {
        (T0, T0 + 100)
    }

    #[tokio::test]
    async fn test_national_totals_and_engagement_sum() {
        let pool = memory_pool();
        seed_fixture(&pool);
        let engine = AnalyticsEngine::new(pool);
        let (start, end) = window();

        let summary = engine.generate_summary(start, end).await.unwrap();
        let n = summary.national;

        assert_eq!(n.total_posts, 3);
        assert_eq!(n.total_comments, 1); // c2 falls outside the window
        assert_eq!(n.total_reactions, 1);
        assert_eq!(n.total_reposts, 1);
        assert_eq!(
            n.total_engagement,
            n.total_posts + n.total_comments + n.total_reactions + n.total_reposts
        );
    }

    #[tokio::test]
    async fn test_category_and_hashtag_breakdowns() {
        let pool = memory_pool();
        seed_fixture(&pool);
        let engine = AnalyticsEngine::new(pool);
        let (start, end) = window();

        let summary = engine.generate_summary(start, end).await.unwrap();

        assert_eq!(summary.top_categories[0].category, "environment");
        assert_eq!(summary.top_categories[0].count, 2);
        assert_eq!(summary.top_categories[0].percentage, 67);
        assert_eq!(summary.top_categories[1].category, "health");
        assert_eq!(summary.top_categories[1].percentage, 33);

        // #a appears 3 times, #umuganda and #b once each: 5 occurrences.
        assert_eq!(summary.top_hashtags[0].hashtag, "#a");
        assert_eq!(summary.top_hashtags[0].count, 3);
        assert_eq!(summary.top_hashtags[0].percentage, 60);
        assert!(summary.top_hashtags.len() <= 10);
        for pair in summary.top_hashtags.windows(2) {
            assert!(pair[0].count >= pair[1].count);
        }
    }

    #[tokio::test]
    async fn test_hashtag_two_tag_split() {
        let pool = memory_pool();
        {
            let mut conn = pool.get().unwrap();
            seed_locations(&mut conn);
            db::insert_post(
                &mut conn,
                &post("p1", "health", r##"["#a","#a","#b"]"##, "c-gatare", T0 + 1),
            )
            .unwrap();
            db::insert_post(
                &mut conn,
                &post("p2", "health", r##"["#a"]"##, "c-gatare", T0 + 2),
            )
            .unwrap();
        }
        let engine = AnalyticsEngine::new(pool);
        let summary = engine.generate_summary(T0, T0 + 100).await.unwrap();

        assert_eq!(summary.top_hashtags.len(), 2);
        assert_eq!(summary.top_hashtags[0].hashtag, "#a");
        assert_eq!(summary.top_hashtags[0].count, 3);
        assert_eq!(summary.top_hashtags[0].percentage, 75);
        assert_eq!(summary.top_hashtags[1].hashtag, "#b");
        assert_eq!(summary.top_hashtags[1].count, 1);
        assert_eq!(summary.top_hashtags[1].percentage, 25);
    }

    #[tokio::test]
    async fn test_location_rollups_count_nested_engagement_unfiltered() {
        let pool = memory_pool();
        seed_fixture(&pool);
        let engine = AnalyticsEngine::new(pool);
        let (start, end) = window();

        let summary = engine.generate_summary(start, end).await.unwrap();

        let nyabisindu = summary
            .cell_stats
            .iter()
            .find(|c| c.id == "c-nyabisindu")
            .unwrap();
        assert_eq!(nyabisindu.total_posts, 2);
        // Both comments on p1 count, in-window or not.
        assert_eq!(nyabisindu.total_comments, 2);
        assert_eq!(nyabisindu.total_reactions, 1);
        assert_eq!(nyabisindu.total_reposts, 1);
        assert_eq!(nyabisindu.total_engagement, 6);
        // 2*1 + 2*2 + 1*1 + 1*3 = 10 over 2 posts.
        assert_eq!(nyabisindu.engagement_score, 5.0);
        assert_eq!(nyabisindu.top_categories[0].category, "environment");
        assert_eq!(nyabisindu.top_categories[0].percentage, 100);

        for stats in [&summary.cell_stats, &summary.sector_stats, &summary.district_stats] {
            for pair in stats.windows(2) {
                assert!(pair[0].engagement_score >= pair[1].engagement_score);
            }
        }
    }

    #[tokio::test]
    async fn test_zero_post_nodes_still_ranked() {
        let pool = memory_pool();
        {
            let mut conn = pool.get().unwrap();
            seed_locations(&mut conn);
            db::insert_post(
                &mut conn,
                &post("p1", "education", "[]", "c-nyabisindu", T0 + 1),
            )
            .unwrap();
        }
        let engine = AnalyticsEngine::new(pool);
        let summary = engine.generate_summary(T0, T0 + 100).await.unwrap();

        assert_eq!(summary.cell_stats.len(), 2);
        let gatare = summary.cell_stats.iter().find(|c| c.id == "c-gatare").unwrap();
        assert_eq!(gatare.total_posts, 0);
        assert_eq!(gatare.engagement_score, 0.0);
        assert!(gatare.top_categories.is_empty());
        assert_eq!(summary.cell_stats[0].id, "c-nyabisindu");
    }

    #[tokio::test]
    async fn test_inverted_range_yields_empty_summary_not_error() {
        let pool = memory_pool();
        seed_fixture(&pool);
        let engine = AnalyticsEngine::new(pool);

        let summary = engine
            .generate_summary(T0 + 100, T0)
            .await
            .expect("inverted range is not an error");

        assert_eq!(summary.national, NationalTotals::default());
        assert!(summary.top_categories.is_empty());
        assert!(summary.top_hashtags.is_empty());
        assert!(summary
            .cell_stats
            .iter()
            .all(|c| c.total_posts == 0 && c.engagement_score == 0.0));
    }

    #[tokio::test]
    async fn test_repeat_call_is_identical_except_last_updated() {
        let pool = memory_pool();
        seed_fixture(&pool);
        let engine = AnalyticsEngine::new(pool);
        let (start, end) = window();

        let mut first = engine.generate_summary(start, end).await.unwrap();
        let second = engine.generate_summary(start, end).await.unwrap();

        first.last_updated = second.last_updated;
        assert_eq!(first, second);
    }

    #[tokio::test]
    async fn test_last_updated_tracks_success() {
        let pool = memory_pool();
        seed_fixture(&pool);
        let engine = AnalyticsEngine::new(pool);

        assert_eq!(engine.last_updated(), None);
        let summary = engine.generate_summary(T0, T0 + 100).await.unwrap();
        assert_eq!(engine.last_updated(), Some(summary.last_updated));
    }

    #[tokio::test]
    async fn test_leaderboard_ranks_by_weighted_engagement() {
        let pool = memory_pool();
        seed_fixture(&pool);
        let engine = AnalyticsEngine::new(pool);
        let (start, end) = window();

        let board = engine.post_leaderboard(start, end).await.unwrap();

        // p2: 1 reaction + 1 repost = 4.0; p1: 2 comments = 4.0 — p1 was
        // inserted first and the sort is stable.
        assert_eq!(board[0].id, "p1");
        assert_eq!(board[0].engagement, 4.0);
        assert_eq!(board[1].id, "p2");
        assert_eq!(board[1].engagement, 4.0);
        for pair in board.windows(2) {
            assert!(pair[0].engagement >= pair[1].engagement);
        }
    }
}
