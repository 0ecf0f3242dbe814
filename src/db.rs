use crate::schema::{cells, comments, districts, posts, reactions, reposts, sectors};
use diesel::connection::SimpleConnection;
use diesel::prelude::*;
use diesel::r2d2::{ConnectionManager, Pool};
use diesel::result::Error as DieselError;
use diesel::sqlite::SqliteConnection;
use diesel_migrations::{embed_migrations, EmbeddedMigrations, MigrationHarness};
use std::collections::HashMap;

pub type DbPool = Pool<ConnectionManager<SqliteConnection>>;

pub const MIGRATIONS: EmbeddedMigrations = embed_migrations!();

pub fn establish_pool(database_url: &str, pool_size: u32) -> DbPool {
    let manager = ConnectionManager::<SqliteConnection>::new(database_url);
    Pool::builder()
        .max_size(pool_size)
        .build(manager)
        .expect("Failed to create pool")
}

pub fn configure_connection(conn: &mut SqliteConnection) -> QueryResult<()> {
    conn.batch_execute("PRAGMA busy_timeout = 2000;")?;
    conn.batch_execute("PRAGMA journal_mode = WAL;")?;
    conn.batch_execute("PRAGMA synchronous = NORMAL;")?;
    conn.batch_execute("PRAGMA foreign_keys = ON;")?;
    Ok(())
}

pub fn run_migrations(conn: &mut SqliteConnection) -> QueryResult<()> {
    conn.run_pending_migrations(MIGRATIONS)
        .map_err(|e| DieselError::QueryBuilderError(e.to_string().into()))?;
    Ok(())
}

#[derive(Queryable, Selectable, Insertable, Debug, Clone)]
#[diesel(table_name = posts)]
pub struct Post {
    pub id: String,
    pub author: String,
    pub body: String,
    pub category: String,
    pub hashtags: String,
    pub images: String,
    pub cell_id: String,
    pub sector_id: String,
    pub district_id: String,
    pub created_at: i64,
}

#[derive(Queryable, Selectable, Insertable, Debug, Clone)]
#[diesel(table_name = comments)]
pub struct Comment {
    pub id: String,
    pub post_id: String,
    pub author: String,
    pub body: String,
    pub created_at: i64,
}

#[derive(Queryable, Selectable, Insertable, Debug, Clone)]
#[diesel(table_name = reactions)]
pub struct Reaction {
    pub id: String,
    pub post_id: Option<String>,
    pub comment_id: Option<String>,
    pub kind: String,
    pub created_at: i64,
}

#[derive(Queryable, Selectable, Insertable, Debug, Clone)]
#[diesel(table_name = reposts)]
pub struct Repost {
    pub id: String,
    pub post_id: String,
    pub author: String,
    pub created_at: i64,
}

#[derive(Queryable, Selectable, Insertable, Debug, Clone)]
#[diesel(table_name = districts)]
pub struct District {
    pub id: String,
    pub name: String,
}

#[derive(Queryable, Selectable, Insertable, Debug, Clone)]
#[diesel(table_name = sectors)]
pub struct Sector {
    pub id: String,
    pub name: String,
    pub district_id: String,
}

#[derive(Queryable, Selectable, Insertable, Debug, Clone)]
#[diesel(table_name = cells)]
pub struct Cell {
    pub id: String,
    pub name: String,
    pub sector_id: String,
}

pub fn insert_district(conn: &mut SqliteConnection, district: &District) -> QueryResult<usize> {
    diesel::insert_or_ignore_into(districts::table)
        .values(district)
        .execute(conn)
}

pub fn insert_sector(conn: &mut SqliteConnection, sector: &Sector) -> QueryResult<usize> {
    diesel::insert_or_ignore_into(sectors::table)
        .values(sector)
        .execute(conn)
}

pub fn insert_cell(conn: &mut SqliteConnection, cell: &Cell) -> QueryResult<usize> {
    diesel::insert_or_ignore_into(cells::table)
        .values(cell)
        .execute(conn)
}

pub fn insert_post(conn: &mut SqliteConnection, post: &Post) -> QueryResult<usize> {
    diesel::insert_or_ignore_into(posts::table)
        .values(post)
        .execute(conn)
}

pub fn insert_comment(conn: &mut SqliteConnection, comment: &Comment) -> QueryResult<usize> {
    diesel::insert_or_ignore_into(comments::table)
        .values(comment)
        .execute(conn)
}

/// A reaction targets a post or a comment, never both. The schema enforces
/// this too; rejecting here keeps the store error out of the hot path.
pub fn insert_reaction(conn: &mut SqliteConnection, reaction: &Reaction) -> QueryResult<usize> {
    if reaction.post_id.is_some() == reaction.comment_id.is_some() {
        return Err(DieselError::QueryBuilderError(
            "reaction must target exactly one of post or comment".into(),
        ));
    }
    diesel::insert_or_ignore_into(reactions::table)
        .values(reaction)
        .execute(conn)
}

pub fn insert_repost(conn: &mut SqliteConnection, repost: &Repost) -> QueryResult<usize> {
    diesel::insert_or_ignore_into(reposts::table)
        .values(repost)
        .execute(conn)
}

pub fn delete_post(conn: &mut SqliteConnection, post_id: &str) -> QueryResult<usize> {
    diesel::delete(posts::table.filter(posts::id.eq(post_id))).execute(conn)
}

pub fn delete_comment(conn: &mut SqliteConnection, comment_id: &str) -> QueryResult<usize> {
    diesel::delete(comments::table.filter(comments::id.eq(comment_id))).execute(conn)
}

pub fn delete_reaction(conn: &mut SqliteConnection, reaction_id: &str) -> QueryResult<usize> {
    diesel::delete(reactions::table.filter(reactions::id.eq(reaction_id))).execute(conn)
}

pub fn delete_repost(conn: &mut SqliteConnection, repost_id: &str) -> QueryResult<usize> {
    diesel::delete(reposts::table.filter(reposts::id.eq(repost_id))).execute(conn)
}

pub fn count_posts_between(conn: &mut SqliteConnection, start: i64, end: i64) -> QueryResult<i64> {
    posts::table
        .filter(posts::created_at.between(start, end))
        .count()
        .get_result(conn)
}

pub fn count_comments_between(
    conn: &mut SqliteConnection,
    start: i64,
    end: i64,
) -> QueryResult<i64> {
    comments::table
        .filter(comments::created_at.between(start, end))
        .count()
        .get_result(conn)
}

pub fn count_reactions_between(
    conn: &mut SqliteConnection,
    start: i64,
    end: i64,
) -> QueryResult<i64> {
    reactions::table
        .filter(reactions::created_at.between(start, end))
        .count()
        .get_result(conn)
}

pub fn count_reposts_between(
    conn: &mut SqliteConnection,
    start: i64,
    end: i64,
) -> QueryResult<i64> {
    reposts::table
        .filter(reposts::created_at.between(start, end))
        .count()
        .get_result(conn)
}

/// A post row as the aggregation passes see it: category plus the decoded
/// hashtag list and the three location refs.
#[derive(Debug, Clone)]
pub struct WindowPost {
    pub id: String,
    pub category: String,
    pub hashtags: Vec<String>,
    pub cell_id: String,
    pub sector_id: String,
    pub district_id: String,
}

pub fn load_window_posts(
    conn: &mut SqliteConnection,
    start: i64,
    end: i64,
) -> QueryResult<Vec<WindowPost>> {
    let rows: Vec<(String, String, String, String, String, String)> = posts::table
        .filter(posts::created_at.between(start, end))
        .select((
            posts::id,
            posts::category,
            posts::hashtags,
            posts::cell_id,
            posts::sector_id,
            posts::district_id,
        ))
        .order(posts::created_at.asc())
        .load(conn)?;

    rows.into_iter()
        .map(|(id, category, hashtags, cell_id, sector_id, district_id)| {
            let hashtags: Vec<String> = serde_json::from_str(&hashtags)
                .map_err(|e| DieselError::DeserializationError(Box::new(e)))?;
            Ok(WindowPost {
                id,
                category,
                hashtags,
                cell_id,
                sector_id,
                district_id,
            })
        })
        .collect()
}

/// Display fields for the leaderboard, window-filtered like the post scan.
pub fn load_window_post_headers(
    conn: &mut SqliteConnection,
    start: i64,
    end: i64,
) -> QueryResult<Vec<(String, String, String, String)>> {
    posts::table
        .filter(posts::created_at.between(start, end))
        .select((posts::id, posts::author, posts::body, posts::category))
        .order(posts::created_at.asc())
        .load(conn)
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum LocationLevel {
    Cell,
    Sector,
    District,
}

pub fn load_locations(
    conn: &mut SqliteConnection,
    level: LocationLevel,
) -> QueryResult<Vec<(String, String)>> {
    match level {
        LocationLevel::Cell => cells::table
            .select((cells::id, cells::name))
            .order(cells::name.asc())
            .load(conn),
        LocationLevel::Sector => sectors::table
            .select((sectors::id, sectors::name))
            .order(sectors::name.asc())
            .load(conn),
        LocationLevel::District => districts::table
            .select((districts::id, districts::name))
            .order(districts::name.asc())
            .load(conn),
    }
}

pub fn comment_counts_by_post(
    conn: &mut SqliteConnection,
    post_ids: &[String],
) -> QueryResult<HashMap<String, i64>> {
    if post_ids.is_empty() {
        return Ok(HashMap::new());
    }
    let rows: Vec<(String, i64)> = comments::table
        .filter(comments::post_id.eq_any(post_ids))
        .group_by(comments::post_id)
        .select((comments::post_id, diesel::dsl::count_star()))
        .load(conn)?;
    Ok(rows.into_iter().collect())
}

pub fn reaction_counts_by_post(
    conn: &mut SqliteConnection,
    post_ids: &[String],
) -> QueryResult<HashMap<String, i64>> {
    if post_ids.is_empty() {
        return Ok(HashMap::new());
    }
    let targets: Vec<Option<String>> = post_ids.iter().map(|id| Some(id.clone())).collect();
    let rows: Vec<(Option<String>, i64)> = reactions::table
        .filter(reactions::post_id.eq_any(targets))
        .group_by(reactions::post_id)
        .select((reactions::post_id, diesel::dsl::count_star()))
        .load(conn)?;
    Ok(rows
        .into_iter()
        .filter_map(|(id, count)| id.map(|id| (id, count)))
        .collect())
}

pub fn repost_counts_by_post(
    conn: &mut SqliteConnection,
    post_ids: &[String],
) -> QueryResult<HashMap<String, i64>> {
    if post_ids.is_empty() {
        return Ok(HashMap::new());
    }
    let rows: Vec<(String, i64)> = reposts::table
        .filter(reposts::post_id.eq_any(post_ids))
        .group_by(reposts::post_id)
        .select((reposts::post_id, diesel::dsl::count_star()))
        .load(conn)?;
    Ok(rows.into_iter().collect())
}
