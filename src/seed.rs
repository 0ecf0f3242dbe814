use crate::db::{self, Cell, Comment, District, Reaction, Repost, Sector};
use crate::posts::{Category, LocationRef, PostDraft, ReactionKind};
use anyhow::Result;
use diesel::sqlite::SqliteConnection;

const DAY: i64 = 86_400;
const HOUR: i64 = 3_600;

#[derive(Debug, Default)]
pub struct SeedReport {
    pub locations: usize,
    pub posts: usize,
    pub comments: usize,
    pub reactions: usize,
    pub reposts: usize,
}

const DISTRICTS: &[(&str, &str)] = &[
    ("d-gasabo", "Gasabo"),
    ("d-kicukiro", "Kicukiro"),
    ("d-nyarugenge", "Nyarugenge"),
];

const SECTORS: &[(&str, &str, &str)] = &[
    ("s-remera", "Remera", "d-gasabo"),
    ("s-kimironko", "Kimironko", "d-gasabo"),
    ("s-niboye", "Niboye", "d-kicukiro"),
    ("s-nyamirambo", "Nyamirambo", "d-nyarugenge"),
];

const CELLS: &[(&str, &str, &str)] = &[
    ("c-nyabisindu", "Nyabisindu", "s-remera"),
    ("c-rukiri", "Rukiri I", "s-remera"),
    ("c-kibagabaga", "Kibagabaga", "s-kimironko"),
    ("c-gatare", "Gatare", "s-niboye"),
    ("c-mumena", "Mumena", "s-nyamirambo"),
];

struct SeedPost {
    id: &'static str,
    author: &'static str,
    cell: &'static str,
    category: Category,
    body: &'static str,
    images: usize,
    days_ago: i64,
    comments: usize,
    reactions: &'static [ReactionKind],
    reposts: usize,
}

const POSTS: &[SeedPost] = &[
    SeedPost {
        id: "post-01",
        author: "did:umg:uwase",
        cell: "c-nyabisindu",
        category: Category::Environment,
        body: "Planted 120 seedlings along the Nyabisindu road this morning #Umuganda #TreePlanting",
        images: 2,
        days_ago: 1,
        comments: 3,
        reactions: &[ReactionKind::Like, ReactionKind::Celebrate, ReactionKind::Inspire],
        reposts: 2,
    },
    SeedPost {
        id: "post-02",
        author: "did:umg:mugisha",
        cell: "c-nyabisindu",
        category: Category::Sanitation,
        body: "Cleared the drainage channel before the rains #Umuganda",
        images: 0,
        days_ago: 1,
        comments: 1,
        reactions: &[ReactionKind::Support],
        reposts: 0,
    },
    SeedPost {
        id: "post-03",
        author: "did:umg:keza",
        cell: "c-rukiri",
        category: Category::Infrastructure,
        body: "Repaired the footbridge by the market, passable again #Umuganda #Rukiri",
        images: 3,
        days_ago: 2,
        comments: 2,
        reactions: &[ReactionKind::Like, ReactionKind::Like],
        reposts: 1,
    },
    SeedPost {
        id: "post-04",
        author: "did:umg:gatete",
        cell: "c-kibagabaga",
        category: Category::Education,
        body: "Painted two classrooms at the primary school #Umuganda #Education",
        images: 4,
        days_ago: 3,
        comments: 4,
        reactions: &[ReactionKind::Celebrate, ReactionKind::Inspire],
        reposts: 3,
    },
    SeedPost {
        id: "post-05",
        author: "did:umg:ingabire",
        cell: "c-kibagabaga",
        category: Category::Environment,
        body: "Community garden weeded and mulched #TreePlanting",
        images: 0,
        days_ago: 3,
        comments: 0,
        reactions: &[ReactionKind::Like],
        reposts: 0,
    },
    SeedPost {
        id: "post-06",
        author: "did:umg:habimana",
        cell: "c-gatare",
        category: Category::Health,
        body: "Household visits on malaria prevention, 40 families reached #Health #Umuganda",
        images: 1,
        days_ago: 4,
        comments: 2,
        reactions: &[ReactionKind::Support, ReactionKind::Support, ReactionKind::Like],
        reposts: 1,
    },
    SeedPost {
        id: "post-07",
        author: "did:umg:mukamana",
        cell: "c-gatare",
        category: Category::SocialWelfare,
        body: "Built a kitchen for mama Drocella #Umuganda #SocialWelfare",
        images: 5,
        days_ago: 5,
        comments: 5,
        reactions: &[ReactionKind::Inspire, ReactionKind::Celebrate, ReactionKind::Like],
        reposts: 4,
    },
    SeedPost {
        id: "post-08",
        author: "did:umg:nshuti",
        cell: "c-mumena",
        category: Category::Security,
        body: "Installed solar lights at the junction #Mumena",
        images: 2,
        days_ago: 5,
        comments: 1,
        reactions: &[ReactionKind::Like],
        reposts: 0,
    },
    SeedPost {
        id: "post-09",
        author: "did:umg:uwera",
        cell: "c-mumena",
        category: Category::Agriculture,
        body: "Terracing work on the hillside plots finished #Agriculture #Umuganda",
        images: 0,
        days_ago: 6,
        comments: 2,
        reactions: &[],
        reposts: 1,
    },
    SeedPost {
        id: "post-10",
        author: "did:umg:mutesi",
        cell: "c-rukiri",
        category: Category::Other,
        body: "Organized the tools store for next month's session",
        images: 0,
        days_ago: 6,
        comments: 0,
        reactions: &[ReactionKind::Like],
        reposts: 0,
    },
];

fn location_for(cell_id: &str) -> LocationRef {
    let (_, _, sector_id) = CELLS
        .iter()
        .find(|(id, _, _)| *id == cell_id)
        .expect("seed cell exists");
    let (_, _, district_id) = SECTORS
        .iter()
        .find(|(id, _, _)| id == sector_id)
        .expect("seed sector exists");
    LocationRef {
        cell_id: cell_id.to_string(),
        sector_id: sector_id.to_string(),
        district_id: district_id.to_string(),
    }
}

/// Deterministic demo data: five cells across three districts and a week of
/// activity, every post built through the compose path. Inserts are
/// insert-or-ignore, so reseeding an existing store is a no-op.
pub fn run_seed(conn: &mut SqliteConnection, now: i64) -> Result<SeedReport> {
    let mut report = SeedReport::default();

    for (id, name) in DISTRICTS {
        report.locations += db::insert_district(
            conn,
            &District {
                id: id.to_string(),
                name: name.to_string(),
            },
        )?;
    }
    for (id, name, district_id) in SECTORS {
        report.locations += db::insert_sector(
            conn,
            &Sector {
                id: id.to_string(),
                name: name.to_string(),
                district_id: district_id.to_string(),
            },
        )?;
    }
    for (id, name, sector_id) in CELLS {
        report.locations += db::insert_cell(
            conn,
            &Cell {
                id: id.to_string(),
                name: name.to_string(),
                sector_id: sector_id.to_string(),
            },
        )?;
    }

    for entry in POSTS {
        let created_at = now - entry.days_ago * DAY;

        let mut draft = PostDraft::new(entry.id, entry.author)
            .body(entry.body)
            .category(entry.category)
            .location(location_for(entry.cell));
        for i in 0..entry.images {
            draft = draft.image(format!("https://cdn.umuganda.rw/{}/{i}.jpg", entry.id));
        }
        let post = draft.finalize(created_at)?;
        report.posts += db::insert_post(conn, &post)?;

        for i in 0..entry.comments {
            report.comments += db::insert_comment(
                conn,
                &Comment {
                    id: format!("{}-comment-{i}", entry.id),
                    post_id: entry.id.to_string(),
                    author: "did:umg:neighbor".to_string(),
                    body: "Murakoze cyane!".to_string(),
                    created_at: created_at + (i as i64 + 1) * HOUR,
                },
            )?;
        }
        for (i, kind) in entry.reactions.iter().enumerate() {
            report.reactions += db::insert_reaction(
                conn,
                &Reaction {
                    id: format!("{}-reaction-{i}", entry.id),
                    post_id: Some(entry.id.to_string()),
                    comment_id: None,
                    kind: kind.to_string(),
                    created_at: created_at + (i as i64 + 1) * HOUR,
                },
            )?;
        }
        for i in 0..entry.reposts {
            report.reposts += db::insert_repost(
                conn,
                &Repost {
                    id: format!("{}-repost-{i}", entry.id),
                    post_id: entry.id.to_string(),
                    author: "did:umg:amplifier".to_string(),
                    created_at: created_at + (i as i64 + 2) * HOUR,
                },
            )?;
        }
    }

    Ok(report)
}
