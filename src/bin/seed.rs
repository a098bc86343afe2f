//! Fills a development database: a known user with a printed token, a few
//! categories, and posts tagged with one to three of them.

use anyhow::Context;
use rand::{seq::SliceRandom, Rng};
use tracing::info;

use quillpost::{
    auth::{password::hash_password, services::issue_token, User},
    categories::repo as categories,
    db,
    posts::{dto::NewPost, services as posts},
    state::AppState,
};

const SEED_NAME: &str = "Test User";
const SEED_EMAIL: &str = "test@example.com";
const SEED_PASSWORD: &str = "password";
const CATEGORY_COUNT: usize = 5;
const POST_COUNT: usize = 20;

const WORDS: &[&str] = &[
    "rust", "async", "borrow", "trait", "lifetime", "tokio", "axum", "query", "index", "cache",
    "stream", "future", "pointer", "module", "crate", "macro", "thread", "socket", "buffer", "schema",
];

fn sentence(rng: &mut impl Rng, words: usize) -> String {
    let picked: Vec<&str> = (0..words.max(1))
        .filter_map(|_| WORDS.choose(rng).copied())
        .collect();
    let text = picked.join(" ");
    let mut chars = text.chars();
    match chars.next() {
        Some(first) => format!("{}{}.", first.to_uppercase(), chars.as_str()),
        None => String::new(),
    }
}

fn paragraphs(rng: &mut impl Rng, count: usize) -> String {
    (0..count)
        .map(|_| {
            (0..4)
                .map(|_| {
                    let n = rng.gen_range(6..12);
                    sentence(rng, n)
                })
                .collect::<Vec<_>>()
                .join(" ")
        })
        .collect::<Vec<_>>()
        .join("\n\n")
}

#[tokio::main]
async fn main() -> anyhow::Result<()> {
    dotenvy::dotenv().ok();
    tracing_subscriber::fmt()
        .with_env_filter(std::env::var("RUST_LOG").unwrap_or_else(|_| "seed=info,quillpost=info".into()))
        .init();

    let state = AppState::init().await?;
    db::migrate(&state.db).await?;

    let user = match User::find_by_email(&state.db, SEED_EMAIL).await? {
        Some(user) => user,
        None => {
            let hash = hash_password(SEED_PASSWORD)?;
            User::create(&state.db, SEED_NAME, SEED_EMAIL, &hash).await?
        }
    };
    let token = issue_token(&state.db, &state.config.token.prefix, &user, "default").await?;
    info!(email = %user.email, "user access token: {}", token);

    let mut rng = rand::thread_rng();
    let mut category_ids = Vec::with_capacity(CATEGORY_COUNT);
    for _ in 0..CATEGORY_COUNT {
        let name = sentence(&mut rng, 1).trim_end_matches('.').to_string();
        category_ids.push(categories::create(&state.db, &name).await?.id);
    }

    for _ in 0..POST_COUNT {
        let words = rng.gen_range(4..9);
        let title = sentence(&mut rng, words);
        let content = paragraphs(&mut rng, 5);
        let take = rng.gen_range(1..=3);
        let picked = category_ids
            .choose_multiple(&mut rng, take)
            .copied()
            .collect::<Vec<_>>();

        posts::create(
            &state,
            &user,
            NewPost {
                title,
                content,
                categories: Some(picked),
            },
        )
        .await
        .context("seed post")?;
    }

    info!(categories = CATEGORY_COUNT, posts = POST_COUNT, "database seeded");
    Ok(())
}
