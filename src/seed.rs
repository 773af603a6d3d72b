//! Sample data for local development.
//!
//! Records go through the same validating constructors as the HTTP surface.

use anyhow::{anyhow, Context};
use rand::{seq::SliceRandom, Rng};
use serde_json::Value;
use tracing::info;

use crate::auth::{dto::SignupRequest, services::register};
use crate::error::ApiError;
use crate::recipes::{dto::CreateRecipeRequest, services::create_recipe};
use crate::repo::Repository;
use crate::validation::MIN_INSTRUCTIONS_CHARS;

pub const DEFAULT_PASSWORD: &str = "defaultpassword";

const FIRST_NAMES: &[&str] = &[
    "Ada", "Bruno", "Carmen", "Dmitri", "Elena", "Farid", "Greta", "Hugo", "Ines", "Jonas",
    "Keiko", "Luca", "Mira", "Nils", "Olga", "Pablo", "Quinn", "Rosa", "Sami", "Tove",
    "Umar", "Vera", "Wim", "Xenia", "Yusuf", "Zoe",
];

const WORDS: &[&str] = &[
    "garlic", "butter", "slowly", "simmer", "golden", "crispy", "lemon", "fresh", "herbs",
    "roast", "pepper", "onion", "tender", "sauce", "stir", "gently", "oven", "pan", "salt",
    "smoky", "sweet", "bake", "chop", "fold", "whisk", "rest", "serve", "warm", "bright",
];

#[derive(Debug, Clone, Copy)]
pub struct SeedPlan {
    pub users: usize,
    pub recipes: usize,
}

impl Default for SeedPlan {
    fn default() -> Self {
        Self { users: 20, recipes: 100 }
    }
}

#[derive(Debug, Default, PartialEq, Eq)]
pub struct SeedReport {
    pub users: usize,
    pub recipes: usize,
}

fn sentence<R: Rng>(rng: &mut R, words: usize) -> String {
    let mut s = (0..words)
        .filter_map(|_| WORDS.choose(&mut *rng).copied())
        .collect::<Vec<_>>()
        .join(" ");
    if let Some(first) = s.get_mut(0..1) {
        first.make_ascii_uppercase();
    }
    s
}

fn paragraph<R: Rng>(rng: &mut R, min_chars: usize) -> String {
    let mut out = String::new();
    while out.chars().count() < min_chars {
        if !out.is_empty() {
            out.push(' ');
        }
        let n = rng.gen_range(6..=12);
        out.push_str(&sentence(&mut *rng, n));
        out.push('.');
    }
    out
}

fn username(i: usize) -> String {
    let base = FIRST_NAMES[i % FIRST_NAMES.len()];
    match i / FIRST_NAMES.len() {
        0 => base.to_string(),
        round => format!("{base}{round}"),
    }
}

/// Keeps the source chain of internal errors; field errors become their messages.
fn into_anyhow(e: ApiError) -> anyhow::Error {
    match e {
        ApiError::Internal(e) => e,
        ApiError::Validation(v) => anyhow!("validation failed: {:?}", v.messages()),
        other => anyhow!(other.to_string()),
    }
}

/// Wipes the store, then creates `plan.users` users and `plan.recipes`
/// recipes owned by randomly chosen users.
pub async fn run(repo: &dyn Repository, plan: SeedPlan) -> anyhow::Result<SeedReport> {
    info!("deleting all records");
    repo.delete_all().await.context("wipe existing records")?;

    info!(count = plan.users, "creating users");
    let mut user_ids = Vec::with_capacity(plan.users);
    for i in 0..plan.users {
        let (bio, image_url) = {
            let mut rng = rand::thread_rng();
            let name = username(i);
            (paragraph(&mut rng, 60), format!("https://picsum.photos/seed/{name}/200"))
        };
        let name = username(i);
        let user = register(
            repo,
            SignupRequest {
                username: Some(name.clone()),
                password: Some(DEFAULT_PASSWORD.into()),
                image_url: Some(image_url),
                bio: Some(bio),
            },
        )
        .await
        .map_err(into_anyhow)
        .with_context(|| format!("create user {name}"))?;
        user_ids.push(user.id);
    }

    let mut report = SeedReport { users: user_ids.len(), recipes: 0 };
    if user_ids.is_empty() {
        return Ok(report);
    }

    info!(count = plan.recipes, "creating recipes");
    for _ in 0..plan.recipes {
        let (owner, req) = {
            let mut rng = rand::thread_rng();
            let owner = user_ids[rng.gen_range(0..user_ids.len())];
            let req = CreateRecipeRequest {
                title: Some(sentence(&mut rng, 5)),
                instructions: Some(paragraph(&mut rng, MIN_INSTRUCTIONS_CHARS + 50)),
                minutes_to_complete: Some(Value::from(rng.gen_range(15..=90_i64))),
            };
            (owner, req)
        };
        create_recipe(repo, req, owner)
            .await
            .map_err(into_anyhow)
            .with_context(|| format!("create recipe for user {owner}"))?;
        report.recipes += 1;
    }

    info!(users = report.users, recipes = report.recipes, "seeding complete");
    Ok(report)
}
