use recipebox::{
    config::AppConfig,
    logging,
    repo::PgRepository,
    seed::{self, SeedPlan},
};

#[tokio::main]
async fn main() -> anyhow::Result<()> {
    dotenvy::dotenv().ok();
    logging::init_tracing("recipebox=info,seed=info");

    let config = AppConfig::from_env()?;
    let repo = PgRepository::connect(&config).await?;
    repo.migrate().await;

    let report = seed::run(&repo, SeedPlan::default()).await?;
    tracing::info!(users = report.users, recipes = report.recipes, "done");
    Ok(())
}
