use tracing::info;

use crate::db::dbfixtures::DbFixtures;
use crate::errors::FixtureError;
use crate::models::FixtureUser;

/// Insert the fixture users, returning how many rows were written
pub async fn seed_fixtures(db_url: &str, users: &[FixtureUser], skip_existing: bool) -> Result<u64, FixtureError> {
    info!("Seeding {} fixture user(s)", users.len());

    let db = DbFixtures::new(db_url).await?;
    let result = db.insert_users(users, skip_existing).await;
    db.close().await;

    let inserted = result?;
    info!("Seeded {} of {} fixture user(s)", inserted, users.len());
    Ok(inserted)
}

/// Delete the fixture users, returning how many rows were removed
pub async fn remove_fixtures(db_url: &str, users: &[FixtureUser]) -> Result<u64, FixtureError> {
    let emails: Vec<String> = users.iter().map(|u| u.email.clone()).collect();

    let db = DbFixtures::new(db_url).await?;
    let result = db.delete_users(&emails).await;
    db.close().await;

    result
}
