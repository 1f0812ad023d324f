use serde::{Deserialize, Serialize};

use crate::config::Config;

/// A row seeded into `public.user_user`. The email doubles as the username.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct FixtureUser {
    pub sso_user_id: i64,
    pub email: String,
    pub phone: String,
    pub password_hash: String,
}

impl FixtureUser {
    /// The two users every scenario expects to exist
    pub fn defaults(config: &Config) -> Vec<FixtureUser> {
        vec![
            FixtureUser {
                sso_user_id: 1,
                email: config.test_user_email.clone(),
                phone: config.test_user_phone.clone(),
                password_hash: config.test_user_password_hash.clone(),
            },
            FixtureUser {
                sso_user_id: 2,
                email: config.secondary_user_email.clone(),
                phone: config.secondary_user_phone.clone(),
                password_hash: config.test_user_password_hash.clone(),
            },
        ]
    }
}
