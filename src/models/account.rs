use serde::Deserialize;

/// The authenticated user, from `GET /user`.
///
/// Fetching this is also how a login is verified: a 200 means the token
/// is live, a 401 means it is wrong or expired.
#[derive(Debug, Clone, Deserialize)]
pub struct AccountProfile {
    pub login: String,
    pub name: Option<String>,
    pub email: Option<String>,
    pub bio: Option<String>,
    pub html_url: Option<String>,
    #[serde(default)]
    pub public_repos: i64,
    #[serde(default)]
    pub total_private_repos: i64,
    #[serde(default)]
    pub followers: i64,
    #[serde(default)]
    pub following: i64,
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_parse_account_profile() {
        let json = r#"{
            "login": "alice",
            "name": "Alice Example",
            "email": null,
            "bio": "ships software",
            "html_url": "https://github.com/alice",
            "public_repos": 12,
            "followers": 34,
            "following": 5
        }"#;

        let profile: AccountProfile = serde_json::from_str(json).unwrap();
        assert_eq!(profile.login, "alice");
        assert_eq!(profile.public_repos, 12);
        assert_eq!(profile.total_private_repos, 0);
    }
}
