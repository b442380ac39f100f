//! Development user configuration from environment variables.
//!
//! When `DEV_USER_EMAIL` and `DEV_USER_PASSWORD` are both set, startup makes
//! sure that account exists so a fresh database can be signed into.

/// Credentials and profile for the bootstrap account.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct DevUserConfig {
    pub email: String,
    pub password: String,
    pub display_name: String,
    pub department: String,
    pub role: String,
}

/// Reads the bootstrap account from the environment.
///
/// # Returns
///
/// `None` unless both `DEV_USER_EMAIL` and `DEV_USER_PASSWORD` are set and non-empty.
#[must_use]
pub fn get_dev_user() -> Option<DevUserConfig> {
    dev_user_from(|key| std::env::var(key).ok())
}

fn dev_user_from<F>(lookup: F) -> Option<DevUserConfig>
where
    F: Fn(&str) -> Option<String>,
{
    let email = lookup("DEV_USER_EMAIL").filter(|v| !v.trim().is_empty())?;
    let password = lookup("DEV_USER_PASSWORD").filter(|v| !v.is_empty())?;

    Some(DevUserConfig {
        email,
        password,
        display_name: lookup("DEV_USER_NAME").unwrap_or_else(|| "Developer".to_string()),
        department: lookup("DEV_USER_DEPT").unwrap_or_else(|| "E&M SYSTEMS".to_string()),
        role: lookup("DEV_USER_ROLE").unwrap_or_else(|| "dev".to_string()),
    })
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::collections::HashMap;

    fn lookup_in<'a>(vars: &'a HashMap<&'a str, &'a str>) -> impl Fn(&str) -> Option<String> + 'a {
        |key| vars.get(key).map(|v| (*v).to_string())
    }

    #[test]
    fn test_dev_user_requires_email_and_password() {
        let vars = HashMap::from([("DEV_USER_EMAIL", "dev@example.com")]);
        assert!(dev_user_from(lookup_in(&vars)).is_none());

        let vars = HashMap::from([("DEV_USER_EMAIL", "  "), ("DEV_USER_PASSWORD", "secret")]);
        assert!(dev_user_from(lookup_in(&vars)).is_none());
    }

    #[test]
    fn test_dev_user_defaults() {
        let vars = HashMap::from([
            ("DEV_USER_EMAIL", "dev@example.com"),
            ("DEV_USER_PASSWORD", "secret"),
        ]);
        let user = dev_user_from(lookup_in(&vars)).expect("configured");
        assert_eq!(user.role, "dev");
        assert_eq!(user.department, "E&M SYSTEMS");
        assert_eq!(user.display_name, "Developer");
    }

    #[test]
    fn test_dev_user_overrides() {
        let vars = HashMap::from([
            ("DEV_USER_EMAIL", "ops@example.com"),
            ("DEV_USER_PASSWORD", "secret"),
            ("DEV_USER_ROLE", "manager"),
            ("DEV_USER_NAME", "Ops Lead"),
        ]);
        let user = dev_user_from(lookup_in(&vars)).expect("configured");
        assert_eq!(user.role, "manager");
        assert_eq!(user.display_name, "Ops Lead");
    }
}
