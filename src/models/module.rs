use regex::Regex;
use serde::{Deserialize, Serialize};
use std::sync::LazyLock;
use uuid::Uuid;
use validator::Validate;

static ALIAS_RE: LazyLock<Regex> = LazyLock::new(|| Regex::new(r"^[A-Za-z0-9_-]{1,20}$").expect("invalid alias regex"));

#[derive(Debug, Clone, Serialize, sqlx::FromRow)]
pub struct Module {
    pub id: Uuid,
    pub title: String,
    pub alias: String,
    pub hours_taught: i32,
}

#[derive(Debug, Serialize)]
pub struct ModuleResponse {
    pub id: Uuid,
    pub title: String,
    pub alias: String,
    pub hours_taught: i32,
}

impl From<&Module> for ModuleResponse {
    fn from(module: &Module) -> Self {
        Self {
            id: module.id,
            title: module.title.clone(),
            alias: module.alias.clone(),
            hours_taught: module.hours_taught,
        }
    }
}

#[derive(Debug, Deserialize, Validate)]
pub struct ModuleRequest {
    #[validate(length(min = 1, max = 100))]
    pub title: String,
    #[validate(regex(path = *ALIAS_RE))]
    pub alias: String,
    #[validate(range(min = 0))]
    pub hours_taught: i32,
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn alias_allows_short_identifiers() {
        let request = ModuleRequest {
            title: "Databases".into(),
            alias: "db-101".into(),
            hours_taught: 48,
        };
        assert!(request.validate().is_ok());
    }

    #[test]
    fn alias_rejects_spaces_and_overlong_values() {
        let spaced = ModuleRequest {
            title: "Databases".into(),
            alias: "db 101".into(),
            hours_taught: 48,
        };
        assert!(spaced.validate().is_err());

        let overlong = ModuleRequest {
            title: "Databases".into(),
            alias: "a".repeat(21),
            hours_taught: 48,
        };
        assert!(overlong.validate().is_err());
    }
}
