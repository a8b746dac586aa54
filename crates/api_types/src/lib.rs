use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};

/// A reference field: the bare id when the target could not be expanded,
/// the full object otherwise.
#[derive(Clone, Debug, PartialEq, Eq, Serialize, Deserialize)]
#[serde(untagged)]
pub enum Expandable<T> {
    Id(String),
    Expanded(T),
}

pub mod user {
    use super::*;

    #[derive(Clone, Debug, PartialEq, Eq, Serialize, Deserialize)]
    #[serde(rename_all = "camelCase")]
    pub struct UserView {
        pub username: String,
        #[serde(default, skip_serializing_if = "Option::is_none")]
        pub display_name: Option<String>,
        #[serde(default)]
        pub projects: Vec<String>,
    }
}

pub mod currency {
    use super::*;

    #[derive(Clone, Debug, PartialEq, Eq, Serialize, Deserialize)]
    #[serde(rename_all = "camelCase")]
    pub struct CurrencyView {
        pub id: String,
        pub code: String,
        pub name: String,
        pub symbol: String,
    }
}

pub mod project {
    use super::{currency::CurrencyView, user::UserView, *};

    #[derive(Debug, Serialize, Deserialize)]
    pub struct ProjectNew {
        pub name: String,
    }

    #[derive(Debug, Serialize, Deserialize)]
    pub struct ProjectRename {
        pub name: String,
    }

    /// Request body of `update-currencies`: the full ordered selection.
    #[derive(Debug, Serialize, Deserialize)]
    pub struct CurrenciesUpdate {
        pub currencies: Vec<String>,
    }

    #[derive(Debug, Serialize, Deserialize)]
    #[serde(rename_all = "camelCase")]
    pub struct MainCurrencyUpdate {
        pub main_currency: String,
    }

    #[derive(Clone, Debug, PartialEq, Serialize, Deserialize)]
    #[serde(rename_all = "camelCase")]
    pub struct ProjectView {
        pub id: String,
        pub name: String,
        pub owners: Vec<Expandable<UserView>>,
        pub users: Vec<Expandable<UserView>>,
        pub main_currency: Option<Expandable<CurrencyView>>,
        pub currencies: Vec<Expandable<CurrencyView>>,
        pub categories: Vec<String>,
        pub created: DateTime<Utc>,
        pub created_by: Expandable<UserView>,
        pub modified_by: Expandable<UserView>,
    }
}

pub mod category {
    use super::*;

    #[derive(Clone, Copy, Debug, PartialEq, Eq, Serialize, Deserialize)]
    #[serde(rename_all = "snake_case")]
    pub enum CategoryType {
        Income,
        Expense,
    }

    /// Request body for adding or updating a category.
    #[derive(Debug, Serialize, Deserialize)]
    #[serde(rename_all = "camelCase")]
    pub struct CategoryWrite {
        pub name: String,
        pub category_type: CategoryType,
        #[serde(default)]
        pub parent: Option<String>,
    }

    #[derive(Clone, Debug, PartialEq, Eq, Serialize, Deserialize)]
    #[serde(rename_all = "camelCase")]
    pub struct CategoryView {
        pub id: String,
        pub project_id: String,
        pub name: String,
        pub category_type: CategoryType,
        pub parent: Option<String>,
    }
}
