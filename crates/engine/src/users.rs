//! Users table.
//!
//! A user is identified by its `username`; projects reference users by it.

use sea_orm::entity::prelude::*;

use crate::project::Referenced;

/// A registered user, as returned by reference expansion.
///
/// `projects` is the user's project set, ordered by project id.
#[derive(Clone, Debug, PartialEq, Eq)]
pub struct User {
    pub username: String,
    pub display_name: Option<String>,
    pub projects: Vec<String>,
}

impl Referenced for User {
    fn ref_id(&self) -> &str {
        &self.username
    }
}

impl User {
    pub(crate) fn with_projects(value: Model, projects: Vec<String>) -> Self {
        Self {
            username: value.username,
            display_name: value.display_name,
            projects,
        }
    }
}

#[derive(Clone, Debug, PartialEq, DeriveEntityModel, Eq)]
#[sea_orm(table_name = "users")]
pub struct Model {
    #[sea_orm(primary_key, auto_increment = false)]
    pub username: String,
    pub display_name: Option<String>,
}

#[derive(Copy, Clone, Debug, EnumIter, DeriveRelation)]
pub enum Relation {
    #[sea_orm(has_many = "super::user_projects::Entity")]
    Projects,
}

impl Related<super::user_projects::Entity> for Entity {
    fn to() -> RelationDef {
        Relation::Projects.def()
    }
}

impl ActiveModelBehavior for ActiveModel {}
