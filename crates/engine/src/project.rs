//! The `Project` is a financial workspace shared by a set of users. It
//! groups the currencies and categories the users book against.
//!
//! Projects store their references (users, currencies) as identifiers. A
//! [`Project`] fresh from storage carries [`Ref::Id`] values only; expansion
//! replaces the requested fields with [`Ref::Expanded`] entities.

use chrono::{DateTime, Utc};
use sea_orm::{ActiveValue, prelude::*};

use crate::{Currency, User};

/// Entities that can be referenced from a project.
pub trait Referenced {
    /// Identifier stored by the referencing document.
    fn ref_id(&self) -> &str;
}

/// A reference that is either a bare identifier or the expanded entity.
#[derive(Clone, Debug, PartialEq, Eq)]
pub enum Ref<T> {
    Id(String),
    Expanded(T),
}

impl<T: Referenced> Ref<T> {
    /// Identifier of the referenced entity, expanded or not.
    pub fn id(&self) -> &str {
        match self {
            Ref::Id(id) => id,
            Ref::Expanded(entity) => entity.ref_id(),
        }
    }

    pub fn expanded(&self) -> Option<&T> {
        match self {
            Ref::Id(_) => None,
            Ref::Expanded(entity) => Some(entity),
        }
    }

    pub fn into_expanded(self) -> Option<T> {
        match self {
            Ref::Id(_) => None,
            Ref::Expanded(entity) => Some(entity),
        }
    }
}

/// Reference fields of a project that can be expanded.
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub enum ProjectField {
    Owners,
    Users,
    Currencies,
    MainCurrency,
    CreatedBy,
    ModifiedBy,
}

/// Fields expanded before a project is handed back to a caller.
pub const PROJECT_EXPANSION: [ProjectField; 6] = [
    ProjectField::Owners,
    ProjectField::Users,
    ProjectField::Currencies,
    ProjectField::MainCurrency,
    ProjectField::CreatedBy,
    ProjectField::ModifiedBy,
];

#[derive(Clone, Debug, PartialEq)]
pub struct Project {
    pub id: String,
    pub name: String,
    /// Users allowed to rename the project. Always a subset of `users`.
    pub owners: Vec<Ref<User>>,
    /// Users with read/write access.
    pub users: Vec<Ref<User>>,
    pub main_currency: Option<Ref<Currency>>,
    pub currencies: Vec<Ref<Currency>>,
    /// Category ids, managed through the category operations.
    pub categories: Vec<String>,
    pub created: DateTime<Utc>,
    pub created_by: Ref<User>,
    pub modified_by: Ref<User>,
}

impl Project {
    pub fn is_owner(&self, user_id: &str) -> bool {
        self.owners.iter().any(|owner| owner.id() == user_id)
    }

    pub fn is_member(&self, user_id: &str) -> bool {
        self.users.iter().any(|user| user.id() == user_id)
    }
}

#[derive(Clone, Debug, PartialEq, DeriveEntityModel, Eq)]
#[sea_orm(table_name = "projects")]
pub struct Model {
    #[sea_orm(primary_key, auto_increment = false)]
    pub id: String,
    pub name: String,
    pub main_currency_id: Option<String>,
    pub created_at: DateTimeUtc,
    pub created_by: String,
    pub modified_by: String,
}

#[derive(Copy, Clone, Debug, EnumIter, DeriveRelation)]
pub enum Relation {
    #[sea_orm(has_many = "super::project_members::Entity")]
    Members,
    #[sea_orm(has_many = "super::project_currencies::Entity")]
    Currencies,
    #[sea_orm(has_many = "super::categories::Entity")]
    Categories,
}

impl Related<super::project_members::Entity> for Entity {
    fn to() -> RelationDef {
        Relation::Members.def()
    }
}

impl Related<super::project_currencies::Entity> for Entity {
    fn to() -> RelationDef {
        Relation::Currencies.def()
    }
}

impl Related<super::categories::Entity> for Entity {
    fn to() -> RelationDef {
        Relation::Categories.def()
    }
}

impl ActiveModelBehavior for ActiveModel {}

impl ActiveModel {
    pub(crate) fn for_creator(
        id: &str,
        name: &str,
        user_id: &str,
        created_at: DateTime<Utc>,
    ) -> Self {
        Self {
            id: ActiveValue::Set(id.to_string()),
            name: ActiveValue::Set(name.to_string()),
            main_currency_id: ActiveValue::Set(None),
            created_at: ActiveValue::Set(created_at),
            created_by: ActiveValue::Set(user_id.to_string()),
            modified_by: ActiveValue::Set(user_id.to_string()),
        }
    }
}
