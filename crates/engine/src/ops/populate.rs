//! Loading and expansion of project documents.
//!
//! [`load_project`] reads a project and its join rows, keeping every
//! reference as an id. [`populate_project`] is a separate pass that resolves
//! only the requested [`ProjectField`]s.

use std::collections::{BTreeSet, HashMap};

use sea_orm::{ConnectionTrait, QueryFilter, QueryOrder, prelude::*};

use crate::{
    Currency, Project, ProjectField, Ref, ResultEngine, User, categories, currency,
    project::{self, Referenced},
    project_currencies, project_members,
    project_members::MemberRole,
};

use super::users::load_users;

pub(super) async fn load_project<C: ConnectionTrait>(
    db: &C,
    model: project::Model,
) -> ResultEngine<Project> {
    let members = project_members::Entity::find()
        .filter(project_members::Column::ProjectId.eq(model.id.clone()))
        .order_by_asc(project_members::Column::UserId)
        .all(db)
        .await?;
    let currency_rows = project_currencies::Entity::find()
        .filter(project_currencies::Column::ProjectId.eq(model.id.clone()))
        .order_by_asc(project_currencies::Column::Position)
        .all(db)
        .await?;
    let category_rows = categories::Entity::find()
        .filter(categories::Column::ProjectId.eq(model.id.clone()))
        .order_by_asc(categories::Column::NameNorm)
        .all(db)
        .await?;

    let mut owners = Vec::new();
    let mut users = Vec::with_capacity(members.len());
    for member in members {
        if MemberRole::try_from(member.role.as_str())?.is_owner() {
            owners.push(Ref::Id(member.user_id.clone()));
        }
        users.push(Ref::Id(member.user_id));
    }

    Ok(Project {
        id: model.id,
        name: model.name,
        owners,
        users,
        main_currency: model.main_currency_id.map(Ref::Id),
        currencies: currency_rows
            .into_iter()
            .map(|row| Ref::Id(row.currency_id))
            .collect(),
        categories: category_rows.into_iter().map(|row| row.id).collect(),
        created: model.created_at,
        created_by: Ref::Id(model.created_by),
        modified_by: Ref::Id(model.modified_by),
    })
}

pub(super) async fn populate_project<C: ConnectionTrait>(
    db: &C,
    mut project: Project,
    fields: &[ProjectField],
) -> ResultEngine<Project> {
    let wants = |field: ProjectField| fields.contains(&field);

    let mut user_ids = BTreeSet::new();
    if wants(ProjectField::Owners) {
        user_ids.extend(project.owners.iter().map(|r| r.id().to_string()));
    }
    if wants(ProjectField::Users) {
        user_ids.extend(project.users.iter().map(|r| r.id().to_string()));
    }
    if wants(ProjectField::CreatedBy) {
        user_ids.insert(project.created_by.id().to_string());
    }
    if wants(ProjectField::ModifiedBy) {
        user_ids.insert(project.modified_by.id().to_string());
    }

    let mut currency_ids = BTreeSet::new();
    if wants(ProjectField::Currencies) {
        currency_ids.extend(project.currencies.iter().map(|r| r.id().to_string()));
    }
    if wants(ProjectField::MainCurrency)
        && let Some(main) = &project.main_currency
    {
        currency_ids.insert(main.id().to_string());
    }

    let found_users: HashMap<String, User> = load_users(db, user_ids).await?;
    let found_currencies: HashMap<String, Currency> = if currency_ids.is_empty() {
        HashMap::new()
    } else {
        currency::Entity::find()
            .filter(currency::Column::Id.is_in(currency_ids))
            .all(db)
            .await?
            .into_iter()
            .map(|model| (model.id.clone(), Currency::from(model)))
            .collect()
    };

    if wants(ProjectField::Owners) {
        project.owners = expand_all(project.owners, &found_users);
    }
    if wants(ProjectField::Users) {
        project.users = expand_all(project.users, &found_users);
    }
    if wants(ProjectField::CreatedBy) {
        project.created_by = expand(project.created_by, &found_users);
    }
    if wants(ProjectField::ModifiedBy) {
        project.modified_by = expand(project.modified_by, &found_users);
    }
    if wants(ProjectField::Currencies) {
        project.currencies = expand_all(project.currencies, &found_currencies);
    }
    if wants(ProjectField::MainCurrency) {
        project.main_currency = project
            .main_currency
            .map(|main| expand(main, &found_currencies));
    }

    Ok(project)
}

/// Dangling references stay as ids.
fn expand<T: Referenced + Clone>(reference: Ref<T>, found: &HashMap<String, T>) -> Ref<T> {
    match found.get(reference.id()).cloned() {
        Some(entity) => Ref::Expanded(entity),
        None => reference,
    }
}

fn expand_all<T: Referenced + Clone>(
    references: Vec<Ref<T>>,
    found: &HashMap<String, T>,
) -> Vec<Ref<T>> {
    references
        .into_iter()
        .map(|reference| expand(reference, found))
        .collect()
}
