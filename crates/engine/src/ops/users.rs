use std::collections::{BTreeSet, HashMap};

use sea_orm::{ActiveValue, ConnectionTrait, QueryFilter, QueryOrder, TransactionTrait, prelude::*};

use crate::{
    EngineError, ResultEngine, User, user_projects, users, util::normalize_required_name,
};

use super::{Engine, with_tx};

/// Load `usernames` together with their project sets, keyed by username.
///
/// Usernames without a row are left out of the map.
pub(super) async fn load_users<C: ConnectionTrait>(
    db: &C,
    usernames: BTreeSet<String>,
) -> ResultEngine<HashMap<String, User>> {
    if usernames.is_empty() {
        return Ok(HashMap::new());
    }

    let models = users::Entity::find()
        .filter(users::Column::Username.is_in(usernames.iter().cloned()))
        .all(db)
        .await?;
    let links = user_projects::Entity::find()
        .filter(user_projects::Column::UserId.is_in(usernames))
        .order_by_asc(user_projects::Column::ProjectId)
        .all(db)
        .await?;

    let mut projects: HashMap<String, Vec<String>> = HashMap::new();
    for link in links {
        projects.entry(link.user_id).or_default().push(link.project_id);
    }

    Ok(models
        .into_iter()
        .map(|model| {
            let user_projects = projects.remove(&model.username).unwrap_or_default();
            (model.username.clone(), User::with_projects(model, user_projects))
        })
        .collect())
}

impl Engine {
    pub async fn user(&self, username: &str) -> ResultEngine<User> {
        let model = self.require_user_exists(&self.database, username).await?;

        load_users(&self.database, BTreeSet::from([model.username.clone()]))
            .await?
            .remove(&model.username)
            .ok_or_else(|| EngineError::KeyNotFound("user not exists".to_string()))
    }

    /// Register a new user. Usernames are trimmed and must be unique.
    pub async fn create_user(
        &self,
        username: &str,
        display_name: Option<&str>,
    ) -> ResultEngine<User> {
        let username = normalize_required_name(username, "user")?;
        let display_name = display_name
            .map(str::trim)
            .filter(|name| !name.is_empty())
            .map(str::to_string);

        let user = with_tx!(self, |db_tx| {
            if users::Entity::find_by_id(username.clone())
                .one(&db_tx)
                .await?
                .is_some()
            {
                return Err(EngineError::ExistingKey(username));
            }

            let entry = users::ActiveModel {
                username: ActiveValue::Set(username.clone()),
                display_name: ActiveValue::Set(display_name),
            };
            let model = entry.insert(&db_tx).await?;
            Ok::<_, EngineError>(User::with_projects(model, Vec::new()))
        })?;

        tracing::info!("user {} has been created", user.username);
        Ok(user)
    }
}
