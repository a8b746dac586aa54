use chrono::Utc;
use sea_orm::{ActiveValue, JoinType, QueryFilter, QuerySelect, TransactionTrait, prelude::*};
use uuid::Uuid;

use crate::{
    Category, CategoryInput, Currency, FindById, PROJECT_EXPANSION, Project, ProjectField,
    ResultEngine, project, project_members, project_members::MemberRole, user_projects,
    util::normalize_required_name,
};

use super::{
    Engine,
    populate::{load_project, populate_project},
    with_tx,
};

/// Resolves projects visible to one user; used to validate project ids
/// coming from request paths.
pub struct ProjectLookup<'a> {
    engine: &'a Engine,
    user_id: &'a str,
}

impl FindById for ProjectLookup<'_> {
    type Output = Project;

    async fn find_by_id(&self, id: &str) -> ResultEngine<Project> {
        self.engine.project(id, self.user_id).await
    }
}

impl Engine {
    pub fn project_lookup<'a>(&'a self, user_id: &'a str) -> ProjectLookup<'a> {
        ProjectLookup {
            engine: self,
            user_id,
        }
    }

    /// Create a new project owned by `user_id`.
    ///
    /// The project is written first, then linked into the user's project set,
    /// then expanded. A failing step is reported as is: the steps that already
    /// succeeded are not rolled back.
    pub async fn create_project(&self, name: &str, user_id: &str) -> ResultEngine<Project> {
        let name = normalize_required_name(name, "project")?;
        let project_id = Uuid::new_v4().to_string();

        let model = self
            .insert_project(&project_id, &name, user_id)
            .await
            .inspect_err(|err| tracing::error!("new project hasn't been created: {err}"))?;

        self.link_project_to_user(user_id, &project_id)
            .await
            .inspect_err(|err| {
                tracing::error!(
                    project_id = %project_id,
                    "project with given id wasn't added to user {user_id}: {err}"
                )
            })?;

        let project = load_project(&self.database, model).await?;
        let project = populate_project(&self.database, project, &PROJECT_EXPANSION)
            .await
            .inspect_err(|err| {
                tracing::error!(project_id = %project_id, "new project cannot be populated: {err}")
            })?;

        tracing::info!(project_id = %project_id, "new project has been successfully created");
        Ok(project)
    }

    async fn insert_project(
        &self,
        project_id: &str,
        name: &str,
        user_id: &str,
    ) -> ResultEngine<project::Model> {
        let entry = project::ActiveModel::for_creator(project_id, name, user_id, Utc::now());
        with_tx!(self, |db_tx| {
            let model = entry.insert(&db_tx).await?;

            let owner = project_members::ActiveModel {
                project_id: ActiveValue::Set(project_id.to_string()),
                user_id: ActiveValue::Set(user_id.to_string()),
                role: ActiveValue::Set(MemberRole::Owner.as_str().to_string()),
            };
            owner.insert(&db_tx).await?;

            Ok(model)
        })
    }

    /// Add `project_id` to the user's project set. Adding twice is a no-op.
    async fn link_project_to_user(&self, user_id: &str, project_id: &str) -> ResultEngine<()> {
        self.require_user_exists(&self.database, user_id).await?;

        let key = (user_id.to_string(), project_id.to_string());
        if user_projects::Entity::find_by_id(key)
            .one(&self.database)
            .await?
            .is_some()
        {
            return Ok(());
        }

        let link = user_projects::ActiveModel {
            user_id: ActiveValue::Set(user_id.to_string()),
            project_id: ActiveValue::Set(project_id.to_string()),
        };
        link.insert(&self.database).await?;
        Ok(())
    }

    /// Return the project `project_id` if `user_id` is one of its users,
    /// with every reference field expanded.
    pub async fn project(&self, project_id: &str, user_id: &str) -> ResultEngine<Project> {
        let project = self
            .project_unexpanded(project_id, user_id)
            .await
            .inspect_err(|err| {
                tracing::warn!(project_id = %project_id, "project with given id wasn't found: {err}")
            })?;
        let project = populate_project(&self.database, project, &PROJECT_EXPANSION).await?;

        tracing::info!(project_id = %project_id, "project with given id was successfully found");
        Ok(project)
    }

    /// Same visibility rules as [`Engine::project`], but every reference is
    /// left as an id.
    pub async fn project_unexpanded(
        &self,
        project_id: &str,
        user_id: &str,
    ) -> ResultEngine<Project> {
        let model = self
            .require_project_member(&self.database, project_id, user_id)
            .await?;
        load_project(&self.database, model).await
    }

    /// Expand the given reference fields of `project`.
    pub async fn expand_project(
        &self,
        project: Project,
        fields: &[ProjectField],
    ) -> ResultEngine<Project> {
        populate_project(&self.database, project, fields).await
    }

    /// All projects `user_id` is a user of, expanded. No ordering is
    /// guaranteed.
    pub async fn projects(&self, user_id: &str) -> ResultEngine<Vec<Project>> {
        let models = project::Entity::find()
            .join(JoinType::InnerJoin, project::Relation::Members.def())
            .filter(project_members::Column::UserId.eq(user_id.to_string()))
            .all(&self.database)
            .await
            .inspect_err(|err| {
                tracing::error!("projects of user {user_id} weren't found: {err}")
            })?;

        let mut out = Vec::with_capacity(models.len());
        for model in models {
            let project = load_project(&self.database, model).await?;
            out.push(populate_project(&self.database, project, &PROJECT_EXPANSION).await?);
        }

        tracing::info!("projects of user {user_id} were successfully found");
        Ok(out)
    }

    /// Rename a project. Only owners may rename; returns the new name.
    pub async fn rename_project(
        &self,
        project_id: &str,
        user_id: &str,
        name: &str,
    ) -> ResultEngine<String> {
        let name = normalize_required_name(name, "project")?;
        let name = self
            .store_project_name(project_id, user_id, name)
            .await
            .inspect_err(|err| {
                tracing::error!(project_id = %project_id, "project was not renamed: {err}")
            })?;

        tracing::info!(project_id = %project_id, "project was successfully renamed");
        Ok(name)
    }

    async fn store_project_name(
        &self,
        project_id: &str,
        user_id: &str,
        name: String,
    ) -> ResultEngine<String> {
        with_tx!(self, |db_tx| {
            let model = self
                .require_project_owner(&db_tx, project_id, user_id)
                .await?;
            let mut active: project::ActiveModel = model.into();
            active.name = ActiveValue::Set(name);
            active.modified_by = ActiveValue::Set(user_id.to_string());
            let updated = active.update(&db_tx).await?;
            Ok(updated.name)
        })
    }

    /// Replace the project's currency set, then return it as stored.
    ///
    /// The write and the read back are two separate steps: a concurrent
    /// update landing in between is visible in the result.
    pub async fn update_currencies(
        &self,
        project_id: &str,
        user_id: &str,
        currency_ids: &[String],
    ) -> ResultEngine<Vec<Currency>> {
        self.currencies()
            .update_project_currencies(project_id, user_id, currency_ids)
            .await?;

        let project = self.project(project_id, user_id).await?;
        Ok(project
            .currencies
            .into_iter()
            .filter_map(|currency| currency.into_expanded())
            .collect())
    }

    pub async fn update_main_currency(
        &self,
        project_id: &str,
        user_id: &str,
        currency_id: &str,
    ) -> ResultEngine<Currency> {
        self.currencies()
            .update_project_main_currency(project_id, user_id, currency_id)
            .await
    }

    pub async fn add_category(
        &self,
        project_id: &str,
        user_id: &str,
        input: CategoryInput,
    ) -> ResultEngine<Category> {
        self.category_store().put(project_id, user_id, input).await
    }

    pub async fn categories(&self, project_id: &str, user_id: &str) -> ResultEngine<Vec<Category>> {
        self.category_store().all(project_id, user_id).await
    }

    pub async fn update_category(
        &self,
        project_id: &str,
        user_id: &str,
        category_id: &str,
        input: CategoryInput,
    ) -> ResultEngine<Category> {
        self.category_store()
            .update(project_id, user_id, category_id, input)
            .await
    }

    pub async fn delete_category(
        &self,
        project_id: &str,
        user_id: &str,
        category_id: &str,
    ) -> ResultEngine<()> {
        self.category_store()
            .delete(project_id, user_id, category_id)
            .await
    }
}
