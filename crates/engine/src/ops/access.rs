use sea_orm::{ConnectionTrait, prelude::*};

use crate::{EngineError, ResultEngine, project, project_members, project_members::MemberRole, users};

use super::Engine;

const PROJECT_NOT_FOUND: &str = "project not exists";

impl Engine {
    async fn find_project_by_id<C: ConnectionTrait>(
        &self,
        db: &C,
        project_id: &str,
    ) -> ResultEngine<Option<project::Model>> {
        project::Entity::find_by_id(project_id.to_string())
            .one(db)
            .await
            .map_err(Into::into)
    }

    pub(super) async fn member_role<C: ConnectionTrait>(
        &self,
        db: &C,
        project_id: &str,
        user_id: &str,
    ) -> ResultEngine<Option<MemberRole>> {
        let row = project_members::Entity::find_by_id((project_id.to_string(), user_id.to_string()))
            .one(db)
            .await?;
        row.as_ref()
            .map(|m| MemberRole::try_from(m.role.as_str()))
            .transpose()
    }

    /// Project `project_id` if `user_id` is in its `users` set.
    ///
    /// A project the user cannot see is reported exactly like a missing one.
    pub(super) async fn require_project_member<C: ConnectionTrait>(
        &self,
        db: &C,
        project_id: &str,
        user_id: &str,
    ) -> ResultEngine<project::Model> {
        if self.member_role(db, project_id, user_id).await?.is_none() {
            return Err(EngineError::KeyNotFound(PROJECT_NOT_FOUND.to_string()));
        }
        self.find_project_by_id(db, project_id)
            .await?
            .ok_or_else(|| EngineError::KeyNotFound(PROJECT_NOT_FOUND.to_string()))
    }

    /// Project `project_id` if `user_id` is in its `owners` set.
    pub(super) async fn require_project_owner<C: ConnectionTrait>(
        &self,
        db: &C,
        project_id: &str,
        user_id: &str,
    ) -> ResultEngine<project::Model> {
        let role = self.member_role(db, project_id, user_id).await?;
        if !role.is_some_and(MemberRole::is_owner) {
            return Err(EngineError::KeyNotFound(PROJECT_NOT_FOUND.to_string()));
        }
        self.find_project_by_id(db, project_id)
            .await?
            .ok_or_else(|| EngineError::KeyNotFound(PROJECT_NOT_FOUND.to_string()))
    }

    pub(super) async fn require_user_exists<C: ConnectionTrait>(
        &self,
        db: &C,
        username: &str,
    ) -> ResultEngine<users::Model> {
        users::Entity::find_by_id(username.to_string())
            .one(db)
            .await?
            .ok_or_else(|| EngineError::KeyNotFound("user not exists".to_string()))
    }
}
