//! Category tree of a project.

use std::collections::{HashMap, HashSet};

use sea_orm::{ActiveValue, ConnectionTrait, QueryFilter, QueryOrder, TransactionTrait, prelude::*};
use uuid::Uuid;

use crate::{
    Category, CategoryInput, CategoryType, EngineError, FindById, ResultEngine, categories,
    is_valid_and_exist,
    util::{normalize_category_display, normalize_category_key},
};

use super::{Engine, with_tx};

const CATEGORY_NOT_FOUND: &str = "category not exists";

/// Category operations on the projects visible to a user.
#[derive(Clone, Copy)]
pub struct Categories<'a> {
    engine: &'a Engine,
}

/// Resolves a category inside one project, as seen by one user.
pub struct CategoryLookup<'a> {
    engine: &'a Engine,
    project_id: &'a str,
    user_id: &'a str,
}

impl<'a> CategoryLookup<'a> {
    pub fn scoped(engine: &'a Engine, project_id: &'a str, user_id: &'a str) -> Self {
        Self {
            engine,
            project_id,
            user_id,
        }
    }
}

impl FindById for CategoryLookup<'_> {
    type Output = Category;

    async fn find_by_id(&self, id: &str) -> ResultEngine<Category> {
        self.engine
            .category_store()
            .get(self.project_id, self.user_id, id)
            .await
    }
}

impl Engine {
    pub fn category_store(&self) -> Categories<'_> {
        Categories { engine: self }
    }
}

impl Categories<'_> {
    pub async fn get(
        &self,
        project_id: &str,
        user_id: &str,
        category_id: &str,
    ) -> ResultEngine<Category> {
        self.engine
            .require_project_member(&self.engine.database, project_id, user_id)
            .await?;
        let model = find_in_project(&self.engine.database, project_id, category_id).await?;
        Category::try_from(model)
    }

    /// Categories of the project, ordered by name.
    pub async fn all(&self, project_id: &str, user_id: &str) -> ResultEngine<Vec<Category>> {
        self.engine
            .require_project_member(&self.engine.database, project_id, user_id)
            .await?;
        categories::Entity::find()
            .filter(categories::Column::ProjectId.eq(project_id.to_string()))
            .order_by_asc(categories::Column::NameNorm)
            .order_by_asc(categories::Column::Id)
            .all(&self.engine.database)
            .await?
            .into_iter()
            .map(Category::try_from)
            .collect()
    }

    pub async fn put(
        &self,
        project_id: &str,
        user_id: &str,
        input: CategoryInput,
    ) -> ResultEngine<Category> {
        self.engine
            .require_project_member(&self.engine.database, project_id, user_id)
            .await?;
        let name = normalize_category_display(&input.name)?;
        let name_norm = normalize_category_key(&name)?;
        let parent_id = self
            .checked_parent(project_id, user_id, input.parent.as_deref(), input.category_type)
            .await?;

        let category = Category {
            id: Uuid::new_v4().to_string(),
            project_id: project_id.to_string(),
            name,
            category_type: input.category_type,
            parent_id,
        };

        let created = with_tx!(self.engine, |db_tx| {
            ensure_unique_sibling(&db_tx, &category, &name_norm, None).await?;

            let entry = categories::ActiveModel {
                id: ActiveValue::Set(category.id.clone()),
                project_id: ActiveValue::Set(category.project_id.clone()),
                name: ActiveValue::Set(category.name.clone()),
                name_norm: ActiveValue::Set(name_norm),
                category_type: ActiveValue::Set(category.category_type.as_str().to_string()),
                parent_id: ActiveValue::Set(category.parent_id.clone()),
            };
            entry.insert(&db_tx).await?;
            Ok::<_, EngineError>(category)
        })
        .inspect_err(|err| {
            tracing::error!(project_id = %project_id, "category wasn't created: {err}")
        })?;

        tracing::info!(project_id = %project_id, category_id = %created.id, "category created");
        Ok(created)
    }

    /// Replace name, type and parent of a category.
    ///
    /// The new parent cannot be the category itself or one of its
    /// descendants. A category with children keeps its type.
    pub async fn update(
        &self,
        project_id: &str,
        user_id: &str,
        category_id: &str,
        input: CategoryInput,
    ) -> ResultEngine<Category> {
        let lookup = CategoryLookup::scoped(self.engine, project_id, user_id);
        let current = is_valid_and_exist(category_id, &lookup).await?;

        let name = normalize_category_display(&input.name)?;
        let name_norm = normalize_category_key(&name)?;
        let parent_id = self
            .checked_parent(project_id, user_id, input.parent.as_deref(), input.category_type)
            .await?;

        let tree = parent_index(&self.engine.database, project_id).await?;
        if let Some(parent_id) = parent_id.as_deref()
            && ancestors(&tree, parent_id).any(|id| id == current.id)
        {
            return Err(EngineError::InvalidCategory(
                "category cannot be nested under itself or its descendants".to_string(),
            ));
        }
        let has_children = tree
            .values()
            .any(|parent| parent.as_deref() == Some(current.id.as_str()));
        if has_children && input.category_type != current.category_type {
            return Err(EngineError::InvalidCategory(
                "type of a category with subcategories cannot change".to_string(),
            ));
        }

        let updated = Category {
            name,
            category_type: input.category_type,
            parent_id,
            ..current
        };

        with_tx!(self.engine, |db_tx| {
            ensure_unique_sibling(&db_tx, &updated, &name_norm, Some(&updated.id)).await?;

            let model = find_in_project(&db_tx, project_id, &updated.id).await?;
            let mut active: categories::ActiveModel = model.into();
            active.name = ActiveValue::Set(updated.name.clone());
            active.name_norm = ActiveValue::Set(name_norm);
            active.category_type = ActiveValue::Set(updated.category_type.as_str().to_string());
            active.parent_id = ActiveValue::Set(updated.parent_id.clone());
            active.update(&db_tx).await?;
            Ok::<_, EngineError>(())
        })
        .inspect_err(|err| {
            tracing::error!(project_id = %project_id, "category {category_id} wasn't updated: {err}")
        })?;

        tracing::info!(project_id = %project_id, category_id = %updated.id, "category updated");
        Ok(updated)
    }

    /// Delete a category together with all of its descendants.
    pub async fn delete(
        &self,
        project_id: &str,
        user_id: &str,
        category_id: &str,
    ) -> ResultEngine<()> {
        let lookup = CategoryLookup::scoped(self.engine, project_id, user_id);
        let current = is_valid_and_exist(category_id, &lookup).await?;

        let tree = parent_index(&self.engine.database, project_id).await?;
        let doomed = subtree(&tree, &current.id);

        with_tx!(self.engine, |db_tx| {
            categories::Entity::delete_many()
                .filter(categories::Column::ProjectId.eq(project_id.to_string()))
                .filter(categories::Column::Id.is_in(doomed.iter().cloned()))
                .exec(&db_tx)
                .await?;
            Ok::<_, EngineError>(())
        })
        .inspect_err(|err| {
            tracing::error!(project_id = %project_id, "category {category_id} wasn't deleted: {err}")
        })?;

        tracing::info!(
            project_id = %project_id,
            category_id = %current.id,
            removed = doomed.len(),
            "category deleted"
        );
        Ok(())
    }

    /// Validate the requested parent: it must live in the same project and
    /// have the same type.
    async fn checked_parent(
        &self,
        project_id: &str,
        user_id: &str,
        parent: Option<&str>,
        category_type: CategoryType,
    ) -> ResultEngine<Option<String>> {
        let Some(parent) = parent else {
            return Ok(None);
        };

        let lookup = CategoryLookup::scoped(self.engine, project_id, user_id);
        let parent = is_valid_and_exist(parent, &lookup).await?;
        if parent.category_type != category_type {
            return Err(EngineError::InvalidCategory(format!(
                "parent category {} is an {} category",
                parent.name,
                parent.category_type.as_str()
            )));
        }
        Ok(Some(parent.id))
    }
}

async fn find_in_project<C: ConnectionTrait>(
    db: &C,
    project_id: &str,
    category_id: &str,
) -> ResultEngine<categories::Model> {
    categories::Entity::find_by_id(category_id.to_string())
        .filter(categories::Column::ProjectId.eq(project_id.to_string()))
        .one(db)
        .await?
        .ok_or_else(|| EngineError::KeyNotFound(CATEGORY_NOT_FOUND.to_string()))
}

async fn ensure_unique_sibling<C: ConnectionTrait>(
    db: &C,
    category: &Category,
    name_norm: &str,
    except: Option<&str>,
) -> ResultEngine<()> {
    let mut query = categories::Entity::find()
        .filter(categories::Column::ProjectId.eq(category.project_id.clone()))
        .filter(categories::Column::NameNorm.eq(name_norm.to_string()));
    query = match &category.parent_id {
        Some(parent_id) => query.filter(categories::Column::ParentId.eq(parent_id.clone())),
        None => query.filter(categories::Column::ParentId.is_null()),
    };
    if let Some(except) = except {
        query = query.filter(categories::Column::Id.ne(except.to_string()));
    }

    if query.one(db).await?.is_some() {
        return Err(EngineError::ExistingKey(category.name.clone()));
    }
    Ok(())
}

/// `category id -> parent id` for every category of the project.
async fn parent_index<C: ConnectionTrait>(
    db: &C,
    project_id: &str,
) -> ResultEngine<HashMap<String, Option<String>>> {
    let rows = categories::Entity::find()
        .filter(categories::Column::ProjectId.eq(project_id.to_string()))
        .all(db)
        .await?;
    Ok(rows
        .into_iter()
        .map(|row| (row.id, row.parent_id))
        .collect())
}

/// `start` followed by its ancestors, stopping on a repeated id.
fn ancestors<'a>(
    tree: &'a HashMap<String, Option<String>>,
    start: &'a str,
) -> impl Iterator<Item = &'a str> {
    let mut seen = HashSet::new();
    let mut next = Some(start);
    std::iter::from_fn(move || {
        let current = next?;
        if !seen.insert(current) {
            return None;
        }
        next = tree.get(current).and_then(|parent| parent.as_deref());
        Some(current)
    })
}

/// `root` and every category below it.
fn subtree(tree: &HashMap<String, Option<String>>, root: &str) -> Vec<String> {
    let mut out = vec![root.to_string()];
    let mut cursor = 0;
    while cursor < out.len() {
        let current = out[cursor].clone();
        for (id, parent) in tree {
            if parent.as_deref() == Some(current.as_str()) && !out.contains(id) {
                out.push(id.clone());
            }
        }
        cursor += 1;
    }
    out
}
