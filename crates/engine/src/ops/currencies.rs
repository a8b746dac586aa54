//! Currency registry and project currency selection.

use sea_orm::{ActiveValue, QueryFilter, QueryOrder, TransactionTrait, prelude::*};
use uuid::Uuid;

use crate::{
    Currency, EngineError, FindById, ResultEngine, currency, is_valid_and_exist, project,
    project_currencies,
    util::{normalize_currency_code, normalize_required_name},
};

use super::{Engine, with_tx};

/// Currency operations. Also the lookup used to validate currency ids.
#[derive(Clone, Copy)]
pub struct Currencies<'a> {
    engine: &'a Engine,
}

impl FindById for Currencies<'_> {
    type Output = Currency;

    async fn find_by_id(&self, id: &str) -> ResultEngine<Currency> {
        self.get(id).await
    }
}

impl Engine {
    pub fn currencies(&self) -> Currencies<'_> {
        Currencies { engine: self }
    }
}

impl Currencies<'_> {
    pub async fn get(&self, currency_id: &str) -> ResultEngine<Currency> {
        currency::Entity::find_by_id(currency_id.to_string())
            .one(&self.engine.database)
            .await?
            .map(Currency::from)
            .ok_or_else(|| EngineError::KeyNotFound("currency not exists".to_string()))
    }

    /// Every known currency, ordered by code.
    pub async fn list(&self) -> ResultEngine<Vec<Currency>> {
        let models = currency::Entity::find()
            .order_by_asc(currency::Column::Code)
            .all(&self.engine.database)
            .await?;
        Ok(models.into_iter().map(Currency::from).collect())
    }

    pub async fn create(&self, code: &str, name: &str, symbol: &str) -> ResultEngine<Currency> {
        let code = normalize_currency_code(code)?;
        let name = normalize_required_name(name, "currency")?;
        let symbol = symbol.trim();
        if symbol.is_empty() {
            return Err(EngineError::InvalidCurrency(
                "currency symbol must not be empty".to_string(),
            ));
        }

        let new_currency = Currency {
            id: Uuid::new_v4().to_string(),
            code,
            name,
            symbol: symbol.to_string(),
        };
        let entry: currency::ActiveModel = (&new_currency).into();
        with_tx!(self.engine, |db_tx| {
            let exists = currency::Entity::find()
                .filter(currency::Column::Code.eq(new_currency.code.clone()))
                .one(&db_tx)
                .await?
                .is_some();
            if exists {
                return Err(EngineError::ExistingKey(new_currency.code));
            }

            entry.insert(&db_tx).await?;
            Ok(new_currency)
        })
    }

    /// Replace the ordered currency set of a project.
    ///
    /// Every id is validated before anything is written. Repeated ids keep
    /// their first position. A main currency missing from the new set is
    /// cleared.
    pub async fn update_project_currencies(
        &self,
        project_id: &str,
        user_id: &str,
        currency_ids: &[String],
    ) -> ResultEngine<()> {
        self.engine
            .require_project_member(&self.engine.database, project_id, user_id)
            .await?;

        let mut selected: Vec<String> = Vec::with_capacity(currency_ids.len());
        for currency_id in currency_ids {
            let currency = is_valid_and_exist(currency_id, self).await?;
            if !selected.contains(&currency.id) {
                selected.push(currency.id);
            }
        }

        with_tx!(self.engine, |db_tx| {
            let model = self
                .engine
                .require_project_member(&db_tx, project_id, user_id)
                .await?;

            project_currencies::Entity::delete_many()
                .filter(project_currencies::Column::ProjectId.eq(project_id.to_string()))
                .exec(&db_tx)
                .await?;

            for (position, currency_id) in selected.iter().enumerate() {
                let row = project_currencies::ActiveModel {
                    project_id: ActiveValue::Set(project_id.to_string()),
                    currency_id: ActiveValue::Set(currency_id.clone()),
                    position: ActiveValue::Set(position as i32),
                };
                row.insert(&db_tx).await?;
            }

            let keep_main = model
                .main_currency_id
                .as_ref()
                .is_none_or(|main| selected.contains(main));
            let mut active: project::ActiveModel = model.into();
            if !keep_main {
                active.main_currency_id = ActiveValue::Set(None);
            }
            active.modified_by = ActiveValue::Set(user_id.to_string());
            active.update(&db_tx).await?;

            Ok::<_, EngineError>(())
        })
        .inspect(|_| tracing::info!(project_id = %project_id, "project currencies updated"))
    }

    /// Select the main currency of a project among its currencies.
    pub async fn update_project_main_currency(
        &self,
        project_id: &str,
        user_id: &str,
        currency_id: &str,
    ) -> ResultEngine<Currency> {
        self.engine
            .require_project_member(&self.engine.database, project_id, user_id)
            .await?;
        let currency = is_valid_and_exist(currency_id, self).await?;

        with_tx!(self.engine, |db_tx| {
            let model = self
                .engine
                .require_project_member(&db_tx, project_id, user_id)
                .await?;

            let in_project = project_currencies::Entity::find_by_id((
                project_id.to_string(),
                currency.id.clone(),
            ))
            .one(&db_tx)
            .await?
            .is_some();
            if !in_project {
                return Err(EngineError::InvalidCurrency(format!(
                    "{} is not one of the project currencies",
                    currency.code
                )));
            }

            let mut active: project::ActiveModel = model.into();
            active.main_currency_id = ActiveValue::Set(Some(currency.id.clone()));
            active.modified_by = ActiveValue::Set(user_id.to_string());
            active.update(&db_tx).await?;

            Ok(currency)
        })
    }
}
