//! Currencies a project can book amounts in.
//!
//! Currencies are global: a project only keeps an ordered selection of them
//! plus an optional main currency.

use sea_orm::{ActiveValue, entity::prelude::*};

use crate::project::Referenced;

/// ISO 4217 currency, e.g. `EUR` / `Euro` / `€`.
#[derive(Clone, Debug, PartialEq, Eq)]
pub struct Currency {
    pub id: String,
    pub code: String,
    pub name: String,
    pub symbol: String,
}

impl Referenced for Currency {
    fn ref_id(&self) -> &str {
        &self.id
    }
}

impl core::fmt::Display for Currency {
    fn fmt(&self, f: &mut core::fmt::Formatter<'_>) -> core::fmt::Result {
        f.write_str(&self.code)
    }
}

impl From<Model> for Currency {
    fn from(value: Model) -> Self {
        Self {
            id: value.id,
            code: value.code,
            name: value.name,
            symbol: value.symbol,
        }
    }
}

#[derive(Clone, Debug, PartialEq, DeriveEntityModel, Eq)]
#[sea_orm(table_name = "currencies")]
pub struct Model {
    #[sea_orm(primary_key, auto_increment = false)]
    pub id: String,
    #[sea_orm(unique)]
    pub code: String,
    pub name: String,
    pub symbol: String,
}

#[derive(Copy, Clone, Debug, EnumIter, DeriveRelation)]
pub enum Relation {}

impl ActiveModelBehavior for ActiveModel {}

impl From<&Currency> for ActiveModel {
    fn from(value: &Currency) -> Self {
        Self {
            id: ActiveValue::Set(value.id.clone()),
            code: ActiveValue::Set(value.code.clone()),
            name: ActiveValue::Set(value.name.clone()),
            symbol: ActiveValue::Set(value.symbol.clone()),
        }
    }
}
