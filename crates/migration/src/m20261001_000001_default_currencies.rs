use sea_orm::{ConnectionTrait, Statement};
use sea_orm_migration::prelude::*;
use uuid::Uuid;

use crate::m20261001_000000_init::Currencies;

#[derive(DeriveMigrationName)]
pub struct Migration;

/// `(code, name, symbol)` available on a fresh database.
const DEFAULT_CURRENCIES: [(&str, &str, &str); 5] = [
    ("EUR", "Euro", "€"),
    ("USD", "US Dollar", "$"),
    ("GBP", "Pound Sterling", "£"),
    ("CHF", "Swiss Franc", "CHF"),
    ("JPY", "Japanese Yen", "¥"),
];

#[async_trait::async_trait]
impl MigrationTrait for Migration {
    async fn up(&self, manager: &SchemaManager) -> Result<(), DbErr> {
        let db = manager.get_connection();
        let backend = db.get_database_backend();

        for (code, name, symbol) in DEFAULT_CURRENCIES {
            let stmt = Query::insert()
                .into_table(Currencies::Table)
                .columns([
                    Currencies::Id,
                    Currencies::Code,
                    Currencies::Name,
                    Currencies::Symbol,
                ])
                .values_panic([
                    Uuid::new_v4().to_string().into(),
                    code.into(),
                    name.into(),
                    symbol.into(),
                ])
                .on_conflict(OnConflict::column(Currencies::Code).do_nothing().to_owned())
                .to_owned();

            db.execute(backend.build(&stmt)).await?;
        }

        Ok(())
    }

    async fn down(&self, manager: &SchemaManager) -> Result<(), DbErr> {
        let db = manager.get_connection();
        let backend = db.get_database_backend();

        let codes = DEFAULT_CURRENCIES
            .iter()
            .map(|(code, _, _)| format!("'{code}'"))
            .collect::<Vec<_>>()
            .join(", ");
        db.execute(Statement::from_string(
            backend,
            format!("DELETE FROM currencies WHERE code IN ({codes});"),
        ))
        .await?;

        Ok(())
    }
}
