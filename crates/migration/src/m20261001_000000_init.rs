//! Initial schema for Tesoro:
//!
//! - `users`: people that can be members of projects
//! - `currencies`: global ISO 4217 currencies
//! - `projects`: shared financial workspaces
//! - `project_members`: owners and users of a project
//! - `user_projects`: the projects set of each user
//! - `project_currencies`: ordered currency selection of a project
//! - `categories`: income/expense category tree of a project

use sea_orm_migration::prelude::*;

#[derive(DeriveMigrationName)]
pub struct Migration;

#[derive(Iden)]
enum Users {
    Table,
    Username,
    DisplayName,
}

#[derive(Iden)]
pub(crate) enum Currencies {
    Table,
    Id,
    Code,
    Name,
    Symbol,
}

#[derive(Iden)]
enum Projects {
    Table,
    Id,
    Name,
    MainCurrencyId,
    CreatedAt,
    CreatedBy,
    ModifiedBy,
}

#[derive(Iden)]
enum ProjectMembers {
    Table,
    ProjectId,
    UserId,
    Role,
}

#[derive(Iden)]
enum UserProjects {
    Table,
    UserId,
    ProjectId,
}

#[derive(Iden)]
enum ProjectCurrencies {
    Table,
    ProjectId,
    CurrencyId,
    Position,
}

#[derive(Iden)]
enum Categories {
    Table,
    Id,
    ProjectId,
    Name,
    NameNorm,
    CategoryType,
    ParentId,
}

#[async_trait::async_trait]
impl MigrationTrait for Migration {
    async fn up(&self, manager: &SchemaManager) -> Result<(), DbErr> {
        // users
        manager
            .create_table(
                Table::create()
                    .table(Users::Table)
                    .if_not_exists()
                    .col(
                        ColumnDef::new(Users::Username)
                            .string()
                            .not_null()
                            .primary_key(),
                    )
                    .col(ColumnDef::new(Users::DisplayName).string())
                    .to_owned(),
            )
            .await?;

        // currencies
        manager
            .create_table(
                Table::create()
                    .table(Currencies::Table)
                    .if_not_exists()
                    .col(
                        ColumnDef::new(Currencies::Id)
                            .string()
                            .not_null()
                            .primary_key(),
                    )
                    .col(
                        ColumnDef::new(Currencies::Code)
                            .string()
                            .not_null()
                            .unique_key(),
                    )
                    .col(ColumnDef::new(Currencies::Name).string().not_null())
                    .col(ColumnDef::new(Currencies::Symbol).string().not_null())
                    .to_owned(),
            )
            .await?;

        // projects; creator columns carry no foreign key, a project may
        // outlive the link to its creator
        manager
            .create_table(
                Table::create()
                    .table(Projects::Table)
                    .if_not_exists()
                    .col(
                        ColumnDef::new(Projects::Id)
                            .string()
                            .not_null()
                            .primary_key(),
                    )
                    .col(ColumnDef::new(Projects::Name).string().not_null())
                    .col(ColumnDef::new(Projects::MainCurrencyId).string())
                    .col(ColumnDef::new(Projects::CreatedAt).timestamp().not_null())
                    .col(ColumnDef::new(Projects::CreatedBy).string().not_null())
                    .col(ColumnDef::new(Projects::ModifiedBy).string().not_null())
                    .foreign_key(
                        ForeignKey::create()
                            .name("fk-projects-main_currency_id")
                            .from(Projects::Table, Projects::MainCurrencyId)
                            .to(Currencies::Table, Currencies::Id)
                            .on_delete(ForeignKeyAction::SetNull),
                    )
                    .to_owned(),
            )
            .await?;

        // project members
        manager
            .create_table(
                Table::create()
                    .table(ProjectMembers::Table)
                    .if_not_exists()
                    .col(
                        ColumnDef::new(ProjectMembers::ProjectId)
                            .string()
                            .not_null(),
                    )
                    .col(ColumnDef::new(ProjectMembers::UserId).string().not_null())
                    .col(ColumnDef::new(ProjectMembers::Role).string().not_null())
                    .primary_key(
                        Index::create()
                            .col(ProjectMembers::ProjectId)
                            .col(ProjectMembers::UserId),
                    )
                    .foreign_key(
                        ForeignKey::create()
                            .name("fk-project_members-project_id")
                            .from(ProjectMembers::Table, ProjectMembers::ProjectId)
                            .to(Projects::Table, Projects::Id)
                            .on_delete(ForeignKeyAction::Cascade),
                    )
                    .to_owned(),
            )
            .await?;

        manager
            .create_index(
                Index::create()
                    .name("idx-project_members-user_id")
                    .table(ProjectMembers::Table)
                    .col(ProjectMembers::UserId)
                    .to_owned(),
            )
            .await?;

        // user projects
        manager
            .create_table(
                Table::create()
                    .table(UserProjects::Table)
                    .if_not_exists()
                    .col(ColumnDef::new(UserProjects::UserId).string().not_null())
                    .col(ColumnDef::new(UserProjects::ProjectId).string().not_null())
                    .primary_key(
                        Index::create()
                            .col(UserProjects::UserId)
                            .col(UserProjects::ProjectId),
                    )
                    .foreign_key(
                        ForeignKey::create()
                            .name("fk-user_projects-user_id")
                            .from(UserProjects::Table, UserProjects::UserId)
                            .to(Users::Table, Users::Username)
                            .on_delete(ForeignKeyAction::Cascade),
                    )
                    .foreign_key(
                        ForeignKey::create()
                            .name("fk-user_projects-project_id")
                            .from(UserProjects::Table, UserProjects::ProjectId)
                            .to(Projects::Table, Projects::Id)
                            .on_delete(ForeignKeyAction::Cascade),
                    )
                    .to_owned(),
            )
            .await?;

        // project currencies
        manager
            .create_table(
                Table::create()
                    .table(ProjectCurrencies::Table)
                    .if_not_exists()
                    .col(
                        ColumnDef::new(ProjectCurrencies::ProjectId)
                            .string()
                            .not_null(),
                    )
                    .col(
                        ColumnDef::new(ProjectCurrencies::CurrencyId)
                            .string()
                            .not_null(),
                    )
                    .col(
                        ColumnDef::new(ProjectCurrencies::Position)
                            .integer()
                            .not_null(),
                    )
                    .primary_key(
                        Index::create()
                            .col(ProjectCurrencies::ProjectId)
                            .col(ProjectCurrencies::CurrencyId),
                    )
                    .foreign_key(
                        ForeignKey::create()
                            .name("fk-project_currencies-project_id")
                            .from(ProjectCurrencies::Table, ProjectCurrencies::ProjectId)
                            .to(Projects::Table, Projects::Id)
                            .on_delete(ForeignKeyAction::Cascade),
                    )
                    .foreign_key(
                        ForeignKey::create()
                            .name("fk-project_currencies-currency_id")
                            .from(ProjectCurrencies::Table, ProjectCurrencies::CurrencyId)
                            .to(Currencies::Table, Currencies::Id)
                            .on_delete(ForeignKeyAction::Cascade),
                    )
                    .to_owned(),
            )
            .await?;

        // categories
        manager
            .create_table(
                Table::create()
                    .table(Categories::Table)
                    .if_not_exists()
                    .col(
                        ColumnDef::new(Categories::Id)
                            .string()
                            .not_null()
                            .primary_key(),
                    )
                    .col(ColumnDef::new(Categories::ProjectId).string().not_null())
                    .col(ColumnDef::new(Categories::Name).string().not_null())
                    .col(ColumnDef::new(Categories::NameNorm).string().not_null())
                    .col(
                        ColumnDef::new(Categories::CategoryType)
                            .string()
                            .not_null(),
                    )
                    .col(ColumnDef::new(Categories::ParentId).string())
                    .foreign_key(
                        ForeignKey::create()
                            .name("fk-categories-project_id")
                            .from(Categories::Table, Categories::ProjectId)
                            .to(Projects::Table, Projects::Id)
                            .on_delete(ForeignKeyAction::Cascade),
                    )
                    .foreign_key(
                        ForeignKey::create()
                            .name("fk-categories-parent_id")
                            .from(Categories::Table, Categories::ParentId)
                            .to(Categories::Table, Categories::Id)
                            .on_delete(ForeignKeyAction::Cascade),
                    )
                    .to_owned(),
            )
            .await?;

        manager
            .create_index(
                Index::create()
                    .name("idx-categories-project_id-parent_id")
                    .table(Categories::Table)
                    .col(Categories::ProjectId)
                    .col(Categories::ParentId)
                    .to_owned(),
            )
            .await?;

        Ok(())
    }

    async fn down(&self, manager: &SchemaManager) -> Result<(), DbErr> {
        manager
            .drop_table(Table::drop().table(Categories::Table).to_owned())
            .await?;
        manager
            .drop_table(Table::drop().table(ProjectCurrencies::Table).to_owned())
            .await?;
        manager
            .drop_table(Table::drop().table(UserProjects::Table).to_owned())
            .await?;
        manager
            .drop_table(Table::drop().table(ProjectMembers::Table).to_owned())
            .await?;
        manager
            .drop_table(Table::drop().table(Projects::Table).to_owned())
            .await?;
        manager
            .drop_table(Table::drop().table(Currencies::Table).to_owned())
            .await?;
        manager
            .drop_table(Table::drop().table(Users::Table).to_owned())
            .await?;
        Ok(())
    }
}
