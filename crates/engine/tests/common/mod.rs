#![allow(dead_code)]

use sea_orm::{ConnectionTrait, Database, DatabaseConnection, Statement};

use engine::Engine;
use migration::MigratorTrait;

pub async fn engine_with_db() -> (Engine, DatabaseConnection) {
    let db = Database::connect("sqlite::memory:").await.unwrap();
    migration::Migrator::up(&db, None).await.unwrap();
    for username in ["alice", "bob", "carol"] {
        insert_user(&db, username).await;
    }
    let engine = Engine::builder()
        .database(db.clone())
        .build()
        .await
        .unwrap();
    (engine, db)
}

pub async fn insert_user(db: &DatabaseConnection, username: &str) {
    let backend = db.get_database_backend();
    db.execute(Statement::from_sql_and_values(
        backend,
        "INSERT INTO users (username) VALUES (?)",
        vec![username.into()],
    ))
    .await
    .unwrap();
}

/// Add `username` to the project's users without making it an owner.
pub async fn add_member(db: &DatabaseConnection, project_id: &str, username: &str) {
    let backend = db.get_database_backend();
    db.execute(Statement::from_sql_and_values(
        backend,
        "INSERT INTO project_members (project_id, user_id, role) VALUES (?, ?, 'member')",
        vec![project_id.into(), username.into()],
    ))
    .await
    .unwrap();
}

pub async fn count(db: &DatabaseConnection, sql: &str, values: Vec<sea_orm::Value>) -> i64 {
    let backend = db.get_database_backend();
    let row = db
        .query_one(Statement::from_sql_and_values(backend, sql, values))
        .await
        .unwrap()
        .unwrap();
    row.try_get::<i64>("", "n").unwrap()
}

pub async fn currency_id(engine: &Engine, code: &str) -> String {
    engine
        .currencies()
        .list()
        .await
        .unwrap()
        .into_iter()
        .find(|currency| currency.code == code)
        .map(|currency| currency.id)
        .unwrap()
}
