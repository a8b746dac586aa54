mod common;

use engine::{EngineError, Ref};
use uuid::Uuid;

use common::{add_member, currency_id, engine_with_db};

#[tokio::test]
async fn default_currencies_are_listed_by_code() {
    let (engine, _db) = engine_with_db().await;

    let codes: Vec<_> = engine
        .currencies()
        .list()
        .await
        .unwrap()
        .into_iter()
        .map(|currency| currency.code)
        .collect();

    assert_eq!(codes, vec!["CHF", "EUR", "GBP", "JPY", "USD"]);
}

#[tokio::test]
async fn create_currency_normalizes_and_rejects_duplicates() {
    let (engine, _db) = engine_with_db().await;
    let currencies = engine.currencies();

    let sek = currencies.create(" sek ", "Swedish Krona", "kr").await.unwrap();
    assert_eq!(sek.code, "SEK");
    assert_eq!(currencies.get(&sek.id).await.unwrap(), sek);

    assert_eq!(
        currencies.create("SEK", "Krona", "kr").await.unwrap_err(),
        EngineError::ExistingKey("SEK".to_string())
    );
    assert!(matches!(
        currencies.create("SEKK", "Krona", "kr").await.unwrap_err(),
        EngineError::InvalidCurrency(_)
    ));
    assert_eq!(
        currencies
            .get(&Uuid::new_v4().to_string())
            .await
            .unwrap_err(),
        EngineError::KeyNotFound("currency not exists".to_string())
    );
}

#[tokio::test]
async fn update_currencies_keeps_first_occurrence_order() {
    let (engine, _db) = engine_with_db().await;
    let project = engine.create_project("Household", "alice").await.unwrap();
    let eur = currency_id(&engine, "EUR").await;
    let usd = currency_id(&engine, "USD").await;
    let chf = currency_id(&engine, "CHF").await;

    let currencies = engine
        .update_currencies(
            &project.id,
            "alice",
            &[usd.clone(), eur.clone(), usd.clone(), chf.clone()],
        )
        .await
        .unwrap();

    let codes: Vec<_> = currencies.iter().map(|c| c.code.as_str()).collect();
    assert_eq!(codes, vec!["USD", "EUR", "CHF"]);

    let currencies = engine
        .update_currencies(&project.id, "alice", &[chf.clone()])
        .await
        .unwrap();
    assert_eq!(currencies.len(), 1);
    assert_eq!(currencies[0].id, chf);
}

#[tokio::test]
async fn update_currencies_validates_every_id_before_writing() {
    let (engine, _db) = engine_with_db().await;
    let project = engine.create_project("Household", "alice").await.unwrap();
    let eur = currency_id(&engine, "EUR").await;
    engine
        .update_currencies(&project.id, "alice", &[eur.clone()])
        .await
        .unwrap();

    let err = engine
        .update_currencies(&project.id, "alice", &[eur.clone(), "euro".to_string()])
        .await
        .unwrap_err();
    assert_eq!(
        err,
        EngineError::InvalidId("document id is invalid: euro".to_string())
    );

    let missing = Uuid::new_v4().to_string();
    let err = engine
        .update_currencies(&project.id, "alice", &[missing])
        .await
        .unwrap_err();
    assert_eq!(err, EngineError::KeyNotFound("currency not exists".to_string()));

    let project = engine.project(&project.id, "alice").await.unwrap();
    assert_eq!(project.currencies.len(), 1);
    assert_eq!(project.currencies[0].id(), eur);
}

#[tokio::test]
async fn update_currencies_requires_membership() {
    let (engine, db) = engine_with_db().await;
    let project = engine.create_project("Household", "alice").await.unwrap();
    let eur = currency_id(&engine, "EUR").await;

    let err = engine
        .update_currencies(&project.id, "bob", &[eur.clone()])
        .await
        .unwrap_err();
    assert_eq!(err, EngineError::KeyNotFound("project not exists".to_string()));

    add_member(&db, &project.id, "bob").await;
    engine
        .update_currencies(&project.id, "bob", &[eur])
        .await
        .unwrap();

    let project = engine.project(&project.id, "alice").await.unwrap();
    assert_eq!(project.modified_by.id(), "bob");
}

#[tokio::test]
async fn main_currency_must_belong_to_the_project() {
    let (engine, _db) = engine_with_db().await;
    let project = engine.create_project("Household", "alice").await.unwrap();
    let eur = currency_id(&engine, "EUR").await;
    let usd = currency_id(&engine, "USD").await;
    engine
        .update_currencies(&project.id, "alice", &[eur.clone(), usd.clone()])
        .await
        .unwrap();

    let gbp = currency_id(&engine, "GBP").await;
    assert!(matches!(
        engine
            .update_main_currency(&project.id, "alice", &gbp)
            .await
            .unwrap_err(),
        EngineError::InvalidCurrency(_)
    ));

    let main = engine
        .update_main_currency(&project.id, "alice", &usd)
        .await
        .unwrap();
    assert_eq!(main.code, "USD");
    let stored = engine.project(&project.id, "alice").await.unwrap();
    assert_eq!(stored.main_currency, Some(Ref::Expanded(main)));

    engine
        .update_currencies(&project.id, "alice", &[eur])
        .await
        .unwrap();
    let stored = engine.project(&project.id, "alice").await.unwrap();
    assert!(stored.main_currency.is_none());
}

#[tokio::test]
async fn currency_ids_are_accepted_in_any_spelling() {
    let (engine, _db) = engine_with_db().await;
    let project = engine.create_project("Household", "alice").await.unwrap();
    let eur = currency_id(&engine, "EUR").await;
    let usd = currency_id(&engine, "USD").await;

    let currencies = engine
        .update_currencies(
            &project.id,
            "alice",
            &[eur.to_uppercase(), usd.replace('-', ""), eur.clone()],
        )
        .await
        .unwrap();
    let ids: Vec<_> = currencies.iter().map(|c| c.id.as_str()).collect();
    assert_eq!(ids, vec![eur.as_str(), usd.as_str()]);

    let main = engine
        .update_main_currency(&project.id, "alice", &usd.to_uppercase())
        .await
        .unwrap();
    assert_eq!(main.id, usd);
}
