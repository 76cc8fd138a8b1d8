//! Integration-Tests fuer LoginLogRepository (In-Memory SQLite)

use fabula_core::{Rolle, UserId};
use fabula_db::{
    models::{NeuerBenutzer, NeuerLoginLog},
    LoginLogRepository, SqliteDb, UserRepository,
};

async fn db() -> SqliteDb {
    SqliteDb::in_memory()
        .await
        .expect("In-Memory DB konnte nicht erstellt werden")
}

async fn benutzer(db: &SqliteDb, email: &str) -> UserId {
    UserRepository::create(
        db,
        NeuerBenutzer {
            email,
            password_hash: "hash",
            rolle: &Rolle::standard(),
        },
    )
    .await
    .expect("Benutzer anlegen fehlgeschlagen")
    .id
}

#[tokio::test]
async fn login_protokollieren() {
    let db = db().await;
    let user_id = benutzer(&db, "alice@example.com").await;

    let eintrag = LoginLogRepository::log_login(
        &db,
        NeuerLoginLog {
            user_id,
            email: "alice@example.com",
            ip_adresse: Some("10.0.0.1"),
        },
    )
    .await
    .unwrap();

    assert_eq!(eintrag.user_id, user_id);
    assert_eq!(eintrag.ip_adresse.as_deref(), Some("10.0.0.1"));

    let liste = LoginLogRepository::list_recent(&db, 10).await.unwrap();
    assert_eq!(liste.len(), 1);
    assert_eq!(liste[0].id, eintrag.id);
    assert_eq!(liste[0].email, "alice@example.com");
}

#[tokio::test]
async fn neueste_zuerst_und_begrenzt() {
    let db = db().await;
    let user_id = benutzer(&db, "bob@example.com").await;

    let mut ids = Vec::new();
    for _ in 0..5 {
        let eintrag = LoginLogRepository::log_login(
            &db,
            NeuerLoginLog {
                user_id,
                email: "bob@example.com",
                ip_adresse: None,
            },
        )
        .await
        .unwrap();
        ids.push(eintrag.id);
    }

    let liste = LoginLogRepository::list_recent(&db, 3).await.unwrap();
    assert_eq!(liste.len(), 3);

    for paar in liste.windows(2) {
        assert!(paar[0].zeitpunkt >= paar[1].zeitpunkt);
    }

    // Letzter Eintrag steht vorne
    assert_eq!(liste[0].id, ids[4]);
    assert_eq!(liste[2].id, ids[2]);
}

#[tokio::test]
async fn leeres_protokoll() {
    let db = db().await;
    let liste = LoginLogRepository::list_recent(&db, 50).await.unwrap();
    assert!(liste.is_empty());
}
