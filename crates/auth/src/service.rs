//! Auth-Service fuer Fabula
//!
//! Registrierung, Login und Einsicht ins Login-Protokoll. Der Service haelt
//! keinen eigenen Zustand; Benutzer und Protokoll liegen hinter den
//! Repository-Traits aus `fabula_db`.

use std::sync::Arc;

use chrono::{DateTime, Utc};

use fabula_core::{Rolle, UserId};
use fabula_db::{
    models::{LoginLogRecord, NeuerBenutzer, NeuerLoginLog},
    repository::{LoginLogRepository, UserRepository},
};

use crate::{
    error::{AuthError, AuthResult},
    konfig::AuthKonfig,
    password::PasswortHasher,
    token::TokenDienst,
};

const DUMMY_PASSWORT: &str = "fabula-kein-benutzer";

/// Ergebnis einer erfolgreichen Anmeldung
#[derive(Debug, Clone)]
pub struct Anmeldung {
    pub token: String,
    pub rolle: Rolle,
    pub user_id: UserId,
    pub laeuft_ab_am: DateTime<Utc>,
}

/// Auth-Service – zentraler Einstiegspunkt fuer Registrierung und Login
pub struct AuthService<U: UserRepository, L: LoginLogRepository> {
    user_repo: Arc<U>,
    log_repo: Arc<L>,
    hasher: PasswortHasher,
    /// Wird bei unbekannter E-Mail geprueft, damit beide Fehlerpfade gleich lange dauern
    dummy_hash: String,
    tokens: Arc<TokenDienst>,
    konfig: AuthKonfig,
}

impl<U: UserRepository, L: LoginLogRepository> AuthService<U, L> {
    /// Erstellt einen neuen AuthService
    ///
    /// Schlaegt fehl wenn die Argon2-Parameter aus `konfig` ungueltig sind.
    pub fn neu(
        user_repo: Arc<U>,
        log_repo: Arc<L>,
        tokens: Arc<TokenDienst>,
        konfig: AuthKonfig,
    ) -> AuthResult<Self> {
        let hasher = PasswortHasher::neu(&konfig.hashing)?;
        let dummy_hash = hasher.hashen(DUMMY_PASSWORT)?;
        Ok(Self {
            user_repo,
            log_repo,
            hasher,
            dummy_hash,
            tokens,
            konfig,
        })
    }

    /// Registriert einen neuen Benutzer mit der Standardrolle
    pub async fn registrieren(&self, email: &str, passwort: &str) -> AuthResult<()> {
        let email = eingabe_pruefen(email, passwort)?;

        if self.user_repo.get_by_email(&email).await?.is_some() {
            return Err(AuthError::BereitsVorhanden);
        }

        let passwort_hash = self.hash_im_hintergrund(passwort).await?;
        let rolle = Rolle::standard();

        let benutzer = self
            .user_repo
            .create(NeuerBenutzer {
                email: &email,
                password_hash: &passwort_hash,
                rolle: &rolle,
            })
            .await
            .map_err(|e| {
                // Zwei gleichzeitige Registrierungen: der Unique-Index entscheidet
                if e.ist_eindeutigkeit() {
                    AuthError::BereitsVorhanden
                } else {
                    AuthError::Datenbank(e)
                }
            })?;

        tracing::info!(
            user_id = %benutzer.id,
            email = %benutzer.email,
            "Neuer Benutzer registriert"
        );

        Ok(())
    }

    /// Meldet einen Benutzer an und stellt ein Token aus
    ///
    /// Unbekannte E-Mail und falsches Passwort sind fuer den Aufrufer nicht
    /// unterscheidbar. `herkunft` landet im Login-Protokoll.
    pub async fn anmelden(
        &self,
        email: &str,
        passwort: &str,
        herkunft: Option<&str>,
    ) -> AuthResult<Anmeldung> {
        let email = eingabe_pruefen(email, passwort)?;

        let Some(benutzer) = self.user_repo.get_by_email(&email).await? else {
            tracing::debug!(email = %email, "Login fuer unbekannte E-Mail");
            let _ = self
                .verifizieren_im_hintergrund(passwort, &self.dummy_hash)
                .await;
            return Err(AuthError::UngueltigeAnmeldedaten);
        };

        let korrekt = self
            .verifizieren_im_hintergrund(passwort, &benutzer.password_hash)
            .await?;
        if !korrekt {
            tracing::warn!(user_id = %benutzer.id, "Fehlgeschlagener Login-Versuch");
            return Err(AuthError::UngueltigeAnmeldedaten);
        }

        let ausgestellt =
            self.tokens
                .ausstellen(benutzer.id, &benutzer.rolle, self.konfig.token_gueltigkeit())?;

        // Protokoll ist best effort, der Login gilt trotzdem
        if let Err(e) = self
            .log_repo
            .log_login(NeuerLoginLog {
                user_id: benutzer.id,
                email: &benutzer.email,
                ip_adresse: herkunft,
            })
            .await
        {
            tracing::warn!(
                user_id = %benutzer.id,
                fehler = %e,
                "Login-Protokoll konnte nicht geschrieben werden"
            );
        }

        tracing::info!(
            user_id = %benutzer.id,
            rolle = %benutzer.rolle,
            "Benutzer angemeldet"
        );

        Ok(Anmeldung {
            token: ausgestellt.token,
            rolle: benutzer.rolle,
            user_id: benutzer.id,
            laeuft_ab_am: ausgestellt.laeuft_ab_am,
        })
    }

    /// Die neuesten Eintraege des Login-Protokolls, neueste zuerst
    pub async fn login_logs_auflisten(&self) -> AuthResult<Vec<LoginLogRecord>> {
        Ok(self.log_repo.list_recent(self.konfig.login_log_limit).await?)
    }

    async fn hash_im_hintergrund(&self, passwort: &str) -> AuthResult<String> {
        let hasher = self.hasher.clone();
        let passwort = passwort.to_string();
        tokio::task::spawn_blocking(move || hasher.hashen(&passwort))
            .await
            .map_err(|e| AuthError::intern(format!("Hashing-Task abgebrochen: {e}")))?
    }

    async fn verifizieren_im_hintergrund(&self, passwort: &str, hash: &str) -> AuthResult<bool> {
        let hasher = self.hasher.clone();
        let passwort = passwort.to_string();
        let hash = hash.to_string();
        tokio::task::spawn_blocking(move || hasher.verifizieren(&passwort, &hash))
            .await
            .map_err(|e| AuthError::intern(format!("Verifikations-Task abgebrochen: {e}")))?
    }
}

/// Normalisiert die E-Mail und prueft die Pflichtfelder
fn eingabe_pruefen(email: &str, passwort: &str) -> AuthResult<String> {
    let email = email_normalisieren(email);
    if email.is_empty() || !email.contains('@') {
        return Err(AuthError::validierung("Gueltige E-Mail-Adresse erforderlich"));
    }
    if passwort.is_empty() {
        return Err(AuthError::validierung("Passwort darf nicht leer sein"));
    }
    Ok(email)
}

/// E-Mail-Adressen werden getrimmt und kleingeschrieben gespeichert
pub fn email_normalisieren(email: &str) -> String {
    email.trim().to_lowercase()
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::sync::Mutex;
    use std::time::Duration;

    use fabula_db::{models::BenutzerRecord, DbError, DbResult};
    use uuid::Uuid;

    use crate::{error::FehlerKategorie, konfig::HashParameter, token::VerifikationsFehler};

    // Minimaler In-Memory UserRepository fuer Tests
    #[derive(Default)]
    struct TestUserRepo {
        benutzer: Mutex<Vec<BenutzerRecord>>,
    }

    impl UserRepository for TestUserRepo {
        async fn create(&self, data: NeuerBenutzer<'_>) -> DbResult<BenutzerRecord> {
            let mut benutzer = self.benutzer.lock().unwrap();
            if benutzer.iter().any(|u| u.email == data.email) {
                return Err(DbError::Eindeutigkeit(data.email.to_string()));
            }
            let record = BenutzerRecord {
                id: UserId::new(),
                email: data.email.to_string(),
                password_hash: data.password_hash.to_string(),
                rolle: data.rolle.clone(),
                created_at: Utc::now(),
            };
            benutzer.push(record.clone());
            Ok(record)
        }

        async fn get_by_email(&self, email: &str) -> DbResult<Option<BenutzerRecord>> {
            Ok(self.benutzer.lock().unwrap().iter().find(|u| u.email == email).cloned())
        }

        async fn get_by_id(&self, id: UserId) -> DbResult<Option<BenutzerRecord>> {
            Ok(self.benutzer.lock().unwrap().iter().find(|u| u.id == id).cloned())
        }
    }

    #[derive(Default)]
    struct TestLogRepo {
        eintraege: Mutex<Vec<LoginLogRecord>>,
        kaputt: bool,
    }

    impl LoginLogRepository for TestLogRepo {
        async fn log_login(&self, data: NeuerLoginLog<'_>) -> DbResult<LoginLogRecord> {
            if self.kaputt {
                return Err(DbError::intern("Protokoll nicht erreichbar"));
            }
            let record = LoginLogRecord {
                id: Uuid::new_v4(),
                user_id: data.user_id,
                email: data.email.to_string(),
                ip_adresse: data.ip_adresse.map(str::to_string),
                zeitpunkt: Utc::now(),
            };
            self.eintraege.lock().unwrap().push(record.clone());
            Ok(record)
        }

        async fn list_recent(&self, limit: u32) -> DbResult<Vec<LoginLogRecord>> {
            let mut eintraege = self.eintraege.lock().unwrap().clone();
            eintraege.reverse();
            eintraege.truncate(limit as usize);
            Ok(eintraege)
        }
    }

    const SCHLUESSEL: &[u8] = b"service-test-schluessel-mit-mindestens-32-bytes";

    fn test_konfig() -> AuthKonfig {
        AuthKonfig {
            hashing: HashParameter {
                speicher_kib: 1024,
                iterationen: 1,
                parallelitaet: 1,
            },
            ..Default::default()
        }
    }

    struct Aufbau {
        service: AuthService<TestUserRepo, TestLogRepo>,
        users: Arc<TestUserRepo>,
        logs: Arc<TestLogRepo>,
        tokens: Arc<TokenDienst>,
    }

    fn aufbau_mit(logs: TestLogRepo, konfig: AuthKonfig) -> Aufbau {
        let users = Arc::new(TestUserRepo::default());
        let logs = Arc::new(logs);
        let tokens = Arc::new(TokenDienst::neu(SCHLUESSEL).unwrap());
        let service =
            AuthService::neu(Arc::clone(&users), Arc::clone(&logs), Arc::clone(&tokens), konfig)
                .unwrap();
        Aufbau {
            service,
            users,
            logs,
            tokens,
        }
    }

    fn aufbau() -> Aufbau {
        aufbau_mit(TestLogRepo::default(), test_konfig())
    }

    #[tokio::test]
    async fn registrieren_und_anmelden() {
        let a = aufbau();

        a.service
            .registrieren("alice@example.com", "pw123")
            .await
            .expect("Registrierung fehlgeschlagen");

        let anmeldung = a
            .service
            .anmelden("alice@example.com", "pw123", Some("10.0.0.1"))
            .await
            .expect("Anmeldung fehlgeschlagen");

        assert_eq!(anmeldung.rolle.als_str(), "user");
        assert!(!anmeldung.token.is_empty());

        let record = a
            .users
            .get_by_email("alice@example.com")
            .await
            .unwrap()
            .unwrap();
        let identitaet = a.tokens.pruefen(&anmeldung.token).unwrap();
        assert_eq!(identitaet.user_id, record.id);
        assert_eq!(anmeldung.user_id, record.id);

        let laufzeit = anmeldung.laeuft_ab_am - Utc::now();
        assert!(laufzeit > chrono::Duration::hours(23));
        assert!(laufzeit <= chrono::Duration::hours(24));
    }

    #[tokio::test]
    async fn passwort_wird_nicht_im_klartext_gespeichert() {
        let a = aufbau();
        a.service.registrieren("bob@example.com", "geheim").await.unwrap();

        let record = a.users.get_by_email("bob@example.com").await.unwrap().unwrap();
        assert_ne!(record.password_hash, "geheim");
        assert!(record.password_hash.starts_with("$argon2id$"));
        assert_eq!(record.rolle, Rolle::standard());
    }

    #[tokio::test]
    async fn doppelte_registrierung_ist_konflikt() {
        let a = aufbau();
        a.service.registrieren("alice@example.com", "pw123").await.unwrap();

        for passwort in ["pw123", "anderes"] {
            let ergebnis = a.service.registrieren("alice@example.com", passwort).await;
            assert!(matches!(ergebnis, Err(AuthError::BereitsVorhanden)));
        }
    }

    #[tokio::test]
    async fn email_gross_klein_schreibung_egal() {
        let a = aufbau();
        a.service.registrieren("  Alice@Example.COM ", "pw123").await.unwrap();

        let ergebnis = a.service.registrieren("alice@example.com", "pw123").await;
        assert!(matches!(ergebnis, Err(AuthError::BereitsVorhanden)));

        a.service
            .anmelden("ALICE@example.com", "pw123", None)
            .await
            .expect("Anmeldung mit anderer Schreibweise muss klappen");
    }

    #[tokio::test]
    async fn unique_verletzung_wird_konflikt() {
        let a = aufbau();
        // Datensatz am Service vorbei anlegen, wie bei einer parallelen Registrierung
        a.users
            .create(NeuerBenutzer {
                email: "race@example.com",
                password_hash: "$argon2id$dummy",
                rolle: &Rolle::standard(),
            })
            .await
            .unwrap();

        let ergebnis = a.service.registrieren("race@example.com", "pw").await;
        assert_eq!(ergebnis.unwrap_err().kategorie(), FehlerKategorie::Konflikt);
    }

    #[tokio::test]
    async fn ungueltige_eingaben() {
        let a = aufbau();
        for (email, passwort) in [("", "pw"), ("   ", "pw"), ("keine-at", "pw"), ("a@b.de", "")] {
            let ergebnis = a.service.registrieren(email, passwort).await;
            assert!(
                matches!(ergebnis, Err(AuthError::Validierung(_))),
                "{email:?}/{passwort:?}"
            );
            let ergebnis = a.service.anmelden(email, passwort, None).await;
            assert!(matches!(ergebnis, Err(AuthError::Validierung(_))));
        }
        assert!(a.users.benutzer.lock().unwrap().is_empty());
    }

    #[tokio::test]
    async fn falsches_passwort_und_unbekannte_email_gleich() {
        let a = aufbau();
        a.service.registrieren("alice@example.com", "pw123").await.unwrap();

        let falsch = a
            .service
            .anmelden("alice@example.com", "falsch", None)
            .await
            .unwrap_err();
        let unbekannt = a
            .service
            .anmelden("bob@example.com", "pw123", None)
            .await
            .unwrap_err();

        assert!(matches!(falsch, AuthError::UngueltigeAnmeldedaten));
        assert!(matches!(unbekannt, AuthError::UngueltigeAnmeldedaten));
        assert_eq!(falsch.to_string(), unbekannt.to_string());
        assert!(a.logs.eintraege.lock().unwrap().is_empty());
    }

    #[test]
    fn dummy_hash_nutzt_konfigurierte_parameter() {
        let a = aufbau();
        assert!(a.service.dummy_hash.starts_with("$argon2id$v=19$m=1024,t=1,p=1$"));
        assert!(!a.service.hasher.verifizieren("pw123", &a.service.dummy_hash).unwrap());
    }

    #[tokio::test]
    async fn unbekannte_email_kostet_ein_hashing() {
        let a = aufbau_mit(
            TestLogRepo::default(),
            AuthKonfig {
                hashing: HashParameter {
                    speicher_kib: 8 * 1024,
                    iterationen: 2,
                    parallelitaet: 1,
                },
                ..Default::default()
            },
        );
        a.service.registrieren("alice@example.com", "pw123").await.unwrap();

        let mut falsch = Duration::ZERO;
        let mut unbekannt = Duration::ZERO;
        for _ in 0..3 {
            let start = std::time::Instant::now();
            let _ = a.service.anmelden("alice@example.com", "falsch", None).await;
            falsch += start.elapsed();

            let start = std::time::Instant::now();
            let _ = a.service.anmelden("bob@example.com", "falsch", None).await;
            unbekannt += start.elapsed();
        }

        // Ohne Hashing waere der unbekannte Pfad um Groessenordnungen schneller
        assert!(
            unbekannt * 4 >= falsch,
            "unbekannt={unbekannt:?} falsch={falsch:?}"
        );
    }

    #[tokio::test]
    async fn anmeldung_wird_protokolliert() {
        let a = aufbau();
        a.service.registrieren("alice@example.com", "pw123").await.unwrap();
        a.service
            .anmelden("alice@example.com", "pw123", Some("203.0.113.7"))
            .await
            .unwrap();

        let logs = a.service.login_logs_auflisten().await.unwrap();
        assert_eq!(logs.len(), 1);
        assert_eq!(logs[0].email, "alice@example.com");
        assert_eq!(logs[0].ip_adresse.as_deref(), Some("203.0.113.7"));
    }

    #[tokio::test]
    async fn login_trotz_kaputtem_protokoll() {
        let a = aufbau_mit(
            TestLogRepo {
                kaputt: true,
                ..Default::default()
            },
            test_konfig(),
        );
        a.service.registrieren("alice@example.com", "pw123").await.unwrap();

        let anmeldung = a.service.anmelden("alice@example.com", "pw123", None).await;
        assert!(anmeldung.is_ok());
    }

    #[tokio::test]
    async fn login_logs_begrenzt_und_sortiert() {
        let a = aufbau_mit(
            TestLogRepo::default(),
            AuthKonfig {
                login_log_limit: 2,
                ..test_konfig()
            },
        );
        a.service.registrieren("alice@example.com", "pw123").await.unwrap();
        for _ in 0..3 {
            a.service.anmelden("alice@example.com", "pw123", None).await.unwrap();
        }

        let logs = a.service.login_logs_auflisten().await.unwrap();
        assert_eq!(logs.len(), 2);
        assert!(logs.windows(2).all(|w| w[0].zeitpunkt >= w[1].zeitpunkt));
    }

    #[tokio::test]
    async fn token_gueltigkeit_aus_konfig() {
        let a = aufbau_mit(
            TestLogRepo::default(),
            AuthKonfig {
                token_gueltigkeit_stunden: 1,
                ..test_konfig()
            },
        );
        a.service.registrieren("alice@example.com", "pw123").await.unwrap();
        let anmeldung = a.service.anmelden("alice@example.com", "pw123", None).await.unwrap();

        let spaeter = Utc::now() + chrono::Duration::from_std(Duration::from_secs(7200)).unwrap();
        assert_eq!(
            a.tokens.pruefen_zum(&anmeldung.token, spaeter),
            Err(VerifikationsFehler::Abgelaufen)
        );
    }

    #[tokio::test]
    async fn admin_rolle_landet_im_token() {
        let a = aufbau();
        let hash = a.service.hash_im_hintergrund("adminpw").await.unwrap();
        a.users
            .create(NeuerBenutzer {
                email: "admin@example.com",
                password_hash: &hash,
                rolle: &Rolle::admin(),
            })
            .await
            .unwrap();

        let anmeldung = a.service.anmelden("admin@example.com", "adminpw", None).await.unwrap();
        assert!(anmeldung.rolle.ist_admin());
        assert!(a.tokens.pruefen(&anmeldung.token).unwrap().ist_admin());
    }
}
