//! Token-Ausstellung und -Pruefung (JWT, HS256)
//!
//! Tokens sind selbsttragend: Gueltigkeit haengt nur von Signatur,
//! Algorithmus und Ablaufzeit ab, es gibt keinen serverseitigen Zustand.
//! Die Rolle wird beim Ausstellen eingefroren und bis zum Ablauf nicht
//! gegen den aktuellen Benutzer-Datensatz abgeglichen.

use std::time::Duration;

use base64::Engine as _;
use chrono::{DateTime, Utc};
use jsonwebtoken::{
    decode, encode, errors::ErrorKind, Algorithm, DecodingKey, EncodingKey, Header, Validation,
};
use serde::{Deserialize, Serialize};
use thiserror::Error;
use uuid::Uuid;

use fabula_core::{Rolle, UserId};

use crate::error::{AuthError, AuthResult};

/// Der einzige akzeptierte Algorithmus
const ALGORITHMUS: Algorithm = Algorithm::HS256;
const ALGORITHMUS_NAME: &str = "HS256";

/// Claims im Token
///
/// `sub` ist immer die kanonische UUID-Textform, nie eine Zahl.
#[derive(Debug, Clone, Serialize, Deserialize)]
struct Claims {
    sub: String,
    role: String,
    iat: i64,
    exp: i64,
}

/// Nur das `alg`-Feld des Headers, vor der Signaturpruefung gelesen
#[derive(Deserialize)]
struct KopfRoh {
    alg: String,
}

/// Verifizierte Identitaet eines Aufrufers
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Identitaet {
    pub user_id: UserId,
    /// Rolle zum Ausstellungszeitpunkt
    pub rolle: Rolle,
}

impl Identitaet {
    pub fn ist_admin(&self) -> bool {
        self.rolle.ist_admin()
    }
}

/// Ergebnis von [`TokenDienst::ausstellen`]
#[derive(Debug, Clone)]
pub struct AusgestelltesToken {
    pub token: String,
    pub ausgestellt_am: DateTime<Utc>,
    pub laeuft_ab_am: DateTime<Utc>,
}

/// Grund fuer eine fehlgeschlagene Token-Pruefung
///
/// Nur fuer Server-Logs und Tests. Aufrufer sehen einheitlich "ungueltig".
#[derive(Debug, Clone, Copy, PartialEq, Eq, Error)]
pub enum VerifikationsFehler {
    #[error("Token fehlerhaft")]
    Fehlerhaft,
    #[error("Signatur ungueltig")]
    Signatur,
    #[error("Token abgelaufen")]
    Abgelaufen,
    #[error("Algorithmus nicht unterstuetzt")]
    Algorithmus,
}

impl VerifikationsFehler {
    /// Kurzer Bezeichner fuer Metrik-Labels
    pub fn als_str(&self) -> &'static str {
        match self {
            Self::Fehlerhaft => "fehlerhaft",
            Self::Signatur => "signatur",
            Self::Abgelaufen => "abgelaufen",
            Self::Algorithmus => "algorithmus",
        }
    }
}

/// Stellt Tokens aus und prueft sie mit einem symmetrischen Schluessel
pub struct TokenDienst {
    encoding_key: EncodingKey,
    decoding_key: DecodingKey,
    validation: Validation,
}

impl TokenDienst {
    /// Erstellt den Dienst mit dem prozessweiten Signaturschluessel
    pub fn neu(schluessel: &[u8]) -> AuthResult<Self> {
        if schluessel.is_empty() {
            return Err(AuthError::Konfiguration(
                "Signaturschluessel darf nicht leer sein".into(),
            ));
        }

        let mut validation = Validation::new(ALGORITHMUS);
        // Ablauf wird in `pruefen_zum` gegen einen expliziten Zeitpunkt geprueft
        validation.validate_exp = false;
        validation.validate_aud = false;
        validation.leeway = 0;
        validation.set_required_spec_claims(&["exp", "sub"]);

        Ok(Self {
            encoding_key: EncodingKey::from_secret(schluessel),
            decoding_key: DecodingKey::from_secret(schluessel),
            validation,
        })
    }

    /// Stellt ein Token fuer `subject` mit der gegebenen Rolle aus
    pub fn ausstellen(
        &self,
        subject: UserId,
        rolle: &Rolle,
        ttl: Duration,
    ) -> AuthResult<AusgestelltesToken> {
        self.ausstellen_zum(subject, rolle, ttl, Utc::now())
    }

    /// Wie [`Self::ausstellen`], aber mit explizitem Ausstellungszeitpunkt
    pub fn ausstellen_zum(
        &self,
        subject: UserId,
        rolle: &Rolle,
        ttl: Duration,
        jetzt: DateTime<Utc>,
    ) -> AuthResult<AusgestelltesToken> {
        let ttl = chrono::Duration::from_std(ttl)
            .map_err(|e| AuthError::intern(format!("Token-Gueltigkeit zu gross: {e}")))?;
        let laeuft_ab_am = jetzt
            .checked_add_signed(ttl)
            .ok_or_else(|| AuthError::intern("Token-Ablaufzeit ausserhalb des Wertebereichs"))?;

        let claims = Claims {
            sub: subject.als_text(),
            role: rolle.als_str().to_string(),
            iat: jetzt.timestamp(),
            exp: laeuft_ab_am.timestamp(),
        };

        let token = encode(&Header::new(ALGORITHMUS), &claims, &self.encoding_key)
            .map_err(|e| AuthError::intern(format!("Token-Signatur fehlgeschlagen: {e}")))?;

        Ok(AusgestelltesToken {
            token,
            ausgestellt_am: jetzt,
            laeuft_ab_am,
        })
    }

    /// Prueft ein Token gegen die aktuelle Zeit
    pub fn pruefen(&self, token: &str) -> Result<Identitaet, VerifikationsFehler> {
        self.pruefen_zum(token, Utc::now())
    }

    /// Prueft Algorithmus, Signatur, Claims und Ablauf zum Zeitpunkt `jetzt`
    pub fn pruefen_zum(
        &self,
        token: &str,
        jetzt: DateTime<Utc>,
    ) -> Result<Identitaet, VerifikationsFehler> {
        // Algorithmus festnageln, bevor der Header der Bibliothek vertraut wird
        if kopf_algorithmus(token)? != ALGORITHMUS_NAME {
            return Err(VerifikationsFehler::Algorithmus);
        }

        let daten = decode::<Claims>(token, &self.decoding_key, &self.validation).map_err(|e| {
            match e.kind() {
                ErrorKind::InvalidSignature => VerifikationsFehler::Signatur,
                ErrorKind::InvalidAlgorithm => VerifikationsFehler::Algorithmus,
                ErrorKind::ExpiredSignature => VerifikationsFehler::Abgelaufen,
                _ => VerifikationsFehler::Fehlerhaft,
            }
        })?;
        let claims = daten.claims;

        if claims.exp <= jetzt.timestamp() {
            return Err(VerifikationsFehler::Abgelaufen);
        }

        let user_id = Uuid::parse_str(&claims.sub)
            .map(UserId)
            .map_err(|_| VerifikationsFehler::Fehlerhaft)?;
        let rolle = Rolle::neu(claims.role).map_err(|_| VerifikationsFehler::Fehlerhaft)?;

        Ok(Identitaet { user_id, rolle })
    }
}

/// Liest `alg` aus dem ersten Token-Segment
fn kopf_algorithmus(token: &str) -> Result<String, VerifikationsFehler> {
    let mut teile = token.split('.');
    let (Some(kopf), Some(_), Some(_), None) = (teile.next(), teile.next(), teile.next(), teile.next())
    else {
        return Err(VerifikationsFehler::Fehlerhaft);
    };

    let bytes = base64::engine::general_purpose::URL_SAFE_NO_PAD
        .decode(kopf)
        .map_err(|_| VerifikationsFehler::Fehlerhaft)?;
    let kopf: KopfRoh =
        serde_json::from_slice(&bytes).map_err(|_| VerifikationsFehler::Fehlerhaft)?;

    Ok(kopf.alg)
}
