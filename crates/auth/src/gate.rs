//! Zugangs-Gate fuer geschuetzte Endpunkte
//!
//! Das Gate authentifiziert nur. Ob eine Rolle fuer eine Aktion reicht,
//! entscheiden die Handler.

use std::sync::Arc;

use thiserror::Error;

use crate::token::{Identitaet, TokenDienst, VerifikationsFehler};

const BEARER: &str = "bearer ";

/// Warum ein Aufrufer abgewiesen wurde
#[derive(Debug, Clone, Copy, PartialEq, Eq, Error)]
pub enum ZugangVerweigert {
    /// Header fehlt oder ist leer
    #[error("Kein Token angegeben")]
    KeinToken,
    /// Token vorhanden, aber Pruefung fehlgeschlagen
    #[error("Token ungueltig")]
    Ungueltig(VerifikationsFehler),
}

impl ZugangVerweigert {
    /// Kurzer Bezeichner fuer Metrik-Labels
    pub fn grund(&self) -> &'static str {
        match self {
            Self::KeinToken => "kein_token",
            Self::Ungueltig(fehler) => fehler.als_str(),
        }
    }
}

/// Holt das rohe Token aus einem Authorization-Header
///
/// Akzeptiert `<token>` und `Bearer <token>` (Schema ohne Beachtung der
/// Gross-/Kleinschreibung). `None` wenn nichts uebrig bleibt.
pub fn token_extrahieren(header: Option<&str>) -> Option<&str> {
    let wert = header?.trim();

    let token = match wert.get(..BEARER.len()) {
        Some(praefix) if praefix.eq_ignore_ascii_case(BEARER) => wert[BEARER.len()..].trim(),
        _ => wert,
    };

    if token.is_empty() || token.eq_ignore_ascii_case(BEARER.trim_end()) {
        None
    } else {
        Some(token)
    }
}

/// Prueft den Authorization-Header eingehender Anfragen
#[derive(Clone)]
pub struct ZugangsGate {
    tokens: Arc<TokenDienst>,
}

impl ZugangsGate {
    pub fn neu(tokens: Arc<TokenDienst>) -> Self {
        Self { tokens }
    }

    /// Liefert die Identitaet des Aufrufers oder den Ablehnungsgrund
    pub fn pruefen(&self, header: Option<&str>) -> Result<Identitaet, ZugangVerweigert> {
        let Some(token) = token_extrahieren(header) else {
            tracing::debug!("Anfrage ohne Token abgewiesen");
            return Err(ZugangVerweigert::KeinToken);
        };

        self.tokens.pruefen(token).map_err(|fehler| {
            tracing::debug!(grund = %fehler, "Token-Pruefung fehlgeschlagen");
            ZugangVerweigert::Ungueltig(fehler)
        })
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use fabula_core::{Rolle, UserId};
    use std::time::Duration;

    fn gate_und_token() -> (ZugangsGate, UserId, String) {
        let dienst = Arc::new(TokenDienst::neu(b"gate-test-schluessel-mit-mindestens-32-bytes").unwrap());
        let user_id = UserId::new();
        let token = dienst
            .ausstellen(user_id, &Rolle::standard(), Duration::from_secs(3600))
            .unwrap()
            .token;
        (ZugangsGate::neu(dienst), user_id, token)
    }

    #[test]
    fn extrahieren() {
        assert_eq!(token_extrahieren(None), None);
        assert_eq!(token_extrahieren(Some("")), None);
        assert_eq!(token_extrahieren(Some("   ")), None);
        assert_eq!(token_extrahieren(Some("Bearer")), None);
        assert_eq!(token_extrahieren(Some("Bearer   ")), None);
        assert_eq!(token_extrahieren(Some("abc")), Some("abc"));
        assert_eq!(token_extrahieren(Some("  abc  ")), Some("abc"));
        assert_eq!(token_extrahieren(Some("Bearer abc")), Some("abc"));
        assert_eq!(token_extrahieren(Some("bearer abc")), Some("abc"));
        assert_eq!(token_extrahieren(Some("BEARER  abc")), Some("abc"));
    }

    #[test]
    fn fehlender_header_ohne_parsing() {
        let (gate, _, _) = gate_und_token();
        assert_eq!(gate.pruefen(None), Err(ZugangVerweigert::KeinToken));
        assert_eq!(gate.pruefen(Some("  ")), Err(ZugangVerweigert::KeinToken));
    }

    #[test]
    fn nacktes_und_bearer_token_gleichwertig() {
        let (gate, user_id, token) = gate_und_token();

        let nackt = gate.pruefen(Some(&token)).unwrap();
        let mit_schema = gate.pruefen(Some(&format!("Bearer {token}"))).unwrap();

        assert_eq!(nackt, mit_schema);
        assert_eq!(nackt.user_id, user_id);
    }

    #[test]
    fn ungueltiges_token() {
        let (gate, _, _) = gate_und_token();
        let ergebnis = gate.pruefen(Some("Bearer invalid.token.here"));
        assert_eq!(
            ergebnis,
            Err(ZugangVerweigert::Ungueltig(VerifikationsFehler::Fehlerhaft))
        );
        assert_eq!(ergebnis.unwrap_err().grund(), "fehlerhaft");
    }
}
