//! Passwort-Hashing mit Argon2id
//!
//! Der Arbeitsfaktor kommt aus [`HashParameter`] und wird einmal beim
//! Erstellen des Hashers festgelegt. Die Verifikation liest die Parameter
//! aus dem gespeicherten PHC-String, alte Hashes bleiben also pruefbar
//! wenn der Arbeitsfaktor spaeter erhoeht wird.

use argon2::{
    password_hash::{rand_core::OsRng, PasswordHash, PasswordHasher, PasswordVerifier, SaltString},
    Algorithm, Argon2, Params, Version,
};

use crate::error::{AuthError, AuthResult};
use crate::konfig::HashParameter;

/// Einweg-Hasher fuer Passwoerter
#[derive(Debug, Clone)]
pub struct PasswortHasher {
    params: Params,
}

impl PasswortHasher {
    /// Erstellt einen Hasher mit dem gegebenen Arbeitsfaktor
    ///
    /// Ungueltige Parameter (z.B. zu wenig Speicher fuer den Parallelismus)
    /// sind ein Konfigurationsfehler.
    pub fn neu(parameter: &HashParameter) -> AuthResult<Self> {
        let params = Params::new(
            parameter.speicher_kib,
            parameter.iterationen,
            parameter.parallelitaet,
            None, // output_len: Standard (32 Bytes)
        )
        .map_err(|e| AuthError::Konfiguration(format!("Argon2-Parameter ungueltig: {e}")))?;

        Ok(Self { params })
    }

    fn argon2(&self) -> Argon2<'static> {
        Argon2::new(Algorithm::Argon2id, Version::V0x13, self.params.clone())
    }

    /// Hasht ein Passwort mit Argon2id und einem zufaelligen Salt
    ///
    /// Gibt den PHC-String zurueck (inkl. Algorithmus, Parameter und Salt).
    pub fn hashen(&self, passwort: &str) -> AuthResult<String> {
        let salt = SaltString::generate(&mut OsRng);

        self.argon2()
            .hash_password(passwort.as_bytes(), &salt)
            .map(|hash| hash.to_string())
            .map_err(|e| AuthError::PasswortHashing(e.to_string()))
    }

    /// Verifiziert ein Passwort gegen einen gespeicherten PHC-Hash
    ///
    /// `Ok(false)` bei falschem Passwort, `Err` nur bei kaputtem Hash.
    pub fn verifizieren(&self, passwort: &str, hash: &str) -> AuthResult<bool> {
        let parsed_hash = PasswordHash::new(hash)
            .map_err(|e| AuthError::PasswortHashing(format!("Ungueltiges Hash-Format: {e}")))?;

        match self.argon2().verify_password(passwort.as_bytes(), &parsed_hash) {
            Ok(()) => Ok(true),
            Err(argon2::password_hash::Error::Password) => Ok(false),
            Err(e) => Err(AuthError::PasswortHashing(e.to_string())),
        }
    }
}
