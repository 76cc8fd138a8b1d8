//! fabula-auth – Authentifizierungs-Kern
//!
//! Dieses Crate implementiert:
//! - Passwort-Hashing mit Argon2id (konfigurierbarer Arbeitsfaktor)
//! - Token-Ausstellung und -Pruefung (HS256, fester Algorithmus)
//! - AuthService (Registrierung, Login, Login-Protokoll)
//! - Zugangs-Gate fuer geschuetzte Endpunkte

pub mod error;
pub mod gate;
pub mod konfig;
pub mod password;
pub mod service;
pub mod token;

// Bequeme Re-Exporte
pub use error::{AuthError, AuthResult, FehlerKategorie};
pub use gate::{token_extrahieren, ZugangVerweigert, ZugangsGate};
pub use konfig::{AuthKonfig, HashParameter};
pub use password::PasswortHasher;
pub use service::{Anmeldung, AuthService};
pub use token::{AusgestelltesToken, Identitaet, TokenDienst, VerifikationsFehler};
