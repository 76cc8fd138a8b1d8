//! Schreibvorschlaege fuer den Story-Editor
//!
//! Platzhalter ohne Sprachmodell: die Ausgabe haengt nur von Kontext und
//! Modus ab und ist damit in Tests exakt vorhersagbar.

use serde::{Deserialize, Serialize};

const FORTSETZUNG_STANDARD: &str = " and suddenly, the classroom door burst open!";
const FORTSETZUNG_DUNKEL: &str = " The shadows whispered secrets that no one else could hear.";
const FORTSETZUNG_LIEBE: &str = " It was a heartbeat that echoed through eternity.";
const KORREKTUR_BTECH: &str = "I am currently pursuing my B.Tech degree.";
const KORREKTUR_SUFFIX: &str = " [Fixed: Capitalization and Punctuation]";

/// Was der Vorschlag leisten soll
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize, Deserialize)]
pub enum VorschlagsModus {
    /// Text weiterschreiben
    #[default]
    #[serde(rename = "continue")]
    Fortsetzen,
    /// Grammatik und Zeichensetzung korrigieren
    #[serde(rename = "fix")]
    Korrigieren,
}

impl VorschlagsModus {
    /// Alles ausser `fix` gilt als Fortsetzen
    pub fn aus_text(modus: Option<&str>) -> Self {
        match modus {
            Some(m) if m.trim().eq_ignore_ascii_case("fix") => Self::Korrigieren,
            _ => Self::Fortsetzen,
        }
    }
}

/// Erzeugt einen Vorschlag fuer `kontext`
pub fn vorschlag_generieren(kontext: &str, modus: VorschlagsModus) -> String {
    let klein = kontext.to_lowercase();

    match modus {
        VorschlagsModus::Korrigieren if klein.contains("b.tech") => KORREKTUR_BTECH.to_string(),
        VorschlagsModus::Korrigieren => format!("{kontext}{KORREKTUR_SUFFIX}"),
        VorschlagsModus::Fortsetzen if klein.contains("dark") => FORTSETZUNG_DUNKEL.to_string(),
        VorschlagsModus::Fortsetzen if klein.contains("love") => FORTSETZUNG_LIEBE.to_string(),
        VorschlagsModus::Fortsetzen => FORTSETZUNG_STANDARD.to_string(),
    }
}
