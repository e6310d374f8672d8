//! Best-effort repair of employee listings in assistant replies.
//!
//! The assistant is asked to list people as `• Prénom Nom (ID) - Poste -
//! email` but sometimes spreads each person over several lines. When a reply
//! contains both an email address and a job-title keyword, each email line
//! and up to [`WINDOW`] lines above it are searched for an identifier, a
//! title and a name, and rebuilt as one bullet. Anything that cannot be
//! rebuilt is left as it was; if nothing was rebuilt the reply is returned
//! untouched.

use std::sync::OnceLock;

use regex::Regex;

use super::fold_text;

/// Number of lines above an email line searched for its other fields.
pub const WINDOW: usize = 3;

const TITLE_KEYWORDS: &[&str] = &[
    "administrateur",
    "administratrice",
    "analyste",
    "architecte",
    "assistant",
    "assistante",
    "auditeur",
    "auditrice",
    "ceo",
    "cfo",
    "charge",
    "chargee",
    "chef",
    "commercial",
    "commerciale",
    "comptable",
    "conseiller",
    "conseillere",
    "consultant",
    "consultante",
    "controleur",
    "coordinateur",
    "coordinatrice",
    "cto",
    "designer",
    "developpeur",
    "developpeuse",
    "directeur",
    "directrice",
    "drh",
    "gestionnaire",
    "ingenieur",
    "ingenieure",
    "juriste",
    "manager",
    "president",
    "presidente",
    "responsable",
    "secretaire",
    "specialiste",
    "stagiaire",
    "technicien",
    "technicienne",
    "vendeur",
    "vendeuse",
];

fn compile(cell: &'static OnceLock<Regex>, pattern: &str) -> &'static Regex {
    cell.get_or_init(|| {
        Regex::new(pattern)
            .unwrap_or_else(|error| panic!("listing regex {pattern} failed to compile: {error}"))
    })
}

fn email_regex() -> &'static Regex {
    static RE: OnceLock<Regex> = OnceLock::new();
    compile(&RE, r"[A-Za-z0-9._%+-]+@[A-Za-z0-9.-]+\.[A-Za-z]{2,}")
}

fn id_regex() -> &'static Regex {
    static RE: OnceLock<Regex> = OnceLock::new();
    compile(&RE, r"\b[A-Z]{2,4}\d{2,6}\b")
}

fn bullet_regex() -> &'static Regex {
    static RE: OnceLock<Regex> = OnceLock::new();
    compile(
        &RE,
        r"^\s*•\s*[^()]+\([A-Za-z0-9_-]+\)\s+-\s+.+\s+-\s+\S+@\S+\s*$",
    )
}

fn label_regex() -> &'static Regex {
    static RE: OnceLock<Regex> = OnceLock::new();
    compile(
        &RE,
        r"^\s*(?:[-*•·]|\d+[.)])?\s*(?:[\p{L}][\p{L} ']{1,20}\s*:\s+)?",
    )
}

fn segment_regex() -> &'static Regex {
    static RE: OnceLock<Regex> = OnceLock::new();
    compile(&RE, r"\s+[-–|]\s+|\s*[|,;\t]\s*")
}

/// Whether `line` carries a job-title keyword.
pub fn has_title_keyword(line: &str) -> bool {
    fold_text(line)
        .split(|c: char| !c.is_alphanumeric())
        .any(|word| TITLE_KEYWORDS.contains(&word))
}

/// Reformat an unformatted employee listing, or return `raw` unchanged.
///
/// # Examples
/// ```
/// use hr_assistant::domain::format_employee_listing;
///
/// let raw = "Jean Dupont\nEMP001\nDéveloppeur\njean.dupont@company.com";
/// assert_eq!(
///     format_employee_listing(raw),
///     "• Jean Dupont (EMP001) - Développeur - jean.dupont@company.com"
/// );
/// assert_eq!(format_employee_listing("Bonjour !"), "Bonjour !");
/// ```
pub fn format_employee_listing(raw: &str) -> String {
    if !email_regex().is_match(raw) || !raw.lines().any(has_title_keyword) {
        return raw.to_owned();
    }

    let lines: Vec<&str> = raw.lines().collect();
    let mut out: Vec<String> = Vec::with_capacity(lines.len());
    let mut rebuilt = 0_usize;
    let mut cursor = 0_usize;

    for (index, line) in lines.iter().enumerate() {
        if !email_regex().is_match(line) {
            continue;
        }
        let start = index.saturating_sub(WINDOW).max(cursor);
        let passthrough = lines.get(cursor..start).unwrap_or_default();
        out.extend(passthrough.iter().map(|l| (*l).to_owned()));
        let window = lines.get(start..=index).unwrap_or_default();

        if bullet_regex().is_match(line) {
            out.extend(window.iter().map(|l| (*l).to_owned()));
        } else if let Some(entry) = rebuild_entry(window) {
            let leading = window.get(..entry.first_used).unwrap_or_default();
            out.extend(leading.iter().map(|l| (*l).to_owned()));
            out.push(entry.bullet);
            rebuilt += 1;
        } else {
            out.extend(window.iter().map(|l| (*l).to_owned()));
        }
        cursor = index + 1;
    }

    if rebuilt == 0 {
        return raw.to_owned();
    }
    let rest = lines.get(cursor..).unwrap_or_default();
    out.extend(rest.iter().map(|l| (*l).to_owned()));
    out.join("\n")
}

struct RebuiltEntry {
    first_used: usize,
    bullet: String,
}

#[derive(Default)]
struct EntryParts {
    name: Option<String>,
    id: Option<String>,
    title: Option<String>,
}

impl EntryParts {
    fn complete(&self) -> bool {
        self.name.is_some() && self.id.is_some() && self.title.is_some()
    }

    /// Take whatever fields `text` provides. Returns whether anything was
    /// used.
    fn absorb(&mut self, text: &str) -> bool {
        let mut remaining = strip_decoration(text);
        let mut used = false;

        if self.id.is_none() {
            if let Some(found) = id_regex().find(&remaining) {
                self.id = Some(found.as_str().to_owned());
                remaining = remaining.replacen(found.as_str(), "", 1);
                remaining = remaining
                    .replace("()", "")
                    .trim_matches(|c: char| c.is_whitespace() || matches!(c, '-' | '(' | ')' | ','))
                    .to_owned();
                used = true;
            }
        }
        if remaining.is_empty() {
            return used;
        }
        if self.title.is_none() && has_title_keyword(&remaining) {
            self.title = Some(remaining);
            return true;
        }
        if self.name.is_none() && looks_like_name(&remaining) {
            self.name = Some(remaining);
            return true;
        }
        used
    }
}

fn rebuild_entry(window: &[&str]) -> Option<RebuiltEntry> {
    let (email_line, above) = window.split_last()?;
    let email = email_regex().find(email_line)?.as_str().to_owned();
    let mut parts = EntryParts::default();

    for segment in segment_regex().split(email_line) {
        if !segment.contains('@') {
            parts.absorb(segment);
        }
    }

    let mut first_used = above.len();
    for (offset, line) in above.iter().enumerate().rev() {
        if parts.complete() {
            break;
        }
        if parts.absorb(line) {
            first_used = offset;
        }
    }

    let EntryParts {
        name: Some(name),
        id: Some(id),
        title: Some(title),
    } = parts
    else {
        return None;
    };
    Some(RebuiltEntry {
        first_used,
        bullet: format!("• {name} ({id}) - {title} - {email}"),
    })
}

fn strip_decoration(text: &str) -> String {
    let without_emphasis = text.replace("**", "").replace('*', "");
    label_regex()
        .replace(&without_emphasis, "")
        .trim()
        .to_owned()
}

fn looks_like_name(text: &str) -> bool {
    let words: Vec<&str> = text.split_whitespace().collect();
    if !(2..=5).contains(&words.len()) {
        return false;
    }
    if text.contains(['@', ':', '?', '!']) || text.chars().any(|c| c.is_ascii_digit()) {
        return false;
    }
    words
        .iter()
        .all(|word| word.chars().next().is_some_and(char::is_uppercase))
}

#[cfg(test)]
mod tests {
    use super::*;
    use rstest::rstest;

    #[rstest]
    fn rebuilds_multi_line_entries_and_keeps_surrounding_text() {
        let raw = "Voici les membres de l'équipe IT :\n\
                   Jean Dupont\n\
                   EMP001\n\
                   Développeur Backend\n\
                   jean.dupont@company.com\n\
                   Marie Curie\n\
                   EMP002\n\
                   Analyste de données\n\
                   marie.curie@company.com\n\
                   N'hésitez pas à les contacter.";
        let expected = "Voici les membres de l'équipe IT :\n\
                        • Jean Dupont (EMP001) - Développeur Backend - jean.dupont@company.com\n\
                        • Marie Curie (EMP002) - Analyste de données - marie.curie@company.com\n\
                        N'hésitez pas à les contacter.";
        assert_eq!(format_employee_listing(raw), expected);
    }

    #[rstest]
    fn rebuilds_labelled_entries() {
        let raw = "Nom : Jean Dupont\n\
                   ID : EMP001\n\
                   Poste : Chef de projet\n\
                   Email : jean.dupont@company.com";
        assert_eq!(
            format_employee_listing(raw),
            "• Jean Dupont (EMP001) - Chef de projet - jean.dupont@company.com"
        );
    }

    #[rstest]
    fn rebuilds_single_line_entries() {
        let raw = "1. **Jean Dupont**, EMP001, Comptable, jean.dupont@company.com";
        assert_eq!(
            format_employee_listing(raw),
            "• Jean Dupont (EMP001) - Comptable - jean.dupont@company.com"
        );
    }

    #[rstest]
    #[case("Votre solde est de 15 jours.")]
    #[case("Contactez rh@company.com pour toute question.")]
    #[case("• Jean Dupont (EMP001) - Développeur - jean.dupont@company.com")]
    #[case("Jean Dupont\njean.dupont@company.com\nDéveloppeur sans identifiant")]
    fn leaves_input_untouched_when_nothing_is_rebuilt(#[case] raw: &str) {
        assert_eq!(format_employee_listing(raw), raw);
    }

    #[rstest]
    fn keeps_unrecoverable_entries_verbatim() {
        let raw = "Jean Dupont\nEMP001\nDéveloppeur\njean.dupont@company.com\n\
                   Quelqu'un\nsans.poste@company.com";
        let formatted = format_employee_listing(raw);
        assert!(formatted.starts_with("• Jean Dupont (EMP001) - Développeur - "));
        assert!(formatted.ends_with("Quelqu'un\nsans.poste@company.com"));
    }

    #[rstest]
    #[case("Développeuse Full-Stack", true)]
    #[case("Directrice financière", true)]
    #[case("Jean Dupont", false)]
    fn detects_title_keywords(#[case] line: &str, #[case] expected: bool) {
        assert_eq!(has_title_keyword(line), expected);
    }
}
