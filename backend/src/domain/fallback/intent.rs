//! Keyword predicates over folded (lower-cased, accent-free) messages.

use crate::domain::Department;

const COMPREHENSIVE_CUES: &[&str] = &[
    "toutes mes informations",
    "toutes mes infos",
    "tout sur moi",
    "mon profil",
    "mon dossier",
    "mes informations",
    "mes infos",
];

const IDENTITY_CUES: &[&str] = &[
    "qui suis-je",
    "qui suis je",
    "mon identifiant",
    "mon matricule",
    "mon nom",
    "mon email",
    "mon adresse mail",
];

/// Phrases that introduce a person search, followed by the searched term.
pub(super) const SEARCH_CUES: &[&str] = &[
    "informations sur",
    "infos sur",
    "coordonnees de",
    "contact de",
    "email de",
    "qui est",
    "cherche",
    "trouve",
];

const DEPARTMENT_WORDS: &[&str] = &["departement", "equipe", "service"];

const OWN_TEAM_CUES: &[&str] = &[
    "mon equipe",
    "mon departement",
    "mon service",
    "mes collegues",
];

const LISTING_CUES: &[&str] = &[
    "qui est",
    "qui sont",
    "qui travaille",
    "liste",
    "membres",
    "equipe",
    "departement",
    "service",
    "collegues",
];

/// Phrases that introduce a job-title search.
pub(super) const POSITION_CUES: &[&str] = &[
    "qui occupe le poste de",
    "qui occupe le poste",
    "qui occupe",
    "au poste de",
    "le poste de",
    "qui est le",
    "qui est la",
    "qui sont les",
];

/// Department keywords, matched as whole words or phrases.
const DEPARTMENT_KEYWORDS: &[(&str, Department)] = &[
    ("informatique", Department::It),
    ("it", Department::It),
    ("dsi", Department::It),
    ("tech", Department::It),
    ("ressources humaines", Department::Rh),
    ("rh", Department::Rh),
    ("finance", Department::Finance),
    ("finances", Department::Finance),
    ("comptabilite", Department::Finance),
    ("marketing", Department::Marketing),
    ("communication", Department::Marketing),
    ("ventes", Department::Ventes),
    ("vente", Department::Ventes),
    ("commercial", Department::Ventes),
    ("juridique", Department::Juridique),
    ("legal", Department::Juridique),
    ("operations", Department::Operations),
    ("logistique", Department::Operations),
    ("direction", Department::Direction),
    ("support", Department::Support),
    ("service client", Department::Support),
];

const STATISTICS_CUES: &[&str] = &["statistique", "effectif", "repartition"];
const HEADCOUNT_WORDS: &[&str] = &["employe", "salarie", "personne", "collaborateur"];

const EXECUTIVE_CUES: &[&str] = &[
    "directeur general",
    "directrice generale",
    "dirigeant",
    "pdg",
    "ceo",
    "la direction",
    "contact direction",
];

const HR_CUES: &[&str] = &[
    "ressources humaines",
    "service rh",
    "contact rh",
    "contacter les rh",
    "drh",
];

const HIERARCHY_CUES: &[&str] = &[
    "manager",
    "responsable",
    "hierarchie",
    "superieur",
    "mon chef",
    "ma cheffe",
    "je manage",
];

const LEAVE_CUES: &[&str] = &["conge", "vacances", "rtt", "jours de repos"];
const SICK_CUES: &[&str] = &["maladie", "arret de travail", "arret maladie"];
const SALARY_CUES: &[&str] = &[
    "salaire",
    "remuneration",
    "paie",
    "prime",
    "je gagne",
    "mutuelle",
    "regime sante",
];
const HOURS_CUES: &[&str] = &[
    "horaire",
    "heures de travail",
    "temps de travail",
    "teletravail",
];
const TRAINING_CUES: &[&str] = &["formation", "se former", "apprendre", "competence"];

const PRIVATE_DATA_CUES: &[&str] = &["gagne", "salaire", "conge", "absence", "remuneration"];
const SELF_MARKERS: &[&str] = &["je", "j", "mon", "ma", "mes", "moi"];

/// The message with every non-alphanumeric character turned into a single
/// space and padded at both ends, so ` word ` checks match whole words.
fn padded_words(text: &str) -> String {
    let mut out = String::with_capacity(text.len() + 2);
    out.push(' ');
    for word in text
        .split(|c: char| !c.is_alphanumeric())
        .filter(|w| !w.is_empty())
    {
        out.push_str(word);
        out.push(' ');
    }
    out
}

fn contains_any(text: &str, cues: &[&str]) -> bool {
    cues.iter().any(|cue| text.contains(cue))
}

fn contains_word(text: &str, word: &str) -> bool {
    padded_words(text).contains(&format!(" {word} "))
}

/// Whole-word match for any cue, allowing a plural `s` on the last word.
fn contains_any_phrase(text: &str, cues: &[&str]) -> bool {
    let padded = padded_words(text);
    cues.iter().any(|cue| {
        let phrase = padded_words(cue);
        let plural = format!("{}s ", phrase.trim_end());
        padded.contains(&phrase) || padded.contains(&plural)
    })
}

pub(super) fn asks_comprehensive_info(text: &str) -> bool {
    contains_any(text, COMPREHENSIVE_CUES)
}

pub(super) fn asks_identity(text: &str) -> bool {
    contains_any_phrase(text, IDENTITY_CUES)
}

pub(super) fn asks_person_search(text: &str) -> bool {
    contains_any(text, SEARCH_CUES)
}

/// Department named in `text`, if any. Longer phrases are listed before the
/// words they contain.
pub(super) fn named_department(text: &str) -> Option<Department> {
    let padded = padded_words(text);
    DEPARTMENT_KEYWORDS
        .iter()
        .find(|(keyword, _)| padded.contains(&format!(" {keyword} ")))
        .map(|(_, department)| *department)
}

/// Whether a search phrase is really about a department.
pub(super) fn mentions_department(text: &str) -> bool {
    named_department(text).is_some() || DEPARTMENT_WORDS.iter().any(|w| contains_word(text, w))
}

pub(super) fn asks_own_team(text: &str) -> bool {
    contains_any(text, OWN_TEAM_CUES)
}

pub(super) fn asks_department_listing(text: &str) -> bool {
    !text.contains("combien") && contains_any(text, LISTING_CUES)
}

pub(super) fn asks_position(text: &str) -> bool {
    contains_any(text, POSITION_CUES) || text.contains("poste")
}

pub(super) fn asks_statistics(text: &str) -> bool {
    contains_any(text, STATISTICS_CUES)
        || (text.contains("combien") && contains_any(text, HEADCOUNT_WORDS))
}

pub(super) fn asks_executive_contacts(text: &str) -> bool {
    contains_any(text, EXECUTIVE_CUES)
}

pub(super) fn asks_hr_contacts(text: &str) -> bool {
    contains_any(text, HR_CUES) || contains_word(text, "rh")
}

pub(super) fn asks_hierarchy(text: &str) -> bool {
    contains_any(text, HIERARCHY_CUES)
}

pub(super) fn asks_annual_leave(text: &str) -> bool {
    contains_any(text, LEAVE_CUES) && !text.contains("maladie")
}

pub(super) fn asks_sick_leave(text: &str) -> bool {
    contains_any(text, SICK_CUES)
}

pub(super) fn asks_salary(text: &str) -> bool {
    contains_any_phrase(text, SALARY_CUES)
}

pub(super) fn asks_working_hours(text: &str) -> bool {
    contains_any(text, HOURS_CUES)
}

pub(super) fn asks_training(text: &str) -> bool {
    contains_any(text, TRAINING_CUES)
}

/// Private figures requested without any first-person marker.
pub(super) fn asks_third_party_private_data(text: &str) -> bool {
    contains_any(text, PRIVATE_DATA_CUES) && !SELF_MARKERS.iter().any(|m| contains_word(text, m))
}

/// Text following the first cue found in `text`, stripped of leading
/// articles and trailing punctuation. `None` when no cue matches or nothing
/// follows it.
pub(super) fn term_after(text: &str, cues: &[&str]) -> Option<String> {
    let (cue, position) = cues
        .iter()
        .filter_map(|cue| text.find(cue).map(|position| (*cue, position)))
        .min_by_key(|(cue, position)| (*position, usize::MAX - cue.len()))?;
    let tail = text.get(position + cue.len()..)?;
    let term = strip_fillers(tail);
    (!term.is_empty()).then_some(term)
}

fn strip_fillers(tail: &str) -> String {
    const LEADING: &[&str] = &[
        "l'", "le ", "la ", "les ", "un ", "une ", "des ", "de ", "du ", "d'", "pour ", "moi ",
    ];
    let mut term = tail.trim_start_matches([' ', ':', ',']).trim();
    loop {
        let before = term;
        for filler in LEADING {
            if let Some(rest) = term.strip_prefix(filler) {
                term = rest.trim_start();
            }
        }
        if before == term {
            break;
        }
    }
    term.trim_end_matches(['?', '!', '.', ' ', ',', ';'])
        .trim()
        .to_owned()
}
