//! Reply texts produced by the rule-based responder.

use crate::domain::context::department_label;
use crate::domain::ports::DepartmentHeadcount;
use crate::domain::{Department, Disclosure, Employee, disclosure_for, format_number};

pub const LOGIN_REQUIRED: &str =
    "Veuillez vous connecter pour accéder à vos informations personnelles.";

pub const WORKING_HOURS: &str = "Les horaires de référence sont de 9h00 à 17h30 du lundi au \
vendredi, avec une pause déjeuner d'une heure. Le télétravail est possible jusqu'à deux jours \
par semaine avec l'accord de votre manager. Pour toute situation particulière, contactez le \
service RH.";

pub const TRAINING: &str = "Le catalogue de formations est disponible auprès du service RH. \
Les demandes de formation se font lors de l'entretien annuel ou à tout moment avec l'accord de \
votre manager. Le service RH peut vous accompagner dans le choix d'un parcours adapté.";

pub const THIRD_PARTY_REFUSAL: &str = "Je ne peux pas communiquer les informations personnelles \
(salaire, congés, absences) d'un autre employé. Pour ces questions, adressez-vous au manager \
concerné ou au service RH.";

pub const CAPABILITIES: &str = "Je suis l'assistant RH. Je peux vous aider à :\n\
• consulter votre profil et votre identifiant\n\
• rechercher un collègue par nom, identifiant ou poste\n\
• lister les membres d'un département ou de votre équipe\n\
• obtenir les statistiques d'effectif par département\n\
• trouver les contacts de la direction et du service RH\n\
• connaître votre manager et votre équipe directe\n\
• consulter vos soldes de congés annuels et maladie\n\
• consulter votre rémunération et vos avantages\n\
• vous renseigner sur les horaires et les formations";

/// One directory line in the listing format.
pub fn listing_line(employee: &Employee) -> String {
    format!(
        "• {} ({}) - {} - {}",
        employee.full_name(),
        employee.id(),
        employee.job_title(),
        employee.email()
    )
}

fn listing(header: &str, employees: &[Employee]) -> String {
    let mut out = String::from(header);
    for employee in employees {
        out.push('\n');
        out.push_str(&listing_line(employee));
    }
    out
}

fn format_date(date: Option<chrono::NaiveDate>, missing: &str) -> String {
    date.map_or_else(|| missing.to_owned(), |d| d.format("%d/%m/%Y").to_string())
}

pub fn comprehensive_profile(requester: &Employee, manager: Option<&Employee>) -> String {
    let leave = requester.annual_leave();
    let sick = requester.sick_leave();
    let pay = requester.compensation();
    let manager_text = manager.map_or_else(
        || "non renseigné".to_owned(),
        |m| format!("{} ({})", m.full_name(), m.id()),
    );
    let lines = [
        format!("• Nom : {}", requester.full_name()),
        format!("• Identifiant : {}", requester.id()),
        format!("• Email : {}", requester.email()),
        format!("• Département : {}", department_label(requester.department())),
        format!("• Poste : {}", requester.job_title()),
        format!(
            "• Date d'embauche : {}",
            format_date(requester.hire_date(), "non renseignée")
        ),
        format!("• Manager : {manager_text}"),
        format!(
            "• Congés annuels : {} jours restants sur {} (utilisés : {}, planifiés : {})",
            format_number(leave.remaining),
            format_number(leave.entitlement),
            format_number(leave.used),
            format_number(leave.planned),
        ),
        format!(
            "• Congés maladie : {} jours restants sur {}",
            format_number(sick.remaining),
            format_number(sick.entitlement),
        ),
        format!("• Salaire annuel : {} €", format_number(pay.salary)),
        format!("• Prime : {}", bonus_text(pay.bonus_eligible)),
        format!("• Régime santé : {}", pay.benefits_tier),
    ];
    format!("Voici l'ensemble de vos informations :\n{}", lines.join("\n"))
}

pub fn identity(requester: &Employee) -> String {
    format!(
        "Vous êtes {} (identifiant {}), {} au département {}. Votre email est {}.",
        requester.full_name(),
        requester.id(),
        requester.job_title(),
        department_label(requester.department()),
        requester.email()
    )
}

/// Search result rendered through the access policy.
pub fn person_found(requester: Option<&Employee>, found: &Employee) -> String {
    let mut out = format!(
        "J'ai trouvé cet employé :\n{}\nDépartement : {}",
        listing_line(found),
        department_label(found.department())
    );
    if disclosure_for(requester, found) == Disclosure::Full {
        out.push_str(&format!(
            "\nCongés restants : {} jours\nCongés maladie restants : {} jours\nSalaire annuel : {} €",
            format_number(found.annual_leave().remaining),
            format_number(found.sick_leave().remaining),
            format_number(found.compensation().salary),
        ));
    }
    out
}

pub fn department_members(department: Department, members: &[Employee]) -> String {
    if members.is_empty() {
        return format!("Aucun employé trouvé dans le département {department}.");
    }
    listing(
        &format!(
            "Membres du département {department} ({}) :",
            members.len()
        ),
        members,
    )
}

pub const NO_OWN_DEPARTMENT: &str = "Vous n'êtes rattaché à aucun département.";

pub fn position_matches(term: &str, matches: &[Employee]) -> String {
    if matches.is_empty() {
        return format!("Aucun employé n'occupe un poste correspondant à « {term} ».");
    }
    listing(
        &format!("Employés occupant un poste correspondant à « {term} » :"),
        matches,
    )
}

pub fn statistics(counts: &[DepartmentHeadcount]) -> String {
    let mut ordered: Vec<&DepartmentHeadcount> = counts.iter().collect();
    ordered.sort_by_key(|c| {
        c.department
            .and_then(|d| Department::ALL.iter().position(|x| *x == d))
            .unwrap_or(Department::ALL.len())
    });
    let total: u64 = counts.iter().map(|c| c.count).sum();
    let mut lines = vec!["Répartition des employés par département :".to_owned()];
    lines.extend(
        ordered
            .into_iter()
            .map(|count| format!("• {} : {}", department_label(count.department), count.count)),
    );
    lines.push(format!("Total : {total} employés"));
    lines.join("\n")
}

pub fn executive_contacts(executives: &[Employee]) -> String {
    if executives.is_empty() {
        return "Aucun contact de direction n'est enregistré.".to_owned();
    }
    listing("Contacts de la direction :", executives)
}

pub fn hr_contacts(hr: &[Employee]) -> String {
    if hr.is_empty() {
        return "Aucun contact RH n'est enregistré.".to_owned();
    }
    listing("Contacts du service RH :", hr)
}

pub fn hierarchy(requester: &Employee, manager: Option<&Employee>, reports: &[Employee]) -> String {
    let mut out = match manager {
        Some(manager) => format!(
            "Votre manager est {} ({}) - {} - {}.",
            manager.full_name(),
            manager.id(),
            manager.job_title(),
            manager.email()
        ),
        None => "Aucun manager n'est renseigné pour vous.".to_owned(),
    };
    if !reports.is_empty() {
        out.push('\n');
        out.push_str(&listing(
            &format!("Vous managez {} personne(s) :", reports.len()),
            reports,
        ));
    } else if requester.is_manager() {
        out.push_str("\nVous avez le statut de manager mais aucun rapport direct n'est enregistré.");
    }
    out
}

pub fn annual_leave(requester: &Employee) -> String {
    let leave = requester.annual_leave();
    format!(
        "Il vous reste {} jours de congés annuels (droit annuel : {} jours, utilisés : {}, planifiés : {}).",
        format_number(leave.remaining),
        format_number(leave.entitlement),
        format_number(leave.used),
        format_number(leave.planned),
    )
}

pub fn sick_leave(requester: &Employee) -> String {
    let sick = requester.sick_leave();
    format!(
        "Il vous reste {} jours de congés maladie (droit : {} jours, utilisés : {}).",
        format_number(sick.remaining),
        format_number(sick.entitlement),
        format_number(sick.used),
    )
}

pub fn salary(requester: &Employee) -> String {
    let pay = requester.compensation();
    format!(
        "Votre salaire annuel est de {} €. Prime : {}. Régime santé : {}. Prochaine évaluation : {}.",
        format_number(pay.salary),
        bonus_text(pay.bonus_eligible),
        pay.benefits_tier,
        format_date(pay.next_review_date, "non planifiée"),
    )
}

fn bonus_text(eligible: bool) -> &'static str {
    if eligible { "éligible" } else { "non éligible" }
}
