//! Heuristic identity attributes derived from an email address alone:
//! a name guess from the local-part, a company label and a country from
//! the domain. Everything degrades to an empty string, never an error.

/// Company label used for consumer mailbox providers.
pub const PERSONAL_COMPANY_LABEL: &str = "Particular";

/// Consumer mailbox domains that never map to a company.
const PERSONAL_DOMAINS: &[&str] = &[
    "gmail.com",
    "hotmail.com",
    "outlook.com",
    "yahoo.com",
    "icloud.com",
    "proton.me",
    "live.com",
    "msn.com",
];

/// Organizational suffixes split off the domain label when prettifying a
/// company name. Checked in order; first match wins.
const COMPANY_SUFFIXES: &[&str] = &[
    "consulting",
    "consultores",
    "consultora",
    "solutions",
    "soluciones",
    "group",
    "grupo",
    "corp",
    "corporation",
    "company",
    "compania",
    "compañia",
    "co",
    "ltda",
    "ltd",
    "llc",
    "srl",
    "sa",
    "saa",
    "sac",
    "inc",
    "ag",
    "gmbh",
    "bv",
    "plc",
    "pty",
    "sas",
];

/// Generic second-level labels under a ccTLD (acme.com.mx style). The
/// organizational label sits one position further left when one of these
/// follows it.
const GENERIC_SECOND_LEVELS: &[&str] = &[
    "com", "co", "org", "net", "edu", "gob", "gov", "ac", "mil",
];

/// ccTLD → country, Latin American and Iberian codes only. Anything else
/// maps to an empty country rather than a guess.
const COUNTRY_CODES: &[(&str, &str)] = &[
    ("mx", "México"),
    ("ar", "Argentina"),
    ("cl", "Chile"),
    ("co", "Colombia"),
    ("pe", "Perú"),
    ("br", "Brasil"),
    ("uy", "Uruguay"),
    ("py", "Paraguay"),
    ("bo", "Bolivia"),
    ("ec", "Ecuador"),
    ("ve", "Venezuela"),
    ("cr", "Costa Rica"),
    ("pa", "Panamá"),
    ("gt", "Guatemala"),
    ("sv", "El Salvador"),
    ("hn", "Honduras"),
    ("ni", "Nicaragua"),
    ("es", "España"),
    ("pt", "Portugal"),
];

/// Identity attributes inferred from one address.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct Classification {
    pub first_name: String,
    pub last_name: String,
    pub company: String,
    pub country: String,
}

/// Derives identity attributes from an address using the static lookup
/// tables above. Pure: the same address always yields the same result.
#[derive(Debug, Default)]
pub struct IdentityClassifier;

impl IdentityClassifier {
    pub fn new() -> Self {
        Self
    }

    /// Splits the address at the first `@` and derives all attributes.
    /// An address without `@` yields name guesses only.
    pub fn classify(&self, address: &str) -> Classification {
        let (local, domain) = match address.split_once('@') {
            Some((local, domain)) => (local, domain),
            None => (address, ""),
        };
        let (first_name, last_name) = infer_name_parts(local);
        Classification {
            first_name,
            last_name,
            company: company_from_domain(domain),
            country: country_from_domain(domain),
        }
    }
}

/// Name guess from the local-part: `-` and `_` count as `.`, purely
/// numeric tokens are dropped, first token is the first name and the last
/// token is the last name when two or more remain.
fn infer_name_parts(local: &str) -> (String, String) {
    let normalized = local.to_lowercase().replace(['-', '_'], ".");
    let tokens: Vec<&str> = normalized
        .split('.')
        .filter(|t| !t.is_empty() && !t.chars().all(|c| c.is_ascii_digit()))
        .collect();
    let first = tokens.first().map(|t| capitalize(t)).unwrap_or_default();
    let last = if tokens.len() >= 2 {
        capitalize(tokens[tokens.len() - 1])
    } else {
        String::new()
    };
    (first, last)
}

/// Company label from the domain. Consumer providers map to the fixed
/// personal marker; otherwise the organizational label is prettified,
/// splitting off a known company suffix when one matches.
fn company_from_domain(domain: &str) -> String {
    let domain = domain.to_lowercase();
    if domain.is_empty() {
        return String::new();
    }
    if PERSONAL_DOMAINS.contains(&domain.as_str()) {
        return PERSONAL_COMPANY_LABEL.to_string();
    }

    let label = organizational_label(&domain);
    for suffix in COMPANY_SUFFIXES {
        if let Some(prefix) = label.strip_suffix(suffix) {
            // Trim the separator a hyphenated label leaves behind
            let prefix = prefix.trim_end_matches(|c: char| !c.is_ascii_alphanumeric());
            if prefix.is_empty() {
                return capitalize(suffix);
            }
            return format!("{} {}", style_label(prefix), capitalize(suffix));
        }
    }
    style_label(label)
}

/// The dot-separated label carrying the organization name: normally the
/// second-to-last, shifted one left for compound suffixes like `com.mx`.
fn organizational_label(domain: &str) -> &str {
    let labels: Vec<&str> = domain.split('.').collect();
    if labels.len() < 2 {
        return labels.first().copied().unwrap_or("");
    }
    let last = labels[labels.len() - 1];
    let mut index = labels.len() - 2;
    if labels.len() >= 3
        && is_country_code_shape(last)
        && GENERIC_SECOND_LEVELS.contains(&labels[index])
    {
        index -= 1;
    }
    labels[index]
}

/// Country from the domain's ccTLD. The second-to-last label is consulted
/// only when the last one does not look like a country code at all.
fn country_from_domain(domain: &str) -> String {
    let domain = domain.to_lowercase();
    let labels: Vec<&str> = domain.split('.').collect();
    let Some(last) = labels.last() else {
        return String::new();
    };
    if is_country_code_shape(last) {
        return lookup_country(last);
    }
    if labels.len() >= 2 && is_country_code_shape(labels[labels.len() - 2]) {
        return lookup_country(labels[labels.len() - 2]);
    }
    String::new()
}

fn is_country_code_shape(label: &str) -> bool {
    label.len() == 2 && label.chars().all(|c| c.is_ascii_alphabetic())
}

fn lookup_country(code: &str) -> String {
    COUNTRY_CODES
        .iter()
        .find(|(cc, _)| *cc == code)
        .map(|(_, country)| country.to_string())
        .unwrap_or_default()
}

/// Short labels read as acronyms, longer ones as words.
fn style_label(label: &str) -> String {
    if label.len() <= 3 {
        label.to_uppercase()
    } else {
        capitalize(label)
    }
}

fn capitalize(text: &str) -> String {
    let mut chars = text.chars();
    match chars.next() {
        Some(first) => first.to_uppercase().collect::<String>() + &chars.as_str().to_lowercase(),
        None => String::new(),
    }
}
