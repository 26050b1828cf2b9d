//! Domain candidate generation. Pure string transformation: a Place and an
//! organization category expand into plausible host names via template
//! tables. No network access; deterministic for identical input.

use townbeat_common::{OrgCategory, Place};

/// Municipal government domain patterns.
const GOVERNMENT_TEMPLATES: &[&str] = &[
    "{slug}.gov",
    "cityof{slug}.com",
    "{slug}{st}.gov",
    "ci.{slug}.{st}.us",
    "townof{slug}.org",
    "{slug}city.org",
];

/// School-district domain patterns.
const SCHOOL_TEMPLATES: &[&str] = &[
    "{slug}schools.org",
    "{slug}.k12.{st}.us",
    "{slug}isd.org",
    "{slug}sd.org",
    "{slug}schooldistrict.org",
];

/// Chamber-of-commerce domain patterns.
const CHAMBER_TEMPLATES: &[&str] = &[
    "{slug}chamber.com",
    "{slug}chamber.org",
    "{slug}chamberofcommerce.com",
    "greater{slug}chamber.com",
    "{slug}areachamber.org",
];

/// Expand a place into candidate host names for one organization category.
/// Library and parks feeds are near-universally hosted under the municipal
/// site, so those categories reuse the government family.
pub fn candidate_domains(place: &Place, category: OrgCategory) -> Vec<String> {
    let slug = place.slug();
    let st = place.state_code.to_lowercase();

    let templates = match category {
        OrgCategory::City | OrgCategory::Library | OrgCategory::Parks => GOVERNMENT_TEMPLATES,
        OrgCategory::School => SCHOOL_TEMPLATES,
        OrgCategory::Chamber => CHAMBER_TEMPLATES,
    };

    templates
        .iter()
        .map(|t| t.replace("{slug}", &slug).replace("{st}", &st))
        .collect()
}
