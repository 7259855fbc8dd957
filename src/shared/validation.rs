use lazy_static::lazy_static;
use regex::Regex;

lazy_static! {
    /// Regex for validating slug fields (category slugs, etc.)
    /// Must be lowercase alphanumeric segments joined by single hyphens
    /// - Valid: "sofas", "mesas-de-centro", "serie-2024"
    /// - Invalid: "-sofas", "sofas-", "sofas--modernos", "Sofas", "sofas_modernos"
    pub static ref SLUG_REGEX: Regex = Regex::new(r"^[a-z0-9]+(?:-[a-z0-9]+)*$").unwrap();
}
