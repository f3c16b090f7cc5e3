//! Category keys and display labels.
//!
//! Pure configuration data. The site accumulated several spellings for the
//! same category over the years (spaces vs hyphens, renamed tournaments, a
//! couple of typos), so both tables below map liberally and are meant to be
//! extended rather than rewritten.

/// Canonical key -> display label.
const LABELS: &[(&str, &str)] = &[
  ("primera", "Primera División"),
  ("liga-profesional", "Liga Profesional"),
  ("copa-argentina", "Copa Argentina"),
  ("copa-sudamericana", "Copa Sudamericana"),
  ("pretemporada", "Pretemporada"),
  ("mercado", "Mercado de Pases"),
  ("entrevistas", "Entrevistas"),
  ("inferiores", "Inferiores"),
  ("reserva", "Reserva"),
  ("institucional", "Institucional"),
];

/// Historical spelling -> canonical key.
const SYNONYMS: &[(&str, &str)] = &[
  ("liga profesional", "liga-profesional"),
  ("primera division", "liga-profesional"),
  ("primera-division", "liga-profesional"),
  ("primera división", "liga-profesional"),
  ("copa argentina", "copa-argentina"),
  ("copa sudamericana", "copa-sudamericana"),
  ("mercado de pases", "mercado"),
  ("mercado-pases", "mercado"),
];

/// Display label for a category key. Unknown keys fall back to capitalizing
/// the raw value so new categories render acceptably before this table
/// learns about them.
pub fn label(key: &str) -> String {
  let lower = key.trim().to_lowercase();
  for (candidate, label) in LABELS {
    if *candidate == lower {
      return (*label).to_string();
    }
  }
  capitalize(key.trim())
}

/// Collapse a historical spelling to its canonical key. Unknown values are
/// lowercased with whitespace runs turned into hyphens.
pub fn normalize(key: &str) -> String {
  let lower = key.trim().to_lowercase();
  for (spelling, canonical) in SYNONYMS {
    if *spelling == lower {
      return (*canonical).to_string();
    }
  }
  if LABELS.iter().any(|(candidate, _)| *candidate == lower) {
    return lower;
  }
  lower.split_whitespace().collect::<Vec<_>>().join("-")
}

fn capitalize(value: &str) -> String {
  let mut chars = value.chars();
  match chars.next() {
    Some(first) => first.to_uppercase().chain(chars).collect(),
    None => String::new(),
  }
}

#[cfg(test)]
mod tests {
  use super::*;

  #[test]
  fn known_keys_get_labels() {
    assert_eq!(label("primera"), "Primera División");
    assert_eq!(label("MERCADO"), "Mercado de Pases");
  }

  #[test]
  fn unknown_keys_are_capitalized() {
    assert_eq!(label("amistosos"), "Amistosos");
    assert_eq!(label(""), "");
  }

  #[test]
  fn synonyms_normalize_to_canonical() {
    assert_eq!(normalize("Primera División"), "liga-profesional");
    assert_eq!(normalize("mercado de pases"), "mercado");
    assert_eq!(normalize("copa argentina"), "copa-argentina");
  }

  #[test]
  fn canonical_keys_pass_through() {
    assert_eq!(normalize("reserva"), "reserva");
    assert_eq!(normalize("Entrevistas"), "entrevistas");
  }

  #[test]
  fn unknown_values_are_hyphenated() {
    assert_eq!(normalize("Torneo De Verano"), "torneo-de-verano");
  }
}
