//! URL-safe slugs derived from article titles.

use unicode_normalization::char::is_combining_mark;
use unicode_normalization::UnicodeNormalization;

/// Derive a slug: lowercase, strip diacritics, drop everything but ascii
/// letters/digits/spaces/hyphens, collapse whitespace and hyphen runs to a
/// single hyphen, and trim edge hyphens.
///
/// Idempotent: `slugify(slugify(s)) == slugify(s)`.
pub fn slugify(title: &str) -> String {
  let folded: String = title
    .to_lowercase()
    .nfd()
    .filter(|c| !is_combining_mark(*c))
    .collect();

  let mut slug = String::with_capacity(folded.len());
  let mut pending_hyphen = false;
  for c in folded.chars() {
    if c.is_ascii_alphanumeric() {
      if pending_hyphen && !slug.is_empty() {
        slug.push('-');
      }
      pending_hyphen = false;
      slug.push(c);
    } else if c.is_whitespace() || c == '-' {
      pending_hyphen = true;
    }
    // Everything else (punctuation, symbols, leftover non-ascii) is dropped.
  }

  slug
}

#[cfg(test)]
mod tests {
  use super::*;

  #[test]
  fn strips_diacritics_and_punctuation() {
    assert_eq!(slugify("¡Gran Victoria! En el Sur"), "gran-victoria-en-el-sur");
    assert_eq!(slugify("Fútbol: Año Nuevo"), "futbol-ano-nuevo");
  }

  #[test]
  fn collapses_whitespace_and_hyphen_runs() {
    assert_eq!(slugify("uno   dos -- tres"), "uno-dos-tres");
  }

  #[test]
  fn no_edge_hyphens() {
    assert_eq!(slugify("  ¿y ahora qué?  "), "y-ahora-que");
    assert_eq!(slugify("---"), "");
  }

  #[test]
  fn idempotent() {
    for title in [
      "¡Gran Victoria! En el Sur",
      "Clásico 2024 — la previa",
      "ya-es-un-slug",
      "",
    ] {
      let once = slugify(title);
      assert_eq!(slugify(&once), once);
    }
  }

  #[test]
  fn only_allowed_characters() {
    let slug = slugify("El Rojo ganó 3–1 (¡golazo de María!)");
    assert!(slug
      .chars()
      .all(|c| c.is_ascii_lowercase() || c.is_ascii_digit() || c == '-'));
    assert!(!slug.starts_with('-') && !slug.ends_with('-'));
    assert!(!slug.contains("--"));
  }
}
