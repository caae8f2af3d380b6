//! The nine named collections that make up a portfolio.

use serde::{Deserialize, Serialize};
use strum::{Display, EnumIter, EnumString, IntoStaticStr};

/// Whether a collection holds one record or an ordered list of them.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum CollectionKind {
  /// At most one live record; written with upsert.
  Singleton,
  /// Many records, presented by `display_order`.
  List,
}

/// One named category of records.
///
/// The string form (`Display` / `FromStr` / serde) is the storage key and the
/// URL path segment. It matches the hosted database's table names.
#[derive(
  Debug,
  Clone,
  Copy,
  PartialEq,
  Eq,
  Hash,
  PartialOrd,
  Ord,
  Serialize,
  Deserialize,
  Display,
  EnumIter,
  EnumString,
  IntoStaticStr,
)]
pub enum Collection {
  #[serde(rename = "hero_content")]
  #[strum(serialize = "hero_content")]
  Profile,
  #[serde(rename = "about_content")]
  #[strum(serialize = "about_content")]
  About,
  #[serde(rename = "social_links")]
  #[strum(serialize = "social_links")]
  SocialLinks,
  #[serde(rename = "skills")]
  #[strum(serialize = "skills")]
  Skills,
  #[serde(rename = "soft_skills")]
  #[strum(serialize = "soft_skills")]
  SoftSkills,
  #[serde(rename = "tech_focus")]
  #[strum(serialize = "tech_focus")]
  TechFocus,
  #[serde(rename = "projects")]
  #[strum(serialize = "projects")]
  Projects,
  #[serde(rename = "experiences")]
  #[strum(serialize = "experiences")]
  Experiences,
  #[serde(rename = "education")]
  #[strum(serialize = "education")]
  Education,
}

impl Collection {
  pub fn kind(self) -> CollectionKind {
    match self {
      Self::Profile | Self::About => CollectionKind::Singleton,
      _ => CollectionKind::List,
    }
  }

  pub fn is_singleton(self) -> bool { self.kind() == CollectionKind::Singleton }

  /// The storage key / path segment, e.g. `"soft_skills"`.
  pub fn key(self) -> &'static str { self.into() }

  /// Human-readable section title.
  pub fn label(self) -> &'static str {
    match self {
      Self::Profile => "Profile",
      Self::About => "About",
      Self::SocialLinks => "Social links",
      Self::Skills => "Skills",
      Self::SoftSkills => "Soft skills",
      Self::TechFocus => "Tech focus",
      Self::Projects => "Projects",
      Self::Experiences => "Experience",
      Self::Education => "Education",
    }
  }
}
