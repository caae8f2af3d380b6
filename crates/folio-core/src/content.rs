//! Payload types for the nine portfolio collections.
//!
//! Field names are the snake_case column names of the hosted database, which
//! is also the JSON shape on the wire.

use serde::{Deserialize, Serialize};

use crate::{
  collection::Collection,
  entity::{Entity, Listed, Singleton, require, require_range},
  error::ValidationError,
  icon::require_icon,
};

fn active() -> bool { true }

/// Implements [`Listed`] for a payload with `display_order` / `is_active`.
macro_rules! listed {
  ($ty:ty) => {
    impl Listed for $ty {
      fn display_order(&self) -> u32 { self.display_order }

      fn is_active(&self) -> bool { self.is_active }

      fn set_active(&mut self, active: bool) { self.is_active = active; }
    }
  };
}

// ─── Singletons ──────────────────────────────────────────────────────────────

/// The hero section.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct Profile {
  pub name:              String,
  pub role:              String,
  #[serde(default)]
  pub focus:             String,
  #[serde(default)]
  pub experience_years:  u32,
  #[serde(default)]
  pub description:       String,
  pub profile_image_url: Option<String>,
}

impl Entity for Profile {
  const COLLECTION: Collection = Collection::Profile;

  fn validate(&self) -> Result<(), ValidationError> {
    require("name", &self.name)?;
    require("role", &self.role)
  }

  fn label(&self) -> &str { &self.name }
}

impl Singleton for Profile {}

/// The about section.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct About {
  #[serde(default)]
  pub section_title:      String,
  pub personal_story:     String,
  pub support_experience: String,
  #[serde(default)]
  pub people_supported:   u32,
  /// Percentage, 0–100.
  #[serde(default)]
  pub satisfaction_rate:  i32,
  pub professional_goal:  String,
}

impl Default for About {
  fn default() -> Self {
    Self {
      section_title:      "About me".into(),
      personal_story:     String::new(),
      support_experience: String::new(),
      people_supported:   0,
      satisfaction_rate:  0,
      professional_goal:  String::new(),
    }
  }
}

impl Entity for About {
  const COLLECTION: Collection = Collection::About;

  fn validate(&self) -> Result<(), ValidationError> {
    require("personal_story", &self.personal_story)?;
    require("support_experience", &self.support_experience)?;
    require("professional_goal", &self.professional_goal)?;
    require_range("satisfaction_rate", self.satisfaction_rate.into(), 0, 100)
  }

  fn label(&self) -> &str { &self.section_title }
}

impl Singleton for About {}

// ─── Social links ────────────────────────────────────────────────────────────

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct SocialLink {
  pub platform:      String,
  pub url:           String,
  pub icon:          String,
  /// Presentation colour token, e.g. `"vs-blue"`.
  pub color:         String,
  #[serde(default)]
  pub display_order: u32,
  #[serde(default = "active")]
  pub is_active:     bool,
}

impl Default for SocialLink {
  fn default() -> Self {
    Self {
      platform:      String::new(),
      url:           String::new(),
      icon:          String::new(),
      color:         String::new(),
      display_order: 0,
      is_active:     true,
    }
  }
}

impl Entity for SocialLink {
  const COLLECTION: Collection = Collection::SocialLinks;

  fn validate(&self) -> Result<(), ValidationError> {
    require("platform", &self.platform)?;
    require("url", &self.url)?;
    require_icon("icon", &self.icon)?;
    require("color", &self.color)
  }

  fn label(&self) -> &str { &self.platform }
}

listed!(SocialLink);

// ─── Skills ──────────────────────────────────────────────────────────────────

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Skill {
  pub name:              String,
  /// Percentage, 0–100.
  pub proficiency_level: i32,
  /// Free tag such as `"backend"`, `"database"`, `"tools"`, `"ai"`.
  pub category:          String,
  pub icon:              Option<String>,
  pub color:             Option<String>,
  #[serde(default)]
  pub display_order:     u32,
  #[serde(default = "active")]
  pub is_active:         bool,
}

impl Default for Skill {
  fn default() -> Self {
    Self {
      name:              String::new(),
      proficiency_level: 0,
      category:          "backend".into(),
      icon:              None,
      color:             None,
      display_order:     0,
      is_active:         true,
    }
  }
}

impl Entity for Skill {
  const COLLECTION: Collection = Collection::Skills;

  fn validate(&self) -> Result<(), ValidationError> {
    require("name", &self.name)?;
    require_range("proficiency_level", self.proficiency_level.into(), 0, 100)?;
    require("category", &self.category)?;
    match &self.icon {
      Some(icon) if !icon.trim().is_empty() => require_icon("icon", icon),
      _ => Ok(()),
    }
  }

  fn label(&self) -> &str { &self.name }
}

listed!(Skill);

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct SoftSkill {
  pub title:         String,
  pub description:   String,
  pub icon:          String,
  pub color:         String,
  #[serde(default)]
  pub display_order: u32,
  #[serde(default = "active")]
  pub is_active:     bool,
}

impl Default for SoftSkill {
  fn default() -> Self {
    Self {
      title:         String::new(),
      description:   String::new(),
      icon:          String::new(),
      color:         String::new(),
      display_order: 0,
      is_active:     true,
    }
  }
}

impl Entity for SoftSkill {
  const COLLECTION: Collection = Collection::SoftSkills;

  fn validate(&self) -> Result<(), ValidationError> {
    require("title", &self.title)?;
    require("description", &self.description)?;
    require_icon("icon", &self.icon)?;
    require("color", &self.color)
  }

  fn label(&self) -> &str { &self.title }
}

listed!(SoftSkill);

/// An area of technical focus with the technologies it covers.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct TechFocus {
  pub title:         String,
  pub description:   String,
  pub icon:          String,
  #[serde(default)]
  pub technologies:  Vec<String>,
  #[serde(default)]
  pub display_order: u32,
  #[serde(default = "active")]
  pub is_active:     bool,
}

impl Default for TechFocus {
  fn default() -> Self {
    Self {
      title:         String::new(),
      description:   String::new(),
      icon:          String::new(),
      technologies:  Vec::new(),
      display_order: 0,
      is_active:     true,
    }
  }
}

impl Entity for TechFocus {
  const COLLECTION: Collection = Collection::TechFocus;
  const LIST_FIELDS: &'static [&'static str] = &["technologies"];

  fn validate(&self) -> Result<(), ValidationError> {
    require("title", &self.title)?;
    require("description", &self.description)?;
    require_icon("icon", &self.icon)
  }

  fn label(&self) -> &str { &self.title }
}

listed!(TechFocus);

// ─── Projects ────────────────────────────────────────────────────────────────

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Project {
  pub name:          String,
  pub description:   String,
  pub github_url:    String,
  pub live_url:      Option<String>,
  #[serde(default)]
  pub technologies:  Vec<String>,
  #[serde(default)]
  pub stars:         u32,
  #[serde(default)]
  pub forks:         u32,
  #[serde(default)]
  pub display_order: u32,
  #[serde(default = "active")]
  pub is_active:     bool,
}

impl Default for Project {
  fn default() -> Self {
    Self {
      name:          String::new(),
      description:   String::new(),
      github_url:    String::new(),
      live_url:      None,
      technologies:  Vec::new(),
      stars:         0,
      forks:         0,
      display_order: 0,
      is_active:     true,
    }
  }
}

impl Entity for Project {
  const COLLECTION: Collection = Collection::Projects;
  const LIST_FIELDS: &'static [&'static str] = &["technologies"];

  fn validate(&self) -> Result<(), ValidationError> {
    require("name", &self.name)?;
    require("description", &self.description)?;
    require("github_url", &self.github_url)
  }

  fn label(&self) -> &str { &self.name }
}

listed!(Project);

// ─── Experience ──────────────────────────────────────────────────────────────

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Experience {
  pub title:         String,
  pub company:       String,
  #[serde(default)]
  pub location:      String,
  #[serde(default)]
  pub period:        String,
  #[serde(default)]
  pub description:   String,
  #[serde(default)]
  pub achievements:  Vec<String>,
  #[serde(default)]
  pub technologies:  Vec<String>,
  #[serde(default)]
  pub display_order: u32,
  #[serde(default = "active")]
  pub is_active:     bool,
}

impl Default for Experience {
  fn default() -> Self {
    Self {
      title:         String::new(),
      company:       String::new(),
      location:      String::new(),
      period:        String::new(),
      description:   String::new(),
      achievements:  Vec::new(),
      technologies:  Vec::new(),
      display_order: 0,
      is_active:     true,
    }
  }
}

impl Entity for Experience {
  const COLLECTION: Collection = Collection::Experiences;
  const LIST_FIELDS: &'static [&'static str] = &["achievements", "technologies"];

  fn validate(&self) -> Result<(), ValidationError> {
    require("title", &self.title)?;
    require("company", &self.company)
  }

  fn label(&self) -> &str { &self.title }
}

listed!(Experience);

// ─── Education ───────────────────────────────────────────────────────────────

#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize)]
#[serde(rename_all = "kebab-case")]
pub enum EducationStatus {
  #[default]
  Completed,
  InProgress,
  Planned,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Education {
  pub degree:        String,
  /// Field of study.
  #[serde(default)]
  pub field:         String,
  pub institution:   String,
  #[serde(default)]
  pub period:        String,
  #[serde(default)]
  pub status:        EducationStatus,
  pub description:   Option<String>,
  #[serde(default, alias = "achievements")]
  pub highlights:    Vec<String>,
  #[serde(default)]
  pub display_order: u32,
  #[serde(default = "active")]
  pub is_active:     bool,
}

impl Default for Education {
  fn default() -> Self {
    Self {
      degree:        String::new(),
      field:         String::new(),
      institution:   String::new(),
      period:        String::new(),
      status:        EducationStatus::default(),
      description:   None,
      highlights:    Vec::new(),
      display_order: 0,
      is_active:     true,
    }
  }
}

impl Entity for Education {
  const COLLECTION: Collection = Collection::Education;
  const LIST_FIELDS: &'static [&'static str] = &["highlights"];

  fn validate(&self) -> Result<(), ValidationError> {
    require("degree", &self.degree)?;
    require("institution", &self.institution)
  }

  fn label(&self) -> &str { &self.degree }
}

listed!(Education);

#[cfg(test)]
mod tests {
  use super::*;
  use crate::error::Problem;

  #[test]
  fn skill_percentage_out_of_range_is_rejected() {
    let skill = Skill { name: "Rust".into(), proficiency_level: 150, ..Skill::default() };
    let err = skill.validate().unwrap_err();
    assert_eq!(err.field, "proficiency_level");
    assert_eq!(
      err.problem,
      Problem::OutOfRange { min: 0, max: 100, actual: 150 }
    );
  }

  #[test]
  fn whitespace_only_required_field_counts_as_missing() {
    let project = Project {
      name: "   ".into(),
      description: "d".into(),
      github_url: "https://github.com/x/y".into(),
      ..Project::default()
    };
    assert_eq!(project.validate().unwrap_err(), ValidationError::missing("name"));
  }

  #[test]
  fn social_link_requires_known_icon() {
    let link = SocialLink {
      platform: "GitHub".into(),
      url: "https://github.com/x".into(),
      icon: "octocat".into(),
      color: "vs-blue".into(),
      ..SocialLink::default()
    };
    assert!(matches!(
      link.validate().unwrap_err().problem,
      Problem::UnknownIcon(_)
    ));
  }

  #[test]
  fn list_payloads_default_to_active() {
    assert!(Project::default().is_active());
    assert!(Education::default().is_active());
  }

  #[test]
  fn education_accepts_legacy_achievements_column() {
    let edu: Education = serde_json::from_value(serde_json::json!({
      "degree": "BSc",
      "institution": "Uni",
      "status": "in-progress",
      "achievements": ["Thesis"]
    }))
    .unwrap();
    assert_eq!(edu.highlights, vec!["Thesis"]);
    assert_eq!(edu.status, EducationStatus::InProgress);
    assert!(edu.is_active);
  }
}
