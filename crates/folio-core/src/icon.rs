//! Closed set of icon identifiers stored in content records.
//!
//! Records keep the identifier as a plain string. Writes are checked against
//! this enumeration; reads resolve through [`Icon::resolve`], which falls back
//! to [`Icon::Unknown`] instead of failing.

use std::str::FromStr;

use strum::{Display, EnumIter, EnumString, IntoStaticStr};

use crate::error::{Problem, ValidationError};

#[derive(
  Debug, Clone, Copy, PartialEq, Eq, Hash, Display, EnumIter, EnumString, IntoStaticStr,
)]
#[strum(serialize_all = "kebab-case")]
pub enum Icon {
  Github,
  Linkedin,
  Mail,
  MessageCircle,
  Users,
  Target,
  Lightbulb,
  Code,
  Database,
  Brain,
  Bot,
  Award,
  Star,
  GraduationCap,
  Briefcase,
  Settings,
  Image,
  Globe,
  Cloud,
  Terminal,
  Heart,
  Zap,
  BookOpen,
  FolderOpen,
  BarChart,
  /// Stand-in for identifiers outside the known set. Never parsed.
  #[strum(disabled)]
  Unknown,
}

impl Icon {
  /// Parse a stored identifier, case-insensitively. `None` for unknown names.
  pub fn parse(name: &str) -> Option<Self> {
    Self::from_str(&name.trim().to_ascii_lowercase()).ok()
  }

  /// Resolve a stored identifier for rendering, falling back to
  /// [`Icon::Unknown`].
  pub fn resolve(name: &str) -> Self {
    Self::parse(name).unwrap_or_else(|| {
      tracing::warn!(icon = name, "unknown icon identifier; using fallback");
      Self::Unknown
    })
  }

  /// Single-cell glyph for terminal rendering.
  pub fn glyph(self) -> &'static str {
    match self {
      Self::Github | Self::Code | Self::Terminal => "⌨",
      Self::Linkedin | Self::Users => "👥",
      Self::Mail => "✉",
      Self::MessageCircle => "💬",
      Self::Target => "◎",
      Self::Lightbulb => "💡",
      Self::Database => "🗄",
      Self::Brain => "🧠",
      Self::Bot => "🤖",
      Self::Award => "🏅",
      Self::Star => "★",
      Self::GraduationCap => "🎓",
      Self::Briefcase => "💼",
      Self::Settings => "⚙",
      Self::Image => "🖼",
      Self::Globe => "🌐",
      Self::Cloud => "☁",
      Self::Heart => "♥",
      Self::Zap => "⚡",
      Self::BookOpen => "📖",
      Self::FolderOpen => "📂",
      Self::BarChart => "📊",
      Self::Unknown => "•",
    }
  }
}

/// Reject identifiers outside the known set.
pub fn require_icon(field: &str, name: &str) -> Result<(), ValidationError> {
  if name.trim().is_empty() {
    return Err(ValidationError::missing(field));
  }
  match Icon::parse(name) {
    Some(_) => Ok(()),
    None => Err(ValidationError::new(field, Problem::UnknownIcon(name.to_owned()))),
  }
}
