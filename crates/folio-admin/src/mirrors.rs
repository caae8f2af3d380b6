//! The full set of mirrors the admin panel owns, one per collection.

use folio_core::{
  Collection, Listed, Singleton,
  content::{
    About, Education, Experience, Profile, Project, Skill, SocialLink, SoftSkill,
    TechFocus,
  },
};

use crate::mirror::{CollectionMirror, MirrorView, SingletonMirror};

#[derive(Debug, Default)]
pub struct Mirrors {
  pub profile:      SingletonMirror<Profile>,
  pub about:        SingletonMirror<About>,
  pub social_links: CollectionMirror<SocialLink>,
  pub skills:       CollectionMirror<Skill>,
  pub soft_skills:  CollectionMirror<SoftSkill>,
  pub tech_focus:   CollectionMirror<TechFocus>,
  pub projects:     CollectionMirror<Project>,
  pub experiences:  CollectionMirror<Experience>,
  pub education:    CollectionMirror<Education>,
}

impl Mirrors {
  pub fn view(&self, collection: Collection) -> &dyn MirrorView {
    match collection {
      Collection::Profile => &self.profile,
      Collection::About => &self.about,
      Collection::SocialLinks => &self.social_links,
      Collection::Skills => &self.skills,
      Collection::SoftSkills => &self.soft_skills,
      Collection::TechFocus => &self.tech_focus,
      Collection::Projects => &self.projects,
      Collection::Experiences => &self.experiences,
      Collection::Education => &self.education,
    }
  }
}

/// A list entity with a mirror slot in [`Mirrors`].
pub trait Mirrored: Listed {
  fn mirror(mirrors: &Mirrors) -> &CollectionMirror<Self>;

  fn mirror_mut(mirrors: &mut Mirrors) -> &mut CollectionMirror<Self>;
}

/// A singleton entity with a mirror slot in [`Mirrors`].
pub trait MirroredSingleton: Singleton {
  fn mirror(mirrors: &Mirrors) -> &SingletonMirror<Self>;

  fn mirror_mut(mirrors: &mut Mirrors) -> &mut SingletonMirror<Self>;
}

macro_rules! mirrored {
  ($ty:ty, $field:ident) => {
    impl Mirrored for $ty {
      fn mirror(mirrors: &Mirrors) -> &CollectionMirror<Self> { &mirrors.$field }

      fn mirror_mut(mirrors: &mut Mirrors) -> &mut CollectionMirror<Self> {
        &mut mirrors.$field
      }
    }
  };
}

mirrored!(SocialLink, social_links);
mirrored!(Skill, skills);
mirrored!(SoftSkill, soft_skills);
mirrored!(TechFocus, tech_focus);
mirrored!(Project, projects);
mirrored!(Experience, experiences);
mirrored!(Education, education);

impl MirroredSingleton for Profile {
  fn mirror(mirrors: &Mirrors) -> &SingletonMirror<Self> { &mirrors.profile }

  fn mirror_mut(mirrors: &mut Mirrors) -> &mut SingletonMirror<Self> { &mut mirrors.profile }
}

impl MirroredSingleton for About {
  fn mirror(mirrors: &Mirrors) -> &SingletonMirror<Self> { &mirrors.about }

  fn mirror_mut(mirrors: &mut Mirrors) -> &mut SingletonMirror<Self> { &mut mirrors.about }
}
