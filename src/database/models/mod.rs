pub mod admin;
pub mod portfolio;

pub use admin::AdminCredential;
pub use portfolio::{
    AboutSection, Collection, CollectionItem, ContactInfo, HeroSection, Project, Section,
    SectionDocument, Skill,
};
