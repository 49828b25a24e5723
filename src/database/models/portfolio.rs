use serde::{de::DeserializeOwned, Deserialize, Serialize};
use uuid::Uuid;

fn new_id() -> String {
    Uuid::new_v4().to_string()
}

/// Singleton content sections. Exactly one document per section is kept.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum Section {
    Hero,
    About,
    Contact,
}

impl Section {
    pub fn as_str(&self) -> &'static str {
        match self {
            Section::Hero => "hero",
            Section::About => "about",
            Section::Contact => "contact",
        }
    }
}

/// Multi-document content collections, addressed by document id.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum Collection {
    Skills,
    Projects,
}

impl Collection {
    pub fn as_str(&self) -> &'static str {
        match self {
            Collection::Skills => "skills",
            Collection::Projects => "projects",
        }
    }
}

/// A document type stored as the one instance of a `Section`.
pub trait SectionDocument: Serialize + DeserializeOwned + Send + Sync + 'static {
    const SECTION: Section;
    /// Human-readable name used in response messages.
    const LABEL: &'static str;
}

/// A document type stored in a `Collection`.
pub trait CollectionItem: Serialize + DeserializeOwned + Send + Sync + 'static {
    const COLLECTION: Collection;
    const LABEL: &'static str;

    fn id(&self) -> &str;
    fn set_id(&mut self, id: String);
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct HeroSection {
    #[serde(default = "new_id")]
    pub id: String,
    pub name: String,
    pub title: String,
    pub tagline: String,
    pub image_url: String,
    #[serde(default)]
    pub resume_url: Option<String>,
}

impl SectionDocument for HeroSection {
    const SECTION: Section = Section::Hero;
    const LABEL: &'static str = "Hero section";
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct AboutSection {
    #[serde(default = "new_id")]
    pub id: String,
    pub text_en: String,
    pub text_bn: String,
}

impl SectionDocument for AboutSection {
    const SECTION: Section = Section::About;
    const LABEL: &'static str = "About section";
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct ContactInfo {
    #[serde(default = "new_id")]
    pub id: String,
    pub email: String,
    #[serde(default)]
    pub phone: Option<String>,
    pub location: String,
    #[serde(default)]
    pub github: Option<String>,
    #[serde(default)]
    pub linkedin: Option<String>,
    #[serde(default)]
    pub twitter: Option<String>,
}

impl SectionDocument for ContactInfo {
    const SECTION: Section = Section::Contact;
    const LABEL: &'static str = "Contact info";
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Skill {
    #[serde(default = "new_id")]
    pub id: String,
    pub name: String,
    /// Frontend, Backend, DevOps, Mobile, ...
    pub category: String,
    #[serde(default)]
    pub icon: Option<String>,
    #[serde(default)]
    pub order: i64,
}

impl CollectionItem for Skill {
    const COLLECTION: Collection = Collection::Skills;
    const LABEL: &'static str = "Skill";

    fn id(&self) -> &str {
        &self.id
    }

    fn set_id(&mut self, id: String) {
        self.id = id;
    }
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Project {
    #[serde(default = "new_id")]
    pub id: String,
    pub title: String,
    pub description_en: String,
    pub description_bn: String,
    pub tech_stack: Vec<String>,
    #[serde(default)]
    pub image_url: Option<String>,
    #[serde(default)]
    pub project_url: Option<String>,
    #[serde(default)]
    pub github_url: Option<String>,
    #[serde(default)]
    pub order: i64,
}

impl CollectionItem for Project {
    const COLLECTION: Collection = Collection::Projects;
    const LABEL: &'static str = "Project";

    fn id(&self) -> &str {
        &self.id
    }

    fn set_id(&mut self, id: String) {
        self.id = id;
    }
}
