use std::{collections::HashSet, fmt, fs, path::Path};

use itertools::Itertools;
use serde::{Deserialize, Serialize, Serializer};
use tracing::{info, trace};
use url::Url;

use crate::error::{DirectoryError, Result};

/// Label of the synthetic category that matches every record.
pub const ALL_CATEGORIES: &str = "All";

/// A single directory entry.  Records are immutable once they are part of a
/// `Catalog`.
#[derive(Clone, Debug, PartialEq, Eq, Serialize, Deserialize)]
pub struct Resource {
    pub id: u32,
    pub name: String,
    pub category: String,
    #[serde(default)]
    pub description: String,
    pub url: Url,
}

/// Identifier of a record that is known to be present in a catalog.  Only
/// `Catalog::resource_id` hands these out.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize)]
#[serde(transparent)]
pub struct ResourceId(u32);

impl ResourceId {
    pub fn get(self) -> u32 {
        self.0
    }
}

impl fmt::Display for ResourceId {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.0)
    }
}

/// The active filter: either the `All` sentinel or one concrete category.
#[derive(Clone, Debug, PartialEq, Eq, Hash, Default)]
pub enum CategoryFilter {
    #[default]
    All,
    Only(String),
}

impl CategoryFilter {
    pub fn label(&self) -> &str {
        match self {
            CategoryFilter::All => ALL_CATEGORIES,
            CategoryFilter::Only(category) => category,
        }
    }

    pub fn matches(&self, resource: &Resource) -> bool {
        match self {
            CategoryFilter::All => true,
            CategoryFilter::Only(category) => resource.category == *category,
        }
    }
}

impl fmt::Display for CategoryFilter {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.label())
    }
}

impl Serialize for CategoryFilter {
    fn serialize<S: Serializer>(&self, serializer: S) -> std::result::Result<S::Ok, S::Error> {
        serializer.serialize_str(self.label())
    }
}

/// The ordered, validated collection of all records.
#[derive(Clone, Debug, PartialEq, Eq)]
pub struct Catalog {
    resources: Vec<Resource>,
}

impl Catalog {
    /// Validate and wrap the given records, keeping their order.
    pub fn new(resources: Vec<Resource>) -> Result<Catalog> {
        let mut seen_ids = HashSet::new();
        for resource in &resources {
            if resource.id == 0 {
                return Err(DirectoryError::bad_input(format!(
                    "resource {:?} has id 0; ids must be positive",
                    resource.name
                )));
            }
            if !seen_ids.insert(resource.id) {
                return Err(DirectoryError::bad_input(format!(
                    "duplicate resource id {}",
                    resource.id
                )));
            }
            if resource.name.trim().is_empty() {
                return Err(DirectoryError::bad_input(format!(
                    "resource {} has an empty name",
                    resource.id
                )));
            }
            if resource.category.trim().is_empty() {
                return Err(DirectoryError::bad_input(format!(
                    "resource {} has an empty category",
                    resource.id
                )));
            }
            if resource.category == ALL_CATEGORIES {
                return Err(DirectoryError::bad_input(format!(
                    "resource {} uses the reserved category {:?}",
                    resource.id, ALL_CATEGORIES
                )));
            }
        }

        trace!(count = resources.len(), "catalog validated");
        Ok(Catalog { resources })
    }

    /// The compiled-in startup catalog.
    pub fn builtin() -> Catalog {
        let resources = BUILTIN_RESOURCES
            .iter()
            .map(|(id, name, category, description, url)| Resource {
                id: *id,
                name: name.to_string(),
                category: category.to_string(),
                description: description.to_string(),
                url: Url::parse(url).expect("builtin resource urls are well formed"),
            })
            .collect();
        Catalog::new(resources).expect("builtin catalog is valid")
    }

    /// Read a JSON array of records from disk.
    pub fn load<P: AsRef<Path>>(path: P) -> Result<Catalog> {
        let path = path.as_ref();
        let raw = fs::read_to_string(path)?;
        let resources: Vec<Resource> = serde_json::from_str(&raw)?;
        info!(path = %path.display(), count = resources.len(), "loaded catalog");
        Catalog::new(resources)
    }

    pub fn all_resources(&self) -> &[Resource] {
        &self.resources
    }

    pub fn len(&self) -> usize {
        self.resources.len()
    }

    pub fn is_empty(&self) -> bool {
        self.resources.is_empty()
    }

    /// The sentinel followed by every distinct category, each exactly once, in
    /// the order it is first seen.
    pub fn categories(&self) -> Vec<CategoryFilter> {
        std::iter::once(CategoryFilter::All)
            .chain(
                self.resources
                    .iter()
                    .map(|r| r.category.as_str())
                    .unique()
                    .map(|c| CategoryFilter::Only(c.to_string())),
            )
            .collect()
    }

    /// Resolve user-supplied text to a member of `categories()`.  Exact matches
    /// win; otherwise the first ASCII case-insensitive match is used.
    pub fn category(&self, name: &str) -> Option<CategoryFilter> {
        if name == ALL_CATEGORIES {
            return Some(CategoryFilter::All);
        }
        if self.resources.iter().any(|r| r.category == name) {
            return Some(CategoryFilter::Only(name.to_string()));
        }
        if name.eq_ignore_ascii_case(ALL_CATEGORIES) {
            return Some(CategoryFilter::All);
        }
        self.resources
            .iter()
            .find(|r| r.category.eq_ignore_ascii_case(name))
            .map(|r| CategoryFilter::Only(r.category.clone()))
    }

    pub fn contains_category(&self, filter: &CategoryFilter) -> bool {
        match filter {
            CategoryFilter::All => true,
            CategoryFilter::Only(category) => {
                self.resources.iter().any(|r| r.category == *category)
            }
        }
    }

    pub fn resource_id(&self, id: u32) -> Option<ResourceId> {
        self.resources
            .iter()
            .any(|r| r.id == id)
            .then_some(ResourceId(id))
    }

    pub fn get(&self, id: ResourceId) -> Option<&Resource> {
        self.resources.iter().find(|r| r.id == id.0)
    }
}

type BuiltinEntry = (u32, &'static str, &'static str, &'static str, &'static str);

static BUILTIN_RESOURCES: &[BuiltinEntry] = &[
    (1, "Y Combinator", "Funding", "Seed money for startups.", "https://www.ycombinator.com/"),
    (2, "Stripe Atlas", "Legal", "Incorporate your company.", "https://stripe.com/atlas"),
    (3, "Figma", "Design", "Interface design tool.", "https://www.figma.com/"),
    (4, "Linear", "Productivity", "Issue tracking built for speed.", "https://linear.app/"),
    (5, "Notion", "Knowledge", "All-in-one workspace.", "https://www.notion.so/"),
    (6, "Supabase", "Backend", "Open source Firebase alternative.", "https://supabase.com/"),
    (7, "Vercel", "Hosting", "Develop. Preview. Ship.", "https://vercel.com/"),
    (8, "PostHog", "Analytics", "Product analytics suite.", "https://posthog.com/"),
    (9, "Resend", "Email", "Email for developers.", "https://resend.com/"),
    (10, "Mercury", "Banking", "Banking for startups.", "https://mercury.com/"),
    (11, "Clerk", "Auth", "Authentication for React.", "https://clerk.com/"),
    (12, "Tailwind CSS", "Design", "Utility-first CSS framework.", "https://tailwindcss.com/"),
    (13, "Arc", "Productivity", "The browser for 2026.", "https://arc.net/"),
    (14, "Raycast", "Productivity", "Mac spotlight replacement.", "https://raycast.com/"),
    (15, "Midjourney", "AI", "Generative AI imagery.", "https://midjourney.com/"),
    (16, "OpenAI", "AI", "GPT models and API.", "https://openai.com/"),
    (17, "Cursor", "Dev", "AI code editor.", "https://cursor.sh/"),
    (18, "Plain", "Support", "Support for modern teams.", "https://plain.com/"),
];


#[cfg(test)]
mod tests {
    use std::io::Write;

    use super::test_support::{design_ai_design, resource};
    use super::*;

    fn labels(filters: &[CategoryFilter]) -> Vec<&str> {
        filters.iter().map(|f| f.label()).collect()
    }

    #[test]
    fn categories_are_first_seen_with_sentinel() {
        let catalog = design_ai_design();
        assert_eq!(labels(&catalog.categories()), vec!["All", "Design", "AI"]);
    }

    #[test]
    fn categories_are_stable_across_calls() {
        let catalog = Catalog::builtin();
        assert_eq!(catalog.categories(), catalog.categories());
    }

    #[test]
    fn builtin_catalog_matches_directory() {
        let catalog = Catalog::builtin();
        assert_eq!(catalog.len(), 18);
        assert_eq!(catalog.all_resources()[0].name, "Y Combinator");
        assert_eq!(catalog.all_resources()[17].name, "Plain");
        assert_eq!(
            labels(&catalog.categories()),
            vec![
                "All",
                "Funding",
                "Legal",
                "Design",
                "Productivity",
                "Knowledge",
                "Backend",
                "Hosting",
                "Analytics",
                "Email",
                "Banking",
                "Auth",
                "AI",
                "Dev",
                "Support",
            ]
        );
    }

    #[test]
    fn rejects_duplicate_ids() {
        let err = Catalog::new(vec![resource(1, "Design"), resource(1, "AI")]).unwrap_err();
        assert_eq!(err.layer(), &crate::error::ErrorLayer::BadInput);
        assert!(err.to_string().contains("duplicate resource id 1"));
    }

    #[test]
    fn rejects_zero_id_empty_fields_and_reserved_category() {
        assert!(Catalog::new(vec![resource(0, "Design")]).is_err());
        assert!(Catalog::new(vec![resource(1, "  ")]).is_err());
        assert!(Catalog::new(vec![resource(1, "All")]).is_err());

        let mut unnamed = resource(2, "Design");
        unnamed.name = String::new();
        assert!(Catalog::new(vec![unnamed]).is_err());
    }

    #[test]
    fn empty_description_is_fine() {
        let catalog = Catalog::new(vec![resource(1, "Design")]).unwrap();
        assert_eq!(catalog.all_resources()[0].description, "");
    }

    #[test]
    fn category_lookup_prefers_exact_then_ignores_case() {
        let catalog = design_ai_design();
        assert_eq!(catalog.category("All"), Some(CategoryFilter::All));
        assert_eq!(catalog.category("all"), Some(CategoryFilter::All));
        assert_eq!(
            catalog.category("ai"),
            Some(CategoryFilter::Only("AI".to_string()))
        );
        assert_eq!(
            catalog.category("Design"),
            Some(CategoryFilter::Only("Design".to_string()))
        );
        assert_eq!(catalog.category("Cooking"), None);
    }

    #[test]
    fn resource_id_only_for_known_ids() {
        let catalog = design_ai_design();
        let id = catalog.resource_id(2).unwrap();
        assert_eq!(catalog.get(id).unwrap().category, "AI");
        assert_eq!(catalog.resource_id(4), None);
    }

    #[test]
    fn loads_json_catalog() {
        let mut file = tempfile::NamedTempFile::new().unwrap();
        write!(
            file,
            r#"[
                {{"id": 7, "name": "Vercel", "category": "Hosting", "url": "https://vercel.com/"}},
                {{"id": 3, "name": "Figma", "category": "Design", "description": "Interface design tool.", "url": "https://www.figma.com/"}}
            ]"#
        )
        .unwrap();

        let catalog = Catalog::load(file.path()).unwrap();
        let ids: Vec<u32> = catalog.all_resources().iter().map(|r| r.id).collect();
        assert_eq!(ids, vec![7, 3]);
        assert_eq!(catalog.all_resources()[0].description, "");
    }

    #[test]
    fn malformed_url_is_a_data_problem() {
        let mut file = tempfile::NamedTempFile::new().unwrap();
        write!(
            file,
            r#"[{{"id": 1, "name": "Broken", "category": "Dev", "url": "not a url"}}]"#
        )
        .unwrap();

        let err = Catalog::load(file.path()).unwrap_err();
        assert_eq!(err.layer(), &crate::error::ErrorLayer::DataLayer);
    }
}
