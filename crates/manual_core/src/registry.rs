use crate::SiteProfile;

/// Ordered list of site profiles. Order is the scan order for matching.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct SourceRegistry {
    profiles: Vec<SiteProfile>,
}

impl SourceRegistry {
    pub fn new(profiles: Vec<SiteProfile>) -> Self {
        Self { profiles }
    }

    pub fn with_defaults() -> Self {
        Self::new(default_sources())
    }

    pub fn profiles(&self) -> &[SiteProfile] {
        &self.profiles
    }

    pub fn len(&self) -> usize {
        self.profiles.len()
    }

    pub fn is_empty(&self) -> bool {
        self.profiles.is_empty()
    }

    pub fn replace(&mut self, profiles: Vec<SiteProfile>) {
        self.profiles = profiles;
    }

    /// Returns the first profile whose `domain_match` occurs anywhere in `url`.
    ///
    /// Several profiles may match the same URL; the earliest one in the list
    /// wins. An absent or empty URL never matches.
    pub fn match_profile(&self, url: Option<&str>) -> Option<&SiteProfile> {
        let url = url.filter(|u| !u.is_empty())?;
        self.profiles
            .iter()
            .find(|profile| url.contains(profile.domain_match.as_str()))
    }

    pub fn find_by_name(&self, name: &str) -> Option<&SiteProfile> {
        self.profiles.iter().find(|profile| profile.name == name)
    }
}

impl Default for SourceRegistry {
    fn default() -> Self {
        Self::with_defaults()
    }
}

/// Built-in profiles used until the operator stores a list of their own.
pub fn default_sources() -> Vec<SiteProfile> {
    vec![
        SiteProfile {
            name: "Oobj BC".to_string(),
            domain_match: "oobj.com.br".to_string(),
            base_url: "https://oobj.com.br/bc/".to_string(),
            title_selector: "article.conteudo h1, h1.entry-title, h1".to_string(),
            content_selector: "article.conteudo, div.kb-article-content, div.entry-content"
                .to_string(),
            article_links_selector: Some(r#"a[href*="/bc/"]"#.to_string()),
        },
        SiteProfile {
            name: "Wikipedia".to_string(),
            domain_match: "wikipedia.org".to_string(),
            base_url: "https://pt.wikipedia.org/".to_string(),
            title_selector: "h1#firstHeading".to_string(),
            content_selector: "div#mw-content-text .mw-parser-output".to_string(),
            article_links_selector: None,
        },
    ]
}
