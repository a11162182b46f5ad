use serde::{Deserialize, Serialize};
use std::collections::BTreeMap;

const PORTFOLIO_LINK: &str = "https://www.behance.net/emreaydn37";

const ABOUT_ME: &str = "I am a Full stack Developer and 3D designer with a passion for creating \
immersive and visually stunning experiences. With a background in Software Engineering, I \
specialize in crafting detailed 3D models, animations, and interactive environments. My work is \
driven by a desire to push the boundaries of creativity and innovation, blending vision with \
technical expertise to bring ideas to life in the digital realm.";

/// What the info overlay shows for an interactable.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct InfoContent {
    pub title: String,
    pub body: String,
    /// Without a link the entry is display-only.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub link: Option<String>,
}

impl InfoContent {
    pub fn new(title: impl Into<String>, body: impl Into<String>) -> Self {
        Self {
            title: title.into(),
            body: body.into(),
            link: None,
        }
    }

    pub fn with_link(mut self, link: impl Into<String>) -> Self {
        self.link = Some(link.into());
        self
    }
}

/// Which nodes react to the pointer and what clicking them does.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct InteractionConfig {
    /// Node names that can be hovered and clicked.
    pub allow_list: Vec<String>,
    /// Overlay content per node name.
    pub content: BTreeMap<String, InfoContent>,
    /// Node names whose click opens a URL straight away.
    pub direct_links: BTreeMap<String, String>,
}

impl Default for InteractionConfig {
    fn default() -> Self {
        let allow_list = ["Advertise", "Project_1", "Project_2", "Text002", "Shoes"]
            .into_iter()
            .map(String::from)
            .collect();

        let content = BTreeMap::from([
            (
                "Advertise".to_string(),
                InfoContent::new("Advertisement", "This is Advertise").with_link(PORTFOLIO_LINK),
            ),
            (
                "Project_1".to_string(),
                InfoContent::new("Project One", "This is Project one").with_link(PORTFOLIO_LINK),
            ),
            (
                "Project_2".to_string(),
                InfoContent::new("Project Two", "This is Project two").with_link(PORTFOLIO_LINK),
            ),
            ("Shoes".to_string(), InfoContent::new("About Me", ABOUT_ME)),
        ]);

        let direct_links =
            BTreeMap::from([("Scene".to_string(), "https://www.example.com".to_string())]);

        Self {
            allow_list,
            content,
            direct_links,
        }
    }
}

impl InteractionConfig {
    /// Every name a hit can resolve to: allow-list names followed by
    /// direct-link names not already listed. Only allow-listed subtrees are
    /// ray targets.
    pub fn pickable_names(&self) -> Vec<&str> {
        let mut names: Vec<&str> = Vec::new();
        for name in self
            .allow_list
            .iter()
            .chain(self.direct_links.keys())
            .map(String::as_str)
        {
            if !names.contains(&name) {
                names.push(name);
            }
        }
        names
    }
}
