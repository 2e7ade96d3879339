// Symbolic icon names used by builder-defined navigation and the tab strip.
// Unknown names resolve to `Icon::Fallback`.

use serde::{Deserialize, Serialize};

use crate::types::tab::TabKind;

#[derive(Debug, Clone, Copy, Serialize, Deserialize, PartialEq, Eq, Hash)]
#[serde(rename_all = "snake_case")]
pub enum Icon {
    Dashboard,
    List,
    Record,
    Builder,
    Users,
    Chart,
    Automation,
    Settings,
    Fallback,
}

const ICON_TABLE: &[(&str, Icon)] = &[
    ("dashboard", Icon::Dashboard),
    ("home", Icon::Dashboard),
    ("list", Icon::List),
    ("table", Icon::List),
    ("record", Icon::Record),
    ("file", Icon::Record),
    ("builder", Icon::Builder),
    ("users", Icon::Users),
    ("user", Icon::Users),
    ("chart", Icon::Chart),
    ("bar-chart", Icon::Chart),
    ("automation", Icon::Automation),
    ("workflow", Icon::Automation),
    ("settings", Icon::Settings),
    ("cog", Icon::Settings),
];

impl Icon {
    /// Case-insensitive lookup by symbolic name.
    pub fn from_name(name: &str) -> Self {
        let name = name.trim().to_ascii_lowercase();
        ICON_TABLE
            .iter()
            .find(|(key, _)| *key == name)
            .map(|(_, icon)| *icon)
            .unwrap_or(Icon::Fallback)
    }

    pub fn for_kind(kind: TabKind) -> Self {
        match kind {
            TabKind::Dashboard => Icon::Dashboard,
            TabKind::ListPage => Icon::List,
            TabKind::RecordDetail => Icon::Record,
            TabKind::BuilderPage => Icon::Builder,
        }
    }
}
