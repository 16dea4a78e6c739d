use serde::{Deserialize, Deserializer, Serialize};
use std::fmt;

/// Nav entry identifier.
///
/// The backend hands out either numbers or strings; both are kept as-is so a
/// save writes back exactly what a load produced.
#[derive(Serialize, Deserialize, Clone, Debug, PartialEq, Eq, PartialOrd, Ord, Hash)]
#[serde(untagged)]
pub(crate) enum NavId {
    Num(i64),
    Text(String),
}

impl fmt::Display for NavId {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            NavId::Num(n) => write!(f, "{n}"),
            NavId::Text(s) => f.write_str(s),
        }
    }
}

impl From<&str> for NavId {
    fn from(s: &str) -> Self {
        NavId::Text(s.to_string())
    }
}

impl From<i64> for NavId {
    fn from(n: i64) -> Self {
        NavId::Num(n)
    }
}

/// One entry of the navigation tree.
///
/// `children` is owned by this node. Fields the backend sends that we do not
/// model are kept in `extra` and written back on save.
#[derive(Serialize, Deserialize, Clone, Debug, PartialEq)]
pub(crate) struct NavNode {
    pub id: NavId,

    #[serde(default)]
    pub title: String,

    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub target: Option<String>,

    /// Absent means visible.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub visible: Option<bool>,

    /// Sort key within siblings.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub order: Option<i64>,

    #[serde(
        default,
        deserialize_with = "null_as_empty",
        skip_serializing_if = "Vec::is_empty"
    )]
    pub children: Vec<NavNode>,

    #[serde(flatten)]
    pub extra: serde_json::Map<String, serde_json::Value>,
}

fn null_as_empty<'de, D>(deserializer: D) -> Result<Vec<NavNode>, D::Error>
where
    D: Deserializer<'de>,
{
    Ok(Option::<Vec<NavNode>>::deserialize(deserializer)?.unwrap_or_default())
}

impl NavNode {
    #[cfg(test)]
    pub fn new(id: impl Into<NavId>, title: impl Into<String>) -> Self {
        Self {
            id: id.into(),
            title: title.into(),
            target: None,
            visible: None,
            order: None,
            children: Vec::new(),
            extra: serde_json::Map::new(),
        }
    }

    #[cfg(test)]
    pub fn with_order(mut self, order: i64) -> Self {
        self.order = Some(order);
        self
    }

    #[cfg(test)]
    pub fn with_children(mut self, children: Vec<NavNode>) -> Self {
        self.children = children;
        self
    }

    pub fn is_visible(&self) -> bool {
        self.visible != Some(false)
    }

    pub fn has_children(&self) -> bool {
        !self.children.is_empty()
    }

    pub fn order_key(&self) -> i64 {
        self.order.unwrap_or(0)
    }

    /// Where the row links to in view mode. Parents only expand, never navigate.
    pub fn link(&self) -> Option<String> {
        (!self.has_children()).then(|| self.href())
    }

    /// Route a leaf links to. An explicit `target` wins; otherwise only the
    /// dashboard entry has a real page.
    pub fn href(&self) -> String {
        match self.target.as_deref().map(str::trim) {
            Some(t) if !t.is_empty() => t.to_string(),
            _ if self.title == "Dashboard" => "/".to_string(),
            _ => "/empty".to_string(),
        }
    }
}

/// A reorder inside one sibling list. Also the body of `POST /nav/track`.
#[derive(Serialize, Deserialize, Clone, Debug, PartialEq, Eq)]
pub(crate) struct NavMove {
    pub id: NavId,
    pub from: usize,
    pub to: usize,
}
