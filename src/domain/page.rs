use derive_more::derive::Display;

/// A stored wiki page. Pages that have no row yet are represented by `None`
/// at the repository boundary, never by a placeholder `Page`.
#[derive(Debug, Clone, PartialEq, Eq, Display)]
#[display("{} (#{})", name, id)]
pub struct Page {
    pub id: i64,
    pub name: String,
    pub content: String,
}
