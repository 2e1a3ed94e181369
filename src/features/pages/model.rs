use crate::services::protocol::PageLookup;
use serde::Deserialize;

pub const EMPTY_PAGE_MARKDOWN: &str = "# A new page\n\nFeel-free to write in Markdown!\n";

#[derive(Deserialize, Debug, Default)]
pub struct CreatePageForm {
    #[serde(default)]
    pub name: String,
}

#[derive(Deserialize, Debug, Default)]
pub struct SavePageForm {
    #[serde(default)]
    pub id: String,
    #[serde(default)]
    pub title: String,
    #[serde(default)]
    pub markdown: String,
    #[serde(rename = "newPage", default)]
    pub new_page: String,
}

impl SavePageForm {
    pub fn is_new_page(&self) -> bool {
        self.new_page == "yes"
    }
}

#[derive(Deserialize, Debug, Default)]
pub struct DeletePageForm {
    #[serde(default)]
    pub id: String,
}

/// Everything the page template needs. Missing pages get id `-1` and the
/// default markdown so the editor opens on a starter template.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct PageView {
    pub title: String,
    pub id: i64,
    pub new_page: bool,
    pub raw_content: String,
    pub html_content: String,
    pub timestamp: String,
}

impl PageView {
    pub fn from_lookup(
        title: &str,
        lookup: PageLookup,
        render: impl FnOnce(&str) -> String,
        timestamp: String,
    ) -> Self {
        let raw_content = match (lookup.found, lookup.content) {
            (true, Some(content)) => content,
            (true, None) => String::new(),
            (false, _) => EMPTY_PAGE_MARKDOWN.to_string(),
        };
        let html_content = render(&raw_content);

        Self {
            title: title.to_string(),
            id: lookup.id.filter(|_| lookup.found).unwrap_or(-1),
            new_page: !lookup.found,
            raw_content,
            html_content,
            timestamp,
        }
    }
}
