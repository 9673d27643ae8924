use partnerdesk_domain::NavigationEntry;
use serde::Serialize;
use ts_rs::TS;

/// Navigation entry visible to the current session.
#[derive(Debug, Serialize, TS)]
#[ts(
    export,
    export_to = "../../../packages/api-types/src/generated/navigation-entry-response.ts"
)]
pub struct NavigationEntryResponse {
    pub key: String,
    pub label: String,
    pub path: String,
    pub required_privileges: Vec<String>,
}

impl From<NavigationEntry> for NavigationEntryResponse {
    fn from(entry: NavigationEntry) -> Self {
        Self {
            key: entry.key.to_owned(),
            label: entry.label.to_owned(),
            path: entry.path.to_owned(),
            required_privileges: entry
                .required_tokens()
                .into_iter()
                .map(ToOwned::to_owned)
                .collect(),
        }
    }
}
