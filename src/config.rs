use crate::model::DEFAULT_OWNER;
use crate::outline::DEFAULT_SHARE_BASE;
use std::time::Duration;

/// Key under which the current document snapshot is stored.
pub const STORAGE_KEY: &str = "current-document";
pub const AUTOSAVE_DELAY: Duration = Duration::from_millis(1000);

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct EditorConfig {
    pub storage_key: String,
    pub autosave_delay: Duration,
    pub owner_id: String,
    pub share_base: String,
}

impl Default for EditorConfig {
    fn default() -> Self {
        Self {
            storage_key: STORAGE_KEY.to_string(),
            autosave_delay: AUTOSAVE_DELAY,
            owner_id: DEFAULT_OWNER.to_string(),
            share_base: DEFAULT_SHARE_BASE.to_string(),
        }
    }
}
