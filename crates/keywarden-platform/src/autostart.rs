use serde::{Deserialize, Serialize};

/// Application identity rendered into desktop entries.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct AppInfo {
    /// Lowercase short name; doubles as the icon name.
    pub name: String,
    /// Human-readable application name.
    pub display_name: String,
    /// Reverse-DNS name; names the `.desktop` file.
    pub qualified_name: String,
    /// GenericName field, e.g. "Password Manager".
    pub generic_name: String,
    /// StartupWMClass the main window reports.
    pub wm_class: String,
    /// Semicolon-terminated category list.
    pub categories: String,
    /// Semicolon-terminated MIME type list.
    pub mime_types: String,
}

impl AppInfo {
    /// File name of the application's desktop entries.
    pub fn desktop_file_name(&self) -> String {
        format!("{}.desktop", self.qualified_name)
    }
}
