//! XDG autostart entry management.
//!
//! Launch-at-startup on Linux is a desktop-entry file under the user's
//! `autostart` config directory: enabling writes the file, disabling removes
//! it, and the enabled check is an existence test.

use std::fs;
use std::io;
use std::path::PathBuf;

use anyhow::{Context, Result};
use directories::BaseDirs;
use tracing::warn;

use keywarden_platform::autostart::AppInfo;

pub struct Autostart {
    app: AppInfo,
    config_dir: PathBuf,
}

impl Autostart {
    /// Autostart handle rooted at the user's XDG config directory.
    pub fn new(app: AppInfo) -> Result<Self> {
        let dirs = BaseDirs::new().context("no home directory for this user")?;
        Ok(Self::with_config_dir(app, dirs.config_dir().to_path_buf()))
    }

    /// Autostart handle rooted at an explicit config directory.
    pub fn with_config_dir(app: AppInfo, config_dir: PathBuf) -> Self {
        Self { app, config_dir }
    }

    /// Path of the autostart desktop entry, optionally creating the
    /// `autostart` directory.
    pub fn desktop_file_path(&self, create_dirs: bool) -> io::Result<PathBuf> {
        let dir = self.config_dir.join("autostart");
        if create_dirs && !dir.exists() {
            fs::create_dir_all(&dir)?;
        }
        Ok(dir.join(self.app.desktop_file_name()))
    }

    /// Whether an autostart entry currently exists.
    pub fn is_enabled(&self) -> bool {
        self.desktop_file_path(false)
            .map(|path| path.exists())
            .unwrap_or(false)
    }

    /// Create or remove the autostart entry. Filesystem failures are logged
    /// and swallowed; the worst outcome is a missing entry.
    pub fn set_enabled(&self, enable: bool) {
        let result = if enable {
            self.write_entry()
        } else {
            self.remove_entry()
        };
        if let Err(e) = result {
            warn!("failed to update autostart entry: {:#}", e);
        }
    }

    fn write_entry(&self) -> Result<()> {
        let path = self
            .desktop_file_path(true)
            .context("failed to create autostart directory")?;
        let exe = executable_path().context("failed to resolve executable path")?;
        fs::write(&path, self.render_entry(&exe))
            .with_context(|| format!("failed to write {}", path.display()))?;
        Ok(())
    }

    fn remove_entry(&self) -> Result<()> {
        let path = self.desktop_file_path(false)?;
        if path.exists() {
            fs::remove_file(&path)
                .with_context(|| format!("failed to remove {}", path.display()))?;
        }
        Ok(())
    }

    fn render_entry(&self, exe: &std::path::Path) -> String {
        format!(
            r#"[Desktop Entry]
Name={name}
GenericName={generic}
Exec={exe}
TryExec={exe}
Icon={icon}
StartupWMClass={wm_class}
StartupNotify=true
Terminal=false
Type=Application
Version=1.0
Categories={categories}
MimeType={mime}
X-GNOME-Autostart-enabled=true
X-GNOME-Autostart-Delay=2
X-KDE-autostart-after=panel
X-LXQt-Need-Tray=true
"#,
            name = self.app.display_name,
            generic = self.app.generic_name,
            exe = exe.display(),
            icon = self.app.name,
            wm_class = self.app.wm_class,
            categories = self.app.categories,
            mime = self.app.mime_types,
        )
    }
}

/// The path launched at session start: the AppImage when running from one,
/// otherwise the current executable.
fn executable_path() -> io::Result<PathBuf> {
    if let Some(appimage) = std::env::var_os("APPIMAGE") {
        let path = PathBuf::from(appimage);
        if path.exists() {
            return Ok(path);
        }
    }
    std::env::current_exe()
}

#[cfg(test)]
mod tests {
    use super::*;

    fn test_app() -> AppInfo {
        AppInfo {
            name: "keywarden".to_string(),
            display_name: "KeyWarden".to_string(),
            qualified_name: "org.keywarden.KeyWarden".to_string(),
            generic_name: "Password Manager".to_string(),
            wm_class: "keywarden".to_string(),
            categories: "Utility;Security;".to_string(),
            mime_types: "application/x-keywarden;".to_string(),
        }
    }

    #[test]
    fn test_toggle_on_then_off_leaves_no_file() {
        let dir = tempfile::tempdir().unwrap();
        let autostart = Autostart::with_config_dir(test_app(), dir.path().to_path_buf());

        assert!(!autostart.is_enabled());
        autostart.set_enabled(true);
        assert!(autostart.is_enabled());
        autostart.set_enabled(false);
        assert!(!autostart.is_enabled());
        assert!(!dir
            .path()
            .join("autostart/org.keywarden.KeyWarden.desktop")
            .exists());
    }

    #[test]
    fn test_disable_without_entry_is_a_noop() {
        let dir = tempfile::tempdir().unwrap();
        let autostart = Autostart::with_config_dir(test_app(), dir.path().to_path_buf());

        autostart.set_enabled(false);
        assert!(!autostart.is_enabled());
        assert!(!dir.path().join("autostart").exists());
    }

    #[test]
    fn test_enable_twice_overwrites_single_entry() {
        let dir = tempfile::tempdir().unwrap();
        let autostart = Autostart::with_config_dir(test_app(), dir.path().to_path_buf());

        autostart.set_enabled(true);
        autostart.set_enabled(true);

        let autostart_dir = dir.path().join("autostart");
        assert_eq!(fs::read_dir(&autostart_dir).unwrap().count(), 1);

        let content =
            fs::read_to_string(autostart_dir.join("org.keywarden.KeyWarden.desktop")).unwrap();
        assert!(content.starts_with("[Desktop Entry]\n"));
        assert_eq!(content.matches("[Desktop Entry]").count(), 1);
        assert!(content.contains("Name=KeyWarden\n"));
        assert!(content.contains("GenericName=Password Manager\n"));
        assert!(content.contains("Icon=keywarden\n"));
        assert!(content.contains("Type=Application\n"));
        assert!(content.contains("Categories=Utility;Security;\n"));
        assert!(content.contains("X-GNOME-Autostart-enabled=true\n"));
    }

    #[test]
    fn test_entry_points_at_current_executable() {
        let dir = tempfile::tempdir().unwrap();
        let autostart = Autostart::with_config_dir(test_app(), dir.path().to_path_buf());

        autostart.set_enabled(true);

        let content = fs::read_to_string(
            dir.path().join("autostart/org.keywarden.KeyWarden.desktop"),
        )
        .unwrap();
        let exe = std::env::current_exe().unwrap();
        assert!(content.contains(&format!("Exec={}\n", exe.display())));
        assert!(content.contains(&format!("TryExec={}\n", exe.display())));
    }
}
