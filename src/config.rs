//! Project settings for Waypoint.
//!
//! Settings are optional: a project without `.waypoint/settings.json` gets
//! the defaults, which match the standard spec-kit layout.

use serde::{Deserialize, Serialize};
use std::path::{Path, PathBuf};

use crate::error::{Result, WaypointError};

/// Per-project settings loaded from `.waypoint/settings.json`.
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(default)]
pub struct ProjectSettings {
    /// Index document filename, looked up in the report output directory
    pub index_file: String,
    /// Report template path, resolved relative to the project directory
    pub template_file: PathBuf,
    /// Resume command format; `{FEATURE_ID}` is substituted with the
    /// analyzed feature identifier
    pub resume_command_format: String,
}

impl Default for ProjectSettings {
    fn default() -> Self {
        Self {
            index_file: "CHECKPOINTS_README.md".to_string(),
            template_file: PathBuf::from("checkpoint_template.md"),
            resume_command_format: "/team-lead.implement specs/{FEATURE_ID} --resume".to_string(),
        }
    }
}

impl ProjectSettings {
    /// Load settings for a project, falling back to defaults when the
    /// settings file is absent.
    ///
    /// # Errors
    ///
    /// Returns a settings error when the file exists but cannot be parsed.
    pub fn load(project_dir: &Path) -> Result<Self> {
        let settings_path = Self::settings_path(project_dir);

        if settings_path.exists() {
            let content = std::fs::read_to_string(&settings_path)?;
            serde_json::from_str(&content)
                .map_err(|e| WaypointError::settings_with_path(e.to_string(), settings_path))
        } else {
            Ok(Self::default())
        }
    }

    /// Get the settings.json path for a project
    #[must_use]
    pub fn settings_path(project_dir: &Path) -> PathBuf {
        project_dir.join(".waypoint/settings.json")
    }

    /// Resolve the template path against the project directory.
    #[must_use]
    pub fn template_path(&self, project_dir: &Path) -> PathBuf {
        if self.template_file.is_absolute() {
            self.template_file.clone()
        } else {
            project_dir.join(&self.template_file)
        }
    }

    /// Build the resume command for a feature.
    #[must_use]
    pub fn resume_command(&self, feature_id: &str) -> String {
        self.resume_command_format.replace("{FEATURE_ID}", feature_id)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use tempfile::TempDir;

    #[test]
    fn test_defaults() {
        let settings = ProjectSettings::default();
        assert_eq!(settings.index_file, "CHECKPOINTS_README.md");
        assert_eq!(settings.template_file, PathBuf::from("checkpoint_template.md"));
    }

    #[test]
    fn test_load_missing_file_yields_defaults() {
        let temp = TempDir::new().unwrap();
        let settings = ProjectSettings::load(temp.path()).unwrap();
        assert_eq!(settings.index_file, "CHECKPOINTS_README.md");
    }

    #[test]
    fn test_load_partial_settings() {
        let temp = TempDir::new().unwrap();
        std::fs::create_dir_all(temp.path().join(".waypoint")).unwrap();
        std::fs::write(
            ProjectSettings::settings_path(temp.path()),
            r#"{"index_file": "INDEX.md"}"#,
        )
        .unwrap();

        let settings = ProjectSettings::load(temp.path()).unwrap();
        assert_eq!(settings.index_file, "INDEX.md");
        // Unspecified fields keep their defaults.
        assert_eq!(settings.template_file, PathBuf::from("checkpoint_template.md"));
    }

    #[test]
    fn test_load_invalid_json_is_an_error() {
        let temp = TempDir::new().unwrap();
        std::fs::create_dir_all(temp.path().join(".waypoint")).unwrap();
        std::fs::write(ProjectSettings::settings_path(temp.path()), "not json").unwrap();

        let err = ProjectSettings::load(temp.path()).unwrap_err();
        assert!(matches!(err, WaypointError::Settings { .. }));
    }

    #[test]
    fn test_template_path_resolution() {
        let settings = ProjectSettings::default();
        assert_eq!(
            settings.template_path(Path::new("/proj")),
            PathBuf::from("/proj/checkpoint_template.md")
        );

        let absolute = ProjectSettings {
            template_file: PathBuf::from("/templates/checkpoint.md"),
            ..ProjectSettings::default()
        };
        assert_eq!(
            absolute.template_path(Path::new("/proj")),
            PathBuf::from("/templates/checkpoint.md")
        );
    }

    #[test]
    fn test_resume_command_substitution() {
        let settings = ProjectSettings::default();
        assert_eq!(
            settings.resume_command("001-demo"),
            "/team-lead.implement specs/001-demo --resume"
        );
    }
}
