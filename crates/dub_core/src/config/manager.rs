//! Config manager for loading, saving, and section updates.
//!
//! - Writes go to a temp file in the same directory, then rename
//! - `update_section` rewrites one table and keeps the rest of the file as-is
//! - Sections with missing keys are filled in from defaults on load

use std::fs;
use std::io::{self, Write};
use std::path::{Path, PathBuf};

use tempfile::NamedTempFile;
use thiserror::Error;
use toml_edit::{DocumentMut, Item, Table};

use super::settings::{ConfigSection, Settings};

/// Errors that can occur during config operations.
#[derive(Error, Debug)]
pub enum ConfigError {
    #[error("Config I/O error: {0}")]
    Io(#[from] io::Error),

    #[error("Failed to parse config: {0}")]
    Parse(#[from] toml::de::Error),

    #[error("Failed to serialize config: {0}")]
    Serialize(#[from] toml::ser::Error),

    #[error("Failed to parse config for editing: {0}")]
    EditParse(#[from] toml_edit::TomlError),

    #[error("Config file not found: {0}")]
    NotFound(PathBuf),
}

/// Result type for config operations.
pub type ConfigResult<T> = Result<T, ConfigError>;

/// Owns the settings file and the settings loaded from it.
pub struct ConfigManager {
    config_path: PathBuf,
    settings: Settings,
}

impl ConfigManager {
    /// Create a manager for `config_path`. Nothing is read until `load*`.
    pub fn new(config_path: impl Into<PathBuf>) -> Self {
        Self {
            config_path: config_path.into(),
            settings: Settings::default(),
        }
    }

    pub fn path(&self) -> &Path {
        &self.config_path
    }

    pub fn settings(&self) -> &Settings {
        &self.settings
    }

    /// In-memory only until `save()` or `update_section()`.
    pub fn settings_mut(&mut self) -> &mut Settings {
        &mut self.settings
    }

    /// Load config from file; a missing file is an error.
    pub fn load(&mut self) -> ConfigResult<()> {
        if !self.config_path.exists() {
            return Err(ConfigError::NotFound(self.config_path.clone()));
        }

        let content = fs::read_to_string(&self.config_path)?;
        self.settings = toml::from_str(&content)?;
        Ok(())
    }

    /// Load config, writing defaults if the file doesn't exist.
    ///
    /// Sections that are absent or missing keys are rewritten with the
    /// loaded values plus defaults; other sections are left untouched.
    pub fn load_or_create(&mut self) -> ConfigResult<()> {
        if !self.config_path.exists() {
            self.settings = Settings::default();
            self.save()?;
            tracing::info!(
                "[Config] Created default config at {}",
                self.config_path.display()
            );
            return Ok(());
        }

        let content = fs::read_to_string(&self.config_path)?;
        self.settings = toml::from_str(&content)?;
        let mut doc: DocumentMut = content.parse()?;

        for (key, _) in doc.iter() {
            if !ConfigSection::all().iter().any(|s| s.table_name() == key) {
                tracing::warn!("[Config] Ignoring unknown section [{}]", key);
            }
        }

        let incomplete = self.incomplete_sections(&doc)?;
        if !incomplete.is_empty() {
            for section in &incomplete {
                doc[section.table_name()] = Item::Table(self.section_table(*section)?);
            }
            self.atomic_write(&doc.to_string())?;
            tracing::debug!("[Config] Filled in defaults for {:?}", incomplete);
        }

        Ok(())
    }

    /// Create the outputs and logs directories.
    pub fn ensure_dirs_exist(&self) -> ConfigResult<()> {
        for dir in [
            &self.settings.paths.outputs_folder,
            &self.settings.paths.logs_folder,
        ] {
            fs::create_dir_all(dir)?;
        }
        Ok(())
    }

    pub fn outputs_folder(&self) -> PathBuf {
        PathBuf::from(&self.settings.paths.outputs_folder)
    }

    pub fn logs_folder(&self) -> PathBuf {
        PathBuf::from(&self.settings.paths.logs_folder)
    }

    /// Save the entire config, with section comments.
    pub fn save(&self) -> ConfigResult<()> {
        let content = self.generate_config_with_comments()?;
        self.atomic_write(&content)?;
        Ok(())
    }

    /// Rewrite one section in the file on disk.
    ///
    /// The file is re-read first, so edits to other sections made outside
    /// this process survive.
    pub fn update_section(&mut self, section: ConfigSection) -> ConfigResult<()> {
        let current_content = if self.config_path.exists() {
            fs::read_to_string(&self.config_path)?
        } else {
            String::new()
        };

        let mut doc: DocumentMut = current_content.parse()?;
        doc[section.table_name()] = Item::Table(self.section_table(section)?);

        self.atomic_write(&doc.to_string())?;
        Ok(())
    }

    /// One section of the in-memory settings as an editable table.
    fn section_table(&self, section: ConfigSection) -> ConfigResult<Table> {
        let section_toml = self.section_body(section)?;
        let section_doc: DocumentMut = section_toml.parse()?;
        Ok(section_doc.as_table().clone())
    }

    fn section_body(&self, section: ConfigSection) -> ConfigResult<String> {
        let body = match section {
            ConfigSection::Paths => toml::to_string_pretty(&self.settings.paths)?,
            ConfigSection::Logging => toml::to_string_pretty(&self.settings.logging)?,
            ConfigSection::Assembly => toml::to_string_pretty(&self.settings.assembly)?,
            ConfigSection::Denoise => toml::to_string_pretty(&self.settings.denoise)?,
        };
        Ok(body)
    }

    fn incomplete_sections(&self, doc: &DocumentMut) -> ConfigResult<Vec<ConfigSection>> {
        let mut incomplete = Vec::new();
        for section in ConfigSection::all() {
            let expected = self.section_table(section)?;
            let complete = match doc.get(section.table_name()).and_then(Item::as_table) {
                Some(existing) => expected.iter().all(|(key, _)| existing.contains_key(key)),
                None => false,
            };
            if !complete {
                incomplete.push(section);
            }
        }
        Ok(incomplete)
    }

    fn generate_config_with_comments(&self) -> ConfigResult<String> {
        let mut output = String::new();
        output.push_str("# Dub Core Configuration\n");
        output.push_str(
            "# This file is auto-generated. Comments may be preserved on section updates.\n",
        );

        for section in ConfigSection::all() {
            let comment = match section {
                ConfigSection::Paths => "# Output and log directories",
                ConfigSection::Logging => "# Logging configuration",
                ConfigSection::Assembly => "# Track assembly (mode: synced | sequential)",
                ConfigSection::Denoise => {
                    "# TTS clip cleanup (model_path falls back to RNNOISE_MODEL_PATH)"
                }
            };
            output.push('\n');
            output.push_str(comment);
            output.push('\n');
            output.push_str(&format!("[{}]\n", section.table_name()));
            for line in self.section_body(section)?.lines() {
                output.push_str(line);
                output.push('\n');
            }
        }

        Ok(output)
    }

    /// Write to a temp file beside the config, then rename over it.
    fn atomic_write(&self, content: &str) -> io::Result<()> {
        let dir = match self.config_path.parent() {
            Some(p) if !p.as_os_str().is_empty() => p.to_path_buf(),
            _ => PathBuf::from("."),
        };
        fs::create_dir_all(&dir)?;

        let mut tmp = NamedTempFile::new_in(&dir)?;
        tmp.write_all(content.as_bytes())?;
        tmp.as_file().sync_all()?;
        tmp.persist(&self.config_path).map_err(|e| e.error)?;

        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::logging::LogLevel;
    use crate::models::AssemblyMode;
    use tempfile::tempdir;

    #[test]
    fn load_or_create_creates_default() {
        let dir = tempdir().unwrap();
        let config_path = dir.path().join(".config").join("dub.toml");

        let mut manager = ConfigManager::new(&config_path);
        manager.load_or_create().unwrap();

        let content = fs::read_to_string(&config_path).unwrap();
        for table in ["[paths]", "[logging]", "[assembly]", "[denoise]"] {
            assert!(content.contains(table), "missing {}", table);
        }
        assert!(content.contains("mode = \"synced\""));

        // The generated file loads back to the same settings
        let mut reloaded = ConfigManager::new(&config_path);
        reloaded.load().unwrap();
        assert_eq!(reloaded.settings(), &Settings::default());
    }

    #[test]
    fn load_missing_file_is_not_found() {
        let dir = tempdir().unwrap();
        let mut manager = ConfigManager::new(dir.path().join("absent.toml"));
        assert!(matches!(manager.load(), Err(ConfigError::NotFound(_))));
    }

    #[test]
    fn malformed_file_is_error() {
        let dir = tempdir().unwrap();
        let config_path = dir.path().join("dub.toml");
        fs::write(&config_path, "[assembly\nmode = ").unwrap();

        let mut manager = ConfigManager::new(&config_path);
        assert!(manager.load_or_create().is_err());
    }

    #[test]
    fn load_or_create_preserves_existing_and_fills_gaps() {
        let dir = tempdir().unwrap();
        let config_path = dir.path().join("dub.toml");
        fs::write(
            &config_path,
            "# mine\n[assembly]\nmode = \"sequential\"\ngap_ms = 500\n",
        )
        .unwrap();

        let mut manager = ConfigManager::new(&config_path);
        manager.load_or_create().unwrap();

        assert_eq!(manager.settings().assembly.mode, AssemblyMode::Sequential);
        assert_eq!(manager.settings().assembly.gap_ms, 500);

        let content = fs::read_to_string(&config_path).unwrap();
        assert!(content.contains("export_format"));
        assert!(content.contains("[denoise]"));
        assert!(content.contains("gap_ms = 500"));
    }

    #[test]
    fn update_section_only_changes_target() {
        let dir = tempdir().unwrap();
        let config_path = dir.path().join("dub.toml");

        let mut manager = ConfigManager::new(&config_path);
        manager.load_or_create().unwrap();

        // Another writer changes paths on disk
        let content = fs::read_to_string(&config_path).unwrap();
        fs::write(
            &config_path,
            content.replace("outputs_folder = \"outputs\"", "outputs_folder = \"elsewhere\""),
        )
        .unwrap();

        manager.settings_mut().logging.level = LogLevel::Debug;
        manager.update_section(ConfigSection::Logging).unwrap();

        let content = fs::read_to_string(&config_path).unwrap();
        assert!(content.contains("level = \"debug\""));
        assert!(content.contains("outputs_folder = \"elsewhere\""));
    }

    #[test]
    fn atomic_write_leaves_no_temp_files() {
        let dir = tempdir().unwrap();
        let config_path = dir.path().join("dub.toml");

        let mut manager = ConfigManager::new(&config_path);
        manager.load_or_create().unwrap();
        manager.save().unwrap();

        let entries: Vec<_> = fs::read_dir(dir.path()).unwrap().collect();
        assert_eq!(entries.len(), 1);
    }

    #[test]
    fn ensure_dirs_creates_outputs_and_logs() {
        let dir = tempdir().unwrap();
        let mut manager = ConfigManager::new(dir.path().join("dub.toml"));
        manager.settings_mut().paths.outputs_folder =
            dir.path().join("out").to_string_lossy().to_string();
        manager.settings_mut().paths.logs_folder =
            dir.path().join("logs").to_string_lossy().to_string();

        manager.ensure_dirs_exist().unwrap();
        assert!(manager.outputs_folder().is_dir());
        assert!(manager.logs_folder().is_dir());
    }
}
