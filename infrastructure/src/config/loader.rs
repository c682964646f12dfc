//! Configuration file loader with multi-source merging

use super::file_config::FileConfig;
use figment::{
    Figment,
    providers::{Env, Format, Serialized, Toml},
};
use std::path::{Path, PathBuf};

const PROJECT_FILES: [&str; 2] = ["scholia.toml", ".scholia.toml"];
const ENV_PREFIX: &str = "SCHOLIA_";

/// Configuration loader that handles file discovery and merging
pub struct ConfigLoader;

impl ConfigLoader {
    /// Load configuration from all sources with proper priority
    ///
    /// Priority (highest to lowest):
    /// 1. Environment: `SCHOLIA_<SECTION>__<KEY>`
    /// 2. Explicit config path (if provided)
    /// 3. Project root: `./scholia.toml` or `./.scholia.toml`
    /// 4. Global: `$XDG_CONFIG_HOME/scholia/config.toml`
    /// 5. Default values
    pub fn load(config_path: Option<&PathBuf>) -> Result<FileConfig, Box<figment::Error>> {
        Self::figment(Self::global_config_path(), Self::project_config_path(), config_path)
            .extract()
            .map_err(Box::new)
    }

    fn figment(
        global: Option<PathBuf>,
        project: Option<PathBuf>,
        explicit: Option<&PathBuf>,
    ) -> Figment {
        Self::files(global, project, explicit).merge(Env::prefixed(ENV_PREFIX).split("__"))
    }

    fn files(
        global: Option<PathBuf>,
        project: Option<PathBuf>,
        explicit: Option<&PathBuf>,
    ) -> Figment {
        let mut figment = Figment::new().merge(Serialized::defaults(FileConfig::default()));

        if let Some(path) = global.filter(|p| p.exists()) {
            figment = figment.merge(Toml::file(path));
        }
        if let Some(path) = project {
            figment = figment.merge(Toml::file(path));
        }
        if let Some(path) = explicit {
            figment = figment.merge(Toml::file(path));
        }

        figment
    }

    /// Load only default configuration (for --no-config)
    pub fn load_defaults() -> FileConfig {
        FileConfig::default()
    }

    /// `$XDG_CONFIG_HOME/scholia/config.toml`, falling back to the
    /// platform config directory.
    pub fn global_config_path() -> Option<PathBuf> {
        dirs::config_dir().map(|d| d.join("scholia").join("config.toml"))
    }

    /// The project-level config file, if one exists in the working directory
    pub fn project_config_path() -> Option<PathBuf> {
        Self::project_config_in(Path::new("."))
    }

    fn project_config_in(dir: &Path) -> Option<PathBuf> {
        PROJECT_FILES
            .iter()
            .map(|name| dir.join(name))
            .find(|path| path.exists())
    }

    /// Print the config file locations being used (for debugging)
    pub fn print_config_sources() {
        println!("Configuration sources (in priority order):");
        println!("  [ENV  ] Environment: {ENV_PREFIX}<SECTION>__<KEY>");

        if let Some(path) = Self::project_config_path() {
            println!("  [FOUND] Project: {}", path.display());
        } else {
            println!("  [     ] Project: ./scholia.toml or ./.scholia.toml");
        }

        if let Some(path) = Self::global_config_path() {
            let marker = if path.exists() { "FOUND" } else { "     " };
            println!("  [{}] Global:  {}", marker, path.display());
        }

        println!("  [     ] Default: built-in defaults");
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::fs;
    use tempfile::TempDir;

    fn extract(
        global: Option<PathBuf>,
        project: Option<PathBuf>,
        explicit: Option<&PathBuf>,
    ) -> FileConfig {
        ConfigLoader::files(global, project, explicit)
            .extract()
            .unwrap()
    }

    #[test]
    fn test_load_defaults() {
        let config = ConfigLoader::load_defaults();
        assert_eq!(config.research.max_sources, 3);
        assert_eq!(config.vector_index.collection, "philosophy");
    }

    #[test]
    fn test_global_config_path_mentions_scholia() {
        if let Some(path) = ConfigLoader::global_config_path() {
            assert!(path.ends_with("scholia/config.toml"));
        }
    }

    #[test]
    fn test_project_file_discovery_prefers_visible_name() {
        let dir = TempDir::new().unwrap();
        assert!(ConfigLoader::project_config_in(dir.path()).is_none());

        fs::write(dir.path().join(".scholia.toml"), "").unwrap();
        assert_eq!(
            ConfigLoader::project_config_in(dir.path()),
            Some(dir.path().join(".scholia.toml"))
        );

        fs::write(dir.path().join("scholia.toml"), "").unwrap();
        assert_eq!(
            ConfigLoader::project_config_in(dir.path()),
            Some(dir.path().join("scholia.toml"))
        );
    }

    #[test]
    fn test_later_files_override_earlier_ones() {
        let dir = TempDir::new().unwrap();
        let global = dir.path().join("global.toml");
        let project = dir.path().join("scholia.toml");
        let explicit = dir.path().join("explicit.toml");
        fs::write(&global, "[research]\nmax_sources = 4\nmax_queries = 20\n").unwrap();
        fs::write(&project, "[research]\nmax_sources = 6\n").unwrap();
        fs::write(&explicit, "[vector_index]\ncollection = \"stoics\"\n").unwrap();

        let config = extract(Some(global), Some(project), Some(&explicit));
        assert_eq!(config.research.max_sources, 6);
        assert_eq!(config.research.max_queries, 20);
        assert_eq!(config.vector_index.collection, "stoics");
        assert_eq!(config.research.worker_cap, 5);
    }

    #[test]
    fn test_missing_global_file_is_skipped() {
        let dir = TempDir::new().unwrap();
        let config = extract(Some(dir.path().join("absent.toml")), None, None);
        assert_eq!(config, FileConfig::default());
    }

    #[test]
    fn test_environment_overrides_files() {
        figment::Jail::expect_with(|jail| {
            jail.create_file("scholia.toml", "[research]\nworker_cap = 2\n")?;
            jail.set_env("SCHOLIA_RESEARCH__WORKER_CAP", "7");
            jail.set_env("SCHOLIA_MODELS__COMPOSE__MODEL", "gpt-4o");

            let config: FileConfig =
                ConfigLoader::figment(None, Some(PathBuf::from("scholia.toml")), None).extract()?;
            assert_eq!(config.research.worker_cap, 7);
            assert_eq!(config.models.compose.model.as_deref(), Some("gpt-4o"));
            Ok(())
        });
    }
}
