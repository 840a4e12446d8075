//! INI file configuration adapter.

use crate::ports::config_port::ConfigPort;
use configparser::ini::Ini;
use std::path::Path;

pub struct FileConfigAdapter {
    config: Ini,
}

impl FileConfigAdapter {
    pub fn from_file<P: AsRef<Path>>(path: P) -> std::io::Result<Self> {
        let mut config = Ini::new();
        config.load(path).map_err(std::io::Error::other)?;
        Ok(Self { config })
    }

    pub fn from_string(content: &str) -> Result<Self, String> {
        let mut config = Ini::new();
        config.read(content.to_string())?;
        Ok(Self { config })
    }

    fn parse_bool(value: &str) -> Option<bool> {
        match value.to_lowercase().as_str() {
            "true" | "yes" | "1" => Some(true),
            "false" | "no" | "0" => Some(false),
            _ => None,
        }
    }
}

impl ConfigPort for FileConfigAdapter {
    fn get_string(&self, section: &str, key: &str) -> Option<String> {
        self.config.get(section, key)
    }

    fn get_int(&self, section: &str, key: &str, default: i64) -> i64 {
        self.config
            .getint(section, key)
            .ok()
            .flatten()
            .unwrap_or(default)
    }

    fn get_double(&self, section: &str, key: &str, default: f64) -> f64 {
        self.config
            .getfloat(section, key)
            .ok()
            .flatten()
            .unwrap_or(default)
    }

    fn get_bool(&self, section: &str, key: &str, default: bool) -> bool {
        self.config
            .get(section, key)
            .as_ref()
            .and_then(|v| Self::parse_bool(v))
            .unwrap_or(default)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::io::Write;
    use tempfile::NamedTempFile;

    #[test]
    fn from_string_parses_sections() {
        let content = r#"
[commission]
rate = 0.01
minimum = 3.0

[simulation]
initial_cash = 10000.0
live_trading = yes
tickers = CCC,DDD
"#;
        let adapter = FileConfigAdapter::from_string(content).unwrap();
        assert_eq!(adapter.get_double("commission", "rate", 0.0), 0.01);
        assert_eq!(
            adapter.get_string("simulation", "tickers"),
            Some("CCC,DDD".to_string())
        );
        assert!(adapter.get_bool("simulation", "live_trading", false));
    }

    #[test]
    fn missing_key_returns_none_or_default() {
        let adapter = FileConfigAdapter::from_string("[simulation]\ninitial_cash = 100\n").unwrap();
        assert_eq!(adapter.get_string("simulation", "missing"), None);
        assert_eq!(adapter.get_int("simulation", "missing", 42), 42);
        assert_eq!(adapter.get_double("missing_section", "key", 9.5), 9.5);
        assert!(adapter.get_bool("simulation", "missing", true));
    }

    #[test]
    fn non_numeric_values_fall_back_to_default() {
        let adapter =
            FileConfigAdapter::from_string("[simulation]\nmax_positions = lots\n").unwrap();
        assert_eq!(adapter.get_int("simulation", "max_positions", 5), 5);
        assert_eq!(adapter.get_double("simulation", "max_positions", 5.0), 5.0);
    }

    #[test]
    fn bool_spellings() {
        let adapter = FileConfigAdapter::from_string(
            "[simulation]\na = true\nb = yes\nc = 1\nd = false\ne = no\nf = 0\n",
        )
        .unwrap();
        assert!(adapter.get_bool("simulation", "a", false));
        assert!(adapter.get_bool("simulation", "b", false));
        assert!(adapter.get_bool("simulation", "c", false));
        assert!(!adapter.get_bool("simulation", "d", true));
        assert!(!adapter.get_bool("simulation", "e", true));
        assert!(!adapter.get_bool("simulation", "f", true));
    }

    #[test]
    fn from_file_reads_config() {
        let mut file = NamedTempFile::new().unwrap();
        write!(file, "[commission]\nrate = 0.002\n").unwrap();
        let adapter = FileConfigAdapter::from_file(file.path()).unwrap();
        assert_eq!(adapter.get_double("commission", "rate", 0.0), 0.002);
    }

    #[test]
    fn from_file_errors_on_missing_file() {
        assert!(FileConfigAdapter::from_file("/nonexistent/marketsim.ini").is_err());
    }
}
