use std::env;
use std::fs;
use std::path::{Path, PathBuf};

/// Which host surface shows the current clip after a cursor move.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum DisplayMode {
    Panel,
    Popup,
    StatusBar,
    None,
}

impl DisplayMode {
    fn parse(value: &str) -> Option<Self> {
        match value {
            "panel" => Some(DisplayMode::Panel),
            "popup" => Some(DisplayMode::Popup),
            "status_bar" => Some(DisplayMode::StatusBar),
            "none" => Some(DisplayMode::None),
            _ => None,
        }
    }
}

#[derive(Debug, Clone)]
pub struct Settings {
    /// When true, copy/cut bypasses the history stack while yanking.
    pub explicit_yank_mode: bool,
    pub allow_history_duplicates: bool,
    pub display_mode: DisplayMode,
    /// Display mode used while command mode is active.
    pub command_mode_display_mode: DisplayMode,
    pub max_history_size: usize,
    /// Auto-disable yank mode once the yank stack runs dry.
    pub end_yank_mode_on_emptied_stack: bool,
    /// Load registers from the register file at startup.
    pub import_registers: bool,
    pub register_file: PathBuf,
}

impl Default for Settings {
    fn default() -> Self {
        Self {
            explicit_yank_mode: false,
            allow_history_duplicates: false,
            display_mode: DisplayMode::Popup,
            command_mode_display_mode: DisplayMode::Popup,
            max_history_size: 256,
            end_yank_mode_on_emptied_stack: false,
            import_registers: false,
            register_file: PathBuf::from("clipman_registers.json"),
        }
    }
}

pub struct RcLoader;

impl RcLoader {
    /// Get the path to the RC file
    /// Looks for .clipmanrc in:
    /// 1. Current directory
    /// 2. Home directory (~/.clipmanrc)
    pub fn get_rc_path() -> Option<PathBuf> {
        let current_rc = Path::new(".clipmanrc");
        if current_rc.exists() {
            return Some(current_rc.to_path_buf());
        }

        if let Ok(home) = env::var("HOME") {
            let home_rc = Path::new(&home).join(".clipmanrc");
            if home_rc.exists() {
                return Some(home_rc);
            }
        }

        None
    }

    /// Load and parse the RC file
    pub fn load_settings() -> Settings {
        let mut settings = Settings::default();

        if let Some(rc_path) = Self::get_rc_path() {
            match fs::read_to_string(&rc_path) {
                Ok(content) => {
                    Self::parse_settings_content(&content, &mut settings);
                }
                Err(_) => {
                    // Silently fail if we can't read the file
                }
            }
        }

        settings
    }

    /// Parse the content of an RC file
    pub fn parse_settings_content(content: &str, settings: &mut Settings) {
        for line in content.lines() {
            let line = line.trim();

            // Skip empty lines and comments
            if line.is_empty() || line.starts_with('#') {
                continue;
            }

            Self::parse_settings_line(line, settings);
        }
    }

    /// Parse a single configuration line
    fn parse_settings_line(line: &str, settings: &mut Settings) {
        // Remove inline comments
        let line = if let Some(pos) = line.find('#') {
            &line[..pos]
        } else {
            line
        }
        .trim();

        let Some((key, value)) = line.split_once('=') else {
            return;
        };
        let key = key.trim();
        let value = value.trim();

        match key {
            "explicit_yank_mode" => settings.explicit_yank_mode = parse_bool(value),
            "allow_history_duplicates" => settings.allow_history_duplicates = parse_bool(value),
            "end_yank_mode_on_emptied_stack" => {
                settings.end_yank_mode_on_emptied_stack = parse_bool(value);
            }
            "import_registers" => settings.import_registers = parse_bool(value),
            "display_mode" => {
                if let Some(mode) = DisplayMode::parse(value) {
                    settings.display_mode = mode;
                }
            }
            "command_mode_display_mode" => {
                if let Some(mode) = DisplayMode::parse(value) {
                    settings.command_mode_display_mode = mode;
                }
            }
            "max_history_size" => {
                if let Ok(size) = value.parse::<usize>() {
                    if size > 0 {
                        settings.max_history_size = size;
                    }
                }
            }
            "register_file" => {
                if !value.is_empty() {
                    settings.register_file = PathBuf::from(value);
                }
            }
            _ => {} // Unknown setting, ignore
        }
    }

    /// Generate a sample RC file content
    pub fn generate_sample_rc() -> String {
        r#"# clipman configuration file (.clipmanrc)
# Lines starting with # are comments

# Yank stack behaviour
explicit_yank_mode=false            # Copy/cut bypasses history while yanking
end_yank_mode_on_emptied_stack=false

# History behaviour
allow_history_duplicates=false
max_history_size=256

# Where to show the current clip: panel, popup, status_bar, none
display_mode=popup
command_mode_display_mode=popup

# Registers
import_registers=false              # Load registers from file at startup
register_file=clipman_registers.json
"#
        .to_string()
    }
}

fn parse_bool(value: &str) -> bool {
    value == "true" || value == "1" || value == "yes"
}
