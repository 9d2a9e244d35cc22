use crate::context::AppContext;
use crate::format::{self, Formattable, OutputFormat};
use librepix::config::{self, Config};
use std::path::{Path, PathBuf};

/// Implement Formattable for Config to enable output formatting
impl Formattable for Config {
    fn format_pretty(&self) -> String {
        let mut output = format!(
            "[github]\napi_url = \"{}\"\nowner = \"{}\"\nrepository = \"{}\"\nfolder = \"{}\"\n",
            self.github.api_url, self.github.owner, self.github.repository, self.github.folder
        );

        output.push_str("\n[network]\n");
        match self.network.timeout {
            Some(seconds) => output.push_str(&format!("timeout = {}s\n", seconds)),
            None => output.push_str("timeout = none\n"),
        }
        output.push_str(&format!("user_agent = \"{}\"\n", self.network.user_agent));

        output.push_str(&format!(
            "\n[session]\nrefresh_delay_ms = {}\nstatus_ttl_secs = {}\n",
            self.session.refresh_delay_ms, self.session.status_ttl_secs
        ));

        output.push_str(&format!(
            "\n[output]\nformat = {:?}\ncolor = {:?}\n",
            self.output.format, self.output.color
        ));

        output
    }
}

/// Writes the default configuration to `path`.
///
/// An existing file is only replaced with `force`.
pub(crate) fn init_config(path: &Path, force: bool) -> Result<(), String> {
    if path.exists() && !force {
        return Err(format!(
            "Config file already exists at {} (use --force to overwrite)",
            path.display()
        ));
    }

    if let Some(parent) = path.parent() {
        std::fs::create_dir_all(parent)
            .map_err(|e| format!("Failed to create {}: {}", parent.display(), e))?;
    }

    let yaml = serde_yaml::to_string(&Config::default())
        .map_err(|e| format!("Failed to serialize config: {}", e))?;
    std::fs::write(path, yaml).map_err(|e| format!("Failed to write {}: {}", path.display(), e))
}

fn resolve_path(path: Option<&Path>) -> Result<PathBuf, String> {
    path.map(Path::to_path_buf)
        .or_else(config::default_config_path)
        .ok_or_else(|| "Could not determine the configuration directory".to_string())
}

/// Handle the config init subcommand
pub fn handle_init(ctx: &AppContext, path: Option<&Path>, force: bool) {
    let result = resolve_path(path).and_then(|path| init_config(&path, force).map(|_| path));
    match result {
        Ok(path) => {
            ctx.formatter()
                .success(&format!("Initialized config file at: {}", path.display()));
        }
        Err(e) => {
            ctx.formatter().error(&e);
            std::process::exit(1);
        }
    }
}

/// Handle the config show subcommand
pub fn handle_show(ctx: &AppContext, format: OutputFormat) {
    match format::format_output(&ctx.config, format) {
        Ok(output) => println!("{}", output.trim_end()),
        Err(e) => {
            ctx.formatter().error(&e);
            std::process::exit(1);
        }
    }
}

#[cfg(test)]
#[path = "config_tests.rs"]
mod tests;
