//! Config command handler

use crate::commands::ConfigArgs;
use crate::config::CliConfig;
use crate::error::CliResult;
use snapverify::ArtifactConfig;

/// Render the configuration the command should print
pub fn render_config(config: &CliConfig, args: &ConfigArgs) -> CliResult<String> {
    let artifacts = if args.defaults {
        ArtifactConfig::default()
    } else {
        config.artifacts.clone()
    };
    Ok(artifacts.to_yaml()?)
}

/// Execute the config command
pub fn execute_config(config: &CliConfig, args: &ConfigArgs) -> CliResult<()> {
    print!("{}", render_config(config, args)?);
    Ok(())
}

#[cfg(test)]
#[allow(clippy::unwrap_used, clippy::expect_used)]
mod tests {
    use super::*;

    fn args(defaults: bool) -> ConfigArgs {
        ConfigArgs { defaults }
    }

    #[test]
    fn test_renders_effective_config() {
        let config = CliConfig::new().with_artifacts(
            ArtifactConfig::new()
                .with_screenshot_dir("custom/shots")
                .with_default_threshold(0.25),
        );
        let yaml = render_config(&config, &args(false)).unwrap();
        assert!(yaml.contains("screenshot_dir: custom/shots"));
        assert!(yaml.contains("default_threshold: 0.25"));
        assert!(yaml.contains("collision: suffix"));
    }

    #[test]
    fn test_renders_defaults() {
        let config =
            CliConfig::new().with_artifacts(ArtifactConfig::new().with_screenshot_dir("custom"));
        let yaml = render_config(&config, &args(true)).unwrap();
        assert!(yaml.contains("test-output/screenshots"));
    }

    #[test]
    fn test_output_round_trips() {
        let yaml = render_config(&CliConfig::new(), &args(false)).unwrap();
        assert_eq!(
            ArtifactConfig::from_yaml_str(&yaml).unwrap(),
            ArtifactConfig::default()
        );
    }
}
