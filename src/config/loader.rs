use std::path::{Path, PathBuf};

use clap::{Arg, ArgAction, ArgMatches, Command};
use figment::{
    Figment,
    providers::{Format, Serialized, Toml},
};
use oracle_blockchain::Network;
use serde::Deserialize;

use super::{Config, ConfigRaw, defaults, deployments::Deployments};
use crate::config::ConfigError;

const DEFAULT_CONFIG_FILE: &str = "config.toml";
const NETWORK_ENV_VAR: &str = "NODE_ENV";

/// Command line options.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub(crate) struct CliArgs {
    pub config: Option<PathBuf>,
    pub network: Option<String>,
    /// Run a single lifecycle pass regardless of `runtime.poll_interval_secs`.
    pub once: bool,
}

/// Configuration files in increasing priority.
#[derive(Debug, Clone)]
pub(crate) struct ConfigSources {
    pub default_file: PathBuf,
    pub custom_file: Option<PathBuf>,
}

impl ConfigSources {
    fn network_file(&self) -> &Path {
        self.custom_file.as_deref().unwrap_or(&self.default_file)
    }
}

#[derive(Debug, Deserialize)]
struct NetworkSelection {
    network: Option<String>,
}

fn cli_command() -> Command {
    Command::new("tutorial-oracle")
        .about("Validates tutorial submissions and pays out their rewards")
        .arg(
            Arg::new("config")
                .short('c')
                .long("config")
                .value_name("FILE")
                .help("Sets a custom config file (.toml format)"),
        )
        .arg(
            Arg::new("network")
                .short('n')
                .long("network")
                .value_name("NETWORK")
                .help("Target network: test, localnet or testnet"),
        )
        .arg(
            Arg::new("once")
                .long("once")
                .action(ArgAction::SetTrue)
                .help("Run a single validation and payout pass, then exit"),
        )
}

fn cli_args_from_matches(matches: &ArgMatches) -> CliArgs {
    CliArgs {
        config: matches.get_one::<String>("config").map(PathBuf::from),
        network: matches.get_one::<String>("network").cloned(),
        once: matches.get_flag("once"),
    }
}

pub(crate) fn parse_cli() -> CliArgs {
    cli_args_from_matches(&cli_command().get_matches())
}

pub(crate) fn load_configuration(cli: &CliArgs) -> Result<Config, ConfigError> {
    let sources = ConfigSources {
        default_file: PathBuf::from(DEFAULT_CONFIG_FILE),
        custom_file: cli.config.clone(),
    };
    let node_env = std::env::var(NETWORK_ENV_VAR).ok();

    let network = resolve_network(cli.network.as_deref(), node_env.as_deref(), &sources)?;
    load_for_network(network, &sources, |name| std::env::var(name).ok())
}

/// `--network` wins over `NODE_ENV`, which wins over the `network` key of the
/// config file. Falls back to `test`.
pub(crate) fn resolve_network(
    flag: Option<&str>,
    node_env: Option<&str>,
    sources: &ConfigSources,
) -> Result<Network, ConfigError> {
    if let Some(path) = &sources.custom_file
        && !path.exists()
    {
        return Err(ConfigError::MissingConfig(path.display().to_string()));
    }

    let selected = flag
        .map(str::to_string)
        .or_else(|| node_env.filter(|env| !env.trim().is_empty()).map(str::to_string))
        .or_else(|| read_network_from(sources.network_file()));

    match selected {
        Some(name) => Ok(name.parse::<Network>()?),
        None => Ok(Network::Test),
    }
}

fn read_network_from(path: &Path) -> Option<String> {
    if !path.exists() {
        return None;
    }

    Figment::from(Toml::file(path))
        .extract::<NetworkSelection>()
        .ok()
        .and_then(|selection| selection.network)
}

/// Layers network defaults, the config files, the private key variable and
/// the deployments file, then validates the result.
pub(crate) fn load_for_network<E>(
    network: Network,
    sources: &ConfigSources,
    env_lookup: E,
) -> Result<Config, ConfigError>
where
    E: Fn(&str) -> Option<String>,
{
    let mut figment = Figment::from(Serialized::defaults(defaults::config_for(network)));

    if sources.default_file.exists() {
        figment = figment.merge(Toml::file(&sources.default_file));
    }

    if let Some(config_path) = &sources.custom_file {
        figment = figment.merge(Toml::file(config_path));
    }

    // The resolved selection overrides whatever `network` the files say.
    figment = figment.merge(Serialized::default("network", network));

    let mut config: ConfigRaw = figment.extract().map_err(Box::new)?;

    if let Some(private_key) = env_lookup(network.private_key_env_var())
        && !private_key.trim().is_empty()
    {
        config.blockchain.private_key = Some(private_key);
    }

    fill_contracts_from_deployments(&mut config)?;

    config.resolve()
}

fn fill_contracts_from_deployments(config: &mut ConfigRaw) -> Result<(), ConfigError> {
    let contracts = &config.blockchain.contracts;
    if contracts.registry.is_some() && contracts.payout.is_some() {
        return Ok(());
    }

    // Without a deployments file both addresses must come from config.
    if !config.deployments_path.exists() {
        return Ok(());
    }

    let deployments = Deployments::load(&config.deployments_path)?;
    deployments.fill_missing(config.network, &mut config.blockchain.contracts);
    Ok(())
}

#[cfg(test)]
mod tests {
    #![allow(clippy::unwrap_used)]

    use std::fs;

    use oracle_blockchain::Address;

    use super::*;

    const TEST_KEY: &str = "ac0974bec39a17e36ba4a6b4d238ff944bacb478cbed5efcae784d7bf4f2ff80";
    const REGISTRY: &str = "0x28f959283F7Fc0a9c56e9Dc70e9d77dE99442603";
    const PAYOUT: &str = "0xc9360C3De34f4E24b16D0db01BbB87F5a7Ecbc66";

    fn sources(dir: &tempfile::TempDir, custom: Option<&str>) -> ConfigSources {
        ConfigSources {
            default_file: dir.path().join("config.toml"),
            custom_file: custom.map(|name| dir.path().join(name)),
        }
    }

    fn no_env(_: &str) -> Option<String> {
        None
    }

    fn contracts_toml(dir: &tempfile::TempDir) -> String {
        format!(
            r#"
deployments_path = "{}"

[blockchain.contracts]
registry = "{REGISTRY}"
payout = "{PAYOUT}"
"#,
            dir.path().join("vars.json").display()
        )
    }

    #[test]
    fn cli_flags_are_parsed() {
        let matches = cli_command()
            .try_get_matches_from(["tutorial-oracle", "-c", "oracle.toml", "--network", "testnet", "--once"])
            .unwrap();

        assert_eq!(
            cli_args_from_matches(&matches),
            CliArgs {
                config: Some(PathBuf::from("oracle.toml")),
                network: Some("testnet".to_string()),
                once: true,
            }
        );
    }

    #[test]
    fn network_flag_beats_env_and_file() {
        let dir = tempfile::tempdir().unwrap();
        fs::write(dir.path().join("config.toml"), "network = \"localnet\"\n").unwrap();
        let sources = sources(&dir, None);

        assert_eq!(
            resolve_network(Some("testnet"), Some("localnet"), &sources).unwrap(),
            Network::Testnet
        );
        assert_eq!(
            resolve_network(None, Some("TESTNET"), &sources).unwrap(),
            Network::Testnet
        );
        assert_eq!(resolve_network(None, None, &sources).unwrap(), Network::Localnet);
    }

    #[test]
    fn network_defaults_to_test() {
        let dir = tempfile::tempdir().unwrap();
        assert_eq!(
            resolve_network(None, Some(" "), &sources(&dir, None)).unwrap(),
            Network::Test
        );
    }

    #[test]
    fn unknown_network_is_rejected() {
        let dir = tempfile::tempdir().unwrap();
        assert!(matches!(
            resolve_network(Some("mainnet"), None, &sources(&dir, None)),
            Err(ConfigError::Blockchain(oracle_blockchain::ConfigError::UnknownNetwork(_)))
        ));
    }

    #[test]
    fn missing_custom_file_is_reported() {
        let dir = tempfile::tempdir().unwrap();
        assert!(matches!(
            resolve_network(None, None, &sources(&dir, Some("missing.toml"))),
            Err(ConfigError::MissingConfig(_))
        ));
    }

    #[test]
    fn private_key_comes_from_network_env_var() {
        let dir = tempfile::tempdir().unwrap();
        fs::write(dir.path().join("config.toml"), contracts_toml(&dir)).unwrap();

        let config = load_for_network(Network::Localnet, &sources(&dir, None), |name| {
            (name == "WALLET_PRIVATE_KEY_LOCALNET").then(|| TEST_KEY.to_string())
        })
        .unwrap();

        assert_eq!(config.network, Network::Localnet);
        assert_eq!(config.blockchain.private_key(), TEST_KEY);
        assert_eq!(
            config.blockchain.rpc_endpoints(),
            &["http://127.0.0.1:3050".to_string()]
        );
        assert_eq!(
            config.blockchain.registry_address(),
            REGISTRY.parse::<Address>().unwrap()
        );
    }

    #[test]
    fn missing_private_key_names_the_env_var() {
        let dir = tempfile::tempdir().unwrap();
        fs::write(dir.path().join("config.toml"), contracts_toml(&dir)).unwrap();

        let result = load_for_network(Network::Testnet, &sources(&dir, None), no_env);

        assert!(matches!(
            result,
            Err(ConfigError::Blockchain(oracle_blockchain::ConfigError::MissingSecret(ref msg)))
                if msg.contains("WALLET_PRIVATE_KEY_TESTNET")
        ));
    }

    #[test]
    fn addresses_fall_back_to_deployments_file() {
        let dir = tempfile::tempdir().unwrap();
        let vars = dir.path().join("vars.json");
        fs::write(
            &vars,
            format!(
                r#"{{ "test": {{ "deployed": [
                    {{ "name": "TutorialSubmission", "address": "{REGISTRY}" }},
                    {{ "name": "Payout", "address": "{PAYOUT}" }}
                ] }} }}"#
            ),
        )
        .unwrap();
        fs::write(
            dir.path().join("config.toml"),
            format!(
                "deployments_path = \"{}\"\n\n[blockchain]\nprivate_key = \"{TEST_KEY}\"\n",
                vars.display()
            ),
        )
        .unwrap();

        let config = load_for_network(Network::Test, &sources(&dir, None), no_env).unwrap();

        assert_eq!(
            config.blockchain.payout_address(),
            PAYOUT.parse::<Address>().unwrap()
        );
    }

    #[test]
    fn missing_addresses_without_deployments_are_rejected() {
        let dir = tempfile::tempdir().unwrap();
        fs::write(
            dir.path().join("config.toml"),
            format!(
                "deployments_path = \"{}\"\n\n[blockchain]\nprivate_key = \"{TEST_KEY}\"\n",
                dir.path().join("absent.json").display()
            ),
        )
        .unwrap();

        assert!(matches!(
            load_for_network(Network::Test, &sources(&dir, None), no_env),
            Err(ConfigError::Blockchain(oracle_blockchain::ConfigError::MissingContract(ref name)))
                if name == "TutorialSubmission"
        ));
    }

    #[test]
    fn custom_file_overrides_default_file() {
        let dir = tempfile::tempdir().unwrap();
        fs::write(
            dir.path().join("config.toml"),
            format!("{}\n[lifecycle]\nconfirm_polls = 3\n", contracts_toml(&dir)),
        )
        .unwrap();
        fs::write(
            dir.path().join("custom.toml"),
            "[lifecycle]\nconfirm_polls = 4\n\n[runtime]\npoll_interval_secs = 30\n",
        )
        .unwrap();

        let config = load_for_network(Network::Test, &sources(&dir, Some("custom.toml")), |_| {
            Some(TEST_KEY.to_string())
        })
        .unwrap();

        assert_eq!(config.lifecycle.confirm_polls, 4);
        assert_eq!(config.lifecycle.max_write_attempts, 2);
        assert_eq!(config.runtime.poll_interval_secs, 30);
    }

    #[test]
    fn unknown_keys_are_rejected() {
        let dir = tempfile::tempdir().unwrap();
        fs::write(dir.path().join("config.toml"), "[lifecycle]\nsettle_seconds = 5\n").unwrap();

        assert!(matches!(
            load_for_network(Network::Test, &sources(&dir, None), no_env),
            Err(ConfigError::LoadError(_))
        ));
    }

    #[test]
    fn invalid_lifecycle_budget_is_rejected() {
        let dir = tempfile::tempdir().unwrap();
        fs::write(
            dir.path().join("config.toml"),
            format!("{}\n[lifecycle]\nmax_write_attempts = 0\n", contracts_toml(&dir)),
        )
        .unwrap();

        assert!(matches!(
            load_for_network(Network::Test, &sources(&dir, None), |_| Some(TEST_KEY.to_string())),
            Err(ConfigError::InvalidConfig(ref msg)) if msg.contains("max_write_attempts")
        ));
    }
}
