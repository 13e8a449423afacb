use std::path::PathBuf;

use clap::{Parser, Subcommand};

use azurerm::config::{ConfigError, Environment, Features, ProviderConfig};

#[derive(Parser, Debug)]
#[command(author, version, about)]
pub struct Cli {
    #[command(subcommand)]
    pub command: Command,
}

#[derive(Subcommand, Debug)]
pub enum Command {
    /// Parse and inspect Azure resource IDs
    Id {
        #[command(subcommand)]
        command: IdCommand,
    },
    /// Run a named validator against a value
    Validate(ValidateArgs),
    /// Manage a single resource against Azure Resource Manager
    Resource {
        #[command(subcommand)]
        command: ResourceCommand,
    },
}

#[derive(Subcommand, Debug)]
pub enum IdCommand {
    Parse(ParseArgs),
    /// List the resource ID types that can be parsed
    Types,
}

#[derive(clap::Args, Debug)]
pub struct ParseArgs {
    /// ID type key, see `id types`
    pub id_type: String,

    pub value: String,

    /// Match static segments regardless of casing
    #[arg(long)]
    pub insensitive: bool,
}

#[derive(clap::Args, Debug)]
pub struct ValidateArgs {
    /// A name validator or an ID type key
    pub validator: String,

    pub value: String,
}

#[derive(Subcommand, Debug)]
pub enum ResourceCommand {
    /// Refresh a state file from the remote object
    Read(StateArgs),
    /// Read an existing remote object into state by its ID
    Import(ImportArgs),
    /// Delete the remote object described by a state file
    Delete(StateArgs),
    /// Create, update or replace the remote object to match a config file
    Apply(ApplyArgs),
}

#[derive(clap::Args, Debug)]
pub struct StateArgs {
    #[command(flatten)]
    pub connection: ConnectionArgs,

    pub resource_type: String,

    #[arg(long)]
    pub state: PathBuf,
}

#[derive(clap::Args, Debug)]
pub struct ImportArgs {
    #[command(flatten)]
    pub connection: ConnectionArgs,

    pub resource_type: String,

    pub id: String,
}

#[derive(clap::Args, Debug)]
pub struct ApplyArgs {
    #[command(flatten)]
    pub connection: ConnectionArgs,

    pub resource_type: String,

    /// JSON object of resource attributes
    #[arg(long)]
    pub config: PathBuf,

    /// Prior state; the resource is created when omitted
    #[arg(long)]
    pub state: Option<PathBuf>,
}

#[derive(clap::Args, Debug)]
pub struct ConnectionArgs {
    #[arg(long, env = "ARM_SUBSCRIPTION_ID")]
    pub subscription_id: Option<String>,

    #[arg(long, env = "ARM_TENANT_ID")]
    pub tenant_id: Option<String>,

    #[arg(long, env = "ARM_ACCESS_TOKEN", hide_env_values = true)]
    pub access_token: Option<String>,

    /// public, usgovernment or china
    #[arg(long, env = "ARM_ENVIRONMENT", default_value = "public")]
    pub environment: String,

    /// Overrides the environment's Resource Manager endpoint
    #[arg(long, env = "ARM_ENDPOINT")]
    pub endpoint: Option<String>,

    /// JSON file of provider feature flags
    #[arg(long, env = "ARM_FEATURES_FILE")]
    pub features: Option<PathBuf>,
}

impl ConnectionArgs {
    pub fn into_config(self) -> Result<ProviderConfig, ConfigError> {
        let features = match &self.features {
            Some(path) => Features::from_file(path)?,
            None => Features::default(),
        };

        let config = ProviderConfig {
            subscription_id: self
                .subscription_id
                .ok_or(ConfigError::Missing("subscription_id"))?,
            tenant_id: self.tenant_id,
            access_token: self
                .access_token
                .ok_or(ConfigError::Missing("access_token"))?,
            environment: self.environment.parse::<Environment>()?,
            endpoint: self.endpoint,
            features,
            timeouts: Default::default(),
        };
        config.validate()?;
        Ok(config)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use clap::Parser;
    use serial_test::serial;

    const SUBSCRIPTION: &str = "12345678-1234-9876-4563-123456789012";

    const ENV_VARS: &[&str] = &[
        "ARM_SUBSCRIPTION_ID",
        "ARM_TENANT_ID",
        "ARM_ACCESS_TOKEN",
        "ARM_ENVIRONMENT",
        "ARM_ENDPOINT",
        "ARM_FEATURES_FILE",
    ];

    // Runs `f` with the ARM_* variables set to `vars` only, restoring the
    // previous values afterwards.
    fn with_env<T>(vars: &[(&str, &str)], f: impl FnOnce() -> T) -> T {
        let backup: Vec<(&str, Option<String>)> = ENV_VARS
            .iter()
            .map(|name| (*name, std::env::var(name).ok()))
            .collect();
        unsafe {
            for name in ENV_VARS {
                std::env::remove_var(name);
            }
            for (name, value) in vars {
                std::env::set_var(name, value);
            }
        }

        let result = f();

        unsafe {
            for (name, value) in backup {
                match value {
                    Some(value) => std::env::set_var(name, value),
                    None => std::env::remove_var(name),
                }
            }
        }
        result
    }

    fn import_args(cli: Cli) -> ImportArgs {
        if let Command::Resource {
            command: ResourceCommand::Import(args),
        } = cli.command
        {
            args
        } else {
            panic!("Expected Resource Import command, got {:?}", cli.command);
        }
    }

    #[test]
    fn test_id_parse_args() {
        let cli = Cli::parse_from([
            "azurerm",
            "id",
            "parse",
            "key_vault",
            "/subscriptions/sub/resourceGroups/rg/providers/Microsoft.KeyVault/vaults/kv",
            "--insensitive",
        ]);

        if let Command::Id {
            command: IdCommand::Parse(args),
        } = cli.command
        {
            assert_eq!(args.id_type, "key_vault");
            assert!(args.insensitive);
        } else {
            panic!("Expected Id Parse command, got {:?}", cli.command);
        }
    }

    #[test]
    fn test_validate_args() {
        let cli = Cli::parse_from(["azurerm", "validate", "key_vault_name", "my-vault"]);

        if let Command::Validate(args) = cli.command {
            assert_eq!(args.validator, "key_vault_name");
            assert_eq!(args.value, "my-vault");
        } else {
            panic!("Expected Validate command, got {:?}", cli.command);
        }
    }

    #[test]
    fn test_apply_args_state_is_optional() {
        let cli = Cli::parse_from([
            "azurerm",
            "resource",
            "apply",
            "azurerm_resource_group",
            "--config=rg.json",
        ]);

        if let Command::Resource {
            command: ResourceCommand::Apply(args),
        } = cli.command
        {
            assert_eq!(args.config, PathBuf::from("rg.json"));
            assert!(args.state.is_none());
        } else {
            panic!("Expected Resource Apply command, got {:?}", cli.command);
        }
    }

    #[test]
    #[serial]
    fn test_connection_from_env_vars() {
        let args = with_env(
            &[
                ("ARM_SUBSCRIPTION_ID", SUBSCRIPTION),
                ("ARM_ACCESS_TOKEN", "env_token"),
                ("ARM_ENVIRONMENT", "china"),
            ],
            || {
                import_args(Cli::parse_from([
                    "azurerm",
                    "resource",
                    "import",
                    "azurerm_resource_group",
                    "/subscriptions/sub/resourceGroups/rg",
                ]))
            },
        );

        assert_eq!(args.connection.subscription_id.as_deref(), Some(SUBSCRIPTION));
        assert_eq!(args.connection.access_token.as_deref(), Some("env_token"));

        let config = args.connection.into_config().unwrap();
        assert_eq!(config.environment, Environment::China);
        assert_eq!(config.endpoint(), "https://management.chinacloudapi.cn");
    }

    #[test]
    #[serial]
    fn test_cli_flag_takes_precedence_over_env() {
        let args = with_env(&[("ARM_ACCESS_TOKEN", "env_token")], || {
            import_args(Cli::parse_from([
                "azurerm",
                "resource",
                "import",
                "azurerm_resource_group",
                "/subscriptions/sub/resourceGroups/rg",
                "--access-token=cli_token",
            ]))
        });

        assert_eq!(args.connection.access_token.as_deref(), Some("cli_token"));
    }

    #[test]
    #[serial]
    fn test_connection_defaults_without_env() {
        let args = with_env(&[], || {
            import_args(Cli::parse_from([
                "azurerm",
                "resource",
                "import",
                "azurerm_resource_group",
                "/subscriptions/sub/resourceGroups/rg",
            ]))
        });

        assert!(args.connection.subscription_id.is_none());
        assert!(args.connection.access_token.is_none());
        assert_eq!(args.connection.environment, "public");
        assert!(matches!(
            args.connection.into_config(),
            Err(ConfigError::Missing("subscription_id"))
        ));
    }

    #[test]
    #[serial]
    fn test_connection_rejects_unknown_environment() {
        let args = with_env(&[], || {
            import_args(Cli::parse_from([
                "azurerm",
                "resource",
                "import",
                "azurerm_resource_group",
                "/subscriptions/sub/resourceGroups/rg",
                "--subscription-id",
                SUBSCRIPTION,
                "--access-token=token",
                "--environment=mars",
            ]))
        });

        assert!(matches!(
            args.connection.into_config(),
            Err(ConfigError::UnknownEnvironment(_))
        ));
    }
}
