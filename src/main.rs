mod cli;

use std::collections::BTreeMap;
use std::path::Path;

use clap::Parser;
use color_eyre::eyre::{Result, WrapErr};
use serde_json::Value;
use tracing_subscriber::EnvFilter;

use azurerm::resourceids::{self, KNOWN_TYPES};
use azurerm::terraform::ResourceData;
use azurerm::validate::{self, Diagnostics};
use azurerm::{AzureRmError, Clients, Context, output, resources};

use cli::{Cli, Command, ConnectionArgs, IdCommand, ResourceCommand};

#[tokio::main]
async fn main() -> Result<()> {
    color_eyre::install()?;

    tracing_subscriber::fmt()
        .with_env_filter(EnvFilter::from_default_env())
        .with_writer(std::io::stderr)
        .init();

    let cli = Cli::parse();

    match cli.command {
        Command::Id { command } => match command {
            IdCommand::Parse(args) => {
                let id_type = resourceids::lookup_type(&args.id_type).ok_or_else(|| {
                    AzureRmError::Unknown {
                        kind: "resource ID type",
                        name: args.id_type.clone(),
                    }
                })?;
                let parsed = id_type.parse(&args.value, args.insensitive)?;
                println!("{}", output::segment_tree(id_type, &parsed));
            }
            IdCommand::Types => println!("{}", output::id_types_table(KNOWN_TYPES)),
        },
        Command::Validate(args) => {
            let diags = run_validator(&args.validator, &args.value)?;
            println!("{}", output::diagnostics_table(&diags));
            if !diags.is_valid() {
                std::process::exit(1);
            }
        }
        Command::Resource { command } => run_resource(command).await?,
    }

    Ok(())
}

/// Name validators first, then `uuid`, then any known ID type key.
fn run_validator(name: &str, value: &str) -> Result<Diagnostics, AzureRmError> {
    if let Some(validator) = validate::lookup_name_validator(name) {
        return Ok(validator(value, name));
    }
    if name == "uuid" {
        return Ok(validate::is_uuid(value, name));
    }
    if let Some(id_type) = resourceids::lookup_type(name) {
        let mut diags = Diagnostics::default();
        if let Err(err) = id_type.parse(value, false) {
            diags.error(name, err.to_string());
        }
        return Ok(diags);
    }
    Err(AzureRmError::Unknown {
        kind: "validator",
        name: name.to_string(),
    })
}

async fn run_resource(command: ResourceCommand) -> Result<()> {
    let ctx = Context::background();
    let interrupt = ctx.clone();
    tokio::spawn(async move {
        if tokio::signal::ctrl_c().await.is_ok() {
            tracing::warn!("interrupted - cancelling in-flight operation");
            interrupt.cancel();
        }
    });

    match command {
        ResourceCommand::Read(args) => {
            let resource = resources::get_resource(&args.resource_type)?;
            let clients = connect(args.connection)?;
            let mut data = read_state(&args.state)?;
            resource.read(&clients, &ctx, &mut data).await?;
            if data.is_gone() {
                tracing::warn!(resource = resource.type_name(), "remote object no longer exists");
            }
            print_state(&data)?;
        }
        ResourceCommand::Import(args) => {
            let resource = resources::get_resource(&args.resource_type)?;
            let clients = connect(args.connection)?;
            let data = resource.import(&clients, &ctx, &args.id).await?;
            print_state(&data)?;
        }
        ResourceCommand::Delete(args) => {
            let resource = resources::get_resource(&args.resource_type)?;
            let clients = connect(args.connection)?;
            let data = read_state(&args.state)?;
            resource.delete(&clients, &ctx, &data).await?;
            tracing::info!(resource = resource.type_name(), id = %data.id(), "deleted");
        }
        ResourceCommand::Apply(args) => {
            let resource = resources::get_resource(&args.resource_type)?;
            let clients = connect(args.connection)?;
            let contents = std::fs::read_to_string(&args.config)
                .wrap_err_with(|| format!("reading {}", args.config.display()))?;
            let attributes: BTreeMap<String, Value> = serde_json::from_str(&contents)
                .wrap_err_with(|| format!("parsing {}", args.config.display()))?;
            let prior = args.state.as_deref().map(read_state).transpose()?;

            let data = resources::apply(
                resource.as_ref(),
                &clients,
                &ctx,
                prior.as_ref(),
                ResourceData::new(attributes),
            )
            .await?;
            print_state(&data)?;
        }
    }

    Ok(())
}

fn connect(connection: ConnectionArgs) -> Result<Clients> {
    let config = connection.into_config()?;
    tracing::debug!(?config, "connecting");
    Ok(Clients::build(&config)?)
}

fn read_state(path: &Path) -> Result<ResourceData> {
    let contents =
        std::fs::read_to_string(path).wrap_err_with(|| format!("reading {}", path.display()))?;
    ResourceData::from_json(&contents).wrap_err_with(|| format!("parsing {}", path.display()))
}

fn print_state(data: &ResourceData) -> Result<()> {
    println!("{}", serde_json::to_string_pretty(data)?);
    Ok(())
}
