//! hublens CLI
//!
//! Command-line host for the Hub client: session management, component
//! catalog search, and graph inspection across linked resources.

use anyhow::Result;
use clap::{Parser, Subcommand};
use colored::Colorize;
use hublens_client::{ChannelTelemetrySink, HubClient, Resource};
use std::path::PathBuf;
use std::sync::Arc;

mod config;
mod logging;

use config::AppConfig;

#[derive(Parser)]
#[command(name = "hublens")]
#[command(version)]
#[command(about = "Explore a Hub server's component graph", long_about = None)]
struct Cli {
    /// Configuration file path
    #[arg(short, long, value_name = "FILE")]
    config: Option<PathBuf>,

    /// Hub origin, overriding the configuration file
    #[arg(long, value_name = "URL")]
    origin: Option<String>,

    /// Enable verbose output
    #[arg(short, long)]
    verbose: bool,

    /// Output format (text, json)
    #[arg(long, default_value = "text")]
    format: OutputFormat,

    #[command(subcommand)]
    command: Commands,
}

#[derive(Clone, Copy, PartialEq, Eq)]
enum OutputFormat {
    Text,
    Json,
}

impl std::str::FromStr for OutputFormat {
    type Err = String;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.to_lowercase().as_str() {
            "text" => Ok(OutputFormat::Text),
            "json" => Ok(OutputFormat::Json),
            _ => Err(format!("Invalid output format: {}", s)),
        }
    }
}

#[derive(Subcommand)]
enum Commands {
    /// Log in to the Hub (prompts for the password)
    Login {
        /// Hub username
        #[arg(short, long)]
        username: String,
    },

    /// End the Hub session
    Logout,

    /// Show whether an authenticated session is active
    Status,

    /// Component catalog operations
    #[command(subcommand)]
    Component(ComponentCommands),

    /// Assemble and emit a phone-home payload
    PhoneHome {
        /// Host application name
        #[arg(long)]
        third_party_name: String,

        /// Host application version
        #[arg(long)]
        third_party_version: String,

        /// Plugin version to report
        #[arg(long, default_value = env!("CARGO_PKG_VERSION"))]
        plugin_version: String,
    },
}

#[derive(Subcommand)]
enum ComponentCommands {
    /// Search the catalog by forge coordinate
    Find {
        /// Forge name, e.g. npm or maven
        #[arg(long)]
        forge: String,

        /// Forge-specific external id, e.g. lodash/4.17.11
        #[arg(long)]
        external_id: String,
    },

    /// Vulnerabilities of the first catalog match, with details URLs
    Vulns {
        #[arg(long)]
        forge: String,
        #[arg(long)]
        external_id: String,
    },

    /// Policy rules the first catalog match violates
    Policies {
        #[arg(long)]
        forge: String,
        #[arg(long)]
        external_id: String,
    },

    /// Risk profile of the first catalog match
    Risk {
        #[arg(long)]
        forge: String,
        #[arg(long)]
        external_id: String,
    },

    /// Project versions whose BOMs reference the first catalog match
    Projects {
        #[arg(long)]
        forge: String,
        #[arg(long)]
        external_id: String,
    },

    /// BOM entries matching the component across its referencing projects
    Bom {
        #[arg(long)]
        forge: String,
        #[arg(long)]
        external_id: String,
    },
}

#[tokio::main]
async fn main() -> Result<()> {
    let cli = Cli::parse();
    logging::init(cli.verbose);

    let app_config = AppConfig::load(cli.config.as_deref(), cli.origin.as_deref())?;
    let client = HubClient::new(app_config.into_hub_config()?)?;

    match cli.command {
        Commands::Login { username } => {
            let password = dialoguer::Password::new()
                .with_prompt("Hub password")
                .interact()?;
            client.login(&username, &password).await?;
            println!("{}", "Logged in.".green());
        }

        Commands::Logout => {
            client.logout().await?;
            println!("Logged out.");
        }

        Commands::Status => match client.current_user().await {
            Some(user) => println!(
                "{} as {}",
                "connected".green(),
                user.str_field("userName").unwrap_or("<unnamed>")
            ),
            None => println!("{}", "not connected".yellow()),
        },

        Commands::Component(command) => run_component(command, &client, cli.format).await?,

        Commands::PhoneHome {
            third_party_name,
            third_party_version,
            plugin_version,
        } => {
            let (sink, mut receiver) = ChannelTelemetrySink::new();
            let client = client.with_telemetry_sink(Arc::new(sink));
            client
                .phone_home(&third_party_name, &third_party_version, &plugin_version)
                .await;
            // Stand in for the host's send primitive: surface the payload.
            if let Some(payload) = receiver.recv().await {
                println!("{}", serde_json::to_string_pretty(&payload)?);
            }
        }
    }

    Ok(())
}

async fn run_component(
    command: ComponentCommands,
    client: &HubClient,
    format: OutputFormat,
) -> Result<()> {
    match command {
        ComponentCommands::Find { forge, external_id } => {
            let found = client.find_external_components(&forge, &external_id).await;
            print_resources(format, &found)
        }

        ComponentCommands::Vulns { forge, external_id } => {
            let component = first_match(client, &forge, &external_id).await?;
            let vulnerabilities = client.component_vulnerabilities(&component).await;
            print_resources(format, &vulnerabilities)
        }

        ComponentCommands::Policies { forge, external_id } => {
            let component = first_match(client, &forge, &external_id).await?;
            match client.component_policy_violations(&component).await {
                Some(violations) => print_resources(format, std::slice::from_ref(&violations)),
                None => {
                    println!("{}", "no policy data offered".yellow());
                    Ok(())
                }
            }
        }

        ComponentCommands::Risk { forge, external_id } => {
            let component = first_match(client, &forge, &external_id).await?;
            match client.component_risk_profile(&component).await {
                Some(profile) => print_resources(format, std::slice::from_ref(&profile)),
                None => {
                    println!("{}", "no risk profile offered".yellow());
                    Ok(())
                }
            }
        }

        ComponentCommands::Projects { forge, external_id } => {
            let component = first_match(client, &forge, &external_id).await?;
            let projects: Vec<Resource> = client
                .component_version_reference_projects(&component)
                .await
                .into_iter()
                .flatten()
                .collect();
            print_resources(format, &projects)
        }

        ComponentCommands::Bom { forge, external_id } => {
            let component = first_match(client, &forge, &external_id).await?;
            let projects: Vec<Resource> = client
                .component_version_reference_projects(&component)
                .await
                .into_iter()
                .flatten()
                .collect();
            let matched = client.matching_bom_components(&component, &projects).await;
            print_resources(format, &matched)
        }
    }
}

/// Resolves the first catalog match for a forge coordinate.
async fn first_match(client: &HubClient, forge: &str, external_id: &str) -> Result<Resource> {
    let mut found = client.find_external_components(forge, external_id).await;
    if found.is_empty() {
        anyhow::bail!("no component matches {forge}:{external_id}");
    }
    Ok(found.remove(0))
}

fn print_resources(format: OutputFormat, resources: &[Resource]) -> Result<()> {
    match format {
        OutputFormat::Json => println!("{}", serde_json::to_string_pretty(resources)?),
        OutputFormat::Text => {
            if resources.is_empty() {
                println!("{}", "no results".yellow());
            }
            for resource in resources {
                println!("{}", summarize(resource));
            }
        }
    }
    Ok(())
}

/// One-line text rendering of an opaque resource.
fn summarize(resource: &Resource) -> String {
    const SUMMARY_FIELDS: [&str; 6] = [
        "componentName",
        "versionName",
        "projectName",
        "vulnerabilityName",
        "source",
        "detailsUrl",
    ];
    let parts: Vec<String> = SUMMARY_FIELDS
        .iter()
        .filter_map(|key| {
            resource
                .str_field(key)
                .filter(|value| !value.is_empty())
                .map(|value| format!("{key}={value}"))
        })
        .collect();
    if parts.is_empty() {
        resource.as_value().to_string()
    } else {
        parts.join("  ")
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use serde_json::json;

    #[test]
    fn test_output_format_parsing() {
        assert!("text".parse::<OutputFormat>().unwrap() == OutputFormat::Text);
        assert!("JSON".parse::<OutputFormat>().unwrap() == OutputFormat::Json);
        assert!("yaml".parse::<OutputFormat>().is_err());
    }

    #[test]
    fn test_summarize_prefers_known_fields() {
        let resource = Resource::new(json!({
            "componentName": "lodash",
            "versionName": "4.17.11",
            "license": "MIT"
        }));
        assert_eq!(summarize(&resource), "componentName=lodash  versionName=4.17.11");
    }

    #[test]
    fn test_summarize_falls_back_to_raw_json() {
        let resource = Resource::new(json!({ "opaque": true }));
        assert_eq!(summarize(&resource), r#"{"opaque":true}"#);
    }
}
