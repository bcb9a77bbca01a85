//! Headless companion to the desktop GUI: the same access-request
//! and credential-export operations as clap subcommands, for
//! scripting and for debugging a hub deployment.

use std::path::PathBuf;

use anyhow::{bail, Context, Result};
use clap::{Parser, Subcommand, ValueEnum};
use client_core::{AccessRequestApi, ApiClient, CredentialApi};
use shared::protocol::{AccessRequest, CredentialStatus, Permission, CONFIG_FILE_NAME};

#[derive(Parser, Debug)]
#[command(name = "access-desk", about = "Tenant access requests and credential export")]
struct Args {
    /// Base URL of the hub hosting the access-request service.
    #[arg(long, env = "ACCESS_DESK_SERVER_URL")]
    server_url: String,
    #[command(subcommand)]
    command: Command,
}

#[derive(Subcommand, Debug)]
enum Command {
    /// List the groups available to request and current memberships.
    Groups,
    /// Submit a tenant access request.
    Request {
        #[arg(long)]
        tenant: String,
        #[arg(long, value_enum, default_value_t = PermissionArg::ReadOnly)]
        permission: PermissionArg,
        #[arg(long)]
        justification: Option<String>,
    },
    /// Show credential readiness for the current session.
    Credentials,
    /// Save the remote credential config to a directory (or print it).
    Export {
        /// Directory to write the config into.
        #[arg(long, default_value = ".")]
        out: PathBuf,
        /// Print the config to stdout instead of writing a file.
        #[arg(long)]
        print: bool,
    },
}

#[derive(ValueEnum, Clone, Copy, Debug)]
enum PermissionArg {
    ReadOnly,
    ReadWrite,
}

impl From<PermissionArg> for Permission {
    fn from(value: PermissionArg) -> Self {
        match value {
            PermissionArg::ReadOnly => Permission::ReadOnly,
            PermissionArg::ReadWrite => Permission::ReadWrite,
        }
    }
}

#[tokio::main]
async fn main() -> Result<()> {
    tracing_subscriber::fmt().init();
    let args = Args::parse();

    let client = ApiClient::new(args.server_url.as_str())?;
    match args.command {
        Command::Groups => {
            let snapshot = client.fetch_groups().await?;
            println!("Available groups:");
            for group in &snapshot.available_groups {
                println!("  {group}");
            }
            println!("Your groups:");
            for group in &snapshot.my_groups {
                println!("  {group}");
            }
        }
        Command::Request {
            tenant,
            permission,
            justification,
        } => {
            let request = AccessRequest {
                tenant_name: tenant,
                permission: permission.into(),
                justification: justification.filter(|j| !j.trim().is_empty()),
            };
            let result = client.submit_request(&request).await?;
            println!("{}: {}", result.status, result.message);
        }
        Command::Credentials => {
            let status = client.fetch_status().await?;
            print_credential_status(&status);
        }
        Command::Export { out, print } => {
            let status = client.fetch_status().await?;
            if !status.is_ready() {
                bail!(
                    "credentials are not ready (missing cookies: {})",
                    status.missing_cookies.join(", ")
                );
            }
            let config = client.fetch_config().await?;
            if print {
                print!("{config}");
            } else {
                let path = out.join(CONFIG_FILE_NAME);
                std::fs::write(&path, &config)
                    .with_context(|| format!("failed to write {}", path.display()))?;
                println!("Saved credential config to {}", path.display());
            }
        }
    }

    Ok(())
}

fn print_credential_status(status: &CredentialStatus) {
    println!("User:       {}", status.username);
    println!("Hub:        {}", status.hub_url);
    if status.local_mode == Some(true) {
        println!("Local mode: credential checks bypassed");
    }
    if status.is_ready() {
        println!("Ready:      yes");
    } else {
        println!("Ready:      no (missing: {})", status.missing_cookies.join(", "));
    }
}
