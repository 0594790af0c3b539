use anyhow::Context;
use clap::Subcommand;
use serde_json::json;
use std::io::BufRead;

use crate::cli::{utils::output_success, OutputFormat};
use crate::config::AppConfig;
use crate::types::Role;

#[derive(Subcommand)]
pub enum UserCommands {
    #[command(about = "Create a user account (password is read from stdin when omitted)")]
    Create {
        #[arg(help = "Login name")]
        username: String,
        #[arg(long, help = "Grant the admin role")]
        admin: bool,
        #[arg(long, help = "Password for the new account")]
        password: Option<String>,
    },

    #[command(about = "Change the role of an existing user")]
    Role {
        #[arg(help = "Login name")]
        username: String,
        #[arg(help = "New role: user or admin")]
        role: Role,
    },
}

pub async fn handle(
    cmd: UserCommands,
    config: &AppConfig,
    output_format: OutputFormat,
) -> anyhow::Result<()> {
    let (manager, auth) = super::auth_service(config).await?;

    let result = match cmd {
        UserCommands::Create { username, admin, password } => {
            let password = match password {
                Some(p) => p,
                None => read_password()?,
            };
            let role = if admin { Role::Admin } else { Role::User };
            let id = auth.create_user(&username, &password, role).await?;
            output_success(
                output_format,
                &format!("Created {} {}", role, username),
                Some(json!({ "id": id, "username": username, "role": role })),
            )
        }
        UserCommands::Role { username, role } => {
            auth.set_role(&username, role).await?;
            output_success(
                output_format,
                &format!("{} is now {}", username, role),
                Some(json!({ "username": username, "role": role })),
            )
        }
    };

    manager.close().await;
    result
}

fn read_password() -> anyhow::Result<String> {
    let mut line = String::new();
    std::io::stdin()
        .lock()
        .read_line(&mut line)
        .context("failed to read password from stdin")?;
    let password = line.trim_end_matches(['\r', '\n']).to_string();
    if password.is_empty() {
        anyhow::bail!("no password given; pass --password or pipe it on stdin");
    }
    Ok(password)
}
