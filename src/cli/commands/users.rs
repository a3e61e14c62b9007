//! Users command implementation.

use crate::cli::UserCommands;
use crate::config::CliOverrides;
use crate::error::Result;
use crate::format::text;
use crate::model::User;

use super::open_workspace;

/// Execute a users subcommand.
///
/// # Errors
///
/// Returns an error if the workspace is missing or the store fails.
pub fn execute(command: &UserCommands, json: bool, cli: &CliOverrides) -> Result<()> {
    let (mut store, _paths) = open_workspace(cli)?;

    match command {
        UserCommands::List => {
            let users = store.list_users()?;
            if json {
                println!("{}", crate::format::to_json_pretty(&users)?);
            } else {
                for user in &users {
                    println!("{}", text::user_line(user));
                }
            }
        }
        UserCommands::Add {
            first_name,
            last_name,
            email,
            role,
        } => {
            let user = store.create_user(&User {
                id: 0,
                first_name: first_name.clone(),
                last_name: last_name.clone(),
                email: email.clone(),
                role: role.clone(),
                active: true,
            })?;
            if json {
                println!("{}", crate::format::to_json_pretty(&user)?);
            } else {
                println!("{}", text::user_line(&user));
            }
        }
    }
    Ok(())
}
