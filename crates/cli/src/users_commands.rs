use {
    cfbot_catalog::UserDirectory,
    cfbot_config::BotConfig,
    clap::Subcommand,
};

use crate::db_commands::open_catalog;

#[derive(Subcommand)]
pub enum UsersAction {
    /// List users and their verification status.
    List,
    /// Verify the user who was sent this code.
    Verify {
        /// Code the bot sent to the user.
        code: String,
    },
}

pub async fn handle_users(action: UsersAction, config: &BotConfig) -> anyhow::Result<()> {
    let users = open_catalog(&config.database).await?;

    match action {
        UsersAction::List => {
            let list = users.list_users().await?;
            if list.is_empty() {
                println!("No users yet.");
            }
            for user in &list {
                let status = if user.is_verified {
                    "verified"
                } else {
                    "pending"
                };
                match &user.verification_code {
                    Some(code) => println!("{:>14}  {status:<8}  code {code}", user.chat_id),
                    None => println!("{:>14}  {status}", user.chat_id),
                }
            }
        },
        UsersAction::Verify { code } => match users.verify_by_code(&code).await? {
            Some(user) => println!("Verified chat {}", user.chat_id),
            None => anyhow::bail!("no pending user holds code {code}"),
        },
    }
    Ok(())
}
