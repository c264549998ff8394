use anyhow::Result;
use catalog_lib::auth::SessionStore;
use clap::Args;

use crate::output::{print_json, OutputFormat};
use crate::prompt::Prompt;

#[derive(Args)]
pub struct LoginArgs {
    /// Any non-empty username is accepted
    #[arg(long)]
    pub username: Option<String>,

    /// Any non-empty password is accepted
    #[arg(long)]
    pub password: Option<String>,
}

pub async fn login(args: &LoginArgs, session: &SessionStore) -> Result<()> {
    let mut prompt = Prompt::new();
    let username = prompt.ask_or(args.username.as_deref(), "username: ").await?;
    let password = prompt.ask_or(args.password.as_deref(), "password: ").await?;

    let user = session.login(&username, &password)?;
    eprintln!("Signed in as {}", user.username);
    Ok(())
}

pub fn logout(session: &SessionStore) -> Result<()> {
    session.logout()?;
    eprintln!("Signed out");
    Ok(())
}

pub fn whoami(session: &SessionStore, format: &OutputFormat) -> Result<()> {
    let user = session.require_user()?;
    match format {
        OutputFormat::Json => print_json(&user),
        _ => println!("{}", user.username),
    }
    Ok(())
}
