//! Auth command handlers.

use anyhow::{Context as _, Result};
use tdx_core::session::{SessionStore, mask_token};

use super::Context;

pub async fn register(ctx: &Context<'_>, name: &str, email: &str, password: &str) -> Result<()> {
    ctx.auth_gateway().register(name, email, password).await?;
    println!("Account created for {}.", email.trim());
    println!("Log in with `tdx login --email {}`.", email.trim());
    Ok(())
}

pub async fn login(
    ctx: &Context<'_>,
    store: &mut SessionStore,
    email: &str,
    password: &str,
) -> Result<()> {
    let result = ctx.auth_gateway().login(email, password).await?;
    let name = result.user.name.clone();
    store
        .set(result.token, result.user)
        .context("save session")?;
    println!("Logged in as {name}.");
    Ok(())
}

pub fn logout(store: &mut SessionStore) -> Result<()> {
    if store.clear().context("clear session")? {
        println!("Logged out.");
    } else {
        println!("Not logged in.");
    }
    Ok(())
}

pub fn whoami(store: &SessionStore) -> Result<()> {
    let Some(session) = store.get() else {
        anyhow::bail!("{}", super::LOGIN_HINT);
    };
    println!("{} <{}>", session.user.name, session.user.email);
    println!("token: {}", mask_token(&session.token));
    Ok(())
}

/// The login view, as a terminal hint.
pub fn login_prompt() {
    println!("Log in with `tdx login --email <EMAIL> --password <PASSWORD>`.");
    println!("No account yet? Run `tdx register`.");
}

/// The register view, as a terminal hint.
pub fn register_prompt() {
    println!("Create an account with `tdx register --name <NAME> --email <EMAIL> --password <PASSWORD>`.");
    println!("Already registered? Run `tdx login`.");
}
