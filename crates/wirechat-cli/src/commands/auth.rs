//! Session commands: login, logout, whoami.

use std::sync::Arc;

use clap::Args;
use dialoguer::{Input, Password};

use wirechat_core::error::AppError;
use wirechat_gateway::AuthApi;

use crate::output::{self, OutputFormat};

use super::build_context;

/// Arguments for `login`
#[derive(Debug, Args)]
pub struct LoginArgs {
    /// Account email (prompted when omitted)
    #[arg(short, long)]
    pub email: Option<String>,
}

fn auth_api(env: &str) -> Result<AuthApi, AppError> {
    let context = build_context(env)?;
    Ok(AuthApi::new(context.client, context.store))
}

/// Log in and persist the session.
pub async fn login(args: &LoginArgs, env: &str) -> Result<(), AppError> {
    let email = match &args.email {
        Some(email) => email.clone(),
        None => Input::new()
            .with_prompt("Email")
            .interact_text()
            .map_err(|e| AppError::configuration(format!("Failed to read email: {e}")))?,
    };
    let password = Password::new()
        .with_prompt("Password")
        .interact()
        .map_err(|e| AppError::configuration(format!("Failed to read password: {e}")))?;

    let user = auth_api(env)?.login(&email, &password).await?;
    output::print_success(&format!("Logged in as {} <{}>", user.name, user.email));
    Ok(())
}

/// Log out and clear the persisted session.
pub async fn logout(env: &str) -> Result<(), AppError> {
    auth_api(env)?.logout().await?;
    output::print_success("Logged out");
    Ok(())
}

/// Show the currently authenticated user.
pub async fn me(env: &str, format: OutputFormat) -> Result<(), AppError> {
    let context = build_context(env)?;
    let user = AuthApi::new(Arc::clone(&context.client), context.store)
        .me()
        .await?;
    output::print_item(&user, format);
    Ok(())
}
