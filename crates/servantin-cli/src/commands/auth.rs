use super::explain;
use crate::app::Runtime;
use crate::display;
use anyhow::{Result, bail};
use colored::Colorize;
use servantin_application::auth::{AuthController, RegistrationForm, VerifyEmailState};

pub async fn login(
    runtime: &Runtime,
    email: &str,
    password: &str,
    redirect: Option<&str>,
) -> Result<()> {
    let auth = AuthController::new(runtime.ctx.clone());
    auth.login(email, password, redirect).await.map_err(explain)?;
    if let Some(user) = runtime.ctx.session.user() {
        display::success(&format!("Bonjour {} !", user.display_first_name()));
    }
    println!("→ {}", runtime.current_route());
    Ok(())
}

pub fn logout(runtime: &Runtime) {
    AuthController::new(runtime.ctx.clone()).logout();
    display::success("Déconnecté.");
}

pub async fn register(runtime: &Runtime, form: &RegistrationForm) -> Result<()> {
    for rule in form.checklist() {
        let mark = if rule.met { "✔".green() } else { "✘".red() };
        println!("  {mark} {}", rule.label);
    }
    let auth = AuthController::new(runtime.ctx.clone());
    auth.register(form).await.map_err(explain)?;
    display::success("Compte créé.");
    println!("→ {}", runtime.current_route());
    Ok(())
}

pub async fn whoami(runtime: &Runtime) -> Result<()> {
    if !runtime.ctx.session.is_authenticated() {
        println!("Non connecté.");
        return Ok(());
    }
    let user = AuthController::new(runtime.ctx.clone())
        .refresh_user()
        .await
        .map_err(explain)?;
    println!("{} <{}>", user.name.bold(), user.email);
    println!("  Rôle  {:?}", user.role);
    if user.is_provider() && !user.has_provider_profile {
        display::notice("Profil prestataire à compléter : servantin provider onboard");
    }
    Ok(())
}

pub async fn forgot_password(runtime: &Runtime, email: &str) -> Result<()> {
    AuthController::new(runtime.ctx.clone())
        .forgot_password(email)
        .await
        .map_err(explain)?;
    display::success("Si un compte existe pour cette adresse, un lien de réinitialisation a été envoyé.");
    Ok(())
}

pub async fn reset_password(
    runtime: &Runtime,
    token: &str,
    password: &str,
    confirmation: &str,
) -> Result<()> {
    AuthController::new(runtime.ctx.clone())
        .reset_password(Some(token), password, confirmation)
        .await
        .map_err(explain)?;
    display::success("Mot de passe modifié. Vous pouvez vous connecter.");
    Ok(())
}

pub async fn verify_email(
    runtime: &Runtime,
    token: Option<&str>,
    resend: Option<&str>,
) -> Result<()> {
    let auth = AuthController::new(runtime.ctx.clone());
    if let Some(email) = resend {
        auth.resend_verification(email).await.map_err(explain)?;
        display::success("Email de vérification envoyé.");
        return Ok(());
    }
    match auth.verify_email(token).await {
        VerifyEmailState::NoToken => bail!("Lien de vérification incomplet : --token requis"),
        VerifyEmailState::Success(message) => display::success(&message),
        VerifyEmailState::Error(message) => bail!(message),
    }
    Ok(())
}
