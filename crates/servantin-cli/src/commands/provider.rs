use super::explain;
use crate::app::Runtime;
use crate::display;
use crate::{OnboardArgs, ProfileArgs};
use anyhow::{Result, anyhow, bail};
use colored::Colorize;
use servantin_application::provider_dashboard::ProviderDashboardController;
use servantin_application::provider_onboarding::{OnboardingStep, ProviderOnboardingController};
use servantin_application::provider_profile::ProviderProfileController;
use servantin_core::booking::{Booking, ProviderTab};
use servantin_core::format::format_currency;

pub async fn requests(runtime: &Runtime, tab: ProviderTab) -> Result<()> {
    let dashboard = ProviderDashboardController::new(runtime.ctx.clone());
    dashboard.load().await.map_err(explain)?;
    dashboard.set_tab(tab);

    let stats = dashboard.stats();
    display::heading("Tableau de bord prestataire");
    println!(
        "{} nouvelles · {} en cours · {} terminées · {} gagnés · {} messages non lus",
        stats.new_requests,
        stats.active,
        stats.completed,
        format_currency(stats.earnings),
        stats.unread_messages
    );
    println!();

    let visible = dashboard.visible();
    if visible.is_empty() {
        println!("{}", tab.empty_message().dimmed());
    }
    for booking in &visible {
        println!("{}", display::booking_row(booking));
    }
    Ok(())
}

async fn loaded_dashboard(runtime: &Runtime) -> Result<ProviderDashboardController> {
    let dashboard = ProviderDashboardController::new(runtime.ctx.clone());
    dashboard.load().await.map_err(explain)?;
    Ok(dashboard)
}

fn report(updated: Option<Booking>, done: &str, failed: &str) -> Result<()> {
    let booking = updated.ok_or_else(|| anyhow!("{failed}"))?;
    display::success(done);
    println!("{}", display::booking_row(&booking));
    Ok(())
}

pub async fn accept(runtime: &Runtime, id: &str) -> Result<()> {
    let dashboard = loaded_dashboard(runtime).await?;
    report(
        dashboard.accept(id).await,
        "Demande acceptée.",
        "Impossible d'accepter la demande",
    )
}

pub async fn decline(runtime: &Runtime, id: &str, reason: Option<&str>) -> Result<()> {
    let dashboard = loaded_dashboard(runtime).await?;
    report(
        dashboard.decline(id, reason).await,
        "Demande refusée.",
        "Impossible de refuser la demande",
    )
}

pub async fn complete(runtime: &Runtime, id: &str) -> Result<()> {
    let dashboard = loaded_dashboard(runtime).await?;
    report(
        dashboard.complete(id).await,
        "Mission terminée.",
        "Impossible de terminer la mission",
    )
}

impl ProfileArgs {
    fn has_changes(&self) -> bool {
        self.bio.is_some()
            || !self.toggle_category.is_empty()
            || !self.toggle_language.is_empty()
            || self.postal_code.is_some()
            || self.city.is_some()
            || self.radius.is_some()
            || self.rate.is_some()
            || self.experience.is_some()
            || !self.add_certification.is_empty()
            || self.remove_certification.is_some()
    }
}

/// Shows the profile; with any field flag, edits and saves it first.
pub async fn profile(runtime: &Runtime, args: ProfileArgs) -> Result<()> {
    let controller = ProviderProfileController::new(runtime.ctx.clone());
    controller.load().await.map_err(explain)?;

    if args.has_changes() {
        if !controller.begin_edit() {
            bail!("Profil introuvable");
        }
        controller.update_form(|form| {
            if let Some(bio) = args.bio {
                form.bio = bio;
            }
            for id in &args.toggle_category {
                form.toggle_category(id);
            }
            for code in &args.toggle_language {
                form.toggle_language(code);
            }
            if let Some(postal_code) = args.postal_code {
                form.postal_code = postal_code;
            }
            if let Some(city) = args.city {
                form.city = city;
            }
            if let Some(radius) = args.radius {
                form.service_radius = radius;
            }
            if let Some(rate) = args.rate {
                form.hourly_rate = rate;
            }
            if let Some(years) = args.experience {
                form.years_of_experience = years;
            }
            if let Some(position) = args.remove_certification {
                form.remove_certification(position.saturating_sub(1));
            }
            for certification in &args.add_certification {
                form.add_certification(certification);
            }
        });
        controller.save().await.map_err(explain)?;
        if let Some(message) = controller.success() {
            display::success(&message);
        }
    }

    let Some(profile) = controller.profile() else {
        bail!("Profil introuvable");
    };
    display::profile(&profile, &controller.category_names());
    Ok(())
}

/// Fills every onboarding step from flags and creates the profile.
pub async fn onboard(runtime: &Runtime, args: OnboardArgs) -> Result<()> {
    let onboarding = ProviderOnboardingController::new(runtime.ctx.clone());
    onboarding.start().await.map_err(explain)?;

    onboarding.update_form(|form| {
        form.bio = args.bio;
        form.category_ids = args.categories;
        if !args.languages.is_empty() {
            form.languages = args.languages;
        }
        form.postal_code = args.postal_code;
        form.city = args.city;
        if let Some(radius) = args.radius {
            form.service_radius = radius;
        }
        if let Some(rate) = args.rate {
            form.hourly_rate = rate;
        }
        form.years_of_experience = args.experience;
        for certification in &args.certifications {
            form.add_certification(certification);
        }
    });

    loop {
        let step = onboarding.step();
        if step == OnboardingStep::Verification {
            break;
        }
        if onboarding.next() == step {
            bail!("Étape « {} » incomplète", step.title());
        }
    }

    let profile = onboarding.submit().await.map_err(explain)?;
    display::success("Profil prestataire créé.");
    println!("  {} · {}", profile.name.bold(), profile.city);
    println!("→ {}", runtime.current_route());
    Ok(())
}
