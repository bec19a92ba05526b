use super::explain;
use crate::app::Runtime;
use crate::display;
use anyhow::{Result, bail};
use colored::Colorize;
use servantin_application::admin::AdminController;

pub async fn providers(runtime: &Runtime) -> Result<()> {
    let admin = AdminController::new(runtime.ctx.clone());
    let providers = admin.load_providers().await.map_err(explain)?;

    display::heading("Prestataires");
    for provider in &providers {
        let badge = if provider.is_verified {
            "vérifié".green()
        } else {
            "à vérifier".yellow()
        };
        println!(
            "{}  {} <{}>  {}",
            provider.id.dimmed(),
            provider.name.bold(),
            provider.email,
            badge
        );
        if let Some(notes) = &provider.verification_notes {
            println!("    {}", notes.dimmed());
        }
    }
    Ok(())
}

pub async fn verify(runtime: &Runtime, id: &str, verified: bool, notes: Option<&str>) -> Result<()> {
    let admin = AdminController::new(runtime.ctx.clone());
    admin.load_providers().await.map_err(explain)?;

    let Some(provider) = admin.verify(id, verified, notes).await else {
        bail!("La vérification du prestataire {id} a échoué");
    };
    if provider.is_verified {
        display::success(&format!("{} est maintenant vérifié.", provider.name));
    } else {
        display::notice(&format!("Vérification retirée pour {}.", provider.name));
    }
    Ok(())
}

pub async fn bookings(runtime: &Runtime, page: Option<u32>, size: Option<u32>) -> Result<()> {
    let admin = AdminController::new(runtime.ctx.clone());
    let bookings = admin.load_bookings(page, size).await.map_err(explain)?;

    display::heading(&format!(
        "Réservations · page {}/{} ({} au total)",
        bookings.page + 1,
        bookings.total_pages.max(1),
        bookings.total_elements
    ));
    for booking in &bookings.content {
        println!("{}", display::booking_row(booking));
    }
    if let Some(next) = bookings.next_page() {
        println!();
        println!(
            "{}",
            format!("servantin admin bookings --page {next} --size {}", bookings.size).dimmed()
        );
    }
    Ok(())
}
