use super::explain;
use crate::app::Runtime;
use crate::display;
use anyhow::{Result, bail};
use colored::Colorize;
use servantin_application::booking_detail::{BookingDetailController, LoadOutcome};
use servantin_application::client_dashboard::ClientDashboardController;
use servantin_core::booking::ClientFilter;
use servantin_core::format::format_date_time;
use tokio_util::sync::CancellationToken;

pub async fn list(runtime: &Runtime, filter: ClientFilter) -> Result<()> {
    let dashboard = ClientDashboardController::new(runtime.ctx.clone());
    dashboard.load().await.map_err(explain)?;
    dashboard.set_filter(filter);

    display::heading(&dashboard.greeting());
    let stats = dashboard.stats();
    println!(
        "{} demandes · {} en cours · {} messages non lus",
        stats.total, stats.active, stats.unread_messages
    );
    println!();

    println!("{}", dashboard.filter().label().underline());
    let visible = dashboard.visible();
    if visible.is_empty() {
        println!("{}", dashboard.empty_message().dimmed());
    }
    for booking in &visible {
        println!("{}", display::booking_row(booking));
    }
    Ok(())
}

/// Loads a booking and its thread; Ctrl-C abandons the request.
async fn open(runtime: &Runtime, id: &str) -> Result<BookingDetailController> {
    let detail = BookingDetailController::new(runtime.ctx.clone(), id, false);
    let cancel = CancellationToken::new();
    let interrupt = {
        let cancel = cancel.clone();
        tokio::spawn(async move {
            if tokio::signal::ctrl_c().await.is_ok() {
                cancel.cancel();
            }
        })
    };

    let outcome = detail.load(&cancel).await;
    interrupt.abort();
    match outcome.map_err(explain)? {
        LoadOutcome::Loaded => Ok(detail),
        LoadOutcome::Cancelled => bail!("Interrompu"),
    }
}

pub async fn show(runtime: &Runtime, id: &str) -> Result<()> {
    let detail = open(runtime, id).await?;
    let Some(booking) = detail.booking() else {
        bail!("Réservation {id} introuvable");
    };

    display::heading(&format!("Réservation {}", booking.id));
    display::booking_details(&booking);
    println!();
    for entry in detail.timeline() {
        let marker = if entry.negative { "✘".red() } else { "●".green() };
        println!("  {marker} {}  {}", entry.label, format_date_time(entry.at).dimmed());
    }
    if detail.can_cancel() {
        println!();
        println!("  {}", format!("servantin booking cancel {}", booking.id).dimmed());
    }
    Ok(())
}

pub async fn cancel(runtime: &Runtime, id: &str) -> Result<()> {
    let detail = open(runtime, id).await?;
    if !detail.can_cancel() {
        bail!("Cette réservation ne peut plus être annulée");
    }
    match detail.cancel().await {
        Some(booking) => {
            display::success("Réservation annulée.");
            println!("{}", display::booking_row(&booking));
            Ok(())
        }
        None => bail!("L'annulation a échoué"),
    }
}

pub async fn messages(runtime: &Runtime, id: &str) -> Result<()> {
    let detail = open(runtime, id).await?;
    if !detail.can_message() {
        display::notice("La messagerie sera disponible une fois un prestataire assigné.");
        return Ok(());
    }

    let thread = detail.messages();
    if thread.is_empty() {
        println!("{}", "Aucun message pour le moment.".dimmed());
    }
    for message in &thread {
        println!("{}", display::message_line(message, detail.is_own_message(message)));
    }
    Ok(())
}

pub async fn send(runtime: &Runtime, id: &str, text: &str) -> Result<()> {
    if text.trim().is_empty() {
        bail!("Message vide");
    }
    let detail = open(runtime, id).await?;
    if !detail.can_message() {
        bail!("La messagerie sera disponible une fois un prestataire assigné.");
    }
    match detail.send_message(text).await {
        Some(message) => {
            println!("{}", display::message_line(&message, true));
            Ok(())
        }
        None => bail!("Le message n'a pas pu être envoyé"),
    }
}
