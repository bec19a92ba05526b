use super::explain;
use crate::BookArgs;
use crate::app::Runtime;
use crate::display;
use anyhow::{Result, anyhow, bail};
use servantin_application::booking_wizard::{BookingWizardController, SubmitOutcome};
use servantin_core::booking::WizardStep;

const LOGIN_REQUIRED: &str =
    "Connectez-vous, puis relancez la même commande book : la demande n'est pas conservée.";
const LOGIN_STEPS: [&str; 2] = [
    "servantin login <email> --password <mot de passe>",
    "servantin book --category ... (mêmes options)",
];

/// Runs the booking wizard end to end from command-line flags.
pub async fn run(runtime: &Runtime, args: BookArgs) -> Result<()> {
    let wizard = BookingWizardController::new(runtime.ctx.clone());
    wizard.start(Some(&args.category)).await.map_err(explain)?;
    if wizard.step() == WizardStep::Category {
        let known: Vec<String> = wizard.categories().into_iter().map(|c| c.slug).collect();
        bail!(
            "Catégorie inconnue: {} (disponibles: {})",
            args.category,
            known.join(", ")
        );
    }

    wizard.set_location(&args.postal_code, &args.city, &args.canton);
    wizard.set_description(&args.description);
    wizard.set_preferred_time(args.date, args.slot);
    wizard.set_budget(args.budget_min, args.budget_max);
    if !wizard.can_proceed() {
        bail!("Code postal, ville et description sont obligatoires");
    }

    if wizard.next().await != WizardStep::Provider {
        bail!("Impossible de passer au choix du prestataire");
    }
    let matches = wizard.matches();
    if let Some(error) = wizard.search_error() {
        display::notice(&error);
    } else if let Some(notice) = wizard.broadcast_notice() {
        display::notice(notice);
    } else {
        display::heading("Prestataires disponibles");
        for provider in &matches {
            println!("  {}", display::provider_match_line(provider));
        }
    }

    match args.provider.as_deref() {
        Some(id) => {
            let chosen = matches
                .iter()
                .find(|p| p.id == id)
                .ok_or_else(|| anyhow!("Prestataire {id} absent des résultats"))?;
            wizard.select_provider(Some(chosen));
        }
        None => wizard.select_provider(None),
    }
    wizard.next().await;

    match wizard.submit().await.map_err(explain)? {
        SubmitOutcome::LoginRequired => {
            display::notice(LOGIN_REQUIRED);
            for line in LOGIN_STEPS {
                println!("  {line}");
            }
        }
        SubmitOutcome::Created(booking) => {
            display::success("Votre demande a été envoyée !");
            println!("{}", display::booking_row(&booking));
            println!("→ {}", runtime.current_route());
        }
    }
    Ok(())
}
