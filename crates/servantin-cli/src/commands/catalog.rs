use super::explain;
use crate::app::Runtime;
use crate::display;
use anyhow::Result;
use colored::Colorize;
use servantin_application::home::HomeController;
use servantin_core::format::category_icon;

pub async fn categories(runtime: &Runtime) -> Result<()> {
    let home = HomeController::new(runtime.ctx.clone());
    let categories = home.load_categories().await.map_err(explain)?;

    display::heading("Nos services");
    for category in &categories {
        println!(
            "{} {}  {}",
            category_icon(&category.icon),
            category.name.bold(),
            category.slug.dimmed()
        );
        if !category.description.is_empty() {
            println!("   {}", category.description);
        }
    }
    Ok(())
}
