//! Landing page: service categories and static sections.

use crate::{AppContext, GENERIC_ERROR, ScreenError, ScreenResult};
use servantin_core::category::Category;
use servantin_core::navigation::{LandingSection, Route};
use std::sync::Arc;
use tracing::warn;

pub struct HomeController {
    ctx: Arc<AppContext>,
}

impl HomeController {
    pub fn new(ctx: Arc<AppContext>) -> Self {
        Self { ctx }
    }

    /// Categories in display order.
    pub async fn load_categories(&self) -> ScreenResult<Vec<Category>> {
        let mut categories = self.ctx.api.list_categories().await.map_err(|e| {
            warn!("Failed to load categories: {}", e);
            ScreenError::message(e.user_message(GENERIC_ERROR))
        })?;
        categories.sort_by_key(|c| c.sort_order);
        Ok(categories)
    }

    /// Clicking a category card opens the wizard with it preselected.
    pub fn open_category(&self, category: &Category) -> Route {
        let route = category_route(category);
        self.ctx.navigator.navigate(route.clone());
        route
    }

    pub fn sections(&self) -> &'static [LandingSection] {
        &LandingSection::ALL
    }
}

pub fn category_route(category: &Category) -> Route {
    Route::Book {
        category: Some(category.slug.clone()),
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::testing::TestHarness;
    use servantin_core::error::ApiError;

    #[tokio::test]
    async fn test_categories_sorted_by_order() {
        let harness = TestHarness::new();
        let home = HomeController::new(harness.ctx.clone());

        let categories = home.load_categories().await.unwrap();
        let slugs: Vec<_> = categories.iter().map(|c| c.slug.as_str()).collect();
        assert_eq!(slugs, vec!["babysitting", "home-repair"]);

        let route = home.open_category(&categories[0]);
        assert_eq!(route.path(), "/book?category=babysitting");
        assert_eq!(harness.router.current(), route);
    }

    #[tokio::test]
    async fn test_network_failure_uses_generic_message() {
        let harness = TestHarness::new();
        harness
            .api
            .fail("list_categories", ApiError::network("connection refused"));
        let home = HomeController::new(harness.ctx.clone());

        let err = home.load_categories().await.unwrap_err();
        assert_eq!(err, ScreenError::message(GENERIC_ERROR));
    }
}
