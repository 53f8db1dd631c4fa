use utoipa::OpenApi;

use crate::features::billing::handlers as billing_handlers;
use crate::features::categories::handlers as categories_handlers;

#[derive(OpenApi)]
#[openapi(
    info(
        title = "Logario API",
        description = "Utility-billing ingestion service: scrapes provider portals with user-supplied credentials and serves the stored records."
    ),
    paths(
        // Billing
        billing_handlers::save_billing,
        billing_handlers::list_billing_records,
        billing_handlers::update_billing_category,
        // Categories
        categories_handlers::list_categories,
    ),
    tags(
        (name = "billing", description = "Scrape ingestion and stored billing records"),
        (name = "categories", description = "Seeded category labels"),
    )
)]
pub struct ApiDoc;
