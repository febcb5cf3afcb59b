use thiserror::Error;

/// Startup failures that abort the run before any work begins.
/// Everything downstream degrades in place and is surfaced through
/// warn diagnostics instead of crossing back to the orchestrator.
#[derive(Debug, Error)]
pub enum SetupError {
    #[error("DMM_API_ID is not set; catalog credentials are required")]
    MissingCatalogApiId,
    #[error("DMM_AFFILIATE_ID is not set; catalog credentials are required")]
    MissingCatalogAffiliateId,
}
