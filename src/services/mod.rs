pub mod macro_refresher;
pub mod recommendation;
pub mod registry;

pub use recommendation::RecommendationService;
pub use registry::RegistryService;
