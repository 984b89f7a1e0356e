pub mod candidate_service;
pub mod feed_service;
pub mod geo_service;
pub mod precompute_service;
pub mod ranking_service;
pub mod responsiveness;
pub mod scoring_service;
pub mod swipe_service;
