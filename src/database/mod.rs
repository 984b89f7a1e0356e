pub mod block_repo;
pub mod candidate_cache_repo;
pub mod event_repo;
pub mod geo_repo;
pub mod match_repo;
pub mod precompute_repo;
pub mod schema;
pub mod swipe_repo;
pub mod user_repo;
