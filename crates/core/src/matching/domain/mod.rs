pub mod edit_distance;
pub mod similarity_scorer;
pub mod window_scorer;
