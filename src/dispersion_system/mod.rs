pub mod monte_carlo;
pub mod statistics;
pub mod variation;
