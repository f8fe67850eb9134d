pub mod bs_analytic;
pub mod implied_vol;
pub mod portfolio;
