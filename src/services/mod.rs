pub mod portfolio_service;

pub use portfolio_service::PortfolioService;
